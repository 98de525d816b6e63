//! Classify task reports

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use chrono::DateTime;
use serde::Deserialize;

use floortriage::config::Config;
use floortriage::core::models::{TaskRecord, generate_task_id};
use floortriage::output::{ClassifyOutcome, ClassifyResult, OutputMode};

/// Where the records to classify come from
#[derive(Debug)]
pub enum RecordSource {
    /// A single record described on the command line
    Args {
        /// Task description
        description: String,
        /// Equipment id
        equipment: Option<String>,
        /// RFC 3339 report time
        shift_time: Option<String>,
        /// Reporter role
        role: String,
        /// Structured tags
        tags: Vec<String>,
        /// Task id
        id: Option<String>,
    },
    /// A JSON file ("-" for stdin)
    File(PathBuf),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordInput {
    Many(Vec<TaskRecord>),
    One(Box<TaskRecord>),
}

/// Classify records and report each suggestion
pub fn classify(source: RecordSource, config: &Config, mode: OutputMode) -> anyhow::Result<()> {
    let records = load_records(source)?;
    let engine = config.build_engine()?;

    let results: Vec<ClassifyOutcome> = records
        .iter()
        .zip(engine.classify_all(&records))
        .map(|(record, outcome)| match outcome {
            Ok(classification) => ClassifyOutcome::Classified { classification },
            Err(err) => ClassifyOutcome::Rejected {
                task_id: record.id.clone(),
                error: err.to_string(),
            },
        })
        .collect();

    let result = ClassifyResult { results };
    result.render(mode);

    let rejected = result.rejected();
    if rejected > 0 {
        anyhow::bail!("{rejected} of {} record(s) could not be classified", records.len());
    }
    Ok(())
}

fn load_records(source: RecordSource) -> anyhow::Result<Vec<TaskRecord>> {
    match source {
        RecordSource::Args {
            description,
            equipment,
            shift_time,
            role,
            tags,
            id,
        } => {
            let shift_timestamp = shift_time
                .map(|t| {
                    DateTime::parse_from_rfc3339(&t)
                        .with_context(|| format!("--shift-time {t:?} is not an RFC 3339 timestamp"))
                })
                .transpose()?;
            Ok(vec![TaskRecord {
                id: id.unwrap_or_else(generate_task_id),
                description,
                equipment_id: equipment,
                reporter_role: role,
                shift_timestamp,
                tags: tags.into_iter().collect(),
            }])
        },
        RecordSource::File(path) => {
            let content = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).context("reading records from stdin")?;
                buf
            } else {
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?
            };
            let input: RecordInput = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a task record or array of records", path.display()))?;
            Ok(match input {
                RecordInput::Many(records) => records,
                RecordInput::One(record) => vec![*record],
            })
        },
    }
}
