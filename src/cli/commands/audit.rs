//! Audit log review commands

use floortriage::config::Config;
use floortriage::core::models::{AuditEntry, SequenceNumber};
use floortriage::core::services::{AuditFilter, summarize};
use floortriage::output::{AuditListResult, AuditShowResult, AuditSummaryResult, OutputMode};

use crate::cli::app::AuditAction;

/// Handle audit subcommands
pub fn audit(action: AuditAction, config: &Config, mode: OutputMode) -> anyhow::Result<()> {
    let entries = read_log(config)?;

    match action {
        AuditAction::List { task, overrides } => {
            let filter = AuditFilter {
                task_id: task,
                overrides_only: overrides,
            };
            AuditListResult {
                entries: filter.apply(entries),
            }
            .render(mode);
        },
        AuditAction::Show { sequence } => {
            let sequence = SequenceNumber(sequence);
            let entry = entries
                .into_iter()
                .find(|e| e.sequence == sequence)
                .ok_or_else(|| anyhow::anyhow!("no audit entry {sequence}"))?;
            AuditShowResult { entry }.render(mode);
        },
        AuditAction::Summary => {
            AuditSummaryResult {
                log: config.audit_log_path().display().to_string(),
                summary: summarize(&entries),
            }
            .render(mode);
        },
    }
    Ok(())
}

/// Entries in the configured log; a log that was never written is empty
fn read_log(config: &Config) -> anyhow::Result<Vec<AuditEntry>> {
    if !config.audit_log_path().exists() {
        return Ok(Vec::new());
    }
    config.open_audit_store().entries()
}
