//! Feature extraction - turns a task record into a feature vector
//!
//! Pure and deterministic: the same record and vocabulary always give the
//! same vector.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::error::MalformedRecordError;
use crate::core::models::{FeatureVector, RecordContext, ShiftSchedule, TaskRecord, Vocabulary};
use crate::core::text::{normalize_tag, tokenize};

/// Extracts [`FeatureVector`]s over a fixed vocabulary
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    vocabulary: Arc<Vocabulary>,
    shifts: ShiftSchedule,
}

impl FeatureExtractor {
    /// Create an extractor over a vocabulary and shift schedule
    #[must_use]
    pub fn new(vocabulary: Vocabulary, shifts: ShiftSchedule) -> Self {
        Self {
            vocabulary: Arc::new(vocabulary),
            shifts,
        }
    }

    /// The vocabulary vectors are indexed by
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Extract features from a record
    ///
    /// # Errors
    ///
    /// Fails only when the task id, equipment identifier or shift timestamp
    /// is absent or blank. An empty description is fine.
    pub fn extract(&self, record: &TaskRecord) -> Result<FeatureVector, MalformedRecordError> {
        let task_id = record.id.trim();
        if task_id.is_empty() {
            return Err(MalformedRecordError::MissingId);
        }
        let equipment_id = record
            .equipment_id
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| MalformedRecordError::MissingEquipment {
                task_id: task_id.to_string(),
            })?;
        let reported_at =
            record.shift_timestamp.ok_or_else(|| MalformedRecordError::MissingShiftTimestamp {
                task_id: task_id.to_string(),
            })?;

        let tokens = tokenize(&record.description);
        let (counts, flags) = self.count_terms(&tokens);

        let context = RecordContext {
            equipment_id: equipment_id.to_string(),
            reporter_role: normalize_tag(&record.reporter_role),
            shift: self.shifts.shift_name(&reported_at).map(str::to_string),
            reported_at,
            tags: record.tags.iter().map(|t| normalize_tag(t)).filter(|t| !t.is_empty()).collect(),
        };

        Ok(FeatureVector::from_parts(
            Arc::clone(&self.vocabulary),
            counts,
            flags,
            tokens.len(),
            context,
        ))
    }

    /// Count every vocabulary term as a contiguous token run
    ///
    /// Tokens covered by no term land in the trailing out-of-vocabulary slot.
    fn count_terms(&self, tokens: &[String]) -> (Vec<u32>, BTreeSet<String>) {
        let mut counts = vec![0u32; self.vocabulary.dimension()];
        let mut covered = vec![false; tokens.len()];
        let mut flags = BTreeSet::new();

        for (idx, term_tokens) in self.vocabulary.term_tokens().iter().enumerate() {
            let width = term_tokens.len();
            if width == 0 || width > tokens.len() {
                continue;
            }
            for start in 0..=tokens.len() - width {
                if tokens[start..start + width] == term_tokens[..] {
                    counts[idx] += 1;
                    covered[start..start + width].iter_mut().for_each(|c| *c = true);
                }
            }
            if counts[idx] > 0 {
                flags.insert(self.vocabulary.terms()[idx].clone());
            }
        }

        let oov = covered.iter().filter(|c| !**c).count();
        if let Some(bucket) = counts.last_mut() {
            *bucket = u32::try_from(oov).unwrap_or(u32::MAX);
        }
        (counts, flags)
    }
}
