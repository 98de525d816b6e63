//! Feature vector and vocabulary
//!
//! A [`FeatureVector`] is the fixed-shape view of a [`TaskRecord`](super::TaskRecord)
//! that both the safety rules and the suggestion model read. It lives only for
//! the duration of one classification.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::core::text::{normalize_term, tokenize};

/// Version tag of the extraction scheme, recorded with every audit entry
pub const EXTRACTOR_VERSION: &str = "fx-1";

/// Built-in factory lexicon
///
/// Seeded from the plant's safety, urgency, equipment and housekeeping
/// keyword lists. Rule tables and models add their own terms on top.
const BUILTIN_TERMS: &[&str] = &[
    // hazards
    "gas leak", "gas", "leak", "leaking", "fire", "smoke", "spark", "electrical", "shock",
    "explosion", "spill", "minor spill", "chemical", "toxic", "poison", "hazard", "dangerous",
    "unsafe", "risk", "injury",
    // food safety
    "contamination", "contaminated", "mold", "bacterial", "bacteria", "allergen", "allergy",
    "glass", "foreign object", "pest", "expired", "spoiled", "rotten", "recall",
    // temperature control
    "temperature", "cold chain", "freezer", "refrigerator", "overheat",
    // urgency
    "urgent", "immediately", "asap", "critical", "emergency", "shutdown", "broken", "failed",
    "failure",
    // low urgency
    "organize", "schedule", "plan", "optional", "when available", "nice to have",
    // equipment
    "tank", "conveyor", "mixer", "machine", "line", "motor", "pump", "valve", "boiler",
    // housekeeping
    "clean", "sanitize", "disinfect", "wash", "scrub", "inspection", "audit", "compliance",
];

/// Ordered set of terms the extractor counts
///
/// Terms are normalized on insertion; duplicates keep their first position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    term_tokens: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from raw terms
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Self {
            terms: Vec::new(),
            term_tokens: Vec::new(),
            index: HashMap::new(),
        };
        vocabulary.extend(terms);
        vocabulary
    }

    /// The built-in factory lexicon
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN_TERMS.iter().copied())
    }

    /// Add terms, skipping blanks and duplicates
    pub fn extend<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in terms {
            let tokens = tokenize(raw.as_ref());
            if tokens.is_empty() {
                continue;
            }
            let term = tokens.join(" ");
            if self.index.contains_key(&term) {
                continue;
            }
            self.index.insert(term.clone(), self.terms.len());
            self.terms.push(term);
            self.term_tokens.push(tokens);
        }
    }

    /// Number of terms (excluding the out-of-vocabulary bucket)
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the vocabulary has no terms
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Length of a count vector over this vocabulary (terms plus OOV bucket)
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.terms.len() + 1
    }

    /// Position of a term, after normalization
    #[must_use]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(&normalize_term(term)).copied()
    }

    /// Normalized terms in vector order
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub(crate) fn term_tokens(&self) -> &[Vec<String>] {
        &self.term_tokens
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Fixed-shape representation of one task record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    vocabulary: Arc<Vocabulary>,
    counts: Vec<u32>,
    flags: BTreeSet<String>,
    tags: BTreeSet<String>,
    token_count: usize,
    equipment_id: String,
    reporter_role: String,
    shift: Option<String>,
    reported_at: DateTime<FixedOffset>,
}

/// Record-level context carried alongside the term counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordContext {
    /// Equipment identifier, trimmed
    pub equipment_id: String,
    /// Reporter role, normalized
    pub reporter_role: String,
    /// Shift the report falls in
    pub shift: Option<String>,
    /// When the task was reported
    pub reported_at: DateTime<FixedOffset>,
    /// Normalized structured tags
    pub tags: BTreeSet<String>,
}

impl FeatureVector {
    /// Assemble a feature vector from already-computed parts
    ///
    /// No shape check happens here; the safety engine rejects vectors whose
    /// `counts` do not match `vocabulary.dimension()`.
    #[must_use]
    pub fn from_parts(
        vocabulary: Arc<Vocabulary>,
        counts: Vec<u32>,
        flags: BTreeSet<String>,
        token_count: usize,
        context: RecordContext,
    ) -> Self {
        Self {
            vocabulary,
            counts,
            flags,
            tags: context.tags,
            token_count,
            equipment_id: context.equipment_id,
            reporter_role: context.reporter_role,
            shift: context.shift,
            reported_at: context.reported_at,
        }
    }

    /// Whether `counts` matches the vocabulary it was built against
    #[must_use]
    pub fn is_well_shaped(&self) -> bool {
        self.counts.len() == self.vocabulary.dimension()
    }

    /// Vocabulary this vector is indexed by
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Raw counts: one slot per vocabulary term, then the OOV bucket
    #[must_use]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Occurrences of a vocabulary term (0 for unknown terms)
    #[must_use]
    pub fn count(&self, term: &str) -> u32 {
        self.vocabulary
            .index_of(term)
            .and_then(|i| self.counts.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Tokens that matched no vocabulary term
    #[must_use]
    pub fn oov_count(&self) -> u32 {
        self.counts.last().copied().unwrap_or(0)
    }

    /// Named keyword flags present in the description
    #[must_use]
    pub const fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }

    /// Whether a keyword flag is set
    #[must_use]
    pub fn has_flag(&self, term: &str) -> bool {
        self.flags.contains(&normalize_term(term))
    }

    /// Normalized structured tags
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Number of description tokens
    #[must_use]
    pub const fn token_count(&self) -> usize {
        self.token_count
    }

    /// Reporter role
    #[must_use]
    pub fn reporter_role(&self) -> &str {
        &self.reporter_role
    }

    /// Shift name, if the timestamp fell in a scheduled shift
    #[must_use]
    pub fn shift(&self) -> Option<&str> {
        self.shift.as_deref()
    }

    /// When the task was reported
    #[must_use]
    pub const fn reported_at(&self) -> DateTime<FixedOffset> {
        self.reported_at
    }

    /// Compact, serializable view for the audit log
    #[must_use]
    pub fn summary(&self) -> FeatureSummary {
        FeatureSummary {
            extractor_version: EXTRACTOR_VERSION.to_string(),
            dimension: self.counts.len(),
            token_count: self.token_count,
            oov_count: self.oov_count(),
            flags: self.flags.clone(),
            tags: self.tags.clone(),
            equipment_id: self.equipment_id.clone(),
            reporter_role: self.reporter_role.clone(),
            shift: self.shift.clone(),
            reported_at: self.reported_at,
        }
    }
}

/// What the audit log keeps of a feature vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSummary {
    /// Extraction scheme version
    pub extractor_version: String,
    /// Length of the count vector
    pub dimension: usize,
    /// Description tokens
    pub token_count: usize,
    /// Tokens outside the vocabulary
    pub oov_count: u32,
    /// Matched keyword flags
    pub flags: BTreeSet<String>,
    /// Structured tags
    pub tags: BTreeSet<String>,
    /// Equipment identifier
    pub equipment_id: String,
    /// Reporter role
    pub reporter_role: String,
    /// Shift name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,
    /// When the task was reported
    pub reported_at: DateTime<FixedOffset>,
}
