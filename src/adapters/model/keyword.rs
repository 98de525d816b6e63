//! Keyword-frequency suggestion model
//!
//! Scores categories by keyword hits and priority by a weighted sum of
//! urgency, safety, equipment and housekeeping terms. Everything it knows
//! lives in a versioned TOML artifact, so retuning never needs a rebuild.

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use log::debug;
use serde::Deserialize;

use crate::core::error::ModelUnavailableError;
use crate::core::models::{FeatureVector, FieldConfidence, ModelSuggestion, Priority};
use crate::core::ports::SuggestionModel;
use crate::core::text::normalize_term;

/// The model artifact shipped inside the binary
pub const EMBEDDED_MODEL: &str = include_str!("../../../assets/model.toml");

/// Score ceiling; matches the 0-10 scale thresholds are written in
const MAX_SCORE: f64 = 10.0;

/// A model.toml artifact
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    /// Artifact version, recorded with every audit entry
    pub version: String,

    /// Category when no category keyword appears
    pub fallback_category: String,

    /// Categories in tie-break order
    #[serde(rename = "category")]
    pub categories: Vec<CategoryEntry>,

    /// Priority scoring table
    pub priority: PriorityScoring,

    /// Due offset per predicted priority
    pub due_offset_days: DueOffsets,
}

/// One category and the words that point at it
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    /// Category name
    pub name: String,

    /// Contribution to the priority score
    #[serde(default)]
    pub weight: f64,

    /// Words that point at this category
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Floor for the predicted priority
    #[serde(default = "lowest_priority")]
    pub min_priority: Priority,

    /// Due offsets are scaled by this percentage (100 leaves them as is)
    #[serde(default = "full_urgency")]
    pub urgency_percent: u32,
}

const fn lowest_priority() -> Priority {
    Priority::Low
}

const fn full_urgency() -> u32 {
    100
}

impl CategoryEntry {
    /// Scale a due offset by this category's urgency
    ///
    /// A non-zero offset never drops below one day.
    #[must_use]
    pub fn scale_offset(&self, days: u32) -> u32 {
        if days == 0 { 0 } else { (days.saturating_mul(self.urgency_percent) / 100).max(1) }
    }
}

/// Priority score inputs and thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct PriorityScoring {
    /// +2 per hit
    #[serde(default)]
    pub high_keywords: Vec<String>,
    /// -1.5 per hit
    #[serde(default)]
    pub low_keywords: Vec<String>,
    /// +1.5 per hit
    #[serde(default)]
    pub safety_keywords: Vec<String>,
    /// +2 when any appears
    #[serde(default)]
    pub urgent_keywords: Vec<String>,
    /// +0.5 per hit
    #[serde(default)]
    pub equipment_keywords: Vec<String>,
    /// +1 per hit
    #[serde(default)]
    pub cleaning_keywords: Vec<String>,
    /// Score at or above which the task is critical
    pub critical_threshold: f64,
    /// Score at or above which the task is high
    pub high_threshold: f64,
    /// Score at or above which the task is normal; below is low
    pub normal_threshold: f64,
}

/// Days until due, per priority
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DueOffsets {
    /// Critical tasks
    pub critical: u32,
    /// High-priority tasks
    pub high: u32,
    /// Normal tasks
    pub normal: u32,
    /// Low-priority tasks
    pub low: u32,
}

impl DueOffsets {
    /// Offset for a priority
    #[must_use]
    pub const fn for_priority(self, priority: Priority) -> u32 {
        match priority {
            Priority::Critical => self.critical,
            Priority::High => self.high,
            Priority::Normal => self.normal,
            Priority::Low => self.low,
        }
    }
}

/// Keyword-frequency model over a validated artifact
#[derive(Debug, Clone)]
pub struct KeywordModel {
    artifact: ModelArtifact,
}

impl KeywordModel {
    /// Validate an artifact and normalize its keywords
    ///
    /// # Errors
    ///
    /// Returns an error if the version or categories are missing, a category
    /// has a zero urgency, or the priority thresholds are not ordered
    /// critical ≥ high ≥ normal.
    pub fn from_artifact(mut artifact: ModelArtifact) -> anyhow::Result<Self> {
        artifact.version = artifact.version.trim().to_string();
        if artifact.version.is_empty() {
            bail!("model artifact has no version");
        }
        if artifact.categories.is_empty() {
            bail!("model artifact {} has no categories", artifact.version);
        }
        for category in &mut artifact.categories {
            category.name = category.name.trim().to_lowercase();
            if category.name.is_empty() {
                bail!("model artifact {} has a category without a name", artifact.version);
            }
            if category.urgency_percent == 0 {
                bail!(
                    "model artifact {}: category {} has urgency_percent 0",
                    artifact.version,
                    category.name
                );
            }
            normalize_all(&mut category.keywords);
        }
        artifact.fallback_category = artifact.fallback_category.trim().to_lowercase();
        if artifact.fallback_category.is_empty() {
            bail!("model artifact {} has no fallback category", artifact.version);
        }

        let p = &mut artifact.priority;
        for list in [
            &mut p.high_keywords,
            &mut p.low_keywords,
            &mut p.safety_keywords,
            &mut p.urgent_keywords,
            &mut p.equipment_keywords,
            &mut p.cleaning_keywords,
        ] {
            normalize_all(list);
        }
        let ordered = p.critical_threshold >= p.high_threshold && p.high_threshold >= p.normal_threshold;
        let finite = [p.critical_threshold, p.high_threshold, p.normal_threshold]
            .iter()
            .all(|t| t.is_finite());
        if !(ordered && finite) {
            bail!(
                "model artifact {}: thresholds must satisfy critical >= high >= normal",
                artifact.version
            );
        }

        Ok(Self { artifact })
    }

    /// Parse an artifact from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or fails validation.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let artifact: ModelArtifact = toml::from_str(content)?;
        Self::from_artifact(artifact)
    }

    /// Load an artifact from a model.toml file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid model artifact {}", path.display()))
    }

    /// The artifact shipped inside the binary
    ///
    /// # Errors
    ///
    /// Only fails if the embedded asset is broken, which the test suite guards.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::parse(EMBEDDED_MODEL).context("embedded model artifact")
    }

    /// The loaded artifact
    #[must_use]
    pub const fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Best category, its priority weight and the category confidence
    fn categorize(&self, features: &FeatureVector) -> (&CategoryEntry, f64) {
        let scores: Vec<f64> =
            self.artifact.categories.iter().map(|c| hits(features, &c.keywords)).collect();
        let total: f64 = scores.iter().sum();

        let mut best = 0;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }

        if scores[best] > 0.0 {
            return (&self.artifact.categories[best], scores[best] / (total + 1.0));
        }
        let fallback = self
            .artifact
            .categories
            .iter()
            .find(|c| c.name == self.artifact.fallback_category)
            .unwrap_or(&self.artifact.categories[0]);
        (fallback, 0.0)
    }

    /// Weighted priority score in `[0, 10]`
    fn priority_score(&self, features: &FeatureVector, category_weight: f64) -> f64 {
        let p = &self.artifact.priority;
        let urgent = if hits(features, &p.urgent_keywords) > 0.0 { 1.0 } else { 0.0 };

        let weighted = [
            (category_weight, 1.5),
            (hits(features, &p.high_keywords), 2.0),
            (hits(features, &p.low_keywords), -1.5),
            (hits(features, &p.safety_keywords), 1.5),
            (urgent, 2.0),
            (hits(features, &p.equipment_keywords), 0.5),
            (hits(features, &p.cleaning_keywords), 1.0),
        ];
        let score: f64 = weighted.iter().map(|(n, w)| n * w).sum();
        score.clamp(0.0, MAX_SCORE)
    }

    fn priority_for(&self, score: f64) -> Priority {
        let p = &self.artifact.priority;
        if score >= p.critical_threshold {
            Priority::Critical
        } else if score >= p.high_threshold {
            Priority::High
        } else if score >= p.normal_threshold {
            Priority::Normal
        } else {
            Priority::Low
        }
    }

    /// Confidence grows with the distance to the nearest threshold
    fn priority_confidence(&self, score: f64) -> f64 {
        let p = &self.artifact.priority;
        let distance = [p.critical_threshold, p.high_threshold, p.normal_threshold]
            .iter()
            .map(|t| (score - t).abs())
            .fold(f64::INFINITY, f64::min);
        0.5f64.mul_add((distance / 2.0).min(1.0), 0.5)
    }
}

impl SuggestionModel for KeywordModel {
    fn version(&self) -> String {
        self.artifact.version.clone()
    }

    fn predict(&self, features: &FeatureVector) -> Result<ModelSuggestion, ModelUnavailableError> {
        let (category, category_confidence) = self.categorize(features);
        let score = self.priority_score(features, category.weight);
        let scored = self.priority_for(score);
        let priority = scored.max(category.min_priority);
        let priority_confidence = self.priority_confidence(score);
        if priority == scored {
            debug!("keyword model: {} (score {score:.1}) -> {priority}", category.name);
        } else {
            debug!(
                "keyword model: {} (score {score:.1}) -> {scored}, raised to {priority} by category floor",
                category.name
            );
        }

        let base_offset = self.artifact.due_offset_days.for_priority(priority);
        Ok(ModelSuggestion {
            category: category.name.clone(),
            priority,
            due_date_offset_days: category.scale_offset(base_offset),
            confidence: FieldConfidence::new(
                category_confidence,
                priority_confidence,
                priority_confidence,
            ),
            model_version: self.artifact.version.clone(),
            raised_from: (priority != scored).then_some(scored),
        })
    }

    fn vocabulary(&self) -> Vec<String> {
        let p = &self.artifact.priority;
        self.artifact
            .categories
            .iter()
            .flat_map(|c| c.keywords.iter())
            .chain(&p.high_keywords)
            .chain(&p.low_keywords)
            .chain(&p.safety_keywords)
            .chain(&p.urgent_keywords)
            .chain(&p.equipment_keywords)
            .chain(&p.cleaning_keywords)
            .cloned()
            .collect()
    }
}

fn normalize_all(terms: &mut Vec<String>) {
    *terms = terms.iter().map(|t| normalize_term(t)).filter(|t| !t.is_empty()).collect();
}

fn hits(features: &FeatureVector, terms: &[String]) -> f64 {
    terms.iter().map(|t| f64::from(features.count(t))).sum()
}
