//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::core::models::{
    AuditEntry, AuditLevel, AuditStatus, Classification, ModelOutcome, Priority, SafetyRule, SafetyVerdict,
    SuggestionSource, TaskSuggestion,
};
use crate::core::services::AuditSummary;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Outcome for one submitted record
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClassifyOutcome {
    /// A suggestion was produced
    Classified {
        /// Suggestion and audit status
        #[serde(flatten)]
        classification: Classification,
    },
    /// The record was refused
    Rejected {
        /// Task id as submitted
        task_id: String,
        /// Why
        error: String,
    },
}

/// Result of a classify operation
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyResult {
    /// One outcome per submitted record, in input order
    pub results: Vec<ClassifyOutcome>,
}

/// Result of an audit list operation
#[derive(Debug, Serialize)]
pub struct AuditListResult {
    /// Matching entries in log order
    pub entries: Vec<AuditEntry>,
}

/// Result of an audit show operation
#[derive(Debug, Serialize)]
pub struct AuditShowResult {
    /// The entry
    pub entry: AuditEntry,
}

/// Result of an audit summary operation
#[derive(Debug, Serialize)]
pub struct AuditSummaryResult {
    /// Log that was summarized
    pub log: String,
    /// Totals
    #[serde(flatten)]
    pub summary: AuditSummary,
}

/// Result of a rules list operation
#[derive(Debug, Serialize)]
pub struct RuleListResult {
    /// Table version
    pub version: String,
    /// Where the table came from
    pub source: String,
    /// Rules in evaluation order
    pub rules: Vec<SafetyRule>,
}

/// Result of a rules check operation
#[derive(Debug, Serialize)]
pub struct RuleCheckResult {
    /// File checked
    pub path: String,
    /// Whether the table is valid
    pub valid: bool,
    /// Table version, when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Number of rules, when valid
    pub rule_count: usize,
    /// Validation failure, when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

fn render_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn paint_priority(priority: Priority) -> ColoredString {
    let label = priority.to_string().to_uppercase();
    match priority {
        Priority::Critical => label.red().bold(),
        Priority::High => label.yellow().bold(),
        Priority::Normal => label.normal(),
        Priority::Low => label.dimmed(),
    }
}

fn paint_level(level: AuditLevel) -> ColoredString {
    let label = level.to_string();
    match level {
        AuditLevel::Critical => label.red().bold(),
        AuditLevel::Warning => label.yellow(),
        AuditLevel::Info => label.normal(),
    }
}

fn describe_source(suggestion: &TaskSuggestion) -> String {
    match (suggestion.source(), suggestion.rule_id(), suggestion.confidence()) {
        (SuggestionSource::SafetyOverride, Some(rule), _) => format!("safety override ({rule})"),
        (SuggestionSource::ModelSuggestion, _, Some(c)) => {
            format!("model suggestion (confidence {:.2})", c.overall())
        },
        (source, _, _) => source.to_string().replace('_', " "),
    }
}

impl ClassifyResult {
    /// Outcomes that produced a suggestion without a durable audit entry
    #[must_use]
    pub fn not_durable(&self) -> usize {
        self.results
            .iter()
            .filter(|r| {
                matches!(r, ClassifyOutcome::Classified { classification } if !classification.audit.is_durable())
            })
            .count()
    }

    /// Records that were refused
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.results.iter().filter(|r| matches!(r, ClassifyOutcome::Rejected { .. })).count()
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => render_json(self),
        }
    }

    fn render_human(&self) {
        for outcome in &self.results {
            match outcome {
                ClassifyOutcome::Classified { classification } => {
                    let s = &classification.suggestion;
                    println!("[{}] {}  {}", s.task_id(), paint_priority(s.priority()), s.category());
                    println!("  due:     {}", s.due_date().format("%Y-%m-%d %H:%M %:z"));
                    println!("  source:  {}", describe_source(s));
                    match &classification.audit {
                        AuditStatus::Durable { sequence } => println!("  audit:   {sequence}"),
                        AuditStatus::NotDurable { reason } => {
                            println!("  audit:   {} {reason}", "NOT RECORDED".red().bold());
                        },
                    }
                    println!();
                },
                ClassifyOutcome::Rejected { task_id, error } => {
                    let id = if task_id.is_empty() { "?" } else { task_id.as_str() };
                    println!("[{id}] {} {error}\n", "REJECTED".red().bold());
                },
            }
        }

        let missing = self.not_durable();
        if missing > 0 {
            println!(
                "{} {missing} suggestion(s) were not recorded in the audit log. \
                 Do not approve them until the log is available.",
                "WARNING:".red().bold()
            );
        }
    }
}

impl AuditListResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => render_json(self),
        }
    }

    fn render_human(&self) {
        if self.entries.is_empty() {
            println!("No audit entries.");
            return;
        }
        for e in &self.entries {
            let s = &e.record.suggestion;
            let sequence = e.sequence.to_string();
            println!(
                "{sequence:>6}  {}  {:<12} {:<8}  {:<20} {}",
                e.record.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                e.record.task_id,
                paint_priority(s.priority()),
                s.category(),
                describe_source(s)
            );
        }
    }
}

impl AuditShowResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => render_json(self),
        }
    }

    fn render_human(&self) {
        let r = &self.entry.record;
        let s = &r.suggestion;
        println!("Audit entry {}", self.entry.sequence);
        println!("  task:        {}", r.task_id);
        println!("  recorded:    {}", r.recorded_at.to_rfc3339());
        println!("  rules:       {}", r.rule_table_version);
        println!("  model:       {}", r.model_version);
        println!("  level:       {}", paint_level(r.level));
        println!("  equipment:   {}", r.features.equipment_id);
        println!("  reported:    {}", r.features.reported_at.to_rfc3339());
        if let Some(shift) = &r.features.shift {
            println!("  shift:       {shift}");
        }
        if !r.features.flags.is_empty() {
            let flags: Vec<&str> = r.features.flags.iter().map(String::as_str).collect();
            println!("  keywords:    {}", flags.join(", "));
        }

        println!("\nSafety verdict:");
        match &r.verdict {
            SafetyVerdict::NoOverride => println!("  no rule fired"),
            SafetyVerdict::Override(o) => {
                println!("  {} by {}: {}", "OVERRIDE".red().bold(), o.triggering_rule_id, o.reason);
                println!("  matched:     {}", o.matched_rule_ids.join(", "));
                println!("  forced:      {} / {} / {}", o.category, o.priority, o.due_date_policy);
            },
        }

        println!("\nModel:");
        match &r.model {
            ModelOutcome::Suggested { suggestion: m } => {
                println!(
                    "  {} / {} / +{}d (confidence {:.2})",
                    m.category,
                    m.priority,
                    m.due_date_offset_days,
                    m.confidence.overall()
                );
                if let Some(scored) = m.raised_from {
                    println!("  raised from {scored} by the {} category floor", m.category);
                }
            },
            ModelOutcome::Unavailable { reason } => println!("  unavailable: {reason}"),
        }

        println!("\nSuggestion:");
        println!("  {}  {}", paint_priority(s.priority()), s.category());
        println!("  due:         {}", s.due_date().to_rfc3339());
        println!("  source:      {}", describe_source(s));
    }
}

impl AuditSummaryResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => render_json(self),
        }
    }

    fn render_human(&self) {
        let s = &self.summary;
        println!("Audit log: {}", self.log);
        println!("Entries:   {}\n", s.total);
        if s.total == 0 {
            return;
        }

        println!("By source:");
        for (source, n) in &s.by_source {
            println!("  {:<18} {n}", source.replace('_', " "));
        }
        println!("\nBy priority:");
        for p in Priority::ALL.iter().rev() {
            let label = p.to_string();
            let n = s.by_priority.get(&label).copied().unwrap_or(0);
            println!("  {label:<18} {n}");
        }
        println!("\nBy level:");
        for level in AuditLevel::ALL.iter().rev() {
            let n = s.by_level.get(level).copied().unwrap_or(0);
            println!("  {:<18} {n}", level.to_string());
        }
        println!("\nModel unavailable: {}", s.model_unavailable);

        if !s.overrides.is_empty() {
            let overruled = s.overrides.iter().filter(|o| o.overruled_model()).count();
            println!("\nSafety overrides: {} ({overruled} raised above the model)", s.overrides.len());
            for (rule, n) in &s.by_rule {
                println!("  {rule:<18} {n}");
            }
            println!();
            for o in &s.overrides {
                let model = o.model_priority.map_or_else(|| "n/a".to_string(), |p| p.to_string());
                let sequence = o.sequence.to_string();
                println!(
                    "  {sequence:>6}  {:<12} {:<12} {} (model: {model})",
                    o.task_id,
                    o.rule_id,
                    paint_priority(o.priority)
                );
            }
        }
    }
}

impl RuleListResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => render_json(self),
        }
    }

    fn render_human(&self) {
        println!("Rule table {} ({})\n", self.version, self.source);
        if self.rules.is_empty() {
            println!("No rules. Every task goes to the model or the defaults.");
            return;
        }
        for rule in &self.rules {
            println!("  [{}] {}", rule.id, rule.name);
            if !rule.reason.is_empty() {
                println!("    why:   {}", rule.reason);
            }
            if !rule.when.keywords_any.is_empty() {
                println!("    any:   {}", rule.when.keywords_any.join(", "));
            }
            if !rule.when.keywords_all.is_empty() {
                println!("    all:   {}", rule.when.keywords_all.join(", "));
            }
            if !rule.when.tags_any.is_empty() {
                println!("    tags:  {}", rule.when.tags_any.join(", "));
            }
            println!(
                "    then:  {} / {} / {}\n",
                rule.then.category,
                paint_priority(rule.then.priority),
                rule.then.due
            );
        }
    }
}

impl RuleCheckResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                if self.valid {
                    println!(
                        "{}: valid (version {}, {} rules)",
                        self.path,
                        self.version.as_deref().unwrap_or("?"),
                        self.rule_count
                    );
                } else {
                    println!(
                        "{}: {} {}",
                        self.path,
                        "INVALID".red().bold(),
                        self.error.as_deref().unwrap_or("")
                    );
                }
            },
            OutputMode::Json => render_json(self),
        }
    }
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => render_json(self),
        }
    }
}
