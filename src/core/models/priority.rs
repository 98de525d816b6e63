//! Priority levels and due-date policies
//!
//! Both types carry a restrictiveness ordering used when several safety
//! rules fire on the same task.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Task priority, ordered from least to most urgent
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait for a convenient slot
    Low,
    /// Regular work
    #[default]
    Normal,
    /// Should be handled this shift
    High,
    /// Drop everything
    Critical,
}

impl Priority {
    /// All priorities, least urgent first
    pub const ALL: [Self; 4] = [Self::Low, Self::Normal, Self::High, Self::Critical];
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Normal => write!(f, "normal"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "p3" => Ok(Self::Low),
            "normal" | "medium" | "p2" => Ok(Self::Normal),
            "high" | "p1" => Ok(Self::High),
            "critical" | "p0" => Ok(Self::Critical),
            _ => Err(format!("Invalid priority: {s}. Use: low, normal, high, critical")),
        }
    }
}

/// How a due date is derived from the task's shift timestamp
///
/// Written in rule tables as `immediate`, `end_of_shift` or `<n>d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DueDatePolicy {
    /// Due at the moment the task was reported
    Immediate,
    /// Due when the reporting shift ends
    EndOfShift,
    /// Due a whole number of days after the report (never zero)
    OffsetDays(u32),
}

impl DueDatePolicy {
    /// Rank where a lower value is more restrictive
    const fn rank(self) -> (u8, u32) {
        match self {
            Self::Immediate => (0, 0),
            Self::EndOfShift => (1, 0),
            Self::OffsetDays(days) => (2, days),
        }
    }

    /// Whether `self` is at least as tight as `other`
    #[must_use]
    pub fn is_at_least_as_restrictive_as(self, other: Self) -> bool {
        self.restrictiveness_cmp(other) != Ordering::Less
    }

    /// Compare by restrictiveness: `Greater` means `self` is stricter
    #[must_use]
    pub fn restrictiveness_cmp(self, other: Self) -> Ordering {
        other.rank().cmp(&self.rank())
    }

    /// Pick the stricter of two policies
    #[must_use]
    pub fn stricter(self, other: Self) -> Self {
        if self.is_at_least_as_restrictive_as(other) { self } else { other }
    }
}

impl std::fmt::Display for DueDatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Immediate => write!(f, "immediate"),
            Self::EndOfShift => write!(f, "end_of_shift"),
            Self::OffsetDays(days) => write!(f, "{days}d"),
        }
    }
}

impl std::str::FromStr for DueDatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "immediate" | "now" => Ok(Self::Immediate),
            "end_of_shift" | "eos" => Ok(Self::EndOfShift),
            other => {
                let days = other
                    .strip_suffix('d')
                    .and_then(|n| n.parse::<u32>().ok())
                    .ok_or_else(|| {
                        format!("Invalid due policy: {s}. Use: immediate, end_of_shift, <n>d")
                    })?;
                if days == 0 {
                    return Err("Invalid due policy: 0d. Use 'immediate' instead".to_string());
                }
                Ok(Self::OffsetDays(days))
            },
        }
    }
}

impl TryFrom<String> for DueDatePolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DueDatePolicy> for String {
    fn from(policy: DueDatePolicy) -> Self {
        policy.to_string()
    }
}
