//! Due-date resolution
//!
//! Due dates hang off the task's shift timestamp, never the wall clock, so
//! classifying the same record twice gives the same date.

use chrono::{DateTime, Duration, FixedOffset};

use crate::core::models::{DueDatePolicy, ShiftSchedule};

/// Turn a due-date policy into an absolute date
#[must_use]
pub fn resolve_due_date(
    policy: DueDatePolicy,
    reported_at: DateTime<FixedOffset>,
    shifts: &ShiftSchedule,
) -> DateTime<FixedOffset> {
    match policy {
        DueDatePolicy::Immediate => reported_at,
        DueDatePolicy::EndOfShift => shifts.end_of_shift(&reported_at),
        DueDatePolicy::OffsetDays(days) => offset_due_date(reported_at, days),
    }
}

/// `reported_at` plus a number of whole days
///
/// Saturates to `reported_at` on overflow; an earlier date is never less safe.
#[must_use]
pub fn offset_due_date(reported_at: DateTime<FixedOffset>, days: u32) -> DateTime<FixedOffset> {
    reported_at.checked_add_signed(Duration::days(i64::from(days))).unwrap_or(reported_at)
}
