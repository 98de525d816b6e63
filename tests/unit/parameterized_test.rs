//! Parameterized tests using test-case
//!
//! These tests use test-case to run the same test logic with different inputs.

use std::sync::Arc;

use floortriage::adapters::audit::InMemoryAuditStore;
use floortriage::core::models::{DueDatePolicy, Priority, ShiftSchedule, SuggestionSource};
use test_case::test_case;

use crate::common::fixtures::{RecordBuilder, at, engine};
use crate::common::mocks::FixedModel;

// =============================================================================
// Priority and due policy parsing
// =============================================================================

#[test_case("low", Priority::Low ; "low")]
#[test_case("Normal", Priority::Normal ; "normal mixed case")]
#[test_case("medium", Priority::Normal ; "medium alias")]
#[test_case(" HIGH ", Priority::High ; "high padded")]
#[test_case("p0", Priority::Critical ; "p0 alias")]
fn test_priority_parsing(input: &str, expected: Priority) {
    assert_eq!(input.parse::<Priority>().unwrap(), expected);
}

#[test_case("immediate", DueDatePolicy::Immediate ; "immediate")]
#[test_case("end_of_shift", DueDatePolicy::EndOfShift ; "end of shift")]
#[test_case("end-of-shift", DueDatePolicy::EndOfShift ; "end of shift dashed")]
#[test_case("1d", DueDatePolicy::OffsetDays(1) ; "one day")]
#[test_case("14d", DueDatePolicy::OffsetDays(14) ; "two weeks")]
fn test_due_policy_parsing(input: &str, expected: DueDatePolicy) {
    assert_eq!(input.parse::<DueDatePolicy>().unwrap(), expected);
}

#[test_case("0d" ; "zero days")]
#[test_case("tomorrow" ; "prose")]
#[test_case("-1d" ; "negative")]
#[test_case("" ; "empty")]
fn test_due_policy_rejects(input: &str) {
    assert!(input.parse::<DueDatePolicy>().is_err());
}

#[test_case(DueDatePolicy::Immediate, DueDatePolicy::EndOfShift ; "immediate beats end of shift")]
#[test_case(DueDatePolicy::EndOfShift, DueDatePolicy::OffsetDays(1) ; "end of shift beats a day")]
#[test_case(DueDatePolicy::OffsetDays(1), DueDatePolicy::OffsetDays(7) ; "fewer days win")]
fn test_due_policy_restrictiveness(stricter: DueDatePolicy, looser: DueDatePolicy) {
    assert_eq!(stricter.stricter(looser), stricter);
    assert_eq!(looser.stricter(stricter), stricter);
}

// =============================================================================
// Shifts
// =============================================================================

#[test_case("2025-12-29T06:00:00+01:00", Some("morning") ; "morning start")]
#[test_case("2025-12-29T13:59:00+01:00", Some("morning") ; "morning end")]
#[test_case("2025-12-29T14:00:00+01:00", Some("afternoon") ; "afternoon start")]
#[test_case("2025-12-29T23:30:00+01:00", Some("night") ; "night before midnight")]
#[test_case("2025-12-30T03:00:00+01:00", Some("night") ; "night after midnight")]
fn test_shift_names(ts: &str, expected: Option<&str>) {
    assert_eq!(ShiftSchedule::default().shift_name(&at(ts)), expected);
}

#[test_case("2025-12-29T10:00:00+01:00", "2025-12-29T14:00:00+01:00" ; "morning")]
#[test_case("2025-12-29T21:59:00+01:00", "2025-12-29T22:00:00+01:00" ; "late afternoon")]
#[test_case("2025-12-29T23:00:00+01:00", "2025-12-30T06:00:00+01:00" ; "night before midnight")]
#[test_case("2025-12-30T01:00:00+01:00", "2025-12-30T06:00:00+01:00" ; "night after midnight")]
fn test_end_of_shift(ts: &str, expected: &str) {
    assert_eq!(ShiftSchedule::default().end_of_shift(&at(ts)), at(expected));
}

// =============================================================================
// Hazard phrasing
// =============================================================================

#[test_case("Gas leak in boiler room" ; "sentence case")]
#[test_case("GAS LEAK!!!" ; "shouting")]
#[test_case("suspected gas-leak near valve 4" ; "hyphenated")]
#[test_case("smell of gas, leak reported?" ; "split by punctuation")]
fn test_gas_leak_phrasings_override(description: &str) {
    let engine = engine(Arc::new(FixedModel::confident_low()), Arc::new(InMemoryAuditStore::new()));
    let c = engine.classify(&RecordBuilder::new(description).build()).unwrap();
    assert_eq!(c.suggestion.source(), SuggestionSource::SafetyOverride);
    assert_eq!(c.suggestion.priority(), Priority::Critical);
}

#[test_case("gas meter reading due" ; "gas alone")]
#[test_case("leak test on tank 2" ; "leak alone")]
#[test_case("leak of gas" ; "reversed order")]
fn test_partial_phrases_do_not_override(description: &str) {
    let engine = engine(Arc::new(FixedModel::confident_low()), Arc::new(InMemoryAuditStore::new()));
    let c = engine.classify(&RecordBuilder::new(description).build()).unwrap();
    assert_eq!(c.suggestion.source(), SuggestionSource::ModelSuggestion);
}
