//! Shift schedule
//!
//! Maps a plant-local timestamp to the shift it falls in. Windows may cross
//! midnight, either written as `22..30` or as `22..6`.

use chrono::{DateTime, Days, Duration, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

/// One shift window in plant-local hours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    /// Shift name ("morning", "night", ...)
    pub name: String,
    /// First hour of the shift (0-23)
    pub start_hour: u32,
    /// Hour the shift ends; values up to 48 or below `start_hour` cross midnight
    pub end_hour: u32,
}

impl ShiftWindow {
    /// Create a shift window
    #[must_use]
    pub fn new(name: &str, start_hour: u32, end_hour: u32) -> Self {
        Self {
            name: name.to_string(),
            start_hour,
            end_hour,
        }
    }

    fn normalized_end(&self) -> u32 {
        if self.end_hour <= self.start_hour { self.end_hour + 24 } else { self.end_hour }
    }

    /// If `hour` falls in this window, how many days back the shift started
    fn days_since_start(&self, hour: u32) -> Option<u64> {
        let end = self.normalized_end();
        if (self.start_hour..end).contains(&hour) {
            Some(0)
        } else if (self.start_hour..end).contains(&(hour + 24)) {
            Some(1)
        } else {
            None
        }
    }
}

/// The plant's shift schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSchedule {
    shifts: Vec<ShiftWindow>,
}

impl Default for ShiftSchedule {
    fn default() -> Self {
        Self::new(vec![
            ShiftWindow::new("morning", 6, 14),
            ShiftWindow::new("afternoon", 14, 22),
            ShiftWindow::new("night", 22, 30),
        ])
    }
}

impl ShiftSchedule {
    /// Build a schedule from explicit windows (an empty list uses the default)
    #[must_use]
    pub fn new(shifts: Vec<ShiftWindow>) -> Self {
        if shifts.is_empty() { Self::default() } else { Self { shifts } }
    }

    /// The configured windows
    #[must_use]
    pub fn windows(&self) -> &[ShiftWindow] {
        &self.shifts
    }

    /// Name of the shift containing `at`, if any
    #[must_use]
    pub fn shift_name(&self, at: &DateTime<FixedOffset>) -> Option<&str> {
        let hour = at.hour();
        self.shifts
            .iter()
            .find(|s| s.days_since_start(hour).is_some())
            .map(|s| s.name.as_str())
    }

    /// End of the shift containing `at`
    ///
    /// Timestamps outside every window are their own shift end, which keeps
    /// `end_of_shift` at least as strict as an immediate due date.
    #[must_use]
    pub fn end_of_shift(&self, at: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let hour = at.hour();
        let Some((window, back)) =
            self.shifts.iter().find_map(|s| s.days_since_start(hour).map(|d| (s, d)))
        else {
            return *at;
        };

        at.date_naive()
            .checked_sub_days(Days::new(back))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight + Duration::hours(i64::from(window.normalized_end())))
            .and_then(|end| end.and_local_timezone(*at.offset()).single())
            .unwrap_or(*at)
    }
}
