//! Delivery deadline.

use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Hour of the default same-day deadline.
const DEFAULT_HOUR: u32 = 17;

/// Date and time a brief is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Deadline {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Default deadline: today at 17:00 local time.
    pub fn default_for_today() -> Self {
        Self {
            date: Local::now().date_naive(),
            time: default_time(),
        }
    }

    /// `dd/mm/YYYY HH:MM`
    pub fn display(&self) -> String {
        format!(
            "{} {}",
            self.date.format("%d/%m/%Y"),
            self.time.format("%H:%M")
        )
    }

    /// `dd/mm`, used in the brief header.
    pub fn short_date(&self) -> String {
        self.date.format("%d/%m").to_string()
    }

    /// `YYYY-MM-DD`, the value of a date input.
    pub fn date_input(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `HH:MM`, the value of a time input.
    pub fn time_input(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::default_for_today()
    }
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0).unwrap_or_default()
}
