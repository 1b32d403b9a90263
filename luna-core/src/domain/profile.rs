//! Cycle profile entered during setup

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::result::{Error, Result};

pub const CYCLE_LENGTH_MIN: u32 = 21;
pub const CYCLE_LENGTH_MAX: u32 = 45;
pub const CYCLE_LENGTH_DEFAULT: u32 = 28;

/// Quick picks offered next to the cycle length field
pub const CYCLE_LENGTH_PRESETS: [u32; 4] = [21, 28, 30, 35];

/// How far back the "last period" field starts
const DEFAULT_LAST_PERIOD_OFFSET_DAYS: i64 = 14;

/// Profile fields as sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfileInput {
    #[serde(rename = "lastperiod")]
    pub last_period: NaiveDate,
    #[serde(rename = "avgcyclelength")]
    pub avg_cycle_length: u32,
}

impl ProfileInput {
    pub fn new(last_period: NaiveDate, avg_cycle_length: u32) -> Self {
        Self {
            last_period,
            avg_cycle_length,
        }
    }

    /// Pre-filled form values: two weeks ago, 28-day cycle
    pub fn suggested(today: NaiveDate) -> Self {
        Self {
            last_period: today - Duration::days(DEFAULT_LAST_PERIOD_OFFSET_DAYS),
            avg_cycle_length: CYCLE_LENGTH_DEFAULT,
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if !(CYCLE_LENGTH_MIN..=CYCLE_LENGTH_MAX).contains(&self.avg_cycle_length) {
            return Err(Error::validation(format!(
                "Cycle length is usually between {} and {} days.",
                CYCLE_LENGTH_MIN, CYCLE_LENGTH_MAX
            )));
        }
        if self.last_period > today {
            return Err(Error::validation(
                "The first day of your last period can't be in the future.",
            ));
        }
        Ok(())
    }
}
