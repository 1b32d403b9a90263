//! Predicted periods and the calendar dates they cover

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Days marked when the backend has not computed an end date yet
pub const DEFAULT_WINDOW_DAYS: usize = 6;

/// A predicted period as returned by the backend
///
/// Dates are kept as the raw `YYYY-MM-DD` strings from the wire. They are
/// parsed component by component when the window is built, so a bad record
/// can be skipped instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePrediction {
    pub period_number: u32,
    #[serde(alias = "estimnated_start")]
    pub estimated_start: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub estimated_end: Option<String>,
}

/// Empty strings mean "not computed yet"
fn deserialize_optional_date<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

impl CyclePrediction {
    pub fn new(period_number: u32, estimated_start: impl Into<String>) -> Self {
        Self {
            period_number,
            estimated_start: estimated_start.into(),
            estimated_end: None,
        }
    }

    pub fn with_end(mut self, estimated_end: impl Into<String>) -> Self {
        self.estimated_end = Some(estimated_end.into());
        self
    }

    /// Parsed start date, if the record is usable
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.estimated_start)
    }

    /// Parsed end date; `None` when absent or malformed
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.estimated_end.as_deref().and_then(parse_calendar_date)
    }

    /// Every calendar date this prediction covers
    ///
    /// Returns `None` when the start date cannot be read. An end date before
    /// the start collapses the range to the start day alone.
    pub fn covered_dates(&self) -> Option<Vec<NaiveDate>> {
        let start = self.start_date()?;

        let dates = match self.end_date() {
            Some(end) if end >= start => start.iter_days().take_while(|d| *d <= end).collect(),
            Some(_) => vec![start],
            None => start.iter_days().take(DEFAULT_WINDOW_DAYS).collect(),
        };

        Some(dates)
    }
}

/// Parse `YYYY-MM-DD` into a local calendar date
///
/// Reads the three components directly. There is no time-of-day and no
/// timezone involved, so the day can never shift.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.trim().split('-');
    let year = parts.next()?.trim().parse::<i32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let day = parts.next()?.trim().parse::<u32>().ok()?;

    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Canonical day key, e.g. `2025-02-04`
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Set of calendar days to highlight as predicted period days
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictedDateSet {
    dates: BTreeSet<NaiveDate>,
}

impl PredictedDateSet {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Membership by `YYYY-MM-DD` key
    pub fn contains_key(&self, key: &str) -> bool {
        parse_calendar_date(key).is_some_and(|d| self.contains(d))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Dates in ascending order
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

impl FromIterator<NaiveDate> for PredictedDateSet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

/// A prediction that could not be placed on the calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPrediction {
    pub period_number: u32,
    pub reason: String,
}

/// Result of expanding predictions into calendar dates
#[derive(Debug, Clone, Default)]
pub struct PredictionWindow {
    pub dates: PredictedDateSet,
    pub skipped: Vec<SkippedPrediction>,
}

/// Expand predictions into the set of dates to mark
pub fn build_prediction_window(predictions: &[CyclePrediction]) -> PredictionWindow {
    let mut dates = BTreeSet::new();
    let mut skipped = Vec::new();

    for prediction in predictions {
        match prediction.covered_dates() {
            Some(covered) => dates.extend(covered),
            None => skipped.push(SkippedPrediction {
                period_number: prediction.period_number,
                reason: "estimated start is not a valid YYYY-MM-DD date".to_string(),
            }),
        }
    }

    PredictionWindow {
        dates: PredictedDateSet { dates },
        skipped,
    }
}
