//! Month grid for the cycle calendar

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::prediction::PredictedDateSet;

pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// A displayed month, held as its first day
///
/// Only months chrono can represent exist, so navigating past the ends of
/// the calendar yields `None` instead of a broken cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    /// `month0` runs 0 (January) to 11 (December)
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        if month0 > 11 {
            return None;
        }
        let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
        Some(Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month0(&self) -> u32 {
        self.first.month0()
    }

    pub fn name(&self) -> &'static str {
        MONTHS[self.month0() as usize]
    }

    pub fn previous(&self) -> Option<Self> {
        match self.month0() {
            0 => Self::new(self.year().checked_sub(1)?, 11),
            m => Self::new(self.year(), m - 1),
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self.month0() {
            11 => Self::new(self.year().checked_add(1)?, 0),
            m => Self::new(self.year(), m + 1),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Every date of the month in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month0 = self.month0();
        std::iter::successors(Some(self.first), |day| day.succ_opt())
            .take_while(move |day| day.month0() == month0)
    }

    pub fn days_in_month(&self) -> u32 {
        self.days().count() as u32
    }

    /// Padding cells before day 1 (Sunday = 0)
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year())
    }
}

/// Parses `YYYY-MM` with a one-based month
impl FromStr for MonthCursor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid month '{}', expected YYYY-MM", s);
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        MonthCursor::new(year, month - 1).ok_or_else(invalid)
    }
}

/// One cell of the Sunday-first month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell {
    Padding,
    Day {
        date: NaiveDate,
        is_predicted: bool,
        is_today: bool,
    },
}

impl CalendarCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CalendarCell::Padding => None,
            CalendarCell::Day { date, .. } => Some(*date),
        }
    }
}

/// Build the cells for one month
///
/// Leading padding aligns day 1 with its weekday column. The last row is
/// left short; no trailing padding is added.
pub fn build_month_grid(
    month: MonthCursor,
    predicted: &PredictedDateSet,
    today: NaiveDate,
) -> Vec<CalendarCell> {
    let blanks = month.leading_blanks() as usize;

    let mut cells = Vec::with_capacity(blanks + 31);
    cells.extend(std::iter::repeat(CalendarCell::Padding).take(blanks));
    cells.extend(month.days().map(|date| CalendarCell::Day {
        date,
        is_predicted: predicted.contains(date),
        is_today: date == today,
    }));
    cells
}
