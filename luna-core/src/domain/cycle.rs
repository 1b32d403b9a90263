//! Cycle phase snapshot and the facts derived from it

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::prediction::CyclePrediction;

/// Follicular days from this one on count as the fertile window
pub const FERTILE_FOLLICULAR_DAY: u32 = 8;

/// Backend-classified stage of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[serde(alias = "Menstrual", alias = "MENSTRUAL")]
    Menstrual,
    #[serde(alias = "Follicular", alias = "FOLLICULAR")]
    Follicular,
    #[serde(alias = "Ovulation", alias = "OVULATION")]
    Ovulation,
    #[serde(alias = "Luteal", alias = "LUTEAL")]
    Luteal,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Menstrual => "Menstrual",
            Phase::Follicular => "Follicular",
            Phase::Ovulation => "Ovulation",
            Phase::Luteal => "Luteal",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current phase and cycle day, as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStatus {
    pub phase: Phase,
    pub day_in_cycle: u32,
}

/// Backend-computed symptom trend for the current part of the cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSummary {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub common_symptoms: Vec<String>,
}

impl TrendSummary {
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.common_symptoms.is_empty()
    }
}

/// How far away the next predicted period is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum NextPeriod {
    InDays(i64),
    Today,
    /// The predicted start has already passed
    Soon,
    Unknown,
}

impl NextPeriod {
    /// Classify a signed day distance
    pub fn from_days(days: i64) -> Self {
        match days {
            0 => NextPeriod::Today,
            d if d < 0 => NextPeriod::Soon,
            d => NextPeriod::InDays(d),
        }
    }
}

impl fmt::Display for NextPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextPeriod::InDays(1) => write!(f, "In 1 day"),
            NextPeriod::InDays(d) => write!(f, "In {} days", d),
            NextPeriod::Today => write!(f, "Today"),
            NextPeriod::Soon => write!(f, "Soon"),
            NextPeriod::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Derived facts shown on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleInsight {
    pub is_fertile: bool,
    pub days_until_next: NextPeriod,
}

/// Fixed fertile-window heuristic
pub fn is_fertile(status: &PeriodStatus) -> bool {
    match status.phase {
        Phase::Ovulation => true,
        Phase::Follicular => status.day_in_cycle >= FERTILE_FOLLICULAR_DAY,
        Phase::Menstrual | Phase::Luteal => false,
    }
}

/// Days from `today` to the nearest prediction's start
///
/// The nearest prediction is the one with the lowest period number. An
/// unreadable start date yields `Unknown`.
pub fn days_until_next(predictions: &[CyclePrediction], today: NaiveDate) -> NextPeriod {
    predictions
        .iter()
        .min_by_key(|p| p.period_number)
        .and_then(|p| p.start_date())
        .map(|start| NextPeriod::from_days((start - today).num_days()))
        .unwrap_or(NextPeriod::Unknown)
}

pub fn present_cycle(
    status: &PeriodStatus,
    predictions: &[CyclePrediction],
    today: NaiveDate,
) -> CycleInsight {
    CycleInsight {
        is_fertile: is_fertile(status),
        days_until_next: days_until_next(predictions, today),
    }
}
