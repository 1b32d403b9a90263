//! Core domain entities
//!
//! Pure data structures and computations: predictions, phases, the month
//! grid and the screen state machine. No I/O or external dependencies.

pub mod calendar;
pub mod credential;
pub mod cycle;
pub mod prediction;
pub mod profile;
pub mod result;
pub mod session;
pub mod symptom;

pub use calendar::{build_month_grid, CalendarCell, MonthCursor};
pub use credential::Credential;
pub use cycle::{present_cycle, CycleInsight, NextPeriod, PeriodStatus, Phase, TrendSummary};
pub use prediction::{
    build_prediction_window, parse_calendar_date, CyclePrediction, PredictedDateSet,
    PredictionWindow,
};
pub use profile::ProfileInput;
pub use session::{Screen, SessionEvent, SetupMode};
pub use symptom::{summarize_symptoms, NewSymptomLog, SymptomEntry, SymptomSummary};
