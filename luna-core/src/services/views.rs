//! Screen loaders
//!
//! Each screen declares its sources (one primary, some secondaries), runs
//! them through its own orchestrator and folds the settled sections into a
//! view model ready to render.

use chrono::NaiveDate;
use futures::FutureExt;
use serde::Serialize;

use crate::domain::prediction::SkippedPrediction;
use crate::domain::result::{Error, Result};
use crate::domain::{
    build_month_grid, build_prediction_window, present_cycle, summarize_symptoms, CalendarCell,
    CycleInsight, CyclePrediction, MonthCursor, PeriodStatus, SymptomEntry, SymptomSummary,
    TrendSummary,
};
use crate::services::fetch::DataFetchOrchestrator;
use crate::services::gateway::AuthorizedBackend;

/// Data arriving from one backend read
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Status(PeriodStatus),
    Predictions(Vec<CyclePrediction>),
    Trend(TrendSummary),
    Logs(Vec<SymptomEntry>),
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub status: PeriodStatus,
    pub insight: CycleInsight,
    pub trend: Option<TrendSummary>,
    pub degraded: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub month: String,
    #[serde(skip)]
    pub cursor: MonthCursor,
    pub cells: Vec<CalendarCell>,
    pub predicted_days: usize,
    pub skipped: Vec<SkippedPrediction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightsView {
    pub summary: SymptomSummary,
    pub trend: Option<TrendSummary>,
    pub degraded: Vec<&'static str>,
}

pub struct ViewService {
    api: AuthorizedBackend,
    home: DataFetchOrchestrator<Section>,
    calendar: DataFetchOrchestrator<Section>,
    insights: DataFetchOrchestrator<Section>,
}

impl ViewService {
    pub fn new(api: AuthorizedBackend) -> Self {
        Self {
            api,
            home: DataFetchOrchestrator::new(),
            calendar: DataFetchOrchestrator::new(),
            insights: DataFetchOrchestrator::new(),
        }
    }

    /// Home: status is required, predictions and trend are optional
    pub async fn load_home(&self, today: NaiveDate) -> Result<HomeView> {
        let (status_api, predictions_api, trend_api) =
            (self.api.clone(), self.api.clone(), self.api.clone());

        let loaded = self
            .home
            .begin()
            .primary(
                "status",
                async move { status_api.period_status().await.map(Section::Status) }.boxed(),
            )
            .secondary(
                "predictions",
                async move { predictions_api.predictions().await.map(Section::Predictions) }
                    .boxed(),
            )
            .secondary(
                "trend",
                async move { trend_api.trend_summary().await.map(Section::Trend) }.boxed(),
            )
            .run()
            .await?;

        let mut status = None;
        let mut predictions = Vec::new();
        let mut trend = None;
        for section in loaded.sections {
            match section {
                Section::Status(s) => status = Some(s),
                Section::Predictions(p) => predictions = p,
                Section::Trend(t) if !t.is_empty() => trend = Some(t),
                _ => {}
            }
        }

        let status = status.ok_or_else(|| Error::Other("Status missing from response".into()))?;
        Ok(HomeView {
            insight: present_cycle(&status, &predictions, today),
            status,
            trend,
            degraded: loaded.degraded,
        })
    }

    /// Calendar for one month with predicted days marked
    pub async fn load_calendar(&self, month: MonthCursor, today: NaiveDate) -> Result<CalendarView> {
        let api = self.api.clone();

        let loaded = self
            .calendar
            .begin()
            .primary(
                "predictions",
                async move { api.predictions().await.map(Section::Predictions) }.boxed(),
            )
            .run()
            .await?;

        let predictions = loaded
            .sections
            .into_iter()
            .find_map(|section| match section {
                Section::Predictions(p) => Some(p),
                _ => None,
            })
            .unwrap_or_default();

        let window = build_prediction_window(&predictions);
        Ok(CalendarView {
            month: month.to_string(),
            cursor: month,
            cells: build_month_grid(month, &window.dates, today),
            predicted_days: window.dates.len(),
            skipped: window.skipped,
        })
    }

    /// Insights: logs are required, trend is optional
    pub async fn load_insights(&self) -> Result<InsightsView> {
        let (logs_api, trend_api) = (self.api.clone(), self.api.clone());

        let loaded = self
            .insights
            .begin()
            .primary(
                "logs",
                async move { logs_api.symptom_logs().await.map(Section::Logs) }.boxed(),
            )
            .secondary(
                "trend",
                async move { trend_api.trend_summary().await.map(Section::Trend) }.boxed(),
            )
            .run()
            .await?;

        let mut logs = Vec::new();
        let mut trend = None;
        for section in loaded.sections {
            match section {
                Section::Logs(l) => logs = l,
                Section::Trend(t) if !t.is_empty() => trend = Some(t),
                _ => {}
            }
        }

        Ok(InsightsView {
            summary: summarize_symptoms(&logs),
            trend,
            degraded: loaded.degraded,
        })
    }

    /// Leaving every screen: in-flight loads may no longer touch state
    pub fn teardown(&self) {
        self.home.teardown();
        self.calendar.teardown();
        self.insights.teardown();
    }
}
