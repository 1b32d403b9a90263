//! Screen loader and write-path tests against the fake backend

mod common;

use std::sync::Arc;

use common::{context, date, Failure, FakeBackend};
use luna_core::adapters::MemoryStore;
use luna_core::domain::result::Error;
use luna_core::domain::{CyclePrediction, SymptomEntry};
use luna_core::ports::{StateStore, CREDENTIAL_KEY, ONBOARDING_KEY};
use luna_core::{CalendarCell, LunaContext, MonthCursor, NextPeriod, Phase};
use tempfile::tempdir;

/// Context with a signed-in user
fn signed_in() -> (Arc<MemoryStore>, Arc<FakeBackend>, LunaContext) {
    let store = Arc::new(MemoryStore::new());
    store.set(CREDENTIAL_KEY, common::TOKEN).unwrap();
    store.set(ONBOARDING_KEY, "true").unwrap();
    let backend = Arc::new(FakeBackend::new());
    let ctx = context(&store, &backend);
    (store, backend, ctx)
}

fn entry(name: &str, severity: &str, created_at: &str) -> SymptomEntry {
    SymptomEntry {
        id: None,
        symptom_name: Some(name.to_string()),
        severity: Some(severity.to_string()),
        created_at: Some(created_at.to_string()),
    }
}

#[tokio::test]
async fn test_home_all_sources() {
    let (_store, _backend, ctx) = signed_in();

    let home = ctx.view_service.load_home(date(2025, 2, 20)).await.unwrap();

    assert_eq!(home.status.phase, Phase::Follicular);
    assert!(home.insight.is_fertile);
    assert_eq!(home.insight.days_until_next, NextPeriod::InDays(9));
    assert!(home.trend.is_some());
    assert!(home.degraded.is_empty());
}

#[tokio::test]
async fn test_home_secondary_failure_degrades() {
    let (_store, backend, ctx) = signed_in();
    backend.fail("trend", Failure::Unavailable);

    let home = ctx.view_service.load_home(date(2025, 2, 20)).await.unwrap();

    assert!(home.trend.is_none());
    assert_eq!(home.degraded, vec!["trend"]);
    assert_eq!(home.insight.days_until_next, NextPeriod::InDays(9));
    assert_eq!(backend.calls("status"), 1);
    assert_eq!(backend.calls("predictions"), 1);
}

#[tokio::test]
async fn test_home_without_predictions_is_unknown() {
    let (_store, backend, ctx) = signed_in();
    backend.fail("predictions", Failure::Unavailable);

    let home = ctx.view_service.load_home(date(2025, 2, 20)).await.unwrap();
    assert_eq!(home.insight.days_until_next, NextPeriod::Unknown);
    assert_eq!(home.degraded, vec!["predictions"]);
}

#[tokio::test]
async fn test_home_primary_failure_is_error() {
    let (_store, backend, ctx) = signed_in();
    backend.fail("status", Failure::Unavailable);

    let err = ctx.view_service.load_home(date(2025, 2, 20)).await.unwrap_err();
    assert!(err.is_retryable());
    // Secondaries still ran to completion
    assert_eq!(backend.calls("trend"), 1);
}

#[tokio::test]
async fn test_calendar_marks_predicted_days() {
    let (_store, _backend, ctx) = signed_in();
    let march = MonthCursor::new(2025, 2).unwrap();

    let view = ctx
        .view_service
        .load_calendar(march, date(2025, 3, 3))
        .await
        .unwrap();

    // 1st..=5th from the explicit end, 29th..=31st from the default window
    let predicted: Vec<u32> = view
        .cells
        .iter()
        .filter_map(|cell| match cell {
            CalendarCell::Day {
                date,
                is_predicted: true,
                ..
            } => Some(chrono::Datelike::day(date)),
            _ => None,
        })
        .collect();
    assert_eq!(predicted, vec![1, 2, 3, 4, 5, 29, 30, 31]);
    assert_eq!(view.predicted_days, 11);

    let today: Vec<_> = view
        .cells
        .iter()
        .filter(|cell| matches!(cell, CalendarCell::Day { is_today: true, .. }))
        .collect();
    assert_eq!(today.len(), 1);
    assert!(view.skipped.is_empty());
}

#[tokio::test]
async fn test_calendar_reports_skipped_records() {
    let (_store, backend, ctx) = signed_in();
    *backend.predictions.lock().unwrap() = vec![
        CyclePrediction::new(1, "2025-02-xx"),
        CyclePrediction::new(2, "2025-02-10"),
    ];

    let view = ctx
        .view_service
        .load_calendar(MonthCursor::new(2025, 1).unwrap(), date(2025, 2, 1))
        .await
        .unwrap();

    assert_eq!(view.skipped.len(), 1);
    assert_eq!(view.skipped[0].period_number, 1);
    assert_eq!(view.predicted_days, 6);
}

#[tokio::test]
async fn test_insights_groups_logs() {
    let (_store, backend, ctx) = signed_in();
    *backend.logs.lock().unwrap() = vec![
        entry("Cramps", "3", "2025-02-10T09:00:00Z"),
        entry("Cramps", "2", "2025-02-11"),
        entry("Headache", "3", "2025-02-11T23:30:00Z"),
    ];
    backend.fail("trend", Failure::Unavailable);

    let insights = ctx.view_service.load_insights().await.unwrap();

    assert_eq!(insights.summary.total, 3);
    assert_eq!(insights.summary.top_symptom, Some(("Cramps".to_string(), 2)));
    assert_eq!(insights.summary.by_day[0].date, Some(date(2025, 2, 11)));
    assert_eq!(insights.summary.by_day[0].entries.len(), 2);
    assert_eq!(insights.degraded, vec!["trend"]);
}

#[tokio::test]
async fn test_missing_credential_ends_session() {
    let store = Arc::new(MemoryStore::new());
    store.set(ONBOARDING_KEY, "true").unwrap();
    let backend = Arc::new(FakeBackend::new());
    let ctx = context(&store, &backend);
    let mut rx = ctx.credentials.subscribe();

    let err = ctx.view_service.load_insights().await.unwrap_err();

    assert!(err.is_unauthenticated());
    assert!(rx.try_recv().is_ok());
    assert_eq!(backend.calls("logs"), 0);
    assert_eq!(store.get(ONBOARDING_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_record_symptom_validates_first() {
    let (_store, backend, ctx) = signed_in();

    let err = ctx
        .tracking_service
        .record_symptom("Cramps", "")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please choose both symptom and severity.");
    assert_eq!(backend.calls("logger"), 0);

    ctx.tracking_service
        .record_symptom("Cramps", "4")
        .await
        .unwrap();
    assert_eq!(backend.symptoms_recorded.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_record_period_start_default_message() {
    let (_store, _backend, ctx) = signed_in();
    let message = ctx.tracking_service.record_period_start().await.unwrap();
    assert_eq!(message, "New period start recorded.");
}

#[tokio::test]
async fn test_assistant_rejects_blank_message() {
    let (_store, backend, ctx) = signed_in();
    assert!(matches!(
        ctx.tracking_service.ask_assistant("   ").await,
        Err(Error::Validation(_))
    ));
    assert_eq!(backend.calls("assistant"), 0);

    let reply = ctx.tracking_service.ask_assistant("hi").await.unwrap();
    assert_eq!(reply, "You asked: hi");
}

#[tokio::test]
async fn test_export_writes_pdf() {
    let (_store, backend, ctx) = signed_in();
    let dir = tempdir().unwrap();

    let err = ctx.export_service.export_pdf(dir.path()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(ctx.credentials.is_present());

    *backend.logs.lock().unwrap() = vec![entry("Acne", "1", "2025-02-01")];
    let path = ctx.export_service.export_pdf(dir.path()).await.unwrap();
    assert!(path.ends_with("symptom_report.pdf"));
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
}
