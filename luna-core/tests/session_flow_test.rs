//! Session lifecycle tests
//!
//! Walk the gate through onboarding, restarts, updates and logouts against a
//! fake backend, checking the persisted credential and onboarding flag at
//! every step.

mod common;

use std::sync::Arc;

use common::{context, date, Failure, FakeBackend, TOKEN};
use luna_core::adapters::MemoryStore;
use luna_core::domain::result::Error;
use luna_core::ports::{StateStore, CREDENTIAL_KEY, ONBOARDING_KEY};
use luna_core::{Credential, ProfileInput, Screen, SetupMode};

fn today() -> chrono::NaiveDate {
    date(2025, 2, 20)
}

fn profile() -> ProfileInput {
    ProfileInput::new(date(2025, 2, 6), 28)
}

fn setup() -> (Arc<MemoryStore>, Arc<FakeBackend>) {
    (Arc::new(MemoryStore::new()), Arc::new(FakeBackend::new()))
}

#[tokio::test]
async fn test_full_lifecycle_walk() {
    let (store, backend) = setup();

    // Fresh install
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    assert_eq!(gate.screen(), Screen::Welcome);

    assert_eq!(
        gate.acknowledge_welcome(),
        Screen::ProfileSetup(SetupMode::Onboarding)
    );

    let screen = gate.save_profile(profile(), today()).await.unwrap();
    assert_eq!(screen, Screen::MainApp);
    assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), Some(TOKEN.to_string()));
    assert_eq!(store.get(ONBOARDING_KEY).unwrap(), Some("true".to_string()));

    // Restart lands straight in the app
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    assert_eq!(gate.screen(), Screen::MainApp);

    // Logout from anywhere
    ctx.credentials.clear().unwrap();
    assert_eq!(gate.screen(), Screen::Welcome);
    assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), None);

    // And a restart after logout starts over
    let ctx = context(&store, &backend);
    assert_eq!(ctx.session_gate().screen(), Screen::Welcome);
}

#[tokio::test]
async fn test_failed_signup_mutates_nothing() {
    let (store, backend) = setup();
    backend.fail("first_period", Failure::Unavailable);

    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();

    let err = gate.save_profile(profile(), today()).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(gate.screen(), Screen::ProfileSetup(SetupMode::Onboarding));
    assert!(gate.ui().last_error.is_some());
    assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), None);
    assert_eq!(store.get(ONBOARDING_KEY).unwrap(), None);

    // Retry succeeds once the backend recovers
    backend.recover("first_period");
    assert_eq!(
        gate.save_profile(profile(), today()).await.unwrap(),
        Screen::MainApp
    );
    assert!(gate.ui().last_error.is_none());
}

#[tokio::test]
async fn test_invalid_profile_never_reaches_backend() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();

    let too_long = ProfileInput::new(date(2025, 2, 6), 60);
    let err = gate.save_profile(too_long, today()).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let future = ProfileInput::new(date(2025, 3, 1), 28);
    assert!(gate.save_profile(future, today()).await.is_err());

    assert_eq!(backend.calls("create_profile"), 0);
    assert_eq!(gate.screen(), Screen::ProfileSetup(SetupMode::Onboarding));
}

#[tokio::test]
async fn test_signup_interrupted_by_session_end() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();

    let credentials = ctx.credentials.clone();
    backend.during("first_period", move || {
        credentials.clear().unwrap();
    });

    let screen = gate.save_profile(profile(), today()).await.unwrap();
    assert_eq!(screen, Screen::Welcome);
    assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), None);
    assert_eq!(store.get(ONBOARDING_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_update_cycle_info_round_trip() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();
    gate.save_profile(profile(), today()).await.unwrap();

    assert_eq!(
        gate.request_cycle_update(),
        Screen::ProfileSetup(SetupMode::UpdateCycleInfo)
    );
    assert_eq!(store.get(ONBOARDING_KEY).unwrap(), Some("true".to_string()));

    let updated = ProfileInput::new(date(2025, 2, 10), 30);
    assert_eq!(gate.save_profile(updated, today()).await.unwrap(), Screen::MainApp);
    assert_eq!(backend.calls("update_profile"), 1);
    assert_eq!(backend.calls("create_profile"), 1);

    gate.request_cycle_update();
    assert_eq!(gate.cancel_update(), Screen::MainApp);
}

#[tokio::test]
async fn test_cancel_ignored_during_onboarding() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();

    assert_eq!(gate.cancel_update(), Screen::ProfileSetup(SetupMode::Onboarding));
}

#[tokio::test]
async fn test_update_rejected_credential_logs_out() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();
    gate.save_profile(profile(), today()).await.unwrap();
    gate.request_cycle_update();

    backend.fail("update_profile", Failure::Unauthorized);
    let err = gate.save_profile(profile(), today()).await.unwrap_err();

    assert!(err.is_unauthenticated());
    assert_eq!(gate.screen(), Screen::Welcome);
    assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_update_other_failure_keeps_session() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();
    gate.save_profile(profile(), today()).await.unwrap();
    gate.request_cycle_update();

    backend.fail("update_profile", Failure::Rejected);
    assert!(gate.save_profile(profile(), today()).await.is_err());

    assert_eq!(gate.screen(), Screen::ProfileSetup(SetupMode::UpdateCycleInfo));
    assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), Some(TOKEN.to_string()));
}

#[tokio::test]
async fn test_stale_update_does_not_resurrect_main_app() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();
    gate.save_profile(profile(), today()).await.unwrap();
    gate.request_cycle_update();

    // Logout lands while the update is in flight; the update itself succeeds
    let credentials = ctx.credentials.clone();
    backend.during("update_profile", move || {
        credentials.clear().unwrap();
    });

    let screen = gate.save_profile(profile(), today()).await.unwrap();
    assert_eq!(screen, Screen::Welcome);
    assert_eq!(gate.screen(), Screen::Welcome);
}

#[tokio::test]
async fn test_rejected_read_ends_session_for_every_gate() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();
    gate.save_profile(profile(), today()).await.unwrap();

    let mut other_gate = ctx.session_gate();
    assert_eq!(other_gate.screen(), Screen::MainApp);

    backend.fail("status", Failure::Unauthorized);
    let err = ctx.view_service.load_home(today()).await.unwrap_err();
    assert!(err.is_unauthenticated());

    assert_eq!(gate.screen(), Screen::Welcome);
    assert_eq!(other_gate.screen(), Screen::Welcome);
}

#[tokio::test]
async fn test_transient_read_keeps_credential() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();
    gate.save_profile(profile(), today()).await.unwrap();

    backend.fail("status", Failure::Unavailable);
    assert!(ctx.view_service.load_home(today()).await.is_err());

    assert_eq!(gate.screen(), Screen::MainApp);
    assert!(ctx.credentials.is_present());
}

#[tokio::test]
async fn test_trend_popup_once_per_session() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();

    assert!(gate.take_trend_popup());
    assert!(!gate.take_trend_popup());

    ctx.credentials.clear().unwrap();
    assert!(gate.take_trend_popup());
}

#[tokio::test]
async fn test_signup_storage_failure_rolls_back_flag() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();

    store.set_fail_writes(true);
    let err = gate.save_profile(profile(), today()).await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
    assert_eq!(gate.screen(), Screen::ProfileSetup(SetupMode::Onboarding));
    assert!(!ctx.credentials.is_present());
}

#[tokio::test]
async fn test_rejection_of_replaced_credential_keeps_newer_session() {
    let (store, backend) = setup();
    store.set(CREDENTIAL_KEY, "token-old").unwrap();
    store.set(ONBOARDING_KEY, "true").unwrap();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    assert_eq!(gate.screen(), Screen::MainApp);

    // A new session is stored while the write made with the old one is in flight
    let credentials = ctx.credentials.clone();
    backend.during("update_period", move || {
        credentials.set(Credential::new(TOKEN).unwrap());
    });

    let err = ctx.tracking_service.record_period_start().await.unwrap_err();
    assert!(err.is_unauthenticated());

    assert_eq!(ctx.credentials.get(), Credential::new(TOKEN));
    assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), Some(TOKEN.to_string()));
    assert_eq!(gate.screen(), Screen::MainApp);
}

#[tokio::test]
async fn test_rejection_after_sign_out_still_ends_session() {
    let (store, backend) = setup();
    store.set(CREDENTIAL_KEY, "token-old").unwrap();
    store.set(ONBOARDING_KEY, "true").unwrap();
    let ctx = context(&store, &backend);

    let err = ctx.view_service.load_home(today()).await.unwrap_err();
    assert!(err.is_unauthenticated());
    assert!(!ctx.credentials.is_present());
    assert_eq!(ctx.session_gate().screen(), Screen::Welcome);
}

#[tokio::test]
async fn test_sign_out_reports_session_left_on_disk() {
    let (store, backend) = setup();
    let ctx = context(&store, &backend);
    let mut gate = ctx.session_gate();
    gate.acknowledge_welcome();
    gate.save_profile(profile(), today()).await.unwrap();

    store.set_fail_writes(true);
    let err = gate.sign_out().unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
    assert_eq!(gate.screen(), Screen::Welcome);

    // The store still holds the session, so signing out again must retry
    assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), Some(TOKEN.to_string()));
    store.set_fail_writes(false);
    ctx.credentials.clear().unwrap();

    let restarted = context(&store, &backend);
    assert!(!restarted.credentials.is_present());
    assert_eq!(restarted.session_gate().screen(), Screen::Welcome);
}
