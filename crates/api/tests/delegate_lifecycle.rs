//! Integration tests for the OS lifecycle delegate
//!
//! Drives the delegate the way the native shell does and checks the
//! resulting orchestrator state, engine calls and events.

mod support;

use std::sync::atomic::Ordering;
use std::time::Duration;

use mailsync_common::testing::poll_until;
use mailsync_core::{AppStatusProvider, BackgroundTasks};
use mailsync_domain::{ApplicationState, Connection, FolderKind, LifecycleEvent, MailSyncError, OsAppState};
use support::{counting_completion, setup_test_app};

async fn wait_for_state(app: &support::TestApp, state: ApplicationState, timeout: Duration) -> bool {
    let mut rx = app.context().orchestrator.subscribe_state();
    let reached = tokio::time::timeout(timeout, rx.wait_for(|current| *current == state)).await.is_ok();
    reached
}

async fn wait_for_no_loops(app: &support::TestApp) -> bool {
    let orchestrator = app.context().orchestrator.clone();
    poll_until(Duration::from_secs(2), Duration::from_millis(10), move || {
        std::future::ready(orchestrator.active_loops() == 0)
    })
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_launch_then_foreground_is_idempotent() {
    let app = setup_test_app(|config| config.sync.watch_sentbox = true);

    app.delegate.did_finish_launching(OsAppState::Active).await.unwrap();
    app.delegate.will_enter_foreground().await.unwrap();

    let orchestrator = &app.context().orchestrator;
    assert_eq!(orchestrator.state(), ApplicationState::Running);
    assert_eq!(orchestrator.spawned_loops(), 3);
    assert_eq!(app.context().platform.active_tasks(), 3);

    app.delegate.will_terminate().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_launch_fails_when_engine_cannot_be_created() {
    let app = setup_test_app(|_| {});
    app.factory.fail_next_create(true);

    let err = app.delegate.did_finish_launching(OsAppState::Active).await.unwrap_err();

    let domain = err.downcast_ref::<MailSyncError>().expect("domain error");
    assert!(domain.is_fatal());
    assert_eq!(app.context().orchestrator.state(), ApplicationState::Stopped);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_background_budget_stops_sync() {
    let app = setup_test_app(|config| {
        config.background.budget_secs = 11;
        config.background.poll_interval_secs = 1;
    });

    app.delegate.did_finish_launching(OsAppState::Active).await.unwrap();
    app.delegate.will_resign_active();
    app.delegate.did_enter_background();
    assert_eq!(app.context().platform.application_state(), OsAppState::Background);

    assert!(wait_for_state(&app, ApplicationState::Background, Duration::from_secs(5)).await);
    assert!(wait_for_no_loops(&app).await);
    assert_eq!(app.context().platform.active_tasks(), 0);
    assert_eq!(app.engine.interrupt_calls(FolderKind::Inbox), 1);

    app.delegate.will_terminate().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_return_to_foreground_restarts_loops() {
    let app = setup_test_app(|_| {});

    app.delegate.did_finish_launching(OsAppState::Active).await.unwrap();
    app.delegate.did_enter_background();
    app.context().orchestrator.stop().await;
    assert!(wait_for_no_loops(&app).await);

    app.delegate.will_enter_foreground().await.unwrap();

    assert_eq!(app.context().orchestrator.state(), ApplicationState::Running);
    assert_eq!(app.context().orchestrator.spawned_loops(), 4);
    assert_eq!(app.context().platform.background_time_remaining(), Duration::MAX);

    app.delegate.will_terminate().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_background_fetch_completion_on_expiration() {
    let app = setup_test_app(|_| {});
    let (completion, fired) = counting_completion();

    app.delegate.did_finish_launching(OsAppState::Active).await.unwrap();
    app.delegate.did_enter_background();
    app.delegate.perform_background_fetch(completion).await.unwrap();
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    app.delegate.background_time_expired().await;

    assert!(wait_for_no_loops(&app).await);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(app.context().orchestrator.state(), ApplicationState::Background);

    app.delegate.will_terminate().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cold_launch_into_background_fetch_delivers_completion() {
    let app = setup_test_app(|config| {
        config.background.budget_secs = 11;
        config.background.poll_interval_secs = 1;
    });
    let (completion, fired) = counting_completion();

    app.delegate.did_finish_launching(OsAppState::Background).await.unwrap();
    app.delegate.perform_background_fetch(completion).await.unwrap();
    assert_eq!(app.context().orchestrator.spawned_loops(), 2);

    assert!(wait_for_state(&app, ApplicationState::Background, Duration::from_secs(5)).await);
    assert!(wait_for_no_loops(&app).await);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(app.context().platform.active_tasks(), 0);

    app.delegate.will_terminate().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_background_fetch_without_budget_drops_completion() {
    let app = setup_test_app(|config| config.background.budget_secs = 0);
    let (completion, fired) = counting_completion();

    app.delegate.did_enter_background();
    app.delegate.perform_background_fetch(completion).await.unwrap();
    assert_eq!(app.context().platform.begin_background_task("probe"), mailsync_domain::BackgroundTaskId::INVALID);

    assert!(wait_for_state(&app, ApplicationState::Background, Duration::from_secs(5)).await);
    assert!(wait_for_no_loops(&app).await);
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    app.delegate.will_terminate().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connectivity_changes_reach_engine_and_ui() {
    let app = setup_test_app(|_| {});
    let mut events = app.context().orchestrator.events();

    app.delegate.did_finish_launching(OsAppState::Active).await.unwrap();
    assert!(app.context().push_connection(Connection::None));
    assert!(app.context().push_connection(Connection::Wifi));

    let mut network_events = Vec::new();
    while network_events.len() < 2 {
        match tokio::time::timeout(Duration::from_secs(1), events.recv()).await {
            Ok(Ok(event @ LifecycleEvent::StateChanged { .. })) => network_events.push(event),
            Ok(Ok(_)) => {}
            other => panic!("missing network event: {other:?}"),
        }
    }

    assert_eq!(network_events, vec![LifecycleEvent::offline(), LifecycleEvent::online()]);
    assert_eq!(app.engine.maybe_network_calls(), 1);
    assert_eq!(
        serde_json::to_value(network_events[1]).unwrap(),
        serde_json::json!({ "type": "state_changed", "state": "online" })
    );

    app.delegate.will_terminate().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_terminate_twice_is_safe() {
    let app = setup_test_app(|_| {});

    app.delegate.did_finish_launching(OsAppState::Active).await.unwrap();
    app.delegate.will_terminate().await;
    app.delegate.will_terminate().await;

    assert_eq!(app.engine.close_calls(), 1);
    assert_eq!(app.context().orchestrator.state(), ApplicationState::Stopped);
    assert!(wait_for_no_loops(&app).await);
}
