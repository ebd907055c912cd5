//! End-to-end polling against a live mock render server.

use std::sync::Arc;
use std::time::Duration;

use render_poller::config::{DispatchMode, PollerConfig};
use render_poller::poller::{PollerSettings, RecordingScheduler};
use render_poller::transport::HttpTransport;
use render_poller::view::RecordingView;
use render_poller::{CancelToken, Endpoints, ImagePoller, PollState, ResourceId, Transport};

mod common;
use common::MockReply;

fn http_transport() -> Arc<dyn Transport> {
    Arc::new(HttpTransport::new(&PollerConfig::default().transport).unwrap())
}

#[tokio::test]
async fn test_fail_fail_ok_reveals_abc123() {
    let server = common::start_scripted_server(&["fail", "fail", "ok"]).await;
    let view = Arc::new(RecordingView::new());
    let scheduler = Arc::new(RecordingScheduler::new());
    let poller = ImagePoller::new(
        http_transport(),
        view.clone(),
        Endpoints::parse(&server.base_url()).unwrap(),
    )
    .with_scheduler(scheduler.clone());

    let report = poller
        .run(ResourceId::new("abc123").unwrap(), 2.0, &CancelToken::new())
        .await;

    assert!(report.is_revealed());
    assert_eq!(
        scheduler.delays(),
        vec![Duration::from_millis(2000), Duration::from_millis(3000)]
    );
    assert_eq!(view.images(), vec!["/render/abc123".to_string()]);
    assert_eq!(server.calls_for("abc123"), 3);
}

#[tokio::test]
async fn test_real_timer_with_short_backoff() {
    let server = common::start_scripted_server(&["fail", "fail", "fail", "ok"]).await;
    let view = Arc::new(RecordingView::new());
    let poller = ImagePoller::new(
        http_transport(),
        view.clone(),
        Endpoints::parse(&server.base_url()).unwrap(),
    );

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        poller.run(ResourceId::new("quick").unwrap(), 0.01, &CancelToken::new()),
    )
    .await
    .unwrap();

    assert!(report.is_revealed());
    assert_eq!(report.attempts, 4);
    assert_eq!(view.images().len(), 1);
}

#[tokio::test]
async fn test_concurrent_sequences_keep_their_own_views() {
    let server = common::start_render_server(|id, n| {
        let ready_after = if id == "first" { 1 } else { 3 };
        MockReply::text(if n >= ready_after { "ok" } else { "fail" })
    })
    .await;
    let endpoints = Endpoints::parse(&server.base_url()).unwrap();
    let transport = http_transport();

    let first_view = Arc::new(RecordingView::new());
    let second_view = Arc::new(RecordingView::new());
    let first = ImagePoller::new(transport.clone(), first_view.clone(), endpoints.clone())
        .with_scheduler(Arc::new(RecordingScheduler::new()));
    let second = ImagePoller::new(transport.clone(), second_view.clone(), endpoints.clone())
        .with_scheduler(Arc::new(RecordingScheduler::new()));
    let cancel = CancelToken::new();

    let (a, b) = tokio::join!(
        first.run(ResourceId::new("first").unwrap(), 1.0, &cancel),
        second.run(ResourceId::new("second").unwrap(), 1.0, &cancel),
    );

    assert_eq!(a.attempts, 2);
    assert_eq!(b.attempts, 4);
    assert_eq!(first_view.images(), vec!["/render/first".to_string()]);
    assert_eq!(second_view.images(), vec!["/render/second".to_string()]);
}

#[tokio::test]
async fn test_strict_mode_alerts_on_server_error_body() {
    let server = common::start_scripted_server(&["error: Invalid filename [1]", "ok"]).await;
    let view = Arc::new(RecordingView::new());
    let settings = PollerSettings {
        dispatch: DispatchMode::Strict,
        ..PollerSettings::default()
    };
    let poller = ImagePoller::new(
        http_transport(),
        view.clone(),
        Endpoints::parse(&server.base_url()).unwrap(),
    )
    .with_scheduler(Arc::new(RecordingScheduler::new()))
    .with_settings(settings);

    let report = poller
        .run(ResourceId::new("img").unwrap(), 1.0, &CancelToken::new())
        .await;

    assert_eq!(report.state, PollState::Revealed);
    assert_eq!(
        view.alerts(),
        vec!["Unexpected Result: error: Invalid filename [1]".to_string()]
    );
}

#[tokio::test]
async fn test_unreachable_server_gives_up_at_attempt_limit() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = PollerConfig::default();
    config.limits.max_attempts = Some(3);
    let view = Arc::new(RecordingView::new());
    let poller = ImagePoller::new(
        http_transport(),
        view.clone(),
        Endpoints::parse(&format!("http://{}/", addr)).unwrap(),
    )
    .with_scheduler(Arc::new(RecordingScheduler::new()))
    .with_settings(PollerSettings::from_config(&config));

    let report = poller
        .run(ResourceId::new("abc").unwrap(), 1.0, &CancelToken::new())
        .await;

    assert!(matches!(report.state, PollState::GaveUp(_)));
    assert_eq!(report.attempts, 3);
    assert!(view.images().is_empty());
}
