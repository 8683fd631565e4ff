//! Integration tests for live polling against a running engine
//!
//! Starts the simulated engine on an ephemeral port and drives the dashboard
//! over real HTTP.

use std::path::PathBuf;
use std::time::Duration;

use sentinel_dash::core::{create_router, http_client, ActionDispatcher, Dashboard, DashboardEvent, SnapshotFetcher};
use sentinel_dash::types::{DashboardConfig, EngineError, FeedSource, ScoreScale, PLACEHOLDER_PROMPT};
use tokio::time::timeout;

async fn spawn_engine(scale: ScoreScale) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(scale)).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Engine whose status endpoint answers 200 with a non-JSON body
async fn spawn_html_engine() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = axum::Router::new().route("/stats", axum::routing::get(|| async { "<html>busy</html>" }));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Address nothing listens on
async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn config(url: String, scale: ScoreScale) -> DashboardConfig {
    DashboardConfig {
        engine_url: url,
        interval_ms: 100,
        ..DashboardConfig::default().with_scale(scale)
    }
}

async fn next(dash: &mut Dashboard) -> DashboardEvent {
    timeout(Duration::from_secs(5), dash.next_event())
        .await
        .expect("no event within 5s")
        .expect("event channel closed")
}

#[tokio::test]
async fn test_fetcher_reads_engine_snapshot() {
    let url = spawn_engine(ScoreScale::Percent).await;
    let fetcher = SnapshotFetcher::new(http_client().unwrap(), format!("{}/stats", url));

    let snap = fetcher.fetch().await.unwrap();
    assert!(snap.trust_score.is_some());
    assert_eq!(snap.prompt.as_deref(), Some("WAITING FOR SUBJECT..."));
}

#[tokio::test]
async fn test_fetcher_classifies_failures() {
    let fetcher = SnapshotFetcher::new(http_client().unwrap(), format!("{}/stats", dead_url().await));
    assert!(matches!(fetcher.fetch().await, Err(EngineError::Transport(_))));

    let url = spawn_engine(ScoreScale::Unit).await;
    let missing = SnapshotFetcher::new(http_client().unwrap(), format!("{}/nope", url));
    assert!(matches!(missing.fetch().await, Err(EngineError::Transport(_))));

    let html = spawn_html_engine().await;
    let garbled = SnapshotFetcher::new(http_client().unwrap(), format!("{}/stats", html));
    assert!(matches!(garbled.fetch().await, Err(EngineError::Decode(_))));
}

#[tokio::test]
async fn test_dashboard_applies_polled_snapshots() {
    let url = spawn_engine(ScoreScale::Unit).await;
    let mut dash = Dashboard::new(config(url, ScoreScale::Unit)).unwrap();
    assert_eq!(dash.view().prompt, PLACEHOLDER_PROMPT);

    dash.mount();
    let event = next(&mut dash).await;
    assert!(matches!(event, DashboardEvent::Polled { result: Ok(_), .. }));
    assert!(dash.apply(event));

    assert_eq!(dash.view().prompt, "WAITING FOR SUBJECT...");
    assert_eq!(dash.view().violated_rules, vec!["No Face Detected".to_string()]);
    assert!(dash.view().last_updated.is_some());
    assert!(!dash.view().verified);
    dash.unmount();
}

#[tokio::test]
async fn test_failed_polls_keep_view_and_keep_polling() {
    let mut dash = Dashboard::new(config(dead_url().await, ScoreScale::Unit)).unwrap();
    let before = dash.view().clone();
    dash.mount();

    for _ in 0..3 {
        let event = next(&mut dash).await;
        assert!(matches!(event, DashboardEvent::Polled { result: Err(_), .. }));
        assert!(!dash.apply(event));
    }
    assert_eq!(dash.view(), &before);
    assert_eq!(dash.failed_polls(), 3);
    assert!(dash.is_polling());
}

#[tokio::test]
async fn test_pause_stops_issuing_polls() {
    let url = spawn_engine(ScoreScale::Unit).await;
    let mut dash = Dashboard::new(config(url, ScoreScale::Unit)).unwrap();
    dash.mount();
    let event = next(&mut dash).await;
    dash.apply(event);

    dash.set_paused(true);
    assert_eq!(dash.feed(), FeedSource::Frozen);
    let issued = dash.polls_issued();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(dash.polls_issued(), issued);

    // Paused view-model state is retained
    assert_eq!(dash.view().prompt, "WAITING FOR SUBJECT...");

    dash.set_paused(false);
    assert!(matches!(dash.feed(), FeedSource::Live(_)));
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert!(dash.polls_issued() > issued);
}

#[tokio::test]
async fn test_upload_round_trip() {
    let url = spawn_engine(ScoreScale::Unit).await;
    let path: PathBuf = std::env::temp_dir().join(format!("sentinel_dash_upload_{}.mp4", std::process::id()));
    std::fs::write(&path, b"not really a video").unwrap();

    let mut dash = Dashboard::new(config(url.clone(), ScoreScale::Unit)).unwrap();
    dash.upload_video(path.clone());
    assert!(dash.view().is_uploading);

    let event = next(&mut dash).await;
    assert!(matches!(event, DashboardEvent::UploadFinished(Ok(()))));
    dash.apply(event);
    assert!(!dash.view().is_uploading);
    assert!(dash.view().toast.is_none());

    let health: serde_json::Value = reqwest::get(format!("{}/health", url)).await.unwrap().json().await.unwrap();
    let expected = format!("temp_{}", path.file_name().unwrap().to_string_lossy());
    assert_eq!(health["source"], expected.as_str());
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_upload_to_dead_engine_is_command_error() {
    let url = dead_url().await;
    let path: PathBuf = std::env::temp_dir().join(format!("sentinel_dash_dead_{}.mp4", std::process::id()));
    std::fs::write(&path, b"bytes").unwrap();

    let dispatcher = ActionDispatcher::new(
        http_client().unwrap(),
        format!("{}/upload_video", url),
        format!("{}/reset_camera", url),
    );
    let result = dispatcher.upload_video(&path).await;
    assert!(matches!(result, Err(EngineError::Command { command: "upload", .. })));
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_reset_camera_fire_and_forget() {
    let url = spawn_engine(ScoreScale::Unit).await;
    let dispatcher = ActionDispatcher::new(
        http_client().unwrap(),
        format!("{}/upload_video", url),
        format!("{}/reset_camera", url),
    );
    dispatcher.reset_camera().await.unwrap();

    let health: serde_json::Value = reqwest::get(format!("{}/health", url)).await.unwrap().json().await.unwrap();
    assert_eq!(health["restarts"], 1);

    // Against a dead engine the task still completes without panicking
    let dead = dead_url().await;
    let dispatcher = ActionDispatcher::new(
        http_client().unwrap(),
        format!("{}/upload_video", dead),
        format!("{}/reset_camera", dead),
    );
    assert!(dispatcher.reset_camera().await.is_ok());
}
