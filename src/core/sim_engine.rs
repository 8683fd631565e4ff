//! Simulated scoring engine
//!
//! Serves the same HTTP surface as the real engine so the dashboard can be
//! demoed and tested without a camera. The verification walk-through is
//! scripted by elapsed time; nothing is measured.
//!
//! Endpoints:
//! - GET  /stats        - Current status snapshot
//! - GET  /video_feed   - multipart/x-mixed-replace placeholder stream
//! - POST /upload_video - Switch source to an uploaded file (field `file`)
//! - POST /reset_camera - Switch back to the camera
//! - GET  /health       - Health check

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::types::ScoreScale;

/// Samples kept for the synthetic pulse
pub const WAVE_BUFFER_LEN: usize = 150;

/// Samples needed before the wave is published
pub const WAVE_MIN_SAMPLES: usize = 10;

/// Source name when no upload is active
pub const CAMERA_SOURCE: &str = "camera:1";

const FEED_FRAME_MS: u64 = 100;

/// One scripted step of the walk-through
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimStage {
    pub name: &'static str,
    pub prompt: &'static str,
    /// Score on the 0.0-1.0 scale
    pub score: f64,
    /// How many checklist steps are done
    pub checks_done: usize,
    pub face_found: bool,
}

const STAGES: [(f64, SimStage); 6] = [
    (0.0, SimStage { name: "SEARCHING", prompt: "WAITING FOR SUBJECT...", score: 0.0, checks_done: 0, face_found: false }),
    (1.0, SimStage { name: "CALIBRATING", prompt: "Calibrating Sensors...", score: 0.1, checks_done: 0, face_found: true }),
    (4.0, SimStage { name: "CHALLENGE_TURN", prompt: "ACTION: Turn Head LEFT", score: 0.3, checks_done: 1, face_found: true }),
    (6.0, SimStage { name: "CHALLENGE_SMILE", prompt: "ACTION: Smile", score: 0.5, checks_done: 2, face_found: true }),
    (8.0, SimStage { name: "CHALLENGE_BLINK", prompt: "ACTION: Blink Eyes", score: 0.75, checks_done: 3, face_found: true }),
    (10.0, SimStage { name: "VERIFIED", prompt: "AUTHENTIC HUMAN CONFIRMED", score: 0.98, checks_done: 4, face_found: true }),
];

const CHECK_KEYS: [&str; 4] = ["calibrated", "turned", "smiled", "blinked"];

/// Stage active after `elapsed` since the last restart
pub fn stage_at(elapsed: Duration) -> SimStage {
    let secs = elapsed.as_secs_f64();
    STAGES
        .iter()
        .rev()
        .find(|(start, _)| secs >= *start)
        .map(|(_, stage)| *stage)
        .unwrap_or(STAGES[0].1)
}

/// Scripted engine state
#[derive(Debug)]
pub struct SimEngine {
    scale: ScoreScale,
    source: String,
    started: Instant,
    wave: VecDeque<f64>,
    restarts: u64,
}

impl SimEngine {
    pub fn new(scale: ScoreScale) -> Self {
        Self {
            scale,
            source: CAMERA_SOURCE.to_string(),
            started: Instant::now(),
            wave: VecDeque::with_capacity(WAVE_BUFFER_LEN),
            restarts: 0,
        }
    }

    /// Start the walk-through over on a new source
    pub fn restart(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.started = Instant::now();
        self.wave.clear();
        self.restarts += 1;
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Snapshot for the current moment
    pub fn snapshot(&mut self) -> Value {
        let elapsed = self.started.elapsed();
        self.snapshot_at(elapsed)
    }

    /// Snapshot as it looks `elapsed` after restart
    pub fn snapshot_at(&mut self, elapsed: Duration) -> Value {
        let stage = stage_at(elapsed);
        let t = elapsed.as_secs_f64();

        let mut violated_rules = Vec::new();
        if stage.face_found {
            // ~72 bpm with a small second harmonic
            let sample = (2.0 * std::f64::consts::PI * 1.2 * t).sin()
                + 0.3 * (2.0 * std::f64::consts::PI * 2.4 * t).sin();
            if self.wave.len() == WAVE_BUFFER_LEN {
                self.wave.pop_front();
            }
            self.wave.push_back(sample);
        } else {
            violated_rules.push("No Face Detected".to_string());
        }

        let checks: serde_json::Map<String, Value> = CHECK_KEYS
            .iter()
            .enumerate()
            .map(|(i, k)| (k.to_string(), Value::Bool(i < stage.checks_done)))
            .collect();

        let full = self.scale.full_scale();
        let score = round2(stage.score * full);
        let band = 0.1 * full;
        let mut body = json!({
            "layer": "human",
            "confidence_interval": [round2((score - band).max(0.0)), round2((score + band).min(full))],
            "quality": if stage.face_found { 0.85 } else { 0.0 },
            "violated_rules": violated_rules,
            "prompt": stage.prompt,
            "rppg_wave": self.normalized_wave(),
            "checks": checks,
            "layer_scores": {
                "human_authenticity": score,
                "reality_consistency": round2(stage.score * 0.9 * full),
                "manipulation_risk": round2((1.0 - stage.score) * 0.5 * full),
            },
        });
        // Unit-scale engines publish `score`, percent-scale ones `trust_score`
        let key = match self.scale {
            ScoreScale::Unit => "score",
            ScoreScale::Percent => "trust_score",
        };
        body[key] = json!(score);
        body
    }

    /// Min-max normalized wave, empty until enough samples exist
    fn normalized_wave(&self) -> Vec<f64> {
        if self.wave.len() <= WAVE_MIN_SAMPLES {
            return Vec::new();
        }
        let min = self.wave.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.wave.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        self.wave.iter().map(|v| (v - min) / (max - min + 1e-6)).collect()
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Shared server state
pub struct AppState {
    pub engine: RwLock<SimEngine>,
}

/// Command acknowledgement
#[derive(Debug, Serialize)]
pub struct CommandAck {
    pub status: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub source: String,
    pub restarts: u64,
}

/// Create the simulated engine router
pub fn create_router(scale: ScoreScale) -> Router {
    let state = Arc::new(AppState {
        engine: RwLock::new(SimEngine::new(scale)),
    });

    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/video_feed", get(video_feed))
        .route("/upload_video", post(upload_video))
        .route("/reset_camera", post(reset_camera))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let engine = state.engine.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        source: engine.source().to_string(),
        restarts: engine.restarts(),
    })
}

/// Current snapshot
async fn stats(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut engine = state.engine.write().await;
    Json(engine.snapshot())
}

/// Placeholder MJPEG-style stream
async fn video_feed() -> Response {
    let frames = futures_util::stream::unfold(0u64, |n| async move {
        tokio::time::sleep(Duration::from_millis(FEED_FRAME_MS)).await;
        Some((Ok::<_, Infallible>(feed_frame(n)), n + 1))
    });

    (
        [(header::CONTENT_TYPE, "multipart/x-mixed-replace; boundary=frame")],
        Body::from_stream(frames),
    )
        .into_response()
}

/// One multipart part holding an SVG frame
fn feed_frame(n: u64) -> Vec<u8> {
    let svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"640\" height=\"480\">\
         <rect width=\"640\" height=\"480\" fill=\"#000\"/>\
         <text x=\"20\" y=\"40\" fill=\"#0ff\">SIMULATED FEED #{}</text></svg>",
        n
    );
    let mut part = b"--frame\r\nContent-Type: image/svg+xml\r\n\r\n".to_vec();
    part.extend_from_slice(svg.as_bytes());
    part.extend_from_slice(b"\r\n");
    part
}

/// Switch source to an uploaded file
async fn upload_video(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<CommandAck>, StatusCode> {
    let mut received: Option<(String, usize)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|_| StatusCode::BAD_REQUEST)? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        received = Some((name, data.len()));
    }

    let (name, size) = received.ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    tracing::info!("sim engine: received {} ({} bytes)", name, size);
    state.engine.write().await.restart(format!("temp_{}", name));

    Ok(Json(CommandAck {
        status: "Source switched".to_string(),
    }))
}

/// Switch back to the camera
async fn reset_camera(State(state): State<Arc<AppState>>) -> Json<CommandAck> {
    state.engine.write().await.restart(CAMERA_SOURCE);
    tracing::info!("sim engine: reset to camera");
    Json(CommandAck {
        status: "Reset to webcam".to_string(),
    })
}

/// Run the simulated engine
pub async fn run_server(addr: &str, scale: ScoreScale) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(scale);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Simulated engine running on {} ({} scale)", addr, scale);
    println!("  GET  /stats         - Status snapshot");
    println!("  GET  /video_feed    - Placeholder stream");
    println!("  POST /upload_video  - Switch to uploaded file");
    println!("  POST /reset_camera  - Switch to camera");
    println!("  GET  /health        - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
