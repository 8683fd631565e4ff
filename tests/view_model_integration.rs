//! Integration tests for the view-model path
//!
//! Tests the full path: snapshot JSON → merge → waveform / checklist / overlay → render

use std::collections::BTreeMap;

use chrono::Utc;
use pretty_assertions::assert_eq;
use sentinel_dash::core::checklist::project;
use sentinel_dash::core::overlay::evaluate;
use sentinel_dash::core::{merge, render, verification_checklist, RenderContext, Waveform};
use sentinel_dash::types::{ScoreScale, Snapshot, ThresholdConfig, ViewModel, VERIFICATION_STEPS};

fn ctx(scale: ScoreScale) -> RenderContext {
    colored::control::set_override(false);
    RenderContext {
        stream_url: "http://localhost:8000/video_feed".into(),
        scale,
        now: Utc::now(),
    }
}

#[test]
fn test_scanning_snapshot_into_default_view() {
    let body = br#"{
        "trust_score": 85,
        "layer_scores": {"human_authenticity": 90, "reality_consistency": 80, "manipulation_risk": 20},
        "violated_rules": [],
        "prompt": "SCANNING",
        "rppg_wave": [0.1, 0.2, 0.9]
    }"#;
    let snap = Snapshot::from_json(body).unwrap();
    let vm = merge(&ViewModel::new(), &snap);

    assert_eq!(vm.trust_score, 85.0);
    assert_eq!(vm.prompt, "SCANNING");
    assert!(vm.violated_rules.is_empty());
    assert_eq!(vm.rppg_wave, vec![0.1, 0.2, 0.9]);
    let expected: BTreeMap<String, f64> = [
        ("human_authenticity".to_string(), 90.0),
        ("reality_consistency".to_string(), 80.0),
        ("manipulation_risk".to_string(), 20.0),
    ]
    .into_iter()
    .collect();
    assert_eq!(vm.layer_scores, expected);

    match Waveform::from_samples(&vm.rppg_wave) {
        Waveform::Bars(bars) => {
            let rounded: Vec<f64> = bars.iter().map(|b| b.round()).collect();
            assert_eq!(rounded, vec![10.0, 20.0, 90.0]);
        }
        Waveform::AwaitingSignal => panic!("expected three bars"),
    }

    let screen = render(&vm, &ctx(ScoreScale::Percent));
    assert!(screen.contains("85%"));
    assert!(screen.contains("SCANNING"));
    assert!(screen.contains("(3 samples)"));
}

#[test]
fn test_latest_value_per_field_across_partials() {
    let payloads: [&[u8]; 4] = [
        br#"{"trust_score": 10, "prompt": "Align Face & Hold Still...", "violated_rules": ["No Face Detected"]}"#,
        br#"{"prompt": "Calibrating Sensors...", "violated_rules": []}"#,
        br#"{"trust_score": 30, "checks": {"calibrated": true}}"#,
        br#"{"quality": 0.8}"#,
    ];

    let vm = payloads
        .iter()
        .map(|p| Snapshot::from_json(p).unwrap())
        .fold(ViewModel::new(), |vm, s| merge(&vm, &s));

    assert_eq!(vm.trust_score, 30.0);
    assert_eq!(vm.prompt, "Calibrating Sensors...");
    assert!(vm.violated_rules.is_empty());
    assert_eq!(vm.quality, Some(0.8));
    assert_eq!(vm.checks.get("calibrated"), Some(&true));
}

#[test]
fn test_payload_with_both_score_keys_still_merges() {
    let body = br#"{"score": 0.75, "trust_score": 75, "prompt": "ACTION: Smile", "checks": {"calibrated": true}}"#;
    let snap = Snapshot::from_json(body).unwrap();
    let vm = merge(&ViewModel::new(), &snap);

    assert_eq!(vm.trust_score, 75.0);
    assert_eq!(vm.prompt, "ACTION: Smile");
    assert_eq!(vm.checks.get("calibrated"), Some(&true));
}

#[test]
fn test_checklist_from_single_flag() {
    let snap = Snapshot::from_json(br#"{"checks": {"calibrated": true}}"#).unwrap();
    let vm = merge(&ViewModel::new(), &snap);
    let done: Vec<bool> = verification_checklist(&vm.checks).iter().map(|i| i.done).collect();
    assert_eq!(done, vec![true, false, false, false]);
}

#[test]
fn test_checklist_custom_step_subset() {
    let checks: BTreeMap<String, bool> = [("smiled".to_string(), true)].into_iter().collect();
    let items = project(&checks, &VERIFICATION_STEPS[2..]);
    assert_eq!(items.len(), 2);
    assert!(items[0].done);
    assert_eq!(items[1].label, "Blink");
}

#[test]
fn test_waveform_window_never_exceeds_limit() {
    for len in [0usize, 1, 99, 100, 101, 150, 1000] {
        let samples = vec![0.5; len];
        let w = Waveform::from_samples(&samples);
        assert!(w.len() <= sentinel_dash::WAVEFORM_WINDOW);
        assert_eq!(w.is_awaiting(), len == 0);
    }
}

#[test]
fn test_threshold_scales_configured_not_detected() {
    let percent = ThresholdConfig::for_scale(ScoreScale::Percent);
    let unit = ThresholdConfig::for_scale(ScoreScale::Unit);

    assert!(!evaluate(&percent, 97.9, false));
    assert!(evaluate(&percent, 98.0, false));
    // A unit-scale score read with a percent threshold never verifies
    assert!(!evaluate(&percent, 0.98, false));
    assert!(evaluate(&unit, 0.98, false));
}

#[test]
fn test_render_default_view_does_not_fail() {
    for scale in [ScoreScale::Percent, ScoreScale::Unit] {
        let screen = render(&ViewModel::new(), &ctx(scale));
        assert!(screen.contains("INITIALIZING..."));
        assert!(screen.contains("Calibration"));
    }
}
