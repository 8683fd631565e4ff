//! Status snapshot as published by the scoring engine
//!
//! Every field is optional: the engine may send a partial payload, and only
//! the fields that are present overwrite the view-model.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Layer score keys in display order
pub const LAYER_KEYS: [&str; 3] = [
    "human_authenticity",
    "reality_consistency",
    "manipulation_risk",
];

/// One status payload from the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireSnapshot")]
pub struct Snapshot {
    /// Overall judgment; older engines call this `score`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_score: Option<f64>,
    /// Which scoring layer produced this snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// Named sub-scores, replaced as a whole on merge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_scores: Option<BTreeMap<String, f64>>,
    /// Confidence band around the score, same scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_interval: Option<[f64; 2]>,
    /// Signal quality index (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    /// Reasoning trace in evaluation order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violated_rules: Option<Vec<String>>,
    /// Instruction or status text for the subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Normalized biosignal samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rppg_wave: Option<Vec<f64>>,
    /// Verification step flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checks: Option<BTreeMap<String, bool>>,
}

/// Payload as it arrives; some engines send `score`, some `trust_score`, some both
#[derive(Deserialize)]
struct WireSnapshot {
    #[serde(default)]
    trust_score: Option<f64>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    layer: Option<String>,
    #[serde(default)]
    layer_scores: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    confidence_interval: Option<[f64; 2]>,
    #[serde(default)]
    quality: Option<f64>,
    #[serde(default)]
    violated_rules: Option<Vec<String>>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    rppg_wave: Option<Vec<f64>>,
    #[serde(default)]
    checks: Option<BTreeMap<String, bool>>,
}

impl From<WireSnapshot> for Snapshot {
    fn from(wire: WireSnapshot) -> Self {
        Self {
            // `trust_score` wins when both are present
            trust_score: wire.trust_score.or(wire.score),
            layer: wire.layer,
            layer_scores: wire.layer_scores,
            confidence_interval: wire.confidence_interval,
            quality: wire.quality,
            violated_rules: wire.violated_rules,
            prompt: wire.prompt,
            rppg_wave: wire.rppg_wave,
            checks: wire.checks,
        }
    }
}

impl Snapshot {
    /// Parse a raw status body
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// True when the payload carried no recognised field
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_engine_payload() {
        let body = br#"{
            "layer": "human",
            "score": 0.75,
            "confidence_interval": [0.65, 0.85],
            "quality": 0.9,
            "violated_rules": [],
            "prompt": "ACTION: Blink Eyes",
            "rppg_wave": [0.0, 0.5, 1.0],
            "checks": {"calibrated": true, "turned": true, "smiled": true, "blinked": false}
        }"#;
        let snap = Snapshot::from_json(body).unwrap();
        assert_eq!(snap.trust_score, Some(0.75));
        assert_eq!(snap.layer.as_deref(), Some("human"));
        assert_eq!(snap.confidence_interval, Some([0.65, 0.85]));
        assert_eq!(snap.checks.unwrap().get("blinked"), Some(&false));
    }

    #[test]
    fn test_partial_payload_leaves_fields_absent() {
        let snap = Snapshot::from_json(br#"{"prompt": "SCANNING"}"#).unwrap();
        assert_eq!(snap.prompt.as_deref(), Some("SCANNING"));
        assert!(snap.trust_score.is_none());
        assert!(snap.layer_scores.is_none());
    }

    #[test]
    fn test_null_counts_as_absent() {
        let snap = Snapshot::from_json(br#"{"quality": null, "trust_score": 12}"#).unwrap();
        assert!(snap.quality.is_none());
        assert_eq!(snap.trust_score, Some(12.0));
    }

    #[test]
    fn test_both_score_keys_keep_the_rest() {
        let body = br#"{"score": 0.75, "trust_score": 75, "prompt": "ACTION: Smile", "checks": {"calibrated": true}}"#;
        let snap = Snapshot::from_json(body).unwrap();
        assert_eq!(snap.trust_score, Some(75.0));
        assert_eq!(snap.prompt.as_deref(), Some("ACTION: Smile"));
        assert_eq!(snap.checks.unwrap().get("calibrated"), Some(&true));
    }

    #[test]
    fn test_score_alone_fills_trust_score() {
        let snap = Snapshot::from_json(br#"{"score": null, "trust_score": 40}"#).unwrap();
        assert_eq!(snap.trust_score, Some(40.0));
        let snap = Snapshot::from_json(br#"{"score": 0.4}"#).unwrap();
        assert_eq!(snap.trust_score, Some(0.4));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let snap = Snapshot::from_json(br#"{"fps": 30}"#).unwrap();
        assert!(snap.is_empty());
    }

    #[test]
    fn test_wrong_shape_is_error() {
        assert!(Snapshot::from_json(br#"{"rppg_wave": "flat"}"#).is_err());
        assert!(Snapshot::from_json(b"<html>").is_err());
    }
}
