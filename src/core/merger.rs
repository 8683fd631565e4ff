//! View-model merger
//!
//! Shallow merge: each field present in the snapshot replaces the whole
//! field in the view-model, absent fields are kept. Nested maps such as
//! `layer_scores` are replaced, never merged key by key.

use crate::types::{Snapshot, ViewModel};

/// Produce the next view-model from the current one and a snapshot
///
/// Pure: neither input is modified.
pub fn merge(current: &ViewModel, snapshot: &Snapshot) -> ViewModel {
    let mut next = current.clone();

    if let Some(score) = snapshot.trust_score {
        next.trust_score = score;
    }
    if let Some(layer) = &snapshot.layer {
        next.layer = Some(layer.clone());
    }
    if let Some(scores) = &snapshot.layer_scores {
        next.layer_scores = scores.clone();
    }
    if let Some(ci) = snapshot.confidence_interval {
        next.confidence_interval = Some(ci);
    }
    if let Some(quality) = snapshot.quality {
        next.quality = Some(quality);
    }
    if let Some(rules) = &snapshot.violated_rules {
        next.violated_rules = rules.clone();
    }
    if let Some(prompt) = &snapshot.prompt {
        next.prompt = prompt.clone();
    }
    if let Some(wave) = &snapshot.rppg_wave {
        next.rppg_wave = wave.clone();
    }
    if let Some(checks) = &snapshot.checks {
        next.checks = checks.clone();
    }

    next
}
