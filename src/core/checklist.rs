//! Checklist projection
//!
//! Mirrors the engine's `checks` flags onto a fixed step order. No
//! transitions are enforced here; a flag that regresses is shown as it is.

use std::collections::BTreeMap;
use crate::types::{ChecklistItem, ChecklistStep, VERIFICATION_STEPS};

/// Project flags onto the given steps; missing keys are not done
pub fn project(checks: &BTreeMap<String, bool>, steps: &[ChecklistStep]) -> Vec<ChecklistItem> {
    steps
        .iter()
        .map(|step| ChecklistItem {
            label: step.label.to_string(),
            icon: step.icon.to_string(),
            done: checks.get(step.key).copied().unwrap_or(false),
        })
        .collect()
}

/// Project flags onto the standard verification steps
pub fn verification_checklist(checks: &BTreeMap<String, bool>) -> Vec<ChecklistItem> {
    project(checks, &VERIFICATION_STEPS)
}

/// Count of completed steps
pub fn completed(items: &[ChecklistItem]) -> usize {
    items.iter().filter(|i| i.done).count()
}
