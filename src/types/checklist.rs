//! Verification checklist definitions

use serde::{Deserialize, Serialize};

/// One expected verification step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistStep {
    /// Key in the engine's `checks` map
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Steps in the order the engine walks through them
pub const VERIFICATION_STEPS: [ChecklistStep; 4] = [
    ChecklistStep { key: "calibrated", label: "Calibration", icon: "◎" },
    ChecklistStep { key: "turned", label: "Head Turn", icon: "↩" },
    ChecklistStep { key: "smiled", label: "Smile", icon: "☺" },
    ChecklistStep { key: "blinked", label: "Blink", icon: "◉" },
];

/// Display row for one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    pub icon: String,
    pub done: bool,
}
