//! Terminal presentation of the view-model
//!
//! Pure functions from view-model to text. Only display transforms happen
//! here: scale-to-percent conversion, rounding, and clamping bar widths.

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::core::checklist::verification_checklist;
use crate::core::waveform::{Waveform, AWAITING_SIGNAL};
use crate::types::{ChecklistItem, FeedSource, ScoreScale, ViewModel, LAYER_KEYS};
use crate::{TRUST_BAR_GOOD_PERCENT, VERSION};

/// Text shown in place of the stream while paused
pub const FROZEN_FEED: &str = "Video Feed Frozen for Signal Analysis";

/// Text shown when the reasoning trace is empty
pub const NO_VIOLATIONS: &str = "Scanning consistency layers...";

const TRUST_BAR_WIDTH: usize = 30;
const LAYER_BAR_WIDTH: usize = 20;

/// Inputs to rendering that are not part of the view-model
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub stream_url: String,
    pub scale: ScoreScale,
    pub now: DateTime<Utc>,
}

/// Derived frame for machine-readable output
#[derive(Debug, Serialize)]
pub struct Frame<'a> {
    pub view: &'a ViewModel,
    pub score_percent: f64,
    pub feed: FeedSource,
    pub awaiting_signal: bool,
    pub waveform_bars: usize,
    pub checklist: Vec<ChecklistItem>,
    pub toast: Option<&'a str>,
}

/// Build the machine-readable frame
pub fn frame<'a>(view: &'a ViewModel, ctx: &RenderContext) -> Frame<'a> {
    let waveform = Waveform::from_samples(&view.rppg_wave);
    Frame {
        view,
        score_percent: round1(ctx.scale.to_percent(view.trust_score)),
        feed: view.feed(&ctx.stream_url),
        awaiting_signal: waveform.is_awaiting(),
        waveform_bars: waveform.len(),
        checklist: verification_checklist(&view.checks),
        toast: view.visible_toast(ctx.now),
    }
}

/// Round to one decimal place
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Percentage text, whole numbers without decimals
pub fn format_percent(v: f64) -> String {
    let r = round1(v);
    if r.fract() == 0.0 {
        format!("{:.0}%", r)
    } else {
        format!("{:.1}%", r)
    }
}

/// Fixed-width bar; fill is clamped to 0-100
pub fn bar(percent: f64, width: usize) -> String {
    let p = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 };
    let filled = ((p / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Human label for a layer key
pub fn layer_label(key: &str) -> String {
    key.split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the full dashboard screen
pub fn render(view: &ViewModel, ctx: &RenderContext) -> String {
    let mut out = Vec::new();

    // Header
    let status = if view.is_paused {
        "ANALYSIS MODE".yellow().bold()
    } else {
        "ACTIVE".green().bold()
    };
    out.push(format!("{}  SYSTEM: {}", format!("SENTINEL DASH v{}", VERSION).bold(), status));
    out.push("─".repeat(60));

    // Feed + overlay
    match view.feed(&ctx.stream_url) {
        FeedSource::Live(url) => out.push(format!("FEED     {} {}", "● LIVE".green(), url)),
        FeedSource::Frozen => out.push(format!("FEED     {}", FROZEN_FEED.dimmed().italic())),
    }
    if view.verified {
        out.push(format!("         {}", "[ ✓ VERIFIED ]".black().on_green().bold()));
    }
    out.push(format!("PROMPT   {}", view.prompt.cyan().bold()));

    // Waveform
    let waveform = Waveform::from_samples(&view.rppg_wave);
    if waveform.is_awaiting() {
        out.push(format!("rPPG     {}", AWAITING_SIGNAL.dimmed().italic()));
    } else {
        out.push(format!("rPPG     {} ({} samples)", waveform.sparkline().cyan(), waveform.len()));
    }
    out.push(String::new());

    // Trust judgment
    let pct = ctx.scale.to_percent(view.trust_score);
    let trust_bar = if pct > TRUST_BAR_GOOD_PERCENT {
        bar(pct, TRUST_BAR_WIDTH).green()
    } else {
        bar(pct, TRUST_BAR_WIDTH).red()
    };
    let mut trust_line = format!("TRUST    {} {}", format_percent(pct).bold(), trust_bar);
    if let Some([lo, hi]) = view.confidence_interval {
        trust_line.push_str(&format!(
            "  CI {}-{}",
            format_percent(ctx.scale.to_percent(lo)),
            format_percent(ctx.scale.to_percent(hi))
        ));
    }
    if let Some(q) = view.quality {
        trust_line.push_str(&format!("  quality {}", format_percent(q * 100.0)));
    }
    out.push(trust_line);
    if let Some(layer) = &view.layer {
        out.push(format!("LAYER    {}", layer));
    }

    // Layer scores
    out.push("LAYERS".to_string());
    for key in LAYER_KEYS {
        let label = format!("{:<20}", layer_label(key));
        match view.layer_scores.get(key) {
            Some(v) => {
                let p = ctx.scale.to_percent(*v);
                let b = bar(p, LAYER_BAR_WIDTH);
                let b = match key {
                    "human_authenticity" => b.cyan(),
                    "reality_consistency" => b.magenta(),
                    _ => b.red(),
                };
                out.push(format!("  {} {:>6} {}", label, format_percent(p), b));
            }
            None => out.push(format!("  {} {:>6}", label, "--")),
        }
    }

    // Checklist
    out.push("CHECKLIST".to_string());
    let items = verification_checklist(&view.checks);
    let row: Vec<String> = items
        .iter()
        .map(|i| {
            let text = format!("{} {}", i.icon, i.label);
            if i.done {
                format!("{} {}", "✔".green(), text.green())
            } else {
                format!("{} {}", "·".dimmed(), text.dimmed())
            }
        })
        .collect();
    out.push(format!("  {}", row.join("   ")));

    // Reasoning trace
    out.push("REASONING TRACE".to_string());
    if view.violated_rules.is_empty() {
        out.push(format!("  {}", NO_VIOLATIONS.dimmed().italic()));
    } else {
        for rule in &view.violated_rules {
            out.push(format!("  {} {}", "⚠".red(), rule.red()));
        }
    }

    out.push(String::new());
    if view.is_uploading {
        out.push(format!("{}", "⟳ Uploading video...".yellow()));
    }
    if let Some(msg) = view.visible_toast(ctx.now) {
        out.push(format!("{}", format!("✘ {}", msg).white().on_red()));
    }
    let pause_hint = if view.is_paused { "p resume scan" } else { "p stop & analyze" };
    out.push(
        format!("keys: {} | u <file> upload | r reset camera | q quit", pause_hint)
            .dimmed()
            .to_string(),
    );

    out.join("\n")
}
