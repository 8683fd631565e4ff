//! Sentinel Dash CLI
//!
//! Usage:
//!   sentinel-dash                                   # Dashboard against http://localhost:8000
//!   sentinel-dash --engine-url http://host:8000     # Dashboard against another engine
//!   sentinel-dash --score-scale percent             # Engine publishes 0-100 scores
//!   sentinel-dash --json                            # JSON frame per change
//!   sentinel-dash --simulate --addr 127.0.0.1:8000  # Run the simulated engine

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};

use sentinel_dash::core::{frame, render, run_server, Command, Dashboard, RenderContext};
use sentinel_dash::types::{DashboardConfig, EngineError, ScoreScale};
use sentinel_dash::VERSION;

const REDRAW_MS: u64 = 500;

#[derive(Parser, Debug)]
#[command(
    name = "sentinel-dash",
    version = VERSION,
    about = "Sentinel Dash - live view of a biometric trust-scoring engine",
    long_about = "Sentinel Dash polls a trust-scoring engine for status snapshots and\n\
                  renders the trust judgment, layer scores, rPPG pulse, verification\n\
                  checklist and reasoning trace in the terminal.\n\n\
                  Keys (type and press Enter):\n  \
                  p          - Stop & analyze / resume scan\n  \
                  u <file>   - Upload a video file as the engine source\n  \
                  r          - Reset the engine to its camera\n  \
                  q          - Quit"
)]
struct Args {
    /// Engine base URL (default: http://localhost:8000)
    #[arg(long)]
    engine_url: Option<String>,

    /// Poll interval in milliseconds (100-1000, default: 200)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Scale the engine publishes scores on
    #[arg(long, value_enum)]
    score_scale: Option<ScoreScale>,

    /// Score at which the VERIFIED overlay turns on
    #[arg(long)]
    verified_threshold: Option<f64>,

    /// Score below which a shown overlay turns off (enables hysteresis)
    #[arg(long)]
    exit_threshold: Option<f64>,

    /// Drop poll responses that resolve after a newer one
    #[arg(long)]
    strict_ordering: bool,

    /// Record the session as JSON lines into this directory
    #[arg(long)]
    record: Option<PathBuf>,

    /// JSON config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON frames instead of the screen
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Run the simulated engine instead of the dashboard
    #[arg(short, long)]
    simulate: bool,

    /// Simulated engine address (default: 127.0.0.1:8000)
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args);

    if args.no_color {
        colored::control::set_override(false);
    }

    if args.simulate {
        run_simulate(&args).await;
        return;
    }

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error [{}] {}: {}", e.code(), e.description(), e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run_dashboard(config, &args).await {
        error!("[{}] {}: {}", e.code(), e.description(), e);
        eprintln!("Dashboard error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so the screen on stdout stays clean
fn init_logging(args: &Args) {
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else if args.simulate {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(!args.no_color)
        .init();
}

/// File config first, then flag overrides
fn build_config(args: &Args) -> Result<DashboardConfig, EngineError> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };

    if let Some(url) = &args.engine_url {
        config.engine_url = url.clone();
    }
    if let Some(ms) = args.interval_ms {
        config.interval_ms = ms;
    }
    if let Some(scale) = args.score_scale {
        config = config.with_scale(scale);
    }
    if let Some(enter) = args.verified_threshold {
        config.threshold.enter = enter;
    }
    if let Some(exit) = args.exit_threshold {
        config.threshold.exit = Some(exit);
    }
    if args.strict_ordering {
        config.strict_ordering = true;
    }
    if let Some(dir) = &args.record {
        config.record_dir = Some(dir.clone());
    }

    Ok(config.validated())
}

/// Run the dashboard until quit, stdin error, or Ctrl-C
async fn run_dashboard(config: DashboardConfig, args: &Args) -> Result<(), EngineError> {
    let mut dash = Dashboard::new(config)?;
    dash.mount();
    draw(&dash, args.json);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut redraw = tokio::time::interval(Duration::from_millis(REDRAW_MS));

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match Command::parse(&line) {
                    Some(command) => {
                        if !dash.handle_command(command) {
                            break;
                        }
                        draw(&dash, args.json);
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!("unknown command: {}", line.trim()),
                },
                // Keep polling without input, e.g. when stdin is /dev/null
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!("stdin closed: {}", e);
                    stdin_open = false;
                }
            },
            Some(event) = dash.next_event() => {
                if dash.apply(event) {
                    draw(&dash, args.json);
                }
            }
            _ = redraw.tick(), if !args.json => draw(&dash, false),
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    dash.unmount();
    Ok(())
}

/// Print the current view-model
fn draw(dash: &Dashboard, json: bool) {
    let ctx = RenderContext {
        stream_url: dash.config().video_feed_url(),
        scale: dash.config().threshold.scale,
        now: Utc::now(),
    };

    let mut stdout = std::io::stdout();
    if json {
        match serde_json::to_string(&frame(dash.view(), &ctx)) {
            Ok(line) => {
                let _ = writeln!(stdout, "{}", line);
            }
            Err(e) => warn!("frame serialization failed: {}", e),
        }
    } else {
        let _ = write!(stdout, "\x1b[2J\x1b[H{}\n", render(dash.view(), &ctx));
    }
    let _ = stdout.flush();
}

/// Run the simulated engine (blocks until the server exits)
async fn run_simulate(args: &Args) {
    let scale = args.score_scale.unwrap_or_default();
    println!();
    println!("Sentinel Dash v{} - simulated engine", VERSION);
    println!();

    if let Err(e) = run_server(&args.addr, scale).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
