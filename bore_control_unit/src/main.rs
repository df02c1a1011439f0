//! # Bore Control Unit
//!
//! Runs the sequence controller against the simulated rig from `bore_hal`.
//!
//! Loads one TOML document (see [`bore_control_unit::config`]), builds the
//! simulated rig from its `[simulation]` table, discovers the rig, restores
//! the persisted state and enters the tick loop. The loop ends after
//! `--ticks` ticks or on Ctrl-C; the final state is persisted either way.

use clap::Parser;
use bore_common::config::LogLevel;
use bore_common::consts::{DEFAULT_CONFIG_PATH, DEFAULT_STATE_FILE};
use bore_common::rig::host::StatusSink;
use bore_control_unit::command::parse_command;
use bore_control_unit::config::{load_config, LoadedConfig};
use bore_control_unit::cycle::{CommandSchedule, CycleRunner};
use bore_control_unit::display::{JsonStatusSink, StatusBoard};
use bore_control_unit::persist::FileStateStore;
use bore_control_unit::state::SequenceController;
use bore_hal::SimRig;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Bore Control Unit: autonomous bore rig sequencing
#[derive(Parser, Debug)]
#[command(name = "bore_control_unit")]
#[command(version)]
#[command(about = "Autonomous sequencing controller for a piston bore rig")]
struct Args {
    /// Path to the TOML configuration.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// File holding the persisted state tag.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    /// Stop after this many ticks (default: run until Ctrl-C).
    #[arg(long)]
    ticks: Option<u64>,

    /// Command argument delivered with the first tick (start|stop|moveup|reset).
    #[arg(long)]
    command: Option<String>,

    /// Command delivered on a given tick, e.g. `--at 120=reset`. Repeatable.
    #[arg(long = "at", value_name = "TICK=CMD")]
    at: Vec<String>,

    /// Pace ticks in wall-clock time.
    #[arg(long)]
    realtime: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,

    /// Print one JSON status line per tick on stdout (logs go to stderr).
    /// The JSON stream becomes the primary status display.
    #[arg(long)]
    status_json: bool,
}

fn main() {
    let args = Args::parse();
    let loaded = load_config(&args.config);
    let level = loaded
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("Bore Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|loaded| run(&args, loaded));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Bore Control Unit shutdown complete");
}

fn run(args: &Args, loaded: LoadedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let LoadedConfig {
        shared,
        bore,
        simulation,
    } = loaded;
    info!(
        service = %shared.service_name,
        group = %bore.rig.group_name,
        tick_ms = bore.rig.tick_interval_ms,
        "Config OK"
    );

    let mut schedule = CommandSchedule::from_entries(args.at.iter().map(String::as_str))?;
    if let Some(command) = args.command.as_deref().and_then(parse_command) {
        schedule.insert(1, command);
    }

    let mut rig = SimRig::new(simulation);
    let controller = SequenceController::discover(bore.clone(), &mut rig);

    let json = args
        .status_json
        .then(|| Box::new(JsonStatusSink::new(std::io::stdout())) as Box<dyn StatusSink>);
    let board = StatusBoard::with_displays(bore.features.multi_display, json);

    let store = FileStateStore::new(&args.state_file);
    let mut runner = CycleRunner::new(controller, rig, board, Box::new(store))
        .with_schedule(schedule)
        .with_realtime(args.realtime);

    // Setup signal handler for graceful shutdown.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let summary = runner.run(args.ticks, &running);
    let rig = runner.plant();
    info!(
        ticks = summary.ticks,
        state = %summary.final_state,
        persisted = summary.persisted,
        bore_depth = rig.bore_depth(),
        forward = rig.forward_extension(),
        free_fraction = rig.free_fraction(),
        "Run summary"
    );
    Ok(())
}

fn setup_tracing(args: &Args, level: LogLevel) {
    let directive: Directive = if args.verbose {
        Level::DEBUG.into()
    } else {
        level
            .as_directive()
            .parse()
            .unwrap_or_else(|_| Level::INFO.into())
    };

    let filter = EnvFilter::from_default_env().add_directive(directive);

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
