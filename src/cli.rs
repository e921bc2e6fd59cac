//! Command-line front end

use crate::config::VisualizerConfig;
use crate::engine::Snapshot;
use crate::error::AppError;
use crate::operation::codegen;
use crate::playback::{PlaybackController, SystemClock};
use crate::script::Script;
use crate::stats;
use crate::trace;
use crate::ui;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "dsviz",
    about = "Step through data-structure operations one micro-step at a time",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON configuration file layered over the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for dsviz targets (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Write logs here instead of stderr; the player discards logs without it
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Playback speed multiplier applied to every step duration
    #[arg(long, global = true)]
    pub speed: Option<f64>,

    /// Auto-play interval in milliseconds
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the terminal player
    Play { script: PathBuf },

    /// Print the recorded trace as JSON
    Trace {
        script: PathBuf,
        #[arg(long)]
        pretty: bool,
    },

    /// Print the generated pseudo-code
    Code { script: PathBuf },

    /// Print stats after the operation at an index (default: the last one)
    Stats {
        script: PathBuf,
        #[arg(long)]
        at: Option<usize>,
    },
}

impl Commands {
    fn script(&self) -> &Path {
        match self {
            Commands::Play { script }
            | Commands::Trace { script, .. }
            | Commands::Code { script }
            | Commands::Stats { script, .. } => script,
        }
    }
}

pub fn run_from_env() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    run(cli)
}

/// Install the global tracing subscriber for this invocation
pub fn init_logging(cli: &Cli) -> Result<(), AppError> {
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(format!("dsviz={}", level)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dsviz=info")),
    };
    let interactive = matches!(cli.command, Commands::Play { .. });
    let writer = match &cli.log_file {
        Some(path) => BoxMakeWriter::new(Mutex::new(File::create(path)?)),
        None if interactive => BoxMakeWriter::new(io::sink),
        None => BoxMakeWriter::new(io::stderr),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(cli.log_file.is_none() && !interactive)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}

/// Defaults, then `--config`, then flag overrides
pub fn load_config(cli: &Cli) -> Result<VisualizerConfig, AppError> {
    let mut config = match &cli.config {
        Some(path) => VisualizerConfig::load(path)?,
        None => VisualizerConfig::default(),
    };
    if let Some(speed) = cli.speed {
        config.playback.speed = speed;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.playback.auto_play_interval_ms = interval_ms;
    }
    Ok(config)
}

pub fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(&cli)?;
    let (kind, log) = Script::load(cli.command.script())?.into_log();
    info!(structure = %kind, operations = log.len(), "script loaded");

    match cli.command {
        Commands::Play { .. } => {
            let controller = PlaybackController::with_log(kind, log, config, SystemClock::new());
            ui::run(controller)?;
        }
        Commands::Trace { pretty, .. } => {
            let timing = config.timing.clone().with_speed(config.playback.speed);
            let trace = trace::record(kind, log.operations(), &timing);
            println!("{}", trace.to_json(pretty)?);
        }
        Commands::Code { .. } => {
            println!("{}", codegen::generate(kind, log.operations()).text());
        }
        Commands::Stats { at, .. } => {
            let len = log.len();
            let controller = PlaybackController::with_log(kind, log, config, SystemClock::new());
            let stats = match (at, len.checked_sub(1)) {
                (None, None) => stats::derive(&Snapshot::empty(kind)),
                (index, last) => {
                    let index = index.or(last).unwrap_or(0);
                    controller
                        .get_step_state(index)
                        .ok_or(AppError::IndexOutOfRange { index, len })?
                        .stats
                }
            };
            print!("{}", stats);
        }
    }
    Ok(())
}
