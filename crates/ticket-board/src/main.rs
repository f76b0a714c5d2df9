//! CLI entry point for ticket-board.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use config::Config;

mod config;
mod replay;
mod tui;

/// Full-screen board of ticket numbers, typed in from the keyboard.
#[derive(Parser, Debug)]
#[command(
    name = "ticket-board",
    version,
    about = "ticket-board: a full-screen display of queued ticket numbers"
)]
struct Cli {
    /// Configuration file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write log events of the full-screen display to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the full-screen display.
    Run {
        /// Tiles per row.
        #[arg(long)]
        columns: Option<usize>,
        /// Rows of tiles.
        #[arg(long)]
        rows: Option<usize>,
        /// Hand out sequential numbers on the advance key.
        #[arg(long)]
        auto_add: bool,
    },

    /// Feed a key script through the engine and print the settled board.
    Replay {
        /// Digits type, '+' confirms, '<' erases, 'x' deletes, '>' advances.
        #[arg(long)]
        keys: String,
        /// Display width in cells.
        #[arg(long, default_value_t = 100)]
        width: u16,
        /// Display height in cells.
        #[arg(long, default_value_t = 40)]
        height: u16,
        /// Tiles per row.
        #[arg(long)]
        columns: Option<usize>,
        /// Rows of tiles.
        #[arg(long)]
        rows: Option<usize>,
        /// Hand out sequential numbers on Enter.
        #[arg(long)]
        auto_add: bool,
    },

    /// Write the default configuration file.
    InitConfig {
        /// Destination (defaults to the platform config path).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overwrite without asking.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let Cli {
        config,
        log_file,
        cmd,
    } = Cli::parse();

    install_tracing();
    execute_command(config.as_deref(), log_file.as_deref(), cmd)
}

fn execute_command(config_path: Option<&Path>, log_file: Option<&Path>, command: Command) -> Result<()> {
    match command {
        Command::Run {
            columns,
            rows,
            auto_add,
        } => {
            let config = load_with_overrides(config_path, columns, rows, auto_add)?;
            info!(
                columns = config.board.columns,
                rows = config.board.rows,
                "starting display"
            );
            tui::run(config.board, config.keybindings, log_file)
        }

        Command::Replay {
            keys,
            width,
            height,
            columns,
            rows,
            auto_add,
        } => {
            let config = load_with_overrides(config_path, columns, rows, auto_add)?;
            let steps = replay::parse_script(&keys)?;
            let report = replay::replay(config.board, width, height, &steps)?;
            println!("{report}");
            Ok(())
        }

        Command::InitConfig { output, force } => config::init_config(output.as_deref(), force),
    }
}

fn load_with_overrides(
    path: Option<&Path>,
    columns: Option<usize>,
    rows: Option<usize>,
    auto_add: bool,
) -> Result<Config> {
    let mut config = config::load_or_default(path)?;
    if let Some(columns) = columns {
        config.board.columns = columns;
    }
    if let Some(rows) = rows {
        config.board.rows = rows;
    }
    if auto_add {
        config.board.auto_add = true;
    }
    config.validate()?;
    Ok(config)
}

fn install_tracing() {
    // RUST_LOG overrides the default INFO level.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
