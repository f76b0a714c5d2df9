use std::fs::{File, OpenOptions};
use std::io::Stdout;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CrosstermEvent};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::subscriber::NoSubscriber;
use tracing_subscriber::EnvFilter;

use ticket_board_core::BoardConfig;

use crate::config::KeyBindingsConfig;

mod constants;
mod handlers;
mod terminal;
mod ui;
mod view;
mod widgets;

use self::view::Ui;

/// Launch the full-screen display.
///
/// Log events go to `log_file` when given and are discarded otherwise, so
/// they never draw over the board.
pub fn run(config: BoardConfig, keybindings: KeyBindingsConfig, log_file: Option<&Path>) -> Result<()> {
    let log_file = log_file.map(open_log_file).transpose()?;

    let (guard, mut terminal) = terminal::enter_terminal()?;

    let event_loop = || run_event_loop(&mut terminal, config, keybindings);
    let result = match log_file {
        Some(file) => tracing::subscriber::with_default(file_subscriber(file), event_loop),
        None => tracing::subscriber::with_default(NoSubscriber::default(), event_loop),
    };

    drop(terminal);
    drop(guard);
    result
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file: {}", path.display()))
}

fn file_subscriber(file: File) -> impl tracing::Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(Arc::new(file))
        .finish()
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: BoardConfig,
    keybindings: KeyBindingsConfig,
) -> Result<()> {
    let size = terminal.size().context("failed to query terminal size")?;
    let tick_rate = Duration::from_millis(config.animation.tick_ms);
    let mut ui = Ui::new(config, keybindings, size.width, size.height)?;
    let mut last_tick = Instant::now();

    loop {
        if ui.take_dirty() {
            terminal.draw(|f| ui.draw(f))?;
        }
        if ui.should_quit {
            break;
        }

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();

        if event::poll(timeout)? {
            match event::read()? {
                CrosstermEvent::Key(key) => ui.handle_key(key),
                CrosstermEvent::Resize(width, height) => ui.resize(width, height),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            ui.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
