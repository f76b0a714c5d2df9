use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::constants::WINDOW_TITLE;

/// Runs its closure exactly once, when dropped.
pub(super) struct RestoreGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> RestoreGuard<F> {
    pub(super) const fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

/// Put the terminal into raw mode on the alternate screen.
///
/// The returned guard undoes every step when dropped, including when a
/// later step of the setup fails.
pub(super) fn enter_terminal() -> Result<(RestoreGuard<fn()>, Terminal<CrosstermBackend<Stdout>>)> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let guard = RestoreGuard::new(restore_terminal as fn());

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(WINDOW_TITLE))
        .context("failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).context("failed to create terminal")?;
    terminal.hide_cursor().context("failed to hide cursor")?;
    Ok((guard, terminal))
}

fn restore_terminal() {
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen, Show).ok();
}
