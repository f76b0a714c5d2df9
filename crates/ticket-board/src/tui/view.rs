use ticket_board_core::{Board, BoardConfig, ConfigError};

use super::constants::FOOTER_HEIGHT;
use crate::config::{KeyBindingsConfig, KeyContext};

pub(super) struct Ui {
    pub(super) board: Board,
    pub(super) keybindings: KeyBindingsConfig,
    pub(super) should_quit: bool,
    /// Set by resizes and quit, which the engine does not track.
    redraw: bool,
}

impl Ui {
    pub(super) fn new(
        config: BoardConfig,
        keybindings: KeyBindingsConfig,
        width: u16,
        height: u16,
    ) -> Result<Self, ConfigError> {
        let (board_width, board_height) = Self::board_size(width, height);
        Ok(Self {
            board: Board::init(config, board_width, board_height)?,
            keybindings,
            should_quit: false,
            redraw: true,
        })
    }

    /// Board surface for a terminal of the given size, in cells.
    pub(super) fn board_size(width: u16, height: u16) -> (f64, f64) {
        (f64::from(width), f64::from(height.saturating_sub(FOOTER_HEIGHT)))
    }

    pub(super) fn key_context(&self) -> KeyContext {
        if self.board.has_preview() {
            KeyContext::Input
        } else {
            KeyContext::Board
        }
    }

    pub(super) fn resize(&mut self, width: u16, height: u16) {
        let (board_width, board_height) = Self::board_size(width, height);
        self.board.resize(board_width, board_height);
        self.redraw = true;
    }

    pub(super) fn tick(&mut self) {
        self.board.tick();
    }

    pub(super) fn quit(&mut self) {
        self.should_quit = true;
        self.redraw = true;
    }

    pub(super) fn take_dirty(&mut self) -> bool {
        let dirty = self.board.take_dirty() || self.redraw;
        self.redraw = false;
        dirty
    }
}
