use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::trace;

use ticket_board_core::KeyInput;

use super::view::Ui;
use crate::config::{Action, KeyContext};

impl Ui {
    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let context = self.key_context();
        if self.keybindings.matches(context, Action::Quit, &key) {
            self.quit();
            return;
        }

        if let Some(input) = self.decode_key(context, &key) {
            let outcome = self.board.handle_key(input);
            trace!(?input, ?outcome, "key handled");
            return;
        }

        if self.keybindings.matches(context, Action::Advance, &key) {
            if self.board.auto_add_enabled() {
                self.board.advance();
            } else {
                trace!("advance key ignored; auto-add is off");
            }
        }
    }

    /// Map a physical key to an engine key. Digits type themselves in every
    /// context; the remaining engine keys only exist while typing.
    fn decode_key(&self, context: KeyContext, key: &KeyEvent) -> Option<KeyInput> {
        if let KeyCode::Char(c) = key.code
            && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            && let Some(digit) = KeyInput::digit(c)
        {
            return Some(digit);
        }

        [
            (Action::Confirm, KeyInput::Enter),
            (Action::Backspace, KeyInput::Backspace),
            (Action::Delete, KeyInput::Delete),
        ]
        .into_iter()
        .find(|(action, _)| self.keybindings.matches(context, *action, key))
        .map(|(_, input)| input)
    }
}
