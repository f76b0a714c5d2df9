//! Keybindings configuration for the board display.

#![allow(clippy::uninlined_format_args, clippy::enum_glob_use, clippy::unused_self)]

use anyhow::{Context as _, Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

macro_rules! vec_of_strings {
    ($($s:expr),* $(,)?) => {
        vec![$($s.to_string()),*]
    };
}

/// Keys for every non-digit action. Digits are always typed literally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindingsConfig {
    /// Confirm the typed number.
    pub confirm: Vec<String>,
    /// Drop the last typed digit.
    pub backspace: Vec<String>,
    /// Remove the typed number from the queue.
    pub delete: Vec<String>,
    /// Launch the next auto-add number.
    pub advance: Vec<String>,
    /// Leave the display.
    pub quit: Vec<String>,
}

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self {
            confirm: vec_of_strings!["Enter"],
            backspace: vec_of_strings!["Backspace"],
            delete: vec_of_strings!["Delete"],
            advance: vec_of_strings!["Enter"],
            quit: vec_of_strings!["Esc", "Ctrl+c"],
        }
    }
}

/// Where keys are being interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// A number is being typed into the preview.
    Input,
    /// No preview is open.
    Board,
}

/// Action a configured key triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Confirm the typed number.
    Confirm,
    /// Drop the last typed digit.
    Backspace,
    /// Remove the typed number from the queue.
    Delete,
    /// Launch the next auto-add number.
    Advance,
    /// Leave the display.
    Quit,
}

/// Parse a key string into a `KeyEvent`.
///
/// # Examples
/// - "x" -> `KeyCode::Char('x')`
/// - "Enter" -> `KeyCode::Enter`
/// - "Ctrl+c" -> `KeyCode::Char('c')` with CONTROL modifier
pub fn parse_key(s: &str) -> Result<KeyEvent> {
    let parts: Vec<&str> = s.split('+').collect();

    let mut modifiers = KeyModifiers::NONE;
    let (key_part, modifier_parts) = parts
        .split_last()
        .ok_or_else(|| anyhow!("Empty key string"))?;
    for &modifier in modifier_parts {
        match modifier {
            "Ctrl" | "Control" => modifiers |= KeyModifiers::CONTROL,
            "Alt" => modifiers |= KeyModifiers::ALT,
            "Shift" => modifiers |= KeyModifiers::SHIFT,
            other => bail!("Unknown modifier: {}", other),
        }
    }

    let code = parse_key_code(key_part)?;

    Ok(KeyEvent::new(code, modifiers))
}

fn parse_key_code(s: &str) -> Result<KeyCode> {
    match s {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Delete" => Ok(KeyCode::Delete),
        "Insert" => Ok(KeyCode::Insert),
        "Tab" => Ok(KeyCode::Tab),
        "Space" => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        s if s.chars().count() == 1 => {
            let ch = s.chars().next().ok_or_else(|| anyhow!("Empty char"))?;
            Ok(KeyCode::Char(ch))
        }
        other => bail!("Unknown key: {}", other),
    }
}

/// Validate the keybindings configuration.
///
/// Checks for:
/// - Empty key bindings
/// - Invalid key expressions
/// - Digits bound to an action
/// - Key conflicts within each context
pub fn validate_keybindings_config(config: &KeyBindingsConfig) -> Result<()> {
    validate_non_empty_bindings(config)?;
    validate_key_expressions(config)?;
    validate_no_digit_bindings(config)?;
    validate_keybindings(config)?;
    Ok(())
}

fn validate_non_empty_bindings(config: &KeyBindingsConfig) -> Result<()> {
    macro_rules! check_non_empty {
        ($field:expr, $name:expr) => {
            if $field.is_empty() {
                bail!("{} must have at least one key binding", $name);
            }
        };
    }

    check_non_empty!(config.confirm, "keybindings.confirm");
    check_non_empty!(config.backspace, "keybindings.backspace");
    check_non_empty!(config.delete, "keybindings.delete");
    check_non_empty!(config.advance, "keybindings.advance");
    check_non_empty!(config.quit, "keybindings.quit");

    Ok(())
}

fn validate_key_expressions(config: &KeyBindingsConfig) -> Result<()> {
    for (name, keys) in all_bindings(config) {
        for key in keys {
            parse_key(key).with_context(|| format!("Invalid key '{}' in keybindings.{}", key, name))?;
        }
    }
    Ok(())
}

fn validate_no_digit_bindings(config: &KeyBindingsConfig) -> Result<()> {
    for (name, keys) in all_bindings(config) {
        for key in keys {
            let event = parse_key(key)?;
            if let KeyCode::Char(ch) = event.code
                && ch.is_ascii_digit()
                && event.modifiers == KeyModifiers::NONE
            {
                bail!(
                    "Digit '{}' cannot be bound to keybindings.{}; digits always type a number",
                    key,
                    name
                );
            }
        }
    }
    Ok(())
}

fn validate_keybindings(config: &KeyBindingsConfig) -> Result<()> {
    validate_context_keybindings("input", collect_bindings(config, KeyContext::Input))?;
    validate_context_keybindings("board", collect_bindings(config, KeyContext::Board))?;
    Ok(())
}

fn validate_context_keybindings(context_name: &str, bindings: HashMap<&str, &[String]>) -> Result<()> {
    let mut key_to_actions: HashMap<KeyEvent, Vec<&str>> = HashMap::new();

    for (action, keys) in bindings {
        for key in keys {
            key_to_actions.entry(parse_key(key)?).or_default().push(action);
        }
    }

    for (key, mut actions) in key_to_actions {
        if actions.len() > 1 {
            actions.sort_unstable();
            bail!(
                "Key {:?} is bound to multiple actions in the {} context: {:?}",
                key.code,
                context_name,
                actions
            );
        }
    }

    Ok(())
}

fn all_bindings(config: &KeyBindingsConfig) -> [(&'static str, &[String]); 5] {
    [
        ("confirm", config.confirm.as_slice()),
        ("backspace", config.backspace.as_slice()),
        ("delete", config.delete.as_slice()),
        ("advance", config.advance.as_slice()),
        ("quit", config.quit.as_slice()),
    ]
}

fn collect_bindings(config: &KeyBindingsConfig, context: KeyContext) -> HashMap<&'static str, &[String]> {
    let mut bindings = HashMap::new();
    for action in KeyBindingsConfig::actions(context) {
        bindings.insert(action_name(*action), config.get_keys(*action));
    }
    bindings
}

const fn action_name(action: Action) -> &'static str {
    match action {
        Action::Confirm => "confirm",
        Action::Backspace => "backspace",
        Action::Delete => "delete",
        Action::Advance => "advance",
        Action::Quit => "quit",
    }
}

impl KeyBindingsConfig {
    /// Actions that are live in `context`.
    pub const fn actions(context: KeyContext) -> &'static [Action] {
        match context {
            KeyContext::Input => &[Action::Confirm, Action::Backspace, Action::Delete, Action::Quit],
            KeyContext::Board => &[Action::Advance, Action::Quit],
        }
    }

    /// Help line for the footer.
    pub fn generate_help_text(&self, context: KeyContext, auto_add: bool) -> String {
        match context {
            KeyContext::Input if auto_add => format!(
                "0-9:type {}:undo {}:remove {}:quit",
                self.format_first_key(&self.backspace),
                self.format_first_key(&self.delete),
                self.format_first_key(&self.quit),
            ),
            KeyContext::Input => format!(
                "0-9:type {}:add {}:undo {}:remove {}:quit",
                self.format_first_key(&self.confirm),
                self.format_first_key(&self.backspace),
                self.format_first_key(&self.delete),
                self.format_first_key(&self.quit),
            ),
            KeyContext::Board if auto_add => format!(
                "0-9:type {}:next {}:quit",
                self.format_first_key(&self.advance),
                self.format_first_key(&self.quit),
            ),
            KeyContext::Board => format!("0-9:type {}:quit", self.format_first_key(&self.quit)),
        }
    }

    fn format_first_key(&self, keys: &[String]) -> String {
        keys.first()
            .map_or_else(|| "?".to_string(), |k| self.format_key_display(k))
    }

    fn format_key_display(&self, key: &str) -> String {
        match key {
            "Enter" => "↵".to_string(),
            "Backspace" => "BS".to_string(),
            "Delete" => "Del".to_string(),
            "PageUp" => "PgUp".to_string(),
            "PageDown" => "PgDn".to_string(),
            other if other.starts_with("Ctrl+") || other.starts_with("Alt+") => other.replace('+', "-"),
            other => other.to_string(),
        }
    }

    /// Check if a key event matches a configured action.
    pub fn matches(&self, context: KeyContext, action: Action, key: &KeyEvent) -> bool {
        if !Self::actions(context).contains(&action) {
            return false;
        }
        self.get_keys(action)
            .iter()
            .filter_map(|key_str| parse_key(key_str).ok())
            .any(|expected| Self::key_event_matches(&expected, key))
    }

    fn key_event_matches(expected: &KeyEvent, actual: &KeyEvent) -> bool {
        expected.code == actual.code && expected.modifiers == actual.modifiers
    }

    fn get_keys(&self, action: Action) -> &[String] {
        use Action::*;

        match action {
            Confirm => &self.confirm,
            Backspace => &self.backspace,
            Delete => &self.delete,
            Advance => &self.advance,
            Quit => &self.quit,
        }
    }
}
