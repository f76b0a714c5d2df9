//! Configuration file for ticket-board.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use ticket_board_core::BoardConfig;

pub mod keybindings;

pub use keybindings::{Action, KeyBindingsConfig, KeyContext, validate_keybindings_config};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Board layout, behaviour and animation.
    pub board: BoardConfig,
    /// Keybindings for the full-screen display.
    pub keybindings: KeyBindingsConfig,
}

impl Config {
    /// Reject configurations the display cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.board.validate().context("Invalid [board] configuration")?;
        validate_keybindings_config(&self.keybindings).context("Invalid [keybindings] configuration")?;
        Ok(())
    }
}

/// Returns the default configuration file path.
///
/// On Linux: `~/.config/ticket-board/config.toml`
/// On macOS: `~/Library/Application Support/ticket-board/config.toml`
/// On Windows: `%APPDATA%\ticket-board\config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ticket-board").join("config.toml"))
}

/// Load configuration from a TOML file.
///
/// # Returns
/// - `Ok(Some(config))` if the file exists and was successfully parsed
/// - `Ok(None)` if the file does not exist
/// - `Err(_)` if there was an error reading or parsing the file
pub fn load_config(path: Option<&Path>) -> Result<Option<Config>> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    if !config_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    Ok(Some(config))
}

/// Load and validate the configuration, falling back to defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    let config = load_config(path)?.unwrap_or_default();
    config.validate()?;
    Ok(config)
}

/// Generate default configuration as TOML string.
pub fn generate_default_config_toml() -> Result<String> {
    let toml_str =
        toml::to_string_pretty(&Config::default()).context("Failed to serialize default configuration")?;

    let header = r#"# ticket-board configuration
#
# [board]
# columns, rows     grid size; columns * rows tiles are visible at once
# max_digits        longest ticket number (1-9)
# auto_add          the advance key hands out sequential numbers
# auto_start        first number handed out in auto-add mode
#
# [board.tile]      margin, corner_radius (0 = square), shadow_offset
# [board.animation] tick_ms, slide_speed / slide_divisor, vertical_damping,
#                   settle_threshold, fade_iterations
#
# [keybindings]
# Each action can have multiple key bindings. Digits always type a number
# and cannot be bound.
#
# Supported key formats:
# - Single characters: "n", "q"
# - Special keys: "Enter", "Esc", "Tab", "Backspace", "Delete", "Space"
# - Modified keys: "Ctrl+c", "Alt+n"
#
# confirm/backspace/delete/quit apply while a number is being typed;
# advance/quit apply otherwise. Keys must be unique within each group.

"#;

    Ok(format!("{header}{toml_str}"))
}

/// Write the default configuration file.
pub fn init_config(output: Option<&Path>, force: bool) -> Result<()> {
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_config_path().ok_or_else(|| anyhow!("Could not determine config directory"))?,
    };

    write_config(&output_path, force)
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force && !confirm_overwrite(path)? {
        println!("Aborted.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = generate_default_config_toml()?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    println!("✓ Wrote configuration file: {}", path.display());
    println!("Edit it and restart ticket-board to apply changes.");

    Ok(())
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    print!("File already exists: {}\nOverwrite? [y/N]: ", path.display());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("ticket-board/config.toml"));
        }
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = load_config(Some(Path::new("/nonexistent/path/config.toml"))).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_generate_default_toml_is_valid() {
        let content = generate_default_config_toml().unwrap();
        assert!(content.starts_with("# ticket-board configuration"));
        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_board_table_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[board]\ncolumns = 3\nauto_add = true").unwrap();

        let config = load_config(Some(file.path())).unwrap().unwrap();
        assert_eq!(config.board.columns, 3);
        assert_eq!(config.board.rows, 4);
        assert!(config.board.auto_add);
        assert_eq!(config.keybindings, KeyBindingsConfig::default());
    }

    #[test]
    fn test_partial_keybindings_table_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[keybindings]\nquit = [\"q\"]").unwrap();

        let config = load_config(Some(file.path())).unwrap().unwrap();
        assert_eq!(config.keybindings.quit, vec!["q".to_string()]);
        assert_eq!(
            config.keybindings.confirm,
            KeyBindingsConfig::default().confirm
        );
        assert_eq!(config.keybindings.advance, vec!["Enter".to_string()]);
        assert_eq!(config.board, BoardConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_syntax() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[board\ncolumns = ").unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_invalid_board_rejected_on_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[board]\nrows = 0").unwrap();
        let err = load_or_default(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("rows"));
    }

    #[test]
    fn test_conflicting_keybindings_rejected_on_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[keybindings]
confirm = ["Enter"]
backspace = ["Backspace"]
delete = ["Enter"]
advance = ["Enter"]
quit = ["Esc"]"#
        )
        .unwrap();
        let err = load_or_default(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("multiple actions"));
    }

    #[test]
    fn test_init_config_writes_and_forces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init_config(Some(&path), false).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, generate_default_config_toml().unwrap());

        std::fs::write(&path, "# edited").unwrap();
        init_config(Some(&path), true).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            generate_default_config_toml().unwrap()
        );
    }
}
