//! Tunable parameters of the display engine.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for `max_digits`; keeps every ticket number inside `u32`.
pub const MAX_SUPPORTED_DIGITS: u32 = 9;

/// Everything the engine needs to know about the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Tiles per row.
    pub columns: usize,
    /// Rows of tiles.
    pub rows: usize,
    /// Longest ticket number, in digits.
    pub max_digits: u32,
    /// Whether the advance key supplies ticket numbers automatically.
    pub auto_add: bool,
    /// First number handed out by the auto-add counter.
    pub auto_start: u32,
    /// Tile appearance.
    pub tile: TileStyle,
    /// Animation timing.
    pub animation: AnimationConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: 5,
            rows: 4,
            max_digits: 2,
            auto_add: false,
            auto_start: 0,
            tile: TileStyle::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Number of visible slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    /// `10^max_digits`, the wrap point of ticket numbers.
    #[must_use]
    pub const fn number_space(&self) -> u32 {
        10u32.pow(self.max_digits)
    }

    /// Reject settings the engine cannot run with.
    ///
    /// # Errors
    /// Returns the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::EmptyGrid { field: "columns" });
        }
        if self.rows == 0 {
            return Err(ConfigError::EmptyGrid { field: "rows" });
        }
        if self.max_digits == 0 || self.max_digits > MAX_SUPPORTED_DIGITS {
            return Err(ConfigError::MaxDigits(self.max_digits));
        }
        if self.tile.margin < 0.0 || !self.tile.margin.is_finite() {
            return Err(ConfigError::Negative { field: "tile.margin" });
        }
        if self.tile.shadow_offset < 0.0 || !self.tile.shadow_offset.is_finite() {
            return Err(ConfigError::Negative {
                field: "tile.shadow_offset",
            });
        }
        self.animation.validate()
    }
}

/// Tile appearance parameters handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileStyle {
    /// Gap around each tile inside its grid cell.
    pub margin: f64,
    /// Corner rounding; `0` draws square tiles.
    pub corner_radius: u16,
    /// Offset of the drop shadow.
    pub shadow_offset: f64,
}

impl Default for TileStyle {
    fn default() -> Self {
        Self {
            margin: 1.0,
            corner_radius: 1,
            shadow_offset: 1.0,
        }
    }
}

/// Timing and easing constants of the slide and fade animations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Milliseconds between animation ticks.
    pub tick_ms: u64,
    /// Numerator of the per-tick slide fraction.
    pub slide_speed: f64,
    /// Denominator of the per-tick slide fraction.
    pub slide_divisor: f64,
    /// Extra factor applied to vertical movement (`< 1` settles slower).
    pub vertical_damping: f64,
    /// Remaining distance on both axes at which a slide snaps to its target.
    pub settle_threshold: f64,
    /// Ticks a fade is split into.
    pub fade_iterations: u8,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            slide_speed: 2.0,
            slide_divisor: 10.0,
            vertical_damping: 0.7,
            settle_threshold: 0.5,
            fade_iterations: 40,
        }
    }
}

impl AnimationConfig {
    /// Fraction of the remaining horizontal distance covered per tick.
    #[must_use]
    pub fn slide_rate(&self) -> f64 {
        self.slide_speed / self.slide_divisor
    }

    /// Reject constants that would never settle or would overshoot.
    ///
    /// # Errors
    /// Returns the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        let rate = self.slide_rate();
        if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
            return Err(ConfigError::SlideRate(rate));
        }
        if !(self.vertical_damping > 0.0 && self.vertical_damping <= 1.0) {
            return Err(ConfigError::VerticalDamping(self.vertical_damping));
        }
        if !self.settle_threshold.is_finite() || self.settle_threshold <= 0.0 {
            return Err(ConfigError::SettleThreshold(self.settle_threshold));
        }
        if self.fade_iterations == 0 {
            return Err(ConfigError::FadeIterations);
        }
        Ok(())
    }
}
