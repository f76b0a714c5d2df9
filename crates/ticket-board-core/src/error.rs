//! Error types for engine configuration

/// Invalid [`BoardConfig`](crate::BoardConfig) setting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A grid dimension is zero
    #[error("{field} must be at least 1")]
    EmptyGrid {
        /// Offending field
        field: &'static str,
    },

    /// Digit count outside the supported range
    #[error("max_digits must be between 1 and 9, got {0}")]
    MaxDigits(u32),

    /// A length that must not be negative
    #[error("{field} must be a non-negative number")]
    Negative {
        /// Offending field
        field: &'static str,
    },

    /// Animation ticks would never fire
    #[error("animation.tick_ms must be at least 1")]
    ZeroTick,

    /// Slide fraction would stall or overshoot
    #[error("animation.slide_speed / animation.slide_divisor must be in (0, 1], got {0}")]
    SlideRate(f64),

    /// Vertical damping outside (0, 1]
    #[error("animation.vertical_damping must be in (0, 1], got {0}")]
    VerticalDamping(f64),

    /// Slides could never settle
    #[error("animation.settle_threshold must be positive, got {0}")]
    SettleThreshold(f64),

    /// Fades would never progress
    #[error("animation.fade_iterations must be at least 1")]
    FadeIterations,
}
