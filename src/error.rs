// error.rs - Error types for configuration and effect lifecycle
//
// Everything here is recoverable: the wasm layer logs these and falls back
// to a static (or empty) frame instead of surfacing them to the page.

use std::fmt;

/// Rejected effect configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Tunnel ring count must be at least one.
    NoRings,
    /// Tunnel ring count above the supported maximum.
    TooManyRings { count: u32, max: u32 },
    /// A length that must be strictly positive and finite was not.
    NonPositive { field: &'static str, value: f32 },
    /// A finite value fell outside its allowed range.
    OutOfRange { field: &'static str, value: f32 },
    /// JSON override could not be parsed.
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoRings => write!(f, "tunnel needs at least one ring"),
            ConfigError::TooManyRings { count, max } => {
                write!(f, "tunnel supports at most {} rings, got {}", max, count)
            }
            ConfigError::OutOfRange { field, value } => write!(f, "{} out of range, got {}", field, value),
            ConfigError::NonPositive { field, value } => {
                write!(f, "{} must be positive and finite, got {}", field, value)
            }
            ConfigError::Parse(msg) => write!(f, "invalid effect config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure while mounting an effect.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectError {
    Config(ConfigError),
    /// A capability the effect needs is missing (no window, no frame clock...).
    Unsupported(&'static str),
    /// The host environment refused an operation.
    Host(String),
}

impl From<ConfigError> for EffectError {
    fn from(err: ConfigError) -> Self {
        EffectError::Config(err)
    }
}

impl fmt::Display for EffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectError::Config(e) => write!(f, "config error: {}", e),
            EffectError::Unsupported(what) => write!(f, "unsupported environment: {}", what),
            EffectError::Host(msg) => write!(f, "host error: {}", msg),
        }
    }
}

impl std::error::Error for EffectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EffectError::Config(e) => Some(e),
            _ => None,
        }
    }
}
