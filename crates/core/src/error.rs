//! Error types for table reconstruction.
//!
//! Only configuration can fail: geometry that yields nothing is a valid
//! outcome, and degenerate input is normalized away rather than rejected.

use thiserror::Error;

/// Settings validation failure, surfaced before any geometry work runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("unknown table strategy `{0}` (expected lines, lines_strict, text, or explicit)")]
    UnknownStrategy(String),

    #[error("`{option}` must be a non-negative finite number, got {value}")]
    Tolerance { option: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, SettingsError>;
