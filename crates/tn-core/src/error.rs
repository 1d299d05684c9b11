//! Configuration error type.
//!
//! Sub-crates define their own error enums (`NetworkError`, `ControlError`);
//! this one only covers what `tn-core` itself can reject.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("base weight bounds [{min}, {max}] are empty or start at zero")]
    WeightBounds { min: u32, max: u32 },

    #[error("congestion factor range [{min}, {max}) must be non-empty and start at or above 1.0")]
    FactorRange { min: f64, max: f64 },
}

/// Shorthand result type for `tn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
