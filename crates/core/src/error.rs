//! Error types for the particle-net core.
//!
//! The animation path itself never fails: frames degrade to drawing nothing.
//! These errors cover construction-time input (permutation tables, config,
//! colors) and snapshot I/O.

use thiserror::Error;

/// Errors produced by particle-net operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero where a non-empty raster is required.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A noise permutation table was not a bijection on 0..=255.
    #[error("invalid permutation table: {0}")]
    InvalidPermutation(String),

    /// A configuration value was out of range or not finite.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Snapshot encoding or file write failed.
    #[error("i/o error: {0}")]
    Io(String),
}
