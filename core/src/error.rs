//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or resolving a viewer configuration.
///
/// Runtime operations never fail; only construction can be rejected.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("grid needs at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: u32, cols: u32 },

    #[error("grid of {rows}x{cols} frames exceeds the maximum of {max}")]
    GridTooLarge { rows: u32, cols: u32, max: u32 },

    #[error("amount {amount} does not match {rows} rows x {cols} columns")]
    AmountMismatch { amount: u32, rows: u32, cols: u32 },

    #[error("drag speed must be a positive number (got {0})")]
    InvalidDragSpeed(f64),

    #[error("autoplay speed must be a positive number (got {0})")]
    InvalidSpeed(f64),

    #[error("index zero base {got} exceeds the maximum of {max}")]
    IndexZeroBase { got: u32, max: u32 },

    #[error("aspect ratio must be a positive number (got {0})")]
    InvalidRatio(f64),

    #[error("magnifier zoom must be a positive number (got {0})")]
    InvalidMagnifier(f64),

    #[error("hint offset must be a non-negative number (got {0})")]
    InvalidHintOffset(f64),
}
