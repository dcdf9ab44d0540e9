//! Application initialization error types

use spin360_core::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid viewer configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Event loop error: {0}")]
    EventLoop(String),
}
