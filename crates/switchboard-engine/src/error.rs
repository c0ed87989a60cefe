//! Engine error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by device and manager configuration
#[derive(Debug, Error)]
pub enum EngineError {
    /// A device with this name is already registered
    #[error("duplicate device: {0}")]
    DuplicateDevice(String),

    /// Plug configuration failure
    #[error(transparent)]
    Plug(#[from] crate::plug::PlugError),
}
