//! Error types for script construction

use thiserror::Error;

/// Error type for building script statements
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A regex in an expect or interpretation failed to compile
    #[error("regex compile failed: {0}")]
    BadRegex(#[from] regex::Error),

    /// A capture-group back-reference is out of range
    #[error("capture position {0} exceeds limit {1}")]
    BadCapturePos(usize, usize),
}

/// Result type for script construction
pub type Result<T> = std::result::Result<T, ScriptError>;
