//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for the agora workspace.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgoraError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
