//! Error types for the interface runtime

use kraken_core::PropertyError;
use thiserror::Error;

/// API misuse reported by [`UiRuntimeContext`](crate::UiRuntimeContext)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterfaceError {
    #[error("block handle does not refer to a live block")]
    StaleBlock,

    #[error("button handle does not refer to a live button")]
    StaleButton,

    #[error("block '{0}' has already ended")]
    BlockEnded(String),

    #[error("button store slot is not registered")]
    StaleSlot,

    #[error("property access failed: {0}")]
    Property(#[from] PropertyError),
}

/// Result type for interface operations
pub type Result<T> = std::result::Result<T, InterfaceError>;
