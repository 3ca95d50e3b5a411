//! Error types for SlotKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for SlotKV operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    /// Rejected before any backend access
    #[error("Bad argument: {0}")]
    BadArgument(String),

    #[error("Buffer too small: need {needed} bytes, capacity is {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },

    // -------------------------------------------------------------------------
    // Slot Format Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt slot at offset {position}: {reason}")]
    Corrupt { position: usize, reason: String },

    /// A decode was attempted exactly at the end of the backend.
    ///
    /// The slot sequence has no terminator, so this is how every scan that
    /// runs off the last slot ends.
    #[error("End of store reached at offset {position}")]
    EndOfStore { position: usize },

    // -------------------------------------------------------------------------
    // Capacity Errors
    // -------------------------------------------------------------------------
    #[error("Storage full: slot of {needed} bytes at offset {position} exceeds backend size {size}")]
    StorageFull {
        position: usize,
        needed: usize,
        size: usize,
    },

    /// No free slot fits the pair and the backend refused to grow
    #[error("No space left for the key-value pair")]
    NoSpace,

    // -------------------------------------------------------------------------
    // Backend Errors
    // -------------------------------------------------------------------------
    #[error("Backend range {position}+{len} out of bounds (size {size})")]
    OutOfRange {
        position: usize,
        len: usize,
        size: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// True for errors that mean the slot sequence could not be parsed
    ///
    /// `EndOfStore` is not corruption: it ends every scan that finds nothing.
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }

    pub(crate) fn corrupt(position: usize, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            position,
            reason: reason.into(),
        }
    }
}
