//! # SlotKV
//!
//! An embedded key-value store for RAM buffers, flash regions and files:
//! - Variable-length pairs packed back to back with no external index
//! - First-fit reuse of free space by splitting free slots
//! - Resumable cursors for search and forward iteration
//! - Pluggable storage medium through the [`Backend`] trait
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                                │
//! │        put / search / search_next / advance / get            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Slot Codec                              │
//! │       [Magic][KeyLen][Key][ValueLen][Value] at an offset     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ MemBackend  │          │ FileBackend │
//!   │   (RAM)     │          │   (File)    │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use slotkv::{MemBackend, Store};
//!
//! let mut store = Store::with_defaults(MemBackend::fixed(256));
//! store.prepare().unwrap();
//! store.put(b"hello", b"world").unwrap();
//!
//! let cursor = store.search(b"hello").unwrap();
//! assert_eq!(&store.value_at(&cursor).unwrap()[..], b"world");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod backend;
pub mod slot;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use backend::{Backend, FileBackend, MemBackend};
pub use config::{Config, LengthWidth};
pub use error::{Result, StoreError};
pub use store::{Cursor, CursorState, Entry, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SlotKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
