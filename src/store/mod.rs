//! Store Module
//!
//! The key-value store over a backend: lifecycle, insertion, search and
//! iteration.
//!
//! ## Responsibilities
//! - Format a backend as one free region (`prepare`)
//! - Insert pairs by first-fit split of free slots, appending when none fits
//! - Linear search and forward iteration with resumable cursors
//! - Verify the slot tiling and repair a damaged tail
//!
//! No decoded state is cached: every operation re-reads the backend.
//! There is no internal locking; callers sharing a store across threads
//! must hold one exclusive lock for the duration of each operation.

mod check;
mod cursor;
mod iter;
mod put;

pub use check::{RecoveryResult, StoreStats};
pub use cursor::{Cursor, CursorState};
pub use iter::{Entries, Entry};

use tracing::debug;

use crate::backend::Backend;
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::slot;

/// Key-value store bound to a backend and a slot layout
pub struct Store<B: Backend> {
    /// Storage medium
    backend: B,

    /// Slot layout, fixed for the lifetime of the store
    config: Config,
}

impl<B: Backend> Store<B> {
    /// Bind a backend and layout. Performs no I/O.
    pub fn new(backend: B, config: Config) -> Self {
        Self { backend, config }
    }

    /// Bind a backend using the default layout
    pub fn with_defaults(backend: B) -> Self {
        Self::new(backend, Config::default())
    }

    /// Format the backend as empty
    ///
    /// Writes free slots spanning the whole backend, normally a single one.
    /// When the value-length field is too narrow to describe the padding,
    /// the range is tiled by a chain of free slots instead.
    ///
    /// Destructive: any existing pairs become unreachable.
    pub fn prepare(&mut self) -> Result<()> {
        let size = self.backend.size();
        debug!(size, "Preparing empty store");
        self.fill_free(0, size)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current backend size in bytes
    pub fn size(&self) -> usize {
        self.backend.size()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Cover `start..end` with free slots
    fn fill_free(&mut self, start: usize, end: usize) -> Result<()> {
        let overhead = self.config.overhead();
        let max_chunk = overhead.saturating_add(self.config.max_value_len());

        if start == end {
            return Ok(());
        }
        if end - start < overhead {
            return Err(StoreError::StorageFull {
                position: start,
                needed: overhead,
                size: self.backend.size(),
            });
        }

        let mut position = start;
        while position < end {
            let remaining = end - position;
            let chunk = if remaining <= max_chunk {
                remaining
            } else if remaining - max_chunk >= overhead {
                max_chunk
            } else {
                // Leave exactly one empty free slot for the tail
                remaining - overhead
            };

            let padding = chunk.checked_sub(overhead).ok_or_else(|| StoreError::StorageFull {
                position,
                needed: overhead,
                size: self.backend.size(),
            })?;
            slot::encode_free(&mut self.backend, &self.config, position, padding)?;
            position += chunk;
        }

        Ok(())
    }
}
