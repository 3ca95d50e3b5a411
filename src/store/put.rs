//! Insertion
//!
//! First-fit allocation over the slot sequence: the first free slot large
//! enough to hold the pair plus a trailing empty free slot is split; when
//! none exists the pair is appended at the end of the backend.

use tracing::debug;

use crate::backend::Backend;
use crate::error::{Result, StoreError};
use crate::slot;

use super::Store;

impl<B: Backend> Store<B> {
    /// Store a key-value pair
    ///
    /// Keys are not deduplicated: putting an existing key adds another slot
    /// and searches return whichever comes first in scan order.
    ///
    /// A free slot is only reused if the remainder can hold a free slot of
    /// its own, so a free slot exactly the size of the new pair is skipped.
    ///
    /// Returns `NoSpace` when no free slot fits and the backend cannot grow.
    ///
    /// ## Known limitation
    /// Splitting takes two backend writes. The trailing free slot is written
    /// first, while the old free slot header still spans the region, then the
    /// pair. This keeps the tiling intact if the second write never happens,
    /// provided each single backend write is atomic. On media that can tear a
    /// single write, an interrupted put can leave unparsable bytes behind the
    /// pair; `recover` reclaims them as free space.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.config.validate_pair(key, value)?;

        let needed = self.config.slot_size(key.len(), value.len());
        let required = needed + self.config.overhead();
        let size = self.backend.size();

        let mut position = 0;
        while position < size {
            let header = slot::decode_header(&self.backend, &self.config, position)?;
            let slot_size = header.size(&self.config);

            if !header.is_free() || slot_size < required {
                position += slot_size;
                continue;
            }

            // Split: remainder first, then the pair over the old header
            let padding = slot_size - needed - self.config.overhead();
            slot::encode_free(&mut self.backend, &self.config, position + needed, padding)?;
            slot::encode_pair(&mut self.backend, &self.config, position, key, value)?;

            debug!(position, slot_size = needed, remaining = slot_size - needed, "Split free slot");
            return Ok(());
        }

        match slot::encode_pair(&mut self.backend, &self.config, position, key, value) {
            Ok(()) => {
                debug!(position, slot_size = needed, "Appended slot past end of store");
                Ok(())
            }
            Err(StoreError::StorageFull { .. }) | Err(StoreError::OutOfRange { .. }) => {
                debug!(position, slot_size = needed, "No space for pair");
                Err(StoreError::NoSpace)
            }
            Err(e) => Err(e),
        }
    }
}
