//! Verification and recovery
//!
//! Walks the slot sequence to confirm it tiles the whole backend, and
//! repairs a store whose tail no longer parses (for example after a put was
//! interrupted on a medium that tears writes).

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::{Result, StoreError};
use crate::slot;

use super::Store;

/// Summary of a full walk over the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Backend size in bytes
    pub size: usize,
    /// Occupied slots
    pub occupied: usize,
    /// Free slots
    pub free_slots: usize,
    /// Bytes held by occupied slots, headers included
    pub live_bytes: usize,
    /// Bytes held by free slots, headers included
    pub free_bytes: usize,
    /// Size of the largest free slot
    pub largest_free: usize,
}

/// Result of a recovery pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of slots that parsed before the damage
    pub slots_recovered: usize,

    /// Offset where parsing failed, `None` if the store was intact
    pub damaged_at: Option<usize>,

    /// Bytes rewritten as free space
    pub bytes_reclaimed: usize,
}

impl RecoveryResult {
    pub fn was_repaired(&self) -> bool {
        self.damaged_at.is_some()
    }
}

impl<B: Backend> Store<B> {
    /// Walk every slot and confirm they tile `[0, size())` exactly
    pub fn check(&self) -> Result<StoreStats> {
        let size = self.backend.size();
        let mut stats = StoreStats {
            size,
            ..StoreStats::default()
        };

        let mut position = 0;
        while position < size {
            let header = slot::decode_header(&self.backend, &self.config, position)?;
            let slot_size = header.size(&self.config);

            if header.is_free() {
                stats.free_slots += 1;
                stats.free_bytes += slot_size;
                stats.largest_free = stats.largest_free.max(slot_size);
            } else {
                stats.occupied += 1;
                stats.live_bytes += slot_size;
            }
            position += slot_size;
        }

        debug!(?stats, "Store check passed");
        Ok(stats)
    }

    /// Rewrite everything after the last parsable slot as free space
    ///
    /// Slots before the damage are left untouched. Fails with `Corrupt` if
    /// the damaged tail is too short to hold even an empty free slot.
    pub fn recover(&mut self) -> Result<RecoveryResult> {
        let size = self.backend.size();
        let mut result = RecoveryResult::default();

        let mut position = 0;
        while position < size {
            match slot::decode_header(&self.backend, &self.config, position) {
                Ok(header) => {
                    result.slots_recovered += 1;
                    position = header.end(&self.config);
                }
                Err(e) if e.is_corruption() => {
                    warn!(position, error = %e, "Unparsable slot, reclaiming tail");
                    result.damaged_at = Some(position);
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(start) = result.damaged_at {
            if size - start < self.config.overhead() {
                return Err(StoreError::corrupt(
                    start,
                    "damaged tail too short to hold a free slot",
                ));
            }
            self.fill_free(start, size)?;
            result.bytes_reclaimed = size - start;
        }

        Ok(result)
    }
}
