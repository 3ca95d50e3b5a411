//! Slot Module
//!
//! The on-medium unit of storage. A store is a gap-free sequence of slots
//! starting at offset 0 and ending exactly at the backend size.
//!
//! ## Slot Format
//! ```text
//! ┌───────────┬──────────┬──────────┬──────────┬─────────────────┐
//! │ Magic (N) │ KeyLen   │   Key    │ ValueLen │      Value      │
//! │           │ (1/2/4)  │ (KeyLen) │ (1/2/4)  │   (ValueLen)    │
//! └───────────┴──────────┴──────────┴──────────┴─────────────────┘
//! ```
//!
//! - Length fields are little-endian, widths come from [`Config`](crate::Config)
//! - `KeyLen == 0` marks a free slot: no key bytes follow and `ValueLen`
//!   counts padding bytes whose contents are meaningless
//! - Occupied slots always carry a non-empty key and a non-empty value

mod codec;

pub use codec::{decode_header, decode_slot, encode_free, encode_pair, read_key, read_value};

use crate::config::Config;

/// Decoded lengths of one slot and where it sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotHeader {
    /// Offset of the magic header
    pub position: usize,
    /// Key length, 0 for a free slot
    pub key_len: usize,
    /// Value length, or padding length for a free slot
    pub value_len: usize,
}

impl SlotHeader {
    pub fn is_free(&self) -> bool {
        self.key_len == 0
    }

    /// Total bytes the slot occupies
    pub fn size(&self, config: &Config) -> usize {
        config.slot_size(self.key_len, self.value_len)
    }

    /// Offset one past the last byte of the slot
    pub fn end(&self, config: &Config) -> usize {
        self.position + self.size(config)
    }

    /// Offset of the first key byte
    pub fn key_offset(&self, config: &Config) -> usize {
        self.position + config.header_size() + config.key_len_width().bytes()
    }

    /// Offset of the first value byte
    pub fn value_offset(&self, config: &Config) -> usize {
        self.key_offset(config) + self.key_len + config.value_len_width().bytes()
    }
}
