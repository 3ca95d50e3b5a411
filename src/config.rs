//! Configuration for SlotKV
//!
//! The slot layout constants: field widths, header magic and key bound.
//! A store written with one configuration cannot be read with another,
//! so a `Config` is bound once when the store is constructed.

use crate::error::{Result, StoreError};

/// Default magic pattern marking the start of every slot
pub const DEFAULT_MAGIC: [u8; 4] = [0xf8, 0x2a, 0x93, 0x11];

/// Default maximum key length in bytes
pub const DEFAULT_MAX_KEY_SIZE: usize = 16;

/// Width of an on-medium length field (stored little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthWidth {
    U8,
    U16,
    U32,
}

impl LengthWidth {
    /// Number of bytes the field occupies
    pub const fn bytes(self) -> usize {
        match self {
            LengthWidth::U8 => 1,
            LengthWidth::U16 => 2,
            LengthWidth::U32 => 4,
        }
    }

    /// Largest length the field can encode
    pub const fn max_value(self) -> usize {
        match self {
            LengthWidth::U8 => u8::MAX as usize,
            LengthWidth::U16 => u16::MAX as usize,
            LengthWidth::U32 => u32::MAX as usize,
        }
    }

    /// Append `len` to `out` in this width. Caller guarantees it fits.
    pub(crate) fn put(self, out: &mut impl bytes::BufMut, len: usize) {
        match self {
            LengthWidth::U8 => out.put_u8(len as u8),
            LengthWidth::U16 => out.put_u16_le(len as u16),
            LengthWidth::U32 => out.put_u32_le(len as u32),
        }
    }

    /// Parse a field of this width from the front of `raw`
    pub(crate) fn parse(self, raw: &[u8]) -> usize {
        match self {
            LengthWidth::U8 => raw[0] as usize,
            LengthWidth::U16 => u16::from_le_bytes([raw[0], raw[1]]) as usize,
            LengthWidth::U32 => u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize,
        }
    }
}

/// Slot layout configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Header
    // -------------------------------------------------------------------------
    /// Bit pattern at the start of every slot; its length is the header width
    magic: Vec<u8>,

    // -------------------------------------------------------------------------
    // Length Fields
    // -------------------------------------------------------------------------
    /// Width of the key-length field
    key_len_width: LengthWidth,

    /// Width of the value-length field
    value_len_width: LengthWidth,

    // -------------------------------------------------------------------------
    // Limits
    // -------------------------------------------------------------------------
    /// Keys longer than this are rejected before touching the backend
    max_key_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            magic: DEFAULT_MAGIC.to_vec(),
            key_len_width: LengthWidth::U32,
            value_len_width: LengthWidth::U32,
            max_key_size: DEFAULT_MAX_KEY_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn magic(&self) -> &[u8] {
        &self.magic
    }

    pub fn header_size(&self) -> usize {
        self.magic.len()
    }

    pub fn key_len_width(&self) -> LengthWidth {
        self.key_len_width
    }

    pub fn value_len_width(&self) -> LengthWidth {
        self.value_len_width
    }

    pub fn max_key_size(&self) -> usize {
        self.max_key_size
    }

    /// Largest value (or free-slot padding) the value-length field can encode
    pub fn max_value_len(&self) -> usize {
        self.value_len_width.max_value()
    }

    /// Byte size of a slot holding `key_len` key bytes and `value_len` value bytes
    pub fn slot_size(&self, key_len: usize, value_len: usize) -> usize {
        self.overhead() + key_len + value_len
    }

    /// Size of the smallest possible slot: a free slot with no padding
    pub fn overhead(&self) -> usize {
        self.header_size() + self.key_len_width.bytes() + self.value_len_width.bytes()
    }

    /// Reject a search or insert key this layout cannot hold
    pub(crate) fn validate_key(&self, key: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::BadArgument("key must not be empty".to_string()));
        }
        if key.len() > self.max_key_size {
            return Err(StoreError::BadArgument(format!(
                "key of {} bytes exceeds maximum of {}",
                key.len(),
                self.max_key_size
            )));
        }
        Ok(())
    }

    /// Reject a pair that cannot be stored in an occupied slot
    pub(crate) fn validate_pair(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.validate_key(key)?;
        if value.is_empty() {
            return Err(StoreError::BadArgument("value must not be empty".to_string()));
        }
        if value.len() > self.max_value_len() {
            return Err(StoreError::BadArgument(format!(
                "value of {} bytes exceeds maximum of {}",
                value.len(),
                self.max_value_len()
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the header magic pattern (its length becomes the header width)
    pub fn magic(mut self, magic: impl Into<Vec<u8>>) -> Self {
        self.config.magic = magic.into();
        self
    }

    /// Set the width of the key-length field
    pub fn key_len_width(mut self, width: LengthWidth) -> Self {
        self.config.key_len_width = width;
        self
    }

    /// Set the width of the value-length field
    pub fn value_len_width(mut self, width: LengthWidth) -> Self {
        self.config.value_len_width = width;
        self
    }

    /// Set the maximum key size (in bytes)
    pub fn max_key_size(mut self, size: usize) -> Self {
        self.config.max_key_size = size;
        self
    }

    pub fn build(self) -> Result<Config> {
        let config = self.config;

        if config.magic.is_empty() {
            return Err(StoreError::Config("header magic must not be empty".to_string()));
        }
        if config.max_key_size == 0 {
            return Err(StoreError::Config("max key size must be non-zero".to_string()));
        }
        if config.max_key_size > config.key_len_width.max_value() {
            return Err(StoreError::Config(format!(
                "max key size {} does not fit a {}-byte key length field",
                config.max_key_size,
                config.key_len_width.bytes()
            )));
        }
        // Free-space tiling needs a free slot able to pad over another header
        if config.overhead() > config.max_value_len() {
            return Err(StoreError::Config(format!(
                "slot overhead of {} bytes exceeds the value length limit of {}",
                config.overhead(),
                config.max_value_len()
            )));
        }

        Ok(config)
    }
}
