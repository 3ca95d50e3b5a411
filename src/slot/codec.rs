//! Slot codec
//!
//! Encoding and decoding of single slots at a byte offset.
//!
//! Every slot is serialized into one buffer and handed to the backend as a
//! single write. Free slots are written without their padding bytes.

use bytes::{BufMut, BytesMut};

use crate::backend::Backend;
use crate::config::Config;
use crate::error::{Result, StoreError};

use super::SlotHeader;

// =============================================================================
// Encoding
// =============================================================================

/// Write an occupied slot holding `key` and `value` at `position`
///
/// Fails with `BadArgument` for an empty key or value, an oversized key or
/// a value the length field cannot encode, and with `StorageFull` when the
/// slot would not fit the backend. Nothing is written on failure.
pub fn encode_pair<B: Backend + ?Sized>(
    backend: &mut B,
    config: &Config,
    position: usize,
    key: &[u8],
    value: &[u8],
) -> Result<()> {
    config.validate_pair(key, value)?;

    let slot_size = config.slot_size(key.len(), value.len());
    check_bounds(backend, position, slot_size)?;

    let mut buf = BytesMut::with_capacity(slot_size);
    buf.put_slice(config.magic());
    config.key_len_width().put(&mut buf, key.len());
    buf.put_slice(key);
    config.value_len_width().put(&mut buf, value.len());
    buf.put_slice(value);

    backend.write(position, &buf)
}

/// Write a free slot at `position` followed by `padding` unused bytes
///
/// The padding itself is not touched; only the slot header is written.
pub fn encode_free<B: Backend + ?Sized>(
    backend: &mut B,
    config: &Config,
    position: usize,
    padding: usize,
) -> Result<()> {
    if padding > config.max_value_len() {
        return Err(StoreError::BadArgument(format!(
            "free slot padding of {} bytes exceeds maximum of {}",
            padding,
            config.max_value_len()
        )));
    }

    check_bounds(backend, position, config.slot_size(0, padding))?;

    let mut buf = BytesMut::with_capacity(config.overhead());
    buf.put_slice(config.magic());
    config.key_len_width().put(&mut buf, 0);
    config.value_len_width().put(&mut buf, padding);

    backend.write(position, &buf)
}

fn check_bounds<B: Backend + ?Sized>(backend: &B, position: usize, slot_size: usize) -> Result<()> {
    let full = || StoreError::StorageFull {
        position,
        needed: slot_size,
        size: backend.size(),
    };

    let end = position.checked_add(slot_size).ok_or_else(full)?;
    match backend.max_size() {
        Some(max) if end > max => Err(full()),
        _ => Ok(()),
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Read and validate the slot header and both length fields at `position`
///
/// Checks that the whole slot, payload included, lies within the backend.
pub fn decode_header<B: Backend + ?Sized>(
    backend: &B,
    config: &Config,
    position: usize,
) -> Result<SlotHeader> {
    let size = backend.size();
    if position == size {
        return Err(StoreError::EndOfStore { position });
    }

    let header_size = config.header_size();
    let key_width = config.key_len_width();
    let value_width = config.value_len_width();
    let overflow = || StoreError::corrupt(position, "length overflow");

    // Magic + key-length field
    let prefix_len = header_size + key_width.bytes();
    if position.checked_add(prefix_len).map_or(true, |end| end > size) {
        return Err(StoreError::corrupt(position, "truncated slot header"));
    }
    let key_len = read_prefix(backend, config, position)?;

    // Value-length field sits after the key bytes
    let value_len_offset = (position + prefix_len)
        .checked_add(key_len)
        .ok_or_else(overflow)?;
    let value_field_end = value_len_offset
        .checked_add(value_width.bytes())
        .ok_or_else(overflow)?;
    if value_field_end > size {
        return Err(StoreError::corrupt(position, "key overruns backend"));
    }
    let mut field = [0u8; 4];
    let field = &mut field[..value_width.bytes()];
    backend.read(value_len_offset, field)?;
    let value_len = value_width.parse(field);

    // Checked here so that size() and end() on the header cannot overflow
    let end = value_field_end.checked_add(value_len).ok_or_else(overflow)?;
    if end > size {
        return Err(StoreError::corrupt(position, "value overruns backend"));
    }

    Ok(SlotHeader {
        position,
        key_len,
        value_len,
    })
}

/// Stack space for reading the magic and key-length field in one go
const PREFIX_SCRATCH: usize = 32;

/// Check the magic at `position` and return the key length that follows it
fn read_prefix<B: Backend + ?Sized>(backend: &B, config: &Config, position: usize) -> Result<usize> {
    let magic = config.magic();
    let key_width = config.key_len_width();
    let mut scratch = [0u8; PREFIX_SCRATCH];

    let prefix_len = magic.len() + key_width.bytes();
    if prefix_len <= PREFIX_SCRATCH {
        let prefix = &mut scratch[..prefix_len];
        backend.read(position, prefix)?;
        if &prefix[..magic.len()] != magic {
            return Err(StoreError::corrupt(position, "header magic mismatch"));
        }
        return Ok(key_width.parse(&prefix[magic.len()..]));
    }

    // Long magic: compare it piecewise, then read the length field alone
    for (i, expected) in magic.chunks(PREFIX_SCRATCH).enumerate() {
        let chunk = &mut scratch[..expected.len()];
        backend.read(position + i * PREFIX_SCRATCH, chunk)?;
        if chunk != expected {
            return Err(StoreError::corrupt(position, "header magic mismatch"));
        }
    }
    let field = &mut scratch[..key_width.bytes()];
    backend.read(position + magic.len(), field)?;
    Ok(key_width.parse(field))
}

/// Copy the key of a decoded slot into `buf`, returning its length
pub fn read_key<B: Backend + ?Sized>(
    backend: &B,
    config: &Config,
    header: &SlotHeader,
    buf: &mut [u8],
) -> Result<usize> {
    ensure_capacity(header.key_len, buf.len())?;
    backend.read(header.key_offset(config), &mut buf[..header.key_len])?;
    Ok(header.key_len)
}

/// Copy the value of a decoded slot into `buf`, returning its length
pub fn read_value<B: Backend + ?Sized>(
    backend: &B,
    config: &Config,
    header: &SlotHeader,
    buf: &mut [u8],
) -> Result<usize> {
    ensure_capacity(header.value_len, buf.len())?;
    backend.read(header.value_offset(config), &mut buf[..header.value_len])?;
    Ok(header.value_len)
}

/// Decode the slot at `position`, optionally copying key and value out
///
/// Buffers that are `None` are skipped, which is how scans read only the
/// lengths. Buffer capacities are checked before any payload is copied.
pub fn decode_slot<B: Backend + ?Sized>(
    backend: &B,
    config: &Config,
    position: usize,
    key_buf: Option<&mut [u8]>,
    value_buf: Option<&mut [u8]>,
) -> Result<SlotHeader> {
    let header = decode_header(backend, config, position)?;

    if let Some(buf) = &key_buf {
        ensure_capacity(header.key_len, buf.len())?;
    }
    if let Some(buf) = &value_buf {
        ensure_capacity(header.value_len, buf.len())?;
    }

    if let Some(buf) = key_buf {
        read_key(backend, config, &header, buf)?;
    }
    if let Some(buf) = value_buf {
        read_value(backend, config, &header, buf)?;
    }

    Ok(header)
}

fn ensure_capacity(needed: usize, capacity: usize) -> Result<()> {
    if needed > capacity {
        return Err(StoreError::BufferTooSmall { needed, capacity });
    }
    Ok(())
}
