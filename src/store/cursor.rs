//! Cursors and search
//!
//! A cursor is a byte offset into the slot sequence plus, once bound by
//! `search`, the key being looked for. Cursors are only meaningful against
//! the backend contents they were produced from.

use bytes::Bytes;
use tracing::trace;

use crate::backend::Backend;
use crate::error::{Result, StoreError};
use crate::slot;

use super::{Entry, Store};

/// Where a cursor is in its search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No search key captured
    Unbound,
    /// Moving through slots looking for the key
    Scanning,
    /// Positioned on a slot whose key matches
    Parked,
}

/// Resumable scan position
#[derive(Debug, Clone)]
pub struct Cursor {
    position: usize,
    key: Option<Bytes>,
    state: CursorState,
}

impl Cursor {
    /// Unbound cursor at the first slot
    pub fn new() -> Self {
        Self::at(0)
    }

    /// Unbound cursor at an arbitrary slot offset
    pub fn at(position: usize) -> Self {
        Self {
            position,
            key: None,
            state: CursorState::Unbound,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Captured search key, if any
    pub fn key(&self) -> Option<&[u8]> {
        self.key.as_deref()
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn is_parked(&self) -> bool {
        self.state == CursorState::Parked
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> Store<B> {
    /// Find the first slot holding `key`
    ///
    /// Fails with `EndOfStore` when the scan runs off the last slot without
    /// a match, and with `Corrupt` if it hits bytes that are not a slot.
    pub fn search(&self, key: &[u8]) -> Result<Cursor> {
        self.config.validate_key(key)?;

        let mut cursor = Cursor {
            position: 0,
            key: Some(Bytes::copy_from_slice(key)),
            state: CursorState::Scanning,
        };
        self.search_next(&mut cursor)?;
        Ok(cursor)
    }

    /// Continue a search from the cursor position
    ///
    /// A parked cursor first steps past its current match. Free slots never
    /// match because search keys are non-empty.
    pub fn search_next(&self, cursor: &mut Cursor) -> Result<()> {
        let key = match &cursor.key {
            Some(key) => key.clone(),
            None => {
                return Err(StoreError::BadArgument(
                    "cursor has no search key".to_string(),
                ))
            }
        };

        if cursor.state == CursorState::Parked {
            self.advance(cursor)?;
        }

        let mut found = vec![0u8; key.len()];
        loop {
            let header = slot::decode_header(&self.backend, &self.config, cursor.position)?;

            if header.key_len == key.len() {
                slot::read_key(&self.backend, &self.config, &header, &mut found)?;
                if found[..] == key[..] {
                    cursor.state = CursorState::Parked;
                    trace!(position = cursor.position, "Cursor parked on match");
                    return Ok(());
                }
            }

            cursor.position = header.end(&self.config);
        }
    }

    /// Move the cursor to the next slot, free or occupied
    pub fn advance(&self, cursor: &mut Cursor) -> Result<()> {
        let header = slot::decode_header(&self.backend, &self.config, cursor.position)?;

        cursor.position = header.end(&self.config);
        cursor.state = match cursor.key {
            Some(_) => CursorState::Scanning,
            None => CursorState::Unbound,
        };

        trace!(position = cursor.position, "Cursor advanced");
        Ok(())
    }

    /// Copy the value of the slot under the cursor into `value`
    ///
    /// Returns the value length. Does not check that the cursor is parked:
    /// whatever slot is at the position is read.
    pub fn get(&self, cursor: &Cursor, value: &mut [u8]) -> Result<usize> {
        if value.is_empty() {
            return Err(StoreError::BadArgument(
                "value buffer must not be empty".to_string(),
            ));
        }

        let header = slot::decode_slot(&self.backend, &self.config, cursor.position, None, Some(value))?;
        Ok(header.value_len)
    }

    /// Copy key and value of the slot under the cursor
    ///
    /// Returns `(key_len, value_len)`.
    pub fn get_kv(&self, cursor: &Cursor, key: &mut [u8], value: &mut [u8]) -> Result<(usize, usize)> {
        if key.is_empty() || value.is_empty() {
            return Err(StoreError::BadArgument(
                "key and value buffers must not be empty".to_string(),
            ));
        }

        let header = slot::decode_slot(
            &self.backend,
            &self.config,
            cursor.position,
            Some(key),
            Some(value),
        )?;
        Ok((header.key_len, header.value_len))
    }

    /// Read the value under the cursor into a fresh buffer
    pub fn value_at(&self, cursor: &Cursor) -> Result<Bytes> {
        let header = slot::decode_header(&self.backend, &self.config, cursor.position)?;
        let mut value = vec![0u8; header.value_len];
        slot::read_value(&self.backend, &self.config, &header, &mut value)?;
        Ok(Bytes::from(value))
    }

    /// Read the whole pair under the cursor
    pub fn entry_at(&self, cursor: &Cursor) -> Result<Entry> {
        self.read_entry(cursor.position).map(|(entry, _)| entry)
    }

    /// Value of the first slot holding `key`
    ///
    /// Returns `Ok(None)` when the scan reaches the end of the store.
    pub fn get_value(&self, key: &[u8]) -> Result<Option<Bytes>> {
        match self.search(key) {
            Ok(cursor) => self.value_at(&cursor).map(Some),
            Err(StoreError::EndOfStore { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
