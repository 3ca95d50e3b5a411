//! Entry iterator
//!
//! Forward iteration over occupied slots in storage order.

use bytes::Bytes;

use crate::backend::Backend;
use crate::error::Result;
use crate::slot::{self, SlotHeader};

use super::Store;

/// A stored key-value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Offset of the slot holding the pair
    pub position: usize,
    pub key: Bytes,
    pub value: Bytes,
}

/// Iterator over stored pairs, skipping free slots
///
/// Stops after the first error.
pub struct Entries<'a, B: Backend> {
    store: &'a Store<B>,
    position: usize,
    done: bool,
}

impl<'a, B: Backend> Iterator for Entries<'a, B> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done && self.position < self.store.size() {
            match self.store.read_entry(self.position) {
                Ok((entry, header)) => {
                    self.position = header.end(&self.store.config);
                    if !header.is_free() {
                        return Some(Ok(entry));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

impl<B: Backend> Store<B> {
    /// Iterate over all stored pairs from the start of the backend
    pub fn entries(&self) -> Entries<'_, B> {
        Entries {
            store: self,
            position: 0,
            done: false,
        }
    }

    /// Decode the slot at `position` with its payload
    ///
    /// Free slots come back with empty key and value; their padding is not read.
    pub(super) fn read_entry(&self, position: usize) -> Result<(Entry, SlotHeader)> {
        let header = slot::decode_header(&self.backend, &self.config, position)?;
        if header.is_free() {
            let entry = Entry {
                position,
                key: Bytes::new(),
                value: Bytes::new(),
            };
            return Ok((entry, header));
        }

        let mut key = vec![0u8; header.key_len];
        let mut value = vec![0u8; header.value_len];
        slot::read_key(&self.backend, &self.config, &header, &mut key)?;
        slot::read_value(&self.backend, &self.config, &header, &mut value)?;

        let entry = Entry {
            position,
            key: Bytes::from(key),
            value: Bytes::from(value),
        };
        Ok((entry, header))
    }
}
