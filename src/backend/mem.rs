//! RAM backend
//!
//! A byte vector, either fixed in length or growable up to an optional limit.

use crate::error::{Result, StoreError};

use super::Backend;

/// In-memory storage medium
#[derive(Debug, Clone, Default)]
pub struct MemBackend {
    data: Vec<u8>,
    /// `Some(n)` caps growth at `n` bytes; fixed buffers cap at their length
    limit: Option<usize>,
}

impl MemBackend {
    /// Zero-filled buffer of exactly `len` bytes that never grows
    pub fn fixed(len: usize) -> Self {
        Self {
            data: vec![0; len],
            limit: Some(len),
        }
    }

    /// Wrap existing bytes as a fixed-size medium
    pub fn from_vec(data: Vec<u8>) -> Self {
        let limit = Some(data.len());
        Self { data, limit }
    }

    /// Empty buffer that grows on writes past the end
    pub fn growable() -> Self {
        Self {
            data: Vec::new(),
            limit: None,
        }
    }

    /// Empty buffer that grows up to `limit` bytes
    pub fn growable_with_limit(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    fn out_of_range(&self, position: usize, len: usize) -> StoreError {
        StoreError::OutOfRange {
            position,
            len,
            size: self.data.len(),
        }
    }
}

impl Backend for MemBackend {
    fn read(&self, position: usize, buf: &mut [u8]) -> Result<()> {
        let end = position
            .checked_add(buf.len())
            .ok_or_else(|| self.out_of_range(position, buf.len()))?;
        if end > self.data.len() {
            return Err(self.out_of_range(position, buf.len()));
        }

        buf.copy_from_slice(&self.data[position..end]);
        Ok(())
    }

    fn write(&mut self, position: usize, buf: &[u8]) -> Result<()> {
        let end = position
            .checked_add(buf.len())
            .ok_or_else(|| self.out_of_range(position, buf.len()))?;

        // Writes may extend the buffer but never leave a hole behind it
        if position > self.data.len() {
            return Err(self.out_of_range(position, buf.len()));
        }
        if let Some(limit) = self.limit {
            if end > limit {
                return Err(self.out_of_range(position, buf.len()));
            }
        }

        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[position..end].copy_from_slice(buf);
        Ok(())
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn max_size(&self) -> Option<usize> {
        self.limit
    }
}
