//! Backend Module
//!
//! The byte-addressable medium a store lives on.
//!
//! ## Responsibilities
//! - Bounded reads and writes at arbitrary offsets
//! - Report the current addressable length
//! - Optionally grow when written past the end
//!
//! The store never owns medium resources itself; it only calls these
//! operations. A failing `read` must not partially fill the buffer and a
//! failing `write` should not partially commit.

mod file;
mod mem;

pub use file::FileBackend;
pub use mem::MemBackend;

use crate::error::Result;

/// Capability set for the storage medium
pub trait Backend {
    /// Fill `buf` with the bytes at `position..position + buf.len()`
    fn read(&self, position: usize, buf: &mut [u8]) -> Result<()>;

    /// Write `buf` at `position`, growing the medium if it supports growth
    fn write(&mut self, position: usize, buf: &[u8]) -> Result<()>;

    /// Current addressable length
    fn size(&self) -> usize;

    /// Largest length the medium can reach, `None` if unbounded
    ///
    /// Fixed-capacity media keep the default.
    fn max_size(&self) -> Option<usize> {
        Some(self.size())
    }
}

impl<B: Backend + ?Sized> Backend for &mut B {
    fn read(&self, position: usize, buf: &mut [u8]) -> Result<()> {
        (**self).read(position, buf)
    }

    fn write(&mut self, position: usize, buf: &[u8]) -> Result<()> {
        (**self).write(position, buf)
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn max_size(&self) -> Option<usize> {
        (**self).max_size()
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn read(&self, position: usize, buf: &mut [u8]) -> Result<()> {
        (**self).read(position, buf)
    }

    fn write(&mut self, position: usize, buf: &[u8]) -> Result<()> {
        (**self).write(position, buf)
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn max_size(&self) -> Option<usize> {
        (**self).max_size()
    }
}
