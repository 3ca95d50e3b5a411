//! File backend
//!
//! Uses a regular file as the storage medium. Reads take `&self`, so the
//! file handle sits behind a mutex to allow seeking.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::{Result, StoreError};

use super::Backend;

/// File-backed storage medium
pub struct FileBackend {
    /// Path of the backing file
    path: PathBuf,
    /// File handle (seek position is shared state)
    file: Mutex<File>,
    /// Cached file length
    len: usize,
    /// Whether writes past the end extend the file
    growable: bool,
}

impl FileBackend {
    /// Create (or truncate) a file of exactly `len` zero bytes that never grows
    pub fn create(path: &Path, len: usize) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        file.set_len(len as u64)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            len,
            growable: false,
        })
    }

    /// Open an existing file, fixed at its current length
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(path, file, false)
    }

    /// Open (or create) a file that grows on writes past the end
    pub fn open_growable(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        Self::from_file(path, file, true)
    }

    fn from_file(path: &Path, file: File, growable: bool) -> Result<Self> {
        let len = file.metadata()?.len();
        let len = usize::try_from(len)
            .map_err(|_| StoreError::Config(format!("file too large: {} bytes", len)))?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            len,
            growable,
        })
    }

    /// Flush file contents and metadata to disk
    pub fn sync(&self) -> Result<()> {
        self.file.lock().sync_all()?;
        Ok(())
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_growable(&self) -> bool {
        self.growable
    }

    fn out_of_range(&self, position: usize, len: usize) -> StoreError {
        StoreError::OutOfRange {
            position,
            len,
            size: self.len,
        }
    }
}

impl Backend for FileBackend {
    fn read(&self, position: usize, buf: &mut [u8]) -> Result<()> {
        match position.checked_add(buf.len()) {
            Some(end) if end <= self.len => {}
            _ => return Err(self.out_of_range(position, buf.len())),
        }

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(position as u64))?;
        file.read_exact(buf)?;
        Ok(())
    }

    fn write(&mut self, position: usize, buf: &[u8]) -> Result<()> {
        let end = match position.checked_add(buf.len()) {
            Some(end) if position <= self.len && (self.growable || end <= self.len) => end,
            _ => return Err(self.out_of_range(position, buf.len())),
        };

        let file = self.file.get_mut();
        file.seek(SeekFrom::Start(position as u64))?;
        file.write_all(buf)?;

        self.len = self.len.max(end);
        Ok(())
    }

    fn size(&self) -> usize {
        self.len
    }

    fn max_size(&self) -> Option<usize> {
        if self.growable {
            None
        } else {
            Some(self.len)
        }
    }
}
