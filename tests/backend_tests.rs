//! Tests for storage backends
//!
//! These tests verify:
//! - MemBackend bounds, growth and growth limits
//! - FileBackend persistence across reopen
//! - Growable files extend on append and keep their length

use std::path::PathBuf;

use slotkv::{Backend, FileBackend, MemBackend, Store, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.kv");
    (temp_dir, path)
}

// =============================================================================
// MemBackend Tests
// =============================================================================

#[test]
fn test_mem_fixed_read_write() {
    let mut backend = MemBackend::fixed(8);

    backend.write(2, b"abc").unwrap();
    let mut buf = [0u8; 3];
    backend.read(2, &mut buf).unwrap();

    assert_eq!(&buf, b"abc");
    assert_eq!(backend.size(), 8);
    assert_eq!(backend.max_size(), Some(8));
}

#[test]
fn test_mem_fixed_rejects_out_of_range() {
    let mut backend = MemBackend::fixed(8);

    let write = backend.write(6, b"abc");
    let mut buf = [0xFFu8; 4];
    let read = backend.read(6, &mut buf);

    assert!(matches!(
        write,
        Err(StoreError::OutOfRange {
            position: 6,
            len: 3,
            size: 8
        })
    ));
    assert!(matches!(read, Err(StoreError::OutOfRange { .. })));
    assert_eq!(buf, [0xFF; 4]);
    assert_eq!(backend.as_bytes(), &[0u8; 8]);
}

#[test]
fn test_mem_growable_extends_on_write() {
    let mut backend = MemBackend::growable();

    backend.write(0, b"hello").unwrap();
    backend.write(5, b" world").unwrap();

    assert_eq!(backend.size(), 11);
    assert_eq!(backend.max_size(), None);
    assert_eq!(backend.into_inner(), b"hello world".to_vec());
}

#[test]
fn test_mem_growable_rejects_holes() {
    let mut backend = MemBackend::growable();

    let result = backend.write(4, b"x");

    assert!(matches!(result, Err(StoreError::OutOfRange { .. })));
    assert_eq!(backend.size(), 0);
}

#[test]
fn test_mem_growable_with_limit() {
    let mut backend = MemBackend::growable_with_limit(6);

    backend.write(0, b"abcd").unwrap();
    let result = backend.write(4, b"efg");

    assert!(matches!(result, Err(StoreError::OutOfRange { .. })));
    assert_eq!(backend.as_bytes(), b"abcd");
    assert_eq!(backend.max_size(), Some(6));
}

// =============================================================================
// FileBackend Tests
// =============================================================================

#[test]
fn test_file_create_sets_length() {
    let (_temp, path) = setup_temp_file();

    let backend = FileBackend::create(&path, 512).unwrap();

    assert_eq!(backend.size(), 512);
    assert_eq!(backend.max_size(), Some(512));
    assert!(!backend.is_growable());
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 512);
}

#[test]
fn test_file_fixed_rejects_write_past_end() {
    let (_temp, path) = setup_temp_file();
    let mut backend = FileBackend::create(&path, 16).unwrap();

    let result = backend.write(10, &[1u8; 8]);

    assert!(matches!(result, Err(StoreError::OutOfRange { .. })));
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 16);
}

#[test]
fn test_file_store_survives_reopen() {
    let (_temp, path) = setup_temp_file();

    {
        let mut store = Store::with_defaults(FileBackend::create(&path, 1024).unwrap());
        store.prepare().unwrap();
        store.put(b"alpha", b"one").unwrap();
        store.put(b"beta", b"two").unwrap();
        store.backend().sync().unwrap();
    }

    let store = Store::with_defaults(FileBackend::open(&path).unwrap());
    assert_eq!(store.size(), 1024);
    assert_eq!(store.get_value(b"alpha").unwrap().as_deref(), Some(&b"one"[..]));
    assert_eq!(store.get_value(b"beta").unwrap().as_deref(), Some(&b"two"[..]));
    assert_eq!(store.check().unwrap().occupied, 2);
}

#[test]
fn test_file_growable_appends() {
    let (_temp, path) = setup_temp_file();

    {
        let mut store = Store::with_defaults(FileBackend::open_growable(&path).unwrap());
        assert_eq!(store.size(), 0);
        store.put(b"k1", b"v1").unwrap();
        store.put(b"k2", b"v2").unwrap();
        assert_eq!(store.size(), 32);
    }

    assert_eq!(std::fs::metadata(&path).unwrap().len(), 32);

    let store = Store::with_defaults(FileBackend::open(&path).unwrap());
    let keys: Vec<_> = store
        .entries()
        .map(|entry| entry.unwrap().key)
        .collect();
    assert_eq!(keys, vec![&b"k1"[..], &b"k2"[..]]);
}

#[test]
fn test_file_fixed_store_reports_no_space() {
    let (_temp, path) = setup_temp_file();
    let mut store = Store::with_defaults(FileBackend::create(&path, 20).unwrap());
    store.prepare().unwrap();

    let result = store.put(b"key", b"value");

    assert!(matches!(result, Err(StoreError::NoSpace)));
    assert_eq!(store.backend().path(), path.as_path());
}
