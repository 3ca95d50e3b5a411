//! Tests for crash behaviour, verification and recovery
//!
//! These tests verify:
//! - An interrupted split leaves the slot tiling valid
//! - check() detects damage and reports usage
//! - recover() reclaims an unparsable tail and keeps earlier pairs

use std::io;

use slotkv::slot::encode_pair;
use slotkv::{Backend, Config, MemBackend, Store, StoreError};

// =============================================================================
// Helper Functions
// =============================================================================

/// Backend that starts failing writes once its budget is spent
struct FaultyBackend {
    inner: MemBackend,
    writes_left: Option<usize>,
}

impl FaultyBackend {
    fn new(len: usize) -> Self {
        Self {
            inner: MemBackend::fixed(len),
            writes_left: None,
        }
    }

    fn fail_after(&mut self, writes: usize) {
        self.writes_left = Some(writes);
    }

    fn heal(&mut self) {
        self.writes_left = None;
    }
}

impl Backend for FaultyBackend {
    fn read(&self, position: usize, buf: &mut [u8]) -> slotkv::Result<()> {
        self.inner.read(position, buf)
    }

    fn write(&mut self, position: usize, buf: &[u8]) -> slotkv::Result<()> {
        match self.writes_left {
            Some(0) => Err(StoreError::Io(io::Error::new(
                io::ErrorKind::Other,
                "injected write failure",
            ))),
            Some(n) => {
                self.writes_left = Some(n - 1);
                self.inner.write(position, buf)
            }
            None => self.inner.write(position, buf),
        }
    }

    fn size(&self) -> usize {
        self.inner.size()
    }
}

fn prepared(size: usize) -> Store<MemBackend> {
    let mut store = Store::with_defaults(MemBackend::fixed(size));
    store.prepare().unwrap();
    store
}

// =============================================================================
// Interrupted Write Tests
// =============================================================================

#[test]
fn test_interrupted_split_keeps_tiling() {
    let mut store = Store::with_defaults(FaultyBackend::new(100));
    store.prepare().unwrap();
    store.put(b"a", b"1").unwrap();

    // Remainder header lands, the pair itself does not
    store.backend_mut().fail_after(1);
    let result = store.put(b"b", b"2");

    assert!(matches!(result, Err(StoreError::Io(_))));
    let stats = store.check().unwrap();
    assert_eq!(stats.occupied, 1);
    assert_eq!(stats.free_bytes, 86);
    assert_eq!(store.get_value(b"b").unwrap(), None);

    store.backend_mut().heal();
    store.put(b"b", b"2").unwrap();
    assert_eq!(store.get_value(b"b").unwrap().as_deref(), Some(&b"2"[..]));
}

#[test]
fn test_failed_first_write_changes_nothing() {
    let mut store = Store::with_defaults(FaultyBackend::new(64));
    store.prepare().unwrap();
    let before = store.backend().inner.as_bytes().to_vec();

    store.backend_mut().fail_after(0);
    let result = store.put(b"key", b"value");

    assert!(matches!(result, Err(StoreError::Io(_))));
    assert_eq!(store.backend().inner.as_bytes(), &before[..]);
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_reports_usage() {
    let mut store = prepared(200);
    store.put(b"one", b"1").unwrap();
    store.put(b"two", b"22").unwrap();

    let stats = store.check().unwrap();

    assert_eq!(stats.size, 200);
    assert_eq!(stats.occupied, 2);
    assert_eq!(stats.live_bytes, 16 + 17);
    assert_eq!(stats.free_slots, 1);
    assert_eq!(stats.free_bytes, 200 - 33);
    assert_eq!(stats.largest_free, 200 - 33);
}

#[test]
fn test_check_detects_damage() {
    let mut store = prepared(100);
    store.put(b"a", b"1").unwrap();
    store.backend_mut().write(14, &[0xEE; 6]).unwrap();

    let result = store.check();

    assert!(matches!(result, Err(StoreError::Corrupt { position: 14, .. })));
}

// =============================================================================
// Recover Tests
// =============================================================================

#[test]
fn test_recover_intact_store() {
    let mut store = prepared(100);
    store.put(b"a", b"1").unwrap();
    let before = store.backend().as_bytes().to_vec();

    let result = store.recover().unwrap();

    assert!(!result.was_repaired());
    assert_eq!(result.slots_recovered, 2);
    assert_eq!(result.bytes_reclaimed, 0);
    assert_eq!(store.backend().as_bytes(), &before[..]);
}

#[test]
fn test_recover_reclaims_damaged_tail() {
    let mut store = prepared(100);
    store.put(b"a", b"1").unwrap();
    store.backend_mut().write(14, &[0xEE; 6]).unwrap();

    let result = store.recover().unwrap();

    assert!(result.was_repaired());
    assert_eq!(result.damaged_at, Some(14));
    assert_eq!(result.slots_recovered, 1);
    assert_eq!(result.bytes_reclaimed, 86);

    let stats = store.check().unwrap();
    assert_eq!(stats.occupied, 1);
    assert_eq!(stats.free_bytes, 86);
    assert_eq!(store.get_value(b"a").unwrap().as_deref(), Some(&b"1"[..]));

    store.put(b"b", b"2").unwrap();
    assert_eq!(store.check().unwrap().occupied, 2);
}

#[test]
fn test_recover_tail_too_short() {
    let config = Config::default();
    let mut backend = MemBackend::fixed(20);
    encode_pair(&mut backend, &config, 0, b"a", b"1").unwrap();
    backend.write(14, &[0xEE; 6]).unwrap();
    let mut store = Store::new(backend, config);

    let result = store.recover();

    assert!(matches!(result, Err(StoreError::Corrupt { position: 14, .. })));
}
