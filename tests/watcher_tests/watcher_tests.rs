//! Change Watcher Tests
//!
//! Tests verify:
//! - External edits are picked up without an explicit reload
//! - Two handles on one file converge
//! - Subscribers hear about external edits
//! - Replace-by-rename edits are seen
//! - A file that never goes quiet is still reloaded
//! - Dropping the handle stops the watcher

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use jsonkv::watcher::ChangeWatcher;
use jsonkv::{Config, Store};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// How long the tests give the watcher to notice a change
const LATENCY: Duration = Duration::from_secs(5);

// =============================================================================
// Helper Functions
// =============================================================================

/// RUST_LOG=jsonkv=debug shows watcher activity for a failing test
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + LATENCY;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

fn watched_config(dir: &Path) -> Config {
    Config::builder()
        .name("demo")
        .storage_dir(dir)
        .ignore_env()
        .watch_debounce_ms(20)
        .build()
}

// =============================================================================
// External Change Tests
// =============================================================================

#[test]
fn test_external_overwrite_is_loaded() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(watched_config(temp_dir.path())).unwrap();
    assert!(store.is_watching());

    fs::write(store.path(), r#"{"b":"42"}"#).unwrap();

    assert!(wait_until(|| store.get_string("b").ok().as_deref() == Some("42")));
    assert_eq!(store.get::<u32>("b").unwrap(), 42);
}

#[test]
fn test_external_edit_notifies_subscriber() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(watched_config(temp_dir.path())).unwrap();
    let changes = store.subscribe_to_changes();

    fs::write(store.path(), r#"{"k":"v"}"#).unwrap();

    assert!(changes.recv_timeout(LATENCY).is_ok());
    assert!(wait_until(|| store.contains_key("k")));
}

#[test]
fn test_external_garbage_empties_document() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(watched_config(temp_dir.path())).unwrap();
    store.store_string("a", "1");

    fs::write(store.path(), "not json at all").unwrap();

    assert!(wait_until(|| store.is_empty()));
}

#[test]
fn test_replace_by_rename_is_seen() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(watched_config(temp_dir.path())).unwrap();

    let staging = temp_dir.path().join("storage.tmp");
    fs::write(&staging, r#"{"renamed":"yes"}"#).unwrap();
    fs::rename(&staging, store.path()).unwrap();

    assert!(wait_until(|| store.get_string("renamed").is_ok()));
}

#[test]
fn test_steady_external_writes_still_reload() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .name("demo")
        .storage_dir(temp_dir.path())
        .ignore_env()
        .build();
    let store = Store::open(config).unwrap();
    let changes = store.subscribe_to_changes();

    // Writes land faster than the 50 ms default window
    let stop = Arc::new(AtomicBool::new(false));
    let writer = {
        let stop = Arc::clone(&stop);
        let path = store.path().to_path_buf();
        thread::spawn(move || {
            let started = Instant::now();
            let mut tick = 0u64;
            while !stop.load(Ordering::SeqCst) && started.elapsed() < LATENCY {
                fs::write(&path, format!(r#"{{"tick":"{tick}"}}"#)).unwrap();
                tick += 1;
                thread::sleep(Duration::from_millis(20));
            }
        })
    };

    let notified = changes.recv_timeout(LATENCY).is_ok();
    let loaded = wait_until(|| store.contains_key("tick"));
    stop.store(true, Ordering::SeqCst);
    writer.join().unwrap();

    assert!(notified);
    assert!(loaded);
}

// =============================================================================
// Cross-Handle Tests
// =============================================================================

#[test]
fn test_two_handles_converge() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let writer = Store::open(watched_config(temp_dir.path())).unwrap();
    let reader = Store::open(watched_config(temp_dir.path())).unwrap();
    let reader_changes = reader.subscribe_to_changes();

    writer.store("k", &7u64);

    assert!(reader_changes.recv_timeout(LATENCY).is_ok());
    assert!(wait_until(|| reader.get::<u64>("k").ok() == Some(7)));
}

#[test]
fn test_unwatched_handle_stays_stale() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        watch: false,
        ..watched_config(temp_dir.path())
    };
    let store = Store::open(config).unwrap();
    assert!(!store.is_watching());

    fs::write(store.path(), r#"{"b":"42"}"#).unwrap();
    thread::sleep(Duration::from_millis(200));

    assert!(!store.contains_key("b"));
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_watcher_calls_back_and_stops_on_drop() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage");
    fs::write(&path, "{}").unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let watcher = ChangeWatcher::spawn(&path, Duration::from_millis(20), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    assert!(watcher.is_running());
    assert_eq!(watcher.path(), path.as_path());

    fs::write(&path, r#"{"a":"1"}"#).unwrap();
    assert!(wait_until(|| calls.load(Ordering::SeqCst) > 0));

    drop(watcher);
    let after_drop = calls.load(Ordering::SeqCst);

    fs::write(&path, r#"{"a":"2"}"#).unwrap();
    thread::sleep(Duration::from_millis(200));

    assert_eq!(calls.load(Ordering::SeqCst), after_drop);
}

#[test]
fn test_other_files_in_dir_are_ignored() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage");
    fs::write(&path, "{}").unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let _watcher = ChangeWatcher::spawn(&path, Duration::from_millis(20), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    fs::write(temp_dir.path().join("unrelated"), "x").unwrap();
    thread::sleep(Duration::from_millis(200));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
