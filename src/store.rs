//! Store Module
//!
//! The store handle that ties the document, the storage file, the watcher
//! and the notification hub together.
//!
//! ## Responsibilities
//! - Resolve and bootstrap the storage file on open
//! - Typed get/store on top of the string document
//! - Persist the whole document after every mutation
//! - Keep the document in sync with external edits via the watcher
//! - Notify subscribers after every save or detected change

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::StoreValue;
use crate::config::Config;
use crate::document::{Document, DocumentStore};
use crate::error::{Result, StoreError};
use crate::hub::{ChangeReceiver, NotificationHub};
use crate::persist::StorageFile;
use crate::watcher::ChangeWatcher;

/// State shared between the handle and the watcher thread
struct Shared {
    file: StorageFile,
    document: DocumentStore,
    hub: NotificationHub,

    /// Serializes upsert+save sequences and reloads
    write_lock: Mutex<()>,
}

impl Shared {
    /// Replace the document with the file contents
    fn reload(&self) {
        let _write_guard = self.write_lock.lock();
        self.document.replace_all(self.file.load());
    }

    /// Apply `mutate` and save, then broadcast regardless of the outcome
    fn mutate_and_save<R>(&self, mutate: impl FnOnce(&DocumentStore) -> R) -> (R, Result<()>) {
        let (out, saved) = {
            let _write_guard = self.write_lock.lock();
            let out = mutate(&self.document);
            (out, self.save_locked())
        };
        self.hub.broadcast();
        (out, saved)
    }

    /// Remove `key` and save, skipping both save and broadcast when the key
    /// is already gone by the time the write lock is held
    fn remove_and_save(&self, key: &str) -> Option<String> {
        let removed = {
            let _write_guard = self.write_lock.lock();
            let removed = self.document.remove(key)?;
            let _ = self.save_locked();
            removed
        };
        self.hub.broadcast();
        Some(removed)
    }

    /// Caller must hold `write_lock`
    fn save_locked(&self) -> Result<()> {
        let saved = self.file.save(&self.document.snapshot());
        if let Err(e) = &saved {
            tracing::error!(path = %self.file.path().display(), error = %e, "failed to save storage file");
        }
        saved
    }
}

/// A named key-value store persisted as one JSON file
///
/// ## Concurrency Model
///
/// - **Writes** (`store`/`try_store`/`remove`): the key upsert, the snapshot
///   and the file write run under one write lock, so a save always includes
///   every upsert that completed before it. The lock is released before
///   subscribers are signalled.
/// - **Reloads** (watcher or [`Store::reload`]): take the same write lock, so
///   they never land between an upsert and its save.
/// - **Reads** (`get`): read lock on the document only.
///
/// A save and a watcher-triggered reload may both notify for what is
/// logically one write.
///
/// ## Failure Policy
/// `store` never reports failure: an encode failure stores an empty string,
/// a write failure is logged and the in-memory value is kept.
/// Use `try_store` to get those errors back.
pub struct Store {
    config: Config,
    shared: Arc<Shared>,
    watcher: Option<ChangeWatcher>,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// On open:
    /// 1. Resolve the storage file path
    /// 2. Create the directory and an empty file if missing
    /// 3. Load the file
    /// 4. Start the change watcher
    pub fn open(config: Config) -> Result<Self> {
        let path = config.resolve_storage_file()?;
        Self::open_file(path, config)
    }

    /// Open a store under `$STORAGE_DIR` or `~/.<name>`
    pub fn open_named(name: impl Into<String>) -> Result<Self> {
        Self::open(Config::builder().name(name).build())
    }

    /// Open a store in an explicit directory (`<dir>/storage`)
    pub fn open_in(name: impl Into<String>, dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open(Config::builder().name(name).storage_dir(dir).build())
    }

    /// Open a store on an exact file path, skipping path resolution
    pub fn open_file(path: impl Into<PathBuf>, config: Config) -> Result<Self> {
        let file = StorageFile::bootstrap(path)?;
        let document = DocumentStore::from_document(file.load());

        let shared = Arc::new(Shared {
            file,
            document,
            hub: NotificationHub::new(config.broadcast_policy),
            write_lock: Mutex::new(()),
        });

        let watcher = if config.watch {
            Self::start_watcher(&shared, &config)
        } else {
            None
        };

        tracing::info!(
            path = %shared.file.path().display(),
            entries = shared.document.len(),
            watching = watcher.is_some(),
            "store opened"
        );

        Ok(Self {
            config,
            shared,
            watcher,
        })
    }

    fn start_watcher(shared: &Arc<Shared>, config: &Config) -> Option<ChangeWatcher> {
        let state = Arc::clone(shared);
        let on_change = move || {
            tracing::debug!(path = %state.file.path().display(), "storage file changed, reloading");
            state.reload();
            state.hub.broadcast();
        };

        match ChangeWatcher::spawn(shared.file.path(), config.watch_debounce, on_change) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                // The store still works, it just never sees external edits
                tracing::error!(path = %shared.file.path().display(), error = %e, "failed to start change watcher");
                None
            }
        }
    }

    // =========================================================================
    // Typed Access
    // =========================================================================

    /// Get a value decoded as `T`
    ///
    /// Returns `KeyNotFound` for a missing key or `Decode` if the stored
    /// string does not parse as `T`.
    pub fn get<T: StoreValue>(&self, key: &str) -> Result<T> {
        let raw = self.shared.document.get(key)?;
        T::decode(&raw)
    }

    /// Store a value and persist (fire-and-forget)
    pub fn store<T: StoreValue>(&self, key: &str, value: &T) {
        let encoded = value.encode().unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "failed to encode value, storing empty string");
            String::new()
        });
        let _ = self.put_raw(key, encoded);
    }

    /// Store a value and persist, reporting encode and write failures
    ///
    /// On a write failure the in-memory document still holds the new value
    /// and subscribers are still notified.
    pub fn try_store<T: StoreValue>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = value.encode()?;
        self.put_raw(key, encoded)
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get_raw(key)
    }

    pub fn store_string(&self, key: &str, value: &str) {
        let _ = self.put_raw(key, value.to_string());
    }

    /// Get a structured value stored as JSON
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let raw = self.shared.document.get(key)?;
        serde_json::from_str(&raw).map_err(|_| StoreError::invalid_json())
    }

    /// Store any serializable value as JSON (fire-and-forget)
    pub fn store_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let encoded = serde_json::to_string(value).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "failed to encode value, storing empty string");
            String::new()
        });
        let _ = self.put_raw(key, encoded);
    }

    fn put_raw(&self, key: &str, encoded: String) -> Result<()> {
        let ((), saved) = self
            .shared
            .mutate_and_save(|document| document.set(key, encoded));
        saved
    }

    // =========================================================================
    // Raw Document Access
    // =========================================================================

    /// The stored string for `key`, exactly as it appears in the file
    pub fn get_raw(&self, key: &str) -> Result<String> {
        self.shared.document.get(key)
    }

    /// Remove a key and persist, returning its raw value
    ///
    /// Removing a missing key is a no-op: no save, no notification.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.shared.remove_and_save(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.shared.document.contains_key(key)
    }

    /// All keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.shared.document.keys()
    }

    pub fn len(&self) -> usize {
        self.shared.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.document.is_empty()
    }

    /// Copy of the whole document
    pub fn snapshot(&self) -> Document {
        self.shared.document.snapshot()
    }

    /// Re-read the storage file now, without notifying subscribers
    pub fn reload(&self) {
        self.shared.reload();
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Register a subscriber that receives `()` once per change
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe_to_changes(&self) -> ChangeReceiver {
        self.shared.hub.subscribe()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Path of the storage file
    pub fn path(&self) -> &Path {
        self.shared.file.path()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the change watcher is running
    pub fn is_watching(&self) -> bool {
        self.watcher.as_ref().is_some_and(ChangeWatcher::is_running)
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.hub.subscriber_count()
    }
}
