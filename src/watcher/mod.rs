//! Change Watcher Module
//!
//! Background thread that keeps the in-memory document in sync with the
//! storage file, whoever writes it.
//!
//! ## State Machine
//! ```text
//!   Idle ──spawn──▶ Watching ──file event──▶ Reloading ──▶ Watching
//!                      │  ▲
//!          watch error │  │ log and continue
//!                      ▼  │
//!                   (logged)
//!
//!   Watching ──shutdown / handle dropped──▶ Stopped
//! ```
//!
//! ## Notes
//! - The parent directory is watched (non-recursive) and events are
//!   filtered by file name, so replace-by-rename edits are seen too.
//! - Bursts of events inside the debounce window collapse into one reload.
//!   The window opens on the first event, so steady writes still reload.
//! - The store's own saves also come back as events; the resulting reload
//!   is redundant but harmless.

mod file_watcher;

pub use file_watcher::ChangeWatcher;
