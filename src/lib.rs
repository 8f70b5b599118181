//! # jsonkv
//!
//! An embeddable key-value store with:
//! - The whole store persisted as a single JSON document
//! - An in-memory mirror for reads
//! - Typed values over a string-valued map
//! - Change notifications for own saves and external edits
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Store handle                          │
//! │            store<T> / get<T> / subscribe_to_changes          │
//! └──────┬───────────────────────┬──────────────────────┬───────┘
//!        │                       │                      │
//!        ▼                       ▼                      ▼
//!   ┌──────────┐         ┌──────────────┐        ┌─────────────┐
//!   │  Codec   │         │   Document   │        │     Hub     │
//!   │ T <-> str│         │   (RwLock)   │        │ (broadcast) │
//!   └──────────┘         └──────┬───────┘        └──────▲──────┘
//!                               │ save / load           │
//!                               ▼                       │
//!                        ┌──────────────┐        ┌──────┴──────┐
//!                        │ Storage file │◀──────▶│   Watcher   │
//!                        │    (JSON)    │ events │  (thread)   │
//!                        └──────────────┘        └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use jsonkv::Store;
//!
//! # fn main() -> jsonkv::Result<()> {
//! let store = Store::open_in("demo", "/tmp/demo")?;
//! let changes = store.subscribe_to_changes();
//!
//! store.store("count", &42u32);
//! assert_eq!(store.get::<u32>("count")?, 42);
//! changes.recv().ok();
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod document;
pub mod persist;
pub mod hub;
pub mod watcher;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{BroadcastPolicy, Config};
pub use codec::{Complex, Complex32, Complex64, Json, StoreValue};
pub use hub::ChangeReceiver;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jsonkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
