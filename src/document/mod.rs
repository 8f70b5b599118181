//! Document Module
//!
//! The in-memory mirror of the storage file.
//!
//! ## Responsibilities
//! - Hold every entry as `key -> encoded string`
//! - Single-key upserts from the typed setters
//! - Whole-document swap on load, whole-document snapshot on save
//!
//! ## Data Structure Choice
//! BTreeMap wrapped in RwLock: keys come out sorted, so the file written
//! on every save is byte-for-byte deterministic for the same contents.

mod table;

pub use table::DocumentStore;

use std::collections::BTreeMap;

/// The full mapping of all entries, as persisted
pub type Document = BTreeMap<String, String>;
