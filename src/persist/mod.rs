//! Persistence Module
//!
//! Owns the storage file on disk.
//!
//! ## Responsibilities
//! - Bootstrap: create the parent directory and an empty file
//! - Load: whole file -> Document, degrading to empty on any failure
//! - Save: whole Document -> whole file in a single write
//!
//! ## File Format
//! ```text
//! {"a":"hello","count":"42","point":"{\"x\":1,\"y\":2}"}
//! ```
//! One JSON object; every value is a JSON string holding the encoded
//! value. An empty file reads as `{}`.
//!
//! There is no temp-file/rename or journaling: a crash mid-write can leave
//! a truncated file, which the next load treats as empty.

mod file;

pub use file::StorageFile;
