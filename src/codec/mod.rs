//! Codec Module
//!
//! Converts typed values to and from the string form kept in the document.
//!
//! ## Encodings
//! ```text
//! ┌────────────────────────────┬─────────────────────────────┐
//! │ Type                       │ Stored string               │
//! ├────────────────────────────┼─────────────────────────────┤
//! │ String                     │ verbatim                    │
//! │ i8..i128, u8..u128, *size  │ decimal             "42"    │
//! │ f32, f64                   │ shortest round-trip "1.5"   │
//! │ Complex32, Complex64       │ "(re+imi)"          "(1-2i)"│
//! │ Json<T>, serde_json::Value │ JSON text           {"a":1} │
//! └────────────────────────────┴─────────────────────────────┘
//! ```
//!
//! All conversions are pure. Decoding failures carry a short reason:
//! `"not a number"`, `"not a complex number"` or `"invalid JSON"`.

mod complex;
mod json;
mod value;

pub use complex::{Complex, Complex32, Complex64};
pub use json::Json;
pub use value::StoreValue;

use crate::error::Result;

/// Encode a value into its stored string form
pub fn encode<T: StoreValue>(value: &T) -> Result<String> {
    value.encode()
}

/// Decode a stored string as `T`
pub fn decode<T: StoreValue>(raw: &str) -> Result<T> {
    T::decode(raw)
}
