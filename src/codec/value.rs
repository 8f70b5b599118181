//! StoreValue trait and primitive implementations

use crate::error::{Result, StoreError};

/// A type that can be kept in the store
///
/// Implemented for `String`, every integer width, `f32`/`f64`,
/// [`Complex`](super::Complex), [`Json`](super::Json) and
/// `serde_json::Value`.
pub trait StoreValue: Sized {
    /// Produce the string kept in the document
    fn encode(&self) -> Result<String>;

    /// Parse a string read from the document
    fn decode(raw: &str) -> Result<Self>;
}

impl StoreValue for String {
    fn encode(&self) -> Result<String> {
        Ok(self.clone())
    }

    fn decode(raw: &str) -> Result<Self> {
        Ok(raw.to_string())
    }
}

macro_rules! impl_numeric {
    ($($t:ty),* $(,)?) => {
        $(
            impl StoreValue for $t {
                fn encode(&self) -> Result<String> {
                    Ok(self.to_string())
                }

                fn decode(raw: &str) -> Result<Self> {
                    raw.trim()
                        .parse::<$t>()
                        .map_err(|_| StoreError::not_a_number())
                }
            }
        )*
    };
}

impl_numeric!(i8, i16, i32, i64, i128, isize);
impl_numeric!(u8, u16, u32, u64, u128, usize);
impl_numeric!(f32, f64);
