//! Structured values stored as JSON text

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::StoreValue;
use crate::error::{Result, StoreError};

/// Wrapper that stores any serde type as a JSON string
///
/// ```ignore
/// store.store("user", &Json(User { id: 1, name: "ada".into() }));
/// let Json(user): Json<User> = store.get("user")?;
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize + DeserializeOwned> StoreValue for Json<T> {
    fn encode(&self) -> Result<String> {
        serde_json::to_string(&self.0).map_err(|e| StoreError::Encoding(e.to_string()))
    }

    fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map(Json)
            .map_err(|_| StoreError::invalid_json())
    }
}

impl StoreValue for serde_json::Value {
    fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| StoreError::Encoding(e.to_string()))
    }

    fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|_| StoreError::invalid_json())
    }
}
