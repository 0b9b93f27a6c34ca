//! JWT claims types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form payload carried inside a token
pub type Payload = Map<String, Value>;

/// Claims issued by [`crate::JwtManager`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Caller supplied data
    #[serde(rename = "Payload", default)]
    pub payload: Payload,
    /// Issuer
    pub iss: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// String payload entry, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}
