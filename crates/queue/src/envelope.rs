//! Typed message envelope
//!
//! Wire form is `{"type": "<kind>", "data": <any json>}`. The `data` part is
//! kept as raw JSON until a handler knows which type to decode it into.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::QueueError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Discriminator such as `otp`, `order` or `email`
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Box<RawValue>,
}

impl MessageEnvelope {
    pub fn new<T: Serialize + ?Sized>(kind: impl Into<String>, data: &T) -> Result<Self, QueueError> {
        Ok(Self {
            kind: kind.into(),
            data: serde_json::value::to_raw_value(data)?,
        })
    }

    pub fn from_body(body: &str) -> Result<Self, QueueError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn to_body(&self) -> Result<String, QueueError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode `data` into the payload type for this envelope's kind
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, QueueError> {
        Ok(serde_json::from_str(self.data.get())?)
    }
}
