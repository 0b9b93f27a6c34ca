//! Custom axum extractors

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::validation::RequestBodyError;

/// JSON extractor that validates the deserialized value automatically.
///
/// Rejects with a coded 400: an empty body, a body that does not
/// deserialize into `T`, or a value failing `T::validate`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = RequestBodyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(RequestBodyError::malformed)?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(RequestBodyError::Empty);
        }

        let value: T = serde_json::from_slice(&bytes).map_err(RequestBodyError::malformed)?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
