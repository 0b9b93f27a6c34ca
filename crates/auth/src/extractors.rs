//! Axum extractors for authentication
//!
//! Generic over any state `S` where `Arc<JwtManager>: FromRef<S>`.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::claims::Claims;
use crate::error::AuthError;
use crate::jwt::{extract_bearer_token, JwtManager};

/// Claims of a verified `Authorization: Bearer` token
#[derive(Debug, Clone)]
pub struct BearerClaims(pub Claims);

impl<S> FromRequestParts<S> for BearerClaims
where
    Arc<JwtManager>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let manager = Arc::<JwtManager>::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        let claims = manager.verify_jwt(token)?;

        Ok(BearerClaims(claims))
    }
}
