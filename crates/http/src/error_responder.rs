//! Structured error-to-JSON translation
//!
//! Handlers return [`svckit_common::ApiError`]; rendering it attaches a
//! [`RecordedError`] to the response. This middleware is the single place
//! where that error is logged and written to the client.

use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::middleware::Next;
use axum::response::Response;
use svckit_common::RecordedError;

/// Log the recorded handler error and answer with
/// `{"success": false, "message", "code"?}` at its status.
pub async fn error_responder(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let mut response = next.run(request).await;

    let Some(recorded) = response.extensions_mut().remove::<RecordedError>() else {
        return response;
    };

    let error = recorded.error();
    let status = error.status_code();
    let code = error.error_code().map(|c| c.as_i32());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            code = ?code,
            error = %error,
            "Request failed"
        );
    } else {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            code = ?code,
            error = %error,
            "Request rejected"
        );
    }

    let mut rendered = recorded.to_response();
    for (name, value) in response.headers() {
        if name == CONTENT_TYPE || name == CONTENT_LENGTH {
            continue;
        }
        if !rendered.headers().contains_key(name) {
            rendered.headers_mut().insert(name.clone(), value.clone());
        }
    }
    rendered
}
