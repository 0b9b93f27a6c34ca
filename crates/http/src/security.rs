//! Hardening headers and CORS
//!
//! Every response gets the fixed header set below. CORS headers are added
//! only when the request origin is allowed, and `OPTIONS` preflights are
//! answered with 204 before reaching any handler.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; img-src 'self' data:; script-src 'self'; style-src 'self' 'unsafe-inline'; font-src 'self'; connect-src 'self'";

const HARDENING_HEADERS: [(&str, &str); 10] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("referrer-policy", "no-referrer"),
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    (
        "strict-transport-security",
        "max-age=63072000; includeSubDomains; preload",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-embedder-policy", "require-corp"),
    (
        "cache-control",
        "no-store, no-cache, must-revalidate, private",
    ),
    ("expect-ct", "max-age=86400, enforce"),
];

/// Origins, methods and headers advertised to cross-origin callers
#[derive(Debug, Clone)]
pub struct SecurityHeadersConfig {
    /// Exact origins, or `*` for any
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"]
                .map(String::from)
                .to_vec(),
            allowed_headers: ["Origin", "Content-Type", "Authorization"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl SecurityHeadersConfig {
    /// Default methods and headers with the given origins
    pub fn with_origins(origins: Vec<String>) -> Self {
        Self {
            allowed_origins: origins,
            ..Self::default()
        }
    }

    /// Value for `Access-Control-Allow-Origin`, if the request may see one.
    ///
    /// A wildcard echoes the caller's origin because `*` is rejected by
    /// browsers alongside `Access-Control-Allow-Credentials: true`.
    fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        self.allowed_origins.iter().find_map(|allowed| {
            match (allowed.as_str(), origin) {
                ("*", Some(origin)) => Some(origin.to_string()),
                ("*", None) => Some("*".to_string()),
                (allowed, Some(origin)) if allowed == origin => Some(origin.to_string()),
                _ => None,
            }
        })
    }

    fn apply_cors(&self, origin: Option<&str>, headers: &mut HeaderMap) {
        let Some(allow_origin) = self.allow_origin(origin) else {
            return;
        };

        let values = [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                self.allowed_methods.join(", "),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                self.allowed_headers.join(", "),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                "true".to_string(),
            ),
        ];

        for (name, value) in values {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    headers.insert(name, value);
                }
                Err(e) => tracing::warn!(header = %name, error = %e, "Skipping invalid CORS header value"),
            }
        }

        if origin.is_some() && !varies_on_origin(headers) {
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
    }
}

fn varies_on_origin(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::VARY)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .any(|token| token == "*" || token.eq_ignore_ascii_case("origin"))
}

fn apply_hardening(headers: &mut HeaderMap) {
    for (name, value) in HARDENING_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers.remove(header::SERVER);
}

/// Security headers and CORS; use with
/// `axum::middleware::from_fn_with_state(Arc::new(config), security_headers)`.
pub async fn security_headers(
    State(config): State<Arc<SecurityHeadersConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    apply_hardening(headers);
    config.apply_cors(origin.as_deref(), headers);
    response
}
