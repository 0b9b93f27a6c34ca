//! Request body failures and their 400 rendering

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::codes::ErrorCode;
use crate::error::{BoxError, CodedError, ErrorParams};

/// Why a request body could not be accepted
#[derive(Debug, thiserror::Error)]
pub enum RequestBodyError {
    #[error("request body is empty")]
    Empty,

    #[error("request validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed request body: {0}")]
    Malformed(#[source] BoxError),
}

impl RequestBodyError {
    pub fn malformed(err: impl Into<BoxError>) -> Self {
        RequestBodyError::Malformed(err.into())
    }
}

/// Map a request body failure to a 400 coded error
pub fn bad_request(err: RequestBodyError) -> CodedError {
    let message = match &err {
        RequestBodyError::Empty => "request body is required but was empty".to_string(),
        RequestBodyError::Validation(errors) => format_validation_errors(errors),
        RequestBodyError::Malformed(_) => "invalid request body".to_string(),
    };

    CodedError::new(
        ErrorParams::new()
            .with_http_code(StatusCode::BAD_REQUEST)
            .with_code(ErrorCode::InvalidRequest)
            .with_message(message)
            .with_source(err),
    )
}

impl From<RequestBodyError> for CodedError {
    fn from(err: RequestBodyError) -> Self {
        bad_request(err)
    }
}

impl IntoResponse for RequestBodyError {
    fn into_response(self) -> Response {
        bad_request(self).into_response()
    }
}

/// Join per-field messages as `"<field>: <message>"` with `"; "`, ordered
/// by field name. Only the first failure of each field is reported.
///
/// Nested structs and lists are flattened to paths such as `address.city`
/// and `items[1].name`.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut by_field = BTreeMap::new();
    collect_field_messages(errors, None, &mut by_field);

    by_field
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn collect_field_messages(
    errors: &ValidationErrors,
    prefix: Option<&str>,
    by_field: &mut BTreeMap<String, String>,
) {
    for (name, kind) in errors.errors() {
        let name = name.to_lowercase();
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name,
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(first) = field_errors.first() {
                    let message = field_message(&path, first);
                    by_field.insert(path, message);
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_field_messages(inner, Some(&path), by_field);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let item_path = format!("{}[{}]", path, index);
                    collect_field_messages(inner, Some(&item_path), by_field);
                }
            }
        }
    }
}

fn field_message(field: &str, error: &ValidationError) -> String {
    match error.code.as_ref() {
        "required" => format!("{} is required", field),
        "email" => format!("{} must be a valid email", field),
        "length" | "min" | "max" => {
            length_message(field, error).unwrap_or_else(|| generic_message(field, error))
        }
        _ => generic_message(field, error),
    }
}

fn length_message(field: &str, error: &ValidationError) -> Option<String> {
    let min = error.params.get("min").map(param_to_string);
    let max = error.params.get("max").map(param_to_string);
    let actual = error
        .params
        .get("value")
        .and_then(|v| v.as_str())
        .map(|s| s.chars().count() as u64);

    let below_min = match (error.params.get("min").and_then(|v| v.as_u64()), actual) {
        (Some(bound), Some(len)) => len < bound,
        (Some(_), None) => error.code == "min" || max.is_none(),
        (None, _) => false,
    };

    match (min, max) {
        (Some(min), _) if below_min => Some(format!(
            "{} must be at least {} characters",
            field, min
        )),
        (_, Some(max)) => Some(format!(
            "{} cannot be longer than {} characters",
            field, max
        )),
        (Some(min), None) => Some(format!(
            "{} must be at least {} characters",
            field, min
        )),
        (None, None) => None,
    }
}

fn generic_message(field: &str, error: &ValidationError) -> String {
    let mut message = format!("{} failed on '{}'", field, error.code);

    let mut params: Vec<(String, String)> = error
        .params
        .iter()
        .filter(|(key, _)| key.as_ref() != "value")
        .map(|(key, value)| (key.to_string(), param_to_string(value)))
        .collect();
    params.sort();

    if !params.is_empty() {
        let rendered = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        message.push_str(&format!(" (param: {})", rendered));
    }

    message
}

fn param_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
