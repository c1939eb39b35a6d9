use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::api::errors::ApiError;

/// Path ids must look like ids before any store access.
pub(crate) fn parse_id(raw: &str) -> Result<String, ApiError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| ApiError::BadRequest("Invalid ID".to_string()))
}

pub(crate) fn parse_optional_id(raw: Option<&str>) -> Result<Option<String>, ApiError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Uuid::parse_str(value)
            .map(|id| Some(id.to_string()))
            .map_err(|_| ApiError::BadRequest("Invalid next_phase_id".to_string())),
        None => Ok(None),
    }
}

pub(crate) fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload.validate().map_err(|errors| ApiError::BadRequest(describe(&errors)))
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    collect(errors, "", &mut messages);
    messages.sort();
    if messages.is_empty() {
        "Invalid request body".to_string()
    } else {
        messages.join("; ")
    }
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path =
            if prefix.is_empty() { field.to_string() } else { format!("{prefix}.{field}") };
        match kind {
            ValidationErrorsKind::Field(items) => {
                for item in items {
                    let message = item
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| item.code.to_string());
                    if field == "__all__" {
                        out.push(message);
                    } else {
                        out.push(format!("{path}: {message}"));
                    }
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}
