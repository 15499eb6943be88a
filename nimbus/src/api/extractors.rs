use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::NimbusError;

/// `axum::Json` whose rejections become [`NimbusError::Validation`], so a bad
/// body answers with the usual `{ "error": ... }` shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(NimbusError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for NimbusError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> NimbusError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                NimbusError::Validation(format!("Missing required field: {field}"))
            } else {
                NimbusError::Validation(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            NimbusError::Validation(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => {
            NimbusError::Validation("Missing `Content-Type: application/json` header".to_string())
        }
        JsonRejection::BytesRejection(_) => {
            NimbusError::Internal("Failed to read request body".to_string())
        }
        _ => NimbusError::Validation(rejection.body_text()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}
