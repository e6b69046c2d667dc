//! Lenient decoding of API response bodies.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiError;

/// A response body, parsed as JSON when possible.
///
/// Some endpoints (and every proxy error page) answer with plain text, so
/// decoding never fails: anything that isn't valid JSON is kept verbatim as
/// `Raw`. Callers match on the variant instead of assuming a structure.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    Raw(String),
}

impl ApiResponse {
    pub fn decode(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ApiResponse::Json(value),
            Err(_) => ApiResponse::Raw(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, ApiResponse::Raw(_))
    }

    /// Look up a top-level field of a JSON object body.
    /// Returns None for raw bodies and for JSON that isn't an object.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_json()?.as_object()?.get(name)
    }

    /// The server reports failures as `{"msg": "..."}`, usually with a 200
    /// status, so this is the only reliable way to spot them.
    pub fn error_message(&self) -> Option<&str> {
        self.field("msg")?.as_str()
    }

    /// Deserialize the body into `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            ApiResponse::Json(value) => T::deserialize(&value).map_err(|e| {
                let reason = match value.get("msg").and_then(Value::as_str) {
                    Some(msg) => format!("remote error: {}", msg),
                    None => e.to_string(),
                };
                ApiError::unexpected_shape(reason, &value.to_string())
            }),
            ApiResponse::Raw(text) => Err(ApiError::unexpected_shape("body is not JSON", &text)),
        }
    }
}

impl fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiResponse::Json(value) => {
                let pretty = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                f.write_str(&pretty)
            }
            ApiResponse::Raw(text) => f.write_str(text),
        }
    }
}
