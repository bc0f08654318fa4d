//! Response envelope shared by every gateway call.
//!
//! The gateway answers either with a structured envelope
//! (`{success, data?, error?, metadata?}`) or with a bare JSON payload. Both
//! shapes are folded into [`ApiResponse`] here so callers branch on
//! `response.success` instead of juggling transport errors.
//!
//! A payload that carries a top-level boolean `success` is always treated as
//! an envelope, even when the endpoint meant it as plain data.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

/// No response was received (connect failure, DNS, timeout).
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
/// The body could not be parsed into the expected shape.
pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";
/// Domain code used by the gateway for concurrent-session collisions.
pub const CONFLICT: &str = "CONFLICT";
pub const NOT_FOUND: &str = "NOT_FOUND";

/// Error code derived from an HTTP status, e.g. `HTTP_404`.
#[must_use]
pub fn http_code(status: u16) -> String {
    format!("HTTP_{status}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// The integration was never set up (`details.configured == false`).
    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        self.details
            .as_ref()
            .and_then(|details| details.get("configured"))
            .and_then(Value::as_bool)
            == Some(false)
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.code == CONFLICT || self.code == http_code(409)
    }

    /// Reads a numeric field from `details`, accepting integers and whole floats.
    #[must_use]
    pub fn detail_u64(&self, key: &str) -> Option<u64> {
        let value = self.details.as_ref()?.get(key)?;
        value
            .as_u64()
            .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f.ceil() as u64))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}: {}", self.code, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: None,
        }
    }

    pub fn failure(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            metadata: None,
        }
    }

    /// Converts the envelope into a `Result`, for callers that prefer `?`.
    ///
    /// # Errors
    /// Returns the envelope error when `success` is false.
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .error
                .unwrap_or_else(|| ApiError::new(INVALID_RESPONSE, "Request failed.")))
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            metadata: self.metadata,
        }
    }
}

impl ApiResponse<Value> {
    /// Decodes `data` into a typed payload. A payload that does not match `T`
    /// turns the response into an `INVALID_RESPONSE` failure.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResponse<T> {
        let ApiResponse {
            success,
            data,
            error,
            metadata,
        } = self;

        match data {
            Some(value) if success => match serde_json::from_value::<T>(value) {
                Ok(typed) => ApiResponse {
                    success,
                    data: Some(typed),
                    error,
                    metadata,
                },
                Err(err) => ApiResponse {
                    metadata,
                    ..ApiResponse::failure(ApiError::new(
                        INVALID_RESPONSE,
                        format!("Failed to decode response: {err}"),
                    ))
                },
            },
            _ => ApiResponse {
                success,
                data: None,
                error,
                metadata,
            },
        }
    }
}

/// Normalizes a raw HTTP exchange into an envelope.
///
/// `status_text` is the reason phrase used when the body carries no message.
#[must_use]
pub fn normalize_response(status: u16, status_text: &str, body: &str) -> ApiResponse<Value> {
    let is_ok = (200..300).contains(&status);
    let trimmed = body.trim();

    let parsed = if trimmed.is_empty() {
        Value::Object(Map::new())
    } else {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => value,
            Err(err) if is_ok => {
                return ApiResponse::failure(ApiError::new(
                    INVALID_RESPONSE,
                    format!("Failed to decode response: {err}"),
                ));
            }
            Err(_) => Value::Object(Map::new()),
        }
    };

    if !is_ok {
        return ApiResponse::failure(error_from_body(status, status_text, &parsed));
    }

    if parsed.get("success").is_some_and(Value::is_boolean) {
        return passthrough(parsed);
    }

    ApiResponse::ok(parsed)
}

fn error_from_body(status: u16, status_text: &str, body: &Value) -> ApiError {
    match body.get("error") {
        Some(error) if error.is_object() => {
            if let Ok(structured) = serde_json::from_value::<ApiError>(error.clone()) {
                return structured;
            }
        }
        Some(Value::String(message)) if !message.trim().is_empty() => {
            return ApiError::new(http_code(status), message.trim());
        }
        _ => {}
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map_or_else(|| fallback_status_text(status, status_text), str::to_string);

    ApiError::new(http_code(status), message)
}

fn fallback_status_text(status: u16, status_text: &str) -> String {
    if status_text.trim().is_empty() {
        format!("Request failed with status {status}")
    } else {
        status_text.trim().to_string()
    }
}

fn passthrough(body: Value) -> ApiResponse<Value> {
    match serde_json::from_value::<ApiResponse<Value>>(body) {
        Ok(mut envelope) => {
            if !envelope.success && envelope.error.is_none() {
                envelope.error = Some(ApiError::new(INVALID_RESPONSE, "Request failed."));
            }
            envelope
        }
        Err(err) => ApiResponse::failure(ApiError::new(
            INVALID_RESPONSE,
            format!("Malformed response envelope: {err}"),
        )),
    }
}
