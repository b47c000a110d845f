//! JSON API
//!
//! Every view is exposed as a `*_json` function returning a serialized
//! [`ApiResponse`] envelope, so callers (the CLI, a static site build, an
//! HTTP shim) never deal with Rust error types.

pub mod club_json;

pub use club_json::*;

use crate::error::{ClubError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

/// Request body that is not valid JSON. Has no `ClubError` counterpart since
/// it is raised before any club data is touched.
pub const INVALID_JSON: &str = "INVALID_JSON";

/// Envelope around every view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
}

/// What a failed lookup or load was about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorDetails {
    /// Unknown player, match, activity or attribute
    Missing { kind: String, key: String },
    /// File the data was read from
    Source { path: PathBuf },
    /// Collection or file that failed to parse
    Parse { context: String },
}

/// Error part of the envelope. `code` is one of the `ClubError::code()`
/// values or [`INVALID_JSON`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    /// Whether the same request may succeed once the data files are fixed
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl ApiError {
    pub fn invalid_json(error: &serde_json::Error) -> Self {
        Self {
            code: INVALID_JSON.to_string(),
            message: format!("Invalid JSON format: {}", error),
            retryable: false,
            details: None,
        }
    }
}

impl From<&ClubError> for ApiError {
    fn from(error: &ClubError) -> Self {
        let details = match error {
            ClubError::NotFound { kind, key } => {
                Some(ErrorDetails::Missing { kind: kind.to_string(), key: key.clone() })
            }
            ClubError::Io { path, .. } | ClubError::Csv { path, .. } => {
                Some(ErrorDetails::Source { path: path.clone() })
            }
            ClubError::Json { context, .. } => {
                Some(ErrorDetails::Parse { context: context.clone() })
            }
            ClubError::Yaml(_) | ClubError::InvalidConfig(_) | ClubError::InvalidRequest(_) => None,
        };

        Self {
            code: error.code().to_string(),
            message: error.to_string(),
            retryable: error.is_recoverable(),
            details,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::with(Some(data), None)
    }

    pub fn failure(error: ApiError) -> Self {
        Self::with(None, Some(error))
    }

    fn with(data: Option<T>, error: Option<ApiError>) -> Self {
        Self {
            success: error.is_none(),
            data,
            error,
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Serialized envelope; `{}` only if `T` itself refuses to serialize.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl<T> From<Result<T>> for ApiResponse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => ApiResponse::success(data),
            Err(e) => ApiResponse::failure(ApiError::from(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_missing_details() {
        let response: ApiResponse<()> = Err(ClubError::not_found("player", "p9")).into();
        assert!(!response.success);
        assert_eq!(response.error_code(), Some("NOT_FOUND"));

        let error = response.error.unwrap();
        assert!(!error.retryable);
        assert_eq!(
            error.details,
            Some(ErrorDetails::Missing { kind: "player".to_string(), key: "p9".to_string() })
        );
    }

    #[test]
    fn test_io_failure_is_retryable_with_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = ApiError::from(&ClubError::io("data/users.json", io));
        assert_eq!(error.code, "IO_ERROR");
        assert!(error.retryable);
        assert_eq!(error.details, Some(ErrorDetails::Source { path: "data/users.json".into() }));

        let json: serde_json::Value = serde_json::to_value(&error).unwrap();
        assert_eq!(json["details"]["type"], "source");
    }

    #[test]
    fn test_success_envelope_has_no_error() {
        let response = ApiResponse::success(3);
        assert!(response.success);
        assert_eq!(response.error_code(), None);
        let json: serde_json::Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(json["data"], 3);
        assert_eq!(json["schema_version"], API_VERSION);
        assert!(json.get("error").map_or(false, serde_json::Value::is_null));
    }

    #[test]
    fn test_invalid_request_has_no_details() {
        let error = ApiError::from(&ClubError::InvalidRequest("bad".to_string()));
        assert_eq!(error.code, "INVALID_REQUEST");
        assert!(error.details.is_none());
        let json = serde_json::to_value(&error).unwrap();
        assert!(json.get("details").is_none());
    }
}
