//! API types for the blob viewer HTTP API.
//!
//! Successful responses serialize the data model directly; failures are
//! reported as an [`ErrorResponse`] with an HTTP status chosen by
//! [`APIError`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Resource does not exist (404)
	NotFound { error_type: String, message: String },
	/// Request understood but the resource cannot be served as asked (422)
	UnprocessableEntity { error_type: String, message: String },
	/// Upstream chain-data provider failed (502)
	BadGateway { error_type: String, message: String },
	/// Internal server error (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::NotFound { .. } => 404,
			APIError::UnprocessableEntity { .. } => 422,
			APIError::BadGateway { .. } => 502,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let (error_type, message) = match self {
			APIError::NotFound { error_type, message }
			| APIError::UnprocessableEntity { error_type, message }
			| APIError::BadGateway { error_type, message }
			| APIError::InternalServerError { error_type, message } => (error_type, message),
		};

		ErrorResponse {
			error: error_type.clone(),
			message: message.clone(),
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			APIError::UnprocessableEntity { message, .. } => {
				write!(f, "Unprocessable Entity: {}", message)
			},
			APIError::BadGateway { message, .. } => write!(f, "Bad Gateway: {}", message),
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		let error_response = self.to_error_response();
		(status, Json(error_response)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_codes() {
		let not_found = APIError::NotFound {
			error_type: "TRANSACTION_NOT_FOUND".to_string(),
			message: "Transaction not found".to_string(),
		};
		assert_eq!(not_found.status_code(), 404);

		let upstream = APIError::BadGateway {
			error_type: "LOOKUP_FAILED".to_string(),
			message: "Invalid transaction hash: timeout".to_string(),
		};
		assert_eq!(upstream.status_code(), 502);
		assert_eq!(upstream.to_string(), "Bad Gateway: Invalid transaction hash: timeout");
	}

	#[test]
	fn test_error_response_carries_code_and_message() {
		let err = APIError::UnprocessableEntity {
			error_type: "NO_BLOB_DATA".to_string(),
			message: "No blob data found in this transaction".to_string(),
		};
		let json = serde_json::to_value(err.to_error_response()).unwrap();
		assert_eq!(json["error"], "NO_BLOB_DATA");
		assert_eq!(json["message"], "No blob data found in this transaction");
		assert_eq!(json.as_object().unwrap().len(), 2);
	}
}
