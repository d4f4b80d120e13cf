//! API handler modules and error mapping.

pub mod merchant;
pub mod order;
pub mod platform;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use stablepay_core::StagingError;
use stablepay_types::ErrorResponse;

/// HTTP-facing wrapper around core errors.
///
/// Maps the staging error taxonomy onto status codes so clients can
/// distinguish retryable conditions (503 with a retry hint, 500, 502)
/// from terminal ones (400, 404, 409).
pub struct ApiError(pub StagingError);

impl From<StagingError> for ApiError {
	fn from(err: StagingError) -> Self {
		Self(err)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let (status, code, retry_after) = match &self.0 {
			StagingError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", None),
			StagingError::OrderNotFound(_) => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND", None),
			StagingError::MerchantNotFound(_) => {
				(StatusCode::NOT_FOUND, "MERCHANT_NOT_FOUND", None)
			}
			StagingError::InvalidState { .. } => (StatusCode::CONFLICT, "INVALID_STATE", None),
			StagingError::ReceiptPending => {
				(StatusCode::SERVICE_UNAVAILABLE, "RECEIPT_PENDING", Some(5))
			}
			StagingError::ExecutionReverted => {
				(StatusCode::BAD_REQUEST, "TRANSACTION_FAILED", None)
			}
			StagingError::EventNotFound(_) => {
				(StatusCode::INTERNAL_SERVER_ERROR, "EVENT_NOT_FOUND", None)
			}
			StagingError::Persistence(_) => {
				(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", Some(1))
			}
			StagingError::Chain(_) => (StatusCode::BAD_GATEWAY, "CHAIN_CLIENT_ERROR", Some(5)),
		};

		if status.is_server_error() {
			tracing::warn!(error = %self.0, "Request failed");
		}

		(
			status,
			Json(ErrorResponse {
				error: code.to_string(),
				message: self.0.to_string(),
				retry_after,
			}),
		)
			.into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use stablepay_types::OrderStatus;

	fn status_of(err: StagingError) -> StatusCode {
		ApiError(err).into_response().status()
	}

	#[test]
	fn test_error_status_mapping() {
		assert_eq!(
			status_of(StagingError::validation("amount", "must be positive")),
			StatusCode::BAD_REQUEST
		);
		assert_eq!(
			status_of(StagingError::OrderNotFound("0xabc".into())),
			StatusCode::NOT_FOUND
		);
		assert_eq!(
			status_of(StagingError::InvalidState {
				current: OrderStatus::Created,
				requested: "settle",
			}),
			StatusCode::CONFLICT
		);
		assert_eq!(
			status_of(StagingError::ReceiptPending),
			StatusCode::SERVICE_UNAVAILABLE
		);
		assert_eq!(
			status_of(StagingError::ExecutionReverted),
			StatusCode::BAD_REQUEST
		);
		assert_eq!(
			status_of(StagingError::Chain("connection refused".into())),
			StatusCode::BAD_GATEWAY
		);
	}
}
