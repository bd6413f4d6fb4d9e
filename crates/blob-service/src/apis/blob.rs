//! Blob transaction API.
//!
//! Exposes the lookup cycle as JSON so the same data the page shows can be
//! fetched by scripts. Not found and missing blob data are reported as
//! distinct HTTP statuses rather than as lookup failures.

use blob_lookup::{LookupError, LookupService};
use blob_types::{
	APIError, BlobTransactionDetails, LookupOutcome, TransactionValidation, NO_BLOB_DATA,
	TRANSACTION_NOT_FOUND,
};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while serving a blob lookup.
#[derive(Debug, Error)]
pub enum BlobApiError {
	#[error("{}", TRANSACTION_NOT_FOUND)]
	NotFound,
	#[error("{}", NO_BLOB_DATA)]
	NoBlobData,
	#[error(transparent)]
	Lookup(#[from] LookupError),
}

impl From<BlobApiError> for APIError {
	fn from(err: BlobApiError) -> Self {
		match err {
			BlobApiError::NotFound | BlobApiError::Lookup(LookupError::TransactionNotFound) => {
				APIError::NotFound {
					error_type: "TRANSACTION_NOT_FOUND".to_string(),
					message: err.to_string(),
				}
			},
			BlobApiError::NoBlobData => APIError::UnprocessableEntity {
				error_type: "NO_BLOB_DATA".to_string(),
				message: err.to_string(),
			},
			BlobApiError::Lookup(_) => APIError::BadGateway {
				error_type: "LOOKUP_FAILED".to_string(),
				message: err.to_string(),
			},
		}
	}
}

/// Handles GET /api/blob/{hash} requests.
pub async fn get_blob_details(
	hash: &str,
	lookup: &LookupService,
) -> Result<BlobTransactionDetails, BlobApiError> {
	info!(tx_hash = %hash, "Retrieving blob transaction");

	match lookup.lookup(hash).await? {
		LookupOutcome::Found(details) => Ok(details),
		LookupOutcome::NotFound => Err(BlobApiError::NotFound),
		LookupOutcome::NoBlobData => Err(BlobApiError::NoBlobData),
	}
}

/// Handles GET /api/blob/{hash}/validation requests.
///
/// An unknown hash is a successful response with every flag false.
pub async fn get_validation(
	hash: &str,
	lookup: &LookupService,
) -> Result<TransactionValidation, BlobApiError> {
	lookup.validate(hash).await.map_err(|e| {
		warn!(tx_hash = %hash, error = %e, "Validation failed");
		BlobApiError::from(e)
	})
}
