//! QR code image endpoint.

use blob_qr::{QrError, QrImage, QrRenderer};
use blob_types::{blob_url, APIError, Theme};
use thiserror::Error;

/// Errors that can occur while serving a QR code.
#[derive(Debug, Error)]
pub enum QrApiError {
	#[error(transparent)]
	Render(#[from] QrError),
}

impl From<QrApiError> for APIError {
	fn from(err: QrApiError) -> Self {
		APIError::InternalServerError {
			error_type: "QR_RENDER_FAILED".to_string(),
			message: err.to_string(),
		}
	}
}

/// Handles GET /api/qr/{hash} requests.
///
/// Encodes the deep link for `hash` under `origin`.
pub fn get_qr_code(
	hash: &str,
	theme: Theme,
	origin: &str,
	renderer: &QrRenderer,
) -> Result<QrImage, QrApiError> {
	renderer.render(&blob_url(origin, hash), theme).map_err(|e| {
		tracing::warn!(tx_hash = %hash, error = %e, "QR render failed");
		QrApiError::from(e)
	})
}
