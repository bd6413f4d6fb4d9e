//! Per-session view state for the blob viewer page.
//!
//! The controller drives one lookup cycle at a time against the shared
//! [`LookupService`] and maps its result onto what the page renders.

use blob_lookup::{LookupError, LookupService};
use blob_types::{
	blob_path, blob_url, is_placeholder_hash, parse_deep_link, BlobTransactionDetails, DeepLink,
	LookupOutcome, Theme, MALFORMED_DEEP_LINK, PLACEHOLDER_HASH,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned when the controller refuses an action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
	#[error("A lookup is already in progress")]
	Busy,
}

/// What the page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
	pub loading: bool,
	pub error: Option<String>,
	/// Placeholder until the first successful lookup.
	pub data: BlobTransactionDetails,
}

impl Default for ViewState {
	fn default() -> Self {
		Self {
			loading: false,
			error: None,
			data: BlobTransactionDetails::placeholder(),
		}
	}
}

/// Input for the QR renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRequest {
	pub url: String,
	pub theme: Theme,
}

pub struct ViewController {
	lookup: Arc<LookupService>,
	state: ViewState,
	input_hash: String,
	resolved_hash: String,
	theme: Theme,
	navigation: Option<String>,
}

impl ViewController {
	pub fn new(lookup: Arc<LookupService>, theme: Theme) -> Self {
		Self {
			lookup,
			state: ViewState::default(),
			input_hash: PLACEHOLDER_HASH.to_string(),
			resolved_hash: PLACEHOLDER_HASH.to_string(),
			theme,
			navigation: None,
		}
	}

	pub fn state(&self) -> &ViewState {
		&self.state
	}

	pub fn input_hash(&self) -> &str {
		&self.input_hash
	}

	pub fn resolved_hash(&self) -> &str {
		&self.resolved_hash
	}

	pub fn theme(&self) -> Theme {
		self.theme
	}

	/// Address the page should switch to without reloading, set after a
	/// successful lookup.
	pub fn navigation(&self) -> Option<&str> {
		self.navigation.as_deref()
	}

	pub fn toggle_theme(&mut self) {
		self.theme = self.theme.toggled();
	}

	/// Deep link and palette for the QR code of the resolved hash.
	pub fn qr_request(&self, origin: &str) -> QrRequest {
		QrRequest {
			url: blob_url(origin, &self.resolved_hash),
			theme: self.theme,
		}
	}

	/// Handles a page load at `path`.
	///
	/// A `/blob/<hash>` path pre-fills the input and runs one lookup, unless
	/// the hash is the placeholder. A nested hash pre-fills the input and
	/// shows an error without a lookup. Returns whether a lookup ran.
	pub async fn enter(&mut self, path: &str) -> Result<bool, ControllerError> {
		let hash = match parse_deep_link(path) {
			DeepLink::Absent => return Ok(false),
			DeepLink::Malformed(raw) => {
				tracing::warn!(path = %path, "Malformed deep link");
				self.input_hash = raw.to_string();
				self.state.error = Some(MALFORMED_DEEP_LINK.to_string());
				return Ok(false);
			},
			DeepLink::Hash(hash) => hash,
		};

		self.input_hash = hash.to_string();
		if is_placeholder_hash(hash) {
			tracing::debug!("Deep link points at the placeholder hash, not executing");
			return Ok(false);
		}

		self.submit(hash).await?;
		Ok(true)
	}

	/// Runs one validate-then-fetch cycle for `hash`.
	///
	/// Refused while a previous cycle has not been applied.
	pub async fn submit(&mut self, hash: &str) -> Result<(), ControllerError> {
		self.begin(hash)?;
		let result = self.lookup.lookup(hash).await;
		self.apply(hash, result);
		Ok(())
	}

	/// Marks a cycle as started for `hash`.
	pub fn begin(&mut self, hash: &str) -> Result<(), ControllerError> {
		if self.state.loading {
			return Err(ControllerError::Busy);
		}

		self.input_hash = hash.to_string();
		self.state.loading = true;
		self.state.error = None;
		Ok(())
	}

	/// Applies the result of a cycle for `hash` to the view state.
	///
	/// Results are applied in the order they arrive. A result for an older
	/// hash that arrives late overwrites a newer one.
	pub fn apply(&mut self, hash: &str, result: Result<LookupOutcome, LookupError>) {
		self.state.loading = false;

		match result {
			Ok(LookupOutcome::Found(details)) => {
				self.state.data = details;
				self.resolved_hash = hash.to_string();
				self.navigation = Some(blob_path(hash));
			},
			Ok(outcome) => {
				self.state.error = outcome.message().map(str::to_string);
			},
			Err(e) => {
				tracing::warn!(tx_hash = %hash, error = %e, "Lookup failed");
				self.state.error = Some(e.to_string());
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use blob_lookup::implementations::mock::MockChainData;
	use blob_types::{ChainBlock, ChainReceipt, ChainTransaction};
	use std::time::Duration;

	const BLOB_TX: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
	const PLAIN_TX: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";
	const OTHER_BLOB_TX: &str =
		"0x3333333333333333333333333333333333333333333333333333333333333333";
	const UNKNOWN_TX: &str = "0x4444444444444444444444444444444444444444444444444444444444444444";

	fn transaction(hash: &str, blobs: Vec<&str>) -> ChainTransaction {
		ChainTransaction {
			hash: hash.to_string(),
			from: "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4".to_string(),
			to: None,
			block_number: Some(100),
			max_fee_per_blob_gas: Some(10),
			blob_versioned_hashes: Some(blobs.into_iter().map(str::to_string).collect()),
		}
	}

	fn receipt(hash: &str, used: u64, price: u128) -> ChainReceipt {
		ChainReceipt {
			transaction_hash: hash.to_string(),
			block_number: Some(100),
			blob_gas_used: Some(used),
			blob_gas_price: Some(price),
		}
	}

	fn mock() -> MockChainData {
		MockChainData::new()
			.with_transaction(transaction(BLOB_TX, vec!["0x01aa"]))
			.with_receipt(receipt(BLOB_TX, 131_072, 2))
			.with_transaction(transaction(OTHER_BLOB_TX, vec!["0x01bb", "0x01cc"]))
			.with_receipt(receipt(OTHER_BLOB_TX, 131_072, 1))
			.with_transaction(transaction(PLAIN_TX, vec![]))
			.with_block(ChainBlock {
				number: 100,
				timestamp: 1_710_338_135,
			})
	}

	fn controller(mock: MockChainData) -> ViewController {
		let lookup = Arc::new(LookupService::new(Box::new(mock)));
		ViewController::new(lookup, Theme::Dark)
	}

	#[tokio::test]
	async fn test_initial_state_is_idle_placeholder() {
		let view = controller(mock());

		assert!(!view.state().loading);
		assert_eq!(view.state().error, None);
		assert_eq!(view.state().data, BlobTransactionDetails::placeholder());
		assert_eq!(view.resolved_hash(), PLACEHOLDER_HASH);
		assert_eq!(view.navigation(), None);
	}

	#[tokio::test]
	async fn test_unknown_hash_shows_not_found() {
		let mut view = controller(mock());
		view.submit(UNKNOWN_TX).await.unwrap();

		assert!(!view.state().loading);
		assert_eq!(view.state().error.as_deref(), Some("Transaction not found"));
		assert_eq!(view.state().data, BlobTransactionDetails::placeholder());
		assert_eq!(view.navigation(), None);
	}

	#[tokio::test]
	async fn test_plain_transaction_shows_no_blob_data() {
		let mut view = controller(mock());
		view.submit(PLAIN_TX).await.unwrap();

		assert_eq!(
			view.state().error.as_deref(),
			Some("No blob data found in this transaction")
		);
		assert_eq!(view.resolved_hash(), PLACEHOLDER_HASH);
	}

	#[tokio::test]
	async fn test_blob_transaction_populates_data_and_navigates() {
		let mut view = controller(mock());
		view.submit(BLOB_TX).await.unwrap();

		let state = view.state();
		assert!(!state.loading);
		assert_eq!(state.error, None);
		assert_eq!(state.data.blob_gas_used, Some(131_072));
		assert_eq!(state.data.total_blob_cost, "262144");
		assert_eq!(view.resolved_hash(), BLOB_TX);
		assert_eq!(view.navigation(), Some(format!("/blob/{}", BLOB_TX).as_str()));
	}

	#[tokio::test]
	async fn test_failed_lookup_keeps_previous_data() {
		let mut view = controller(mock().with_failure(UNKNOWN_TX, "connection reset"));
		view.submit(BLOB_TX).await.unwrap();
		let previous = view.state().data.clone();

		view.submit(UNKNOWN_TX).await.unwrap();

		assert_eq!(
			view.state().error.as_deref(),
			Some("Invalid transaction hash: connection reset")
		);
		assert_eq!(view.state().data, previous);
		assert_eq!(view.resolved_hash(), BLOB_TX);
	}

	#[tokio::test]
	async fn test_new_submit_clears_error() {
		let mut view = controller(mock());
		view.submit(UNKNOWN_TX).await.unwrap();
		view.submit(BLOB_TX).await.unwrap();

		assert_eq!(view.state().error, None);
	}

	#[tokio::test]
	async fn test_submit_rejected_while_loading() {
		let mut view = controller(mock());
		view.begin(BLOB_TX).unwrap();

		assert_eq!(view.submit(PLAIN_TX).await, Err(ControllerError::Busy));
		assert_eq!(view.input_hash(), BLOB_TX);
	}

	#[tokio::test]
	async fn test_deep_link_auto_executes() {
		let mut view = controller(mock());
		let executed = view.enter(&format!("/blob/{}", BLOB_TX)).await.unwrap();

		assert!(executed);
		assert_eq!(view.input_hash(), BLOB_TX);
		assert_eq!(view.resolved_hash(), BLOB_TX);
	}

	#[tokio::test]
	async fn test_placeholder_deep_link_does_not_execute() {
		let mut view = controller(mock().with_failure(PLACEHOLDER_HASH, "must not be queried"));
		let executed = view.enter(&format!("/blob/{}", PLACEHOLDER_HASH)).await.unwrap();

		assert!(!executed);
		assert_eq!(view.input_hash(), PLACEHOLDER_HASH);
		assert_eq!(view.state().error, None);
	}

	#[tokio::test]
	async fn test_nested_deep_link_prefills_input_and_reports_error() {
		let mut view = controller(mock().with_failure("0x01", "must not be queried"));
		let executed = view.enter("/blob/0x01/extra").await.unwrap();

		assert!(!executed);
		assert_eq!(view.input_hash(), "0x01/extra");
		assert_eq!(view.state().error.as_deref(), Some(MALFORMED_DEEP_LINK));
		assert_eq!(view.state().data, BlobTransactionDetails::placeholder());
	}

	#[tokio::test]
	async fn test_non_deep_link_path_is_ignored() {
		let mut view = controller(mock());
		assert!(!view.enter("/").await.unwrap());
	}

	#[tokio::test]
	async fn test_qr_request_follows_hash_and_theme() {
		let mut view = controller(mock());
		assert_eq!(
			view.qr_request("https://blobs.example.org"),
			QrRequest {
				url: format!("https://blobs.example.org/blob/{}", PLACEHOLDER_HASH),
				theme: Theme::Dark,
			}
		);

		view.submit(BLOB_TX).await.unwrap();
		view.toggle_theme();

		let request = view.qr_request("https://blobs.example.org/");
		assert_eq!(request.url, format!("https://blobs.example.org/blob/{}", BLOB_TX));
		assert_eq!(request.theme, Theme::Light);
	}

	// Results are applied in arrival order with no staleness check, so a slow
	// lookup for an older hash can overwrite a newer result. This test pins
	// that accepted behavior rather than any ordering guarantee.
	#[tokio::test(start_paused = true)]
	async fn test_late_result_for_older_hash_overwrites_newer() {
		let lookup = Arc::new(LookupService::new(Box::new(
			mock().with_latency(BLOB_TX, Duration::from_secs(5)),
		)));
		let mut view = ViewController::new(lookup.clone(), Theme::Dark);

		let slow = tokio::spawn({
			let lookup = lookup.clone();
			async move { lookup.lookup(BLOB_TX).await }
		});
		let fast = lookup.lookup(OTHER_BLOB_TX).await;
		view.apply(OTHER_BLOB_TX, fast);
		assert_eq!(view.resolved_hash(), OTHER_BLOB_TX);
		assert_eq!(view.state().data.total_blob_cost, "131072");

		let stale = slow.await.unwrap();
		view.apply(BLOB_TX, stale);

		assert_eq!(view.resolved_hash(), BLOB_TX);
		assert_eq!(view.state().data.total_blob_cost, "262144");
	}
}
