//! Blob transaction lookup module.
//!
//! This module turns a transaction hash into normalized blob transaction
//! data by querying a chain-data provider. Providers sit behind the
//! [`ChainDataInterface`] trait so the service can run against a live
//! JSON-RPC endpoint or an in-memory double.

use async_trait::async_trait;
use blob_types::{
	total_blob_cost, BlobTransactionDetails, ChainBlock, ChainReceipt, ChainTransaction,
	ConfigSchema, ImplementationRegistry, LookupOutcome, TransactionValidation,
};
use std::sync::Arc;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
	pub mod mock;
}

/// Errors raised by a chain-data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
	/// The provider could not be reached or returned an error.
	#[error("{0}")]
	Network(String),
	/// The input could not be turned into a provider query.
	#[error("{0}")]
	InvalidInput(String),
	/// The provider configuration is unusable.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Errors surfaced by the lookup service.
///
/// The display text is what the page shows to the user.
#[derive(Debug, Error)]
pub enum LookupError {
	/// The transaction query behind `validate` failed.
	#[error("Invalid transaction hash: {0}")]
	Validation(#[source] ProviderError),
	/// The transaction disappeared between validation and fetch.
	#[error("Failed to fetch blob data: Transaction not found")]
	TransactionNotFound,
	/// The transaction has no receipt.
	#[error("Failed to fetch blob data: Receipt not found")]
	ReceiptNotFound,
	/// One of the detail queries failed.
	#[error("Failed to fetch blob data: {0}")]
	Fetch(#[source] ProviderError),
}

/// Trait defining the interface for chain-data providers.
///
/// All methods are read-only. A missing record is `Ok(None)`; only a failed
/// query is an error.
#[async_trait]
pub trait ChainDataInterface: Send + Sync {
	/// Returns the configuration schema for this provider implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Fetches a transaction by hash.
	async fn get_transaction(&self, hash: &str)
		-> Result<Option<ChainTransaction>, ProviderError>;

	/// Fetches the receipt of a transaction by hash.
	async fn get_receipt(&self, hash: &str) -> Result<Option<ChainReceipt>, ProviderError>;

	/// Fetches a block header by number.
	async fn get_block(&self, number: u64) -> Result<Option<ChainBlock>, ProviderError>;
}

/// Type alias for provider factory functions.
pub type ProviderFactory = fn(&toml::Value) -> Result<Box<dyn ChainDataInterface>, ProviderError>;

/// Registry trait for provider implementations.
pub trait ProviderRegistry: ImplementationRegistry<Factory = ProviderFactory> {}

/// Get all registered provider implementations.
///
/// Returns a vector of (name, factory) tuples used by the service to build
/// the provider named in configuration.
pub fn get_all_implementations() -> Vec<(&'static str, ProviderFactory)> {
	use implementations::{evm::alloy, mock};

	vec![
		(alloy::Registry::NAME, alloy::Registry::factory()),
		(mock::Registry::NAME, mock::Registry::factory()),
	]
}

/// Service that looks up blob transactions through a chain-data provider.
///
/// The service holds no state besides the provider and can serve
/// concurrent lookups. It never caches and never retries.
#[derive(Clone)]
pub struct LookupService {
	provider: Arc<dyn ChainDataInterface>,
}

impl LookupService {
	/// Creates a new LookupService backed by the given provider.
	pub fn new(provider: Box<dyn ChainDataInterface>) -> Self {
		Self {
			provider: Arc::from(provider),
		}
	}

	/// Checks whether `hash` names a transaction and whether it carries blobs.
	///
	/// An unknown hash is a successful result with every flag false. Only a
	/// failed provider query is an error.
	pub async fn validate(&self, hash: &str) -> Result<TransactionValidation, LookupError> {
		let tx = self
			.provider
			.get_transaction(hash)
			.await
			.map_err(LookupError::Validation)?;

		let validation = match tx {
			None => TransactionValidation::not_found(),
			Some(tx) => TransactionValidation::found(tx.blob_hashes().len()),
		};

		tracing::debug!(
			tx_hash = %hash,
			valid = validation.is_valid_transaction,
			blobs = validation.blob_count,
			"Validated transaction"
		);

		Ok(validation)
	}

	/// Fetches the transaction, its receipt and its block, and assembles the
	/// normalized details.
	///
	/// Expects a prior `validate` that reported blob data, but does not rely
	/// on it: a vanished transaction or receipt is reported as its own error.
	pub async fn fetch_details(&self, hash: &str) -> Result<BlobTransactionDetails, LookupError> {
		let tx = self
			.provider
			.get_transaction(hash)
			.await
			.map_err(LookupError::Fetch)?
			.ok_or(LookupError::TransactionNotFound)?;

		let receipt = self
			.provider
			.get_receipt(hash)
			.await
			.map_err(LookupError::Fetch)?
			.ok_or(LookupError::ReceiptNotFound)?;

		// Pending transactions have no block to read a timestamp from
		let timestamp = match tx.block_number {
			Some(number) => self
				.provider
				.get_block(number)
				.await
				.map_err(LookupError::Fetch)?
				.map(|block| block.timestamp),
			None => None,
		};

		Ok(BlobTransactionDetails {
			total_blob_cost: total_blob_cost(receipt.blob_gas_used, receipt.blob_gas_price),
			from: tx.from,
			to: tx.to,
			block_number: tx.block_number,
			timestamp,
			blob_gas_used: receipt.blob_gas_used,
			blob_gas_price: receipt.blob_gas_price,
			max_fee_per_blob_gas: tx.max_fee_per_blob_gas,
			blob_versioned_hashes: tx.blob_versioned_hashes.unwrap_or_default(),
		})
	}

	/// Runs a full lookup cycle: validate, then fetch when blob-bearing.
	pub async fn lookup(&self, hash: &str) -> Result<LookupOutcome, LookupError> {
		let validation = self.validate(hash).await?;

		if !validation.is_valid_transaction {
			tracing::info!(tx_hash = %hash, "Transaction not found");
			return Ok(LookupOutcome::NotFound);
		}
		if !validation.has_blob_data {
			tracing::info!(tx_hash = %hash, "Transaction carries no blob data");
			return Ok(LookupOutcome::NoBlobData);
		}

		let details = self.fetch_details(hash).await?;
		tracing::info!(
			tx_hash = %hash,
			blobs = details.blob_versioned_hashes.len(),
			total_blob_cost = %details.total_blob_cost,
			"Fetched blob transaction"
		);

		Ok(LookupOutcome::Found(details))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use implementations::mock::MockChainData;

	const BLOB_TX: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
	const PLAIN_TX: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";
	const PENDING_TX: &str = "0x3333333333333333333333333333333333333333333333333333333333333333";
	const UNKNOWN_TX: &str = "0x4444444444444444444444444444444444444444444444444444444444444444";
	const SENDER: &str = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";
	const RECIPIENT: &str = "0xFF00000000000000000000000000000000000001";

	fn transaction(hash: &str, blobs: Option<Vec<&str>>, block: Option<u64>) -> ChainTransaction {
		ChainTransaction {
			hash: hash.to_string(),
			from: SENDER.to_string(),
			to: Some(RECIPIENT.to_string()),
			block_number: block,
			max_fee_per_blob_gas: Some(1_000_000_000),
			blob_versioned_hashes: blobs
				.map(|hashes| hashes.into_iter().map(str::to_string).collect()),
		}
	}

	fn receipt(hash: &str, used: Option<u64>, price: Option<u128>) -> ChainReceipt {
		ChainReceipt {
			transaction_hash: hash.to_string(),
			block_number: Some(19_426_587),
			blob_gas_used: used,
			blob_gas_price: price,
		}
	}

	fn service(mock: MockChainData) -> LookupService {
		LookupService::new(Box::new(mock))
	}

	fn populated() -> MockChainData {
		MockChainData::new()
			.with_transaction(transaction(
				BLOB_TX,
				Some(vec!["0x01aa", "0x01bb"]),
				Some(19_426_587),
			))
			.with_receipt(receipt(BLOB_TX, Some(131_072), Some(2)))
			.with_block(ChainBlock {
				number: 19_426_587,
				timestamp: 1_710_338_135,
			})
			.with_transaction(transaction(PLAIN_TX, Some(vec![]), Some(19_426_587)))
			.with_receipt(receipt(PLAIN_TX, None, None))
	}

	#[tokio::test]
	async fn test_validate_unknown_hash_is_not_an_error() {
		let validation = service(populated()).validate(UNKNOWN_TX).await.unwrap();
		assert_eq!(validation, TransactionValidation::not_found());
	}

	#[tokio::test]
	async fn test_validate_transaction_without_blobs() {
		let validation = service(populated()).validate(PLAIN_TX).await.unwrap();
		assert!(validation.is_valid_transaction);
		assert!(!validation.has_blob_data);
		assert_eq!(validation.blob_count, 0);
	}

	#[tokio::test]
	async fn test_validate_absent_blob_list_reads_as_empty() {
		let mock = MockChainData::new().with_transaction(transaction(PLAIN_TX, None, Some(1)));
		let validation = service(mock).validate(PLAIN_TX).await.unwrap();
		assert_eq!(validation, TransactionValidation::found(0));
	}

	#[tokio::test]
	async fn test_validate_counts_blobs() {
		let validation = service(populated()).validate(BLOB_TX).await.unwrap();
		assert!(validation.has_blob_data);
		assert_eq!(validation.blob_count, 2);
	}

	#[tokio::test]
	async fn test_validate_wraps_provider_failure() {
		let mock = populated().with_failure(BLOB_TX, "connection refused");
		let err = service(mock).validate(BLOB_TX).await.unwrap_err();

		assert!(matches!(err, LookupError::Validation(_)));
		assert_eq!(err.to_string(), "Invalid transaction hash: connection refused");
	}

	#[tokio::test]
	async fn test_fetch_details_assembles_record() {
		let details = service(populated()).fetch_details(BLOB_TX).await.unwrap();

		assert_eq!(details.from, SENDER);
		assert_eq!(details.to.as_deref(), Some(RECIPIENT));
		assert_eq!(details.block_number, Some(19_426_587));
		assert_eq!(details.timestamp, Some(1_710_338_135));
		assert_eq!(details.blob_gas_used, Some(131_072));
		assert_eq!(details.blob_gas_price, Some(2));
		assert_eq!(details.max_fee_per_blob_gas, Some(1_000_000_000));
		assert_eq!(details.blob_versioned_hashes, vec!["0x01aa", "0x01bb"]);
		assert_eq!(details.total_blob_cost, "262144");
	}

	#[tokio::test]
	async fn test_fetch_details_without_blob_price_costs_zero() {
		let mock = MockChainData::new()
			.with_transaction(transaction(BLOB_TX, Some(vec!["0x01aa"]), None))
			.with_receipt(receipt(BLOB_TX, Some(131_072), None));

		let details = service(mock).fetch_details(BLOB_TX).await.unwrap();
		assert_eq!(details.total_blob_cost, "0");
	}

	#[tokio::test]
	async fn test_fetch_details_pending_transaction_has_no_timestamp() {
		let mock = MockChainData::new()
			.with_transaction(transaction(PENDING_TX, Some(vec!["0x01aa"]), None))
			.with_receipt(receipt(PENDING_TX, Some(131_072), Some(1)))
			// Genesis must never be consulted for a pending transaction
			.with_block(ChainBlock {
				number: 0,
				timestamp: 1_438_269_973,
			});

		let details = service(mock).fetch_details(PENDING_TX).await.unwrap();
		assert_eq!(details.block_number, None);
		assert_eq!(details.timestamp, None);
		assert_eq!(details.total_blob_cost, "131072");
	}

	#[tokio::test]
	async fn test_fetch_details_missing_transaction() {
		let err = service(populated()).fetch_details(UNKNOWN_TX).await.unwrap_err();

		assert!(matches!(err, LookupError::TransactionNotFound));
		assert!(err.to_string().contains("Transaction not found"));
	}

	#[tokio::test]
	async fn test_fetch_details_missing_receipt() {
		let mock = MockChainData::new().with_transaction(transaction(
			BLOB_TX,
			Some(vec!["0x01aa"]),
			Some(1),
		));
		let err = service(mock).fetch_details(BLOB_TX).await.unwrap_err();

		assert!(matches!(err, LookupError::ReceiptNotFound));
		assert!(err.to_string().contains("Receipt not found"));
	}

	#[tokio::test]
	async fn test_fetch_details_wraps_provider_failure() {
		let mock = populated().with_failure(BLOB_TX, "upstream returned 503");
		let err = service(mock).fetch_details(BLOB_TX).await.unwrap_err();

		assert_eq!(err.to_string(), "Failed to fetch blob data: upstream returned 503");
	}

	#[tokio::test]
	async fn test_lookup_outcomes() {
		let service = service(populated());

		assert_eq!(service.lookup(UNKNOWN_TX).await.unwrap(), LookupOutcome::NotFound);
		assert_eq!(service.lookup(PLAIN_TX).await.unwrap(), LookupOutcome::NoBlobData);

		match service.lookup(BLOB_TX).await.unwrap() {
			LookupOutcome::Found(details) => assert_eq!(details.total_blob_cost, "262144"),
			other => panic!("Expected Found, got {:?}", other),
		}
	}

	#[test]
	fn test_all_implementations_registered() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["evm_alloy", "mock"]);
	}
}
