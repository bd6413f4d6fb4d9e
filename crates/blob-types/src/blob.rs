//! Blob transaction data model.
//!
//! These records are built fresh for every lookup and never persisted. The
//! serialized field names follow the camelCase shape that the page and the
//! JSON API expose.

use crate::links::PLACEHOLDER_HASH;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Message shown when the provider has no record of a hash.
pub const TRANSACTION_NOT_FOUND: &str = "Transaction not found";

/// Message shown when a transaction exists but carries no blobs.
pub const NO_BLOB_DATA: &str = "No blob data found in this transaction";

/// Most chain-data queries one lookup cycle makes, in sequence: the
/// validation read, then transaction, receipt and block.
pub const MAX_QUERIES_PER_LOOKUP: u64 = 4;

/// Per-query timeout of a provider whose configuration sets none.
pub const DEFAULT_QUERY_TIMEOUT_SECONDS: u64 = 5;

/// Result of checking whether a hash refers to a blob-carrying transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionValidation {
	/// True iff the provider returned a transaction for the hash.
	pub is_valid_transaction: bool,
	/// True iff the transaction lists at least one blob versioned hash.
	pub has_blob_data: bool,
	/// Number of blob versioned hashes on the transaction.
	pub blob_count: usize,
}

impl TransactionValidation {
	/// Validation result for a hash the provider does not know.
	pub fn not_found() -> Self {
		Self {
			is_valid_transaction: false,
			has_blob_data: false,
			blob_count: 0,
		}
	}

	/// Validation result for an existing transaction with `blob_count` blobs.
	pub fn found(blob_count: usize) -> Self {
		Self {
			is_valid_transaction: true,
			has_blob_data: blob_count > 0,
			blob_count,
		}
	}

	/// Whether the details fetch should run for this hash.
	pub fn is_blob_transaction(&self) -> bool {
		self.is_valid_transaction && self.has_blob_data
	}
}

/// Normalized view of a blob transaction, its receipt and its block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobTransactionDetails {
	/// Sender address.
	pub from: String,
	/// Recipient address, absent for contract creation.
	pub to: Option<String>,
	/// Number of the block that includes the transaction.
	pub block_number: Option<u64>,
	/// Block timestamp in unix seconds.
	pub timestamp: Option<u64>,
	/// Blob gas consumed, from the receipt.
	pub blob_gas_used: Option<u64>,
	/// Blob gas price paid, from the receipt.
	pub blob_gas_price: Option<u128>,
	/// Maximum fee per blob gas the sender was willing to pay.
	pub max_fee_per_blob_gas: Option<u128>,
	/// Versioned hashes of the attached blobs, in transaction order.
	pub blob_versioned_hashes: Vec<String>,
	/// `blob_gas_used * blob_gas_price` as a decimal string, or "0".
	pub total_blob_cost: String,
}

impl BlobTransactionDetails {
	/// Dummy record shown before the first lookup completes.
	pub fn placeholder() -> Self {
		Self {
			from: "0x0000000000000000000000000000000000000000".to_string(),
			to: None,
			block_number: None,
			timestamp: None,
			blob_gas_used: None,
			blob_gas_price: None,
			max_fee_per_blob_gas: None,
			blob_versioned_hashes: vec![PLACEHOLDER_HASH.to_string()],
			total_blob_cost: "0".to_string(),
		}
	}
}

/// Computes the total blob cost in wei as a decimal string.
///
/// Returns "0" unless both inputs are present. The product is taken in
/// 256-bit arithmetic so it cannot overflow.
pub fn total_blob_cost(blob_gas_used: Option<u64>, blob_gas_price: Option<u128>) -> String {
	match (blob_gas_used, blob_gas_price) {
		(Some(used), Some(price)) => (U256::from(used) * U256::from(price)).to_string(),
		_ => "0".to_string(),
	}
}

/// Structured result of a full validate-then-fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
	/// The provider has no transaction for the hash.
	NotFound,
	/// The transaction exists but carries no blob versioned hashes.
	NoBlobData,
	/// The transaction carries blobs and its details were fetched.
	Found(BlobTransactionDetails),
}

impl LookupOutcome {
	/// User-facing message for outcomes that end the cycle without data.
	pub fn message(&self) -> Option<&'static str> {
		match self {
			LookupOutcome::NotFound => Some(TRANSACTION_NOT_FOUND),
			LookupOutcome::NoBlobData => Some(NO_BLOB_DATA),
			LookupOutcome::Found(_) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_total_blob_cost_multiplies_when_both_present() {
		assert_eq!(total_blob_cost(Some(131_072), Some(1)), "131072");
		assert_eq!(total_blob_cost(Some(131_072), Some(2)), "262144");
	}

	#[test]
	fn test_total_blob_cost_defaults_to_zero() {
		assert_eq!(total_blob_cost(None, Some(2)), "0");
		assert_eq!(total_blob_cost(Some(131_072), None), "0");
		assert_eq!(total_blob_cost(None, None), "0");
	}

	#[test]
	fn test_total_blob_cost_does_not_overflow() {
		let cost = total_blob_cost(Some(u64::MAX), Some(u128::MAX));
		let expected = U256::from(u64::MAX) * U256::from(u128::MAX);
		assert_eq!(cost, expected.to_string());
	}

	#[test]
	fn test_validation_constructors() {
		assert_eq!(
			TransactionValidation::not_found(),
			TransactionValidation {
				is_valid_transaction: false,
				has_blob_data: false,
				blob_count: 0,
			}
		);

		let empty = TransactionValidation::found(0);
		assert!(empty.is_valid_transaction);
		assert!(!empty.has_blob_data);
		assert!(!empty.is_blob_transaction());

		let three = TransactionValidation::found(3);
		assert!(three.has_blob_data);
		assert_eq!(three.blob_count, 3);
		assert!(three.is_blob_transaction());
	}

	#[test]
	fn test_details_serialize_camel_case() {
		let details = BlobTransactionDetails {
			from: "0xabc".to_string(),
			to: None,
			block_number: Some(19_426_587),
			timestamp: Some(1_710_338_135),
			blob_gas_used: Some(131_072),
			blob_gas_price: Some(1),
			max_fee_per_blob_gas: Some(1_000_000_000),
			blob_versioned_hashes: vec!["0x01".to_string()],
			total_blob_cost: "131072".to_string(),
		};

		let json = serde_json::to_value(&details).unwrap();
		assert_eq!(json["blockNumber"], 19_426_587);
		assert_eq!(json["blobGasUsed"], 131_072);
		assert_eq!(json["totalBlobCost"], "131072");
		assert_eq!(json["blobVersionedHashes"][0], "0x01");
		assert!(json["to"].is_null());
	}

	#[test]
	fn test_outcome_messages() {
		assert_eq!(LookupOutcome::NotFound.message(), Some("Transaction not found"));
		assert_eq!(
			LookupOutcome::NoBlobData.message(),
			Some("No blob data found in this transaction")
		);
		assert_eq!(
			LookupOutcome::Found(BlobTransactionDetails::placeholder()).message(),
			None
		);
	}
}
