//! Chain records returned by chain-data providers.
//!
//! Providers translate whatever their RPC client returns into these plain
//! records, which keeps the lookup service independent of any client crate.

use serde::{Deserialize, Serialize};

/// Transaction fields the lookup service reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTransaction {
	/// Transaction hash, 0x-prefixed.
	pub hash: String,
	/// Sender address.
	pub from: String,
	/// Recipient address, absent for contract creation.
	#[serde(default)]
	pub to: Option<String>,
	/// Including block number, absent while pending.
	#[serde(default)]
	pub block_number: Option<u64>,
	/// Only set on blob (type 3) transactions.
	#[serde(default)]
	pub max_fee_per_blob_gas: Option<u128>,
	/// Only set on blob (type 3) transactions.
	#[serde(default)]
	pub blob_versioned_hashes: Option<Vec<String>>,
}

impl ChainTransaction {
	/// Blob versioned hashes, treating an absent list as empty.
	pub fn blob_hashes(&self) -> &[String] {
		self.blob_versioned_hashes.as_deref().unwrap_or(&[])
	}
}

/// Receipt fields the lookup service reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReceipt {
	pub transaction_hash: String,
	#[serde(default)]
	pub block_number: Option<u64>,
	#[serde(default)]
	pub blob_gas_used: Option<u64>,
	#[serde(default)]
	pub blob_gas_price: Option<u128>,
}

/// Block fields the lookup service reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainBlock {
	pub number: u64,
	/// Unix seconds.
	pub timestamp: u64,
}
