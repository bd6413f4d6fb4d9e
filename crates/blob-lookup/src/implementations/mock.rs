//! In-memory chain-data provider.
//!
//! Serves records seeded from configuration or added in code. Used for local
//! demos without a node and as the provider double in tests.

use crate::{ChainDataInterface, ProviderError, ProviderFactory, ProviderRegistry};
use async_trait::async_trait;
use blob_types::{
	ChainBlock, ChainReceipt, ChainTransaction, ConfigSchema, Field, FieldType,
	with_0x_prefix, ImplementationRegistry, Schema, ValidationError,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// In-memory chain-data provider.
///
/// Hashes are matched case-insensitively, with or without the `0x` prefix.
/// Failures and latency can be injected per hash to exercise error paths
/// and slow lookups.
#[derive(Debug, Clone, Default)]
pub struct MockChainData {
	transactions: HashMap<String, ChainTransaction>,
	receipts: HashMap<String, ChainReceipt>,
	blocks: HashMap<u64, ChainBlock>,
	failures: HashMap<String, String>,
	latency: HashMap<String, Duration>,
}

/// Lowercase `0x`-prefixed form of `hash`; `0x`, `0X` and no prefix all
/// map to the same key.
fn key(hash: &str) -> String {
	let hash = hash.trim();
	let bare = hash
		.strip_prefix("0x")
		.or_else(|| hash.strip_prefix("0X"))
		.unwrap_or(hash);
	with_0x_prefix(&bare.to_lowercase())
}

impl MockChainData {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_transaction(mut self, tx: ChainTransaction) -> Self {
		self.transactions.insert(key(&tx.hash), tx);
		self
	}

	pub fn with_receipt(mut self, receipt: ChainReceipt) -> Self {
		self.receipts.insert(key(&receipt.transaction_hash), receipt);
		self
	}

	pub fn with_block(mut self, block: ChainBlock) -> Self {
		self.blocks.insert(block.number, block);
		self
	}

	/// Makes every query for `hash` fail with a network error.
	pub fn with_failure(mut self, hash: &str, message: impl Into<String>) -> Self {
		self.failures.insert(key(hash), message.into());
		self
	}

	/// Delays every query for `hash` by `delay`.
	pub fn with_latency(mut self, hash: &str, delay: Duration) -> Self {
		self.latency.insert(key(hash), delay);
		self
	}

	async fn simulate(&self, hash: &str) -> Result<String, ProviderError> {
		let key = key(hash);
		if let Some(delay) = self.latency.get(&key) {
			tokio::time::sleep(*delay).await;
		}
		if let Some(message) = self.failures.get(&key) {
			return Err(ProviderError::Network(message.clone()));
		}
		Ok(key)
	}
}

/// Seed records accepted in the `mock` configuration block.
#[derive(Debug, Default, Deserialize)]
struct MockSeed {
	#[serde(default)]
	transactions: Vec<ChainTransaction>,
	#[serde(default)]
	receipts: Vec<ChainReceipt>,
	#[serde(default)]
	blocks: Vec<ChainBlock>,
}

/// Configuration schema for the mock provider.
pub struct MockChainDataSchema;

impl ConfigSchema for MockChainDataSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let records = |name: &str| {
			let record = FieldType::Table(Schema::new(vec![], vec![]));
			Field::new(name, FieldType::Array(Box::new(record)))
		};
		let schema = Schema::new(
			vec![],
			vec![records("transactions"), records("receipts"), records("blocks")],
		);

		schema.validate(config)?;

		// Field-level shape of each record is checked by deserializing it
		config
			.clone()
			.try_into::<MockSeed>()
			.map(|_| ())
			.map_err(|e| ValidationError::DeserializationError(e.to_string()))
	}
}

#[async_trait]
impl ChainDataInterface for MockChainData {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MockChainDataSchema)
	}

	async fn get_transaction(
		&self,
		hash: &str,
	) -> Result<Option<ChainTransaction>, ProviderError> {
		let key = self.simulate(hash).await?;
		Ok(self.transactions.get(&key).cloned())
	}

	async fn get_receipt(&self, hash: &str) -> Result<Option<ChainReceipt>, ProviderError> {
		let key = self.simulate(hash).await?;
		Ok(self.receipts.get(&key).cloned())
	}

	async fn get_block(&self, number: u64) -> Result<Option<ChainBlock>, ProviderError> {
		Ok(self.blocks.get(&number).copied())
	}
}

/// Factory function to create a mock provider from configuration.
///
/// Configuration parameters (all optional):
/// - `transactions`: array of transaction records
/// - `receipts`: array of receipt records
/// - `blocks`: array of block records
pub fn create_provider(config: &toml::Value) -> Result<Box<dyn ChainDataInterface>, ProviderError> {
	MockChainDataSchema
		.validate(config)
		.map_err(|e| ProviderError::Configuration(format!("Invalid configuration: {}", e)))?;

	let seed: MockSeed = config
		.clone()
		.try_into()
		.map_err(|e| ProviderError::Configuration(format!("Invalid mock records: {}", e)))?;

	let mut provider = MockChainData::new();
	for tx in seed.transactions {
		provider = provider.with_transaction(tx);
	}
	for receipt in seed.receipts {
		provider = provider.with_receipt(receipt);
	}
	for block in seed.blocks {
		provider = provider.with_block(block);
	}

	tracing::debug!(
		transactions = provider.transactions.len(),
		receipts = provider.receipts.len(),
		blocks = provider.blocks.len(),
		"Seeded mock chain data"
	);

	Ok(Box::new(provider))
}

/// Registry for the mock provider implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "mock";
	type Factory = ProviderFactory;

	fn factory() -> Self::Factory {
		create_provider
	}
}

impl ProviderRegistry for Registry {}
