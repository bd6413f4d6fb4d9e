//! JSON-RPC chain-data provider built on the Alloy library.
//!
//! Reads transactions, receipts and block headers from an Ethereum node and
//! flattens them into the plain chain records the lookup service consumes.

use crate::{ChainDataInterface, ProviderError, ProviderFactory, ProviderRegistry};
use alloy::consensus::Transaction as ConsensusTransaction;
use alloy::eips::BlockNumberOrTag;
use alloy::network::TransactionResponse;
use alloy::primitives::{hex, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use blob_types::{
	ChainBlock, ChainReceipt, ChainTransaction, ConfigSchema, Field, FieldType,
	ImplementationRegistry, Schema, ValidationError, DEFAULT_QUERY_TIMEOUT_SECONDS,
};
use std::fmt::Display;
use std::future::IntoFuture;
use std::time::Duration;

/// Alloy-based EVM chain-data provider.
///
/// Every RPC call is bounded by the configured timeout. Nothing is cached
/// and failed calls are not retried.
pub struct AlloyChainData {
	provider: DynProvider,
	timeout: Duration,
}

impl AlloyChainData {
	/// Creates a provider talking to the node at `rpc_url`.
	pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
		let url = rpc_url.parse().map_err(|e| {
			ProviderError::Configuration(format!("Invalid RPC URL {}: {}", rpc_url, e))
		})?;

		let provider = ProviderBuilder::new().connect_http(url).erased();

		Ok(Self { provider, timeout })
	}

	/// Awaits an RPC call, mapping both its failure and a timeout to a
	/// network error.
	async fn call<F, T, E>(&self, method: &str, request: F) -> Result<T, ProviderError>
	where
		F: IntoFuture<Output = Result<T, E>>,
		E: Display,
	{
		match tokio::time::timeout(self.timeout, request).await {
			Ok(Ok(value)) => Ok(value),
			Ok(Err(e)) => Err(ProviderError::Network(format!("{} failed: {}", method, e))),
			Err(_) => Err(ProviderError::Network(format!(
				"{} timed out after {}s",
				method,
				self.timeout.as_secs()
			))),
		}
	}
}

fn parse_hash(hash: &str) -> Result<TxHash, ProviderError> {
	hash.trim()
		.parse()
		.map_err(|e| ProviderError::InvalidInput(format!("Malformed transaction hash: {}", e)))
}

/// Configuration schema for the Alloy provider.
pub struct AlloyChainDataSchema;

impl AlloyChainDataSchema {
	/// Static validation method for use before instance creation
	pub fn validate_config(config: &toml::Value) -> Result<(), ValidationError> {
		let instance = Self;
		instance.validate(config)
	}
}

impl ConfigSchema for AlloyChainDataSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("rpc_url", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
						Ok(())
					},
					_ => Err("rpc_url must start with http:// or https://".to_string()),
				}
			})],
			vec![Field::new(
				"timeout_seconds",
				FieldType::Integer {
					min: Some(1),
					max: Some(300),
				},
			)],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl ChainDataInterface for AlloyChainData {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AlloyChainDataSchema)
	}

	async fn get_transaction(
		&self,
		hash: &str,
	) -> Result<Option<ChainTransaction>, ProviderError> {
		let tx_hash = parse_hash(hash)?;
		let tx = self
			.call(
				"eth_getTransactionByHash",
				self.provider.get_transaction_by_hash(tx_hash),
			)
			.await?;

		Ok(tx.map(|tx| ChainTransaction {
			hash: hex::encode_prefixed(TransactionResponse::tx_hash(&tx)),
			from: TransactionResponse::from(&tx).to_checksum(None),
			to: ConsensusTransaction::to(&tx).map(|address| address.to_checksum(None)),
			block_number: TransactionResponse::block_number(&tx),
			max_fee_per_blob_gas: ConsensusTransaction::max_fee_per_blob_gas(&tx),
			blob_versioned_hashes: ConsensusTransaction::blob_versioned_hashes(&tx)
				.map(|hashes| hashes.iter().map(hex::encode_prefixed).collect()),
		}))
	}

	async fn get_receipt(&self, hash: &str) -> Result<Option<ChainReceipt>, ProviderError> {
		let tx_hash = parse_hash(hash)?;
		let receipt = self
			.call(
				"eth_getTransactionReceipt",
				self.provider.get_transaction_receipt(tx_hash),
			)
			.await?;

		Ok(receipt.map(|receipt| ChainReceipt {
			transaction_hash: hex::encode_prefixed(receipt.transaction_hash),
			block_number: receipt.block_number,
			blob_gas_used: receipt.blob_gas_used.and_then(|used| u64::try_from(used).ok()),
			blob_gas_price: receipt.blob_gas_price.map(u128::from),
		}))
	}

	async fn get_block(&self, number: u64) -> Result<Option<ChainBlock>, ProviderError> {
		let block = self
			.call(
				"eth_getBlockByNumber",
				self.provider
					.get_block_by_number(BlockNumberOrTag::Number(number)),
			)
			.await?;

		Ok(block.map(|block| ChainBlock {
			number: block.header.number,
			timestamp: block.header.timestamp,
		}))
	}
}

/// Factory function to create an Alloy provider from configuration.
///
/// Configuration parameters:
/// - `rpc_url`: HTTP(S) endpoint of an Ethereum JSON-RPC node (required)
/// - `timeout_seconds`: per-call timeout, defaults to 30
pub fn create_provider(config: &toml::Value) -> Result<Box<dyn ChainDataInterface>, ProviderError> {
	AlloyChainDataSchema::validate_config(config)
		.map_err(|e| ProviderError::Configuration(format!("Invalid configuration: {}", e)))?;

	let rpc_url = config
		.get("rpc_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| ProviderError::Configuration("rpc_url is required".to_string()))?;

	let timeout_seconds = config
		.get("timeout_seconds")
		.and_then(|v| v.as_integer())
		.map(|secs| secs as u64)
		.unwrap_or(DEFAULT_QUERY_TIMEOUT_SECONDS);

	let provider = AlloyChainData::new(rpc_url, Duration::from_secs(timeout_seconds))?;
	Ok(Box::new(provider))
}

/// Registry for the Alloy provider implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "evm_alloy";
	type Factory = ProviderFactory;

	fn factory() -> Self::Factory {
		create_provider
	}
}

impl ProviderRegistry for Registry {}
