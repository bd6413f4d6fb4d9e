//! Factory registry for chain-data provider implementations.
//!
//! Providers register themselves by name; the configuration's `primary`
//! entry picks which one the service builds.

use blob_config::Config;
use blob_lookup::{ChainDataInterface, ProviderFactory};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Registry of provider factories keyed by implementation name.
pub struct FactoryRegistry {
	pub providers: HashMap<String, ProviderFactory>,
}

impl FactoryRegistry {
	/// Create a new empty registry
	pub fn new() -> Self {
		Self {
			providers: HashMap::new(),
		}
	}

	/// Register a provider implementation
	pub fn register_provider(&mut self, name: impl Into<String>, factory: ProviderFactory) {
		self.providers.insert(name.into(), factory);
	}

	/// Registered names, sorted.
	pub fn available(&self) -> Vec<&str> {
		let mut names: Vec<_> = self.providers.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}
}

static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Get the global registry, populating it on first use.
pub fn get_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();

		for (name, factory) in blob_lookup::get_all_implementations() {
			tracing::debug!("Registering provider implementation: {}", name);
			registry.register_provider(name, factory);
		}

		registry
	})
}

/// Builds the primary chain-data provider named in the configuration.
pub fn build_provider(
	config: &Config,
) -> Result<Box<dyn ChainDataInterface>, Box<dyn std::error::Error>> {
	let registry = get_registry();
	let name = &config.provider.primary;

	let factory = registry.providers.get(name).ok_or_else(|| {
		format!(
			"Unknown provider implementation '{}'. Available: [{}]",
			name,
			registry.available().join(", ")
		)
	})?;

	let provider_config = config
		.provider
		.primary_config()
		.ok_or_else(|| format!("No configuration for provider implementation '{}'", name))?;

	let provider = factory(provider_config)?;
	tracing::info!("Using chain-data provider: {}", name);

	Ok(provider)
}
