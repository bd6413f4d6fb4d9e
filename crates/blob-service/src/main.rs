//! Main entry point for the blob transaction viewer.
//!
//! Loads configuration, builds the configured chain-data provider and serves
//! the viewer page, the `/blob/{hash}` deep links and the JSON API.

use blob_config::Config;
use blob_lookup::LookupService;
use clap::Parser;
use std::path::PathBuf;

mod apis;
mod controller;
mod factory_registry;
mod page;
mod server;

/// Command-line arguments for the viewer service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config_path = args.config.to_string_lossy();
	let config = Config::from_file(&config_path).await?;
	tracing::info!("Loaded configuration from {}", config_path);

	let provider = factory_registry::build_provider(&config)?;
	let lookup = LookupService::new(provider);

	server::start_server(config, lookup).await?;

	tracing::info!("Stopped blob viewer");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_args_default_values() {
		let args = Args::parse_from(["blob-viewer"]);

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_args_custom_values() {
		let args = Args::parse_from(["blob-viewer", "-c", "custom.toml", "--log-level", "debug"]);

		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
	}

	#[tokio::test]
	async fn test_sample_config_loads_and_builds() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(
			&path,
			r#"
[provider]
primary = "evm_alloy"
[provider.implementations.evm_alloy]
rpc_url = "${BLOB_VIEWER_TEST_RPC_URL:-http://127.0.0.1:8545}"
timeout_seconds = 5

[api]
port = 3100

[display]
theme = "light"
"#,
		)
		.unwrap();

		let config = Config::from_file(path.to_str().unwrap()).await.unwrap();
		assert_eq!(config.api.port, 3100);
		assert_eq!(config.api.origin(), "http://127.0.0.1:3100");

		assert!(factory_registry::build_provider(&config).is_ok());
	}

	#[tokio::test]
	async fn test_shipped_config_loads_and_serves_seeded_mock() {
		let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/config.toml");
		let mut config = Config::from_file(path).await.unwrap();

		// Sections from the included display.toml
		assert_eq!(config.display.theme, blob_types::Theme::Dark);
		assert_eq!(config.qr.width, 512);
		assert!(factory_registry::build_provider(&config).is_ok());

		config.provider.primary = "mock".to_string();
		let lookup = LookupService::new(factory_registry::build_provider(&config).unwrap());
		let outcome = lookup
			.lookup("0x1111111111111111111111111111111111111111111111111111111111111111")
			.await
			.unwrap();

		match outcome {
			blob_types::LookupOutcome::Found(details) => {
				assert_eq!(details.total_blob_cost, "262144");
				assert_eq!(details.timestamp, Some(1_710_338_135));
			},
			other => panic!("Expected Found, got {:?}", other),
		}
	}
}
