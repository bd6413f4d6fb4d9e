//! Configuration module for the blob transaction viewer.
//!
//! Configuration is read from TOML. `${VAR}` and `${VAR:-default}` are
//! substituted from the environment before parsing, and the parsed result
//! is validated before it is handed out.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["file1.toml", "file2.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

mod loader;

use blob_types::{Theme, DEFAULT_QUERY_TIMEOUT_SECONDS, MAX_QUERIES_PER_LOOKUP};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Chain-data provider selection and per-implementation settings.
	pub provider: ProviderConfig,
	/// HTTP server settings.
	#[serde(default)]
	pub api: ApiConfig,
	/// Page presentation defaults.
	#[serde(default)]
	pub display: DisplayConfig,
	/// QR code rendering settings.
	#[serde(default)]
	pub qr: QrConfig,
}

/// Configuration for the chain-data provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Map of provider implementation names to their configurations.
	/// Each implementation validates its own block.
	pub implementations: HashMap<String, toml::Value>,
}

impl ProviderConfig {
	/// Configuration block of the primary implementation.
	pub fn primary_config(&self) -> Option<&toml::Value> {
		self.implementations.get(&self.primary)
	}

	/// Per-query timeout of the primary implementation, falling back to the
	/// provider default when its block sets none.
	pub fn query_timeout_seconds(&self) -> u64 {
		self.primary_config()
			.and_then(|block| block.get("timeout_seconds"))
			.and_then(toml::Value::as_integer)
			.and_then(|seconds| u64::try_from(seconds).ok())
			.unwrap_or(DEFAULT_QUERY_TIMEOUT_SECONDS)
	}
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Origin used in shareable links, e.g. `https://blobs.example.org`.
	/// Falls back to `http://{host}:{port}` when unset.
	pub public_origin: Option<String>,
	/// Request timeout in seconds.
	#[serde(default = "default_api_timeout")]
	pub timeout_seconds: u64,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			host: default_api_host(),
			port: default_api_port(),
			public_origin: None,
			timeout_seconds: default_api_timeout(),
		}
	}
}

impl ApiConfig {
	/// Origin that deep links and QR codes point at.
	pub fn origin(&self) -> String {
		self.public_origin
			.clone()
			.unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
	}

	/// `host:port` string to bind the listener to.
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}
}

/// Page presentation defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
	/// Theme used when a request does not pick one.
	#[serde(default)]
	pub theme: Theme,
}

/// Foreground and background colors for one theme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QrPalette {
	/// Color of dark modules, `#rrggbb`.
	pub foreground: String,
	/// Color of light modules and the margin, `#rrggbb`.
	pub background: String,
}

/// QR rendering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QrConfig {
	/// Output image width and height in pixels.
	#[serde(default = "default_qr_width")]
	pub width: u32,
	/// Quiet zone around the code, in modules.
	#[serde(default = "default_qr_margin")]
	pub margin: u32,
	#[serde(default = "default_dark_palette")]
	pub dark: QrPalette,
	#[serde(default = "default_light_palette")]
	pub light: QrPalette,
}

impl Default for QrConfig {
	fn default() -> Self {
		Self {
			width: default_qr_width(),
			margin: default_qr_margin(),
			dark: default_dark_palette(),
			light: default_light_palette(),
		}
	}
}

impl QrConfig {
	/// Palette for the given theme.
	pub fn palette(&self, theme: Theme) -> &QrPalette {
		match theme {
			Theme::Dark => &self.dark,
			Theme::Light => &self.light,
		}
	}
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	3000
}

fn default_api_timeout() -> u64 {
	30
}

fn default_qr_width() -> u32 {
	512
}

fn default_qr_margin() -> u32 {
	2
}

fn default_dark_palette() -> QrPalette {
	QrPalette {
		foreground: "#4ade80".to_string(),
		background: "#0f172a".to_string(),
	}
}

fn default_light_palette() -> QrPalette {
	QrPalette {
		foreground: "#059669".to_string(),
		background: "#f0fdf4".to_string(),
	}
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

fn is_hex_color(value: &str) -> bool {
	value.len() == 7
		&& value.starts_with('#')
		&& value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl Config {
	/// Loads configuration from a file, following include directives.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Validates cross-field constraints that serde cannot express.
	fn validate(&self) -> Result<(), ConfigError> {
		// Validate provider config
		if self.provider.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Provider primary implementation cannot be empty".into(),
			));
		}
		if self.provider.primary_config().is_none() {
			return Err(ConfigError::Validation(format!(
				"Primary provider '{}' not found in implementations",
				self.provider.primary
			)));
		}

		// Validate api config
		if self.api.port == 0 {
			return Err(ConfigError::Validation("API port cannot be 0".into()));
		}
		if self.api.timeout_seconds == 0 || self.api.timeout_seconds > 300 {
			return Err(ConfigError::Validation(
				"API timeout_seconds must be between 1 and 300".into(),
			));
		}
		// A lookup must be able to fail on its own before the request does
		let lookup_budget = MAX_QUERIES_PER_LOOKUP * self.provider.query_timeout_seconds();
		if self.api.timeout_seconds <= lookup_budget {
			return Err(ConfigError::Validation(format!(
				"API timeout_seconds ({}) must exceed {} provider queries of {}s each",
				self.api.timeout_seconds,
				MAX_QUERIES_PER_LOOKUP,
				self.provider.query_timeout_seconds()
			)));
		}
		if let Some(ref origin) = self.api.public_origin {
			if !(origin.starts_with("http://") || origin.starts_with("https://")) {
				return Err(ConfigError::Validation(format!(
					"public_origin '{}' must start with http:// or https://",
					origin
				)));
			}
			if origin.ends_with('/') {
				return Err(ConfigError::Validation(format!(
					"public_origin '{}' must not end with '/'",
					origin
				)));
			}
		}

		// Validate qr config
		if !(64..=2048).contains(&self.qr.width) {
			return Err(ConfigError::Validation(
				"QR width must be between 64 and 2048 pixels".into(),
			));
		}
		if self.qr.margin > 16 {
			return Err(ConfigError::Validation(
				"QR margin cannot exceed 16 modules".into(),
			));
		}
		for (theme, palette) in [("dark", &self.qr.dark), ("light", &self.qr.light)] {
			for (role, color) in [
				("foreground", &palette.foreground),
				("background", &palette.background),
			] {
				if !is_hex_color(color) {
					return Err(ConfigError::Validation(format!(
						"QR {} {} color '{}' must be in #rrggbb form",
						theme, role, color
					)));
				}
			}
		}

		Ok(())
	}
}

/// Parses a TOML string, resolving environment variables and validating
/// the result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
