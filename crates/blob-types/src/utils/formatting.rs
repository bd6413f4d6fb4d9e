//! String formatting utilities.
//!
//! Provides functions for formatting values for display, including hex
//! prefix management, digit grouping and timestamp rendering.

use chrono::DateTime;

/// Adds "0x" prefix to a hex string if it doesn't already have one.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Formats an integer with comma thousands separators.
///
/// `18472389` becomes `"18,472,389"`.
pub fn format_grouped(value: u64) -> String {
	let digits = value.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);

	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(c);
	}

	out
}

/// Formats unix seconds as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Falls back to the raw number for values chrono cannot represent.
pub fn format_timestamp(unix_seconds: u64) -> String {
	i64::try_from(unix_seconds)
		.ok()
		.and_then(|secs| DateTime::from_timestamp(secs, 0))
		.map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
		.unwrap_or_else(|| unix_seconds.to_string())
}
