//! Display theme.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page and QR color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
	#[default]
	Dark,
	Light,
}

impl Theme {
	/// The other theme.
	pub fn toggled(self) -> Self {
		match self {
			Theme::Dark => Theme::Light,
			Theme::Light => Theme::Dark,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Theme::Dark => "dark",
			Theme::Light => "light",
		}
	}
}

impl fmt::Display for Theme {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Theme {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"dark" => Ok(Theme::Dark),
			"light" => Ok(Theme::Light),
			other => Err(format!("Unknown theme '{}', expected 'dark' or 'light'", other)),
		}
	}
}
