//! QR code rendering for blob deep links.
//!
//! Encodes a deep-link URL as an SVG QR code in the palette of the active
//! theme. The SVG is returned both as markup and as a base64 data URL that
//! can be dropped into an `<img>` tag.

use base64::Engine;
use blob_config::QrConfig;
use blob_types::Theme;
use qrcode::{Color, EcLevel, QrCode};
use std::fmt::Write;
use thiserror::Error;

/// Errors that can occur while rendering a QR code.
#[derive(Debug, Error)]
pub enum QrError {
	#[error("Cannot encode an empty URL")]
	EmptyInput,
	#[error("Failed to encode QR code: {0}")]
	Encode(String),
}

/// A rendered QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
	svg: String,
}

impl QrImage {
	/// SVG markup of the code.
	pub fn svg(&self) -> &str {
		&self.svg
	}

	/// The SVG as a `data:image/svg+xml;base64,` URL.
	pub fn data_url(&self) -> String {
		format!(
			"data:image/svg+xml;base64,{}",
			base64::engine::general_purpose::STANDARD.encode(self.svg.as_bytes())
		)
	}

	pub fn into_svg(self) -> String {
		self.svg
	}
}

/// Renders deep-link QR codes with a fixed size and per-theme palettes.
#[derive(Debug, Clone)]
pub struct QrRenderer {
	config: QrConfig,
}

impl QrRenderer {
	pub fn new(config: QrConfig) -> Self {
		Self { config }
	}

	/// Encodes `url` with medium error correction in the palette of `theme`.
	pub fn render(&self, url: &str, theme: Theme) -> Result<QrImage, QrError> {
		if url.is_empty() {
			return Err(QrError::EmptyInput);
		}

		let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::M)
			.map_err(|e| QrError::Encode(e.to_string()))?;

		let svg = self.to_svg(&code, theme);
		tracing::debug!(%url, %theme, modules = code.width(), "Rendered QR code");

		Ok(QrImage { svg })
	}

	/// Draws one unit square per dark module; the quiet zone is part of the
	/// view box so the image scales without resampling.
	fn to_svg(&self, code: &QrCode, theme: Theme) -> String {
		let palette = self.config.palette(theme);
		let modules = code.width();
		let margin = self.config.margin as usize;
		let extent = modules + 2 * margin;

		let mut path = String::new();
		for (index, color) in code.to_colors().into_iter().enumerate() {
			if color == Color::Dark {
				let x = index % modules + margin;
				let y = index / modules + margin;
				// Writing to a String cannot fail
				let _ = write!(path, "M{x} {y}h1v1h-1z");
			}
		}

		format!(
			concat!(
				r#"<?xml version="1.0" encoding="UTF-8"?>"#,
				r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" "#,
				r#"width="{size}" height="{size}" viewBox="0 0 {extent} {extent}" "#,
				r#"shape-rendering="crispEdges">"#,
				r#"<rect width="{extent}" height="{extent}" fill="{background}"/>"#,
				r#"<path fill="{foreground}" d="{path}"/>"#,
				"</svg>"
			),
			size = self.config.width,
			extent = extent,
			background = palette.background,
			foreground = palette.foreground,
			path = path,
		)
	}
}
