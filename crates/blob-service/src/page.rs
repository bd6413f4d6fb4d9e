//! HTML rendering of the viewer page.
//!
//! Every piece of text that can originate from a request or from the chain
//! goes through [`Escape`] before it reaches the markup.

use crate::controller::ViewController;
use blob_qr::{QrError, QrImage};
use blob_types::{
	blob_path, format_grouped, format_timestamp, is_placeholder_hash, BlobTransactionDetails,
	Theme,
};
use html_escaper::HtmlEscaper;
use std::fmt::{self, Display, Formatter, Write};

/// Display wrapper that HTML-escapes the wrapped value.
struct Escape<T: Display>(T);

impl<T: Display> Display for Escape<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(HtmlEscaper(f), "{}", self.0)
	}
}

const STYLE: &str = r#"
body { font-family: ui-monospace, monospace; margin: 0; padding: 2rem; }
body.theme-dark { background: #0f172a; color: #e2e8f0; }
body.theme-light { background: #f0fdf4; color: #064e3b; }
.theme-dark .accent { color: #4ade80; }
.theme-light .accent { color: #059669; }
main { max-width: 56rem; margin: 0 auto; }
form { display: flex; gap: 0.5rem; margin: 1.5rem 0; }
input[name=hash] { flex: 1; font: inherit; padding: 0.5rem; }
.error { border: 1px solid #ef4444; color: #ef4444; padding: 0.75rem; }
dl { display: grid; grid-template-columns: max-content 1fr; gap: 0.25rem 1rem; }
dd { margin: 0; word-break: break-all; }
.qr img, .qr .frame { width: 16rem; height: 16rem; }
.qr .frame { border: 1px dashed currentColor; }
"#;

/// Markup for the QR slot.
///
/// A failed render is logged and replaced by an empty frame; it never turns
/// into a page error.
pub fn qr_frame(result: Result<QrImage, QrError>) -> String {
	match result {
		Ok(image) => format!(
			r#"<img src="{}" alt="QR code linking to this transaction">"#,
			image.data_url()
		),
		Err(e) => {
			tracing::warn!(error = %e, "Failed to render QR code");
			r#"<div class="frame"></div>"#.to_string()
		},
	}
}

/// Renders the full page for the controller's current state.
pub fn render(view: &ViewController, qr_markup: &str) -> String {
	let state = view.state();
	let theme = view.theme();

	let error = match &state.error {
		Some(message) => format!(r#"<p class="error" role="alert">{}</p>"#, Escape(message)),
		None => String::new(),
	};

	let navigation = match view.navigation() {
		Some(path) => format!(r#" data-navigate="{}""#, Escape(path)),
		None => String::new(),
	};

	format!(
		r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Blob Transaction Viewer</title>
<style>{style}</style>
</head>
<body class="theme-{theme}"{navigation}>
<main>
<header>
<h1 class="accent">Blob Transaction Viewer</h1>
<a href="{toggle_href}">{toggle_label}</a>
</header>
<form method="get" action="/">
<input name="hash" value="{input}" placeholder="0x..." spellcheck="false" autocomplete="off">
<input type="hidden" name="theme" value="{theme}">
<button type="submit"{disabled}>{button}</button>
</form>
{error}
<section class="details">
<h2>Transaction <span class="accent">{resolved}</span></h2>
{details}
</section>
<section class="qr">
{qr_markup}
</section>
</main>
<script>
const target = document.body.dataset.navigate;
if (target) {{ history.replaceState(null, "", target); }}
</script>
</body>
</html>
"#,
		style = STYLE,
		theme = theme,
		navigation = navigation,
		toggle_href = Escape(&toggle_href(view)),
		toggle_label = match theme {
			Theme::Dark => "Light mode",
			Theme::Light => "Dark mode",
		},
		input = Escape(view.input_hash()),
		disabled = if state.loading { " disabled" } else { "" },
		button = if state.loading { "Loading..." } else { "Lookup" },
		error = error,
		resolved = Escape(view.resolved_hash()),
		details = render_details(&state.data),
		qr_markup = qr_markup,
	)
}

/// Link that reloads the current view with the other theme.
fn toggle_href(view: &ViewController) -> String {
	let target = view.theme().toggled();
	if is_placeholder_hash(view.resolved_hash()) {
		format!("/?theme={}", target)
	} else {
		format!("{}?theme={}", blob_path(view.resolved_hash()), target)
	}
}

fn render_details(data: &BlobTransactionDetails) -> String {
	let mut rows = String::new();
	let mut row = |label: &str, value: String| {
		// Writing to a String cannot fail
		let _ = write!(rows, "<dt>{}</dt><dd>{}</dd>", label, value);
	};

	row("From", Escape(&data.from).to_string());
	row(
		"To",
		match &data.to {
			Some(to) => Escape(to).to_string(),
			None => "Contract creation".to_string(),
		},
	);
	row(
		"Block Number",
		data.block_number
			.map(format_grouped)
			.unwrap_or_else(|| "Pending".to_string()),
	);
	row(
		"Timestamp",
		data.timestamp
			.map(format_timestamp)
			.unwrap_or_else(|| "Unknown".to_string()),
	);
	row(
		"Blob Gas",
		match data.blob_gas_used {
			Some(used) => format!("Gas Used: {} gas", used),
			None => "Gas Used: N/A".to_string(),
		},
	);
	row("Blob Gas Price", optional_wei(data.blob_gas_price));
	row("Max Fee Per Blob Gas", optional_wei(data.max_fee_per_blob_gas));
	row("Total Blob Cost", format!("{} wei", Escape(&data.total_blob_cost)));
	row("Blob Count", data.blob_versioned_hashes.len().to_string());

	let hashes: String = data
		.blob_versioned_hashes
		.iter()
		.map(|hash| format!("<li>{}</li>", Escape(hash)))
		.collect();

	format!(
		"<dl>{}</dl>\n<h3>Blob Versioned Hashes</h3>\n<ol>{}</ol>",
		rows, hashes
	)
}

fn optional_wei(value: Option<u128>) -> String {
	match value {
		Some(wei) => format!("{} wei", wei),
		None => "N/A".to_string(),
	}
}
