//! HTTP server for the blob transaction viewer.
//!
//! Serves the server-rendered page, the `/blob/{hash}` deep-link route and
//! the JSON API. Each page request gets its own [`ViewController`]; the
//! lookup service and QR renderer are shared.

use crate::controller::ViewController;
use crate::page;
use axum::{
	extract::{Path, Query, State},
	http::header,
	response::{Html, IntoResponse, Json, Response},
	routing::get,
	Router,
};
use blob_config::Config;
use blob_lookup::LookupService;
use blob_qr::QrRenderer;
use blob_types::{blob_path, APIError, BlobTransactionDetails, Theme, TransactionValidation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Shared application state for the server.
#[derive(Clone)]
pub struct AppState {
	pub lookup: Arc<LookupService>,
	pub renderer: Arc<QrRenderer>,
	/// Origin deep links and QR codes point at.
	pub origin: String,
	/// Theme used when a request does not pick one.
	pub default_theme: Theme,
}

impl AppState {
	pub fn new(config: &Config, lookup: LookupService) -> Self {
		Self {
			lookup: Arc::new(lookup),
			renderer: Arc::new(QrRenderer::new(config.qr.clone())),
			origin: config.api.origin(),
			default_theme: config.display.theme,
		}
	}

	/// Requested theme if it parses, the configured default otherwise.
	fn theme(&self, requested: Option<&str>) -> Theme {
		requested
			.and_then(|theme| theme.parse().ok())
			.unwrap_or(self.default_theme)
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
	pub hash: Option<String>,
	pub theme: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ThemeQuery {
	pub theme: Option<String>,
}

/// Builds the application router.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
	Router::new()
		.route("/", get(handle_index))
		.route("/blob/{hash}", get(handle_deep_link))
		.nest(
			"/api",
			Router::new()
				.route("/blob/{hash}", get(handle_blob_details))
				.route("/blob/{hash}/validation", get(handle_validation))
				.route("/qr/{hash}", get(handle_qr)),
		)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(request_timeout))
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

/// Starts the HTTP server and runs it until interrupted.
pub async fn start_server(
	config: Config,
	lookup: LookupService,
) -> Result<(), Box<dyn std::error::Error>> {
	let state = AppState::new(&config, lookup);
	let app = router(state, Duration::from_secs(config.api.timeout_seconds));

	let bind_address = config.api.bind_address();
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!(
		"Blob viewer listening on {} (links use {})",
		bind_address,
		config.api.origin()
	);

	axum::serve(listener, app)
		.with_graceful_shutdown(async {
			if let Err(e) = tokio::signal::ctrl_c().await {
				tracing::error!("Failed to listen for shutdown signal: {}", e);
			}
		})
		.await?;

	Ok(())
}

fn render_view(state: &AppState, view: &ViewController) -> String {
	let request = view.qr_request(&state.origin);
	let qr = page::qr_frame(state.renderer.render(&request.url, request.theme));
	page::render(view, &qr)
}

/// Handles GET / requests.
///
/// Without a `hash` parameter this is the idle page; with one, the lookup
/// runs before the page is rendered.
async fn handle_index(
	State(state): State<AppState>,
	Query(query): Query<PageQuery>,
) -> Html<String> {
	let theme = state.theme(query.theme.as_deref());
	let mut view = ViewController::new(state.lookup.clone(), theme);

	let hash = query.hash.as_deref().map(str::trim).unwrap_or_default();
	if !hash.is_empty() {
		if let Err(e) = view.submit(hash).await {
			tracing::warn!("Lookup not started: {}", e);
		}
	}

	Html(render_view(&state, &view))
}

/// Handles GET /blob/{hash} requests.
async fn handle_deep_link(
	Path(hash): Path<String>,
	State(state): State<AppState>,
	Query(query): Query<ThemeQuery>,
) -> Html<String> {
	let theme = state.theme(query.theme.as_deref());
	let mut view = ViewController::new(state.lookup.clone(), theme);

	if let Err(e) = view.enter(&blob_path(&hash)).await {
		tracing::warn!("Lookup not started: {}", e);
	}

	Html(render_view(&state, &view))
}

/// Handles GET /api/blob/{hash} requests.
async fn handle_blob_details(
	Path(hash): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<BlobTransactionDetails>, APIError> {
	match crate::apis::blob::get_blob_details(&hash, &state.lookup).await {
		Ok(details) => Ok(Json(details)),
		Err(e) => {
			tracing::warn!("Blob lookup failed: {}", e);
			Err(APIError::from(e))
		},
	}
}

/// Handles GET /api/blob/{hash}/validation requests.
async fn handle_validation(
	Path(hash): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<TransactionValidation>, APIError> {
	let validation = crate::apis::blob::get_validation(&hash, &state.lookup).await?;
	Ok(Json(validation))
}

/// Handles GET /api/qr/{hash} requests.
async fn handle_qr(
	Path(hash): Path<String>,
	State(state): State<AppState>,
	Query(query): Query<ThemeQuery>,
) -> Result<Response, APIError> {
	let theme = state.theme(query.theme.as_deref());
	let image = crate::apis::qr::get_qr_code(&hash, theme, &state.origin, &state.renderer)?;

	Ok(([(header::CONTENT_TYPE, "image/svg+xml")], image.into_svg()).into_response())
}
