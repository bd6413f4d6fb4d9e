//! Common types module for the blob transaction viewer.
//!
//! This module defines the core data types shared by the lookup service,
//! the QR renderer and the HTTP service, so every component agrees on the
//! shape of a lookup result and on how errors are reported.

/// API types for HTTP endpoints and error responses.
pub mod api;
/// Blob transaction data model produced by the lookup service.
pub mod blob;
/// Plain chain records returned by chain-data providers.
pub mod chain;
/// Deep-link helpers for the `/blob/<hash>` route.
pub mod links;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Display theme shared by the page and the QR renderer.
pub mod theme;
/// Utility functions for formatting values for display.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use blob::*;
pub use chain::*;
pub use links::{
	blob_path, blob_url, is_placeholder_hash, parse_deep_link, DeepLink, MALFORMED_DEEP_LINK,
	PLACEHOLDER_HASH,
};
pub use registry::ImplementationRegistry;
pub use theme::Theme;
pub use utils::{format_grouped, format_timestamp, with_0x_prefix};
pub use validation::*;
