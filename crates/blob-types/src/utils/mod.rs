//! Utility functions for common display formatting.

pub mod formatting;

pub use formatting::{format_grouped, format_timestamp, with_0x_prefix};
