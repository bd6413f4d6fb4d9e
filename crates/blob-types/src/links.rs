//! Deep-link helpers.
//!
//! A lookup is shareable as `/blob/<hash>`. The hash travels through the
//! path unchanged in both directions.

/// Path prefix of the deep-link route.
pub const BLOB_ROUTE_PREFIX: &str = "/blob/";

/// Reserved all-zero hash used as the idle placeholder.
///
/// Deep links carrying this value pre-populate the input but never trigger
/// a lookup.
pub const PLACEHOLDER_HASH: &str =
	"0x0000000000000000000000000000000000000000000000000000000000000000";

/// Builds the deep-link path for a hash.
pub fn blob_path(hash: &str) -> String {
	format!("{}{}", BLOB_ROUTE_PREFIX, hash)
}

/// Builds the absolute deep-link URL for a hash under `origin`.
///
/// A trailing slash on `origin` is tolerated.
pub fn blob_url(origin: &str, hash: &str) -> String {
	format!("{}{}", origin.trim_end_matches('/'), blob_path(hash))
}

/// Message shown for a `/blob/...` path whose hash spans several segments.
pub const MALFORMED_DEEP_LINK: &str =
	"Invalid transaction hash: a deep link carries exactly one path segment";

/// A page path classified by [`parse_deep_link`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepLink<'a> {
	/// Not a `/blob/<hash>` route, or one with an empty hash.
	Absent,
	/// A well-formed deep link.
	Hash(&'a str),
	/// A `/blob/...` route whose remainder contains `/`.
	Malformed(&'a str),
}

/// Extracts the hash from a deep-link path.
pub fn parse_deep_link(path: &str) -> DeepLink<'_> {
	match path.strip_prefix(BLOB_ROUTE_PREFIX) {
		None | Some("") => DeepLink::Absent,
		Some(rest) if rest.contains('/') => DeepLink::Malformed(rest),
		Some(hash) => DeepLink::Hash(hash),
	}
}

/// Whether `hash` is the reserved placeholder, ignoring hex case.
pub fn is_placeholder_hash(hash: &str) -> bool {
	hash.eq_ignore_ascii_case(PLACEHOLDER_HASH)
}

#[cfg(test)]
mod tests {
	use super::*;

	const HASH: &str = "0x1a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f809";

	#[test]
	fn test_path_round_trip_is_identity() {
		let path = blob_path(HASH);
		assert_eq!(path, format!("/blob/{}", HASH));
		assert_eq!(parse_deep_link(&path), DeepLink::Hash(HASH));

		// No normalisation of any kind
		let odd = "0xABCdef";
		assert_eq!(parse_deep_link(&blob_path(odd)), DeepLink::Hash(odd));
	}

	#[test]
	fn test_parse_deep_link_ignores_other_routes() {
		assert_eq!(parse_deep_link("/"), DeepLink::Absent);
		assert_eq!(parse_deep_link("/blob/"), DeepLink::Absent);
		assert_eq!(parse_deep_link("/api/blob/0x01"), DeepLink::Absent);
	}

	#[test]
	fn test_nested_hash_is_malformed() {
		assert_eq!(parse_deep_link("/blob/0x01/02"), DeepLink::Malformed("0x01/02"));
		assert_eq!(parse_deep_link("/blob/a/"), DeepLink::Malformed("a/"));
	}

	#[test]
	fn test_blob_url_joins_origin() {
		assert_eq!(
			blob_url("https://example.org", "0x01"),
			"https://example.org/blob/0x01"
		);
		assert_eq!(
			blob_url("https://example.org/", "0x01"),
			"https://example.org/blob/0x01"
		);
	}

	#[test]
	fn test_placeholder_detection() {
		assert!(is_placeholder_hash(PLACEHOLDER_HASH));
		assert!(!is_placeholder_hash(HASH));
		assert_eq!(PLACEHOLDER_HASH.len(), 66);
	}
}
