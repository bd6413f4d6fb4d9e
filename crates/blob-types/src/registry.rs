//! Registry trait for self-registering implementations.
//!
//! Every pluggable implementation declares the name it is configured under
//! and the factory that builds it.

/// Base trait for implementation registries.
///
/// Each implementation module (the `evm_alloy` and `mock` chain-data
/// providers, for example) provides a Registry struct implementing this
/// trait.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	///
	/// This matches the key under `[provider.implementations]`, for example
	/// "evm_alloy" for `provider.implementations.evm_alloy`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
