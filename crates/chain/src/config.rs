//! Runtime configuration.
//!
//! A [`ChainConfig`] selects the behavior policies of one [`crate::Runtime`].
//! Every link created under that runtime shares the same config. Configs are
//! usually built in code; [`ChainConfig::from_toml_str`] loads the same
//! settings from TOML:
//!
//! ```toml
//! arity = "legacy"
//! mixin-registration = "eager"
//! ```
//!
//! Missing keys fall back to their defaults. Unknown keys are rejected.

use serde::Deserialize;

/// How a chain link reports its declared arity to links that extend it.
///
/// The arity decides whether stub arguments are topped up with leading call
/// arguments (see [`crate::resolve_parent_args`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArityPolicy {
	/// A link's arity is its body's declared arity.
	#[default]
	Body,
	/// Every link reports zero, so any non-empty stub list fully satisfies a
	/// chain-link parent and call arguments are never borrowed.
	Legacy,
}

/// What happens to earlier arguments when one mixin argument is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixinRegistration {
	/// Validate every argument first; an invalid one leaves the target untouched.
	#[default]
	Transactional,
	/// Apply arguments in order; arguments before the invalid one stay applied.
	Eager,
}

/// Behavior policies shared by every link of a runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ChainConfig {
	pub arity: ArityPolicy,
	pub mixin_registration: MixinRegistration,
}

impl ChainConfig {
	/// Parses a config from TOML source.
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(src)?)
	}

	/// Sets the arity policy.
	pub fn with_arity(mut self, arity: ArityPolicy) -> Self {
		self.arity = arity;
		self
	}

	/// Sets the mixin registration policy.
	pub fn with_mixin_registration(mut self, policy: MixinRegistration) -> Self {
		self.mixin_registration = policy;
		self
	}
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid chain config: {0}")]
	Toml(#[from] toml::de::Error),
}
