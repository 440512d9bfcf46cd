use std::sync::Arc;

use lineage_primitives::{CtorRef, Object, Value};

use crate::builder::LinkBuilder;
use crate::classify::classify;
use crate::config::ChainConfig;
use crate::error::ChainError;
use crate::link::ChainLink;
use crate::wrap::wrap_with;

/// One chain hierarchy: a configuration and the root type every `extend`
/// defaults to.
///
/// Runtimes are independent. Links created through different runtimes share
/// no root, and each carries the config of the runtime that created it.
#[derive(Debug, Clone)]
pub struct Runtime {
	config: Arc<ChainConfig>,
	root: ChainLink,
}

impl Runtime {
	pub fn new(config: ChainConfig) -> Self {
		let config = Arc::new(config);
		Self {
			root: ChainLink::root(config.clone()),
			config,
		}
	}

	/// Creates a runtime from a TOML config document.
	pub fn from_toml_str(source: &str) -> Result<Self, ChainError> {
		Ok(Self::new(ChainConfig::from_toml_str(source)?))
	}

	/// The root link. It has no parent, no stubs and a no-op body.
	pub fn root(&self) -> &ChainLink {
		&self.root
	}

	pub fn config(&self) -> &ChainConfig {
		&self.config
	}

	/// Defines a new link from positional arguments.
	///
	/// A leading chain link overrides the parent (the root otherwise), a
	/// trailing callable is the body, and the rest are stubs.
	pub fn extend(&self, args: impl IntoIterator<Item = Value>) -> ChainLink {
		classify(args).into_builder(&self.root).build()
	}

	/// Starts an explicit definition extending the root.
	pub fn define(&self) -> LinkBuilder {
		self.root.builder()
	}

	/// Registers mixins on `target`. See [`ChainLink::mixin`].
	pub fn mixin(&self, target: &ChainLink, sources: &[Value]) -> Result<(), ChainError> {
		target.mixin(sources)
	}

	/// Returns `link`'s shared instance. See [`ChainLink::get_instance`].
	pub fn get_instance(&self, link: &ChainLink, args: &[Value]) -> Result<Object, ChainError> {
		link.get_instance(args)
	}

	/// Adopts a foreign constructor under this runtime's config.
	pub fn wrap(&self, existing: CtorRef) -> ChainLink {
		wrap_with(existing, self.config.clone())
	}

	/// Returns true if `value` is a chain link.
	pub fn is(&self, value: &Value) -> bool {
		crate::is(value)
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new(ChainConfig::default())
	}
}
