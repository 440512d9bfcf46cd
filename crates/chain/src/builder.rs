use std::sync::Arc;

use lineage_primitives::{CtorRef, Function, Value};

use crate::config::{ArityPolicy, ChainConfig};
use crate::link::ChainLink;

/// Explicit definition of a new chain link.
///
/// Unlike positional [`crate::classify`], every part is named, so a stub list
/// may end in a callable without it becoming the body.
///
/// ```ignore
/// let grand = child
///     .builder()
///     .with_stubs([Value::Int(5), Value::Int(6)])
///     .with_body(Function::body(1, |this, args| {
///         this.set("c", arg(args, 0));
///         Ok(())
///     }))
///     .build();
/// ```
#[must_use]
pub struct LinkBuilder {
	parent: CtorRef,
	config: Arc<ChainConfig>,
	stubs: Vec<Value>,
	body: Option<Function>,
	arity: Option<usize>,
}

impl LinkBuilder {
	/// Starts a definition extending `parent`, under the parent's config.
	pub fn new(parent: &ChainLink) -> Self {
		Self {
			parent: parent.as_ctor(),
			config: parent.shared_config(),
			stubs: Vec::new(),
			body: None,
			arity: None,
		}
	}

	/// Starts a definition whose parent is a constructor outside any chain.
	pub(crate) fn foreign(parent: CtorRef, config: Arc<ChainConfig>) -> Self {
		Self {
			arity: Some(parent.arity()),
			parent,
			config,
			stubs: Vec::new(),
			body: None,
		}
	}

	/// Replaces the parent.
	pub fn with_parent(mut self, parent: &ChainLink) -> Self {
		self.parent = parent.as_ctor();
		self.config = parent.shared_config();
		self
	}

	/// Replaces the stub list.
	pub fn with_stubs(mut self, stubs: impl IntoIterator<Item = Value>) -> Self {
		self.stubs = stubs.into_iter().collect();
		self
	}

	/// Appends one stub argument.
	pub fn with_stub(mut self, stub: impl Into<Value>) -> Self {
		self.stubs.push(stub.into());
		self
	}

	/// Sets the body run last on every instantiation.
	pub fn with_body(mut self, body: Function) -> Self {
		self.body = Some(body);
		self
	}

	/// Overrides the arity reported to links that extend this one.
	pub fn with_arity(mut self, arity: usize) -> Self {
		self.arity = Some(arity);
		self
	}

	/// Creates the link.
	pub fn build(self) -> ChainLink {
		let body = self.body.unwrap_or_else(Function::noop);
		let arity = self.arity.unwrap_or(match self.config.arity {
			ArityPolicy::Body => body.arity(),
			ArityPolicy::Legacy => 0,
		});
		ChainLink::derive(self.parent, self.stubs, body, arity, self.config)
	}
}
