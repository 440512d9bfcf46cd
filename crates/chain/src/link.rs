//! Chain links.
//!
//! # Construction sequence
//!
//! Instantiating a link runs, against one freshly allocated instance:
//!
//! 1. record the instance's `super` back-reference (the outermost link wins);
//! 2. resolve parent arguments from the stubs, the parent's arity and the call arguments;
//! 3. the parent's construction routine with the resolved arguments;
//! 4. each mixin's construction routine, in registration order, with the same resolved arguments;
//! 5. the link's body with the unresolved call arguments.
//!
//! The mixin list is loaded once, before step 1, so a registration racing
//! with an instantiation is seen entirely or not at all.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use lineage_primitives::{
	CallError, Constructor, CtorRef, Function, Members, Object, Surface, Value,
};
use parking_lot::RwLock;

use crate::builder::LinkBuilder;
use crate::classify::classify_bound;
use crate::config::ChainConfig;
use crate::error::ChainError;
use crate::id::LinkId;
use crate::mixin::MixinRegistry;
use crate::resolve::resolve_parent_args;
use crate::singleton::SingletonSlot;


/// A derived constructor in a chain.
///
/// `ChainLink` is a shared handle: clones refer to the same link, and
/// [`ChainLink::ptr_eq`] compares identity.
#[derive(Clone)]
pub struct ChainLink(Arc<LinkInner>);

pub(crate) struct LinkInner {
	id: LinkId,
	parent: Option<CtorRef>,
	stubs: Box<[Value]>,
	body: Function,
	arity: usize,
	prototype: Surface,
	statics: RwLock<Members>,
	pub(crate) mixins: MixinRegistry,
	singleton: SingletonSlot,
	config: Arc<ChainConfig>,
}

impl ChainLink {
	/// Creates the root type of a hierarchy.
	pub(crate) fn root(config: Arc<ChainConfig>) -> Self {
		Self(Arc::new(LinkInner {
			id: LinkId::Base,
			parent: None,
			stubs: Box::default(),
			body: Function::noop(),
			arity: 0,
			prototype: Surface::new(),
			statics: RwLock::default(),
			mixins: MixinRegistry::new(),
			singleton: SingletonSlot::new(),
			config,
		}))
	}

	/// Creates a link whose surface delegates to `parent`'s surface.
	pub(crate) fn derive(
		parent: CtorRef,
		stubs: Vec<Value>,
		body: Function,
		arity: usize,
		config: Arc<ChainConfig>,
	) -> Self {
		let id = LinkId::generate();
		tracing::debug!(
			link = %id,
			parent = %parent.tag(),
			stubs = stubs.len(),
			arity,
			"extended chain link"
		);
		Self(Arc::new(LinkInner {
			id,
			prototype: Surface::delegating_to(parent.prototype()),
			parent: Some(parent),
			stubs: stubs.into_boxed_slice(),
			body,
			arity,
			statics: RwLock::default(),
			mixins: MixinRegistry::new(),
			singleton: SingletonSlot::new(),
			config,
		}))
	}

	/// Recovers a link from a constructor reference.
	pub fn from_ctor(ctor: &CtorRef) -> Option<Self> {
		ctor.clone().into_any().downcast::<LinkInner>().ok().map(Self)
	}

	/// Recovers a link from a [`Value::Ctor`].
	pub fn from_value(value: &Value) -> Option<Self> {
		value.as_ctor().and_then(Self::from_ctor)
	}

	/// Returns this link as a constructor reference.
	pub fn as_ctor(&self) -> CtorRef {
		self.0.clone()
	}

	/// Returns this link as a [`Value::Ctor`].
	pub fn to_value(&self) -> Value {
		Value::Ctor(self.as_ctor())
	}

	#[inline]
	pub fn id(&self) -> LinkId {
		self.0.id
	}

	/// Returns true for the root type.
	pub fn is_root(&self) -> bool {
		self.0.parent.is_none()
	}

	/// Returns the parent constructor; `None` only for the root.
	pub fn parent(&self) -> Option<&CtorRef> {
		self.0.parent.as_ref()
	}

	/// Returns the parent when it is itself a chain link.
	pub fn parent_link(&self) -> Option<ChainLink> {
		self.parent().and_then(Self::from_ctor)
	}

	/// Returns the stub arguments captured at definition time.
	pub fn stubs(&self) -> &[Value] {
		&self.0.stubs
	}

	pub fn body(&self) -> &Function {
		&self.0.body
	}

	/// Returns the arity reported to links that extend this one.
	pub fn arity(&self) -> usize {
		self.0.arity
	}

	/// Returns the surface shared by every instance of this link.
	pub fn prototype(&self) -> &Surface {
		&self.0.prototype
	}

	pub fn config(&self) -> &ChainConfig {
		&self.0.config
	}

	pub(crate) fn shared_config(&self) -> Arc<ChainConfig> {
		self.0.config.clone()
	}

	pub(crate) fn inner(&self) -> &LinkInner {
		&self.0
	}

	/// Returns the registered mixins in registration order.
	pub fn mixins(&self) -> Vec<CtorRef> {
		self.0.mixins.snapshot().to_vec()
	}

	/// Returns the singleton if it was already requested.
	pub fn singleton(&self) -> Option<Object> {
		self.0.singleton.get().cloned()
	}

	/// Sets a static member on this link only.
	pub fn set_static(&self, name: impl Into<Arc<str>>, value: impl Into<Value>) {
		self.0.statics.write().insert(name.into(), value.into());
	}

	/// Reads a static member of this link. Ancestors are not consulted.
	pub fn get_static(&self, name: &str) -> Option<Value> {
		self.0.statics.read().get(name).cloned()
	}

	pub fn has_static(&self, name: &str) -> bool {
		self.0.statics.read().contains_key(name)
	}

	/// Returns true if `instance` delegates to this link's surface.
	pub fn has_instance(&self, instance: &Object) -> bool {
		instance.prototype().delegates_to(&self.0.prototype)
	}

	/// Returns true if both handles refer to the same link.
	#[inline]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}

	/// Defines a new link with this one as parent.
	///
	/// A trailing callable is the body; every other argument is a stub. See
	/// [`crate::classify`] for the positional rules.
	pub fn extend(&self, args: impl IntoIterator<Item = Value>) -> ChainLink {
		classify_bound(args).into_builder(self).build()
	}

	/// Starts an explicit definition with this link as parent.
	pub fn builder(&self) -> LinkBuilder {
		LinkBuilder::new(self)
	}

	/// Allocates a fresh instance and runs the construction sequence on it.
	pub fn construct(&self, args: &[Value]) -> Result<Object, ChainError> {
		let instance = Object::with_prototype(self.0.prototype.clone());
		instance.bind_constructor(&self.as_ctor());
		self.0
			.construct_into(&instance, args)
			.map_err(|source| ChainError::Construction {
				link: self.0.id,
				source,
			})?;
		Ok(instance)
	}

	/// Returns this link's shared instance, constructing it with `args` on
	/// first request. Later requests ignore their arguments.
	pub fn get_instance(&self, args: &[Value]) -> Result<Object, ChainError> {
		self.0.singleton.get_or_try_init(self.0.id, || {
			let instance = self.construct(args)?;
			tracing::debug!(link = %self.0.id, "created singleton");
			Ok(instance)
		})
	}
}

impl Constructor for LinkInner {
	fn tag(&self) -> String {
		format!("ChainLink({})", self.id)
	}

	fn arity(&self) -> usize {
		self.arity
	}

	fn prototype(&self) -> &Surface {
		&self.prototype
	}

	fn construct_into(&self, this: &Object, args: &[Value]) -> Result<(), CallError> {
		let mixins = self.mixins.snapshot();
		let parent_args = match &self.parent {
			Some(parent) => {
				this.record_super(parent.clone());
				let parent_args = resolve_parent_args(parent.arity(), &self.stubs, args);
				tracing::trace!(
					link = %self.id,
					call_args = args.len(),
					parent_args = parent_args.len(),
					"running parent constructor"
				);
				parent.construct_into(this, &parent_args)?;
				parent_args
			}
			None => resolve_parent_args(0, &self.stubs, args),
		};

		for mixin in mixins.iter() {
			tracing::trace!(link = %self.id, mixin = %mixin.tag(), "running mixin constructor");
			mixin
				.construct_into(this, &parent_args)
				.map_err(|source| CallError::Nested {
					ctor: mixin.tag(),
					source: Box::new(source),
				})?;
		}

		self.body.call(this, args)?;
		Ok(())
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

impl PartialEq for ChainLink {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl Eq for ChainLink {}

impl fmt::Debug for ChainLink {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChainLink")
			.field("id", &self.0.id)
			.field("parent", &self.0.parent.as_ref().map(|p| p.tag()))
			.field("stubs", &self.0.stubs.len())
			.field("arity", &self.0.arity)
			.finish()
	}
}

impl From<ChainLink> for Value {
	fn from(link: ChainLink) -> Self {
		link.to_value()
	}
}

impl From<&ChainLink> for Value {
	fn from(link: &ChainLink) -> Self {
		link.to_value()
	}
}
