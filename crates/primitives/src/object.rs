use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;

use crate::ctor::{Constructor, CtorRef};
use crate::error::CallError;
use crate::surface::{Members, Surface};
use crate::value::Value;


/// Shared handle to an instance.
///
/// An object owns a field table and reads through to the behavior surface it
/// was created with. Cloning the handle shares the instance; use
/// [`Object::ptr_eq`] for identity.
#[derive(Clone)]
pub struct Object(Arc<ObjectInner>);

struct ObjectInner {
	fields: RwLock<Members>,
	prototype: Surface,
	constructor: OnceLock<Weak<dyn Constructor>>,
	super_ctor: OnceLock<CtorRef>,
}

impl Object {
	/// Creates a plain object with an empty, undelegated surface.
	pub fn new() -> Self {
		Self::with_prototype(Surface::new())
	}

	/// Creates an object whose member lookups fall back to `prototype`.
	pub fn with_prototype(prototype: Surface) -> Self {
		Self(Arc::new(ObjectInner {
			fields: RwLock::default(),
			prototype,
			constructor: OnceLock::new(),
			super_ctor: OnceLock::new(),
		}))
	}

	/// Returns the surface this object delegates to.
	#[inline]
	pub fn prototype(&self) -> &Surface {
		&self.0.prototype
	}

	/// Reads a field, falling back to the prototype chain.
	pub fn get(&self, name: &str) -> Option<Value> {
		if let Some(value) = self.get_own(name) {
			return Some(value);
		}
		self.0.prototype.get(name)
	}

	/// Reads an own field only.
	pub fn get_own(&self, name: &str) -> Option<Value> {
		self.0.fields.read().get(name).cloned()
	}

	/// Writes an own field.
	pub fn set(&self, name: impl Into<Arc<str>>, value: impl Into<Value>) {
		self.0.fields.write().insert(name.into(), value.into());
	}

	/// Replaces a field with `f(current)`, where `current` is the visible
	/// value or [`Value::Undefined`].
	///
	/// The read and the write are separate steps; concurrent updates of the
	/// same field can interleave.
	pub fn update(&self, name: &str, f: impl FnOnce(Value) -> Value) {
		let current = self.get(name).unwrap_or_default();
		let next = f(current);
		self.set(name, next);
	}

	/// Returns true if the member is an own field or visible on the prototype chain.
	pub fn has(&self, name: &str) -> bool {
		self.has_own(name) || self.0.prototype.contains(name)
	}

	/// Returns true if the member is an own field.
	pub fn has_own(&self, name: &str) -> bool {
		self.0.fields.read().contains_key(name)
	}

	/// Returns own field names in insertion order.
	pub fn keys(&self) -> Vec<Arc<str>> {
		self.0.fields.read().keys().cloned().collect()
	}

	/// Looks up a callable member and calls it with this object as receiver.
	pub fn call_method(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
		let member = self.get(name).ok_or_else(|| CallError::MissingMember {
			name: name.to_string(),
		})?;
		member.call(name, self, args)
	}

	/// Returns the constructor this object was instantiated from, while that
	/// constructor is still alive.
	pub fn constructor(&self) -> Option<CtorRef> {
		self.0.constructor.get().and_then(Weak::upgrade)
	}

	/// Records the constructor this object was instantiated from.
	///
	/// The back-reference is weak: a constructor may own an instance of
	/// itself (a singleton) without keeping itself alive. Only the first call
	/// has an effect; returns whether it was recorded.
	pub fn bind_constructor(&self, ctor: &CtorRef) -> bool {
		self.0.constructor.set(Arc::downgrade(ctor)).is_ok()
	}

	/// Returns the parent of the constructor this object was instantiated from.
	pub fn super_ctor(&self) -> Option<&CtorRef> {
		self.0.super_ctor.get()
	}

	/// Records the parent constructor back-reference.
	///
	/// The outermost construction step runs first, so only the first call has
	/// an effect; returns whether it was recorded.
	pub fn record_super(&self, ctor: CtorRef) -> bool {
		self.0.super_ctor.set(ctor).is_ok()
	}

	/// Returns true if `ctor`'s surface is on this object's prototype chain.
	pub fn is_instance_of(&self, ctor: &dyn Constructor) -> bool {
		self.0.prototype.delegates_to(ctor.prototype())
	}

	/// Returns true if both handles refer to the same instance.
	#[inline]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Default for Object {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V> FromIterator<(K, V)> for Object
where
	K: Into<Arc<str>>,
	V: Into<Value>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let obj = Self::new();
		{
			let mut fields = obj.0.fields.write();
			fields.extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
		}
		obj
	}
}

impl fmt::Debug for Object {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut s = f.debug_struct("Object");
		s.field("fields", &self.keys());
		if let Some(ctor) = self.constructor() {
			s.field("constructor", &ctor.tag());
		}
		s.finish()
	}
}
