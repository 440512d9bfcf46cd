use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::CallError;
use crate::function::Function;
use crate::object::Object;
use crate::surface::Surface;
use crate::value::Value;

/// Shared reference to any constructor.
pub type CtorRef = Arc<dyn Constructor>;

/// Something that can initialize an instance.
///
/// A constructor owns the behavior surface its instances delegate to and a
/// construction routine that runs against an already-allocated instance.
/// Allocation is the caller's job; this split lets a derived constructor run
/// its parent's and its mixins' routines against the same instance.
pub trait Constructor: Send + Sync + 'static {
	/// Short diagnostic label.
	fn tag(&self) -> String;

	/// Declared formal parameter count.
	fn arity(&self) -> usize;

	/// The surface instances of this constructor delegate to.
	fn prototype(&self) -> &Surface;

	/// Runs the construction routine against `this`.
	fn construct_into(&self, this: &Object, args: &[Value]) -> Result<(), CallError>;

	/// Upcasts for downcasting back to the concrete constructor type.
	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Returns true if both references point at the same constructor.
#[inline]
pub fn ctor_ptr_eq(a: &CtorRef, b: &CtorRef) -> bool {
	std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// A plain constructor: a body function plus its own surface.
///
/// This is the shape of constructors that exist outside any chain, and of
/// bare functions registered as mixins.
pub struct NativeCtor {
	name: Arc<str>,
	body: Function,
	prototype: Surface,
}

impl NativeCtor {
	/// Creates a constructor from a body with an empty surface.
	pub fn new(name: impl Into<Arc<str>>, body: Function) -> Self {
		Self {
			name: name.into(),
			body,
			prototype: Surface::new(),
		}
	}

	/// Wraps a bare function, named after the function when it has a name.
	pub fn from_function(body: Function) -> Self {
		let name = body.name().unwrap_or("anonymous").to_string();
		Self::new(name, body)
	}

	/// Returns the body function.
	pub fn body(&self) -> &Function {
		&self.body
	}

	/// Erases the concrete type.
	pub fn into_ref(self) -> CtorRef {
		Arc::new(self)
	}

	/// Allocates an instance and runs the body against it.
	pub fn construct(self: &Arc<Self>, args: &[Value]) -> Result<Object, CallError> {
		let instance = Object::with_prototype(self.prototype.clone());
		let ctor: CtorRef = self.clone();
		instance.bind_constructor(&ctor);
		self.construct_into(&instance, args)?;
		Ok(instance)
	}
}

impl Constructor for NativeCtor {
	fn tag(&self) -> String {
		format!("NativeCtor({})", self.name)
	}

	fn arity(&self) -> usize {
		self.body.arity()
	}

	fn prototype(&self) -> &Surface {
		&self.prototype
	}

	fn construct_into(&self, this: &Object, args: &[Value]) -> Result<(), CallError> {
		self.body.call(this, args).map(drop)
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

impl fmt::Debug for NativeCtor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NativeCtor")
			.field("name", &self.name)
			.field("arity", &self.body.arity())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value::arg;

	fn point() -> Arc<NativeCtor> {
		let body = Function::body(2, |this, args| {
			this.set("x", arg(args, 0));
			this.set("y", arg(args, 1));
			Ok(())
		});
		let ctor = Arc::new(NativeCtor::new("Point", body));
		ctor.prototype().define("kind", "point");
		ctor
	}

	#[test]
	fn construct_runs_body_and_binds_constructor() {
		let ctor = point();
		let p = ctor.construct(&[Value::Int(1), Value::Int(2)]).unwrap();

		assert_eq!(p.get("x"), Some(Value::Int(1)));
		assert_eq!(p.get("y"), Some(Value::Int(2)));
		assert_eq!(p.get("kind"), Some(Value::from("point")));
		let bound: CtorRef = ctor.clone();
		assert!(ctor_ptr_eq(&p.constructor().unwrap(), &bound));
		assert!(p.is_instance_of(&*ctor));
		assert_eq!(ctor.arity(), 2);
	}

	#[test]
	fn from_function_takes_the_function_name() {
		let named = NativeCtor::from_function(Function::noop());
		assert_eq!(named.tag(), "NativeCtor(noop)");
		let anon = NativeCtor::from_function(Function::new(0, |_, _| Ok(Value::Null)));
		assert_eq!(anon.tag(), "NativeCtor(anonymous)");
	}

	#[test]
	fn downcast_through_into_any() {
		let erased = NativeCtor::from_function(Function::noop()).into_ref();
		assert!(erased.into_any().downcast::<NativeCtor>().is_ok());
	}
}
