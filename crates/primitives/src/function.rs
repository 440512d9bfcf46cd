use std::fmt;
use std::sync::Arc;

use crate::ctor::CtorRef;
use crate::error::CallError;
use crate::object::Object;
use crate::value::Value;

type Callable = dyn Fn(&Object, &[Value]) -> Result<Value, CallError> + Send + Sync;

/// A shared callable value.
///
/// Functions are invoked with a receiver (`this`) and a positional argument
/// slice. The declared `arity` is metadata only: calls never check it, and a
/// function reads missing arguments as [`Value::Undefined`] (see [`crate::arg`]).
/// It matters when the function is a chain-link body, because a link's parent
/// arity drives how stub arguments are topped up from call arguments.
#[derive(Clone)]
pub struct Function {
	name: Option<Arc<str>>,
	arity: usize,
	call: Arc<Callable>,
}

impl Function {
	/// Creates an anonymous function with the given declared arity.
	pub fn new<F>(arity: usize, f: F) -> Self
	where
		F: Fn(&Object, &[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
	{
		Self {
			name: None,
			arity,
			call: Arc::new(f),
		}
	}

	/// Creates a function that only mutates its receiver and returns nothing.
	///
	/// This is the usual shape of a constructor body.
	pub fn body<F>(arity: usize, f: F) -> Self
	where
		F: Fn(&Object, &[Value]) -> Result<(), CallError> + Send + Sync + 'static,
	{
		Self::new(arity, move |this, args| f(this, args).map(|()| Value::Undefined))
	}

	/// A function that accepts anything and does nothing.
	pub fn noop() -> Self {
		Self::new(0, |_, _| Ok(Value::Undefined)).named("noop")
	}

	/// Adapts a constructor into a callable that runs its construction
	/// sequence against the receiver.
	pub fn from_ctor(ctor: CtorRef) -> Self {
		let arity = ctor.arity();
		let name = ctor.tag();
		Self::new(arity, move |this, args| {
			ctor.construct_into(this, args)?;
			Ok(Value::Undefined)
		})
		.named(name)
	}

	/// Attaches a diagnostic name.
	pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Returns the diagnostic name, if any.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Returns the declared formal parameter count.
	#[inline]
	pub fn arity(&self) -> usize {
		self.arity
	}

	/// Calls the function with `this` as the receiver.
	#[inline]
	pub fn call(&self, this: &Object, args: &[Value]) -> Result<Value, CallError> {
		(self.call)(this, args)
	}

	/// Returns true if both handles refer to the same callable.
	#[inline]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.call, &other.call)
	}
}

impl fmt::Debug for Function {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Function")
			.field("name", &self.name())
			.field("arity", &self.arity)
			.finish()
	}
}
