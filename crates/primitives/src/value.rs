use std::fmt;
use std::sync::Arc;

use crate::ctor::{CtorRef, ctor_ptr_eq};
use crate::error::CallError;
use crate::function::Function;
use crate::object::Object;

/// A dynamically typed value.
///
/// Scalars, strings and lists compare structurally. Objects, functions and
/// constructors are reference types and compare by identity.
#[derive(Clone, Default)]
pub enum Value {
	/// Absent value. Missing arguments and unset fields read as this.
	#[default]
	Undefined,
	/// Explicitly empty value.
	Null,
	/// Boolean value.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating point value.
	Float(f64),
	/// Immutable string.
	Str(Arc<str>),
	/// Immutable sequence of values.
	List(Arc<[Value]>),
	/// Instance handle.
	Object(Object),
	/// Callable value.
	Function(Function),
	/// Constructor reference. Chain links are constructors.
	Ctor(CtorRef),
}

/// Returns the argument at `index`, or [`Value::Undefined`] when the caller
/// passed fewer arguments.
#[inline]
pub fn arg(args: &[Value], index: usize) -> Value {
	args.get(index).cloned().unwrap_or_default()
}

impl Value {
	/// Builds a list value from any iterator of values.
	pub fn list<I, V>(items: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		Self::List(items.into_iter().map(Into::into).collect())
	}

	/// Returns true for values that can be called: functions and constructors.
	#[inline]
	pub fn is_callable(&self) -> bool {
		matches!(self, Self::Function(_) | Self::Ctor(_))
	}

	/// Returns true if this is [`Value::Undefined`].
	#[inline]
	pub fn is_undefined(&self) -> bool {
		matches!(self, Self::Undefined)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(v) => Some(*v),
			Self::Int(v) => Some(*v as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Self::Object(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_function(&self) -> Option<&Function> {
		match self {
			Self::Function(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_ctor(&self) -> Option<&CtorRef> {
		match self {
			Self::Ctor(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the type name used in diagnostics.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Undefined => "undefined",
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Str(_) => "string",
			Self::List(_) => "list",
			Self::Object(_) => "object",
			Self::Function(_) => "function",
			Self::Ctor(_) => "constructor",
		}
	}

	/// Calls this value with `this` as the receiver.
	///
	/// Constructors run their construction sequence against the receiver and
	/// yield [`Value::Undefined`]. `name` only feeds the error for
	/// non-callable values.
	pub fn call(&self, name: &str, this: &Object, args: &[Value]) -> Result<Value, CallError> {
		match self {
			Self::Function(f) => f.call(this, args),
			Self::Ctor(ctor) => {
				ctor.construct_into(this, args)?;
				Ok(Self::Undefined)
			}
			other => Err(CallError::NotCallable {
				name: name.to_string(),
				found: other.type_name(),
			}),
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::Str(a), Self::Str(b)) => a == b,
			(Self::List(a), Self::List(b)) => a == b,
			(Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
			(Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
			(Self::Ctor(a), Self::Ctor(b)) => ctor_ptr_eq(a, b),
			_ => false,
		}
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Undefined => f.write_str("undefined"),
			Self::Null => f.write_str("null"),
			Self::Bool(v) => write!(f, "{v}"),
			Self::Int(v) => write!(f, "{v}"),
			Self::Float(v) => write!(f, "{v:?}"),
			Self::Str(v) => write!(f, "{v:?}"),
			Self::List(items) => f.debug_list().entries(items.iter()).finish(),
			Self::Object(obj) => fmt::Debug::fmt(obj, f),
			Self::Function(func) => fmt::Debug::fmt(func, f),
			Self::Ctor(ctor) => f.write_str(&ctor.tag()),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Self::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Self::Int(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Self::Int(i64::from(v))
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Self::Float(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Self::Str(v.into())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Self::Str(v.into())
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Self::List(v.into())
	}
}

impl From<Object> for Value {
	fn from(v: Object) -> Self {
		Self::Object(v)
	}
}

impl From<Function> for Value {
	fn from(v: Function) -> Self {
		Self::Function(v)
	}
}

impl From<CtorRef> for Value {
	fn from(v: CtorRef) -> Self {
		Self::Ctor(v)
	}
}
