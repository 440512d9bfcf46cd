//! Core value model for chain-link composition: values, objects, behavior surfaces and constructors.

/// Constructor trait and plain native constructors.
pub mod ctor;
/// Errors raised while calling functions and running constructors.
pub mod error;
/// Callable values with a declared arity.
pub mod function;
/// Instances: field tables backed by a behavior surface.
pub mod object;
/// Behavior surfaces: ordered member tables with delegation.
pub mod surface;
/// Dynamically typed values.
pub mod value;

pub use ctor::{Constructor, CtorRef, NativeCtor};
pub use error::CallError;
pub use function::Function;
pub use object::Object;
pub use surface::{Members, Surface};
pub use value::{Value, arg};
