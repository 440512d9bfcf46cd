//! Chain-link composition runtime.
//!
//! # Purpose
//!
//! Build chains of derived constructors ("chain links") on top of a root
//! type. Each link carries one parent, an append-only list of mixins, a fixed
//! set of stub arguments captured at definition time, and a lazily created
//! singleton instance.
//!
//! # Mental Model
//!
//! 1. **Definition:** [`Runtime::extend`] or [`ChainLink::extend`] classifies a
//!    positional argument list into parent, stubs and body ([`classify()`]), or
//!    [`LinkBuilder`] takes the three explicitly. The new link's surface
//!    delegates to its parent's surface; the parent's construction routine is
//!    not run.
//! 2. **Instantiation:** [`ChainLink::construct`] allocates an instance and
//!    runs parent → mixins → body. Parent and mixins receive the argument list
//!    computed by [`resolve_parent_args`]; the body receives the call
//!    arguments unchanged.
//! 3. **Composition:** [`ChainLink::mixin`] copies a mixin's surface onto the
//!    link's surface and appends its constructor to the link's mixin list.
//!    A mixin that would construct the link again is rejected.
//! 4. **Sharing:** [`ChainLink::get_instance`] builds the link's singleton on
//!    first request and returns the same instance afterwards.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Runtime`] | Owns a config and the root link of one hierarchy. |
//! | [`ChainLink`] | A derived constructor; cheap to clone, compared by identity. |
//! | [`LinkBuilder`] | Explicit parent/stubs/body/arity definition. |
//! | [`ChainConfig`] | Arity and mixin-registration policies. |
//! | [`LinkId`] | Diagnostic identity tag. |
//!
//! # Invariants
//!
//! - A link's parent, stubs and id never change after creation.
//! - A link's mixin list only grows, and each instantiation reads one snapshot of it.
//! - At most one singleton exists per link, and it is never replaced.
//! - Statics set on a link are not visible on its descendants.
//!
//! # Concurrency
//!
//! - Mixin registrations on one link are serialized; the list is published
//!   atomically, so a concurrent instantiation sees it before or after.
//! - First-time singleton requests on one link are serialized; every caller
//!   receives the same instance.
//! - A singleton requested from inside its own construction fails with
//!   [`ChainError::ReentrantSingleton`]. Two threads each building a
//!   singleton whose construction requests the other's would block forever;
//!   the request that closes such a wait cycle fails with
//!   [`ChainError::SingletonDeadlock`] instead.
//! - The cyclic-mixin check reads other links' mixin lists without locking
//!   them, so two registrations racing on different links can still form a
//!   cycle that neither rejects.

mod builder;
pub mod classify;
pub mod config;
mod error;
mod id;
mod link;
mod mixin;
pub mod resolve;
mod runtime;
mod singleton;
mod wrap;

pub use builder::LinkBuilder;
pub use classify::{Definition, classify};
pub use config::{ArityPolicy, ChainConfig, ConfigError, MixinRegistration};
pub use error::ChainError;
pub use id::LinkId;
pub use lineage_primitives::{
	CallError, Constructor, CtorRef, Function, NativeCtor, Object, Surface, Value, arg,
};
pub use link::ChainLink;
pub use resolve::resolve_parent_args;
pub use runtime::Runtime;
pub use wrap::wrap;

/// Returns true if `value` is a chain link produced by this crate.
pub fn is(value: &Value) -> bool {
	ChainLink::from_value(value).is_some()
}
