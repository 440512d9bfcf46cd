use std::sync::Arc;

use lineage_primitives::CtorRef;

use crate::builder::LinkBuilder;
use crate::config::ChainConfig;
use crate::link::ChainLink;

/// Adopts a constructor from outside any chain.
///
/// Returns a new link whose parent is `existing`, with no stubs, a no-op body
/// and `existing`'s arity. Instances of the returned link and of every link
/// derived from it are instances of `existing`. `existing` itself is not
/// modified.
pub fn wrap(existing: CtorRef) -> ChainLink {
	wrap_with(existing, Arc::new(ChainConfig::default()))
}

pub(crate) fn wrap_with(existing: CtorRef, config: Arc<ChainConfig>) -> ChainLink {
	tracing::debug!(ctor = %existing.tag(), "wrapping foreign constructor");
	LinkBuilder::foreign(existing, config).build()
}
