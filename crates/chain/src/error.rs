use lineage_primitives::CallError;

use crate::config::ConfigError;
use crate::id::LinkId;

/// Errors surfaced by chain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
	/// A mixin argument was neither a constructor nor a list of constructors.
	///
	/// `element` is set when the offending value sat inside a list argument.
	#[error(
		"mixin argument #{index}{} is {found}, expected a constructor or a list of constructors",
		.element.map(|e| format!("[{e}]")).unwrap_or_default()
	)]
	InvalidMixinArgument {
		index: usize,
		element: Option<usize>,
		found: &'static str,
	},
	/// Registering `mixin` on `link` would make `link` construct itself.
	#[error("mixing {mixin} into {link} would construct {link} recursively")]
	CyclicMixin { link: LinkId, mixin: String },
	/// A parent, mixin or body failed while instantiating `link`.
	#[error("constructing {link} failed: {source}")]
	Construction {
		link: LinkId,
		#[source]
		source: CallError,
	},
	/// The singleton of `link` was requested from inside its own construction.
	#[error("singleton for {link} requested while it is being constructed")]
	ReentrantSingleton { link: LinkId },
	/// The singleton of `link` is being built on another thread that is
	/// itself waiting, possibly through other links, on this thread.
	#[error("singleton for {link} is being built by a thread that waits on this one")]
	SingletonDeadlock { link: LinkId },
	#[error(transparent)]
	Config(#[from] ConfigError),
}

impl From<ChainError> for CallError {
	fn from(err: ChainError) -> Self {
		CallError::Other(Box::new(err))
	}
}
