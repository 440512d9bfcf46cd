/// Failure raised by a function body, a method call, or a constructor.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
	/// A body or method signalled failure with a message.
	#[error("{0}")]
	Thrown(String),
	/// A member exists but holds a value that cannot be called.
	#[error("member {name:?} is {found}, not a function")]
	NotCallable { name: String, found: &'static str },
	/// No member with this name is visible on the object.
	#[error("no member named {name:?}")]
	MissingMember { name: String },
	/// A constructor run on behalf of another one failed.
	#[error("{ctor} failed: {source}")]
	Nested {
		ctor: String,
		#[source]
		source: Box<CallError>,
	},
	/// An error from another layer (e.g. a chain operation run inside a body).
	#[error(transparent)]
	Other(Box<dyn std::error::Error + Send + Sync>),
}

impl CallError {
	/// Creates a [`CallError::Thrown`] from any message.
	pub fn thrown(message: impl Into<String>) -> Self {
		Self::Thrown(message.into())
	}
}
