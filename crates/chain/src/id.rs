use std::fmt;

use uuid::Uuid;

/// Diagnostic identity of a chain link.
///
/// Tags are unique per link and only used for equality and display; nothing
/// in the runtime branches on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkId {
	/// The root type of a runtime.
	Base,
	/// Any link created by extending or wrapping.
	Generated(Uuid),
}

impl LinkId {
	pub(crate) fn generate() -> Self {
		Self::Generated(Uuid::new_v4())
	}

	/// Returns true for the root tag.
	pub fn is_base(self) -> bool {
		matches!(self, Self::Base)
	}
}

impl fmt::Display for LinkId {
	/// Renders `base` or the first eight hex digits of the token.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Base => f.write_str("base"),
			Self::Generated(uuid) => {
				let mut buf = Uuid::encode_buffer();
				let hex = uuid.simple().encode_lower(&mut buf);
				f.write_str(&hex[..8])
			}
		}
	}
}
