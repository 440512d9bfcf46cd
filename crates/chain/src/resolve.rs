//! Parent argument resolution.

use std::borrow::Cow;

use lineage_primitives::Value;


/// Computes the arguments forwarded to a link's parent and to each of its mixins.
///
/// Rules, first match wins:
///
/// 1. No stubs: the call arguments pass through unchanged.
/// 2. `parent_arity <= stubs.len()`: the stubs alone satisfy the parent.
/// 3. Otherwise the stubs are topped up with the leading
///    `parent_arity - stubs.len()` call arguments (fewer if fewer were passed).
///
/// The link's own body always receives the unresolved call arguments; this
/// only decides what the parent and mixins see.
pub fn resolve_parent_args<'a>(
	parent_arity: usize,
	stubs: &'a [Value],
	call_args: &'a [Value],
) -> Cow<'a, [Value]> {
	if stubs.is_empty() {
		return Cow::Borrowed(call_args);
	}
	if parent_arity <= stubs.len() {
		return Cow::Borrowed(stubs);
	}

	let borrow = (parent_arity - stubs.len()).min(call_args.len());
	let mut resolved = Vec::with_capacity(stubs.len() + borrow);
	resolved.extend_from_slice(stubs);
	resolved.extend_from_slice(&call_args[..borrow]);
	Cow::Owned(resolved)
}
