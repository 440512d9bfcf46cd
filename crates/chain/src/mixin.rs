//! Mixin registration.
//!
//! Registering a mixin copies its surface (own and inherited members) onto
//! the target link's own surface and appends its constructor to the link's
//! mixin list. The list is append-only and published as one snapshot per
//! registration call.
//!
//! A mixin whose construction would construct the target again (the target
//! itself, one of its descendants, or anything that mixes either in) is
//! rejected, since every later instantiation of the target would recurse
//! without end.

use std::sync::Arc;

use arc_swap::ArcSwap;
use lineage_primitives::{CtorRef, NativeCtor, Value};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::config::MixinRegistration;
use crate::error::ChainError;
use crate::link::ChainLink;


/// Append-only mixin list of one link.
pub(crate) struct MixinRegistry {
	list: ArcSwap<Vec<CtorRef>>,
	write: Mutex<()>,
}

impl MixinRegistry {
	pub(crate) fn new() -> Self {
		Self {
			list: ArcSwap::from_pointee(Vec::new()),
			write: Mutex::new(()),
		}
	}

	/// Returns the current list. Later registrations do not affect it.
	pub(crate) fn snapshot(&self) -> Arc<Vec<CtorRef>> {
		self.list.load_full()
	}

	#[cfg(test)]
	pub(crate) fn len(&self) -> usize {
		self.list.load().len()
	}
}

/// Turns one registration argument into the constructors it names.
///
/// A `Function` becomes a native constructor with an empty surface. A list
/// contributes each element; a list inside a list is rejected.
fn normalize(index: usize, value: &Value) -> Result<Vec<CtorRef>, ChainError> {
	match value {
		Value::List(items) => items
			.iter()
			.enumerate()
			.map(|(element, item)| {
				single(item).ok_or(ChainError::InvalidMixinArgument {
					index,
					element: Some(element),
					found: item.type_name(),
				})
			})
			.collect(),
		other => single(other)
			.map(|ctor| vec![ctor])
			.ok_or(ChainError::InvalidMixinArgument {
				index,
				element: None,
				found: other.type_name(),
			}),
	}
}

fn single(value: &Value) -> Option<CtorRef> {
	match value {
		Value::Ctor(ctor) => Some(ctor.clone()),
		Value::Function(body) => Some(NativeCtor::from_function(body.clone()).into_ref()),
		_ => None,
	}
}

impl ChainLink {
	/// Registers mixins from positional arguments.
	///
	/// Each argument is a constructor, a plain function, or a list of those.
	/// Under [`MixinRegistration::Transactional`] every argument is checked
	/// before any is applied, so a failure leaves the link untouched. Under
	/// [`MixinRegistration::Eager`] arguments before the failing one stay
	/// applied.
	pub fn mixin(&self, args: &[Value]) -> Result<(), ChainError> {
		match self.config().mixin_registration {
			MixinRegistration::Transactional => {
				let mut ctors = Vec::new();
				for (index, value) in args.iter().enumerate() {
					ctors.extend(normalize(index, value).inspect_err(|err| self.reject(err))?);
				}
				self.apply_mixins(ctors)
			}
			MixinRegistration::Eager => {
				for (index, value) in args.iter().enumerate() {
					let ctors = normalize(index, value).inspect_err(|err| self.reject(err))?;
					self.apply_mixins(ctors)?;
				}
				Ok(())
			}
		}
	}

	/// Registers one mixin constructor.
	///
	/// Fails only when `ctor` would construct this link again.
	pub fn mixin_ctor(&self, ctor: CtorRef) -> Result<&Self, ChainError> {
		self.apply_mixins([ctor])?;
		Ok(self)
	}

	/// Registers mixin constructors in order. Either all of them register or,
	/// if one would construct this link again, none do.
	pub fn mixin_ctors(
		&self,
		ctors: impl IntoIterator<Item = CtorRef>,
	) -> Result<&Self, ChainError> {
		self.apply_mixins(ctors)?;
		Ok(self)
	}

	fn reject(&self, err: &ChainError) {
		tracing::warn!(link = %self.id(), error = %err, "rejected mixin registration");
	}

	/// Returns true if constructing `ctor` would run this link's construction.
	///
	/// Walks `ctor`'s ancestors and, transitively, every mixin registered on
	/// them, looking for a surface that delegates to this link's surface.
	fn constructed_by(&self, ctor: &CtorRef) -> bool {
		let mut seen = FxHashSet::default();
		let mut pending = vec![ctor.clone()];
		while let Some(next) = pending.pop() {
			if next.prototype().delegates_to(self.prototype()) {
				return true;
			}
			if !seen.insert(Arc::as_ptr(&next).cast::<()>() as usize) {
				continue;
			}
			if let Some(link) = ChainLink::from_ctor(&next) {
				pending.extend(link.inner().mixins.snapshot().iter().cloned());
				pending.extend(link.parent().cloned());
			}
		}
		false
	}

	fn apply_mixins(&self, ctors: impl IntoIterator<Item = CtorRef>) -> Result<(), ChainError> {
		let ctors: Vec<CtorRef> = ctors.into_iter().collect();
		let registry = &self.inner().mixins;
		let _write = registry.write.lock();

		if let Some(cyclic) = ctors.iter().find(|ctor| self.constructed_by(ctor)) {
			let err = ChainError::CyclicMixin {
				link: self.id(),
				mixin: cyclic.tag(),
			};
			self.reject(&err);
			return Err(err);
		}

		let mut next = Vec::clone(&registry.list.load());
		let before = next.len();
		for ctor in ctors {
			let copied = self.prototype().copy_from(ctor.prototype());
			tracing::debug!(
				link = %self.id(),
				mixin = %ctor.tag(),
				members = copied,
				"registered mixin"
			);
			next.push(ctor);
		}
		if next.len() != before {
			registry.list.store(Arc::new(next));
		}
		Ok(())
	}
}
