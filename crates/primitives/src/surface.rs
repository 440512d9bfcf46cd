//! Behavior surfaces.
//!
//! A [`Surface`] is the member table a constructor exposes to its instances:
//! methods and shared defaults keyed by name. Each surface owns an ordered
//! table and may delegate to one other surface. Lookups walk the delegation
//! chain at call time, so a member defined on an ancestor after a descendant
//! surface was created is still visible through the descendant.
//!
//! # Invariants
//!
//! * Delegation is fixed at creation; a surface never changes its delegate.
//! * Own-table writes overwrite in place and keep the first insertion position.
//! * Locks are released before any member value is handed back to callers.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxBuildHasher;

use crate::value::Value;


/// Ordered member table keyed by name.
pub type Members = IndexMap<Arc<str>, Value, FxBuildHasher>;

/// Shared handle to a behavior surface.
#[derive(Clone, Default)]
pub struct Surface(Arc<SurfaceInner>);

#[derive(Default)]
struct SurfaceInner {
	own: RwLock<Members>,
	delegate: Option<Surface>,
}

impl Surface {
	/// Creates an empty surface with no delegate.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty surface that delegates lookups to `parent`.
	pub fn delegating_to(parent: &Surface) -> Self {
		Self(Arc::new(SurfaceInner {
			own: RwLock::default(),
			delegate: Some(parent.clone()),
		}))
	}

	/// Returns the surface lookups fall back to.
	#[inline]
	pub fn delegate(&self) -> Option<&Surface> {
		self.0.delegate.as_ref()
	}

	/// Iterates this surface followed by every delegate, nearest first.
	pub fn chain(&self) -> impl Iterator<Item = &Surface> + '_ {
		std::iter::successors(Some(self), |s| s.delegate())
	}

	/// Returns true if `other` is this surface or one of its delegates.
	pub fn delegates_to(&self, other: &Surface) -> bool {
		self.chain().any(|s| s.ptr_eq(other))
	}

	/// Looks a member up through the delegation chain.
	pub fn get(&self, name: &str) -> Option<Value> {
		self.chain().find_map(|s| s.get_own(name))
	}

	/// Looks a member up in the own table only.
	pub fn get_own(&self, name: &str) -> Option<Value> {
		self.0.own.read().get(name).cloned()
	}

	/// Returns true if the member is visible anywhere on the chain.
	pub fn contains(&self, name: &str) -> bool {
		self.chain().any(|s| s.0.own.read().contains_key(name))
	}

	/// Defines or overwrites a member in the own table.
	pub fn define(&self, name: impl Into<Arc<str>>, value: impl Into<Value>) {
		self.0.own.write().insert(name.into(), value.into());
	}

	/// Returns the own member names in insertion order.
	pub fn own_names(&self) -> Vec<Arc<str>> {
		self.0.own.read().keys().cloned().collect()
	}

	/// Returns every member visible through this surface.
	///
	/// Farther delegates are visited first, so nearer definitions override
	/// same-named members while the first-seen position is kept.
	pub fn enumerate(&self) -> Members {
		let chain: Vec<&Surface> = self.chain().collect();
		let mut members = Members::default();
		for surface in chain.into_iter().rev() {
			let own = surface.0.own.read();
			for (name, value) in own.iter() {
				members.insert(name.clone(), value.clone());
			}
		}
		members
	}

	/// Copies every member visible through `source` into the own table,
	/// overwriting existing entries. Returns the number of members copied.
	pub fn copy_from(&self, source: &Surface) -> usize {
		let members = source.enumerate();
		let count = members.len();
		self.0.own.write().extend(members);
		count
	}

	/// Returns true if both handles refer to the same surface.
	#[inline]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl std::fmt::Debug for Surface {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Surface")
			.field("own", &self.own_names())
			.field("depth", &self.chain().count())
			.finish()
	}
}
