use std::cell::Cell;
use std::sync::{LazyLock, OnceLock};
use std::thread::{self, ThreadId};

use lineage_primitives::Object;
use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard};
use rustc_hash::FxHashMap;

use crate::error::ChainError;
use crate::id::LinkId;


/// Which thread is building which slot, and which slot each blocked thread
/// is waiting for. Shared by every slot so that a wait cycle spanning
/// several links can be found.
static WAITS: LazyLock<Mutex<WaitGraph>> = LazyLock::new(Default::default);

#[derive(Default)]
struct WaitGraph {
	builders: FxHashMap<usize, ThreadId>,
	waiting: FxHashMap<ThreadId, usize>,
}

impl WaitGraph {
	/// Returns true if `me` blocking on `slot` would wait on itself.
	fn closes_cycle(&self, slot: usize, me: ThreadId) -> bool {
		let mut next = slot;
		for _ in 0..=self.waiting.len() {
			let Some(&owner) = self.builders.get(&next) else {
				return false;
			};
			if owner == me {
				return true;
			}
			match self.waiting.get(&owner) {
				Some(&slot) => next = slot,
				None => return false,
			}
		}
		false
	}
}

/// Set-once slot holding a link's shared instance.
///
/// Reads after initialization are lock-free. First-time requests take the
/// init lock, so concurrent callers wait for one construction and then share
/// its result. The lock is reentrant so that a request made from inside the
/// construction on the same thread is reported instead of deadlocking.
///
/// A request that would block on a slot whose builder is itself waiting,
/// directly or through other slots, on the requesting thread fails with
/// [`ChainError::SingletonDeadlock`].
pub(crate) struct SingletonSlot {
	instance: OnceLock<Object>,
	building: ReentrantMutex<Cell<bool>>,
}

impl SingletonSlot {
	pub(crate) fn new() -> Self {
		Self {
			instance: OnceLock::new(),
			building: ReentrantMutex::new(Cell::new(false)),
		}
	}

	/// Returns the instance if it was already built.
	pub(crate) fn get(&self) -> Option<&Object> {
		self.instance.get()
	}

	fn key(&self) -> usize {
		std::ptr::from_ref(self) as usize
	}

	/// Returns the instance, building it with `init` on first request.
	///
	/// A failed `init` stores nothing; the next request runs `init` again.
	pub(crate) fn get_or_try_init(
		&self,
		link: LinkId,
		init: impl FnOnce() -> Result<Object, ChainError>,
	) -> Result<Object, ChainError> {
		if let Some(instance) = self.instance.get() {
			return Ok(instance.clone());
		}

		let building = self.lock_building(link)?;
		if let Some(instance) = self.instance.get() {
			return Ok(instance.clone());
		}
		if building.replace(true) {
			return Err(ChainError::ReentrantSingleton { link });
		}
		WAITS.lock().builders.insert(self.key(), thread::current().id());

		let instance = {
			let _reset = ResetOnDrop {
				slot: self,
				building: &building,
			};
			init()?
		};
		Ok(self.instance.get_or_init(|| instance).clone())
	}

	fn lock_building(
		&self,
		link: LinkId,
	) -> Result<ReentrantMutexGuard<'_, Cell<bool>>, ChainError> {
		if let Some(guard) = self.building.try_lock() {
			return Ok(guard);
		}

		let me = thread::current().id();
		{
			let mut waits = WAITS.lock();
			if waits.closes_cycle(self.key(), me) {
				tracing::warn!(link = %link, "singleton requests wait on each other across threads");
				return Err(ChainError::SingletonDeadlock { link });
			}
			waits.waiting.insert(me, self.key());
		}
		let guard = self.building.lock();
		WAITS.lock().waiting.remove(&me);
		Ok(guard)
	}
}

/// Clears the building flag and the builder record even if `init` unwinds.
struct ResetOnDrop<'a> {
	slot: &'a SingletonSlot,
	building: &'a Cell<bool>,
}

impl Drop for ResetOnDrop<'_> {
	fn drop(&mut self) {
		WAITS.lock().builders.remove(&self.slot.key());
		self.building.set(false);
	}
}
