//! Reclaimable cache slot for one document's structure.

use std::sync::Arc;

use propsync_model::Structure;
use tokio::time::Instant;

use crate::config::RetentionPolicy;

/// Holds the cached structure and decides when it may be dropped.
///
/// A dropped structure is rebuilt by the next read. The slot also remembers
/// whether anyone ever asked for the structure: background reparses are
/// pointless for documents nobody has looked at.
#[derive(Debug)]
pub(crate) struct CacheSlot {
	structure: Option<Arc<Structure>>,
	last_access: Instant,
	warmed: bool,
	retention: RetentionPolicy,
}

impl CacheSlot {
	pub(crate) fn new(retention: RetentionPolicy) -> Self {
		Self {
			structure: None,
			last_access: Instant::now(),
			warmed: false,
			retention,
		}
	}

	/// Records that a reader asked for the structure.
	pub(crate) fn mark_warmed(&mut self) {
		self.warmed = true;
	}

	pub(crate) fn is_warmed(&self) -> bool {
		self.warmed
	}

	/// Returns the cached structure and refreshes its retention timer.
	pub(crate) fn get(&mut self) -> Option<Arc<Structure>> {
		self.expire();
		let structure = self.structure.clone()?;
		self.last_access = Instant::now();
		Some(structure)
	}

	/// Removes the cached structure so it can be edited and stored back.
	pub(crate) fn take(&mut self) -> Option<Arc<Structure>> {
		self.expire();
		self.structure.take()
	}

	pub(crate) fn store(&mut self, structure: Arc<Structure>) {
		self.structure = Some(structure);
		self.last_access = Instant::now();
	}

	/// Drops the cached structure. Returns false if nothing was cached.
	pub(crate) fn evict(&mut self) -> bool {
		self.structure.take().is_some()
	}

	pub(crate) fn is_filled(&self) -> bool {
		self.structure.is_some()
	}

	fn expire(&mut self) {
		let RetentionPolicy::DropAfter(ttl) = self.retention else {
			return;
		};
		if self.structure.is_some() && self.last_access.elapsed() >= ttl {
			tracing::debug!(?ttl, "structure.cache_expired");
			self.structure = None;
		}
	}
}
