use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

/// Outer lock shared by every document of one logical resource.
///
/// # Lock order
///
/// Any path that mutates or replaces a document structure holds this lock
/// first and the document handler's own lock second. [`Self::lock_with`] is
/// the only way handlers acquire both, which keeps the order fixed. Neither
/// lock is reentrant: code running under an [`OrderedGuard`] must not call
/// back into the handler or take this lock again.
#[derive(Debug, Clone, Default)]
pub struct BundleLock {
	inner: Arc<Mutex<()>>,
}

impl BundleLock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Takes this lock, then `inner`, and returns both as one guard.
	pub fn lock_with<'a, T>(&'a self, inner: &'a Mutex<T>) -> OrderedGuard<'a, T> {
		let outer = self.inner.lock();
		let inner = inner.lock();
		OrderedGuard { inner, _outer: outer }
	}

	/// Takes only the outer lock, for aggregator work spanning all documents.
	pub fn lock(&self) -> MutexGuard<'_, ()> {
		self.inner.lock()
	}

	/// Returns true while any thread holds the outer lock.
	pub fn is_held(&self) -> bool {
		self.inner.is_locked()
	}
}

/// Both locks of a document, acquired in order.
///
/// Fields drop in declaration order, so the inner lock is released first.
pub struct OrderedGuard<'a, T> {
	inner: MutexGuard<'a, T>,
	_outer: MutexGuard<'a, ()>,
}

impl<T> Deref for OrderedGuard<'_, T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.inner
	}
}

impl<T> DerefMut for OrderedGuard<'_, T> {
	fn deref_mut(&mut self) -> &mut T {
		&mut self.inner
	}
}
