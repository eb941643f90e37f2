use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Monotonic generation clock.
///
/// Background work captures the generation current at its start; bumping the
/// clock marks every result produced under an older generation as stale.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a new generation clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}
}

/// Cancellation source that re-arms itself after firing.
///
/// Work grabs [`Self::token`] when it starts. [`Self::cancel`] fires every
/// token handed out so far and installs a fresh one, so work started later is
/// unaffected.
#[derive(Debug, Default)]
pub struct CancelScope {
	current: Mutex<CancellationToken>,
}

impl CancelScope {
	pub fn new() -> Self {
		Self::default()
	}

	/// Token for work starting now.
	pub fn token(&self) -> CancellationToken {
		self.current.lock().clone()
	}

	/// Cancels all outstanding tokens.
	pub fn cancel(&self) {
		let fired = std::mem::take(&mut *self.current.lock());
		fired.cancel();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generations_are_monotonic_across_clones() {
		let clock = GenerationClock::new();
		let shared = clock.clone();
		assert_eq!(clock.next(), 1);
		assert_eq!(shared.next(), 2);
		assert_eq!(clock.next(), 3);
	}

	#[test]
	fn cancel_scope_only_fires_outstanding_tokens() {
		let scope = CancelScope::new();
		let before = scope.token();
		scope.cancel();
		let after = scope.token();

		assert!(before.is_cancelled());
		assert!(!after.is_cancelled());
	}
}
