use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use crate::event::BundleEvent;
use crate::kind::{ChangeKind, KindSet};

/// Receiver for bundle events.
pub type BundleEventReceiver = mpsc::UnboundedReceiver<BundleEvent>;

type BundleEventSender = mpsc::UnboundedSender<BundleEvent>;

/// Subscriber lists keyed by change kind.
///
/// Events are delivered in publish order. Subscribers whose receiver was
/// dropped are pruned on the next publish of a kind they asked for.
#[derive(Debug, Default)]
pub struct EventBus {
	subscribers: Mutex<FxHashMap<ChangeKind, Vec<BundleEventSender>>>,
}

impl EventBus {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a subscriber for every kind in `kinds`.
	pub fn subscribe(&self, kinds: impl Into<KindSet>) -> BundleEventReceiver {
		let (tx, rx) = mpsc::unbounded_channel();
		let mut subscribers = self.subscribers.lock();
		for kind in kinds.into().kinds() {
			subscribers.entry(kind).or_default().push(tx.clone());
		}
		rx
	}

	/// Sends `event` to every subscriber of its kind and returns how many got it.
	pub fn publish(&self, event: BundleEvent) -> usize {
		let mut subscribers = self.subscribers.lock();
		let Some(list) = subscribers.get_mut(&event.kind()) else {
			return 0;
		};
		list.retain(|tx| tx.send(event.clone()).is_ok());
		tracing::trace!(kind = event.kind().as_str(), entry = ?event.entry(), delivered = list.len(), "bundle.publish");
		list.len()
	}

	/// Number of live subscribers for `kind` (as of the last publish).
	pub fn subscriber_count(&self, kind: ChangeKind) -> usize {
		self.subscribers.lock().get(&kind).map_or(0, Vec::len)
	}
}
