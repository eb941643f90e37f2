use propsync_model::{ChangeSet, DocumentId, Item, Structure};

use crate::bus::{BundleEventReceiver, EventBus};
use crate::event::BundleEvent;
use crate::kind::KindSet;
use crate::lock::BundleLock;

/// Receiver of per-document change notifications.
///
/// Implemented by whatever correlates the documents of one logical resource.
/// Handlers call these methods while holding the ordered lock obtained from
/// [`Self::bundle_lock`]; implementations must not lock it again.
pub trait Aggregator: Send + Sync {
	/// Lock shared by every document reporting to this aggregator.
	fn bundle_lock(&self) -> &BundleLock;

	/// Value or comment of one item changed; the key set did not.
	fn notify_item_changed(&self, structure: &Structure, item: &Item);

	/// Keys of `document` may have changed; no detail available.
	fn notify_one_file_changed(&self, document: DocumentId);

	/// Keys of `document` changed as described by `changes`.
	fn notify_one_file_changed_with(&self, document: DocumentId, changes: ChangeSet);

	/// A parse of `document` failed. The previous structure stays in place.
	fn report_parse_error(&self, document: DocumentId, error: &(dyn std::error::Error + 'static)) {
		tracing::warn!(%document, %error, "bundle.parse_error");
	}
}

/// [`Aggregator`] that publishes every notification as a [`BundleEvent`].
///
/// - item changes become [`crate::ChangeKind::Item`] events,
/// - generic file changes become [`crate::ChangeKind::File`] events,
/// - classified changes become [`crate::ChangeKind::Struct`] events carrying the sets.
#[derive(Debug, Default)]
pub struct EventAggregator {
	lock: BundleLock,
	bus: EventBus,
}

impl EventAggregator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn subscribe(&self, kinds: impl Into<KindSet>) -> BundleEventReceiver {
		self.bus.subscribe(kinds)
	}

	pub fn bus(&self) -> &EventBus {
		&self.bus
	}

	/// Announces that anything may have changed, e.g. a document joined or left.
	pub fn notify_all(&self) {
		let _guard = self.lock.lock();
		self.bus.publish(BundleEvent::all());
	}
}

impl Aggregator for EventAggregator {
	fn bundle_lock(&self) -> &BundleLock {
		&self.lock
	}

	fn notify_item_changed(&self, structure: &Structure, item: &Item) {
		debug_assert!(self.lock.is_held(), "notifications are emitted under the bundle lock");
		tracing::debug!(document = %structure.document(), key = item.key(), "bundle.item_changed");
		self.bus.publish(BundleEvent::item(structure.document(), item.key()));
	}

	fn notify_one_file_changed(&self, document: DocumentId) {
		debug_assert!(self.lock.is_held(), "notifications are emitted under the bundle lock");
		tracing::debug!(%document, "bundle.file_changed");
		self.bus.publish(BundleEvent::file(document));
	}

	fn notify_one_file_changed_with(&self, document: DocumentId, changes: ChangeSet) {
		debug_assert!(self.lock.is_held(), "notifications are emitted under the bundle lock");
		tracing::debug!(
			%document,
			changed = changes.changed.len(),
			inserted = changes.inserted.len(),
			deleted = changes.deleted.len(),
			"bundle.structure_changed"
		);
		self.bus.publish(BundleEvent::structure(Some(document), Some(changes)));
	}
}

#[cfg(test)]
mod tests;
