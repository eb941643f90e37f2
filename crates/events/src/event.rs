use std::sync::Arc;

use propsync_model::{ChangeSet, DocumentId};

use crate::kind::ChangeKind;

/// Change notification published to bundle subscribers.
///
/// `entry` and `item` are `None` when the change applies to more than one
/// document or key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEvent {
	kind: ChangeKind,
	entry: Option<DocumentId>,
	item: Option<String>,
	detail: Option<Arc<ChangeSet>>,
}

impl BundleEvent {
	pub fn all() -> Self {
		Self {
			kind: ChangeKind::All,
			entry: None,
			item: None,
			detail: None,
		}
	}

	/// Keys were added or removed; `detail` carries the classified sets when known.
	pub fn structure(entry: Option<DocumentId>, detail: Option<ChangeSet>) -> Self {
		Self {
			kind: ChangeKind::Struct,
			entry,
			item: None,
			detail: detail.map(Arc::new),
		}
	}

	pub fn file(entry: DocumentId) -> Self {
		Self {
			kind: ChangeKind::File,
			entry: Some(entry),
			item: None,
			detail: None,
		}
	}

	pub fn item(entry: DocumentId, key: impl Into<String>) -> Self {
		Self {
			kind: ChangeKind::Item,
			entry: Some(entry),
			item: Some(key.into()),
			detail: None,
		}
	}

	pub fn kind(&self) -> ChangeKind {
		self.kind
	}

	pub fn entry(&self) -> Option<DocumentId> {
		self.entry
	}

	pub fn item_key(&self) -> Option<&str> {
		self.item.as_deref()
	}

	pub fn detail(&self) -> Option<&ChangeSet> {
		self.detail.as_deref()
	}
}
