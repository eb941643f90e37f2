use indexmap::IndexMap;

use crate::item::Item;
use crate::structure::Structure;

/// Classified differences between two structures, keyed by item key.
///
/// `changed` and `inserted` carry the new items, `deleted` the old ones (or
/// placeholders when the old item is not at hand).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
	pub changed: IndexMap<String, Item>,
	pub inserted: IndexMap<String, Item>,
	pub deleted: IndexMap<String, Item>,
}

impl ChangeSet {
	pub fn is_empty(&self) -> bool {
		self.changed.is_empty() && self.inserted.is_empty() && self.deleted.is_empty()
	}

	/// Returns true when a key was added or removed.
	pub fn is_structural(&self) -> bool {
		!self.inserted.is_empty() || !self.deleted.is_empty()
	}
}

/// Outcome of [`diff`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureDiff {
	/// Same key set on both sides; only values or comments moved.
	///
	/// Consumers get one item notification per entry. Positions derived from
	/// the key set (list indices and the like) stay valid.
	ItemsOnly { changed: Vec<Item> },
	/// At least one key was inserted or deleted.
	Structural(ChangeSet),
}

impl StructureDiff {
	pub fn is_structural(&self) -> bool {
		matches!(self, Self::Structural(_))
	}

	/// Returns true when nothing at all differs.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::ItemsOnly { changed } => changed.is_empty(),
			Self::Structural(changes) => changes.is_empty(),
		}
	}
}

/// Compares `old` against `new`.
///
/// Every item of `new` is looked up by key in `old`: missing keys are
/// inserted, present keys with a different value or comment are changed.
/// Keys of `old` never matched are deleted. A renamed key therefore shows up
/// as one deletion plus one insertion.
pub fn diff(old: &Structure, new: &Structure) -> StructureDiff {
	let mut remaining = old.item_map().clone();
	let mut changes = ChangeSet::default();

	for item in new.items() {
		match remaining.shift_remove(item.key()) {
			None => {
				changes.inserted.insert(item.key().to_string(), item.clone());
			}
			Some(previous) if previous != *item => {
				changes.changed.insert(item.key().to_string(), item.clone());
			}
			Some(_) => {}
		}
	}
	changes.deleted = remaining;

	if changes.is_structural() {
		StructureDiff::Structural(changes)
	} else {
		StructureDiff::ItemsOnly {
			changed: changes.changed.into_values().collect(),
		}
	}
}
