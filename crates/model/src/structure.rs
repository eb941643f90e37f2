use indexmap::IndexMap;
use thiserror::Error;

use crate::ids::DocumentId;
use crate::item::Item;
use crate::span::SpanHandle;

/// Key lookups that can not be satisfied by a structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
	#[error("key `{0}` already exists")]
	Duplicate(String),

	#[error("key `{0}` does not exist")]
	Missing(String),
}

/// Snapshot of one document: unique keys mapped to items, in document order.
///
/// # Invariants
///
/// - Every key in the map equals the key of the item stored under it.
/// - Keys are unique; construction drops later redefinitions of a key.
///
/// Snapshots are shared behind `Arc` and edited copy-on-write, so a reader
/// holding a snapshot never observes it change.
#[derive(Debug, Clone)]
pub struct Structure {
	document: DocumentId,
	items: IndexMap<String, Item>,
	bounds: Option<SpanHandle>,
}

impl Structure {
	/// Creates an empty structure.
	pub fn new(document: DocumentId, bounds: Option<SpanHandle>) -> Self {
		Self {
			document,
			items: IndexMap::new(),
			bounds,
		}
	}

	/// Builds a structure from parsed items in document order.
	pub fn from_items(document: DocumentId, items: impl IntoIterator<Item = Item>, bounds: Option<SpanHandle>) -> Self {
		let mut structure = Self::new(document, bounds);
		for item in items {
			if let Err(KeyError::Duplicate(key)) = structure.insert_item(item) {
				tracing::warn!(%document, key, "structure.duplicate_key_dropped");
			}
		}
		structure
	}

	pub fn document(&self) -> DocumentId {
		self.document
	}

	/// Span covering the whole region this structure was parsed from.
	pub fn bounds(&self) -> Option<&SpanHandle> {
		self.bounds.as_ref()
	}

	pub fn get_item(&self, key: &str) -> Option<&Item> {
		self.items.get(key)
	}

	/// Returns the item at `index` in document order.
	pub fn get_item_at(&self, index: usize) -> Option<&Item> {
		self.items.get_index(index).map(|(_, item)| item)
	}

	pub fn index_of(&self, key: &str) -> Option<usize> {
		self.items.get_index_of(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.items.contains_key(key)
	}

	pub fn key_count(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.items.keys().map(String::as_str)
	}

	pub fn items(&self) -> impl Iterator<Item = &Item> {
		self.items.values()
	}

	/// Iterates map keys together with the items stored under them.
	pub fn entries(&self) -> impl Iterator<Item = (&str, &Item)> {
		self.items.iter().map(|(key, item)| (key.as_str(), item))
	}

	pub(crate) fn item_map(&self) -> &IndexMap<String, Item> {
		&self.items
	}

	/// Replaces the whole item mapping and bounds with those of `fresh`.
	///
	/// The document identity of `self` is kept.
	pub fn update(&mut self, fresh: Structure) {
		self.items = fresh.items;
		self.bounds = fresh.bounds;
	}

	/// Appends `item` at the end of the document order.
	pub fn insert_item(&mut self, item: Item) -> Result<(), KeyError> {
		if self.items.contains_key(item.key()) {
			return Err(KeyError::Duplicate(item.key().to_string()));
		}
		self.items.insert(item.key().to_string(), item);
		Ok(())
	}

	/// Re-keys `old` to `new`, keeping its position, value, comment and span.
	pub fn rename_item(&mut self, old: &str, new: &str) -> Result<&Item, KeyError> {
		if !self.items.contains_key(old) {
			return Err(KeyError::Missing(old.to_string()));
		}
		if self.items.contains_key(new) {
			return Err(KeyError::Duplicate(new.to_string()));
		}
		let Some((index, _, mut item)) = self.items.shift_remove_full(old) else {
			return Err(KeyError::Missing(old.to_string()));
		};
		item.set_key(new.to_string());
		self.items.shift_insert(index, new.to_string(), item);
		Ok(&self.items[index])
	}

	/// Removes `key` and returns its item.
	pub fn remove_item(&mut self, key: &str) -> Result<Item, KeyError> {
		self.items
			.shift_remove(key)
			.ok_or_else(|| KeyError::Missing(key.to_string()))
	}

	pub fn set_item_value(&mut self, key: &str, value: impl Into<String>) -> Result<&Item, KeyError> {
		let item = self.item_mut(key)?;
		item.set_value(value.into());
		Ok(item)
	}

	pub fn set_item_comment(&mut self, key: &str, comment: Option<String>) -> Result<&Item, KeyError> {
		let item = self.item_mut(key)?;
		item.set_comment(comment);
		Ok(item)
	}

	fn item_mut(&mut self, key: &str) -> Result<&mut Item, KeyError> {
		self.items
			.get_mut(key)
			.ok_or_else(|| KeyError::Missing(key.to_string()))
	}
}

#[cfg(test)]
mod tests;
