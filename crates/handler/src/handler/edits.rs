//! Item edits on the cached structure.
//!
//! Every edit rewrites the document text through the item spans first and
//! touches the mapping only once the text edit succeeded. A structure or item
//! without a span has no text to edit and refuses the edit with
//! [`SpanError::Detached`].

use std::sync::Arc;

use propsync_model::{ChangeSet, Item, KeyError, SpanError, SpanHandle, Structure};

use super::{Notice, StructureHandler};
use crate::error::{EditError, Result};

impl StructureHandler {
	/// Appends a new item at the end of the document.
	pub fn add_item(&self, key: &str, value: &str, comment: Option<&str>) -> Result<()> {
		self.edit(|structure| {
			if structure.contains_key(key) {
				return Err(KeyError::Duplicate(key.to_string()).into());
			}
			let item = Item::new(key, value).with_comment(comment.map(str::to_string));
			let bounds = structure.bounds().ok_or(SpanError::Detached)?;
			let span = bounds.insert_after(&item.render())?;
			let item = item.with_span(span);
			Arc::make_mut(structure).insert_item(item.clone())?;

			let mut changes = ChangeSet::default();
			changes.inserted.insert(key.to_string(), item);
			Ok(Some(Notice::Changes(changes)))
		})
	}

	/// Re-keys `old` to `new` in place, keeping value, comment and position.
	pub fn rename_item(&self, old: &str, new: &str) -> Result<()> {
		self.edit(|structure| {
			let Some(item) = structure.get_item(old) else {
				return Err(KeyError::Missing(old.to_string()).into());
			};
			if structure.contains_key(new) {
				return Err(KeyError::Duplicate(new.to_string()).into());
			}
			let renamed = Item::new(new, item.value()).with_comment(item.comment().map(str::to_string));
			span_of(item)?.set_text(&renamed.render())?;
			let renamed = Arc::make_mut(structure).rename_item(old, new)?.clone();

			let mut changes = ChangeSet::default();
			changes.deleted.insert(old.to_string(), Item::placeholder(old));
			changes.inserted.insert(new.to_string(), renamed);
			Ok(Some(Notice::Changes(changes)))
		})
	}

	/// Removes `key` and its text.
	pub fn delete_item(&self, key: &str) -> Result<()> {
		self.edit(|structure| {
			let Some(item) = structure.get_item(key) else {
				return Err(KeyError::Missing(key.to_string()).into());
			};
			span_of(item)?.set_text("")?;
			Arc::make_mut(structure).remove_item(key)?;
			Ok(Some(Notice::File))
		})
	}

	pub fn set_item_value(&self, key: &str, value: &str) -> Result<()> {
		self.edit(|structure| {
			let Some(item) = structure.get_item(key) else {
				return Err(KeyError::Missing(key.to_string()).into());
			};
			if item.value() == value {
				return Ok(None);
			}
			let edited = Item::new(key, value).with_comment(item.comment().map(str::to_string));
			rewrite(item, &edited)?;
			let item = Arc::make_mut(structure).set_item_value(key, value)?.clone();
			Ok(Some(Notice::Item(item)))
		})
	}

	pub fn set_item_comment(&self, key: &str, comment: Option<&str>) -> Result<()> {
		self.edit(|structure| {
			let Some(item) = structure.get_item(key) else {
				return Err(KeyError::Missing(key.to_string()).into());
			};
			if item.comment() == comment {
				return Ok(None);
			}
			let edited = Item::new(key, item.value()).with_comment(comment.map(str::to_string));
			rewrite(item, &edited)?;
			let item = Arc::make_mut(structure)
				.set_item_comment(key, comment.map(str::to_string))?
				.clone();
			Ok(Some(Notice::Item(item)))
		})
	}

	/// Runs `apply` on the cached structure under both locks, stores the
	/// result and emits the notice it returns.
	///
	/// A failed `apply` must not have mutated the structure.
	fn edit(&self, apply: impl FnOnce(&mut Arc<Structure>) -> Result<Option<Notice>>) -> Result<()> {
		self.get_structure().ok_or(EditError::NoStructure)?;

		let shared = &self.shared;
		let mut state = shared.aggregator.bundle_lock().lock_with(&shared.state);
		let Some(mut structure) = state.slot.take() else {
			return Err(EditError::NoStructure);
		};
		let outcome = apply(&mut structure);
		state.slot.store(Arc::clone(&structure));

		match outcome {
			Ok(Some(notice)) => {
				// A parse still in flight read the text from before this edit.
				state.generation = shared.generations.next();
				if state.parse_task.rearm(shared.config.reparse_debounce) {
					tracing::trace!(document = %shared.document, "structure.reparse_rearmed_after_edit");
				}
				self.emit(&state, &structure, notice);
				Ok(())
			}
			Ok(None) => Ok(()),
			Err(error) => {
				tracing::debug!(document = %shared.document, %error, "structure.edit_refused");
				Err(error)
			}
		}
	}
}

fn span_of(item: &Item) -> std::result::Result<&SpanHandle, SpanError> {
	item.span().ok_or(SpanError::Detached)
}

fn rewrite(item: &Item, edited: &Item) -> Result<()> {
	span_of(item)?.set_text(&edited.render())?;
	Ok(())
}
