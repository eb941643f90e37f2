//! In-memory span implementation for tests.
//!
//! [`MemoryText`] stores a document as an ordered list of segments. Every
//! segment span stays attached to its segment however many segments are
//! inserted around it, which is all the position tracking tests need.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::item::Item;
use crate::span::{SpanError, SpanHandle, TextSpan};

#[derive(Debug, Default)]
struct Segments {
	/// Segment ids in document order.
	order: Vec<usize>,
	/// Segment text by id.
	texts: Vec<String>,
	reject_edits: bool,
}

impl Segments {
	fn add_after(&mut self, anchor: Option<usize>, text: &str) -> Result<usize, SpanError> {
		if self.reject_edits {
			return Err(SpanError::Rejected("read-only".into()));
		}
		let id = self.texts.len();
		self.texts.push(text.to_string());
		let at = match anchor {
			Some(anchor) => self.position(anchor)? + 1,
			None => self.order.len(),
		};
		self.order.insert(at, id);
		Ok(id)
	}

	fn position(&self, id: usize) -> Result<usize, SpanError> {
		self.order.iter().position(|&seg| seg == id).ok_or(SpanError::Detached)
	}
}

/// Segment-based text document.
#[derive(Debug, Default)]
pub struct MemoryText {
	segments: Mutex<Segments>,
}

impl MemoryText {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Span over the whole document; inserting after it appends at the end.
	pub fn bounds(self: &Arc<Self>) -> SpanHandle {
		Arc::new(WholeSpan { text: Arc::clone(self) })
	}

	/// Appends a segment and returns its span. Ignores [`Self::reject_edits`].
	pub fn push(self: &Arc<Self>, text: &str) -> SpanHandle {
		let mut segments = self.segments.lock();
		let id = segments.texts.len();
		segments.texts.push(text.to_string());
		segments.order.push(id);
		Arc::new(SegmentSpan { text: Arc::clone(self), id })
	}

	/// Appends the rendered form of `item` and attaches the resulting span.
	pub fn push_item(self: &Arc<Self>, item: Item) -> Item {
		let span = self.push(&item.render());
		item.with_span(span)
	}

	/// Makes every subsequent span edit fail with [`SpanError::Rejected`].
	pub fn reject_edits(&self, reject: bool) {
		self.segments.lock().reject_edits = reject;
	}

	/// Full document text.
	pub fn text(&self) -> String {
		let segments = self.segments.lock();
		segments.order.iter().map(|&id| segments.texts[id].as_str()).collect()
	}
}

#[derive(Debug)]
struct WholeSpan {
	text: Arc<MemoryText>,
}

impl TextSpan for WholeSpan {
	fn insert_after(&self, text: &str) -> Result<SpanHandle, SpanError> {
		let id = self.text.segments.lock().add_after(None, text)?;
		Ok(Arc::new(SegmentSpan {
			text: Arc::clone(&self.text),
			id,
		}))
	}

	fn set_text(&self, text: &str) -> Result<(), SpanError> {
		let mut segments = self.text.segments.lock();
		if segments.reject_edits {
			return Err(SpanError::Rejected("read-only".into()));
		}
		segments.order.clear();
		segments.add_after(None, text)?;
		Ok(())
	}

	fn text(&self) -> String {
		self.text.text()
	}
}

#[derive(Debug)]
struct SegmentSpan {
	text: Arc<MemoryText>,
	id: usize,
}

impl TextSpan for SegmentSpan {
	fn insert_after(&self, text: &str) -> Result<SpanHandle, SpanError> {
		let id = self.text.segments.lock().add_after(Some(self.id), text)?;
		Ok(Arc::new(SegmentSpan {
			text: Arc::clone(&self.text),
			id,
		}))
	}

	fn set_text(&self, text: &str) -> Result<(), SpanError> {
		let mut segments = self.text.segments.lock();
		if segments.reject_edits {
			return Err(SpanError::Rejected("read-only".into()));
		}
		segments.position(self.id)?;
		segments.texts[self.id] = text.to_string();
		Ok(())
	}

	fn text(&self) -> String {
		let segments = self.text.segments.lock();
		match segments.position(self.id) {
			Ok(_) => segments.texts[self.id].clone(),
			Err(_) => String::new(),
		}
	}
}
