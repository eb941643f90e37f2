use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Errors reported by a text-span collaborator.
#[derive(Debug, Error)]
pub enum SpanError {
	/// The span no longer maps to live text (its region was removed).
	#[error("span is no longer attached to the document")]
	Detached,

	/// The backing buffer refused the edit.
	#[error("text edit rejected: {0}")]
	Rejected(String),
}

/// A region of the backing text buffer.
///
/// Spans are owned by the text-position layer, which keeps them attached to
/// the right text while the buffer is edited concurrently. The model never
/// reads offsets out of a span; it only asks the span to edit or report its
/// own text.
pub trait TextSpan: fmt::Debug + Send + Sync {
	/// Inserts `text` directly after this span and returns a span covering it.
	fn insert_after(&self, text: &str) -> Result<SpanHandle, SpanError>;

	/// Replaces the text covered by this span.
	fn set_text(&self, text: &str) -> Result<(), SpanError>;

	/// Returns the text currently covered by this span.
	fn text(&self) -> String;
}

/// Shared handle to a [`TextSpan`].
pub type SpanHandle = Arc<dyn TextSpan>;
