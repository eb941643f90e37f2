use propsync_model::{KeyError, SpanError};
use thiserror::Error;

/// Why a parse produced no structure.
#[derive(Debug, Error)]
pub enum ParseError {
	#[error("I/O error while parsing: {0}")]
	Io(#[from] std::io::Error),

	#[error("parse cancelled")]
	Cancelled,
}

/// Why an item edit was refused.
///
/// A refused edit leaves both the document text and the cached structure
/// untouched, and emits no notification.
#[derive(Debug, Error)]
pub enum EditError {
	#[error(transparent)]
	Key(#[from] KeyError),

	#[error("no structure available")]
	NoStructure,

	#[error("text edit failed: {0}")]
	Span(#[from] SpanError),
}

pub type Result<T> = std::result::Result<T, EditError>;
