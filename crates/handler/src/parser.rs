use propsync_model::Structure;

use crate::error::ParseError;

/// Source of fresh structures for one document.
///
/// `parse` is called from the blocking pool with no handler lock held.
/// Implementations that can run for a while should watch a token from a
/// [`propsync_worker::CancelScope`] and fire it from `cancel`.
pub trait StructureParser: Send + Sync {
	/// False while the underlying resource can not be read (e.g. deleted on disk).
	fn is_readable(&self) -> bool;

	fn parse(&self) -> Result<Structure, ParseError>;

	/// Asks an in-flight `parse` to return [`ParseError::Cancelled`] promptly.
	fn cancel(&self);
}
