//! Document model for key/value/comment ("properties" style) text.
//!
//! A [`Structure`] is a snapshot of one document: an ordered map of unique keys
//! to [`Item`]s plus an opaque span over the region it was parsed from. Two
//! snapshots are reconciled by [`diff`], which classifies the difference as
//! either item-only edits or a structural change.

/// Structure diffing and change classification.
pub mod diff;
/// Document identifiers.
pub mod ids;
/// Parsed key/value/comment records.
pub mod item;
/// Opaque text-span collaborator interface.
pub mod span;
/// Keyed document snapshots.
pub mod structure;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use diff::{ChangeSet, StructureDiff, diff};
pub use ids::DocumentId;
pub use item::Item;
pub use span::{SpanError, SpanHandle, TextSpan};
pub use structure::{KeyError, Structure};
