use std::fmt;

/// Identifier for one document (one locale variant of a resource).
///
/// Assigned by whoever owns the set of documents; unique within one bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "doc#{}", self.0)
	}
}
