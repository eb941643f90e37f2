use bitflags::bitflags;

/// What a [`crate::BundleEvent`] says changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
	/// Keys may have been added or removed.
	Struct,
	/// Everything may have changed, including the set of documents.
	All,
	/// One document changed; no detail.
	File,
	/// One key within one document changed.
	Item,
}

impl ChangeKind {
	pub const ALL_KINDS: [ChangeKind; 4] = [Self::Struct, Self::All, Self::File, Self::Item];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Struct => "struct",
			Self::All => "all",
			Self::File => "file",
			Self::Item => "item",
		}
	}

	pub const fn as_set(self) -> KindSet {
		match self {
			Self::Struct => KindSet::STRUCT,
			Self::All => KindSet::ALL,
			Self::File => KindSet::FILE,
			Self::Item => KindSet::ITEM,
		}
	}
}

bitflags! {
	/// Subscription filter over [`ChangeKind`]s.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct KindSet: u8 {
		const STRUCT = 1 << 0;
		const ALL = 1 << 1;
		const FILE = 1 << 2;
		const ITEM = 1 << 3;
	}
}

impl KindSet {
	/// Kinds contained in this set.
	pub fn kinds(self) -> impl Iterator<Item = ChangeKind> {
		ChangeKind::ALL_KINDS
			.into_iter()
			.filter(move |kind| self.contains(kind.as_set()))
	}
}

impl From<ChangeKind> for KindSet {
	fn from(kind: ChangeKind) -> Self {
		kind.as_set()
	}
}
