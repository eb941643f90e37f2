use pretty_assertions::assert_eq;

use super::*;
use crate::testing::MemoryText;

const DOC: DocumentId = DocumentId(7);

fn sample() -> Structure {
	Structure::from_items(
		DOC,
		[
			Item::new("a", "1"),
			Item::new("b", "2").with_comment("second".to_string()),
			Item::new("c", "3"),
		],
		None,
	)
}

fn keys(structure: &Structure) -> Vec<&str> {
	structure.keys().collect()
}

fn assert_consistent(structure: &Structure) {
	for (key, item) in structure.entries() {
		assert_eq!(key, item.key(), "map key must match item key");
	}
}

#[test]
fn from_items_keeps_document_order() {
	let structure = sample();
	assert_eq!(keys(&structure), vec!["a", "b", "c"]);
	assert_eq!(structure.get_item_at(1).map(Item::value), Some("2"));
	assert_eq!(structure.index_of("c"), Some(2));
	assert_eq!(structure.document(), DOC);
	assert_consistent(&structure);
}

#[test]
fn from_items_drops_redefinitions() {
	let structure = Structure::from_items(DOC, [Item::new("a", "1"), Item::new("a", "override"), Item::new("b", "2")], None);
	assert_eq!(structure.key_count(), 2);
	assert_eq!(structure.get_item("a").map(Item::value), Some("1"));
	assert_consistent(&structure);
}

#[test]
fn insert_rejects_existing_key() {
	let mut structure = sample();
	assert_eq!(structure.insert_item(Item::new("b", "other")), Err(KeyError::Duplicate("b".into())));
	assert_eq!(structure.get_item("b").map(Item::value), Some("2"));

	structure.insert_item(Item::new("d", "4")).expect("fresh key");
	assert_eq!(keys(&structure), vec!["a", "b", "c", "d"]);
}

#[test]
fn rename_keeps_position_and_content() {
	let text = MemoryText::new();
	let span = text.push("b=2\n");
	let mut structure = Structure::from_items(
		DOC,
		[Item::new("a", "1"), Item::new("b", "2").with_comment("second".to_string()).with_span(span.clone())],
		None,
	);

	let renamed = structure.rename_item("b", "bee").expect("rename").clone();
	assert_eq!(renamed.key(), "bee");
	assert_eq!(renamed.value(), "2");
	assert_eq!(renamed.comment(), Some("second"));
	assert!(renamed.span().is_some_and(|s| std::sync::Arc::ptr_eq(s, &span)));

	assert_eq!(keys(&structure), vec!["a", "bee"]);
	assert!(structure.get_item("b").is_none());
	assert_consistent(&structure);
}

#[test]
fn rename_onto_taken_key_changes_nothing() {
	let mut structure = sample();
	assert_eq!(structure.rename_item("a", "c").err(), Some(KeyError::Duplicate("c".into())));
	assert_eq!(structure.rename_item("zz", "y").err(), Some(KeyError::Missing("zz".into())));
	assert_eq!(keys(&structure), vec!["a", "b", "c"]);
}

#[test]
fn remove_twice_fails_cleanly() {
	let mut structure = sample();
	let removed = structure.remove_item("b").expect("present");
	assert_eq!(removed.value(), "2");
	assert_eq!(structure.remove_item("b").err(), Some(KeyError::Missing("b".into())));
	assert_eq!(keys(&structure), vec!["a", "c"]);
}

#[test]
fn value_and_comment_edits() {
	let mut structure = sample();
	structure.set_item_value("a", "one").expect("present");
	structure.set_item_comment("a", Some("first".into())).expect("present");
	let item = structure.get_item("a").expect("present");
	assert_eq!((item.value(), item.comment()), ("one", Some("first")));
	assert!(structure.set_item_value("missing", "x").is_err());
}

#[test]
fn update_replaces_items_and_bounds_but_not_identity() {
	let text = MemoryText::new();
	let mut structure = sample();
	let fresh = Structure::from_items(DocumentId(99), [Item::new("x", "9")], Some(text.bounds()));

	structure.update(fresh);
	assert_eq!(structure.document(), DOC);
	assert_eq!(keys(&structure), vec!["x"]);
	assert!(structure.bounds().is_some());
}
