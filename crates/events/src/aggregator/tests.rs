use pretty_assertions::assert_eq;
use propsync_model::{ChangeSet, DocumentId, Item, Structure};

use super::*;
use crate::ChangeKind;

#[test]
fn item_change_becomes_item_event() {
	let aggregator = EventAggregator::new();
	let mut rx = aggregator.subscribe(KindSet::all());
	let structure = Structure::from_items(DocumentId(4), [Item::new("a", "1")], None);

	{
		let _guard = aggregator.bundle_lock().lock();
		aggregator.notify_item_changed(&structure, &Item::new("a", "1"));
	}

	let event = rx.try_recv().expect("event");
	assert_eq!(event.kind(), ChangeKind::Item);
	assert_eq!(event.entry(), Some(DocumentId(4)));
	assert_eq!(event.item_key(), Some("a"));
}

#[test]
fn classified_change_carries_detail() {
	let aggregator = EventAggregator::new();
	let mut rx = aggregator.subscribe(ChangeKind::Struct);
	let mut changes = ChangeSet::default();
	changes.inserted.insert("b".into(), Item::new("b", "3"));

	{
		let _guard = aggregator.bundle_lock().lock();
		aggregator.notify_one_file_changed_with(DocumentId(2), changes.clone());
		aggregator.notify_one_file_changed(DocumentId(2));
	}

	let event = rx.try_recv().expect("struct event");
	assert_eq!(event.entry(), Some(DocumentId(2)));
	assert_eq!(event.detail(), Some(&changes));
	assert!(rx.try_recv().is_err(), "generic file change is not a struct event");
}

#[test]
fn notify_all_has_no_entry() {
	let aggregator = EventAggregator::new();
	let mut rx = aggregator.subscribe(ChangeKind::All);
	aggregator.notify_all();

	let event = rx.try_recv().expect("all event");
	assert_eq!(event, BundleEvent::all());
	assert!(event.entry().is_none());
	assert!(event.item_key().is_none());
}
