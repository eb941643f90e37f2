//! Handler tests against an in-memory parser and a recording aggregator.


use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use propsync_events::{Aggregator, BundleEventReceiver, BundleLock, EventAggregator, KindSet};
use propsync_model::testing::MemoryText;
use propsync_model::{ChangeSet, DocumentId, Item, Structure};
use propsync_worker::{CancelScope, WorkerRuntime};

use super::*;
use crate::error::ParseError;

pub(super) const DOC: DocumentId = DocumentId(7);

/// Parser over a mutable list of entries.
///
/// Every parse snapshots the entries when it starts and renders them into a
/// fresh [`MemoryText`], so item spans point into the text of the latest
/// parse. `hold` parks a parse after the snapshot until it is released or
/// cancelled, like a slow parse over a large document.
#[derive(Default)]
pub(super) struct MockParser {
	entries: Mutex<Vec<(String, String, Option<String>)>>,
	unreadable: AtomicBool,
	fail: AtomicBool,
	hold: AtomicBool,
	unbacked: AtomicBool,
	ignore_cancel: AtomicBool,
	parses: AtomicUsize,
	cancels: AtomicUsize,
	scope: CancelScope,
	text: Mutex<Option<Arc<MemoryText>>>,
}

impl MockParser {
	pub(super) fn with(entries: &[(&str, &str)]) -> Arc<Self> {
		let parser = Arc::new(Self::default());
		parser.set(entries);
		parser
	}

	pub(super) fn set(&self, entries: &[(&str, &str)]) {
		*self.entries.lock() = entries
			.iter()
			.map(|(key, value)| (key.to_string(), value.to_string(), None))
			.collect();
	}

	pub(super) fn set_comment(&self, key: &str, comment: &str) {
		for entry in self.entries.lock().iter_mut() {
			if entry.0 == key {
				entry.2 = Some(comment.to_string());
			}
		}
	}

	pub(super) fn set_readable(&self, readable: bool) {
		self.unreadable.store(!readable, Ordering::SeqCst);
	}

	pub(super) fn set_failing(&self, fail: bool) {
		self.fail.store(fail, Ordering::SeqCst);
	}

	pub(super) fn set_hold(&self, hold: bool) {
		self.hold.store(hold, Ordering::SeqCst);
	}

	/// Makes parses produce structures with no bounds and no item spans.
	pub(super) fn set_unbacked(&self, unbacked: bool) {
		self.unbacked.store(unbacked, Ordering::SeqCst);
	}

	pub(super) fn set_ignore_cancel(&self, ignore: bool) {
		self.ignore_cancel.store(ignore, Ordering::SeqCst);
	}

	pub(super) fn parses(&self) -> usize {
		self.parses.load(Ordering::SeqCst)
	}

	pub(super) fn cancels(&self) -> usize {
		self.cancels.load(Ordering::SeqCst)
	}

	/// Text produced by the latest parse.
	pub(super) fn text(&self) -> String {
		self.text.lock().as_ref().map(|text| text.text()).unwrap_or_default()
	}

	/// Makes the text of the latest parse refuse edits.
	pub(super) fn reject_edits(&self) {
		if let Some(text) = self.text.lock().as_ref() {
			text.reject_edits(true);
		}
	}

	/// Spins until `count` parses have started.
	pub(super) fn wait_for_parses(&self, count: usize) {
		while self.parses() < count {
			std::thread::sleep(Duration::from_millis(1));
		}
	}
}

impl StructureParser for MockParser {
	fn is_readable(&self) -> bool {
		!self.unreadable.load(Ordering::SeqCst)
	}

	fn parse(&self) -> Result<Structure, ParseError> {
		let token = self.scope.token();
		let entries = self.entries.lock().clone();
		self.parses.fetch_add(1, Ordering::SeqCst);

		while self.hold.load(Ordering::SeqCst) {
			if token.is_cancelled() && !self.ignore_cancel.load(Ordering::SeqCst) {
				return Err(ParseError::Cancelled);
			}
			std::thread::sleep(Duration::from_millis(1));
		}
		if self.fail.load(Ordering::SeqCst) {
			return Err(ParseError::Io(std::io::Error::other("disk on fire")));
		}

		let items = entries
			.into_iter()
			.map(|(key, value, comment)| Item::new(key, value).with_comment(comment));
		if self.unbacked.load(Ordering::SeqCst) {
			return Ok(Structure::from_items(DOC, items, None));
		}

		let text = MemoryText::new();
		let items: Vec<Item> = items.map(|item| text.push_item(item)).collect();
		let structure = Structure::from_items(DOC, items, Some(text.bounds()));
		*self.text.lock() = Some(text);
		Ok(structure)
	}

	fn cancel(&self) {
		self.cancels.fetch_add(1, Ordering::SeqCst);
		self.scope.cancel();
	}
}

/// [`EventAggregator`] that also records reported parse errors.
#[derive(Default)]
pub(super) struct Recorder {
	events: EventAggregator,
	errors: Mutex<Vec<String>>,
}

impl Recorder {
	pub(super) fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub(super) fn subscribe(&self) -> BundleEventReceiver {
		self.events.subscribe(KindSet::all())
	}

	pub(super) fn errors(&self) -> Vec<String> {
		self.errors.lock().clone()
	}
}

impl Aggregator for Recorder {
	fn bundle_lock(&self) -> &BundleLock {
		self.events.bundle_lock()
	}

	fn notify_item_changed(&self, structure: &Structure, item: &Item) {
		self.events.notify_item_changed(structure, item);
	}

	fn notify_one_file_changed(&self, document: DocumentId) {
		self.events.notify_one_file_changed(document);
	}

	fn notify_one_file_changed_with(&self, document: DocumentId, changes: ChangeSet) {
		self.events.notify_one_file_changed_with(document, changes);
	}

	fn report_parse_error(&self, document: DocumentId, error: &(dyn std::error::Error + 'static)) {
		assert_eq!(document, DOC);
		self.errors.lock().push(error.to_string());
	}
}

pub(super) fn handler(parser: &Arc<MockParser>, recorder: &Arc<Recorder>) -> StructureHandler {
	handler_with(parser, recorder, HandlerConfig::default())
}

pub(super) fn handler_with(parser: &Arc<MockParser>, recorder: &Arc<Recorder>, config: HandlerConfig) -> StructureHandler {
	let _ = tracing_subscriber::fmt::try_init();
	StructureHandler::with_config(
		DOC,
		Arc::clone(parser) as Arc<dyn StructureParser>,
		Arc::clone(recorder) as Arc<dyn Aggregator>,
		WorkerRuntime::new(),
		config,
	)
}

/// Key/value pairs of `structure` in document order.
pub(super) fn pairs(structure: &Structure) -> Vec<(String, String)> {
	structure
		.items()
		.map(|item| (item.key().to_string(), item.value().to_string()))
		.collect()
}

/// Checks that every map key equals the key of the item stored under it.
pub(super) fn assert_keys_consistent(structure: &Structure) {
	for (key, item) in structure.entries() {
		assert_eq!(key, item.key());
	}
}
