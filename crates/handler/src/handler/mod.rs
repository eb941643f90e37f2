//! Structure lifecycle: lazy parse, debounced reparse and reconciliation.
//!
//! # Reparse scheduling
//!
//! The first trigger after an idle period starts a parse immediately. Every
//! trigger that arrives while that task is still pending re-arms it with the
//! configured debounce, so a burst of edits costs one parse after the burst
//! plus at most one immediate parse at its start. A trigger that lands while the
//! parse is running queues exactly one more run, which always observes the
//! final text.
//!
//! # Staleness
//!
//! [`StructureHandler::stop_parsing`] closes the gate and bumps the handler
//! generation. A parse that finishes afterwards sees either a closed gate or a
//! different generation under the lock and throws its result away.
//!
//! Item edits bump the generation too: a parse in flight during an edit read
//! the text from before it and must not overwrite the edited structure. The
//! edit re-arms a live reparse task so text changes that parse was meant to
//! pick up still get parsed.

mod edits;

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use propsync_events::{Aggregator, OrderedGuard};
use propsync_model::{ChangeSet, DocumentId, Item, Structure, StructureDiff, diff};
use propsync_worker::{DebounceHandle, GenerationClock, TaskClass, WorkerRuntime};
use tokio::time::Instant;

use crate::cache::CacheSlot;
use crate::config::HandlerConfig;
use crate::error::ParseError;
use crate::parser::StructureParser;

/// State guarded by the handler lock.
struct HandlerState {
	slot: CacheSlot,
	/// Last scheduled reparse. Stale once that task finished.
	parse_task: DebounceHandle,
	parsing_allowed: bool,
	generation: u64,
}

struct Shared {
	document: DocumentId,
	parser: Arc<dyn StructureParser>,
	aggregator: Arc<dyn Aggregator>,
	runtime: WorkerRuntime,
	config: HandlerConfig,
	generations: GenerationClock,
	state: Mutex<HandlerState>,
}

/// What a reconciliation or an edit reports to the aggregator.
enum Notice {
	Item(Item),
	File,
	Changes(ChangeSet),
}

/// Owner of one document's cached structure.
///
/// Cloning is cheap; clones share the cache, the gate and the pending parse.
/// Background tasks only hold a weak reference, so dropping the last clone
/// lets a pending reparse finish as a no-op.
#[derive(Clone)]
pub struct StructureHandler {
	shared: Arc<Shared>,
}

impl std::fmt::Debug for StructureHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StructureHandler")
			.field("document", &self.shared.document)
			.field("config", &self.shared.config)
			.finish_non_exhaustive()
	}
}

impl StructureHandler {
	pub fn new(
		document: DocumentId,
		parser: Arc<dyn StructureParser>,
		aggregator: Arc<dyn Aggregator>,
		runtime: WorkerRuntime,
	) -> Self {
		Self::with_config(document, parser, aggregator, runtime, HandlerConfig::default())
	}

	pub fn with_config(
		document: DocumentId,
		parser: Arc<dyn StructureParser>,
		aggregator: Arc<dyn Aggregator>,
		runtime: WorkerRuntime,
		config: HandlerConfig,
	) -> Self {
		let generations = GenerationClock::new();
		let state = HandlerState {
			slot: CacheSlot::new(config.retention),
			parse_task: DebounceHandle::default(),
			parsing_allowed: true,
			generation: generations.next(),
		};
		Self {
			shared: Arc::new(Shared {
				document,
				parser,
				aggregator,
				runtime,
				config,
				generations,
				state: Mutex::new(state),
			}),
		}
	}

	pub fn document(&self) -> DocumentId {
		self.shared.document
	}

	/// Returns the cached structure, parsing synchronously on a miss.
	///
	/// A miss never notifies: nobody can have observed a previous structure.
	/// Returns `None` while parsing is stopped, the document is unreadable or
	/// its parse failed.
	pub fn get_structure(&self) -> Option<Arc<Structure>> {
		{
			let mut state = self.shared.state.lock();
			state.slot.mark_warmed();
			if let Some(structure) = state.slot.get() {
				return Some(structure);
			}
		}
		self.reparse_now_blocking(false)
	}

	/// Returns a copy of the item stored under `key`.
	pub fn get_item(&self, key: &str) -> Option<Item> {
		self.get_structure()?.get_item(key).cloned()
	}

	/// Requests a background reparse after the document text changed.
	///
	/// Does nothing until the structure was read once, or while parsing is
	/// stopped.
	pub fn schedule_reparse(&self) {
		let shared = &self.shared;
		let mut state = shared.state.lock();
		if !state.slot.is_warmed() {
			tracing::trace!(document = %shared.document, "structure.reparse_skipped_cold");
			return;
		}
		if !state.parsing_allowed {
			tracing::trace!(document = %shared.document, "structure.reparse_skipped_stopped");
			return;
		}
		if state.parse_task.rearm(shared.config.reparse_debounce) {
			tracing::trace!(
				document = %shared.document,
				debounce_ms = shared.config.reparse_debounce.as_millis() as u64,
				"structure.reparse_rearmed"
			);
			return;
		}

		let weak: Weak<Shared> = Arc::downgrade(shared);
		state.parse_task = shared
			.runtime
			.spawn_debounced(TaskClass::Background, Duration::ZERO, move || {
				if let Some(shared) = weak.upgrade() {
					StructureHandler { shared }.reparse_now_blocking(true);
				}
			});
		tracing::trace!(document = %shared.document, "structure.reparse_scheduled");
	}

	/// Closes the parsing gate and cancels an in-flight parse.
	///
	/// Pending and future reparses are no-ops until [`Self::allow_parsing`].
	pub fn stop_parsing(&self) {
		{
			let mut state = self.shared.state.lock();
			state.parsing_allowed = false;
			state.generation = self.shared.generations.next();
		}
		self.shared.parser.cancel();
		tracing::debug!(document = %self.shared.document, "structure.parsing_stopped");
	}

	pub fn allow_parsing(&self) {
		self.shared.state.lock().parsing_allowed = true;
		tracing::debug!(document = %self.shared.document, "structure.parsing_allowed");
	}

	pub fn is_parsing_allowed(&self) -> bool {
		self.shared.state.lock().parsing_allowed
	}

	/// Returns true while a scheduled reparse is waiting or running.
	pub fn has_pending_parse(&self) -> bool {
		self.shared.state.lock().parse_task.is_live()
	}

	/// Returns true if a structure is cached, without parsing.
	pub fn has_structure(&self) -> bool {
		self.shared.state.lock().slot.is_filled()
	}

	/// Drops the cached structure; the next read parses again.
	pub fn evict_cache(&self) -> bool {
		let evicted = self.shared.state.lock().slot.evict();
		if evicted {
			tracing::debug!(document = %self.shared.document, "structure.cache_evicted");
		}
		evicted
	}

	/// Parses the document now and reconciles the result with the cache.
	///
	/// With an empty cache the result is adopted as is, and `fire` decides
	/// whether listeners hear about it. With a cached structure the two are
	/// diffed, the diff is reported and the cached structure is updated in
	/// place. Returns the structure now cached, or `None` when nothing was
	/// parsed.
	pub fn reparse_now_blocking(&self, fire: bool) -> Option<Arc<Structure>> {
		let shared = &self.shared;
		let document = shared.document;
		let generation = {
			let state = shared.state.lock();
			if !state.parsing_allowed {
				tracing::trace!(%document, "structure.reparse_skipped_stopped");
				return None;
			}
			state.generation
		};

		if !shared.parser.is_readable() {
			tracing::debug!(%document, "structure.unreadable");
			return None;
		}

		let started = Instant::now();
		let fresh = match shared.parser.parse() {
			Ok(fresh) => fresh,
			Err(ParseError::Cancelled) => {
				tracing::debug!(%document, "structure.parse_cancelled");
				return None;
			}
			Err(error) => {
				tracing::warn!(%document, %error, "structure.parse_failed");
				shared.aggregator.report_parse_error(document, &error);
				return None;
			}
		};
		let elapsed = started.elapsed();

		let mut state = shared.aggregator.bundle_lock().lock_with(&shared.state);
		if !state.parsing_allowed || state.generation != generation {
			tracing::debug!(%document, generation, current = state.generation, "structure.reparse_discarded");
			return None;
		}

		let Some(mut current) = state.slot.take() else {
			let structure = Arc::new(fresh);
			state.slot.store(Arc::clone(&structure));
			tracing::debug!(
				%document,
				keys = structure.key_count(),
				elapsed_ms = elapsed.as_millis() as u64,
				fire,
				"structure.reparse_adopted"
			);
			if fire {
				self.emit(&state, &structure, Notice::File);
			}
			return Some(structure);
		};

		let outcome = diff(&current, &fresh);
		Arc::make_mut(&mut current).update(fresh);
		state.slot.store(Arc::clone(&current));
		tracing::debug!(
			%document,
			keys = current.key_count(),
			structural = outcome.is_structural(),
			elapsed_ms = elapsed.as_millis() as u64,
			"structure.reparse"
		);

		match outcome {
			StructureDiff::ItemsOnly { changed } => {
				for item in changed {
					self.emit(&state, &current, Notice::Item(item));
				}
			}
			StructureDiff::Structural(changes) => self.emit(&state, &current, Notice::Changes(changes)),
		}
		Some(current)
	}

	/// Reports `notice` to the aggregator. Callers prove they hold both locks
	/// by passing the ordered guard.
	fn emit(&self, _locked: &OrderedGuard<'_, HandlerState>, structure: &Structure, notice: Notice) {
		let aggregator = &self.shared.aggregator;
		match notice {
			Notice::Item(item) => aggregator.notify_item_changed(structure, &item),
			Notice::File => aggregator.notify_one_file_changed(self.shared.document),
			Notice::Changes(changes) => aggregator.notify_one_file_changed_with(self.shared.document, changes),
		}
	}
}

#[cfg(test)]
mod tests;
