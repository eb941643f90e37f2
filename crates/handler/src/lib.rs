//! Structure lifecycle for one key/value/comment document.
//!
//! [`StructureHandler`] owns the cached [`Structure`](propsync_model::Structure)
//! of a document. It parses lazily on first read, reparses in the background
//! after edits (debounced), diffs every fresh parse against the cache and
//! reports what changed to the document's
//! [`Aggregator`](propsync_events::Aggregator).
//!
//! # Locking
//!
//! Any path that replaces or edits the cached structure holds the aggregator's
//! [`BundleLock`](propsync_events::BundleLock) first and the handler's own lock
//! second, and emits its notifications before releasing either. Parsing itself
//! runs with no lock held.

mod cache;
mod config;
mod error;
mod handler;
mod parser;

pub use config::{DEFAULT_REPARSE_DEBOUNCE, HandlerConfig, RetentionPolicy};
pub use error::{EditError, ParseError, Result};
pub use handler::StructureHandler;
pub use parser::StructureParser;
