//! Change notifications for keyed document structures.
//!
//! Structure handlers report what changed through the [`Aggregator`] trait.
//! The aggregator owns the [`BundleLock`] shared by every document of one
//! logical resource and turns notifications into [`BundleEvent`]s that
//! subscribers receive through an [`EventBus`].

mod aggregator;
mod bus;
mod event;
mod kind;
mod lock;

pub use aggregator::{Aggregator, EventAggregator};
pub use bus::{BundleEventReceiver, EventBus};
pub use event::BundleEvent;
pub use kind::{ChangeKind, KindSet};
pub use lock::{BundleLock, OrderedGuard};
