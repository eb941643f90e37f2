//! Background task primitives shared by the structure handlers.
//!
//! Everything that leaves the caller's thread goes through this crate so the
//! handlers never reach for a process-wide executor directly: a
//! [`WorkerRuntime`] is injected wherever background work is scheduled.

mod class;
mod debounce;
mod runtime;
mod spawn;
mod token;

pub use class::TaskClass;
pub use debounce::DebounceHandle;
pub use runtime::WorkerRuntime;
pub use spawn::join_error_panic_message;
pub use token::{CancelScope, GenerationClock};
pub use tokio_util::sync::CancellationToken;
