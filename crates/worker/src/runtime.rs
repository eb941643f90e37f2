use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::debounce::DebounceHandle;
use crate::spawn::runtime_handle;
use crate::TaskClass;

/// Injectable entrypoint for background task execution.
///
/// Without an explicit handle, tasks go to the ambient tokio runtime when one
/// is entered and to a shared fallback runtime otherwise.
#[derive(Debug, Clone, Default)]
pub struct WorkerRuntime {
	handle: Option<Handle>,
}

impl WorkerRuntime {
	/// Creates a runtime bound to the ambient tokio context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a runtime pinned to a specific tokio handle.
	pub fn with_handle(handle: Handle) -> Self {
		Self { handle: Some(handle) }
	}

	fn handle(&self) -> Handle {
		self.handle.clone().unwrap_or_else(runtime_handle)
	}

	/// Spawns an async task.
	pub fn spawn<F>(&self, class: TaskClass, fut: F) -> JoinHandle<F::Output>
	where
		F: Future + Send + 'static,
		F::Output: Send + 'static,
	{
		tracing::trace!(worker_class = class.as_str(), "worker.spawn");
		self.handle().spawn(fut)
	}

	/// Spawns blocking work.
	pub fn spawn_blocking<F, R>(&self, class: TaskClass, f: F) -> JoinHandle<R>
	where
		F: FnOnce() -> R + Send + 'static,
		R: Send + 'static,
	{
		tracing::trace!(worker_class = class.as_str(), "worker.spawn_blocking");
		self.handle().spawn_blocking(f)
	}

	/// Schedules `job` on the blocking pool once `delay` has elapsed.
	///
	/// The returned handle is weak: it does not keep the task alive and goes
	/// stale once the job has run without being re-armed.
	pub fn spawn_debounced<F>(&self, class: TaskClass, delay: Duration, job: F) -> DebounceHandle
	where
		F: Fn() + Send + Sync + 'static,
	{
		DebounceHandle::start(self.clone(), class, delay, std::sync::Arc::new(job))
	}
}
