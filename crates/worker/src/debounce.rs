//! Re-armable delayed tasks.
//!
//! A debounced task waits for its deadline, runs its job once on the blocking
//! pool and then finishes. Re-arming while it waits pushes the deadline out;
//! re-arming while the job runs queues exactly one more run after the new
//! deadline. Bursts of triggers therefore collapse into a single run that
//! observes the state at the time it actually executes.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::runtime::WorkerRuntime;
use crate::spawn::join_error_panic_message;
use crate::TaskClass;

pub(crate) type DebouncedJob = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Waiting { deadline: Instant },
	/// `rerun_at` is set when the task was re-armed while the job executed.
	Running { rerun_at: Option<Instant> },
	Finished,
}

struct Shared {
	phase: Mutex<Phase>,
	rearmed: Notify,
}

/// Weak handle to a debounced task.
///
/// The task itself holds the only strong reference, so a handle goes stale as
/// soon as the task finishes (or is dropped with its runtime). A stale handle
/// can not be re-armed; callers start a fresh task instead.
#[derive(Debug, Clone, Default)]
pub struct DebounceHandle {
	shared: Weak<Shared>,
}

impl DebounceHandle {
	pub(crate) fn start(runtime: WorkerRuntime, class: TaskClass, delay: Duration, job: DebouncedJob) -> Self {
		let shared = Arc::new(Shared {
			phase: Mutex::new(Phase::Waiting {
				deadline: Instant::now() + delay,
			}),
			rearmed: Notify::new(),
		});
		let handle = Self {
			shared: Arc::downgrade(&shared),
		};
		let task_runtime = runtime.clone();
		runtime.spawn(class, run(task_runtime, shared, job));
		handle
	}

	/// Moves the next run to `delay` from now.
	///
	/// Returns `false` when the handle is stale and nothing was re-armed.
	pub fn rearm(&self, delay: Duration) -> bool {
		let Some(shared) = self.shared.upgrade() else {
			return false;
		};
		let deadline = Instant::now() + delay;
		{
			let mut phase = shared.phase.lock();
			match &mut *phase {
				Phase::Waiting { deadline: pending } => *pending = deadline,
				Phase::Running { rerun_at } => *rerun_at = Some(deadline),
				Phase::Finished => return false,
			}
		}
		tracing::trace!(?delay, "worker.debounce.rearm");
		shared.rearmed.notify_one();
		true
	}

	/// Returns true while the task is waiting or running.
	pub fn is_live(&self) -> bool {
		self.shared
			.upgrade()
			.is_some_and(|shared| *shared.phase.lock() != Phase::Finished)
	}

	/// Returns true while the job is executing.
	pub fn is_running(&self) -> bool {
		self.shared
			.upgrade()
			.is_some_and(|shared| matches!(*shared.phase.lock(), Phase::Running { .. }))
	}
}

async fn run(runtime: WorkerRuntime, shared: Arc<Shared>, job: DebouncedJob) {
	loop {
		let wait_until = {
			let mut phase = shared.phase.lock();
			match *phase {
				Phase::Waiting { deadline } if Instant::now() < deadline => Some(deadline),
				Phase::Waiting { .. } => {
					*phase = Phase::Running { rerun_at: None };
					None
				}
				Phase::Running { .. } | Phase::Finished => return,
			}
		};

		if let Some(deadline) = wait_until {
			tokio::select! {
				_ = tokio::time::sleep_until(deadline) => {}
				_ = shared.rearmed.notified() => {}
			}
			continue;
		}

		let job = Arc::clone(&job);
		if let Err(err) = runtime.spawn_blocking(TaskClass::CpuBlocking, move || job()).await
			&& let Some(msg) = join_error_panic_message(err)
		{
			tracing::error!(panic = %msg, "worker.debounce.job_panicked");
		}

		let mut phase = shared.phase.lock();
		match *phase {
			Phase::Running { rerun_at: Some(deadline) } => *phase = Phase::Waiting { deadline },
			_ => {
				*phase = Phase::Finished;
				return;
			}
		}
	}
}
