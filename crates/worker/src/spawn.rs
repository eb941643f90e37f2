use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinError;

/// Ambient runtime handle, or a lazily built shared runtime outside of tokio.
pub(crate) fn runtime_handle() -> Handle {
	if let Ok(handle) = Handle::try_current() {
		return handle;
	}

	static FALLBACK: OnceLock<Runtime> = OnceLock::new();
	FALLBACK
		.get_or_init(|| {
			Builder::new_multi_thread()
				.enable_all()
				.worker_threads(2)
				.thread_name("propsync-worker")
				.build()
				.expect("failed to build propsync-worker fallback runtime")
		})
		.handle()
		.clone()
}

/// Extracts the panic message carried by a join error.
///
/// Returns `None` when the task was cancelled rather than panicking.
pub fn join_error_panic_message(err: JoinError) -> Option<String> {
	if !err.is_panic() {
		return None;
	}
	let payload = err.into_panic();
	let msg = match payload.downcast::<String>() {
		Ok(msg) => *msg,
		Err(payload) => match payload.downcast_ref::<&'static str>() {
			Some(msg) => (*msg).to_string(),
			None => "non-string panic payload".to_string(),
		},
	};
	Some(msg)
}

#[cfg(test)]
#[path = "panic_tests.rs"]
mod panic_tests;
