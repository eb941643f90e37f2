/// Execution class of a worker task, recorded in trace events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Async bookkeeping that may be delayed or coalesced (debounce waits).
	Background,
	/// Blocking work such as a document parse, run on the blocking pool.
	CpuBlocking,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Background => "background",
			Self::CpuBlocking => "cpu_blocking",
		}
	}
}
