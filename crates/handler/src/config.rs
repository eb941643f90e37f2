use std::time::Duration;

/// Delay applied when a pending reparse is triggered again.
pub const DEFAULT_REPARSE_DEBOUNCE: Duration = Duration::from_millis(500);

/// How long a cached structure survives without being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
	/// Never drop.
	Keep,
	/// Drop once no read happened for the given duration.
	DropAfter(Duration),
}

#[derive(Debug, Clone)]
pub struct HandlerConfig {
	/// Debounce window for coalescing reparse triggers.
	pub reparse_debounce: Duration,
	pub retention: RetentionPolicy,
}

impl Default for HandlerConfig {
	fn default() -> Self {
		Self {
			reparse_debounce: DEFAULT_REPARSE_DEBOUNCE,
			retention: RetentionPolicy::Keep,
		}
	}
}

impl HandlerConfig {
	pub fn with_reparse_debounce(mut self, debounce: Duration) -> Self {
		self.reparse_debounce = debounce;
		self
	}

	pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
		self.retention = retention;
		self
	}
}
