use std::collections::VecDeque;

/// Lines kept by the scrolling text view.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Ring buffer of the most recent event lines, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct EventLog {
	lines: VecDeque<String>,
	capacity: usize,
}

impl Default for EventLog {
	fn default() -> Self {
		Self::new(DEFAULT_LOG_CAPACITY)
	}
}

impl EventLog {
	/// Empty log holding at most `capacity` lines.
	pub fn new(capacity: usize) -> Self {
		Self {
			lines: VecDeque::with_capacity(capacity),
			capacity,
		}
	}

	/// Append a line, dropping the oldest when full.
	pub fn push(&mut self, line: impl Into<String>) {
		if self.capacity == 0 {
			return;
		}
		if self.lines.len() == self.capacity {
			self.lines.pop_front();
		}
		self.lines.push_back(line.into());
	}

	/// Lines, oldest first.
	pub fn lines(&self) -> impl Iterator<Item = &str> {
		self.lines.iter().map(String::as_str)
	}

	/// Number of lines held.
	pub fn len(&self) -> usize {
		self.lines.len()
	}

	/// Whether the log is empty.
	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}
}
