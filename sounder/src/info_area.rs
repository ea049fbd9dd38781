use std::collections::VecDeque;

/// The most recent informational messages, shown at the bottom of the window. Every message is
/// also logged.
pub struct InfoArea {
    lines: VecDeque<String>,
    capacity: usize,
}

impl InfoArea {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn add(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(message);
    }

    /// Oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}
