use std::sync::atomic::{AtomicI64, Ordering};

/// The stored representation of "no stop line".
const NO_STOP: i64 = -1;

/// Decodes a stop line index as published by perception,
/// where any negative value means there is no stop line.
pub fn stop_line_from_raw(raw: i32) -> Option<usize> {
    usize::try_from(raw).ok()
}

/// Holds the most recently received stop line index.
///
/// Written by the perception side and read by the planning side, possibly from
/// different threads. Each store replaces the previous value outright and a
/// load always sees a whole value, though it may be one update behind.
#[derive(Debug)]
pub struct StopLineCell {
    value: AtomicI64,
}

impl Default for StopLineCell {
    fn default() -> Self {
        Self::new(None)
    }
}

impl StopLineCell {
    /// Creates a new cell holding the given stop line.
    pub fn new(stop_line: Option<usize>) -> Self {
        Self {
            value: AtomicI64::new(encode(stop_line)),
        }
    }

    /// Replaces the stop line.
    pub fn store(&self, stop_line: Option<usize>) {
        self.value.store(encode(stop_line), Ordering::Release);
    }

    /// Gets the most recently stored stop line.
    pub fn load(&self) -> Option<usize> {
        usize::try_from(self.value.load(Ordering::Acquire)).ok()
    }
}

fn encode(stop_line: Option<usize>) -> i64 {
    match stop_line {
        Some(idx) => i64::try_from(idx).unwrap_or(i64::MAX),
        None => NO_STOP,
    }
}
