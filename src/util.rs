//! Miscellaneous utility functions.

/// Returns `count` consecutive indices into a sequence of length `len`,
/// beginning at `start` and wrapping back around to zero at the end.
pub fn wrapped_range(len: usize, start: usize, count: usize) -> impl Iterator<Item = usize> {
    debug_assert!(len > 0);
    (0..count).map(move |i| (i + start) % len)
}
