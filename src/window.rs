use crate::util::wrapped_range;
use crate::Waypoint;

/// Copies the forward window of the path beginning at `start`.
///
/// On an open path the window is truncated at the last waypoint, so it may hold
/// fewer than `lookahead` waypoints. On a closed loop it wraps around to the
/// first waypoint and holds `lookahead` waypoints, or the whole loop once if
/// the loop is shorter than that.
///
/// Speeds are copied unmodified.
pub fn select_window(
    waypoints: &[Waypoint],
    start: usize,
    lookahead: usize,
    closed_loop: bool,
) -> Vec<Waypoint> {
    let len = waypoints.len();
    if start >= len {
        return vec![];
    }
    if closed_loop {
        wrapped_range(len, start, usize::min(lookahead, len))
            .map(|idx| waypoints[idx])
            .collect()
    } else {
        let end = usize::min(start.saturating_add(lookahead), len);
        waypoints[start..end].to_vec()
    }
}
