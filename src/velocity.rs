use crate::math::{arc_lengths, polyline_length};
use crate::{PlannerConfig, Waypoint};

/// Shapes the speeds of a trajectory window so the vehicle comes to rest at a stop line
/// without exceeding a fixed deceleration.
#[derive(Clone, Copy, Debug)]
pub struct VelocityProfile {
    max_decel: f64,
    stop_margin: usize,
    stop_speed: f64,
    closed_loop: bool,
}

impl VelocityProfile {
    /// Creates a new velocity profile.
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            max_decel: config.max_decel,
            stop_margin: config.stop_margin,
            stop_speed: config.stop_speed_threshold,
            closed_loop: config.closed_loop,
        }
    }

    /// Finds the index within a window at which the vehicle should come to rest,
    /// or `None` if the window needs no braking.
    ///
    /// # Parameters
    /// * `start` - The path index of the first waypoint in the window
    /// * `window_len` - The number of waypoints in the window
    /// * `path_len` - The number of waypoints in the whole path
    /// * `stop_line` - The path index of the stop line, if there is one
    pub fn stop_offset(
        &self,
        start: usize,
        window_len: usize,
        path_len: usize,
        stop_line: Option<usize>,
    ) -> Option<usize> {
        let stop_line = stop_line?;
        if window_len == 0 || path_len == 0 {
            return None;
        }
        let stop_line = usize::min(stop_line, path_len - 1);

        // Offset of the stop line from the window start, in waypoints along the path
        let ahead = if stop_line >= start {
            stop_line - start
        } else if self.closed_loop {
            stop_line + path_len - start
        } else {
            0
        };

        if ahead >= window_len {
            None
        } else {
            Some(ahead.saturating_sub(self.stop_margin))
        }
    }

    /// Computes the speed from which the vehicle can come to rest within `dist` m.
    ///
    /// Speeds below the stop threshold are snapped to zero so the vehicle
    /// does not creep up to the line.
    pub fn braking_speed(&self, dist: f64) -> f64 {
        let vel = (2.0 * self.max_decel * f64::max(dist, 0.0)).sqrt();
        if vel < self.stop_speed {
            0.0
        } else {
            vel
        }
    }

    /// Lowers the speed of each waypoint in the window so the vehicle
    /// comes to rest at the waypoint at index `stop_offset`.
    /// No speed is ever raised above its original value.
    pub fn decelerate(&self, window: &mut [Waypoint], stop_offset: usize) {
        let lengths = arc_lengths(window.iter().map(|wp| wp.position));
        let stop_len = match lengths.get(stop_offset) {
            Some(len) => *len,
            None => lengths.last().copied().unwrap_or(0.0),
        };
        for (wp, len) in window.iter_mut().zip(lengths) {
            let vel = self.braking_speed(stop_len - len);
            wp.speed = f64::min(vel, wp.speed);
        }
    }

    /// Applies the profile to a window. The window is left untouched if
    /// there is no stop line or the stop line lies beyond its end.
    ///
    /// Returns the index within the window at which the vehicle will come to rest.
    pub fn apply(
        &self,
        window: &mut [Waypoint],
        start: usize,
        path_len: usize,
        stop_line: Option<usize>,
    ) -> Option<usize> {
        let stop_offset = self.stop_offset(start, window.len(), path_len, stop_line)?;
        self.decelerate(window, stop_offset);
        Some(stop_offset)
    }
}

/// Computes the distance along the waypoints from index `from` to index `to`.
///
/// This is the sum of the lengths of each segment between them rather than the
/// straight line distance. It is zero unless `to` is strictly ahead of `from`,
/// and `to` is clamped to the last waypoint.
pub fn path_distance(waypoints: &[Waypoint], from: usize, to: usize) -> f64 {
    let to = usize::min(to, waypoints.len().saturating_sub(1));
    if to <= from {
        return 0.0;
    }
    polyline_length(waypoints[from..=to].iter().map(|wp| wp.position))
}
