use crate::math::Point2d;
use crate::Waypoint;
use cgmath::prelude::*;

/// Determines the first waypoint ahead of the vehicle, given the waypoint nearest to it.
///
/// The nearest waypoint counts as already passed when the vehicle lies strictly
/// beyond the line through it perpendicular to the segment arriving from the
/// previous waypoint, in which case the next waypoint is returned instead.
/// A vehicle exactly on that line has not yet passed it.
/// Indices wrap at both ends of the path.
pub fn resolve_ahead(waypoints: &[Waypoint], nearest: usize, position: Point2d) -> usize {
    let len = waypoints.len();
    debug_assert!(nearest < len);
    let prev = (nearest + len - 1) % len;

    let target = waypoints[nearest].planar();
    let travel = target - waypoints[prev].planar();
    let offset = position - target;

    if travel.dot(offset) > 0.0 {
        (nearest + 1) % len
    } else {
        nearest
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn straight(n: usize) -> Vec<Waypoint> {
        (0..n).map(|i| Waypoint::at(i as f64, 0.0, 10.0)).collect()
    }

    #[test]
    fn before_nearest_keeps_it() {
        let wps = straight(5);
        assert_eq!(resolve_ahead(&wps, 2, Point2d::new(1.7, 0.3)), 2);
    }

    #[test]
    fn past_nearest_advances() {
        let wps = straight(5);
        assert_eq!(resolve_ahead(&wps, 2, Point2d::new(2.2, -0.4)), 3);
    }

    #[test]
    fn on_the_perpendicular_is_not_passed() {
        let wps = straight(5);
        assert_eq!(resolve_ahead(&wps, 2, Point2d::new(2.0, 0.0)), 2);
        assert_eq!(resolve_ahead(&wps, 2, Point2d::new(2.0, 5.0)), 2);
    }

    #[test]
    fn wraps_at_both_ends() {
        // Closed square, travelling anticlockwise.
        let wps = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]
            .map(|(x, y)| Waypoint::at(x, y, 10.0));
        // Waypoint 0 is reached from waypoint 3, travelling in -y.
        assert_eq!(resolve_ahead(&wps, 0, Point2d::new(0.0, 0.5)), 0);
        assert_eq!(resolve_ahead(&wps, 0, Point2d::new(0.0, -0.5)), 1);
        // Passing the last waypoint leads back to the first.
        assert_eq!(resolve_ahead(&wps, 3, Point2d::new(-0.5, 4.0)), 0);
    }
}
