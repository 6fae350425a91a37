use super::{Point2d, Point3d};
use cgmath::prelude::*;
use itertools::Itertools;

/// Projects a point onto the ground plane by discarding its elevation.
pub fn planar(point: Point3d) -> Point2d {
    Point2d::new(point.x, point.y)
}

/// Computes the length of the polyline through the given points.
pub fn polyline_length(points: impl IntoIterator<Item = Point3d>) -> f64 {
    points
        .into_iter()
        .tuple_windows()
        .map(|(a, b)| a.distance(b))
        .sum()
}

/// Computes the cumulative length of the polyline at each of its points,
/// starting from zero at the first point.
pub fn arc_lengths(points: impl IntoIterator<Item = Point3d>) -> Vec<f64> {
    let mut points = points.into_iter().peekable();
    if points.peek().is_none() {
        return vec![];
    }
    let lengths = points.tuple_windows().scan(0.0, |len, (a, b): (Point3d, Point3d)| {
        *len += a.distance(b);
        Some(*len)
    });
    std::iter::once(0.0).chain(lengths).collect()
}
