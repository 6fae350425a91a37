use crate::math::Point2d;
use crate::Waypoint;
use rstar::primitives::GeomWithData;
use rstar::RTree;

/// A planar point tagged with the index of the waypoint it came from.
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// A nearest-neighbour index over the planar positions of a set of waypoints.
///
/// Built once by bulk loading an R*-tree and never modified afterwards.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Builds an index over the given points, identified by their order.
    pub fn new(points: impl IntoIterator<Item = Point2d>) -> Self {
        let entries = points
            .into_iter()
            .enumerate()
            .map(|(idx, p)| GeomWithData::new([p.x, p.y], idx))
            .collect::<Vec<_>>();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Builds an index over the planar positions of the given waypoints.
    pub fn from_waypoints(waypoints: &[Waypoint]) -> Self {
        Self::new(waypoints.iter().map(Waypoint::planar))
    }

    /// The number of indexed points.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index contains no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the index of the stored point closest to `point`.
    ///
    /// When several points are equally close the lowest index wins.
    /// Returns `None` only if the index is empty.
    pub fn nearest(&self, point: Point2d) -> Option<usize> {
        let query = [point.x, point.y];
        let mut candidates = self.tree.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best) = candidates.next()?;
        let nearest = candidates
            .take_while(|(_, dist2)| *dist2 <= best)
            .map(|(entry, _)| entry.data)
            .fold(first.data, usize::min);
        Some(nearest)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use cgmath::MetricSpace;
    use rand::{Rng, SeedableRng};

    #[test]
    fn empty_index() {
        let index = SpatialIndex::new(std::iter::empty());
        assert!(index.is_empty());
        assert_eq!(index.nearest(Point2d::new(0.0, 0.0)), None);
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let index = SpatialIndex::new([
            Point2d::new(5.0, 5.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(-1.0, 0.0),
            Point2d::new(1.0, 0.0),
        ]);
        assert_eq!(index.nearest(Point2d::new(0.0, 0.0)), Some(1));
        assert_eq!(index.nearest(Point2d::new(1.2, 0.0)), Some(1));
        assert_eq!(index.nearest(Point2d::new(-0.9, 0.1)), Some(2));
    }

    #[test]
    fn matches_linear_scan() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Nearest neighbours live nearby..");
        let points = (0..500)
            .map(|_| Point2d::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)))
            .collect::<Vec<_>>();
        let index = SpatialIndex::new(points.iter().copied());
        assert_eq!(index.len(), 500);

        for _ in 0..200 {
            let query = Point2d::new(rng.gen_range(-120.0..120.0), rng.gen_range(-120.0..120.0));
            let expected = points
                .iter()
                .enumerate()
                .min_by(|a, b| {
                    let da = a.1.distance2(query);
                    let db = b.1.distance2(query);
                    da.partial_cmp(&db).unwrap().then(a.0.cmp(&b.0))
                })
                .map(|(idx, _)| idx);
            assert_eq!(index.nearest(query), expected);
        }
    }
}
