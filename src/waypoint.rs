use crate::math::{planar, Point2d, Point3d};
use crate::{PlannerError, PlannerResult};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A sample point along the base path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    /// The world space position of the waypoint in m.
    pub position: Point3d,
    /// The heading of the path at this waypoint in radians.
    /// Passed through to the output unchanged.
    pub yaw: f64,
    /// The target speed at this waypoint in m/s.
    pub speed: f64,
}

impl Waypoint {
    /// Creates a new waypoint.
    pub fn new(position: Point3d, yaw: f64, speed: f64) -> Self {
        Self {
            position,
            yaw,
            speed,
        }
    }

    /// Creates a waypoint on the ground plane with no heading.
    pub fn at(x: f64, y: f64, speed: f64) -> Self {
        Self::new(Point3d::new(x, y, 0.0), 0.0, speed)
    }

    /// The position of the waypoint projected onto the ground plane.
    pub fn planar(&self) -> Point2d {
        planar(self.position)
    }

    /// The target speed at this waypoint in m/s.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Returns a copy of this waypoint with a different target speed.
    pub fn with_speed(self, speed: f64) -> Self {
        Self { speed, ..self }
    }
}

/// Identifies the coordinate frame and origin time of a path.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    /// The sequence number of the message the path was delivered in.
    pub seq: u32,
    /// The timestamp of the path in s.
    pub stamp: f64,
    /// The name of the coordinate frame the positions are expressed in.
    pub frame_id: String,
}

/// The static base path the vehicle follows.
///
/// Waypoints are identified by their index. Indices wrap modulo the
/// path length when searching for the waypoint ahead of the vehicle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    /// The frame context the path was delivered with.
    #[cfg_attr(feature = "serde", serde(default))]
    pub header: Header,
    /// The waypoints in order of travel.
    pub waypoints: Vec<Waypoint>,
}

impl Path {
    /// Creates a new path.
    pub fn new(header: Header, waypoints: Vec<Waypoint>) -> Self {
        Self { header, waypoints }
    }

    /// Creates a path with a default header.
    pub fn from_waypoints(waypoints: Vec<Waypoint>) -> Self {
        Self::new(Header::default(), waypoints)
    }

    /// The number of waypoints in the path.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the path has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Gets the waypoint at the given index.
    pub fn get(&self, idx: usize) -> Option<&Waypoint> {
        self.waypoints.get(idx)
    }

    /// Sets the target speed of a waypoint.
    /// Returns `false` if there is no waypoint at that index.
    pub fn set_speed(&mut self, idx: usize, speed: f64) -> bool {
        match self.waypoints.get_mut(idx) {
            Some(wp) => {
                wp.speed = speed;
                true
            }
            None => false,
        }
    }

    /// Checks that the path can be planned over: it must be non-empty,
    /// and every waypoint must have a finite position and a finite,
    /// non-negative speed.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.is_empty() {
            return Err(PlannerError::EmptyPath);
        }
        for (index, wp) in self.waypoints.iter().enumerate() {
            let p = wp.position;
            if ![p.x, p.y, p.z, wp.speed].iter().all(|v| v.is_finite()) {
                return Err(PlannerError::NonFiniteWaypoint { index });
            }
            if wp.speed < 0.0 {
                return Err(PlannerError::NegativeSpeed {
                    index,
                    speed: wp.speed,
                });
            }
        }
        Ok(())
    }
}

/// The vehicle's current pose.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// The world space position of the vehicle in m.
    pub position: Point3d,
    /// The heading of the vehicle in radians.
    pub yaw: f64,
}

impl Pose {
    /// Creates a pose on the ground plane with no heading.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point3d::new(x, y, 0.0),
            yaw: 0.0,
        }
    }

    /// Returns a copy of this pose with the given heading.
    pub fn with_yaw(self, yaw: f64) -> Self {
        Self { yaw, ..self }
    }

    /// The position of the vehicle projected onto the ground plane.
    pub fn planar(&self) -> Point2d {
        planar(self.position)
    }

    /// Whether the position of the pose is finite.
    pub fn is_finite(&self) -> bool {
        let p = self.position;
        p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
    }
}
