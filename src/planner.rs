use crate::direction::resolve_ahead;
use crate::spatial::SpatialIndex;
use crate::stop_line::{stop_line_from_raw, StopLineCell};
use crate::velocity::{path_distance, VelocityProfile};
use crate::window::select_window;
use crate::{Header, Path, PlannerConfig, PlannerError, PlannerResult, Pose, Waypoint};
use log::{debug, info, trace, warn};
use once_cell::sync::OnceCell;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// The lifecycle state of a [TrajectoryPlanner].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlannerState {
    /// No base path has been loaded.
    Uninitialized,
    /// The base path is loaded, but no pose has been received.
    Idle,
    /// A trajectory has been produced for at least one pose.
    Active,
}

/// The forward section of the base path produced for a single pose.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectoryWindow {
    /// The frame context of the base path.
    pub header: Header,
    /// The path index of the first waypoint in the window.
    pub start: usize,
    /// The waypoints, in order of travel, with their shaped target speeds.
    pub waypoints: Vec<Waypoint>,
    /// The index within the window at which the vehicle will come to rest,
    /// if it is braking for a stop line.
    pub stop_offset: Option<usize>,
}

impl TrajectoryWindow {
    /// The number of waypoints in the window.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the window has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Whether the speeds have been shaped to stop at a stop line.
    pub fn is_braking(&self) -> bool {
        self.stop_offset.is_some()
    }

    /// The distance along the window from its first waypoint to where
    /// the vehicle will come to rest, in m.
    pub fn distance_to_stop(&self) -> Option<f64> {
        self.stop_offset
            .map(|offset| path_distance(&self.waypoints, 0, offset))
    }

    /// The target speeds of the waypoints, in order.
    pub fn speeds(&self) -> impl Iterator<Item = f64> + '_ {
        self.waypoints.iter().map(Waypoint::speed)
    }
}

/// The base path together with its spatial index.
struct LoadedPath {
    path: Path,
    index: SpatialIndex,
}

/// Produces speed-shaped trajectory windows along a static base path.
///
/// The planner reacts to three independent event streams: a one-off delivery of
/// the base path, the vehicle's pose, and the stop line index from perception.
/// Every method takes `&self`, so a planner can be shared between the threads
/// delivering those events. A trajectory is only produced in response to a pose.
pub struct TrajectoryPlanner {
    /// The planner parameters.
    config: PlannerConfig,
    /// The speed shaping model.
    profile: VelocityProfile,
    /// The base path, set at most once.
    loaded: OnceCell<LoadedPath>,
    /// The latest stop line index.
    stop_line: StopLineCell,
    /// Whether a trajectory has been produced.
    active: AtomicBool,
}

impl TrajectoryPlanner {
    /// Creates a new planner with no base path.
    pub fn new(config: PlannerConfig) -> PlannerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            profile: VelocityProfile::new(&config),
            loaded: OnceCell::new(),
            stop_line: StopLineCell::default(),
            active: AtomicBool::new(false),
        })
    }

    /// The planner parameters.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// The current lifecycle state.
    pub fn state(&self) -> PlannerState {
        if self.loaded.get().is_none() {
            PlannerState::Uninitialized
        } else if !self.active.load(Ordering::Acquire) {
            PlannerState::Idle
        } else {
            PlannerState::Active
        }
    }

    /// The base path, if one has been loaded.
    pub fn path(&self) -> Option<&Path> {
        self.loaded.get().map(|loaded| &loaded.path)
    }

    /// The most recently received stop line index.
    pub fn stop_line(&self) -> Option<usize> {
        self.stop_line.load()
    }

    /// Loads the base path and builds its spatial index.
    ///
    /// The base path is fixed for the lifetime of the planner, so this only
    /// succeeds once. Later deliveries are rejected and leave the original
    /// path in place, as are paths that fail [Path::validate].
    pub fn load_path(&self, path: Path) -> PlannerResult<()> {
        path.validate()?;
        if self.loaded.get().is_some() {
            warn!("Ignoring base path redelivery ({} waypoints)", path.len());
            return Err(PlannerError::AlreadyLoaded);
        }

        let index = SpatialIndex::from_waypoints(&path.waypoints);
        let (len, frame) = (path.len(), path.header.frame_id.clone());

        // Another thread may have won the race since the check above
        if self.loaded.set(LoadedPath { path, index }).is_err() {
            warn!("Ignoring base path redelivery ({} waypoints)", len);
            return Err(PlannerError::AlreadyLoaded);
        }

        info!("Base path loaded: {} waypoints in frame {:?}", len, frame);
        Ok(())
    }

    /// Finds the index of the first waypoint ahead of the given pose.
    /// Returns `None` if no base path has been loaded.
    pub fn closest_waypoint_ahead(&self, pose: &Pose) -> Option<usize> {
        let loaded = self.loaded.get()?;
        let position = pose.planar();
        let nearest = loaded.index.nearest(position)?;
        Some(resolve_ahead(&loaded.path.waypoints, nearest, position))
    }

    /// Produces the trajectory window for a new vehicle pose.
    ///
    /// Returns `None` if the base path has not been loaded yet,
    /// or if the pose is not finite.
    pub fn on_pose_update(&self, pose: &Pose) -> Option<TrajectoryWindow> {
        let Some(loaded) = self.loaded.get() else {
            debug!("Pose received before base path; no trajectory produced");
            return None;
        };
        if !pose.is_finite() {
            warn!("Dropping non-finite pose {:?}", pose.position);
            return None;
        }

        let path = &loaded.path;
        let start = self.closest_waypoint_ahead(pose)?;
        let mut waypoints = select_window(
            &path.waypoints,
            start,
            self.config.lookahead,
            self.config.closed_loop,
        );

        let stop_line = self.stop_line.load();
        let stop_offset = self
            .profile
            .apply(&mut waypoints, start, path.len(), stop_line);
        match (stop_line, stop_offset) {
            (Some(line), Some(offset)) => debug!(
                "Waypoint {}: braking for stop line {} (rest at window index {})",
                start, line, offset
            ),
            _ => debug!("Waypoint {}: following base waypoints", start),
        }

        self.active.store(true, Ordering::Release);
        Some(TrajectoryWindow {
            header: path.header.clone(),
            start,
            waypoints,
            stop_offset,
        })
    }

    /// Replaces the stop line index. Takes effect from the next pose update.
    pub fn on_stop_line_update(&self, stop_line: Option<usize>) {
        if let (Some(idx), Some(path)) = (stop_line, self.path()) {
            if idx >= path.len() {
                warn!(
                    "Stop line {} is beyond the base path ({} waypoints); it will be clamped",
                    idx,
                    path.len()
                );
            }
        }
        self.stop_line.store(stop_line);
    }

    /// Replaces the stop line index, given in its published form where
    /// any negative value means there is no stop line.
    pub fn on_stop_line_raw(&self, raw: i32) {
        self.on_stop_line_update(stop_line_from_raw(raw));
    }

    /// Receives an obstacle. Obstacles do not currently affect the trajectory.
    pub fn on_obstacle_update(&self, obstacle: &Waypoint) {
        trace!("Ignoring obstacle at {:?}", obstacle.position);
    }
}
