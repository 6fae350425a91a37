//! A local trajectory planner for a vehicle following a static base path.
//!
//! Given the base path, the vehicle's pose and the index of an upcoming stop line,
//! the [TrajectoryPlanner] produces a fixed-length window of the waypoints ahead of
//! the vehicle, with target speeds lowered so that it comes to rest at the stop line.

pub use cgmath;
pub use config::PlannerConfig;
pub use direction::resolve_ahead;
pub use error::{PlannerError, PlannerResult};
pub use planner::{PlannerState, TrajectoryPlanner, TrajectoryWindow};
pub use spatial::SpatialIndex;
pub use stop_line::{stop_line_from_raw, StopLineCell};
pub use velocity::{path_distance, VelocityProfile};
pub use waypoint::{Header, Path, Pose, Waypoint};
pub use window::select_window;

pub mod config;
mod direction;
mod error;
pub mod math;
mod planner;
mod spatial;
mod stop_line;
mod util;
mod velocity;
mod waypoint;
mod window;
