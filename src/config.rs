use crate::{PlannerError, PlannerResult};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The default number of waypoints in each trajectory window.
pub const DEFAULT_LOOKAHEAD: usize = 200;

/// The default maximum deceleration used to shape a stop, in m/s^2.
pub const DEFAULT_MAX_DECEL: f64 = 1.0; // m/s^2

/// The default number of waypoints to stop short of the stop line,
/// so that the front of the vehicle rather than its centre stops at the line.
pub const DEFAULT_STOP_MARGIN: usize = 2;

/// The default speed below which a braking waypoint is snapped to a standstill, in m/s.
pub const DEFAULT_STOP_SPEED_THRESHOLD: f64 = 1.0; // m/s

/// The parameters of a [TrajectoryPlanner](crate::TrajectoryPlanner).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// The number of waypoints in each trajectory window.
    pub lookahead: usize,
    /// The maximum deceleration used to shape a stop, in m/s^2.
    pub max_decel: f64,
    /// The number of waypoints to stop short of the stop line.
    pub stop_margin: usize,
    /// Braking speeds below this value are replaced with zero, in m/s.
    pub stop_speed_threshold: f64,
    /// Whether the base path is a closed loop.
    ///
    /// Windows on a closed loop wrap around from the last waypoint to the first.
    /// Otherwise they are truncated at the end of the path.
    pub closed_loop: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            max_decel: DEFAULT_MAX_DECEL,
            stop_margin: DEFAULT_STOP_MARGIN,
            stop_speed_threshold: DEFAULT_STOP_SPEED_THRESHOLD,
            closed_loop: false,
        }
    }
}

impl PlannerConfig {
    /// Checks that every parameter is within its valid range.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.lookahead == 0 {
            return Err(PlannerError::InvalidConfig(
                "lookahead must be at least one waypoint".into(),
            ));
        }
        if !self.max_decel.is_finite() || self.max_decel <= 0.0 {
            return Err(PlannerError::InvalidConfig(format!(
                "max_decel must be positive and finite, got {}",
                self.max_decel
            )));
        }
        if !self.stop_speed_threshold.is_finite() || self.stop_speed_threshold < 0.0 {
            return Err(PlannerError::InvalidConfig(format!(
                "stop_speed_threshold must be non-negative and finite, got {}",
                self.stop_speed_threshold
            )));
        }
        Ok(())
    }
}
