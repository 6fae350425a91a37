use thiserror::Error;

/// Errors raised while configuring the planner or loading its base path.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlannerError {
    #[error("Base path contains no waypoints")]
    EmptyPath,
    #[error("Waypoint {index} has a non-finite position or speed")]
    NonFiniteWaypoint { index: usize },
    #[error("Waypoint {index} has a negative target speed ({speed})")]
    NegativeSpeed { index: usize, speed: f64 },
    #[error("Base path has already been loaded")]
    AlreadyLoaded,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
