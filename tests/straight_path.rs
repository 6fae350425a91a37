//! Tests that involve planning along a short, straight base path.

use assert_approx_eq::assert_approx_eq;
use waypoint_planner::{Path, PlannerConfig, PlannerState, Pose, TrajectoryPlanner, Waypoint};

fn straight_path(count: usize, speed: f64) -> Path {
    Path::from_waypoints(
        (0..count)
            .map(|i| Waypoint::at(i as f64, 0.0, speed))
            .collect(),
    )
}

fn planner(config: PlannerConfig, path: Path) -> TrajectoryPlanner {
    let planner = TrajectoryPlanner::new(config).unwrap();
    planner.load_path(path).unwrap();
    planner
}

/// Without a stop line, the window is the base path ahead of the vehicle.
#[test]
fn follows_base_speeds_without_stop_line() {
    let planner = planner(
        PlannerConfig {
            lookahead: 5,
            ..Default::default()
        },
        straight_path(5, 10.0),
    );

    let window = planner.on_pose_update(&Pose::new(0.4, 0.0)).unwrap();
    assert_eq!(window.start, 0);
    assert_eq!(window.len(), 5);
    assert!(!window.is_braking());
    assert!(window.speeds().all(|v| v == 10.0));
}

/// Braking for a stop line three waypoints ahead, stopping one waypoint short.
#[test]
fn brakes_for_stop_line() {
    let planner = planner(
        PlannerConfig {
            lookahead: 5,
            stop_margin: 1,
            max_decel: 2.0,
            ..Default::default()
        },
        straight_path(5, 10.0),
    );
    planner.on_stop_line_update(Some(3));

    let window = planner.on_pose_update(&Pose::new(0.0, 0.0)).unwrap();
    assert_eq!(window.start, 0);
    assert_eq!(window.stop_offset, Some(2));
    let speeds = window.speeds().collect::<Vec<_>>();
    assert_approx_eq!(speeds[0], 8f64.sqrt());
    assert_approx_eq!(speeds[1], 2.0);
    assert_eq!(&speeds[2..], &[0.0, 0.0, 0.0]);
}

/// A stop line beyond the end of the window does not change any speed.
#[test]
fn ignores_distant_stop_line() {
    let path = straight_path(500, 10.0);
    let planner = planner(PlannerConfig::default(), path.clone());
    planner.on_stop_line_update(Some(450));

    let window = planner.on_pose_update(&Pose::new(20.0, 0.3)).unwrap();
    assert_eq!(window.start, 20);
    assert!(!window.is_braking());
    assert_eq!(window.waypoints, path.waypoints[20..220].to_vec());
}

/// Moving just past a waypoint selects the one after it.
#[test]
fn advances_past_nearest_waypoint() {
    let planner = planner(
        PlannerConfig {
            lookahead: 3,
            ..Default::default()
        },
        straight_path(10, 5.0),
    );

    assert_eq!(planner.closest_waypoint_ahead(&Pose::new(4.0, 0.0)), Some(4));
    assert_eq!(planner.closest_waypoint_ahead(&Pose::new(4.01, 0.0)), Some(5));
    assert_eq!(planner.closest_waypoint_ahead(&Pose::new(3.99, 0.0)), Some(4));

    let window = planner.on_pose_update(&Pose::new(4.2, -0.5)).unwrap();
    assert_eq!(window.start, 5);
}

/// A pose exactly on a waypoint resolves to that waypoint.
#[test]
fn pose_on_waypoint_resolves_to_it() {
    let path = Path::from_waypoints(
        (0..40)
            .map(|i| {
                let t = 0.1 * i as f64;
                Waypoint::at(20.0 * t, 5.0 * t.sin(), 10.0)
            })
            .collect(),
    );
    let planner = planner(PlannerConfig::default(), path.clone());
    for (idx, wp) in path.waypoints.iter().enumerate() {
        let pose = Pose::new(wp.position.x, wp.position.y);
        assert_eq!(planner.closest_waypoint_ahead(&pose), Some(idx));
    }
}

/// On an open path the window is cut short at the end.
#[test]
fn truncates_at_end_of_open_path() {
    let planner = planner(
        PlannerConfig {
            lookahead: 10,
            ..Default::default()
        },
        straight_path(20, 10.0),
    );

    let window = planner.on_pose_update(&Pose::new(15.0, 0.0)).unwrap();
    assert_eq!(window.start, 15);
    assert_eq!(window.len(), 5);
}

/// The vehicle stops at the line, then resumes when the stop line is cleared.
#[test]
fn stops_and_resumes() {
    let planner = planner(
        PlannerConfig {
            lookahead: 50,
            ..Default::default()
        },
        straight_path(200, 8.0),
    );
    planner.on_stop_line_raw(60);

    let mut pos: f64 = 0.0;
    for _ in 0..2000 {
        let window = planner.on_pose_update(&Pose::new(pos, 0.0)).unwrap();
        pos += 0.05 * window.waypoints[0].speed;
    }
    assert!(pos > 55.0 && pos <= 58.0, "stopped at {}", pos);

    planner.on_stop_line_raw(-1);
    let window = planner.on_pose_update(&Pose::new(pos, 0.0)).unwrap();
    assert!(window.speeds().all(|v| v == 8.0));
    assert_eq!(planner.state(), PlannerState::Active);
}
