use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::sync::{mpsc, Arc};

use cgmath::prelude::*;
use log::info;
use rand_distr::{Distribution, Normal};
use waypoint_planner::math::{arc_lengths, Point3d};
use waypoint_planner::{Header, Path, PlannerConfig, Pose, TrajectoryPlanner, Waypoint};

/// The simulation time step in s.
const DT: f64 = 0.05; // s

/// The simulated duration in s.
const DURATION: f64 = 180.0; // s

/// Log the vehicle state once per this many steps.
const LOG_STEPS: usize = 20;

/// The duration of each traffic light phase in s.
const GREEN_SEC: f64 = 40.0; // s
const RED_SEC: f64 = 25.0; // s

/// The standard deviation of the localisation noise in m.
const POSE_NOISE: f64 = 0.1; // m

/// The acceleration and braking limits of the simulated vehicle in m/s^2.
const MAX_ACC: f64 = 1.5; // m/s^2
const MAX_BRAKE: f64 = 3.0; // m/s^2

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let track = match std::env::args().nth(1) {
        Some(file) => load_path(&file)?,
        None => oval_track(120.0, 60.0, 600, 11.1),
    };

    let planner = Arc::new(TrajectoryPlanner::new(PlannerConfig {
        closed_loop: true,
        ..Default::default()
    })?);
    planner.load_path(track.clone())?;

    // Perception reports the stop line from its own thread,
    // following a traffic light driven by the simulation clock.
    let stop_line = track.len() / 2;
    let (clock, ticks) = mpsc::channel::<f64>();
    let perception = {
        let planner = planner.clone();
        std::thread::spawn(move || {
            let mut was_red = None;
            for time in ticks {
                let is_red = time % (GREEN_SEC + RED_SEC) >= GREEN_SEC;
                if was_red != Some(is_red) {
                    info!("Light at waypoint {} is {}", stop_line, if is_red { "red" } else { "green" });
                    planner.on_stop_line_update(is_red.then_some(stop_line));
                    was_red = Some(is_red);
                }
            }
        })
    };

    let lengths = arc_lengths(track.waypoints.iter().map(|wp| wp.position));
    let total = lengths.last().copied().unwrap_or(0.0)
        + track.waypoints[track.len() - 1]
            .position
            .distance(track.waypoints[0].position);
    if total <= 0.0 {
        return Err("base path has zero length".into());
    }

    let mut rng = rand::thread_rng();
    let noise = Normal::new(0.0, POSE_NOISE)?;
    let (mut pos, mut vel) = (0.0, 0.0);

    let steps = (DURATION / DT) as usize;
    for step in 0..steps {
        let time = step as f64 * DT;
        clock.send(time)?;

        let actual = position_along(&track.waypoints, &lengths, total, pos);
        let pose = Pose::new(actual.x + noise.sample(&mut rng), actual.y + noise.sample(&mut rng));
        let Some(window) = planner.on_pose_update(&pose) else {
            continue;
        };

        let target = window.waypoints.first().map_or(0.0, Waypoint::speed);
        vel += (target - vel).clamp(-MAX_BRAKE * DT, MAX_ACC * DT);
        vel = f64::max(vel, 0.0);
        pos += vel * DT;

        if step % LOG_STEPS == 0 {
            match window.distance_to_stop() {
                Some(dist) => info!(
                    "t={:5.1}s wp={:4} v={:5.2} m/s target={:5.2} m/s stopping in {:6.1} m",
                    time, window.start, vel, target, dist
                ),
                None => info!(
                    "t={:5.1}s wp={:4} v={:5.2} m/s target={:5.2} m/s",
                    time, window.start, vel, target
                ),
            }
        }
    }

    drop(clock);
    perception.join().map_err(|_| "perception thread panicked")?;
    Ok(())
}

/// Reads a base path from a JSON file.
fn load_path(file: &str) -> Result<Path, Box<dyn Error>> {
    let path = serde_json::from_reader(BufReader::new(File::open(file)?))?;
    Ok(path)
}

/// Generates an elliptical loop of evenly spaced waypoints.
fn oval_track(radius_x: f64, radius_y: f64, count: usize, speed: f64) -> Path {
    let waypoints = (0..count)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / count as f64;
            let position = Point3d::new(radius_x * t.cos(), radius_y * t.sin(), 0.0);
            let yaw = (radius_y * t.cos()).atan2(-radius_x * t.sin());
            Waypoint::new(position, yaw, speed)
        })
        .collect();
    let header = Header {
        frame_id: "world".into(),
        ..Default::default()
    };
    Path::new(header, waypoints)
}

/// Interpolates the position a distance `pos` along a closed loop of waypoints.
fn position_along(waypoints: &[Waypoint], lengths: &[f64], total: f64, pos: f64) -> Point3d {
    let pos = pos.rem_euclid(total);
    let idx = lengths.partition_point(|len| *len <= pos).saturating_sub(1);
    let next = (idx + 1) % waypoints.len();
    let seg_end = if next == 0 { total } else { lengths[next] };
    let seg_len = seg_end - lengths[idx];
    let t = if seg_len > 0.0 { (pos - lengths[idx]) / seg_len } else { 0.0 };
    let (p1, p2) = (waypoints[idx].position, waypoints[next].position);
    p1 + (p2 - p1) * t
}
