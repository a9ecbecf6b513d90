//! Poses, ray casting, and the differential-drive integrator.
//!
//! None of this claims hydrodynamic fidelity.  The integrator and the tank
//! model exist to close the sense-act loop for tests and demos: what they
//! do guarantee is the calibration the controllers' timers are written
//! against — a pivot at speed `s` rotates `3π·s` radians per second, so a
//! `Turn` dwell of `(|angle|/π)/3/s` seconds rotates exactly `angle`.

use std::f32::consts::PI;

use swarm_core::Vec2;
use swarm_percept::{Propulsion, Ray, RayBank};

/// Pivot-rate calibration constant, radians per second at unit wheel speed.
pub const ANGULAR_GAIN: f32 = 3.0 * PI;

// ── Pose ──────────────────────────────────────────────────────────────────────

/// One agent's position and heading in the horizontal plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vec2,
    /// World heading, radians, counter-clockwise from +x.
    pub heading: f32,
}

impl Pose {
    pub fn new(position: Vec2, heading: f32) -> Self {
        Self { position, heading }
    }
}

/// Advance a pose by one timestep of differential drive.
///
/// Linear speed is the propeller mean, angular speed the half-difference
/// scaled by [`ANGULAR_GAIN`].  Heading is wrapped into `(-π, π]`.
pub fn integrate(pose: &mut Pose, prop: Propulsion, timestep: f32) {
    let linear = (prop.left + prop.right) / 2.0;
    let angular = ANGULAR_GAIN * (prop.right - prop.left) / 2.0;

    pose.position += Vec2::from_angle(pose.heading).scaled(linear * timestep);
    pose.heading = wrap_angle(pose.heading + angular * timestep);
}

/// Wrap an angle into `(-π, π]`.
pub fn wrap_angle(a: f32) -> f32 {
    let mut a = a % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

// ── RayField ──────────────────────────────────────────────────────────────────

/// Source of proximity-ray readings — the environment as the rays see it.
pub trait RayField {
    /// Cast all six rays from `pose` and return this step's readings.
    fn cast(&self, pose: &Pose) -> RayBank;
}

/// Unbounded water: no obstacles, every ray reads zero.
pub struct OpenWater;

impl RayField for OpenWater {
    fn cast(&self, _pose: &Pose) -> RayBank {
        RayBank::new()
    }
}

/// A circular tank wall centered on the origin.
///
/// Each ray reads the proximity of the wall along its azimuth, mapped
/// linearly onto `[0, 1]` inside `sensing_range`.  The downward rays carry
/// the same proximity value but never raise a hit flag, standing in for
/// the bottom returns the detection rule excludes.
pub struct CircularTank {
    pub radius: f32,
    pub sensing_range: f32,
}

impl CircularTank {
    pub fn new(radius: f32, sensing_range: f32) -> Self {
        Self { radius, sensing_range }
    }

    /// Distance from `position` to the wall along `direction` (unit vector).
    fn wall_distance(&self, position: Vec2, direction: Vec2) -> f32 {
        // |p + t·d| = R, take the forward root.
        let along = position.x * direction.x + position.y * direction.y;
        let disc = along * along + self.radius * self.radius
            - (position.x * position.x + position.y * position.y);
        if disc < 0.0 {
            // Outside the tank looking away from it.
            return f32::INFINITY;
        }
        (-along + disc.sqrt()).max(0.0)
    }
}

impl RayField for CircularTank {
    fn cast(&self, pose: &Pose) -> RayBank {
        let mut bank = RayBank::new();
        if self.sensing_range <= 0.0 {
            return bank;
        }
        for ray in Ray::ALL {
            let dir = Vec2::from_angle(pose.heading + ray.azimuth());
            let dist = self.wall_distance(pose.position, dir);
            let proximity = (1.0 - dist / self.sensing_range).clamp(0.0, 1.0);
            let hit = dist <= self.sensing_range && !ray.is_downward();
            bank.set(ray, proximity, hit);
        }
        bank
    }
}
