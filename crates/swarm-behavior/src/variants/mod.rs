//! The six concrete behavior policies.
//!
//! Each variant is a [`Controller`](crate::Controller) implementation
//! composed from the shared substrate: [`MotionFsm`](crate::MotionFsm),
//! [`ObstacleAvoider`](crate::ObstacleAvoider), and
//! [`MessageSummary`](crate::MessageSummary).  Configuration is a flat
//! struct of named numeric parameters whose defaults match the deployed
//! units, validated at construction.

pub mod aggregation;
pub mod desync;
pub mod firefly;
pub mod optical;
pub mod random_walk;
pub mod relay;

pub use aggregation::{Aggregation, AggregationConfig};
pub use desync::{ElectricDesync, ElectricDesyncConfig};
pub use firefly::{Firefly, FireflyConfig};
pub use optical::{OpticalBeacon, OpticalBeaconConfig};
pub use random_walk::{RandomWalk, RandomWalkConfig};
pub use relay::{SignalRelay, SignalRelayConfig};

use swarm_percept::Color;

// ── Body-light palette ────────────────────────────────────────────────────────
// Advisory only; the colors the physical units show in each mode.

/// Cruising / passive.
pub const BODY_IDLE: Color = Color::rgb(1.0, 1.0, 55.0 / 254.0);
/// Blinking, braking, or actively polarized.
pub const BODY_FIRING: Color = Color::rgb(1.0, 0.0, 0.0);
/// Resting in a cluster.
pub const BODY_RESTING: Color = Color::rgb(55.0 / 255.0, 1.0, 55.0 / 255.0);
/// Duty cycle delayed by a sensed neighbor.
pub const BODY_DELAYED: Color = Color::rgb(0.0, 1.0, 0.0);
