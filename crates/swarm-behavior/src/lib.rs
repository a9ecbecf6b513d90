//! `swarm-behavior` — per-agent reactive behavior controllers.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`controller`] | `Controller` trait, `Senses` (inputs), `Actuators` (outputs) |
//! | [`aggregate`]  | `MessageSummary` — per-step inbox reduction                  |
//! | [`avoidance`]  | `ObstacleAvoider` — reactive six-ray avoidance law           |
//! | [`fsm`]        | `Phase`, `DwellTimer`, `MotionFsm` — shared FSM substrate    |
//! | [`variants`]   | The six concrete behavior policies                           |
//! | [`error`]      | `BehaviorError`, `BehaviorResult<T>`                         |
//!
//! # Design notes
//!
//! Every behavior is one [`Controller`] implementation composed from the
//! same three primitives — dwell-timer state machine, six-ray avoidance,
//! inbox aggregation — rather than a separate compiled experiment.  A
//! controller runs exactly once per global tick, owns all of its state and
//! timers, and draws every stochastic decision from the per-agent
//! [`AgentRng`](swarm_core::AgentRng) handed to it, so a fixed seed replays
//! a run bit-for-bit.
//!
//! The inbox arrives by value and is dropped at the end of the step:
//! a variant that ignores its messages still leaves an empty mailbox, so
//! stale broadcasts can never leak between behaviors or steps.

pub mod aggregate;
pub mod avoidance;
pub mod controller;
pub mod error;
pub mod fsm;
pub mod variants;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use aggregate::{MessageSummary, steer_toward_bearing};
pub use avoidance::ObstacleAvoider;
pub use controller::{Actuators, Controller, Senses};
pub use error::{BehaviorError, BehaviorResult};
pub use fsm::{DwellTimer, MotionFsm, Phase};
pub use variants::{
    Aggregation, AggregationConfig, ElectricDesync, ElectricDesyncConfig, Firefly, FireflyConfig,
    OpticalBeacon, OpticalBeaconConfig, RandomWalk, RandomWalkConfig, SignalRelay,
    SignalRelayConfig,
};
