//! `swarm-core` — foundational types for the underwater swarm framework.
//!
//! This crate is a dependency of every other `swarm-*` crate.  It
//! intentionally has no `swarm-*` dependencies and minimal external ones
//! (only `rand` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                               |
//! |-----------|--------------------------------------------------------|
//! | [`ids`]   | `AgentId`                                              |
//! | [`vec2`]  | `Vec2` — planar bearing/position vector                |
//! | [`time`]  | `Tick`, `SimClock`, `SimConfig`                        |
//! | [`rng`]   | `AgentRng` (per-agent), `SimRng` (global)              |
//! | [`error`] | `SwarmError`, `SwarmResult`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;
pub mod vec2;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{SwarmError, SwarmResult};
pub use ids::AgentId;
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
pub use vec2::Vec2;
