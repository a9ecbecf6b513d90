//! `swarm-sim` — lock-step loop for the underwater swarm framework.
//!
//! # Three-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Sense & step — cast rays, hand each controller the mailbox and
//!                    currents delivered at the end of the previous tick,
//!                    run Controller::step (any order; inputs are frozen).
//!   ② Actuate      — sanitize propulsion, stage broadcasts, record
//!                    polarization, integrate differential-drive kinematics.
//!   ③ Deliver      — BroadcastChannel::deliver + ElectricField::induce:
//!                    this tick's output becomes next tick's input; unread
//!                    mail from last tick is discarded.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use swarm_behavior::{RandomWalk, RandomWalkConfig};
//! use swarm_core::SimConfig;
//! use swarm_sim::{CircularTank, NoopObserver, SimBuilder};
//!
//! let controllers = (0..20)
//!     .map(|_| RandomWalk::new(RandomWalkConfig::default()))
//!     .collect::<Result<Vec<_>, _>>()?;
//! let mut sim = SimBuilder::new(config, CircularTank::new(5.0, 0.5), controllers)
//!     .build()?;
//! sim.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod store;
pub mod world;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use store::AgentRngs;
pub use world::{ANGULAR_GAIN, CircularTank, OpenWater, Pose, RayField, integrate, wrap_angle};
