//! `swarm-percept` — the perception/actuation collaborator surface.
//!
//! Controllers in `swarm-behavior` never talk to geometry, physics, or other
//! agents directly; everything arrives through the narrow interfaces defined
//! here and is handed back as actuator state.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`rays`]      | `Ray` identifiers, `RayBank` proximity readings           |
//! | [`message`]   | `Message` — ephemeral broadcast payload                   |
//! | [`channel`]   | `BroadcastChannel` — double-buffered range-limited medium |
//! | [`esense`]    | `ElectricField` — polarization out, induced currents in   |
//! | [`actuation`] | `Propulsion`, `Color`                                     |
//!
//! # Message discipline
//!
//! The channel is shared-write (many senders) / shared-read (many
//! receivers).  Broadcasts staged during tick *t* are materialized into
//! per-receiver mailbox copies by [`BroadcastChannel::deliver`] at the end
//! of *t* and read at *t+1*; the next `deliver` discards whatever a
//! receiver left unread.  No message survives more than one delivery, and
//! no receiver's read can disturb another receiver's copy.

pub mod actuation;
pub mod channel;
pub mod esense;
pub mod message;
pub mod rays;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use actuation::{Color, Propulsion};
pub use channel::{BroadcastChannel, ReceiveMode};
pub use esense::ElectricField;
pub use message::Message;
pub use rays::{Ray, RayBank};
