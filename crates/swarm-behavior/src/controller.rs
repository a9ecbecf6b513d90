//! The `Controller` trait — the main extension point for behavior code.

use swarm_core::AgentRng;
use swarm_percept::{Color, Message, Propulsion, RayBank};

// ── Senses ────────────────────────────────────────────────────────────────────

/// Everything one agent perceives during one step.
///
/// Built fresh by the stepping authority each tick.  `messages` is the
/// agent's entire mailbox, handed over by value: whatever the controller
/// does not [`take_messages`](Senses::take_messages) is dropped when the
/// step ends, which is what guarantees the mailbox is empty afterwards
/// whether or not the variant looked at it.
pub struct Senses<'a> {
    /// Continuous simulation time, seconds.
    pub now: f32,
    /// Seconds covered by this step.
    pub timestep: f32,
    /// Proximity readings, already sanitized at the `RayBank` boundary.
    pub rays: &'a RayBank,
    /// All broadcasts delivered to this agent for this step.
    pub messages: Vec<Message>,
    /// Induced electric-sense currents, one per electrode.  Empty for units
    /// without an electrode array.
    pub currents: &'a [f32],
}

impl<'a> Senses<'a> {
    /// Build the step inputs, clamping malformed clock values at the
    /// boundary: a negative or non-finite time/timestep becomes zero rather
    /// than flowing into timer arithmetic.
    pub fn new(
        now: f32,
        timestep: f32,
        rays: &'a RayBank,
        messages: Vec<Message>,
        currents: &'a [f32],
    ) -> Self {
        let clamp = |v: f32| if v.is_finite() && v >= 0.0 { v } else { 0.0 };
        Self {
            now: clamp(now),
            timestep: clamp(timestep),
            rays,
            messages,
            currents,
        }
    }

    /// Consume the inbox.  Subsequent calls return an empty `Vec`.
    #[inline]
    pub fn take_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }
}

// ── Actuators ─────────────────────────────────────────────────────────────────

/// One agent's actuator state.
///
/// Persisted across steps by the stepping authority because the devices
/// latch: a propeller holds its last commanded speed until overwritten.
/// Only `broadcast` is one-shot; [`begin_step`](Actuators::begin_step)
/// clears it before every controller call.
#[derive(Clone, Debug)]
pub struct Actuators {
    /// Differential-drive command.  Latched.
    pub propulsion: Propulsion,
    /// Advisory display color.  Latched.
    pub color: Color,
    /// Electrode polarization.  Latched; empty for units without an array.
    pub polarization: Vec<f32>,
    /// Request one broadcast this step.  Cleared before every step.
    pub broadcast: bool,
}

impl Actuators {
    pub fn new(electrodes: usize) -> Self {
        Self {
            propulsion: Propulsion::STOP,
            color: Color::default(),
            polarization: vec![0.0; electrodes],
            broadcast: false,
        }
    }

    /// Clear the one-shot fields.  Called by the stepping authority at the
    /// top of every tick, before the controller runs.
    #[inline]
    pub fn begin_step(&mut self) {
        self.broadcast = false;
    }

    /// Zero the whole polarization vector.
    #[inline]
    pub fn depolarize(&mut self) {
        self.polarization.fill(0.0);
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Pluggable per-agent behavior.
///
/// One instance per physical unit; the stepping authority calls
/// [`step`](Controller::step) exactly once per global tick, synchronously.
/// A controller owns all of its state and timers — nothing is shared
/// between agents except the broadcast medium, which it only touches
/// through `Senses`/`Actuators`.
///
/// # Contract
///
/// - `step` must leave `act.propulsion` defined every tick (the latched
///   previous value counts as defined).
/// - All randomness must come from the supplied [`AgentRng`] so runs are
///   reproducible from the seed alone.
/// - No blocking, no suspension: every transition triggered within a step
///   is evaluated to completion within that step.
pub trait Controller: Send + 'static {
    /// Run one control step.
    fn step(&mut self, senses: &mut Senses<'_>, act: &mut Actuators, rng: &mut AgentRng);

    /// Return to initial defaults (time 0, initial state, timers cleared).
    /// Called once after construction and on experiment reset.
    fn reset(&mut self, act: &mut Actuators, rng: &mut AgentRng);
}
