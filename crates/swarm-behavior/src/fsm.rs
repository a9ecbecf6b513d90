//! The shared explore/turn/brake/rest state-machine substrate.
//!
//! Every mobile variant is built on the same scaffolding: one active
//! [`Phase`], a [`DwellTimer`] gating how long it stays active, and a
//! signed turn direction.  Variants differ only in which phases they use
//! and what each phase actuates.

use std::f32::consts::PI;

use swarm_core::AgentRng;
use swarm_percept::Propulsion;

// ── Phase ─────────────────────────────────────────────────────────────────────

/// The phases of the motion state machine.  At most one is active at a
/// time; simple variants cycle only `Explore`/`Turn`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Swim forward until the dwell timer expires or an interrupt fires.
    #[default]
    Explore,
    /// Rotate toward a freshly sampled heading offset.
    Turn,
    /// Decelerate hard after a crowding interrupt.
    Brake,
    /// Hold position, optionally steering toward neighbors.
    Rest,
}

// ── DwellTimer ────────────────────────────────────────────────────────────────

/// A `(start, duration)` pair gating how long a phase remains active.
///
/// Invariants: `duration >= 0` and `start <= now` for any `now` the timer
/// is queried with — both enforced at construction by clamping.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DwellTimer {
    pub start: f32,
    pub duration: f32,
}

impl DwellTimer {
    pub const ZERO: DwellTimer = DwellTimer { start: 0.0, duration: 0.0 };

    /// Build a timer, clamping a malformed duration to zero.
    pub fn new(start: f32, duration: f32) -> Self {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        let start = if start.is_finite() { start } else { 0.0 };
        Self { start, duration }
    }

    /// Strictly-greater expiry test: the phase runs its full dwell.
    #[inline]
    pub fn expired(&self, now: f32) -> bool {
        now - self.start > self.duration
    }

    /// Restart the dwell from `now`, keeping the duration.
    #[inline]
    pub fn restart(&mut self, now: f32) {
        self.start = now;
    }

    /// Seconds the timer has been running at `now`.
    #[inline]
    pub fn elapsed(&self, now: f32) -> f32 {
        now - self.start
    }
}

// ── MotionFsm ─────────────────────────────────────────────────────────────────

/// Shared state of the motion automaton: current phase, its dwell timer,
/// and the direction of the turn in progress.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionFsm {
    pub phase: Phase,
    pub timer: DwellTimer,
    /// `+1` or `-1`; set on turn entry.  The convention is `angle < 0 ⇒
    /// +1` — counter-intuitive, but every deployed variant depends on it,
    /// so it is preserved exactly.
    pub turn_sign: f32,
}

impl Default for MotionFsm {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionFsm {
    pub fn new() -> Self {
        Self {
            phase: Phase::Explore,
            timer: DwellTimer::ZERO,
            turn_sign: 1.0,
        }
    }

    /// Enter `Explore` with a memoryless dwell: `-ln(1-U) * mean_duration`.
    pub fn enter_explore(&mut self, now: f32, mean_duration: f32, rng: &mut AgentRng) {
        self.timer = DwellTimer::new(now, rng.exponential(mean_duration));
        self.phase = Phase::Explore;
    }

    /// Enter `Turn` toward a heading offset in `[-π, π]`.
    ///
    /// The dwell is the time the pivot needs to cover `angle`:
    /// `(|angle|/π) / 3 / turn_speed`.
    pub fn enter_turn(&mut self, now: f32, angle: f32, turn_speed: f32) {
        self.turn_sign = if angle < 0.0 { 1.0 } else { -1.0 };
        self.timer = DwellTimer::new(now, (angle.abs() / PI) / 3.0 / turn_speed);
        self.phase = Phase::Turn;
    }

    /// Enter `Brake` for a fixed dwell.
    pub fn enter_brake(&mut self, now: f32, duration: f32) {
        self.timer = DwellTimer::new(now, duration);
        self.phase = Phase::Brake;
    }

    /// Enter `Rest` for a fixed dwell.
    pub fn enter_rest(&mut self, now: f32, duration: f32) {
        self.timer = DwellTimer::new(now, duration);
        self.phase = Phase::Rest;
    }

    /// The pivot command for the turn in progress.
    #[inline]
    pub fn turn_propulsion(&self, turn_speed: f32) -> Propulsion {
        Propulsion::new(turn_speed * self.turn_sign, -turn_speed * self.turn_sign)
    }
}

/// Sample a uniform heading offset in `[-π, π)`.
#[inline]
pub fn sample_turn_angle(rng: &mut AgentRng) -> f32 {
    rng.uniform() * 2.0 * PI - PI
}
