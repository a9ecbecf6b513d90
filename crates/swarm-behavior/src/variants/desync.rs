//! Electric-sense desynchronization: duty-cycle oscillators that repel in
//! time instead of space.
//!
//! Each unit alternates a long passive phase with a short active phase in
//! which it polarizes its electrode array.  While passive it listens for
//! induced currents; sensing a neighbor's active phase delays its own
//! counter, so nearby units drift apart in phase until their active
//! windows no longer overlap.  Motion is the zero-speed explore/turn cycle
//! with avoidance, plus an optical ping every step for bookkeeping.

use swarm_core::AgentRng;
use swarm_percept::Propulsion;

use crate::error::{check_param, check_positive};
use crate::fsm::sample_turn_angle;
use crate::variants::{BODY_DELAYED, BODY_FIRING, BODY_IDLE};
use crate::{
    Actuators, BehaviorResult, Controller, MotionFsm, ObstacleAvoider, Phase, Senses,
};

/// Parameters for [`ElectricDesync`].
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElectricDesyncConfig {
    /// Counter value at which the active phase begins, seconds.
    pub threshold: f32,
    /// Counter value at which the cycle hard-resets to zero, seconds.  The
    /// active window is `ceiling - threshold` long.
    pub ceiling: f32,
    /// Counter delay applied per step of sensed current, scaled by the
    /// timestep.
    pub penalty_gain: f32,
    /// Polarization put on electrode 0 during the active phase.
    pub amplitude: f32,
    /// Induced currents below this magnitude are treated as noise.
    pub current_floor: f32,
    /// Mean of the exponential explore dwell, seconds.
    pub explore_mean_duration: f32,
    /// Pivot speed during a turn.
    pub turn_speed: f32,
    pub avoider: ObstacleAvoider,
}

impl Default for ElectricDesyncConfig {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            ceiling: 20.0,
            penalty_gain: 1.0,
            amplitude: 1.0,
            current_floor: 1.0e-6,
            explore_mean_duration: 5.0,
            turn_speed: 0.3,
            avoider: ObstacleAvoider::default(),
        }
    }
}

impl ElectricDesyncConfig {
    pub fn validate(&self) -> BehaviorResult<()> {
        check_positive("threshold", self.threshold)?;
        check_positive("ceiling", self.ceiling)?;
        if self.ceiling <= self.threshold {
            return Err(crate::BehaviorError::Config(format!(
                "ceiling ({}) must exceed threshold ({})",
                self.ceiling, self.threshold
            )));
        }
        check_param("penalty_gain", self.penalty_gain)?;
        check_param("amplitude", self.amplitude)?;
        check_param("current_floor", self.current_floor)?;
        check_param("explore_mean_duration", self.explore_mean_duration)?;
        check_positive("turn_speed", self.turn_speed)?;
        Ok(())
    }
}

/// The desynchronization controller.
pub struct ElectricDesync {
    pub cfg: ElectricDesyncConfig,
    pub fsm: MotionFsm,
    /// Duty-cycle counter, seconds of accumulated phase.
    pub counter: f32,
}

impl ElectricDesync {
    pub fn new(cfg: ElectricDesyncConfig) -> BehaviorResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            fsm: MotionFsm::new(),
            counter: 0.0,
        })
    }

    /// True while the active (polarized) window is open.  Strictly above
    /// `threshold`; the boundary itself is still passive.
    #[inline]
    pub fn active(&self) -> bool {
        self.counter > self.cfg.threshold
    }

    fn sensed_current(&self, currents: &[f32]) -> bool {
        currents.iter().any(|c| c.abs() > self.cfg.current_floor)
    }

    fn step_oscillator(&mut self, senses: &Senses<'_>, act: &mut Actuators) {
        self.counter += senses.timestep;
        if self.counter >= self.cfg.ceiling {
            self.counter = 0.0;
        }

        if self.active() {
            act.depolarize();
            if let Some(first) = act.polarization.first_mut() {
                *first = self.cfg.amplitude;
            }
            act.color = BODY_FIRING;
            return;
        }

        act.depolarize();
        if self.sensed_current(senses.currents) {
            self.counter = (self.counter - self.cfg.penalty_gain * senses.timestep).max(0.0);
            act.color = BODY_DELAYED;
        } else {
            act.color = BODY_IDLE;
        }
    }

    fn step_motion(&mut self, senses: &Senses<'_>, act: &mut Actuators, rng: &mut AgentRng) {
        match self.fsm.phase {
            Phase::Explore => {
                if self.fsm.timer.expired(senses.now) {
                    let angle = sample_turn_angle(rng);
                    self.fsm.enter_turn(senses.now, angle, self.cfg.turn_speed);
                    act.propulsion = Propulsion::STOP;
                    return;
                }
                if let Some(cmd) = self.cfg.avoider.avoid(senses.rays) {
                    act.propulsion = cmd;
                    return;
                }
                // Station-keeping: the explore leg carries no thrust.
                act.propulsion = Propulsion::STOP;
            }
            Phase::Turn => {
                if self.fsm.timer.expired(senses.now) {
                    self.fsm
                        .enter_explore(senses.now, self.cfg.explore_mean_duration, rng);
                    return;
                }
                // The turn is a dwell, not a pivot: the unit stays put and
                // only the sampled heading bookkeeping advances.
                act.propulsion = Propulsion::STOP;
            }
            Phase::Brake | Phase::Rest => {}
        }
    }
}

impl Controller for ElectricDesync {
    fn step(&mut self, senses: &mut Senses<'_>, act: &mut Actuators, rng: &mut AgentRng) {
        // Optical ping for observers; receipts are irrelevant here.
        act.broadcast = true;
        senses.take_messages();

        self.step_oscillator(senses, act);
        self.step_motion(senses, act, rng);
    }

    fn reset(&mut self, act: &mut Actuators, rng: &mut AgentRng) {
        self.fsm = MotionFsm::new();
        // Random initial phase; a common phase would never desynchronize.
        self.counter = rng.uniform() * self.cfg.threshold;
        act.propulsion = Propulsion::STOP;
        act.depolarize();
        act.color = BODY_IDLE;
        self.fsm.enter_explore(0.0, self.cfg.explore_mean_duration, rng);
    }
}
