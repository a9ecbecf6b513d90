//! Firefly synchronization: pulse-coupled leaky oscillators.
//!
//! Each unit carries a charge that leaks toward zero; hearing a neighbor's
//! blink knocks the charge down by a fixed coupling step, pulling the
//! listener's next blink earlier.  When the charge crosses the firing
//! threshold the unit blinks, recharges to full, and goes refractory for a
//! short window so its own echo cannot re-trigger it.  Repeated over
//! enough cycles the whole swarm blinks in unison.

use swarm_core::AgentRng;
use swarm_percept::Propulsion;

use crate::error::{check_param, check_positive};
use crate::variants::{BODY_FIRING, BODY_IDLE};
use crate::{Actuators, BehaviorResult, Controller, Senses};

/// Parameters for [`Firefly`].
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireflyConfig {
    /// Leak rate of the charge, per second.
    pub gamma: f32,
    /// Charge subtracted per heard blink (at most one per step).
    pub epsilon: f32,
    /// Seconds after a blink during which heard blinks are ignored.
    pub refractory: f32,
}

impl Default for FireflyConfig {
    fn default() -> Self {
        Self {
            gamma: 0.2,
            epsilon: 0.05,
            refractory: 0.2,
        }
    }
}

impl FireflyConfig {
    pub fn validate(&self) -> BehaviorResult<()> {
        check_positive("gamma", self.gamma)?;
        check_param("epsilon", self.epsilon)?;
        check_positive("refractory", self.refractory)?;
        Ok(())
    }
}

/// Charge below which the unit fires.
pub const FIRE_THRESHOLD: f32 = 0.1;

/// The firefly controller.  Stationary; all the behavior is in the light.
pub struct Firefly {
    pub cfg: FireflyConfig,
    /// Oscillator charge in `(0, 1]`; leaks toward zero.
    pub counter: f32,
    /// Time of the most recent blink.
    pub last_blink: f32,
}

impl Firefly {
    pub fn new(cfg: FireflyConfig) -> BehaviorResult<Self> {
        cfg.validate()?;
        Ok(Self {
            counter: 1.0,
            last_blink: -cfg.refractory,
            cfg,
        })
    }
}

impl Controller for Firefly {
    fn step(&mut self, senses: &mut Senses<'_>, act: &mut Actuators, _rng: &mut AgentRng) {
        self.counter -= self.counter * self.cfg.gamma * senses.timestep;

        // At most one coupling kick per step, and none while refractory.
        let heard = !senses.take_messages().is_empty();
        if heard && senses.now - self.last_blink > self.cfg.refractory {
            self.counter -= self.cfg.epsilon;
        }

        if self.counter <= FIRE_THRESHOLD {
            act.broadcast = true;
            act.color = BODY_FIRING;
            self.last_blink = senses.now;
            self.counter = 1.0;
        } else {
            act.color = BODY_IDLE;
        }
    }

    fn reset(&mut self, act: &mut Actuators, rng: &mut AgentRng) {
        // A random initial phase per unit; synchronization has to be earned.
        self.counter = rng.uniform();
        self.last_blink = -self.cfg.refractory;
        act.propulsion = Propulsion::STOP;
        act.color = BODY_IDLE;
    }
}
