//! Signal propagation: stationary relays that re-emit any blink they hear.
//!
//! A relay blinks spontaneously at a low Poisson rate and otherwise echoes
//! received blinks, so a single pulse propagates hop by hop across the
//! swarm.  A refractory window after each blink stops the echo storm: a
//! unit that just blinked is deaf, motionless, and silent until the window
//! closes.

use swarm_core::AgentRng;
use swarm_percept::Propulsion;

use crate::aggregate::steer_toward_bearing;
use crate::error::{check_param, check_positive};
use crate::variants::{BODY_FIRING, BODY_IDLE};
use crate::{Actuators, BehaviorResult, Controller, MessageSummary, Senses};

/// Parameters for [`SignalRelay`].
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalRelayConfig {
    /// Seconds after a blink during which the unit neither blinks nor
    /// updates its propulsion.
    pub refractory: f32,
    /// Spontaneous blinks per second; the per-step probability is
    /// `blink_proba * timestep`.
    pub blink_proba: f32,
    /// Pivot speed of the steering toward the heard blinks.
    pub speed: f32,
    /// Scale of the forward/reverse crawl legs of the steering bucket.
    pub forward_coeff: f32,
}

impl Default for SignalRelayConfig {
    fn default() -> Self {
        Self {
            refractory: 2.0,
            blink_proba: 0.05,
            speed: 0.6,
            forward_coeff: 0.02,
        }
    }
}

impl SignalRelayConfig {
    pub fn validate(&self) -> BehaviorResult<()> {
        check_positive("refractory", self.refractory)?;
        check_param("blink_proba", self.blink_proba)?;
        check_param("speed", self.speed)?;
        check_param("forward_coeff", self.forward_coeff)?;
        Ok(())
    }
}

/// The signal-propagation controller.
pub struct SignalRelay {
    pub cfg: SignalRelayConfig,
    /// Time of the most recent blink.  Starts one refractory in the past so
    /// a fresh unit is immediately armed.
    pub last_blink: f32,
}

impl SignalRelay {
    pub fn new(cfg: SignalRelayConfig) -> BehaviorResult<Self> {
        cfg.validate()?;
        Ok(Self {
            last_blink: -cfg.refractory,
            cfg,
        })
    }

    #[inline]
    fn refractory_over(&self, now: f32) -> bool {
        now - self.last_blink > self.cfg.refractory
    }
}

impl Controller for SignalRelay {
    fn step(&mut self, senses: &mut Senses<'_>, act: &mut Actuators, rng: &mut AgentRng) {
        let summary = MessageSummary::collect(
            senses.take_messages(),
            MessageSummary::DEFAULT_CLOSE_RANGE,
        );

        act.color = BODY_IDLE;
        if !self.refractory_over(senses.now) {
            // Deaf and latched until the window closes.
            return;
        }

        // Spontaneous blink, else relay anything heard.
        if rng.uniform() < self.cfg.blink_proba * senses.timestep || summary.count > 0 {
            act.broadcast = true;
            act.color = BODY_FIRING;
            self.last_blink = senses.now;
        }

        act.propulsion = if summary.count > 0 {
            steer_toward_bearing(summary.mean_bearing, self.cfg.speed, self.cfg.forward_coeff)
        } else {
            Propulsion::STOP
        };
    }

    fn reset(&mut self, act: &mut Actuators, _rng: &mut AgentRng) {
        self.last_blink = -self.cfg.refractory;
        act.propulsion = Propulsion::STOP;
        act.color = BODY_IDLE;
    }
}
