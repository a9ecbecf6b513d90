//! Optical communication: a random walker that broadcasts every step and
//! counts what it hears without acting on it.  Used to characterize the
//! optical channel in a moving swarm.

use swarm_core::AgentRng;
use swarm_percept::Propulsion;

use crate::fsm::sample_turn_angle;
use crate::variants::BODY_IDLE;
use crate::{
    Actuators, BehaviorResult, Controller, MotionFsm, Phase, RandomWalkConfig, Senses,
};

/// Parameters for [`OpticalBeacon`] — motion is exactly the random walk.
pub type OpticalBeaconConfig = RandomWalkConfig;

/// The optical-communication controller.
pub struct OpticalBeacon {
    pub cfg: OpticalBeaconConfig,
    pub fsm: MotionFsm,
    /// Total broadcasts heard over the run.  Receipt has no behavioral
    /// effect; the count exists for channel characterization.
    pub messages_heard: u64,
}

impl OpticalBeacon {
    pub fn new(cfg: OpticalBeaconConfig) -> BehaviorResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            fsm: MotionFsm::new(),
            messages_heard: 0,
        })
    }

    fn enter_explore(&mut self, now: f32, act: &mut Actuators, rng: &mut AgentRng) {
        self.fsm
            .enter_explore(now, self.cfg.explore_mean_duration, rng);
        act.color = BODY_IDLE;
    }
}

impl Controller for OpticalBeacon {
    fn step(&mut self, senses: &mut Senses<'_>, act: &mut Actuators, rng: &mut AgentRng) {
        act.broadcast = true;
        self.messages_heard += senses.take_messages().len() as u64;

        match self.fsm.phase {
            Phase::Explore => {
                if self.fsm.timer.expired(senses.now) {
                    let angle = sample_turn_angle(rng);
                    self.fsm.enter_turn(senses.now, angle, self.cfg.turn_speed);
                    act.propulsion = self.fsm.turn_propulsion(self.cfg.turn_speed);
                    return;
                }
                if let Some(cmd) = self.cfg.avoider.avoid(senses.rays) {
                    act.propulsion = cmd;
                    return;
                }
                act.propulsion = Propulsion::forward(self.cfg.explore_speed);
            }
            Phase::Turn => {
                if self.fsm.timer.expired(senses.now) {
                    self.enter_explore(senses.now, act, rng);
                    return;
                }
                act.propulsion = self.fsm.turn_propulsion(self.cfg.turn_speed);
            }
            Phase::Brake | Phase::Rest => {}
        }
    }

    fn reset(&mut self, act: &mut Actuators, rng: &mut AgentRng) {
        self.fsm = MotionFsm::new();
        self.messages_heard = 0;
        act.propulsion = Propulsion::STOP;
        self.enter_explore(0.0, act, rng);
    }
}
