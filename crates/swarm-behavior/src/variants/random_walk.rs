//! Random walk: explore/turn cycling with obstacle avoidance and no
//! communication.  The baseline dispersal behavior.

use swarm_core::AgentRng;
use swarm_percept::Propulsion;

use crate::error::{check_param, check_positive};
use crate::fsm::sample_turn_angle;
use crate::variants::BODY_IDLE;
use crate::{Actuators, BehaviorResult, Controller, MotionFsm, ObstacleAvoider, Phase, Senses};

/// Parameters for [`RandomWalk`].
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomWalkConfig {
    /// Mean of the exponential explore dwell, seconds.
    pub explore_mean_duration: f32,
    /// Forward cruise speed.
    pub explore_speed: f32,
    /// Pivot speed during a turn; also scales the turn dwell.
    pub turn_speed: f32,
    pub avoider: ObstacleAvoider,
}

impl Default for RandomWalkConfig {
    fn default() -> Self {
        Self {
            explore_mean_duration: 5.0,
            explore_speed: 0.05,
            turn_speed: 0.3,
            avoider: ObstacleAvoider::default(),
        }
    }
}

impl RandomWalkConfig {
    pub fn validate(&self) -> BehaviorResult<()> {
        check_param("explore_mean_duration", self.explore_mean_duration)?;
        check_param("explore_speed", self.explore_speed)?;
        check_positive("turn_speed", self.turn_speed)?;
        check_param("avoider.threshold", self.avoider.threshold)?;
        check_param("avoider.avoid_speed", self.avoider.avoid_speed)?;
        check_param("avoider.brake_speed", self.avoider.brake_speed)?;
        Ok(())
    }
}

/// The random-walk controller.
pub struct RandomWalk {
    pub cfg: RandomWalkConfig,
    pub fsm: MotionFsm,
}

impl RandomWalk {
    pub fn new(cfg: RandomWalkConfig) -> BehaviorResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            fsm: MotionFsm::new(),
        })
    }

    fn enter_explore(&mut self, now: f32, act: &mut Actuators, rng: &mut AgentRng) {
        self.fsm
            .enter_explore(now, self.cfg.explore_mean_duration, rng);
        act.color = BODY_IDLE;
    }
}

impl Controller for RandomWalk {
    fn step(&mut self, senses: &mut Senses<'_>, act: &mut Actuators, rng: &mut AgentRng) {
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
            // This variant never enters Brake or Rest.
            Phase::Brake | Phase::Rest => {}
        }
    }

    fn reset(&mut self, act: &mut Actuators, rng: &mut AgentRng) {
        self.fsm = MotionFsm::new();
        act.propulsion = Propulsion::STOP;
        self.enter_explore(0.0, act, rng);
    }
}
