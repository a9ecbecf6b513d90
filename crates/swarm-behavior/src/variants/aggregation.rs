//! Aggregation: the full explore/turn/brake/rest cycle.
//!
//! Every unit broadcasts each step.  Hearing a crowd (three or more
//! broadcasts in one step) interrupts exploration with a hard brake, then
//! a long rest; while resting, the unit keeps resting as long as the crowd
//! is audible, and creeps toward the mean bearing of its neighbors —
//! unless it is already densely surrounded at close range, in which case
//! attraction shuts off.  The combination clusters the swarm without any
//! central coordination.

use swarm_core::AgentRng;
use swarm_percept::Propulsion;

use crate::aggregate::steer_toward_bearing;
use crate::error::{check_param, check_positive};
use crate::fsm::sample_turn_angle;
use crate::variants::{BODY_FIRING, BODY_IDLE, BODY_RESTING};
use crate::{
    Actuators, BehaviorResult, Controller, MessageSummary, MotionFsm, ObstacleAvoider, Phase,
    Senses,
};

/// Parameters for [`Aggregation`].
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregationConfig {
    /// Mean of the exponential explore dwell, seconds.
    pub explore_mean_duration: f32,
    /// Forward cruise speed.
    pub explore_speed: f32,
    /// Pivot speed during a turn.
    pub turn_speed: f32,
    /// Deceleration magnitude in `Brake` (and in the avoider's brake law).
    pub brake_speed: f32,
    /// Fixed `Brake` dwell, seconds.
    pub brake_duration: f32,
    /// Fixed `Rest` dwell, seconds.
    pub rest_duration: f32,
    /// Speed of the attraction steering while resting.
    pub attraction_speed: f32,
    /// Distance below which a neighbor counts as "close".
    pub close_range: f32,
    /// Broadcasts per step that count as a crowd (brake trigger and rest
    /// extension).
    pub crowd_threshold: usize,
    /// Attraction is active only while at most this many close neighbors
    /// are audible — an already-surrounded unit stops pulling inward.
    pub close_crowd: usize,
    pub avoider: ObstacleAvoider,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            explore_mean_duration: 5.0,
            explore_speed: 0.01,
            turn_speed: 0.3,
            brake_speed: 0.05,
            brake_duration: 0.5,
            rest_duration: 30.0,
            attraction_speed: 0.2,
            close_range: MessageSummary::DEFAULT_CLOSE_RANGE,
            crowd_threshold: 3,
            close_crowd: 2,
            avoider: ObstacleAvoider {
                threshold: 0.1,
                brake_speed: 0.05,
                avoid_speed: 0.5,
                bias: 0.01,
            },
        }
    }
}

impl AggregationConfig {
    pub fn validate(&self) -> BehaviorResult<()> {
        check_param("explore_mean_duration", self.explore_mean_duration)?;
        check_param("explore_speed", self.explore_speed)?;
        check_positive("turn_speed", self.turn_speed)?;
        check_param("brake_speed", self.brake_speed)?;
        check_param("brake_duration", self.brake_duration)?;
        check_param("rest_duration", self.rest_duration)?;
        check_param("attraction_speed", self.attraction_speed)?;
        check_param("close_range", self.close_range)?;
        Ok(())
    }
}

/// The aggregation controller.
pub struct Aggregation {
    pub cfg: AggregationConfig,
    pub fsm: MotionFsm,
    /// Whether attraction steering was active on the last step.
    pub attraction: bool,
}

impl Aggregation {
    pub fn new(cfg: AggregationConfig) -> BehaviorResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            fsm: MotionFsm::new(),
            attraction: false,
        })
    }

    fn enter_explore(&mut self, now: f32, act: &mut Actuators, rng: &mut AgentRng) {
        self.fsm
            .enter_explore(now, self.cfg.explore_mean_duration, rng);
        act.color = BODY_IDLE;
    }

    fn enter_brake(&mut self, now: f32, act: &mut Actuators) {
        self.fsm.enter_brake(now, self.cfg.brake_duration);
        act.color = BODY_FIRING;
        act.propulsion = Propulsion::forward(-self.cfg.brake_speed);
    }

    fn enter_rest(&mut self, now: f32, act: &mut Actuators) {
        self.fsm.enter_rest(now, self.cfg.rest_duration);
        act.color = BODY_RESTING;
        act.propulsion = Propulsion::STOP;
    }
}

impl Controller for Aggregation {
    fn step(&mut self, senses: &mut Senses<'_>, act: &mut Actuators, rng: &mut AgentRng) {
        act.broadcast = true;

        let summary = MessageSummary::collect(senses.take_messages(), self.cfg.close_range);
        // Attraction only while not already densely surrounded.
        self.attraction =
            summary.count > 0 && summary.close_neighbors <= self.cfg.close_crowd;

        match self.fsm.phase {
            Phase::Explore => {
                // A crowd overrides the dwell timer.
                if summary.count >= self.cfg.crowd_threshold {
                    self.enter_brake(senses.now, act);
                    return;
                }
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
                }
                // Pivot command latched at turn entry.
            }
            Phase::Brake => {
                if self.fsm.timer.expired(senses.now) {
                    self.enter_rest(senses.now, act);
                }
            }
            Phase::Rest => {
                if self.fsm.timer.expired(senses.now) {
                    self.enter_explore(senses.now, act, rng);
                    return;
                }
                // An audible crowd keeps the unit resting.
                if summary.count >= self.cfg.crowd_threshold {
                    self.fsm.timer.restart(senses.now);
                }
                act.propulsion = if self.attraction {
                    steer_toward_bearing(summary.mean_bearing, self.cfg.attraction_speed, 0.1)
                } else {
                    Propulsion::STOP
                };
            }
        }
    }

    fn reset(&mut self, act: &mut Actuators, rng: &mut AgentRng) {
        self.fsm = MotionFsm::new();
        self.attraction = false;
        act.propulsion = Propulsion::STOP;
        self.enter_explore(0.0, act, rng);
    }
}
