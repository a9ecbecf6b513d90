use swarm_core::{AgentId, AgentRng, Vec2};
use swarm_percept::{Message, Propulsion, Ray, RayBank};

use crate::variants::{BODY_DELAYED, BODY_FIRING, BODY_RESTING};
use crate::{
    Actuators, Aggregation, AggregationConfig, Controller, DwellTimer, ElectricDesync,
    ElectricDesyncConfig, Firefly, FireflyConfig, MessageSummary, MotionFsm, ObstacleAvoider,
    OpticalBeacon, Phase, RandomWalk, RandomWalkConfig, Senses, SignalRelay, SignalRelayConfig,
    steer_toward_bearing,
};

fn rng(seed: u64) -> AgentRng {
    AgentRng::new(seed, AgentId(0))
}

/// A message from a sender at `angle` radians off the nose, `dist` away.
fn msg(angle: f32, dist: f32) -> Message {
    Message::new(Vec2::from_angle(angle), dist)
}

/// Run one controller step with an empty electrode array.
fn step_with<C: Controller>(
    ctl: &mut C,
    now: f32,
    timestep: f32,
    rays: &RayBank,
    messages: Vec<Message>,
    act: &mut Actuators,
    rng: &mut AgentRng,
) {
    act.begin_step();
    let mut senses = Senses::new(now, timestep, rays, messages, &[]);
    ctl.step(&mut senses, act, rng);
}

mod avoidance {
    use super::*;

    fn bank(values: [f32; 6], hits: [bool; 6]) -> RayBank {
        let mut b = RayBank::new();
        for ray in Ray::ALL {
            b.set(ray, values[ray.index()], hits[ray.index()]);
        }
        b
    }

    #[test]
    fn no_hit_flags_means_no_obstacle() {
        // Large proximities without hit flags must not trigger avoidance.
        let b = bank([0.9; 6], [false; 6]);
        assert!(ObstacleAvoider::default().avoid(&b).is_none());
    }

    #[test]
    fn downward_hits_do_not_count() {
        let mut b = RayBank::new();
        b.set(Ray::FrontLeftDown, 1.0, true);
        b.set(Ray::FrontRightDown, 1.0, true);
        assert!(!b.obstacle_perceived());
        assert!(ObstacleAvoider::default().avoid(&b).is_none());
    }

    #[test]
    fn downward_values_count_in_side_means() {
        let mut b = RayBank::new();
        b.set(Ray::Left, 0.1, true);
        b.set(Ray::FrontRightDown, 0.9, false);
        // pr = 0.3 > pl = 0.0333 only because of the downward value.
        assert!(b.right_mean() > b.left_mean());
        let cmd = ObstacleAvoider::default().avoid(&b).unwrap();
        // Nearer on the right, so turn left.
        assert!(cmd.left < 0.0 && cmd.right > 0.0);
    }

    #[test]
    fn nearer_left_turns_right() {
        let mut b = RayBank::new();
        b.set(Ray::Left, 0.8, true);
        let cmd = ObstacleAvoider::default().avoid(&b).unwrap();
        assert!(cmd.left > 0.0 && cmd.right < 0.0);
    }

    #[test]
    fn symmetric_approach_turns_left() {
        let mut b = RayBank::new();
        b.set(Ray::Left, 0.5, true);
        b.set(Ray::Right, 0.5, true);
        let av = ObstacleAvoider::default();
        let cmd = av.avoid(&b).unwrap();
        assert!(cmd.left < 0.0 && cmd.right > 0.0);
        // And it is the same answer every time.
        assert_eq!(av.avoid(&b).unwrap(), cmd);
    }

    #[test]
    fn bias_shifts_both_propellers() {
        let mut b = RayBank::new();
        b.set(Ray::Right, 0.5, true);
        let av = ObstacleAvoider { bias: 0.01, ..ObstacleAvoider::default() };
        let cmd = av.avoid(&b).unwrap();
        assert!((cmd.left - (-av.avoid_speed + 0.01)).abs() < 1e-6);
        assert!((cmd.right - (av.avoid_speed + 0.01)).abs() < 1e-6);
    }

    #[test]
    fn proportional_brake_law() {
        let av = ObstacleAvoider { threshold: 0.1, brake_speed: 1.0, ..ObstacleAvoider::default() };
        let cmd = av.proportional_brake(0.2, 0.6).unwrap();
        assert!((cmd.left - (-0.6 / 0.8)).abs() < 1e-6);
        assert!((cmd.right - (-0.2 / 0.8)).abs() < 1e-6);
        // One side below threshold: no brake.
        assert!(av.proportional_brake(0.05, 0.6).is_none());
    }
}

mod aggregate {
    use super::*;

    #[test]
    fn empty_inbox_is_all_zero() {
        let s = MessageSummary::collect(Vec::new(), 0.4);
        assert_eq!(s.count, 0);
        assert_eq!(s.mean_bearing, Vec2::ZERO);
        assert_eq!(s.mean_bearing.heading(), 0.0);
        assert_eq!(s.close_neighbors, 0);
    }

    #[test]
    fn mean_bearing_and_close_count() {
        let msgs = vec![msg(0.0, 0.2), msg(std::f32::consts::FRAC_PI_2, 1.0)];
        let s = MessageSummary::collect(msgs, 0.4);
        assert_eq!(s.count, 2);
        assert_eq!(s.close_neighbors, 1);
        assert!((s.mean_bearing.x - 0.5).abs() < 1e-6);
        assert!((s.mean_bearing.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn steering_buckets() {
        let speed = 0.2;
        let coeff = 0.1;
        // Dead ahead: slow forward crawl.
        let ahead = steer_toward_bearing(Vec2::from_angle(0.0), speed, coeff);
        assert_eq!(ahead, Propulsion::forward(speed * coeff));
        // Dead astern: slow reverse crawl.
        let astern = steer_toward_bearing(Vec2::from_angle(std::f32::consts::PI), speed, coeff);
        assert_eq!(astern, Propulsion::forward(-speed * coeff));
        // Abeam to port: full-speed pivot.
        let port = steer_toward_bearing(Vec2::from_angle(std::f32::consts::FRAC_PI_2), speed, coeff);
        assert_eq!(port, Propulsion::new(speed, -speed));
        // Abeam to starboard pivots the other way.
        let stbd = steer_toward_bearing(Vec2::from_angle(-std::f32::consts::FRAC_PI_2), speed, coeff);
        assert_eq!(stbd, Propulsion::new(-speed, speed));
    }
}

mod fsm {
    use super::*;

    #[test]
    fn expiry_is_strict() {
        let t = DwellTimer::new(2.0, 1.0);
        assert!(!t.expired(2.0));
        assert!(!t.expired(3.0)); // exactly at the boundary
        assert!(t.expired(3.0001));
    }

    #[test]
    fn malformed_durations_clamp_to_zero() {
        assert_eq!(DwellTimer::new(0.0, -5.0).duration, 0.0);
        assert_eq!(DwellTimer::new(0.0, f32::NAN).duration, 0.0);
        assert_eq!(DwellTimer::new(f32::INFINITY, 1.0).start, 0.0);
    }

    #[test]
    fn restart_keeps_duration() {
        let mut t = DwellTimer::new(0.0, 3.0);
        t.restart(10.0);
        assert!(!t.expired(12.9));
        assert!(t.expired(13.1));
    }

    #[test]
    fn turn_sign_convention() {
        let mut fsm = MotionFsm::new();
        fsm.enter_turn(0.0, -1.0, 0.3);
        assert_eq!(fsm.turn_sign, 1.0);
        fsm.enter_turn(0.0, 1.0, 0.3);
        assert_eq!(fsm.turn_sign, -1.0);
    }

    #[test]
    fn turn_duration_scales_with_angle_and_speed() {
        let mut fsm = MotionFsm::new();
        fsm.enter_turn(0.0, std::f32::consts::PI, 0.3);
        let full = fsm.timer.duration;
        assert!((full - 1.0 / 3.0 / 0.3).abs() < 1e-6);
        fsm.enter_turn(0.0, std::f32::consts::FRAC_PI_2, 0.3);
        assert!((fsm.timer.duration - full / 2.0).abs() < 1e-6);
    }

    #[test]
    fn turn_propulsion_is_antisymmetric() {
        let mut fsm = MotionFsm::new();
        fsm.enter_turn(0.0, 1.0, 0.3);
        let p = fsm.turn_propulsion(0.3);
        assert_eq!(p.left, -p.right);
    }
}

mod random_walk {
    use super::*;

    #[test]
    fn explore_ends_exactly_when_the_dwell_expires() {
        // Pre-sample the dwell the controller will draw by replaying its RNG.
        let mut probe = rng(42);
        let dwell = probe.exponential(5.0);

        let mut ctl = RandomWalk::new(RandomWalkConfig::default()).unwrap();
        let mut act = Actuators::new(0);
        let mut r = rng(42);
        ctl.reset(&mut act, &mut r);

        let rays = RayBank::new();
        step_with(&mut ctl, dwell - 0.01, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Explore);
        assert_eq!(act.propulsion, Propulsion::forward(0.05));

        step_with(&mut ctl, dwell + 0.01, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Turn);
    }

    #[test]
    fn avoidance_overrides_cruise() {
        let mut ctl = RandomWalk::new(RandomWalkConfig::default()).unwrap();
        let mut act = Actuators::new(0);
        let mut r = rng(1);
        ctl.reset(&mut act, &mut r);

        let mut rays = RayBank::new();
        rays.set(Ray::Left, 0.8, true);
        step_with(&mut ctl, 0.01, 0.05, &rays, Vec::new(), &mut act, &mut r);
        let expected = ctl.cfg.avoider.avoid(&rays).unwrap();
        assert_eq!(act.propulsion, expected);
    }

    #[test]
    fn turn_runs_to_completion_then_resumes_explore() {
        let mut ctl = RandomWalk::new(RandomWalkConfig::default()).unwrap();
        let mut act = Actuators::new(0);
        let mut r = rng(9);
        ctl.reset(&mut act, &mut r);

        // Force a turn by stepping past a zero-length dwell.
        ctl.fsm.timer = DwellTimer::new(0.0, 0.0);
        let rays = RayBank::new();
        step_with(&mut ctl, 0.1, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Turn);

        let end = ctl.fsm.timer.start + ctl.fsm.timer.duration;
        step_with(&mut ctl, end + 0.01, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Explore);
    }

    #[test]
    fn config_rejects_malformed_parameters() {
        let bad = RandomWalkConfig { explore_speed: f32::NAN, ..RandomWalkConfig::default() };
        assert!(RandomWalk::new(bad).is_err());
        let bad = RandomWalkConfig { turn_speed: 0.0, ..RandomWalkConfig::default() };
        assert!(RandomWalk::new(bad).is_err());
        let bad = RandomWalkConfig { explore_mean_duration: -1.0, ..RandomWalkConfig::default() };
        assert!(RandomWalk::new(bad).is_err());
    }
}

mod optical {
    use super::*;

    #[test]
    fn broadcasts_every_step_and_counts_receipts() {
        let mut ctl = OpticalBeacon::new(RandomWalkConfig::default()).unwrap();
        let mut act = Actuators::new(0);
        let mut r = rng(3);
        ctl.reset(&mut act, &mut r);

        let rays = RayBank::new();
        act.begin_step();
        let mut senses = Senses::new(0.1, 0.05, &rays, vec![msg(0.0, 1.0), msg(1.0, 2.0)], &[]);
        ctl.step(&mut senses, &mut act, &mut r);
        assert!(act.broadcast);
        assert_eq!(ctl.messages_heard, 2);
        assert!(senses.messages.is_empty());

        step_with(&mut ctl, 0.15, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert!(act.broadcast);
        assert_eq!(ctl.messages_heard, 2);
    }

    #[test]
    fn receipts_do_not_change_motion() {
        let mut quiet = OpticalBeacon::new(RandomWalkConfig::default()).unwrap();
        let mut noisy = OpticalBeacon::new(RandomWalkConfig::default()).unwrap();
        let mut act_q = Actuators::new(0);
        let mut act_n = Actuators::new(0);
        let mut rq = rng(11);
        let mut rn = rng(11);
        quiet.reset(&mut act_q, &mut rq);
        noisy.reset(&mut act_n, &mut rn);

        let rays = RayBank::new();
        for i in 0..200 {
            let now = i as f32 * 0.05;
            step_with(&mut quiet, now, 0.05, &rays, Vec::new(), &mut act_q, &mut rq);
            step_with(&mut noisy, now, 0.05, &rays, vec![msg(1.0, 0.5)], &mut act_n, &mut rn);
            assert_eq!(act_q.propulsion, act_n.propulsion);
        }
        assert_eq!(noisy.messages_heard, 200);
    }
}

mod aggregation {
    use super::*;

    fn crowd() -> Vec<Message> {
        vec![msg(0.5, 1.0), msg(-0.5, 1.0), msg(0.0, 1.0)]
    }

    fn make() -> (Aggregation, Actuators, AgentRng) {
        let mut ctl = Aggregation::new(AggregationConfig::default()).unwrap();
        let mut act = Actuators::new(0);
        let mut r = rng(5);
        ctl.reset(&mut act, &mut r);
        (ctl, act, r)
    }

    #[test]
    fn crowd_interrupts_explore_with_a_brake() {
        let (mut ctl, mut act, mut r) = make();
        let rays = RayBank::new();
        step_with(&mut ctl, 0.1, 0.05, &rays, crowd(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Brake);
        assert_eq!(act.propulsion, Propulsion::forward(-0.05));
        assert_eq!(act.color, BODY_FIRING);
    }

    #[test]
    fn two_messages_are_not_a_crowd() {
        let (mut ctl, mut act, mut r) = make();
        let rays = RayBank::new();
        step_with(&mut ctl, 0.1, 0.05, &rays, vec![msg(0.0, 1.0), msg(0.1, 1.0)], &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Explore);
    }

    #[test]
    fn brake_then_rest_then_explore() {
        let (mut ctl, mut act, mut r) = make();
        let rays = RayBank::new();
        step_with(&mut ctl, 1.0, 0.05, &rays, crowd(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Brake);

        // Brake dwell is 0.5 s, strict expiry.
        step_with(&mut ctl, 1.5, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Brake);
        step_with(&mut ctl, 1.6, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Rest);
        assert_eq!(act.color, BODY_RESTING);

        // Rest dwell is 30 s.
        step_with(&mut ctl, 31.0, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Rest);
        step_with(&mut ctl, 31.7, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Explore);
    }

    #[test]
    fn audible_crowd_extends_the_rest() {
        let (mut ctl, mut act, mut r) = make();
        ctl.fsm.enter_rest(0.0, 30.0);
        let rays = RayBank::new();

        // A crowd at t=10 restarts the 30 s dwell.
        step_with(&mut ctl, 10.0, 0.05, &rays, crowd(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Rest);

        // Without the restart this would have expired at t=30.
        step_with(&mut ctl, 35.0, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Rest);
        step_with(&mut ctl, 40.1, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Explore);
    }

    #[test]
    fn rest_steering_is_exact_at_the_cardinal_bearings() {
        let rays = RayBank::new();
        let attraction = AggregationConfig::default().attraction_speed;

        // One far neighbor dead ahead: slow forward crawl.
        let (mut ctl, mut act, mut r) = make();
        ctl.fsm.enter_rest(0.0, 30.0);
        step_with(&mut ctl, 1.0, 0.05, &rays, vec![msg(0.0, 1.0)], &mut act, &mut r);
        assert_eq!(act.propulsion, Propulsion::forward(0.1 * attraction));

        // Abeam to port: full-speed pivot.
        let (mut ctl, mut act, mut r) = make();
        ctl.fsm.enter_rest(0.0, 30.0);
        step_with(
            &mut ctl, 1.0, 0.05, &rays,
            vec![msg(std::f32::consts::FRAC_PI_2, 1.0)],
            &mut act, &mut r,
        );
        assert_eq!(act.propulsion, Propulsion::new(attraction, -attraction));

        // Dead astern: slow reverse crawl.
        let (mut ctl, mut act, mut r) = make();
        ctl.fsm.enter_rest(0.0, 30.0);
        step_with(
            &mut ctl, 1.0, 0.05, &rays,
            vec![msg(std::f32::consts::PI, 1.0)],
            &mut act, &mut r,
        );
        assert_eq!(act.propulsion, Propulsion::forward(-0.1 * attraction));
    }

    #[test]
    fn dense_close_crowd_disables_attraction() {
        let (mut ctl, mut act, mut r) = make();
        ctl.fsm.enter_rest(0.0, 30.0);
        let rays = RayBank::new();
        // Three close neighbors: crowd restarts the dwell, attraction off.
        let close = vec![msg(0.0, 0.1), msg(0.3, 0.1), msg(-0.3, 0.1)];
        step_with(&mut ctl, 1.0, 0.05, &rays, close, &mut act, &mut r);
        assert!(!ctl.attraction);
        assert_eq!(act.propulsion, Propulsion::STOP);
    }

    #[test]
    fn broadcasts_every_step() {
        let (mut ctl, mut act, mut r) = make();
        let rays = RayBank::new();
        for i in 0..5 {
            step_with(&mut ctl, i as f32 * 0.05, 0.05, &rays, Vec::new(), &mut act, &mut r);
            assert!(act.broadcast);
        }
    }
}

mod relay {
    use super::*;

    fn make(cfg: SignalRelayConfig) -> (SignalRelay, Actuators, AgentRng) {
        let mut ctl = SignalRelay::new(cfg).unwrap();
        let mut act = Actuators::new(0);
        let mut r = rng(17);
        ctl.reset(&mut act, &mut r);
        (ctl, act, r)
    }

    #[test]
    fn silent_and_unheard_means_halt() {
        let (mut ctl, mut act, mut r) =
            make(SignalRelayConfig { blink_proba: 0.0, ..SignalRelayConfig::default() });
        let rays = RayBank::new();
        step_with(&mut ctl, 3.0, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert!(!act.broadcast);
        assert_eq!(act.propulsion, Propulsion::STOP);
    }

    #[test]
    fn relays_any_receipt_and_steers_toward_it() {
        let (mut ctl, mut act, mut r) =
            make(SignalRelayConfig { blink_proba: 0.0, ..SignalRelayConfig::default() });
        let rays = RayBank::new();
        step_with(
            &mut ctl, 3.0, 0.05, &rays,
            vec![msg(std::f32::consts::FRAC_PI_2, 1.0)],
            &mut act, &mut r,
        );
        assert!(act.broadcast);
        assert_eq!(act.color, BODY_FIRING);
        assert_eq!(ctl.last_blink, 3.0);
        assert_eq!(act.propulsion, Propulsion::new(0.6, -0.6));
    }

    #[test]
    fn refractory_window_latches_everything() {
        let (mut ctl, mut act, mut r) =
            make(SignalRelayConfig { blink_proba: 0.0, ..SignalRelayConfig::default() });
        let rays = RayBank::new();
        step_with(&mut ctl, 3.0, 0.05, &rays, vec![msg(0.0, 1.0)], &mut act, &mut r);
        assert!(act.broadcast);
        let latched = act.propulsion;

        // Inside the 2 s window: deaf, no re-blink, propulsion untouched.
        step_with(&mut ctl, 4.0, 0.05, &rays, vec![msg(1.0, 1.0)], &mut act, &mut r);
        assert!(!act.broadcast);
        assert_eq!(act.propulsion, latched);
        assert_eq!(ctl.last_blink, 3.0);

        // After the window it relays again.
        step_with(&mut ctl, 5.1, 0.05, &rays, vec![msg(1.0, 1.0)], &mut act, &mut r);
        assert!(act.broadcast);
        assert_eq!(ctl.last_blink, 5.1);
    }

    #[test]
    fn certain_spontaneous_blink_fires_without_input() {
        // A rate that makes the per-step probability exceed 1.
        let (mut ctl, mut act, mut r) =
            make(SignalRelayConfig { blink_proba: 1.0e6, ..SignalRelayConfig::default() });
        let rays = RayBank::new();
        step_with(&mut ctl, 3.0, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert!(act.broadcast);
        assert_eq!(ctl.last_blink, 3.0);
    }
}

mod firefly {
    use super::*;

    fn make() -> (Firefly, Actuators, AgentRng) {
        let mut ctl = Firefly::new(FireflyConfig::default()).unwrap();
        let mut act = Actuators::new(0);
        let mut r = rng(23);
        ctl.reset(&mut act, &mut r);
        (ctl, act, r)
    }

    #[test]
    fn charge_leaks_geometrically() {
        let (mut ctl, mut act, mut r) = make();
        ctl.counter = 1.0;
        ctl.last_blink = -10.0;
        let rays = RayBank::new();
        step_with(&mut ctl, 0.05, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert!((ctl.counter - 0.99).abs() < 1e-6);
        assert!(!act.broadcast);
    }

    #[test]
    fn many_receipts_couple_only_once_per_step() {
        let (mut ctl, mut act, mut r) = make();
        ctl.counter = 0.5;
        ctl.last_blink = -10.0;
        let rays = RayBank::new();
        let msgs = vec![msg(0.0, 1.0), msg(1.0, 1.0), msg(2.0, 1.0)];
        step_with(&mut ctl, 0.05, 0.05, &rays, msgs, &mut act, &mut r);
        // One decay then exactly one epsilon, not three.
        assert!((ctl.counter - (0.5 * 0.99 - 0.05)).abs() < 1e-6);
    }

    #[test]
    fn refractory_ignores_receipts() {
        let (mut ctl, mut act, mut r) = make();
        ctl.counter = 0.5;
        ctl.last_blink = 0.0;
        let rays = RayBank::new();
        // now - last_blink = 0.1 < refractory 0.2
        step_with(&mut ctl, 0.1, 0.05, &rays, vec![msg(0.0, 1.0)], &mut act, &mut r);
        assert!((ctl.counter - 0.5 * 0.99).abs() < 1e-6);
    }

    #[test]
    fn firing_blinks_and_recharges() {
        let (mut ctl, mut act, mut r) = make();
        ctl.counter = 0.1;
        ctl.last_blink = -10.0;
        let rays = RayBank::new();
        step_with(&mut ctl, 5.0, 0.05, &rays, Vec::new(), &mut act, &mut r);
        assert!(act.broadcast);
        assert_eq!(act.color, BODY_FIRING);
        assert_eq!(ctl.counter, 1.0);
        assert_eq!(ctl.last_blink, 5.0);
    }

    #[test]
    fn coupling_advances_the_next_blink() {
        let rays = RayBank::new();
        let run = |with_pulses: bool| -> u32 {
            let (mut ctl, mut act, mut r) = make();
            ctl.counter = 0.5;
            ctl.last_blink = -10.0;
            let mut steps = 0;
            loop {
                steps += 1;
                let now = steps as f32 * 0.05;
                let inbox = if with_pulses && steps % 10 == 0 {
                    vec![msg(0.0, 1.0)]
                } else {
                    Vec::new()
                };
                step_with(&mut ctl, now, 0.05, &rays, inbox, &mut act, &mut r);
                if act.broadcast {
                    return steps;
                }
            }
        };
        assert!(run(true) < run(false));
    }

    #[test]
    fn reset_draws_a_random_phase() {
        let mut ctl = Firefly::new(FireflyConfig::default()).unwrap();
        let mut act = Actuators::new(0);
        let mut a = rng(1);
        let mut b = rng(2);
        ctl.reset(&mut act, &mut a);
        let first = ctl.counter;
        ctl.reset(&mut act, &mut b);
        assert_ne!(first, ctl.counter);
        assert!((0.0..1.0).contains(&ctl.counter));
        assert_eq!(ctl.last_blink, -ctl.cfg.refractory);
    }
}

mod desync {
    use super::*;

    fn make(cfg: ElectricDesyncConfig) -> (ElectricDesync, Actuators, AgentRng) {
        let mut ctl = ElectricDesync::new(cfg).unwrap();
        let mut act = Actuators::new(4);
        let mut r = rng(31);
        ctl.reset(&mut act, &mut r);
        (ctl, act, r)
    }

    fn step_desync(
        ctl: &mut ElectricDesync,
        now: f32,
        currents: &[f32],
        act: &mut Actuators,
        r: &mut AgentRng,
    ) {
        let rays = RayBank::new();
        act.begin_step();
        let mut senses = Senses::new(now, 0.05, &rays, Vec::new(), currents);
        ctl.step(&mut senses, act, r);
    }

    #[test]
    fn passive_phase_stays_depolarized() {
        let (mut ctl, mut act, mut r) = make(ElectricDesyncConfig::default());
        ctl.counter = 1.0;
        step_desync(&mut ctl, 0.05, &[0.0; 4], &mut act, &mut r);
        assert!(act.polarization.iter().all(|&p| p == 0.0));
        assert!((ctl.counter - 1.05).abs() < 1e-5);
        assert!(act.broadcast);
    }

    #[test]
    fn sensed_current_delays_the_cycle() {
        let cfg = ElectricDesyncConfig { penalty_gain: 2.0, ..ElectricDesyncConfig::default() };
        let (mut ctl, mut act, mut r) = make(cfg);
        ctl.counter = 1.0;
        step_desync(&mut ctl, 0.05, &[0.0, 0.3, 0.0, 0.0], &mut act, &mut r);
        // +dt then -2*dt: a net delay of one timestep.
        assert!((ctl.counter - 0.95).abs() < 1e-5);
        assert_eq!(act.color, BODY_DELAYED);
    }

    #[test]
    fn noise_floor_filters_tiny_currents() {
        let (mut ctl, mut act, mut r) = make(ElectricDesyncConfig::default());
        ctl.counter = 1.0;
        step_desync(&mut ctl, 0.05, &[1.0e-9; 4], &mut act, &mut r);
        assert!((ctl.counter - 1.05).abs() < 1e-5);
        assert_ne!(act.color, BODY_DELAYED);
    }

    #[test]
    fn active_phase_polarizes_electrode_zero() {
        let (mut ctl, mut act, mut r) = make(ElectricDesyncConfig::default());
        ctl.counter = 15.0;
        step_desync(&mut ctl, 0.05, &[0.5; 4], &mut act, &mut r);
        assert_eq!(act.polarization[0], 1.0);
        assert!(act.polarization[1..].iter().all(|&p| p == 0.0));
        assert_eq!(act.color, BODY_FIRING);
        // Currents are not sampled while active; no penalty applied.
        assert!((ctl.counter - 15.05).abs() < 1e-4);
    }

    #[test]
    fn ceiling_hard_resets_the_cycle() {
        let (mut ctl, mut act, mut r) = make(ElectricDesyncConfig::default());
        ctl.counter = 19.99;
        step_desync(&mut ctl, 0.05, &[0.0; 4], &mut act, &mut r);
        assert_eq!(ctl.counter, 0.0);
        assert!(act.polarization.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn config_rejects_inverted_window() {
        let bad = ElectricDesyncConfig {
            threshold: 20.0,
            ceiling: 10.0,
            ..ElectricDesyncConfig::default()
        };
        assert!(ElectricDesync::new(bad).is_err());
    }

    #[test]
    fn reset_phase_is_below_threshold() {
        let (ctl, _, _) = make(ElectricDesyncConfig::default());
        assert!(ctl.counter < ctl.cfg.threshold);
        assert!(!ctl.active());
    }

    #[test]
    fn turn_leg_carries_no_thrust() {
        let (mut ctl, mut act, mut r) = make(ElectricDesyncConfig::default());
        ctl.fsm.enter_turn(0.0, std::f32::consts::PI, ctl.cfg.turn_speed);
        assert!(!ctl.fsm.timer.expired(0.05));
        step_desync(&mut ctl, 0.05, &[0.0; 4], &mut act, &mut r);
        assert_eq!(ctl.fsm.phase, Phase::Turn);
        assert_eq!(act.propulsion, Propulsion::STOP);
    }

    #[test]
    fn threshold_boundary_is_still_passive() {
        let (mut ctl, mut act, mut r) = make(ElectricDesyncConfig::default());
        ctl.counter = ctl.cfg.threshold;
        assert!(!ctl.active());

        // 9.75 + 0.25 lands exactly on the 10.0 threshold; the unit must
        // stay depolarized and still accept the delay penalty.
        ctl.counter = 9.75;
        let rays = RayBank::new();
        act.begin_step();
        let currents = [0.5f32; 4];
        let mut senses = Senses::new(0.25, 0.25, &rays, Vec::new(), &currents);
        ctl.step(&mut senses, &mut act, &mut r);
        assert!(act.polarization.iter().all(|&p| p == 0.0));
        assert_eq!(act.color, BODY_DELAYED);
        assert!((ctl.counter - 9.75).abs() < 1e-5);
    }
}
