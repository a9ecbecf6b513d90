//! The `Sim` struct and its tick loop.

use swarm_behavior::{Actuators, Controller, Senses};
use swarm_core::{AgentId, SimClock, SimConfig, Vec2};
use swarm_percept::{BroadcastChannel, ElectricField};

use crate::world::{RayField, integrate};
use crate::{AgentRngs, Pose, SimObserver};

/// The lock-step simulation runner.
///
/// `Sim<C, F>` holds all simulation state and drives the three-phase tick
/// loop:
///
/// 1. **Sense & step**: cast rays for each agent, hand it the mailbox the
///    previous tick delivered, and run its controller.  Because every input
///    was buffered at the end of the previous tick and each controller owns
///    its state, the iteration order is immaterial.
/// 2. **Actuate**: sanitize propulsion, stage requested broadcasts, record
///    electrode polarization, and integrate the differential-drive
///    kinematics.
/// 3. **Deliver**: materialize staged broadcasts into next tick's
///    mailboxes and recompute induced electric-sense currents.  Mail the
///    controllers did not read this tick is discarded here.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<C: Controller, F: RayField> {
    /// Global configuration (total ticks, seed, timestep, …).
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick and maps to seconds.
    pub clock: SimClock,

    /// The environment the proximity rays see.
    pub field: F,

    /// One controller per agent, indexed by `AgentId`.
    pub controllers: Vec<C>,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// Per-agent poses, indexed by `AgentId`.
    pub poses: Vec<Pose>,

    /// Per-agent latched actuator state.
    pub actuators: Vec<Actuators>,

    /// The shared optical broadcast medium.
    pub channel: BroadcastChannel,

    /// The shared electric-sense medium.
    pub efield: ElectricField,

    // Scratch for the delivery phase, reused across ticks.
    positions: Vec<Vec2>,
    headings: Vec<f32>,
}

impl<C: Controller, F: RayField> Sim<C, F> {
    // ── Public API ────────────────────────────────────────────────────────

    pub(crate) fn new(
        config: SimConfig,
        field: F,
        controllers: Vec<C>,
        rngs: AgentRngs,
        poses: Vec<Pose>,
        actuators: Vec<Actuators>,
        channel: BroadcastChannel,
        efield: ElectricField,
    ) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            field,
            controllers,
            rngs,
            poses,
            actuators,
            channel,
            efield,
            positions: Vec::new(),
            headings: Vec::new(),
        }
    }

    #[inline]
    pub fn agent_count(&self) -> usize {
        self.controllers.len()
    }

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }

            observer.on_tick_start(now);
            let broadcasts = self.process_tick();
            observer.on_tick_end(now, broadcasts);
            if self.config.snapshot_interval_ticks > 0
                && now.0.is_multiple_of(self.config.snapshot_interval_ticks)
            {
                observer.on_snapshot(now, &self.poses, &self.actuators);
            }

            self.clock.advance();
        }
        observer.on_sim_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            let now = self.clock.current_tick;
            observer.on_tick_start(now);
            let broadcasts = self.process_tick();
            observer.on_tick_end(now, broadcasts);
            if self.config.snapshot_interval_ticks > 0
                && now.0.is_multiple_of(self.config.snapshot_interval_ticks)
            {
                observer.on_snapshot(now, &self.poses, &self.actuators);
            }
            self.clock.advance();
        }
    }

    // ── Core tick processing ──────────────────────────────────────────────

    /// Returns the number of broadcasts staged during the tick.
    fn process_tick(&mut self) -> usize {
        let now = self.clock.now();
        let timestep = self.clock.timestep_secs;
        let count = self.controllers.len();

        // ── Phase 1: sense and step ───────────────────────────────────────
        //
        // Every input here — mailboxes, induced currents — was buffered at
        // the end of the previous tick, so the order controllers run in
        // cannot influence the result.
        for i in 0..count {
            let agent = AgentId(i as u32);
            let rays = self.field.cast(&self.poses[i]);
            let inbox = self.channel.take_inbox(agent);
            let act = &mut self.actuators[i];
            act.begin_step();
            let mut senses = Senses::new(now, timestep, &rays, inbox, self.efield.currents(i));
            self.controllers[i].step(&mut senses, act, self.rngs.get_mut(agent));
        }

        // ── Phase 2: actuate ──────────────────────────────────────────────
        let mut broadcasts = 0;
        for i in 0..count {
            let act = &mut self.actuators[i];
            act.propulsion = act.propulsion.sanitize();
            if act.broadcast {
                self.channel.stage(AgentId(i as u32));
                broadcasts += 1;
            }
            self.efield.set_polarization(i, &act.polarization);
            integrate(&mut self.poses[i], act.propulsion, timestep);
        }

        // ── Phase 3: end-of-tick delivery ─────────────────────────────────
        //
        // Broadcasts staged this tick land in the mailboxes controllers will
        // read next tick; anything left unread from the previous delivery is
        // discarded inside `deliver`.
        self.positions.clear();
        self.headings.clear();
        for pose in &self.poses {
            self.positions.push(pose.position);
            self.headings.push(pose.heading);
        }
        self.channel.deliver(&self.positions, &self.headings);
        self.efield.induce(&self.positions);

        broadcasts
    }
}
