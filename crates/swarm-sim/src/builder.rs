//! Fluent builder for constructing a [`Sim`].

use swarm_behavior::{Actuators, Controller};
use swarm_core::{SimConfig, Vec2};
use swarm_percept::{BroadcastChannel, ElectricField, ReceiveMode};

use crate::world::RayField;
use crate::{AgentRngs, Pose, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<C, F>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, timestep, …
/// - `F: RayField` — the environment (e.g. [`CircularTank`][crate::CircularTank])
/// - `Vec<C>` — one controller per agent (fixes the agent count)
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                       |
/// |--------------------|-------------------------------|
/// | `.positions(v)`    | All agents at the origin      |
/// | `.headings(v)`     | All headings 0                |
/// | `.comm_range(r)`   | 2.0                           |
/// | `.receive_mode(m)` | `ReceiveMode::Omnidirectional`|
/// | `.electrodes(n)`   | 0 (no electric sense)         |
/// | `.esense_range(r)` | 1.0                           |
///
/// # Example
///
/// ```rust,ignore
/// let controllers: Vec<Aggregation> = (0..20)
///     .map(|_| Aggregation::new(AggregationConfig::default()))
///     .collect::<Result<_, _>>()?;
/// let mut sim = SimBuilder::new(config, CircularTank::new(5.0, 0.5), controllers)
///     .positions(positions)
///     .comm_range(2.0)
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<C: Controller, F: RayField> {
    config:       SimConfig,
    field:        F,
    controllers:  Vec<C>,
    positions:    Option<Vec<Vec2>>,
    headings:     Option<Vec<f32>>,
    comm_range:   f32,
    receive_mode: ReceiveMode,
    electrodes:   usize,
    esense_range: f32,
}

impl<C: Controller, F: RayField> SimBuilder<C, F> {
    /// Create a builder with all required inputs.  The controller list
    /// fixes the agent count.
    pub fn new(config: SimConfig, field: F, controllers: Vec<C>) -> Self {
        Self {
            config,
            field,
            controllers,
            positions:    None,
            headings:     None,
            comm_range:   2.0,
            receive_mode: ReceiveMode::Omnidirectional,
            electrodes:   0,
            esense_range: 1.0,
        }
    }

    /// Supply initial positions (must be length `agent_count`).
    pub fn positions(mut self, positions: Vec<Vec2>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Supply initial headings in radians (must be length `agent_count`).
    pub fn headings(mut self, headings: Vec<f32>) -> Self {
        self.headings = Some(headings);
        self
    }

    /// Transmission range of the optical broadcast medium.
    pub fn comm_range(mut self, range: f32) -> Self {
        self.comm_range = range;
        self
    }

    /// Receiver admission rule of the optical medium.
    pub fn receive_mode(mut self, mode: ReceiveMode) -> Self {
        self.receive_mode = mode;
        self
    }

    /// Electrodes per agent.  Zero disables the electric-sense medium;
    /// controllers then see an empty current slice.
    pub fn electrodes(mut self, electrodes: usize) -> Self {
        self.electrodes = electrodes;
        self
    }

    /// Interaction range of the electric-sense medium.
    pub fn esense_range(mut self, range: f32) -> Self {
        self.esense_range = range;
        self
    }

    /// Validate inputs, seed the per-agent RNGs, reset every controller,
    /// and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<C, F>> {
        let agent_count = self.controllers.len();

        if !self.config.timestep_secs.is_finite() || self.config.timestep_secs <= 0.0 {
            return Err(SimError::Config(format!(
                "timestep_secs must be finite and positive, got {}",
                self.config.timestep_secs
            )));
        }
        if !self.comm_range.is_finite() || self.comm_range < 0.0 {
            return Err(SimError::Config(format!(
                "comm_range must be finite and non-negative, got {}",
                self.comm_range
            )));
        }

        // ── Validate and resolve optional inputs ──────────────────────────
        let positions = match self.positions {
            Some(p) => {
                if p.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      p.len(),
                        what:     "initial positions",
                    });
                }
                p
            }
            None => vec![Vec2::ZERO; agent_count],
        };

        let headings = match self.headings {
            Some(h) => {
                if h.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      h.len(),
                        what:     "initial headings",
                    });
                }
                h
            }
            None => vec![0.0; agent_count],
        };

        let poses: Vec<Pose> = positions
            .iter()
            .zip(&headings)
            .map(|(&p, &h)| Pose::new(p.sanitize(), h))
            .collect();

        // ── Seed RNGs, build media, reset controllers ─────────────────────
        let mut rngs = AgentRngs::new(agent_count, self.config.seed);
        let channel = BroadcastChannel::new(agent_count, self.comm_range, self.receive_mode);
        let efield = ElectricField::new(agent_count, self.electrodes, self.esense_range);

        let mut controllers = self.controllers;
        let mut actuators: Vec<Actuators> = (0..agent_count)
            .map(|_| Actuators::new(self.electrodes))
            .collect();
        for (i, ctl) in controllers.iter_mut().enumerate() {
            ctl.reset(&mut actuators[i], &mut rngs.inner[i]);
        }

        Ok(Sim::new(
            self.config,
            self.field,
            controllers,
            rngs,
            poses,
            actuators,
            channel,
            efield,
        ))
    }
}
