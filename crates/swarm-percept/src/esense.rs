//! Electric-sense medium: polarization out, induced currents in.
//!
//! Sessile units carry an electrode array.  An agent that polarizes its
//! electrodes induces a current in every neighbor within range; a passive
//! agent reads those induced currents to detect active neighbors.  The
//! induction model here is a distance-attenuated sum — a stand-in, not
//! field physics — but it preserves the property the desynchronization
//! controller depends on: the induced current is nonzero exactly when some
//! neighbor in range is polarized.
//!
//! Like the optical channel, the field is double-buffered: polarization
//! written during tick *t* is visible in currents sampled at *t+1*.

use swarm_core::Vec2;

/// Per-agent electrode polarization and induced currents.
pub struct ElectricField {
    /// Interaction range, world units.
    range: f32,
    /// Electrodes per agent.
    electrodes: usize,
    /// Commanded polarization, one vector per agent.
    polarization: Vec<Vec<f32>>,
    /// Currents induced by neighbors, one vector per agent.
    currents: Vec<Vec<f32>>,
}

impl ElectricField {
    pub fn new(agent_count: usize, electrodes: usize, range: f32) -> Self {
        Self {
            range: range.max(0.0),
            electrodes,
            polarization: vec![vec![0.0; electrodes]; agent_count],
            currents: vec![vec![0.0; electrodes]; agent_count],
        }
    }

    #[inline]
    pub fn electrodes(&self) -> usize {
        self.electrodes
    }

    /// Record an agent's commanded polarization.  Non-finite components are
    /// zeroed at the boundary; extra components beyond the electrode count
    /// are ignored, missing ones read as zero.
    pub fn set_polarization(&mut self, agent: usize, values: &[f32]) {
        let pola = &mut self.polarization[agent];
        for e in 0..pola.len() {
            let v = values.get(e).copied().unwrap_or(0.0);
            pola[e] = if v.is_finite() { v } else { 0.0 };
        }
    }

    #[inline]
    pub fn polarization(&self, agent: usize) -> &[f32] {
        &self.polarization[agent]
    }

    /// Currents induced in `agent`'s electrodes by its neighbors, as of the
    /// last [`induce`](ElectricField::induce).
    #[inline]
    pub fn currents(&self, agent: usize) -> &[f32] {
        &self.currents[agent]
    }

    /// Recompute every agent's induced currents from all other agents'
    /// polarization.  An agent's own polarization does not contribute to
    /// its own reading.
    pub fn induce(&mut self, positions: &[Vec2]) {
        let n = positions.len();
        debug_assert_eq!(n, self.polarization.len());

        for i in 0..n {
            for e in 0..self.electrodes {
                self.currents[i][e] = 0.0;
            }
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = positions[i].distance(positions[j]);
                if d > self.range {
                    continue;
                }
                let atten = 1.0 / (1.0 + d * d);
                for e in 0..self.electrodes {
                    self.currents[i][e] += self.polarization[j][e] * atten;
                }
            }
        }
    }
}
