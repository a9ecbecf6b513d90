//! The shared broadcast medium.
//!
//! Many senders, many receivers, range-limited, double-buffered: broadcasts
//! staged during a tick become visible to receivers only after
//! [`deliver`](BroadcastChannel::deliver) runs at the end of that tick, so
//! the result never depends on the order agents were stepped in.
//!
//! `deliver` is O(senders × local density): agent positions are bucketed
//! into a uniform grid with cell size equal to the transmission range, so a
//! sender only tests the nine cells around itself.

use rustc_hash::FxHashMap;

use swarm_core::{AgentId, Vec2};

use crate::Message;

/// How a unit's receiver admits incoming broadcasts.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReceiveMode {
    /// Admit from any bearing.
    Omnidirectional,
    /// Admit only within `half_angle` radians of the receiver's heading.
    Directional { half_angle: f32 },
}

/// The broadcast medium shared by the whole swarm.
pub struct BroadcastChannel {
    /// Transmission range, world units.
    range: f32,
    mode: ReceiveMode,
    /// Agents that broadcast during the current tick.
    staged: Vec<AgentId>,
    /// Per-receiver mailboxes, refilled at every delivery.
    mailboxes: Vec<Vec<Message>>,
}

impl BroadcastChannel {
    pub fn new(agent_count: usize, range: f32, mode: ReceiveMode) -> Self {
        Self {
            range: range.max(0.0),
            mode,
            staged: Vec::new(),
            mailboxes: vec![Vec::new(); agent_count],
        }
    }

    #[inline]
    pub fn range(&self) -> f32 {
        self.range
    }

    /// Queue a broadcast from `sender` for the end-of-tick delivery.
    #[inline]
    pub fn stage(&mut self, sender: AgentId) {
        self.staged.push(sender);
    }

    /// Number of broadcasts staged so far this tick.
    #[inline]
    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    /// Messages currently waiting for `agent`.
    #[inline]
    pub fn pending(&self, agent: AgentId) -> usize {
        self.mailboxes[agent.index()].len()
    }

    /// Hand `agent` its mailbox for this step.  The channel keeps nothing
    /// back: whatever the caller does not consume is simply dropped.
    #[inline]
    pub fn take_inbox(&mut self, agent: AgentId) -> Vec<Message> {
        std::mem::take(&mut self.mailboxes[agent.index()])
    }

    /// Materialize all staged broadcasts into per-receiver messages.
    ///
    /// Clears every mailbox first — a message from the previous delivery
    /// that was never read is discarded, never carried forward.  `positions`
    /// and `headings` must both have one entry per agent.
    pub fn deliver(&mut self, positions: &[Vec2], headings: &[f32]) {
        debug_assert_eq!(positions.len(), self.mailboxes.len());
        debug_assert_eq!(headings.len(), self.mailboxes.len());

        for mailbox in &mut self.mailboxes {
            mailbox.clear();
        }
        if self.staged.is_empty() {
            return;
        }
        if self.range == 0.0 {
            self.staged.clear();
            return;
        }

        // Bucket every agent once; senders probe the 3×3 neighborhood.
        let cell = self.range;
        let mut grid: FxHashMap<(i32, i32), Vec<usize>> = FxHashMap::default();
        for (i, p) in positions.iter().enumerate() {
            grid.entry(grid_key(*p, cell)).or_default().push(i);
        }

        let staged = std::mem::take(&mut self.staged);
        for sender in staged {
            let sp = positions[sender.index()];
            let (cx, cy) = grid_key(sp, cell);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy)) else {
                        continue;
                    };
                    for &recv in bucket {
                        if recv == sender.index() {
                            continue;
                        }
                        let rp = positions[recv];
                        let offset = sp - rp;
                        let distance = offset.length();
                        if distance > self.range {
                            continue;
                        }
                        // World bearing toward the sender, rotated into the
                        // receiver's body frame (x forward, y port).
                        let bearing = offset.heading() - headings[recv];
                        if let ReceiveMode::Directional { half_angle } = self.mode {
                            if wrap_angle(bearing).abs() > half_angle {
                                continue;
                            }
                        }
                        let direction = Vec2::from_angle(bearing);
                        self.mailboxes[recv].push(Message::new(direction, distance));
                    }
                }
            }
        }
    }
}

#[inline]
fn grid_key(p: Vec2, cell: f32) -> (i32, i32) {
    ((p.x / cell).floor() as i32, (p.y / cell).floor() as i32)
}

/// Wrap an angle into `(-π, π]`.
fn wrap_angle(a: f32) -> f32 {
    use std::f32::consts::PI;
    let mut a = a % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}
