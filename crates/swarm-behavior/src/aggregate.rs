//! Per-step reduction of the broadcast inbox.

use swarm_core::Vec2;
use swarm_percept::{Message, Propulsion};

/// Degrees-to-radians bounds of the four-way steering bucket.
const AHEAD_LIMIT: f32 = 30.0 * std::f32::consts::PI / 180.0;
const BEHIND_LIMIT: f32 = 150.0 * std::f32::consts::PI / 180.0;

// ── MessageSummary ────────────────────────────────────────────────────────────

/// What one step's worth of received broadcasts amounts to.
///
/// Derived fresh every step from the drained inbox and never carried over.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MessageSummary {
    /// Messages received this step.
    pub count: usize,
    /// Arithmetic mean of the message bearing vectors.  Zero — not an
    /// error, and never a division by zero — when `count == 0`.
    pub mean_bearing: Vec2,
    /// Messages whose sender was closer than the close range.
    pub close_neighbors: usize,
}

impl MessageSummary {
    /// Close-neighbor distance used by the fish units.
    pub const DEFAULT_CLOSE_RANGE: f32 = 0.4;

    /// Reduce the whole inbox.  Consumes the messages — after this call the
    /// mailbox for the step is empty by construction.
    pub fn collect(messages: Vec<Message>, close_range: f32) -> Self {
        let count = messages.len();
        let mut sum = Vec2::ZERO;
        let mut close = 0;
        for msg in &messages {
            sum += msg.direction;
            if msg.distance < close_range {
                close += 1;
            }
        }
        let mean_bearing = if count > 0 {
            sum.scaled(1.0 / count as f32)
        } else {
            Vec2::ZERO
        };
        Self {
            count,
            mean_bearing,
            close_neighbors: close,
        }
    }
}

// ── Bearing steering ──────────────────────────────────────────────────────────

/// Four-way angular-bucket steering toward a body-frame bearing.
///
/// Within ±30° of dead ahead: slow forward crawl (`speed * crawl_coeff`).
/// Beyond ±150°: slow reverse crawl.  Anything else: pivot at full `speed`,
/// with the side chosen by the sign of the bearing's y component.  The
/// crawl legs keep the approach smooth and stop the unit spinning when the
/// target is already near dead ahead or dead astern.
///
/// A zero bearing has heading 0 and therefore crawls forward.
pub fn steer_toward_bearing(bearing: Vec2, speed: f32, crawl_coeff: f32) -> Propulsion {
    let angle = bearing.heading();
    if angle.abs() < AHEAD_LIMIT {
        Propulsion::forward(speed * crawl_coeff)
    } else if angle.abs() > BEHIND_LIMIT {
        Propulsion::forward(-speed * crawl_coeff)
    } else if bearing.y < 0.0 {
        Propulsion::new(-speed, speed)
    } else {
        Propulsion::new(speed, -speed)
    }
}
