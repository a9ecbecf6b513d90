//! Broadcast message payload.

use swarm_core::Vec2;

/// One received broadcast: where it came from and how far away.
///
/// Messages are transient — created at delivery, consumed (or discarded)
/// within the following step, never persisted.  Each receiver gets its own
/// copy, so reading is non-destructive to other receivers.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Unit bearing from the receiver toward the sender, in the receiver's
    /// body frame (x forward, y port).
    pub direction: Vec2,
    /// Distance from receiver to sender, world units.  Never negative.
    pub distance: f32,
}

impl Message {
    /// Build a message, sanitizing at the boundary: the direction is
    /// normalized with non-finite components zeroed, the distance clamped
    /// to `>= 0`.
    pub fn new(direction: Vec2, distance: f32) -> Self {
        let distance = if distance.is_finite() { distance.max(0.0) } else { 0.0 };
        Self {
            direction: direction.sanitize().normalized(),
            distance,
        }
    }
}
