//! Reactive obstacle avoidance from the six proximity rays.

use swarm_percept::{Propulsion, RayBank};

/// The shared avoidance law.  Purely reactive: no error states, no memory,
/// O(1) per step.
///
/// An obstacle is "perceived" only when one of the four obstacle-detecting
/// hit flags is set — the downward rays are excluded so the bottom never
/// registers as a wall — while the side proximities average all three rays
/// of each side.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleAvoider {
    /// Side-mean proximity above which the symmetric brake engages.
    pub threshold: f32,
    /// Magnitude of the proportional brake.
    pub brake_speed: f32,
    /// Magnitude of the avoidance pivot.
    pub avoid_speed: f32,
    /// Small additive term on both propellers during the pivot.  Breaks the
    /// deadlock of a perfectly symmetric approach; 0 or 0.01 depending on
    /// the variant.
    pub bias: f32,
}

impl Default for ObstacleAvoider {
    fn default() -> Self {
        Self {
            threshold: 0.05,
            brake_speed: 1.0,
            avoid_speed: 0.99,
            bias: 0.0,
        }
    }
}

impl ObstacleAvoider {
    /// Evaluate the law for this step's readings.
    ///
    /// `None` means no obstacle perceived — the caller proceeds with its
    /// own actuation.  `Some(cmd)` is an override the caller must apply
    /// instead of its nominal command.
    ///
    /// The steer stage always decides the final command: the symmetric
    /// brake computed for a two-sided close approach is overridden by it,
    /// so `pr == pl` resolves deterministically to a left turn, never to
    /// brake-only.  [`proportional_brake`](Self::proportional_brake)
    /// exposes the brake law itself.
    pub fn avoid(&self, rays: &RayBank) -> Option<Propulsion> {
        if !rays.obstacle_perceived() {
            return None;
        }

        let pl = rays.left_mean();
        let pr = rays.right_mean();

        // Turn away from the nearer side; ties turn left.
        let cmd = if pr >= pl {
            Propulsion::new(-self.avoid_speed + self.bias, self.avoid_speed + self.bias)
        } else {
            Propulsion::new(self.avoid_speed + self.bias, -self.avoid_speed + self.bias)
        };
        Some(cmd)
    }

    /// Proportional symmetric brake for a two-sided approach: each side
    /// brakes proportionally to the *opposite* side's proximity, biasing
    /// the decelerating turn away from the nearer obstacle.
    ///
    /// `None` unless both side means exceed the threshold.
    pub fn proportional_brake(&self, pl: f32, pr: f32) -> Option<Propulsion> {
        if pr > self.threshold && pl > self.threshold {
            Some(Propulsion::new(
                -self.brake_speed * pr / (pr + pl),
                -self.brake_speed * pl / (pr + pl),
            ))
        } else {
            None
        }
    }
}
