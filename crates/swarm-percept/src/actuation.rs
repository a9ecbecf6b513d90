//! Actuator command types.
//!
//! Commands latch like the physical devices: a propeller keeps the last
//! speed it was set to until something sets it again, so the stepping
//! authority persists these between ticks instead of resetting them.

/// Differential-drive propulsion command: left and right propeller speeds.
///
/// Positive drives forward; `(−s, +s)` yaws to port (left turn).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Propulsion {
    pub left: f32,
    pub right: f32,
}

impl Propulsion {
    /// Both propellers stopped — the defined fallback for invalid input.
    pub const STOP: Propulsion = Propulsion { left: 0.0, right: 0.0 };

    #[inline]
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Same speed on both sides.
    #[inline]
    pub fn forward(speed: f32) -> Self {
        Self { left: speed, right: speed }
    }

    /// Non-finite commands degrade to [`STOP`](Propulsion::STOP); the
    /// controller contract requires a defined propulsion every step.
    pub fn sanitize(self) -> Propulsion {
        if self.left.is_finite() && self.right.is_finite() {
            self
        } else {
            Propulsion::STOP
        }
    }
}

/// Advisory display color.  No behavioral effect; rendering and debugging
/// only.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::rgb(1.0, 1.0, 1.0)
    }
}
