//! Proximity-ray identifiers and per-agent readings.
//!
//! Every mobile unit carries six fixed proximity rays.  The two
//! downward-angled front rays participate in the side averages but are
//! excluded from obstacle *detection*: near the bottom they constantly
//! return ground hits that are not obstacles.  The exclusion is expressed
//! by ray role ([`Ray::OBSTACLE_DETECTING`]), not by magic indices.

/// One of the six fixed proximity rays.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ray {
    /// Forward-left, angled up.
    FrontLeftUp,
    /// Forward-left, angled down toward the bottom.
    FrontLeftDown,
    /// Straight left.
    Left,
    /// Forward-right, angled up.
    FrontRightUp,
    /// Forward-right, angled down toward the bottom.
    FrontRightDown,
    /// Straight right.
    Right,
}

impl Ray {
    /// All six rays, left side first.
    pub const ALL: [Ray; 6] = [
        Ray::FrontLeftUp,
        Ray::FrontLeftDown,
        Ray::Left,
        Ray::FrontRightUp,
        Ray::FrontRightDown,
        Ray::Right,
    ];

    /// Rays whose hit flags count as "obstacle perceived".  The
    /// downward-angled pair is deliberately absent.
    pub const OBSTACLE_DETECTING: [Ray; 4] =
        [Ray::FrontLeftUp, Ray::FrontRightUp, Ray::Left, Ray::Right];

    /// Index into the fixed-size reading arrays.
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Ray::FrontLeftUp => 0,
            Ray::FrontLeftDown => 1,
            Ray::Left => 2,
            Ray::FrontRightUp => 3,
            Ray::FrontRightDown => 4,
            Ray::Right => 5,
        }
    }

    /// `true` for the three rays on the port side.
    #[inline]
    pub fn is_left_side(self) -> bool {
        matches!(self, Ray::FrontLeftUp | Ray::FrontLeftDown | Ray::Left)
    }

    /// `true` for the downward-angled pair.
    #[inline]
    pub fn is_downward(self) -> bool {
        matches!(self, Ray::FrontLeftDown | Ray::FrontRightDown)
    }

    /// Azimuth of the ray relative to the unit's heading, radians
    /// (counter-clockwise positive).  The up/down pairs share an azimuth and
    /// differ only in elevation.
    pub fn azimuth(self) -> f32 {
        use std::f32::consts::FRAC_PI_2;
        const FRONT: f32 = FRAC_PI_2 / 3.0; // 30° off the nose
        match self {
            Ray::FrontLeftUp | Ray::FrontLeftDown => FRONT,
            Ray::Left => FRAC_PI_2,
            Ray::FrontRightUp | Ray::FrontRightDown => -FRONT,
            Ray::Right => -FRAC_PI_2,
        }
    }
}

// ── RayBank ───────────────────────────────────────────────────────────────────

/// One agent's proximity readings for the current step.
///
/// Values are normalized proximities in `[0, 1]` (1 = touching).  Malformed
/// caller input (negative or non-finite values) is clamped to zero at
/// [`set`](RayBank::set) so it can never reach actuation.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RayBank {
    values: [f32; 6],
    hits: [bool; 6],
}

impl RayBank {
    /// All-zero bank: nothing perceived.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one ray's reading, sanitizing the value at the boundary.
    pub fn set(&mut self, ray: Ray, value: f32, hit: bool) {
        let v = if value.is_finite() { value.max(0.0) } else { 0.0 };
        self.values[ray.index()] = v;
        self.hits[ray.index()] = hit;
    }

    #[inline]
    pub fn value(&self, ray: Ray) -> f32 {
        self.values[ray.index()]
    }

    #[inline]
    pub fn has_hit(&self, ray: Ray) -> bool {
        self.hits[ray.index()]
    }

    /// Mean of the three left-side readings (downward ray included).
    pub fn left_mean(&self) -> f32 {
        (self.value(Ray::FrontLeftUp) + self.value(Ray::FrontLeftDown) + self.value(Ray::Left))
            / 3.0
    }

    /// Mean of the three right-side readings (downward ray included).
    pub fn right_mean(&self) -> f32 {
        (self.value(Ray::FrontRightUp) + self.value(Ray::FrontRightDown) + self.value(Ray::Right))
            / 3.0
    }

    /// `true` if any obstacle-detecting ray reports a hit.
    ///
    /// Downward rays never trigger this, whatever their flags say.
    pub fn obstacle_perceived(&self) -> bool {
        Ray::OBSTACLE_DETECTING.iter().any(|&r| self.has_hit(r))
    }
}
