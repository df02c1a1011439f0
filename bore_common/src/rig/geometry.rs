//! Minimal world-space vector math for actuator classification.

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// World-space vector [m].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero/non-finite vector.
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if !len.is_finite() || len <= f64::EPSILON {
            return None;
        }
        Some(Self::new(self.x / len, self.y / len, self.z / len))
    }

    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// The rig's own orientation, expressed as unit vectors in world space.
///
/// Taken from the controlling block's world matrix by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFrame {
    pub up: Vec3,
    pub down: Vec3,
    pub forward: Vec3,
    pub backward: Vec3,
}

impl ReferenceFrame {
    /// Build a frame from its up and forward axes. Down and backward are the negations.
    ///
    /// Returns `None` if either axis is degenerate.
    pub fn from_up_forward(up: Vec3, forward: Vec3) -> Option<Self> {
        let up = up.normalized()?;
        let forward = forward.normalized()?;
        Some(Self {
            up,
            down: -up,
            forward,
            backward: -forward,
        })
    }
}

impl Default for ReferenceFrame {
    /// Z-up, X-forward.
    fn default() -> Self {
        Self {
            up: Vec3::UNIT_Z,
            down: -Vec3::UNIT_Z,
            forward: Vec3::UNIT_X,
            backward: -Vec3::UNIT_X,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_scales_to_unit_length() {
        let v = Vec3::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert!(Vec3::ZERO.normalized().is_none());
        assert!(Vec3::new(f64::NAN, 0.0, 0.0).normalized().is_none());
    }

    #[test]
    fn frame_from_axes() {
        let frame =
            ReferenceFrame::from_up_forward(Vec3::new(0.0, 2.0, 0.0), Vec3::UNIT_X).unwrap();
        assert_eq!(frame.up, Vec3::UNIT_Y);
        assert_eq!(frame.down, -Vec3::UNIT_Y);
        assert_eq!(frame.backward, -Vec3::UNIT_X);
        assert!(ReferenceFrame::from_up_forward(Vec3::ZERO, Vec3::UNIT_X).is_none());
    }
}
