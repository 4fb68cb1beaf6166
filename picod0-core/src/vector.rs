//! Minimal 3-vector used for vertices and momenta.

use std::ops::{Add, Mul, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cartesian 3-vector (cm for positions, GeV/c for momenta).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThreeVector {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl ThreeVector {
    /// Creates a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Scalar product.
    #[inline]
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Vector product.
    #[inline]
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Squared magnitude.
    #[inline]
    #[must_use]
    pub fn mag2(&self) -> f32 {
        self.dot(self)
    }

    /// Magnitude.
    #[inline]
    #[must_use]
    pub fn mag(&self) -> f32 {
        self.mag2().sqrt()
    }

    /// Transverse (xy-plane) magnitude.
    #[inline]
    #[must_use]
    pub fn perp(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Pseudorapidity, `-ln(tan(theta/2))`.
    #[must_use]
    pub fn pseudo_rapidity(&self) -> f32 {
        let pt = self.perp();
        if pt <= 0.0 {
            return if self.z >= 0.0 {
                f32::INFINITY
            } else {
                f32::NEG_INFINITY
            };
        }
        (self.z / pt).asinh()
    }

    /// Azimuthal angle in (-pi, pi].
    #[inline]
    #[must_use]
    pub fn phi(&self) -> f32 {
        self.y.atan2(self.x)
    }
}

impl Add for ThreeVector {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for ThreeVector {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for ThreeVector {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
