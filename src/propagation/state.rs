//! Core state types for orbit propagation
//!
//! Provides the 3D vector alias used throughout the crate, the two
//! equivalent orbital state representations (Cartesian state vectors and
//! Keplerian orbital elements), the central-body description, and the
//! physical constants.

use nalgebra::Vector3;

/// Dense 3-component double-precision vector.
///
/// All positions are in kilometers and all velocities in km/s unless a
/// function documents otherwise (the element conversions work in meters
/// internally).
pub type Vec3 = Vector3<f64>;

/// Gravitational constant in m³ kg⁻¹ s⁻².
pub const G: f64 = 6.67430e-11;

/// Absolute per-component tolerance for vector comparisons.
///
/// Absorbs floating-point round-off when comparing propagated states;
/// test comparisons rely on this exact value.
pub const VEC_TOLERANCE: f64 = 1e-8;

/// Crate-local extensions over [`Vec3`].
pub trait Vec3Ext {
    /// Render as `"[x  y  z]"` with fixed notation, exactly 8 decimal
    /// digits, and two spaces between components.
    ///
    /// This format is shared by the text table output and any export
    /// consumers, so it must stay byte-stable.
    fn to_text(&self) -> String;

    /// Component-wise equality with absolute tolerance [`VEC_TOLERANCE`].
    fn approx_eq(&self, other: &Vec3) -> bool;
}

impl Vec3Ext for Vec3 {
    fn to_text(&self) -> String {
        format!("[{:.8}  {:.8}  {:.8}]", self.x, self.y, self.z)
    }

    fn approx_eq(&self, other: &Vec3) -> bool {
        (self.x - other.x).abs() < VEC_TOLERANCE
            && (self.y - other.y).abs() < VEC_TOLERANCE
            && (self.z - other.z).abs() < VEC_TOLERANCE
    }
}

/// Cartesian state vector pair at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianState {
    /// Position in km.
    pub pos: Vec3,
    /// Velocity in km/s.
    pub vel: Vec3,
}

impl CartesianState {
    pub fn new(pos: Vec3, vel: Vec3) -> Self {
        Self { pos, vel }
    }
}

/// Classical Keplerian orbital elements of an elliptical two-body orbit.
///
/// Invariant: `0 <= eccentricity < 1`. Parabolic and hyperbolic orbits
/// are rejected wherever elements enter the system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerianElements {
    /// Eccentricity, dimensionless.
    pub eccentricity: f64,
    /// Semi-major axis in km.
    pub semi_major_axis: f64,
    /// Inclination in radians.
    pub inclination: f64,
    /// Right ascension of the ascending node in radians.
    pub raan: f64,
    /// Argument of periapsis in radians.
    pub arg_periapsis: f64,
    /// True anomaly in radians.
    pub true_anomaly: f64,
}

/// Massive central body the satellite orbits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialBody {
    /// Mass in kg.
    pub mass_kg: f64,
    /// Mean equatorial radius in km.
    pub radius_km: f64,
}

impl CelestialBody {
    /// Gravitational parameter GM in m³/s².
    pub fn mu(&self) -> f64 {
        G * self.mass_kg
    }
}

/// Earth as a central body.
pub const EARTH: CelestialBody = CelestialBody {
    mass_kg: 5.972e24,
    radius_km: 6378.137,
};
