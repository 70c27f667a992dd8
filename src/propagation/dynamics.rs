//! Equations of motion driving the integrators
//!
//! The state-space system is `dx/dt = v`, `dv/dt = -x/|x|³` in
//! normalized units (unit gravitational parameter after
//! nondimensionalization). The two derivative orders are kept as
//! separate methods because velocity Verlet treats them asymmetrically:
//! the half-step update applies only to the order-2 equation.

use super::state::Vec3;

/// Right-hand sides of the coupled first-order system, by derivative
/// order.
///
/// Integrators call through this seam only, so a different force law can
/// be substituted without touching any integrator code.
pub trait Dynamics {
    /// Order-1 equation: rate of change of position, given velocity.
    fn position_rate(&self, vel: Vec3) -> Vec3;

    /// Order-2 equation: acceleration, given position (normalized units).
    fn acceleration(&self, pos: Vec3) -> Vec3;
}

/// Inverse-square gravity of a single central body, in units where the
/// gravitational parameter is 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoBodyGravity;

impl Dynamics for TwoBodyGravity {
    fn position_rate(&self, vel: Vec3) -> Vec3 {
        vel
    }

    fn acceleration(&self, pos: Vec3) -> Vec3 {
        let r = pos.norm();
        -pos / (r * r * r)
    }
}
