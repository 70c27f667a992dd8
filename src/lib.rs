//! satprop - two-body satellite orbit propagation
//!
//! Propagates a satellite around a massive central body by numerically
//! integrating Newton's law of gravitation with a family of fixed-step
//! integrators (explicit Euler, velocity Verlet, classical RK4), and
//! converts between Cartesian state vectors and Keplerian orbital
//! elements.
//!
//! # Example
//!
//! ```ignore
//! use satprop::{CartesianState, Satellite, Vec3, EARTH};
//!
//! let state = CartesianState {
//!     pos: Vec3::new(7000.0, 0.0, 0.0),     // km
//!     vel: Vec3::new(0.0, 7.546, 0.0),      // km/s
//! };
//! let mut sat = Satellite::from_cartesian(state, "RK4", EARTH, 0.0, 86400.0, 8641)?;
//! let data = sat.propagate()?;
//! print!("{}", data.to_table());
//! ```

pub mod propagation;

pub use propagation::dynamics::{Dynamics, TwoBodyGravity};
pub use propagation::elements::{cartesian_to_keplerian, keplerian_to_cartesian};
pub use propagation::error::{Error, Result};
pub use propagation::integrator::{Integrator, Scheme};
pub use propagation::satellite::{Satellite, SimData};
pub use propagation::state::{
    CartesianState, CelestialBody, KeplerianElements, Vec3, Vec3Ext, EARTH, G,
};
