//! Orbit propagation core
//!
//! Leaf-first layout: `state` holds the vector algebra and the two
//! equivalent orbital state representations, `dynamics` the equations of
//! motion, `elements` the Cartesian/Keplerian conversions, `integrator`
//! the fixed-step integrator family, and `satellite` the aggregate
//! entity that callers drive.

pub mod dynamics;
pub mod elements;
pub mod error;
pub mod integrator;
pub mod satellite;
pub mod state;

pub use dynamics::{Dynamics, TwoBodyGravity};
pub use elements::{cartesian_to_keplerian, keplerian_to_cartesian};
pub use error::{Error, Result};
pub use integrator::{Integrator, Scheme};
pub use satellite::{Satellite, SimData};
pub use state::{CartesianState, CelestialBody, KeplerianElements, Vec3, Vec3Ext, EARTH, G};
