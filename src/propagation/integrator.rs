//! Fixed-step numerical integrators for orbit propagation
//!
//! Three stepping algorithms share one integrator body: explicit Euler,
//! velocity Verlet, and classical 4th-order Runge-Kutta. The integrator
//! owns the three result arrays (time, position, velocity) and the
//! normalization constants used to nondimensionalize the state while
//! stepping; positions and velocities are stored in km and km/s and only
//! held in normalized units transiently inside `integrate()`.

use std::str::FromStr;

use super::dynamics::{Dynamics, TwoBodyGravity};
use super::error::{Error, Result};
use super::state::{CelestialBody, Vec3, G};

/// Default floor on the orbital radius before a run is declared
/// numerically unstable, in km.
pub const DEFAULT_MIN_RADIUS_KM: f64 = 1e-6;

/// Stepping algorithm selection.
///
/// The set is closed: the factory's valid-name set is fixed, so no open
/// extension point exists beyond these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Explicit Euler, first order. Cheapest, drifts fastest.
    Euler,
    /// Velocity Verlet, second order and symplectic.
    Verlet,
    /// Classical 4-stage Runge-Kutta, fourth order.
    Rk4,
}

impl Scheme {
    /// Display name, also the factory lookup key.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Euler => "Euler",
            Self::Verlet => "Verlet",
            Self::Rk4 => "RK4",
        }
    }

    /// Order of the method (for error estimation).
    pub fn order(&self) -> u8 {
        match self {
            Self::Euler => 1,
            Self::Verlet => 2,
            Self::Rk4 => 4,
        }
    }

    /// All available schemes.
    pub fn all() -> &'static [Scheme] {
        &[Self::Euler, Self::Verlet, Self::Rk4]
    }
}

impl FromStr for Scheme {
    type Err = Error;

    // Lookup keys are case-sensitive: they double as display names.
    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Euler" => Ok(Self::Euler),
            "Verlet" => Ok(Self::Verlet),
            "RK4" => Ok(Self::Rk4),
            other => Err(Error::invalid(format!(
                "unknown integrator '{}': expected one of Euler, Verlet, RK4",
                other
            ))),
        }
    }
}

/// Fixed-step integrator bound to a central body, an initial state, and
/// a time span.
///
/// Lifecycle: construction validates the time window and step count,
/// seeds index 0 of the position/velocity arrays, and derives the
/// normalization constants; `integrate()` then fills indices
/// `1..steps-1` from index 0. The arrays are read-only to callers.
///
/// Deep copies are structural: `Clone` reproduces the full numeric
/// state, including already-computed arrays.
#[derive(Debug, Clone)]
pub struct Integrator<D: Dynamics = TwoBodyGravity> {
    scheme: Scheme,
    dynamics: D,

    mass_kg: f64,
    radius_km: f64,

    t_start: f64,
    t_end: f64,
    steps: usize,
    delta_t: f64,

    time: Vec<f64>,   // [s]
    pos: Vec<Vec3>,   // [km]
    vel: Vec<Vec3>,   // [km/s]

    // Norming constants for dimensionless units, derived once from the
    // central body
    r_dim: f64, // [km]
    v_dim: f64, // [km/s]
    t_dim: f64, // [s]

    min_radius_km: f64,
}

impl Integrator<TwoBodyGravity> {
    /// Name-keyed factory: the single point of integrator-type
    /// selection. Accepts exactly `"Euler"`, `"Verlet"`, and `"RK4"`.
    pub fn from_name(
        name: &str,
        body: CelestialBody,
        x0: Vec3,
        v0: Vec3,
        t_start: f64,
        t_end: f64,
        steps: usize,
    ) -> Result<Self> {
        let scheme = name.parse()?;
        Self::new(scheme, TwoBodyGravity, body, x0, v0, t_start, t_end, steps)
    }
}

impl<D: Dynamics> Integrator<D> {
    /// Construct an integrator from initial conditions.
    ///
    /// `x0` is in km, `v0` in km/s, the time window in seconds.
    /// Validation failures leave nothing constructed.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        scheme: Scheme,
        dynamics: D,
        body: CelestialBody,
        x0: Vec3,
        v0: Vec3,
        t_start: f64,
        t_end: f64,
        steps: usize,
    ) -> Result<Self> {
        validate_window(t_start, t_end)?;
        validate_steps(steps)?;

        let r_dim = body.radius_km;
        let v_dim = ((body.mass_kg * G) / (1000.0 * body.radius_km)).sqrt() / 1000.0;
        let t_dim = r_dim / v_dim;

        let delta_t = grid_spacing(t_start, t_end, steps);

        let mut pos = vec![Vec3::zeros(); steps];
        let mut vel = vec![Vec3::zeros(); steps];
        pos[0] = x0;
        vel[0] = v0;

        Ok(Self {
            scheme,
            dynamics,
            mass_kg: body.mass_kg,
            radius_km: body.radius_km,
            t_start,
            t_end,
            steps,
            delta_t,
            time: time_grid(t_start, delta_t, steps),
            pos,
            vel,
            r_dim,
            v_dim,
            t_dim,
            min_radius_km: DEFAULT_MIN_RADIUS_KM,
        })
    }

    /// Override the instability floor on the orbital radius.
    pub fn with_min_radius_km(mut self, min_radius_km: f64) -> Self {
        self.min_radius_km = min_radius_km;
        self
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }

    /// Timestamps in seconds, `time()[i] = t_start + i * delta_t`.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Positions in km; index 0 is the seeded initial position.
    pub fn positions(&self) -> &[Vec3] {
        &self.pos
    }

    /// Velocities in km/s; index 0 is the seeded initial velocity.
    pub fn velocities(&self) -> &[Vec3] {
        &self.vel
    }

    /// Change the step count, reallocating the result arrays.
    ///
    /// Slot 0 keeps the seeded initial state; previously computed
    /// samples are discarded and the time grid is refreshed from the
    /// stored window.
    pub fn set_steps(&mut self, steps: usize) -> Result<()> {
        validate_steps(steps)?;
        let x0 = self.pos[0];
        let v0 = self.vel[0];

        self.steps = steps;
        self.delta_t = grid_spacing(self.t_start, self.t_end, steps);
        self.time = time_grid(self.t_start, self.delta_t, steps);
        self.pos = vec![Vec3::zeros(); steps];
        self.vel = vec![Vec3::zeros(); steps];
        self.pos[0] = x0;
        self.vel[0] = v0;
        Ok(())
    }

    /// Recompute the step size from a new time window, keeping the
    /// current step count.
    pub fn set_delta_t(&mut self, t_start: f64, t_end: f64) -> Result<()> {
        validate_window(t_start, t_end)?;
        self.t_start = t_start;
        self.t_end = t_end;
        self.delta_t = grid_spacing(t_start, t_end, self.steps);
        self.time = time_grid(t_start, self.delta_t, self.steps);
        Ok(())
    }

    /// Overwrite the initial position (slot 0 only), in km.
    pub fn set_x0(&mut self, x0: Vec3) {
        self.pos[0] = x0;
    }

    /// Overwrite the initial velocity (slot 0 only), in km/s.
    pub fn set_v0(&mut self, v0: Vec3) {
        self.vel[0] = v0;
    }

    /// Run the fixed-step loop, filling indices `1..steps-1` from the
    /// seeded slot 0.
    ///
    /// The initial state and step size are nondimensionalized before
    /// the loop; each slot is converted back to physical units only
    /// after the next slot has been computed, because the update
    /// formula for slot `i + 1` still reads slot `i` in normalized
    /// units. Fails with [`Error::NumericalInstability`] if the radius
    /// collapses below the configured floor or the state goes
    /// non-finite, leaving every filled slot in physical units.
    pub fn integrate(&mut self) -> Result<()> {
        let h = self.delta_t / self.t_dim;
        let min_radius = self.min_radius_km / self.r_dim;

        self.pos[0] /= self.r_dim;
        self.vel[0] /= self.v_dim;

        for i in 0..self.steps - 1 {
            let radius = self.pos[i].norm();
            if !radius.is_finite() || !self.vel[i].norm().is_finite() || radius < min_radius {
                // Restore physical units on the slot still in flight
                // before surfacing the failure.
                self.pos[i] *= self.r_dim;
                self.vel[i] *= self.v_dim;
                let radius_km = radius * self.r_dim;
                log::warn!(
                    "instability at step {}/{}: radius {:.6e} km",
                    i,
                    self.steps,
                    radius_km
                );
                return Err(Error::NumericalInstability { step: i, radius_km });
            }

            let (x_next, v_next) = match self.scheme {
                Scheme::Euler => euler_step(&self.dynamics, self.pos[i], self.vel[i], h),
                Scheme::Verlet => verlet_step(&self.dynamics, self.pos[i], self.vel[i], h),
                Scheme::Rk4 => rk4_step(&self.dynamics, self.pos[i], self.vel[i], h),
            };
            self.pos[i + 1] = x_next;
            self.vel[i + 1] = v_next;

            // Convert the finished slot back to kilometers
            self.pos[i] *= self.r_dim;
            self.vel[i] *= self.v_dim;
        }

        // Don't forget the last one
        self.pos[self.steps - 1] *= self.r_dim;
        self.vel[self.steps - 1] *= self.v_dim;

        Ok(())
    }
}

/// Explicit Euler update: both derivatives evaluated at the current
/// state.
fn euler_step<D: Dynamics>(dynamics: &D, x: Vec3, v: Vec3, h: f64) -> (Vec3, Vec3) {
    let x_next = x + dynamics.position_rate(v) * h;
    let v_next = v + dynamics.acceleration(x) * h;
    (x_next, v_next)
}

/// Velocity Verlet update: half-step kick, full-step drift, half-step
/// kick at the new position.
fn verlet_step<D: Dynamics>(dynamics: &D, x: Vec3, v: Vec3, h: f64) -> (Vec3, Vec3) {
    let v_half = v + dynamics.acceleration(x) * (h / 2.0);
    let x_next = x + dynamics.position_rate(v_half) * h;
    let v_next = v_half + dynamics.acceleration(x_next) * (h / 2.0);
    (x_next, v_next)
}

/// Classical RK4 update on the coupled `(x, v)` system.
fn rk4_step<D: Dynamics>(dynamics: &D, x: Vec3, v: Vec3, h: f64) -> (Vec3, Vec3) {
    let k1_pos = dynamics.position_rate(v);
    let k1_vel = dynamics.acceleration(x);

    let k2_pos = dynamics.position_rate(v + k1_vel * (h / 2.0));
    let k2_vel = dynamics.acceleration(x + k1_pos * (h / 2.0));

    let k3_pos = dynamics.position_rate(v + k2_vel * (h / 2.0));
    let k3_vel = dynamics.acceleration(x + k2_pos * (h / 2.0));

    let k4_pos = dynamics.position_rate(v + k3_vel * h);
    let k4_vel = dynamics.acceleration(x + k3_pos * h);

    let x_next = x + (k1_pos + 2.0 * k2_pos + 2.0 * k3_pos + k4_pos) / 6.0 * h;
    let v_next = v + (k1_vel + 2.0 * k2_vel + 2.0 * k3_vel + k4_vel) / 6.0 * h;
    (x_next, v_next)
}

fn validate_window(t_start: f64, t_end: f64) -> Result<()> {
    if t_start < 0.0 {
        return Err(Error::invalid("start time must not be negative"));
    }
    if t_end <= 0.0 {
        return Err(Error::invalid("end time must be positive"));
    }
    if t_start >= t_end {
        return Err(Error::invalid("start time must be smaller than end time"));
    }
    Ok(())
}

fn validate_steps(steps: usize) -> Result<()> {
    if steps == 0 {
        return Err(Error::invalid("steps must be a positive integer"));
    }
    Ok(())
}

/// Step size of the uniform grid; a single-sample grid has no spacing.
fn grid_spacing(t_start: f64, t_end: f64, steps: usize) -> f64 {
    if steps > 1 {
        (t_end - t_start) / (steps - 1) as f64
    } else {
        0.0
    }
}

fn time_grid(t_start: f64, delta_t: f64, steps: usize) -> Vec<f64> {
    (0..steps).map(|i| t_start + i as f64 * delta_t).collect()
}
