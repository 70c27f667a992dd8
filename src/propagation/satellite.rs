//! Satellite aggregate
//!
//! Owns the current orbital state in both representations, the active
//! integrator, and the time-domain parameters, and exposes the single
//! `propagate()` operation CLI/GUI layers call. The two representations
//! always describe the same physical state: whichever was set last is
//! authoritative and the other is recomputed synchronously within the
//! same mutation.

use super::elements::{cartesian_to_keplerian, keplerian_to_cartesian};
use super::error::Result;
use super::integrator::{Integrator, Scheme};
use super::state::{CartesianState, CelestialBody, KeplerianElements, Vec3, Vec3Ext};

/// Flat propagation result consumed by CLI/GUI/export collaborators.
///
/// Row `i` is the state at `time[i] = t_start + i * delta_t`. The
/// arrays are owned copies, detached from the integrator that produced
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct SimData {
    pub steps: usize,
    /// [s]
    pub time: Vec<f64>,
    /// [km]
    pub pos: Vec<Vec3>,
    /// [km/s]
    pub vel: Vec<Vec3>,
}

impl SimData {
    /// Render the trajectory as text, one `"pos vel"` row per sample in
    /// the fixed 8-decimal vector format.
    ///
    /// Only the first `steps - 1` rows are rendered; the final sample
    /// is omitted so text output and plot consumers see the same row
    /// count.
    pub fn to_table(&self) -> String {
        let mut out = String::new();
        for i in 0..self.steps.saturating_sub(1) {
            out.push_str(&self.pos[i].to_text());
            out.push(' ');
            out.push_str(&self.vel[i].to_text());
            out.push('\n');
        }
        out
    }
}

/// A satellite on an elliptical orbit around a central body.
#[derive(Debug, Clone)]
pub struct Satellite {
    cart: CartesianState,
    kepl: KeplerianElements,
    body: CelestialBody,

    t_start: f64,
    t_end: f64,
    t_steps: usize,

    integ: Integrator,
}

impl Satellite {
    /// Build from Cartesian state vectors; the Keplerian view is
    /// derived immediately.
    pub fn from_cartesian(
        cart: CartesianState,
        integrator: &str,
        body: CelestialBody,
        t_start: f64,
        t_end: f64,
        t_steps: usize,
    ) -> Result<Self> {
        let kepl = cartesian_to_keplerian(&cart, &body)?;
        let integ = Integrator::from_name(
            integrator, body, cart.pos, cart.vel, t_start, t_end, t_steps,
        )?;
        Ok(Self {
            cart,
            kepl,
            body,
            t_start,
            t_end,
            t_steps,
            integ,
        })
    }

    /// Build from Keplerian orbital elements; the Cartesian view is
    /// derived immediately.
    pub fn from_keplerian(
        kepl: KeplerianElements,
        integrator: &str,
        body: CelestialBody,
        t_start: f64,
        t_end: f64,
        t_steps: usize,
    ) -> Result<Self> {
        let cart = keplerian_to_cartesian(&kepl, &body)?;
        let integ = Integrator::from_name(
            integrator, body, cart.pos, cart.vel, t_start, t_end, t_steps,
        )?;
        Ok(Self {
            cart,
            kepl,
            body,
            t_start,
            t_end,
            t_steps,
            integ,
        })
    }

    pub fn cartesian(&self) -> CartesianState {
        self.cart
    }

    pub fn keplerian(&self) -> KeplerianElements {
        self.kepl
    }

    pub fn body(&self) -> CelestialBody {
        self.body
    }

    pub fn t_start(&self) -> f64 {
        self.t_start
    }

    pub fn t_end(&self) -> f64 {
        self.t_end
    }

    pub fn t_steps(&self) -> usize {
        self.t_steps
    }

    pub fn scheme(&self) -> Scheme {
        self.integ.scheme()
    }

    pub fn integrator_name(&self) -> &'static str {
        self.integ.scheme().name()
    }

    /// Set the Cartesian state; recomputes the Keplerian elements and
    /// reseeds the integrator in the same mutation. Fails (mutating
    /// nothing) if the state is not elliptical.
    pub fn set_cartesian(&mut self, cart: CartesianState) -> Result<()> {
        let kepl = cartesian_to_keplerian(&cart, &self.body)?;
        self.cart = cart;
        self.kepl = kepl;
        self.integ.set_x0(cart.pos);
        self.integ.set_v0(cart.vel);
        Ok(())
    }

    /// Set the Keplerian elements; recomputes the Cartesian state and
    /// reseeds the integrator in the same mutation. Fails (mutating
    /// nothing) on out-of-range elements.
    pub fn set_keplerian(&mut self, kepl: KeplerianElements) -> Result<()> {
        let cart = keplerian_to_cartesian(&kepl, &self.body)?;
        self.kepl = kepl;
        self.cart = cart;
        self.integ.set_x0(cart.pos);
        self.integ.set_v0(cart.vel);
        Ok(())
    }

    pub fn set_t_start(&mut self, t_start: f64) -> Result<()> {
        self.integ.set_delta_t(t_start, self.t_end)?;
        self.t_start = t_start;
        Ok(())
    }

    pub fn set_t_end(&mut self, t_end: f64) -> Result<()> {
        self.integ.set_delta_t(self.t_start, t_end)?;
        self.t_end = t_end;
        Ok(())
    }

    pub fn set_t_steps(&mut self, t_steps: usize) -> Result<()> {
        self.integ.set_steps(t_steps)?;
        self.t_steps = t_steps;
        Ok(())
    }

    /// Swap the stepping algorithm by name.
    ///
    /// The current integrator is discarded and a fresh one is built
    /// from the satellite's current state; any previously computed
    /// samples are lost.
    pub fn set_integrator(&mut self, name: &str) -> Result<()> {
        let integ = Integrator::from_name(
            name,
            self.body,
            self.cart.pos,
            self.cart.vel,
            self.t_start,
            self.t_end,
            self.t_steps,
        )?;
        log::debug!("integrator switched to {}", integ.scheme().name());
        self.integ = integ;
        Ok(())
    }

    /// Run the active integrator over the configured time span and
    /// return the trajectory.
    pub fn propagate(&mut self) -> Result<SimData> {
        log::debug!(
            "propagating {} steps of {:.3} s with {}",
            self.t_steps,
            self.integ.delta_t(),
            self.integrator_name()
        );
        self.integ.integrate()?;
        Ok(SimData {
            steps: self.integ.steps(),
            time: self.integ.time().to_vec(),
            pos: self.integ.positions().to_vec(),
            vel: self.integ.velocities().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::error::Error;
    use crate::propagation::state::EARTH;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn leo_state() -> CartesianState {
        CartesianState {
            pos: Vec3::new(7000.0, 0.000001, -0.001608),
            vel: Vec3::new(0.000002, 1.310359, 7.431412),
        }
    }

    fn leo_satellite() -> Satellite {
        Satellite::from_cartesian(leo_state(), "RK4", EARTH, 0.0, 86400.0, 8640).unwrap()
    }

    #[test]
    fn cartesian_constructor_derives_the_keplerian_view() {
        let sat = leo_satellite();
        let kepl = sat.keplerian();
        assert_abs_diff_eq!(kepl.eccentricity, 2.8298e-05, epsilon = 1e-8);
        assert_relative_eq!(kepl.semi_major_axis, 7000.0, max_relative = 1e-3);
        assert_eq!(sat.integrator_name(), "RK4");
    }

    #[test]
    fn keplerian_constructor_derives_the_cartesian_view() {
        let kepl = KeplerianElements {
            eccentricity: 0.0,
            semi_major_axis: 7000.0,
            inclination: 0.5,
            raan: 0.3,
            arg_periapsis: 0.0,
            true_anomaly: 0.0,
        };
        let sat = Satellite::from_keplerian(kepl, "Verlet", EARTH, 0.0, 5800.0, 1000).unwrap();
        assert_relative_eq!(sat.cartesian().pos.norm(), 7000.0, max_relative = 1e-9);
        assert_eq!(sat.scheme(), Scheme::Verlet);
    }

    #[test]
    fn representation_setters_keep_both_views_in_sync() {
        let mut sat = leo_satellite();
        let kepl = KeplerianElements {
            eccentricity: 0.1,
            semi_major_axis: 8000.0,
            inclination: 0.7,
            raan: 1.0,
            arg_periapsis: 0.4,
            true_anomaly: 2.0,
        };
        sat.set_keplerian(kepl).unwrap();

        // the recomputed Cartesian view converts back to the elements
        let back = cartesian_to_keplerian(&sat.cartesian(), &EARTH).unwrap();
        assert_abs_diff_eq!(back.eccentricity, 0.1, epsilon = 1e-6);
        assert_relative_eq!(back.semi_major_axis, 8000.0, max_relative = 1e-6);

        // and the next propagation starts from the new state
        let data = sat.propagate().unwrap();
        assert!(data.pos[0].approx_eq(&sat.cartesian().pos));
    }

    #[test]
    fn hyperbolic_states_are_rejected_without_mutation() {
        let mut sat = leo_satellite();
        let before = sat.cartesian();
        let hyperbolic = CartesianState {
            pos: Vec3::new(7000.0, 0.0, 0.0),
            vel: Vec3::new(0.0, 12.0, 0.0),
        };
        assert!(matches!(
            sat.set_cartesian(hyperbolic),
            Err(Error::InvalidArgument { .. })
        ));
        assert_eq!(sat.cartesian(), before);
    }

    #[test]
    fn integrator_swap_rebuilds_from_current_state() {
        let mut sat = leo_satellite();
        sat.propagate().unwrap();

        sat.set_integrator("Euler").unwrap();
        assert_eq!(sat.scheme(), Scheme::Euler);

        let data = sat.propagate().unwrap();
        assert!(data.pos[0].approx_eq(&leo_state().pos));
        assert_relative_eq!(data.time[0], 0.0);
    }

    #[test]
    fn unknown_integrator_names_are_rejected() {
        assert!(Satellite::from_cartesian(leo_state(), "Bogus", EARTH, 0.0, 86400.0, 100)
            .is_err());

        let mut sat = leo_satellite();
        assert!(sat.set_integrator("Midpoint").is_err());
        // the previous integrator stays live
        assert_eq!(sat.scheme(), Scheme::Rk4);
    }

    #[test]
    fn time_domain_setters_validate() {
        let mut sat = leo_satellite();
        assert!(sat.set_t_steps(0).is_err());
        assert!(sat.set_t_start(-1.0).is_err());
        assert!(sat.set_t_end(-5.0).is_err());

        sat.set_t_steps(100).unwrap();
        sat.set_t_end(1000.0).unwrap();
        assert_eq!(sat.t_steps(), 100);
        assert_relative_eq!(sat.t_end(), 1000.0);
    }

    #[test]
    fn propagate_fills_the_time_grid() {
        let mut sat =
            Satellite::from_cartesian(leo_state(), "Verlet", EARTH, 0.0, 990.0, 100).unwrap();
        let data = sat.propagate().unwrap();

        assert_eq!(data.steps, 100);
        assert_eq!(data.time.len(), 100);
        assert_eq!(data.pos.len(), 100);
        assert_eq!(data.vel.len(), 100);
        assert_relative_eq!(data.time[1] - data.time[0], 10.0);
        assert_relative_eq!(data.time[99], 990.0);
    }

    #[test]
    fn table_omits_the_final_row() {
        let mut sat =
            Satellite::from_cartesian(leo_state(), "RK4", EARTH, 0.0, 40.0, 5).unwrap();
        let data = sat.propagate().unwrap();
        let table = data.to_table();

        assert_eq!(table.lines().count(), 4);
        let first = table.lines().next().unwrap();
        assert_eq!(
            first,
            format!("{} {}", data.pos[0].to_text(), data.vel[0].to_text())
        );
        assert!(first.starts_with("[7000.00000000  "));
    }
}
