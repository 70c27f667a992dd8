//! Cartesian state vector / Keplerian orbital element conversions
//!
//! Stateless implementations of the two classical transformation
//! pipelines. Inputs and outputs are in km and km/s; the math runs in
//! meters internally so the gravitational parameter can be used
//! directly. Both directions are mutual inverses up to floating-point
//! tolerance for every valid elliptical state.

use std::f64::consts::PI;

use super::error::{Error, Result};
use super::state::{CartesianState, CelestialBody, KeplerianElements, Vec3};

/// Convert Cartesian state vectors to Keplerian orbital elements.
///
/// Rejects states that do not describe a bound elliptical orbit
/// (eccentricity >= 1 or non-positive semi-major axis).
pub fn cartesian_to_keplerian(
    state: &CartesianState,
    body: &CelestialBody,
) -> Result<KeplerianElements> {
    let r = state.pos * 1000.0; // [m]
    let v = state.vel * 1000.0; // [m/s]
    let mu = body.mu();

    // Orbital momentum and eccentricity vectors
    let h = r.cross(&v);
    let e_vec = v.cross(&h) / mu - r / r.norm();

    // Node vector points towards the ascending node
    let n = Vec3::new(-h.y, h.x, 0.0);

    let true_anomaly = quadrant_corrected(
        e_vec.dot(&r) / (e_vec.norm() * r.norm()),
        r.dot(&v) < 0.0,
    );

    let inclination = (h.z / h.norm()).acos();
    let eccentricity = e_vec.norm();

    let raan = quadrant_corrected(n.x / n.norm(), n.y < 0.0);
    let arg_periapsis = quadrant_corrected(
        n.dot(&e_vec) / (n.norm() * e_vec.norm()),
        e_vec.z < 0.0,
    );

    let semi_major_axis =
        1.0 / (2.0 / r.norm() - v.norm_squared() / mu) / 1000.0; // [km]

    if eccentricity >= 1.0 {
        return Err(Error::invalid(format!(
            "state is not elliptical: eccentricity {:.6} is outside [0, 1)",
            eccentricity
        )));
    }
    if semi_major_axis <= 0.0 {
        return Err(Error::invalid(format!(
            "state is not elliptical: semi-major axis {:.3} km is not positive",
            semi_major_axis
        )));
    }

    Ok(KeplerianElements {
        eccentricity,
        semi_major_axis,
        inclination,
        raan,
        arg_periapsis,
        true_anomaly,
    })
}

/// Convert Keplerian orbital elements to Cartesian state vectors.
///
/// Rejects elements outside the elliptical domain
/// (`0 <= eccentricity < 1`, `semi_major_axis > 0`).
pub fn keplerian_to_cartesian(
    elements: &KeplerianElements,
    body: &CelestialBody,
) -> Result<CartesianState> {
    let e = elements.eccentricity;
    if !(0.0..1.0).contains(&e) {
        return Err(Error::invalid(format!(
            "eccentricity {:.6} is outside [0, 1)",
            e
        )));
    }
    if elements.semi_major_axis <= 0.0 {
        return Err(Error::invalid(format!(
            "semi-major axis {:.3} km is not positive",
            elements.semi_major_axis
        )));
    }

    let a = elements.semi_major_axis * 1000.0; // [m]
    let i = elements.inclination;
    let om = elements.raan;
    let w = elements.arg_periapsis;
    let nu = elements.true_anomaly;
    let mu = body.mu();

    // Eccentric anomaly from the true anomaly
    let ecc_anom = 2.0
        * ((1.0 - e).sqrt() * (nu / 2.0).sin())
            .atan2((1.0 + e).sqrt() * (nu / 2.0).cos());

    // Distance to the central body
    let r = a * (1.0 - e * ecc_anom.cos());

    // Position and velocity in the orbital (perifocal) frame
    let pos_o = r * Vec3::new(nu.cos(), nu.sin(), 0.0);
    let vel_o = ((mu * a).sqrt() / r)
        * Vec3::new(
            -ecc_anom.sin(),
            (1.0 - e * e).sqrt() * ecc_anom.cos(),
            0.0,
        );

    // 3-1-3 Euler-angle rotation into the inertial frame
    let rotate = |o: Vec3| {
        Vec3::new(
            o.x * (w.cos() * om.cos() - w.sin() * i.cos() * om.sin())
                - o.y * (w.sin() * om.cos() + w.cos() * i.cos() * om.sin()),
            o.x * (w.cos() * om.sin() + w.sin() * i.cos() * om.cos())
                + o.y * (w.cos() * i.cos() * om.cos() - w.sin() * om.sin()),
            o.x * w.sin() * i.sin() + o.y * w.cos() * i.sin(),
        )
    };

    Ok(CartesianState {
        pos: rotate(pos_o) / 1000.0, // [km]
        vel: rotate(vel_o) / 1000.0, // [km/s]
    })
}

/// `acos` of a clamped cosine, reflected into `(pi, 2*pi)` when the
/// discriminating sign says the angle lies past periapsis/the node.
fn quadrant_corrected(cos_angle: f64, reflect: bool) -> f64 {
    let angle = cos_angle.clamp(-1.0, 1.0).acos();
    if reflect {
        2.0 * PI - angle
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::state::EARTH;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::TAU;

    fn assert_angle_eq(a: f64, b: f64, eps: f64) {
        let diff = (a - b).rem_euclid(TAU);
        let diff = diff.min(TAU - diff);
        assert!(diff < eps, "angles differ: {} vs {} (diff {})", a, b, diff);
    }

    #[test]
    fn round_trip_preserves_elements() {
        let cases = [
            (0.001, 7000.0, 0.9, 1.2, 0.8, 2.1),
            (0.3, 12000.0, 0.7, 2.4, 1.1, 0.6),
            (0.72, 26560.0, 1.1, 5.2, 2.9, 4.4),
            (0.05, 6800.0, 0.2, 0.4, 5.8, 3.3),
        ];
        for (e, a, i, raan, w, nu) in cases {
            let elements = KeplerianElements {
                eccentricity: e,
                semi_major_axis: a,
                inclination: i,
                raan,
                arg_periapsis: w,
                true_anomaly: nu,
            };
            let state = keplerian_to_cartesian(&elements, &EARTH).unwrap();
            let back = cartesian_to_keplerian(&state, &EARTH).unwrap();

            assert_abs_diff_eq!(back.eccentricity, e, epsilon = 1e-6);
            assert_relative_eq!(back.semi_major_axis, a, max_relative = 1e-6);
            assert_angle_eq(back.inclination, i, 1e-6);
            assert_angle_eq(back.raan, raan, 1e-6);
            assert_angle_eq(back.arg_periapsis, w, 1e-6);
            assert_angle_eq(back.true_anomaly, nu, 1e-6);
        }
    }

    #[test]
    fn circular_orbit_speed_matches_vis_viva() {
        // e = 0: speed is sqrt(mu / a) everywhere on the orbit
        let elements = KeplerianElements {
            eccentricity: 0.0,
            semi_major_axis: 7000.0,
            inclination: 0.5,
            raan: 0.3,
            arg_periapsis: 0.0,
            true_anomaly: 0.0,
        };
        let state = keplerian_to_cartesian(&elements, &EARTH).unwrap();
        let v_circ = (EARTH.mu() / 7_000_000.0).sqrt() / 1000.0; // [km/s]

        assert_relative_eq!(state.pos.norm(), 7000.0, max_relative = 1e-9);
        assert_relative_eq!(state.vel.norm(), v_circ, max_relative = 1e-9);
        // velocity is perpendicular to position on a circular orbit
        assert_abs_diff_eq!(state.pos.dot(&state.vel), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn near_circular_leo_state_has_tiny_eccentricity() {
        let state = CartesianState {
            pos: Vec3::new(7000.0, 0.000001, -0.001608),
            vel: Vec3::new(0.000002, 1.310359, 7.431412),
        };
        let elements = cartesian_to_keplerian(&state, &EARTH).unwrap();

        assert_abs_diff_eq!(elements.eccentricity, 2.8298e-05, epsilon = 1e-8);
        assert_relative_eq!(elements.semi_major_axis, 7000.0, max_relative = 1e-3);
    }

    #[test]
    fn hyperbolic_state_is_rejected() {
        // Well above escape velocity at 7000 km
        let state = CartesianState {
            pos: Vec3::new(7000.0, 0.0, 0.0),
            vel: Vec3::new(0.0, 12.0, 0.0),
        };
        let err = cartesian_to_keplerian(&state, &EARTH).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn out_of_range_eccentricity_is_rejected() {
        let mut elements = KeplerianElements {
            eccentricity: 1.0,
            semi_major_axis: 7000.0,
            inclination: 0.5,
            raan: 0.0,
            arg_periapsis: 0.0,
            true_anomaly: 0.0,
        };
        assert!(keplerian_to_cartesian(&elements, &EARTH).is_err());

        elements.eccentricity = -0.1;
        assert!(keplerian_to_cartesian(&elements, &EARTH).is_err());

        elements.eccentricity = 0.1;
        elements.semi_major_axis = -7000.0;
        assert!(keplerian_to_cartesian(&elements, &EARTH).is_err());
    }

    #[test]
    fn descending_branch_true_anomaly_lands_past_pi() {
        // nu in (pi, 2*pi) means the satellite is falling towards periapsis,
        // so r . v < 0 and the reflected acos branch must be taken
        let elements = KeplerianElements {
            eccentricity: 0.2,
            semi_major_axis: 8000.0,
            inclination: 0.6,
            raan: 1.0,
            arg_periapsis: 0.5,
            true_anomaly: 4.0,
        };
        let state = keplerian_to_cartesian(&elements, &EARTH).unwrap();
        assert!(state.pos.dot(&state.vel) < 0.0);

        let back = cartesian_to_keplerian(&state, &EARTH).unwrap();
        assert!(back.true_anomaly > PI);
        assert_angle_eq(back.true_anomaly, 4.0, 1e-6);
    }
}
