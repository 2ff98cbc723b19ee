//! Universal-variable two-body (f and g series) propagation.
//!
//! Works uniformly across elliptical, parabolic, and hyperbolic orbits by
//! solving Kepler's equation in the universal anomaly `chi` rather than a
//! conic-specific anomaly, using the Stumpff functions `C(z)`/`S(z)`.

use nalgebra::Vector3;

use crate::errors::{AstroError, AstroResult};

const MAX_ITER: u32 = 100;
const TOLERANCE: f64 = 1e-8;

/// Stumpff functions `C(z)` and `S(z)`.
fn stumpff(z: f64) -> (f64, f64) {
    if z > 1e-6 {
        let sz = z.sqrt();
        let c = (1.0 - sz.cos()) / z;
        let s = (sz - sz.sin()) / sz.powi(3);
        (c, s)
    } else if z < -1e-6 {
        let sz = (-z).sqrt();
        let c = (1.0 - sz.cosh()) / z;
        let s = (sz.sinh() - sz) / sz.powi(3);
        (c, s)
    } else {
        // Series expansion near z = 0 keeps both functions smooth through
        // the parabolic boundary.
        (0.5 - z / 24.0, 1.0 / 6.0 - z / 120.0)
    }
}

/// A Cartesian state vector: position (m) and velocity (m/s) in an inertial
/// frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateVector {
    /// Position, meters.
    pub position: [f64; 3],
    /// Velocity, meters/second.
    pub velocity: [f64; 3],
}

/// Propagate a Cartesian state vector forward (or backward) by `dt` seconds
/// under pure two-body dynamics, using the universal-variable f-and-g
/// series.
///
/// # Errors
///
/// Returns [`AstroError::NonConvergence`] if the universal Kepler equation
/// does not converge within 100 Newton iterations.
pub fn propagate(state: StateVector, dt: f64, mu: f64) -> AstroResult<StateVector> {
    let r0 = Vector3::from(state.position);
    let v0 = Vector3::from(state.velocity);

    let r0mag = r0.norm();
    let v0mag = v0.norm();
    let vr0 = r0.dot(&v0) / r0mag;

    let alpha = 2.0 / r0mag - v0mag * v0mag / mu;

    let sqrt_mu = mu.sqrt();

    let mut chi = if alpha > 1e-8 {
        // Elliptical seed: a full revolution's worth of universal anomaly
        // scaled by the fraction of the orbit traversed in `dt`.
        sqrt_mu * dt * alpha
    } else if alpha < -1e-8 {
        // Hyperbolic seed.
        let a = 1.0 / alpha;
        dt.signum()
            * (-a).sqrt()
            * ((-2.0 * mu * alpha * dt) / (r0.dot(&v0) + dt.signum() * (-mu * a).sqrt())).ln()
    } else {
        // Parabolic seed via angular momentum.
        let h = r0.cross(&v0).norm();
        let p = h * h / mu;
        let s = 0.5 * (p / (3.0 * dt.abs())).atan().tan();
        let cot_w = s.cbrt();
        (p).sqrt() * 2.0 * (1.0 / cot_w).atan() * dt.signum()
    };

    let mut converged = false;
    let mut z = 0.0;
    let mut c = 0.5;
    let mut s = 1.0 / 6.0;
    for _ in 0..MAX_ITER {
        z = chi * chi * alpha;
        let (cz, sz) = stumpff(z);
        c = cz;
        s = sz;

        let r_pred = chi * chi * c + (vr0 * r0mag / sqrt_mu) * chi * (1.0 - z * s) + r0mag * (1.0 - z * c);
        let f = (vr0 * r0mag / sqrt_mu) * chi * chi * c + (1.0 - alpha * r0mag) * chi.powi(3) * s
            + r0mag * chi
            - sqrt_mu * dt;
        let fp = r_pred;

        if fp.abs() < 1e-300 {
            break;
        }
        let delta = f / fp;
        chi -= delta;
        if delta.abs() < TOLERANCE {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(AstroError::NonConvergence {
            solver: "universal_variable_kepler".to_string(),
            iterations: MAX_ITER,
        });
    }

    let f_coeff = 1.0 - (chi * chi / r0mag) * c;
    let g_coeff = dt - (chi.powi(3) / sqrt_mu) * s;

    let r_new = f_coeff * r0 + g_coeff * v0;
    let rmag_new = r_new.norm();

    let fdot_coeff = (sqrt_mu / (rmag_new * r0mag)) * (z * s - 1.0) * chi;
    let gdot_coeff = 1.0 - (chi * chi / rmag_new) * c;

    let v_new = fdot_coeff * r0 + gdot_coeff * v0;

    Ok(StateVector {
        position: r_new.into(),
        velocity: v_new.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MU_EARTH: f64 = 3.986_004_418e14;

    #[test]
    fn circular_orbit_preserves_radius() {
        let r = 7_000_000.0;
        let v = (MU_EARTH / r).sqrt();
        let state = StateVector {
            position: [r, 0.0, 0.0],
            velocity: [0.0, v, 0.0],
        };
        let period = 2.0 * std::f64::consts::PI * (r.powi(3) / MU_EARTH).sqrt();
        let propagated = propagate(state, period / 4.0, MU_EARTH).unwrap();

        let rmag = Vector3::from(propagated.position).norm();
        assert_relative_eq!(rmag, r, epsilon = 1.0);
        // quarter orbit from (r,0,0) with prograde velocity along +y lands near (0, r, 0)
        assert_relative_eq!(propagated.position[1], r, epsilon = 10.0);
    }

    #[test]
    fn full_period_returns_to_start() {
        let r = 7_000_000.0;
        let v = (MU_EARTH / r).sqrt();
        let state = StateVector {
            position: [r, 0.0, 0.0],
            velocity: [0.0, v, 0.0],
        };
        let period = 2.0 * std::f64::consts::PI * (r.powi(3) / MU_EARTH).sqrt();
        let propagated = propagate(state, period, MU_EARTH).unwrap();

        assert_relative_eq!(propagated.position[0], r, epsilon = 10.0);
        assert_relative_eq!(propagated.position[1], 0.0, epsilon = 10.0);
    }

    #[test]
    fn elliptical_orbit_conserves_energy() {
        let state = StateVector {
            position: [8_000_000.0, 0.0, 0.0],
            velocity: [0.0, 6_500.0, 2_000.0],
        };
        let energy_before =
            Vector3::from(state.velocity).norm_squared() / 2.0 - MU_EARTH / Vector3::from(state.position).norm();

        let propagated = propagate(state, 3600.0, MU_EARTH).unwrap();
        let energy_after = Vector3::from(propagated.velocity).norm_squared() / 2.0
            - MU_EARTH / Vector3::from(propagated.position).norm();

        assert_relative_eq!(energy_before, energy_after, epsilon = 1.0);
    }
}
