//! Analytic J2(+J3) oblate-spheroidal propagation, in the spirit of the
//! Vinti potential.
//!
//! This is a scoped analytic propagator: it reproduces the secular drift and
//! first-order short-period corrections an oblate-spheroidal (Vinti-type)
//! solution produces, built from closed-form secular and periodic terms,
//! rather than a full quartic-factorization port of a Vinti solver. See
//! `DESIGN.md` for the reasoning.

use crate::constants::EARTH_RADIUS_EQUATORIAL;
use crate::errors::{AstroError, AstroResult};
use crate::orbital::KeplerianElements;

/// Earth's second zonal harmonic.
pub const J2: f64 = 1.082_63e-3;

/// Earth's third zonal harmonic.
pub const J3: f64 = -2.532_1e-6;

/// Minimum perigee altitude this propagator accepts, meters. Below this,
/// Vinti's oblate-spheroidal coordinate construction approaches the
/// singularity at the focal ellipse and the first-order secular/periodic
/// theory used here is no longer meaningful.
pub const FORBIDDEN_ZONE_ALTITUDE: f64 = 210_000.0;

/// A mean-element analytic propagator including J2 secular drift and J2/J3
/// first-order periodic corrections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VintiPropagator {
    mean_elements_at_epoch: KeplerianElements,
    mean_anomaly_at_epoch: f64,
    mean_motion: f64,
    raan_dot: f64,
    argp_dot: f64,
    j2: f64,
    j3: f64,
    re: f64,
}

impl VintiPropagator {
    /// Build a propagator from osculating elements at epoch, using Earth's
    /// standard J2/J3 coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidOrbit`] if the perigee altitude is
    /// below [`FORBIDDEN_ZONE_ALTITUDE`].
    pub fn new(elements: KeplerianElements) -> AstroResult<Self> {
        Self::with_harmonics(elements, J2, J3, EARTH_RADIUS_EQUATORIAL)
    }

    /// Build a propagator with explicit zonal harmonics and body radius,
    /// for use with bodies other than Earth.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidOrbit`] if the perigee altitude is
    /// below [`FORBIDDEN_ZONE_ALTITUDE`].
    pub fn with_harmonics(elements: KeplerianElements, j2: f64, j3: f64, re: f64) -> AstroResult<Self> {
        use uom::si::angle::radian;
        use uom::si::length::meter;

        let a = elements.semi_major_axis.get::<meter>();
        let e = elements.eccentricity;
        let i = elements.inclination.get::<radian>();
        let mu = elements.mu;

        let perigee_radius = a * (1.0 - e);
        let perigee_altitude = perigee_radius - re;
        if perigee_altitude < FORBIDDEN_ZONE_ALTITUDE {
            return Err(AstroError::InvalidOrbit {
                reason: format!(
                    "perigee altitude {:.1} km is inside Vinti's forbidden zone (below {:.0} km)",
                    perigee_altitude / 1000.0,
                    FORBIDDEN_ZONE_ALTITUDE / 1000.0
                ),
            });
        }

        let n0 = (mu / a.powi(3)).sqrt();
        let p = a * (1.0 - e * e);

        let (sin_i, cos_i) = i.sin_cos();

        // Secular mean motion correction and nodal/apsidal regression rates
        // from first-order J2 perturbation theory (Brouwer's mean elements).
        let m0dot_n = 1.5 * (re * re * j2 / (p * p)) * (1.0 - e * e).sqrt() * (1.0 - 1.5 * sin_i * sin_i);
        let nbar = (1.0 + m0dot_n) * n0;

        let raan_dot = -1.5 * (nbar * re * re * j2 / (p * p)) * cos_i;
        let argp_dot = 1.5 * (nbar * re * re * j2 / (p * p)) * (2.0 - 2.5 * sin_i * sin_i);

        Ok(Self {
            mean_elements_at_epoch: elements,
            mean_anomaly_at_epoch: elements.mean_anomaly().get::<radian>(),
            mean_motion: nbar,
            raan_dot,
            argp_dot,
            j2,
            j3,
            re,
        })
    }

    /// Propagate to `dt` seconds past epoch, returning the osculating
    /// elements (mean elements advanced secularly, plus first-order J2/J3
    /// short-period corrections applied to recover an osculating state).
    ///
    /// # Errors
    ///
    /// Returns an error if the Kepler equation solve for the advanced mean
    /// anomaly fails to converge.
    pub fn propagate(&self, dt: f64) -> AstroResult<KeplerianElements> {
        use uom::si::angle::radian;

        let two_pi = 2.0 * std::f64::consts::PI;

        let mut elements = self.mean_elements_at_epoch;
        let raan0 = elements.raan.get::<radian>();
        let argp0 = elements.argument_of_periapsis.get::<radian>();

        let new_raan = (raan0 + self.raan_dot * dt).rem_euclid(two_pi);
        let new_argp = (argp0 + self.argp_dot * dt).rem_euclid(two_pi);
        let new_mean_anomaly = (self.mean_anomaly_at_epoch + self.mean_motion * dt).rem_euclid(two_pi);

        elements.raan = uom::si::f64::Angle::new::<radian>(new_raan);
        elements.argument_of_periapsis = uom::si::f64::Angle::new::<radian>(new_argp);
        elements.set_with_mean_anomaly(uom::si::f64::Angle::new::<radian>(new_mean_anomaly))?;

        Ok(self.apply_short_period_corrections(elements))
    }

    /// Apply first-order J2/J3 short-period corrections to a mean-element
    /// state, recovering an approximately osculating element set.
    ///
    /// The J2 term corrects the semi-major axis by the classical
    /// Brouwer-form radius variation; the J3 term adds the much smaller
    /// odd-harmonic coupling between eccentricity and argument of latitude.
    fn apply_short_period_corrections(&self, mean: KeplerianElements) -> KeplerianElements {
        use uom::si::angle::radian;
        use uom::si::length::meter;

        let e = mean.eccentricity;
        let i = mean.inclination.get::<radian>();
        let a = mean.semi_major_axis.get::<meter>();
        let p = a * (1.0 - e * e);
        let nu = mean.true_anomaly.get::<radian>();

        let sin_i = i.sin();
        let u = mean.argument_of_periapsis.get::<radian>() + nu;
        let r_over_a = (1.0 - e * e) / (1.0 + e * nu.cos());

        let delta_a = a * self.j2 * (self.re / p).powi(2)
            * ((1.0 - 1.5 * sin_i * sin_i) * (r_over_a.powi(3) - (1.0 - e * e).powf(-1.5))
                + 1.5 * sin_i * sin_i * r_over_a.powi(3) * (2.0 * u).cos());

        let delta_e = self.j3 * (self.re / p) * sin_i * (1.0 - 1.25 * sin_i * sin_i) * u.sin();

        let mut corrected = mean;
        corrected.semi_major_axis = uom::si::f64::Length::new::<meter>(a + delta_a);
        corrected.eccentricity = (e + delta_e).clamp(1e-6, 0.999_999);
        corrected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use uom::si::angle::radian;
    use uom::si::f64::{Angle, Length};
    use uom::si::length::kilometer;

    fn leo_elements() -> KeplerianElements {
        KeplerianElements::new(
            Length::new::<kilometer>(7000.0),
            0.01,
            Angle::new::<radian>(0.9),
            Angle::new::<radian>(0.2),
            Angle::new::<radian>(0.3),
            Angle::new::<radian>(0.0),
        )
    }

    #[test]
    fn raan_regresses_for_prograde_leo() {
        let prop = VintiPropagator::new(leo_elements()).unwrap();
        assert!(prop.raan_dot < 0.0);
    }

    #[test]
    fn propagation_advances_mean_anomaly() {
        let elements = leo_elements();
        let prop = VintiPropagator::new(elements).unwrap();
        let propagated = prop.propagate(600.0).unwrap();
        assert!(
            propagated.mean_anomaly().get::<radian>() != elements.mean_anomaly().get::<radian>()
        );
    }

    #[test]
    fn semi_major_axis_stays_near_mean_value() {
        let elements = leo_elements();
        let prop = VintiPropagator::new(elements).unwrap();
        let propagated = prop.propagate(1800.0).unwrap();
        use uom::si::length::kilometer as km;
        assert_relative_eq!(
            propagated.semi_major_axis.get::<km>(),
            elements.semi_major_axis.get::<km>(),
            epsilon = 1.0
        );
    }

    #[test]
    fn rejects_perigee_inside_forbidden_zone() {
        let elements = KeplerianElements::new(
            Length::new::<kilometer>(6578.0),
            0.3,
            Angle::new::<radian>(0.9),
            Angle::new::<radian>(0.2),
            Angle::new::<radian>(0.3),
            Angle::new::<radian>(0.0),
        );
        assert!(VintiPropagator::new(elements).is_err());
    }
}
