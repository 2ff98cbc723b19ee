//! Orbital mechanics support for celestial coordinates.
//!
//! This module provides integration between orbital mechanics and the
//! celestial coordinate systems, including Keplerian orbital elements and
//! the classical Cartesian <-> elements conversions (Vallado's RV2COE and
//! COE2RV algorithms).

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use uom::si::angle::radian;
use uom::si::f64::{Angle, Length};

use sguaba::Coordinate;

use super::constants::{utc_to_julian_date, MU_EARTH};
use super::errors::{AstroError, AstroResult};
use super::frames::Icrs;

/// Eccentricity below which the orbit is considered circular enough that
/// argument of periapsis and true anomaly become ill-defined.
const ECCENTRICITY_EPSILON: f64 = 1e-6;

/// Inclination below which the node vector becomes ill-defined (the orbit
/// is considered equatorial).
const INCLINATION_EPSILON: f64 = 1e-6;

/// Newton iteration cap for Kepler's equation.
const KEPLER_MAX_ITER: u32 = 100;

/// Newton convergence tolerance for Kepler's equation (radians).
const KEPLER_TOLERANCE: f64 = 1e-10;

/// Keplerian orbital elements.
///
/// These six elements uniquely define an orbit in the two-body problem.
/// This module is restricted to elliptical orbits: eccentricity and
/// inclination must both be bounded away from zero (see
/// [`KeplerianElements::from_cartesian`] invariants), and the orbit's
/// mechanical energy must be negative.
///
/// # Elements
///
/// - **a**: Semi-major axis (size of orbit)
/// - **e**: Eccentricity (shape of orbit, 0 = circular, <1 = elliptical)
/// - **i**: Inclination (tilt of orbital plane relative to reference plane)
/// - **Ω**: Right ascension of ascending node (RAAN)
/// - **ω**: Argument of periapsis
/// - **ν**: True anomaly (position in orbit at epoch)
///
/// # Reference Frame
///
/// These elements are typically defined relative to ICRS or EME2000.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeplerianElements {
    /// Semi-major axis
    pub semi_major_axis: Length,

    /// Eccentricity (dimensionless, 0 ≤ e < 1 for elliptical orbits)
    pub eccentricity: f64,

    /// Inclination (angle between orbital plane and reference plane)
    pub inclination: Angle,

    /// Right ascension of ascending node (RAAN)
    pub raan: Angle,

    /// Argument of periapsis
    pub argument_of_periapsis: Angle,

    /// True anomaly (angular position in orbit)
    pub true_anomaly: Angle,

    /// Gravitational parameter (μ = GM, default is Earth's)
    pub mu: f64,
}

impl Default for KeplerianElements {
    fn default() -> Self {
        Self {
            semi_major_axis: Length::new::<uom::si::length::meter>(7_000_000.0), // ~600 km altitude
            eccentricity: 0.0,
            inclination: Angle::new::<radian>(0.0),
            raan: Angle::new::<radian>(0.0),
            argument_of_periapsis: Angle::new::<radian>(0.0),
            true_anomaly: Angle::new::<radian>(0.0),
            mu: MU_EARTH,
        }
    }
}

impl KeplerianElements {
    /// Create a new set of Keplerian elements with Earth's μ.
    #[must_use]
    pub fn new(
        semi_major_axis: Length,
        eccentricity: f64,
        inclination: Angle,
        raan: Angle,
        argument_of_periapsis: Angle,
        true_anomaly: Angle,
    ) -> Self {
        Self {
            semi_major_axis,
            eccentricity,
            inclination,
            raan,
            argument_of_periapsis,
            true_anomaly,
            mu: MU_EARTH,
        }
    }

    /// Create Keplerian elements with a custom gravitational parameter.
    #[must_use]
    pub fn with_mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    /// Validate this orbit's invariants: perigee radius must clear the
    /// central body's equatorial radius, eccentricity and inclination must
    /// both be bounded away from zero, and the orbit must be elliptical.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidOrbit`] describing whichever invariant
    /// is violated first.
    pub fn validate(&self) -> AstroResult<()> {
        use uom::si::length::meter;

        if self.eccentricity < 0.0 || self.eccentricity >= 1.0 {
            return Err(AstroError::InvalidOrbit {
                reason: format!(
                    "eccentricity {} is outside the elliptical range [0, 1)",
                    self.eccentricity
                ),
            });
        }
        if self.eccentricity < ECCENTRICITY_EPSILON {
            return Err(AstroError::InvalidOrbit {
                reason: "eccentricity too close to zero".to_string(),
            });
        }
        if self.inclination.get::<radian>().abs() < INCLINATION_EPSILON {
            return Err(AstroError::InvalidOrbit {
                reason: "inclination too close to zero".to_string(),
            });
        }
        let perigee = self.semi_major_axis.get::<meter>() * (1.0 - self.eccentricity);
        if perigee < super::constants::EARTH_RADIUS_EQUATORIAL {
            return Err(AstroError::InvalidOrbit {
                reason: "perigee distance less than one central-body radius".to_string(),
            });
        }
        Ok(())
    }

    /// Convert to position and velocity in ICRS frame via Vallado's COE2RV
    /// algorithm: perifocal-frame state vectors, rotated to the reference
    /// frame by the 3-1-3 (RAAN, inclination, argument of periapsis)
    /// rotation sequence.
    ///
    /// # Returns
    ///
    /// `(position, velocity)` tuple in ICRS frame.
    #[must_use]
    pub fn to_state_vectors(&self) -> (Coordinate<Icrs>, [f64; 3]) {
        use uom::si::length::meter;

        let a = self.semi_major_axis.get::<meter>();
        let e = self.eccentricity;
        let i = self.inclination.get::<radian>();
        let raan = self.raan.get::<radian>();
        let omega = self.argument_of_periapsis.get::<radian>();
        let nu = self.true_anomaly.get::<radian>();

        let p = a * (1.0 - e * e);
        let r = p / (1.0 + e * nu.cos());

        let x_pqw = r * nu.cos();
        let y_pqw = r * nu.sin();

        let vx_pqw = -(self.mu / p).sqrt() * nu.sin();
        let vy_pqw = (self.mu / p).sqrt() * (e + nu.cos());

        let (sin_omega, cos_omega) = omega.sin_cos();
        let (sin_i, cos_i) = i.sin_cos();
        let (sin_raan, cos_raan) = raan.sin_cos();

        let r11 = cos_raan * cos_omega - sin_raan * sin_omega * cos_i;
        let r12 = -cos_raan * sin_omega - sin_raan * cos_omega * cos_i;
        let r21 = sin_raan * cos_omega + cos_raan * sin_omega * cos_i;
        let r22 = -sin_raan * sin_omega + cos_raan * cos_omega * cos_i;
        let r31 = sin_omega * sin_i;
        let r32 = cos_omega * sin_i;

        let x = r11 * x_pqw + r12 * y_pqw;
        let y = r21 * x_pqw + r22 * y_pqw;
        let z = r31 * x_pqw + r32 * y_pqw;

        let vx = r11 * vx_pqw + r12 * vy_pqw;
        let vy = r21 * vx_pqw + r22 * vy_pqw;
        let vz = r31 * vx_pqw + r32 * vy_pqw;

        #[allow(deprecated)]
        let position = Coordinate::<Icrs>::from_cartesian(
            Length::new::<meter>(x),
            Length::new::<meter>(y),
            Length::new::<meter>(z),
        );

        (position, [vx, vy, vz])
    }

    /// Build Keplerian elements from a Cartesian state vector via Vallado's
    /// RV2COE algorithm.
    ///
    /// `position`/`velocity` are Earth-centered inertial Cartesian
    /// components in meters and meters/second.
    ///
    /// # Errors
    ///
    /// Checks invariants in the order the reference implementation does:
    /// eccentricity too small, then inclination too small, then hyperbolic
    /// or parabolic energy, then perigee radius below the central body.
    pub fn from_cartesian(position: [f64; 3], velocity: [f64; 3], mu: f64) -> AstroResult<Self> {
        let r = Vector3::from(position);
        let v = Vector3::from(velocity);

        let rmag = r.norm();
        let vmag = v.norm();

        let h = r.cross(&v);
        let hmag = h.norm();

        let n = Vector3::z_axis().into_inner().cross(&h);
        let nmag = n.norm();

        let e_vec = ((vmag * vmag - mu / rmag) * r - r.dot(&v) * v) / mu;
        let emag = e_vec.norm();

        let sme = vmag * vmag / 2.0 - mu / rmag;

        if emag < ECCENTRICITY_EPSILON {
            return Err(AstroError::InvalidOrbit {
                reason: "eccentricity too close to zero".to_string(),
            });
        }
        if nmag < INCLINATION_EPSILON {
            return Err(AstroError::InvalidOrbit {
                reason: "inclination too close to zero".to_string(),
            });
        }
        if sme >= 0.0 {
            return Err(AstroError::InvalidOrbit {
                reason: "orbit must be elliptical".to_string(),
            });
        }

        let a = -mu / (2.0 * sme);
        let rp = a * (1.0 - emag);
        if rp < super::constants::EARTH_RADIUS_EQUATORIAL {
            return Err(AstroError::InvalidOrbit {
                reason: "perigee distance less than one central-body radius".to_string(),
            });
        }

        let inclination = (h.z / hmag).acos();

        let mut raan = (n.x / nmag).acos();
        if n.y < 0.0 {
            raan = 2.0 * std::f64::consts::PI - raan;
        }

        let mut argp = (n.dot(&e_vec) / (nmag * emag)).clamp(-1.0, 1.0).acos();
        if e_vec.z < 0.0 {
            argp = 2.0 * std::f64::consts::PI - argp;
        }

        let mut nu = (e_vec.dot(&r) / (emag * rmag)).clamp(-1.0, 1.0).acos();
        if r.dot(&v) < 0.0 {
            nu = 2.0 * std::f64::consts::PI - nu;
        }

        Ok(Self {
            semi_major_axis: Length::new::<uom::si::length::meter>(a),
            eccentricity: emag,
            inclination: Angle::new::<radian>(inclination),
            raan: Angle::new::<radian>(raan),
            argument_of_periapsis: Angle::new::<radian>(argp),
            true_anomaly: Angle::new::<radian>(nu),
            mu,
        })
    }

    /// Eccentric anomaly corresponding to the current true anomaly.
    #[must_use]
    pub fn eccentric_anomaly(&self) -> Angle {
        let e = self.eccentricity;
        let nu = self.true_anomaly.get::<radian>();
        let (sin_nu, cos_nu) = nu.sin_cos();
        let denom = 1.0 + e * cos_nu;
        let se = sin_nu * (1.0 - e * e).sqrt() / denom;
        let ce = (e + cos_nu) / denom;
        Angle::new::<radian>(se.atan2(ce))
    }

    /// Mean anomaly corresponding to the current true anomaly.
    #[must_use]
    pub fn mean_anomaly(&self) -> Angle {
        let ea = self.eccentric_anomaly().get::<radian>();
        Angle::new::<radian>(ea - self.eccentricity * ea.sin())
    }

    /// Orbital period.
    #[must_use]
    pub fn period(&self) -> uom::si::f64::Time {
        use uom::si::length::meter;
        use uom::si::time::second;
        let a = self.semi_major_axis.get::<meter>();
        uom::si::f64::Time::new::<second>(2.0 * std::f64::consts::PI * (a.powi(3) / self.mu).sqrt())
    }

    /// Speed at perigee.
    #[must_use]
    pub fn perigee_speed(&self) -> uom::si::f64::Velocity {
        use uom::si::length::meter;
        use uom::si::velocity::meter_per_second;
        let a = self.semi_major_axis.get::<meter>();
        let rp = a * (1.0 - self.eccentricity);
        uom::si::f64::Velocity::new::<meter_per_second>((self.mu * (2.0 / rp - 1.0 / a)).sqrt())
    }

    /// Set the true anomaly by solving Kepler's equation for the eccentric
    /// anomaly corresponding to the given mean anomaly.
    ///
    /// The Newton seed follows the reference implementation: `m + e` (or
    /// `m - e` when `m` falls outside `[0, pi]`), which converges reliably
    /// across the full eccentricity range this module supports.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::NonConvergence`] if Newton's method does not
    /// converge within 100 iterations.
    pub fn set_with_mean_anomaly(&mut self, mean_anomaly: Angle) -> AstroResult<()> {
        let e = self.eccentricity;
        let m = mean_anomaly.get::<radian>();

        let mut ea = if m > std::f64::consts::PI || (m > -std::f64::consts::PI && m < 0.0) {
            m - e
        } else {
            m + e
        };

        let mut converged = false;
        for _ in 0..KEPLER_MAX_ITER {
            let f = ea - e * ea.sin() - m;
            let fp = 1.0 - e * ea.cos();
            let delta = f / fp;
            ea -= delta;
            if delta.abs() < KEPLER_TOLERANCE {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(AstroError::NonConvergence {
                solver: "kepler_equation".to_string(),
                iterations: KEPLER_MAX_ITER,
            });
        }

        let nu = 2.0
            * (((1.0 + e) / (1.0 - e)).sqrt() * (ea / 2.0).tan())
                .atan();
        self.true_anomaly = Angle::new::<radian>(nu);
        Ok(())
    }

    /// Propagate orbit to a new epoch using simple two-body Keplerian
    /// motion (constant mean motion, no perturbations).
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::NonConvergence`] if the Kepler equation solve
    /// for the propagated mean anomaly does not converge.
    pub fn propagate_to(
        &self,
        target_epoch: DateTime<Utc>,
        current_epoch: DateTime<Utc>,
    ) -> AstroResult<Self> {
        use uom::si::length::meter;

        let dt = (utc_to_julian_date(target_epoch) - utc_to_julian_date(current_epoch)) * 86400.0;

        let a = self.semi_major_axis.get::<meter>();
        let n = (self.mu / a.powi(3)).sqrt();

        let delta_m = n * dt;
        let new_mean_anomaly = self.mean_anomaly().get::<radian>() + delta_m;

        let mut propagated = *self;
        propagated.set_with_mean_anomaly(Angle::new::<radian>(new_mean_anomaly))?;
        Ok(propagated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use uom::si::length::kilometer;

    fn circular_ish() -> KeplerianElements {
        KeplerianElements::new(
            Length::new::<kilometer>(7000.0),
            0.001,
            Angle::new::<radian>(0.1),
            Angle::new::<radian>(0.0),
            Angle::new::<radian>(0.0),
            Angle::new::<radian>(0.0),
        )
    }

    #[test]
    fn circular_orbit_conversion() {
        let elements = circular_ish();
        let (pos, _vel) = elements.to_state_vectors();
        let distance = pos.distance_from_origin();
        assert!((distance.get::<kilometer>() - 7000.0).abs() < 10.0);
    }

    #[test]
    fn orbit_propagation_changes_true_anomaly() {
        let elements = circular_ish();
        let epoch1 = Utc::now();
        let epoch2 = epoch1 + chrono::Duration::hours(2);

        let propagated = elements.propagate_to(epoch2, epoch1).unwrap();

        assert!(propagated.true_anomaly.get::<radian>() != elements.true_anomaly.get::<radian>());
    }

    #[test]
    fn cartesian_round_trip_recovers_elements() {
        let elements = circular_ish();
        let (pos, vel) = elements.to_state_vectors();
        let [x, y, z] = pos.to_cartesian();
        use uom::si::length::meter;
        let position = [x.get::<meter>(), y.get::<meter>(), z.get::<meter>()];

        let recovered = KeplerianElements::from_cartesian(position, vel, elements.mu).unwrap();

        assert_relative_eq!(
            recovered.semi_major_axis.get::<meter>(),
            elements.semi_major_axis.get::<meter>(),
            epsilon = 1.0
        );
        assert_relative_eq!(recovered.eccentricity, elements.eccentricity, epsilon = 1e-6);
        assert_relative_eq!(
            recovered.inclination.get::<radian>(),
            elements.inclination.get::<radian>(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn rejects_near_zero_eccentricity() {
        let position = [7000.0e3, 0.0, 0.0];
        let velocity = [0.0, (MU_EARTH / 7000.0e3_f64).sqrt(), 0.1];
        let result = KeplerianElements::from_cartesian(position, velocity, MU_EARTH);
        assert!(matches!(result, Err(AstroError::InvalidOrbit { .. })));
    }

    #[test]
    fn rejects_perigee_below_surface() {
        let elements = KeplerianElements::new(
            Length::new::<kilometer>(6000.0),
            0.5,
            Angle::new::<radian>(0.5),
            Angle::new::<radian>(0.0),
            Angle::new::<radian>(0.0),
            Angle::new::<radian>(0.0),
        );
        assert!(matches!(
            elements.validate(),
            Err(AstroError::InvalidOrbit { .. })
        ));
    }

    #[test]
    fn set_with_mean_anomaly_converges() {
        let mut elements = circular_ish();
        elements.eccentricity = 0.7;
        elements
            .set_with_mean_anomaly(Angle::new::<radian>(2.5))
            .unwrap();
        let recovered_mean = elements.mean_anomaly().get::<radian>();
        assert_relative_eq!(recovered_mean, 2.5, epsilon = 1e-8);
    }
}
