//! Geodetic ground points and topocentric look-angle computations.

use crate::constants::{EARTH_RADIUS_EQUATORIAL, EARTH_RADIUS_POLAR};
use crate::errors::{AstroError, AstroResult};

const MAX_ITER: u32 = 10;
const TOLERANCE: f64 = 1e-6;

/// A fixed point on (or above) Earth's reference ellipsoid, in geodetic
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundPoint {
    /// Geodetic latitude, radians, positive north.
    pub latitude: f64,
    /// Longitude, radians, positive east.
    pub longitude: f64,
    /// Height above the reference ellipsoid, meters.
    pub altitude: f64,
}

fn ellipsoid_eccentricity_squared() -> f64 {
    1.0 - (EARTH_RADIUS_POLAR / EARTH_RADIUS_EQUATORIAL).powi(2)
}

impl GroundPoint {
    /// Construct directly from geodetic coordinates.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Convert to Earth-fixed Cartesian coordinates (meters), using the
    /// standard radius-of-curvature formula.
    #[must_use]
    pub fn to_cartesian(self) -> [f64; 3] {
        let a = EARTH_RADIUS_EQUATORIAL;
        let e2 = ellipsoid_eccentricity_squared();
        let (slat, clat) = self.latitude.sin_cos();
        let (slon, clon) = self.longitude.sin_cos();

        let n = a / (1.0 - e2 * slat * slat).sqrt();

        let x = (n + self.altitude) * clat * clon;
        let y = (n + self.altitude) * clat * slon;
        let z = (n * (1.0 - e2) + self.altitude) * slat;

        [x, y, z]
    }

    /// Convert an Earth-fixed Cartesian position (meters) to geodetic
    /// coordinates via Fukushima's quartic method.
    ///
    /// This starter-branch selection follows the reference formulation
    /// directly: the on-axis special case is handled separately, and the
    /// general case picks among three starting approximations for Newton's
    /// method based on where the query point falls relative to the
    /// ellipsoid's evolute.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::NonConvergence`] if Newton's method does not
    /// converge within the iteration budget.
    pub fn from_cartesian(pos: [f64; 3]) -> AstroResult<Self> {
        let [rx, ry, rz] = pos;
        let a = EARTH_RADIUS_EQUATORIAL;
        let e2 = ellipsoid_eccentricity_squared();
        let ep = (1.0 - e2).sqrt();
        let c = a * e2;

        let p = (rx * rx + ry * ry).sqrt();

        if p == 0.0 {
            let lat = if rz >= 0.0 {
                std::f64::consts::FRAC_PI_2
            } else {
                -std::f64::consts::FRAC_PI_2
            };
            let alt = rz.abs() - EARTH_RADIUS_POLAR;
            return Ok(Self::new(lat, 0.0, alt));
        }

        let lon = ry.atan2(rx);
        let lat_sign = if rz >= 0.0 { 1.0 } else { -1.0 };
        let zp = ep * rz.abs();

        let tm = (c - zp) / p;

        let quartic = |t: f64| -> f64 {
            // Fukushima's quartic residual in t = tan((pi/4) - (lat_parametric/2))
            let t2 = t * t;
            (p - c + 2.0 * zp * t + (p - c) * t2) * (1.0 + t2) - 2.0 * zp * t - p * t2 * (1.0 + t2)
        };

        let mut t = if tm <= 0.0 {
            (p - c + zp) / (p - c + 2.0 * zp)
        } else if tm >= 1.0 {
            p / (p + c)
        } else if quartic(tm) >= 0.0 {
            p / (p + c)
        } else {
            (p - c + zp) / (p - c + 2.0 * zp)
        };

        let mut converged = false;
        for _ in 0..MAX_ITER {
            let t2 = t * t;
            let f = (1.0 - t2) * (p - c * (1.0 - t2) / (1.0 + t2)) - 2.0 * t * zp;
            let df = -2.0 * t * (p - c * (1.0 - t2) / (1.0 + t2))
                + (1.0 - t2) * (4.0 * c * t / (1.0 + t2).powi(2))
                - 2.0 * zp;
            if df.abs() < 1e-300 {
                break;
            }
            let dt = -f / df;
            t += dt;
            if dt.abs() < TOLERANCE {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(AstroError::NonConvergence {
                solver: "fukushima_geodetic_quartic".to_string(),
                iterations: MAX_ITER,
            });
        }

        let t2 = t * t;
        let lat = lat_sign * (1.0 - t2).atan2(2.0 * ep * t);

        let (slat, clat) = lat.sin_cos();
        let n = a / (1.0 - e2 * slat * slat).sqrt();
        let alt = if clat.abs() > 1e-12 {
            p / clat - n
        } else {
            rz.abs() / slat.abs() - n * (1.0 - e2)
        };

        Ok(Self::new(lat, lon, alt))
    }

    /// Sine of the elevation angle of `target` (Earth-fixed Cartesian,
    /// meters) as seen from this ground point.
    #[must_use]
    pub fn sin_elevation(self, target: [f64; 3]) -> f64 {
        let site = self.to_cartesian();
        let pointing = [
            target[0] - site[0],
            target[1] - site[1],
            target[2] - site[2],
        ];
        let mag = (pointing[0].powi(2) + pointing[1].powi(2) + pointing[2].powi(2)).sqrt();
        if mag == 0.0 {
            return 1.0;
        }
        let pointing_hat = [pointing[0] / mag, pointing[1] / mag, pointing[2] / mag];

        let (slat, clat) = self.latitude.sin_cos();
        let (slon, clon) = self.longitude.sin_cos();

        clat * (pointing_hat[0] * clon + pointing_hat[1] * slon) + pointing_hat[2] * slat
    }

    /// Range (meters), azimuth (radians, from north, clockwise positive),
    /// and sine of elevation of `target` as seen from this ground point.
    #[must_use]
    pub fn range_azimuth_sin_elevation(self, target: [f64; 3]) -> (f64, f64, f64) {
        let site = self.to_cartesian();
        let d = [
            target[0] - site[0],
            target[1] - site[1],
            target[2] - site[2],
        ];
        let range = (d[0].powi(2) + d[1].powi(2) + d[2].powi(2)).sqrt();

        let (slat, clat) = self.latitude.sin_cos();
        let (slon, clon) = self.longitude.sin_cos();

        // East-North-Up basis vectors at this ground point.
        let east = [-slon, clon, 0.0];
        let north = [-slat * clon, -slat * slon, clat];
        let up = [clat * clon, clat * slon, slat];

        let e = d[0] * east[0] + d[1] * east[1] + d[2] * east[2];
        let n = d[0] * north[0] + d[1] * north[1] + d[2] * north[2];
        let u = d[0] * up[0] + d[1] * up[1] + d[2] * up[2];

        let azimuth = e.atan2(n).rem_euclid(2.0 * std::f64::consts::PI);
        let sin_el = if range > 0.0 { u / range } else { 1.0 };

        (range, azimuth, sin_el)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn equatorial_point_round_trips() {
        let gp = GroundPoint::new(0.0, 0.0, 0.0);
        let cart = gp.to_cartesian();
        let back = GroundPoint::from_cartesian(cart).unwrap();
        assert_relative_eq!(back.latitude, gp.latitude, epsilon = 1e-9);
        assert_relative_eq!(back.altitude, gp.altitude, epsilon = 1e-3);
    }

    #[test]
    fn mid_latitude_round_trips() {
        let gp = GroundPoint::new(40.0_f64.to_radians(), -105.0_f64.to_radians(), 1600.0);
        let cart = gp.to_cartesian();
        let back = GroundPoint::from_cartesian(cart).unwrap();
        assert_relative_eq!(back.latitude, gp.latitude, epsilon = 1e-9);
        assert_relative_eq!(back.longitude, gp.longitude, epsilon = 1e-9);
        assert_relative_eq!(back.altitude, gp.altitude, epsilon = 1e-2);
    }

    #[test]
    fn pole_special_case() {
        let gp = GroundPoint::new(std::f64::consts::FRAC_PI_2, 0.0, 0.0);
        let cart = gp.to_cartesian();
        let back = GroundPoint::from_cartesian(cart).unwrap();
        assert_relative_eq!(back.latitude, gp.latitude, epsilon = 1e-9);
    }

    #[test]
    fn overhead_target_has_sin_elevation_near_one() {
        let gp = GroundPoint::new(0.0, 0.0, 0.0);
        let site = gp.to_cartesian();
        let overhead = [site[0] * 2.0, site[1] * 2.0, site[2] * 2.0];
        assert_relative_eq!(gp.sin_elevation(overhead), 1.0, epsilon = 1e-6);
    }
}
