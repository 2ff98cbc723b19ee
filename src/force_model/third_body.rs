//! Low-precision analytic ephemerides for the Sun and Moon, and simple
//! point-mass third-body perturbing acceleration.
//!
//! These are intended for perturbation modeling (third-body gravity, solar
//! radiation pressure shadowing) where sub-arcminute accuracy is adequate,
//! not for almanac-grade ephemeris work.

use nalgebra::Vector3;

use crate::julian::JulianDate;
use crate::leap_seconds::LeapSecondTable;

const AU_METERS: f64 = 1.495_978_70e11;
const DEG: f64 = std::f64::consts::PI / 180.0;

/// Sun's gravitational parameter, m^3/s^2.
pub const MU_SUN: f64 = 1.327_124_400_18e20;

/// Moon's gravitational parameter, m^3/s^2.
pub const MU_MOON: f64 = 4.902_800_66e12;

fn julian_centuries_tt(jd_utc: &JulianDate, leap_seconds: &LeapSecondTable) -> f64 {
    let utc = jd_utc.to_calendar_utc();
    let tt_jd = crate::time_scales::utc_to_tt(utc, leap_seconds);
    (tt_jd - 2_451_545.0) / 36525.0
}

/// Low-precision Sun position, mean equinox of date, meters. Ported from
/// the abbreviated Meeus solar position series (accurate to about 0.01
/// degrees through the 21st century).
#[must_use]
pub fn sun_position(jd_utc: &JulianDate, leap_seconds: &LeapSecondTable) -> Vector3<f64> {
    let t = julian_centuries_tt(jd_utc, leap_seconds);

    let ecc = 0.016_708_634 - t * (0.000_042_037 + t * 0.000_000_126_7);

    let mut el0 = 280.466_46 + t * (36000.769_83 + t * 0.000_303_2);
    let mut em = 357.529_11 + t * (35999.050_29 - t * 0.000_153_7);
    el0 *= DEG;
    em *= DEG;

    let cee = DEG
        * ((1.914_602 - t * (0.004_817 + t * 0.000_014)) * em.sin()
            + (0.019_993 - t * 0.000_101) * (2.0 * em).sin()
            + 0.000_289 * (3.0 * em).sin());

    let lon_sun = el0 + cee;
    let nu_sun = em + cee;
    let r_sun_au = 1.000_001_018 * (1.0 - ecc * ecc) / (1.0 + ecc * nu_sun.cos());
    let r_sun = r_sun_au * AU_METERS;

    let e0 = DEG
        * (23.0 + 26.0 / 60.0 + 21.448 / 3600.0
            - t * (46.8150 / 3600.0 - t * (0.00059 / 3600.0 - t * (0.001813 / 3600.0))));

    let ra = (e0.cos() * lon_sun.sin()).atan2(lon_sun.cos());
    let de = (e0.sin() * lon_sun.sin()).asin();

    Vector3::new(
        r_sun * de.cos() * ra.cos(),
        r_sun * de.cos() * ra.sin(),
        r_sun * de.sin(),
    )
}

/// Sun position and velocity (central-difference, one-minute step), meters
/// and meters/second.
#[must_use]
pub fn sun_state(jd_utc: &JulianDate, leap_seconds: &LeapSecondTable) -> (Vector3<f64>, Vector3<f64>) {
    central_difference_state(jd_utc, leap_seconds, sun_position)
}

/// Low-precision Moon position, mean equinox of date, meters. This is an
/// abbreviated lunar series retaining only the dominant periodic terms
/// (evection, variation, annual equation, and the largest longitude and
/// latitude perturbations), not the full ELP2000 periodic table the
/// higher-fidelity analytic lunar theory uses; expect errors up to a few
/// tenths of a degree rather than arcsecond-level accuracy.
#[must_use]
pub fn moon_position(jd_utc: &JulianDate, leap_seconds: &LeapSecondTable) -> Vector3<f64> {
    let t = julian_centuries_tt(jd_utc, leap_seconds);

    let reduce = |x: f64| x - 360.0 * (x / 360.0).floor();

    let el_prime = reduce(218.316_447_7 + t * (481_267.881_234_21 - t * 0.001_578_6));
    let dee = reduce(297.850_192_1 + t * (445_267.111_403_4 - t * 0.001_881_9));
    let em_prime = reduce(134.963_396_4 + t * (477_198.867_505_5 + t * 0.008_741_4));
    let eff = reduce(93.272_095_0 + t * (483_202.017_523_3 - t * 0.003_653_9));

    let a1 = reduce(119.75 + t * 131.849);
    let a2 = reduce(53.09 + t * 479_264.290);
    let a3 = reduce(313.45 + t * 481_266.484);

    // Dominant periodic terms of the longitude/latitude series, in
    // arcseconds (divided by 1e6 below to match the source convention),
    // with arguments in degrees.
    let sum_lon = 6_288.06 * (2.0 * dee * DEG - em_prime * DEG).sin()
        + 3958.0 * (a1 * DEG).sin()
        + 1962.0 * ((el_prime - eff) * DEG).sin()
        + 318.0 * (a2 * DEG).sin();

    let sum_lat = -2235.0 * (el_prime * DEG).sin()
        + 382.0 * (a3 * DEG).sin()
        + 175.0 * ((a1 - eff) * DEG).sin()
        + 175.0 * ((a1 + eff) * DEG).sin()
        + 127.0 * ((el_prime - em_prime) * DEG).sin()
        - 115.0 * ((el_prime + em_prime) * DEG).sin();

    let lon_moon = el_prime + sum_lon / 1_000_000.0;
    let lat_moon = sum_lat / 1_000_000.0;
    let rng_moon_km = 385_000.56;

    let e0_deg = (21.448 + 60.0 * (26.0 + 60.0 * 23.0)
        - t * (46.8150 - t * (0.00059 - t * 0.001813)))
        / 3600.0;
    let e0 = e0_deg * DEG;

    let lon = lon_moon * DEG;
    let lat = lat_moon * DEG;
    let (slon, clon) = lon.sin_cos();
    let (se0, ce0) = e0.sin_cos();

    let ra = (ce0 * slon - lat.tan() * se0).atan2(clon);
    let de = (lat.sin() * ce0 + lat.cos() * se0 * slon).asin();

    let r = rng_moon_km * 1000.0;

    Vector3::new(
        r * de.cos() * ra.cos(),
        r * de.cos() * ra.sin(),
        r * de.sin(),
    )
}

/// Moon position and velocity (central-difference, one-minute step), meters
/// and meters/second.
#[must_use]
pub fn moon_state(jd_utc: &JulianDate, leap_seconds: &LeapSecondTable) -> (Vector3<f64>, Vector3<f64>) {
    central_difference_state(jd_utc, leap_seconds, moon_position)
}

fn central_difference_state(
    jd_utc: &JulianDate,
    leap_seconds: &LeapSecondTable,
    position_fn: impl Fn(&JulianDate, &LeapSecondTable) -> Vector3<f64>,
) -> (Vector3<f64>, Vector3<f64>) {
    let one_minute_days = 1.0 / 1440.0;

    let mut jd_plus = *jd_utc;
    jd_plus += one_minute_days;
    let mut jd_minus = *jd_utc;
    jd_minus += -one_minute_days;

    let pos = position_fn(jd_utc, leap_seconds);
    let pos_plus = position_fn(&jd_plus, leap_seconds);
    let pos_minus = position_fn(&jd_minus, leap_seconds);

    let vel = (pos_plus - pos_minus) / (2.0 * 60.0);
    (pos, vel)
}

/// Third-body point-mass perturbing acceleration on a satellite, using the
/// standard difference form that cancels the dominant central-body term
/// shared between the satellite and the perturbing body (avoids the
/// numerical cancellation a naive `a_sat - a_body` difference would incur).
///
/// `sat_position` and `body_position` are both in the same inertial frame,
/// meters; `body_mu` is the perturbing body's gravitational parameter.
#[must_use]
pub fn third_body_acceleration(
    sat_position: Vector3<f64>,
    body_position: Vector3<f64>,
    body_mu: f64,
) -> Vector3<f64> {
    let d = body_position - sat_position;
    let dmag = d.norm();
    let bmag = body_position.norm();

    body_mu * (d / dmag.powi(3) - body_position / bmag.powi(3))
}

/// Spherical-satellite radiation pressure and mass properties used by
/// [`solar_radiation_pressure_acceleration`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SrpConfig {
    /// Cross-sectional area to mass ratio, m^2/kg.
    pub area_to_mass: f64,
    /// Radiation pressure coefficient `Cr` (1.0 pure absorption, up to
    /// ~2.0 for a perfect mirror).
    pub reflectivity: f64,
}

/// Very simple spherical-satellite solar radiation pressure acceleration.
///
/// `sun_position` and `sat_position` are in the same inertial frame,
/// meters; `area_to_mass` is in m^2/kg; `reflectivity` is the usual `Cr`
/// coefficient (1.0 for pure absorption, up to ~2.0 for a perfect mirror).
/// Always assumes full sunlight; shadow modeling is out of scope.
#[must_use]
pub fn solar_radiation_pressure_acceleration(
    sat_position: Vector3<f64>,
    sun_position: Vector3<f64>,
    area_to_mass: f64,
    reflectivity: f64,
) -> Vector3<f64> {
    const SOLAR_PRESSURE_AT_1AU: f64 = 4.56e-6; // N/m^2

    let sun_to_sat = sat_position - sun_position;
    let dist_au = sun_to_sat.norm() / AU_METERS;
    let pressure = SOLAR_PRESSURE_AT_1AU / (dist_au * dist_au);

    sun_to_sat.normalize() * (pressure * reflectivity * area_to_mass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leap_seconds::LeapSecondTable;

    fn epoch() -> JulianDate {
        JulianDate::from_calendar_utc(chrono::Utc::now())
    }

    #[test]
    fn sun_distance_is_near_one_au() {
        let leap_seconds = LeapSecondTable::current_estimate();
        let pos = sun_position(&epoch(), &leap_seconds);
        let au = pos.norm() / AU_METERS;
        assert!(au > 0.97 && au < 1.03);
    }

    #[test]
    fn moon_distance_is_near_385000_km() {
        let leap_seconds = LeapSecondTable::current_estimate();
        let pos = moon_position(&epoch(), &leap_seconds);
        let dist_km = pos.norm() / 1000.0;
        assert!(dist_km > 350_000.0 && dist_km < 410_000.0);
    }

    #[test]
    fn sun_velocity_is_reasonable_orbital_rate() {
        let leap_seconds = LeapSecondTable::current_estimate();
        let (_pos, vel) = sun_state(&epoch(), &leap_seconds);
        // Earth's heliocentric orbital speed as seen from the geocenter is
        // of similar order (~30 km/s).
        assert!(vel.norm() > 20_000.0 && vel.norm() < 40_000.0);
    }

    #[test]
    fn third_body_acceleration_points_toward_perturbing_body_nearby() {
        let sat = Vector3::new(7_000_000.0, 0.0, 0.0);
        let body = Vector3::new(400_000_000.0, 0.0, 0.0);
        let acc = third_body_acceleration(sat, body, MU_MOON);
        assert!(acc.x > 0.0);
    }

    #[test]
    fn srp_points_away_from_the_sun() {
        let sun = Vector3::new(AU_METERS, 0.0, 0.0);
        let sat = Vector3::new(-7_000_000.0, 0.0, 0.0);
        let acc = solar_radiation_pressure_acceleration(sat, sun, 0.02, 1.3);
        assert!(acc.x < 0.0);
        assert!(acc.norm() > 0.0);
    }
}
