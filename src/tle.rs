//! Two-Line Element (TLE) set support for satellite tracking.
//!
//! TLE sets are the standard format for distributing satellite orbital elements.
//! They are used with the SGP4/SDP4 propagation models for predicting satellite positions.

use super::errors::{AstroError, AstroResult};
use super::frames::Icrs;
use super::orbital::KeplerianElements;
use super::timed::EphemerisState;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sguaba::Coordinate;
use uom::si::angle::degree;
use uom::si::f64::{Angle, Length};
use uom::si::length::kilometer;

/// A Two-Line Element set representing satellite orbital parameters.
///
/// TLE format is standardized by NORAD/Space Track and consists of
/// two 69-character lines encoding orbital elements and metadata.
///
/// # Example TLE
///
/// ```text
/// ISS (ZARYA)
/// 1 25544U 98067A   20206.18539600  .00001406  00000-0  33518-4 0  9992
/// 2 25544  51.6461 339.8014 0001473  94.8340 265.2864 15.49309432236008
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TleElements {
    /// Satellite catalog number
    catalog_number: u32,
    /// Elset classification character ('U', 'C', or 'S')
    classification: char,
    /// International designator launch year, 4-digit
    intl_designator_year: u32,
    /// International designator launch number of the year
    intl_designator_launch_number: u32,
    /// International designator piece of the launch
    intl_designator_piece: String,
    /// Epoch (time of element set)
    epoch: DateTime<Utc>,
    /// First derivative of mean motion, revs/day^2 (ballistic coefficient)
    mean_motion_dot: f64,
    /// Second derivative of mean motion, revs/day^3
    mean_motion_ddot: f64,
    /// Drag term B*, in units of (Earth radii)^-1
    bstar: f64,
    /// Ephemeris type (always 0 for distributed TLEs)
    ephemeris_type: u8,
    /// Element set number
    element_set_number: u32,
    /// Inclination
    inclination: Angle,
    /// Right ascension of ascending node
    raan: Angle,
    /// Eccentricity
    eccentricity: f64,
    /// Argument of perigee
    arg_perigee: Angle,
    /// Mean anomaly
    mean_anomaly: Angle,
    /// Mean motion (revolutions per day)
    mean_motion: f64,
    /// Revolution number at epoch
    revolution_number: u32,
    /// The raw two lines, kept so the `sgp4` crate can reparse them exactly.
    raw_lines: (String, String),
}

fn parse_field<T: std::str::FromStr>(field: &str, name: &str) -> AstroResult<T> {
    field
        .trim()
        .parse::<T>()
        .map_err(|_| AstroError::ParseFailure {
            what: "TLE".to_string(),
            reason: format!("invalid {name}: {field:?}"),
        })
}

/// Parse a TLE-style signed, assumed-decimal-point exponential field, e.g.
/// `" 33518-4"` (meaning `+0.33518e-4`) or `"-12345-3"`.
fn parse_tle_exponential(field: &str, name: &str) -> AstroResult<f64> {
    let field = field.trim();
    let err = || AstroError::ParseFailure {
        what: "TLE".to_string(),
        reason: format!("invalid {name}: {field:?}"),
    };

    if field.is_empty() {
        return Ok(0.0);
    }

    let (sign, rest) = match field.as_bytes()[0] {
        b'-' => (-1.0, &field[1..]),
        b'+' => (1.0, &field[1..]),
        _ => (1.0, field),
    };

    let exp_pos = rest
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i)
        .ok_or_else(err)?;

    let mantissa_digits = &rest[..exp_pos];
    let exponent: i32 = rest[exp_pos..].parse().map_err(|_| err())?;
    let mantissa: f64 = format!("0.{mantissa_digits}").parse().map_err(|_| err())?;

    Ok(sign * mantissa * 10f64.powi(exponent))
}

impl TleElements {
    /// Parse a TLE from two lines.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::ParseFailure`] if the TLE format is invalid.
    pub fn from_lines(line1: &str, line2: &str) -> AstroResult<Self> {
        if line1.len() < 69 || line2.len() < 69 {
            return Err(AstroError::ParseFailure {
                what: "TLE".to_string(),
                reason: "TLE lines must be at least 69 characters".to_string(),
            });
        }
        if !line1.starts_with('1') || !line2.starts_with('2') {
            return Err(AstroError::ParseFailure {
                what: "TLE".to_string(),
                reason: "invalid TLE line numbers".to_string(),
            });
        }

        let catalog_number = parse_field::<u32>(&line1[2..7], "catalog number")?;
        let classification = line1.as_bytes()[7] as char;

        let intl_designator_year_2d = parse_field::<u32>(&line1[9..11], "intl designator year")?;
        let intl_designator_year = if intl_designator_year_2d < 57 {
            2000 + intl_designator_year_2d
        } else {
            1900 + intl_designator_year_2d
        };
        let intl_designator_launch_number =
            parse_field::<u32>(&line1[11..14], "intl designator launch number")?;
        let intl_designator_piece = line1[14..17].trim().to_string();

        let epoch_year = parse_field::<i32>(&line1[18..20], "epoch year")?;
        let epoch_year = if epoch_year < 57 {
            2000 + epoch_year
        } else {
            1900 + epoch_year
        };
        let epoch_day = parse_field::<f64>(&line1[20..32], "epoch day")?;
        let epoch = tle_epoch_to_datetime(epoch_year, epoch_day)?;

        let mean_motion_dot = 2.0 * parse_field::<f64>(&line1[33..43], "mean motion dot")?;
        let mean_motion_ddot = parse_tle_exponential(&line1[44..52], "mean motion ddot")?;
        let bstar = parse_tle_exponential(&line1[53..61], "bstar")?;
        let ephemeris_type = parse_field::<u8>(&line1[62..63], "ephemeris type")?;
        let element_set_number = parse_field::<u32>(line1[64..68].trim(), "element set number")?;

        let inclination = Angle::new::<degree>(parse_field::<f64>(&line2[8..16], "inclination")?);
        let raan = Angle::new::<degree>(parse_field::<f64>(&line2[17..25], "RAAN")?);
        let eccentricity = format!("0.{}", line2[26..33].trim())
            .parse::<f64>()
            .map_err(|_| AstroError::ParseFailure {
                what: "TLE".to_string(),
                reason: "invalid eccentricity".to_string(),
            })?;
        let arg_perigee = Angle::new::<degree>(parse_field::<f64>(&line2[34..42], "argument of perigee")?);
        let mean_anomaly = Angle::new::<degree>(parse_field::<f64>(&line2[43..51], "mean anomaly")?);
        let mean_motion = parse_field::<f64>(&line2[52..63], "mean motion")?;
        let revolution_number = parse_field::<u32>(line2[63..68].trim(), "revolution number")?;

        Ok(Self {
            catalog_number,
            classification,
            intl_designator_year,
            intl_designator_launch_number,
            intl_designator_piece,
            epoch,
            mean_motion_dot,
            mean_motion_ddot,
            bstar,
            ephemeris_type,
            element_set_number,
            inclination,
            raan,
            eccentricity,
            arg_perigee,
            mean_anomaly,
            mean_motion,
            revolution_number,
            raw_lines: (line1.to_string(), line2.to_string()),
        })
    }

    /// Get the satellite catalog number.
    #[must_use]
    pub fn catalog_number(&self) -> u32 {
        self.catalog_number
    }

    /// Get the elset classification character.
    #[must_use]
    pub fn classification(&self) -> char {
        self.classification
    }

    /// Get the international designator as `(year, launch_number, piece)`.
    #[must_use]
    pub fn international_designator(&self) -> (u32, u32, &str) {
        (
            self.intl_designator_year,
            self.intl_designator_launch_number,
            &self.intl_designator_piece,
        )
    }

    /// Get the epoch of the TLE.
    #[must_use]
    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// Get the inclination.
    #[must_use]
    pub fn inclination(&self) -> Angle {
        self.inclination
    }

    /// Get the eccentricity.
    #[must_use]
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// First derivative of mean motion (revs/day²).
    #[must_use]
    pub fn mean_motion_dot(&self) -> f64 {
        self.mean_motion_dot
    }

    /// Second derivative of mean motion (revs/day³).
    #[must_use]
    pub fn mean_motion_ddot(&self) -> f64 {
        self.mean_motion_ddot
    }

    /// Drag term B*, in inverse Earth radii.
    #[must_use]
    pub fn bstar(&self) -> f64 {
        self.bstar
    }

    /// Ephemeris type.
    #[must_use]
    pub fn ephemeris_type(&self) -> u8 {
        self.ephemeris_type
    }

    /// Element set number.
    #[must_use]
    pub fn element_set_number(&self) -> u32 {
        self.element_set_number
    }

    /// Revolution number at epoch.
    #[must_use]
    pub fn revolution_number(&self) -> u32 {
        self.revolution_number
    }

    /// The raw two TLE lines this element set was parsed from.
    #[must_use]
    pub fn raw_lines(&self) -> (&str, &str) {
        (&self.raw_lines.0, &self.raw_lines.1)
    }

    /// Convert the TLE's mean elements to [`KeplerianElements`].
    ///
    /// This conversion computes the semi-major axis from the mean motion
    /// using Earth's gravitational parameter. Note that these are *mean*
    /// elements in the Brouwer sense used by SGP4, not osculating elements;
    /// for an accurate propagated state use [`crate::propagators::sgp4`].
    #[must_use]
    pub fn to_keplerian(&self) -> KeplerianElements {
        let n = self.mean_motion * 2.0 * std::f64::consts::PI / 86400.0;

        let mu = super::constants::MU_EARTH;
        let a = (mu / (n * n)).powf(1.0 / 3.0);

        KeplerianElements::new(
            Length::new::<kilometer>(a / 1000.0),
            self.eccentricity,
            self.inclination,
            self.raan,
            self.arg_perigee,
            self.mean_anomaly,
        )
    }

    /// Propagate this TLE to `target_epoch` using the SGP4 model, returning
    /// the resulting state in the TEME frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying SGP4 propagator rejects these
    /// elements or the requested epoch.
    pub fn propagate_to_teme(
        &self,
        target_epoch: DateTime<Utc>,
    ) -> AstroResult<EphemerisState<super::additional_frames::Teme>> {
        super::propagators::sgp4::propagate(self, target_epoch)
    }

    /// Propagate to a future epoch using simplified two-body dynamics on
    /// the TLE's mean Keplerian elements.
    ///
    /// This ignores drag and all J2+ perturbations; prefer
    /// [`TleElements::propagate_to_teme`] for real satellite tracking.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying Kepler solve fails to converge.
    pub fn propagate_to(&self, target_epoch: DateTime<Utc>) -> AstroResult<Coordinate<Icrs>> {
        let elements = self.to_keplerian();
        let propagated = elements.propagate_to(target_epoch, self.epoch)?;
        let (position, _velocity) = propagated.to_state_vectors();
        Ok(position)
    }
}

/// Convert TLE epoch (year + day-of-year) to DateTime.
fn tle_epoch_to_datetime(year: i32, day_of_year: f64) -> AstroResult<DateTime<Utc>> {
    let jan1 = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AstroError::ParseFailure {
            what: "TLE".to_string(),
            reason: "invalid epoch year".to_string(),
        })?;

    let whole_days = day_of_year.floor() as i64 - 1;
    let fractional_day = day_of_year - day_of_year.floor();
    let seconds = (fractional_day * 86400.0).round() as i64;

    Ok(jan1 + Duration::days(whole_days) + Duration::seconds(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const LINE1: &str = "1 25544U 98067A   20206.18539600  .00001406  00000-0  33518-4 0  9992";
    const LINE2: &str = "2 25544  51.6461 339.8014 0001473  94.8340 265.2864 15.49309432236008";

    #[test]
    fn parse_iss_tle() {
        let tle = TleElements::from_lines(LINE1, LINE2).unwrap();

        assert_eq!(tle.catalog_number(), 25544);
        assert!((tle.inclination().get::<degree>() - 51.6461).abs() < 0.001);
        assert!((tle.eccentricity() - 0.0001473).abs() < 0.000001);
        assert_eq!(tle.international_designator().0, 1998);
        assert_eq!(tle.revolution_number(), 23600);
    }

    #[test]
    fn parses_bstar_and_derivatives() {
        let tle = TleElements::from_lines(LINE1, LINE2).unwrap();
        assert!((tle.mean_motion_dot() - 2.0 * 0.00001406).abs() < 1e-12);
        assert!((tle.bstar() - 0.33518e-4).abs() < 1e-9);
    }

    #[test]
    fn tle_epoch_conversion() {
        let dt = tle_epoch_to_datetime(2020, 206.18539600).unwrap();

        assert_eq!(dt.year(), 2020);
        assert_eq!(dt.month(), 7);
        assert_eq!(dt.day(), 24);
    }

    #[test]
    fn tle_to_keplerian() {
        let tle = TleElements::from_lines(LINE1, LINE2).unwrap();
        let kep = tle.to_keplerian();

        let a_km = kep.semi_major_axis.get::<kilometer>();
        assert!(a_km > 6700.0 && a_km < 6900.0);
    }

    #[test]
    fn rejects_short_lines() {
        assert!(TleElements::from_lines("1 25544U", "2 25544").is_err());
    }
}
