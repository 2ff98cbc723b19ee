//! Time scale conversions for celestial mechanics.
//!
//! This module provides conversions between various astronomical time scales:
//! - UTC (Coordinated Universal Time)
//! - TAI (International Atomic Time)
//! - TT (Terrestrial Time)
//! - UT1 (Universal Time)
//! - TDB (Barycentric Dynamical Time)

use chrono::{DateTime, Datelike, Utc};

use super::constants::SECONDS_PER_DAY;
use super::errors::AstroResult;
use super::eop::EopSystem;
use super::leap_seconds::LeapSecondTable;
use super::AstroError;

/// Minimum valid epoch year for celestial calculations.
const MIN_VALID_YEAR: i32 = 1900;

/// Maximum valid epoch year for celestial calculations.
const MAX_VALID_YEAR: i32 = 2100;

/// TT - TAI offset in seconds (defined constant).
const TT_MINUS_TAI: f64 = 32.184;

/// Validate that an epoch is within supported range.
///
/// The celestial module supports epochs from 1900-2100. Outside this range,
/// astronomical models (precession, nutation, etc.) may not be accurate.
///
/// # Errors
///
/// Returns `AstroError::EpochOutOfRange` if the epoch year is outside [1900, 2100].
pub fn validate_epoch(epoch: DateTime<Utc>) -> AstroResult<()> {
    let year = epoch.year();
    if !(MIN_VALID_YEAR..=MAX_VALID_YEAR).contains(&year) {
        let min_jd = 2415020.5; // ~1900-01-01
        let max_jd = 2488070.5; // ~2100-01-01
        return Err(AstroError::EpochOutOfRange {
            epoch,
            min_jd,
            max_jd,
        });
    }
    Ok(())
}

fn utc_to_jd(utc: DateTime<Utc>) -> f64 {
    utc.timestamp() as f64 / SECONDS_PER_DAY + 2440587.5
        + f64::from(utc.timestamp_subsec_nanos()) / 1.0e9 / SECONDS_PER_DAY
}

/// Convert UTC to TAI (International Atomic Time), as a Julian Date.
///
/// TAI = UTC + (TAI - UTC), where the offset is looked up in `leap_seconds`
/// for the given epoch rather than assumed constant.
#[must_use]
pub fn utc_to_tai(utc: DateTime<Utc>, leap_seconds: &LeapSecondTable) -> f64 {
    let jd_utc = utc_to_jd(utc);
    jd_utc + (leap_seconds.tai_minus_utc(utc) / SECONDS_PER_DAY)
}

/// Convert UTC to TT (Terrestrial Time), as a Julian Date.
///
/// TT = TAI + 32.184s, a fixed, defined offset.
#[must_use]
pub fn utc_to_tt(utc: DateTime<Utc>, leap_seconds: &LeapSecondTable) -> f64 {
    utc_to_tai(utc, leap_seconds) + (TT_MINUS_TAI / SECONDS_PER_DAY)
}

/// Convert UTC to UT1 (Universal Time), as a Julian Date.
///
/// UT1 = UTC + (UT1-UTC), where DUT1 is taken from `eop` (defaulting to 0 if
/// no record covers this epoch — within the guaranteed ±0.9s IERS bound).
#[must_use]
pub fn utc_to_ut1(utc: DateTime<Utc>, eop: &EopSystem) -> f64 {
    let jd_utc = utc_to_jd(utc);
    jd_utc + (eop.dut1_seconds(jd_utc) / SECONDS_PER_DAY)
}

/// Convert UTC to TDB (Barycentric Dynamical Time), as a Julian Date.
///
/// TDB is the time scale for solar system dynamics, accounting for
/// relativistic effects.
///
/// # Approximation
///
/// This uses a simplified formula. The full conversion requires the
/// observer's position and velocity in the solar system barycentric frame.
///
/// TDB ≈ TT + 0.001658 sin(g) + 0.000014 sin(2g)
/// where g = 357.53 + 0.9856003 * (JD - 2451545.0) degrees
#[must_use]
pub fn utc_to_tdb(utc: DateTime<Utc>, leap_seconds: &LeapSecondTable) -> f64 {
    let tt = utc_to_tt(utc, leap_seconds);
    let t = tt - 2451545.0; // Days from J2000

    let g_deg = 357.53 + 0.9856003 * t;
    let g = g_deg.to_radians();

    let periodic = 0.001658 * g.sin() + 0.000014 * (2.0 * g).sin();

    tt + (periodic / SECONDS_PER_DAY)
}

/// Convert TT (as a Julian Date) to an approximate UTC Julian Date.
///
/// This is an approximation since leap seconds make the conversion non-trivial.
#[must_use]
pub fn tt_to_utc_approx(tt_jd: f64, leap_seconds: &LeapSecondTable, near: DateTime<Utc>) -> f64 {
    tt_jd - ((leap_seconds.tai_minus_utc(near) + TT_MINUS_TAI) / SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_to_tai_offset_is_positive() {
        let leap_seconds = LeapSecondTable::current_estimate();
        let utc = Utc::now();
        let tai = utc_to_tai(utc, &leap_seconds);
        let utc_jd = utc_to_jd(utc);

        assert!((tai - utc_jd) > 0.0);
        assert!((tai - utc_jd) * SECONDS_PER_DAY > 30.0);
    }

    #[test]
    fn utc_to_tt_offset_is_correct() {
        let leap_seconds = LeapSecondTable::current_estimate();
        let utc = Utc::now();
        let tt = utc_to_tt(utc, &leap_seconds);
        let utc_jd = utc_to_jd(utc);

        let offset_seconds = (tt - utc_jd) * SECONDS_PER_DAY;
        let expected = leap_seconds.tai_minus_utc(utc) + TT_MINUS_TAI;

        assert!((offset_seconds - expected).abs() < 0.1);
    }

    #[test]
    fn tt_to_utc_roundtrip_is_approximate() {
        let leap_seconds = LeapSecondTable::current_estimate();
        let utc = Utc::now();
        let tt = utc_to_tt(utc, &leap_seconds);
        let utc_back = tt_to_utc_approx(tt, &leap_seconds, utc);
        let utc_jd = utc_to_jd(utc);

        assert!((utc_back - utc_jd).abs() * SECONDS_PER_DAY < 1.0);
    }

    #[test]
    fn tdb_differs_from_tt_by_small_amount() {
        let leap_seconds = LeapSecondTable::current_estimate();
        let utc = Utc::now();
        let tt = utc_to_tt(utc, &leap_seconds);
        let tdb = utc_to_tdb(utc, &leap_seconds);

        let diff_seconds = (tdb - tt).abs() * SECONDS_PER_DAY;
        assert!(diff_seconds < 0.002);
    }

    #[test]
    fn ut1_without_eop_record_falls_back_to_utc() {
        let eop = EopSystem::empty();
        let utc = Utc::now();
        let ut1 = utc_to_ut1(utc, &eop);
        let utc_jd = utc_to_jd(utc);
        assert!((ut1 - utc_jd).abs() < 1.0 / SECONDS_PER_DAY);
    }
}
