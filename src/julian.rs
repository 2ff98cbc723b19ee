//! High-precision Julian Date arithmetic.
//!
//! A [`JulianDate`] is split into a coarse, integer-valued `hi` part and a
//! small fractional `lo` remainder so that epoch differences over long
//! propagation spans do not lose precision to `f64` cancellation.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use std::ops::{Add, AddAssign, Sub};

use crate::constants::SECONDS_PER_DAY;

/// A Julian Date represented as a coarse/fine pair for numerical stability.
///
/// `hi` holds an integer number of days (the noon-referenced Julian Date of
/// the enclosing day boundary) and `lo` holds the fractional day offset from
/// that boundary, normally kept in `[0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JulianDate {
    jd_hi: f64,
    jd_lo: f64,
}

impl JulianDate {
    /// Build a `JulianDate` from a single full-precision Julian Date value.
    #[must_use]
    pub fn new(jd: f64) -> Self {
        let hi = jd.floor();
        let lo = jd - hi;
        let mut out = Self { jd_hi: hi, jd_lo: lo };
        out.normalize();
        out
    }

    /// Build a `JulianDate` directly from a coarse/fine pair.
    #[must_use]
    pub fn from_hi_lo(jd_hi: f64, jd_lo: f64) -> Self {
        let mut out = Self { jd_hi, jd_lo };
        out.normalize();
        out
    }

    /// Build a `JulianDate` from a UTC calendar timestamp (treated here as a
    /// plain Julian Date conversion; time-scale offsets are handled by
    /// [`crate::time_scales`]).
    #[must_use]
    pub fn from_calendar_utc(time: DateTime<Utc>) -> Self {
        let jd = calendar_to_jd(
            time.year(),
            time.month() as i32,
            time.day() as i32,
            time.hour() as f64,
            time.minute() as f64,
            time.second() as f64 + f64::from(time.nanosecond()) / 1.0e9,
        );
        Self::new(jd)
    }

    /// Convert back to a UTC calendar timestamp.
    #[must_use]
    pub fn to_calendar_utc(self) -> DateTime<Utc> {
        let (y, mo, d, h, mi, s) = jd_to_calendar(self.jd());
        let whole_s = s.floor();
        let nanos = ((s - whole_s) * 1.0e9).round() as u32;
        Utc.with_ymd_and_hms(y, mo as u32, d as u32, h as u32, mi as u32, whole_s as u32)
            .single()
            .unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap())
            + chrono::Duration::nanoseconds(i64::from(nanos))
    }

    /// The full-precision Julian Date, `hi + lo`.
    #[must_use]
    pub fn jd(self) -> f64 {
        self.jd_hi + self.jd_lo
    }

    /// The coarse (integer-valued) part.
    #[must_use]
    pub fn jd_hi(self) -> f64 {
        self.jd_hi
    }

    /// The fine (fractional) part.
    #[must_use]
    pub fn jd_lo(self) -> f64 {
        self.jd_lo
    }

    /// Julian centuries elapsed since the J2000.0 epoch (JD 2451545.0).
    #[must_use]
    pub fn centuries_since_j2000(self) -> f64 {
        (self.jd() - crate::constants::J2000_JD) / crate::constants::DAYS_PER_CENTURY
    }

    /// Days elapsed since the J2000.0 epoch.
    #[must_use]
    pub fn days_since_j2000(self) -> f64 {
        self.jd() - crate::constants::J2000_JD
    }

    /// Re-centers `jd_hi` onto an integer day boundary and folds any whole
    /// days accumulated in `jd_lo` back into `jd_hi`, leaving `jd_lo` in
    /// `[0, 1)`.
    ///
    /// Repeated [`AddAssign`] accumulates purely into `jd_lo` without
    /// folding, by design: folding on every add would re-introduce the
    /// cancellation error this split representation exists to avoid.
    /// `normalize` is the single place that performs the fold.
    pub fn normalize(&mut self) {
        let new_hi = self.jd_hi.floor() + 1.0;
        self.jd_lo += self.jd_hi - new_hi;
        self.jd_hi = new_hi;

        let whole = self.jd_lo.floor();
        self.jd_hi += whole;
        self.jd_lo -= whole;
    }
}

impl AddAssign<f64> for JulianDate {
    /// Accumulate an elapsed number of days. This purely adds into `jd_lo`;
    /// call [`JulianDate::normalize`] when the fractional part needs to be
    /// folded back to `[0, 1)`.
    fn add_assign(&mut self, days: f64) {
        self.jd_lo += days;
    }
}

impl Add<f64> for JulianDate {
    type Output = Self;

    fn add(mut self, days: f64) -> Self {
        self += days;
        self
    }
}

impl Sub for JulianDate {
    type Output = f64;

    /// Difference in days, computed from the hi/lo pairs directly to retain
    /// precision rather than going through `jd()`.
    fn sub(self, other: Self) -> f64 {
        (self.jd_hi - other.jd_hi) + (self.jd_lo - other.jd_lo)
    }
}

/// An elapsed time interval expressed in days (a "time unit" in the sense
/// used throughout the propagator modules, which work in days rather than
/// seconds to keep numerical ranges well-scaled).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Duration {
    days: f64,
}

impl Duration {
    /// Construct from a number of days.
    #[must_use]
    pub fn from_days(days: f64) -> Self {
        Self { days }
    }

    /// Construct from a number of seconds.
    #[must_use]
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            days: seconds / SECONDS_PER_DAY,
        }
    }

    /// Elapsed days.
    #[must_use]
    pub fn days(self) -> f64 {
        self.days
    }

    /// Elapsed seconds.
    #[must_use]
    pub fn seconds(self) -> f64 {
        self.days * SECONDS_PER_DAY
    }
}

impl Add<Duration> for JulianDate {
    type Output = Self;

    fn add(mut self, rhs: Duration) -> Self {
        self += rhs.days;
        self
    }
}

/// Convert a UTC proleptic Gregorian calendar date/time to a Julian Date,
/// using the standard Fliegel & Van Flandern algorithm.
fn calendar_to_jd(year: i32, month: i32, day: i32, hour: f64, minute: f64, second: f64) -> f64 {
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;

    let jdn = f64::from(day)
        + f64::from((153 * m + 2) / 5)
        + f64::from(365 * y)
        + f64::from(y / 4)
        - f64::from(y / 100)
        + f64::from(y / 400)
        - 32045.0 as i32 as f64;

    let day_frac = (hour - 12.0) / 24.0 + minute / 1440.0 + second / SECONDS_PER_DAY;
    jdn + day_frac
}

/// Convert a Julian Date back to a UTC proleptic Gregorian calendar
/// date/time, inverting [`calendar_to_jd`].
fn jd_to_calendar(jd: f64) -> (i32, i32, i32, f64, f64, f64) {
    let jd_shifted = jd + 0.5;
    let z = jd_shifted.floor();
    let f = jd_shifted - z;

    let alpha = ((z - 1867216.25) / 36524.25).floor();
    let a = if z < 2299161.0 {
        z
    } else {
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day_with_frac = b - d - (30.6001 * e).floor() + f;
    let day = day_with_frac.floor();
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

    let day_frac = day_with_frac - day;
    let total_seconds = day_frac * SECONDS_PER_DAY;
    let hour = (total_seconds / 3600.0).floor();
    let minute = ((total_seconds - hour * 3600.0) / 60.0).floor();
    let second = total_seconds - hour * 3600.0 - minute * 60.0;

    (year as i32, month as i32, day as i32, hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn j2000_epoch_round_trips() {
        let jd = JulianDate::new(2451545.0);
        assert_relative_eq!(jd.jd(), 2451545.0, epsilon = 1e-9);
        assert_relative_eq!(jd.centuries_since_j2000(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn calendar_round_trip() {
        let time = Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 45).unwrap();
        let jd = JulianDate::from_calendar_utc(time);
        let back = jd.to_calendar_utc();
        assert!((back - time).num_seconds().abs() <= 1);
    }

    #[test]
    fn add_assign_accumulates_without_folding() {
        let mut jd = JulianDate::new(2451545.0);
        jd += 0.75;
        jd += 0.75;
        // jd_lo accumulated to 1.5 without an intermediate fold
        assert_relative_eq!(jd.jd(), 2451546.5, epsilon = 1e-9);
    }

    #[test]
    fn normalize_keeps_lo_in_unit_range() {
        let mut jd = JulianDate::from_hi_lo(2451545.0, 2.3);
        jd.normalize();
        assert!(jd.jd_lo() >= 0.0 && jd.jd_lo() < 1.0);
        assert_relative_eq!(jd.jd(), 2451547.3, epsilon = 1e-9);
    }

    #[test]
    fn difference_is_precise_over_many_days() {
        let a = JulianDate::new(2451545.0);
        let b = JulianDate::new(2451545.0) + Duration::from_days(36525.0);
        assert_relative_eq!(b - a, 36525.0, epsilon = 1e-6);
    }
}
