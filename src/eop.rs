//! Earth orientation parameters (EOP): polar motion, UT1-UTC, length of day.
//!
//! This module models the in-memory table and linear interpolation that a
//! frame transformation service needs; reading the table from an IERS
//! Bulletin A/B file is out of scope and left to the caller, who builds an
//! [`EopSystem`] from whatever source they have (a downloaded CSV, a fixed
//! set of recent values, or nothing at all).

/// A single day's Earth orientation measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EopRecord {
    /// UTC Julian Date this record applies to (nominally at 0h UTC).
    pub jd_utc: f64,
    /// UT1 - UTC, in seconds.
    pub dut1_seconds: f64,
    /// Polar motion x-coordinate, in radians.
    pub x_pole: f64,
    /// Polar motion y-coordinate, in radians.
    pub y_pole: f64,
    /// Length of day excess over 86400 SI seconds, in seconds.
    pub lod_seconds: f64,
}

/// A time-ordered table of [`EopRecord`]s supporting linear interpolation.
///
/// An empty table is a valid, useful default: every query degrades
/// gracefully to zero polar motion and zero DUT1, which is within the IERS
/// guaranteed bound of 0.9s and good enough for applications that don't
/// need sub-arcsecond Earth orientation fidelity.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct EopSystem {
    records: Vec<EopRecord>,
}

impl EopSystem {
    /// Build a system from an explicit, unsorted list of records.
    #[must_use]
    pub fn new(mut records: Vec<EopRecord>) -> Self {
        records.sort_by(|a, b| a.jd_utc.partial_cmp(&b.jd_utc).unwrap());
        Self { records }
    }

    /// An EOP system with no data; every query returns zero.
    #[must_use]
    pub fn empty() -> Self {
        Self { records: Vec::new() }
    }

    fn interpolate<F: Fn(&EopRecord) -> f64>(&self, jd_utc: f64, field: F) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        if self.records.len() == 1 || jd_utc <= self.records[0].jd_utc {
            return field(&self.records[0]);
        }
        let last = self.records.len() - 1;
        if jd_utc >= self.records[last].jd_utc {
            return field(&self.records[last]);
        }

        let idx = match self
            .records
            .binary_search_by(|r| r.jd_utc.partial_cmp(&jd_utc).unwrap())
        {
            Ok(i) => return field(&self.records[i]),
            Err(i) => i,
        };
        let (lo, hi) = (&self.records[idx - 1], &self.records[idx]);
        let span = hi.jd_utc - lo.jd_utc;
        let frac = if span > 0.0 {
            (jd_utc - lo.jd_utc) / span
        } else {
            0.0
        };
        field(lo) + frac * (field(hi) - field(lo))
    }

    /// UT1 - UTC, in seconds, at the given UTC Julian Date.
    #[must_use]
    pub fn dut1_seconds(&self, jd_utc: f64) -> f64 {
        self.interpolate(jd_utc, |r| r.dut1_seconds)
    }

    /// Polar motion (x, y), in radians, at the given UTC Julian Date.
    #[must_use]
    pub fn polar_motion(&self, jd_utc: f64) -> (f64, f64) {
        (
            self.interpolate(jd_utc, |r| r.x_pole),
            self.interpolate(jd_utc, |r| r.y_pole),
        )
    }

    /// Length-of-day excess, in seconds, at the given UTC Julian Date.
    #[must_use]
    pub fn length_of_day_excess(&self, jd_utc: f64) -> f64 {
        self.interpolate(jd_utc, |r| r.lod_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_system_returns_zeros() {
        let eop = EopSystem::empty();
        assert_eq!(eop.dut1_seconds(2451545.0), 0.0);
        assert_eq!(eop.polar_motion(2451545.0), (0.0, 0.0));
    }

    #[test]
    fn interpolates_linearly_between_records() {
        let eop = EopSystem::new(vec![
            EopRecord {
                jd_utc: 2451545.0,
                dut1_seconds: 0.0,
                x_pole: 0.0,
                y_pole: 0.0,
                lod_seconds: 0.0,
            },
            EopRecord {
                jd_utc: 2451546.0,
                dut1_seconds: 1.0,
                x_pole: 0.0,
                y_pole: 0.0,
                lod_seconds: 0.0,
            },
        ]);
        assert!((eop.dut1_seconds(2451545.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn clamps_outside_the_table() {
        let eop = EopSystem::new(vec![EopRecord {
            jd_utc: 2451545.0,
            dut1_seconds: 0.3,
            x_pole: 1e-6,
            y_pole: 2e-6,
            lod_seconds: 0.001,
        }]);
        assert_eq!(eop.dut1_seconds(2451540.0), 0.3);
        assert_eq!(eop.dut1_seconds(2451600.0), 0.3);
    }
}
