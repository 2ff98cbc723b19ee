//! Full ICRS ↔ ECEF frame transformation service.
//!
//! The bias-precession-nutation (BPN) rotation changes slowly (arcseconds
//! per day) so it is precomputed on a coarse grid and interpolated with
//! spherical linear interpolation (slerp); Earth Rotation Angle (ERA), which
//! changes by ~360° per day, is always evaluated analytically at the exact
//! query time. Polar motion is taken from an [`EopSystem`] and composed in
//! at query time as well, since it is already a sparse, interpolated table.

use chrono::{DateTime, Utc};
use nalgebra::{Quaternion, Unit, Vector3};

use crate::constants;
use crate::eop::EopSystem;
use crate::errors::{AstroError, AstroResult};
use crate::leap_seconds::LeapSecondTable;
use crate::time_scales;

type UnitQuaternion = Unit<Quaternion<f64>>;

struct GridNode {
    jd_tt: f64,
    bpn: UnitQuaternion,
}

/// A precomputed ICRS ↔ ECEF transformation service.
///
/// Construct one [`EcfEciSystem`] up front for a propagation run (covering
/// its epoch span) and reuse it for every frame query; rebuilding the grid
/// per-query would defeat the point of caching the slowly-varying BPN term.
pub struct EcfEciSystem {
    eop: EopSystem,
    leap_seconds: LeapSecondTable,
    include_nutation: bool,
    grid: Vec<GridNode>,
}

impl EcfEciSystem {
    /// Build a system with a BPN grid spanning `[start, stop]` at `step`
    /// intervals (a 6-hour step keeps slerp error well under a microarcsecond
    /// for the precession+nutation rates involved).
    ///
    /// Queries outside `[start, stop]` are rejected rather than clamped to
    /// the nearest grid edge: silently extrapolating a BPN grid built for a
    /// specific propagation span would hide the caller asking for a time the
    /// grid was never built to cover.
    #[must_use]
    pub fn new(
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        step: chrono::Duration,
        eop: EopSystem,
        leap_seconds: LeapSecondTable,
        include_nutation: bool,
    ) -> Self {
        let mut grid = Vec::new();
        let mut t = start;
        loop {
            let jd_tt = time_scales::utc_to_tt(t, &leap_seconds);
            grid.push(GridNode {
                jd_tt,
                bpn: constants::bpn_rotation(jd_tt, include_nutation),
            });
            if t >= stop {
                break;
            }
            t += step;
        }
        Self {
            eop,
            leap_seconds,
            include_nutation,
            grid,
        }
    }

    /// Build a system with no precomputed grid; every query falls back to an
    /// exact, uncached BPN evaluation. Useful for one-off queries outside a
    /// propagation loop.
    #[must_use]
    pub fn uncached(eop: EopSystem, leap_seconds: LeapSecondTable, include_nutation: bool) -> Self {
        Self {
            eop,
            leap_seconds,
            include_nutation,
            grid: Vec::new(),
        }
    }

    fn bpn_at(&self, time: DateTime<Utc>, jd_tt: f64) -> AstroResult<UnitQuaternion> {
        if self.grid.is_empty() {
            return Ok(constants::bpn_rotation(jd_tt, self.include_nutation));
        }
        let last = self.grid.len() - 1;
        if jd_tt < self.grid[0].jd_tt || jd_tt > self.grid[last].jd_tt {
            return Err(AstroError::EpochOutOfRange {
                epoch: time,
                min_jd: self.grid[0].jd_tt,
                max_jd: self.grid[last].jd_tt,
            });
        }
        if self.grid.len() == 1 {
            return Ok(self.grid[0].bpn);
        }
        let idx = self
            .grid
            .partition_point(|n| n.jd_tt <= jd_tt)
            .max(1)
            .min(last);
        let (lo, hi) = (&self.grid[idx - 1], &self.grid[idx]);
        let span = hi.jd_tt - lo.jd_tt;
        let frac = if span > 0.0 { (jd_tt - lo.jd_tt) / span } else { 0.0 };
        Ok(lo.bpn.slerp(&hi.bpn, frac.clamp(0.0, 1.0)))
    }

    /// The rotation `q_te` that maps an ICRS vector into the pre-polar-motion,
    /// Earth-rotated (TIRS) frame (`bpn` applied first, `era` second), the
    /// polar-motion rotation `pm` that maps TIRS into ECEF, and the Earth
    /// rotation vector (expressed in the TIRS frame) used by the velocity
    /// transforms below.
    pub(crate) fn frame_terms(&self, time: DateTime<Utc>) -> AstroResult<(UnitQuaternion, UnitQuaternion, Vector3<f64>)> {
        let jd_tt = time_scales::utc_to_tt(time, &self.leap_seconds);
        let jd_ut1 = time_scales::utc_to_ut1(time, &self.eop);

        let bpn = self.bpn_at(time, jd_tt)?;
        let era_rot = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), constants::earth_rotation_angle(jd_ut1));
        let (x_pole, y_pole) = self.eop.polar_motion(jd_ut1);
        let pm = constants::polar_motion_rotation(x_pole, y_pole);

        let lod = self.eop.length_of_day_excess(jd_ut1);
        let omega = Vector3::new(0.0, 0.0, constants::EARTH_ROTATION_RATE * (1.0 - lod / 86_400.0));

        Ok((era_rot * bpn, pm, omega))
    }

    /// The full ICRS → ECEF (pseudo-fixed) rotation quaternion at `time`,
    /// including BPN (grid-interpolated), ERA (analytic), and polar motion
    /// (from the Earth orientation table).
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::EpochOutOfRange`] if `time` falls outside a
    /// gridded system's `[start, stop]` span.
    pub fn icrs_to_ecef_quaternion(&self, time: DateTime<Utc>) -> AstroResult<UnitQuaternion> {
        let (q_te, pm, _omega) = self.frame_terms(time)?;
        Ok(pm * q_te)
    }

    /// Transform an ICRS position/velocity pair into ECEF, including the
    /// Earth-rotation (Coriolis-like) contribution to velocity:
    /// `v_ecef = pm * (q_te * v_icrs - omega x (q_te * r_icrs))`.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::EpochOutOfRange`] if `time` falls outside a
    /// gridded system's `[start, stop]` span.
    pub fn icrs_to_ecef_state(
        &self,
        time: DateTime<Utc>,
        r_icrs: Vector3<f64>,
        v_icrs: Vector3<f64>,
    ) -> AstroResult<(Vector3<f64>, Vector3<f64>)> {
        let (q_te, pm, omega) = self.frame_terms(time)?;

        let r_tirs = q_te * r_icrs;
        let v_tirs = q_te * v_icrs - omega.cross(&r_tirs);

        Ok((pm * r_tirs, pm * v_tirs))
    }

    /// Transform an ECEF position/velocity pair into ICRS; the exact inverse
    /// of [`icrs_to_ecef_state`](Self::icrs_to_ecef_state).
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::EpochOutOfRange`] if `time` falls outside a
    /// gridded system's `[start, stop]` span.
    pub fn ecef_to_icrs_state(
        &self,
        time: DateTime<Utc>,
        r_ecef: Vector3<f64>,
        v_ecef: Vector3<f64>,
    ) -> AstroResult<(Vector3<f64>, Vector3<f64>)> {
        let (q_te, pm, omega) = self.frame_terms(time)?;
        let inv_te = q_te.inverse();
        let inv_pm = pm.inverse();

        let r_tirs = inv_pm * r_ecef;
        let v_tirs = inv_pm * v_ecef;

        let r_icrs = inv_te * r_tirs;
        let v_icrs = inv_te * (v_tirs + omega.cross(&r_tirs));

        Ok((r_icrs, v_icrs))
    }

    /// The rotation from ICRS to the TEME frame used by SGP4: the equator of
    /// date (precession + nutation, no ERA applied) combined with a
    /// mean-equinox-of-date correction. In practice this crate treats TEME
    /// as coincident with the true-equator/mean-equinox intermediate frame
    /// produced by the BPN rotation without the GAST equation-of-equinoxes
    /// term, which is accurate to within a few arcseconds — adequate for
    /// TLE-derived state vectors, whose own accuracy is on that order.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::EpochOutOfRange`] if `time` falls outside a
    /// gridded system's `[start, stop]` span.
    pub fn icrs_to_teme_quaternion(&self, time: DateTime<Utc>) -> AstroResult<UnitQuaternion> {
        let jd_tt = time_scales::utc_to_tt(time, &self.leap_seconds);
        self.bpn_at(time, jd_tt)
    }

    /// Reference to the underlying Earth orientation table.
    #[must_use]
    pub fn eop(&self) -> &EopSystem {
        &self.eop
    }

    /// Reference to the underlying leap second table.
    #[must_use]
    pub fn leap_seconds(&self) -> &LeapSecondTable {
        &self.leap_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn uncached_quaternion_is_unit_length() {
        let system = EcfEciSystem::uncached(
            EopSystem::empty(),
            LeapSecondTable::current_estimate(),
            true,
        );
        let time = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let q = system.icrs_to_ecef_quaternion(time).unwrap();
        assert!((q.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn grid_interpolation_matches_uncached_closely() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let gridded = EcfEciSystem::new(
            start,
            stop,
            chrono::Duration::hours(6),
            EopSystem::empty(),
            LeapSecondTable::current_estimate(),
            true,
        );
        let uncached = EcfEciSystem::uncached(
            EopSystem::empty(),
            LeapSecondTable::current_estimate(),
            true,
        );

        let query = start + chrono::Duration::hours(9);
        let jd_tt = time_scales::utc_to_tt(query, &LeapSecondTable::current_estimate());
        let q_grid = gridded.bpn_at(query, jd_tt).unwrap();
        let q_exact = uncached.bpn_at(query, jd_tt).unwrap();
        assert!(q_grid.angle_to(&q_exact) < 1e-9);
    }

    #[test]
    fn grid_query_outside_span_is_rejected() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let gridded = EcfEciSystem::new(
            start,
            stop,
            chrono::Duration::hours(6),
            EopSystem::empty(),
            LeapSecondTable::current_estimate(),
            true,
        );
        let before = start - chrono::Duration::hours(1);
        assert!(matches!(
            gridded.icrs_to_ecef_quaternion(before),
            Err(AstroError::EpochOutOfRange { .. })
        ));
        let after = stop + chrono::Duration::hours(1);
        assert!(matches!(
            gridded.icrs_to_ecef_quaternion(after),
            Err(AstroError::EpochOutOfRange { .. })
        ));
    }

    #[test]
    fn teme_quaternion_has_no_era_term() {
        let system = EcfEciSystem::uncached(
            EopSystem::empty(),
            LeapSecondTable::current_estimate(),
            false,
        );
        let time1 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let time2 = time1 + chrono::Duration::hours(1);
        // BPN barely moves in an hour; ERA would move ~15 degrees.
        let q1 = system.icrs_to_teme_quaternion(time1).unwrap();
        let q2 = system.icrs_to_teme_quaternion(time2).unwrap();
        assert!(q1.angle_to(&q2) < 1e-6);
    }

    #[test]
    fn ecef_state_round_trip_recovers_icrs_state() {
        let system = EcfEciSystem::uncached(
            EopSystem::empty(),
            LeapSecondTable::current_estimate(),
            true,
        );
        let time = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let r_icrs = Vector3::new(7_000_000.0, 1_000_000.0, 500_000.0);
        let v_icrs = Vector3::new(-100.0, 7_400.0, 200.0);

        let (r_ecef, v_ecef) = system.icrs_to_ecef_state(time, r_icrs, v_icrs).unwrap();
        let (r_back, v_back) = system.ecef_to_icrs_state(time, r_ecef, v_ecef).unwrap();

        assert!((r_back - r_icrs).norm() < 1e-6);
        assert!((v_back - v_icrs).norm() < 1e-9);
    }
}
