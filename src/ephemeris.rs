//! A uniform ephemeris abstraction: anything that can report the time span
//! it covers and return a frame-tagged state vector anywhere within that
//! span, whether it is backed by an analytic propagator, a numerically
//! integrated trajectory, or an externally loaded state history.

use chrono::{DateTime, Duration, Utc};
use nalgebra::Vector3;

use crate::ecf_eci::EcfEciSystem;
use crate::errors::{AstroError, AstroResult};
use crate::interpolation::{Hermite1, IndexMapper};
use crate::julian::JulianDate;
use crate::propagators::numerical::{rk4_step, Dynamics, State};

/// Reference frame an [`Ephemeris`] query result is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EphemerisFrame {
    /// Inertial, ICRS-equivalent frame.
    Icrs,
    /// Earth-fixed (ECEF) frame.
    Ecef,
}

/// A time-bounded source of position/velocity state vectors.
///
/// Every implementation enforces its own valid time span: a query outside
/// `[begin_time, end_time]` is an error rather than an extrapolation.
pub trait Ephemeris {
    /// Unique identifier for this ephemeris.
    fn name(&self) -> &str;

    /// The time the ephemeris was generated from or anchored at.
    fn epoch(&self) -> DateTime<Utc>;

    /// Earliest time for which a state vector can be retrieved.
    fn begin_time(&self) -> DateTime<Utc>;

    /// Latest time for which a state vector can be retrieved.
    fn end_time(&self) -> DateTime<Utc>;

    /// State vector (position, velocity, meters and meters/second) at
    /// `time`, expressed in `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::EpochOutOfRange`] if `time` falls outside
    /// [`begin_time`](Self::begin_time)..=[`end_time`](Self::end_time).
    fn state_vector(
        &self,
        time: DateTime<Utc>,
        frame: EphemerisFrame,
    ) -> AstroResult<(Vector3<f64>, Vector3<f64>)>;

    /// Position at `time`, expressed in `frame`.
    ///
    /// # Errors
    ///
    /// Same as [`state_vector`](Self::state_vector).
    fn position(&self, time: DateTime<Utc>, frame: EphemerisFrame) -> AstroResult<Vector3<f64>> {
        self.state_vector(time, frame).map(|(p, _)| p)
    }

    /// Check `time` against [`begin_time`](Self::begin_time) and
    /// [`end_time`](Self::end_time), without doing any interpolation work.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::EpochOutOfRange`] if `time` is out of range.
    fn check_range(&self, time: DateTime<Utc>) -> AstroResult<()> {
        if time < self.begin_time() || time > self.end_time() {
            return Err(AstroError::EpochOutOfRange {
                epoch: time,
                min_jd: JulianDate::from_calendar_utc(self.begin_time()).jd(),
                max_jd: JulianDate::from_calendar_utc(self.end_time()).jd(),
            });
        }
        Ok(())
    }
}

struct HermiteSegment {
    start: DateTime<Utc>,
    hermite: Hermite1<3>,
}

/// Absorbs roundoff when a segment boundary is recomputed from a
/// millisecond-truncated [`DateTime`] difference.
const SEGMENT_DT_EPS_SECONDS: f64 = 1.0e-3;

/// An [`Ephemeris`] backed by a chain of cubic Hermite segments, one per
/// consecutive pair of state records, indexed by an [`IndexMapper`] over
/// elapsed seconds since the first record.
///
/// Queries in [`EphemerisFrame::Ecef`] require an `EcfEciSystem` to rotate
/// the underlying ICRS state; without one, only ICRS queries succeed.
pub struct HermiteEphemeris<'a> {
    name: String,
    epoch: DateTime<Utc>,
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    segments: Vec<HermiteSegment>,
    index: IndexMapper,
    ecf_eci: Option<&'a EcfEciSystem>,
}

impl<'a> HermiteEphemeris<'a> {
    /// Build a Hermite-chain ephemeris from a state history, ICRS position
    /// and velocity (meters, meters/second) at each of `records`' times.
    ///
    /// `records` must be sorted strictly increasing in time and contain at
    /// least two entries.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidCoordinates`] if `records` has fewer
    /// than two entries or is not strictly increasing in time.
    pub fn new(
        name: impl Into<String>,
        records: &[(DateTime<Utc>, Vector3<f64>, Vector3<f64>)],
        ecf_eci: Option<&'a EcfEciSystem>,
    ) -> AstroResult<Self> {
        if records.len() < 2 {
            return Err(AstroError::InvalidCoordinates {
                reason: "HermiteEphemeris requires at least two state records".to_string(),
            });
        }

        let begin = records[0].0;
        let end = records[records.len() - 1].0;

        let mut segments = Vec::with_capacity(records.len() - 1);
        let mut blocks = Vec::with_capacity(records.len() - 1);
        for pair in records.windows(2) {
            let (t1, p1, v1) = pair[0];
            let (t2, p2, v2) = pair[1];
            let dt = seconds_between(t1, t2);
            if dt <= 0.0 {
                return Err(AstroError::InvalidCoordinates {
                    reason: "HermiteEphemeris records must be strictly increasing in time"
                        .to_string(),
                });
            }

            let hermite = Hermite1::new(dt, p1, v1, p2, v2, SEGMENT_DT_EPS_SECONDS);
            segments.push(HermiteSegment { start: t1, hermite });
            blocks.push((seconds_between(begin, t1), seconds_between(begin, t2)));
        }

        let index = IndexMapper::new(blocks)?;

        Ok(Self {
            name: name.into(),
            epoch: begin,
            begin,
            end,
            segments,
            index,
            ecf_eci,
        })
    }

    /// Build a Hermite-chain ephemeris by numerically propagating
    /// `dynamics` from `(r0, v0)` (ICRS, meters and meters/second) at
    /// `start`, sampling a state every `step_seconds` through `stop`.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidCoordinates`] if `stop` is not after
    /// `start` or `step_seconds` is not positive.
    pub fn from_propagation(
        name: impl Into<String>,
        dynamics: &Dynamics<'_>,
        r0: Vector3<f64>,
        v0: Vector3<f64>,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        step_seconds: f64,
        ecf_eci: Option<&'a EcfEciSystem>,
    ) -> AstroResult<Self> {
        let span = seconds_between(start, stop);
        if span <= 0.0 || step_seconds <= 0.0 {
            return Err(AstroError::InvalidCoordinates {
                reason: "from_propagation requires stop after start and a positive step"
                    .to_string(),
            });
        }

        let mut records = vec![(start, r0, v0)];
        let mut x = State::new(r0.x, r0.y, r0.z, v0.x, v0.y, v0.z);
        let mut t = 0.0;

        while t < span {
            let dt = step_seconds.min(span - t);
            x = rk4_step(dynamics, t, dt, &x);
            t += dt;
            let time = start + Duration::milliseconds((t * 1000.0).round() as i64);
            records.push((time, Vector3::new(x[0], x[1], x[2]), Vector3::new(x[3], x[4], x[5])));
        }

        Self::new(name, &records, ecf_eci)
    }

    fn icrs_state(&self, time: DateTime<Utc>) -> AstroResult<(Vector3<f64>, Vector3<f64>)> {
        self.check_range(time)?;

        let offset = seconds_between(self.begin, time);
        let idx = self.index.index(offset)?;
        let segment = &self.segments[idx];
        let dt = seconds_between(segment.start, time);

        Ok((segment.hermite.position(dt)?, segment.hermite.velocity(dt)?))
    }
}

impl<'a> Ephemeris for HermiteEphemeris<'a> {
    fn name(&self) -> &str {
        &self.name
    }

    fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    fn begin_time(&self) -> DateTime<Utc> {
        self.begin
    }

    fn end_time(&self) -> DateTime<Utc> {
        self.end
    }

    fn state_vector(
        &self,
        time: DateTime<Utc>,
        frame: EphemerisFrame,
    ) -> AstroResult<(Vector3<f64>, Vector3<f64>)> {
        let (r_icrs, v_icrs) = self.icrs_state(time)?;
        match frame {
            EphemerisFrame::Icrs => Ok((r_icrs, v_icrs)),
            EphemerisFrame::Ecef => {
                let system = self.ecf_eci.ok_or_else(|| AstroError::InvalidCoordinates {
                    reason: format!(
                        "ephemeris '{}' has no Earth-fixed frame system to convert into ECEF",
                        self.name
                    ),
                })?;
                system.icrs_to_ecef_state(time, r_icrs, v_icrs)
            }
        }
    }
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_records() -> Vec<(DateTime<Utc>, Vector3<f64>, Vector3<f64>)> {
        let t0 = DateTime::<Utc>::UNIX_EPOCH;
        vec![
            (t0, Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)),
            (
                t0 + Duration::seconds(10),
                Vector3::new(10.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
            ),
            (
                t0 + Duration::seconds(20),
                Vector3::new(20.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
            ),
        ]
    }

    #[test]
    fn hermite_ephemeris_matches_recorded_endpoints() {
        let records = sample_records();
        let eph = HermiteEphemeris::new("test", &records, None).unwrap();

        let (p, _v) = eph.state_vector(records[1].0, EphemerisFrame::Icrs).unwrap();
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn hermite_ephemeris_rejects_out_of_range_query() {
        let records = sample_records();
        let eph = HermiteEphemeris::new("test", &records, None).unwrap();

        let past = eph.begin_time() - Duration::seconds(1);
        assert!(matches!(
            eph.state_vector(past, EphemerisFrame::Icrs),
            Err(AstroError::EpochOutOfRange { .. })
        ));
    }

    #[test]
    fn hermite_ephemeris_rejects_fewer_than_two_records() {
        let records = vec![sample_records().remove(0)];
        assert!(HermiteEphemeris::new("test", &records, None).is_err());
    }

    #[test]
    fn ecef_query_without_frame_system_is_an_error() {
        let records = sample_records();
        let eph = HermiteEphemeris::new("test", &records, None).unwrap();
        assert!(eph.state_vector(records[0].0, EphemerisFrame::Ecef).is_err());
    }

    #[test]
    fn from_propagation_reproduces_two_body_motion() {
        const MU_EARTH: f64 = 3.986_004_418e14;
        let dynamics = Dynamics::two_body(MU_EARTH);

        let r = 7_000_000.0;
        let v_circ = (MU_EARTH / r).sqrt();
        let r0 = Vector3::new(r, 0.0, 0.0);
        let v0 = Vector3::new(0.0, v_circ, 0.0);

        let start = DateTime::<Utc>::UNIX_EPOCH;
        let stop = start + Duration::seconds(600);

        let eph = HermiteEphemeris::from_propagation(
            "leo", &dynamics, r0, v0, start, stop, 30.0, None,
        )
        .unwrap();

        let (p, _v) = eph
            .state_vector(start + Duration::seconds(300), EphemerisFrame::Icrs)
            .unwrap();
        assert_relative_eq!(p.norm(), r, epsilon = 50.0);
    }
}
