//! SGP4 propagation of NORAD two-line element sets.
//!
//! This wraps the `sgp4` crate's implementation rather than reimplementing
//! the simplified perturbations model; SGP4's internal mean-element theory
//! and numerous empirical fits are not something to reproduce by hand.
//! Output is in the TEME frame, SGP4's native frame, matching the
//! convention of the TLE sets it propagates.

use chrono::{DateTime, Utc};
use sguaba::{Coordinate, Vector};
use uom::si::f64::{Length, Velocity};
use uom::si::length::kilometer;
use uom::si::velocity::kilometer_per_second;

use crate::additional_frames::Teme;
use crate::errors::{AstroError, AstroResult};
use crate::tle::TleElements;
use crate::timed::EphemerisState;

/// Propagate a TLE to `target_epoch` using SGP4, returning the resulting
/// state vector in the TEME frame.
///
/// # Errors
///
/// Returns [`AstroError::TimeScaleConversionFailed`] if the underlying
/// `sgp4` crate rejects these elements (e.g. a decayed orbit) or the
/// requested propagation interval.
pub fn propagate(
    tle: &TleElements,
    target_epoch: DateTime<Utc>,
) -> AstroResult<EphemerisState<Teme>> {
    let (line1, line2) = tle.raw_lines();

    let elements = ::sgp4::Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
        .map_err(|e| AstroError::TimeScaleConversionFailed {
            reason: format!("invalid TLE for SGP4: {e}"),
        })?;

    let constants = ::sgp4::Constants::from_elements(&elements).map_err(|e| {
        AstroError::TimeScaleConversionFailed {
            reason: format!("SGP4 initialization failed: {e}"),
        }
    })?;

    let delta = target_epoch - tle.epoch();
    let minutes_since_epoch = delta.num_milliseconds() as f64 / 60_000.0;

    let prediction = constants
        .propagate(::sgp4::MinutesSinceEpoch(minutes_since_epoch))
        .map_err(|e| AstroError::TimeScaleConversionFailed {
            reason: format!("SGP4 propagation failed: {e}"),
        })?;

    #[allow(deprecated)]
    let position = Coordinate::<Teme>::from_cartesian(
        Length::new::<kilometer>(prediction.position[0]),
        Length::new::<kilometer>(prediction.position[1]),
        Length::new::<kilometer>(prediction.position[2]),
    );

    let velocity = Vector::from_cartesian(
        Velocity::new::<kilometer_per_second>(prediction.velocity[0]),
        Velocity::new::<kilometer_per_second>(prediction.velocity[1]),
        Velocity::new::<kilometer_per_second>(prediction.velocity[2]),
    );

    Ok(EphemerisState::new(position, velocity, target_epoch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const LINE1: &str = "1 25544U 98067A   20206.18539600  .00001406  00000-0  33518-4 0  9992";
    const LINE2: &str = "2 25544  51.6461 339.8014 0001473  94.8340 265.2864 15.49309432236008";

    #[test]
    fn propagates_iss_tle_to_epoch() {
        let tle = TleElements::from_lines(LINE1, LINE2).unwrap();
        let state = propagate(&tle, tle.epoch()).unwrap();

        use uom::si::length::kilometer;
        let distance = state.position().distance_from_origin().get::<kilometer>();
        assert!(distance > 6600.0 && distance < 7200.0);
    }

    #[test]
    fn propagates_forward_one_orbit() {
        let tle = TleElements::from_lines(LINE1, LINE2).unwrap();
        let later = tle.epoch() + Duration::minutes(93);
        let state = propagate(&tle, later).unwrap();

        use uom::si::length::kilometer;
        let distance = state.position().distance_from_origin().get::<kilometer>();
        assert!(distance > 6600.0 && distance < 7200.0);
    }
}
