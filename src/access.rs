//! Ground-point access (rise/set) analysis: determining when a satellite is
//! visible from a fixed point on the central body subject to elevation,
//! azimuth, and arbitrary time-dependent constraints.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use nalgebra::Vector3;

use crate::errors::{AstroError, AstroResult};
use crate::ground_point::GroundPoint;
use crate::orbital::KeplerianElements;

/// Geometric and time-dependent visibility constraints for ground-point
/// access analysis. Azimuth is measured clockwise from north, `[0, 2pi)`.
#[derive(Clone)]
pub struct GpConstraints {
    sin_min_el: f64,
    sin_max_el: f64,
    min_az: f64,
    max_az: f64,
    check_az: bool,
    time_constraints: Vec<std::sync::Arc<dyn Fn(DateTime<Utc>) -> bool + Send + Sync>>,
}

impl Default for GpConstraints {
    fn default() -> Self {
        Self {
            sin_min_el: 0.0,
            sin_max_el: 1.0,
            min_az: 0.0,
            max_az: 2.0 * std::f64::consts::PI,
            check_az: false,
            time_constraints: Vec::new(),
        }
    }
}

impl GpConstraints {
    /// Constraints with zero minimum elevation and no other restrictions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum elevation angle, radians.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidCoordinates`] if outside `[-pi/2, pi/2]`.
    pub fn set_min_elevation(&mut self, min_el: f64) -> AstroResult<()> {
        if !(-std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2).contains(&min_el) {
            return Err(AstroError::InvalidCoordinates {
                reason: "minimum elevation must be within [-pi/2, pi/2]".to_string(),
            });
        }
        self.sin_min_el = min_el.sin();
        Ok(())
    }

    /// Set the maximum elevation angle, radians.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidCoordinates`] if outside `[-pi/2, pi/2]`.
    pub fn set_max_elevation(&mut self, max_el: f64) -> AstroResult<()> {
        if !(-std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2).contains(&max_el) {
            return Err(AstroError::InvalidCoordinates {
                reason: "maximum elevation must be within [-pi/2, pi/2]".to_string(),
            });
        }
        self.sin_max_el = max_el.sin();
        Ok(())
    }

    /// Restrict visibility to an azimuth sector, `[min_az, max_az)`
    /// clockwise from north; `min_az > max_az` wraps through north.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidCoordinates`] if either angle is
    /// outside `[0, 2*pi]`.
    pub fn set_azimuth_range(&mut self, min_az: f64, max_az: f64) -> AstroResult<()> {
        let two_pi = 2.0 * std::f64::consts::PI;
        if !(0.0..=two_pi).contains(&min_az) || !(0.0..=two_pi).contains(&max_az) {
            return Err(AstroError::InvalidCoordinates {
                reason: "azimuth bounds must be within [0, 2*pi]".to_string(),
            });
        }
        self.min_az = min_az;
        self.max_az = max_az;
        self.check_az = true;
        Ok(())
    }

    /// Add an arbitrary time-dependent constraint (e.g. a sunlit-only or
    /// ground-station-operational-hours check).
    pub fn add_time_constraint(
        &mut self,
        constraint: impl Fn(DateTime<Utc>) -> bool + Send + Sync + 'static,
    ) {
        self.time_constraints.push(std::sync::Arc::new(constraint));
    }

    fn azimuth_ok(&self, az: f64) -> bool {
        if !self.check_az {
            return true;
        }
        if self.min_az <= self.max_az {
            az >= self.min_az && az < self.max_az
        } else {
            az >= self.min_az || az < self.max_az
        }
    }

    /// Evaluate all constraints for a satellite ECEF `position` (meters)
    /// as seen from `gp` at time `time`.
    #[must_use]
    pub fn is_visible(&self, time: DateTime<Utc>, gp: &GroundPoint, position: Vector3<f64>) -> bool {
        let sin_el = gp.sin_elevation([position.x, position.y, position.z]);
        if sin_el < self.sin_min_el || sin_el > self.sin_max_el {
            return false;
        }
        if self.check_az {
            let (_, az, _) = gp.range_azimuth_sin_elevation([position.x, position.y, position.z]);
            if !self.azimuth_ok(az) {
                return false;
            }
        }
        self.time_constraints.iter().all(|c| c(time))
    }
}

/// A single rise-to-set visibility window, with range, azimuth, and
/// elevation at both endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccessInterval {
    /// Time visibility begins.
    pub rise: DateTime<Utc>,
    /// Time visibility ends.
    pub set: DateTime<Utc>,
    /// Slant range at rise, meters.
    pub rise_range: f64,
    /// Azimuth at rise, radians clockwise from north.
    pub rise_azimuth: f64,
    /// Sine of elevation at rise.
    pub rise_sin_elevation: f64,
    /// Slant range at set, meters.
    pub set_range: f64,
    /// Azimuth at set, radians clockwise from north.
    pub set_azimuth: f64,
    /// Sine of elevation at set.
    pub set_sin_elevation: f64,
}

/// Eccentricity below which a fixed angular-rate search step is used.
const ECC_LINEAR_THRESHOLD: f64 = 0.07;
/// Eccentricity above which an exponentially radius-scaled search step is
/// used instead of linear interpolation between perigee and apogee rates.
const ECC_EXP_THRESHOLD: f64 = 0.3;

/// Bisection convergence tolerance for rise/set boundaries, seconds.
const RISE_SET_TOLERANCE_SECONDS: f64 = 0.1;
const MAX_BISECTION_ITER: u32 = 42;

/// Floor and ceiling placed on the adaptively computed search step,
/// seconds: below this, the search degenerates into an excessively fine
/// scan even for a slow-moving apogee; above it, a fast low-altitude pass
/// can be skipped entirely.
const MIN_SEARCH_STEP_SECONDS: f64 = 8.0;
const MAX_SEARCH_STEP_SECONDS: f64 = 120.0;

enum StepPolicy {
    Fixed(f64),
    Linear { rp: f64, ra: f64, dt_p: f64, dt_a: f64 },
    Exponential { a0: f64, a1: f64 },
}

/// Estimate how finely (in seconds) to step the access search, based on
/// the angular rate at perigee and apogee: near-circular orbits get a
/// fixed step, moderately eccentric orbits interpolate linearly between
/// the perigee/apogee step sizes by radius, and highly eccentric orbits
/// use an exponential radius-scaled step so the coarse apogee step doesn't
/// skip a fast perigee pass.
fn build_step_policy(elements: &KeplerianElements) -> StepPolicy {
    use uom::si::length::meter;

    let a = elements.semi_major_axis.get::<meter>();
    let e = elements.eccentricity;
    let rp = a * (1.0 - e);
    let ra = a * (1.0 + e);

    let search_step = |theta_dot: f64| -> f64 {
        // Aim for roughly one search sample per 5 degrees of true anomaly.
        (5.0_f64.to_radians() / theta_dot).clamp(MIN_SEARCH_STEP_SECONDS, MAX_SEARCH_STEP_SECONDS)
    };

    use uom::si::velocity::meter_per_second;
    let theta_dot_p = elements.perigee_speed().get::<meter_per_second>() / rp;
    let va = (elements.mu * (2.0 / ra - 1.0 / a)).sqrt();
    let theta_dot_a = va / ra;

    let dt_p = search_step(theta_dot_p);
    let dt_a = search_step(theta_dot_a);

    if e > ECC_EXP_THRESHOLD {
        // Fit dt = a0 + a1 * log10(r) through the perigee/apogee points;
        // this is a reduced, two-point version of the reference
        // implementation's three-point log-linear fit.
        let log_rp = rp.log10();
        let log_ra = ra.log10();
        let a1 = (dt_a - dt_p) / (log_ra - log_rp);
        let a0 = dt_p - a1 * log_rp;
        StepPolicy::Exponential { a0, a1 }
    } else if e > ECC_LINEAR_THRESHOLD {
        StepPolicy::Linear { rp, ra, dt_p, dt_a }
    } else {
        StepPolicy::Fixed(dt_p.min(dt_a))
    }
}

impl StepPolicy {
    fn step_seconds(&self, r: f64) -> f64 {
        let dt = match self {
            StepPolicy::Fixed(dt) => *dt,
            StepPolicy::Linear { rp, ra, dt_p, dt_a } => {
                let frac = ((r - rp) / (ra - rp)).clamp(0.0, 1.0);
                dt_p + frac * (dt_a - dt_p)
            }
            StepPolicy::Exponential { a0, a1 } => a0 + a1 * r.max(1.0).log10(),
        };
        dt.clamp(MIN_SEARCH_STEP_SECONDS, MAX_SEARCH_STEP_SECONDS)
    }
}

/// Search `[start, stop]` for every interval during which the satellite
/// (whose ECEF position at a given time is returned by `position_fn`) is
/// visible from `gp` under `constraints`.
///
/// `elements` is used only to estimate a reasonable adaptive search step
/// size from the orbit's perigee/apogee angular rates; the actual
/// visibility test always uses `position_fn`.
///
/// # Errors
///
/// Returns an error if `position_fn` fails at any sampled time.
pub fn find_all_accesses(
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
    gp: &GroundPoint,
    constraints: &GpConstraints,
    elements: &KeplerianElements,
    position_fn: impl Fn(DateTime<Utc>) -> AstroResult<Vector3<f64>>,
) -> AstroResult<Vec<AccessInterval>> {
    let policy = build_step_policy(elements);
    let mut intervals = Vec::new();
    let mut t = start;

    let visible_at = |t: DateTime<Utc>| -> AstroResult<bool> {
        let pos = position_fn(t)?;
        Ok(constraints.is_visible(t, gp, pos))
    };

    while t < stop {
        if visible_at(t)? {
            let rise = t;
            let rise_pos = position_fn(rise)?;
            let (rise_range, rise_azimuth, rise_sin_elevation) =
                gp.range_azimuth_sin_elevation([rise_pos.x, rise_pos.y, rise_pos.z]);

            let (set, last_visible) = find_set(t, stop, gp, constraints, &policy, &position_fn)?;
            let set_pos = position_fn(set)?;
            let (set_range, set_azimuth, set_sin_elevation) =
                gp.range_azimuth_sin_elevation([set_pos.x, set_pos.y, set_pos.z]);

            intervals.push(AccessInterval {
                rise,
                set,
                rise_range,
                rise_azimuth,
                rise_sin_elevation,
                set_range,
                set_azimuth,
                set_sin_elevation,
            });
            t = set + ChronoDuration::seconds(1);
            let _ = last_visible;
            continue;
        }

        use uom::si::length::meter;
        let pos = position_fn(t)?;
        let r = pos.norm().max(elements.semi_major_axis.get::<meter>() * (1.0 - elements.eccentricity));
        let step = policy.step_seconds(r);
        t += ChronoDuration::milliseconds((step * 1000.0).round() as i64).max(ChronoDuration::seconds(1));
    }

    Ok(intervals)
}

fn find_set(
    rise: DateTime<Utc>,
    stop: DateTime<Utc>,
    gp: &GroundPoint,
    constraints: &GpConstraints,
    policy: &StepPolicy,
    position_fn: &impl Fn(DateTime<Utc>) -> AstroResult<Vector3<f64>>,
) -> AstroResult<(DateTime<Utc>, bool)> {
    let mut t_visible = rise;
    let mut t = rise;

    loop {
        let pos = position_fn(t)?;
        let r = pos.norm();
        let step = policy.step_seconds(r);
        let next = t + ChronoDuration::milliseconds((step * 1000.0).round() as i64).max(ChronoDuration::seconds(1));

        if next >= stop {
            let still_visible = constraints.is_visible(stop, gp, position_fn(stop)?);
            return Ok((stop, still_visible));
        }

        let pos_next = position_fn(next)?;
        if !constraints.is_visible(next, gp, pos_next) {
            let set = bisect_set(t_visible, next, gp, constraints, position_fn)?;
            return Ok((set, false));
        }

        t_visible = next;
        t = next;
    }
}

fn bisect_set(
    mut lo: DateTime<Utc>,
    mut hi: DateTime<Utc>,
    gp: &GroundPoint,
    constraints: &GpConstraints,
    position_fn: &impl Fn(DateTime<Utc>) -> AstroResult<Vector3<f64>>,
) -> AstroResult<DateTime<Utc>> {
    for _ in 0..MAX_BISECTION_ITER {
        let span = hi - lo;
        if span.num_milliseconds() as f64 / 1000.0 <= RISE_SET_TOLERANCE_SECONDS {
            break;
        }
        let mid = lo + span / 2;
        let pos = position_fn(mid)?;
        if constraints.is_visible(mid, gp, pos) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::angle::radian;
    use uom::si::f64::{Angle, Length};
    use uom::si::length::kilometer;

    fn leo_elements() -> KeplerianElements {
        KeplerianElements::new(
            Length::new::<kilometer>(7000.0),
            0.001,
            Angle::new::<radian>(1.7),
            Angle::new::<radian>(0.0),
            Angle::new::<radian>(0.0),
            Angle::new::<radian>(0.0),
        )
    }

    #[test]
    fn azimuth_sector_wraps_through_north() {
        let mut constraints = GpConstraints::new();
        constraints.set_azimuth_range(350.0_f64.to_radians(), 10.0_f64.to_radians()).unwrap();
        assert!(constraints.azimuth_ok(355.0_f64.to_radians()));
        assert!(constraints.azimuth_ok(5.0_f64.to_radians()));
        assert!(!constraints.azimuth_ok(180.0_f64.to_radians()));
    }

    #[test]
    fn rejects_invalid_elevation() {
        let mut constraints = GpConstraints::new();
        assert!(constraints.set_min_elevation(10.0).is_err());
    }

    #[test]
    fn overhead_pass_is_detected() {
        let gp = GroundPoint::new(0.0, 0.0, 0.0);
        let mut constraints = GpConstraints::new();
        constraints.set_min_elevation(10.0_f64.to_radians()).unwrap();

        let elements = leo_elements();
        let start = chrono::Utc::now();
        let stop = start + ChronoDuration::minutes(20);

        // A satellite that stays directly overhead the whole search window.
        let position_fn = |_t: DateTime<Utc>| -> AstroResult<Vector3<f64>> {
            Ok(Vector3::new(6_378_137.0 + 500_000.0, 0.0, 0.0))
        };

        let accesses = find_all_accesses(start, stop, &gp, &constraints, &elements, position_fn).unwrap();
        assert_eq!(accesses.len(), 1);
    }
}
