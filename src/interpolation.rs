//! Ephemeris interpolation utilities: cubic Hermite segments, least-squares
//! Chebyshev-polynomial granules, and a lookup structure for locating which
//! segment or granule covers a given time.

use nalgebra::{DMatrix, SVector, Vector3};

use crate::errors::{AstroError, AstroResult};

/// Cubic Hermite interpolation between two (position, velocity) nodes,
/// matching position, velocity, and implied acceleration/jerk at both
/// endpoints. Evaluated by Horner's method.
///
/// `N` is the dimension of the interpolated vector (3 for a position or
/// velocity state).
#[derive(Clone, Copy, Debug)]
pub struct Hermite1<const N: usize> {
    dt_max: f64,
    dt_eps: f64,
    p0: SVector<f64, N>,
    v0: SVector<f64, N>,
    a0: SVector<f64, N>,
    j0: SVector<f64, N>,
}

impl<const N: usize> Hermite1<N> {
    /// Build a Hermite segment spanning `dt` (time units consistent with
    /// the derivatives) between endpoint states `(p0, v0)` and `(p1, v1)`.
    ///
    /// `dt_eps` extends the valid query range slightly past `[0, dt]` to
    /// absorb roundoff when callers compute `dt` by subtracting epochs.
    #[must_use]
    pub fn new(
        dt: f64,
        p0: SVector<f64, N>,
        v0: SVector<f64, N>,
        p1: SVector<f64, N>,
        v1: SVector<f64, N>,
        dt_eps: f64,
    ) -> Self {
        let invdt = 1.0 / dt;
        let j0 = 6.0 * invdt * invdt * (v0 + v1 - 2.0 * invdt * (p1 - p0));
        let a0 = invdt * (v1 - v0) - 0.5 * j0 * dt;

        Self {
            dt_max: dt,
            dt_eps,
            p0,
            v0,
            a0,
            j0,
        }
    }

    /// Maximum valid query offset from the segment's start.
    #[must_use]
    pub fn max_dt(&self) -> f64 {
        self.dt_max
    }

    fn check_range(&self, dt: f64) -> AstroResult<()> {
        if dt < -self.dt_eps || dt > self.dt_max + self.dt_eps {
            return Err(AstroError::InvalidCoordinates {
                reason: format!(
                    "hermite query dt {dt} outside segment range [0, {}]",
                    self.dt_max
                ),
            });
        }
        Ok(())
    }

    /// Interpolated position at `dt` past the segment start.
    pub fn position(&self, dt: f64) -> AstroResult<SVector<f64, N>> {
        self.check_range(dt)?;
        Ok(self.p0 + dt * (self.v0 + (dt / 2.0) * (self.a0 + (dt / 3.0) * self.j0)))
    }

    /// Interpolated velocity at `dt` past the segment start.
    pub fn velocity(&self, dt: f64) -> AstroResult<SVector<f64, N>> {
        self.check_range(dt)?;
        Ok(self.v0 + dt * (self.a0 + (dt / 2.0) * self.j0))
    }

    /// Interpolated acceleration at `dt` past the segment start.
    pub fn acceleration(&self, dt: f64) -> AstroResult<SVector<f64, N>> {
        self.check_range(dt)?;
        Ok(self.a0 + dt * self.j0)
    }
}

/// Maps a query value to the index of the contiguous, sorted, non-empty
/// block `(start, end]`-like interval that contains it.
///
/// This is a binary-search based lookup rather than the bucketed
/// approximate-index scheme used for very large, evenly spaced block sets;
/// with the modest ephemeris granule counts this crate deals with, a plain
/// `O(log n)` search is simpler and just as fast in practice.
#[derive(Clone, Debug)]
pub struct IndexMapper {
    starts: Vec<f64>,
    ends: Vec<f64>,
}

impl IndexMapper {
    /// Build a mapper from a list of `(start, end)` blocks in increasing,
    /// contiguous (touching or overlapping) order.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidCoordinates`] if any block is empty
    /// (`end <= start`) or the blocks leave a gap.
    pub fn new(blocks: Vec<(f64, f64)>) -> AstroResult<Self> {
        if blocks.is_empty() {
            return Err(AstroError::InvalidCoordinates {
                reason: "IndexMapper requires at least one block".to_string(),
            });
        }
        for w in blocks.windows(2) {
            if w[1].0 > w[0].1 {
                return Err(AstroError::InvalidCoordinates {
                    reason: "IndexMapper blocks must not have gaps".to_string(),
                });
            }
        }
        for &(start, end) in &blocks {
            if end <= start {
                return Err(AstroError::InvalidCoordinates {
                    reason: "IndexMapper block end must exceed its start".to_string(),
                });
            }
        }

        let starts = blocks.iter().map(|b| b.0).collect();
        let ends = blocks.iter().map(|b| b.1).collect();
        Ok(Self { starts, ends })
    }

    /// Find the index of the block containing `value`.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidCoordinates`] if `value` falls outside
    /// every block.
    pub fn index(&self, value: f64) -> AstroResult<usize> {
        let idx = self.starts.partition_point(|&s| s <= value);
        let candidate = idx.saturating_sub(1);
        if candidate < self.ends.len() && value <= self.ends[candidate] && value >= self.starts[candidate] {
            return Ok(candidate);
        }
        Err(AstroError::InvalidCoordinates {
            reason: format!("value {value} not covered by any block"),
        })
    }
}

fn chebyshev_basis(order: usize, x: f64) -> Vec<f64> {
    let mut t = vec![0.0; order + 1];
    t[0] = 1.0;
    if order >= 1 {
        t[1] = x;
    }
    for k in 2..=order {
        t[k] = 2.0 * x * t[k - 1] - t[k - 2];
    }
    t
}

/// Least-squares Chebyshev-polynomial fit of a fixed `order` to a block of
/// SP3-like position/velocity samples, for granules too large for a single
/// cubic [`Hermite1`] segment to represent well. Position and velocity are
/// fit independently (an `order + 1`-point exact fit is also valid, since
/// an exact interpolating polynomial is a degenerate least-squares fit).
///
/// Sample times are normalized to `[-1, 1]` over the granule's span before
/// evaluating the Chebyshev basis, matching the usual numerical-stability
/// motivation for Chebyshev fits.
#[derive(Clone, Debug)]
pub struct Granule {
    order: usize,
    t_start: f64,
    dt_norm: f64,
    dt_shift: f64,
    coeffs_pos: Vec<Vector3<f64>>,
    coeffs_vel: Vec<Vector3<f64>>,
}

impl Granule {
    /// Fit a granule of `order` to the given `times`/`positions`/
    /// `velocities`, which must all have equal length greater than `order`
    /// and be sorted in increasing time.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidCoordinates`] if the input lengths
    /// disagree, there are not enough points for the requested order, or
    /// [`AstroError::NonConvergence`] if the normal-equations fit matrix is
    /// singular.
    pub fn new(
        times: &[f64],
        positions: &[Vector3<f64>],
        velocities: &[Vector3<f64>],
        order: usize,
    ) -> AstroResult<Self> {
        let n = times.len();
        if n != positions.len() || n != velocities.len() {
            return Err(AstroError::InvalidCoordinates {
                reason: "Granule requires equal-length times/positions/velocities".to_string(),
            });
        }
        if n <= order {
            return Err(AstroError::InvalidCoordinates {
                reason: format!("Granule requires more than {order} points, got {n}"),
            });
        }

        let t_start = times[0];
        let t_end = times[n - 1];
        let dt_norm = 0.5 * (t_end - t_start);
        let dt_shift = dt_norm;

        let mut design = DMatrix::<f64>::zeros(n, order + 1);
        let mut rhs_pos = DMatrix::<f64>::zeros(n, 3);
        let mut rhs_vel = DMatrix::<f64>::zeros(n, 3);
        for i in 0..n {
            let dt = (times[i] - t_start - dt_shift) / dt_norm;
            let basis = chebyshev_basis(order, dt);
            for (j, b) in basis.iter().enumerate() {
                design[(i, j)] = *b;
            }
            for k in 0..3 {
                rhs_pos[(i, k)] = positions[i][k];
                rhs_vel[(i, k)] = velocities[i][k];
            }
        }

        let ata = design.transpose() * &design;
        let chol = ata.cholesky().ok_or(AstroError::NonConvergence {
            solver: "Granule::new".to_string(),
            iterations: 0,
        })?;
        let atb_pos = design.transpose() * &rhs_pos;
        let atb_vel = design.transpose() * &rhs_vel;
        let sol_pos = chol.solve(&atb_pos);
        let sol_vel = chol.solve(&atb_vel);

        let coeffs_pos = (0..=order)
            .map(|j| Vector3::new(sol_pos[(j, 0)], sol_pos[(j, 1)], sol_pos[(j, 2)]))
            .collect();
        let coeffs_vel = (0..=order)
            .map(|j| Vector3::new(sol_vel[(j, 0)], sol_vel[(j, 1)], sol_vel[(j, 2)]))
            .collect();

        Ok(Self {
            order,
            t_start,
            dt_norm,
            dt_shift,
            coeffs_pos,
            coeffs_vel,
        })
    }

    fn normalized_dt(&self, t: f64) -> AstroResult<f64> {
        const DT_EPS: f64 = 1.0e-14;
        let dt = (t - self.t_start - self.dt_shift) / self.dt_norm;
        if dt < -1.0 - DT_EPS || dt > 1.0 + DT_EPS {
            return Err(AstroError::InvalidCoordinates {
                reason: format!("Granule query time {t} outside its fit span"),
            });
        }
        Ok(dt)
    }

    /// Interpolated position at `t` (same time units the granule was
    /// constructed with).
    pub fn position(&self, t: f64) -> AstroResult<Vector3<f64>> {
        let dt = self.normalized_dt(t)?;
        let basis = chebyshev_basis(self.order, dt);
        Ok(basis
            .iter()
            .zip(&self.coeffs_pos)
            .map(|(b, c)| *b * c)
            .sum())
    }

    /// Interpolated velocity at `t` (same time units the granule was
    /// constructed with).
    pub fn velocity(&self, t: f64) -> AstroResult<Vector3<f64>> {
        let dt = self.normalized_dt(t)?;
        let basis = chebyshev_basis(self.order, dt);
        Ok(basis
            .iter()
            .zip(&self.coeffs_vel)
            .map(|(b, c)| *b * c)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hermite_matches_endpoints() {
        let p0 = SVector::<f64, 3>::new(0.0, 0.0, 0.0);
        let v0 = SVector::<f64, 3>::new(1.0, 0.0, 0.0);
        let p1 = SVector::<f64, 3>::new(10.0, 0.0, 0.0);
        let v1 = SVector::<f64, 3>::new(1.0, 0.0, 0.0);

        let h = Hermite1::new(10.0, p0, v0, p1, v1, 0.0);
        let pos0 = h.position(0.0).unwrap();
        let pos1 = h.position(10.0).unwrap();

        assert_relative_eq!(pos0.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pos1.x, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn hermite_rejects_out_of_range_query() {
        let zero = SVector::<f64, 3>::zeros();
        let h = Hermite1::new(10.0, zero, zero, zero, zero, 0.0);
        assert!(h.position(20.0).is_err());
    }

    #[test]
    fn index_mapper_finds_containing_block() {
        let mapper = IndexMapper::new(vec![(0.0, 10.0), (10.0, 20.0), (20.0, 35.0)]).unwrap();
        assert_eq!(mapper.index(5.0).unwrap(), 0);
        assert_eq!(mapper.index(15.0).unwrap(), 1);
        assert_eq!(mapper.index(34.9).unwrap(), 2);
    }

    #[test]
    fn index_mapper_rejects_out_of_range() {
        let mapper = IndexMapper::new(vec![(0.0, 10.0)]).unwrap();
        assert!(mapper.index(50.0).is_err());
    }

    #[test]
    fn index_mapper_rejects_gaps() {
        let result = IndexMapper::new(vec![(0.0, 10.0), (11.0, 20.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn granule_exactly_fits_linear_motion() {
        let times: Vec<f64> = (0..9).map(|i| i as f64 * 10.0).collect();
        let positions: Vec<Vector3<f64>> = times.iter().map(|&t| Vector3::new(t, 0.0, 0.0)).collect();
        let velocities: Vec<Vector3<f64>> =
            times.iter().map(|_| Vector3::new(1.0, 0.0, 0.0)).collect();

        let granule = Granule::new(&times, &positions, &velocities, 8).unwrap();

        let p = granule.position(45.0).unwrap();
        assert_relative_eq!(p.x, 45.0, epsilon = 1e-6);
        let v = granule.velocity(45.0).unwrap();
        assert_relative_eq!(v.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn granule_rejects_out_of_range_query() {
        let times: Vec<f64> = (0..9).map(|i| i as f64 * 10.0).collect();
        let positions: Vec<Vector3<f64>> = times.iter().map(|&t| Vector3::new(t, 0.0, 0.0)).collect();
        let velocities: Vec<Vector3<f64>> =
            times.iter().map(|_| Vector3::new(1.0, 0.0, 0.0)).collect();
        let granule = Granule::new(&times, &positions, &velocities, 8).unwrap();
        assert!(granule.position(1000.0).is_err());
    }

    #[test]
    fn granule_rejects_underdetermined_fit() {
        let times = vec![0.0, 10.0, 20.0];
        let positions = vec![Vector3::zeros(); 3];
        let velocities = vec![Vector3::zeros(); 3];
        assert!(Granule::new(&times, &positions, &velocities, 8).is_err());
    }
}
