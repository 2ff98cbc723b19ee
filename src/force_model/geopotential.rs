//! Spherical-harmonic Earth gravity model.
//!
//! Evaluates gravitational acceleration from a normalized spherical
//! harmonic expansion of the geopotential, given a position in an
//! Earth-fixed frame. An embedded low-degree EGM96 coefficient set
//! (through degree and order 4) covers the dominant oblateness (J2) and
//! sectoral/tesseral terms without carrying a full EGM96 table.

use nalgebra::Vector3;

use crate::constants::{EARTH_RADIUS_EQUATORIAL, MU_EARTH};

/// Maximum degree/order of the embedded coefficient set.
pub const MAX_DEGREE: usize = 4;

/// `(n, m, Cnm, Snm)` normalized spherical harmonic coefficients, EGM96,
/// through degree and order 4. `C00`/`C10`/`C11` are omitted: the degree-0
/// term is the point-mass term handled separately, and degree-1 terms
/// vanish when the origin is the center of mass.
const COEFFICIENTS: &[(usize, usize, f64, f64)] = &[
    (2, 0, -0.484_165_143_790_815e-3, 0.0),
    (2, 1, -0.186_987_635_955e-9, 0.119_528_012_031e-8),
    (2, 2, 0.243_914_352_398e-5, -0.140_016_683_654e-5),
    (3, 0, 0.957_254_173_792e-6, 0.0),
    (3, 1, 0.202_998_882_184e-5, 0.248_513_158_716e-6),
    (3, 2, 0.904_627_768_605e-6, -0.619_025_944_205e-6),
    (3, 3, 0.721_072_657_057e-6, 0.141_435_626_958e-6),
    (4, 0, 0.539_873_863_789e-6, 0.0),
    (4, 1, -0.536_321_616_971e-6, -0.473_440_265_853e-6),
    (4, 2, 0.350_694_105_785e-6, 0.662_671_572_540e-6),
    (4, 3, 0.990_771_803_829e-6, -0.200_928_369_177e-6),
    (4, 4, -0.188_560_802_735e-6, 0.308_853_169_333e-6),
];

/// A fully normalized associated Legendre function table, computed by the
/// standard forward-column recursion (sectoral terms from the diagonal,
/// then a three-term recursion down each column).
struct LegendreTable {
    /// `table[n][m]` for `0 <= m <= n <= degree`, plus one extra column at
    /// `m = order + 1` needed for the latitude-partial recursion formula.
    table: Vec<Vec<f64>>,
}

impl LegendreTable {
    /// `max_m` is the highest order column needed (callers pass `order + 1`
    /// to get access to the extra column the latitude-partial formula uses).
    fn new(degree: usize, max_m: usize, sin_lat: f64, cos_lat: f64) -> Self {
        let cols = max_m + 1;
        let mut table = vec![vec![0.0; cols]; degree + 1];
        table[0][0] = 1.0;

        let sectoral_max = max_m.min(degree);
        for m in 1..=sectoral_max {
            let prev = table[m - 1][m - 1];
            table[m][m] = ((2 * m + 1) as f64 / (2 * m) as f64).sqrt() * cos_lat * prev;
        }

        for m in 0..=sectoral_max {
            if m + 1 <= degree {
                table[m + 1][m] = (2.0 * m as f64 + 3.0).sqrt() * sin_lat * table[m][m];
            }
            for n in (m + 2)..=degree {
                let a = (((2 * n - 1) * (2 * n + 1)) as f64 / ((n - m) * (n + m)) as f64).sqrt();
                let b = (((2 * n + 1) * (n + m - 1) * (n - m - 1)) as f64
                    / ((2 * n - 3) * (n - m) * (n + m)) as f64)
                    .sqrt();
                table[n][m] = a * sin_lat * table[n - 1][m] - b * table[n - 2][m];
            }
        }

        Self { table }
    }

    fn get(&self, n: usize, m: usize) -> f64 {
        if n >= self.table.len() || m >= self.table[n].len() {
            0.0
        } else {
            self.table[n][m]
        }
    }
}

/// A spherical-harmonic gravity model truncated at a chosen degree and
/// order, evaluated against the embedded EGM96 coefficient set.
#[derive(Clone, Copy, Debug)]
pub struct GeopotentialModel {
    degree: usize,
    order: usize,
    mu: f64,
    re: f64,
}

impl GeopotentialModel {
    /// Build a model truncated at `degree`/`order` (both clamped to the
    /// embedded coefficient set's maximum of 4), using Earth's standard
    /// gravitational parameter and equatorial radius.
    #[must_use]
    pub fn new(degree: usize, order: usize) -> Self {
        Self::with_body(degree, order, MU_EARTH, EARTH_RADIUS_EQUATORIAL)
    }

    /// Build a model for an arbitrary central body and `mu`/`re`, still
    /// drawing from the embedded Earth coefficient set (intended for
    /// comparative or scaled-body studies, not genuine other-body gravity).
    #[must_use]
    pub fn with_body(degree: usize, order: usize, mu: f64, re: f64) -> Self {
        Self {
            degree: degree.min(MAX_DEGREE),
            order: order.min(degree.min(MAX_DEGREE)),
            mu,
            re,
        }
    }

    /// Compute gravitational acceleration at a position expressed in an
    /// Earth-fixed frame, in meters, returning acceleration in m/s^2 in
    /// that same frame. The caller is responsible for rotating the result
    /// into whichever inertial frame the equations of motion integrate in.
    #[must_use]
    pub fn acceleration(&self, position: Vector3<f64>) -> Vector3<f64> {
        let rx = position.x;
        let ry = position.y;
        let rz = position.z;
        let rmag = position.norm();
        let invr = 1.0 / rmag;
        let rxy = (rx * rx + ry * ry).sqrt();
        let invrxy = 1.0 / rxy.max(1e-12);

        let sin_lat = rz * invr;
        let cos_lat = rxy * invr;
        let tan_lat = rz * invrxy;
        let sin_lon = ry * invrxy;
        let cos_lon = rx * invrxy;

        let legendre = LegendreTable::new(self.degree, self.order + 1, sin_lat, cos_lat);

        let mut smlon = vec![0.0; self.order + 2];
        let mut cmlon = vec![1.0; self.order + 2];
        if !smlon.is_empty() {
            smlon[0] = 0.0;
            cmlon[0] = 1.0;
        }
        if self.order + 1 >= 1 {
            smlon[1] = sin_lon;
            cmlon[1] = cos_lon;
        }
        for m in 2..=(self.order + 1).min(smlon.len() - 1) {
            smlon[m] = 2.0 * cos_lon * smlon[m - 1] - smlon[m - 2];
            cmlon[m] = 2.0 * cos_lon * cmlon[m - 1] - cmlon[m - 2];
        }

        let mut re_r_n = vec![1.0; self.degree + 1];
        let re_r = self.re * invr;
        for n in 1..=self.degree {
            re_r_n[n] = re_r * re_r_n[n - 1];
        }

        let mut du_dr = 0.0;
        let mut du_dlat = 0.0;
        let mut du_dlon = 0.0;

        for &(n, m, cnm, snm) in COEFFICIENTS {
            if n > self.degree || m > self.order {
                continue;
            }
            let pnm = legendre.get(n, m);
            let pnmp1 = legendre.get(n, m + 1);
            let trig = cnm * cmlon[m] + snm * smlon[m];

            du_dr += (n as f64 + 1.0) * re_r_n[n] * pnm * trig;
            du_dlat += re_r_n[n] * (pnmp1 - m as f64 * tan_lat * pnm) * trig;
            du_dlon += m as f64 * re_r_n[n] * pnm * (snm * cmlon[m] - cnm * smlon[m]);
        }

        du_dr += 1.0;

        let gm_r = self.mu * invr;
        du_dr *= -gm_r * invr;
        du_dlat *= gm_r;
        du_dlon *= gm_r;

        let invr2 = invr * invr;
        let invrxy2 = invrxy * invrxy;
        let dlat = invr * du_dr - du_dlat * rz * invrxy * invr2;
        let dlon = du_dlon * invrxy2;

        Vector3::new(
            dlat * rx - dlon * ry,
            dlat * ry + dlon * rx,
            invr * du_dr * rz + du_dlat * rxy * invr2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_mass_limit_matches_two_body() {
        let model = GeopotentialModel::new(0, 0);
        let r = 7_000_000.0;
        let acc = model.acceleration(Vector3::new(r, 0.0, 0.0));
        assert_relative_eq!(acc.x, -MU_EARTH / (r * r), epsilon = 1.0);
        assert_relative_eq!(acc.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn j2_term_perturbs_off_equator() {
        let model = GeopotentialModel::new(2, 0);
        let r = 7_000_000.0;
        let equatorial = model.acceleration(Vector3::new(r, 0.0, 0.0));
        let polar = model.acceleration(Vector3::new(0.0, 0.0, r));
        assert!((equatorial.x.abs() - polar.z.abs()).abs() > 1e-6);
    }

    #[test]
    fn degree_and_order_are_clamped_to_embedded_set() {
        let model = GeopotentialModel::new(20, 20);
        assert_eq!(model.degree, MAX_DEGREE);
        assert_eq!(model.order, MAX_DEGREE);
    }
}
