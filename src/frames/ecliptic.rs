//! Equatorial ↔ ecliptic rotation about the mean obliquity of the ecliptic (§4.5).

use super::vector::{rotate_x, PVector};

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Mean obliquity of the ecliptic (IAU 1980) at Julian equinox `equinox_j`, in radians.
pub fn mean_obliquity(equinox_j: f64) -> f64 {
    let t = (equinox_j - 2000.0) / 100.0;
    let t2 = t * t;
    let t3 = t2 * t;
    let arcsec = 23.0 * 3600.0 + 26.0 * 60.0 + 21.448 - 46.8150 * t - 0.00059 * t2 + 0.001813 * t3;
    arcsec * ARCSEC_TO_RAD
}

/// Rotates an equatorial unit vector at Julian equinox `equinox_j` to ecliptic coordinates.
pub fn equatorial_to_ecliptic(p: PVector, equinox_j: f64) -> PVector {
    let eps = mean_obliquity(equinox_j);
    super::vector::mat_mul_pvec(rotate_x(eps, super::vector::identity()), p)
}

/// Rotates an ecliptic unit vector at Julian equinox `equinox_j` to equatorial coordinates.
pub fn ecliptic_to_equatorial(p: PVector, equinox_j: f64) -> PVector {
    let eps = mean_obliquity(equinox_j);
    super::vector::mat_mul_pvec(rotate_x(-eps, super::vector::identity()), p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::vector::spherical_to_cartesian;
    use approx::assert_abs_diff_eq;

    #[test]
    fn round_trip() {
        let p = spherical_to_cartesian(1.4, 0.6);
        let round = ecliptic_to_equatorial(equatorial_to_ecliptic(p, 2000.0), 2000.0);
        assert_abs_diff_eq!(p[0], round[0], epsilon = 1e-12);
        assert_abs_diff_eq!(p[1], round[1], epsilon = 1e-12);
        assert_abs_diff_eq!(p[2], round[2], epsilon = 1e-12);
    }

    #[test]
    fn j2000_obliquity_matches_known_value() {
        // IAU 1980, J2000.0: 23°26'21.448"
        let expected = (23.0 + 26.0 / 60.0 + 21.448 / 3600.0_f64) * std::f64::consts::PI / 180.0;
        assert_abs_diff_eq!(mean_obliquity(2000.0), expected, epsilon = 1e-12);
    }
}
