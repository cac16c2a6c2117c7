//! Fixed rotations bridging celestial reference frame families (§4.5).
//!
//! Both bridges are applied at a common B1950/J2000 equinox; callers
//! precess to/from that equinox on either side with [`super::precession`].

use super::vector::{mat_mul_pvec, transpose, PVector, RMatrix};

/// FK4 (B1950) → FK5 (J2000) position-only rotation (Aoki et al. 1983 /
/// Murray 1989 standard matrix). This is the fixed-rotation term only; the
/// additional linear motion term over `epoch_obs − B1950` that Murray 1989
/// gives for precise work requires catalog proper motions this crate does
/// not model, and is intentionally not implemented (see `DESIGN.md`).
const FK4_TO_FK5: RMatrix = [
    [0.999_925_678_2, 0.011_182_061_0, 0.004_857_947_9],
    [-0.011_182_061_0, 0.999_937_478_4, -0.000_027_147_4],
    [-0.004_857_947_9, -0.000_027_147_4, 0.999_988_199_7],
];

/// Rotates a B1950 FK4 unit vector to its J2000 FK5 counterpart.
pub fn fk4_to_fk5(p: PVector) -> PVector {
    mat_mul_pvec(FK4_TO_FK5, p)
}

/// Rotates a J2000 FK5 unit vector to its B1950 FK4 counterpart.
pub fn fk5_to_fk4(p: PVector) -> PVector {
    mat_mul_pvec(transpose(FK4_TO_FK5), p)
}

/// ICRS → FK5 (J2000.0) frame bias (Kaplan 1981 / IAU frame bias angles),
/// built from the standard small bias angles `(ξ0, η0, dα0)` in arcseconds.
const FRAME_BIAS_XI0_ARCSEC: f64 = -0.016_617_0;
const FRAME_BIAS_ETA0_ARCSEC: f64 = -0.006_819_2;
const FRAME_BIAS_DA0_ARCSEC: f64 = -0.014_6;

fn frame_bias_matrix() -> RMatrix {
    let arcsec = std::f64::consts::PI / (180.0 * 3600.0);
    let xi0 = FRAME_BIAS_XI0_ARCSEC * arcsec;
    let eta0 = FRAME_BIAS_ETA0_ARCSEC * arcsec;
    let da0 = FRAME_BIAS_DA0_ARCSEC * arcsec;
    super::vector::rotate_z(-da0, super::vector::rotate_y(xi0, super::vector::rotate_x(eta0, super::vector::identity())))
}

/// Rotates an ICRS unit vector to its FK5 (J2000.0) counterpart.
pub fn icrs_to_fk5(p: PVector) -> PVector {
    mat_mul_pvec(frame_bias_matrix(), p)
}

/// Rotates an FK5 (J2000.0) unit vector to its ICRS counterpart.
pub fn fk5_to_icrs(p: PVector) -> PVector {
    mat_mul_pvec(transpose(frame_bias_matrix()), p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::vector::spherical_to_cartesian;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fk4_fk5_round_trip() {
        let p = spherical_to_cartesian(2.1, -0.3);
        let round = fk5_to_fk4(fk4_to_fk5(p));
        assert_abs_diff_eq!(p[0], round[0], epsilon = 1e-12);
        assert_abs_diff_eq!(p[1], round[1], epsilon = 1e-12);
        assert_abs_diff_eq!(p[2], round[2], epsilon = 1e-12);
    }

    #[test]
    fn icrs_fk5_round_trip() {
        let p = spherical_to_cartesian(0.5, 0.9);
        let round = fk5_to_icrs(icrs_to_fk5(p));
        assert_abs_diff_eq!(p[0], round[0], epsilon = 1e-12);
        assert_abs_diff_eq!(p[1], round[1], epsilon = 1e-12);
        assert_abs_diff_eq!(p[2], round[2], epsilon = 1e-12);
    }

    #[test]
    fn icrs_fk5_bias_is_small() {
        let p = spherical_to_cartesian(0.0, 0.0);
        let rotated = icrs_to_fk5(p);
        let delta = ((rotated[0] - p[0]).powi(2)
            + (rotated[1] - p[1]).powi(2)
            + (rotated[2] - p[2]).powi(2))
        .sqrt();
        assert!(delta < 1e-6);
    }
}
