//! Equatorial precession matrices (§4.5).
//!
//! FK5 precession follows the IAU 1976 (Lieske 1979) four-angle
//! approximation reduced to the standard three-rotation form; FK4
//! precession follows the analogous Newcomb coefficients referred to
//! B1900.0. Both are expressed as a matrix from a reference epoch (J2000.0
//! or B1900.0) to an arbitrary target epoch; precessing between two
//! arbitrary epochs composes the target matrix with the inverse (transpose)
//! of the source matrix.

use super::vector::{multiply_matrices, rotate_y, rotate_z, transpose, RMatrix};

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// The IAU 1976 / Lieske (1979) precession angles `(ζ, z, θ)`, in radians,
/// for precessing from J2000.0 to the epoch `t` Julian centuries after
/// J2000.0.
fn lieske_angles(t: f64) -> (f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    let zeta = (2306.2181 * t + 0.30188 * t2 + 0.017998 * t3) * ARCSEC_TO_RAD;
    let z = (2306.2181 * t + 1.09468 * t2 + 0.018203 * t3) * ARCSEC_TO_RAD;
    let theta = (2004.3109 * t - 0.42665 * t2 - 0.041833 * t3) * ARCSEC_TO_RAD;
    (zeta, z, theta)
}

/// The Newcomb precession angles `(ζ, z, θ)`, in radians, for precessing
/// from B1900.0 to the epoch `t` tropical centuries after B1900.0.
fn newcomb_angles(t: f64) -> (f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    let zeta = (2304.250 * t + 0.302 * t2 + 0.018 * t3) * ARCSEC_TO_RAD;
    let z = (2304.250 * t + 1.093 * t2 + 0.018 * t3) * ARCSEC_TO_RAD;
    let theta = (2004.682 * t - 0.853 * t2 - 0.217 * t3) * ARCSEC_TO_RAD;
    (zeta, z, theta)
}

fn precession_matrix_from_angles(zeta: f64, z: f64, theta: f64) -> RMatrix {
    rotate_z(-z, rotate_y(theta, rotate_z(-zeta, super::vector::identity())))
}

/// FK5 precession matrix from Julian equinox `from` to Julian equinox `to`.
pub fn fk5_precession_matrix(from: f64, to: f64) -> RMatrix {
    let t_to = (to - 2000.0) / 100.0;
    let t_from = (from - 2000.0) / 100.0;
    let (z0, z1, t0) = lieske_angles(t_to);
    let to_j2000_to_target = precession_matrix_from_angles(z0, z1, t0);
    if (from - 2000.0).abs() < 1e-12 {
        return to_j2000_to_target;
    }
    let (z0s, z1s, t0s) = lieske_angles(t_from);
    let j2000_to_source = precession_matrix_from_angles(z0s, z1s, t0s);
    let source_to_j2000 = transpose(j2000_to_source);
    multiply_matrices(to_j2000_to_target, source_to_j2000)
}

/// FK4 precession matrix from Besselian equinox `from` to Besselian equinox `to`.
pub fn fk4_precession_matrix(from: f64, to: f64) -> RMatrix {
    let t_to = (to - 1900.0) / 100.0;
    let t_from = (from - 1900.0) / 100.0;
    let (z0, z1, t0) = newcomb_angles(t_to);
    let to_b1900_to_target = precession_matrix_from_angles(z0, z1, t0);
    if (from - 1900.0).abs() < 1e-12 {
        return to_b1900_to_target;
    }
    let (z0s, z1s, t0s) = newcomb_angles(t_from);
    let b1900_to_source = precession_matrix_from_angles(z0s, z1s, t0s);
    let source_to_b1900 = transpose(b1900_to_source);
    multiply_matrices(to_b1900_to_target, source_to_b1900)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::vector::mat_mul_pvec;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_precession_is_identity() {
        let m = fk5_precession_matrix(2000.0, 2000.0);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(m[i][j], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn precession_preserves_vector_modulus() {
        let m = fk5_precession_matrix(2000.0, 1975.0);
        let v = [0.6, 0.6, 0.529_15];
        let rotated = mat_mul_pvec(m, v);
        let before = super::super::vector::modulus(v);
        let after = super::super::vector::modulus(rotated);
        assert_abs_diff_eq!(before, after, epsilon = 1e-9);
    }

    #[test]
    fn precession_round_trip() {
        let forward = fk5_precession_matrix(2000.0, 1950.0);
        let backward = fk5_precession_matrix(1950.0, 2000.0);
        let composed = multiply_matrices(backward, forward);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(composed[i][j], expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn fk4_precession_round_trip() {
        let forward = fk4_precession_matrix(1950.0, 1975.0);
        let backward = fk4_precession_matrix(1975.0, 1950.0);
        let composed = multiply_matrices(backward, forward);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(composed[i][j], expected, epsilon = 1e-9);
            }
        }
    }
}
