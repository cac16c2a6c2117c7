//! Equatorial ↔ Galactic and Galactic ↔ Supergalactic fixed rotations (§4.5).
//!
//! Built as the classical three-rotation pole+origin construction: rotate
//! the equatorial frame so its pole coincides with the galactic pole, then
//! rotate about that pole so the ascending node lands on the stated origin
//! longitude.

use super::vector::{identity, mat_mul_pvec, rotate_y, rotate_z, transpose, PVector, RMatrix};

const DEG: f64 = std::f64::consts::PI / 180.0;

/// IAU 1958 galactic pole, in equatorial (α, δ), and galactic longitude of
/// the ascending node of the galactic plane, `l0`.
const GALACTIC_POLE_RA: f64 = 192.859_48 * DEG;
const GALACTIC_POLE_DEC: f64 = 27.128_25 * DEG;
const GALACTIC_L0: f64 = 122.931_92 * DEG;

/// de Vaucouleurs supergalactic pole, in galactic (l, b), and supergalactic
/// longitude origin (by construction the ascending node, i.e. 0).
const SUPERGALACTIC_POLE_L: f64 = 47.37 * DEG;
const SUPERGALACTIC_POLE_B: f64 = 6.32 * DEG;

fn pole_rotation(pole_lon: f64, pole_lat: f64, origin_lon: f64) -> RMatrix {
    // Bring the pole to the z-axis, then rotate about z so the origin
    // meridian lands on the x-axis.
    let r = rotate_y(
        std::f64::consts::FRAC_PI_2 - pole_lat,
        rotate_z(pole_lon, identity()),
    );
    rotate_z(std::f64::consts::FRAC_PI_2 - origin_lon, r)
}

fn equatorial_to_galactic_matrix() -> RMatrix {
    pole_rotation(GALACTIC_POLE_RA, GALACTIC_POLE_DEC, GALACTIC_L0)
}

fn galactic_to_supergalactic_matrix() -> RMatrix {
    pole_rotation(SUPERGALACTIC_POLE_L, SUPERGALACTIC_POLE_B, 0.0)
}

/// Rotates an equatorial (ICRS/J2000-like) unit vector to galactic coordinates.
pub fn equatorial_to_galactic(p: PVector) -> PVector {
    mat_mul_pvec(equatorial_to_galactic_matrix(), p)
}

/// Rotates a galactic unit vector to equatorial coordinates.
pub fn galactic_to_equatorial(p: PVector) -> PVector {
    mat_mul_pvec(transpose(equatorial_to_galactic_matrix()), p)
}

/// Rotates a galactic unit vector to supergalactic coordinates.
pub fn galactic_to_supergalactic(p: PVector) -> PVector {
    mat_mul_pvec(galactic_to_supergalactic_matrix(), p)
}

/// Rotates a supergalactic unit vector to galactic coordinates.
pub fn supergalactic_to_galactic(p: PVector) -> PVector {
    mat_mul_pvec(transpose(galactic_to_supergalactic_matrix()), p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::vector::spherical_to_cartesian;
    use approx::assert_abs_diff_eq;

    #[test]
    fn galactic_round_trip() {
        let p = spherical_to_cartesian(3.0, -0.2);
        let round = galactic_to_equatorial(equatorial_to_galactic(p));
        assert_abs_diff_eq!(p[0], round[0], epsilon = 1e-9);
        assert_abs_diff_eq!(p[1], round[1], epsilon = 1e-9);
        assert_abs_diff_eq!(p[2], round[2], epsilon = 1e-9);
    }

    #[test]
    fn supergalactic_round_trip() {
        let p = spherical_to_cartesian(1.0, 0.5);
        let round = supergalactic_to_galactic(galactic_to_supergalactic(p));
        assert_abs_diff_eq!(p[0], round[0], epsilon = 1e-9);
        assert_abs_diff_eq!(p[1], round[1], epsilon = 1e-9);
        assert_abs_diff_eq!(p[2], round[2], epsilon = 1e-9);
    }

    #[test]
    fn north_galactic_pole_maps_near_pole() {
        let pole = spherical_to_cartesian(GALACTIC_POLE_RA, GALACTIC_POLE_DEC);
        let galactic = equatorial_to_galactic(pole);
        assert_abs_diff_eq!(galactic[2], 1.0, epsilon = 1e-9);
    }
}
