//! p-vector and r-matrix primitives underlying the frame conversion engine.
//!
//! Mirrors the vector/matrix algebra of `cjordan-rust-erfa`'s
//! `vectors_and_matrices.rs` and `separation.rs`, narrowed to the operations
//! the rotation graph (§4.5) actually needs.

/// A point on the unit sphere, or any 3-vector.
pub type PVector = [f64; 3];
/// A 3x3 rotation matrix.
pub type RMatrix = [[f64; 3]; 3];

/// `(longitude, latitude)` in radians to a unit p-vector.
pub fn spherical_to_cartesian(lon: f64, lat: f64) -> PVector {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat]
}

/// A p-vector to `(longitude, latitude)` in radians; longitude in `[0, 2π)`.
pub fn cartesian_to_spherical(p: PVector) -> (f64, f64) {
    let lon = p[1].atan2(p[0]).rem_euclid(std::f64::consts::TAU);
    let r = modulus(p);
    let lat = if r == 0.0 { 0.0 } else { (p[2] / r).clamp(-1.0, 1.0).asin() };
    (lon, lat)
}

/// Modulus of a p-vector. (`eraPm`)
pub fn modulus(p: PVector) -> f64 {
    (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
}

/// p-vector outer (cross) product. (`eraPxp`)
pub fn outer_product(a: PVector, b: PVector) -> PVector {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// p-vector inner (dot) product. (`eraPdp`)
pub fn inner_product(a: PVector, b: PVector) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Angular separation between two p-vectors, in radians, via the cross/dot
/// formulation (`eraSepp`) for accuracy near 0 and π.
pub fn angular_separation(a: PVector, b: PVector) -> f64 {
    let axb = outer_product(a, b);
    let ss = modulus(axb);
    let cs = inner_product(a, b);
    if ss != 0.0 || cs != 0.0 {
        ss.atan2(cs)
    } else {
        0.0
    }
}

/// r-matrix times p-vector. (`eraRxp`)
pub fn mat_mul_pvec(r: RMatrix, p: PVector) -> PVector {
    let mut out = [0.0; 3];
    for (row, out) in r.iter().zip(out.iter_mut()) {
        *out = row[0] * p[0] + row[1] * p[1] + row[2] * p[2];
    }
    out
}

/// r-matrix times r-matrix. (`eraRxr`)
pub fn multiply_matrices(a: RMatrix, b: RMatrix) -> RMatrix {
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let mut w = 0.0;
            for (k, b_row) in b.iter().enumerate() {
                w += a[i][k] * b_row[j];
            }
            out[i][j] = w;
        }
    }
    out
}

/// Transpose (== inverse, for an orthonormal r-matrix) of an r-matrix. (`eraTr`)
pub fn transpose(r: RMatrix) -> RMatrix {
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[j][i] = r[i][j];
        }
    }
    out
}

/// The 3x3 identity r-matrix. (`eraIr`)
pub fn identity() -> RMatrix {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

/// Right-handed rotation about the x-axis by `phi` radians, applied to `r`
/// as an additional rotation (`r_new = Rx(phi) * r`). (`eraRx`)
pub fn rotate_x(phi: f64, r: RMatrix) -> RMatrix {
    let (s, c) = phi.sin_cos();
    let rx = [[1.0, 0.0, 0.0], [0.0, c, s], [0.0, -s, c]];
    multiply_matrices(rx, r)
}

/// Right-handed rotation about the y-axis by `theta` radians. (`eraRy`)
pub fn rotate_y(theta: f64, r: RMatrix) -> RMatrix {
    let (s, c) = theta.sin_cos();
    let ry = [[c, 0.0, -s], [0.0, 1.0, 0.0], [s, 0.0, c]];
    multiply_matrices(ry, r)
}

/// Right-handed rotation about the z-axis by `psi` radians. (`eraRz`)
pub fn rotate_z(psi: f64, r: RMatrix) -> RMatrix {
    let (s, c) = psi.sin_cos();
    let rz = [[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]];
    multiply_matrices(rz, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn spherical_roundtrip() {
        let (lon, lat) = (1.2, -0.4);
        let p = spherical_to_cartesian(lon, lat);
        let (lon2, lat2) = cartesian_to_spherical(p);
        assert_abs_diff_eq!(lon, lon2, epsilon = 1e-12);
        assert_abs_diff_eq!(lat, lat2, epsilon = 1e-12);
    }

    #[test]
    fn separation_of_identical_vectors_is_zero() {
        let p = spherical_to_cartesian(0.7, 0.3);
        assert_abs_diff_eq!(angular_separation(p, p), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn separation_of_opposite_points_is_pi() {
        let a = spherical_to_cartesian(0.0, 0.0);
        let b = spherical_to_cartesian(std::f64::consts::PI, 0.0);
        assert_abs_diff_eq!(angular_separation(a, b), std::f64::consts::PI, epsilon = 1e-9);
    }

    #[test]
    fn rotation_matrix_is_orthonormal() {
        let r = rotate_z(0.5, rotate_y(0.3, rotate_x(0.2, identity())));
        let rt = transpose(r);
        let should_be_identity = multiply_matrices(r, rt);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(should_be_identity[i][j], expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn transpose_of_identity_is_identity() {
        assert_eq!(transpose(identity()), identity());
    }
}
