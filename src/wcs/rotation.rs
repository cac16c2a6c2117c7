//! Spherical rotation between the native and celestial spheres (§4.3).

/// Celestial pose of the projection's fiducial point: the pole position
/// `(α_p, δ_p)` and the native longitude of the celestial pole `φ_p`.
/// All fields and all arguments/returns below are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialPose {
    /// Celestial longitude of the reference point (CRVAL1), radians.
    pub alpha_p: f64,
    /// Celestial latitude of the reference point (CRVAL2), radians.
    pub delta_p: f64,
    /// Native longitude of the celestial pole (LONPOLE), radians.
    pub phi_p: f64,
}

/// Converts native spherical coordinates `(φ, θ)` to celestial `(α, δ)`.
/// `α` is normalized to `[0, 2π)`.
pub fn native_to_celestial(phi: f64, theta: f64, pose: CelestialPose) -> (f64, f64) {
    let dphi = phi - pose.phi_p;
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_delta_p, cos_delta_p) = pose.delta_p.sin_cos();
    let (sin_dphi, cos_dphi) = dphi.sin_cos();

    let y = sin_theta * cos_delta_p - cos_theta * sin_delta_p * cos_dphi;
    let x = -cos_theta * sin_dphi;
    let mut alpha = pose.alpha_p + x.atan2(y);
    alpha = alpha.rem_euclid(std::f64::consts::TAU);

    let sin_delta = (sin_theta * sin_delta_p + cos_theta * cos_delta_p * cos_dphi).clamp(-1.0, 1.0);
    let delta = sin_delta.asin();

    (alpha, delta)
}

/// Converts celestial `(α, δ)` back to native spherical `(φ, θ)`. Exact
/// inverse of [`native_to_celestial`], using the symmetry of the formula
/// under swapping the roles of the native and celestial poles.
pub fn celestial_to_native(alpha: f64, delta: f64, pose: CelestialPose) -> (f64, f64) {
    let dalpha = alpha - pose.alpha_p;
    let (sin_delta, cos_delta) = delta.sin_cos();
    let (sin_delta_p, cos_delta_p) = pose.delta_p.sin_cos();
    let (sin_dalpha, cos_dalpha) = dalpha.sin_cos();

    let y = sin_delta * cos_delta_p - cos_delta * sin_delta_p * cos_dalpha;
    let x = -cos_delta * sin_dalpha;
    let mut phi = pose.phi_p + x.atan2(y);
    phi = phi.rem_euclid(std::f64::consts::TAU);

    let sin_theta = (sin_delta * sin_delta_p + cos_delta * cos_delta_p * cos_dalpha).clamp(-1.0, 1.0);
    let theta = sin_theta.asin();

    (phi, theta)
}

/// Computes the default `LONPOLE` (`φ_p`), in radians, from the fiducial
/// native latitude `θ0` and the celestial latitude of the reference point
/// `δ_p`, per §3: `0` when `θ0 ≥ δ_p`, else `π`.
pub fn default_lonpole(theta0: f64, delta_p: f64) -> f64 {
    if theta0 >= delta_p {
        0.0
    } else {
        std::f64::consts::PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn roundtrip_generic_pose() {
        let pose = CelestialPose {
            alpha_p: 10_f64.to_radians(),
            delta_p: 41_f64.to_radians(),
            phi_p: default_lonpole(FRAC_PI_2, 41_f64.to_radians()),
        };
        let (phi, theta) = (0.3_f64, 1.2_f64);
        let (alpha, delta) = native_to_celestial(phi, theta, pose);
        let (phi2, theta2) = celestial_to_native(alpha, delta, pose);
        assert_abs_diff_eq!(phi, phi2, epsilon = 1e-9);
        assert_abs_diff_eq!(theta, theta2, epsilon = 1e-9);
    }

    #[test]
    fn fiducial_point_maps_to_reference_point() {
        let pose = CelestialPose {
            alpha_p: 182.63442_f64.to_radians(),
            delta_p: 39.404782_f64.to_radians(),
            phi_p: 0.0,
        };
        let (alpha, delta) = native_to_celestial(0.0, FRAC_PI_2, pose);
        assert_abs_diff_eq!(alpha.to_degrees(), 182.63442, epsilon = 1e-9);
        assert_abs_diff_eq!(delta.to_degrees(), 39.404782, epsilon = 1e-9);
    }
}
