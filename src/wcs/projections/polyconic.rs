//! Polyconic projection: PCO (§4.4, §4.6).
//!
//! The native spherical → intermediate world direction is the closed-form
//! American polyconic formula; the inverse solves the quadratic spec.md
//! gives directly for `y`, `x² - 2(y-θ)cotθ + (y-θ)² = 0`, by bisection on
//! `θ` for `x² + (y-θ)² = cot²θ`. At `θ=0` the projection degenerates to
//! the identity `x=φ, y=0` and is handled as a special case.

use super::{ProjectionKernel, PvParams};
use crate::error::WcsError;
use crate::wcs::solve::bisect;

/// The polyconic projection kernel. Stateless: PCO takes no `PV2_n` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolyconicProjection;

impl PolyconicProjection {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl ProjectionKernel for PolyconicProjection {
    fn project(&self, x_deg: f64, y_deg: f64) -> Result<(f64, f64), WcsError> {
        let x = x_deg.to_radians();
        let y = y_deg.to_radians();
        if x.abs() < 1e-12 {
            return Ok((0.0, y));
        }
        // Solve x² - 2(y-θ)cotθ + (y-θ)² = 0 for θ, bracketing away from the
        // θ=0 singularity in cotθ.
        let f = |theta: f64| -> f64 {
            if theta.abs() < 1e-9 {
                return x * x - y * y;
            }
            let cot = theta.cos() / theta.sin();
            x * x - 2.0 * (y - theta) * cot + (y - theta).powi(2)
        };
        let (lo, hi) = if y >= 0.0 {
            (1e-9, std::f64::consts::FRAC_PI_2 - 1e-9)
        } else {
            (-std::f64::consts::FRAC_PI_2 + 1e-9, -1e-9)
        };
        let theta = bisect(lo, hi, f)?;
        let tan_theta = theta.sin() / theta.cos();
        let e = (x * tan_theta).atan2(1.0 - (y - theta) * tan_theta);
        let phi = e / theta.sin();
        Ok((phi, theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64), WcsError> {
        if theta.abs() < 1e-12 {
            return Ok((phi.to_degrees(), 0.0));
        }
        let cot = theta.cos() / theta.sin();
        let e = phi * theta.sin();
        let x = cot * e.sin();
        let y = theta + cot * (1.0 - e.cos());
        Ok((x.to_degrees(), y.to_degrees()))
    }

    fn inside(&self, _lon_deg: f64, lat_deg: f64) -> bool {
        (-90.0..=90.0).contains(&lat_deg)
    }

    fn default_native_pose(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    fn code(&self) -> &'static str {
        "PCO"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn equator_is_identity() {
        let proj = PolyconicProjection::new();
        let (x, y) = proj.project_inverse(0.4, 0.0).unwrap();
        assert_abs_diff_eq!(x, 0.4_f64.to_degrees(), epsilon = 1e-9);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn roundtrip_northern() {
        let proj = PolyconicProjection::new();
        let (phi, theta) = (0.3, 0.5);
        let (x, y) = proj.project_inverse(phi, theta).unwrap();
        let (phi2, theta2) = proj.project(x, y).unwrap();
        assert_abs_diff_eq!(phi, phi2, epsilon = 1e-6);
        assert_abs_diff_eq!(theta, theta2, epsilon = 1e-6);
    }

    #[test]
    fn roundtrip_southern() {
        let proj = PolyconicProjection::new();
        let (phi, theta) = (-0.2, -0.4);
        let (x, y) = proj.project_inverse(phi, theta).unwrap();
        let (phi2, theta2) = proj.project(x, y).unwrap();
        assert_abs_diff_eq!(phi, phi2, epsilon = 1e-6);
        assert_abs_diff_eq!(theta, theta2, epsilon = 1e-6);
    }
}
