//! Cylindrical projections: CYP, CEA, CAR, MER (§4.4, §4.6).

use super::{optional_pv, require_pv, ProjectionKernel, PvParams, RAD2DEG};
use crate::error::WcsError;

/// The 4 cylindrical projection codes.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CylindricalKind {
    /// Cylindrical perspective: cylinder radius `λ`, viewpoint distance `μ`.
    Cyp { lambda: f64, mu: f64 },
    /// Cylindrical equal area: `λ`.
    Cea { lambda: f64 },
    /// Plate carrée.
    Car,
    /// Mercator.
    Mer,
}

/// A cylindrical projection kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylindricalProjection {
    kind: CylindricalKind,
}

impl CylindricalProjection {
    pub(crate) fn new(code: &str, pv: &PvParams) -> Result<Self, WcsError> {
        let kind = match code {
            "CYP" => CylindricalKind::Cyp {
                lambda: require_pv(pv, 1, code)?,
                mu: require_pv(pv, 2, code)?,
            },
            "CEA" => CylindricalKind::Cea {
                lambda: optional_pv(pv, 1, 1.0),
            },
            "CAR" => CylindricalKind::Car,
            "MER" => CylindricalKind::Mer,
            other => {
                return Err(WcsError::BadCtype {
                    ctype1: other.to_string(),
                    ctype2: other.to_string(),
                    reason: "not a cylindrical projection code".to_string(),
                })
            }
        };
        Ok(Self { kind })
    }
}

impl ProjectionKernel for CylindricalProjection {
    fn project(&self, x_deg: f64, y_deg: f64) -> Result<(f64, f64), WcsError> {
        match self.kind {
            CylindricalKind::Cyp { lambda, mu } => {
                let phi = x_deg.to_radians() / lambda;
                let eta = y_deg / RAD2DEG;
                // (μ+λ) sinθ - η cosθ = ημ  ⇒  R sin(θ-δ) = ημ.
                let r = ((mu + lambda).powi(2) + eta * eta).sqrt();
                let delta = eta.atan2(mu + lambda);
                let arg = (eta * mu / r).clamp(-1.0, 1.0);
                let theta = delta + arg.asin();
                Ok((phi, theta))
            }
            CylindricalKind::Cea { lambda } => {
                let phi = x_deg.to_radians();
                let s = (y_deg * lambda / RAD2DEG).clamp(-1.0, 1.0);
                Ok((phi, s.asin()))
            }
            CylindricalKind::Car => Ok((x_deg.to_radians(), y_deg.to_radians())),
            CylindricalKind::Mer => {
                let phi = x_deg.to_radians();
                let theta = 2.0 * (y_deg / RAD2DEG).exp().atan() - std::f64::consts::FRAC_PI_2;
                Ok((phi, theta))
            }
        }
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64), WcsError> {
        match self.kind {
            CylindricalKind::Cyp { lambda, mu } => {
                let x = lambda * phi.to_degrees();
                let y = RAD2DEG * (mu + lambda) * theta.sin() / (mu + theta.cos());
                Ok((x, y))
            }
            CylindricalKind::Cea { lambda } => {
                let x = phi.to_degrees();
                let y = RAD2DEG * theta.sin() / lambda;
                Ok((x, y))
            }
            CylindricalKind::Car => Ok((phi.to_degrees(), theta.to_degrees())),
            CylindricalKind::Mer => {
                let x = phi.to_degrees();
                let y = RAD2DEG * (std::f64::consts::FRAC_PI_4 + theta / 2.0).tan().ln();
                Ok((x, y))
            }
        }
    }

    fn inside(&self, _lon_deg: f64, lat_deg: f64) -> bool {
        match self.kind {
            CylindricalKind::Mer => lat_deg.abs() < 89.99,
            _ => (-90.0..=90.0).contains(&lat_deg),
        }
    }

    fn default_native_pose(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    fn code(&self) -> &'static str {
        match self.kind {
            CylindricalKind::Cyp { .. } => "CYP",
            CylindricalKind::Cea { .. } => "CEA",
            CylindricalKind::Car => "CAR",
            CylindricalKind::Mer => "MER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn roundtrip(proj: &CylindricalProjection, phi: f64, theta: f64) {
        let (x, y) = proj.project_inverse(phi, theta).unwrap();
        let (phi2, theta2) = proj.project(x, y).unwrap();
        assert_abs_diff_eq!(phi, phi2, epsilon = 1e-6);
        assert_abs_diff_eq!(theta, theta2, epsilon = 1e-6);
    }

    #[test]
    fn car_roundtrip() {
        let proj = CylindricalProjection::new("CAR", &PvParams::new()).unwrap();
        roundtrip(&proj, 0.5, 0.3);
    }

    #[test]
    fn mer_roundtrip() {
        let proj = CylindricalProjection::new("MER", &PvParams::new()).unwrap();
        roundtrip(&proj, 0.5, 0.3);
    }

    #[test]
    fn cea_roundtrip() {
        let mut pv = PvParams::new();
        pv.insert(1, 1.0);
        let proj = CylindricalProjection::new("CEA", &pv).unwrap();
        roundtrip(&proj, 0.5, 0.3);
    }

    #[test]
    fn cyp_roundtrip() {
        let mut pv = PvParams::new();
        pv.insert(1, 1.0);
        pv.insert(2, 2.0);
        let proj = CylindricalProjection::new("CYP", &pv).unwrap();
        roundtrip(&proj, 0.3, 0.2);
    }

    #[test]
    fn car_is_identity_in_degrees() {
        let proj = CylindricalProjection::new("CAR", &PvParams::new()).unwrap();
        let (x, y) = proj.project_inverse(0.5, 0.3).unwrap();
        assert_abs_diff_eq!(x, 0.5_f64.to_degrees(), epsilon = 1e-9);
        assert_abs_diff_eq!(y, 0.3_f64.to_degrees(), epsilon = 1e-9);
    }
}
