//! Pseudo-cylindrical projections: SFL, PAR, MOL, AIT, BON (§4.4, §4.6).

use super::{require_pv, ProjectionKernel, PvParams, RAD2DEG};
use crate::error::WcsError;
use crate::wcs::solve::{bisect, TOLERANCE};

#[derive(Debug, Clone, Copy, PartialEq)]
enum PseudoCylindricalKind {
    /// Sanson-Flamsteed.
    Sfl,
    /// Parabolic.
    Par,
    /// Mollweide.
    Mol,
    /// Hammer-Aitoff.
    Ait,
    /// Bonne, with reference parallel `θ1` (PV2_1, radians).
    Bon { theta1: f64 },
}

/// A pseudo-cylindrical projection kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PseudoCylindricalProjection {
    kind: PseudoCylindricalKind,
}

impl PseudoCylindricalProjection {
    pub(crate) fn new(code: &str, pv: &PvParams) -> Result<Self, WcsError> {
        let kind = match code {
            "SFL" => PseudoCylindricalKind::Sfl,
            "PAR" => PseudoCylindricalKind::Par,
            "MOL" => PseudoCylindricalKind::Mol,
            "AIT" => PseudoCylindricalKind::Ait,
            "BON" => PseudoCylindricalKind::Bon {
                theta1: require_pv(pv, 1, code)?.to_radians(),
            },
            other => {
                return Err(WcsError::BadCtype {
                    ctype1: other.to_string(),
                    ctype2: other.to_string(),
                    reason: "not a pseudo-cylindrical projection code".to_string(),
                })
            }
        };
        Ok(Self { kind })
    }
}

impl ProjectionKernel for PseudoCylindricalProjection {
    fn project(&self, x_deg: f64, y_deg: f64) -> Result<(f64, f64), WcsError> {
        match self.kind {
            PseudoCylindricalKind::Sfl => {
                let theta = y_deg.to_radians();
                let phi = x_deg.to_radians() / theta.cos().max(1e-12);
                Ok((phi, theta))
            }
            PseudoCylindricalKind::Par => {
                let y = y_deg / RAD2DEG;
                let arg = (y / 3.0).clamp(-1.0, 1.0);
                let theta = 3.0 * arg.asin();
                let denom = 2.0 * theta.cos() - 1.0;
                let phi = if denom.abs() < 1e-9 {
                    0.0
                } else {
                    x_deg.to_radians() / denom
                };
                Ok((phi, theta))
            }
            PseudoCylindricalKind::Mol => {
                let y = y_deg / (RAD2DEG * std::f64::consts::SQRT_2);
                let psi = y.clamp(-1.0, 1.0).asin();
                let theta = ((2.0 * psi + (2.0 * psi).sin()) / std::f64::consts::PI)
                    .clamp(-1.0, 1.0)
                    .asin();
                let denom = 2.0 * std::f64::consts::SQRT_2 * psi.cos();
                let phi = if denom.abs() < 1e-9 {
                    0.0
                } else {
                    std::f64::consts::PI * x_deg.to_radians() / denom
                };
                Ok((phi, theta))
            }
            PseudoCylindricalKind::Ait => {
                let x = x_deg / RAD2DEG;
                let y = y_deg / RAD2DEG;
                let z2 = 1.0 - (x / 4.0).powi(2) - (y / 2.0).powi(2);
                if z2 < 0.0 {
                    return Err(WcsError::PixelBeyondProjection {
                        reason: "AIT: point lies outside the projected ellipse".to_string(),
                    });
                }
                let z = z2.sqrt();
                let theta = (z * y).clamp(-1.0, 1.0).asin();
                let phi = 2.0 * (z * x / 2.0).atan2(2.0 * z2 - 1.0);
                Ok((phi, theta))
            }
            PseudoCylindricalKind::Bon { theta1 } => {
                if theta1.abs() < 1e-12 {
                    let theta = y_deg.to_radians();
                    let phi = x_deg.to_radians() / theta.cos().max(1e-12);
                    return Ok((phi, theta));
                }
                let x = x_deg / RAD2DEG;
                let y = y_deg / RAD2DEG;
                let cot1 = 1.0 / theta1.tan();
                let y_shift = cot1 - y;
                let rho = theta1.signum() * (x * x + y_shift * y_shift).sqrt();
                let theta = theta1 + cot1 - rho;
                let big_e = x.atan2(y_shift);
                let phi = if theta.cos().abs() < 1e-9 {
                    0.0
                } else {
                    big_e * rho / theta.cos()
                };
                Ok((phi, theta))
            }
        }
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64), WcsError> {
        match self.kind {
            PseudoCylindricalKind::Sfl => {
                let x = RAD2DEG * phi * theta.cos();
                let y = theta.to_degrees();
                Ok((x, y))
            }
            PseudoCylindricalKind::Par => {
                let x = RAD2DEG * phi * (2.0 * theta.cos() - 1.0);
                let y = RAD2DEG * 3.0 * (theta / 3.0).sin();
                Ok((x, y))
            }
            PseudoCylindricalKind::Mol => {
                // 2ψ + sin(2ψ) = π sinθ has no closed form; solved by bisection.
                let target = std::f64::consts::PI * theta.sin();
                let psi = bisect(-std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2, |p| {
                    2.0 * p + (2.0 * p).sin() - target
                })?;
                let x = RAD2DEG * (2.0 * std::f64::consts::SQRT_2 / std::f64::consts::PI)
                    * phi
                    * psi.cos();
                let y = RAD2DEG * std::f64::consts::SQRT_2 * psi.sin();
                Ok((x, y))
            }
            PseudoCylindricalKind::Ait => {
                let denom = (1.0 + theta.cos() * (phi / 2.0).cos()).sqrt();
                if denom.abs() < TOLERANCE {
                    return Err(WcsError::PixelBeyondProjection {
                        reason: "AIT: antipodal point has no finite projection".to_string(),
                    });
                }
                let x = RAD2DEG * 2.0 * std::f64::consts::SQRT_2 * theta.cos() * (phi / 2.0).sin()
                    / denom;
                let y = RAD2DEG * std::f64::consts::SQRT_2 * theta.sin() / denom;
                Ok((x, y))
            }
            PseudoCylindricalKind::Bon { theta1 } => {
                if theta1.abs() < 1e-12 {
                    // Sanson-Flamsteed is the θ1=0 limit of Bonne.
                    let x = RAD2DEG * phi * theta.cos();
                    let y = theta.to_degrees();
                    return Ok((x, y));
                }
                let cot1 = 1.0 / theta1.tan();
                let rho = cot1 + theta1 - theta;
                let e = phi * theta.cos() / rho;
                let x = RAD2DEG * rho * e.sin();
                let y = RAD2DEG * (cot1 - rho * e.cos());
                Ok((x, y))
            }
        }
    }

    fn inside(&self, _lon_deg: f64, lat_deg: f64) -> bool {
        (-90.0..=90.0).contains(&lat_deg)
    }

    fn default_native_pose(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    fn code(&self) -> &'static str {
        match self.kind {
            PseudoCylindricalKind::Sfl => "SFL",
            PseudoCylindricalKind::Par => "PAR",
            PseudoCylindricalKind::Mol => "MOL",
            PseudoCylindricalKind::Ait => "AIT",
            PseudoCylindricalKind::Bon { .. } => "BON",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn roundtrip(proj: &PseudoCylindricalProjection, phi: f64, theta: f64) {
        let (x, y) = proj.project_inverse(phi, theta).unwrap();
        let (phi2, theta2) = proj.project(x, y).unwrap();
        assert_abs_diff_eq!(phi, phi2, epsilon = 1e-5);
        assert_abs_diff_eq!(theta, theta2, epsilon = 1e-5);
    }

    #[test]
    fn sfl_roundtrip() {
        let proj = PseudoCylindricalProjection::new("SFL", &PvParams::new()).unwrap();
        roundtrip(&proj, 0.4, 0.3);
    }

    #[test]
    fn par_roundtrip() {
        let proj = PseudoCylindricalProjection::new("PAR", &PvParams::new()).unwrap();
        roundtrip(&proj, 0.4, 0.3);
    }

    #[test]
    fn mol_roundtrip() {
        let proj = PseudoCylindricalProjection::new("MOL", &PvParams::new()).unwrap();
        roundtrip(&proj, 0.4, 0.3);
    }

    #[test]
    fn ait_roundtrip() {
        let proj = PseudoCylindricalProjection::new("AIT", &PvParams::new()).unwrap();
        roundtrip(&proj, 0.4, 0.3);
    }

    #[test]
    fn bon_roundtrip_at_reference_parallel() {
        let mut pv = PvParams::new();
        pv.insert(1, 45.0);
        let proj = PseudoCylindricalProjection::new("BON", &pv).unwrap();
        roundtrip(&proj, 0.2, 45_f64.to_radians());
    }

    #[test]
    fn origin_maps_to_origin() {
        for (code, pv) in [
            ("SFL", PvParams::new()),
            ("PAR", PvParams::new()),
            ("MOL", PvParams::new()),
            ("AIT", PvParams::new()),
        ] {
            let proj = PseudoCylindricalProjection::new(code, &pv).unwrap();
            let (x, y) = proj.project_inverse(0.0, 0.0).unwrap();
            assert_abs_diff_eq!(x, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);
        }
    }
}
