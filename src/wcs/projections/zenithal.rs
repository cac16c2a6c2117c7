//! Zenithal (azimuthal) projections: AZP, SZP, TAN, STG, SIN, NCP, ARC,
//! ZPN, ZEA, AIR (§4.4, §4.6).

use std::f64::consts::FRAC_PI_2;

use super::{optional_pv, require_pv, ProjectionKernel, PvParams, RAD2DEG};
use crate::error::WcsError;
use crate::wcs::solve::bisect;

/// A point in space used as the center of projection for AZP/SZP, expressed
/// in sphere-radii units along the unit-sphere axes (native frame).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Viewpoint {
    x: f64,
    y: f64,
    z: f64,
}

impl Viewpoint {
    fn from_native(mu: f64, phi_c: f64, theta_c: f64) -> Self {
        let (sin_tc, cos_tc) = theta_c.sin_cos();
        let (sin_pc, cos_pc) = phi_c.sin_cos();
        Viewpoint {
            x: mu * cos_tc * cos_pc,
            y: mu * cos_tc * sin_pc,
            z: mu * sin_tc,
        }
    }
}

/// Projects `(φ, θ)` through `p` onto the plane tangent at the native pole
/// (`z = 1`), the shared geometry behind AZP and SZP.
fn perspective_project(phi: f64, theta: f64, p: Viewpoint) -> Result<(f64, f64), WcsError> {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let sx = cos_theta * cos_phi;
    let sy = cos_theta * sin_phi;
    let sz = sin_theta;

    let denom = sz - p.z;
    if denom.abs() < 1e-12 {
        return Err(WcsError::PixelBeyondProjection {
            reason: "perspective projection point is coplanar with the tangent plane".to_string(),
        });
    }
    let t = (1.0 - p.z) / denom;
    let xp = p.x + t * (sx - p.x);
    let yp = p.y + t * (sy - p.y);

    Ok((RAD2DEG * yp, -RAD2DEG * xp))
}

/// Inverts [`perspective_project`] by intersecting the ray from `p` through
/// the tangent-plane point with the unit sphere; a quadratic with (generally)
/// two roots, of which the root closer to the native pole (larger `z`) is
/// taken, per the bracket-selection convention documented in `DESIGN.md`.
fn perspective_inverse(x_deg: f64, y_deg: f64, p: Viewpoint) -> Result<(f64, f64), WcsError> {
    let xp = -y_deg / RAD2DEG;
    let yp = x_deg / RAD2DEG;
    let d = [xp - p.x, yp - p.y, 1.0 - p.z];
    let d2 = d[0] * d[0] + d[1] * d[1] + d[2] * d[2];
    let p_dot_d = p.x * d[0] + p.y * d[1] + p.z * d[2];
    let p2 = p.x * p.x + p.y * p.y + p.z * p.z;

    let a = d2;
    let b = 2.0 * p_dot_d;
    let c = p2 - 1.0;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Err(WcsError::PixelBeyondProjection {
            reason: "pixel lies outside the perspective projection's domain".to_string(),
        });
    }
    let sqrt_disc = disc.sqrt();
    let s1 = (-b + sqrt_disc) / (2.0 * a);
    let s2 = (-b - sqrt_disc) / (2.0 * a);

    let s_to_point = |s: f64| {
        let z = p.z + s * d[2];
        (p.x + s * d[0], p.y + s * d[1], z)
    };
    let (x1, y1, z1) = s_to_point(s1);
    let (x2, y2, z2) = s_to_point(s2);

    let (sx, sy, sz) = if z1 >= z2 { (x1, y1, z1) } else { (x2, y2, z2) };

    let theta = sz.clamp(-1.0, 1.0).asin();
    let phi = sy.atan2(sx);
    Ok((phi, theta))
}

/// The 10 zenithal projection codes, tagged with their (possibly derived)
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZenithalKind {
    /// Zenithal perspective: viewpoint tilted by `γ` from the polar axis.
    Azp { mu: f64, gamma: f64 },
    /// Slant zenithal perspective: viewpoint at native `(φc, θc)`.
    Szp { mu: f64, phi_c: f64, theta_c: f64 },
    /// Gnomonic.
    Tan,
    /// Stereographic.
    Stg,
    /// Orthographic/synthesis, with optional slant `(ξ, η)`.
    Sin { xi: f64, eta: f64 },
    /// North celestial pole special case of SIN (`ξ=0`, `η=cot δp`).
    Ncp { eta: f64 },
    /// Zenithal equidistant.
    Arc,
    /// Zenithal polynomial, coefficients `PV2_0..PV2_N`.
    Zpn { coeffs: Vec<f64> },
    /// Zenithal equal area.
    Zea,
    /// Airy.
    Air { theta_b: f64 },
}

/// A zenithal projection kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct ZenithalProjection {
    kind: ZenithalKindStorage,
}

// ZPN's coefficient vector makes `ZenithalKind` non-`Copy`; store it boxed
// alongside the `Copy` variants so `ZenithalProjection` stays cheap to pass
// around in the common case.
#[derive(Debug, Clone, PartialEq)]
enum ZenithalKindStorage {
    Simple(SimpleZenithalKind),
    Zpn(Vec<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SimpleZenithalKind {
    Azp { mu: f64, gamma: f64 },
    Szp { mu: f64, phi_c: f64, theta_c: f64 },
    Tan,
    Stg,
    Sin { xi: f64, eta: f64 },
    Ncp { eta: f64 },
    Arc,
    Zea,
    Air { theta_b: f64 },
}

impl ZenithalProjection {
    pub(crate) fn new(code: &str, pv: &PvParams, delta_p: f64) -> Result<Self, WcsError> {
        let kind = match code {
            "AZP" => ZenithalKindStorage::Simple(SimpleZenithalKind::Azp {
                mu: require_pv(pv, 1, code)?,
                gamma: optional_pv(pv, 2, 0.0).to_radians(),
            }),
            "SZP" => ZenithalKindStorage::Simple(SimpleZenithalKind::Szp {
                mu: require_pv(pv, 1, code)?,
                phi_c: optional_pv(pv, 2, 0.0).to_radians(),
                theta_c: optional_pv(pv, 3, 90.0).to_radians(),
            }),
            "TAN" => ZenithalKindStorage::Simple(SimpleZenithalKind::Tan),
            "STG" => ZenithalKindStorage::Simple(SimpleZenithalKind::Stg),
            "SIN" => ZenithalKindStorage::Simple(SimpleZenithalKind::Sin {
                xi: optional_pv(pv, 1, 0.0),
                eta: optional_pv(pv, 2, 0.0),
            }),
            "NCP" => ZenithalKindStorage::Simple(SimpleZenithalKind::Ncp {
                eta: 1.0 / delta_p.tan(),
            }),
            "ARC" => ZenithalKindStorage::Simple(SimpleZenithalKind::Arc),
            "ZPN" => {
                let mut coeffs = Vec::new();
                for n in 0.. {
                    match pv.get(&n) {
                        Some(&c) => coeffs.push(c),
                        None => break,
                    }
                }
                if coeffs.is_empty() {
                    return Err(WcsError::BadProjectionParameter {
                        projection: code.to_string(),
                        name: "PV2_0".to_string(),
                        reason: "ZPN requires at least one polynomial coefficient".to_string(),
                    });
                }
                ZenithalKindStorage::Zpn(coeffs)
            }
            "ZEA" => ZenithalKindStorage::Simple(SimpleZenithalKind::Zea),
            "AIR" => ZenithalKindStorage::Simple(SimpleZenithalKind::Air {
                theta_b: require_pv(pv, 1, code)?.to_radians(),
            }),
            other => {
                return Err(WcsError::BadCtype {
                    ctype1: other.to_string(),
                    ctype2: other.to_string(),
                    reason: "not a zenithal projection code".to_string(),
                })
            }
        };
        Ok(Self { kind })
    }

    /// Polar decomposition shared by every zenithal code: native longitude
    /// `φ = atan2(x, -y)` and radius `R = √(x²+y²)`.
    fn polar(x_deg: f64, y_deg: f64) -> (f64, f64) {
        let phi = x_deg.atan2(-y_deg);
        let r = (x_deg * x_deg + y_deg * y_deg).sqrt();
        (phi, r)
    }
}

impl ProjectionKernel for ZenithalProjection {
    fn project(&self, x_deg: f64, y_deg: f64) -> Result<(f64, f64), WcsError> {
        match &self.kind {
            ZenithalKindStorage::Zpn(coeffs) => {
                let (phi, r) = Self::polar(x_deg, y_deg);
                let zeta = bisect(0.0, std::f64::consts::PI, |z| {
                    coeffs
                        .iter()
                        .enumerate()
                        .map(|(n, c)| c * z.powi(n as i32))
                        .sum::<f64>()
                        - r
                })?;
                Ok((phi, FRAC_PI_2 - zeta))
            }
            ZenithalKindStorage::Simple(kind) => match *kind {
                SimpleZenithalKind::Azp { mu, gamma } => {
                    let p = Viewpoint::from_native(mu, 0.0, gamma - FRAC_PI_2);
                    perspective_inverse(x_deg, y_deg, p)
                }
                SimpleZenithalKind::Szp { mu, phi_c, theta_c } => {
                    let p = Viewpoint::from_native(mu, phi_c, theta_c);
                    perspective_inverse(x_deg, y_deg, p)
                }
                SimpleZenithalKind::Tan => {
                    let (phi, r) = Self::polar(x_deg, y_deg);
                    let theta = (RAD2DEG / r).atan();
                    Ok((phi, theta))
                }
                SimpleZenithalKind::Stg => {
                    let (phi, r) = Self::polar(x_deg, y_deg);
                    let theta = FRAC_PI_2 - 2.0 * (r / (2.0 * RAD2DEG)).atan();
                    Ok((phi, theta))
                }
                SimpleZenithalKind::Sin { xi, eta } if xi == 0.0 && eta == 0.0 => {
                    let (phi, r) = Self::polar(x_deg, y_deg);
                    let cos_theta = crate::wcs::solve::clamp_unit(r / RAD2DEG, 1e-9)?;
                    Ok((phi, cos_theta.acos()))
                }
                SimpleZenithalKind::Sin { xi, eta } => sin_inverse(x_deg, y_deg, xi, eta),
                SimpleZenithalKind::Ncp { eta } => sin_inverse(x_deg, y_deg, 0.0, eta),
                SimpleZenithalKind::Arc => {
                    let (phi, r) = Self::polar(x_deg, y_deg);
                    Ok((phi, FRAC_PI_2 - r / RAD2DEG))
                }
                SimpleZenithalKind::Zea => {
                    let (phi, r) = Self::polar(x_deg, y_deg);
                    let half = (r / (2.0 * RAD2DEG)).clamp(-1.0, 1.0).asin();
                    Ok((phi, FRAC_PI_2 - 2.0 * half))
                }
                SimpleZenithalKind::Air { theta_b } => {
                    let (phi, r) = Self::polar(x_deg, y_deg);
                    let theta = air_inverse(r, theta_b)?;
                    Ok((phi, theta))
                }
            },
        }
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64), WcsError> {
        match &self.kind {
            ZenithalKindStorage::Zpn(coeffs) => {
                let zeta = FRAC_PI_2 - theta;
                let r: f64 = coeffs
                    .iter()
                    .enumerate()
                    .map(|(n, c)| c * zeta.powi(n as i32))
                    .sum();
                Ok((r * phi.sin(), -r * phi.cos()))
            }
            ZenithalKindStorage::Simple(kind) => match *kind {
                SimpleZenithalKind::Azp { mu, gamma } => {
                    let p = Viewpoint::from_native(mu, 0.0, gamma - FRAC_PI_2);
                    perspective_project(phi, theta, p)
                }
                SimpleZenithalKind::Szp { mu, phi_c, theta_c } => {
                    let p = Viewpoint::from_native(mu, phi_c, theta_c);
                    perspective_project(phi, theta, p)
                }
                SimpleZenithalKind::Tan => {
                    let r = RAD2DEG / theta.tan();
                    Ok((r * phi.sin(), -r * phi.cos()))
                }
                SimpleZenithalKind::Stg => {
                    let r = 2.0 * RAD2DEG * ((FRAC_PI_2 - theta) / 2.0).tan();
                    Ok((r * phi.sin(), -r * phi.cos()))
                }
                SimpleZenithalKind::Sin { xi, eta } => {
                    let x = RAD2DEG * (theta.cos() * phi.sin() + xi * (1.0 - theta.sin()));
                    let y = -RAD2DEG * (theta.cos() * phi.cos() - eta * (1.0 - theta.sin()));
                    Ok((x, y))
                }
                SimpleZenithalKind::Ncp { eta } => {
                    let x = RAD2DEG * theta.cos() * phi.sin();
                    let y = -RAD2DEG * (theta.cos() * phi.cos() - eta * (1.0 - theta.sin()));
                    Ok((x, y))
                }
                SimpleZenithalKind::Arc => {
                    let r = RAD2DEG * (FRAC_PI_2 - theta);
                    Ok((r * phi.sin(), -r * phi.cos()))
                }
                SimpleZenithalKind::Zea => {
                    let r = 2.0 * RAD2DEG * ((FRAC_PI_2 - theta) / 2.0).sin();
                    Ok((r * phi.sin(), -r * phi.cos()))
                }
                SimpleZenithalKind::Air { theta_b } => {
                    let r = air_radius(theta, theta_b);
                    Ok((r * phi.sin(), -r * phi.cos()))
                }
            },
        }
    }

    fn inside(&self, _lon_deg: f64, lat_deg: f64) -> bool {
        match &self.kind {
            ZenithalKindStorage::Simple(SimpleZenithalKind::Stg) => lat_deg > -89.999,
            ZenithalKindStorage::Simple(SimpleZenithalKind::Tan) => lat_deg > 0.0,
            _ => (-90.0..=90.0).contains(&lat_deg),
        }
    }

    fn default_native_pose(&self) -> (f64, f64) {
        (0.0, FRAC_PI_2)
    }

    fn code(&self) -> &'static str {
        match &self.kind {
            ZenithalKindStorage::Zpn(_) => "ZPN",
            ZenithalKindStorage::Simple(kind) => match kind {
                SimpleZenithalKind::Azp { .. } => "AZP",
                SimpleZenithalKind::Szp { .. } => "SZP",
                SimpleZenithalKind::Tan => "TAN",
                SimpleZenithalKind::Stg => "STG",
                SimpleZenithalKind::Sin { .. } => "SIN",
                SimpleZenithalKind::Ncp { .. } => "NCP",
                SimpleZenithalKind::Arc => "ARC",
                SimpleZenithalKind::Zea => "ZEA",
                SimpleZenithalKind::Air { .. } => "AIR",
            },
        }
    }
}

/// Closed-form inverse of the slant SIN projection. With `ξ,η` both zero
/// this degenerates to orthographic, handled separately by the caller for
/// speed; this path covers the general (including NCP) slant case.
fn sin_inverse(x_deg: f64, y_deg: f64, xi: f64, eta: f64) -> Result<(f64, f64), WcsError> {
    let x = x_deg / RAD2DEG;
    let y = y_deg / RAD2DEG;
    // cosθ sinφ + ξ(1-sinθ) = x ;  -(cosθ cosφ - η(1-sinθ)) = y
    // Eliminate φ via (x-ξu)² + (y+ηu)² = 1-s², u = 1-s, s = sinθ:
    //   u²(ξ²+η²+1) + u(2ηy - 2ξx - 2) + (x²+y²) = 0
    let a = xi * xi + eta * eta + 1.0;
    let b = 2.0 * eta * y - 2.0 * xi * x - 2.0;
    let c = x * x + y * y;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Err(WcsError::PixelBeyondProjection {
            reason: "pixel lies outside the slant SIN projection's domain".to_string(),
        });
    }
    let sqrt_disc = disc.sqrt();
    let u1 = (-b + sqrt_disc) / (2.0 * a);
    let u2 = (-b - sqrt_disc) / (2.0 * a);
    let s1 = 1.0 - u1;
    let s2 = 1.0 - u2;
    // Prefer the root nearer the native pole (larger sinθ).
    let s = if s1.abs() <= 1.0 && (s2.abs() > 1.0 || s1 > s2) {
        s1
    } else {
        s2
    };
    let s = crate::wcs::solve::clamp_unit(s, 1e-9)?;
    let theta = s.asin();
    // cosθ sinφ = x - ξ(1-s), cosθ cosφ = -(y + η(1-s)); atan2 cancels cosθ.
    let sin_phi_cos_theta = x - xi * (1.0 - s);
    let cos_phi_cos_theta = -(y + eta * (1.0 - s));
    let phi = sin_phi_cos_theta.atan2(cos_phi_cos_theta);
    Ok((phi, theta))
}

/// Evaluates the Airy radial function `R(θ)` for a given half-angle
/// parameter `θ_b` (PV2_1), the forward direction of the Airy projection.
fn air_radius(theta: f64, theta_b: f64) -> f64 {
    let zeta = FRAC_PI_2 - theta;
    let zeta_b = FRAC_PI_2 - theta_b;
    let cos_zeta_b = zeta_b.cos();
    let c = if cos_zeta_b <= 1e-12 {
        0.0
    } else {
        -1.0 / (cos_zeta_b.ln() + (1.0 - cos_zeta_b) / cos_zeta_b.max(1e-12))
    };
    if zeta.abs() < 1e-12 {
        return 0.0;
    }
    let cos_zeta = zeta.cos();
    -RAD2DEG * (2.0 * cos_zeta.ln() / zeta.tan() + 2.0 * c * zeta.tan())
}

/// Solves the Airy equation `R + 2(ln cos ζ)/tan ζ + 2C tan ζ = 0` for `ζ`,
/// per §4.4, using bisection over `ζ ∈ [1e-10, π/2 − 1e-10]` and returning
/// the first sign-changing bracket found, per the §9 open-question decision
/// recorded in `SPEC_FULL.md`.
fn air_inverse(r: f64, theta_b: f64) -> Result<f64, WcsError> {
    if r.abs() < 1e-12 {
        return Ok(FRAC_PI_2);
    }
    let zeta_b = FRAC_PI_2 - theta_b;
    let cos_zeta_b = zeta_b.cos();
    let c = if cos_zeta_b <= 1e-12 {
        0.0
    } else {
        -1.0 / (cos_zeta_b.ln() + (1.0 - cos_zeta_b) / cos_zeta_b.max(1e-12))
    };

    let f = |zeta: f64| -RAD2DEG * (2.0 * zeta.cos().ln() / zeta.tan() + 2.0 * c * zeta.tan()) - r;
    let zeta = bisect(1e-10, FRAC_PI_2 - 1e-10, f)?;
    Ok(FRAC_PI_2 - zeta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::collections::BTreeMap;

    fn roundtrip(kind: &str, pv: PvParams, delta_p: f64, phi: f64, theta: f64) {
        let proj = ZenithalProjection::new(kind, &pv, delta_p).unwrap();
        let (x, y) = proj.project_inverse(phi, theta).unwrap();
        let (phi2, theta2) = proj.project(x, y).unwrap();
        assert_abs_diff_eq!(phi, phi2, epsilon = 1e-6);
        assert_abs_diff_eq!(theta, theta2, epsilon = 1e-6);
    }

    #[test]
    fn tan_roundtrip() {
        roundtrip("TAN", PvParams::new(), 0.0, 0.2, 1.3);
    }

    #[test]
    fn stg_roundtrip() {
        roundtrip("STG", PvParams::new(), 0.0, 0.4, 1.0);
    }

    #[test]
    fn arc_roundtrip() {
        roundtrip("ARC", PvParams::new(), 0.0, -0.7, 0.9);
    }

    #[test]
    fn zea_roundtrip() {
        roundtrip("ZEA", PvParams::new(), 0.0, 1.1, 0.5);
    }

    #[test]
    fn sin_orthographic_roundtrip() {
        roundtrip("SIN", PvParams::new(), 0.0, 0.1, 1.4);
    }

    #[test]
    fn azp_roundtrip() {
        let mut pv = PvParams::new();
        pv.insert(1, 2.0);
        roundtrip("AZP", pv, 0.0, 0.3, 1.2);
    }

    #[test]
    fn zpn_roundtrip() {
        let mut pv = PvParams::new();
        pv.insert(0, 0.0);
        pv.insert(1, RAD2DEG);
        roundtrip("ZPN", pv, 0.0, 0.2, 1.0);
    }

    #[test]
    fn air_roundtrip() {
        let mut pv = PvParams::new();
        pv.insert(1, 45.0);
        roundtrip("AIR", pv, 0.0, 0.1, 1.0);
    }

    #[test]
    fn tan_fiducial_point_is_native_pole() {
        let proj = ZenithalProjection::new("TAN", &BTreeMap::new(), 0.0).unwrap();
        let (phi0, theta0) = proj.default_native_pose();
        assert_eq!((phi0, theta0), (0.0, FRAC_PI_2));
    }
}
