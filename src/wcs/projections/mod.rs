//! The 25 map projection kernels (§4.4, §4.6) behind one shared trait.
//!
//! Projection polymorphism is a tagged variant dispatched through
//! [`ProjectionKernel`], not a class hierarchy (design note 9): each family
//! module owns its own per-code struct, and [`Projection`] simply wraps one
//! of the five family enums.

pub mod conic;
pub mod cylindrical;
pub mod polyconic;
pub mod pseudocylindrical;
pub mod zenithal;

use std::collections::BTreeMap;

use crate::error::WcsError;

/// `PV2_n` projection parameters, keyed by `n`. A `BTreeMap` rather than a
/// `Vec` because FITS headers may carry a sparse or out-of-order set of
/// `PV2_n` cards.
pub type PvParams = BTreeMap<u32, f64>;

/// Degrees per radian, used throughout the projection formulas wherever the
/// WCS papers express a native radius `R_θ` in degrees derived from an
/// angle in radians (e.g. `R_θ = RAD2DEG · cot θ` for TAN).
pub(crate) const RAD2DEG: f64 = 180.0 / std::f64::consts::PI;

pub(crate) fn require_pv(params: &PvParams, n: u32, code: &str) -> Result<f64, WcsError> {
    params
        .get(&n)
        .copied()
        .ok_or_else(|| WcsError::BadProjectionParameter {
            projection: code.to_string(),
            name: format!("PV2_{n}"),
            reason: "required parameter missing".to_string(),
        })
}

pub(crate) fn optional_pv(params: &PvParams, n: u32, default: f64) -> f64 {
    params.get(&n).copied().unwrap_or(default)
}

/// The shared behavior every projection kernel implements (design note 9).
///
/// `project`/`project_inverse` operate on intermediate world coordinates in
/// degrees and native spherical coordinates in radians, per §4.4.
pub trait ProjectionKernel {
    /// Intermediate world coordinates (degrees) → native spherical (radians).
    fn project(&self, x_deg: f64, y_deg: f64) -> Result<(f64, f64), WcsError>;
    /// Native spherical (radians) → intermediate world coordinates (degrees).
    fn project_inverse(&self, phi_rad: f64, theta_rad: f64) -> Result<(f64, f64), WcsError>;
    /// Whether `(lon, lat)` (degrees) lies within this projection's domain of validity.
    fn inside(&self, lon_deg: f64, lat_deg: f64) -> bool;
    /// Default fiducial native point `(φ0, θ0)`, in radians.
    fn default_native_pose(&self) -> (f64, f64);
    /// The three-letter FITS projection code (e.g. `"TAN"`).
    fn code(&self) -> &'static str;
}

/// A projection kernel, tagged by family per design note 9.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// AZP, SZP, TAN, STG, SIN, NCP, ARC, ZPN, ZEA, AIR.
    Zenithal(zenithal::ZenithalProjection),
    /// CYP, CEA, CAR, MER.
    Cylindrical(cylindrical::CylindricalProjection),
    /// COP, COE, COD, COO.
    Conic(conic::ConicProjection),
    /// SFL, PAR, MOL, AIT, BON.
    PseudoCylindrical(pseudocylindrical::PseudoCylindricalProjection),
    /// PCO.
    Polyconic(polyconic::PolyconicProjection),
}

impl Projection {
    /// Builds a [`Projection`] from a three-letter CTYPE projection code,
    /// its `PV2_n` parameters, and `delta_p` (CRVAL2, radians) needed by NCP
    /// to derive its fixed SIN slant parameters.
    pub fn from_code(code: &str, pv: &PvParams, delta_p: f64) -> Result<Self, WcsError> {
        let upper = code.to_ascii_uppercase();
        match upper.as_str() {
            "AZP" | "SZP" | "TAN" | "STG" | "SIN" | "NCP" | "ARC" | "ZPN" | "ZEA" | "AIR" => {
                Ok(Projection::Zenithal(zenithal::ZenithalProjection::new(
                    &upper, pv, delta_p,
                )?))
            }
            "CYP" | "CEA" | "CAR" | "MER" => Ok(Projection::Cylindrical(
                cylindrical::CylindricalProjection::new(&upper, pv)?,
            )),
            "COP" | "COE" | "COD" | "COO" => {
                Ok(Projection::Conic(conic::ConicProjection::new(&upper, pv)?))
            }
            "SFL" | "PAR" | "MOL" | "AIT" | "BON" => Ok(Projection::PseudoCylindrical(
                pseudocylindrical::PseudoCylindricalProjection::new(&upper, pv)?,
            )),
            "PCO" => Ok(Projection::Polyconic(polyconic::PolyconicProjection::new())),
            other => Err(WcsError::BadCtype {
                ctype1: other.to_string(),
                ctype2: other.to_string(),
                reason: format!("unrecognized projection code {other}"),
            }),
        }
    }
}

impl ProjectionKernel for Projection {
    fn project(&self, x_deg: f64, y_deg: f64) -> Result<(f64, f64), WcsError> {
        match self {
            Projection::Zenithal(p) => p.project(x_deg, y_deg),
            Projection::Cylindrical(p) => p.project(x_deg, y_deg),
            Projection::Conic(p) => p.project(x_deg, y_deg),
            Projection::PseudoCylindrical(p) => p.project(x_deg, y_deg),
            Projection::Polyconic(p) => p.project(x_deg, y_deg),
        }
    }

    fn project_inverse(&self, phi_rad: f64, theta_rad: f64) -> Result<(f64, f64), WcsError> {
        match self {
            Projection::Zenithal(p) => p.project_inverse(phi_rad, theta_rad),
            Projection::Cylindrical(p) => p.project_inverse(phi_rad, theta_rad),
            Projection::Conic(p) => p.project_inverse(phi_rad, theta_rad),
            Projection::PseudoCylindrical(p) => p.project_inverse(phi_rad, theta_rad),
            Projection::Polyconic(p) => p.project_inverse(phi_rad, theta_rad),
        }
    }

    fn inside(&self, lon_deg: f64, lat_deg: f64) -> bool {
        match self {
            Projection::Zenithal(p) => p.inside(lon_deg, lat_deg),
            Projection::Cylindrical(p) => p.inside(lon_deg, lat_deg),
            Projection::Conic(p) => p.inside(lon_deg, lat_deg),
            Projection::PseudoCylindrical(p) => p.inside(lon_deg, lat_deg),
            Projection::Polyconic(p) => p.inside(lon_deg, lat_deg),
        }
    }

    fn default_native_pose(&self) -> (f64, f64) {
        match self {
            Projection::Zenithal(p) => p.default_native_pose(),
            Projection::Cylindrical(p) => p.default_native_pose(),
            Projection::Conic(p) => p.default_native_pose(),
            Projection::PseudoCylindrical(p) => p.default_native_pose(),
            Projection::Polyconic(p) => p.default_native_pose(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Projection::Zenithal(p) => p.code(),
            Projection::Cylindrical(p) => p.code(),
            Projection::Conic(p) => p.code(),
            Projection::PseudoCylindrical(p) => p.code(),
            Projection::Polyconic(p) => p.code(),
        }
    }
}
