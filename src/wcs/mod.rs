//! Pixel↔sky WCS engine (§4.1–§4.4, §4.6): keyword ingest, the linear
//! (CRPIX/CD/CDELT) pixel transform, the projection kernel, and the
//! native↔celestial spherical rotation, composed into one [`Wcs`].

pub mod keywords;
pub mod linear;
pub mod projections;
pub mod rotation;
pub mod solve;

pub use keywords::{FitsKeywordSource, KeywordSource, WcsKeywords};
pub use linear::LinearTransform;
pub use projections::{Projection, ProjectionKernel, PvParams};

use crate::error::WcsError;
use crate::frames::{CoordinateReferenceFrame, Crs, SkyPosition};
use crate::log::{LogLevel, LogSink, NullLogSink};
use crate::time;
use rotation::CelestialPose;

const REQUIRED_KEYS: [&str; 9] = [
    "NAXIS", "NAXIS1", "NAXIS2", "CTYPE1", "CTYPE2", "CRPIX1", "CRPIX2", "CRVAL1", "CRVAL2",
];

/// A fully initialized World Coordinate System: the composition of the
/// linear pixel transform, a projection kernel, and native↔celestial
/// spherical rotation (§3's "Lifecycle": derived once, read-only after).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wcs {
    linear: LinearTransform,
    projection: Projection,
    pose: CelestialPose,
    crs: Crs,
    naxis: [u32; 2],
}

impl Wcs {
    /// Builds a [`Wcs`] from a keyword source (§4.1), discarding advisory
    /// messages. Use [`Wcs::init_logged`] to receive them.
    pub fn init(source: &dyn KeywordSource) -> Result<Self, WcsError> {
        Self::init_logged(source, &NullLogSink)
    }

    /// Builds a [`Wcs`] from a keyword source (§4.1), reporting advisory
    /// messages (e.g. an unrecognized `RADESYS`, or an FK5 equinox
    /// predating 1984.0) to `log`.
    pub fn init_logged(source: &dyn KeywordSource, log: &dyn LogSink) -> Result<Self, WcsError> {
        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|k| !source.has(k))
            .map(|k| k.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(WcsError::MissingKeywords { keys: missing });
        }
        if !has_linear_keys(source) {
            return Err(WcsError::MissingKeywords {
                keys: vec!["CD1_1/CD1_2/CD2_1/CD2_2 or PC1_1.. or CDELT1/CDELT2".to_string()],
            });
        }

        let ctype1 = source.get_string("CTYPE1").expect("validated above");
        let ctype2 = source.get_string("CTYPE2").expect("validated above");
        let (_axis1, code1) = parse_ctype(&ctype1)?;
        let (_axis2, code2) = parse_ctype(&ctype2)?;
        if code1 != code2 {
            return Err(WcsError::BadCtype {
                ctype1,
                ctype2,
                reason: "CTYPE1 and CTYPE2 must share the same projection code".to_string(),
            });
        }

        let equinox = resolve_equinox(source);
        let radesys = source.get_string("RADESYS");
        let frame = select_frame(radesys.as_deref(), equinox, log);
        let crs = Crs::Equatorial(frame);

        let linear = LinearTransform::from_keywords(source)?;

        let mut pv = PvParams::new();
        for key in source.iter_keys() {
            if let Some(n) = parse_pv_key(&key) {
                if let Some(v) = source.get_double(&key) {
                    pv.insert(n, v);
                }
            }
        }

        let crval1 = source.get_double("CRVAL1").expect("validated above");
        let crval2 = source.get_double("CRVAL2").expect("validated above");
        let delta_p = crval2.to_radians();
        let projection = Projection::from_code(&code1, &pv, delta_p)?;

        let (_phi0, theta0) = projection.default_native_pose();
        let phi_p = source
            .get_double("LONPOLE")
            .map(f64::to_radians)
            .unwrap_or_else(|| rotation::default_lonpole(theta0, delta_p));
        let pose = CelestialPose {
            alpha_p: crval1.to_radians(),
            delta_p,
            phi_p,
        };

        let naxis1 = source.get_int("NAXIS1").expect("validated above") as u32;
        let naxis2 = source.get_int("NAXIS2").expect("validated above") as u32;

        Ok(Self {
            linear,
            projection,
            pose,
            crs,
            naxis: [naxis1, naxis2],
        })
    }

    /// Converts a 1-based pixel coordinate `(i, j)` to a sky position (§4.2–§4.3).
    pub fn pixel_to_sky(&self, i: f64, j: f64) -> Result<SkyPosition, WcsError> {
        let (x, y) = self.linear.pixel_to_intermediate(i, j);
        let (phi, theta) = self.projection.project(x, y)?;
        let (alpha, delta) = rotation::native_to_celestial(phi, theta, self.pose);
        Ok(SkyPosition::new(alpha.to_degrees(), delta.to_degrees(), self.crs))
    }

    /// Converts a sky position to a 1-based pixel coordinate `(i, j)`, the
    /// inverse of [`Wcs::pixel_to_sky`].
    pub fn sky_to_pixel(&self, lon_deg: f64, lat_deg: f64) -> Result<(f64, f64), WcsError> {
        let (phi, theta) =
            rotation::celestial_to_native(lon_deg.to_radians(), lat_deg.to_radians(), self.pose);
        let (x, y) = self.projection.project_inverse(phi, theta)?;
        Ok(self.linear.intermediate_to_pixel(x, y))
    }

    /// The sky position of the image center `((NAXIS1+1)/2, (NAXIS2+1)/2)`.
    pub fn center(&self) -> Result<SkyPosition, WcsError> {
        let i = (self.naxis[0] as f64 + 1.0) / 2.0;
        let j = (self.naxis[1] as f64 + 1.0) / 2.0;
        self.pixel_to_sky(i, j)
    }

    /// Whether pixel `(i, j)` lies within the projection's domain of
    /// validity. `inside()` is defined over native `(φ,θ)`, so this computes
    /// the linear transform and projection steps directly rather than going
    /// through [`Wcs::pixel_to_sky`], which would hand it celestial `(α,δ)`.
    pub fn is_inside_projection(&self, i: f64, j: f64) -> Result<bool, WcsError> {
        let (x, y) = self.linear.pixel_to_intermediate(i, j);
        let (phi, theta) = self.projection.project(x, y)?;
        Ok(self.projection.inside(phi.to_degrees(), theta.to_degrees()))
    }

    /// The image dimensions, `(NAXIS1, NAXIS2)`.
    pub fn naxis(&self) -> (u32, u32) {
        (self.naxis[0], self.naxis[1])
    }

    /// The coordinate reference system sky positions produced by this WCS are expressed in.
    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// The projection kernel this WCS was built with.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }
}

fn has_linear_keys(source: &dyn KeywordSource) -> bool {
    let has_cd = ["CD1_1", "CD1_2", "CD2_1", "CD2_2"]
        .iter()
        .any(|k| source.has(k));
    let has_pc_or_cdelt = source.has("CDELT1") && source.has("CDELT2");
    has_cd || has_pc_or_cdelt
}

fn parse_ctype(ctype: &str) -> Result<(String, String), WcsError> {
    let trimmed = ctype.trim();
    if trimmed.len() < 4 {
        return Err(WcsError::BadCtype {
            ctype1: ctype.to_string(),
            ctype2: ctype.to_string(),
            reason: "CTYPE value is too short to contain a projection code".to_string(),
        });
    }
    let split_at = trimmed.len() - 3;
    let (axis_part, code) = trimmed.split_at(split_at);
    let axis = axis_part.trim_end_matches('-').to_string();
    Ok((axis, code.to_ascii_uppercase()))
}

fn parse_pv_key(key: &str) -> Option<u32> {
    key.strip_prefix("PV2_")?.parse().ok()
}

fn resolve_equinox(source: &dyn KeywordSource) -> Option<f64> {
    if let Some(e) = source.get_double("EQUINOX") {
        return Some(e);
    }
    if let Some(e) = source.get_double("EPOCH") {
        return Some(e);
    }
    if let Some(s) = source.get_string("DATE-OBS") {
        if let Ok(jd) = time::iso_to_jd(&s) {
            return Some(time::jd_to_epoch_julian(jd));
        }
        if let Ok(f) = s.parse::<f64>() {
            return Some(f);
        }
    }
    if let Some(mjd) = source.get_double("MJD-OBS") {
        return Some(time::jd_to_epoch_julian(time::mjd_to_jd(mjd)));
    }
    None
}

fn select_frame(
    radesys: Option<&str>,
    equinox: Option<f64>,
    log: &dyn LogSink,
) -> CoordinateReferenceFrame {
    match radesys.map(|s| s.to_ascii_uppercase()) {
        Some(s) if s == "FK4" => CoordinateReferenceFrame::Fk4 {
            equinox_b: equinox.unwrap_or(1950.0),
            epoch_obs_b: None,
        },
        Some(s) if s == "FK4-NO-E" || s == "FK4_NO_E" => CoordinateReferenceFrame::Fk4NoEterms {
            equinox_b: equinox.unwrap_or(1950.0),
            epoch_obs_b: None,
        },
        Some(s) if s == "FK5" => CoordinateReferenceFrame::Fk5 {
            equinox_j: equinox.unwrap_or(2000.0),
        },
        Some(s) if s == "ICRS" => CoordinateReferenceFrame::Icrs,
        Some(other) => {
            log.log(
                LogLevel::Warn,
                &format!("unrecognized RADESYS {other:?}; selecting frame from EQUINOX alone"),
            );
            default_frame_from_equinox(equinox)
        }
        None => default_frame_from_equinox(equinox),
    }
}

fn default_frame_from_equinox(equinox: Option<f64>) -> CoordinateReferenceFrame {
    match equinox {
        Some(e) if e < 1984.0 => CoordinateReferenceFrame::Fk4 {
            equinox_b: e,
            epoch_obs_b: None,
        },
        Some(e) => CoordinateReferenceFrame::Fk5 { equinox_j: e },
        None => CoordinateReferenceFrame::Icrs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample_keywords() -> WcsKeywords {
        let mut kw = WcsKeywords::new();
        kw.set_double("CRPIX1", 512.5);
        kw.set_double("CRPIX2", 512.5);
        kw.set_double("CRVAL1", 10.0);
        kw.set_double("CRVAL2", 41.0);
        kw.set_double("CDELT1", -0.01);
        kw.set_double("CDELT2", 0.01);
        kw.set_string("CTYPE1", "RA---TAN");
        kw.set_string("CTYPE2", "DEC--TAN");
        kw.set_int("NAXIS", 2);
        kw.set_int("NAXIS1", 1024);
        kw.set_int("NAXIS2", 1024);
        kw
    }

    #[test]
    fn init_reports_every_missing_key() {
        let kw = WcsKeywords::new();
        let err = Wcs::init(&kw).unwrap_err();
        match err {
            WcsError::MissingKeywords { keys } => {
                assert!(keys.contains(&"CTYPE1".to_string()));
                assert!(keys.contains(&"CRVAL1".to_string()));
            }
            other => panic!("expected MissingKeywords, got {other:?}"),
        }
    }

    #[test]
    fn center_is_crval_for_tan_at_naxis_plus_one_over_two() {
        let kw = sample_keywords();
        let wcs = Wcs::init(&kw).unwrap();
        let center = wcs.center().unwrap();
        assert_abs_diff_eq!(center.longitude_deg, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(center.latitude_deg, 41.0, epsilon = 1e-9);
    }

    #[test]
    fn pixel_sky_round_trip() {
        let kw = sample_keywords();
        let wcs = Wcs::init(&kw).unwrap();
        let (i, j) = (200.0, 300.0);
        let sky = wcs.pixel_to_sky(i, j).unwrap();
        let (i2, j2) = wcs.sky_to_pixel(sky.longitude_deg, sky.latitude_deg).unwrap();
        assert_abs_diff_eq!(i, i2, epsilon = 1e-5);
        assert_abs_diff_eq!(j, j2, epsilon = 1e-5);
    }

    #[test]
    fn mismatched_ctype_codes_are_rejected() {
        let mut kw = sample_keywords();
        kw.set_string("CTYPE2", "DEC--SIN");
        assert!(matches!(Wcs::init(&kw), Err(WcsError::BadCtype { .. })));
    }

    #[test]
    fn equinox_below_1984_selects_fk4() {
        let mut kw = sample_keywords();
        kw.set_double("EQUINOX", 1950.0);
        let wcs = Wcs::init(&kw).unwrap();
        assert!(matches!(
            wcs.crs(),
            Crs::Equatorial(CoordinateReferenceFrame::Fk4 { .. })
        ));
    }
}
