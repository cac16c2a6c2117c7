//! Celestial frame conversion engine (§4.5): FK4, FK4-no-E-terms, FK5,
//! ICRS, J2000, ecliptic, galactic and supergalactic, with precession,
//! epoch transport and E-terms correction, all as products of 3x3 rotation
//! matrices over unit vectors (design note 9: a sum type, not an
//! inheritance hierarchy).

pub mod bridge;
pub mod ecliptic;
pub mod eterms;
pub mod galactic;
pub mod precession;
pub mod vector;

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::log::{LogLevel, LogSink};
use crate::time::{besselian_to_julian, julian_to_besselian};
use vector::{cartesian_to_spherical, spherical_to_cartesian, PVector};

/// A reference frame for an equatorial or ecliptic coordinate system (§3).
///
/// Each variant carries exactly the state it needs; `hasEquinox`/`hasEpoch`
/// become type-level facts rather than runtime flags (design note 9).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateReferenceFrame {
    /// International Celestial Reference System: no equinox, no epoch.
    Icrs,
    /// Mean equator and equinox of J2000.0, fixed.
    J2000,
    /// FK5 at Julian equinox `equinox_j`.
    Fk5 {
        /// Julian-year equinox (e.g. `2000.0`).
        equinox_j: f64,
    },
    /// FK4 (with E-terms) at Besselian equinox `equinox_b`, optionally with
    /// an epoch of observation for proper-motion transport.
    Fk4 {
        /// Besselian-year equinox (e.g. `1950.0`).
        equinox_b: f64,
        /// Besselian-year epoch of observation, if known.
        epoch_obs_b: Option<f64>,
    },
    /// FK4 with E-terms of aberration already removed.
    Fk4NoEterms {
        /// Besselian-year equinox (e.g. `1950.0`).
        equinox_b: f64,
        /// Besselian-year epoch of observation, if known.
        epoch_obs_b: Option<f64>,
    },
}

impl Default for CoordinateReferenceFrame {
    fn default() -> Self {
        CoordinateReferenceFrame::Icrs
    }
}

impl CoordinateReferenceFrame {
    /// FK5 at the default J2000.0 equinox.
    pub fn fk5_default() -> Self {
        CoordinateReferenceFrame::Fk5 { equinox_j: 2000.0 }
    }

    /// FK4 at the default B1950.0 equinox, epoch of observation unset.
    pub fn fk4_default() -> Self {
        CoordinateReferenceFrame::Fk4 {
            equinox_b: 1950.0,
            epoch_obs_b: None,
        }
    }

    /// FK4-no-E-terms at the default B1950.0 equinox, epoch of observation unset.
    pub fn fk4_no_eterms_default() -> Self {
        CoordinateReferenceFrame::Fk4NoEterms {
            equinox_b: 1950.0,
            epoch_obs_b: None,
        }
    }

    /// This frame's equinox expressed as a Julian year, for use by
    /// precession and obliquity formulas that are parameterized in T.
    fn equinox_julian(self) -> f64 {
        match self {
            CoordinateReferenceFrame::Icrs | CoordinateReferenceFrame::J2000 => 2000.0,
            CoordinateReferenceFrame::Fk5 { equinox_j } => equinox_j,
            CoordinateReferenceFrame::Fk4 { equinox_b, .. }
            | CoordinateReferenceFrame::Fk4NoEterms { equinox_b, .. } => {
                besselian_to_julian(equinox_b)
            }
        }
    }

    /// Rotates a unit vector expressed in this frame (at its own equinox)
    /// to an ICRS unit vector.
    fn to_icrs(self, p: PVector, log: &dyn LogSink) -> PVector {
        match self {
            CoordinateReferenceFrame::Icrs => p,
            CoordinateReferenceFrame::J2000 => bridge::fk5_to_icrs(p),
            CoordinateReferenceFrame::Fk5 { equinox_j } => {
                if equinox_j < 1984.0 {
                    log.log(
                        LogLevel::Warn,
                        &format!("FK5 equinox {equinox_j} predates 1984.0; no implicit FK4 bridge is applied"),
                    );
                }
                let at_j2000 = precession::fk5_precession_matrix(equinox_j, 2000.0);
                bridge::fk5_to_icrs(vector::mat_mul_pvec(at_j2000, p))
            }
            CoordinateReferenceFrame::Fk4 {
                equinox_b,
                epoch_obs_b,
            } => {
                warn_missing_epoch_obs(equinox_b, epoch_obs_b, log);
                let mean = eterms::remove_eterms(p);
                let at_b1950 = precession::fk4_precession_matrix(equinox_b, 1950.0);
                let fk5_j2000 = bridge::fk4_to_fk5(vector::mat_mul_pvec(at_b1950, mean));
                bridge::fk5_to_icrs(fk5_j2000)
            }
            CoordinateReferenceFrame::Fk4NoEterms {
                equinox_b,
                epoch_obs_b,
            } => {
                warn_missing_epoch_obs(equinox_b, epoch_obs_b, log);
                let at_b1950 = precession::fk4_precession_matrix(equinox_b, 1950.0);
                let fk5_j2000 = bridge::fk4_to_fk5(vector::mat_mul_pvec(at_b1950, p));
                bridge::fk5_to_icrs(fk5_j2000)
            }
        }
    }

    /// Rotates an ICRS unit vector to this frame (at its own equinox).
    fn from_icrs(self, p_icrs: PVector, log: &dyn LogSink) -> PVector {
        match self {
            CoordinateReferenceFrame::Icrs => p_icrs,
            CoordinateReferenceFrame::J2000 => bridge::icrs_to_fk5(p_icrs),
            CoordinateReferenceFrame::Fk5 { equinox_j } => {
                if equinox_j < 1984.0 {
                    log.log(
                        LogLevel::Warn,
                        &format!("FK5 equinox {equinox_j} predates 1984.0; no implicit FK4 bridge is applied"),
                    );
                }
                let fk5_j2000 = bridge::icrs_to_fk5(p_icrs);
                let at_equinox = precession::fk5_precession_matrix(2000.0, equinox_j);
                vector::mat_mul_pvec(at_equinox, fk5_j2000)
            }
            CoordinateReferenceFrame::Fk4 {
                equinox_b,
                epoch_obs_b,
            } => {
                warn_missing_epoch_obs(equinox_b, epoch_obs_b, log);
                let fk4_b1950 = bridge::fk5_to_fk4(bridge::icrs_to_fk5(p_icrs));
                let at_equinox = precession::fk4_precession_matrix(1950.0, equinox_b);
                eterms::add_eterms(vector::mat_mul_pvec(at_equinox, fk4_b1950))
            }
            CoordinateReferenceFrame::Fk4NoEterms {
                equinox_b,
                epoch_obs_b,
            } => {
                warn_missing_epoch_obs(equinox_b, epoch_obs_b, log);
                let fk4_b1950 = bridge::fk5_to_fk4(bridge::icrs_to_fk5(p_icrs));
                let at_equinox = precession::fk4_precession_matrix(1950.0, equinox_b);
                vector::mat_mul_pvec(at_equinox, fk4_b1950)
            }
        }
    }

    /// Demotes `FK4_NO_E` to `FK4` when used with an ecliptic CRS (§4.5, §9
    /// open question), logging the demotion.
    fn demote_for_ecliptic(self, log: &dyn LogSink) -> Self {
        if let CoordinateReferenceFrame::Fk4NoEterms {
            equinox_b,
            epoch_obs_b,
        } = self
        {
            log.log(
                LogLevel::Warn,
                "FK4_NO_E used with an ecliptic CRS is demoted to FK4 per the WCS paper",
            );
            CoordinateReferenceFrame::Fk4 {
                equinox_b,
                epoch_obs_b,
            }
        } else {
            self
        }
    }
}

fn warn_missing_epoch_obs(equinox_b: f64, epoch_obs_b: Option<f64>, log: &dyn LogSink) {
    if epoch_obs_b.is_none() {
        log.log(
            LogLevel::Warn,
            &format!("FK4 epoch of observation not given; assuming equinox {equinox_b}"),
        );
    }
}

/// A coordinate reference system: a coordinate system paired with (where
/// applicable) a reference frame (§3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crs {
    /// Equatorial coordinates in the given reference frame.
    Equatorial(CoordinateReferenceFrame),
    /// Ecliptic coordinates in the given reference frame.
    Ecliptic(CoordinateReferenceFrame),
    /// Galactic coordinates (no reference frame: IAU 1958 fixed system).
    Galactic,
    /// Supergalactic coordinates (no reference frame: de Vaucouleurs fixed system).
    SuperGalactic,
}

impl Crs {
    fn to_icrs_vector(self, lon_deg: f64, lat_deg: f64, log: &dyn LogSink) -> PVector {
        let p = spherical_to_cartesian(lon_deg.to_radians(), lat_deg.to_radians());
        match self {
            Crs::Equatorial(frame) => frame.to_icrs(p, log),
            Crs::Ecliptic(frame) => {
                let frame = frame.demote_for_ecliptic(log);
                let equatorial = ecliptic::ecliptic_to_equatorial(p, frame.equinox_julian());
                frame.to_icrs(equatorial, log)
            }
            Crs::Galactic => galactic::galactic_to_equatorial(p),
            Crs::SuperGalactic => {
                galactic::galactic_to_equatorial(galactic::supergalactic_to_galactic(p))
            }
        }
    }

    fn from_icrs_vector(self, p_icrs: PVector, log: &dyn LogSink) -> (f64, f64) {
        let p = match self {
            Crs::Equatorial(frame) => frame.from_icrs(p_icrs, log),
            Crs::Ecliptic(frame) => {
                let frame = frame.demote_for_ecliptic(log);
                let equatorial = frame.from_icrs(p_icrs, log);
                ecliptic::equatorial_to_ecliptic(equatorial, frame.equinox_julian())
            }
            Crs::Galactic => galactic::equatorial_to_galactic(p_icrs),
            Crs::SuperGalactic => {
                galactic::galactic_to_supergalactic(galactic::equatorial_to_galactic(p_icrs))
            }
        };
        let (lon, lat) = cartesian_to_spherical(p);
        (lon.to_degrees(), lat.to_degrees())
    }

    /// Converts `(lon_deg, lat_deg)` from this CRS to `target`, per §4.5's
    /// operation contract: remove E-terms, transport to a common equinox,
    /// bridge frame families, precess to the target equinox, re-add
    /// E-terms.
    pub fn convert_to(
        self,
        target: Crs,
        lon_deg: f64,
        lat_deg: f64,
        log: &dyn LogSink,
    ) -> SkyPosition {
        let p_icrs = self.to_icrs_vector(lon_deg, lat_deg, log);
        let (lon, lat) = target.from_icrs_vector(p_icrs, log);
        SkyPosition {
            longitude_deg: lon.rem_euclid(360.0),
            latitude_deg: lat,
            crs: target,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Equatorial(frame) => write!(f, "EQUATORIAL({frame:?})"),
            Crs::Ecliptic(frame) => write!(f, "ECLIPTIC({frame:?})"),
            Crs::Galactic => write!(f, "GALACTIC"),
            Crs::SuperGalactic => write!(f, "SUPER_GALACTIC"),
        }
    }
}

/// A position on the sky: longitude/latitude in degrees, tagged with the
/// [`Crs`] they are expressed in (§3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPosition {
    /// Longitude, degrees, normalized to `[0, 360)`.
    pub longitude_deg: f64,
    /// Latitude, degrees, in `[-90, 90]`.
    pub latitude_deg: f64,
    /// The coordinate reference system this position is expressed in.
    pub crs: Crs,
}

impl SkyPosition {
    /// A new sky position; longitude is normalized to `[0, 360)`.
    pub fn new(longitude_deg: f64, latitude_deg: f64, crs: Crs) -> Self {
        Self {
            longitude_deg: longitude_deg.rem_euclid(360.0),
            latitude_deg,
            crs,
        }
    }

    /// Converts this position to `target`, per [`Crs::convert_to`].
    pub fn convert_to(&self, target: Crs, log: &dyn LogSink) -> SkyPosition {
        self.crs
            .convert_to(target, self.longitude_deg, self.latitude_deg, log)
    }

    /// A copy of this position with both angles rounded to `dp` decimal
    /// places, mirroring the teacher's `EquatorialCoord::round`.
    pub fn round(&self, dp: u32) -> Self {
        let round = |v: f64| -> f64 {
            Decimal::from_f64_retain(v)
                .map(|d| d.round_dp(dp))
                .and_then(|d| d.try_into().ok())
                .unwrap_or(v)
        };
        Self {
            longitude_deg: round(self.longitude_deg),
            latitude_deg: round(self.latitude_deg),
            crs: self.crs,
        }
    }
}

/// Angular separation between two sky positions, in degrees (§4.5,§8):
/// converts `p1` into `p2`'s CRS, then returns the arc-cosine of their dot
/// product, clamped to `[-1, 1]`.
pub fn separation(p1: &SkyPosition, p2: &SkyPosition, log: &dyn LogSink) -> f64 {
    let p1_in_p2_crs = p1.convert_to(p2.crs, log);
    let v1 = spherical_to_cartesian(
        p1_in_p2_crs.longitude_deg.to_radians(),
        p1_in_p2_crs.latitude_deg.to_radians(),
    );
    let v2 = spherical_to_cartesian(p2.longitude_deg.to_radians(), p2.latitude_deg.to_radians());
    vector::angular_separation(v1, v2).to_degrees()
}

/// An error parsing a CRS factory string (§6, §9 design note).
#[derive(Debug, Error, Clone, PartialEq)]
#[error("could not parse CRS string {input:?}: {reason}")]
pub struct CrsParseError {
    /// The original input string.
    pub input: String,
    /// A human-readable description of the parse failure.
    pub reason: String,
}

/// Parses the CLI's CRS factory-string grammar (§6):
///
/// ```text
/// crs   := 'GALACTIC' | 'SUPER_GALACTIC'
///        | 'EQUATORIAL' ['(' frame ')']
///        | 'ECLIPTIC' ['(' frame ')']
/// frame := 'ICRS()' | 'J2000()'
///        | 'FK5' '(' [equinox] ')'
///        | 'FK4' '(' [equinox [',' epoch]] ')'
///        | 'FK4_NO_E' '(' [equinox [',' epoch]] ')'
/// ```
///
/// A small hand-rolled recursive-descent parser (design note 9), rather
/// than regex/substring matching.
pub fn parse_crs(input: &str) -> Result<Crs, CrsParseError> {
    let mut p = Parser {
        input,
        rest: input.trim(),
    };
    let crs = p.parse_crs()?;
    if !p.rest.is_empty() {
        return Err(p.error(format!("unexpected trailing input {:?}", p.rest)));
    }
    Ok(crs)
}

struct Parser<'a> {
    input: &'a str,
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: String) -> CrsParseError {
        CrsParseError {
            input: self.input.to_string(),
            reason,
        }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn take_token(&mut self) -> &'a str {
        self.skip_ws();
        let end = self
            .rest
            .find(|c: char| c == '(' || c == ')' || c == ',')
            .unwrap_or(self.rest.len());
        let (tok, rest) = self.rest.split_at(end);
        self.rest = rest;
        tok.trim()
    }

    fn expect_char(&mut self, c: char) -> Result<(), CrsParseError> {
        self.skip_ws();
        match self.rest.strip_prefix(c) {
            Some(r) => {
                self.rest = r;
                Ok(())
            }
            None => Err(self.error(format!("expected {c:?}"))),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest.chars().next()
    }

    fn parse_crs(&mut self) -> Result<Crs, CrsParseError> {
        let tok = self.take_token().to_ascii_uppercase();
        match tok.as_str() {
            "GALACTIC" => Ok(Crs::Galactic),
            "SUPER_GALACTIC" => Ok(Crs::SuperGalactic),
            "EQUATORIAL" => Ok(Crs::Equatorial(self.parse_optional_frame()?)),
            "ECLIPTIC" => Ok(Crs::Ecliptic(self.parse_optional_frame()?)),
            other => Err(self.error(format!("unrecognized CRS {other:?}"))),
        }
    }

    fn parse_optional_frame(&mut self) -> Result<CoordinateReferenceFrame, CrsParseError> {
        if self.peek_char() == Some('(') {
            self.expect_char('(')?;
            let frame = self.parse_frame()?;
            self.expect_char(')')?;
            Ok(frame)
        } else {
            Ok(CoordinateReferenceFrame::Icrs)
        }
    }

    fn parse_frame(&mut self) -> Result<CoordinateReferenceFrame, CrsParseError> {
        let tok = self.take_token().to_ascii_uppercase();
        self.expect_char('(')?;
        let frame = match tok.as_str() {
            "ICRS" => CoordinateReferenceFrame::Icrs,
            "J2000" => CoordinateReferenceFrame::J2000,
            "FK5" => {
                let equinox = self.parse_optional_number()?.unwrap_or(2000.0);
                CoordinateReferenceFrame::Fk5 { equinox_j: equinox }
            }
            "FK4" => {
                let (equinox, epoch) = self.parse_optional_number_pair()?;
                CoordinateReferenceFrame::Fk4 {
                    equinox_b: equinox.unwrap_or(1950.0),
                    epoch_obs_b: epoch,
                }
            }
            "FK4_NO_E" => {
                let (equinox, epoch) = self.parse_optional_number_pair()?;
                CoordinateReferenceFrame::Fk4NoEterms {
                    equinox_b: equinox.unwrap_or(1950.0),
                    epoch_obs_b: epoch,
                }
            }
            other => return Err(self.error(format!("unrecognized frame {other:?}"))),
        };
        self.expect_char(')')?;
        Ok(frame)
    }

    fn parse_optional_number(&mut self) -> Result<Option<f64>, CrsParseError> {
        if self.peek_char() == Some(')') {
            return Ok(None);
        }
        let tok = self.take_token();
        tok.parse()
            .map(Some)
            .map_err(|_| self.error(format!("expected a number, found {tok:?}")))
    }

    fn parse_optional_number_pair(&mut self) -> Result<(Option<f64>, Option<f64>), CrsParseError> {
        let first = self.parse_optional_number()?;
        if self.peek_char() == Some(',') {
            self.expect_char(',')?;
            let second = self.parse_optional_number()?;
            Ok((first, second))
        } else {
            Ok((first, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::NullLogSink;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parse_bare_crs_variants() {
        assert_eq!(parse_crs("GALACTIC").unwrap(), Crs::Galactic);
        assert_eq!(parse_crs("SUPER_GALACTIC").unwrap(), Crs::SuperGalactic);
        assert_eq!(
            parse_crs("EQUATORIAL").unwrap(),
            Crs::Equatorial(CoordinateReferenceFrame::Icrs)
        );
    }

    #[test]
    fn parse_frame_with_equinox_and_epoch() {
        let crs = parse_crs("EQUATORIAL(FK4(1950,1975))").unwrap();
        assert_eq!(
            crs,
            Crs::Equatorial(CoordinateReferenceFrame::Fk4 {
                equinox_b: 1950.0,
                epoch_obs_b: Some(1975.0)
            })
        );
    }

    #[test]
    fn parse_fk5_default_equinox() {
        let crs = parse_crs("ECLIPTIC(FK5())").unwrap();
        assert_eq!(
            crs,
            Crs::Ecliptic(CoordinateReferenceFrame::Fk5 { equinox_j: 2000.0 })
        );
    }

    #[test]
    fn parse_rejects_unknown_crs() {
        assert!(parse_crs("SPHERICAL").is_err());
    }

    #[test]
    fn round_trip_through_supergalactic() {
        let log = NullLogSink;
        let p = SkyPosition::new(182.63867, 39.401167, Crs::Equatorial(CoordinateReferenceFrame::Icrs));
        let sg = p.convert_to(Crs::SuperGalactic, &log);
        let back = sg.convert_to(Crs::Equatorial(CoordinateReferenceFrame::Icrs), &log);
        assert_abs_diff_eq!(p.longitude_deg, back.longitude_deg, epsilon = 1e-6);
        assert_abs_diff_eq!(p.latitude_deg, back.latitude_deg, epsilon = 1e-6);
    }

    #[test]
    fn separation_is_symmetric_and_zero_for_equal_points() {
        let log = NullLogSink;
        let p1 = SkyPosition::new(10.0, 20.0, Crs::Galactic);
        let p2 = SkyPosition::new(30.0, -5.0, Crs::Equatorial(CoordinateReferenceFrame::fk5_default()));
        let s12 = separation(&p1, &p2, &log);
        let s21 = separation(&p2, &p1, &log);
        assert_abs_diff_eq!(s12, s21, epsilon = 1e-9);
        assert_abs_diff_eq!(separation(&p1, &p1, &log), 0.0, epsilon = 1e-9);
        assert!(s12 <= 180.0);
    }

    #[test]
    fn fk4_no_e_plus_ecliptic_is_demoted() {
        let log = NullLogSink;
        let frame = CoordinateReferenceFrame::fk4_no_eterms_default();
        let p = SkyPosition::new(100.0, 10.0, Crs::Ecliptic(frame));
        // Should not panic and should round-trip.
        let back = p
            .convert_to(Crs::Ecliptic(frame), &log)
            .convert_to(Crs::Ecliptic(frame), &log);
        assert_abs_diff_eq!(p.longitude_deg, back.longitude_deg, epsilon = 1e-6);
    }

    #[test]
    fn round_rounds_to_requested_precision() {
        let p = SkyPosition::new(10.123456, -5.987654, Crs::Galactic);
        let rounded = p.round(2);
        assert_abs_diff_eq!(rounded.longitude_deg, 10.12, epsilon = 1e-9);
        assert_abs_diff_eq!(rounded.latitude_deg, -5.99, epsilon = 1e-9);
    }

    #[test]
    fn besselian_julian_equinox_parsing_matches_time_module() {
        // J2000.0 is a few thousandths of a year later than B2000.0.
        assert_abs_diff_eq!(julian_to_besselian(2000.0), 2000.001_277_5, epsilon = 1e-5);
    }
}
