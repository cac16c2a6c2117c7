//! ISO, Julian Date, Modified Julian Date, and epoch (Besselian/Julian)
//! conversions used by the keyword ingest layer and exposed for general use.

use thiserror::Error;

/// Errors produced while parsing or converting a date/epoch string.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeError {
    /// The given string did not match any recognized epoch or date grammar.
    #[error("could not parse '{value}' as a date or epoch: {reason}")]
    ParseError {
        /// The original input string.
        value: String,
        /// A human-readable description of why parsing failed.
        reason: String,
    },
}

/// Julian Date of the fundamental epoch J2000.0.
pub const JD_J2000: f64 = 2451545.0;
/// Julian Date of the fundamental epoch B1950.0.
pub const JD_B1950: f64 = 2415020.31352;
/// Days in a Julian year.
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;
/// Days in a Besselian (tropical) year.
pub const DAYS_PER_BESSELIAN_YEAR: f64 = 365.242198781;
/// Offset between a Julian Date and a Modified Julian Date.
pub const MJD_OFFSET: f64 = 2400000.5;

/// Converts a Julian epoch (e.g. `J2000.0`) to a Julian Date.
pub fn epoch_julian_to_jd(j: f64) -> f64 {
    (j - 2000.0) * DAYS_PER_JULIAN_YEAR + JD_J2000
}

/// Converts a Julian Date to a Julian epoch. Exact inverse of [`epoch_julian_to_jd`].
pub fn jd_to_epoch_julian(jd: f64) -> f64 {
    2000.0 + (jd - JD_J2000) / DAYS_PER_JULIAN_YEAR
}

/// Converts a Besselian epoch (e.g. `B1950.0`) to a Julian Date.
pub fn epoch_besselian_to_jd(b: f64) -> f64 {
    (b - 1900.0) * DAYS_PER_BESSELIAN_YEAR + JD_B1950
}

/// Converts a Julian Date to a Besselian epoch. Exact inverse of [`epoch_besselian_to_jd`].
pub fn jd_to_epoch_besselian(jd: f64) -> f64 {
    1900.0 + (jd - JD_B1950) / DAYS_PER_BESSELIAN_YEAR
}

/// Converts a Besselian epoch directly to a Julian epoch.
pub fn besselian_to_julian(b: f64) -> f64 {
    jd_to_epoch_julian(epoch_besselian_to_jd(b))
}

/// Converts a Julian epoch directly to a Besselian epoch.
pub fn julian_to_besselian(j: f64) -> f64 {
    jd_to_epoch_besselian(epoch_julian_to_jd(j))
}

/// Converts a Modified Julian Date to a Julian Date.
pub fn mjd_to_jd(mjd: f64) -> f64 {
    mjd + MJD_OFFSET
}

/// Converts a Julian Date to a Modified Julian Date.
pub fn jd_to_mjd(jd: f64) -> f64 {
    jd - MJD_OFFSET
}

/// Computes the Julian Date for a Gregorian/Julian calendar date, following
/// the standard convention: dates on or after 1582-10-15 are interpreted in
/// the (proleptic) Gregorian calendar, earlier dates in the (proleptic)
/// Julian calendar. `day` may carry a fractional part representing the time
/// of day (`1.5` is noon on the 1st).
///
/// ```
/// use astro_rs::time::jd;
///
/// assert_eq!(jd(1970, 1, 1.0), 2440587.5);
/// assert_eq!(jd(-4712, 1, 1.5), 0.0);
/// ```
pub fn jd(year: i32, month: u32, day: f64) -> f64 {
    let (mut y, mut m) = (year as f64, month as f64);
    if month <= 2 {
        y -= 1.0;
        m += 12.0;
    }

    let is_gregorian = (year, month) >= (1582, 10) && !(year == 1582 && month == 10 && day < 15.0);

    let b = if is_gregorian {
        let a = (y / 100.0).floor();
        2.0 - a + (a / 4.0).floor()
    } else {
        0.0
    };

    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day + b - 1524.5
}

/// Converts a Julian Date back to a `(year, month, day_with_fraction)`
/// Gregorian/Julian calendar date, the inverse of [`jd`].
pub fn jd_to_ymd(julian_date: f64) -> (i32, u32, f64) {
    let jd_adj = julian_date + 0.5;
    let z = jd_adj.floor();
    let f = jd_adj - z;

    let a = if z < 2299161.0 {
        z
    } else {
        let alpha = ((z - 1867216.25) / 36524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

    (year as i32, month as u32, day)
}

/// Parses an ISO-8601 date or date-time string (`YYYY-MM-DD` or
/// `YYYY-MM-DDTHH:MM:SS[.fff]`) into a Julian Date.
///
/// ```
/// use astro_rs::time::iso_to_jd;
///
/// let jd = iso_to_jd("2004-01-01T00:00:00.000").unwrap();
/// assert_eq!(jd - 2400000.5, 53005.0);
/// ```
pub fn iso_to_jd(s: &str) -> Result<f64, TimeError> {
    let (date_part, time_part) = match s.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (s, None),
    };

    let mut date_fields = date_part.split('-');
    let parse_err = |reason: &str| TimeError::ParseError {
        value: s.to_owned(),
        reason: reason.to_owned(),
    };

    let year: i32 = date_fields
        .next()
        .ok_or_else(|| parse_err("missing year"))?
        .parse()
        .map_err(|_| parse_err("invalid year"))?;
    let month: u32 = date_fields
        .next()
        .ok_or_else(|| parse_err("missing month"))?
        .parse()
        .map_err(|_| parse_err("invalid month"))?;
    let day_int: u32 = date_fields
        .next()
        .ok_or_else(|| parse_err("missing day"))?
        .parse()
        .map_err(|_| parse_err("invalid day"))?;

    let day_fraction = match time_part {
        Some(t) => {
            let mut parts = t.split(':');
            let hh: f64 = parts
                .next()
                .ok_or_else(|| parse_err("missing hour"))?
                .parse()
                .map_err(|_| parse_err("invalid hour"))?;
            let mm: f64 = parts
                .next()
                .ok_or_else(|| parse_err("missing minute"))?
                .parse()
                .map_err(|_| parse_err("invalid minute"))?;
            let ss: f64 = match parts.next() {
                Some(s) => s.parse().map_err(|_| parse_err("invalid second"))?,
                None => 0.0,
            };
            (hh * 3600.0 + mm * 60.0 + ss) / 86400.0
        }
        None => 0.0,
    };

    Ok(jd(year, month, day_int as f64 + day_fraction))
}

/// Converts an ISO-8601 date string directly to a Modified Julian Date.
pub fn iso_to_mjd(s: &str) -> Result<f64, TimeError> {
    iso_to_jd(s).map(jd_to_mjd)
}

/// Formats a Julian Date as an ISO-8601 date-time string (seconds truncated
/// to millisecond precision, always UTC).
pub fn jd_to_iso(julian_date: f64) -> String {
    let (year, month, day_frac) = jd_to_ymd(julian_date);
    let day = day_frac.floor() as u32;
    let frac_of_day = day_frac - day as f64;
    let total_ms = (frac_of_day * 86_400_000.0).round() as u64;
    let hh = total_ms / 3_600_000;
    let mm = (total_ms % 3_600_000) / 60_000;
    let ss = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;
    format!("{year:04}-{month:02}-{day:02}T{hh:02}:{mm:02}:{ss:02}.{ms:03}")
}

/// A date/epoch specification as accepted by [`epochs`], parsed from a FITS
/// `EQUINOX`/`EPOCH`/`DATE-OBS` style string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Epochs {
    /// Besselian epoch (fractional tropical years since B1900.0).
    pub besselian: f64,
    /// Julian epoch (fractional Julian years since J2000.0).
    pub julian: f64,
    /// Julian Date.
    pub jd: f64,
}

/// Parses `B…`, `J…`, `F…` (fractional Julian year), `MJD…`, `JD…`, or a bare
/// ISO-8601 date string into a consistent `(besselian, julian, jd)` triple.
///
/// ```
/// use astro_rs::time::epochs;
///
/// assert_eq!(epochs("B1950").unwrap().besselian, 1950.0);
/// assert_eq!(epochs("J2000").unwrap().julian, 2000.0);
/// ```
pub fn epochs(spec: &str) -> Result<Epochs, TimeError> {
    let trimmed = spec.trim();
    let parse_err = |reason: &str| TimeError::ParseError {
        value: spec.to_owned(),
        reason: reason.to_owned(),
    };

    let julian_date = if let Some(rest) = trimmed.strip_prefix(['B', 'b']) {
        let b: f64 = rest.parse().map_err(|_| parse_err("invalid Besselian epoch"))?;
        epoch_besselian_to_jd(b)
    } else if let Some(rest) = trimmed.strip_prefix(['J', 'j']) {
        let j: f64 = rest.parse().map_err(|_| parse_err("invalid Julian epoch"))?;
        epoch_julian_to_jd(j)
    } else if let Some(rest) = trimmed.strip_prefix(['F', 'f']) {
        // A bare fractional year with no explicit scale is treated as Julian,
        // matching the modern (post-1984) FITS default.
        let j: f64 = rest.parse().map_err(|_| parse_err("invalid fractional epoch"))?;
        epoch_julian_to_jd(j)
    } else if let Some(rest) = trimmed
        .strip_prefix("MJD")
        .or_else(|| trimmed.strip_prefix("mjd"))
    {
        let mjd: f64 = rest.parse().map_err(|_| parse_err("invalid MJD"))?;
        mjd_to_jd(mjd)
    } else if let Some(rest) = trimmed
        .strip_prefix("JD")
        .or_else(|| trimmed.strip_prefix("jd"))
    {
        rest.parse().map_err(|_| parse_err("invalid JD"))?
    } else {
        iso_to_jd(trimmed)?
    };

    Ok(Epochs {
        besselian: jd_to_epoch_besselian(julian_date),
        julian: jd_to_epoch_julian(julian_date),
        jd: julian_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_epoch_scenarios() {
        assert_eq!(iso_to_mjd("2004-01-01T00:00:00.000").unwrap(), 53005.0);
        assert_eq!(jd(-4712, 1, 1.5), 0.0);
        assert_eq!(jd(1970, 1, 1.0), 2440587.5);
    }

    #[test]
    fn besselian_julian_round_trip() {
        let j = 1987.3;
        let b = julian_to_besselian(j);
        let back = besselian_to_julian(b);
        assert!((back - j).abs() < 1e-7);
    }

    #[test]
    fn epochs_parsing() {
        assert_eq!(epochs("B1950").unwrap().besselian, 1950.0);
        assert_eq!(epochs("J2000").unwrap().julian, 2000.0);
        let e = epochs("MJD53005.0").unwrap();
        assert!((e.jd - 2453005.5).abs() < 1e-9);
    }

    #[test]
    fn ymd_round_trip() {
        for &(y, m, d) in &[(2004, 1, 1.0), (1970, 1, 1.0), (1999, 12, 31.25)] {
            let j = jd(y, m, d);
            let (y2, m2, d2) = jd_to_ymd(j);
            assert_eq!((y, m), (y2, m2));
            assert!((d - d2).abs() < 1e-6);
        }
    }
}
