//! The keyword source interface (§4.1, §6) and its two adapters: an
//! in-memory map and a FITS header.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::fits::{FitsHeader, FitsHeaderError};

/// A read-only provider of WCS keyword values.
///
/// The core only ever reads through this trait; it never parses FITS itself.
/// Numeric accessors are lenient: implementations should strip a leading/
/// trailing `'` and surrounding whitespace before parsing, matching how FITS
/// string-typed cards sometimes carry numeric values.
pub trait KeywordSource {
    /// Returns `true` if `key` is present in the source.
    fn has(&self, key: &str) -> bool;
    /// Reads `key` as a string, if present and representable as one.
    fn get_string(&self, key: &str) -> Option<String>;
    /// Reads `key` as a double-precision float, if present and numeric.
    fn get_double(&self, key: &str) -> Option<f64>;
    /// Reads `key` as a single-precision float, if present and numeric.
    fn get_float(&self, key: &str) -> Option<f32> {
        self.get_double(key).map(|v| v as f32)
    }
    /// Reads `key` as an integer, if present and numeric.
    fn get_int(&self, key: &str) -> Option<i64>;
    /// Returns every key present in the source, in implementation-defined order.
    fn iter_keys(&self) -> Vec<String>;
}

/// A typed scalar value held by [`WcsKeywords`].
#[derive(Debug, Clone, PartialEq)]
enum KeywordValue {
    Str(String),
    Double(f64),
    Int(i64),
}

impl KeywordValue {
    fn as_string(&self) -> String {
        match self {
            KeywordValue::Str(s) => s.clone(),
            KeywordValue::Double(d) => d.to_string(),
            KeywordValue::Int(i) => i.to_string(),
        }
    }

    fn as_double(&self) -> Option<f64> {
        match self {
            KeywordValue::Str(s) => parse_lenient(s),
            KeywordValue::Double(d) => Some(*d),
            KeywordValue::Int(i) => Some(*i as f64),
        }
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            KeywordValue::Str(s) => parse_lenient(s).map(|v| v as i64),
            KeywordValue::Double(d) => Some(*d as i64),
            KeywordValue::Int(i) => Some(*i),
        }
    }
}

/// Strips a leading/trailing `'` and surrounding whitespace before parsing,
/// per §6's leniency requirement for string-typed numeric cards.
fn parse_lenient(raw: &str) -> Option<f64> {
    raw.trim().trim_matches('\'').trim().parse().ok()
}

/// An in-memory `KeywordSource`, the "in-memory map" adapter required by §6.
#[derive(Debug, Clone, Default)]
pub struct WcsKeywords {
    values: BTreeMap<String, KeywordValue>,
}

impl WcsKeywords {
    /// Constructs an empty keyword map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a string-valued keyword.
    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .insert(key.to_ascii_uppercase(), KeywordValue::Str(value.into()));
    }

    /// Sets a float-valued keyword.
    pub fn set_double(&mut self, key: &str, value: f64) {
        self.values
            .insert(key.to_ascii_uppercase(), KeywordValue::Double(value));
    }

    /// Sets an integer-valued keyword.
    pub fn set_int(&mut self, key: &str, value: i64) {
        self.values
            .insert(key.to_ascii_uppercase(), KeywordValue::Int(value));
    }
}

impl KeywordSource for WcsKeywords {
    fn has(&self, key: &str) -> bool {
        self.values.contains_key(&key.to_ascii_uppercase())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values
            .get(&key.to_ascii_uppercase())
            .map(KeywordValue::as_string)
    }

    fn get_double(&self, key: &str) -> Option<f64> {
        self.values
            .get(&key.to_ascii_uppercase())
            .and_then(KeywordValue::as_double)
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.values
            .get(&key.to_ascii_uppercase())
            .and_then(KeywordValue::as_int)
    }

    fn iter_keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

/// A `KeywordSource` over a parsed [`FitsHeader`], the "FITS header" adapter
/// required by §6. Wraps the header in a [`RefCell`] because
/// [`FitsHeader::get_card`] caches deserialized values behind `&mut self`.
pub struct FitsKeywordSource {
    header: RefCell<FitsHeader>,
}

impl FitsKeywordSource {
    /// Wraps an already-parsed FITS header.
    pub fn new(header: FitsHeader) -> Self {
        Self {
            header: RefCell::new(header),
        }
    }

    fn keyword_bytes(key: &str) -> [u8; 8] {
        let mut raw = [b' '; 8];
        let bytes = key.as_bytes();
        let len = bytes.len().min(8);
        raw[..len].copy_from_slice(&bytes[..len]);
        raw
    }

    fn get_value<T: crate::fits::FitsHeaderValue + 'static>(
        &self,
        key: &str,
    ) -> Result<Option<T>, FitsHeaderError>
    where
        T: Clone,
    {
        let mut header = self.header.borrow_mut();
        match header.get_card(Self::keyword_bytes(key)) {
            Some(card) => card.get_value::<T>().map(|rc| Some((*rc).clone())),
            None => Ok(None),
        }
    }
}

impl KeywordSource for FitsKeywordSource {
    fn has(&self, key: &str) -> bool {
        self.header
            .borrow_mut()
            .get_card(Self::keyword_bytes(key))
            .is_some()
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get_value::<String>(key).ok().flatten()
    }

    fn get_double(&self, key: &str) -> Option<f64> {
        self.get_value::<f64>(key).ok().flatten()
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.get_value::<i64>(key).ok().flatten()
    }

    fn iter_keys(&self) -> Vec<String> {
        self.header
            .borrow()
            .cards
            .iter()
            .map(|card| card.keyword().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_roundtrip() {
        let mut kw = WcsKeywords::new();
        kw.set_double("CRPIX1", 512.0);
        kw.set_int("NAXIS1", 1024);
        kw.set_string("CTYPE1", "RA---TAN");

        assert!(kw.has("crpix1"));
        assert_eq!(kw.get_double("CRPIX1"), Some(512.0));
        assert_eq!(kw.get_int("NAXIS1"), Some(1024));
        assert_eq!(kw.get_string("CTYPE1").as_deref(), Some("RA---TAN"));
        assert!(!kw.has("CRPIX2"));
    }

    #[test]
    fn lenient_numeric_parsing() {
        let mut kw = WcsKeywords::new();
        kw.set_string("EQUINOX", "  '2000.0' ");
        assert_eq!(kw.get_double("EQUINOX"), Some(2000.0));
    }
}
