//! Crate-wide error types for the WCS engine.

use thiserror::Error;

/// An enumeration of errors that can occur while building or evaluating a
/// [`crate::wcs::Wcs`] or a [`crate::frames::Crs`] conversion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WcsError {
    /// One or more required WCS keywords were absent from the keyword source.
    /// Every missing keyword is reported, not just the first.
    #[error("missing required WCS keyword(s): {}", .keys.join(", "))]
    MissingKeywords {
        /// The names of every keyword that was required but not present.
        keys: Vec<String>,
    },
    /// `CTYPE1`/`CTYPE2` could not be parsed, or named different projection codes.
    #[error("invalid CTYPE pair ({ctype1:?}, {ctype2:?}): {reason}")]
    BadCtype {
        /// The raw value of CTYPE1.
        ctype1: String,
        /// The raw value of CTYPE2.
        ctype2: String,
        /// A human-readable description of the mismatch.
        reason: String,
    },
    /// A `PV2_n` parameter required by a projection was missing or out of range.
    #[error("bad projection parameter {name} for {projection}: {reason}")]
    BadProjectionParameter {
        /// The projection code (e.g. `"AZP"`).
        projection: String,
        /// The parameter name (e.g. `"PV2_1"`).
        name: String,
        /// A human-readable description of the problem.
        reason: String,
    },
    /// A pixel or sky position lies outside the domain of validity of a
    /// projection kernel, or an iterative solver failed to converge within
    /// its iteration budget.
    #[error("position is beyond the projection's domain of validity: {reason}")]
    PixelBeyondProjection {
        /// A human-readable description of the domain violation.
        reason: String,
    },
    /// A frame conversion was requested between two coordinate reference
    /// systems for which no conversion path is defined. The conversion graph
    /// implemented here is complete, so this should be unreachable.
    #[error("no conversion path between reference systems: {reason}")]
    FrameConversion {
        /// A human-readable description of the unsupported conversion.
        reason: String,
    },
    /// A numerical computation overflowed its domain after clamping, or a
    /// matrix that was required to be invertible was singular.
    #[error("math error: {reason}")]
    Math {
        /// A human-readable description of the numerical failure.
        reason: String,
    },
}
