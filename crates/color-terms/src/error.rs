//! Error types for the color-terms engine.
//!
//! [`ColorTermsError`] covers every failure the engine can report. Parsing
//! errors for hex colors and Munsell notations have their own small types so
//! they can be matched on without pulling in the whole enum.

use std::fmt;
use std::num::ParseIntError;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// Unified error type for the color-terms engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorTermsError {
    /// The requested RGB working space name is not known.
    UnsupportedColorSpace(String),
    /// A Munsell notation has no displayable color under the active
    /// chroma-selection policy.
    UnresolvableNotation {
        /// The notation that was last tried
        notation: String,
    },
    /// A Munsell notation string could not be parsed.
    InvalidNotation(String),
    /// A line of a renotation data file could not be read.
    RenotationData {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        reason: String,
    },
    /// A cube or catalogue coordinate was NaN or infinite at classification time.
    NonFiniteColor {
        /// Flat cube index (or catalogue index) of the offending entry
        index: usize,
    },
    /// A category label is not one of the known basic color terms.
    UnknownCategory(String),
    /// A confidence grid does not have the 8x40 shape of the reference grid.
    GridShape {
        /// Label of the offending grid
        label: String,
        /// Number of rows found
        rows: usize,
        /// Number of columns found in the first mismatching row
        columns: usize,
    },
    /// More distinct categories than fit the byte-sized index space.
    TooManyCategories(usize),
    /// A catalogue without entries cannot classify anything.
    EmptyCatalogue,
    /// A cube resolution that is not supported by the requested operation.
    InvalidCubeSize(usize),
    /// Invalid hex color string
    ParseColor(ParseColorError),
}

impl fmt::Display for ColorTermsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorTermsError::UnsupportedColorSpace(name) => {
                write!(f, "unsupported color space: {}", name)
            }
            ColorTermsError::UnresolvableNotation { notation } => {
                write!(f, "no displayable color for Munsell notation {}", notation)
            }
            ColorTermsError::InvalidNotation(notation) => {
                write!(f, "invalid Munsell notation: {:?}", notation)
            }
            ColorTermsError::RenotationData { line, reason } => {
                write!(f, "renotation data line {}: {}", line, reason)
            }
            ColorTermsError::NonFiniteColor { index } => {
                write!(f, "non-finite perceptual coordinate at index {}", index)
            }
            ColorTermsError::UnknownCategory(label) => {
                write!(f, "unknown color category: {:?}", label)
            }
            ColorTermsError::GridShape {
                label,
                rows,
                columns,
            } => write!(
                f,
                "confidence grid for {} is {}x{}, expected 8x40",
                label, rows, columns
            ),
            ColorTermsError::TooManyCategories(count) => {
                write!(f, "{} categories exceed the limit of 32", count)
            }
            ColorTermsError::EmptyCatalogue => write!(f, "category catalogue is empty"),
            ColorTermsError::InvalidCubeSize(levels) => {
                write!(f, "unsupported cube resolution: {} levels per channel", levels)
            }
            ColorTermsError::ParseColor(err) => write!(f, "invalid color: {}", err),
        }
    }
}

impl std::error::Error for ColorTermsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ColorTermsError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseColorError> for ColorTermsError {
    fn from(err: ParseColorError) -> Self {
        ColorTermsError::ParseColor(err)
    }
}
