//! Literal splitting and unit resolution.
//!
//! A quantity literal is a number followed by an optional unit suffix:
//!
//! ```text
//! <number>[<whitespace>][<prefix>]<unit>
//! ```
//!
//! The number runs up to the first character outside `[0-9.]`. Without a
//! suffix the number must be a plain unsigned integer already expressed in the
//! base unit. With a suffix the number may carry a fractional part; it is
//! scaled by the factor of the suffix and truncated toward zero.

use serde::Deserialize;

/// Errors produced while parsing a quantity literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The literal was empty or contained only whitespace.
    #[error("empty quantity literal")]
    Empty,

    /// The numeric part of the literal could not be parsed.
    #[error("invalid number in quantity literal '{0}'")]
    InvalidNumber(String),

    /// The scaled value does not fit in 64 bits.
    #[error("quantity literal '{0}' is out of range")]
    OutOfRange(String),

    /// The unit suffix is not one of the recognised suffixes.
    #[error("unknown unit '{unit}' in quantity literal '{literal}'")]
    UnknownUnit {
        /// The full literal as supplied.
        literal: String,
        /// The unrecognised suffix.
        unit: String,
    },
}

/// The family of units a literal is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Data sizes, canonicalised to bits.
    DataSize,
    /// Clock rates, canonicalised to hertz.
    ClockRate,
}

/// 2^64, the first value past `u64::MAX`.
const U64_END: f64 = 18_446_744_073_709_551_616.0;

const KIBI: f64 = 1024.0;
const MEBI: f64 = 1_048_576.0;
const GIBI: f64 = 1_073_741_824.0;

/// Data-size suffixes and their factor in bits.
const DATA_UNITS: &[(&str, f64)] = &[
    ("b", 1.0),
    ("B", 8.0),
    ("kb", 1e3),
    ("Kb", 1e3),
    ("kB", 8e3),
    ("KB", 8e3),
    ("Kib", KIBI),
    ("KiB", 8.0 * KIBI),
    ("Mb", 1e6),
    ("MB", 8e6),
    ("Mib", MEBI),
    ("MiB", 8.0 * MEBI),
    ("Gb", 1e9),
    ("GB", 8e9),
    ("Gib", GIBI),
    ("GiB", 8.0 * GIBI),
];

/// Clock-rate suffixes and their factor in hertz.
const RATE_UNITS: &[(&str, f64)] = &[
    ("Hz", 1.0),
    ("kHz", 1e3),
    ("KHz", 1e3),
    ("KiHz", KIBI),
    ("MHz", 1e6),
    ("MiHz", MEBI),
    ("GHz", 1e9),
    ("GiHz", GIBI),
];

impl UnitKind {
    /// Returns the multiplier for `suffix`, or `None` if it is unknown.
    ///
    /// Matching is exact and case-sensitive.
    #[must_use]
    pub fn factor(self, suffix: &str) -> Option<f64> {
        let table = match self {
            UnitKind::DataSize => DATA_UNITS,
            UnitKind::ClockRate => RATE_UNITS,
        };
        table
            .iter()
            .find(|(unit, _)| *unit == suffix)
            .map(|(_, factor)| *factor)
    }

    /// Returns the suffix of the base unit (`"b"` or `"Hz"`).
    #[must_use]
    pub fn base_suffix(self) -> &'static str {
        match self {
            UnitKind::DataSize => "b",
            UnitKind::ClockRate => "Hz",
        }
    }
}

/// Parses `text` into a count of base units of `kind`.
///
/// # Errors
///
/// - [`ParseError::Empty`] if `text` is blank
/// - [`ParseError::UnknownUnit`] if the suffix is not recognised for `kind`
/// - [`ParseError::InvalidNumber`] if the numeric part is malformed
/// - [`ParseError::OutOfRange`] if the scaled value exceeds `u64::MAX`
pub fn parse_quantity(text: &str, kind: UnitKind) -> Result<u64, ParseError> {
    let literal = text.trim();
    if literal.is_empty() {
        return Err(ParseError::Empty);
    }

    let Some(split) = literal.find(|c: char| !(c.is_ascii_digit() || c == '.')) else {
        return literal
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidNumber(literal.to_string()));
    };

    let (number, suffix) = literal.split_at(split);
    let suffix = suffix.trim_start();
    let factor = kind.factor(suffix).ok_or_else(|| ParseError::UnknownUnit {
        literal: literal.to_string(),
        unit: suffix.to_string(),
    })?;
    let value: f64 = number
        .parse()
        .map_err(|_| ParseError::InvalidNumber(literal.to_string()))?;

    let scaled = value * factor;
    if !(scaled.is_finite() && scaled < U64_END) {
        return Err(ParseError::OutOfRange(literal.to_string()));
    }
    // In range, so `as` only truncates toward zero.
    let parsed = scaled as u64;
    tracing::trace!(literal, ?kind, parsed, "parsed quantity literal");
    Ok(parsed)
}

/// Parses a data-size literal into bits.
///
/// # Errors
///
/// See [`parse_quantity`].
pub fn parse_data_size(text: &str) -> Result<u64, ParseError> {
    parse_quantity(text, UnitKind::DataSize)
}

/// Parses a clock-rate literal into hertz.
///
/// # Errors
///
/// See [`parse_quantity`].
pub fn parse_cpu_size(text: &str) -> Result<u64, ParseError> {
    parse_quantity(text, UnitKind::ClockRate)
}

/// Serde input accepted for sized quantities: a literal or a base-unit count.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum LiteralInput {
    Count(u64),
    Literal(String),
}

impl LiteralInput {
    pub(crate) fn resolve(self, kind: UnitKind) -> Result<u64, ParseError> {
        match self {
            LiteralInput::Count(count) => Ok(count),
            LiteralInput::Literal(text) => parse_quantity(&text, kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_integer_is_base_unit() {
        assert_eq!(parse_data_size("100"), Ok(100));
        assert_eq!(parse_cpu_size("100"), Ok(100));
    }

    #[test]
    fn data_size_suffixes() {
        assert_eq!(parse_data_size("1kb"), Ok(1000));
        assert_eq!(parse_data_size("1KB"), Ok(8000));
        assert_eq!(parse_data_size("1KiB"), Ok(8192));
        assert_eq!(parse_data_size("1Mb"), Ok(1_000_000));
        assert_eq!(parse_data_size("2MiB"), Ok(2 * 8 * 1_048_576));
        assert_eq!(parse_data_size("1GB"), Ok(8_000_000_000));
        assert_eq!(parse_data_size("1Gib"), Ok(1_073_741_824));
        assert_eq!(parse_data_size("300b"), Ok(300));
        assert_eq!(parse_data_size("3B"), Ok(24));
    }

    #[test]
    fn clock_rate_suffixes() {
        assert_eq!(parse_cpu_size("500Hz"), Ok(500));
        assert_eq!(parse_cpu_size("56kHz"), Ok(56_000));
        assert_eq!(parse_cpu_size("8KiHz"), Ok(8192));
        assert_eq!(parse_cpu_size("1MiHz"), Ok(1_048_576));
        assert_eq!(parse_cpu_size("2GHz"), Ok(2_000_000_000));
        assert_eq!(parse_cpu_size("1GiHz"), Ok(1_073_741_824));
    }

    #[test]
    fn fractional_values_truncate() {
        assert_eq!(parse_data_size("1.5kb"), Ok(1500));
        assert_eq!(parse_cpu_size("0.0005kHz"), Ok(0));
        assert_eq!(parse_data_size("1.9b"), Ok(1));
    }

    #[test]
    fn whitespace_between_number_and_unit() {
        assert_eq!(parse_cpu_size("128 kHz"), Ok(128_000));
        assert_eq!(parse_data_size("  4 KiB "), Ok(32_768));
    }

    #[test]
    fn suffixes_are_case_sensitive() {
        assert!(matches!(
            parse_data_size("1kib"),
            Err(ParseError::UnknownUnit { .. })
        ));
        assert!(matches!(
            parse_cpu_size("1hz"),
            Err(ParseError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn units_do_not_cross_families() {
        assert!(parse_data_size("1Hz").is_err());
        assert!(parse_cpu_size("1kb").is_err());
    }

    #[test]
    fn malformed_literals_fail() {
        assert!(matches!(
            parse_data_size("abc"),
            Err(ParseError::UnknownUnit { .. })
        ));
        assert_eq!(parse_data_size(""), Err(ParseError::Empty));
        assert_eq!(parse_data_size("   "), Err(ParseError::Empty));
        assert!(matches!(
            parse_data_size("1.5"),
            Err(ParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_data_size("1..2kb"),
            Err(ParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_cpu_size("MHz"),
            Err(ParseError::InvalidNumber(_))
        ));
    }

    #[test]
    fn integer_overflow_is_rejected() {
        assert!(matches!(
            parse_data_size("18446744073709551616"),
            Err(ParseError::InvalidNumber(_))
        ));
    }

    #[test]
    fn base_suffixes() {
        assert_eq!(UnitKind::DataSize.base_suffix(), "b");
        assert_eq!(UnitKind::ClockRate.base_suffix(), "Hz");
    }

    #[test]
    fn scaled_overflow_is_rejected() {
        assert_eq!(
            parse_data_size("99999999999GB"),
            Err(ParseError::OutOfRange("99999999999GB".into()))
        );
        assert!(matches!(
            parse_cpu_size("18446744073.8GHz"),
            Err(ParseError::OutOfRange(_))
        ));
        assert_eq!(parse_data_size("2147483647GiB"), Ok(18_446_744_065_119_617_024));
    }
}
