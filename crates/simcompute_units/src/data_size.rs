//! Data sizes expressed in bits.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::parse::{LiteralInput, ParseError, UnitKind, parse_quantity};

/// An amount of data, stored in bits.
///
/// Constructed from a count of bits or from a literal such as `"128KiB"` or
/// `"1.5 Mb"`. See [`parse_data_size`](crate::parse_data_size) for the
/// recognised suffixes.
///
/// Formatting always writes the base unit, so `"1kb"` displays as `"1000b"`.
///
/// # Example
///
/// ```
/// use simcompute_units::DataSize;
///
/// let size: DataSize = "1KiB".parse().unwrap();
/// assert_eq!(size.bits(), 8192);
/// assert_eq!(size.to_string(), "8192b");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DataSize(u64);

impl DataSize {
    /// Creates a size from a count of bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the size in bits.
    #[must_use]
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Parses a literal, returning an error on malformed input.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the literal is empty, has a malformed
    /// number, or uses an unknown suffix.
    pub fn parse(literal: &str) -> Result<Self, ParseError> {
        parse_quantity(literal, UnitKind::DataSize).map(Self)
    }

    /// Builds a size from a configuration literal.
    ///
    /// Use this where a malformed literal means the configuration itself is
    /// broken. For recoverable parsing use [`str::parse`] instead.
    ///
    /// # Panics
    ///
    /// Panics if `literal` cannot be parsed.
    #[must_use]
    pub fn from_literal(literal: &str) -> Self {
        match Self::parse(literal) {
            Ok(size) => size,
            Err(err) => panic!("could not parse data size '{literal}': {err}"),
        }
    }
}

impl From<u64> for DataSize {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl FromStr for DataSize {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DataSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, UnitKind::DataSize.base_suffix())
    }
}

impl Serialize for DataSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DataSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        LiteralInput::deserialize(deserializer)?
            .resolve(UnitKind::DataSize)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}
