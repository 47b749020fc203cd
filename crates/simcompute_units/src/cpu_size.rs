//! Processing capacity expressed as a clock rate in hertz.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::parse::{LiteralInput, ParseError, UnitKind, parse_quantity};

/// A processing capacity, stored in hertz.
///
/// Accepts literals such as `"56kHz"`, `"128 kHz"` or `"8KiHz"` (8192 Hz).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CpuSize(u64);

impl CpuSize {
    /// Creates a capacity from a count of hertz.
    #[must_use]
    pub const fn from_hz(hz: u64) -> Self {
        Self(hz)
    }

    /// Returns the capacity in hertz.
    #[must_use]
    pub const fn hz(&self) -> u64 {
        self.0
    }

    /// Parses a clock-rate literal.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the literal is malformed.
    pub fn parse(literal: &str) -> Result<Self, ParseError> {
        parse_quantity(literal, UnitKind::ClockRate).map(Self)
    }

    /// Builds a capacity from a configuration literal.
    ///
    /// # Panics
    ///
    /// Panics if `literal` cannot be parsed.
    #[must_use]
    pub fn from_literal(literal: &str) -> Self {
        match Self::parse(literal) {
            Ok(size) => size,
            Err(err) => panic!("could not parse cpu size '{literal}': {err}"),
        }
    }
}

impl From<u64> for CpuSize {
    fn from(hz: u64) -> Self {
        Self(hz)
    }
}

impl FromStr for CpuSize {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CpuSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, UnitKind::ClockRate.base_suffix())
    }
}

impl Serialize for CpuSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CpuSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        LiteralInput::deserialize(deserializer)?
            .resolve(UnitKind::ClockRate)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}
