//! Occurrence attribute values (`minOccurs`, `maxOccurs`)
//!
//! Bounds are arbitrary-precision: a schema may legally write
//! `maxOccurs="100000000000000000000"`. Inside `xs:all` the grammar narrows
//! them to `0|1` and `1`.

use std::fmt;

use num_bigint::BigUint;
use serde::{Serialize, Serializer};

use crate::error::LexicalError;
use crate::names::collapse_whitespace;
use crate::validators::builtins::non_negative_integer;

/// Value of a `maxOccurs` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaxOccurs {
    /// A finite bound
    Bounded(BigUint),
    /// `unbounded`
    Unbounded,
}

impl MaxOccurs {
    /// The default bound of one
    pub fn one() -> Self {
        Self::Bounded(BigUint::from(1u8))
    }

    /// Check if this bound is `unbounded`
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Parse `unbounded` or a non-negative integer
    pub fn parse(value: &str) -> std::result::Result<Self, LexicalError> {
        if collapse_whitespace(value) == "unbounded" {
            return Ok(Self::Unbounded);
        }
        non_negative_integer(value)
            .map(Self::Bounded)
            .map_err(|_| LexicalError::new("a non-negative integer or 'unbounded'"))
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(n) => write!(f, "{}", n),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

impl Serialize for MaxOccurs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Non-negative integer restricted to 0 or 1
pub fn zero_or_one(value: &str) -> std::result::Result<BigUint, LexicalError> {
    match non_negative_integer(value) {
        Ok(n) if n <= BigUint::from(1u8) => Ok(n),
        _ => Err(LexicalError::new("0 or 1")),
    }
}

/// Non-negative integer restricted to 1
pub fn exactly_one(value: &str) -> std::result::Result<BigUint, LexicalError> {
    match non_negative_integer(value) {
        Ok(n) if n == BigUint::from(1u8) => Ok(n),
        _ => Err(LexicalError::new("1")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_occurs() {
        assert_eq!(MaxOccurs::parse(" unbounded "), Ok(MaxOccurs::Unbounded));
        assert_eq!(MaxOccurs::parse("+007"), Ok(MaxOccurs::Bounded(BigUint::from(7u8))));
        assert!(MaxOccurs::parse("Unbounded").is_err());
        assert!(MaxOccurs::parse("-1").is_err());
        assert_eq!(MaxOccurs::one().to_string(), "1");
        assert!(MaxOccurs::Unbounded.is_unbounded());
    }

    #[test]
    fn test_narrow_bounds() {
        assert_eq!(zero_or_one("0"), Ok(BigUint::from(0u8)));
        assert_eq!(zero_or_one("+01"), Ok(BigUint::from(1u8)));
        assert!(zero_or_one("2").is_err());
        assert_eq!(exactly_one("1"), Ok(BigUint::from(1u8)));
        assert!(exactly_one("0").is_err());
        assert!(exactly_one("unbounded").is_err());
    }
}
