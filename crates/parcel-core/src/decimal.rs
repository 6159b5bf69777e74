// crates/parcel-core/src/decimal.rs
//
// Exact decimal backed by `rust_decimal::Decimal`, encoded on the wire as its
// canonical text so digits and scale survive every round-trip.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParcelError;

/// A decimal that keeps its exact digit sequence and scale.
///
/// Equality includes scale: `12.50` and `12.5` are different values here,
/// because they are different payloads on the wire.
#[derive(Clone, Copy, Debug)]
pub struct ExactDecimal(Decimal);

impl ExactDecimal {
    /// Parse decimal text, refusing anything that cannot be held exactly.
    ///
    /// Text with more significant digits than the backing type holds, or a
    /// spelling that would not re-encode to the same text (`+1.0`, `012.5`,
    /// `.5`), is a marshalling error rather than a silently rounded value.
    ///
    /// Negative zero (`-0`, `-0.00`) is rejected too: it re-encodes without
    /// its sign, so it cannot round-trip as the same text. Send `0.00`.
    pub fn parse(text: &str) -> Result<Self, ParcelError> {
        let value = Decimal::from_str_exact(text).map_err(|e| {
            ParcelError::Marshalling(format!("decimal `{}` is not exactly representable: {}", text, e))
        })?;
        if value.to_string() != text {
            return Err(ParcelError::Marshalling(format!(
                "decimal `{}` is not in canonical form (would re-encode as `{}`)",
                text, value
            )));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn inner(self) -> Decimal {
        self.0
    }

    /// Number of digits after the decimal point.
    pub fn scale(&self) -> u32 {
        self.0.scale()
    }
}

impl PartialEq for ExactDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.0.scale() == other.0.scale()
    }
}

impl Eq for ExactDecimal {}

impl Hash for ExactDecimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.mantissa().hash(state);
        self.0.scale().hash(state);
    }
}

impl From<Decimal> for ExactDecimal {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for ExactDecimal {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl fmt::Display for ExactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ExactDecimal {
    type Err = ParcelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ExactDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for ExactDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_survives_json_roundtrip() {
        let amount = ExactDecimal::parse("12.50").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"12.50\"");

        let back: ExactDecimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), "12.50");
        assert_eq!(back.scale(), 2);
        assert_eq!(back, amount);
    }

    #[test]
    fn test_equality_includes_scale() {
        let a = ExactDecimal::parse("12.50").unwrap();
        let b = ExactDecimal::parse("12.5").unwrap();
        assert_eq!(a.inner(), b.inner(), "numerically equal");
        assert_ne!(a, b, "but not the same payload");
    }

    #[test]
    fn test_excess_precision_is_rejected() {
        // 29 fractional digits, one more than the backing type can hold.
        let err = ExactDecimal::parse("0.12345678901234567890123456789").unwrap_err();
        assert!(matches!(err, ParcelError::Marshalling(_)));
    }

    #[test]
    fn test_non_canonical_text_is_rejected() {
        for text in ["012.5", "+1.0", ".5"] {
            let result = ExactDecimal::parse(text);
            assert!(result.is_err(), "{} should be rejected", text);
        }
    }

    #[test]
    fn test_negative_zero_is_rejected_but_zero_is_not() {
        for text in ["-0", "-0.00"] {
            let err = ExactDecimal::parse(text).unwrap_err();
            assert!(matches!(err, ParcelError::Marshalling(_)), "{} should be rejected", text);
        }

        let zero = ExactDecimal::parse("0.00").unwrap();
        assert_eq!(zero.to_string(), "0.00");
        assert_eq!(zero.scale(), 2);
        assert_eq!(ExactDecimal::parse("-1.50").unwrap().to_string(), "-1.50");
    }

    #[test]
    fn test_non_string_wire_value_is_rejected() {
        let result: Result<ExactDecimal, _> = serde_json::from_str("12.5");
        assert!(result.is_err(), "binary float must never become a decimal");
    }

    #[test]
    fn test_large_values_keep_every_digit() {
        let text = "123456789012345678.9012345678";
        let d = ExactDecimal::parse(text).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        let back: ExactDecimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), text);
    }
}
