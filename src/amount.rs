//! Monetary amounts as exact decimals.
//!
//! Uses `rust_decimal` internally so sums never pick up floating-point
//! noise. The textual form accepted on import allows either a comma or a
//! dot as decimal separator.

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;
use std::sync::OnceLock;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+))(?:[eE]([+-]?[0-9]+))?$")
            .expect("number pattern is valid")
    })
}

/// An exact monetary amount.
///
/// The scale written in the source text is kept, so `"125,50"` displays as
/// `125.50` while still comparing equal to `125.5`.
///
/// # Examples
///
/// ```
/// use branchbooks::Amount;
///
/// let amount = Amount::parse_localized("125,50").unwrap();
/// assert_eq!(amount.to_string(), "125.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Wraps a `Decimal`.
    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Parses an amount that may use a comma as decimal separator.
    ///
    /// Only the first comma is replaced by a dot; the rest of the text must
    /// then be a plain number, optionally signed and with an exponent.
    /// Values `Decimal` cannot hold (beyond about 7.9e28, or needing more
    /// than 28 fractional digits) are rejected.
    pub fn parse_localized(raw: &str) -> Option<Self> {
        let normalized = raw.replacen(',', ".", 1);
        let caps = number_pattern().captures(&normalized)?;

        let mut mantissa = caps.get(1)?.as_str().trim_start_matches('+').to_string();
        if mantissa.ends_with('.') {
            mantissa.push('0');
        }
        if let Some(rest) = mantissa.strip_prefix("-.") {
            mantissa = format!("-0.{}", rest);
        } else if mantissa.starts_with('.') {
            mantissa.insert(0, '0');
        }

        let value = match caps.get(2) {
            Some(exp) => Decimal::from_scientific(&format!("{}e{}", mantissa, exp.as_str())).ok()?,
            None => Decimal::from_str(&mantissa).ok()?,
        };
        Some(Amount(value))
    }

    /// Returns the inner decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Formats the amount with a comma separator, as used in import files.
    pub fn to_localized(&self) -> String {
        self.0.to_string().replacen('.', ",", 1)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_localized_comma() {
        let a = Amount::parse_localized("125,50").unwrap();
        assert_eq!(a, Amount::from_str("125.5").unwrap());
        assert_eq!(a.to_string(), "125.50");
    }

    #[test]
    fn test_parse_localized_dot() {
        let a = Amount::parse_localized("99.95").unwrap();
        assert_eq!(a.to_string(), "99.95");
    }

    #[test]
    fn test_parse_localized_rejects_garbage() {
        assert!(Amount::parse_localized("abc").is_none());
        assert!(Amount::parse_localized("").is_none());
        assert!(Amount::parse_localized("12,5,0").is_none());
        assert!(Amount::parse_localized("1.2.3").is_none());
    }

    #[test]
    fn test_parse_localized_rejects_digit_separators() {
        assert!(Amount::parse_localized("1_000").is_none());
        assert!(Amount::parse_localized("1 000").is_none());
        assert!(Amount::parse_localized(" 5").is_none());
    }

    #[test]
    fn test_parse_localized_number_forms() {
        let parse = |s| Amount::parse_localized(s).unwrap();
        assert_eq!(parse("1e3"), Amount::from_str("1000").unwrap());
        assert_eq!(parse("2,5E-1"), Amount::from_str("0.25").unwrap());
        assert_eq!(parse("+7"), Amount::from_str("7").unwrap());
        assert_eq!(parse(".5"), Amount::from_str("0.5").unwrap());
        assert_eq!(parse("-,5"), Amount::from_str("-0.5").unwrap());
        assert_eq!(parse("5."), Amount::from_str("5").unwrap());
        assert_eq!(parse("-12,5"), Amount::from_str("-12.5").unwrap());
    }

    #[test]
    fn test_parse_localized_out_of_range() {
        assert!(Amount::parse_localized("100000000000000000000000000000").is_none());
        assert!(Amount::parse_localized("1e40").is_none());
        assert!(Amount::parse_localized("79228162514264337593543950335").is_some());
    }

    #[test]
    fn test_to_localized() {
        let a = Amount::parse_localized("125,50").unwrap();
        assert_eq!(a.to_localized(), "125,50");
        assert_eq!(Amount::from_str("7").unwrap().to_localized(), "7");
    }

    #[test]
    fn test_arithmetic() {
        let a = Amount::from_str("1.5").unwrap();
        let b = Amount::from_str("2.25").unwrap();

        assert_eq!((a + b).to_string(), "3.75");
        assert_eq!((b - a).to_string(), "0.75");
        assert_eq!(vec![a, b].into_iter().sum::<Amount>().to_string(), "3.75");
    }

    #[test]
    fn test_zero_constant() {
        assert!(Amount::ZERO.is_zero());
    }
}
