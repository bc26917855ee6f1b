//! Typed field values.
//!
//! This module provides [`TypedValue`], the decoded form of a single field,
//! and [`Number`], the numeric payload that remembers its canonical token.

use std::fmt;

use chrono::NaiveDate;

use crate::TypeTag;

/// A numeric field value (HL7 `NM`).
///
/// Holds the parsed `f64` together with the token it came from, so that
/// re-encoding reproduces the original text exactly (`"0711"` stays
/// `"0711"`, `"1.50"` stays `"1.50"`).
///
/// # Examples
///
/// ```
/// use hl7_types::Number;
///
/// let n = Number::parse("-12.50").unwrap();
/// assert_eq!(n.value(), -12.5);
/// assert_eq!(n.as_token(), "-12.50");
///
/// assert!(Number::parse("1e3").is_none());
/// assert_eq!(Number::from_f64(2.0).unwrap().as_token(), "2");
/// ```
///
/// With the `serde` feature a number serializes as its token, and
/// deserializing goes through [`Number::parse`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Number {
    value: f64,
    token: String,
}

impl Number {
    /// Parses a token in HL7 `NM` form: an optional leading sign followed by
    /// digits with at most one decimal point and at least one digit.
    ///
    /// Returns `None` for anything else, including exponents, `NaN`,
    /// infinities and surrounding whitespace, and for digit strings too long
    /// to fit in a finite `f64`.
    pub fn parse(token: &str) -> Option<Self> {
        if !is_nm_lexeme(token) {
            return None;
        }
        let value = token.parse::<f64>().ok().filter(|v| v.is_finite())?;
        Some(Self {
            value,
            token: token.to_string(),
        })
    }

    /// Creates a number from a finite `f64`.
    ///
    /// The token is the shortest decimal rendering without exponent or
    /// trailing zeros.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(Self {
            value,
            token: value.to_string(),
        })
    }

    /// Returns the numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the canonical token.
    pub fn as_token(&self) -> &str {
        &self.token
    }
}

/// Error returned when a string is not a valid `NM` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberParseError(pub String);

impl fmt::Display for NumberParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid NM number: '{}'", self.0)
    }
}

impl std::error::Error for NumberParseError {}

impl TryFrom<String> for Number {
    type Error = NumberParseError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Self::parse(&token).ok_or(NumberParseError(token))
    }
}

impl From<Number> for String {
    fn from(number: Number) -> Self {
        number.token
    }
}

fn is_nm_lexeme(token: &str) -> bool {
    let digits = token.strip_prefix(&['+', '-'][..]).unwrap_or(token);
    let mut seen_digit = false;
    let mut seen_point = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}

/// The decoded value of one composite field.
///
/// `Absent` is distinct from every populated value, including
/// `Number` zero and empty `Text`.
///
/// # Examples
///
/// ```
/// use hl7_types::{TypedValue, TypeTag};
///
/// let name = TypedValue::text("Doe");
/// assert_eq!(name.as_text(), Some("Doe"));
/// assert_eq!(name.type_tag(), Some(TypeTag::Text));
///
/// assert!(TypedValue::Absent.conforms_to(TypeTag::Date));
/// assert!(!name.conforms_to(TypeTag::Number));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypedValue {
    /// Text, kept verbatim.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Numeric value.
    Number(Number),
    /// Opaque text for sub-structures that are not modeled.
    Untyped(String),
    /// No value.
    Absent,
}

impl TypedValue {
    /// Creates a `Text` value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns the tag matching this value, or `None` for `Absent`.
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Self::Text(_) => Some(TypeTag::Text),
            Self::Date(_) => Some(TypeTag::Date),
            Self::Number(_) => Some(TypeTag::Number),
            Self::Untyped(_) => Some(TypeTag::Untyped),
            Self::Absent => None,
        }
    }

    /// Returns true if this value may be stored in a field declared as `tag`.
    pub fn conforms_to(&self, tag: TypeTag) -> bool {
        self.type_tag().map_or(true, |t| t == tag)
    }

    /// Returns true for `Absent`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns true if this value encodes to an empty token.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(s) | Self::Untyped(s) => s.is_empty(),
            Self::Date(_) | Self::Number(_) => false,
        }
    }

    /// Returns the text of a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the date of a `Date` value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the numeric payload of a `Number` value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n.value()),
            _ => None,
        }
    }

    /// Returns the stored text of an `Untyped` value.
    pub fn as_untyped(&self) -> Option<&str> {
        match self {
            Self::Untyped(s) => Some(s),
            _ => None,
        }
    }
}

impl From<NaiveDate> for TypedValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<Number> for TypedValue {
    fn from(number: Number) -> Self {
        Self::Number(number)
    }
}

impl<T: Into<TypedValue>> From<Option<T>> for TypedValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_accepts_nm_forms() {
        for token in ["0", "42", "-7", "+3", "0711", "1.50", ".5", "5.", "-0.25"] {
            let n = Number::parse(token).unwrap_or_else(|| panic!("rejected {token}"));
            assert_eq!(n.as_token(), token);
        }
        assert_eq!(Number::parse("0711").unwrap().value(), 711.0);
        assert_eq!(Number::parse(".5").unwrap().value(), 0.5);
    }

    #[test]
    fn test_number_rejects_non_nm() {
        for token in ["", "abc", "1e3", "NaN", "inf", "-", ".", "1.2.3", " 1", "1 ", "--1"] {
            assert!(Number::parse(token).is_none(), "accepted {token:?}");
        }
    }

    #[test]
    fn test_number_overflow_is_rejected() {
        let huge = "9".repeat(400);
        assert!(Number::parse(&huge).is_none());
        assert_eq!(
            Number::try_from(huge.clone()),
            Err(NumberParseError(huge))
        );
        assert!(Number::parse(&"9".repeat(300)).is_some());
    }

    #[test]
    fn test_number_from_f64() {
        assert_eq!(Number::from_f64(1.5).unwrap().as_token(), "1.5");
        assert_eq!(Number::from_f64(100.0).unwrap().as_token(), "100");
        assert_eq!(
            Number::from_f64(1e21).unwrap().as_token(),
            "1000000000000000000000"
        );
        assert!(Number::from_f64(f64::NAN).is_none());
        assert!(Number::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn test_absent_conforms_to_everything() {
        for tag in TypeTag::ALL {
            assert!(TypedValue::Absent.conforms_to(tag));
        }
        let date = TypedValue::from(NaiveDate::from_ymd_opt(2023, 10, 5).unwrap());
        assert!(date.conforms_to(TypeTag::Date));
        assert!(!date.conforms_to(TypeTag::Text));
    }

    #[test]
    fn test_is_empty() {
        assert!(TypedValue::Absent.is_empty());
        assert!(TypedValue::text("").is_empty());
        assert!(!TypedValue::text("x").is_empty());
        assert!(!TypedValue::from(Number::from_f64(0.0).unwrap()).is_empty());
    }

    #[test]
    fn test_from_option() {
        let none: Option<NaiveDate> = None;
        assert_eq!(TypedValue::from(none), TypedValue::Absent);
        let n = Number::parse("3").unwrap();
        assert_eq!(TypedValue::from(Some(n)).as_number(), Some(3.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let values = vec![
            TypedValue::text("Doe"),
            TypedValue::Date(NaiveDate::from_ymd_opt(2023, 10, 5).unwrap()),
            TypedValue::Number(Number::parse("0711").unwrap()),
            TypedValue::Untyped("20200101&20201231".to_string()),
            TypedValue::Absent,
        ];
        let json = serde_json::to_string(&values).unwrap();
        let parsed: Vec<TypedValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(values, parsed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_number_is_its_token() {
        let n = Number::parse("1.50").unwrap();
        assert_eq!(serde_json::to_string(&n).unwrap(), r#""1.50""#);

        let parsed: Number = serde_json::from_str(r#""0711""#).unwrap();
        assert_eq!(parsed.value(), 711.0);

        assert!(serde_json::from_str::<Number>(r#""abc""#).is_err());
        assert!(serde_json::from_str::<TypedValue>(r#"{"Number":"1e3"}"#).is_err());
    }
}
