//! Conversion between raw tokens and typed values.
//!
//! [`token_to_value`] and [`value_to_token`] are exact inverses on every
//! empty or well-formed token.

use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};
use hl7_types::{Number, TypeTag, TypedValue};

use crate::types::TokenError;

/// chrono format of an HL7 `DT` value at day precision.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Converts one token to a value of the declared type.
///
/// Empty tokens become `Text("")` for text fields and `Absent` for all
/// other types.
///
/// # Examples
///
/// ```
/// use hl7_codec::convert::token_to_value;
/// use hl7_types::{TypeTag, TypedValue};
///
/// let date = token_to_value("20231005", TypeTag::Date).unwrap();
/// assert_eq!(date.as_date().unwrap().to_string(), "2023-10-05");
///
/// assert_eq!(token_to_value("", TypeTag::Number).unwrap(), TypedValue::Absent);
/// assert!(token_to_value("abc", TypeTag::Number).is_err());
/// ```
pub fn token_to_value(token: &str, type_tag: TypeTag) -> Result<TypedValue, TokenError> {
    match type_tag {
        TypeTag::Text => Ok(TypedValue::Text(token.to_string())),
        _ if token.is_empty() => Ok(TypedValue::Absent),
        TypeTag::Date => parse_date(token).map(TypedValue::Date),
        TypeTag::Number => Number::parse(token)
            .map(TypedValue::Number)
            .ok_or_else(|| TokenError::InvalidNumber {
                token: token.to_string(),
            }),
        TypeTag::Untyped => Ok(TypedValue::Untyped(token.to_string())),
    }
}

/// Converts a value back to its canonical token.
///
/// # Examples
///
/// ```
/// use hl7_codec::convert::value_to_token;
/// use hl7_types::{NaiveDate, TypedValue};
///
/// let date = TypedValue::Date(NaiveDate::from_ymd_opt(987, 6, 5).unwrap());
/// assert_eq!(value_to_token(&date), "09870605");
/// assert_eq!(value_to_token(&TypedValue::Absent), "");
/// ```
pub fn value_to_token(value: &TypedValue) -> Cow<'_, str> {
    match value {
        TypedValue::Absent => Cow::Borrowed(""),
        TypedValue::Text(s) | TypedValue::Untyped(s) => Cow::Borrowed(s),
        TypedValue::Number(n) => Cow::Borrowed(n.as_token()),
        TypedValue::Date(d) => Cow::Owned(format_date(*d)),
    }
}

/// Parses a compact `YYYYMMDD` date.
pub fn parse_date(token: &str) -> Result<NaiveDate, TokenError> {
    let invalid = || TokenError::InvalidDate {
        token: token.to_string(),
    };

    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year: i32 = token[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = token[4..6].parse().map_err(|_| invalid())?;
    let day: u32 = token[6..8].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Formats a date as zero-padded `YYYYMMDD`.
///
/// Only dates accepted by [`is_encodable_date`] produce an eight-digit
/// token; chrono signs years outside `0..=9999`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Returns true if `date` has a four-digit year, so that its token parses
/// back with [`parse_date`].
pub fn is_encodable_date(date: NaiveDate) -> bool {
    (0..=9999).contains(&date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(token: &str, type_tag: TypeTag) -> String {
        let value = token_to_value(token, type_tag).unwrap();
        value_to_token(&value).into_owned()
    }

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(
            token_to_value("Doe", TypeTag::Text).unwrap(),
            TypedValue::text("Doe")
        );
        assert_eq!(
            token_to_value("", TypeTag::Text).unwrap(),
            TypedValue::text("")
        );
        assert_eq!(
            token_to_value(" padded ", TypeTag::Text).unwrap(),
            TypedValue::text(" padded ")
        );
    }

    #[test]
    fn test_date_parsing() {
        let value = token_to_value("20231005", TypeTag::Date).unwrap();
        assert_eq!(value.as_date(), NaiveDate::from_ymd_opt(2023, 10, 5));
        assert_eq!(token_to_value("", TypeTag::Date).unwrap(), TypedValue::Absent);
    }

    #[test]
    fn test_malformed_dates() {
        for token in ["2023100", "202310050", "2023-10-5", "20231305", "20230230", "abcdefgh", "+2023100"] {
            assert_eq!(
                parse_date(token),
                Err(TokenError::InvalidDate {
                    token: token.to_string()
                }),
                "accepted {token:?}"
            );
        }
    }

    #[test]
    fn test_leap_day() {
        assert!(parse_date("20240229").is_ok());
        assert!(parse_date("20230229").is_err());
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(
            token_to_value("42.5", TypeTag::Number).unwrap().as_number(),
            Some(42.5)
        );
        assert_eq!(
            token_to_value("", TypeTag::Number).unwrap(),
            TypedValue::Absent
        );
        assert_eq!(
            token_to_value("abc", TypeTag::Number),
            Err(TokenError::InvalidNumber {
                token: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_untyped_is_opaque() {
        assert_eq!(
            token_to_value("20200101&20201231", TypeTag::Untyped).unwrap(),
            TypedValue::Untyped("20200101&20201231".to_string())
        );
        assert_eq!(
            token_to_value("", TypeTag::Untyped).unwrap(),
            TypedValue::Absent
        );
    }

    #[test]
    fn test_left_inverse() {
        let cases: &[(TypeTag, &[&str])] = &[
            (TypeTag::Text, &["", "Doe", "O'Brien", " x "]),
            (TypeTag::Date, &["", "20231005", "00010101", "99991231"]),
            (TypeTag::Number, &["", "0", "0711", "1.50", "-3", "+4", ".5", "7."]),
            (TypeTag::Untyped, &["", "opaque", "a&b&c"]),
        ];
        for (type_tag, tokens) in cases {
            for token in *tokens {
                assert_eq!(roundtrip(token, *type_tag), *token, "{type_tag}: {token:?}");
            }
        }
    }

    #[test]
    fn test_date_encoding_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(5, 1, 9).unwrap();
        assert_eq!(format_date(date), "00050109");
        assert_eq!(value_to_token(&TypedValue::Date(date)), "00050109");
    }

    #[test]
    fn test_encodable_date_range() {
        for year in [0, 1, 2023, 9999] {
            let date = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            assert!(is_encodable_date(date), "{year}");
            assert_eq!(parse_date(&format_date(date)), Ok(date));
        }
        for year in [-5, -1, 10_000] {
            let date = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            assert!(!is_encodable_date(date), "{year}");
            assert!(parse_date(&format_date(date)).is_err());
        }
    }

    #[test]
    fn test_absent_never_renders_zero() {
        assert_eq!(value_to_token(&TypedValue::Absent), "");
    }
}
