//! Declared field types.
//!
//! Every field of a composite datatype carries exactly one [`TypeTag`],
//! fixed when its schema is defined and never inferred from data.

use std::fmt;
use std::str::FromStr;

/// Error returned when a type name cannot be parsed into a [`TypeTag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTagParseError(pub String);

impl fmt::Display for TypeTagParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field type: '{}'", self.0)
    }
}

impl std::error::Error for TypeTagParseError {}

/// Declared type of a composite datatype field.
///
/// # Examples
///
/// ```
/// use hl7_types::TypeTag;
///
/// assert_eq!("Date".parse::<TypeTag>(), Ok(TypeTag::Date));
/// assert_eq!("NM".parse::<TypeTag>(), Ok(TypeTag::Number));
/// assert_eq!(TypeTag::Untyped.as_str(), "Untyped");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeTag {
    /// Free text, kept verbatim.
    Text,
    /// Calendar date in compact `YYYYMMDD` form.
    Date,
    /// Numeric value (HL7 `NM`).
    Number,
    /// Sub-structure that is not modeled; carried through unchanged.
    Untyped,
}

impl TypeTag {
    /// All tags, in declaration order.
    pub const ALL: [TypeTag; 4] = [Self::Text, Self::Date, Self::Number, Self::Untyped];

    /// Returns the canonical name of this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Date => "Date",
            Self::Number => "Number",
            Self::Untyped => "Untyped",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = TypeTagParseError;

    /// Accepts the canonical tag names as well as the HL7 datatype codes
    /// that map onto them. Matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TEXT" | "STRING" | "ST" | "ID" | "IS" | "TX" | "FT" => Ok(Self::Text),
            "DATE" | "DT" => Ok(Self::Date),
            "NUMBER" | "NM" => Ok(Self::Number),
            "UNTYPED" | "OBJECT" | "DR" => Ok(Self::Untyped),
            _ => Err(TypeTagParseError(s.to_string())),
        }
    }
}
