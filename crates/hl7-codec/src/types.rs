//! Codec-specific error, configuration and statistics types.

use chrono::NaiveDate;
use hl7_types::{SchemaError, TypeTag};
use thiserror::Error;

use crate::tokenizer::COMPONENT_DELIMITER;

/// A single token could not be read as its declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token is not a valid `YYYYMMDD` calendar date.
    #[error("Invalid date: '{token}' (expected YYYYMMDD)")]
    InvalidDate {
        /// The offending token.
        token: String,
    },

    /// Token is not a valid HL7 `NM` number.
    #[error("Invalid number: '{token}'")]
    InvalidNumber {
        /// The offending token.
        token: String,
    },
}

/// A field of a composite could not be converted to its declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot convert field '{field}' (position {position}) to {type_tag}: {source}")]
pub struct ConversionError {
    /// Name of the field.
    pub field: String,
    /// Position of the field within the datatype.
    pub position: usize,
    /// The raw token.
    pub token: String,
    /// Declared type of the field.
    pub type_tag: TypeTag,
    /// What was wrong with the token.
    pub source: TokenError,
}

/// Errors that can occur while decoding, encoding or loading schemas.
#[derive(Error, Debug)]
pub enum Hl7Error {
    /// A token did not match its field's declared type.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The schema itself is invalid.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(#[from] SchemaError),

    /// Wrong number of values supplied for a schema.
    #[error("Arity mismatch for '{datatype}': expected {expected} values, found {found}")]
    ArityMismatch {
        /// Datatype name.
        datatype: String,
        /// Schema arity.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },

    /// A supplied value does not conform to its field's declared type.
    #[error("Field '{field}' of '{datatype}' is declared {expected}, got a {found} value")]
    ValueTypeMismatch {
        /// Datatype name.
        datatype: String,
        /// Field name.
        field: String,
        /// Declared type.
        expected: TypeTag,
        /// Type of the supplied value.
        found: TypeTag,
    },

    /// A supplied date has no eight-digit `YYYYMMDD` form.
    #[error("Field '{field}' of '{datatype}' holds {date}, outside years 0000-9999")]
    DateOutOfRange {
        /// Datatype name.
        datatype: String,
        /// Field name.
        field: String,
        /// The supplied date.
        date: NaiveDate,
    },

    /// No schema registered under this datatype name.
    #[error("Unknown datatype: {name}")]
    UnknownDatatype {
        /// The requested datatype name.
        name: String,
    },

    /// I/O error reading a schema table.
    #[error("IO error reading schema table: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error in a schema table.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Schema table file not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Invalid header - column count mismatch.
    #[error("Invalid header: expected {expected} columns, found {found}")]
    InvalidHeader {
        /// Expected column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// Unexpected column name.
    #[error("Unexpected column '{found}' at position {position}, expected '{expected}'")]
    UnexpectedColumn {
        /// The column position.
        position: usize,
        /// Expected column name.
        expected: String,
        /// Found column name.
        found: String,
    },

    /// Field position in a schema table is not an integer.
    #[error("Invalid field position '{value}' on line {line}")]
    InvalidPosition {
        /// The invalid value.
        value: String,
        /// Line in the table.
        line: u64,
    },

    /// Field type in a schema table is not recognized.
    #[error("Unknown field type '{value}' on line {line}")]
    UnknownTypeTag {
        /// The unrecognized type name.
        value: String,
        /// Line in the table.
        line: u64,
    },
}

/// Result type for codec operations.
pub type Hl7Result<T> = Result<T, Hl7Error>;

/// Configuration for batch decoding.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Delimiter between fields at this nesting level.
    pub delimiter: char,
    /// Number of inputs handed to the callback at once by
    /// [`decode_batched`](crate::decode_batched).
    pub batch_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            delimiter: COMPONENT_DELIMITER,
            batch_size: 10_000,
        }
    }
}

impl CodecConfig {
    /// Creates a config for a different delimiter (e.g. `&` for sub-components).
    pub fn with_delimiter(delimiter: char) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }
}

/// Statistics from decoding a batch of composites.
#[derive(Debug, Clone, Default)]
pub struct DecodeStats {
    /// Inputs seen.
    pub total: usize,
    /// Inputs decoded into records.
    pub decoded: usize,
    /// Inputs rejected with a conversion error.
    pub errors: usize,
    /// Inputs that carried more segments than the schema has fields.
    pub clipped: usize,
    /// Time taken to decode in milliseconds.
    pub decode_time_ms: u64,
}

impl DecodeStats {
    /// Returns the percentage of inputs that decoded successfully.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.decoded as f64 / self.total as f64) * 100.0
        }
    }

    pub(crate) fn merge(&mut self, other: &DecodeStats) {
        self.total += other.total;
        self.decoded += other.decoded;
        self.errors += other.errors;
        self.clipped += other.clipped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_config_default() {
        let config = CodecConfig::default();
        assert_eq!(config.delimiter, '^');
        assert_eq!(config.batch_size, 10_000);
    }

    #[test]
    fn test_codec_config_with_delimiter() {
        let config = CodecConfig::with_delimiter('&');
        assert_eq!(config.delimiter, '&');
        assert_eq!(config.batch_size, 10_000);
    }

    #[test]
    fn test_decode_stats_success_rate() {
        let stats = DecodeStats {
            total: 200,
            decoded: 150,
            errors: 50,
            ..Default::default()
        };
        assert!((stats.success_rate() - 75.0).abs() < 0.01);
        assert_eq!(DecodeStats::default().success_rate(), 0.0);
    }

    #[test]
    fn test_conversion_error_message() {
        let err = ConversionError {
            field: "country_code".to_string(),
            position: 4,
            token: "abc".to_string(),
            type_tag: TypeTag::Number,
            source: TokenError::InvalidNumber {
                token: "abc".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Cannot convert field 'country_code' (position 4) to Number: Invalid number: 'abc'"
        );
        assert_eq!(
            Hl7Error::from(err.clone()).to_string(),
            err.to_string()
        );
    }
}
