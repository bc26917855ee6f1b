//! Decoded composite records.

use std::fmt;

use chrono::NaiveDate;
use hl7_types::{FieldDescriptor, Schema, TypedValue};
use tracing::trace;

use crate::convert::{is_encodable_date, token_to_value, value_to_token};
use crate::tokenizer::{join, split_counted, COMPONENT_DELIMITER};
use crate::types::{ConversionError, Hl7Error, Hl7Result};

/// One decoded occurrence of a composite datatype.
///
/// Holds exactly one [`TypedValue`] per schema field, in position order.
/// A record is built whole by [`decode`](Self::decode) or
/// [`from_values`](Self::from_values) and is not mutated afterwards.
///
/// # Examples
///
/// ```
/// use hl7_codec::CompositeRecord;
/// use hl7_types::well_known;
///
/// let raw = "1234^Doe^John^^^Dr^^^^^L^^^^^^^^^^^";
/// let record = CompositeRecord::decode(raw, '^', well_known::xcn()).unwrap();
///
/// assert_eq!(record.len(), 23);
/// assert_eq!(record.text("family_name"), Some("Doe"));
/// assert_eq!(record.encode('^'), "1234^Doe^John^^^Dr^^^^^L");
/// assert_eq!(record.to_string(), "1234^Doe^John^^^Dr^^^^^L");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRecord<'s> {
    schema: &'s Schema,
    values: Vec<TypedValue>,
}

impl<'s> CompositeRecord<'s> {
    /// Decodes `raw` against `schema`.
    ///
    /// Short input is padded with empty fields and excess segments are
    /// dropped, so the record always has `schema.arity()` values.
    ///
    /// # Errors
    /// Returns [`Hl7Error::SchemaMismatch`] if the schema is invalid and
    /// [`Hl7Error::Conversion`] if a token does not match its declared type.
    pub fn decode(raw: &str, delimiter: char, schema: &'s Schema) -> Hl7Result<Self> {
        schema.validate()?;
        Self::decode_validated(raw, delimiter, schema).map(|(record, _)| record)
    }

    /// Decodes against a schema that has already been validated, returning
    /// the record and the number of dropped excess segments.
    pub(crate) fn decode_validated(
        raw: &str,
        delimiter: char,
        schema: &'s Schema,
    ) -> Hl7Result<(Self, usize)> {
        let (tokens, clipped) = split_counted(raw, delimiter, schema.arity());

        let values = schema
            .fields()
            .iter()
            .zip(tokens)
            .map(|(field, token)| {
                token_to_value(token, field.type_tag).map_err(|source| ConversionError {
                    field: field.name().to_string(),
                    position: field.position,
                    token: token.to_string(),
                    type_tag: field.type_tag,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        trace!(datatype = schema.name(), clipped, "decoded composite");

        Ok((Self { schema, values }, clipped))
    }

    /// Builds a record from values listed in position order.
    ///
    /// # Errors
    /// Returns [`Hl7Error::ArityMismatch`] if the number of values differs
    /// from the arity, [`Hl7Error::ValueTypeMismatch`] if a value does not
    /// conform to its field's declared type, and
    /// [`Hl7Error::DateOutOfRange`] for a date outside years 0000-9999.
    pub fn from_values(schema: &'s Schema, values: Vec<TypedValue>) -> Hl7Result<Self> {
        schema.validate()?;

        if values.len() != schema.arity() {
            return Err(Hl7Error::ArityMismatch {
                datatype: schema.name().to_string(),
                expected: schema.arity(),
                found: values.len(),
            });
        }

        for (field, value) in schema.fields().iter().zip(&values) {
            if let Some(found) = value.type_tag().filter(|t| *t != field.type_tag) {
                return Err(Hl7Error::ValueTypeMismatch {
                    datatype: schema.name().to_string(),
                    field: field.name().to_string(),
                    expected: field.type_tag,
                    found,
                });
            }
            if let TypedValue::Date(date) = value {
                if !is_encodable_date(*date) {
                    return Err(Hl7Error::DateOutOfRange {
                        datatype: schema.name().to_string(),
                        field: field.name().to_string(),
                        date: *date,
                    });
                }
            }
        }

        Ok(Self { schema, values })
    }

    /// Encodes the record in canonical form, omitting trailing empty fields.
    ///
    /// Text is written verbatim; no HL7 escape sequences are applied. A
    /// `Text` or `Untyped` value that itself contains `delimiter` therefore
    /// does not survive re-decoding: an embedded delimiter shifts the fields
    /// after it and a trailing one is stripped with the empty fields.
    /// Records produced by [`decode`](Self::decode) with the same delimiter
    /// never contain it.
    pub fn encode(&self, delimiter: char) -> String {
        join(self.values.iter().map(value_to_token), delimiter)
    }

    /// Returns the schema this record was decoded against.
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Returns the number of fields (always the schema arity).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if every field is absent or empty text.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(TypedValue::is_empty)
    }

    /// Returns all values in position order.
    pub fn values(&self) -> &[TypedValue] {
        &self.values
    }

    /// Consumes the record, returning its values.
    pub fn into_values(self) -> Vec<TypedValue> {
        self.values
    }

    /// Returns the value at `position`.
    pub fn value(&self, position: usize) -> Option<&TypedValue> {
        self.values.get(position)
    }

    /// Returns the value of the named field.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.schema
            .position_of(name)
            .and_then(|position| self.value(position))
    }

    /// Returns the named field's text, if it is a `Text` value.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TypedValue::as_text)
    }

    /// Returns the named field's date, if it is a `Date` value.
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(TypedValue::as_date)
    }

    /// Returns the named field's number, if it is a `Number` value.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(TypedValue::as_number)
    }

    /// Iterates over `(field, value)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (&'s FieldDescriptor, &TypedValue)> + '_ {
        self.schema.fields().iter().zip(self.values.iter())
    }
}

impl fmt::Display for CompositeRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(COMPONENT_DELIMITER))
    }
}
