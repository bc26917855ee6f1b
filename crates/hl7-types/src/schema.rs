//! Composite datatype schemas.
//!
//! A [`Schema`] is the ordered field list of one composite datatype. It is
//! pure data: the codec reads it to know how many tokens to expect and how
//! to interpret each of them.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use crate::TypeTag;

/// Error type for invalid schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema declares no fields.
    Empty {
        /// Datatype name.
        datatype: String,
    },
    /// Two fields claim the same position.
    DuplicatePosition {
        /// Datatype name.
        datatype: String,
        /// The position declared more than once.
        position: usize,
    },
    /// Positions are not contiguous from zero.
    PositionGap {
        /// Datatype name.
        datatype: String,
        /// Position expected at this index.
        expected: usize,
        /// Position actually found.
        found: usize,
    },
    /// Two fields share a name.
    DuplicateName {
        /// Datatype name.
        datatype: String,
        /// The repeated field name.
        name: String,
    },
}

impl SchemaError {
    /// Returns the name of the datatype whose schema is invalid.
    pub fn datatype(&self) -> &str {
        match self {
            Self::Empty { datatype }
            | Self::DuplicatePosition { datatype, .. }
            | Self::PositionGap { datatype, .. }
            | Self::DuplicateName { datatype, .. } => datatype,
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { datatype } => write!(f, "schema '{}' has no fields", datatype),
            Self::DuplicatePosition { datatype, position } => {
                write!(f, "schema '{}' declares position {} more than once", datatype, position)
            }
            Self::PositionGap {
                datatype,
                expected,
                found,
            } => write!(
                f,
                "schema '{}' expected field position {}, found {}",
                datatype, expected, found
            ),
            Self::DuplicateName { datatype, name } => {
                write!(f, "schema '{}' declares field '{}' more than once", datatype, name)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// One field of a composite datatype.
///
/// # Examples
///
/// ```
/// use hl7_types::{FieldDescriptor, TypeTag};
///
/// const EFFECTIVE: FieldDescriptor = FieldDescriptor::new(11, "effective_date", TypeTag::Date);
/// assert_eq!(EFFECTIVE.name(), "effective_date");
/// assert_eq!(EFFECTIVE.position, 11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDescriptor {
    /// Zero-based position of the field within the datatype.
    pub position: usize,
    /// Field name.
    pub name: Cow<'static, str>,
    /// Declared type.
    pub type_tag: TypeTag,
}

impl FieldDescriptor {
    /// Creates a descriptor with a static name. Usable in `const` tables.
    pub const fn new(position: usize, name: &'static str, type_tag: TypeTag) -> Self {
        Self {
            position,
            name: Cow::Borrowed(name),
            type_tag,
        }
    }

    /// Creates a descriptor with an owned name, e.g. one read from a table.
    pub fn owned(position: usize, name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            position,
            name: Cow::Owned(name.into()),
            type_tag,
        }
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The ordered field list of one composite datatype.
///
/// Fields are kept sorted by position; positions run contiguously from zero
/// and the arity is the number of fields.
///
/// # Examples
///
/// ```
/// use hl7_types::{FieldDescriptor, Schema, TypeTag};
///
/// let schema = Schema::new(
///     "CQ",
///     vec![
///         FieldDescriptor::new(1, "units", TypeTag::Text),
///         FieldDescriptor::new(0, "quantity", TypeTag::Number),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(schema.arity(), 2);
/// assert_eq!(schema.fields()[0].name(), "quantity");
/// assert_eq!(schema.position_of("units"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    name: Cow<'static, str>,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Creates a validated schema. Fields may be supplied in any order.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        mut fields: Vec<FieldDescriptor>,
    ) -> Result<Self, SchemaError> {
        fields.sort_by_key(|f| f.position);
        let schema = Self {
            name: name.into(),
            fields,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Builds a schema from a static table without validating it.
    ///
    /// Only used for the built-in tables, which are checked by tests.
    pub(crate) fn from_static(name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            fields: fields.to_vec(),
        }
    }

    /// Checks the schema invariants: at least one field, positions
    /// `0..arity` each used exactly once in order, and unique names.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let datatype = || self.name.to_string();

        if self.fields.is_empty() {
            return Err(SchemaError::Empty {
                datatype: datatype(),
            });
        }

        let mut positions = HashSet::with_capacity(self.fields.len());
        let mut names = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !positions.insert(field.position) {
                return Err(SchemaError::DuplicatePosition {
                    datatype: datatype(),
                    position: field.position,
                });
            }
            if !names.insert(field.name()) {
                return Err(SchemaError::DuplicateName {
                    datatype: datatype(),
                    name: field.name().to_string(),
                });
            }
        }

        for (expected, field) in self.fields.iter().enumerate() {
            if field.position != expected {
                return Err(SchemaError::PositionGap {
                    datatype: datatype(),
                    expected,
                    found: field.position,
                });
            }
        }

        Ok(())
    }

    /// Returns the datatype name (e.g. `"XPN"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of fields.
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Returns the fields in position order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the field at `position`.
    pub fn field(&self, position: usize) -> Option<&FieldDescriptor> {
        self.fields.get(position)
    }

    /// Looks up a field by name.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the position of the named field.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.field_by_name(name).map(|f| f.position)
    }
}
