//! Schema lookup by datatype name.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use hl7_types::{well_known, Schema};
use tracing::debug;

use crate::record::CompositeRecord;
use crate::table::{read_schema_table, read_schema_table_from_path};
use crate::types::{Hl7Error, Hl7Result};

/// Registry of composite datatype schemas, keyed by datatype name.
///
/// # Example
///
/// ```
/// use hl7_codec::SchemaRegistry;
///
/// let registry = SchemaRegistry::well_known();
/// let name = registry.decode("XPN", "Doe^John^^^Dr", '^').unwrap();
/// assert_eq!(name.text("prefix"), Some("Dr"));
/// assert!(registry.decode("CWE", "x", '^').is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in `XPN`, `XCN` and `XTN` schemas.
    pub fn well_known() -> Self {
        let schemas = well_known::all()
            .into_iter()
            .map(|schema| (schema.name().to_string(), schema.clone()))
            .collect();
        Self { schemas }
    }

    /// Registers a schema, replacing and returning any previous schema with
    /// the same name.
    ///
    /// # Errors
    /// Returns [`Hl7Error::SchemaMismatch`] if the schema is invalid.
    pub fn register(&mut self, schema: Schema) -> Hl7Result<Option<Schema>> {
        schema.validate()?;
        debug!(datatype = schema.name(), arity = schema.arity(), "registering schema");
        Ok(self.schemas.insert(schema.name().to_string(), schema))
    }

    /// Registers every schema defined in a tab-delimited table.
    ///
    /// Returns the number of schemas registered.
    pub fn load_table_from_reader<R: Read>(&mut self, reader: R) -> Hl7Result<usize> {
        let schemas = read_schema_table(reader)?;
        self.register_all(schemas)
    }

    /// Registers every schema defined in a tab-delimited table file.
    pub fn load_table_from_path<P: AsRef<Path>>(&mut self, path: P) -> Hl7Result<usize> {
        let schemas = read_schema_table_from_path(path)?;
        self.register_all(schemas)
    }

    fn register_all(&mut self, schemas: Vec<Schema>) -> Hl7Result<usize> {
        let count = schemas.len();
        for schema in schemas {
            self.register(schema)?;
        }
        Ok(count)
    }

    /// Looks up a schema by datatype name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Returns true if a schema is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns the registered datatype names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if no schemas are registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Decodes `raw` using the schema registered under `datatype`.
    ///
    /// # Errors
    /// Returns [`Hl7Error::UnknownDatatype`] if no such schema exists, or
    /// any error from [`CompositeRecord::decode`].
    pub fn decode(
        &self,
        datatype: &str,
        raw: &str,
        delimiter: char,
    ) -> Hl7Result<CompositeRecord<'_>> {
        let schema = self.get(datatype).ok_or_else(|| Hl7Error::UnknownDatatype {
            name: datatype.to_string(),
        })?;
        CompositeRecord::decode(raw, delimiter, schema)
    }
}
