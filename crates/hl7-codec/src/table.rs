//! Schema table reader.
//!
//! Datatype schemas can be supplied as tab-delimited tables, one row per
//! field:
//!
//! ```text
//! datatype	position	name	type
//! CQ	0	quantity	NM
//! CQ	1	units	ST
//! ```
//!
//! Rows may appear in any order; they are grouped by datatype and each group
//! becomes a validated [`Schema`].

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use hl7_types::{FieldDescriptor, Schema, TypeTag};
use tracing::{debug, info};

use crate::types::{Hl7Error, Hl7Result};

/// Expected columns in a schema table.
pub const SCHEMA_TABLE_COLUMNS: &[&str] = &["datatype", "position", "name", "type"];

/// Reads every schema defined in a table file.
///
/// # Errors
/// Returns an error if the file cannot be opened, has invalid headers, or
/// defines an invalid schema.
pub fn read_schema_table_from_path<P: AsRef<Path>>(path: P) -> Hl7Result<Vec<Schema>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Hl7Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let file = File::open(path)?;
    let schemas = read_schema_table(BufReader::new(file))?;
    info!(path = %path.display(), schemas = schemas.len(), "loaded schema table");
    Ok(schemas)
}

/// Reads every schema defined in a table, in order of first appearance.
///
/// # Examples
///
/// ```
/// use hl7_codec::table::read_schema_table;
///
/// let table = "datatype\tposition\tname\ttype\n\
///              CQ\t1\tunits\tST\n\
///              CQ\t0\tquantity\tNM\n";
/// let schemas = read_schema_table(table.as_bytes()).unwrap();
/// assert_eq!(schemas[0].name(), "CQ");
/// assert_eq!(schemas[0].fields()[0].name(), "quantity");
/// ```
pub fn read_schema_table<R: Read>(reader: R) -> Hl7Result<Vec<Schema>> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .quoting(false)
        .trim(csv::Trim::None)
        .from_reader(reader);

    check_header(csv_reader.headers()?)?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<FieldDescriptor>> = HashMap::new();

    let mut record = StringRecord::new();
    while csv_reader.read_record(&mut record)? {
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let line = record.position().map_or(0, |p| p.line());
        let datatype = record.get(0).unwrap_or("").trim();
        let field = parse_field(&record, line)?;

        if !groups.contains_key(datatype) {
            order.push(datatype.to_string());
        }
        groups.entry(datatype.to_string()).or_default().push(field);
    }

    let mut schemas = Vec::with_capacity(order.len());
    for name in order {
        let fields = groups.remove(&name).unwrap_or_default();
        debug!(datatype = %name, fields = fields.len(), "building schema from table");
        schemas.push(Schema::new(name, fields)?);
    }

    Ok(schemas)
}

fn parse_field(record: &StringRecord, line: u64) -> Hl7Result<FieldDescriptor> {
    let position = record.get(1).unwrap_or("").trim();
    let position = position
        .parse::<usize>()
        .map_err(|_| Hl7Error::InvalidPosition {
            value: position.to_string(),
            line,
        })?;

    let name = record.get(2).unwrap_or("").trim();

    let type_name = record.get(3).unwrap_or("");
    let type_tag = type_name
        .parse::<TypeTag>()
        .map_err(|_| Hl7Error::UnknownTypeTag {
            value: type_name.to_string(),
            line,
        })?;

    Ok(FieldDescriptor::owned(position, name, type_tag))
}

/// Checks the header row against [`SCHEMA_TABLE_COLUMNS`], ignoring a
/// leading UTF-8 BOM.
fn check_header(headers: &StringRecord) -> Hl7Result<()> {
    if headers.len() < SCHEMA_TABLE_COLUMNS.len() {
        return Err(Hl7Error::InvalidHeader {
            expected: SCHEMA_TABLE_COLUMNS.len(),
            found: headers.len(),
        });
    }

    let columns = SCHEMA_TABLE_COLUMNS.iter().zip(headers.iter()).enumerate();
    for (position, (&expected, found)) in columns {
        let found = found.trim_start_matches('\u{feff}');
        if found != expected {
            return Err(Hl7Error::UnexpectedColumn {
                position,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
    }
    Ok(())
}
