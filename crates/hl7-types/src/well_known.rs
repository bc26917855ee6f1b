//! Built-in HL7 v2.5.1 composite datatype schemas.
//!
//! The field tables are plain data; [`xpn`], [`xcn`] and [`xtn`] return
//! process-wide [`Schema`] instances built from them on first use.
//!
//! # Examples
//!
//! ```
//! use hl7_types::{well_known, TypeTag};
//!
//! let xtn = well_known::xtn();
//! assert_eq!(xtn.name(), "XTN");
//! assert_eq!(xtn.arity(), 12);
//! assert_eq!(xtn.field_by_name("country_code").unwrap().type_tag, TypeTag::Number);
//! ```

use std::sync::OnceLock;

use crate::TypeTag::{Date, Number, Text, Untyped};
use crate::{FieldDescriptor, Schema};

// =============================================================================
// XPN - Extended Person Name
// =============================================================================

/// Field table of `XPN` (14 fields).
pub const XPN_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(0, "family_name", Text),
    FieldDescriptor::new(1, "given_name", Text),
    FieldDescriptor::new(2, "second_and_further_given_names", Text),
    FieldDescriptor::new(3, "suffix", Text),
    FieldDescriptor::new(4, "prefix", Text),
    FieldDescriptor::new(5, "degree", Text),
    FieldDescriptor::new(6, "name_type_code", Text),
    FieldDescriptor::new(7, "name_representation_code", Text),
    FieldDescriptor::new(8, "name_context", Text),
    // DR sub-structure, not decoded
    FieldDescriptor::new(9, "name_validity_range", Untyped),
    FieldDescriptor::new(10, "name_assembly_order", Text),
    FieldDescriptor::new(11, "effective_date", Date),
    FieldDescriptor::new(12, "expiration_date", Date),
    FieldDescriptor::new(13, "professional_suffix", Text),
];

// =============================================================================
// XCN - Extended Composite ID Number and Name for Persons
// =============================================================================

/// Field table of `XCN` (23 fields).
pub const XCN_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(0, "id_number", Text),
    FieldDescriptor::new(1, "family_name", Text),
    FieldDescriptor::new(2, "given_name", Text),
    FieldDescriptor::new(3, "second_and_further_given_names", Text),
    FieldDescriptor::new(4, "suffix", Text),
    FieldDescriptor::new(5, "prefix", Text),
    FieldDescriptor::new(6, "degree", Text),
    FieldDescriptor::new(7, "source_table", Text),
    FieldDescriptor::new(8, "assigning_authority", Text),
    FieldDescriptor::new(9, "name_type_code", Text),
    FieldDescriptor::new(10, "identifier_check_digit", Text),
    FieldDescriptor::new(11, "check_digit_scheme", Text),
    FieldDescriptor::new(12, "identifier_type_code", Text),
    FieldDescriptor::new(13, "assigning_facility", Text),
    FieldDescriptor::new(14, "name_representation_code", Text),
    FieldDescriptor::new(15, "name_context", Text),
    FieldDescriptor::new(16, "name_validity_range", Untyped),
    FieldDescriptor::new(17, "name_assembly_order", Text),
    FieldDescriptor::new(18, "effective_date", Date),
    FieldDescriptor::new(19, "expiration_date", Date),
    FieldDescriptor::new(20, "professional_suffix", Text),
    FieldDescriptor::new(21, "assigning_jurisdiction", Text),
    FieldDescriptor::new(22, "assigning_agency_or_department", Text),
];

// =============================================================================
// XTN - Extended Telecommunication Number
// =============================================================================

/// Field table of `XTN` (12 fields).
pub const XTN_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new(0, "telephone_number", Text),
    FieldDescriptor::new(1, "telecommunication_use_code", Text),
    FieldDescriptor::new(2, "telecommunication_equipment_type", Text),
    FieldDescriptor::new(3, "email_address", Text),
    FieldDescriptor::new(4, "country_code", Number),
    FieldDescriptor::new(5, "area_city_code", Number),
    FieldDescriptor::new(6, "local_number", Number),
    FieldDescriptor::new(7, "extension", Number),
    FieldDescriptor::new(8, "any_text", Text),
    FieldDescriptor::new(9, "extension_prefix", Text),
    FieldDescriptor::new(10, "speed_dial_code", Text),
    FieldDescriptor::new(11, "unformatted_telephone_number", Text),
];

/// Extended Person Name.
pub fn xpn() -> &'static Schema {
    static XPN: OnceLock<Schema> = OnceLock::new();
    XPN.get_or_init(|| Schema::from_static("XPN", XPN_FIELDS))
}

/// Extended Composite ID Number and Name for Persons.
pub fn xcn() -> &'static Schema {
    static XCN: OnceLock<Schema> = OnceLock::new();
    XCN.get_or_init(|| Schema::from_static("XCN", XCN_FIELDS))
}

/// Extended Telecommunication Number.
pub fn xtn() -> &'static Schema {
    static XTN: OnceLock<Schema> = OnceLock::new();
    XTN.get_or_init(|| Schema::from_static("XTN", XTN_FIELDS))
}

/// Returns every built-in schema.
pub fn all() -> [&'static Schema; 3] {
    [xpn(), xcn(), xtn()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_schemas_are_valid() {
        for schema in all() {
            assert_eq!(schema.validate(), Ok(()), "{} is invalid", schema.name());
        }
    }

    #[test]
    fn test_arities() {
        assert_eq!(xpn().arity(), 14);
        assert_eq!(xcn().arity(), 23);
        assert_eq!(xtn().arity(), 12);
    }

    #[test]
    fn test_declared_types() {
        assert_eq!(xcn().field(16).unwrap().type_tag, Untyped);
        assert_eq!(xcn().field(18).unwrap().type_tag, Date);
        assert_eq!(xpn().field_by_name("expiration_date").unwrap().position, 12);
        let numeric: Vec<&str> = xtn()
            .fields()
            .iter()
            .filter(|f| f.type_tag == Number)
            .map(|f| f.name())
            .collect();
        assert_eq!(
            numeric,
            vec!["country_code", "area_city_code", "local_number", "extension"]
        );
    }

    #[test]
    fn test_schemas_are_shared() {
        assert!(std::ptr::eq(xcn(), xcn()));
    }
}
