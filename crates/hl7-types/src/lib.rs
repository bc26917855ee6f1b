//! # hl7-types
//!
//! Schema and value types for HL7 v2.x composite datatypes.
//!
//! A composite datatype (an extended person name, a telephone number, ...)
//! is a fixed-arity list of fields joined by one delimiter character. This
//! crate describes such datatypes as data: a [`Schema`] lists the fields,
//! each with a declared [`TypeTag`], and a [`TypedValue`] holds the decoded
//! content of one field. Decoding and encoding live in `hl7-codec`.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!
//! ## Usage
//!
//! ```rust
//! use hl7_types::{well_known, FieldDescriptor, Schema, TypeTag, TypedValue};
//!
//! // Built-in datatypes
//! let xpn = well_known::xpn();
//! assert_eq!(xpn.arity(), 14);
//! assert_eq!(xpn.fields()[0].name(), "family_name");
//!
//! // Custom datatypes are declared as tables
//! let cq = Schema::new(
//!     "CQ",
//!     vec![
//!         FieldDescriptor::new(0, "quantity", TypeTag::Number),
//!         FieldDescriptor::new(1, "units", TypeTag::Text),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(cq.arity(), 2);
//!
//! assert!(TypedValue::Absent.is_empty());
//! ```

#![warn(missing_docs)]

mod schema;
mod type_tag;
mod value;
pub mod well_known;

// Re-export all public types at crate root
pub use chrono::NaiveDate;
pub use schema::{FieldDescriptor, Schema, SchemaError};
pub use type_tag::{TypeTag, TypeTagParseError};
pub use value::{Number, NumberParseError, TypedValue};
