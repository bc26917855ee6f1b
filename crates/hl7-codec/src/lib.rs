//! # hl7-codec
//!
//! Decoder and canonical encoder for HL7 v2.x composite datatypes.
//!
//! A composite field such as `Doe^John^^^Dr` is split on its delimiter into
//! exactly as many tokens as its [`Schema`](hl7_types::Schema) has fields,
//! each token is converted to the field's declared type, and the result is
//! a [`CompositeRecord`]. Encoding reverses the process and omits trailing
//! empty fields, so re-decoding the canonical form always yields the same
//! record.
//!
//! ## Features
//!
//! - `parallel` (default): Batch decoding spreads work across threads via rayon.
//!
//! ## Usage
//!
//! ```rust
//! use hl7_codec::{CompositeRecord, Hl7Error};
//! use hl7_types::well_known;
//!
//! let phone = CompositeRecord::decode("^WPN^PH^^49^0711^5551234", '^', well_known::xtn()).unwrap();
//! assert_eq!(phone.number("area_city_code"), Some(711.0));
//! assert_eq!(phone.to_string(), "^WPN^PH^^49^0711^5551234");
//!
//! let err = CompositeRecord::decode("^WPN^PH^^abc", '^', well_known::xtn()).unwrap_err();
//! assert!(matches!(err, Hl7Error::Conversion(_)));
//! ```

#![warn(missing_docs)]

mod batch;
pub mod convert;
mod record;
mod registry;
pub mod table;
pub mod tokenizer;
mod types;

pub use batch::{decode_all, decode_batch, decode_batched};
pub use record::CompositeRecord;
pub use registry::SchemaRegistry;
pub use tokenizer::COMPONENT_DELIMITER;
pub use types::{
    CodecConfig, ConversionError, DecodeStats, Hl7Error, Hl7Result, TokenError,
};

// Re-export hl7-types for convenience
pub use hl7_types;
