//! Trait Dictionary codec
//!
//! The Trait Dictionary is the delimited exchange format of a public trait
//! ontology registry: one row per variable, carrying the variable's own
//! fields followed by its trait, method and scale and a growing list of
//! `Category N` columns.
//!
//! ## Example
//!
//! ```text
//! "Variable ID";"Variable name";...;"Trait name";...;"Scale name";...;"Category 1"
//! "CO_360:0000045";"PH_M_cm";...;"Plant height";...;"cm";...;""
//! ```
//!
//! ## Modules
//!
//! - `parser`: text to flat records
//! - `serializer`: flat records to text
//! - `mapping`: flat records to and from the record model

pub mod mapping;
pub mod parser;
pub mod serializer;

use indexmap::IndexMap;

/// One dictionary row, keyed by column header
pub type FlatRecord = IndexMap<String, String>;

pub use mapping::{dictionary_headers, model_from_records, records_from_model};
pub use parser::{DictionaryParser, ParsedDictionary};
pub use serializer::DictionarySerializer;
