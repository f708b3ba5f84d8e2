//! # Trait Ontology
//!
//! Converts crop trait ontologies between three formats:
//!
//! - the **Trait Workbook**, a six-sheet spreadsheet curators edit,
//! - the **Trait Dictionary**, the `;`-delimited exchange format of the
//!   public ontology registry,
//! - **OBO**, the text format loaded into breeding databases.
//!
//! Every conversion parses its input into the shared record model of
//! [`trait_ontology_core`], optionally validates it, and serializes it again.
//!
//! ## Quick Start
//!
//! ```rust
//! use trait_ontology_core::ConverterConfig;
//! use trait_ontology_service::obo::OboWriter;
//! use trait_ontology_service::workbook::{WorkbookReader, WorkbookWriter};
//!
//! let text = "\"Variable name\";\"Trait name\";\"Method name\";\"Scale name\"\n\
//!             \"PH_cm\";\"Plant height\";\"Ruler\";\"cm\"\n";
//! let mut config = ConverterConfig::default();
//! config.root.id = Some("CO_360".to_string());
//!
//! let tables = trait_ontology_service::pipeline::convert_dictionary_text(text, &config)?;
//! let model = WorkbookReader::new().read(&tables.workbook)?;
//! let obo = OboWriter::new(trait_ontology_service::pipeline::now()).write(&model)?;
//! assert!(obo.text.contains("relationship: variable_of CO_360:"));
//! # Ok::<(), trait_ontology_core::OntologyError>(())
//! ```
//!
//! ## Modules
//!
//! - [`dictionary`]: Trait Dictionary codec
//! - [`workbook`]: Trait Workbook codec and xlsx medium
//! - [`obo`]: OBO serializer and namespace rewrite
//! - [`validator`]: required-field and uniqueness checks
//! - [`fetch`]: remote dictionary retrieval
//! - [`pipeline`]: the three conversion commands
//! - [`cli`]: command-line front end

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]

/// Trait Dictionary codec
pub mod dictionary;

/// Trait Workbook codec
pub mod workbook;

/// OBO codec
pub mod obo;

/// Validation engine
pub mod validator;

/// Remote dictionary retrieval
pub mod fetch;

/// Conversion commands
pub mod pipeline;

/// Command-line interface
pub mod cli;

pub use fetch::{DictionaryFetcher, HttpFetcher};
pub use pipeline::{DictionarySource, WorkbookConversion};
pub use trait_ontology_core::{ConverterConfig, OntologyError, Result};
