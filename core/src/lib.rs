//! # Trait Ontology Core
//!
//! Record model and shared building blocks for converting crop trait
//! ontologies between the Trait Workbook, the Trait Dictionary and OBO.
//!
//! ## Design Principles
//!
//! - **Name-keyed joins**: variables reference traits, methods and scales by
//!   name; lookups go through a [`types::ModelIndex`] built once per run
//! - **Explicit run state**: configuration and the category column count are
//!   values passed around, never globals
//! - **Recoverable findings are data**: unresolved references and name
//!   conflicts are [`diagnostics::Diagnostics`], not errors

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Core error types for conversion runs
pub mod error;

/// Column headers and table identities
pub mod schema;

/// Identifier normalisation and synthesis
pub mod ids;

/// Scale categories and the category column accumulator
pub mod category;

/// Unresolved references and name conflicts
pub mod diagnostics;

/// Record model
pub mod types;

/// Run configuration
pub mod config;

pub use category::{Categories, CategoryWidth, ScaleCategory};
pub use config::ConverterConfig;
pub use diagnostics::{Diagnostics, ForeignKey, Mismatch, NameConflict};
pub use error::{OntologyError, Result};
pub use schema::TableKind;
pub use types::{
    Method, ModelIndex, OntologyModel, Record, Resolved, Root, Scale, Trait, TraitClass, Variable,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ConverterConfig;
    pub use crate::error::{OntologyError, Result};
    pub use crate::schema::TableKind;
    pub use crate::types::*;
}
