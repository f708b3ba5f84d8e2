//! Validation engine
//!
//! Checks required-field presence and uniqueness across the workbook
//! tables before a build proceeds. The rules are fixed per table.

pub mod engine;
pub mod rules;

pub use engine::{Validator, check_table};
pub use rules::{TABLE_RULES, TableRules};
