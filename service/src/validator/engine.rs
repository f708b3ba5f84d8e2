//! Required-field and uniqueness checks over workbook tables

use super::rules::{TABLE_RULES, TableRules};
use crate::workbook::{Table, TraitWorkbook, sheet_row};
use indexmap::IndexMap;
use trait_ontology_core::error::{OntologyError, Result};
use tracing::{debug, warn};

/// Validates a [`TraitWorkbook`] before a build.
///
/// Validation stops at the first violation. Tables are checked in sheet
/// order, and within a table the required columns before the unique ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    force: bool,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self { force: false }
    }

    /// Skip every check when `force` is set
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Check every present table against its rules.
    ///
    /// # Errors
    ///
    /// Returns `RequiredField` or `DuplicateValue` for the first violation.
    pub fn validate(&self, workbook: &TraitWorkbook) -> Result<()> {
        if self.force {
            warn!("validation skipped (force)");
            return Ok(());
        }
        for rules in TABLE_RULES {
            if let Some(table) = workbook.get(rules.table) {
                check_table(table, rules)?;
            }
        }
        debug!("workbook passed validation");
        Ok(())
    }
}

/// Apply one table's rules
///
/// # Errors
///
/// Returns the first required-field or uniqueness violation.
pub fn check_table(table: &Table, rules: &TableRules) -> Result<()> {
    for field in rules.required {
        if let Some(index) = table.column(field).position(|v| v.is_none()) {
            return Err(OntologyError::RequiredField {
                table: table.kind.to_string(),
                row: sheet_row(index),
                field: (*field).to_string(),
            });
        }
    }

    for field in rules.unique {
        let mut seen: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (index, value) in table.column(field).enumerate() {
            if let Some(value) = value {
                seen.entry(value).or_default().push(sheet_row(index));
            }
        }
        if let Some((value, rows)) = seen.into_iter().find(|(_, rows)| rows.len() > 1) {
            return Err(OntologyError::DuplicateValue {
                table: table.kind.to_string(),
                field: (*field).to_string(),
                value: value.to_string(),
                rows,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trait_ontology_core::schema::TableKind;

    fn workbook(kind: TableKind, rows: &[&[&str]]) -> TraitWorkbook {
        let mut wb = TraitWorkbook::new();
        wb.insert(Table::from_grid(
            kind,
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        ));
        wb
    }

    #[test]
    fn test_duplicate_trait_name() {
        let wb = workbook(
            TableKind::Traits,
            &[
                &["Trait name", "Trait class"],
                &["Height", "Agronomic"],
                &["Yield", "Agronomic"],
                &["Height", "Agronomic"],
            ],
        );
        let err = Validator::new().validate(&wb).unwrap_err();
        match err {
            OntologyError::DuplicateValue { field, value, rows, .. } => {
                assert_eq!(field, "Trait name");
                assert_eq!(value, "Height");
                assert_eq!(rows, vec![2, 4]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_required_reports_row() {
        let wb = workbook(
            TableKind::Variables,
            &[
                &["Variable name", "Trait name", "Method name", "Scale name"],
                &["V1", "Height", "Ruler", "cm"],
                &["V2", "Height", "Ruler", ""],
            ],
        );
        let err = Validator::new().validate(&wb).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("row 3"));
        assert!(err.to_string().contains("Scale name"));

        assert!(Validator::new().with_force(true).validate(&wb).is_ok());
    }

    #[test]
    fn test_distinct_values_pass() {
        let wb = workbook(
            TableKind::Methods,
            &[&["Method ID", "Method name"], &["1", "Ruler"], &["", "Visual"]],
        );
        assert!(Validator::new().validate(&wb).is_ok());
    }
}
