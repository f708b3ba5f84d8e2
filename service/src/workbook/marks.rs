//! Duplicate and dangling-reference markers for workbook columns
//!
//! The markers are plain data; the xlsx adapter turns them into cell
//! highlighting.

use super::table::{Table, TraitWorkbook};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use trait_ontology_core::schema::{self, TableKind};

/// Why a cell is flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkKind {
    /// The value occurs in more than one row of a column expected unique
    Duplicate,
    /// The value names a record missing from the referenced table
    Dangling,
}

/// Flagged cells of one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMarks {
    pub table: TableKind,
    pub column: String,
    /// Position of the column in the table's header
    pub column_index: usize,
    pub kind: MarkKind,
    /// Flagged values
    pub values: BTreeSet<String>,
    /// Data row indices (0-based, header excluded) holding a flagged value
    pub rows: BTreeSet<usize>,
}

/// Columns checked for repeated values
const DUPLICATE_COLUMNS: &[(TableKind, &str)] = &[
    (TableKind::Variables, schema::VARIABLE_ID),
    (TableKind::Variables, schema::VARIABLE_NAME),
    (TableKind::Variables, schema::VARIABLE_KEY),
    (TableKind::Traits, schema::TRAIT_ID),
    (TableKind::Traits, schema::TRAIT_NAME),
    (TableKind::Methods, schema::METHOD_ID),
    (TableKind::Methods, schema::METHOD_NAME),
    (TableKind::Scales, schema::SCALE_ID),
    (TableKind::Scales, schema::SCALE_NAME),
    (TableKind::TraitClasses, schema::TRAIT_CLASS_ID),
    (TableKind::TraitClasses, schema::TRAIT_CLASS),
];

/// Name references: (referencing table, column, referenced table)
const REFERENCE_COLUMNS: &[(TableKind, &str, TableKind)] = &[
    (TableKind::Variables, schema::TRAIT_NAME, TableKind::Traits),
    (TableKind::Variables, schema::METHOD_NAME, TableKind::Methods),
    (TableKind::Variables, schema::SCALE_NAME, TableKind::Scales),
    (TableKind::Traits, schema::TRAIT_CLASS, TableKind::TraitClasses),
];

/// Compute duplicate and dangling markers for every checked column.
///
/// `extra_duplicates` adds values to flag as duplicates even when they now
/// occur once, such as names whose conflicting second definition was
/// dropped.
#[must_use]
pub fn compute_marks(
    workbook: &TraitWorkbook,
    extra_duplicates: &[(TableKind, String)],
) -> Vec<ColumnMarks> {
    let mut marks = Vec::new();

    for (kind, column) in DUPLICATE_COLUMNS {
        let Some(table) = workbook.get(*kind) else {
            continue;
        };
        let mut values = duplicated_values(table, column);
        if *column == kind.name_column() {
            values.extend(
                extra_duplicates
                    .iter()
                    .filter(|(k, _)| k == kind)
                    .map(|(_, v)| v.clone()),
            );
        }
        if let Some(m) = column_marks(table, column, MarkKind::Duplicate, values) {
            marks.push(m);
        }
    }

    for (kind, column, target) in REFERENCE_COLUMNS {
        let (Some(table), Some(target_table)) = (workbook.get(*kind), workbook.get(*target)) else {
            continue;
        };
        let known: HashSet<&str> = target_table
            .column(target.name_column())
            .flatten()
            .collect();
        let values: BTreeSet<String> = table
            .column(column)
            .flatten()
            .filter(|v| !known.contains(v))
            .map(str::to_string)
            .collect();
        if let Some(m) = column_marks(table, column, MarkKind::Dangling, values) {
            marks.push(m);
        }
    }

    marks
}

fn duplicated_values(table: &Table, column: &str) -> BTreeSet<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in table.column(column).flatten() {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(v, _)| v.to_string())
        .collect()
}

fn column_marks(
    table: &Table,
    column: &str,
    kind: MarkKind,
    values: BTreeSet<String>,
) -> Option<ColumnMarks> {
    if values.is_empty() {
        return None;
    }
    let column_index = table.column_index(column)?;
    let rows = table
        .column(column)
        .enumerate()
        .filter(|(_, v)| v.is_some_and(|v| values.contains(v)))
        .map(|(i, _)| i)
        .collect();
    Some(ColumnMarks {
        table: table.kind,
        column: column.to_string(),
        column_index,
        kind,
        values,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(kind: TableKind, rows: &[&[&str]]) -> Table {
        Table::from_grid(
            kind,
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_duplicates_and_dangling() {
        let mut wb = TraitWorkbook::new();
        wb.insert(table(
            TableKind::Variables,
            &[
                &["Variable name", "Trait name"],
                &["V1", "Height"],
                &["V1", "Weight"],
                &["V3", "Height"],
            ],
        ));
        wb.insert(table(TableKind::Traits, &[&["Trait name"], &["Height"]]));

        let marks = compute_marks(&wb, &[]);
        let dup = marks
            .iter()
            .find(|m| m.kind == MarkKind::Duplicate)
            .unwrap();
        assert_eq!(dup.column, "Variable name");
        assert_eq!(dup.rows.iter().copied().collect::<Vec<_>>(), vec![0, 1]);

        let dangling = marks
            .iter()
            .find(|m| m.kind == MarkKind::Dangling)
            .unwrap();
        assert_eq!(dangling.column_index, 1);
        assert!(dangling.values.contains("Weight"));
        assert_eq!(dangling.rows.len(), 1);
    }

    #[test]
    fn test_extra_duplicates_flag_name_column() {
        let mut wb = TraitWorkbook::new();
        wb.insert(table(TableKind::Scales, &[&["Scale name"], &["cm"], &["kg"]]));
        let marks = compute_marks(&wb, &[(TableKind::Scales, "kg".to_string())]);
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].rows.iter().copied().collect::<Vec<_>>(), vec![1]);
    }
}
