//! Record model to Trait Workbook tables

use super::marks::{ColumnMarks, compute_marks};
use super::table::{Row, Table, TraitWorkbook};
use std::collections::HashSet;
use trait_ontology_core::diagnostics::{Diagnostics, NameConflict};
use trait_ontology_core::ids::trait_class_id;
use trait_ontology_core::schema::{self, TableKind};
use trait_ontology_core::types::{OntologyModel, Record, Root, TraitClass};
use tracing::{debug, info};

/// Tables plus the markers an adapter needs to flag problem cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookOutput {
    pub workbook: TraitWorkbook,
    pub marks: Vec<ColumnMarks>,
    pub diagnostics: Diagnostics,
}

/// Writes an [`OntologyModel`] as a [`TraitWorkbook`]
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookWriter;

impl WorkbookWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Lay the model out in the six workbook tables.
    ///
    /// Traits, methods and scales are written once per name. `upstream`
    /// carries name conflicts found while building the model; together with
    /// the model's own conflicts they are flagged as duplicates.
    #[must_use]
    pub fn write(&self, model: &OntologyModel, upstream: &[NameConflict]) -> WorkbookOutput {
        let index = model.index();
        let mut conflicts = upstream.to_vec();
        conflicts.extend(index.conflicts());

        let mut workbook = TraitWorkbook::new();
        workbook.insert(variables_table(model));
        workbook.insert(unique_table(TableKind::Traits, &model.traits, Vec::new()));
        workbook.insert(unique_table(TableKind::Methods, &model.methods, Vec::new()));
        workbook.insert(unique_table(
            TableKind::Scales,
            &model.scales,
            model.category_width.columns(),
        ));

        workbook.insert(trait_classes_table(model));
        workbook.insert(root_table(&model.root));

        let extra: Vec<(TableKind, String)> = conflicts
            .iter()
            .map(|c| (c.table, c.name.clone()))
            .collect();
        let marks = compute_marks(&workbook, &extra);
        info!(
            "workbook laid out: {} variables, {} flagged columns",
            model.variables.len(),
            marks.len()
        );

        WorkbookOutput {
            workbook,
            marks,
            diagnostics: Diagnostics {
                conflicts,
                ..Diagnostics::default()
            },
        }
    }
}

/// Fixed columns of `kind` as header cells
fn headers(kind: TableKind) -> Vec<String> {
    kind.columns().iter().map(|c| (*c).to_string()).collect()
}

fn record_row<R: Record>(record: &R, headers: &[String]) -> Row {
    headers
        .iter()
        .filter_map(|h| record.get(h).map(|v| (h.clone(), v.to_string())))
        .collect()
}

fn variables_table(model: &OntologyModel) -> Table {
    let mut columns = headers(TableKind::Variables);
    columns.push(schema::VARIABLE_KEY.to_string());
    let mut table = Table::new(TableKind::Variables, columns);
    for variable in &model.variables {
        let mut row = record_row(variable, &table.headers);
        row.insert(schema::VARIABLE_KEY.to_string(), variable.key());
        table.push(row);
    }
    table
}

/// Table of `kind` keyed by name, its fixed columns followed by `extra`
fn unique_table<R: Record>(kind: TableKind, records: &[R], extra: Vec<String>) -> Table {
    let mut columns = headers(kind);
    columns.extend(extra);
    let mut table = Table::new(kind, columns);
    let mut written = HashSet::new();
    let mut skipped = 0usize;
    for record in records {
        if !written.insert(record.name()) {
            skipped += 1;
            continue;
        }
        table.push(record_row(record, &table.headers));
    }
    if skipped > 0 {
        debug!("{kind}: skipped {skipped} repeated names");
    }
    table
}

fn trait_classes_table(model: &OntologyModel) -> Table {
    let index = model.index();
    let mut table = Table::new(TableKind::TraitClasses, headers(TableKind::TraitClasses));
    let mut written = HashSet::new();
    for name in model.traits.iter().filter_map(|t| t.class.as_deref()) {
        if !written.insert(name) {
            continue;
        }
        let id = index
            .trait_class_named(name)
            .map_or_else(|| trait_class_id(name), TraitClass::effective_id);
        let mut row = Row::new();
        row.insert(schema::TRAIT_CLASS_ID.to_string(), id);
        row.insert(schema::TRAIT_CLASS.to_string(), name.to_string());
        table.push(row);
    }
    table
}

fn root_table(root: &Root) -> Table {
    let mut table = Table::new(TableKind::Root, headers(TableKind::Root));
    let row = record_row(root, &table.headers);
    if !row.is_empty() {
        table.push(row);
    }
    table
}
