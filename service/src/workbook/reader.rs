//! Trait Workbook tables to the record model
//!
//! Only the traits, methods and scales that the (optionally institution
//! filtered) variables reference are read.

use super::table::{Table, TraitWorkbook};
use std::collections::HashSet;
use trait_ontology_core::error::Result;
use trait_ontology_core::schema::{self, TableKind};
use trait_ontology_core::types::{
    Method, OntologyModel, Record, Root, Scale, Trait, TraitClass, Variable,
};
use tracing::{debug, info};

/// Reads a [`TraitWorkbook`] into an [`OntologyModel`]
#[derive(Debug, Clone, Default)]
pub struct WorkbookReader {
    institution: Option<String>,
}

impl WorkbookReader {
    /// Create a reader keeping every variable
    #[must_use]
    pub fn new() -> Self {
        Self { institution: None }
    }

    /// Keep only variables whose institution list names `institution`
    #[must_use]
    pub fn with_institution(mut self, institution: Option<String>) -> Self {
        self.institution = institution.filter(|i| !i.trim().is_empty());
        self
    }

    /// Read the workbook's tables.
    ///
    /// # Errors
    ///
    /// Returns `MissingInput` if the Variables sheet is absent.
    pub fn read(&self, workbook: &TraitWorkbook) -> Result<OntologyModel> {
        let root = workbook
            .get(TableKind::Root)
            .and_then(|t| t.records().next().map(Root::from_fields))
            .unwrap_or_default();
        let mut model = OntologyModel::new(root);

        let variables = workbook.require(TableKind::Variables)?;
        model.variables = read_all::<Variable>(variables)
            .into_iter()
            .filter(|v| {
                self.institution
                    .as_deref()
                    .is_none_or(|institution| v.belongs_to(institution))
            })
            .collect();
        if let Some(institution) = &self.institution {
            info!(
                "{} of {} variables belong to {institution}",
                model.variables.len(),
                variables.len()
            );
        }

        let trait_names = referenced(&model.variables, |v| v.trait_name.as_deref());
        let method_names = referenced(&model.variables, |v| v.method_name.as_deref());
        let scale_names = referenced(&model.variables, |v| v.scale_name.as_deref());

        model.traits = read_referenced::<Trait>(workbook.get(TableKind::Traits), &trait_names);
        model.methods = read_referenced::<Method>(workbook.get(TableKind::Methods), &method_names);
        model.scales = read_referenced::<Scale>(workbook.get(TableKind::Scales), &scale_names);

        let class_names: HashSet<String> = model
            .traits
            .iter()
            .filter_map(|t| t.class.clone())
            .collect();
        model.trait_classes =
            read_referenced::<TraitClass>(workbook.get(TableKind::TraitClasses), &class_names);
        model.derive_trait_classes();

        if let Some(scales) = workbook.get(TableKind::Scales) {
            for header in &scales.headers {
                if let Some(index) = schema::category_index(header) {
                    model.category_width.observe(index);
                }
            }
        }
        model.observe_categories();

        debug!(
            "workbook read: {} variables, {} traits, {} methods, {} scales, {} trait classes",
            model.variables.len(),
            model.traits.len(),
            model.methods.len(),
            model.scales.len(),
            model.trait_classes.len()
        );
        Ok(model)
    }
}

fn read_all<R: Record>(table: &Table) -> Vec<R> {
    table.records().map(R::from_fields).collect()
}

fn referenced<F>(variables: &[Variable], key: F) -> HashSet<String>
where
    F: Fn(&Variable) -> Option<&str>,
{
    variables
        .iter()
        .filter_map(key)
        .map(str::to_string)
        .collect()
}

fn read_referenced<R: Record>(table: Option<&Table>, names: &HashSet<String>) -> Vec<R> {
    table
        .map(|t| {
            read_all::<R>(t)
                .into_iter()
                .filter(|r| names.contains(r.name()))
                .collect()
        })
        .unwrap_or_default()
}
