//! Flat dictionary records to and from the record model

use super::FlatRecord;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use trait_ontology_core::category::CategoryWidth;
use trait_ontology_core::diagnostics::{Diagnostics, NameConflict};
use trait_ontology_core::schema::{
    self, METHOD_COLUMNS, SCALE_COLUMNS, TRAIT_COLUMNS, VARIABLE_COLUMNS,
};
use trait_ontology_core::types::{Method, OntologyModel, Record, Root, Scale, Trait, Variable};
use tracing::{debug, info};

/// Full dictionary header: variable fields, then trait, method and scale
/// fields, then `Category 1..N`.
///
/// The trait, method and scale name columns appear once, in their entity's
/// block.
#[must_use]
pub fn dictionary_headers(width: &CategoryWidth) -> Vec<String> {
    let foreign_keys = [schema::TRAIT_NAME, schema::METHOD_NAME, schema::SCALE_NAME];
    VARIABLE_COLUMNS
        .iter()
        .filter(|c| !foreign_keys.contains(*c))
        .chain(TRAIT_COLUMNS)
        .chain(METHOD_COLUMNS)
        .chain(SCALE_COLUMNS)
        .map(|c| (*c).to_string())
        .chain(width.columns())
        .collect()
}

/// Split flat records into the six-table model.
///
/// Every record yields a variable. Traits, methods and scales are kept once
/// per name; a later record defining the same name differently is reported
/// as a [`NameConflict`] and ignored.
#[must_use]
pub fn model_from_records(
    records: &[FlatRecord],
    root: Root,
    width: CategoryWidth,
) -> (OntologyModel, Diagnostics) {
    let mut model = OntologyModel::new(root);
    model.category_width = width;
    let mut diagnostics = Diagnostics::default();

    let mut traits = UniqueTable::default();
    let mut methods = UniqueTable::default();
    let mut scales = UniqueTable::default();
    for (position, record) in records.iter().enumerate() {
        let fields = || record.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        model.variables.push(Variable::from_fields(fields()));
        traits.push(Trait::from_fields(fields()), position, &mut diagnostics);
        methods.push(Method::from_fields(fields()), position, &mut diagnostics);
        scales.push(Scale::from_fields(fields()), position, &mut diagnostics);
    }
    model.traits = traits.records;
    model.methods = methods.records;
    model.scales = scales.records;

    model.derive_trait_classes();
    model.observe_categories();
    info!(
        "dictionary holds {} variables, {} traits, {} methods, {} scales",
        model.variables.len(),
        model.traits.len(),
        model.methods.len(),
        model.scales.len()
    );
    (model, diagnostics)
}

/// Records kept once per name, remembering which source row each came from
struct UniqueTable<R> {
    records: Vec<R>,
    origins: Vec<usize>,
    /// name → index into `records`
    positions: HashMap<String, usize>,
}

impl<R> Default for UniqueTable<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            origins: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<R: Record> UniqueTable<R> {
    fn push(&mut self, record: R, position: usize, diagnostics: &mut Diagnostics) {
        if record.name().is_empty() {
            return;
        }
        match self.positions.entry(record.name().to_string()) {
            Entry::Occupied(entry) => {
                let kept = *entry.get();
                if self.records[kept] != record {
                    diagnostics.conflicts.push(NameConflict {
                        table: R::TABLE,
                        name: entry.key().clone(),
                        kept: self.origins[kept],
                        skipped: position,
                    });
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(self.records.len());
                self.records.push(record);
                self.origins.push(position);
            }
        }
    }
}

/// Join every variable with its trait, method and scale into flat records.
///
/// Variables whose references do not resolve are left out and reported.
#[must_use]
pub fn records_from_model(model: &OntologyModel) -> (Vec<FlatRecord>, Diagnostics) {
    let index = model.index();
    let mut diagnostics = Diagnostics {
        conflicts: index.conflicts(),
        ..Diagnostics::default()
    };
    let categories = model.category_width.columns();

    let mut records = Vec::with_capacity(model.variables.len());
    for variable in &model.variables {
        let resolved = match index.resolve(variable) {
            Ok(resolved) => resolved,
            Err(mismatches) => {
                diagnostics.mismatches.extend(mismatches);
                continue;
            }
        };

        let mut record = FlatRecord::new();
        copy_columns(&mut record, resolved.variable, VARIABLE_COLUMNS.iter().copied());
        copy_columns(&mut record, resolved.trait_, TRAIT_COLUMNS.iter().copied());
        copy_columns(&mut record, resolved.method, METHOD_COLUMNS.iter().copied());
        copy_columns(&mut record, resolved.scale, SCALE_COLUMNS.iter().copied());
        copy_columns(&mut record, resolved.scale, categories.iter().map(String::as_str));
        records.push(record);
    }

    debug!(
        "joined {} of {} variables",
        records.len(),
        model.variables.len()
    );
    (records, diagnostics)
}

fn copy_columns<'c, R: Record>(
    record: &mut FlatRecord,
    source: &R,
    columns: impl Iterator<Item = &'c str>,
) {
    for column in columns {
        if let Some(value) = source.get(column) {
            record.insert(column.to_string(), value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> FlatRecord {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_headers_list_names_once() {
        let headers = dictionary_headers(&CategoryWidth::new());
        let count = headers.iter().filter(|h| *h == schema::TRAIT_NAME).count();
        assert_eq!(count, 1);
        assert_eq!(headers.last().map(String::as_str), Some("Category 10"));
        assert_eq!(headers[0], schema::VARIABLE_ID);
    }

    #[test]
    fn test_shared_entities_deduplicated() {
        let records = vec![
            record(&[
                ("Variable name", "V1"),
                ("Trait name", "Height"),
                ("Method name", "Ruler"),
                ("Scale name", "cm"),
            ]),
            record(&[
                ("Variable name", "V2"),
                ("Trait name", "Height"),
                ("Method name", "Visual"),
                ("Scale name", "cm"),
                ("Scale class", "Numerical"),
            ]),
        ];
        let (model, diagnostics) =
            model_from_records(&records, Root::default(), CategoryWidth::new());
        assert_eq!(model.variables.len(), 2);
        assert_eq!(model.traits.len(), 1);
        assert_eq!(model.methods.len(), 2);
        assert_eq!(model.scales.len(), 1);
        assert_eq!(diagnostics.conflicts.len(), 1);
        assert_eq!(diagnostics.conflicts[0].name, "cm");
    }

    /// Many rows over a handful of names keep one entity per name, and a
    /// conflict points at the first row that defined it
    #[test]
    fn test_many_rows_share_few_names() {
        let records: Vec<FlatRecord> = (0..2000)
            .map(|i| {
                let variable = format!("V{i}");
                let trait_name = format!("Trait {}", i % 7);
                let method = format!("Method {}", i % 3);
                let class = if i == 1500 { "Ratio" } else { "Numerical" };
                record(&[
                    ("Variable name", variable.as_str()),
                    ("Trait name", trait_name.as_str()),
                    ("Method name", method.as_str()),
                    ("Scale name", "cm"),
                    ("Scale class", class),
                ])
            })
            .collect();
        let (model, diagnostics) =
            model_from_records(&records, Root::default(), CategoryWidth::new());
        assert_eq!(model.variables.len(), 2000);
        assert_eq!(model.traits.len(), 7);
        assert_eq!(model.methods.len(), 3);
        assert_eq!(model.scales.len(), 1);
        assert_eq!(model.traits[6].name(), "Trait 6");
        assert_eq!(diagnostics.conflicts.len(), 1);
        assert_eq!((diagnostics.conflicts[0].kept, diagnostics.conflicts[0].skipped), (0, 1500));
    }

    #[test]
    fn test_unresolved_variable_dropped() {
        let records = vec![record(&[
            ("Variable name", "V1"),
            ("Trait name", "Height"),
            ("Method name", "Ruler"),
            ("Scale name", "cm"),
        ])];
        let (mut model, _) = model_from_records(&records, Root::default(), CategoryWidth::new());
        model.variables[0].scale_name = Some("mm".to_string());

        let (rows, diagnostics) = records_from_model(&model);
        assert!(rows.is_empty());
        assert_eq!(diagnostics.mismatches.len(), 1);
        assert_eq!(diagnostics.mismatches[0].value, "mm");
    }
}
