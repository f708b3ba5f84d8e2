//! Record model shared by every codec
//!
//! Variables join to traits, methods and scales by name, and traits join to
//! trait classes by name. [`ModelIndex`] builds the name lookups once per run.

use crate::category::{Categories, CategoryWidth};
use crate::diagnostics::{ForeignKey, Mismatch, NameConflict};
use crate::error::{self, OntologyError};
use crate::ids::{normalize_id, numeric_id, trait_class_id};
use crate::schema::{self, TableKind};
use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;

/// Column-addressed access shared by all table records
pub trait Record: Default + Clone + PartialEq {
    /// Table the record belongs to
    const TABLE: TableKind;

    /// Value stored under a column header
    fn get(&self, column: &str) -> Option<&str>;

    /// Store a value under a column header.
    ///
    /// Blank values clear the field. Returns `false` when the column is not
    /// part of this record.
    fn set(&mut self, column: &str, value: &str) -> bool;

    /// The record's name key
    fn name(&self) -> &str {
        self.get(Self::TABLE.name_column()).unwrap_or_default()
    }

    /// Build a record from `(column, value)` pairs, ignoring foreign columns
    fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = Self::default();
        for (column, value) in fields {
            record.set(column, value);
        }
        record
    }
}

fn field(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn id_field(value: &str) -> Option<String> {
    field(&normalize_id(value))
}

/// An observation variable: a trait measured by a method on a scale
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variable {
    pub id: Option<String>,
    pub name: Option<String>,
    pub label: Option<String>,
    pub synonyms: Option<String>,
    pub context_of_use: Option<String>,
    pub growth_stage: Option<String>,
    pub status: Option<String>,
    pub xref: Option<String>,
    pub institution: Option<String>,
    pub scientist: Option<String>,
    pub date: Option<String>,
    pub language: Option<String>,
    pub crop: Option<String>,
    pub trait_name: Option<String>,
    pub method_name: Option<String>,
    pub scale_name: Option<String>,
}

impl Variable {
    /// Whether the comma-separated institution list names `institution`
    #[must_use]
    pub fn belongs_to(&self, institution: &str) -> bool {
        let wanted = institution.trim();
        self.institution
            .as_deref()
            .is_some_and(|list| list.split(',').any(|i| i.trim() == wanted))
    }

    /// Trait, method and scale names joined with `|`
    #[must_use]
    pub fn key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.trait_name.as_deref().unwrap_or_default(),
            self.method_name.as_deref().unwrap_or_default(),
            self.scale_name.as_deref().unwrap_or_default()
        )
    }

    /// Name shown in OBO output: the label when present
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

impl Record for Variable {
    const TABLE: TableKind = TableKind::Variables;

    fn get(&self, column: &str) -> Option<&str> {
        let value = match column {
            schema::VARIABLE_ID => &self.id,
            schema::VARIABLE_NAME => &self.name,
            schema::VARIABLE_LABEL => &self.label,
            schema::VARIABLE_SYNONYMS => &self.synonyms,
            schema::CONTEXT_OF_USE => &self.context_of_use,
            schema::GROWTH_STAGE => &self.growth_stage,
            schema::VARIABLE_STATUS => &self.status,
            schema::VARIABLE_XREF => &self.xref,
            schema::INSTITUTION => &self.institution,
            schema::SCIENTIST => &self.scientist,
            schema::DATE => &self.date,
            schema::LANGUAGE => &self.language,
            schema::CROP => &self.crop,
            schema::TRAIT_NAME => &self.trait_name,
            schema::METHOD_NAME => &self.method_name,
            schema::SCALE_NAME => &self.scale_name,
            _ => return None,
        };
        value.as_deref()
    }

    fn set(&mut self, column: &str, value: &str) -> bool {
        let slot = match column {
            schema::VARIABLE_ID => {
                self.id = id_field(value);
                return true;
            }
            schema::VARIABLE_NAME => &mut self.name,
            schema::VARIABLE_LABEL => &mut self.label,
            schema::VARIABLE_SYNONYMS => &mut self.synonyms,
            schema::CONTEXT_OF_USE => &mut self.context_of_use,
            schema::GROWTH_STAGE => &mut self.growth_stage,
            schema::VARIABLE_STATUS => &mut self.status,
            schema::VARIABLE_XREF => &mut self.xref,
            schema::INSTITUTION => &mut self.institution,
            schema::SCIENTIST => &mut self.scientist,
            schema::DATE => &mut self.date,
            schema::LANGUAGE => &mut self.language,
            schema::CROP => &mut self.crop,
            schema::TRAIT_NAME => &mut self.trait_name,
            schema::METHOD_NAME => &mut self.method_name,
            schema::SCALE_NAME => &mut self.scale_name,
            _ => return false,
        };
        *slot = field(value);
        true
    }
}

/// A measurable characteristic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trait {
    pub id: Option<String>,
    pub name: Option<String>,
    pub class: Option<String>,
    pub description: Option<String>,
    pub synonyms: Option<String>,
    pub abbreviation: Option<String>,
    pub alt_abbreviations: Option<String>,
    pub entity: Option<String>,
    pub attribute: Option<String>,
    pub status: Option<String>,
    pub xref: Option<String>,
}

impl Record for Trait {
    const TABLE: TableKind = TableKind::Traits;

    fn get(&self, column: &str) -> Option<&str> {
        let value = match column {
            schema::TRAIT_ID => &self.id,
            schema::TRAIT_NAME => &self.name,
            schema::TRAIT_CLASS => &self.class,
            schema::TRAIT_DESCRIPTION => &self.description,
            schema::TRAIT_SYNONYMS => &self.synonyms,
            schema::MAIN_ABBREVIATION => &self.abbreviation,
            schema::ALT_ABBREVIATIONS => &self.alt_abbreviations,
            schema::ENTITY => &self.entity,
            schema::ATTRIBUTE => &self.attribute,
            schema::TRAIT_STATUS => &self.status,
            schema::TRAIT_XREF => &self.xref,
            _ => return None,
        };
        value.as_deref()
    }

    fn set(&mut self, column: &str, value: &str) -> bool {
        let slot = match column {
            schema::TRAIT_ID => {
                self.id = id_field(value);
                return true;
            }
            schema::TRAIT_NAME => &mut self.name,
            schema::TRAIT_CLASS => &mut self.class,
            schema::TRAIT_DESCRIPTION => &mut self.description,
            schema::TRAIT_SYNONYMS => &mut self.synonyms,
            schema::MAIN_ABBREVIATION => &mut self.abbreviation,
            schema::ALT_ABBREVIATIONS => &mut self.alt_abbreviations,
            schema::ENTITY => &mut self.entity,
            schema::ATTRIBUTE => &mut self.attribute,
            schema::TRAIT_STATUS => &mut self.status,
            schema::TRAIT_XREF => &mut self.xref,
            _ => return false,
        };
        *slot = field(value);
        true
    }
}

/// How a trait is measured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Method {
    pub id: Option<String>,
    pub name: Option<String>,
    pub class: Option<String>,
    pub description: Option<String>,
    pub formula: Option<String>,
    pub reference: Option<String>,
}

impl Record for Method {
    const TABLE: TableKind = TableKind::Methods;

    fn get(&self, column: &str) -> Option<&str> {
        let value = match column {
            schema::METHOD_ID => &self.id,
            schema::METHOD_NAME => &self.name,
            schema::METHOD_CLASS => &self.class,
            schema::METHOD_DESCRIPTION => &self.description,
            schema::FORMULA => &self.formula,
            schema::METHOD_REFERENCE => &self.reference,
            _ => return None,
        };
        value.as_deref()
    }

    fn set(&mut self, column: &str, value: &str) -> bool {
        let slot = match column {
            schema::METHOD_ID => {
                self.id = id_field(value);
                return true;
            }
            schema::METHOD_NAME => &mut self.name,
            schema::METHOD_CLASS => &mut self.class,
            schema::METHOD_DESCRIPTION => &mut self.description,
            schema::FORMULA => &mut self.formula,
            schema::METHOD_REFERENCE => &mut self.reference,
            _ => return false,
        };
        *slot = field(value);
        true
    }
}

/// Unit or value set a method reports in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scale {
    pub id: Option<String>,
    pub name: Option<String>,
    pub class: Option<String>,
    pub decimal_places: Option<String>,
    pub lower_limit: Option<String>,
    pub upper_limit: Option<String>,
    pub xref: Option<String>,
    pub categories: Categories,
}

impl Record for Scale {
    const TABLE: TableKind = TableKind::Scales;

    fn get(&self, column: &str) -> Option<&str> {
        if let Some(index) = schema::category_index(column) {
            return self.categories.get(index);
        }
        let value = match column {
            schema::SCALE_ID => &self.id,
            schema::SCALE_NAME => &self.name,
            schema::SCALE_CLASS => &self.class,
            schema::DECIMAL_PLACES => &self.decimal_places,
            schema::LOWER_LIMIT => &self.lower_limit,
            schema::UPPER_LIMIT => &self.upper_limit,
            schema::SCALE_XREF => &self.xref,
            _ => return None,
        };
        value.as_deref()
    }

    fn set(&mut self, column: &str, value: &str) -> bool {
        if let Some(index) = schema::category_index(column) {
            self.categories.set(index, value.trim());
            return true;
        }
        let slot = match column {
            schema::SCALE_ID => {
                self.id = id_field(value);
                return true;
            }
            schema::SCALE_NAME => &mut self.name,
            schema::SCALE_CLASS => &mut self.class,
            schema::DECIMAL_PLACES => &mut self.decimal_places,
            schema::LOWER_LIMIT => &mut self.lower_limit,
            schema::UPPER_LIMIT => &mut self.upper_limit,
            schema::SCALE_XREF => &mut self.xref,
            _ => return false,
        };
        *slot = field(value);
        true
    }
}

/// Grouping of traits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitClass {
    /// Explicit id; derived from the name when absent
    pub id: Option<String>,
    pub name: Option<String>,
}

impl TraitClass {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: field(name),
        }
    }

    /// Explicit id, or the id derived from the name
    #[must_use]
    pub fn effective_id(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| trait_class_id(self.name()))
    }
}

impl Record for TraitClass {
    const TABLE: TableKind = TableKind::TraitClasses;

    fn get(&self, column: &str) -> Option<&str> {
        match column {
            schema::TRAIT_CLASS_ID => self.id.as_deref(),
            schema::TRAIT_CLASS => self.name.as_deref(),
            _ => None,
        }
    }

    fn set(&mut self, column: &str, value: &str) -> bool {
        match column {
            schema::TRAIT_CLASS_ID => self.id = field(value),
            schema::TRAIT_CLASS => self.name = field(value),
            _ => return false,
        }
        true
    }
}

/// Ontology-wide settings of one conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Root {
    /// Ontology root id, e.g. `CO_360`
    pub id: String,
    pub name: String,
    /// Default OBO namespace
    pub namespace: String,
}

impl Record for Root {
    const TABLE: TableKind = TableKind::Root;

    fn get(&self, column: &str) -> Option<&str> {
        let value = match column {
            schema::ROOT_ID => &self.id,
            schema::ROOT_NAME => &self.name,
            schema::NAMESPACE => &self.namespace,
            _ => return None,
        };
        (!value.is_empty()).then_some(value.as_str())
    }

    fn set(&mut self, column: &str, value: &str) -> bool {
        let slot = match column {
            schema::ROOT_ID => &mut self.id,
            schema::ROOT_NAME => &mut self.name,
            schema::NAMESPACE => &mut self.namespace,
            _ => return false,
        };
        *slot = value.trim().to_string();
        true
    }
}

/// Every record read in one conversion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OntologyModel {
    pub root: Root,
    pub variables: Vec<Variable>,
    pub traits: Vec<Trait>,
    pub methods: Vec<Method>,
    pub scales: Vec<Scale>,
    pub trait_classes: Vec<TraitClass>,
    pub category_width: CategoryWidth,
}

impl OntologyModel {
    #[must_use]
    pub fn new(root: Root) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    /// Build name lookups over the current tables
    #[must_use]
    pub fn index(&self) -> ModelIndex<'_> {
        ModelIndex::new(self)
    }

    /// Fold the category indices of every scale into the width accumulator
    pub fn observe_categories(&mut self) {
        for scale in &self.scales {
            self.category_width.observe(scale.categories.max_index());
        }
    }

    /// Add a trait class row for every trait class name not yet listed
    pub fn derive_trait_classes(&mut self) {
        let mut known: HashSet<String> = self
            .trait_classes
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        for class in self.traits.iter().filter_map(|t| t.class.as_deref()) {
            if known.insert(class.to_string()) {
                self.trait_classes.push(TraitClass::named(class));
            }
        }
    }

    /// Give id-less variables, traits, methods and scales fresh numeric ids.
    ///
    /// Numbering continues after the highest numeric id present in any of
    /// the four tables, in table order.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when an id would exceed `u64::MAX`.
    pub fn assign_missing_ids(&mut self) -> error::Result<usize> {
        let highest = self
            .variables
            .iter()
            .map(|v| v.id.as_deref())
            .chain(self.traits.iter().map(|t| t.id.as_deref()))
            .chain(self.methods.iter().map(|m| m.id.as_deref()))
            .chain(self.scales.iter().map(|s| s.id.as_deref()))
            .filter_map(|id| id.and_then(numeric_id))
            .max()
            .unwrap_or(0);

        let slots = self
            .traits
            .iter_mut()
            .map(|t| &mut t.id)
            .chain(self.methods.iter_mut().map(|m| &mut m.id))
            .chain(self.scales.iter_mut().map(|s| &mut s.id))
            .chain(self.variables.iter_mut().map(|v| &mut v.id))
            .filter(|id| id.is_none());

        let mut next = highest;
        let mut assigned = 0;
        for slot in slots {
            next = next.checked_add(1).ok_or_else(|| {
                OntologyError::config(format!("no identifiers left after {highest}"))
            })?;
            *slot = Some(next.to_string());
            assigned += 1;
        }
        if assigned > 0 {
            tracing::debug!("assigned {assigned} identifiers after {highest}");
        }
        Ok(assigned)
    }
}

/// A variable with its trait, method and scale resolved
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub variable: &'a Variable,
    pub trait_: &'a Trait,
    pub method: &'a Method,
    pub scale: &'a Scale,
}

/// Name-keyed lookups over a model's tables.
///
/// When a name occurs twice the first record wins; the later ones are
/// reported by [`ModelIndex::conflicts`] if they differ.
#[derive(Debug)]
pub struct ModelIndex<'a> {
    traits: NameIndex<'a, Trait>,
    methods: NameIndex<'a, Method>,
    scales: NameIndex<'a, Scale>,
    trait_classes: NameIndex<'a, TraitClass>,
}

impl<'a> ModelIndex<'a> {
    fn new(model: &'a OntologyModel) -> Self {
        Self {
            traits: NameIndex::build(&model.traits),
            methods: NameIndex::build(&model.methods),
            scales: NameIndex::build(&model.scales),
            trait_classes: NameIndex::build(&model.trait_classes),
        }
    }

    #[must_use]
    pub fn trait_named(&self, name: &str) -> Option<&'a Trait> {
        self.traits.get(name)
    }

    #[must_use]
    pub fn method_named(&self, name: &str) -> Option<&'a Method> {
        self.methods.get(name)
    }

    #[must_use]
    pub fn scale_named(&self, name: &str) -> Option<&'a Scale> {
        self.scales.get(name)
    }

    #[must_use]
    pub fn trait_class_named(&self, name: &str) -> Option<&'a TraitClass> {
        self.trait_classes.get(name)
    }

    /// Resolve a variable's three foreign keys, reporting every missing one
    ///
    /// # Errors
    ///
    /// Returns the list of unresolved keys when any name is unknown.
    pub fn resolve(&self, variable: &'a Variable) -> Result<Resolved<'a>, Vec<Mismatch>> {
        let missing = |key: ForeignKey, value: Option<&str>| Mismatch {
            variable: variable.name().to_string(),
            key,
            value: value.unwrap_or_default().to_string(),
        };

        let trait_name = variable.trait_name.as_deref();
        let method_name = variable.method_name.as_deref();
        let scale_name = variable.scale_name.as_deref();

        let trait_ = trait_name.and_then(|n| self.trait_named(n));
        let method = method_name.and_then(|n| self.method_named(n));
        let scale = scale_name.and_then(|n| self.scale_named(n));

        match (trait_, method, scale) {
            (Some(trait_), Some(method), Some(scale)) => Ok(Resolved {
                variable,
                trait_,
                method,
                scale,
            }),
            _ => {
                let mut mismatches = Vec::new();
                if trait_.is_none() {
                    mismatches.push(missing(ForeignKey::Trait, trait_name));
                }
                if method.is_none() {
                    mismatches.push(missing(ForeignKey::Method, method_name));
                }
                if scale.is_none() {
                    mismatches.push(missing(ForeignKey::Scale, scale_name));
                }
                Err(mismatches)
            }
        }
    }

    /// Same-name records that differ from the record kept in the index
    #[must_use]
    pub fn conflicts(&self) -> Vec<NameConflict> {
        let mut conflicts = self.traits.conflicts.clone();
        conflicts.extend(self.methods.conflicts.iter().cloned());
        conflicts.extend(self.scales.conflicts.iter().cloned());
        conflicts.extend(self.trait_classes.conflicts.iter().cloned());
        conflicts
    }
}

#[derive(Debug)]
struct NameIndex<'a, R> {
    by_name: HashMap<&'a str, (usize, &'a R)>,
    conflicts: Vec<NameConflict>,
}

impl<'a, R: Record> NameIndex<'a, R> {
    fn build(records: &'a [R]) -> Self {
        let mut by_name: HashMap<&'a str, (usize, &'a R)> = HashMap::with_capacity(records.len());
        let mut conflicts = Vec::new();
        for (position, record) in records.iter().enumerate() {
            let name = record.name();
            if name.is_empty() {
                continue;
            }
            match by_name.entry(name) {
                Entry::Occupied(entry) => {
                    let (kept, existing) = *entry.get();
                    if existing != record {
                        conflicts.push(NameConflict {
                            table: R::TABLE,
                            name: name.to_string(),
                            kept,
                            skipped: position,
                        });
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert((position, record));
                }
            }
        }
        Self { by_name, conflicts }
    }

    fn get(&self, name: &str) -> Option<&'a R> {
        self.by_name.get(name.trim()).map(|(_, record)| *record)
    }
}
