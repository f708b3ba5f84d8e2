//! Record model to OBO text

use super::OBO_DATE_FORMAT;
use super::stanza::Stanza;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt::{self, Write};
use trait_ontology_core::config::ConverterConfig;
use trait_ontology_core::diagnostics::Diagnostics;
use trait_ontology_core::error::{OntologyError, Result};
use trait_ontology_core::ids::{generate_id, trait_class_id};
use trait_ontology_core::types::{OntologyModel, Record, Scale, TraitClass};
use tracing::info;

pub const FORMAT_VERSION: &str = "1.2";

pub const METHOD_OF: &str = "method_of";
pub const SCALE_OF: &str = "scale_of";
pub const VARIABLE_OF: &str = "variable_of";

/// OBO text plus the variables left out of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OboOutput {
    pub text: String,
    pub diagnostics: Diagnostics,
}

/// Serializes an [`OntologyModel`] as an OBO document
#[derive(Debug, Clone)]
pub struct OboWriter {
    user: Option<String>,
    generator: String,
    remark: Option<String>,
    generated_at: NaiveDateTime,
}

impl OboWriter {
    /// Writer stamping `generated_at` as the document date
    #[must_use]
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self {
            user: None,
            generator: trait_ontology_core::config::OboConfig::default().generator,
            remark: None,
            generated_at,
        }
    }

    /// Writer using the configured identity and header text
    #[must_use]
    pub fn from_config(config: &ConverterConfig, generated_at: NaiveDateTime) -> Self {
        Self {
            user: config.user.clone(),
            generator: config.obo.generator.clone(),
            remark: config.obo.remark.clone(),
            generated_at,
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    /// Render the header, the relation typedefs and one term per record.
    ///
    /// Records without an id receive fresh numbers first. Variables whose
    /// trait, method or scale is unknown are left out and reported.
    ///
    /// # Errors
    ///
    /// Returns `MissingInput` if the model has no root id.
    #[allow(clippy::too_many_lines)]
    pub fn write(&self, model: &OntologyModel) -> Result<OboOutput> {
        let root_id = model.root.id.trim();
        if root_id.is_empty() {
            return Err(OntologyError::missing_input("ontology root id"));
        }
        let namespace = if model.root.namespace.trim().is_empty() {
            root_id
        } else {
            model.root.namespace.trim()
        };

        let mut model = model.clone();
        model.assign_missing_ids()?;
        let index = model.index();
        let mut diagnostics = Diagnostics {
            conflicts: index.conflicts(),
            ..Diagnostics::default()
        };

        let ids = TermIds {
            root: root_id,
            namespace,
        };
        let mut text = String::new();
        self.write_header(&mut text, root_id, namespace)
            .map_err(Self::fmt_error)?;
        for typedef in typedefs() {
            typedef.write_to(&mut text).map_err(Self::fmt_error)?;
        }

        let mut root = Stanza::term(ids.root_term());
        let root_name = if model.root.name.is_empty() {
            root_id
        } else {
            model.root.name.as_str()
        };
        root.add("name", root_name).add("namespace", namespace);
        root.write_to(&mut text).map_err(Self::fmt_error)?;

        let mut emitted = HashSet::new();
        for class in &model.trait_classes {
            if !emitted.insert(class.name()) {
                continue;
            }
            let mut stanza = Stanza::term(ids.trait_class(class));
            stanza
                .add("name", class.name())
                .add("namespace", ids.scoped("trait"))
                .add("is_a", ids.root_term());
            stanza.write_to(&mut text).map_err(Self::fmt_error)?;
        }

        let mut emitted = HashSet::new();
        for trait_ in &model.traits {
            if !emitted.insert(trait_.name()) {
                continue;
            }
            let mut stanza = Stanza::term(ids.record(trait_.id.as_deref()));
            stanza
                .add("name", trait_.name())
                .add("namespace", ids.scoped("trait"));
            if let Some(description) = &trait_.description {
                stanza.add_def(description);
            }
            if let Some(abbreviation) = &trait_.abbreviation {
                stanza.add_synonym(abbreviation);
            }
            for synonym in split_list(trait_.synonyms.as_deref()) {
                stanza.add_synonym(synonym);
            }
            if let Some(xref) = &trait_.xref {
                stanza.add("xref", xref.as_str());
            }
            if let Some(class) = trait_.class.as_deref() {
                let id = index.trait_class_named(class).map_or_else(
                    || format!("{root_id}:{}", trait_class_id(class)),
                    |c| ids.trait_class(c),
                );
                stanza.add("is_a", id);
            }
            stanza.write_to(&mut text).map_err(Self::fmt_error)?;
        }

        let mut methods: IndexMap<&str, Stanza> = IndexMap::new();
        for method in &model.methods {
            if methods.contains_key(method.name()) {
                continue;
            }
            let mut stanza = Stanza::term(ids.record(method.id.as_deref()));
            stanza
                .add("name", method.name())
                .add("namespace", ids.scoped("method"));
            if let Some(description) = &method.description {
                stanza.add_def(description);
            }
            if let Some(formula) = &method.formula {
                stanza.add("comment", formula.as_str());
            }
            methods.insert(method.name(), stanza);
        }

        let mut scales: IndexMap<&str, (&Scale, Stanza)> = IndexMap::new();
        for scale in &model.scales {
            if scales.contains_key(scale.name()) {
                continue;
            }
            let mut stanza = Stanza::term(ids.record(scale.id.as_deref()));
            stanza
                .add("name", scale.name())
                .add("namespace", ids.scoped("scale"));
            if let Some(xref) = &scale.xref {
                stanza.add("xref", xref.as_str());
            }
            scales.insert(scale.name(), (scale, stanza));
        }

        let mut variables = Vec::new();
        for variable in &model.variables {
            let resolved = match index.resolve(variable) {
                Ok(resolved) => resolved,
                Err(mismatches) => {
                    diagnostics.mismatches.extend(mismatches);
                    continue;
                }
            };
            let trait_id = ids.record(resolved.trait_.id.as_deref());
            let method_id = ids.record(resolved.method.id.as_deref());
            let scale_id = ids.record(resolved.scale.id.as_deref());

            if let Some(stanza) = methods.get_mut(resolved.method.name()) {
                stanza.add_unique("relationship", format!("{METHOD_OF} {trait_id}"));
            }
            if let Some((_, stanza)) = scales.get_mut(resolved.scale.name()) {
                stanza.add_unique("relationship", format!("{SCALE_OF} {method_id}"));
            }

            let mut stanza = Stanza::term(ids.record(variable.id.as_deref()));
            stanza
                .add("name", variable.display_name())
                .add("namespace", ids.scoped("variable"));
            let scale_name = resolved.scale.name();
            let def = match resolved.method.description.as_deref() {
                Some(description) => format!("{description} ({scale_name})"),
                None => format!("({scale_name})"),
            };
            stanza.add_def(&def);
            for synonym in split_list(variable.synonyms.as_deref()) {
                stanza.add_synonym(synonym);
            }
            if let Some(xref) = &variable.xref {
                stanza.add("xref", xref.as_str());
            }
            stanza
                .add("relationship", format!("{VARIABLE_OF} {trait_id}"))
                .add("relationship", format!("{VARIABLE_OF} {method_id}"))
                .add("relationship", format!("{VARIABLE_OF} {scale_id}"));
            if let Some(scientist) = &variable.scientist {
                stanza.add("created_by", scientist.as_str());
            }
            if let Some(date) = &variable.date {
                stanza.add("creation_date", date.as_str());
            }
            variables.push(stanza);
        }

        for stanza in methods.values() {
            stanza.write_to(&mut text).map_err(Self::fmt_error)?;
        }
        for (scale, stanza) in scales.values() {
            stanza.write_to(&mut text).map_err(Self::fmt_error)?;
            let scale_id = ids.record(scale.id.as_deref());
            for (position, category) in scale.categories.parsed() {
                let mut term = Stanza::term(format!("{scale_id}/{position}"));
                term.add("name", category.label.as_str())
                    .add("namespace", ids.scoped("scale"))
                    .add_synonym(&category.key);
                term.add("is_a", scale_id.as_str());
                term.write_to(&mut text).map_err(Self::fmt_error)?;
            }
        }
        for stanza in &variables {
            stanza.write_to(&mut text).map_err(Self::fmt_error)?;
        }

        info!(
            "OBO written: {} variables, {} skipped",
            variables.len(),
            diagnostics.mismatches.len()
        );
        Ok(OboOutput { text, diagnostics })
    }

    fn write_header<W: Write>(&self, out: &mut W, root_id: &str, namespace: &str) -> fmt::Result {
        writeln!(out, "format-version: {FORMAT_VERSION}")?;
        writeln!(out, "date: {}", self.generated_at.format(OBO_DATE_FORMAT))?;
        if let Some(user) = &self.user {
            writeln!(out, "saved-by: {user}")?;
        }
        writeln!(out, "auto-generated-by: {}", self.generator)?;
        if let Some(remark) = &self.remark {
            writeln!(out, "remark: {remark}")?;
        }
        writeln!(out, "default-namespace: {namespace}")?;
        writeln!(out, "ontology: {}", root_id.to_lowercase())?;
        writeln!(out)
    }

    #[allow(clippy::needless_pass_by_value)]
    fn fmt_error(err: fmt::Error) -> OntologyError {
        OntologyError::parse(format!("failed to render OBO text: {err}"))
    }
}

/// Identifier and namespace builders for one document
struct TermIds<'a> {
    root: &'a str,
    namespace: &'a str,
}

impl TermIds<'_> {
    fn root_term(&self) -> String {
        format!("{}:ROOT", self.root)
    }

    fn trait_class(&self, class: &TraitClass) -> String {
        format!("{}:{}", self.root, class.effective_id())
    }

    fn record(&self, id: Option<&str>) -> String {
        generate_id(self.root, id.unwrap_or_default())
    }

    fn scoped(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.namespace)
    }
}

fn typedefs() -> [Stanza; 3] {
    let relation = |id: &str, transitive: bool| {
        let mut stanza = Stanza::typedef(id);
        stanza
            .add("name", id)
            .add("is_transitive", transitive.to_string());
        stanza
    };
    [
        relation(METHOD_OF, true),
        relation(SCALE_OF, true),
        relation(VARIABLE_OF, false),
    ]
}

fn split_list(list: Option<&str>) -> impl Iterator<Item = &str> {
    list.into_iter()
        .flat_map(|l| l.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trait_ontology_core::schema;
    use trait_ontology_core::types::{Method, Root, Trait, Variable};

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(14, 7, 0))
            .unwrap()
    }

    fn model() -> OntologyModel {
        let mut model = OntologyModel::new(Root {
            id: "CO_360".to_string(),
            name: "Sugar Kelp".to_string(),
            namespace: "kelp".to_string(),
        });
        model.traits.push(Trait::from_fields([
            (schema::TRAIT_ID, "CO_360:0000001"),
            (schema::TRAIT_NAME, "Height"),
            (schema::TRAIT_CLASS, "Morphological trait"),
            (schema::MAIN_ABBREVIATION, "H"),
            (schema::TRAIT_SYNONYMS, "Length, H , Tallness"),
        ]));
        model.methods.push(Method::from_fields([
            (schema::METHOD_ID, "2"),
            (schema::METHOD_NAME, "Visual"),
            (schema::METHOD_DESCRIPTION, "Measured by eye"),
        ]));
        model.scales.push(Scale::from_fields([
            (schema::SCALE_ID, "3"),
            (schema::SCALE_NAME, "Score"),
            ("Category 1", "1=Low"),
            ("Category 3", "3 = High"),
        ]));
        model.variables.push(Variable::from_fields([
            (schema::VARIABLE_ID, "45"),
            (schema::VARIABLE_NAME, "H_Visual_Score"),
            (schema::TRAIT_NAME, "Height"),
            (schema::METHOD_NAME, "Visual"),
            (schema::SCALE_NAME, "Score"),
        ]));
        model.derive_trait_classes();
        model
    }

    #[test]
    fn test_header_block() {
        let output = OboWriter::new(stamp())
            .with_user("curator")
            .write(&model())
            .unwrap();
        assert!(output.text.starts_with(
            "format-version: 1.2\ndate: 05:03:2024 14:07\nsaved-by: curator\n"
        ));
        assert!(output.text.contains("default-namespace: kelp\nontology: co_360\n\n"));
    }

    #[test]
    fn test_trait_synonyms_and_class() {
        let text = OboWriter::new(stamp()).write(&model()).unwrap().text;
        assert!(text.contains("id: CO_360:Morphological\nname: Morphological trait\nnamespace: kelp_trait\nis_a: CO_360:ROOT\n"));
        assert!(text.contains(
            "synonym: \"H\" EXACT []\nsynonym: \"Length\" EXACT []\nsynonym: \"Tallness\" EXACT []\nis_a: CO_360:Morphological\n"
        ));
    }

    #[test]
    fn test_scale_categories_keep_position() {
        let text = OboWriter::new(stamp()).write(&model()).unwrap().text;
        assert!(text.contains("id: CO_360:0000003/1\nname: Low\nnamespace: kelp_scale\nsynonym: \"1\" EXACT []\nis_a: CO_360:0000003\n"));
        assert!(text.contains("id: CO_360:0000003/3\nname: High\n"));
        assert!(!text.contains("CO_360:0000003/2"));
    }

    #[test]
    fn test_variable_term() {
        let text = OboWriter::new(stamp()).write(&model()).unwrap().text;
        assert!(text.contains("def: \"Measured by eye (Score)\" []"));
        assert!(text.contains(
            "relationship: variable_of CO_360:0000001\nrelationship: variable_of CO_360:0000002\nrelationship: variable_of CO_360:0000003\n"
        ));
        assert!(text.contains("relationship: method_of CO_360:0000001"));
        assert!(text.contains("relationship: scale_of CO_360:0000002"));
    }

    #[test]
    fn test_missing_root_id() {
        let mut model = model();
        model.root.id.clear();
        assert!(matches!(
            OboWriter::new(stamp()).write(&model),
            Err(OntologyError::MissingInput(_))
        ));
    }

    #[test]
    fn test_header_write_failure_is_an_error() {
        struct Closed;
        impl Write for Closed {
            fn write_str(&mut self, _: &str) -> fmt::Result {
                Err(fmt::Error)
            }
        }
        let writer = OboWriter::new(stamp());
        let err = writer.write_header(&mut Closed, "CO_360", "kelp").map_err(OboWriter::fmt_error);
        assert!(matches!(err, Err(OntologyError::Parse { .. })));
    }

    #[test]
    fn test_exhausted_ids_fail_the_document() {
        let mut model = model();
        model.traits[0].id = Some(u64::MAX.to_string());
        model.variables[0].id = None;
        assert!(matches!(
            OboWriter::new(stamp()).write(&model),
            Err(OntologyError::Config(_))
        ));
    }
}
