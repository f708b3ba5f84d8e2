//! Conversion commands
//!
//! Each command reads its whole input, builds the record model once, and
//! writes whole outputs. Validation runs before any output file is written.

use crate::dictionary::{
    DictionaryParser, DictionarySerializer, dictionary_headers, model_from_records,
    records_from_model,
};
use crate::fetch::DictionaryFetcher;
use crate::obo::{NamespaceRewrite, OboWriter};
use crate::validator::Validator;
use crate::workbook::{
    TraitWorkbook, WorkbookFeatures, WorkbookOutput, WorkbookReader, WorkbookWriter,
    read_workbook, save_workbook,
};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use trait_ontology_core::config::ConverterConfig;
use trait_ontology_core::diagnostics::Diagnostics;
use trait_ontology_core::error::{OntologyError, Result};
use trait_ontology_core::types::Root;
use tracing::info;

/// Where a Trait Dictionary comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    /// A local dictionary file
    File(PathBuf),
    /// The registry, addressed by ontology root id
    Remote(String),
}

/// Outputs produced from a workbook
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookConversion {
    pub dictionary: Option<String>,
    pub obo: Option<String>,
    pub diagnostics: Diagnostics,
}

/// Local time used as the OBO `date`
#[must_use]
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(OntologyError::missing_input(format!(
            "input file {} does not exist",
            path.display()
        )))
    }
}

/// Convert dictionary text into workbook tables.
///
/// # Errors
///
/// Returns a parse error if the text is not a readable dictionary.
pub fn convert_dictionary_text(text: &str, config: &ConverterConfig) -> Result<WorkbookOutput> {
    let parsed = DictionaryParser::new().parse(text)?;
    let root = config.root.apply(Root::default());
    let (model, mut diagnostics) = model_from_records(&parsed.records, root, parsed.category_width);
    let mut output = WorkbookWriter::new().write(&model, &diagnostics.conflicts);
    diagnostics.conflicts = std::mem::take(&mut output.diagnostics.conflicts);
    output.diagnostics = diagnostics;
    output.diagnostics.log();
    Ok(output)
}

/// Build a Trait Workbook file from a local or remote dictionary.
///
/// A remote source supplies the root id when none is configured; a local
/// file needs one from the configuration.
///
/// # Errors
///
/// Returns `MissingInput` for an absent input file or root id, a `Fetch` error when the
/// registry cannot be reached, or an I/O or spreadsheet error when the
/// workbook cannot be written.
pub async fn dictionary_to_workbook(
    source: &DictionarySource,
    output: &Path,
    config: &ConverterConfig,
    fetcher: &dyn DictionaryFetcher,
) -> Result<WorkbookOutput> {
    let mut config = config.clone();
    if let DictionarySource::Remote(root_id) = source {
        if config.root.id.is_none() {
            config.root.id = Some(root_id.clone());
        }
    }
    let root_id = config.require_root_id()?;
    info!("building workbook for ontology {root_id}");

    let text = match source {
        DictionarySource::File(path) => {
            require_file(path)?;
            tokio::fs::read_to_string(path).await?
        }
        DictionarySource::Remote(root_id) => fetcher.fetch(root_id).await?,
    };

    let converted = convert_dictionary_text(&text, &config)?;
    save_workbook(
        output,
        &converted.workbook,
        &converted.marks,
        WorkbookFeatures::from(&config.workbook),
    )?;
    Ok(converted)
}

/// Produce dictionary and/or OBO text from workbook tables.
///
/// The workbook is validated first unless `config.force` is set; the
/// configured root overrides the workbook's Root sheet.
///
/// # Errors
///
/// Returns the first validation failure, `MissingInput` when the Variables
/// sheet or the root id needed for OBO is missing, or a serialization error.
pub fn convert_workbook(
    workbook: &TraitWorkbook,
    config: &ConverterConfig,
    dictionary: bool,
    obo: bool,
    generated_at: NaiveDateTime,
) -> Result<WorkbookConversion> {
    Validator::new().with_force(config.force).validate(workbook)?;

    let mut model = WorkbookReader::new()
        .with_institution(config.institution.clone())
        .read(workbook)?;
    model.root = config.root.apply(std::mem::take(&mut model.root));

    let mut conversion = WorkbookConversion::default();
    if dictionary {
        let (records, diagnostics) = records_from_model(&model);
        let headers = dictionary_headers(&model.category_width);
        conversion.dictionary = Some(DictionarySerializer::new().serialize(&headers, &records)?);
        conversion.diagnostics = diagnostics;
    }
    if obo {
        let output = OboWriter::from_config(config, generated_at).write(&model)?;
        conversion.obo = Some(output.text);
        if !dictionary {
            conversion.diagnostics = output.diagnostics;
        }
    }
    conversion.diagnostics.log();
    Ok(conversion)
}

/// Read a workbook file and write the configured dictionary and OBO outputs.
///
/// # Errors
///
/// Returns `MissingInput` when no output path is configured or the input is
/// absent; validation failures abort before any file is written.
pub fn workbook_to_outputs(input: &Path, config: &ConverterConfig) -> Result<WorkbookConversion> {
    let dictionary_path = config.output.dictionary.as_deref();
    let obo_path = config.output.obo.as_deref();
    if dictionary_path.is_none() && obo_path.is_none() {
        return Err(OntologyError::missing_input(
            "an output path for the dictionary or the OBO file",
        ));
    }
    require_file(input)?;

    let workbook = read_workbook(input)?;
    let conversion = convert_workbook(
        &workbook,
        config,
        dictionary_path.is_some(),
        obo_path.is_some(),
        now(),
    )?;

    if let (Some(path), Some(text)) = (dictionary_path, &conversion.dictionary) {
        std::fs::write(path, text)?;
        info!("wrote dictionary {}", path.display());
    }
    if let (Some(path), Some(text)) = (obo_path, &conversion.obo) {
        std::fs::write(path, text)?;
        info!("wrote OBO {}", path.display());
    }
    Ok(conversion)
}

/// Retarget namespaces of an OBO file into `target`.
///
/// # Errors
///
/// Returns `MissingInput` for an absent input, or an I/O error.
pub fn rewrite_namespaces(
    input: &Path,
    output: &Path,
    target: &str,
    sources: &[String],
    config: &ConverterConfig,
) -> Result<()> {
    require_file(input)?;
    let text = std::fs::read_to_string(input)?;
    let source_name = input
        .file_name()
        .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());

    let rewritten = NamespaceRewrite::new(target, sources.iter().cloned(), now())
        .with_generator(config.obo.generator.clone())
        .with_remark(format!("namespaces of {source_name} merged into {target}"))
        .apply(&text);
    std::fs::write(output, rewritten)?;
    info!("wrote {} with namespace {target}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_text_to_tables() {
        let text = "\"Variable name\";\"Trait name\";\"Method name\";\"Scale name\";\"Scale class\"\n\
                    \"V1\";\"Height\";\"Ruler\";\"cm\";\"Numerical\"\n\
                    \"V2\";\"Height\";\"Visual\";\"cm\";\"Numerical\"\n";
        let mut config = ConverterConfig::default();
        config.root.id = Some("CO_360".to_string());
        let output = convert_dictionary_text(text, &config).unwrap();

        let traits = output
            .workbook
            .get(trait_ontology_core::TableKind::Traits)
            .unwrap();
        assert_eq!(traits.len(), 1);
        let root = output
            .workbook
            .get(trait_ontology_core::TableKind::Root)
            .unwrap();
        assert_eq!(root.rows[0].get("Namespace").map(String::as_str), Some("CO_360"));
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_outputs_required() {
        let err = workbook_to_outputs(Path::new("missing.xlsx"), &ConverterConfig::default())
            .unwrap_err();
        assert!(matches!(err, OntologyError::MissingInput(_)));
    }
}
