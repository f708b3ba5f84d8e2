//! Tests for the Trait Workbook codec and its xlsx medium

mod helpers;

use helpers::fixtures::{SAMPLE_DICTIONARY, config, valid_workbook, write_xlsx};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use trait_ontology_core::schema::{self, TableKind};
use trait_ontology_core::types::Record;
use trait_ontology_service::pipeline::convert_dictionary_text;
use trait_ontology_service::workbook::{
    MarkKind, WorkbookFeatures, WorkbookReader, read_workbook, save_workbook,
};

/// Numeric cells typed by a curator read back as plain integers
#[test]
fn test_read_curated_xlsx() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("curated.xlsx");
    write_xlsx(
        &path,
        &[
            (
                "variables",
                &[
                    &["Variable ID", "Variable name", "Trait name", "Method name", "Scale name"],
                    &["45", "PH_Ruler_cm", "Plant height", "Ruler", "cm"],
                ],
            ),
            ("Traits", &[&["Trait ID", "Trait name"], &["1", "Plant height"]]),
            ("Notes", &[&["Free text"], &["ignored"]]),
        ],
    )
    .unwrap();

    let workbook = read_workbook(&path).unwrap();
    assert!(workbook.get(TableKind::Root).is_none());
    let variables = workbook.get(TableKind::Variables).unwrap();
    assert_eq!(
        variables.rows[0].get(schema::VARIABLE_ID).map(String::as_str),
        Some("45")
    );
    assert_eq!(workbook.tables().count(), 2);
}

/// Dictionary → workbook file → model keeps every record and category
#[test]
fn test_dictionary_workbook_round_trip() {
    let output = convert_dictionary_text(SAMPLE_DICTIONARY, &config("CO_360")).unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ontology.xlsx");
    save_workbook(&path, &output.workbook, &output.marks, WorkbookFeatures::ALL).unwrap();

    let workbook = read_workbook(&path).unwrap();
    let scales = workbook.get(TableKind::Scales).unwrap();
    assert_eq!(scales.headers.len(), 7 + 10);

    let model = WorkbookReader::new().read(&workbook).unwrap();
    assert_eq!(model.root.id, "CO_360");
    assert_eq!(model.variables.len(), 2);
    assert_eq!(model.traits.len(), 2);
    assert_eq!(model.methods.len(), 1);
    assert_eq!(model.scales[1].categories.len(), 3);
    assert_eq!(model.traits[0].id.as_deref(), Some("1"));

    let variables = workbook.get(TableKind::Variables).unwrap();
    assert_eq!(
        variables.rows[0].get(schema::VARIABLE_KEY).map(String::as_str),
        Some("Height|Visual|cm")
    );
}

#[test]
fn test_institution_filter_limits_referenced_rows() {
    let model = WorkbookReader::new()
        .with_institution(Some("IRRI".to_string()))
        .read(&valid_workbook())
        .unwrap();
    assert_eq!(model.variables.len(), 1);
    assert_eq!(model.variables[0].name(), "PH_Ruler_cm");
    assert_eq!(model.methods.len(), 1);
    assert_eq!(model.methods[0].name(), "Ruler");
    assert!(model.traits.iter().all(|t| t.name() != "Unreferenced"));
}

#[test]
fn test_dangling_references_marked() {
    let text = concat!(
        "\"Variable name\";\"Trait name\";\"Method name\";\"Scale name\"\n",
        "\"V1\";\"Height\";\"Visual\";\"cm\"\n",
        "\"V2\";\"Height\";\"\";\"cm\"\n",
    );
    let output = convert_dictionary_text(text, &config("CO_360")).unwrap();
    let variables = output.workbook.get(TableKind::Variables).unwrap();
    assert_eq!(variables.len(), 2);
    assert!(
        output
            .marks
            .iter()
            .all(|m| m.kind != MarkKind::Dangling || m.column != schema::METHOD_NAME)
    );

    let mut workbook = output.workbook.clone();
    let mut traits = workbook.get(TableKind::Traits).unwrap().clone();
    traits.rows.clear();
    workbook.insert(traits);
    let marks = trait_ontology_service::workbook::compute_marks(&workbook, &[]);
    let dangling = marks
        .iter()
        .find(|m| m.kind == MarkKind::Dangling && m.column == schema::TRAIT_NAME)
        .unwrap();
    assert_eq!(dangling.rows.len(), 2);
}
