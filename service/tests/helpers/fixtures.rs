//! Sample dictionaries, workbooks and xlsx files

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;
use trait_ontology_core::config::ConverterConfig;
use trait_ontology_core::schema::TableKind;
use trait_ontology_service::workbook::{Table, TraitWorkbook};

/// Two variables sharing a method; the second scale has a surplus category
pub const SAMPLE_DICTIONARY: &str = concat!(
    "\"Variable ID\";\"Variable name\";\"Variable label\";\"Variable synonyms\";\"Institution\";",
    "\"Scientist\";\"Date\";\"Trait ID\";\"Trait name\";\"Trait class\";\"Trait description\";",
    "\"Main trait abbreviation\";\"Trait synonyms\";\"Method ID\";\"Method name\";",
    "\"Method description\";\"Formula\";\"Scale ID\";\"Scale name\";\"Scale class\";",
    "\"Category 1\";\"Category 2\"\n",
    "\"CO_360:0000045\";\"PH_Visual_cm\";\"Plant height visual\";\"PH, Height_v\";\"IRRI\";",
    "\"J. Doe\";\"2023-01-01\";\"CO_360:0000001\";\"Height\";\"Morphological trait\";",
    "\"Height of the plant\";\"PH\";\"Stature\";\"CO_360:0000002\";\"Visual\";",
    "\"Estimated by eye\";\"\";\"CO_360:0000003\";\"cm\";\"Numerical\";\"\";\"\"\n",
    "\"CO_360:0000046\";\"Vigor_Visual_Score\";\"\";\"\";\"CIMMYT, IRRI\";",
    "\"\";\"\";\"CO_360:0000004\";\"Vigor\";\"Agronomic traits\";",
    "\"Early vigor; seedling stage\";\"\";\"\";\"CO_360:0000002\";\"Visual\";",
    "\"Estimated by eye\";\"\";\"CO_360:0000005\";\"1-3 score\";\"Ordinal\";\"1=Low\";\"2=Medium\";\"3= High\"\n",
);

/// Minimal dictionary: one variable on trait Height, method Visual, scale cm
pub const HEIGHT_DICTIONARY: &str = concat!(
    "\"Variable name\";\"Trait name\";\"Trait class\";\"Method name\";\"Method description\";",
    "\"Scale name\";\"Scale class\"\n",
    "\"Height_Visual_cm\";\"Height\";\"Morphological trait\";\"Visual\";\"Estimated by eye\";",
    "\"cm\";\"Numerical\"\n",
);

pub fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| (*c).to_string()).collect())
        .collect()
}

pub fn table(kind: TableKind, rows: &[&[&str]]) -> Table {
    Table::from_grid(kind, grid(rows))
}

/// A workbook that passes validation
pub fn valid_workbook() -> TraitWorkbook {
    let mut wb = TraitWorkbook::new();
    wb.insert(table(
        TableKind::Variables,
        &[
            &["Variable ID", "Variable name", "Trait name", "Method name", "Scale name", "Institution"],
            &["45", "PH_Ruler_cm", "Plant height", "Ruler", "cm", "IRRI"],
            &["46", "PH_Visual_cm", "Plant height", "Visual", "cm", "CIMMYT"],
        ],
    ));
    wb.insert(table(
        TableKind::Traits,
        &[
            &["Trait ID", "Trait name", "Trait class"],
            &["1", "Plant height", "Morphological trait"],
            &["9", "Unreferenced", "Quality trait"],
        ],
    ));
    wb.insert(table(
        TableKind::Methods,
        &[
            &["Method ID", "Method name", "Method description"],
            &["2", "Ruler", "Measured with a ruler"],
            &["4", "Visual", "Estimated by eye"],
        ],
    ));
    wb.insert(table(
        TableKind::Scales,
        &[&["Scale ID", "Scale name", "Scale class"], &["3", "cm", "Numerical"]],
    ));
    wb.insert(table(
        TableKind::TraitClasses,
        &[&["Trait class ID", "Trait class"], &["Morphological", "Morphological trait"]],
    ));
    wb.insert(table(
        TableKind::Root,
        &[&["Root ID", "Root name", "Namespace"], &["CO_360", "Test ontology", "test"]],
    ));
    wb
}

/// Write sheets as a curator would: numeric-looking cells become numbers and
/// `YYYY-MM-DD` cells become date-formatted dates
pub fn write_xlsx(path: &Path, sheets: &[(&str, &[&[&str]])]) -> Result<(), Box<dyn std::error::Error>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name)?;
        for (r, row) in rows.iter().enumerate() {
            let r = u32::try_from(r)?;
            for (c, cell) in row.iter().enumerate() {
                let c = u16::try_from(c)?;
                if cell.is_empty() {
                    continue;
                }
                if r == 0 {
                    sheet.write_with_format(r, c, *cell, &header_format)?;
                } else if let Ok(date) = NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
                    let date = ExcelDateTime::from_ymd(
                        u16::try_from(date.year())?,
                        u8::try_from(date.month())?,
                        u8::try_from(date.day())?,
                    )?;
                    sheet.write_datetime_with_format(r, c, &date, &date_format)?;
                } else if let Ok(number) = cell.parse::<f64>() {
                    sheet.write(r, c, number)?;
                } else {
                    sheet.write(r, c, *cell)?;
                }
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

pub fn config(root_id: &str) -> ConverterConfig {
    let mut config = ConverterConfig::default();
    config.root.id = Some(root_id.to_string());
    config
}

pub fn stamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}
