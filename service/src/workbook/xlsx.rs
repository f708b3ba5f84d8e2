//! xlsx medium for the Trait Workbook
//!
//! Reading uses `calamine`, writing uses `rust_xlsxwriter`. Both sides only
//! move cell grids; table semantics live in [`super::table`].

use super::features::WorkbookFeatures;
use super::marks::{ColumnMarks, MarkKind};
use super::table::{Table, TraitWorkbook};
use calamine::{Data, ExcelDateTime, Reader, Xlsx};
use chrono::NaiveTime;
use rust_xlsxwriter::{Color, Format, FormatBorder, Formula, Workbook, Worksheet};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use trait_ontology_core::error::{OntologyError, Result};
use trait_ontology_core::schema::{self, TableKind};
use tracing::{debug, info};

const COLUMN_WIDTH: f64 = 18.0;

/// Safely cast usize to u16 for Excel column indices.
/// Excel has a maximum of 16,384 columns (2^14).
fn usize_to_u16_column(value: usize) -> Result<u16> {
    const MAX_EXCEL_COLUMNS: usize = 16_384;

    if value >= MAX_EXCEL_COLUMNS {
        return Err(OntologyError::spreadsheet(format!(
            "Too many columns for Excel: {value} (max: {MAX_EXCEL_COLUMNS})"
        )));
    }

    u16::try_from(value)
        .map_err(|_| OntologyError::spreadsheet(format!("Column index {value} cannot fit in u16")))
}

fn usize_to_u32_row(value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| OntologyError::spreadsheet(format!("Row index {value} cannot fit in u32")))
}

/// Spreadsheet column letters for a 0-based index (`0` → `A`, `26` → `AA`)
#[must_use]
pub fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Read a workbook file.
///
/// Sheets are matched to tables by name, ignoring case; other sheets are
/// skipped.
///
/// # Errors
///
/// Returns a `Spreadsheet` error if the file is not a readable xlsx workbook.
pub fn read_workbook(path: &Path) -> Result<TraitWorkbook> {
    let mut workbook: Xlsx<_> = calamine::open_workbook(path).map_err(|e: calamine::XlsxError| {
        OntologyError::spreadsheet(format!("Failed to open {}: {e}", path.display()))
    })?;
    let tables = collect_tables(&mut workbook)?;
    info!("read {} sheets from {}", tables.tables().count(), path.display());
    Ok(tables)
}

/// Read a workbook held in memory.
///
/// # Errors
///
/// Returns a `Spreadsheet` error if the bytes are not an xlsx workbook.
pub fn read_workbook_bytes(data: &[u8]) -> Result<TraitWorkbook> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))
        .map_err(|e: calamine::XlsxError| OntologyError::spreadsheet(e.to_string()))?;
    collect_tables(&mut workbook)
}

fn collect_tables<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<TraitWorkbook> {
    let mut tables = TraitWorkbook::new();
    for sheet_name in workbook.sheet_names().to_vec() {
        let Some(kind) = TableKind::from_sheet_name(&sheet_name) else {
            debug!("ignoring sheet '{sheet_name}'");
            continue;
        };
        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            OntologyError::spreadsheet(format!("Failed to read sheet '{sheet_name}': {e}"))
        })?;
        let grid = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        tables.insert(Table::from_grid(kind, grid));
    }
    Ok(tables)
}

/// Text of a cell; whole numbers lose their `.0` and dates read as ISO text
#[allow(clippy::cast_possible_truncation)]
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::DateTime(dt) => date_text(dt),
        Data::DateTimeIso(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `YYYY-MM-DD`, with the time of day only when it is not midnight
fn date_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        return dt.to_string();
    }
    match dt.as_datetime() {
        Some(value) if value.time() == NaiveTime::MIN => value.format("%Y-%m-%d").to_string(),
        Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => dt.to_string(),
    }
}

/// Render tables into xlsx bytes.
///
/// # Errors
///
/// Returns a `Spreadsheet` error if a sheet cannot be written.
pub fn workbook_to_bytes(
    tables: &TraitWorkbook,
    marks: &[ColumnMarks],
    features: WorkbookFeatures,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x00D9_E1F2))
        .set_border(FormatBorder::Thin);
    let duplicate_format = Format::new().set_background_color(Color::Orange);
    let dangling_format = Format::new().set_background_color(Color::Red);

    for table in tables.tables() {
        let flagged = if features.contains(WorkbookFeatures::HIGHLIGHT) {
            flagged_cells(table.kind, marks)
        } else {
            HashMap::new()
        };

        let worksheet = workbook
            .add_worksheet()
            .set_name(table.kind.sheet_name())
            .map_err(|e| OntologyError::spreadsheet(e.to_string()))?;

        write_table(
            worksheet,
            table,
            &flagged,
            &header_format,
            &duplicate_format,
            &dangling_format,
        )?;

        if features.contains(WorkbookFeatures::FREEZE_HEADERS) {
            worksheet
                .set_freeze_panes(1, 0)
                .map_err(|e| OntologyError::spreadsheet(e.to_string()))?;
        }

        if features.contains(WorkbookFeatures::AUTOFILTER) && !table.headers.is_empty() {
            let last_row = usize_to_u32_row(table.len())?;
            let max_col = usize_to_u16_column(table.headers.len() - 1)?;
            worksheet
                .autofilter(0, 0, last_row, max_col)
                .map_err(|e| OntologyError::spreadsheet(e.to_string()))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| OntologyError::spreadsheet(format!("Failed to save workbook: {e}")))
}

/// Write tables to an xlsx file.
///
/// # Errors
///
/// Returns an error if rendering fails or the file cannot be written.
pub fn save_workbook(
    path: &Path,
    tables: &TraitWorkbook,
    marks: &[ColumnMarks],
    features: WorkbookFeatures,
) -> Result<()> {
    let content = workbook_to_bytes(tables, marks, features)?;
    std::fs::write(path, content)?;
    info!("wrote workbook {}", path.display());
    Ok(())
}

/// `(column, data row)` → mark kind; dangling wins over duplicate
fn flagged_cells(kind: TableKind, marks: &[ColumnMarks]) -> HashMap<(usize, usize), MarkKind> {
    let mut flagged = HashMap::new();
    for mark in marks.iter().filter(|m| m.table == kind) {
        for row in &mark.rows {
            flagged
                .entry((mark.column_index, *row))
                .and_modify(|k: &mut MarkKind| *k = (*k).max(mark.kind))
                .or_insert(mark.kind);
        }
    }
    flagged
}

fn write_table(
    worksheet: &mut Worksheet,
    table: &Table,
    flagged: &HashMap<(usize, usize), MarkKind>,
    header_format: &Format,
    duplicate_format: &Format,
    dangling_format: &Format,
) -> Result<()> {
    for (col, header) in table.headers.iter().enumerate() {
        let col = usize_to_u16_column(col)?;
        worksheet
            .write_string_with_format(0, col, header, header_format)
            .map_err(|e| OntologyError::spreadsheet(e.to_string()))?;
        worksheet
            .set_column_width(col, COLUMN_WIDTH)
            .map_err(|e| OntologyError::spreadsheet(e.to_string()))?;
    }

    let key_formula = variable_key_formula(table);

    for (index, row) in table.rows.iter().enumerate() {
        let sheet_row = usize_to_u32_row(index + 1)?;
        for (col, header) in table.headers.iter().enumerate() {
            let Some(value) = row.get(header) else {
                continue;
            };
            let format = match flagged.get(&(col, index)) {
                Some(MarkKind::Duplicate) => Some(duplicate_format),
                Some(MarkKind::Dangling) => Some(dangling_format),
                None => None,
            };
            let col = usize_to_u16_column(col)?;

            let written = match (&key_formula, header.as_str()) {
                (Some(build), schema::VARIABLE_KEY) => {
                    let formula = Formula::new(build(sheet_row + 1)).set_result(value);
                    match format {
                        Some(f) => worksheet.write_formula_with_format(sheet_row, col, formula, f),
                        None => worksheet.write_formula(sheet_row, col, formula),
                    }
                }
                _ => match format {
                    Some(f) => worksheet.write_string_with_format(sheet_row, col, value, f),
                    None => worksheet.write_string(sheet_row, col, value),
                },
            };
            written.map_err(|e| OntologyError::spreadsheet(e.to_string()))?;
        }
    }
    Ok(())
}

/// Builder of the `Variable key` formula for a 1-based sheet row, when the
/// table carries the key and the three name columns
fn variable_key_formula(table: &Table) -> Option<impl Fn(u32) -> String> {
    if table.kind != TableKind::Variables {
        return None;
    }
    table.column_index(schema::VARIABLE_KEY)?;
    let trait_col = column_letters(table.column_index(schema::TRAIT_NAME)?);
    let method_col = column_letters(table.column_index(schema::METHOD_NAME)?);
    let scale_col = column_letters(table.column_index(schema::SCALE_NAME)?);
    Some(move |row: u32| {
        format!("=CONCATENATE({trait_col}{row},\"|\",{method_col}{row},\"|\",{scale_col}{row})")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::marks::compute_marks;

    fn table(kind: TableKind, rows: &[&[&str]]) -> Table {
        Table::from_grid(
            kind,
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn test_cell_text_numbers() {
        assert_eq!(cell_text(&Data::Float(45.0)), "45");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::String(" cm ".to_string())), "cm");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    /// A date typed into a cell reads back as text, not as its serial number
    #[test]
    fn test_date_cells_read_as_iso_text() {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let sheet = workbook.add_worksheet().set_name("Variables").unwrap();
        sheet.write_string(0, 0, "Variable name").unwrap();
        sheet.write_string(0, 1, "Date").unwrap();
        sheet.write_string(1, 0, "PH_cm").unwrap();
        let date = rust_xlsxwriter::ExcelDateTime::from_ymd(2023, 1, 1).unwrap();
        sheet.write_datetime_with_format(1, 1, &date, &date_format).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let read = read_workbook_bytes(&bytes).unwrap();
        let variables = read.get(TableKind::Variables).unwrap();
        assert_eq!(variables.rows[0].get("Date").map(String::as_str), Some("2023-01-01"));
    }

    #[test]
    fn test_key_formula_references_name_columns() {
        let t = table(
            TableKind::Variables,
            &[&["Variable name", "Trait name", "Method name", "Scale name", "Variable key"]],
        );
        let build = variable_key_formula(&t).unwrap();
        assert_eq!(build(2), "=CONCATENATE(B2,\"|\",C2,\"|\",D2)");
    }

    #[test]
    fn test_xlsx_round_trip() {
        let mut wb = TraitWorkbook::new();
        wb.insert(table(
            TableKind::Variables,
            &[
                &["Variable name", "Trait name", "Method name", "Scale name", "Variable key"],
                &["V1", "Height", "Ruler", "cm", "Height|Ruler|cm"],
                &["V1", "Height", "Ruler", "mm", "Height|Ruler|mm"],
            ],
        ));
        wb.insert(table(
            TableKind::Scales,
            &[&["Scale ID", "Scale name"], &["12", "cm"]],
        ));
        let marks = compute_marks(&wb, &[]);
        let bytes = workbook_to_bytes(&wb, &marks, WorkbookFeatures::ALL).unwrap();

        let read = read_workbook_bytes(&bytes).unwrap();
        let variables = read.get(TableKind::Variables).unwrap();
        assert_eq!(variables.len(), 2);
        assert_eq!(
            variables.rows[1].get("Variable key").map(String::as_str),
            Some("Height|Ruler|mm")
        );
        let scales = read.get(TableKind::Scales).unwrap();
        assert_eq!(scales.rows[0].get("Scale ID").map(String::as_str), Some("12"));
    }
}
