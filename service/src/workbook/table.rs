//! In-memory tables of the Trait Workbook

use indexmap::IndexMap;
use trait_ontology_core::error::{OntologyError, Result};
use trait_ontology_core::schema::TableKind;

/// One data row, keyed by column header. Blank cells are absent.
pub type Row = IndexMap<String, String>;

/// Spreadsheet row number of the data row at `index` (header is row 1)
#[must_use]
pub fn sheet_row(index: usize) -> usize {
    index + 2
}

/// A header row plus data rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub kind: TableKind,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given headers
    #[must_use]
    pub fn new(kind: TableKind, headers: Vec<String>) -> Self {
        Self {
            kind,
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from a cell grid whose first row is the header.
    ///
    /// Cells are trimmed, blank cells dropped, and rows with no values at
    /// all skipped.
    #[must_use]
    pub fn from_grid(kind: TableKind, grid: Vec<Vec<String>>) -> Self {
        let mut grid = grid.into_iter();
        let headers: Vec<String> = grid
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();

        let rows = grid
            .map(|cells| {
                cells
                    .into_iter()
                    .enumerate()
                    .filter_map(|(col, cell)| {
                        let header = headers.get(col).filter(|h| !h.is_empty())?;
                        let value = cell.trim();
                        (!value.is_empty()).then(|| (header.clone(), value.to_string()))
                    })
                    .collect::<Row>()
            })
            .filter(|row| !row.is_empty())
            .collect();

        Self {
            kind,
            headers,
            rows,
        }
    }

    /// Header row followed by one line of cells per data row
    #[must_use]
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.headers.clone());
        for row in &self.rows {
            grid.push(
                self.headers
                    .iter()
                    .map(|h| row.get(h).cloned().unwrap_or_default())
                    .collect(),
            );
        }
        grid
    }

    /// Position of a column header
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Value of `column` in each row, `None` where blank
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.rows.iter().map(move |row| row.get(column).map(String::as_str))
    }

    /// Rows as `(column, value)` pairs, ready for `Record::from_fields`
    pub fn records(&self) -> impl Iterator<Item = impl Iterator<Item = (&str, &str)>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The six tables of a Trait Workbook, in sheet order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitWorkbook {
    tables: IndexMap<TableKind, Table>,
}

impl TraitWorkbook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a table
    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.kind, table);
    }

    #[must_use]
    pub fn get(&self, kind: TableKind) -> Option<&Table> {
        self.tables.get(&kind)
    }

    /// A table that must be present
    ///
    /// # Errors
    ///
    /// Returns `MissingInput` naming the absent sheet.
    pub fn require(&self, kind: TableKind) -> Result<&Table> {
        self.get(kind)
            .ok_or_else(|| OntologyError::missing_input(format!("'{kind}' sheet")))
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }
}
