//! Trait Dictionary parser
//!
//! Rows are `;`-separated and `"`-quoted. A doubled quote inside a quoted
//! field is a literal quote and a `;` inside quotes is data. Fields past the
//! end of the header, or under a blank header cell, are numbered scale
//! categories continuing after the last `Category N` column of the header.
//!
//! Header names are trimmed. Values are kept exactly as written, including
//! surrounding whitespace; a field that is blank after trimming counts as
//! empty.

use super::FlatRecord;
use csv::{ReaderBuilder, StringRecord};
use trait_ontology_core::category::CategoryWidth;
use trait_ontology_core::error::{OntologyError, Result};
use trait_ontology_core::schema::{category_column, category_index};
use tracing::debug;

/// Parsed dictionary text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDictionary {
    /// Header row as written in the source
    pub headers: Vec<String>,
    /// One record per data row
    pub records: Vec<FlatRecord>,
    /// Highest category index seen in headers or data
    pub category_width: CategoryWidth,
}

/// Parser for Trait Dictionary text
#[derive(Debug, Clone, Default)]
pub struct DictionaryParser {
    /// Fail on rows with more fields than the header instead of treating
    /// the surplus as categories
    strict: bool,
}

impl DictionaryParser {
    /// Create a new parser
    #[must_use]
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Create a parser that rejects rows wider than the header
    #[must_use]
    pub fn new_strict() -> Self {
        Self { strict: true }
    }

    /// Parse dictionary text into flat records
    ///
    /// # Errors
    ///
    /// Returns a parse error if the text is empty, has no header, or a row
    /// cannot be decoded (and, in strict mode, if a row is wider than the
    /// header).
    pub fn parse(&self, text: &str) -> Result<ParsedDictionary> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .quote(b'"')
            .double_quote(true)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows = reader.records();
        let header = match rows.next() {
            Some(record) => record.map_err(|e| Self::row_error(&e))?,
            None => return Err(OntologyError::parse("dictionary text has no header row")),
        };
        let mut columns = ColumnMap::from_header(&header);

        let mut records = Vec::new();
        for row in rows {
            let row = row.map_err(|e| Self::row_error(&e))?;
            if row.iter().all(is_blank) {
                continue;
            }
            if self.strict && row.len() > header.len() {
                let line = row.position().map_or(0, csv::Position::line);
                return Err(OntologyError::parse_at(
                    format!(
                        "row has {} fields but the header declares {}",
                        row.len(),
                        header.len()
                    ),
                    format!("line {line}"),
                ));
            }

            let mut record = FlatRecord::new();
            for (col, value) in row.iter().enumerate() {
                if is_blank(value) {
                    continue;
                }
                let name = columns.name(col).to_string();
                if let Some(index) = category_index(&name) {
                    columns.width.observe(index);
                }
                record.insert(name, value.to_string());
            }
            records.push(record);
        }

        debug!(
            "parsed {} dictionary rows, {} category columns",
            records.len(),
            columns.width.max_seen()
        );

        Ok(ParsedDictionary {
            headers: columns.header,
            records,
            category_width: columns.width,
        })
    }

    fn row_error(err: &csv::Error) -> OntologyError {
        match err.position() {
            Some(pos) => OntologyError::parse_at(err.to_string(), format!("line {}", pos.line())),
            None => OntologyError::parse(err.to_string()),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Column position to field name, growing category names on demand
struct ColumnMap {
    header: Vec<String>,
    names: Vec<String>,
    next_category: usize,
    width: CategoryWidth,
}

impl ColumnMap {
    fn from_header(record: &StringRecord) -> Self {
        let header: Vec<String> = record.iter().map(|h| h.trim().to_string()).collect();
        let mut width = CategoryWidth::new();
        let last_category = header
            .iter()
            .filter_map(|h| category_index(h))
            .inspect(|i| width.observe(*i))
            .max()
            .unwrap_or(0);

        let mut map = Self {
            header: header.clone(),
            names: Vec::with_capacity(header.len()),
            next_category: last_category + 1,
            width,
        };
        for name in header {
            if name.is_empty() {
                let generated = map.take_category();
                map.names.push(generated);
            } else {
                map.names.push(name);
            }
        }
        map
    }

    fn take_category(&mut self) -> String {
        let name = category_column(self.next_category);
        self.next_category += 1;
        name
    }

    fn name(&mut self, col: usize) -> &str {
        while self.names.len() <= col {
            let generated = self.take_category();
            self.names.push(generated);
        }
        &self.names[col]
    }
}
