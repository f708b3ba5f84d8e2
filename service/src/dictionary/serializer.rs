//! Trait Dictionary serializer

use super::FlatRecord;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use trait_ontology_core::error::{OntologyError, Result};

/// Writes flat records as Trait Dictionary text
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionarySerializer;

impl DictionarySerializer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emit the header line and one line per record.
    ///
    /// Every field is quoted; embedded quotes are doubled. Column order is
    /// `headers`, whatever fields each record populates.
    ///
    /// # Errors
    ///
    /// Returns an error if the output buffer cannot be written.
    pub fn serialize(&self, headers: &[String], records: &[FlatRecord]) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .quote(b'"')
            .quote_style(QuoteStyle::Always)
            .double_quote(true)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(headers).map_err(Self::write_error)?;
        for record in records {
            writer
                .write_record(
                    headers
                        .iter()
                        .map(|h| record.get(h).map_or("", String::as_str)),
                )
                .map_err(Self::write_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| OntologyError::parse(format!("failed to flush dictionary output: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| OntologyError::parse(format!("dictionary output is not UTF-8: {e}")))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn write_error(err: csv::Error) -> OntologyError {
        OntologyError::parse(format!("failed to write dictionary row: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sparse_fields_serialize_empty() {
        let headers = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let mut record = FlatRecord::new();
        record.insert("C".to_string(), "3".to_string());
        record.insert("A".to_string(), "say \"hi\"; bye".to_string());
        let text = DictionarySerializer::new()
            .serialize(&headers, &[record])
            .unwrap();
        assert_eq!(
            text,
            "\"A\";\"B\";\"C\"\n\"say \"\"hi\"\"; bye\";\"\";\"3\"\n"
        );
    }
}
