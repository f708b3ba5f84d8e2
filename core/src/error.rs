//! Error types for ontology conversion

use thiserror::Error;

/// Main error type for conversion runs
#[derive(Error, Debug)]
pub enum OntologyError {
    /// A required input file or argument was not supplied
    #[error("Missing required input: {0}")]
    MissingInput(String),

    /// A row is missing a value for a required column
    #[error("{table} row {row}: required field '{field}' is empty")]
    RequiredField {
        /// Table the row belongs to
        table: String,
        /// Spreadsheet row number (header is row 1)
        row: usize,
        /// Column that must be populated
        field: String,
    },

    /// Two or more rows share a value in a column declared unique
    #[error("{table}: duplicate value '{value}' in unique field '{field}' (rows {rows:?})")]
    DuplicateValue {
        /// Table the rows belong to
        table: String,
        /// Column declared unique
        field: String,
        /// The shared value
        value: String,
        /// Spreadsheet row numbers carrying the value
        rows: Vec<usize>,
    },

    /// Input text could not be parsed
    #[error("Failed to parse input: {message}")]
    Parse {
        /// Error message
        message: String,
        /// Location in the input if available
        location: Option<String>,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote dictionary retrieval failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Spreadsheet medium could not be read or written
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, OntologyError>;

impl OntologyError {
    /// Create a new parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            location: None,
        }
    }

    /// Create a new parse error with location
    #[must_use]
    pub fn parse_at(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            location: Some(location.into()),
        }
    }

    /// Create a missing input error
    #[must_use]
    pub fn missing_input(what: impl Into<String>) -> Self {
        Self::MissingInput(what.into())
    }

    /// Create a fetch error
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch(message.into())
    }

    /// Create a spreadsheet error
    #[must_use]
    pub fn spreadsheet(message: impl Into<String>) -> Self {
        Self::Spreadsheet(message.into())
    }

    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the error is a validation failure that `force` may bypass
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::RequiredField { .. } | Self::DuplicateValue { .. }
        )
    }
}

impl From<toml::de::Error> for OntologyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = OntologyError::parse("unterminated quote");
        assert!(matches!(err, OntologyError::Parse { .. }));

        let err = OntologyError::parse_at("short row", "line 10");
        match err {
            OntologyError::Parse { location, .. } => {
                assert_eq!(location.as_deref(), Some("line 10"));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_validation_display() {
        let err = OntologyError::DuplicateValue {
            table: "Traits".to_string(),
            field: "Trait name".to_string(),
            value: "Height".to_string(),
            rows: vec![2, 5],
        };
        let display = err.to_string();
        assert!(display.contains("Trait name"));
        assert!(display.contains("Height"));
        assert!(err.is_validation());
        assert!(!OntologyError::fetch("timeout").is_validation());
    }
}
