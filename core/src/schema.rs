//! Fixed column schema of the six ontology tables
//!
//! Column names are shared by the Trait Dictionary header and the Trait
//! Workbook sheets, so a value read under one name in either medium lands in
//! the same record field.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const VARIABLE_ID: &str = "Variable ID";
pub const VARIABLE_NAME: &str = "Variable name";
pub const VARIABLE_LABEL: &str = "Variable label";
pub const VARIABLE_SYNONYMS: &str = "Variable synonyms";
pub const CONTEXT_OF_USE: &str = "Context of use";
pub const GROWTH_STAGE: &str = "Growth stage";
pub const VARIABLE_STATUS: &str = "Variable status";
pub const VARIABLE_XREF: &str = "Variable Xref";
pub const INSTITUTION: &str = "Institution";
pub const SCIENTIST: &str = "Scientist";
pub const DATE: &str = "Date";
pub const LANGUAGE: &str = "Language";
pub const CROP: &str = "Crop";
pub const VARIABLE_KEY: &str = "Variable key";

pub const TRAIT_ID: &str = "Trait ID";
pub const TRAIT_NAME: &str = "Trait name";
pub const TRAIT_CLASS: &str = "Trait class";
pub const TRAIT_DESCRIPTION: &str = "Trait description";
pub const TRAIT_SYNONYMS: &str = "Trait synonyms";
pub const MAIN_ABBREVIATION: &str = "Main trait abbreviation";
pub const ALT_ABBREVIATIONS: &str = "Alternative trait abbreviations";
pub const ENTITY: &str = "Entity";
pub const ATTRIBUTE: &str = "Attribute";
pub const TRAIT_STATUS: &str = "Trait status";
pub const TRAIT_XREF: &str = "Trait Xref";

pub const METHOD_ID: &str = "Method ID";
pub const METHOD_NAME: &str = "Method name";
pub const METHOD_CLASS: &str = "Method class";
pub const METHOD_DESCRIPTION: &str = "Method description";
pub const FORMULA: &str = "Formula";
pub const METHOD_REFERENCE: &str = "Method reference";

pub const SCALE_ID: &str = "Scale ID";
pub const SCALE_NAME: &str = "Scale name";
pub const SCALE_CLASS: &str = "Scale class";
pub const DECIMAL_PLACES: &str = "Decimal places";
pub const LOWER_LIMIT: &str = "Lower limit";
pub const UPPER_LIMIT: &str = "Upper limit";
pub const SCALE_XREF: &str = "Scale Xref";

pub const TRAIT_CLASS_ID: &str = "Trait class ID";

pub const ROOT_ID: &str = "Root ID";
pub const ROOT_NAME: &str = "Root name";
pub const NAMESPACE: &str = "Namespace";

/// Variable columns, foreign keys last
pub const VARIABLE_COLUMNS: &[&str] = &[
    VARIABLE_ID,
    VARIABLE_NAME,
    VARIABLE_LABEL,
    VARIABLE_SYNONYMS,
    CONTEXT_OF_USE,
    GROWTH_STAGE,
    VARIABLE_STATUS,
    VARIABLE_XREF,
    INSTITUTION,
    SCIENTIST,
    DATE,
    LANGUAGE,
    CROP,
    TRAIT_NAME,
    METHOD_NAME,
    SCALE_NAME,
];

pub const TRAIT_COLUMNS: &[&str] = &[
    TRAIT_ID,
    TRAIT_NAME,
    TRAIT_CLASS,
    TRAIT_DESCRIPTION,
    TRAIT_SYNONYMS,
    MAIN_ABBREVIATION,
    ALT_ABBREVIATIONS,
    ENTITY,
    ATTRIBUTE,
    TRAIT_STATUS,
    TRAIT_XREF,
];

pub const METHOD_COLUMNS: &[&str] = &[
    METHOD_ID,
    METHOD_NAME,
    METHOD_CLASS,
    METHOD_DESCRIPTION,
    FORMULA,
    METHOD_REFERENCE,
];

/// Fixed scale columns; `Category N` columns follow them
pub const SCALE_COLUMNS: &[&str] = &[
    SCALE_ID,
    SCALE_NAME,
    SCALE_CLASS,
    DECIMAL_PLACES,
    LOWER_LIMIT,
    UPPER_LIMIT,
    SCALE_XREF,
];

pub const TRAIT_CLASS_COLUMNS: &[&str] = &[TRAIT_CLASS_ID, TRAIT_CLASS];

pub const ROOT_COLUMNS: &[&str] = &[ROOT_ID, ROOT_NAME, NAMESPACE];

/// Prefix of the dynamically numbered scale category columns
pub const CATEGORY_PREFIX: &str = "Category ";

/// Column header of the `index`-th scale category (1-based)
#[must_use]
pub fn category_column(index: usize) -> String {
    format!("{CATEGORY_PREFIX}{index}")
}

/// Parse a `Category N` header back into its index
#[must_use]
pub fn category_index(column: &str) -> Option<usize> {
    column
        .strip_prefix(CATEGORY_PREFIX)
        .and_then(|n| n.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}

/// The six tables of the Trait Workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableKind {
    Variables,
    Traits,
    Methods,
    Scales,
    TraitClasses,
    Root,
}

impl TableKind {
    /// All tables in workbook sheet order
    pub const ALL: [TableKind; 6] = [
        TableKind::Variables,
        TableKind::Traits,
        TableKind::Methods,
        TableKind::Scales,
        TableKind::TraitClasses,
        TableKind::Root,
    ];

    /// Sheet name used in the workbook
    #[must_use]
    pub fn sheet_name(self) -> &'static str {
        match self {
            TableKind::Variables => "Variables",
            TableKind::Traits => "Traits",
            TableKind::Methods => "Methods",
            TableKind::Scales => "Scales",
            TableKind::TraitClasses => "Trait Classes",
            TableKind::Root => "Root",
        }
    }

    /// Resolve a sheet name, ignoring case
    #[must_use]
    pub fn from_sheet_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.sheet_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Fixed columns of the table, without dynamic category columns
    #[must_use]
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Variables => VARIABLE_COLUMNS,
            TableKind::Traits => TRAIT_COLUMNS,
            TableKind::Methods => METHOD_COLUMNS,
            TableKind::Scales => SCALE_COLUMNS,
            TableKind::TraitClasses => TRAIT_CLASS_COLUMNS,
            TableKind::Root => ROOT_COLUMNS,
        }
    }

    /// Column holding the record's name key
    #[must_use]
    pub fn name_column(self) -> &'static str {
        match self {
            TableKind::Variables => VARIABLE_NAME,
            TableKind::Traits => TRAIT_NAME,
            TableKind::Methods => METHOD_NAME,
            TableKind::Scales => SCALE_NAME,
            TableKind::TraitClasses => TRAIT_CLASS,
            TableKind::Root => ROOT_ID,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_columns() {
        assert_eq!(category_column(3), "Category 3");
        assert_eq!(category_index("Category 12"), Some(12));
        assert_eq!(category_index("Category 0"), None);
        assert_eq!(category_index("Scale name"), None);
    }

    #[test]
    fn test_sheet_names() {
        assert_eq!(
            TableKind::from_sheet_name("trait classes"),
            Some(TableKind::TraitClasses)
        );
        assert_eq!(TableKind::from_sheet_name("Summary"), None);
        assert_eq!(TableKind::Scales.to_string(), "Scales");
    }
}
