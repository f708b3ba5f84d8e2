//! Fixed per-table validation rules

use trait_ontology_core::schema::{self, TableKind};

/// Required and unique columns of one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRules {
    pub table: TableKind,
    /// Columns every row must populate
    pub required: &'static [&'static str],
    /// Columns whose non-empty values may not repeat
    pub unique: &'static [&'static str],
}

/// Rules for every workbook table, in sheet order
pub const TABLE_RULES: &[TableRules] = &[
    TableRules {
        table: TableKind::Variables,
        required: &[
            schema::VARIABLE_NAME,
            schema::TRAIT_NAME,
            schema::METHOD_NAME,
            schema::SCALE_NAME,
        ],
        unique: &[schema::VARIABLE_ID, schema::VARIABLE_NAME],
    },
    TableRules {
        table: TableKind::Traits,
        required: &[schema::TRAIT_NAME, schema::TRAIT_CLASS],
        unique: &[schema::TRAIT_ID, schema::TRAIT_NAME],
    },
    TableRules {
        table: TableKind::Methods,
        required: &[schema::METHOD_NAME],
        unique: &[schema::METHOD_ID, schema::METHOD_NAME],
    },
    TableRules {
        table: TableKind::Scales,
        required: &[schema::SCALE_NAME, schema::SCALE_CLASS],
        unique: &[schema::SCALE_ID, schema::SCALE_NAME],
    },
    TableRules {
        table: TableKind::TraitClasses,
        required: &[schema::TRAIT_CLASS],
        unique: &[schema::TRAIT_CLASS_ID, schema::TRAIT_CLASS],
    },
    TableRules {
        table: TableKind::Root,
        required: &[schema::ROOT_ID, schema::NAMESPACE],
        unique: &[],
    },
];
