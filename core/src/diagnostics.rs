//! Recoverable findings reported during a conversion run

use crate::schema::TableKind;
use std::fmt;

/// Which foreign key of a variable failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignKey {
    Trait,
    Method,
    Scale,
}

impl ForeignKey {
    /// Column carrying the key in the Variables table
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            ForeignKey::Trait => crate::schema::TRAIT_NAME,
            ForeignKey::Method => crate::schema::METHOD_NAME,
            ForeignKey::Scale => crate::schema::SCALE_NAME,
        }
    }
}

/// A variable referencing a trait, method or scale name that does not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub variable: String,
    pub key: ForeignKey,
    /// The unresolved name, empty when the column was blank
    pub value: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "variable '{}': {} '{}' not found",
            self.variable,
            self.key.column(),
            self.value
        )
    }
}

/// Two rows of one table sharing a name while differing in other fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameConflict {
    pub table: TableKind,
    pub name: String,
    /// Position of the row that was kept
    pub kept: usize,
    /// Position of the row that was skipped
    pub skipped: usize,
}

impl fmt::Display for NameConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: '{}' defined differently at positions {} and {}; keeping the first",
            self.table, self.name, self.kept, self.skipped
        )
    }
}

/// Everything a run reports without failing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub mismatches: Vec<Mismatch>,
    pub conflicts: Vec<NameConflict>,
}

impl Diagnostics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty() && self.conflicts.is_empty()
    }

    /// Emit every finding as a warning
    pub fn log(&self) {
        for mismatch in &self.mismatches {
            tracing::warn!("skipping {mismatch}");
        }
        for conflict in &self.conflicts {
            tracing::warn!("{conflict}");
        }
    }
}
