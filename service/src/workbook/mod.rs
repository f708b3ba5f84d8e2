//! Trait Workbook codec
//!
//! The workbook is the curators' authoring medium: six linked tables
//! (Variables, Traits, Methods, Scales, Trait Classes, Root), one per sheet.
//! Variables reference traits, methods and scales by name.
//!
//! ## Modules
//!
//! - `table`: in-memory tables, independent of the file medium
//! - `reader`: tables to the record model, keeping the referenced subset
//! - `writer`: record model to tables, one row per distinct name
//! - `marks`: duplicate and dangling-reference markers
//! - `features`: presentation switches
//! - `xlsx`: the `.xlsx` file medium

pub mod features;
pub mod marks;
pub mod reader;
pub mod table;
pub mod writer;
pub mod xlsx;

pub use features::WorkbookFeatures;
pub use marks::{ColumnMarks, MarkKind, compute_marks};
pub use reader::WorkbookReader;
pub use table::{Row, Table, TraitWorkbook, sheet_row};
pub use writer::{WorkbookOutput, WorkbookWriter};
pub use xlsx::{read_workbook, read_workbook_bytes, save_workbook, workbook_to_bytes};
