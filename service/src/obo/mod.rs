//! OBO codec
//!
//! Serializes the record model into OBO 1.2 text and retargets the
//! namespaces of existing OBO documents.
//!
//! ## Term layout
//!
//! ```text
//! [Term]
//! id: CO_360:0000045
//! name: Plant height
//! namespace: rice_variable
//! def: "Measured with a ruler (cm)" []
//! relationship: variable_of CO_360:0000001
//! relationship: variable_of CO_360:0000002
//! relationship: variable_of CO_360:0000003
//! ```

pub mod namespace;
pub mod stanza;
pub mod writer;

/// `date:` header format (`dd:MM:yyyy HH:mm`)
pub const OBO_DATE_FORMAT: &str = "%d:%m:%Y %H:%M";

pub use namespace::NamespaceRewrite;
pub use stanza::{Stanza, StanzaKind};
pub use writer::{OboOutput, OboWriter};
