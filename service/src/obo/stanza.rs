//! OBO stanzas: a tag → values map rendered in fixed tag order

use indexmap::IndexMap;
use std::fmt::{self, Write};

/// Emission order of tags inside a `[Term]` stanza
pub const TERM_TAG_ORDER: &[&str] = &[
    "id",
    "is_anonymous",
    "name",
    "namespace",
    "alt_id",
    "def",
    "comment",
    "subset",
    "synonym",
    "xref",
    "is_a",
    "intersection_of",
    "union_of",
    "disjoint_from",
    "relationship",
    "is_obsolete",
    "replaced_by",
    "consider",
    "created_by",
    "creation_date",
];

/// Emission order of tags inside a `[Typedef]` stanza
pub const TYPEDEF_TAG_ORDER: &[&str] = &[
    "id",
    "is_anonymous",
    "name",
    "namespace",
    "alt_id",
    "def",
    "comment",
    "subset",
    "synonym",
    "xref",
    "is_transitive",
    "is_a",
    "intersection_of",
    "union_of",
    "disjoint_from",
    "relationship",
    "is_obsolete",
    "replaced_by",
    "consider",
    "created_by",
    "creation_date",
];

/// Stanza header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StanzaKind {
    Term,
    Typedef,
}

impl StanzaKind {
    fn header(self) -> &'static str {
        match self {
            StanzaKind::Term => "[Term]",
            StanzaKind::Typedef => "[Typedef]",
        }
    }

    fn tag_order(self) -> &'static [&'static str] {
        match self {
            StanzaKind::Term => TERM_TAG_ORDER,
            StanzaKind::Typedef => TYPEDEF_TAG_ORDER,
        }
    }
}

/// One `[Term]` or `[Typedef]` block.
///
/// A tag may hold several values; each is emitted as its own line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    kind: StanzaKind,
    tags: IndexMap<&'static str, Vec<String>>,
}

impl Stanza {
    #[must_use]
    pub fn term(id: impl Into<String>) -> Self {
        Self::new(StanzaKind::Term, id)
    }

    #[must_use]
    pub fn typedef(id: impl Into<String>) -> Self {
        Self::new(StanzaKind::Typedef, id)
    }

    fn new(kind: StanzaKind, id: impl Into<String>) -> Self {
        let mut stanza = Self {
            kind,
            tags: IndexMap::new(),
        };
        stanza.add("id", id);
        stanza
    }

    /// Append a value under `tag`; blank values are ignored
    pub fn add(&mut self, tag: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.tags.entry(tag).or_default().push(value);
        }
        self
    }

    /// Append a value under `tag` unless it is already present
    pub fn add_unique(&mut self, tag: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if !self.values(tag).iter().any(|v| *v == value) {
            self.add(tag, value);
        }
        self
    }

    /// Append `def: "text" []`
    pub fn add_def(&mut self, text: &str) -> &mut Self {
        if text.trim().is_empty() {
            return self;
        }
        self.add("def", format!("\"{}\" []", escape(text.trim())))
    }

    /// Append `synonym: "text" EXACT []`
    pub fn add_synonym(&mut self, text: &str) -> &mut Self {
        if text.trim().is_empty() {
            return self;
        }
        self.add_unique("synonym", format!("\"{}\" EXACT []", escape(text.trim())))
    }

    /// Values stored under `tag`
    #[must_use]
    pub fn values(&self, tag: &str) -> &[String] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// First value stored under `tag`
    #[must_use]
    pub fn first(&self, tag: &str) -> Option<&str> {
        self.values(tag).first().map(String::as_str)
    }

    /// Write the block, tags in the fixed order, followed by a blank line
    ///
    /// # Errors
    ///
    /// Returns an error if `out` rejects the text.
    pub fn write_to<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "{}", self.kind.header())?;
        for tag in self.kind.tag_order() {
            for value in self.values(tag) {
                writeln!(out, "{tag}: {value}")?;
            }
        }
        writeln!(out)
    }

}

/// Escape characters that would end a quoted OBO string
#[must_use]
pub fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rendered(stanza: &Stanza) -> String {
        let mut out = String::new();
        stanza.write_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_render_uses_tag_order() {
        let mut stanza = Stanza::term("CO_360:0000001");
        stanza
            .add("relationship", "variable_of CO_360:0000002")
            .add("relationship", "variable_of CO_360:0000003")
            .add("namespace", "test_variable")
            .add("name", "Plant height")
            .add_synonym("PH")
            .add_synonym("PH");
        assert_eq!(
            rendered(&stanza),
            "[Term]\n\
             id: CO_360:0000001\n\
             name: Plant height\n\
             namespace: test_variable\n\
             synonym: \"PH\" EXACT []\n\
             relationship: variable_of CO_360:0000002\n\
             relationship: variable_of CO_360:0000003\n\n"
        );
    }

    #[test]
    fn test_typedef_transitive_before_is_a() {
        let mut stanza = Stanza::typedef("method_of");
        stanza.add("is_a", "x").add("is_transitive", "true").add("name", "method_of");
        let text = rendered(&stanza);
        assert!(text.starts_with("[Typedef]\nid: method_of\nname: method_of\nis_transitive: true\nis_a: x\n"));
    }

    /// A sink that refuses writes surfaces the error instead of dropping it
    #[test]
    fn test_write_errors_propagate() {
        struct Full;
        impl Write for Full {
            fn write_str(&mut self, _: &str) -> fmt::Result {
                Err(fmt::Error)
            }
        }
        assert!(Stanza::term("X:1").write_to(&mut Full).is_err());
    }

    #[test]
    fn test_def_escapes_quotes() {
        let mut stanza = Stanza::term("X:1");
        stanza.add_def("the \"tall\" one").add("comment", "  ");
        assert_eq!(stanza.first("def"), Some("\"the \\\"tall\\\" one\" []"));
        assert!(stanza.values("comment").is_empty());
    }
}
