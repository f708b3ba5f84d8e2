//! Namespace retargeting on OBO text
//!
//! Works line by line on the document; no record model is involved.

use super::OBO_DATE_FORMAT;
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::debug;

static NAMESPACE_LINE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^namespace:\s*(.*?)\s*$").expect("Valid namespace line regex pattern")
});

/// Rewrites `namespace:` declarations and the header of an OBO document
#[derive(Debug, Clone)]
pub struct NamespaceRewrite {
    target: String,
    sources: BTreeSet<String>,
    generator: String,
    remark: String,
    generated_at: NaiveDateTime,
}

impl NamespaceRewrite {
    /// Merge every namespace in `sources` into `target`
    #[must_use]
    pub fn new<I, S>(target: impl Into<String>, sources: I, generated_at: NaiveDateTime) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let target = target.into();
        Self {
            remark: format!("namespaces merged into {target}"),
            target,
            sources: sources
                .into_iter()
                .map(|s| {
                    let s: String = s.into();
                    s.trim().to_string()
                })
                .filter(|s| !s.is_empty())
                .collect(),
            generator: trait_ontology_core::config::OboConfig::default().generator,
            generated_at,
        }
    }

    #[must_use]
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    #[must_use]
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = remark.into();
        self
    }

    /// Header values written by the rewrite, in insertion order
    fn header_values(&self) -> [(&'static str, String); 4] {
        [
            ("date", self.generated_at.format(OBO_DATE_FORMAT).to_string()),
            ("auto-generated-by", self.generator.clone()),
            ("remark", self.remark.clone()),
            ("default-namespace", self.target.clone()),
        ]
    }

    /// Rewrite `text`.
    ///
    /// Header keys are replaced where present and otherwise inserted before
    /// the first blank line. `namespace:` lines naming a source namespace
    /// are retargeted; all other lines pass through unchanged.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        let header_end = lines
            .iter()
            .position(|l| l.trim().is_empty() || l.trim_start().starts_with('['))
            .unwrap_or(lines.len());

        let mut missing = Vec::new();
        for (key, value) in self.header_values() {
            let prefix = format!("{key}:");
            let replacement = format!("{key}: {value}");
            match lines[..header_end]
                .iter()
                .position(|l| l.starts_with(&prefix))
            {
                Some(at) => lines[at] = replacement,
                None => missing.push(replacement),
            }
        }

        let mut retargeted = 0usize;
        for line in lines.iter_mut().skip(header_end) {
            let is_source = NAMESPACE_LINE
                .captures(line)
                .and_then(|c| c.get(1))
                .is_some_and(|ns| self.sources.contains(ns.as_str()));
            if is_source {
                *line = format!("namespace: {}", self.target);
                retargeted += 1;
            }
        }
        debug!(
            "retargeted {retargeted} namespace lines, inserted {} header lines",
            missing.len()
        );

        lines.splice(header_end..header_end, missing);
        let mut out = lines.join("\n");
        if text.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}
