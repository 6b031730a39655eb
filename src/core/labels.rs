//! Cross-reference labels for headings
//!
//! Every `\chapter`, `\section`, `\subsection` and `\subsubsection` that is not
//! already followed by a `\label{...}` receives one derived from its title,
//! e.g. `\section{Überblick}` gains `\label{sec-ueberblick}`. Labels are unique
//! across a whole project: the [`LabelRegistry`] is filled with the labels of
//! every document before any of them is rewritten.

use std::collections::HashSet;

use phf::phf_map;
use texprep_scan::{
    parse_invocation, skip_ws_and_comments, FailureKind, Invocations, MacroInvocation, MacroSpec,
    ParseFailure, ScanOutput,
};

use super::slug::heading_slug;

/// Heading command -> label prefix
pub static HEADING_PREFIX: phf::Map<&'static str, &'static str> = phf_map! {
    "chapter" => "chap",
    "section" => "sec",
    "subsection" => "subsec",
    "subsubsection" => "subsubsec",
};

const HEADINGS: [MacroSpec<'static>; 4] = [
    MacroSpec::new("chapter", 1).with_star(),
    MacroSpec::new("section", 1).with_star(),
    MacroSpec::new("subsection", 1).with_star(),
    MacroSpec::new("subsubsection", 1).with_star(),
];

pub(crate) const LABEL: MacroSpec<'static> = MacroSpec::new("label", 1);

// =============================================================================
// Label registry
// =============================================================================

/// The set of labels already taken in a project.
#[derive(Debug, Default, Clone)]
pub struct LabelRegistry {
    used: HashSet<String>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the labels of all `documents`.
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a str>) -> Self {
        let mut registry = Self::new();
        for doc in documents {
            registry.register_document(doc);
        }
        registry
    }

    /// Mark every `\label{...}` in `doc` as taken.
    pub fn register_document(&mut self, doc: &str) {
        self.used.extend(collect_labels(doc));
    }

    /// Mark `label` as taken. Returns `false` if it already was.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        self.used.insert(label.into())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.used.contains(label)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Claim `base`, or the first free `base-2`, `base-3`, ...
    pub fn unique(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut i = 2usize;
        loop {
            let candidate = format!("{}-{}", base, i);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            i += 1;
        }
    }
}

/// Collect all `\label{...}` values (trimmed, non-empty) from a document.
pub fn collect_labels(doc: &str) -> HashSet<String> {
    Invocations::new(doc, LABEL)
        .filter_map(Result::ok)
        .map(|inv| inv.arg(0).trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

// =============================================================================
// Injection
// =============================================================================

/// Whether a non-empty `\label{...}` follows `pos`, ignoring whitespace and comments.
fn has_label_ahead(doc: &str, pos: usize) -> bool {
    let at = skip_ws_and_comments(doc, pos);
    matches!(
        parse_invocation(doc, at, &LABEL),
        Ok(inv) if !inv.arg(0).trim().is_empty()
    )
}

/// Whether `pos` lies after an unescaped `%` on its line.
fn in_comment(doc: &str, pos: usize) -> bool {
    let line_start = doc[..pos].rfind('\n').map_or(0, |i| i + 1);
    let bytes = doc.as_bytes();
    let mut i = line_start;
    while i < pos {
        match bytes[i] {
            b'\\' => i += 2,
            b'%' => return true,
            _ => i += 1,
        }
    }
    false
}

/// Parse whichever heading command starts at `at`.
fn parse_heading(
    doc: &str,
    at: usize,
) -> Option<(&'static str, Result<MacroInvocation<'_>, ParseFailure>)> {
    HEADINGS.iter().find_map(|spec| match parse_invocation(doc, at, spec) {
        Err(failure) if failure.kind == FailureKind::NameMismatch => None,
        result => Some((spec.name, result)),
    })
}

/// Label base for a heading: `<prefix>-<slug of title>`.
pub fn label_base(command: &str, title: &str) -> String {
    let prefix = HEADING_PREFIX.get(command).copied().unwrap_or("sec");
    format!("{}-{}", prefix, heading_slug(title.trim()))
}

/// Insert a unique `\label{...}` after every unlabeled heading.
///
/// The label goes directly after the heading's closing brace. Headings inside
/// `%` comments are left alone. `count` is the number of labels inserted.
pub fn inject_labels(doc: &str, registry: &mut LabelRegistry) -> ScanOutput {
    let mut out = String::with_capacity(doc.len() + 64);
    let mut copied = 0usize;
    let mut cursor = 0usize;
    let mut count = 0usize;
    let mut failures = Vec::new();

    while let Some(rel) = doc[cursor..].find('\\') {
        let at = cursor + rel;
        let Some((command, result)) = parse_heading(doc, at) else {
            cursor = at + 1;
            continue;
        };
        match result {
            Ok(inv) => {
                cursor = inv.end();
                if in_comment(doc, at) || has_label_ahead(doc, inv.end()) {
                    continue;
                }
                let label = registry.unique(&label_base(command, inv.arg(0)));
                out.push_str(&doc[copied..inv.end()]);
                out.push_str("\\label{");
                out.push_str(&label);
                out.push('}');
                copied = inv.end();
                count += 1;
            }
            Err(failure) => {
                failures.push(failure);
                cursor = at + 1;
            }
        }
    }
    out.push_str(&doc[copied..]);

    ScanOutput {
        content: out,
        count,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inserts_label_after_heading() {
        let mut reg = LabelRegistry::new();
        let out = inject_labels("\\section{Introduction}\nText", &mut reg);
        assert_eq!(out.content, "\\section{Introduction}\\label{sec-introduction}\nText");
        assert_eq!(out.count, 1);
    }

    #[test]
    fn keeps_existing_label_across_comments() {
        let doc = "\\chapter{One}\n% keep\n  \\label{my-one}\n";
        let mut reg = LabelRegistry::from_documents([doc]);
        let out = inject_labels(doc, &mut reg);
        assert_eq!(out.content, doc);
        assert_eq!(out.count, 0);
        assert!(reg.contains("my-one"));
    }

    #[test]
    fn empty_label_does_not_count() {
        let mut reg = LabelRegistry::new();
        let out = inject_labels("\\section{A}\\label{ }", &mut reg);
        assert_eq!(out.content, "\\section{A}\\label{sec-a}\\label{ }");
    }

    #[test]
    fn star_and_short_title() {
        let mut reg = LabelRegistry::new();
        let out = inject_labels("\\subsection*[Short]{Long \\emph{Title}}", &mut reg);
        assert_eq!(
            out.content,
            "\\subsection*[Short]{Long \\emph{Title}}\\label{subsec-long-title}"
        );
    }

    #[test]
    fn duplicates_get_numbered() {
        let mut reg = LabelRegistry::new();
        reg.insert("sec-notes");
        let out = inject_labels("\\section{Notes}\n\\section{Notes}", &mut reg);
        assert_eq!(
            out.content,
            "\\section{Notes}\\label{sec-notes-2}\n\\section{Notes}\\label{sec-notes-3}"
        );
    }

    #[test]
    fn commented_and_lookalike_commands_are_skipped() {
        let doc = "% \\section{Old}\n\\sectionmark{x}\n\\section{New}";
        let mut reg = LabelRegistry::new();
        let out = inject_labels(doc, &mut reg);
        assert_eq!(
            out.content,
            "% \\section{Old}\n\\sectionmark{x}\n\\section{New}\\label{sec-new}"
        );
    }

    #[test]
    fn escaped_percent_is_not_a_comment() {
        let doc = "50\\% done \\section{Rest}";
        let mut reg = LabelRegistry::new();
        assert_eq!(inject_labels(doc, &mut reg).count, 1);
    }

    #[test]
    fn unbalanced_heading_is_reported_and_left() {
        let doc = "\\section{Broken\n\nmore";
        let mut reg = LabelRegistry::new();
        let out = inject_labels(doc, &mut reg);
        assert_eq!(out.content, doc);
        assert_eq!(out.failures.len(), 1);
    }

    #[test]
    fn collect_labels_trims() {
        let labels = collect_labels("\\label{ a }\\label{b}\\label{}");
        assert_eq!(labels.len(), 2);
        assert!(labels.contains("a"));
        assert!(labels.contains("b"));
    }

    #[test]
    fn unique_counts_from_two() {
        let mut reg = LabelRegistry::new();
        assert_eq!(reg.unique("x"), "x");
        assert_eq!(reg.unique("x"), "x-2");
        assert_eq!(reg.unique("x"), "x-3");
        assert_eq!(reg.len(), 3);
    }
}
