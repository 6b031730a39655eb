//! One [`Rewriter`] per command-line tool.

use std::path::Path;

use super::{Rewriter, Rewritten, SourceFile};
use crate::core::footnotes::{hoist_footnotes_with_options, FootnoteOptions};
use crate::core::labels::{inject_labels, LabelRegistry};
use crate::core::subtitles::{chapter_number, convert_subtitles_with_options, SubtitleOptions};
use crate::core::verse::{convert_verses_with_options, VerseOptions};

#[derive(Debug, Clone, Default)]
pub struct VerseRewriter {
    pub options: VerseOptions,
}

impl VerseRewriter {
    pub fn new(options: VerseOptions) -> Self {
        Self { options }
    }
}

impl Rewriter for VerseRewriter {
    fn name(&self) -> &'static str {
        "verses"
    }

    fn unit(&self) -> &'static str {
        "verse"
    }

    fn rewrite(&mut self, _path: &Path, text: &str) -> Option<Rewritten> {
        let output = convert_verses_with_options(text, &self.options);
        Some(Rewritten::from_scan(text, "\\Verse", output))
    }
}

/// Labels are unique across every file of the run.
#[derive(Debug, Clone, Default)]
pub struct LabelRewriter {
    registry: LabelRegistry,
}

impl LabelRewriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rewriter for LabelRewriter {
    fn name(&self) -> &'static str {
        "labels"
    }

    fn unit(&self) -> &'static str {
        "label"
    }

    fn verb(&self) -> &'static str {
        "Inserted"
    }

    fn prepare(&mut self, sources: &[SourceFile]) {
        for source in sources {
            self.registry.register_document(&source.text);
        }
    }

    fn rewrite(&mut self, _path: &Path, text: &str) -> Option<Rewritten> {
        let output = inject_labels(text, &mut self.registry);
        Some(Rewritten::from_scan(text, "heading", output))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FootnoteRewriter {
    pub options: FootnoteOptions,
}

impl FootnoteRewriter {
    pub fn new(options: FootnoteOptions) -> Self {
        Self { options }
    }
}

impl Rewriter for FootnoteRewriter {
    fn name(&self) -> &'static str {
        "footnotes"
    }

    fn unit(&self) -> &'static str {
        "footnote"
    }

    fn rewrite(&mut self, _path: &Path, text: &str) -> Option<Rewritten> {
        let output = hoist_footnotes_with_options(text, &self.options);
        Some(Rewritten::from_scan(text, "\\footnotetext", output))
    }
}

/// Only `chapter_NN.tex` files are eligible.
#[derive(Debug, Clone, Default)]
pub struct SubtitleRewriter {
    pub options: SubtitleOptions,
}

impl SubtitleRewriter {
    pub fn new(options: SubtitleOptions) -> Self {
        Self { options }
    }
}

impl Rewriter for SubtitleRewriter {
    fn name(&self) -> &'static str {
        "subtitles"
    }

    fn unit(&self) -> &'static str {
        "subtitle"
    }

    fn rewrite(&mut self, path: &Path, text: &str) -> Option<Rewritten> {
        let chapter = chapter_number(path)?;
        let output = convert_subtitles_with_options(text, chapter, &self.options);
        Some(Rewritten::from_scan(text, "\\chapter", output))
    }
}
