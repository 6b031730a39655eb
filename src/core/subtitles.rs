//! Chapter openers with subtitles
//!
//! `\chapter{..}\label{..}\chaptersubtitle{Subtitle}` becomes a plain
//! chapter heading followed by a "CHAPTER n" line and an uppercased
//! `\paragraph*`, which survives EPUB conversion. The chapter number comes
//! from the file name (`chapter_04.tex` → 4).

use std::fmt::Write;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use texprep_scan::{
    parse_invocation, skip_whitespace, skip_ws_and_comments, Invocations, MacroSpec, ScanOutput,
};

use super::labels::LABEL;

pub const CHAPTER: MacroSpec<'static> = MacroSpec::new("chapter", 1).with_star();
pub const CHAPTER_SUBTITLE: MacroSpec<'static> = MacroSpec::new("chaptersubtitle", 1);

lazy_static! {
    static ref CHAPTER_FILE: Regex = Regex::new(r"(?i)^chapter_(\d{2})\.tex$").unwrap();
}

/// Options for subtitle conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleOptions {
    /// Word printed before the chapter number
    /// Default: `CHAPTER`
    pub heading_word: String,
}

impl Default for SubtitleOptions {
    fn default() -> Self {
        Self {
            heading_word: "CHAPTER".to_string(),
        }
    }
}

/// Chapter number encoded in a `chapter_NN.tex` file name.
pub fn chapter_number(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    let caps = CHAPTER_FILE.captures(name)?;
    caps[1].parse().ok()
}

/// Rewrite every chapter opener of a document with default options.
pub fn convert_subtitles(tex: &str, chapter: u32) -> ScanOutput {
    convert_subtitles_with_options(tex, chapter, &SubtitleOptions::default())
}

/// Rewrite every `\chapter{..}\label{..}\chaptersubtitle{..}` sequence.
///
/// The chapter and label are kept verbatim (minus trailing whitespace). Only
/// whitespace may separate the label from the subtitle. Unnumbered
/// `\chapter*` headings are left alone.
pub fn convert_subtitles_with_options(
    tex: &str,
    chapter: u32,
    options: &SubtitleOptions,
) -> ScanOutput {
    let mut out = String::with_capacity(tex.len() + 64);
    let mut copied = 0usize;
    let mut count = 0usize;
    let mut failures = Vec::new();

    for item in Invocations::new(tex, CHAPTER) {
        let heading = match item {
            Ok(inv) => inv,
            Err(failure) => {
                failures.push(failure);
                continue;
            }
        };
        if heading.star {
            continue;
        }
        let label_at = skip_ws_and_comments(tex, heading.end());
        let Ok(label) = parse_invocation(tex, label_at, &LABEL) else {
            continue;
        };
        if label.arg(0).is_empty() {
            continue;
        }
        let subtitle_at = skip_whitespace(tex, label.end());
        let Ok(subtitle) = parse_invocation(tex, subtitle_at, &CHAPTER_SUBTITLE) else {
            continue;
        };

        out.push_str(&tex[copied..heading.start()]);
        let chapter_line = tex[heading.start()..label.end()].trim_end();
        let _ = write!(
            out,
            "{}\n\\noindent\\textbf{{{} {}}}\\par\n\\paragraph*{{\\MakeUppercase{{{}}}}}",
            chapter_line,
            options.heading_word,
            chapter,
            subtitle.arg(0).trim()
        );
        copied = subtitle.end();
        count += 1;
    }
    out.push_str(&tex[copied..]);

    ScanOutput {
        content: out,
        count,
        failures,
    }
}
