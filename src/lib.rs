//! texprep - batch rewriting of a custom LaTeX dialect into portable LaTeX
//!
//! The dialect carries `\Verse[ref]{SA}{EN}` blocks, unlabeled headings,
//! `customquote` footnote marks and `\chaptersubtitle`. Each is rewritten into
//! plain LaTeX that typesets as before and survives Pandoc's EPUB conversion.
//!
//! ```
//! let out = texprep::convert_verses("\\Verse[1.1]{sa}{He said: go}");
//! assert_eq!(out.count, 1);
//! assert!(out.content.contains("He said:\\linebreak go (1.1)"));
//! ```

pub mod batch;
pub mod core;
pub mod data;
pub mod utils;

pub use texprep_scan as scanner;
pub use texprep_scan::{scan, MacroInvocation, MacroSpec, ParseFailure, ScanOutput};

pub use crate::core::{
    chapter_number, collect_labels, convert_subtitles, convert_verses, heading_slug,
    hoist_footnotes, inject_labels, slugify, FootnoteOptions, LabelRegistry, SubtitleOptions,
    VerseOptions,
};
pub use batch::{run_batch, BatchReport, OutputMode, Rewriter, RunOptions};
pub use utils::{ConversionError, ConversionResult, ConversionWarning};
