//! Rewrite passes for the custom LaTeX dialect
//!
//! Each pass is a pure `&str -> ScanOutput` function built on the brace-aware
//! scanner in `texprep-scan`:
//! - `verse`: `\Verse[ref]{SA}{EN}` to `verse` environments
//! - `labels`: unique `\label{..}` for unlabeled headings
//! - `footnotes`: `\footnotemark`/`\footnotetext` pairs to inline `\footnote`
//! - `subtitles`: `\chaptersubtitle` to a numbered `\paragraph*`

pub mod footnotes;
pub mod labels;
pub mod slug;
pub mod subtitles;
pub mod verse;

pub use footnotes::{hoist_footnotes, hoist_footnotes_with_options, FootnoteOptions};
pub use labels::{collect_labels, inject_labels, label_base, LabelRegistry};
pub use slug::{heading_slug, slugify};
pub use subtitles::{chapter_number, convert_subtitles, convert_subtitles_with_options, SubtitleOptions};
pub use verse::{convert_verses, convert_verses_with_options, format_verse, VerseOptions};
