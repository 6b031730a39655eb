//! `\Verse[ref]{SA}{EN}` → Pandoc-friendly `verse` environments
//!
//! The Sanskrit block becomes one `\textit{..}` line per source line. The
//! English block becomes a single paragraph with at most one forced break
//! after a speaker line ("Arjuna said:") and the verse reference appended in
//! parentheses at its end.

use lazy_static::lazy_static;
use regex::Regex;
use texprep_scan::{scan, MacroSpec, ScanOutput};

/// `\Verse`, one optional reference, Sanskrit and English blocks
pub const VERSE: MacroSpec<'static> = MacroSpec::new("Verse", 2);

lazy_static! {
    static ref HSPACE: Regex = Regex::new(r"\\hspace\*?\{[^}]*\}").unwrap();
    static ref LEADING_HSPACE: Regex = Regex::new(r"^\s*\\hspace\*?\{[^}]*\}\s*").unwrap();
    static ref LATEX_BREAK: Regex = Regex::new(r"\s*\\\\\s*").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SPEAKER_LINE: Regex =
        Regex::new(r"(?is)^(?P<who>.+?)\s+(?P<verb>said|says)\s*:\s+(?P<rest>.+)$").unwrap();
    static ref TRAILING_REF: Regex =
        Regex::new(r"\(\s*\d+(?:\.\d+)?(?:[–-]\d+(?:\.\d+)?)?\s*\)\s*$").unwrap();
}

/// Options for verse conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseOptions {
    /// Replaces a leading `\hspace*{..}` of the English block, which Pandoc drops
    /// Default: `\quad `
    pub indent: String,

    /// Forced break after a speaker line
    /// Default: `\linebreak`
    pub line_break: String,
}

impl Default for VerseOptions {
    fn default() -> Self {
        Self {
            indent: "\\quad ".to_string(),
            line_break: "\\linebreak".to_string(),
        }
    }
}

impl VerseOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Split a block on LaTeX line breaks (`\\`), dropping empty lines.
pub fn split_latex_lines(text: &str) -> Vec<&str> {
    LATEX_BREAK
        .split(text.trim())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Sanskrit block: hspace removed, each line wrapped in `\textit{..}`.
pub fn sanskrit_body(sa: &str) -> String {
    let sa = HSPACE.replace_all(sa, "");
    split_latex_lines(&sa)
        .iter()
        .map(|line| format!("\\textit{{{}}}", line))
        .collect::<Vec<_>>()
        .join(" \\\\\n")
}

/// English block as one paragraph, with a speaker line broken off.
pub fn english_body(en: &str, options: &VerseOptions) -> String {
    let indent = if LEADING_HSPACE.is_match(en) {
        options.indent.as_str()
    } else {
        ""
    };

    let en = LEADING_HSPACE.replace(en, "");
    let en = HSPACE.replace_all(&en, "");
    let en = LATEX_BREAK.replace_all(&en, " ");
    let en = WHITESPACE.replace_all(&en, " ");
    let en = en.trim();

    let body = match SPEAKER_LINE.captures(en) {
        Some(caps) => format!(
            "{} {}:{} {}",
            caps["who"].trim(),
            &caps["verb"],
            options.line_break,
            caps["rest"].trim()
        ),
        None => en.to_string(),
    };

    format!("{}{}", indent, body)
}

/// Append ` (ref)` unless the text already ends with a numeric reference.
pub fn append_reference(en_body: &str, reference: &str) -> String {
    let reference = reference.trim();
    if reference.is_empty() || TRAILING_REF.is_match(en_body) {
        return en_body.to_string();
    }
    format!("{} ({})", en_body, reference)
}

/// Render one verse block.
pub fn format_verse(
    reference: Option<&str>,
    sa: &str,
    en: &str,
    options: &VerseOptions,
) -> String {
    let sa_body = sanskrit_body(sa);
    let en_body = append_reference(&english_body(en, options), reference.unwrap_or(""));

    format!(
        "\n\\par\n\\begin{{verse}}\n{}\n\n\\noindent {}\n\\end{{verse}}\n\\par\n",
        sa_body, en_body
    )
}

/// Convert every `\Verse` in a document with default options.
pub fn convert_verses(tex: &str) -> ScanOutput {
    convert_verses_with_options(tex, &VerseOptions::default())
}

/// Convert every `\Verse` in a document.
pub fn convert_verses_with_options(tex: &str, options: &VerseOptions) -> ScanOutput {
    scan(tex, VERSE, |inv| {
        format_verse(inv.bracket, inv.arg(0), inv.arg(1), options)
    })
}
