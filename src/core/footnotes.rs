//! Footnote hoisting for quote environments
//!
//! Inside a `customquote` block footnotes are written as `\footnotemark`, with
//! the matching `\footnotetext{...}` placed after `\end{customquote}`. EPUB
//! converters lose that pairing, so each mark is replaced in order by an
//! inline `\footnote{...}` and the consumed texts are removed.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use texprep_scan::{parse_invocation, skip_ws_and_comments, FailureKind, MacroSpec, ScanOutput};

pub const FOOTNOTETEXT: MacroSpec<'static> = MacroSpec::new("footnotetext", 1);

lazy_static! {
    static ref FOOTNOTEMARK: Regex = Regex::new(r"\\footnotemark\b(?P<num>\[[^\]]*\])?").unwrap();
}

/// Options for footnote hoisting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteOptions {
    /// Environment whose marks are resolved
    /// Default: `customquote`
    pub environment: String,
}

impl Default for FootnoteOptions {
    fn default() -> Self {
        Self {
            environment: "customquote".to_string(),
        }
    }
}

impl FootnoteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_environment(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
        }
    }
}

/// Hoist footnotes into every `customquote` block of a document.
pub fn hoist_footnotes(tex: &str) -> ScanOutput {
    hoist_footnotes_with_options(tex, &FootnoteOptions::default())
}

/// Hoist footnotes into every block of `options.environment`.
///
/// At most as many `\footnotetext`s are taken as the block has marks; extra
/// texts stay where they are. `count` is the number of marks replaced.
pub fn hoist_footnotes_with_options(tex: &str, options: &FootnoteOptions) -> ScanOutput {
    let begin = format!("\\begin{{{}}}", options.environment);
    let end = format!("\\end{{{}}}", options.environment);

    let mut out = String::with_capacity(tex.len());
    let mut i = 0usize;
    let mut count = 0usize;
    let mut failures = Vec::new();

    loop {
        let Some(rel) = tex[i..].find(&begin) else {
            out.push_str(&tex[i..]);
            break;
        };
        let start = i + rel;
        out.push_str(&tex[i..start]);

        let body_start = start + begin.len();
        let Some(end_rel) = tex[body_start..].find(&end) else {
            // Unclosed block: keep the rest as written.
            out.push_str(&tex[start..]);
            break;
        };
        let block_end = body_start + end_rel + end.len();
        let block = &tex[start..block_end];
        let marks = FOOTNOTEMARK.find_iter(block).count();

        let mut texts: Vec<&str> = Vec::new();
        let mut resume = block_end;
        while texts.len() < marks {
            let at = skip_ws_and_comments(tex, resume);
            match parse_invocation(tex, at, &FOOTNOTETEXT) {
                Ok(inv) => {
                    texts.push(inv.arg(0));
                    resume = inv.end();
                }
                Err(failure) => {
                    if failure.kind != FailureKind::NameMismatch {
                        failures.push(failure);
                    }
                    break;
                }
            }
        }

        let mut next = 0usize;
        let converted = FOOTNOTEMARK.replace_all(block, |caps: &Captures<'_>| match texts.get(next) {
            Some(text) => {
                next += 1;
                let num = caps.name("num").map_or("", |m| m.as_str());
                format!("\\footnote{}{{{}}}", num, text)
            }
            None => caps[0].to_string(),
        });
        out.push_str(&converted);
        count += next;
        i = resume;
    }

    ScanOutput {
        content: out,
        count,
        failures,
    }
}
