//! Brace-aware macro-argument scanner for LaTeX sources.
//!
//! A flat regex cannot match `\Verse{..}{..}` once an argument contains a
//! nested group such as `\footnote{a {b} c}`. This crate walks the source
//! byte by byte instead, tracking brace depth, and hands every well-formed
//! invocation of one macro to a caller-supplied formatter. Everything that
//! does not parse is copied through untouched.
//!
//! All delimiters are ASCII, so byte offsets produced here always fall on
//! UTF-8 character boundaries and can be used to slice the source directly.

use std::fmt;
use std::ops::Range;

pub const BRACKET_OPEN: u8 = b'[';
pub const BRACKET_CLOSE: u8 = b']';
pub const BRACE_OPEN: u8 = b'{';
pub const BRACE_CLOSE: u8 = b'}';
pub const COMMENT_MARKER: u8 = b'%';
pub const ESCAPE: u8 = b'\\';

// =============================================================================
// Macro description and parse results
// =============================================================================

/// The shape of a macro the scanner should recognize.
///
/// `name` is given without the leading backslash. Every recognized invocation
/// may carry one optional `[...]` argument followed by exactly `arity`
/// mandatory braced arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroSpec<'n> {
    pub name: &'n str,
    pub arity: usize,
    /// Accept a `*` directly after the name (`\section*{...}`)
    pub starred: bool,
}

impl<'n> MacroSpec<'n> {
    pub const fn new(name: &'n str, arity: usize) -> Self {
        Self {
            name,
            arity,
            starred: false,
        }
    }

    pub const fn with_star(self) -> Self {
        Self {
            starred: true,
            ..self
        }
    }
}

/// One parsed occurrence of a macro, borrowing from the scanned document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroInvocation<'a> {
    /// Whether a `*` followed the macro name
    pub star: bool,
    /// Content of the optional `[...]` argument
    pub bracket: Option<&'a str>,
    /// Mandatory arguments with their outer braces stripped
    pub args: Vec<&'a str>,
    /// Consumed bytes, from the backslash to the last closing brace
    pub span: Range<usize>,
}

impl<'a> MacroInvocation<'a> {
    /// Mandatory argument `idx`, or `""` when the macro has fewer arguments.
    pub fn arg(&self, idx: usize) -> &'a str {
        self.args.get(idx).copied().unwrap_or("")
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }
}

/// Why no invocation could be parsed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The text at the position is not `\name`
    NameMismatch,
    /// A `[` without a matching `]`
    UnterminatedBracket,
    /// A mandatory `{...}` argument is absent
    MissingArgument,
    /// The input ends before a `{` is closed
    UnbalancedBraces,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NameMismatch => write!(f, "macro name mismatch"),
            FailureKind::UnterminatedBracket => write!(f, "unterminated optional argument"),
            FailureKind::MissingArgument => write!(f, "missing argument"),
            FailureKind::UnbalancedBraces => write!(f, "unbalanced braces"),
        }
    }
}

/// No well-formed invocation at `offset`. The caller copies the text through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFailure {
    pub kind: FailureKind,
    /// Byte offset of the delimiter (or macro) where parsing gave up
    pub offset: usize,
}

impl ParseFailure {
    fn new(kind: FailureKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.offset)
    }
}

impl std::error::Error for ParseFailure {}

// =============================================================================
// Primitive parsers
// =============================================================================

/// Advance over ASCII whitespace and `%` comments.
///
/// A comment runs to the end of its line and takes the line terminator with it.
pub fn skip_ws_and_comments(doc: &str, pos: usize) -> usize {
    let bytes = doc.as_bytes();
    let mut i = pos;
    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if bytes[i] == COMMENT_MARKER {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            if i < bytes.len() {
                i += 1;
            }
            continue;
        }
        break;
    }
    i
}

/// Advance over ASCII whitespace only; comments stop the scan.
pub fn skip_whitespace(doc: &str, pos: usize) -> usize {
    let bytes = doc.as_bytes();
    let mut i = pos;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Parse an optional `[...]` argument at `pos`.
///
/// Brackets do not nest: the first `]` closes the argument. When `pos` does
/// not hold `[`, returns `None` and `pos` unchanged.
pub fn parse_optional_bracket(
    doc: &str,
    pos: usize,
) -> Result<(Option<&str>, usize), ParseFailure> {
    let bytes = doc.as_bytes();
    if pos >= bytes.len() || bytes[pos] != BRACKET_OPEN {
        return Ok((None, pos));
    }
    match bytes[pos + 1..].iter().position(|&b| b == BRACKET_CLOSE) {
        Some(rel) => {
            let close = pos + 1 + rel;
            Ok((Some(&doc[pos + 1..close]), close + 1))
        }
        None => Err(ParseFailure::new(FailureKind::UnterminatedBracket, pos)),
    }
}

/// Parse a balanced `{...}` group starting at `pos`.
///
/// Returns the text strictly inside the outer braces and the position after
/// the matching `}`. Inner groups are kept byte-for-byte.
pub fn parse_braced_arg(doc: &str, pos: usize) -> Result<(&str, usize), ParseFailure> {
    let bytes = doc.as_bytes();
    if pos >= bytes.len() || bytes[pos] != BRACE_OPEN {
        return Err(ParseFailure::new(FailureKind::MissingArgument, pos));
    }
    let mut depth = 1usize;
    let mut i = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            BRACE_OPEN => depth += 1,
            BRACE_CLOSE => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&doc[pos + 1..i], i + 1));
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(ParseFailure::new(FailureKind::UnbalancedBraces, pos))
}

/// If `\name` starts at `pos`, return the position right after the name.
///
/// A name ending in a letter only matches when the next byte is not a letter,
/// so `\Verse` does not match inside `\Verses`.
pub fn match_macro_name(doc: &str, pos: usize, name: &str) -> Option<usize> {
    let bytes = doc.as_bytes();
    if pos >= bytes.len() || bytes[pos] != ESCAPE {
        return None;
    }
    let after = pos + 1 + name.len();
    if !doc[pos + 1..].starts_with(name) {
        return None;
    }
    let name_is_word = name.bytes().last().is_some_and(|b| b.is_ascii_alphabetic());
    if name_is_word && after < bytes.len() && bytes[after].is_ascii_alphabetic() {
        return None;
    }
    Some(after)
}

/// Parse one invocation of `spec` whose backslash sits at `start`.
///
/// Whitespace and comments are allowed between the name, the optional
/// argument and each mandatory argument. Trailing whitespace after the last
/// argument is never consumed. On failure nothing is consumed.
pub fn parse_invocation<'a>(
    doc: &'a str,
    start: usize,
    spec: &MacroSpec<'_>,
) -> Result<MacroInvocation<'a>, ParseFailure> {
    let after_name = match_macro_name(doc, start, spec.name)
        .ok_or_else(|| ParseFailure::new(FailureKind::NameMismatch, start))?;

    let mut end = after_name;
    let mut star = false;
    if spec.starred && doc.as_bytes().get(end) == Some(&b'*') {
        star = true;
        end += 1;
    }

    let (bracket, after_bracket) = parse_optional_bracket(doc, skip_ws_and_comments(doc, end))?;
    if bracket.is_some() {
        end = after_bracket;
    }

    let mut args = Vec::with_capacity(spec.arity);
    for _ in 0..spec.arity {
        let (arg, next) = parse_braced_arg(doc, skip_ws_and_comments(doc, end))?;
        args.push(arg);
        end = next;
    }

    Ok(MacroInvocation {
        star,
        bracket,
        args,
        span: start..end,
    })
}

// =============================================================================
// Document scan
// =============================================================================

/// Iterator over the invocations of one macro in a document.
///
/// Yields `Err` for each occurrence of the macro name that does not parse;
/// scanning then resumes one byte after that occurrence. Every step moves
/// the cursor forward, so the iterator always terminates.
pub struct Invocations<'a, 'n> {
    doc: &'a str,
    spec: MacroSpec<'n>,
    needle: String,
    cursor: usize,
}

impl<'a, 'n> Invocations<'a, 'n> {
    pub fn new(doc: &'a str, spec: MacroSpec<'n>) -> Self {
        Self {
            doc,
            spec,
            needle: format!("\\{}", spec.name),
            cursor: 0,
        }
    }
}

impl<'a, 'n> Iterator for Invocations<'a, 'n> {
    type Item = Result<MacroInvocation<'a>, ParseFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rel = self.doc.get(self.cursor..)?.find(&self.needle)?;
            let at = self.cursor + rel;
            match parse_invocation(self.doc, at, &self.spec) {
                Ok(inv) => {
                    self.cursor = inv.end();
                    return Some(Ok(inv));
                }
                Err(failure) => {
                    // The backslash is one byte wide.
                    self.cursor = at + 1;
                    if failure.kind != FailureKind::NameMismatch {
                        return Some(Err(failure));
                    }
                }
            }
        }
    }
}

/// Result of rewriting a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    /// The rewritten document
    pub content: String,
    /// Number of invocations that were converted
    pub count: usize,
    /// Occurrences left as literal text because they did not parse
    pub failures: Vec<ParseFailure>,
}

/// Rewrite every invocation of `spec` in `doc` through `formatter`.
///
/// Text outside invocations, including malformed ones, is copied unchanged.
pub fn scan<'a, F>(doc: &'a str, spec: MacroSpec<'_>, mut formatter: F) -> ScanOutput
where
    F: FnMut(&MacroInvocation<'a>) -> String,
{
    let mut out = String::with_capacity(doc.len());
    let mut copied = 0usize;
    let mut count = 0usize;
    let mut failures = Vec::new();

    for item in Invocations::new(doc, spec) {
        match item {
            Ok(inv) => {
                out.push_str(&doc[copied..inv.start()]);
                out.push_str(&formatter(&inv));
                copied = inv.end();
                count += 1;
            }
            Err(failure) => failures.push(failure),
        }
    }
    out.push_str(&doc[copied..]);

    ScanOutput {
        content: out,
        count,
        failures,
    }
}

/// 1-based line number of a byte offset.
pub fn line_at(doc: &str, offset: usize) -> usize {
    let end = offset.min(doc.len());
    doc.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSE: MacroSpec<'static> = MacroSpec::new("M", 2);

    #[test]
    fn skip_consumes_comment_and_newline() {
        let doc = "  % note\n\t{x}";
        assert_eq!(skip_ws_and_comments(doc, 0), doc.find('{').unwrap());
    }

    #[test]
    fn skip_stops_at_end_of_input() {
        assert_eq!(skip_ws_and_comments("  % trailing", 0), 12);
        assert_eq!(skip_ws_and_comments("", 0), 0);
    }

    #[test]
    fn skip_whitespace_stops_at_comment() {
        assert_eq!(skip_whitespace("  %c\nx", 0), 2);
    }

    #[test]
    fn bracket_absent_keeps_position() {
        assert_eq!(parse_optional_bracket("{a}", 0), Ok((None, 0)));
    }

    #[test]
    fn bracket_takes_first_close() {
        assert_eq!(parse_optional_bracket("[1.2]]{", 0), Ok((Some("1.2"), 5)));
    }

    #[test]
    fn bracket_unterminated_fails() {
        let err = parse_optional_bracket("[1.2 {a}", 0).unwrap_err();
        assert_eq!(err.kind, FailureKind::UnterminatedBracket);
    }

    #[test]
    fn braced_arg_keeps_nested_groups() {
        let doc = "{a {b {c}} d} rest";
        let (arg, next) = parse_braced_arg(doc, 0).unwrap();
        assert_eq!(arg, "a {b {c}} d");
        assert_eq!(&doc[next..], " rest");
    }

    #[test]
    fn braced_arg_unbalanced_fails() {
        let err = parse_braced_arg("{a {b}", 0).unwrap_err();
        assert_eq!(err.kind, FailureKind::UnbalancedBraces);
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn braced_arg_requires_open_brace() {
        let err = parse_braced_arg("x{a}", 0).unwrap_err();
        assert_eq!(err.kind, FailureKind::MissingArgument);
    }

    #[test]
    fn macro_name_respects_word_boundary() {
        assert_eq!(match_macro_name("\\M{a}", 0, "M"), Some(2));
        assert_eq!(match_macro_name("\\Mx{a}", 0, "M"), None);
        assert_eq!(match_macro_name("\\M1", 0, "M"), Some(2));
    }

    #[test]
    fn invocation_with_comments_between_arguments() {
        let doc = "\\M [1.1] % c\n {a}\n%x\n{b} tail";
        let inv = parse_invocation(doc, 0, &VERSE).unwrap();
        assert_eq!(inv.bracket, Some("1.1"));
        assert_eq!(inv.args, vec!["a", "b"]);
        assert_eq!(&doc[inv.end()..], " tail");
    }

    #[test]
    fn invocation_star_only_when_allowed() {
        let spec = MacroSpec::new("section", 1).with_star();
        let inv = parse_invocation("\\section*{T}", 0, &spec).unwrap();
        assert!(inv.star);
        assert_eq!(inv.arg(0), "T");

        let plain = MacroSpec::new("section", 1);
        assert!(parse_invocation("\\section*{T}", 0, &plain).is_err());
    }

    #[test]
    fn invocation_without_arguments_keeps_trailing_space() {
        let spec = MacroSpec::new("par", 0);
        let inv = parse_invocation("\\par  x", 0, &spec).unwrap();
        assert_eq!(inv.span, 0..4);
    }

    #[test]
    fn scan_counts_and_copies_literal_text() {
        let out = scan("x \\M{a}{b} y \\M{c}{d}", VERSE, |inv| {
            format!("[{}{}]", inv.arg(0), inv.arg(1))
        });
        assert_eq!(out.content, "x [ab] y [cd]");
        assert_eq!(out.count, 2);
        assert!(out.failures.is_empty());
    }

    #[test]
    fn scan_missing_second_argument_passes_through() {
        let doc = "\\M{a} and \\M{b}{c}";
        let out = scan(doc, VERSE, |inv| format!("<{}>", inv.arg(1)));
        assert_eq!(out.content, "\\M{a} and <c>");
        assert_eq!(out.count, 1);
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].kind, FailureKind::MissingArgument);
    }

    #[test]
    fn scan_handles_multibyte_text() {
        let doc = "Bhagavān \\M{ā}{ṛ} — ok";
        let out = scan(doc, VERSE, |inv| format!("{}{}", inv.arg(0), inv.arg(1)));
        assert_eq!(out.content, "Bhagavān āṛ — ok");
    }

    #[test]
    fn line_at_counts_newlines() {
        let doc = "a\nb\nc";
        assert_eq!(line_at(doc, 0), 1);
        assert_eq!(line_at(doc, 2), 2);
        assert_eq!(line_at(doc, 100), 3);
    }
}
