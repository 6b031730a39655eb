//! Status lines for the command-line tools.
//!
//! Every tool reports one line per file, one line per malformed invocation
//! and a closing summary on stderr. Severity decides the marker and color.

use std::fmt;

/// Severity level for CLI diagnostics (determines coloring and marker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Failed files (red)
    Error,
    /// Malformed markup left as-is (yellow)
    Warning,
    /// Progress and summaries (cyan)
    Info,
    /// Written files (green)
    Success,
}

impl Severity {
    /// ANSI color code for this severity.
    pub fn color_code(&self) -> &'static str {
        match self {
            Severity::Error => "\x1b[31m",
            Severity::Warning => "\x1b[33m",
            Severity::Info => "\x1b[36m",
            Severity::Success => "\x1b[32m",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Error => "✗",
            Severity::Warning => "!",
            Severity::Info => "·",
            Severity::Success => "✓",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// A single status line.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Short tag, e.g. "updated", "skip", "read error"
    pub kind: String,
    pub message: String,
    /// Location context, e.g. a path or "line 12"
    pub location: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind: kind.into(),
            message: message.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Render with the severity marker, optionally in color.
    pub fn render(&self, color: bool) -> String {
        if color {
            format!(
                "{}{}{} {}",
                self.severity.color_code(),
                self.severity.marker(),
                RESET,
                self
            )
        } else {
            format!("{} {}", self.severity.marker(), self)
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref loc) = self.location {
            write!(f, "[{}] {}: {}", self.kind, loc, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}

/// `"1 verse"`, `"3 verse(s)"`.
pub fn plural(count: usize, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}(s)", count, unit)
    }
}
