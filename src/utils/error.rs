//! Error handling for texprep rewrites
//!
//! Malformed markup inside a document is never an error: the scanner copies
//! it through and a [`ConversionWarning`] records where it happened. Errors
//! are reserved for files that cannot be read, decoded or written.

use std::fmt;
use std::path::{Path, PathBuf};

use texprep_scan::{line_at, FailureKind, ParseFailure};

/// Conversion error type
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Reading or writing a file failed
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid UTF-8
    #[error("{} is not valid UTF-8", .path.display())]
    Encoding { path: PathBuf },
    /// Two inputs map to the same output file
    #[error("{} is already written by another input", .path.display())]
    OutputCollision { path: PathBuf },
    /// Nothing to process
    #[error("No .tex files found.")]
    NoInputs,
    /// The run report could not be serialized
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

// Convenience constructors for errors
impl ConversionError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        ConversionError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn encoding(path: impl AsRef<Path>) -> Self {
        ConversionError::Encoding {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn collision(path: impl AsRef<Path>) -> Self {
        ConversionError::OutputCollision {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Conversion warnings (non-fatal issues)
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConversionWarning {
    pub message: String,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl ConversionWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            suggestion: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Describe markup (`what`, e.g. `\Verse`) that was left as literal text.
    pub fn from_failure(doc: &str, what: &str, failure: &ParseFailure) -> Self {
        let warning = Self::new(format!("malformed {} left unchanged ({})", what, failure.kind))
            .at_line(line_at(doc, failure.offset));
        match failure_hint(failure.kind) {
            Some(hint) => warning.with_suggestion(hint),
            None => warning,
        }
    }
}

fn failure_hint(kind: FailureKind) -> Option<&'static str> {
    match kind {
        FailureKind::UnbalancedBraces => Some("check for an unclosed `{`"),
        FailureKind::UnterminatedBracket => Some("check for a missing `]`"),
        FailureKind::MissingArgument => Some("expected a `{...}` argument here"),
        FailureKind::NameMismatch => None,
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(l) = self.line {
            write!(f, "Warning at line {}: {}", l, self.message)?;
        } else {
            write!(f, "Warning: {}", self.message)?;
        }
        if let Some(ref sug) = self.suggestion {
            write!(f, " ({})", sug)?;
        }
        Ok(())
    }
}
