//! Multi-file runs
//!
//! A run reads every input first, lets the [`Rewriter`] look at all of them
//! (label uniqueness needs the whole project), then rewrites and writes each
//! file. A file that cannot be read, decoded or written is recorded as failed
//! and the run continues with the next one.

mod rewriters;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use texprep_scan::ScanOutput;

use crate::utils::diagnostics::plural;
use crate::utils::error::{ConversionError, ConversionResult, ConversionWarning};
use crate::utils::files::{output_path, read_document, write_document};

pub use rewriters::{FootnoteRewriter, LabelRewriter, SubtitleRewriter, VerseRewriter};

/// A readable input document.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

/// The result of rewriting one document.
#[derive(Debug, Clone, Default)]
pub struct Rewritten {
    pub content: String,
    pub count: usize,
    pub warnings: Vec<ConversionWarning>,
}

impl Rewritten {
    /// Wrap a scan result, turning parse failures into warnings about `what`.
    pub fn from_scan(doc: &str, what: &str, output: ScanOutput) -> Self {
        let warnings = output
            .failures
            .iter()
            .map(|failure| ConversionWarning::from_failure(doc, what, failure))
            .collect();
        Self {
            content: output.content,
            count: output.count,
            warnings,
        }
    }
}

/// One rewrite pass applied across a set of files.
pub trait Rewriter {
    /// Tool name for reports, e.g. `verses`
    fn name(&self) -> &'static str;

    /// What `count` counts, e.g. `verse`
    fn unit(&self) -> &'static str;

    /// Verb for the closing summary
    fn verb(&self) -> &'static str {
        "Converted"
    }

    /// Sees every readable input before the first `rewrite` call.
    fn prepare(&mut self, _sources: &[SourceFile]) {}

    /// Rewrite one document; `None` when the file is not eligible for this pass.
    fn rewrite(&mut self, path: &Path, text: &str) -> Option<Rewritten>;
}

/// Where rewritten documents go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Overwrite inputs; unchanged files are not touched
    InPlace,
    /// Write every document to `<dir>/<stem><suffix>`
    Directory { dir: PathBuf, suffix: String },
}

/// Options for a batch run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output: OutputMode,
    /// Report what would change without writing anything
    pub dry_run: bool,
}

impl RunOptions {
    pub fn in_place() -> Self {
        Self {
            output: OutputMode::InPlace,
            dry_run: false,
        }
    }

    pub fn to_directory(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            output: OutputMode::Directory {
                dir: dir.into(),
                suffix: suffix.into(),
            },
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    /// At least one conversion changed the document
    Updated,
    /// Nothing to convert
    Unchanged,
    /// Not eligible for this pass
    Skipped,
    /// Read, decode or write error
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Where the document was (or in a dry run, would be) written
    pub output: Option<PathBuf>,
    pub status: FileStatus,
    pub count: usize,
    pub warnings: Vec<ConversionWarning>,
    pub error: Option<String>,
}

impl FileReport {
    fn failed(path: &Path, error: &ConversionError) -> Self {
        Self {
            path: path.to_path_buf(),
            output: None,
            status: FileStatus::Failed,
            count: 0,
            warnings: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Outcome of a whole run, serializable for `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub tool: String,
    pub unit: String,
    pub verb: String,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub total: usize,
}

impl BatchReport {
    pub fn changed_files(&self) -> usize {
        self.count_status(FileStatus::Updated)
    }

    pub fn failed_files(&self) -> usize {
        self.count_status(FileStatus::Failed)
    }

    fn count_status(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    /// Add a failed entry for an input that never reached the rewriter,
    /// such as a directory that could not be listed.
    pub fn record_failure(&mut self, path: &Path, error: &ConversionError) {
        self.files.push(FileReport::failed(path, error));
    }

    pub fn has_failures(&self) -> bool {
        self.failed_files() > 0
    }

    /// `Done. Converted 3 verse(s) across 2/5 file(s).`
    pub fn summary(&self) -> String {
        format!(
            "Done. {} {} across {}/{} file(s).",
            self.verb,
            plural(self.total, &self.unit),
            self.changed_files(),
            self.files.len()
        )
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> ConversionResult<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        write_document(path, &serialized)
    }
}

/// Apply `rewriter` to every file in `files`.
///
/// Fails only when there is nothing to do or the output directory cannot be
/// created; per-file problems end up in the report.
pub fn run_batch(
    files: &[PathBuf],
    rewriter: &mut dyn Rewriter,
    options: &RunOptions,
) -> ConversionResult<BatchReport> {
    if files.is_empty() {
        return Err(ConversionError::NoInputs);
    }
    if let OutputMode::Directory { dir, .. } = &options.output {
        if !options.dry_run {
            std::fs::create_dir_all(dir).map_err(|e| ConversionError::io(dir, e))?;
        }
    }

    let mut reports: Vec<(usize, FileReport)> = Vec::with_capacity(files.len());
    let mut sources: Vec<(usize, SourceFile)> = Vec::with_capacity(files.len());
    for (idx, path) in files.iter().enumerate() {
        match read_document(path) {
            Ok(text) => sources.push((
                idx,
                SourceFile {
                    path: path.clone(),
                    text,
                },
            )),
            Err(err) => reports.push((idx, FileReport::failed(path, &err))),
        }
    }

    let (indices, sources): (Vec<usize>, Vec<SourceFile>) = sources.into_iter().unzip();
    rewriter.prepare(&sources);

    let mut claimed = HashSet::new();
    for (idx, source) in indices.into_iter().zip(sources.iter()) {
        reports.push((idx, rewrite_one(rewriter, source, options, &mut claimed)));
    }
    reports.sort_by_key(|(idx, _)| *idx);

    let files: Vec<FileReport> = reports.into_iter().map(|(_, report)| report).collect();
    let total = files
        .iter()
        .filter(|f| f.status != FileStatus::Failed)
        .map(|f| f.count)
        .sum();

    Ok(BatchReport {
        tool: rewriter.name().to_string(),
        unit: rewriter.unit().to_string(),
        verb: rewriter.verb().to_string(),
        dry_run: options.dry_run,
        files,
        total,
    })
}

/// `claimed` holds the outputs already written in this run; a second input
/// mapping to one of them fails instead of overwriting it.
fn rewrite_one(
    rewriter: &mut dyn Rewriter,
    source: &SourceFile,
    options: &RunOptions,
    claimed: &mut HashSet<PathBuf>,
) -> FileReport {
    let mut report = FileReport {
        path: source.path.clone(),
        output: None,
        status: FileStatus::Skipped,
        count: 0,
        warnings: Vec::new(),
        error: None,
    };
    let Some(rewritten) = rewriter.rewrite(&source.path, &source.text) else {
        return report;
    };

    let changed = rewritten.content != source.text;
    report.count = rewritten.count;
    report.warnings = rewritten.warnings;
    report.status = if changed && rewritten.count > 0 {
        FileStatus::Updated
    } else {
        FileStatus::Unchanged
    };

    let target = match &options.output {
        OutputMode::InPlace if changed => Some(source.path.clone()),
        OutputMode::InPlace => None,
        OutputMode::Directory { dir, suffix } => Some(output_path(&source.path, dir, suffix)),
    };
    if let Some(target) = target {
        if !claimed.insert(target.clone()) {
            report.status = FileStatus::Failed;
            report.error = Some(ConversionError::collision(&target).to_string());
            return report;
        }
        if !options.dry_run {
            if let Err(err) = write_document(&target, &rewritten.content) {
                report.status = FileStatus::Failed;
                report.error = Some(err.to_string());
                return report;
            }
        }
        report.output = Some(target);
    }
    report
}
