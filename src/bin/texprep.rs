//! texprep CLI - prepare custom-dialect LaTeX sources for EPUB conversion

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use std::process::ExitCode;
#[cfg(feature = "cli")]
use texprep::{
    batch::{FileStatus, FootnoteRewriter, LabelRewriter, SubtitleRewriter, VerseRewriter},
    run_batch,
    utils::{collect_tex_files, plural, Diagnostic, Discovery, Severity},
    BatchReport, ConversionError, FootnoteOptions, Rewriter, RunOptions,
    SubtitleOptions, VerseOptions,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "texprep")]
#[command(version)]
#[command(about = "texprep - rewrite custom LaTeX markup into portable LaTeX", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[cfg(feature = "cli")]
#[derive(Args, Clone)]
struct GlobalArgs {
    /// Report what would change without writing any file
    #[arg(long, global = true)]
    dry_run: bool,

    /// Write the run report as JSON to this path
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    /// Only print failures and the summary
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert \Verse[ref]{SA}{EN} blocks into verse environments
    Verses {
        /// Input .tex files or directories (non-recursive)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short = 'o', long, required_unless_present = "inplace")]
        outdir: Option<PathBuf>,

        /// Suffix for output file names
        #[arg(long, default_value = ".epub.tex")]
        suffix: String,

        /// Overwrite the input files
        #[arg(long, conflicts_with = "outdir")]
        inplace: bool,
    },

    /// Insert unique \label{..} after unlabeled headings
    Labels {
        /// Project root, searched recursively
        #[arg(default_value = "./frontmatter")]
        root: PathBuf,
    },

    /// Turn \footnotemark/\footnotetext pairs into inline footnotes
    Footnotes {
        /// Directory of chapter files (non-recursive)
        #[arg(default_value = "chapters")]
        dir: PathBuf,

        /// Environment whose footnote marks are resolved
        #[arg(long = "env", default_value = "customquote")]
        environment: String,

        /// Write to this directory instead of in place
        #[arg(short = 'o', long)]
        outdir: Option<PathBuf>,
    },

    /// Replace \chaptersubtitle with a numbered \paragraph*
    Subtitles {
        /// Content root, searched recursively for chapter_NN.tex
        #[arg(default_value = "./content")]
        root: PathBuf,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
fn main() -> ExitCode {
    let cli = Cli::parse();
    let global = cli.global;

    let (inputs, discovery, options, mut rewriter): (
        Vec<PathBuf>,
        Discovery,
        RunOptions,
        Box<dyn Rewriter>,
    ) = match cli.command {
        Commands::Verses {
            inputs,
            outdir,
            suffix,
            ..
        } => {
            // clap guarantees exactly one of --outdir and --inplace.
            let options = match outdir {
                Some(dir) => RunOptions::to_directory(dir, suffix),
                None => RunOptions::in_place(),
            };
            (
                inputs,
                Discovery::Flat,
                options,
                Box::new(VerseRewriter::new(VerseOptions::default())),
            )
        }
        Commands::Labels { root } => (
            vec![root],
            Discovery::Recursive,
            RunOptions::in_place(),
            Box::new(LabelRewriter::new()),
        ),
        Commands::Footnotes {
            dir,
            environment,
            outdir,
        } => {
            let options = match outdir {
                Some(out) => RunOptions::to_directory(out, ".tex"),
                None => RunOptions::in_place(),
            };
            (
                vec![dir],
                Discovery::Flat,
                options,
                Box::new(FootnoteRewriter::new(FootnoteOptions::for_environment(
                    environment,
                ))),
            )
        }
        Commands::Subtitles { root } => (
            vec![root],
            Discovery::Recursive,
            RunOptions::in_place(),
            Box::new(SubtitleRewriter::new(SubtitleOptions::default())),
        ),
        Commands::Info => {
            print_info();
            return ExitCode::SUCCESS;
        }
    };

    let collected = collect_tex_files(&inputs, discovery);
    if collected.files.is_empty() && !collected.unreadable.is_empty() {
        for (path, e) in &collected.unreadable {
            emit(
                &global,
                Diagnostic::new(Severity::Error, "input", e.to_string()).with_location(display(path)),
            );
        }
        return ExitCode::FAILURE;
    }

    let options = options.dry_run(global.dry_run);
    let mut report = match run_batch(&collected.files, &mut *rewriter, &options) {
        Ok(report) => report,
        Err(ConversionError::NoInputs) => {
            eprintln!("{}", ConversionError::NoInputs);
            return ExitCode::from(2);
        }
        Err(e) => {
            emit(&global, Diagnostic::new(Severity::Error, "output", e.to_string()));
            return ExitCode::FAILURE;
        }
    };
    for (path, e) in &collected.unreadable {
        report.record_failure(path, e);
    }

    print_report(&global, &report);

    if let Some(ref path) = global.report {
        if let Err(e) = report.write_json(path) {
            emit(&global, Diagnostic::new(Severity::Error, "report", e.to_string()));
            return ExitCode::FAILURE;
        }
    }

    if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(feature = "cli")]
fn emit(global: &GlobalArgs, diagnostic: Diagnostic) {
    eprintln!("{}", diagnostic.render(!global.no_color));
}

#[cfg(feature = "cli")]
fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(feature = "cli")]
fn print_report(global: &GlobalArgs, report: &BatchReport) {
    let would = if report.dry_run { "would be " } else { "" };

    for file in &report.files {
        let location = display(file.output.as_deref().unwrap_or(file.path.as_path()));
        match file.status {
            FileStatus::Failed => {
                let message = file.error.clone().unwrap_or_default();
                emit(
                    global,
                    Diagnostic::new(Severity::Error, "failed", message).with_location(display(&file.path)),
                );
                continue;
            }
            FileStatus::Skipped => continue,
            _ if global.quiet => continue,
            FileStatus::Updated => emit(
                global,
                Diagnostic::new(
                    Severity::Success,
                    "updated",
                    format!(
                        "{} {}{}",
                        plural(file.count, &report.unit),
                        would,
                        report.verb.to_lowercase()
                    ),
                )
                .with_location(location),
            ),
            FileStatus::Unchanged => {
                let message = if report.tool == "subtitles" {
                    "no \\chaptersubtitle block found".to_string()
                } else {
                    format!("nothing {}changed", would)
                };
                emit(
                    global,
                    Diagnostic::new(Severity::Info, "unchanged", message).with_location(location),
                );
            }
        }
        for warning in &file.warnings {
            let location = match warning.line {
                Some(line) => format!("{}:{}", display(&file.path), line),
                None => display(&file.path),
            };
            emit(
                global,
                Diagnostic::new(Severity::Warning, "malformed", warning.message.clone())
                    .with_location(location),
            );
        }
    }

    eprintln!("{}", report.summary());
}

#[cfg(feature = "cli")]
fn print_info() {
    println!("texprep - rewrite custom LaTeX markup into portable LaTeX");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Tools:");
    println!("  ✓ verses     \\Verse[ref]{{SA}}{{EN}} → verse environment");
    println!("  ✓ labels     unique \\label{{..}} for unlabeled headings");
    println!("  ✓ footnotes  \\footnotemark/\\footnotetext → inline \\footnote");
    println!("  ✓ subtitles  \\chaptersubtitle → CHAPTER n + \\paragraph*");
    println!();
    println!("Global options: --dry-run, --report <path>, --quiet, --no-color");
    println!();
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install texprep --features cli");
    eprintln!("  texprep <verses|labels|footnotes|subtitles> [OPTIONS]");
}
