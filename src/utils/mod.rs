//! Utility modules
//!
//! - Error and warning types
//! - File discovery and atomic writes
//! - Status lines for the command-line tools

pub mod diagnostics;
pub mod error;
pub mod files;

// Re-export commonly used items
pub use diagnostics::{plural, Diagnostic, Severity};
pub use error::{ConversionError, ConversionResult, ConversionWarning};
pub use files::{collect_tex_files, output_path, read_document, write_document, Collected, Discovery};
