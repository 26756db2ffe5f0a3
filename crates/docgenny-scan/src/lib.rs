//! Source scanning and document rendering for docgenny.
//!
//! Walks a codebase, extracts Python classes and functions through a
//! tree-sitter grammar, approximates JavaScript-family constructs with
//! regular expressions, renders a filtered project tree, and writes a
//! single Markdown (or JSON) report.

pub mod filter;
pub mod heuristic;
pub mod output;
pub mod python;
pub mod scan;
pub mod tree;
pub mod walker;

use std::path::{Path, PathBuf};

use docgenny_core::{DocgenConfig, DocgenError, NestedFunctionPolicy, OutputFormat};

use crate::filter::PathFilter;
use crate::scan::ScanOptions;

/// Settings for [`generate_docs`].
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Output file name, joined onto the scanned root.
    pub output: PathBuf,
    /// Document format.
    pub format: OutputFormat,
    /// Ignore/include predicates.
    pub filter: PathFilter,
    /// How Python functions next to classes are treated.
    pub nested_functions: NestedFunctionPolicy,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::from_config(&DocgenConfig::default())
    }
}

impl GenerateOptions {
    /// Build options from a loaded configuration, unioning its extra
    /// patterns into the default filter sets.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use docgenny_core::DocgenConfig;
    /// use docgenny_scan::GenerateOptions;
    ///
    /// let config = DocgenConfig {
    ///     exclude: vec!["fixtures".into()],
    ///     ..DocgenConfig::default()
    /// };
    /// let options = GenerateOptions::from_config(&config);
    /// assert!(options.filter.should_ignore(Path::new("fixtures/a.py")));
    /// assert!(options.filter.should_ignore(Path::new("node_modules/b.js")));
    /// ```
    pub fn from_config(config: &DocgenConfig) -> Self {
        let mut filter = PathFilter::new();
        filter.extend_ignore(config.exclude.iter().cloned());
        filter.extend_important(config.include.iter().cloned());
        Self {
            output: PathBuf::from(&config.output),
            format: config.format,
            filter,
            nested_functions: config.nested_functions,
        }
    }
}

/// What one [`generate_docs`] run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Path of the written document.
    pub output_path: PathBuf,
    /// Models documented.
    pub models: usize,
    /// Functions documented.
    pub functions: usize,
    /// Lines in the project tree, root line included.
    pub tree_lines: usize,
    /// Files skipped because reading or parsing failed.
    pub files_failed: usize,
}

/// Scan `root` and write the rendered document into it.
///
/// The document is written to `root.join(options.output)`, replacing any
/// existing file. Files that fail to read or parse are skipped.
///
/// # Errors
///
/// Returns [`DocgenError::InvalidRoot`] if `root` is missing or not a
/// directory, [`DocgenError::Io`] if the tree cannot be built or the
/// document cannot be written, or [`DocgenError::Serialization`] for JSON
/// rendering failures.
///
/// # Examples
///
/// ```
/// use docgenny_scan::{generate_docs, GenerateOptions};
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("a.py"), "def hello():\n    pass\n").unwrap();
/// let summary = generate_docs(dir.path(), &GenerateOptions::default()).unwrap();
/// assert_eq!(summary.functions, 1);
/// assert!(summary.output_path.ends_with("TECHNICAL_DOCS.md"));
/// ```
pub fn generate_docs(root: &Path, options: &GenerateOptions) -> Result<GenerateSummary, DocgenError> {
    let scan_options = ScanOptions {
        filter: options.filter.clone(),
        nested_functions: options.nested_functions,
    };
    let report = scan::scan_codebase(root, &scan_options)?;

    let document = match options.format {
        OutputFormat::Markdown => {
            output::format_markdown(&report.root_name, &report.tree, &report.extraction)
        }
        OutputFormat::Json => {
            output::format_json(&report.root_name, &report.tree, &report.extraction)?
        }
    };

    let output_path = root.join(&options.output);
    std::fs::write(&output_path, document)?;
    tracing::info!(path = %output_path.display(), "documentation written");

    Ok(GenerateSummary {
        output_path,
        models: report.extraction.models.len(),
        functions: report.extraction.functions.len(),
        tree_lines: report.tree.len(),
        files_failed: report.files_failed,
    })
}
