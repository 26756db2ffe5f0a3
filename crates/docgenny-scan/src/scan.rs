use std::path::Path;

use docgenny_core::{DocgenError, Extraction, NestedFunctionPolicy};

use crate::filter::PathFilter;
use crate::heuristic;
use crate::python;
use crate::tree;
use crate::walker::{self, SourceFile, SourceKind};

/// Settings for one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Ignore/include predicates.
    pub filter: PathFilter,
    /// How Python functions next to classes are treated.
    pub nested_functions: NestedFunctionPolicy,
}

/// Everything one scan of a root produced.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Display name of the root directory.
    pub root_name: String,
    /// Rendered project tree, root line first.
    pub tree: Vec<String>,
    /// Models and functions from every file that scanned cleanly.
    pub extraction: Extraction,
    /// Files handed to an extractor.
    pub files_scanned: usize,
    /// Files skipped because reading or parsing failed.
    pub files_failed: usize,
}

/// Check that `root` exists and is a directory.
///
/// # Errors
///
/// Returns [`DocgenError::InvalidRoot`] describing which check failed.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use docgenny_scan::scan::validate_root;
///
/// let err = validate_root(Path::new("/definitely/not/here")).unwrap_err();
/// assert!(err.to_string().contains("does not exist"));
/// ```
pub fn validate_root(root: &Path) -> Result<(), DocgenError> {
    if !root.exists() {
        return Err(DocgenError::InvalidRoot {
            path: root.to_path_buf(),
            reason: "does not exist",
        });
    }
    if !root.is_dir() {
        return Err(DocgenError::InvalidRoot {
            path: root.to_path_buf(),
            reason: "is not a directory",
        });
    }
    Ok(())
}

/// Display name for `root`: the last component of its canonical path.
pub fn root_display_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}

/// Build the tree and extract every recognised file under `root`.
///
/// A file that cannot be read or parsed is logged and skipped; only an
/// invalid root or an unlistable root directory fails the scan.
///
/// # Errors
///
/// Returns [`DocgenError::InvalidRoot`] for a bad root, or
/// [`DocgenError::Io`] if the tree cannot be built.
///
/// # Examples
///
/// ```
/// use docgenny_scan::scan::{scan_codebase, ScanOptions};
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("b.js"), "function baz(x, y) { return x; }").unwrap();
/// let report = scan_codebase(dir.path(), &ScanOptions::default()).unwrap();
/// assert_eq!(report.extraction.functions[0].name, "baz");
/// assert_eq!(report.files_scanned, 1);
/// ```
pub fn scan_codebase(root: &Path, options: &ScanOptions) -> Result<ScanReport, DocgenError> {
    validate_root(root)?;
    tracing::info!(root = %root.display(), "scanning codebase");

    let root_name = root_display_name(root);
    let tree = tree::build_tree(root, &root_name, &options.filter)?;
    let files = walker::walk_sources(root, &options.filter)?;

    let mut extraction = Extraction::default();
    let mut files_failed = 0;
    for file in &files {
        match extract_file(root, file, options.nested_functions) {
            Ok(found) => {
                tracing::debug!(
                    file = %file.display_path(),
                    models = found.models.len(),
                    functions = found.functions.len(),
                    "extracted"
                );
                extraction.merge(found);
            }
            Err(err) => {
                tracing::warn!(file = %root.join(&file.path).display(), error = %err, "skipping file");
                files_failed += 1;
            }
        }
    }

    tracing::info!(
        models = extraction.models.len(),
        functions = extraction.functions.len(),
        "scan complete"
    );

    Ok(ScanReport {
        root_name,
        tree,
        extraction,
        files_scanned: files.len(),
        files_failed,
    })
}

/// Read one file and run the extractor for its kind.
///
/// # Errors
///
/// Returns [`DocgenError::Io`] if the file cannot be read as UTF-8, or
/// [`DocgenError::Parse`] for Python syntax errors.
pub fn extract_file(
    root: &Path,
    file: &SourceFile,
    policy: NestedFunctionPolicy,
) -> Result<Extraction, DocgenError> {
    let content = file.read(root)?;
    let display = file.display_path();
    match file.kind {
        SourceKind::Python => python::extract_python(&content, &display, policy),
        SourceKind::Script => Ok(heuristic::extract_script(&content, &display)),
        SourceKind::Template => Ok(heuristic::extract_template(&content, &display)),
    }
}
