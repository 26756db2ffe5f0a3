use std::path::{Component, Path, PathBuf};

use docgenny_core::DocgenError;

use crate::filter::PathFilter;

/// How a source file is scanned, detected from its extension.
///
/// # Examples
///
/// ```
/// use docgenny_scan::walker::SourceKind;
///
/// assert_eq!(SourceKind::from_extension("py"), Some(SourceKind::Python));
/// assert_eq!(SourceKind::from_extension("tsx"), Some(SourceKind::Script));
/// assert_eq!(SourceKind::from_extension("svelte"), Some(SourceKind::Template));
/// assert_eq!(SourceKind::from_extension("rs"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Parsed with the tree-sitter Python grammar.
    Python,
    /// JavaScript/TypeScript dialects, scanned heuristically.
    Script,
    /// Svelte components: script regions scanned heuristically.
    Template,
}

impl SourceKind {
    /// Detect the scan mode from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(SourceKind::Python),
            "js" | "ts" | "jsx" | "tsx" => Some(SourceKind::Script),
            "svelte" => Some(SourceKind::Template),
            _ => None,
        }
    }
}

/// A scannable file discovered under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the scan root.
    pub path: PathBuf,
    /// Scan mode for this file.
    pub kind: SourceKind,
}

impl SourceFile {
    /// The relative path rendered with `/` separators.
    pub fn display_path(&self) -> String {
        relative_path_string(&self.path)
    }

    /// Read the whole file as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::Io`] if the file cannot be read or is not UTF-8.
    pub fn read(&self, root: &Path) -> Result<String, DocgenError> {
        Ok(std::fs::read_to_string(root.join(&self.path))?)
    }
}

/// Render a relative path with `/` separators regardless of platform.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use docgenny_scan::walker::relative_path_string;
///
/// assert_eq!(relative_path_string(Path::new("./src/app.py")), "src/app.py");
/// ```
pub fn relative_path_string(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk every file under `root`, returning the ones a scanner understands.
///
/// Hidden and gitignored files are visited; only `filter`'s ignore patterns
/// prune the walk, and an ignored directory is never entered. Symlinked
/// directories are not followed; symlinked files are returned. Returned
/// paths are relative to `root`, in file-name order.
///
/// # Errors
///
/// Returns [`DocgenError::InvalidRoot`] if `root` is not a directory.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use docgenny_scan::filter::PathFilter;
/// use docgenny_scan::walker::walk_sources;
///
/// let files = walk_sources(Path::new("."), &PathFilter::new()).unwrap();
/// for f in &files {
///     println!("{}: {:?}", f.display_path(), f.kind);
/// }
/// ```
pub fn walk_sources(root: &Path, filter: &PathFilter) -> Result<Vec<SourceFile>, DocgenError> {
    if !root.is_dir() {
        return Err(DocgenError::InvalidRoot {
            path: root.to_path_buf(),
            reason: "is not a directory",
        });
    }

    let prune_root = root.to_path_buf();
    let prune_filter = filter.clone();
    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let relative = entry.path().strip_prefix(&prune_root).unwrap_or(entry.path());
            !prune_filter.should_ignore(relative)
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        // symlinked files are scanned; symlinked directories are not entered
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(kind) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SourceKind::from_extension)
        else {
            continue;
        };

        let relative = match path.strip_prefix(root) {
            Ok(r) => r.to_path_buf(),
            Err(_) => path.to_path_buf(),
        };

        files.push(SourceFile {
            path: relative,
            kind,
        });
    }

    Ok(files)
}
