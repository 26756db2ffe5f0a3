//! Ignore and include predicates over paths.
//!
//! Ignore matching is substring-based on path components, not glob-based:
//! `dist` excludes `dist/` but also `distribution/`. Include matching accepts
//! `*.ext` suffix patterns, literal file names, and globs matched against the
//! trailing path components.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path};

use docgenny_core::{DEFAULT_IGNORE_PATTERNS, DEFAULT_IMPORTANT_PATTERNS};

const GLOB_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled include pattern.
#[derive(Debug, Clone)]
enum ImportantPattern {
    /// `*.ext`: compared against the file suffix (with its dot).
    Suffix(String),
    /// Anything else: exact file name, or a glob over trailing components.
    Name {
        literal: String,
        glob: Option<glob::Pattern>,
        depth: usize,
    },
}

impl ImportantPattern {
    fn compile(pattern: &str) -> Self {
        if let Some(suffix) = pattern.strip_prefix('*') {
            return ImportantPattern::Suffix(suffix.to_string());
        }
        ImportantPattern::Name {
            literal: pattern.to_string(),
            glob: glob::Pattern::new(pattern).ok(),
            depth: pattern.trim_start_matches('/').split('/').count(),
        }
    }

    fn matches(&self, path: &Path, name: &str, suffix: &str) -> bool {
        match self {
            ImportantPattern::Suffix(ext) => suffix == ext,
            ImportantPattern::Name {
                literal,
                glob,
                depth,
            } => {
                if name == literal {
                    return true;
                }
                let Some(glob) = glob else {
                    return false;
                };
                let parts: Vec<String> = normal_components(path).collect();
                if parts.len() < *depth {
                    return false;
                }
                let tail = parts[parts.len() - depth..].join("/");
                glob.matches_with(&tail, GLOB_OPTIONS)
            }
        }
    }
}

/// Decides which paths are skipped and which files appear in the tree.
///
/// Both pattern sets only grow: callers may union extra patterns before a
/// scan, but nothing is ever removed.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use docgenny_scan::filter::PathFilter;
///
/// let filter = PathFilter::new();
/// assert!(filter.should_ignore(Path::new("web/node_modules/react/index.js")));
/// assert!(!filter.should_ignore(Path::new("src/app.py")));
/// assert!(filter.is_important_file(Path::new("src/app.py")));
/// assert!(!filter.is_important_file(Path::new("data.csv")));
/// ```
#[derive(Debug, Clone)]
pub struct PathFilter {
    ignore_patterns: BTreeSet<String>,
    important_patterns: BTreeMap<String, ImportantPattern>,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PathFilter {
    /// Create a filter seeded with the default ignore and include sets.
    pub fn new() -> Self {
        let mut filter = Self::empty();
        filter.extend_ignore(DEFAULT_IGNORE_PATTERNS.iter().copied());
        filter.extend_important(DEFAULT_IMPORTANT_PATTERNS.iter().copied());
        filter
    }

    /// Create a filter with no patterns at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use docgenny_scan::filter::PathFilter;
    ///
    /// let filter = PathFilter::empty();
    /// assert!(!filter.should_ignore(Path::new("node_modules/x.js")));
    /// assert!(!filter.is_important_file(Path::new("main.py")));
    /// ```
    pub fn empty() -> Self {
        Self {
            ignore_patterns: BTreeSet::new(),
            important_patterns: BTreeMap::new(),
        }
    }

    /// Union `patterns` into the ignore set.
    pub fn extend_ignore<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_patterns
            .extend(patterns.into_iter().map(Into::into));
    }

    /// Union `patterns` into the include set.
    pub fn extend_important<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            let pattern = pattern.into();
            let compiled = ImportantPattern::compile(&pattern);
            self.important_patterns.entry(pattern).or_insert(compiled);
        }
    }

    /// Current ignore patterns, sorted.
    pub fn ignore_patterns(&self) -> impl Iterator<Item = &str> {
        self.ignore_patterns.iter().map(String::as_str)
    }

    /// Current include patterns, sorted.
    pub fn important_patterns(&self) -> impl Iterator<Item = &str> {
        self.important_patterns.keys().map(String::as_str)
    }

    /// Whether any path component contains the core of an ignore pattern.
    ///
    /// The core is the pattern with leading and trailing `*` stripped. Pass
    /// paths relative to the scan root so the root's own location never
    /// triggers a match.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use docgenny_scan::filter::PathFilter;
    ///
    /// let filter = PathFilter::new();
    /// assert!(filter.should_ignore(Path::new("pkg/mod.pyc")));
    /// assert!(filter.should_ignore(Path::new("distribution/setup.py")));
    /// ```
    pub fn should_ignore(&self, path: &Path) -> bool {
        normal_components(path).any(|part| {
            self.ignore_patterns
                .iter()
                .any(|pattern| part.contains(pattern.trim_matches('*')))
        })
    }

    /// Whether a file belongs in the rendered project tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use docgenny_scan::filter::PathFilter;
    ///
    /// let filter = PathFilter::new();
    /// assert!(filter.is_important_file(Path::new("Dockerfile")));
    /// assert!(filter.is_important_file(Path::new("requirements-dev.txt")));
    /// assert!(!filter.is_important_file(Path::new("notes.txt")));
    /// ```
    pub fn is_important_file(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = file_suffix(&name);
        self.important_patterns
            .values()
            .any(|pattern| pattern.matches(path, &name, suffix))
    }
}

/// The final `.ext` of a file name, or `""`.
///
/// Dot-files such as `.bashrc` and names ending in a dot have no suffix.
fn file_suffix(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i > 0 && i < name.len() - 1 => &name[i..],
        _ => "",
    }
}

fn normal_components(path: &Path) -> impl Iterator<Item = String> + '_ {
    path.components().filter_map(|c| match c {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        _ => None,
    })
}
