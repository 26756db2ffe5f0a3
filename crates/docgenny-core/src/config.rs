use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DocgenError;
use crate::types::{NestedFunctionPolicy, OutputFormat};

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE_NAME: &str = ".docgenny.toml";

/// Name of the generated document when none is configured.
pub const DEFAULT_OUTPUT_FILE: &str = "TECHNICAL_DOCS.md";

/// Path substrings excluded from both the tree and the scan.
///
/// A leading or trailing `*` is stripped before matching, so `*.pyc` excludes
/// any path component containing `.pyc`.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "__pycache__",
    ".git",
    ".pytest_cache",
    "node_modules",
    ".venv",
    "venv",
    "env",
    ".env",
    "dist",
    "build",
    ".DS_Store",
    "*.pyc",
    "*.pyo",
    "*.egg-info",
    ".svelte-kit",
    "output",
    "generated",
    "__package__",
];

/// File patterns that appear in the rendered project tree.
pub const DEFAULT_IMPORTANT_PATTERNS: &[&str] = &[
    "*.py",
    "*.js",
    "*.ts",
    "*.svelte",
    "*.md",
    "requirements*.txt",
    "*.yml",
    "*.yaml",
    "Dockerfile",
    ".env.example",
    "setup.py",
    "pyproject.toml",
    "package.json",
];

/// Configuration loaded from `.docgenny.toml`.
///
/// Resolution order: CLI flags > config file > defaults. Pattern lists are
/// always unioned with the built-in sets, never replacing them.
///
/// # Examples
///
/// ```
/// use docgenny_core::{DocgenConfig, OutputFormat};
///
/// let config = DocgenConfig::default();
/// assert_eq!(config.output, "TECHNICAL_DOCS.md");
/// assert_eq!(config.format, OutputFormat::Markdown);
/// assert!(config.include.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocgenConfig {
    /// Output file name, relative to the scanned root.
    #[serde(default = "default_output")]
    pub output: String,
    /// Document format.
    #[serde(default)]
    pub format: OutputFormat,
    /// Extra patterns unioned into the include set.
    #[serde(default)]
    pub include: Vec<String>,
    /// Extra patterns unioned into the ignore set.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// How Python functions next to classes are treated.
    #[serde(default)]
    pub nested_functions: NestedFunctionPolicy,
}

fn default_output() -> String {
    DEFAULT_OUTPUT_FILE.into()
}

impl Default for DocgenConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            include: Vec::new(),
            exclude: Vec::new(),
            nested_functions: NestedFunctionPolicy::default(),
        }
    }
}

impl DocgenConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::Io`] if the file cannot be read, or
    /// [`DocgenError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use docgenny_core::DocgenConfig;
    /// use std::path::Path;
    ///
    /// let config = DocgenConfig::from_file(Path::new(".docgenny.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, DocgenError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::Toml`] if parsing fails, or
    /// [`DocgenError::Config`] if the output name is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use docgenny_core::{DocgenConfig, NestedFunctionPolicy};
    ///
    /// let toml = r#"
    /// output = "DOCS.md"
    /// exclude = ["fixtures"]
    /// nested_functions = "enclosing-class"
    /// "#;
    /// let config = DocgenConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.output, "DOCS.md");
    /// assert_eq!(config.nested_functions, NestedFunctionPolicy::EnclosingClass);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, DocgenError> {
        let config: Self = toml::from_str(content)?;
        if config.output.trim().is_empty() {
            return Err(DocgenError::Config("output must not be empty".into()));
        }
        Ok(config)
    }

    /// Resolve the configuration for a scan of `root`.
    ///
    /// An explicit path must exist. Without one, `<root>/.docgenny.toml` is
    /// used when present and defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::FileNotFound`] if `explicit` does not exist,
    /// or any error from [`DocgenConfig::from_file`].
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, DocgenError> {
        match explicit {
            Some(path) if !path.is_file() => Err(DocgenError::FileNotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path),
            None => {
                let local = root.join(CONFIG_FILE_NAME);
                if local.is_file() {
                    Self::from_file(&local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Split a comma-separated pattern list, trimming entries and dropping empties.
///
/// # Examples
///
/// ```
/// use docgenny_core::split_patterns;
///
/// assert_eq!(split_patterns(" *.rs, Makefile ,,"), vec!["*.rs", "Makefile"]);
/// ```
pub fn split_patterns(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
