use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One class-level attribute of a [`Model`].
///
/// `field_type` is the annotation text, or `"Any"` when the attribute carries
/// no annotation. `default` is the initializer text, if any.
///
/// # Examples
///
/// ```
/// use docgenny_core::ModelField;
///
/// let field = ModelField::new("x", "int", Some("1".into()));
/// assert_eq!(field.field_type, "int");
/// assert_eq!(field.default.as_deref(), Some("1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelField {
    /// Attribute name.
    pub name: String,
    /// Rendered type annotation.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Rendered initializer expression.
    pub default: Option<String>,
}

impl ModelField {
    /// Build a field from its parts.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>, default: Option<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            default,
        }
    }
}

/// A class or type definition discovered in a source file.
///
/// # Examples
///
/// ```
/// use docgenny_core::Model;
///
/// let model = Model {
///     name: "User".into(),
///     file: "app/models.py".into(),
///     fields: Vec::new(),
///     methods: vec!["save".into()],
///     base_classes: vec!["Base".into()],
/// };
/// assert!(model.fields.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Class name.
    pub name: String,
    /// Path relative to the scan root, `/`-separated.
    pub file: String,
    /// Class-level attributes in declaration order.
    pub fields: Vec<ModelField>,
    /// Method names in declaration order.
    pub methods: Vec<String>,
    /// Base type names in declaration order.
    pub base_classes: Vec<String>,
}

/// A standalone function or arrow-style binding discovered in a source file.
///
/// # Examples
///
/// ```
/// use docgenny_core::Function;
///
/// let func = Function {
///     name: "baz".into(),
///     file: "b.js".into(),
///     params: vec!["x".into(), "y".into()],
///     returns: "unknown".into(),
///     docstring: String::new(),
/// };
/// assert_eq!(func.params.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Path relative to the scan root, `/`-separated.
    pub file: String,
    /// Parameter descriptions (`name` or `name: annotation`).
    pub params: Vec<String>,
    /// Return annotation, `"None"` for unannotated Python, `"unknown"` otherwise.
    pub returns: String,
    /// First line of the docstring, possibly empty.
    pub docstring: String,
}

/// Everything a scan produced for one file or for a whole tree.
///
/// Collections are append-only; ordering is discovery order and carries no
/// meaning until the renderer sorts by `(file, name)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    /// Discovered classes.
    pub models: Vec<Model>,
    /// Discovered functions.
    pub functions: Vec<Function>,
}

impl Extraction {
    /// Append everything from `other`.
    pub fn merge(&mut self, other: Extraction) {
        self.models.extend(other.models);
        self.functions.extend(other.functions);
    }

    /// Whether nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.functions.is_empty()
    }
}

/// Format of the generated document.
///
/// # Examples
///
/// ```
/// use docgenny_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown document with tree, models and functions.
    #[default]
    Markdown,
    /// Machine-readable JSON with camelCase keys.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// How the Python extractor decides a function is "inside a class".
///
/// # Examples
///
/// ```
/// use docgenny_core::NestedFunctionPolicy;
///
/// assert_eq!(NestedFunctionPolicy::default(), NestedFunctionPolicy::AnyClassInFile);
/// let p: NestedFunctionPolicy = "enclosing-class".parse().unwrap();
/// assert_eq!(p, NestedFunctionPolicy::EnclosingClass);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NestedFunctionPolicy {
    /// Skip every function in a file that defines any class at all.
    ///
    /// Matches the output of earlier docgenny releases, including the fact
    /// that top-level functions beside a class are dropped.
    #[default]
    AnyClassInFile,
    /// Skip only functions that sit somewhere below a class definition.
    EnclosingClass,
}

impl fmt::Display for NestedFunctionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NestedFunctionPolicy::AnyClassInFile => write!(f, "any-class-in-file"),
            NestedFunctionPolicy::EnclosingClass => write!(f, "enclosing-class"),
        }
    }
}

impl FromStr for NestedFunctionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any-class-in-file" => Ok(NestedFunctionPolicy::AnyClassInFile),
            "enclosing-class" => Ok(NestedFunctionPolicy::EnclosingClass),
            other => Err(format!("unknown nested function policy: {other}")),
        }
    }
}
