use std::collections::BTreeMap;

use docgenny_core::{DocgenError, Extraction, Function, Model};
use serde::Serialize;

const NO_MODELS: &str = "*No models or classes found*\n";
const NO_FUNCTIONS: &str = "*No functions found*\n";

/// JSON document layout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentOutput<'a> {
    root: &'a str,
    tree: &'a [String],
    models: Vec<&'a Model>,
    functions: Vec<&'a Function>,
}

fn sorted_models(extraction: &Extraction) -> Vec<&Model> {
    let mut models: Vec<&Model> = extraction.models.iter().collect();
    models.sort_by(|a, b| (&a.file, &a.name).cmp(&(&b.file, &b.name)));
    models
}

fn sorted_functions(extraction: &Extraction) -> Vec<&Function> {
    let mut functions: Vec<&Function> = extraction.functions.iter().collect();
    functions.sort_by(|a, b| (&a.file, &a.name).cmp(&(&b.file, &b.name)));
    functions
}

/// Group already-sorted entities by file, keeping their order within a file.
fn group_by_file<'a, T>(items: Vec<&'a T>, file: impl Fn(&T) -> &str) -> BTreeMap<String, Vec<&'a T>> {
    let mut by_file: BTreeMap<String, Vec<&T>> = BTreeMap::new();
    for item in items {
        by_file.entry(file(item).to_string()).or_default().push(item);
    }
    by_file
}

/// Render the Markdown document.
///
/// Entities are sorted by `(file, name)` and grouped under one heading per
/// file. An empty collection renders a placeholder line instead of headings.
///
/// # Examples
///
/// ```
/// use docgenny_core::Extraction;
/// use docgenny_scan::output::format_markdown;
///
/// let md = format_markdown("demo", &["demo/".to_string()], &Extraction::default());
/// assert!(md.starts_with("# Technical Documentation"));
/// assert!(md.contains("*No models or classes found*"));
/// assert!(md.contains("*No functions found*"));
/// ```
pub fn format_markdown(root_name: &str, tree: &[String], extraction: &Extraction) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Technical Documentation".into());
    lines.push(format!("\n*Auto-generated from: {root_name}*\n"));
    lines.push("---\n".into());

    lines.push("## Table of Contents".into());
    lines.push("1. [Project Structure](#project-structure)".into());
    lines.push("2. [Models & Schemas](#models--schemas)".into());
    lines.push("3. [Functions & Utilities](#functions--utilities)".into());
    lines.push("\n---\n".into());

    lines.push("## Project Structure\n".into());
    lines.push("```".into());
    lines.extend(tree.iter().cloned());
    lines.push("```\n".into());
    lines.push("---\n".into());

    lines.push("## Models & Schemas\n".into());
    if extraction.models.is_empty() {
        lines.push(NO_MODELS.into());
    } else {
        let by_file = group_by_file(sorted_models(extraction), |m| m.file.as_str());
        for (file_path, models) in &by_file {
            lines.push(format!("### {file_path}\n"));
            for model in models {
                push_model(&mut lines, model);
            }
        }
    }

    lines.push("## Functions & Utilities\n".into());
    if extraction.functions.is_empty() {
        lines.push(NO_FUNCTIONS.into());
    } else {
        let by_file = group_by_file(sorted_functions(extraction), |f| f.file.as_str());
        for (file_path, functions) in &by_file {
            lines.push(format!("### {file_path}\n"));
            for func in functions {
                push_function(&mut lines, func);
            }
        }
    }

    lines.join("\n")
}

fn push_model(lines: &mut Vec<String>, model: &Model) {
    lines.push(format!("#### `{}`", model.name));

    if model.base_classes.is_empty() {
        lines.push(String::new());
    } else {
        lines.push(format!("*Inherits from: {}*\n", model.base_classes.join(", ")));
    }

    if !model.fields.is_empty() {
        lines.push("**Fields:**".into());
        lines.push("| Field | Type | Default |".into());
        lines.push("|-------|------|---------|".into());
        for field in &model.fields {
            let default = match field.default.as_deref() {
                Some(d) if !d.is_empty() => d,
                _ => "-",
            };
            lines.push(format!(
                "| `{}` | `{}` | `{default}` |",
                field.name, field.field_type
            ));
        }
        lines.push(String::new());
    }

    if !model.methods.is_empty() {
        lines.push("**Methods:**".into());
        for method in &model.methods {
            lines.push(format!("- `{method}()`"));
        }
        lines.push(String::new());
    }

    lines.push("---\n".into());
}

fn push_function(lines: &mut Vec<String>, func: &Function) {
    lines.push(format!("#### `{}({})`", func.name, func.params.join(", ")));
    lines.push(format!("*Returns: `{}`*\n", func.returns));
    if !func.docstring.is_empty() {
        lines.push(format!("{}\n", func.docstring));
    }
    lines.push("---\n".into());
}

/// Render the JSON document: root name, tree lines, and sorted entities.
///
/// # Errors
///
/// Returns [`DocgenError::Serialization`] if serialization fails.
///
/// # Examples
///
/// ```
/// use docgenny_core::Extraction;
/// use docgenny_scan::output::format_json;
///
/// let json = format_json("demo", &[], &Extraction::default()).unwrap();
/// assert!(json.contains("\"models\": []"));
/// ```
pub fn format_json(root_name: &str, tree: &[String], extraction: &Extraction) -> Result<String, DocgenError> {
    let output = DocumentOutput {
        root: root_name,
        tree,
        models: sorted_models(extraction),
        functions: sorted_functions(extraction),
    };
    serde_json::to_string_pretty(&output).map_err(DocgenError::from)
}
