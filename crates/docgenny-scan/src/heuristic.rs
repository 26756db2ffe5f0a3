//! Approximate extraction for JavaScript-family sources using regular expressions.
//!
//! This tier is lossy on purpose and must stay that way; existing generated
//! documents depend on its exact output. Known limits:
//! - parameter lists end at the first `)` and are split on every comma, so
//!   `f(a = g(1, 2), b)` yields `a = g(1` and `2`;
//! - class bodies are bounded by raw brace counting, blind to braces inside
//!   strings, comments and template literals;
//! - class fields are never recovered, and return types and docstrings are
//!   always `unknown` and empty;
//! - the scans run independently and may report the same construct twice.

use std::sync::LazyLock;

use docgenny_core::{Extraction, Function, Model};
use regex::Regex;

/// Return type reported for every heuristically discovered function.
const UNKNOWN_RETURN: &str = "unknown";

/// Control-flow keywords that look exactly like `name(...) {` method headers.
const RESERVED_METHOD_NAMES: &[&str] = &["if", "for", "while", "switch"];

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:export\s+)?class\s+(\w+)(?:\s+extends\s+(\w+))?\s*\{").expect("valid class regex")
});

static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:async\s+)?(\w+)\s*\([^)]*\)\s*\{").expect("valid method regex")
});

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:export\s+)?(?:async\s+)?function\s+(\w+)\s*\(([^)]*)\)")
        .expect("valid function regex")
});

static ARROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:export\s+)?(?:const|let)\s+(\w+)\s*=\s*(?:async\s+)?\(([^)]*)\)\s*=>")
        .expect("valid arrow regex")
});

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<script[^>]*>(.*?)</script>").expect("valid script regex")
});

/// Scan a JavaScript/TypeScript source for classes, functions and arrow bindings.
///
/// # Examples
///
/// ```
/// use docgenny_scan::heuristic::extract_script;
///
/// let found = extract_script("function baz(x, y) { return x; }", "b.js");
/// assert_eq!(found.functions[0].name, "baz");
/// assert_eq!(found.functions[0].params, vec!["x", "y"]);
/// assert_eq!(found.functions[0].returns, "unknown");
/// ```
pub fn extract_script(source: &str, file: &str) -> Extraction {
    let mut found = Extraction::default();
    scan_classes(source, file, &mut found.models);
    scan_functions(source, file, &mut found.functions);
    scan_arrow_bindings(source, file, &mut found.functions);
    found
}

/// Scan the `<script>` regions of a Svelte component.
///
/// All regions are joined with newlines and scanned as one script. A
/// component without script regions yields nothing.
///
/// # Examples
///
/// ```
/// use docgenny_scan::heuristic::extract_template;
///
/// let source = "<script>\n  const onClick = (e) => {};\n</script>\n<button on:click={onClick} />";
/// let found = extract_template(source, "Button.svelte");
/// assert_eq!(found.functions[0].name, "onClick");
/// ```
pub fn extract_template(source: &str, file: &str) -> Extraction {
    let regions = script_regions(source);
    if regions.is_empty() {
        return Extraction::default();
    }
    extract_script(&regions.join("\n"), file)
}

/// Contents of every `<script ...>...</script>` region, in order.
pub fn script_regions(source: &str) -> Vec<&str> {
    SCRIPT_RE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

fn scan_classes(source: &str, file: &str, models: &mut Vec<Model>) {
    for caps in CLASS_RE.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let body = class_body(source, whole.start());
        models.push(Model {
            name: name.as_str().to_string(),
            file: file.to_string(),
            fields: Vec::new(),
            methods: scan_methods(body),
            base_classes: caps
                .get(2)
                .map(|base| vec![base.as_str().to_string()])
                .unwrap_or_default(),
        });
    }
}

/// The text from the first `{` at or after `start` through its matching `}`.
///
/// Runs to the end of `source` when the braces never balance.
fn class_body(source: &str, start: usize) -> &str {
    let rest = &source[start..];
    let mut depth: i64 = 0;
    let mut open = None;
    for (i, ch) in rest.char_indices() {
        match ch {
            '{' => {
                depth += 1;
                if open.is_none() {
                    open = Some(i);
                }
            }
            '}' => depth -= 1,
            _ => {}
        }
        if let Some(open) = open {
            if depth == 0 {
                return &rest[open..=i];
            }
        }
    }
    open.map_or("", |open| &rest[open..])
}

fn scan_methods(body: &str) -> Vec<String> {
    METHOD_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str())
        .filter(|name| !RESERVED_METHOD_NAMES.contains(name))
        .map(String::from)
        .collect()
}

fn scan_functions(source: &str, file: &str, functions: &mut Vec<Function>) {
    collect_bindings(&FUNCTION_RE, source, file, functions);
}

fn scan_arrow_bindings(source: &str, file: &str, functions: &mut Vec<Function>) {
    collect_bindings(&ARROW_RE, source, file, functions);
}

fn collect_bindings(pattern: &Regex, source: &str, file: &str, functions: &mut Vec<Function>) {
    for caps in pattern.captures_iter(source) {
        let Some(name) = caps.get(1) else {
            continue;
        };
        functions.push(Function {
            name: name.as_str().to_string(),
            file: file.to_string(),
            params: split_params(caps.get(2).map_or("", |m| m.as_str())),
            returns: UNKNOWN_RETURN.to_string(),
            docstring: String::new(),
        });
    }
}

/// Split a raw parameter list on commas, trimming and dropping empty pieces.
fn split_params(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
