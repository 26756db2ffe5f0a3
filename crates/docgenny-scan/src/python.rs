//! Exact extraction for Python sources via the tree-sitter grammar.
//!
//! Unlike the heuristic scanner, results here are structural: a file either
//! parses cleanly and yields every class and function it defines, or it is
//! rejected as a whole.

use docgenny_core::{DocgenError, Extraction, Function, Model, ModelField, NestedFunctionPolicy};
use tree_sitter::{Node, Parser};

/// Methods kept even though they start with an underscore.
const LIFECYCLE_METHODS: &[&str] = &["__init__", "__str__"];

/// Type reported for class attributes without an annotation.
const UNTYPED_FIELD: &str = "Any";

/// Return type reported for functions without an annotation.
const UNANNOTATED_RETURN: &str = "None";

/// Statements the grammar accepts that Python 3 rejects.
const PYTHON2_STATEMENTS: &[&str] = &["print_statement", "exec_statement"];

/// The syntax categories the extractor cares about.
#[derive(Debug, Clone, Copy)]
enum Syntax<'tree> {
    ClassDef(Node<'tree>),
    FunctionDef(Node<'tree>),
    Assignment(Node<'tree>),
    Other,
}

impl<'tree> Syntax<'tree> {
    fn classify(node: Node<'tree>) -> Self {
        match node.kind() {
            "class_definition" => Syntax::ClassDef(node),
            // `async def` is never recorded
            "function_definition" if !child_has_kind(&node, "async") => Syntax::FunctionDef(node),
            "assignment" => Syntax::Assignment(node),
            _ => Syntax::Other,
        }
    }

    /// Classify a statement directly inside a class body.
    ///
    /// Decorators and expression-statement wrappers are looked through so a
    /// decorated method or a bare `x = 1` land in their real category.
    fn classify_statement(node: Node<'tree>) -> Self {
        match node.kind() {
            "decorated_definition" => node
                .child_by_field_name("definition")
                .map_or(Syntax::Other, Syntax::classify),
            "expression_statement" if node.named_child_count() == 1 => node
                .named_child(0)
                .map_or(Syntax::Other, Syntax::classify),
            _ => Syntax::classify(node),
        }
    }
}

/// A function seen during the walk, before the nesting policy is applied.
struct Candidate {
    function: Function,
    inside_class: bool,
}

/// Extract all classes and functions from a Python source file.
///
/// `file` is the `/`-separated path recorded on every entity.
///
/// # Errors
///
/// Returns [`DocgenError::Parse`] if the grammar cannot be loaded, the
/// source contains a syntax error, or it uses Python 2 `print`/`exec`
/// statements; nothing from the file is kept then.
///
/// # Examples
///
/// ```
/// use docgenny_core::NestedFunctionPolicy;
/// use docgenny_scan::python::extract_python;
///
/// let source = "class Foo:\n    x: int = 1\n    def bar(self): pass\n";
/// let found = extract_python(source, "a.py", NestedFunctionPolicy::default()).unwrap();
/// assert_eq!(found.models[0].name, "Foo");
/// assert_eq!(found.models[0].methods, vec!["bar"]);
/// ```
pub fn extract_python(
    source: &str,
    file: &str,
    policy: NestedFunctionPolicy,
) -> Result<Extraction, DocgenError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| DocgenError::Parse(format!("failed to set language: {e}")))?;

    let Some(tree) = parser.parse(source, None) else {
        return Err(DocgenError::Parse("parser produced no tree".into()));
    };

    let root = tree.root_node();
    if root.has_error() {
        let message = match first_error(root) {
            Some(node) => {
                let pos = node.start_position();
                format!("invalid syntax at line {}, column {}", pos.row + 1, pos.column + 1)
            }
            None => "invalid syntax".into(),
        };
        return Err(DocgenError::Parse(message));
    }
    if let Some(node) = first_of_kind(root, PYTHON2_STATEMENTS) {
        let pos = node.start_position();
        return Err(DocgenError::Parse(format!(
            "Python 2 {} at line {}, column {}",
            node.kind(),
            pos.row + 1,
            pos.column + 1
        )));
    }

    let bytes = source.as_bytes();
    let mut models = Vec::new();
    let mut candidates = Vec::new();
    visit(root, bytes, file, false, &mut models, &mut candidates);

    let has_class = !models.is_empty();
    let before = candidates.len();
    let functions: Vec<Function> = candidates
        .into_iter()
        .filter(|c| match policy {
            NestedFunctionPolicy::AnyClassInFile => !has_class,
            NestedFunctionPolicy::EnclosingClass => !c.inside_class,
        })
        .map(|c| c.function)
        .collect();

    if functions.len() < before {
        tracing::debug!(
            file,
            skipped = before - functions.len(),
            policy = %policy,
            "functions skipped by nesting policy"
        );
    }

    Ok(Extraction { models, functions })
}

fn visit(
    node: Node,
    source: &[u8],
    file: &str,
    inside_class: bool,
    models: &mut Vec<Model>,
    candidates: &mut Vec<Candidate>,
) {
    let mut nested = inside_class;
    match Syntax::classify(node) {
        Syntax::ClassDef(class) => {
            if let Some(model) = extract_class(class, source, file) {
                models.push(model);
            }
            nested = true;
        }
        Syntax::FunctionDef(func) => {
            if let Some(function) = extract_function(func, source, file) {
                candidates.push(Candidate {
                    function,
                    inside_class,
                });
            }
        }
        Syntax::Assignment(_) | Syntax::Other => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, source, file, nested, models, candidates);
    }
}

fn extract_class(node: Node, source: &[u8], file: &str) -> Option<Model> {
    let name = node_text(&node.child_by_field_name("name")?, source);

    let mut base_classes = Vec::new();
    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            match base.kind() {
                "keyword_argument" | "comment" => {}
                _ => base_classes.push(node_text(&base, source)),
            }
        }
    }

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for statement in body.named_children(&mut cursor) {
            match Syntax::classify_statement(statement) {
                Syntax::Assignment(assignment) => collect_fields(assignment, source, &mut fields),
                Syntax::FunctionDef(method) => {
                    let Some(name_node) = method.child_by_field_name("name") else {
                        continue;
                    };
                    let method_name = node_text(&name_node, source);
                    if !method_name.starts_with('_')
                        || LIFECYCLE_METHODS.contains(&method_name.as_str())
                    {
                        methods.push(method_name);
                    }
                }
                Syntax::ClassDef(_) | Syntax::Other => {}
            }
        }
    }

    Some(Model {
        name,
        file: file.to_string(),
        fields,
        methods,
        base_classes,
    })
}

/// Record the fields declared by one class-level assignment.
///
/// `x: T = v` and `x: T` give one typed field; `a = b = v` gives one untyped
/// field per plain-name target, all sharing the default `v`. Attribute,
/// subscript and tuple targets are skipped.
fn collect_fields(assignment: Node, source: &[u8], fields: &mut Vec<ModelField>) {
    let Some(left) = assignment.child_by_field_name("left") else {
        return;
    };

    if let Some(annotation) = assignment.child_by_field_name("type") {
        if left.kind() == "identifier" {
            fields.push(ModelField::new(
                node_text(&left, source),
                node_text(&annotation, source),
                assignment
                    .child_by_field_name("right")
                    .map(|v| node_text(&v, source)),
            ));
        }
        return;
    }

    let mut targets = vec![left];
    let mut value = assignment.child_by_field_name("right");
    while let Some(inner) = value {
        if inner.kind() != "assignment" || inner.child_by_field_name("type").is_some() {
            break;
        }
        let Some(target) = inner.child_by_field_name("left") else {
            break;
        };
        targets.push(target);
        value = inner.child_by_field_name("right");
    }

    let default = value.map(|v| node_text(&v, source));
    for target in targets {
        if target.kind() == "identifier" {
            fields.push(ModelField::new(
                node_text(&target, source),
                UNTYPED_FIELD,
                default.clone(),
            ));
        }
    }
}

fn extract_function(node: Node, source: &[u8], file: &str) -> Option<Function> {
    let name = node_text(&node.child_by_field_name("name")?, source);
    let params = node
        .child_by_field_name("parameters")
        .map(|p| extract_parameters(p, source))
        .unwrap_or_default();
    let returns = node
        .child_by_field_name("return_type")
        .map(|r| node_text(&r, source))
        .unwrap_or_else(|| UNANNOTATED_RETURN.to_string());

    Some(Function {
        name,
        file: file.to_string(),
        params,
        returns,
        docstring: docstring_first_line(node, source),
    })
}

/// Describe the regular positional-or-keyword parameters.
///
/// Positional-only parameters (before `/`) are dropped, and listing stops at
/// the first of `*args`, a bare `*`, or `**kwargs`. Defaults are not shown.
fn extract_parameters(parameters: Node, source: &[u8]) -> Vec<String> {
    let mut params = Vec::new();
    let mut cursor = parameters.walk();
    for param in parameters.named_children(&mut cursor) {
        match param.kind() {
            "positional_separator" => params.clear(),
            "keyword_separator" | "list_splat_pattern" | "dictionary_splat_pattern" => break,
            "identifier" => params.push(node_text(&param, source)),
            "typed_parameter" => {
                let Some(target) = param.named_child(0) else {
                    continue;
                };
                if target.kind() != "identifier" {
                    // `*args: T` / `**kwargs: T`
                    break;
                }
                params.push(describe_param(
                    node_text(&target, source),
                    param.child_by_field_name("type"),
                    source,
                ));
            }
            "default_parameter" | "typed_default_parameter" => {
                let Some(target) = param.child_by_field_name("name") else {
                    continue;
                };
                params.push(describe_param(
                    node_text(&target, source),
                    param.child_by_field_name("type"),
                    source,
                ));
            }
            _ => {}
        }
    }
    params
}

fn describe_param(name: String, annotation: Option<Node>, source: &[u8]) -> String {
    match annotation {
        Some(ty) => format!("{name}: {}", node_text(&ty, source)),
        None => name,
    }
}

/// First non-blank line of a function's docstring, or an empty string.
///
/// Only a string literal (or implicitly concatenated literals) as the first
/// body statement counts; byte strings and f-strings are not docstrings.
fn docstring_first_line(node: Node, source: &[u8]) -> String {
    let Some(body) = node.child_by_field_name("body") else {
        return String::new();
    };
    let mut cursor = body.walk();
    let Some(first) = body
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")
    else {
        return String::new();
    };
    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return String::new();
    }
    let Some(literal) = first.named_child(0) else {
        return String::new();
    };

    let content = match literal.kind() {
        "string" => string_literal_content(&node_text(&literal, source)),
        "concatenated_string" => {
            let mut cursor = literal.walk();
            let parts: Option<Vec<String>> = literal
                .named_children(&mut cursor)
                .filter(|part| part.kind() == "string")
                .map(|part| string_literal_content(&node_text(&part, source)))
                .collect();
            parts.map(|parts| parts.concat())
        }
        _ => None,
    };
    let Some(content) = content else {
        return String::new();
    };
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Value of a string literal with prefix and quotes stripped and escapes
/// applied; `None` for bytes/f-strings.
fn string_literal_content(literal: &str) -> Option<String> {
    let quote_start = literal.find(['"', '\''])?;
    let prefix = &literal[..quote_start];
    if prefix.contains(['b', 'B', 'f', 'F']) {
        return None;
    }
    let raw = prefix.contains(['r', 'R']);
    let quoted = &literal[quote_start..];
    for delimiter in ["\"\"\"", "'''", "\"", "'"] {
        if quoted.len() >= 2 * delimiter.len()
            && quoted.starts_with(delimiter)
            && quoted.ends_with(delimiter)
        {
            let body = &quoted[delimiter.len()..quoted.len() - delimiter.len()];
            return Some(if raw { body.to_string() } else { unescape(body) });
        }
    }
    None
}

/// Apply the common backslash escapes; unknown escapes are kept verbatim.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\n') => {}
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(c @ ('\\' | '\'' | '"')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn first_of_kind<'tree>(node: Node<'tree>, kinds: &[&str]) -> Option<Node<'tree>> {
    if kinds.contains(&node.kind()) {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(|child| first_of_kind(child, kinds))
}

fn node_text(node: &Node, source: &[u8]) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    if start >= source.len() || end > source.len() {
        return String::new();
    }
    String::from_utf8_lossy(&source[start..end]).to_string()
}

fn child_has_kind(node: &Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == kind {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Extraction {
        extract_python(source, "pkg/mod.py", NestedFunctionPolicy::AnyClassInFile).unwrap()
    }

    fn extract_strict(source: &str) -> Extraction {
        extract_python(source, "pkg/mod.py", NestedFunctionPolicy::EnclosingClass).unwrap()
    }

    #[test]
    fn class_fields_and_method_visibility() {
        let found = extract(
            r#"
class Config(Base):
    name: str = "demo"
    retries = 3
    def load(self):
        pass
    def _cache(self):
        pass
"#,
        );
        assert_eq!(found.models.len(), 1);
        let model = &found.models[0];
        assert_eq!(model.name, "Config");
        assert_eq!(model.file, "pkg/mod.py");
        assert_eq!(model.base_classes, vec!["Base"]);
        assert_eq!(
            model.fields,
            vec![
                ModelField::new("name", "str", Some("\"demo\"".into())),
                ModelField::new("retries", "Any", Some("3".into())),
            ]
        );
        assert_eq!(model.methods, vec!["load"]);
    }

    #[test]
    fn lifecycle_dunders_are_kept() {
        let found = extract(
            r#"
class Point:
    def __init__(self, x):
        self.x = x
    def __str__(self):
        return "p"
    def __repr__(self):
        return "p"
    def _private(self):
        pass
"#,
        );
        assert_eq!(found.models[0].methods, vec!["__init__", "__str__"]);
    }

    #[test]
    fn annotation_without_default() {
        let found = extract("class User:\n    id: int\n    tags: list[str] = []\n");
        let fields = &found.models[0].fields;
        assert_eq!(fields[0], ModelField::new("id", "int", None));
        assert_eq!(fields[1], ModelField::new("tags", "list[str]", Some("[]".into())));
    }

    #[test]
    fn chained_assignment_yields_one_field_per_target() {
        let found = extract("class Flags:\n    a = b = 0\n    c, d = 1, 2\n    self_ref.x = 5\n");
        let fields = &found.models[0].fields;
        assert_eq!(
            fields,
            &vec![
                ModelField::new("a", "Any", Some("0".into())),
                ModelField::new("b", "Any", Some("0".into())),
            ]
        );
    }

    #[test]
    fn class_without_members_is_still_a_model() {
        let found = extract("class Empty:\n    pass\n");
        let model = &found.models[0];
        assert!(model.fields.is_empty());
        assert!(model.methods.is_empty());
        assert!(model.base_classes.is_empty());
    }

    #[test]
    fn bases_skip_keywords_and_keep_dotted_names() {
        let found = extract("class Post(db.Model, Mixin, metaclass=Meta):\n    pass\n");
        assert_eq!(found.models[0].base_classes, vec!["db.Model", "Mixin"]);
    }

    #[test]
    fn decorated_methods_count_async_methods_do_not() {
        let found = extract(
            r#"
class Service:
    @property
    def url(self):
        return ""
    @staticmethod
    def _hidden():
        pass
    async def fetch(self):
        pass
"#,
        );
        assert_eq!(found.models[0].methods, vec!["url"]);
    }

    #[test]
    fn nested_classes_are_recorded() {
        let found = extract("class Outer:\n    class Meta:\n        ordering = ['id']\n");
        let names: Vec<&str> = found.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Outer", "Meta"]);
        assert_eq!(
            found.models[1].fields,
            vec![ModelField::new("ordering", "Any", Some("['id']".into()))]
        );
    }

    #[test]
    fn function_signature_and_docstring() {
        let found = extract(
            r#"
def greet(name: str, times: int = 1, loud=False) -> str:
    """Say hello.

    Longer description.
    """
    return name
"#,
        );
        assert_eq!(found.functions.len(), 1);
        let func = &found.functions[0];
        assert_eq!(func.name, "greet");
        assert_eq!(func.params, vec!["name: str", "times: int", "loud"]);
        assert_eq!(func.returns, "str");
        assert_eq!(func.docstring, "Say hello.");
    }

    #[test]
    fn function_defaults_without_annotations() {
        let found = extract("def run(x):\n    return x\n");
        let func = &found.functions[0];
        assert_eq!(func.params, vec!["x"]);
        assert_eq!(func.returns, "None");
        assert_eq!(func.docstring, "");
    }

    #[test]
    fn docstring_skips_leading_blank_lines() {
        let found = extract("def f():\n    '''\n    Summary here.\n    '''\n");
        assert_eq!(found.functions[0].docstring, "Summary here.");
    }

    #[test]
    fn fstring_is_not_a_docstring() {
        let found = extract("def f():\n    f\"{x}\"\n");
        assert_eq!(found.functions[0].docstring, "");
    }

    #[test]
    fn concatenated_docstring_is_joined() {
        let found = extract("def f():\n    \"Joined \" 'across parts.'\n");
        assert_eq!(found.functions[0].docstring, "Joined across parts.");

        let found = extract("def g():\n    \"text \" f\"{x}\"\n");
        assert_eq!(found.functions[0].docstring, "");
    }

    #[test]
    fn docstring_escapes_are_applied() {
        let found = extract("def f():\n    \"Say \\\"hi\\\"\\tnow\"\n");
        assert_eq!(found.functions[0].docstring, "Say \"hi\"\tnow");

        let found = extract("def g():\n    \"\\nSecond line\"\n");
        assert_eq!(found.functions[0].docstring, "Second line");
    }

    #[test]
    fn only_regular_parameters_are_listed() {
        let found = extract("def f(a, /, b, c: int, *args, d, **kw):\n    pass\n");
        assert_eq!(found.functions[0].params, vec!["b", "c: int"]);

        let found = extract("def g(a, *, b):\n    pass\n");
        assert_eq!(found.functions[0].params, vec!["a"]);
    }

    #[test]
    fn async_functions_are_skipped() {
        let found = extract("async def fetch():\n    pass\n\ndef sync():\n    pass\n");
        let names: Vec<&str> = found.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["sync"]);
    }

    #[test]
    fn nested_functions_are_visited() {
        let found = extract("def outer():\n    def inner():\n        pass\n    return inner\n");
        let names: Vec<&str> = found.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner"]);
    }

    #[test]
    fn any_class_in_file_drops_all_functions() {
        let source = "def helper():\n    pass\n\nclass A:\n    def m(self):\n        pass\n";
        let found = extract(source);
        assert_eq!(found.models.len(), 1);
        assert!(found.functions.is_empty());
    }

    #[test]
    fn enclosing_class_keeps_top_level_functions() {
        let source = "def helper():\n    pass\n\nclass A:\n    def m(self):\n        def local():\n            pass\n";
        let found = extract_strict(source);
        let names: Vec<&str> = found.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["helper"]);
    }

    #[test]
    fn syntax_error_rejects_whole_file() {
        let err = extract_python(
            "class Ok:\n    pass\n\ndef broken(:\n    pass\n",
            "bad.py",
            NestedFunctionPolicy::default(),
        )
        .unwrap_err();
        match err {
            DocgenError::Parse(msg) => assert!(msg.contains("invalid syntax"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn python2_statements_reject_whole_file() {
        let err = extract_python(
            "class Legacy(object):\n    def run(self):\n        print \"running\"\n",
            "legacy.py",
            NestedFunctionPolicy::default(),
        )
        .unwrap_err();
        match err {
            DocgenError::Parse(msg) => {
                assert!(msg.contains("print_statement"), "{msg}");
                assert!(msg.contains("line 3, column 9"), "{msg}");
            }
            other => panic!("unexpected error: {other}"),
        }

        let result = extract_python("exec \"x = 1\"\n", "legacy.py", NestedFunctionPolicy::default());
        assert!(result.is_err());
    }

    #[test]
    fn print_call_is_not_a_python2_statement() {
        let found = extract("def run():\n    print(\"running\")\n");
        assert_eq!(found.functions[0].name, "run");
    }

    #[test]
    fn empty_file_yields_nothing() {
        let found = extract("");
        assert!(found.is_empty());
    }

    #[test]
    fn string_literal_content_handles_prefixes() {
        assert_eq!(string_literal_content("\"\"\"doc\"\"\"").as_deref(), Some("doc"));
        assert_eq!(string_literal_content("r'raw\\n'").as_deref(), Some("raw\\n"));
        assert_eq!(string_literal_content("b'bytes'"), None);
        assert_eq!(string_literal_content("F\"x\""), None);
    }
}
