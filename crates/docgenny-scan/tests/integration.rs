//! Integration test: walk → extract → render → write on a small mixed project.

use std::fs;
use std::path::Path;

use docgenny_core::{DocgenConfig, OutputFormat};
use docgenny_scan::{generate_docs, GenerateOptions};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn sample_project(root: &Path) {
    write(
        root,
        "backend/models.py",
        r#"
class User(BaseModel):
    """A registered user."""
    id: int
    name: str = "anon"
    active = True

    def __init__(self, name):
        self.name = name

    def _secret(self):
        pass

    def greet(self):
        return f"hi {self.name}"
"#,
    );
    write(
        root,
        "backend/utils.py",
        r#"
def slugify(text: str, sep: str = "-") -> str:
    """Turn text into a slug.

    Longer explanation that is not rendered.
    """
    return text.lower()
"#,
    );
    write(
        root,
        "web/src/api.ts",
        "export async function fetchUser(id: number) {}\nexport const save = (user) => post(user);\n",
    );
    write(
        root,
        "web/src/Card.svelte",
        "<script>\n  export let title;\n  function expand(evt) {}\n</script>\n<div>{title}</div>\n",
    );
    write(root, "web/node_modules/lib/index.js", "function hidden() {}\n");
    write(root, ".git/config", "[core]\n");
    write(root, "assets/logo.png", "not really a png");
    write(root, "backend/broken.py", "def nope(:\n");
}

#[test]
fn end_to_end_markdown_document() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    sample_project(root);

    let summary = generate_docs(root, &GenerateOptions::default()).unwrap();
    assert_eq!(summary.output_path, root.join("TECHNICAL_DOCS.md"));
    assert_eq!(summary.models, 1);
    assert_eq!(summary.functions, 4);
    assert_eq!(summary.files_failed, 1);

    let doc = fs::read_to_string(&summary.output_path).unwrap();

    // Header and table of contents
    assert!(doc.starts_with("# Technical Documentation\n"));
    assert!(doc.contains("2. [Models & Schemas](#models--schemas)"));

    // Tree: ignored directories pruned, unimportant files hidden
    assert!(doc.contains("├── backend/\n│   ├── broken.py\n│   ├── models.py\n│   ├── utils.py"));
    assert!(doc.contains("├── assets/\n"));
    assert!(!doc.contains("logo.png"));
    assert!(!doc.contains("node_modules"));
    assert!(!doc.contains(".git/"));

    // Python model
    assert!(doc.contains("### backend/models.py\n\n#### `User`\n*Inherits from: BaseModel*\n"));
    assert!(doc.contains("| `id` | `int` | `-` |"));
    assert!(doc.contains("| `name` | `str` | `\"anon\"` |"));
    assert!(doc.contains("| `active` | `Any` | `True` |"));
    assert!(doc.contains("- `__init__()`\n- `greet()`\n"));
    assert!(!doc.contains("_secret"));

    // Python function with first docstring line only
    assert!(doc.contains(
        "#### `slugify(text: str, sep: str)`\n*Returns: `str`*\n\nTurn text into a slug.\n"
    ));
    assert!(!doc.contains("Longer explanation"));

    // Heuristic tier
    assert!(doc.contains("### web/src/Card.svelte\n\n#### `expand(evt)`\n*Returns: `unknown`*\n"));
    assert!(doc.contains("#### `fetchUser(id: number)`"));
    assert!(doc.contains("#### `save(user)`"));
    assert!(!doc.contains("hidden()"));

    // Files sorted across sections
    let utils = doc.find("### backend/utils.py").unwrap();
    let svelte = doc.find("### web/src/Card.svelte").unwrap();
    let api = doc.find("### web/src/api.ts").unwrap();
    assert!(utils < svelte && svelte < api);
}

#[test]
fn json_output_with_config_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    sample_project(root);

    let config = DocgenConfig {
        output: "docs.json".into(),
        format: OutputFormat::Json,
        exclude: vec!["web".into()],
        ..DocgenConfig::default()
    };
    let summary = generate_docs(root, &GenerateOptions::from_config(&config)).unwrap();
    assert!(summary.output_path.ends_with("docs.json"));

    let content = fs::read_to_string(&summary.output_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["models"][0]["name"], "User");
    assert_eq!(value["models"][0]["baseClasses"][0], "BaseModel");
    assert_eq!(value["functions"].as_array().unwrap().len(), 1);
    assert_eq!(value["functions"][0]["name"], "slugify");
    let tree: Vec<&str> = value["tree"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l.as_str())
        .collect();
    assert!(tree.iter().all(|l| !l.contains("web")));
}

#[test]
fn empty_project_uses_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let summary = generate_docs(dir.path(), &GenerateOptions::default()).unwrap();
    assert_eq!(summary.models, 0);
    assert_eq!(summary.functions, 0);
    assert_eq!(summary.tree_lines, 1);

    let doc = fs::read_to_string(&summary.output_path).unwrap();
    assert!(doc.contains("*No models or classes found*"));
    assert!(doc.contains("*No functions found*"));
}

#[test]
fn missing_root_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = generate_docs(&dir.path().join("nope"), &GenerateOptions::default()).unwrap_err();
    assert!(err.to_string().ends_with("does not exist"));
}
