use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use docgenny_core::DocgenError;

use crate::filter::PathFilter;

/// Prefix for every entry line.
const BRANCH: &str = "\u{251c}\u{2500}\u{2500} ";

/// Indentation added per directory level.
const GUIDE: &str = "\u{2502}   ";

/// Render the project tree under `root` as prefixed lines.
///
/// The first line is the root name followed by `/`. Directories sort before
/// files, then by name. Ignored paths are pruned with all their descendants;
/// directories are always listed, files only when `filter` marks them
/// important. Directories that cannot be listed for lack of permission are
/// shown without children. Symlinked directories are listed but not entered.
///
/// # Errors
///
/// Returns [`DocgenError::Io`] if `root` itself cannot be listed, or a
/// subdirectory listing fails for a reason other than permissions.
///
/// # Examples
///
/// ```
/// use docgenny_scan::filter::PathFilter;
/// use docgenny_scan::tree::build_tree;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("app.py"), "").unwrap();
/// let lines = build_tree(dir.path(), "demo", &PathFilter::new()).unwrap();
/// assert_eq!(lines, vec!["demo/", "\u{251c}\u{2500}\u{2500} app.py"]);
/// ```
pub fn build_tree(root: &Path, root_name: &str, filter: &PathFilter) -> Result<Vec<String>, DocgenError> {
    let mut lines = vec![format!("{root_name}/")];
    let entries = sorted_entries(root)?;
    add_entries(root, &entries, "", filter, &mut lines)?;
    Ok(lines)
}

struct Entry {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

fn sorted_entries(dir: &Path) -> Result<Vec<Entry>, std::io::Error> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: path.is_dir(),
            path,
        });
    }
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    Ok(entries)
}

fn add_entries(
    root: &Path,
    entries: &[Entry],
    prefix: &str,
    filter: &PathFilter,
    lines: &mut Vec<String>,
) -> Result<(), DocgenError> {
    for entry in entries {
        let relative = entry.path.strip_prefix(root).unwrap_or(&entry.path);
        if filter.should_ignore(relative) {
            continue;
        }

        if entry.is_dir {
            lines.push(format!("{prefix}{BRANCH}{}/", entry.name));
            if entry.path.is_symlink() {
                continue;
            }
            let children = match sorted_entries(&entry.path) {
                Ok(children) => children,
                Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                    tracing::debug!(dir = %entry.path.display(), "permission denied, subtree omitted");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            add_entries(root, &children, &format!("{prefix}{GUIDE}"), filter, lines)?;
        } else if entry.path.is_file() && filter.is_important_file(relative) {
            lines.push(format!("{prefix}{BRANCH}{}", entry.name));
        }
    }
    Ok(())
}
