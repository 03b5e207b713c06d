use std::path::{Path, PathBuf};

use crate::error::Result;

/// A discovered corpus file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path relative to the folder root.
    pub relative_path: PathBuf,
    /// Fully resolved absolute path.
    pub absolute_path: PathBuf,
}

/// Recursively walk a directory and discover files.
///
/// Skips hidden files/directories (names starting with `.`). When
/// `extensions` is `Some`, only files whose extension appears in the list
/// are returned; `None` returns every regular file. Results are sorted
/// lexicographically by relative path so downstream concatenation is
/// deterministic.
pub fn discover_files(
    root: &Path,
    extensions: Option<&[&str]>,
) -> Result<Vec<DiscoveredFile>> {
    let canonical_root = root.canonicalize()?;
    let mut results = Vec::new();
    walk_dir(&canonical_root, &canonical_root, extensions, &mut results)?;
    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(results)
}

fn walk_dir(
    root: &Path,
    current: &Path,
    extensions: Option<&[&str]>,
    results: &mut Vec<DiscoveredFile>,
) -> Result<()> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        // Skip hidden files and directories.
        if name.starts_with('.') {
            continue;
        }

        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk_dir(root, &entry.path(), extensions, results)?;
        } else if file_type.is_file() && matches(&entry.path(), extensions) {
            let path = entry.path();
            let absolute_path = path.canonicalize()?;
            let relative_path =
                path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            results.push(DiscoveredFile {
                relative_path,
                absolute_path,
            });
        }
    }

    Ok(())
}

fn matches(path: &Path, extensions: Option<&[&str]>) -> bool {
    let Some(wanted) = extensions else {
        return true;
    };
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| wanted.contains(&ext))
}
