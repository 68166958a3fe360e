use crate::core::language::language_for_path;
use crate::core::parser::parse_source;
use crate::domain::model::TodoComment;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[".git", "node_modules", "vendor"];

/// Directories to prune: the defaults plus `extra`, all resolved against `root`.
pub fn exclude_paths(root: &Path, extra: &[String]) -> Vec<PathBuf> {
    DEFAULT_EXCLUDE_DIRS
        .iter()
        .map(|dir| root.join(dir))
        .chain(extra.iter().map(|dir| root.join(dir)))
        .collect()
}

fn is_excluded(entry: &DirEntry, exclude_dirs: &[PathBuf]) -> bool {
    entry.file_type().is_dir()
        && exclude_dirs
            .iter()
            .any(|excluded| entry.path().starts_with(excluded))
}

/// Path of `path` relative to `root`, joined with `/` so it can be handed to the
/// contents API as-is.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walks `root` and collects TODO blocks from every supported file, in
/// file-name order.
pub fn scan_directory(root: &Path, exclude_dirs: &[PathBuf]) -> Result<Vec<TodoComment>> {
    let mut all_comments = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, exclude_dirs));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(language) = language_for_path(entry.path()) else {
            continue;
        };

        let bytes = std::fs::read(entry.path())?;
        let content = String::from_utf8_lossy(&bytes);
        let file_path = relative_path(root, entry.path());
        let comments = parse_source(&content, &file_path, language);

        if !comments.is_empty() {
            tracing::debug!("Found {} TODO comments in {}", comments.len(), file_path);
        }
        all_comments.extend(comments);
    }

    Ok(all_comments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_collects_relative_paths_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "src/b.rs", "// TODO: From b\n");
        write(root, "src/a.py", "# TODO: From a\n");
        write(root, "README.txt", "// TODO: not scanned\n");

        let comments = scan_directory(root, &exclude_paths(root, &[])).unwrap();

        let found: Vec<(&str, &str)> = comments
            .iter()
            .map(|c| (c.file_path.as_str(), c.title.as_str()))
            .collect();
        assert_eq!(found, vec![("src/a.py", "From a"), ("src/b.rs", "From b")]);
    }

    #[test]
    fn test_scan_skips_excluded_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "node_modules/dep/index.js", "// TODO: dependency\n");
        write(root, "vendor/lib.go", "// TODO: vendored\n");
        write(root, "target/debug/gen.rs", "// TODO: generated\n");
        write(root, "main.go", "// TODO: keep me\n");

        let excludes = exclude_paths(root, &["target".to_string()]);
        let comments = scan_directory(root, &excludes).unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].file_path, "main.go");
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        assert!(scan_directory(&missing, &[]).is_err());
    }
}
