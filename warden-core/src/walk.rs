//! File collection for scans.
//!
//! Pre-commit hooks hand us explicit file lists; direct CLI use may pass
//! directories, which are expanded with gitignore awareness.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Extensions that are never worth scanning line-by-line.
const SKIP_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "svg", "pdf", "zip", "tar", "gz", "woff", "woff2", "ttf",
    "eot", "class", "jar", "so", "dylib", "dll", "exe", "bin", "wasm",
];

/// Check whether a path has a binary-ish extension we skip.
pub fn is_skipped_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            SKIP_EXTENSIONS.iter().any(|s| *s == lower)
        })
        .unwrap_or(false)
}

/// Expand a mixed list of files and directories into scannable files.
///
/// Explicit files pass through (minus binary extensions); directories are
/// walked respecting `.gitignore`. Paths that do not exist are silently
/// dropped — the scanners report per-file read errors themselves.
pub fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if !is_skipped_extension(path) {
                files.push(path.clone());
            }
        } else if path.is_dir() {
            for entry in WalkBuilder::new(path).hidden(false).build().flatten() {
                let p = entry.path();
                if p.is_file() && !is_skipped_extension(p) && !in_git_dir(p) {
                    files.push(p.to_path_buf());
                }
            }
        } else {
            tracing::debug!("skipping nonexistent path {}", path.display());
        }
    }

    files
}

fn in_git_dir(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str().to_string_lossy() == ".git")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_extensions() {
        assert!(is_skipped_extension(Path::new("logo.PNG")));
        assert!(is_skipped_extension(Path::new("dist/app.tar")));
        assert!(!is_skipped_extension(Path::new("main.rs")));
        assert!(!is_skipped_extension(Path::new("Makefile")));
    }

    #[test]
    fn test_collect_explicit_files() {
        let tmp = tempfile::tempdir().unwrap();
        let code = tmp.path().join("app.py");
        let image = tmp.path().join("icon.png");
        std::fs::write(&code, "print('hi')\n").unwrap();
        std::fs::write(&image, [0u8; 4]).unwrap();

        let files = collect_files(&[code.clone(), image]);
        assert_eq!(files, vec![code]);
    }

    #[test]
    fn test_collect_walks_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("src");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("lib.rs"), "pub fn x() {}\n").unwrap();
        std::fs::write(tmp.path().join("photo.jpg"), [0u8; 4]).unwrap();

        let files = collect_files(&[tmp.path().to_path_buf()]);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("lib.rs"));
    }

    #[test]
    fn test_missing_paths_dropped() {
        let files = collect_files(&[PathBuf::from("/no/such/file.py")]);
        assert!(files.is_empty());
    }
}
