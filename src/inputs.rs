//! Input enumeration: files, folders and glob patterns.

use crate::parser::FileKind;
use std::fs;
use std::path::{Path, PathBuf};

/// Source file extensions parsed for comment headers by default.
pub const DEFAULT_EXTS: &str = ".c.c++.cc.cpp.cxx.cs.go.java.js.py.rs.swift.ts";

const MARKDOWN_EXTS: &[&str] = &["md", "mdown", "markdown"];
const IMAGE_EXTS: &[&str] = &["gif", "jpeg", "jpg", "png"];

/// Folder depth searched for input images.
const IMAGE_DEPTH: usize = 3;

/// Decides how a file is parsed from its extension.
#[derive(Debug, Clone)]
pub struct Classifier {
    source_exts: Vec<String>,
}

impl Classifier {
    /// `exts` is a run of dot-prefixed extensions, e.g. `.c.h.rs`.
    pub fn new(exts: &str) -> Self {
        Classifier {
            source_exts: exts
                .split('.')
                .filter(|e| !e.is_empty())
                .map(str::to_ascii_lowercase)
                .collect(),
        }
    }

    pub fn classify(&self, path: &Path) -> Option<FileKind> {
        let ext = extension(path)?;
        if self.source_exts.contains(&ext) {
            Some(FileKind::Source)
        } else if MARKDOWN_EXTS.contains(&ext.as_str()) {
            Some(FileKind::Markdown)
        } else {
            None
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(DEFAULT_EXTS)
    }
}

fn extension(path: &Path) -> Option<String> {
    Some(path.extension()?.to_str()?.to_ascii_lowercase())
}

pub fn is_image(path: &Path) -> bool {
    extension(path).is_some_and(|ext| IMAGE_EXTS.contains(&ext.as_str()))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.') && n != "." && n != "..")
}

/// Every file below `dir` in sorted order, descending at most `depth` levels.
fn walk(dir: &Path, depth: Option<usize>, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| !is_hidden(p))
        .collect();
    paths.sort();
    for path in paths {
        if path.is_dir() {
            match depth {
                Some(0) => {}
                Some(n) => walk(&path, Some(n - 1), out),
                None => walk(&path, None, out),
            }
        } else if path.is_file() {
            out.push(path);
        }
    }
}

/// Files named by one input: the file itself, everything below a folder,
/// or every glob match. `None` when nothing exists there.
pub fn expand(input: &str) -> Option<Vec<PathBuf>> {
    expand_to_depth(input, None)
}

fn expand_to_depth(input: &str, depth: Option<usize>) -> Option<Vec<PathBuf>> {
    let path = Path::new(input);
    if path.is_file() {
        return Some(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    if path.is_dir() {
        walk(path, depth, &mut files);
        return Some(files);
    }

    let matches: Vec<PathBuf> = glob::glob(input).ok()?.filter_map(|r| r.ok()).collect();
    if matches.is_empty() {
        return None;
    }
    for m in matches {
        if m.is_dir() {
            walk(&m, depth, &mut files);
        } else if m.is_file() {
            files.push(m);
        }
    }
    Some(files)
}

/// Image files among one input, for the pre-pass before parsing.
pub fn images(input: &str) -> Vec<PathBuf> {
    expand_to_depth(input, Some(IMAGE_DEPTH))
        .unwrap_or_default()
        .into_iter()
        .filter(|p| is_image(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn classify_by_extension() {
        let c = Classifier::default();
        assert_eq!(c.classify(Path::new("a/b.c")), Some(FileKind::Source));
        assert_eq!(c.classify(Path::new("lib.RS")), Some(FileKind::Source));
        assert_eq!(c.classify(Path::new("x.c++")), Some(FileKind::Source));
        assert_eq!(c.classify(Path::new("README.md")), Some(FileKind::Markdown));
        assert_eq!(c.classify(Path::new("notes.mdown")), Some(FileKind::Markdown));
        assert_eq!(c.classify(Path::new("Makefile")), None);
        assert_eq!(c.classify(Path::new("pic.png")), None);

        let c = Classifier::new(".h");
        assert_eq!(c.classify(Path::new("a.h")), Some(FileKind::Source));
        assert_eq!(c.classify(Path::new("a.c")), None);
    }

    #[test]
    fn folders_recurse_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.c");
        touch(dir.path(), "a/z.c");
        touch(dir.path(), "a.c");
        touch(dir.path(), ".git/config");

        let files = expand(dir.path().to_str().unwrap()).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(rel, vec!["a/z.c", "a.c", "b.c"]);
    }

    #[test]
    fn globs_and_missing_inputs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "one.py");
        touch(dir.path(), "two.py");
        touch(dir.path(), "three.c");

        let pattern = format!("{}/*.py", dir.path().display());
        assert_eq!(expand(&pattern).unwrap().len(), 2);
        let missing = format!("{}/nope.c", dir.path().display());
        assert!(expand(&missing).is_none());
        let no_match = format!("{}/*.go", dir.path().display());
        assert!(expand(&no_match).is_none());
    }

    #[test]
    fn images_limited_by_depth() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "logo.png");
        touch(dir.path(), "a/b/c/deep.jpg");
        touch(dir.path(), "a/b/c/d/too_deep.gif");
        touch(dir.path(), "a/notes.md");

        let found = images(dir.path().to_str().unwrap());
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["deep.jpg", "logo.png"]);
    }
}
