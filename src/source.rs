//! An input file held in memory, with byte-offset to line/column resolution.

use std::path::{Path, PathBuf};

/// Code-fence language tags by file extension.
const LANGUAGES: &[(&str, &str)] = &[
    ("c", "c"),
    ("h", "c"),
    ("c++", "cpp"),
    ("cc", "cpp"),
    ("cpp", "cpp"),
    ("cxx", "cpp"),
    ("hpp", "cpp"),
    ("cs", "csharp"),
    ("go", "go"),
    ("java", "java"),
    ("js", "javascript"),
    ("py", "python"),
    ("rs", "rust"),
    ("swift", "swift"),
    ("ts", "typescript"),
];

#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        SourceFile {
            path: path.into(),
            text,
            line_starts,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based (line, column) of a byte offset. Offsets past the end clamp to
    /// the last position; columns count characters, not bytes.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let start = self.line_starts[idx];
        let col = self
            .text
            .get(start..offset)
            .map_or(offset - start, |s| s.chars().count());
        (idx + 1, col + 1)
    }

    /// Text of a 1-based line without its line terminator.
    pub fn line_text(&self, line: usize) -> &str {
        let Some(&start) = line.checked_sub(1).and_then(|i| self.line_starts.get(i)) else {
            return "";
        };
        let end = self.line_starts.get(line).map_or(self.text.len(), |&e| e);
        self.text[start..end].trim_end_matches(['\n', '\r'])
    }

    /// Byte offset where the line containing `offset` begins.
    pub fn line_start(&self, offset: usize) -> usize {
        let (line, _) = self.locate(offset);
        self.line_starts[line - 1]
    }

    /// Language tag for fenced prototype blocks, derived from the extension.
    pub fn lang(&self) -> Option<&'static str> {
        let ext = self.path.extension()?.to_str()?.to_ascii_lowercase();
        LANGUAGES
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, lang)| *lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_lines_and_columns() {
        let src = SourceFile::new("a.c", "one\ntwo\n  three");
        assert_eq!(src.locate(0), (1, 1));
        assert_eq!(src.locate(4), (2, 1));
        assert_eq!(src.locate(10), (3, 3));
        assert_eq!(src.locate(999), (3, 8));
    }

    #[test]
    fn line_text_strips_terminators() {
        let src = SourceFile::new("a.c", "one\r\ntwo\n");
        assert_eq!(src.line_text(1), "one");
        assert_eq!(src.line_text(2), "two");
        assert_eq!(src.line_text(3), "");
        assert_eq!(src.line_text(0), "");
    }

    #[test]
    fn language_from_extension() {
        assert_eq!(SourceFile::new("x/lib.rs", "").lang(), Some("rust"));
        assert_eq!(SourceFile::new("x/app.PY", "").lang(), Some("python"));
        assert_eq!(SourceFile::new("README.md", "").lang(), None);
    }
}
