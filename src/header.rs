//! Comment-header extraction.
//!
//! Finds flydoc comment headers in source text and strips the comment
//! syntax so keywords land at column 0:
//!
//! - block headers `/*! ... */` (C family, Rust, Go, Java, JS, TS, Swift, C#)
//! - doc-string headers `"""! ... """` (Python), whose function prototype
//!   comes before the comment instead of after it
//!
//! Every stripped line remembers where it came from, so positions inside
//! the header can be mapped back to the real file.

use crate::source::SourceFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    Block,
    DocString,
}

/// Byte span of the raw comment in its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSpan {
    /// Offset of the comment opener.
    pub start: usize,
    /// Offset of the first line after the comment closer.
    pub end: usize,
}

/// A comment header with the comment syntax stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub style: HeaderStyle,
    lines: Vec<String>,
    /// File offset where each stripped line begins.
    origins: Vec<usize>,
    /// `None` for a whole markdown file parsed as a header.
    raw: Option<RawSpan>,
}

impl Header {
    /// Treat a whole file as one header, e.g. a markdown file that starts
    /// with `@mainpage`.
    pub fn from_text(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut origins = Vec::new();
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
            origins.push(offset);
            offset += line.len();
        }
        Header {
            style: HeaderStyle::Block,
            lines,
            origins,
            raw: None,
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        self.lines.iter().map(String::as_str).collect()
    }

    pub fn raw(&self) -> Option<RawSpan> {
        self.raw
    }

    /// File offset of a byte column within a stripped line.
    pub fn offset(&self, line: usize, col: usize) -> usize {
        match (self.origins.get(line), self.lines.get(line)) {
            (Some(&origin), Some(text)) => origin + col.min(text.len()),
            _ => self.origins.last().copied().unwrap_or(0),
        }
    }

    /// File offset of a string slice borrowed from one of this header's lines.
    pub fn offset_of(&self, line: usize, part: &str) -> usize {
        let col = self.lines.get(line).map_or(0, |text| {
            let base = text.as_ptr() as usize;
            let ptr = part.as_ptr() as usize;
            if ptr >= base && ptr <= base + text.len() {
                ptr - base
            } else {
                0
            }
        });
        self.offset(line, col)
    }
}

/// All flydoc headers in a source file, in file order.
pub fn find_headers(source: &SourceFile) -> Vec<Header> {
    match source.lang() {
        Some("python") => scan(source.text(), "\"\"\"!", "\"\"\"", HeaderStyle::DocString),
        _ => scan(source.text(), "/*!", "*/", HeaderStyle::Block),
    }
}

fn scan(text: &str, open: &str, close: &str, style: HeaderStyle) -> Vec<Header> {
    let mut headers = Vec::new();
    let mut pos = 0;
    while let Some(found) = text[pos..].find(open) {
        let start = pos + found;
        let body = start + open.len();
        let Some(close_rel) = text[body..].find(close) else {
            break;
        };
        let body_end = body + close_rel;
        let after = body_end + close.len();
        let end = text[after..]
            .find('\n')
            .map_or(text.len(), |i| after + i + 1);

        headers.push(strip(text, body, body_end, style, RawSpan { start, end }));
        pos = after;
    }
    headers
}

/// Blank, or a decorative run such as `-----` on the opener/closer line.
fn is_decoration(s: &str) -> bool {
    s.trim().chars().all(|c| matches!(c, '-' | '*' | '='))
}

fn indent_of(s: &str) -> usize {
    s.len() - s.trim_start_matches([' ', '\t']).len()
}

fn strip(text: &str, body: usize, body_end: usize, style: HeaderStyle, raw: RawSpan) -> Header {
    // (file offset, line text) for each raw body line
    let mut pieces: Vec<(usize, &str)> = Vec::new();
    let mut offset = body;
    for piece in text[body..body_end].split('\n') {
        pieces.push((offset, piece.trim_end_matches('\r')));
        offset += piece.len() + 1;
    }

    if pieces.last().is_some_and(|(_, s)| is_decoration(s)) {
        pieces.pop();
    }
    if pieces.first().is_some_and(|(_, s)| is_decoration(s)) {
        pieces.remove(0);
    }

    // a " * " gutter on every non-blank line
    let gutter = pieces.iter().any(|(_, s)| !s.trim().is_empty())
        && pieces
            .iter()
            .filter(|(_, s)| !s.trim().is_empty())
            .all(|(_, s)| s.trim_start().starts_with('*'));
    if gutter {
        for (offset, s) in pieces.iter_mut() {
            let lead = indent_of(s);
            let rest = &s[lead..];
            let Some(rest) = rest.strip_prefix('*') else {
                continue;
            };
            let rest = rest.strip_prefix(' ').unwrap_or(rest);
            *offset += s.len() - rest.len();
            *s = rest;
        }
    }

    let indent = pieces
        .iter()
        .filter(|(_, s)| !s.trim().is_empty())
        .map(|(_, s)| indent_of(s))
        .min()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(pieces.len());
    let mut origins = Vec::with_capacity(pieces.len());
    for (offset, s) in pieces {
        let cut = indent.min(indent_of(s));
        lines.push(s[cut..].to_string());
        origins.push(offset + cut);
    }

    Header {
        style,
        lines,
        origins,
        raw: Some(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(path: &str, text: &str) -> Vec<Header> {
        find_headers(&SourceFile::new(path, text))
    }

    #[test]
    fn block_header_is_dedented() {
        let text = "/*!\n  @defgroup Foo  The foo\n\n  Body text\n*/\nint x;\n";
        let found = headers("foo.c", text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lines(), vec!["@defgroup Foo  The foo", "", "Body text"]);
        assert_eq!(found[0].style, HeaderStyle::Block);
        let raw = found[0].raw().unwrap();
        assert_eq!(raw.start, 0);
        assert_eq!(&text[raw.end..], "int x;\n");
    }

    #[test]
    fn decoration_lines_are_dropped() {
        let text = "/*!----------\n  Area of a circle\n  @param r radius\n-----------*/\ndouble area(double r);\n";
        let found = headers("m.c", text);
        assert_eq!(found[0].lines(), vec!["Area of a circle", "@param r radius"]);
    }

    #[test]
    fn star_gutter_is_removed() {
        let text = "/*!\n * @defgroup Foo\n *\n * text\n */\n";
        let found = headers("foo.js", text);
        assert_eq!(found[0].lines(), vec!["@defgroup Foo", "", "text"]);
    }

    #[test]
    fn origins_map_back_to_file() {
        let text = "int a;\n/*!\n    @defgroup Foo\n*/\n";
        let found = headers("foo.c", text);
        let src = SourceFile::new("foo.c", text);
        let off = found[0].offset(0, 1);
        assert_eq!(src.locate(off), (3, 6));
    }

    #[test]
    fn python_doc_strings() {
        let text = "def area(r):\n    \"\"\"!\n    Area of a circle\n    \"\"\"\n    return r\n";
        let found = headers("geo.py", text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].style, HeaderStyle::DocString);
        assert_eq!(found[0].lines(), vec!["Area of a circle"]);
    }

    #[test]
    fn multiple_headers_in_order() {
        let text = "/*! one */\n/*!\ntwo\n*/\n";
        let found = headers("x.c", text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].lines(), vec!["one "]);
        assert_eq!(found[1].lines(), vec!["two"]);
    }

    #[test]
    fn whole_text_header() {
        let h = Header::from_text("@mainpage Title\r\n\nbody");
        assert_eq!(h.lines(), vec!["@mainpage Title", "", "body"]);
        assert!(h.raw().is_none());
        assert_eq!(h.offset(2, 0), 18);
    }
}
