//! Function parser and prototype discovery.

use super::{FileContext, Parser};
use crate::diag::WarningKind;
use crate::header::{Header, HeaderStyle};
use crate::keyword::{self, Keyword};
use crate::markdown;
use crate::model::{insert_sorted, Function, Section};
use crate::source::SourceFile;
use std::ops::Range;

/// Words that may precede a `(` without naming a function.
const NOT_NAMES: &[&str] = &[
    "async", "catch", "def", "elif", "fn", "for", "func", "function", "if", "match", "return",
    "sizeof", "switch", "while",
];

/// How far past the comment a multi-line prototype may extend.
const MAX_PROTOTYPE_LINES: usize = 16;

/// A callable signature found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype<'a> {
    pub name: &'a str,
    /// The signature through the closing `)` and any trailing return type.
    pub text: &'a str,
}

/// Find the first function-like signature at the start of `text`.
///
/// Looks at the first statement only (up to a `;`, `{`, `}` or blank line),
/// and takes the identifier before the first `(` that is not a keyword,
/// skipping generic parameters such as `<T: Clone>`.
pub fn prototype(text: &str) -> Option<Prototype<'_>> {
    let mut end = 0;
    for (n, line) in text.split_inclusive('\n').enumerate() {
        if n >= MAX_PROTOTYPE_LINES || markdown::is_blank(line) {
            break;
        }
        end += line.len();
    }
    let region = &text[..end];

    let mut from = 0;
    while let Some(rel) = region[from..].find('(') {
        let open = from + rel;
        if region[..open].contains([';', '{', '}']) {
            return None;
        }
        if let Some(name) = name_before(region, open).filter(|n| !NOT_NAMES.contains(n)) {
            let close = matching_paren(region, open)?;
            let tail = &region[close + 1..];
            let stop = tail.find(['{', ';', '\n']).unwrap_or(tail.len());
            let sig = region[..close + 1 + stop].trim_end();
            let sig = sig.strip_suffix(':').unwrap_or(sig).trim_end();
            return Some(Prototype { name, text: sig });
        }
        from = open + 1;
    }
    None
}

/// Identifier immediately before byte `open`, skipping `<...>` generics.
fn name_before(text: &str, open: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = text[..open].trim_end().len();
    if end > 0 && bytes[end - 1] == b'>' {
        let mut depth = 0usize;
        let mut i = end;
        loop {
            if i == 0 {
                return None;
            }
            i -= 1;
            match bytes[i] {
                b'>' => depth += 1,
                b'<' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        end = text[..i].trim_end().len();
    }

    let start = text[..end]
        .char_indices()
        .rev()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(0, |(i, c)| i + c.len_utf8());
    let ident = &text[start..end];
    keyword::cname(ident).filter(|name| name.len() == ident.len())
}

/// Byte index of the `)` matching the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Source text where the documented function's prototype should start:
/// the line before a doc string, or the first non-blank text after a
/// block comment.
fn prototype_candidate<'s>(source: &'s SourceFile, hdr: &Header) -> &'s str {
    let text = source.text();
    let Some(raw) = hdr.raw() else {
        return "";
    };
    match hdr.style {
        HeaderStyle::DocString => {
            let line_start = source.line_start(raw.start);
            text[..line_start]
                .lines()
                .rev()
                .find(|l| !markdown::is_blank(l))
                .map_or("", str::trim_start)
        }
        HeaderStyle::Block => text[raw.end.min(text.len())..].trim_start(),
    }
}

impl Parser {
    /// Build a function from header lines `span` and attach it to the
    /// current module. `explicit` is the `@fn` prototype, if any.
    pub(crate) fn parse_function(
        &mut self,
        cx: &mut FileContext<'_>,
        hdr: &Header,
        span: Range<usize>,
        explicit: Option<&str>,
    ) {
        let lines = hdr.lines();
        tracing::debug!(path = %cx.source.path().display(), ?explicit, "function");

        // grouping keywords apply before anything is attached
        let mut brief = None;
        for i in span.clone() {
            match keyword::recognize(lines[i]) {
                Some((kw @ (Keyword::Ingroup | Keyword::Inclass), _)) => {
                    self.parse_ingroup(cx, hdr, i, kw);
                }
                Some(_) => {}
                None if brief.is_none() && !markdown::is_blank(lines[i]) => brief = Some(i),
                None => {}
            }
        }

        let offset = hdr.offset(span.start, 0);
        if cx.current.is_none() {
            self.warn_at(cx, WarningKind::NoModule, None, offset);
            return;
        }

        let candidate = match explicit {
            Some(text) => text,
            None => prototype_candidate(cx.source, hdr),
        };
        let Some(proto) = prototype(candidate) else {
            let kind = match hdr.style {
                HeaderStyle::DocString => WarningKind::BadDocString,
                HeaderStyle::Block => WarningKind::NoFunction,
            };
            self.warn_at(cx, kind, None, offset);
            return;
        };

        // signature, blank line, then @param/@return lines with hard breaks
        let body = brief.map_or(span.start, |b| b + 1)..span.end;
        let mut block = format!("{}\n\n", proto.text);
        for line in &lines[body.clone()] {
            if matches!(keyword::recognize(line), Some((kw, _)) if kw.is_prototype()) {
                block.push_str(line);
                if !line.ends_with("  ") {
                    block.push_str("  ");
                }
                block.push('\n');
            }
        }

        let function = Function {
            name: proto.name.to_string(),
            brief: brief.map(|b| lines[b].trim_end().to_string()),
            prototype: block.trim_end_matches('\n').to_string(),
            notes: None,
            lang: cx.source.lang().map(str::to_string),
        };

        let mut scratch = Section::default();
        let notes = self.parse_text(cx, hdr, body, &mut scratch);
        let sort = self.opts.sort;
        if let Some(module) = self.current_module_mut(cx) {
            module.section.style.merge(scratch.style);
            module.section.examples.extend(scratch.examples);
            insert_sorted(
                &mut module.functions,
                Function { notes, ..function },
                sort,
                |f| f.name.as_str(),
            );
        }
    }
}
