//! Section parser: splits a comment header into sections and builds
//! modules, classes, the mainpage and grouping references.

use super::{FileContext, ModuleRef, Parser};
use crate::diag::WarningKind;
use crate::header::Header;
use crate::keyword::{self, Keyword, Segment};
use crate::markdown;
use crate::model::{Module, ModuleKind, Section};
use std::ops::Range;

const MARKDOWN_EXTS: &[&str] = &["md", "mdown", "markdown"];

/// Title as used for output names: markdown extension removed, lowercased.
fn namespace_key(title: &str) -> String {
    strip_markdown_ext(title).to_lowercase()
}

pub(crate) fn strip_markdown_ext(title: &str) -> &str {
    match title.rsplit_once('.') {
        Some((stem, ext)) if MARKDOWN_EXTS.contains(&ext.to_ascii_lowercase().as_str()) => stem,
        _ => title,
    }
}

/// First word of `arg` when the whole word is an identifier.
fn word_name(arg: &str) -> Option<&str> {
    let word = keyword::arg_first(arg);
    keyword::cname(word).filter(|name| name.len() == word.len())
}

impl Parser {
    /// Parse one stripped comment header.
    pub(crate) fn parse_header(&mut self, cx: &mut FileContext<'_>, hdr: &Header) {
        self.doc.comments += 1;
        let lines = hdr.lines();
        let (line, col) = cx.source.locate(hdr.offset(0, 0));
        tracing::debug!(path = %cx.source.path().display(), line, col, "header");

        let mut found_section = false;
        let mut found_text = false;
        for segment in keyword::segments(&lines) {
            match segment {
                Segment::Grouping { keyword, line } => {
                    self.parse_ingroup(cx, hdr, line, keyword);
                }
                Segment::Section { keyword, lines: span } => {
                    found_section = true;
                    match keyword {
                        Keyword::Defgroup => self.parse_module(cx, hdr, span, ModuleKind::Module),
                        Keyword::Class => self.parse_module(cx, hdr, span, ModuleKind::Class),
                        Keyword::Mainpage => self.parse_mainpage(cx, hdr, span),
                        Keyword::Fn => {
                            // a markdown file has no surrounding source for functions
                            if hdr.raw().is_some() {
                                let prototype = keyword::arg_next(lines[span.start]);
                                self.parse_function(cx, hdr, span, Some(prototype));
                            }
                        }
                        _ => {}
                    }
                }
                Segment::Loose { blank, .. } => found_text |= !blank,
            }
        }

        // a comment with prose but no section documents the function after it
        if !found_section && found_text && hdr.raw().is_some() {
            self.parse_function(cx, hdr, 0..lines.len(), None);
        }
    }

    /// `@defgroup Name Subtitle` or `@class Name Subtitle`.
    fn parse_module(
        &mut self,
        cx: &mut FileContext<'_>,
        hdr: &Header,
        span: Range<usize>,
        kind: ModuleKind,
    ) {
        let lines = hdr.lines();
        let opening = lines[span.start];
        tracing::debug!(?kind, line = opening, "module");

        let arg = keyword::arg_next(opening);
        let Some(name) = word_name(arg) else {
            let offset = hdr.offset_of(span.start, arg);
            self.warn_at(cx, WarningKind::Syntax, None, offset);
            return;
        };
        let offset = hdr.offset_of(span.start, name);

        // a stub, or a declaration that never got content, may be filled in
        let declared = self.doc.find(kind, name).map(|m| {
            !m.stub && (m.section.subtitle.is_some() || m.section.text.is_some())
        });
        match declared {
            Some(true) => {
                self.warn_at(cx, WarningKind::Duplicate, Some(name.to_string()), offset);
                return;
            }
            Some(false) => {}
            None => {
                self.dup_check(cx, name, Some(offset));
                self.insert_module(kind, Module::stub(name));
            }
        }
        cx.current = Some(ModuleRef {
            kind,
            title: name.to_string(),
        });

        let subtitle = keyword::arg_next(arg).trim_end();
        let mut scratch = Section::default();
        let text = self.parse_text(cx, hdr, span.start + 1..span.end, &mut scratch);

        if let Some(module) = self.doc.find_mut(kind, name) {
            module.stub = false;
            module.section.subtitle = (!subtitle.is_empty()).then(|| subtitle.to_string());
            module.section.text = text;
            module.section.style.merge(scratch.style);
            module.section.examples.extend(scratch.examples);
        }
    }

    /// `@mainpage Title`, an optional one-line subtitle, then the body.
    fn parse_mainpage(&mut self, cx: &mut FileContext<'_>, hdr: &Header, span: Range<usize>) {
        let lines = hdr.lines();
        let opening = lines[span.start];
        tracing::debug!(line = opening, "mainpage");

        if self.doc.mainpage.is_some() {
            let offset = hdr.offset(span.start, 0);
            self.warn_at(cx, WarningKind::Duplicate, Some("mainpage".to_string()), offset);
            return;
        }

        let title = keyword::arg_next(opening).trim_end();
        if title.is_empty() {
            let offset = hdr.offset(span.start, opening.len());
            self.warn_at(cx, WarningKind::Syntax, None, offset);
            return;
        }
        let mut section = Section::new(title);

        // the first prose line is the subtitle when a blank line or the end
        // of the header follows it
        let first = (span.start + 1..span.end)
            .find(|&i| keyword::recognize(lines[i]).is_none() && !markdown::is_blank(lines[i]));
        let subtitle =
            first.filter(|&i| lines.get(i + 1).map_or(true, |next| markdown::is_blank(next)));

        let body = match subtitle {
            Some(k) => {
                for i in span.start + 1..k {
                    if let Some((kw, arg)) = keyword::recognize(lines[i]) {
                        self.parse_style(cx, hdr, i, kw, arg, &mut section.style);
                    }
                }
                section.subtitle = Some(lines[k].trim_end().to_string());
                k + 1..span.end
            }
            None => span.start + 1..span.end,
        };
        let mut scratch = Section::default();
        section.text = self.parse_text(cx, hdr, body, &mut scratch);
        section.style.merge(scratch.style);
        section.examples.extend(scratch.examples);

        self.doc.mainpage = Some(section);
    }

    /// `@ingroup Name` or `@inclass Name`: make Name the current module,
    /// creating a stub when it does not exist yet.
    pub(crate) fn parse_ingroup(
        &mut self,
        cx: &mut FileContext<'_>,
        hdr: &Header,
        line: usize,
        kw: Keyword,
    ) {
        let lines = hdr.lines();
        let arg = keyword::arg_next(lines[line]);
        tracing::debug!(?kw, arg, "grouping");

        let kind = match kw {
            Keyword::Inclass => ModuleKind::Class,
            _ => ModuleKind::Module,
        };
        let Some(name) = word_name(arg) else {
            let offset = hdr.offset_of(line, arg);
            self.warn_at(cx, WarningKind::Syntax, None, offset);
            return;
        };

        if self.doc.find(kind, name).is_none() {
            let offset = hdr.offset_of(line, name);
            self.dup_check(cx, name, Some(offset));
            self.insert_module(kind, Module::stub(name));
        }
        cx.current = Some(ModuleRef {
            kind,
            title: name.to_string(),
        });
    }

    /// Warn when `title` would produce the same output name as an existing
    /// module, class or document, or the mainpage's `index`. Advisory only.
    pub(crate) fn dup_check(&mut self, cx: &FileContext<'_>, title: &str, offset: Option<usize>) {
        let key = namespace_key(title);
        let pages = self.doc.modules.len() + self.doc.classes.len() + self.doc.documents.len();
        let clash = self
            .doc
            .modules
            .iter()
            .chain(self.doc.classes.iter())
            .map(|m| m.section.title.as_str())
            .chain(self.doc.documents.iter().map(|d| d.section.title.as_str()))
            .any(|existing| namespace_key(existing) == key)
            || (key == "index" && (self.doc.mainpage.is_some() || pages > 1));

        if !clash {
            return;
        }
        match offset {
            Some(offset) => self.warn_at(cx, WarningKind::Duplicate, Some(title.to_string()), offset),
            None => self.diag.warn(
                WarningKind::Duplicate,
                Some(strip_markdown_ext(title).to_string()),
            ),
        }
    }
}
