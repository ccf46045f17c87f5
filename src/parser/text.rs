//! Text bodies: examples, style keywords and images.
//!
//! A body is processed in two passes. The scan pass records `@example`
//! titles and applies style keywords to the owning section. The
//! materialize pass copies the prose, dropping interpreted keyword lines.
//! Code blocks are inert in both passes.

use super::{FileContext, Parser};
use crate::diag::WarningKind;
use crate::header::Header;
use crate::keyword::{self, Keyword, KeywordClass};
use crate::markdown;
use crate::model::{Example, ImageRef, Section, Style};
use std::ops::Range;

impl Parser {
    /// Process header lines `span` as the body of `section`. Returns the
    /// prose, or `None` when nothing but blank lines remains.
    pub(crate) fn parse_text(
        &mut self,
        cx: &FileContext<'_>,
        hdr: &Header,
        span: Range<usize>,
        section: &mut Section,
    ) -> Option<String> {
        let all = hdr.lines();
        let lines = &all[..span.end.min(all.len())];
        tracing::trace!(start = span.start, end = span.end, "parse text");

        // scan
        let mut i = span.start;
        while i < lines.len() {
            if let Some(end) = markdown::skip_code(lines, i) {
                i = end.max(i + 1);
                continue;
            }
            match keyword::recognize(lines[i]) {
                Some((Keyword::Example, arg)) => {
                    if let Some(end) = self.parse_example(cx, hdr, lines, i, arg, section) {
                        i = end;
                        continue;
                    }
                }
                Some((kw, arg)) if kw.class() == KeywordClass::Style => {
                    self.parse_style(cx, hdr, i, kw, arg, &mut section.style);
                }
                _ => {}
            }
            i += 1;
        }

        // materialize
        let mut kept: Vec<(usize, &str)> = Vec::new();
        let mut i = span.start;
        while i < lines.len() {
            if let Some(end) = markdown::skip_code(lines, i) {
                let end = end.max(i + 1);
                kept.extend((i..end).map(|n| (n, lines[n])));
                i = end;
                continue;
            }
            match keyword::recognize(lines[i]) {
                Some((kw, _)) if !kw.kept_in_text() => {}
                _ => kept.push((i, lines[i])),
            }
            i += 1;
        }

        let first = kept.iter().position(|(_, l)| !markdown::is_blank(l))?;
        let last = kept.iter().rposition(|(_, l)| !markdown::is_blank(l))?;
        let kept = &kept[first..=last];

        self.scan_images(cx, hdr, kept);

        let text = kept
            .iter()
            .map(|(_, l)| *l)
            .collect::<Vec<_>>()
            .join("\n");
        Some(text)
    }

    /// Record an `@example` on `lines[at]`. Returns the index of the line
    /// after the example's code block, or `None` when the title is missing.
    pub(crate) fn parse_example(
        &mut self,
        cx: &FileContext<'_>,
        hdr: &Header,
        lines: &[&str],
        at: usize,
        arg: &str,
        section: &mut Section,
    ) -> Option<usize> {
        tracing::debug!(title = arg, "example");
        let title = arg.split_whitespace().collect::<Vec<_>>().join(" ");
        if title.is_empty() {
            let offset = hdr.offset(at, lines[at].len());
            self.warn_at(cx, WarningKind::Syntax, None, offset);
            return None;
        }

        let mut start = at + 1;
        while start < lines.len() && markdown::is_blank(lines[start]) {
            start += 1;
        }
        let end = markdown::code_block_end(lines, start);
        if end == start {
            let offset = match lines.get(start) {
                Some(_) => hdr.offset(start, 0),
                None => hdr.offset(at, lines[at].len()),
            };
            self.warn_at(cx, WarningKind::EmptyExample, None, offset);
        }

        section.examples.push(Example {
            title: format!("Example: {}", title),
        });
        Some(end.max(at + 1))
    }

    /// Apply `@color`, `@font`, `@logo` or `@version` on `lines[line]`.
    pub(crate) fn parse_style(
        &mut self,
        cx: &FileContext<'_>,
        hdr: &Header,
        line: usize,
        kw: Keyword,
        arg: &str,
        style: &mut Style,
    ) {
        tracing::debug!(?kw, arg, "style");
        let mut words = arg.split_whitespace().map(str::to_string);
        match kw {
            Keyword::Color => {
                let Some(bar) = words.next() else {
                    return;
                };
                if let Some(title) = words.next() {
                    style.title_color = Some(title);
                }
                style.heading_color = Some(words.next().unwrap_or_else(|| heading_color(&bar)));
                style.bar_color = Some(bar);
            }
            Keyword::Font => {
                let Some(body) = words.next() else {
                    return;
                };
                style.font_body = Some(body);
                if let Some(headings) = words.next() {
                    style.font_headings = Some(headings);
                }
            }
            Keyword::Logo => match markdown::image_at_start(arg) {
                Some(img) => {
                    let offset = hdr.offset_of(line, arg);
                    self.add_image_ref(cx, img.link, offset);
                    style.logo = Some(arg[..img.range.end].to_string());
                }
                None => {
                    let offset = hdr.offset_of(line, arg);
                    self.warn_at(cx, WarningKind::Syntax, None, offset);
                }
            },
            Keyword::Version => {
                let version = arg.trim_end();
                if !version.is_empty() {
                    style.version = Some(version.to_string());
                }
            }
            _ => {}
        }
    }

    /// Find images in materialized prose, skipping code and keyword lines.
    pub(crate) fn scan_images(&mut self, cx: &FileContext<'_>, hdr: &Header, kept: &[(usize, &str)]) {
        let lines: Vec<&str> = kept.iter().map(|(_, l)| *l).collect();
        let mut i = 0;
        while i < lines.len() {
            if let Some(end) = markdown::skip_code(&lines, i) {
                i = end.max(i + 1);
                continue;
            }
            if keyword::recognize(lines[i]).is_none() {
                let (line, text) = kept[i];
                for img in markdown::images(text) {
                    let offset = hdr.offset(line, img.range.start);
                    self.add_image_ref(cx, img.link, offset);
                }
            }
            i += 1;
        }
    }

    fn add_image_ref(&mut self, cx: &FileContext<'_>, link: &str, offset: usize) {
        tracing::debug!(link, "image");
        self.doc.images.refs.push(ImageRef {
            link: link.to_string(),
        });
        if !self.doc.images.reference(link) {
            self.warn_at(cx, WarningKind::NoImage, Some(link.to_string()), offset);
        }
    }
}

/// `w3-orange` becomes `w3-text-orange`.
fn heading_color(bar: &str) -> String {
    format!("w3-text-{}", bar.strip_prefix("w3-").unwrap_or(bar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::parse_all;

    #[test]
    fn example_without_code_still_recorded() {
        let p = parse_all(&[(
            "a.c",
            "/*!\n@defgroup Foo foo\n\n@example   Just   words\n\nno code here\n*/\n",
        )]);
        let module = &p.doc.modules[0];
        assert_eq!(module.section.examples.len(), 1);
        assert_eq!(module.section.examples[0].title, "Example: Just words");
        assert_eq!(p.diag.count(WarningKind::EmptyExample), 1);
    }

    #[test]
    fn example_keeps_code_in_prose() {
        let p = parse_all(&[(
            "a.c",
            "/*!\n@defgroup Foo foo\n\n@example Hello\n\n```c\n@fn not_a_section(void)\n```\n*/\n",
        )]);
        let section = &p.doc.modules[0].section;
        assert!(p.diag.is_empty());
        assert_eq!(section.examples.len(), 1);
        assert_eq!(
            section.text.as_deref(),
            Some("@example Hello\n\n```c\n@fn not_a_section(void)\n```")
        );
    }

    #[test]
    fn example_code_is_not_scanned_for_images() {
        let p = parse_all(&[(
            "a.c",
            "/*!\n@defgroup Foo foo\n\n@example Show\n    draw(\"![x](nope.png)\");\n*/\n",
        )]);
        assert_eq!(p.doc.modules[0].section.examples.len(), 1);
        assert!(p.diag.is_empty());
        assert!(p.doc.images.refs.is_empty());
    }

    #[test]
    fn blank_example_title_is_syntax_error() {
        let p = parse_all(&[("a.c", "/*!\n@defgroup Foo foo\n\n@example\n    code\n*/\n")]);
        assert!(p.doc.modules[0].section.examples.is_empty());
        assert_eq!(p.diag.count(WarningKind::Syntax), 1);
    }

    #[test]
    fn style_keywords_apply_and_are_dropped() {
        let p = parse_all(&[(
            "a.c",
            "/*!\n@defgroup Foo foo\n\n@color w3-red w3-white\n@font Arial Georgia\n@version 1.2.3  \nbody\n@color w3-teal\n*/\n",
        )]);
        let section = &p.doc.modules[0].section;
        assert_eq!(section.text.as_deref(), Some("body"));
        assert_eq!(section.style.bar_color.as_deref(), Some("w3-teal"));
        assert_eq!(section.style.title_color.as_deref(), Some("w3-white"));
        assert_eq!(section.style.heading_color.as_deref(), Some("w3-text-teal"));
        assert_eq!(section.style.font_body.as_deref(), Some("Arial"));
        assert_eq!(section.style.font_headings.as_deref(), Some("Georgia"));
        assert_eq!(section.style.version.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn unknown_keywords_stay_in_prose() {
        let p = parse_all(&[(
            "a.c",
            "/*!\n@defgroup Foo foo\n\n@author somebody\n@param x dropped\n*/\n",
        )]);
        assert_eq!(
            p.doc.modules[0].section.text.as_deref(),
            Some("@author somebody")
        );
    }

    #[test]
    fn empty_body_is_none() {
        let p = parse_all(&[("a.c", "/*!\n@defgroup Foo foo\n\n@version 2\n\n*/\n")]);
        assert_eq!(p.doc.modules[0].section.text, None);
    }

    #[test]
    fn images_are_checked_against_inputs() {
        let mut p = crate::parser::Parser::default();
        p.add_image_file(std::path::PathBuf::from("pics/lake.png"));
        p.parse_source(
            std::path::Path::new("a.c"),
            "/*!\n@defgroup Foo foo\n\n![lake](lake.png) and ![gone](gone.png)\n\n    ![code](skip.png)\n*/\n",
            crate::parser::FileKind::Source,
        );
        assert_eq!(p.doc.images.refs.len(), 2);
        assert!(p.doc.images.files[0].referenced);
        assert_eq!(p.diag.count(WarningKind::NoImage), 1);
        let w = &p.diag.warnings()[0];
        assert_eq!(w.detail.as_deref(), Some("gone.png"));
        let loc = w.location.as_ref().unwrap();
        assert_eq!((loc.line, loc.col), (4, 23));
    }

    #[test]
    fn logo_must_be_an_image() {
        let p = parse_all(&[(
            "a.c",
            "/*!\n@mainpage Proj\n@logo ![logo](https://x.io/logo.png \"w3-round\")\n*/\n/*!\n@defgroup Foo foo\n@logo not an image\n*/\n",
        )]);
        let main = p.doc.mainpage.as_ref().unwrap();
        assert_eq!(
            main.style.logo.as_deref(),
            Some("![logo](https://x.io/logo.png \"w3-round\")")
        );
        assert_eq!(p.doc.images.refs.len(), 1);
        assert_eq!(p.diag.count(WarningKind::Syntax), 1);
    }

    #[test]
    fn derived_heading_color() {
        assert_eq!(heading_color("w3-orange"), "w3-text-orange");
    }
}
