//! Markdown document parser.
//!
//! A markdown file becomes a [`MarkdownDoc`] kept verbatim, unless its
//! first line opens a section, in which case the whole file is parsed as
//! one comment header.

use super::{FileContext, Parser};
use crate::header::Header;
use crate::keyword::{self, Keyword, KeywordClass};
use crate::markdown;
use crate::model::{insert_sorted, Heading, MarkdownDoc, Section};

impl Parser {
    pub(crate) fn parse_markdown(&mut self, cx: &mut FileContext<'_>) {
        let source = cx.source;
        let text = source.text();
        let hdr = Header::from_text(text);
        let lines = hdr.lines();

        if matches!(lines.first().and_then(|l| keyword::recognize(l)), Some((kw, _)) if kw.is_section())
        {
            tracing::debug!(path = %source.path().display(), "markdown as header");
            self.parse_header(cx, &hdr);
            return;
        }

        let title = source
            .path()
            .file_name()
            .map_or_else(|| source.path().display().to_string(), |n| n.to_string_lossy().into_owned());
        tracing::debug!(path = %source.path().display(), %title, "markdown document");
        self.dup_check(cx, &title, None);

        let mut section = Section::new(title);
        section.text = Some(text.to_string());
        let mut outline = Vec::new();

        let mut i = 0;
        while i < lines.len() {
            if let Some(end) = markdown::skip_code(&lines, i) {
                i = end.max(i + 1);
                continue;
            }
            match keyword::recognize(lines[i]) {
                Some((Keyword::Example, arg)) => {
                    if let Some(end) = self.parse_example(cx, &hdr, &lines, i, arg, &mut section) {
                        i = end;
                        continue;
                    }
                }
                Some((kw, arg)) if kw.class() == KeywordClass::Style => {
                    self.parse_style(cx, &hdr, i, kw, arg, &mut section.style);
                }
                Some(_) => {}
                None => {
                    if let Some((level, heading)) = markdown::heading(lines[i]) {
                        if section.subtitle.is_none() {
                            section.subtitle = Some(heading.to_string());
                        }
                        if level >= 2 {
                            outline.push(Heading {
                                level,
                                text: heading.to_string(),
                            });
                        }
                    }
                }
            }
            i += 1;
        }

        let all: Vec<(usize, &str)> = lines.iter().copied().enumerate().collect();
        self.scan_images(cx, &hdr, &all);

        let sort = self.opts.sort;
        insert_sorted(
            &mut self.doc.documents,
            MarkdownDoc {
                section,
                path: source.path().to_path_buf(),
                outline,
            },
            sort,
            |d| d.section.title.as_str(),
        );
    }
}
