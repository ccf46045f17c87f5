//! Keyword recognition and section tokenizing.
//!
//! Keywords must start at column 0 of a stripped comment line and be
//! followed by whitespace or the end of the line. Any other `@word` at
//! column 0 is [`Keyword::Unknown`].

use crate::markdown;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Class,
    Color,
    Defgroup,
    Example,
    Fn,
    Font,
    Inclass,
    Ingroup,
    Logo,
    Mainpage,
    Param,
    Return,
    Returns,
    Version,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordClass {
    /// Starts a new bounded section: `@class @defgroup @fn @mainpage`
    Section,
    /// Switches the current module: `@ingroup @inclass`
    Grouping,
    /// `@color @font @logo @version`
    Style,
    /// `@example`
    Content,
    /// Kept for the function prototype block: `@param @return @returns`, unknown
    Prototype,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("@class", Keyword::Class),
    ("@color", Keyword::Color),
    ("@defgroup", Keyword::Defgroup),
    ("@example", Keyword::Example),
    ("@fn", Keyword::Fn),
    ("@font", Keyword::Font),
    ("@inclass", Keyword::Inclass),
    ("@ingroup", Keyword::Ingroup),
    ("@logo", Keyword::Logo),
    ("@mainpage", Keyword::Mainpage),
    ("@param", Keyword::Param),
    ("@return", Keyword::Return),
    ("@returns", Keyword::Returns),
    ("@version", Keyword::Version),
];

impl Keyword {
    pub fn class(self) -> KeywordClass {
        match self {
            Keyword::Class | Keyword::Defgroup | Keyword::Fn | Keyword::Mainpage => {
                KeywordClass::Section
            }
            Keyword::Inclass | Keyword::Ingroup => KeywordClass::Grouping,
            Keyword::Color | Keyword::Font | Keyword::Logo | Keyword::Version => {
                KeywordClass::Style
            }
            Keyword::Example => KeywordClass::Content,
            Keyword::Param | Keyword::Return | Keyword::Returns | Keyword::Unknown => {
                KeywordClass::Prototype
            }
        }
    }

    pub fn is_section(self) -> bool {
        self.class() == KeywordClass::Section
    }

    pub fn is_prototype(self) -> bool {
        self.class() == KeywordClass::Prototype
    }

    /// Lines that survive into rendered prose: `@example` and unknown keywords.
    pub fn kept_in_text(self) -> bool {
        matches!(self, Keyword::Example | Keyword::Unknown)
    }
}

/// Classify a line. Returns the keyword and the argument text following it.
pub fn recognize(line: &str) -> Option<(Keyword, &str)> {
    if !line.starts_with('@') {
        return None;
    }
    let keyword = KEYWORDS
        .iter()
        .find_map(|(token, keyword)| {
            let rest = line.strip_prefix(token)?;
            (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(*keyword)
        })
        .unwrap_or(Keyword::Unknown);
    Some((keyword, arg_next(line)))
}

/// First whitespace-delimited word of `s`.
pub fn arg_first(s: &str) -> &str {
    let s = s.trim_start();
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    &s[..end]
}

/// Everything after the first word of `s` and the whitespace following it.
pub fn arg_next(s: &str) -> &str {
    let s = s.trim_start();
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    s[end..].trim_start()
}

/// Leading identifier (`[A-Za-z_][A-Za-z0-9_]*`) of `s`.
pub fn cname(s: &str) -> Option<&str> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return None,
    }
    let end = chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(s.len(), |(i, _)| i);
    Some(&s[..end])
}

/// One unit of a comment header as seen by the section parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `@ingroup` or `@inclass` outside any section.
    Grouping { keyword: Keyword, line: usize },
    /// A section-opening keyword line and every line up to the next one.
    Section { keyword: Keyword, lines: Range<usize> },
    /// Any other line before the first section.
    Loose { line: usize, blank: bool },
}

/// Index of the next section-opening line at or after `from`, ignoring
/// keywords inside code blocks.
pub fn section_end(lines: &[&str], from: usize) -> usize {
    let mut i = from;
    while i < lines.len() {
        if let Some(end) = markdown::skip_code(lines, i) {
            i = end;
            continue;
        }
        if matches!(recognize(lines[i]), Some((keyword, _)) if keyword.is_section()) {
            return i;
        }
        i += 1;
    }
    lines.len()
}

/// Split header lines into grouping directives, sections and loose lines.
pub fn segments(lines: &[&str]) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if let Some(end) = markdown::skip_code(lines, i) {
            out.extend((i..end).map(|line| Segment::Loose {
                line,
                blank: markdown::is_blank(lines[line]),
            }));
            i = end;
            continue;
        }
        match recognize(lines[i]) {
            Some((keyword, _)) if keyword.is_section() => {
                let end = section_end(lines, i + 1);
                out.push(Segment::Section {
                    keyword,
                    lines: i..end,
                });
                i = end;
            }
            Some((keyword @ (Keyword::Ingroup | Keyword::Inclass), _)) => {
                out.push(Segment::Grouping { keyword, line: i });
                i += 1;
            }
            _ => {
                out.push(Segment::Loose {
                    line: i,
                    blank: markdown::is_blank(lines[i]),
                });
                i += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_keywords_with_argument() {
        assert_eq!(
            recognize("@defgroup Foo  The foo module"),
            Some((Keyword::Defgroup, "Foo  The foo module"))
        );
        assert_eq!(recognize("@fn int main(void)"), Some((Keyword::Fn, "int main(void)")));
        assert_eq!(recognize("@example"), Some((Keyword::Example, "")));
    }

    #[test]
    fn return_and_returns_are_distinct() {
        assert_eq!(recognize("@return 0").map(|r| r.0), Some(Keyword::Return));
        assert_eq!(recognize("@returns 0").map(|r| r.0), Some(Keyword::Returns));
    }

    #[test]
    fn prefix_is_not_a_keyword() {
        assert_eq!(recognize("@classes x").map(|r| r.0), Some(Keyword::Unknown));
        assert_eq!(recognize("@author me").map(|r| r.0), Some(Keyword::Unknown));
    }

    #[test]
    fn column_zero_only() {
        assert_eq!(recognize("  @defgroup Foo"), None);
        assert_eq!(recognize("plain text"), None);
    }

    #[test]
    fn keyword_classes() {
        assert_eq!(Keyword::Mainpage.class(), KeywordClass::Section);
        assert_eq!(Keyword::Inclass.class(), KeywordClass::Grouping);
        assert_eq!(Keyword::Logo.class(), KeywordClass::Style);
        assert_eq!(Keyword::Example.class(), KeywordClass::Content);
        assert!(Keyword::Unknown.is_prototype());
        assert!(Keyword::Unknown.kept_in_text());
        assert!(!Keyword::Param.kept_in_text());
    }

    #[test]
    fn cname_takes_leading_identifier() {
        assert_eq!(cname("snake_case more"), Some("snake_case"));
        assert_eq!(cname("Foo-bar"), Some("Foo"));
        assert_eq!(cname("9lives"), None);
        assert_eq!(cname(""), None);
    }

    #[test]
    fn args() {
        assert_eq!(arg_first("  Name rest of it"), "Name");
        assert_eq!(arg_next("Name   rest of it"), "rest of it");
        assert_eq!(arg_next("Name"), "");
    }

    #[test]
    fn segments_split_on_section_keywords() {
        let lines = [
            "@ingroup Foo",
            "loose",
            "@defgroup Bar text",
            "body",
            "@fn void f(void)",
            "brief",
        ];
        let segs = segments(&lines);
        assert_eq!(
            segs,
            vec![
                Segment::Grouping { keyword: Keyword::Ingroup, line: 0 },
                Segment::Loose { line: 1, blank: false },
                Segment::Section { keyword: Keyword::Defgroup, lines: 2..4 },
                Segment::Section { keyword: Keyword::Fn, lines: 4..6 },
            ]
        );
    }

    #[test]
    fn keywords_in_fenced_code_are_inert() {
        let lines = ["@defgroup Bar text", "```", "@fn not a section", "```", "tail"];
        let segs = segments(&lines);
        assert_eq!(
            segs,
            vec![Segment::Section { keyword: Keyword::Defgroup, lines: 0..5 }]
        );
    }
}
