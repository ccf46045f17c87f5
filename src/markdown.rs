//! Markdown primitives shared by the comment and document parsers.
//!
//! Only the handful of constructs the parsers care about are recognized:
//! code blocks (fenced and indented), ATX headings and inline images.

use crate::keyword::{self, Keyword};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static RE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})(.*)$").unwrap());

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$").unwrap());

// ![alt](link "title") -- title optional, link may be wrapped in <>
static RE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(\s*<?([^)\s>]+)>?(?:\s+"([^"]*)")?\s*\)"#).unwrap()
});

/// An inline image reference found in a line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink<'a> {
    /// Byte range of the whole `![alt](link)` construct within the line.
    pub range: Range<usize>,
    pub alt: &'a str,
    pub link: &'a str,
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Fence marker of an opening or closing code fence: (fence char, run length, info string).
fn fence(line: &str) -> Option<(char, usize, &str)> {
    let caps = RE_FENCE.captures(line)?;
    let marker = caps.get(1)?.as_str();
    let info = caps.get(2).map_or("", |m| m.as_str());
    let ch = marker.chars().next()?;
    // backtick fences may not carry backticks in the info string
    if ch == '`' && info.contains('`') {
        return None;
    }
    Some((ch, marker.len(), info))
}

pub fn is_fence(line: &str) -> bool {
    fence(line).is_some()
}

fn is_indented(line: &str) -> bool {
    (line.starts_with("    ") || line.starts_with('\t')) && !is_blank(line)
}

/// Index of the line after the code block starting at `start`, or `start`
/// itself when no code block starts there. An unterminated fence runs to the
/// end of `lines`.
pub fn code_block_end(lines: &[&str], start: usize) -> usize {
    let Some(first) = lines.get(start) else {
        return start;
    };

    if let Some((ch, len, _)) = fence(first) {
        for (i, line) in lines.iter().enumerate().skip(start + 1) {
            if let Some((close_ch, close_len, info)) = fence(line) {
                if close_ch == ch && close_len >= len && is_blank(info) {
                    return i + 1;
                }
            }
        }
        return lines.len();
    }

    if is_indented(first) {
        let mut end = start + 1;
        for (i, line) in lines.iter().enumerate().skip(start + 1) {
            if is_indented(line) {
                end = i + 1;
            } else if !is_blank(line) {
                break;
            }
        }
        return end;
    }

    start
}

/// Like [`code_block_end`], but an indented block only counts when it does not
/// continue a paragraph. An `@example` line is not a paragraph: the block
/// right below it is code. Returns `None` when line `i` does not open a block.
pub fn skip_code(lines: &[&str], i: usize) -> Option<usize> {
    let line = lines.get(i)?;
    if is_fence(line) {
        return Some(code_block_end(lines, i));
    }
    let opens = match i.checked_sub(1).map(|prev| lines[prev]) {
        None => true,
        Some(prev) => {
            is_blank(prev) || matches!(keyword::recognize(prev), Some((Keyword::Example, _)))
        }
    };
    if is_indented(line) && opens {
        return Some(code_block_end(lines, i));
    }
    None
}

/// ATX heading level (1-6) and its text.
pub fn heading(line: &str) -> Option<(usize, &str)> {
    let caps = RE_HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2)?.as_str();
    if text.is_empty() {
        return None;
    }
    Some((level, text))
}

/// All inline images in a line, left to right.
pub fn images(line: &str) -> Vec<ImageLink<'_>> {
    RE_IMAGE
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(ImageLink {
                range: whole.range(),
                alt: caps.get(1).map_or("", |m| m.as_str()),
                link: caps.get(2)?.as_str(),
            })
        })
        .collect()
}

/// The image that `text` begins with, if any.
pub fn image_at_start(text: &str) -> Option<ImageLink<'_>> {
    images(text).into_iter().next().filter(|img| img.range.start == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_end() {
        let lines = ["```c", "int x;", "```", "after"];
        assert_eq!(code_block_end(&lines, 0), 3);
        assert_eq!(code_block_end(&lines, 3), 3);
    }

    #[test]
    fn fence_needs_matching_char() {
        let lines = ["~~~", "```", "~~~", "after"];
        assert_eq!(code_block_end(&lines, 0), 3);
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        let lines = ["```", "a", "b"];
        assert_eq!(code_block_end(&lines, 0), 3);
    }

    #[test]
    fn indented_block_excludes_trailing_blanks() {
        let lines = ["    a = 1", "", "    b = 2", "", "text"];
        assert_eq!(code_block_end(&lines, 0), 3);
    }

    #[test]
    fn indented_continuation_is_not_code() {
        let lines = ["some prose", "    still prose"];
        assert_eq!(skip_code(&lines, 1), None);
        let lines = ["", "    code"];
        assert_eq!(skip_code(&lines, 1), Some(2));
    }

    #[test]
    fn indented_block_right_below_example() {
        let lines = ["@example Show", "    draw();", "prose"];
        assert_eq!(skip_code(&lines, 1), Some(2));
        assert_eq!(code_block_end(&lines, 1), 2);
    }

    #[test]
    fn headings() {
        assert_eq!(heading("## Title"), Some((2, "Title")));
        assert_eq!(heading("### Closed ###"), Some((3, "Closed")));
        assert_eq!(heading("#hashtag"), None);
        assert_eq!(heading("####### seven"), None);
    }

    #[test]
    fn finds_images() {
        let found = images(r#"a ![one](one.png) b ![two](http://x.com/two.jpg "w3-round")"#);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].link, "one.png");
        assert_eq!(found[1].link, "http://x.com/two.jpg");
        assert_eq!(found[1].alt, "two");
    }

    #[test]
    fn image_must_lead() {
        assert!(image_at_start("![logo](logo.png)").is_some());
        assert!(image_at_start("see ![logo](logo.png)").is_none());
    }
}
