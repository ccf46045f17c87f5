//! Markdown renderer: one combined document for the whole project.
//!
//! The mainpage (or a generated project summary) opens the file, then every
//! module, every class and finally the markdown documents with their
//! headings pushed below the project title.

use crate::keyword::{self, Keyword};
use crate::markdown;
use crate::model::*;
use crate::render::{Project, Renderer};

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &Document, project: &Project<'_>) -> String {
        let mut out = String::new();
        let mut level = 0;

        if let Some(ref main) = doc.mainpage {
            out.push_str(&format!("# {}\n\n", main.title));
            if let Some(ref subtitle) = main.subtitle {
                out.push_str(&format!("{}\n\n", subtitle));
            }
            if let Some(version) = doc.style(main).version {
                out.push_str(&format!("version {}\n\n", version));
            }
            if let Some(ref text) = main.text {
                push_text(&mut out, text);
                out.push('\n');
            }
            level = 1;
        } else if doc.modules.len() + doc.classes.len() + doc.documents.len() != 1 {
            let stats = doc.stats(project.warnings);
            out.push_str(&format!("# Project {}\n\n", project.name));
            out.push_str(&format!("{} Modules  \n", stats.modules));
            out.push_str(&format!("{} Classes  \n", stats.classes));
            out.push_str(&format!("{} Markdown Documents  \n", stats.documents));
            out.push_str(&format!("{} Examples\n\n", stats.examples));
            level = 1;
        }

        for module in &doc.modules {
            render_module(&mut out, module, "", level);
        }
        for class in &doc.classes {
            render_module(&mut out, class, "Class ", level);
        }

        for (i, md) in doc.documents.iter().enumerate() {
            if let Some(ref text) = md.section.text {
                push_shifted(&mut out, text, level);
            }
            if i + 1 < doc.documents.len() && !out.ends_with("\n\n") {
                out.push('\n');
            }
        }

        out
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn hashes(level: usize) -> String {
    "#".repeat(level.clamp(1, 6))
}

fn render_module(out: &mut String, module: &Module, prefix: &str, level: usize) {
    let section = &module.section;
    out.push_str(&format!("{} {}{}\n\n", hashes(level + 1), prefix, section.title));
    if let Some(ref subtitle) = section.subtitle {
        out.push_str(&format!("{}\n\n", subtitle));
    }
    if let Some(ref text) = section.text {
        push_text(out, text);
        out.push('\n');
    }

    for func in &module.functions {
        out.push_str(&format!("{} {}\n\n", hashes(level + 2), func.name));
        if let Some(ref brief) = func.brief {
            out.push_str(&format!("{}\n\n", brief));
        }
        out.push_str(&format!("{} Prototype\n\n", hashes(level + 3)));
        out.push_str(&format!(
            "```{}\n{}\n```\n\n",
            func.lang.as_deref().unwrap_or(""),
            func.prototype
        ));
        if let Some(ref notes) = func.notes {
            out.push_str(&format!("{} Notes\n\n", hashes(level + 3)));
            push_text(out, notes);
            out.push('\n');
        }
    }
}

/// Section prose with `@example` lines turned into bold captions.
fn push_text(out: &mut String, text: &str) {
    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0;
    while i < lines.len() {
        if let Some(end) = markdown::skip_code(&lines, i) {
            let end = end.max(i + 1);
            for line in &lines[i..end] {
                out.push_str(line);
                out.push('\n');
            }
            i = end;
            continue;
        }
        match keyword::recognize(lines[i]) {
            Some((Keyword::Example, title)) => {
                let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
                out.push_str(&format!("**Example: {}**\n", title));
            }
            _ => {
                out.push_str(lines[i]);
                out.push('\n');
            }
        }
        i += 1;
    }
}

/// A markdown document with every heading moved `shift` levels down.
fn push_shifted(out: &mut String, text: &str, shift: usize) {
    if shift == 0 {
        out.push_str(text);
        if !text.ends_with('\n') {
            out.push('\n');
        }
        return;
    }
    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0;
    while i < lines.len() {
        if let Some(end) = markdown::skip_code(&lines, i) {
            let end = end.max(i + 1);
            for line in &lines[i..end] {
                out.push_str(line);
                out.push('\n');
            }
            i = end;
            continue;
        }
        match markdown::heading(lines[i]) {
            Some((level, heading)) => {
                out.push_str(&format!("{} {}\n", hashes(level + shift), heading));
            }
            None => {
                out.push_str(lines[i]);
                out.push('\n');
            }
        }
        i += 1;
    }
}
