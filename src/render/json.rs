//! JSON renderer: structured output for tooling integration.
//!
//! Serializes the Document model directly, with every style already
//! resolved against the mainpage and the defaults.

use crate::model::*;
use crate::render::{Project, Renderer};
use crate::slug::slug;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document, project: &Project<'_>) -> String {
        let mainpage = match doc.mainpage {
            Some(ref main) => object(&section_fields(doc, main, 1), 1),
            None => "null".to_string(),
        };
        let modules = doc.modules.iter().map(|m| render_module(doc, m, 2)).collect();
        let classes = doc.classes.iter().map(|m| render_module(doc, m, 2)).collect();
        let documents = doc.documents.iter().map(|d| render_markdown(doc, d, 2)).collect();

        let mut out = object(
            &[
                ("project", string(project.name)),
                ("mainpage", mainpage),
                ("modules", array(modules, 1)),
                ("classes", array(classes, 1)),
                ("documents", array(documents, 1)),
                ("images", render_images(&doc.images)),
                ("stats", render_stats(&doc.stats(project.warnings))),
            ],
            0,
        );
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn section_fields<'a>(doc: &Document, section: &Section, indent: usize) -> Vec<(&'a str, String)> {
    let style = doc.style(section);
    let examples = section
        .examples
        .iter()
        .map(|e| {
            object(
                &[("title", string(&e.title)), ("slug", string(&slug(&e.title)))],
                indent + 2,
            )
        })
        .collect();
    vec![
        ("title", string(&section.title)),
        ("slug", string(&slug(&section.title))),
        ("subtitle", opt_string(section.subtitle.as_deref())),
        ("text", opt_string(section.text.as_deref())),
        (
            "style",
            object(
                &[
                    ("bar_color", string(style.bar_color)),
                    ("title_color", string(style.title_color)),
                    ("heading_color", string(style.heading_color)),
                    ("font_body", opt_string(style.font_body)),
                    ("font_headings", opt_string(style.font_headings)),
                    ("logo", opt_string(style.logo)),
                    ("version", opt_string(style.version)),
                ],
                indent + 1,
            ),
        ),
        ("examples", array(examples, indent + 1)),
    ]
}

fn render_module(doc: &Document, module: &Module, indent: usize) -> String {
    let functions = module
        .functions
        .iter()
        .map(|f| {
            object(
                &[
                    ("name", string(&f.name)),
                    ("slug", string(&slug(&f.name))),
                    ("brief", opt_string(f.brief.as_deref())),
                    ("prototype", string(&f.prototype)),
                    ("notes", opt_string(f.notes.as_deref())),
                    ("lang", opt_string(f.lang.as_deref())),
                ],
                indent + 2,
            )
        })
        .collect();
    let mut fields = section_fields(doc, &module.section, indent);
    fields.push(("functions", array(functions, indent + 1)));
    object(&fields, indent)
}

fn render_markdown(doc: &Document, md: &MarkdownDoc, indent: usize) -> String {
    let outline = md
        .outline
        .iter()
        .map(|h| {
            object(
                &[("level", h.level.to_string()), ("text", string(&h.text))],
                indent + 2,
            )
        })
        .collect();
    let mut fields = section_fields(doc, &md.section, indent);
    fields.push(("path", string(&md.path.display().to_string())));
    fields.push(("outline", array(outline, indent + 1)));
    object(&fields, indent)
}

fn render_images(images: &Images) -> String {
    let refs = images
        .refs
        .iter()
        .map(|r| string(&r.link))
        .collect();
    let files = images
        .files
        .iter()
        .map(|f| {
            object(
                &[
                    ("path", string(&f.path.display().to_string())),
                    ("referenced", f.referenced.to_string()),
                ],
                3,
            )
        })
        .collect();
    object(&[("refs", array(refs, 2)), ("files", array(files, 2))], 1)
}

fn render_stats(stats: &Stats) -> String {
    let fields: Vec<(&str, String)> = [
        ("modules", stats.modules),
        ("functions", stats.functions),
        ("classes", stats.classes),
        ("methods", stats.methods),
        ("examples", stats.examples),
        ("documents", stats.documents),
        ("images", stats.images),
        ("files", stats.files),
        ("comments", stats.comments),
        ("warnings", stats.warnings),
    ]
    .into_iter()
    .map(|(name, n)| (name, n.to_string()))
    .collect();
    object(&fields, 1)
}

fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}

/// `fields` hold already-rendered values; `indent` is the level of the braces.
fn object(fields: &[(&str, String)], indent: usize) -> String {
    if fields.is_empty() {
        return "{}".to_string();
    }
    let inner = pad(indent + 1);
    let body: Vec<String> = fields
        .iter()
        .map(|(name, value)| format!("{}\"{}\": {}", inner, name, value))
        .collect();
    format!("{{\n{}\n{}}}", body.join(",\n"), pad(indent))
}

fn array(items: Vec<String>, indent: usize) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    let inner = pad(indent + 1);
    let body: Vec<String> = items
        .iter()
        .map(|item| format!("{}{}", inner, item))
        .collect();
    format!("[\n{}\n{}]", body.join(",\n"), pad(indent))
}

fn string(s: &str) -> String {
    format!("\"{}\"", json_escape(s))
}

fn opt_string(s: Option<&str>) -> String {
    s.map_or_else(|| "null".to_string(), string)
}

fn json_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::parse_all;

    fn render(files: &[(&str, &str)]) -> String {
        let p = parse_all(files);
        JsonRenderer.render(
            &p.doc,
            &Project {
                name: "demo",
                warnings: p.diag.len(),
            },
        )
    }

    #[test]
    fn escapes_control_characters() {
        assert_eq!(json_escape("a\"b\\c\nd\te\u{1}"), "a\\\"b\\\\c\\nd\\te\\u0001");
    }

    #[test]
    fn empty_collections() {
        assert_eq!(object(&[], 0), "{}");
        assert_eq!(array(Vec::new(), 0), "[]");
    }

    #[test]
    fn modules_functions_and_slugs() {
        let out = render(&[(
            "geo.c",
            "/*!\n@defgroup Geo Geometry helpers\n@color w3-red\n*/\n\n/*!\nAdd two numbers.\n*/\nint add_two(int a, int b);\n",
        )]);
        assert!(out.starts_with("{\n  \"project\": \"demo\",\n  \"mainpage\": null,\n"));
        assert!(out.contains("\"title\": \"Geo\""));
        assert!(out.contains("\"subtitle\": \"Geometry helpers\""));
        assert!(out.contains("\"bar_color\": \"w3-red\""));
        assert!(out.contains("\"heading_color\": \"w3-text-red\""));
        assert!(out.contains("\"title_color\": \"w3-black\""));
        assert!(out.contains("\"name\": \"add_two\""));
        assert!(out.contains("\"slug\": \"add-two\""));
        assert!(out.contains("\"prototype\": \"int add_two(int a, int b)\""));
        assert!(out.contains("\"lang\": \"c\""));
        assert!(out.contains("\"classes\": [],"));
        assert!(out.contains("\"functions\": 1,"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn documents_carry_outline_and_path() {
        let out = render(&[("guide.md", "# Guide\n\n## Install\n")]);
        assert!(out.contains("\"title\": \"guide.md\""));
        assert!(out.contains("\"path\": \"guide.md\""));
        assert!(out.contains("\"level\": 2"));
        assert!(out.contains("\"text\": \"Install\""));
        assert!(out.contains("\"text\": \"# Guide\\n\\n## Install\\n\""));
    }
}
