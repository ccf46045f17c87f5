//! flydoc: generate documentation from keyword annotations in source
//! comments and markdown files.
//!
//! `flydoc -o docs/myproj src/ README.md` parses every `/*! ... */` header
//! (or `"""! ... """` doc string in Python) plus the markdown files among the
//! inputs, and writes one combined document into the output folder.

mod diag;
mod header;
mod inputs;
mod keyword;
mod markdown;
mod model;
mod parser;
mod render;
mod slug;
mod source;

use anyhow::{bail, Context, Result};
use clap::Parser;
use diag::{Diagnostics, Warning, WarningKind};
use model::{Document, Stats};
use parser::ParseOptions;
use render::{Project, Renderer};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "flydoc",
    version,
    about = "Generate documentation from keyword annotations in source comments and markdown files"
)]
struct Cli {
    /// Input files, folders (recursed) or glob patterns
    inputs: Vec<String>,

    /// Output folder; the document is named after its last component
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Parse and report warnings only, write nothing
    #[arg(short = 'n', long)]
    no_build: bool,

    /// Keep modules, classes and functions in the order found
    #[arg(long)]
    no_sort: bool,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Source file extensions to parse for comment headers
    #[arg(long, default_value = inputs::DEFAULT_EXTS)]
    exts: String,

    /// List files processed and created, then print statistics
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Debug tracing on stderr (otherwise RUST_LOG applies)
    #[arg(long)]
    debug: bool,

    /// Print the in-page reference for a heading and exit
    #[arg(long, value_name = "TEXT")]
    slug: Option<String>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    run(&cli)
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    if let Some(ref text) = cli.slug {
        println!("{}", slug::local_ref(text));
        return Ok(ExitCode::SUCCESS);
    }
    if cli.inputs.is_empty() {
        bail!("no input files or folders given");
    }
    let output = match (cli.output.as_deref(), cli.no_build) {
        (None, false) => bail!("no output folder: use -o <DIR>, or -n to only check"),
        (_, true) => None,
        (Some(out), false) => Some(out),
    };
    let renderer = render::create_renderer(&cli.format)?;
    let classifier = inputs::Classifier::new(&cli.exts);

    let mut flydoc = parser::Parser::new(ParseOptions { sort: !cli.no_sort });
    for input in &cli.inputs {
        for image in inputs::images(input) {
            flydoc.add_image_file(image);
        }
    }

    let mut reported = 0;
    for input in &cli.inputs {
        let Some(files) = inputs::expand(input) else {
            flydoc.diag.warn(WarningKind::InvalidInput, Some(input.clone()));
            reported = report(&flydoc.diag, reported);
            continue;
        };
        for path in files {
            let Some(kind) = classifier.classify(&path) else {
                continue;
            };
            if cli.verbose {
                println!("parsing {}", path.display());
            }
            flydoc.parse_file(&path, kind);
            reported = report(&flydoc.diag, reported);
        }
    }

    if flydoc.doc.num_objects() == 0 {
        flydoc.diag.warn(WarningKind::NoObjects, None);
    } else if let Some(out) = output {
        build(&mut flydoc.diag, &flydoc.doc, out, renderer.as_ref(), cli.verbose)
            .with_context(|| format!("failed to build {}", out.display()))?;
    }
    report(&flydoc.diag, reported);

    if cli.verbose {
        print!("{}", format_stats(&flydoc.doc.stats(flydoc.diag.len())));
    }
    Ok(if flydoc.diag.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Write the rendered document and copy every referenced image into `out`.
/// Filesystem failures become warnings; only rendering errors abort.
fn build(
    diag: &mut Diagnostics,
    doc: &Document,
    out: &Path,
    renderer: &dyn Renderer,
    verbose: bool,
) -> Result<()> {
    if let Err(e) = fs::create_dir_all(out) {
        tracing::debug!(error = %e, "create folder");
        diag.warn(WarningKind::CreateFolder, Some(out.display().to_string()));
        return Ok(());
    }

    let name = project_name(out)?;
    let path = out.join(format!("{}.{}", name, renderer.file_extension()));
    let project = Project {
        name: &name,
        warnings: diag.len(),
    };
    match fs::write(&path, renderer.render(doc, &project)) {
        Ok(()) if verbose => println!("created {}", path.display()),
        Ok(()) => {}
        Err(e) => {
            tracing::debug!(error = %e, "create file");
            diag.warn(WarningKind::CreateFile, Some(path.display().to_string()));
        }
    }

    for image in doc.images.files.iter().filter(|f| f.referenced) {
        let Some(file_name) = image.path.file_name() else {
            continue;
        };
        let dest = out.join(file_name);
        match fs::copy(&image.path, &dest) {
            Ok(_) if verbose => println!("copied {}", dest.display()),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "copy image");
                diag.warn(WarningKind::CreateFile, Some(dest.display().to_string()));
            }
        }
    }
    Ok(())
}

/// Last component of the output folder, e.g. `docs/myproj` → `myproj`.
fn project_name(out: &Path) -> Result<String> {
    if let Some(name) = out.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }
    let full = out
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", out.display()))?;
    Ok(full
        .file_name()
        .map_or_else(|| "project".to_string(), |n| n.to_string_lossy().into_owned()))
}

/// Print warnings recorded since `from` to stderr. Returns the new mark.
fn report(diag: &Diagnostics, from: usize) -> usize {
    for warning in &diag.warnings()[from..] {
        eprintln!("{}", format_warning(warning));
    }
    diag.len()
}

fn format_warning(warning: &Warning) -> String {
    match warning.location {
        Some(ref loc) => format!(
            "{}:{}:{}: {}\n{}\n{}^",
            loc.path.display(),
            loc.line,
            loc.col,
            warning,
            loc.text,
            " ".repeat(loc.col.saturating_sub(1))
        ),
        None => format!("Warning: {}", warning),
    }
}

fn format_stats(stats: &Stats) -> String {
    format!(
        "{} modules, {} functions, {} classes, {} methods, {} examples\n\
         {} markdown documents, {} images\n\
         {} files, {} comment blocks, {} warnings\n",
        stats.modules,
        stats.functions,
        stats.classes,
        stats.methods,
        stats.examples,
        stats.documents,
        stats.images,
        stats.files,
        stats.comments,
        stats.warnings
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Location;

    #[test]
    fn located_warning_has_caret() {
        let warning = Warning {
            kind: WarningKind::Duplicate,
            detail: Some("Foo".to_string()),
            location: Some(Location {
                path: PathBuf::from("src/a.c"),
                line: 2,
                col: 11,
                text: "@defgroup Foo".to_string(),
            }),
        };
        assert_eq!(
            format_warning(&warning),
            "src/a.c:2:11: W002 - duplicate class, module, markdown document or mainpage: Foo\n@defgroup Foo\n          ^"
        );
    }

    #[test]
    fn global_warning() {
        let warning = Warning {
            kind: WarningKind::NoObjects,
            detail: None,
            location: None,
        };
        assert_eq!(
            format_warning(&warning),
            "Warning: W011 - no objects or documents defined. Nothing to do"
        );
    }

    #[test]
    fn project_name_from_output_folder() {
        assert_eq!(project_name(Path::new("docs/myproj")).unwrap(), "myproj");
        assert_eq!(project_name(Path::new("docs/myproj/")).unwrap(), "myproj");
        let cwd = std::env::current_dir().unwrap();
        let expected = cwd.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(project_name(Path::new(".")).unwrap(), expected);
    }

    #[test]
    fn stats_lines() {
        let stats = Stats {
            modules: 2,
            functions: 5,
            ..Default::default()
        };
        let text = format_stats(&stats);
        assert!(text.starts_with("2 modules, 5 functions, 0 classes"));
        assert!(text.ends_with("0 warnings\n"));
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
