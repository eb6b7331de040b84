//! tsdecl: parse TypeScript files and report what the parser sees.
//!
//! Usage:
//!   tsdecl [options] <file>...
//!
//! Prints syntax diagnostics by default; `--format` selects the token
//! stream, the syntax tree, or interface signatures instead.

mod error;
mod logging;
mod output;

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{Parser as ClapParser, ValueEnum};
use miette::Result;
use rayon::prelude::*;
use tsdecl_ast::{ScriptKind, ScriptTarget, SourceFile};
use tsdecl_parser::{parse_source_file, ParseOptions};

use crate::error::{CliError, SyntaxReport};

/// Deeply nested input recurses deeply; parse on threads with room for it.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

#[derive(ClapParser, Debug)]
#[command(name = "tsdecl", version, about = "An error-tolerant TypeScript parser")]
struct Cli {
    /// Files to parse.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// What to print for each file.
    #[arg(long, value_enum, default_value_t = Format::Diagnostics)]
    format: Format,

    /// Language version for identifier rules (es5, es2015, ..., esnext).
    #[arg(long)]
    target: Option<String>,

    /// Parse every file as TSX.
    #[arg(long)]
    jsx: bool,

    /// Do not attach JSDoc comments.
    #[arg(long = "no-jsdoc")]
    no_jsdoc: bool,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Diagnostics,
    Tokens,
    Tree,
    Signatures,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let error_count = run(&cli)?;
    if error_count > 0 {
        eprintln!("\nFound {} error{}.", error_count, if error_count == 1 { "" } else { "s" });
        process::exit(2);
    }
    Ok(())
}

/// Parse and print every input file. Returns the number of syntax errors.
fn run(cli: &Cli) -> Result<usize, CliError> {
    if cli.files.is_empty() {
        return Err(CliError::NoInputFiles);
    }
    let options = parse_options(cli)?;
    let start = Instant::now();

    let pool = rayon::ThreadPoolBuilder::new()
        .stack_size(WORKER_STACK_SIZE)
        .build()?;
    let files: Vec<SourceFile> = pool.install(|| {
        cli.files
            .par_iter()
            .map(|path| parse_file(path, &options))
            .collect::<Result<Vec<_>, CliError>>()
    })?;
    tracing::info!(files = files.len(), elapsed_ms = start.elapsed().as_millis() as u64, "parsed");

    let error_count = files
        .iter()
        .flat_map(|file| &file.parse_diagnostics)
        .filter(|diagnostic| diagnostic.is_error())
        .count();

    if cli.json {
        print_json(cli.format, &files)?;
    } else {
        print_text(cli.format, &files);
    }
    Ok(error_count)
}

fn parse_options(cli: &Cli) -> Result<ParseOptions, CliError> {
    let mut options = ParseOptions::new().with_js_doc(!cli.no_jsdoc);
    if let Some(target) = &cli.target {
        let version = ScriptTarget::from_name(target).ok_or_else(|| CliError::UnknownTarget(target.clone()))?;
        options = options.with_language_version(version);
    }
    if cli.jsx {
        options = options.with_script_kind(ScriptKind::TSX);
    }
    Ok(options)
}

fn parse_file(path: &Path, options: &ParseOptions) -> Result<SourceFile, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path.to_string_lossy();
    tracing::debug!(file = %file_name, bytes = text.len(), "parsing");
    Ok(parse_source_file(&file_name, &text, options)?)
}

fn print_text(format: Format, files: &[SourceFile]) {
    for file in files {
        match format {
            Format::Diagnostics => {
                for diagnostic in &file.parse_diagnostics {
                    let report = SyntaxReport::new(diagnostic.clone(), &file.file_name, &file.text);
                    eprintln!("{:?}", miette::Report::new(report));
                }
            }
            Format::Tokens => print!("{}", output::render_tokens(&output::tokens(file))),
            Format::Tree => print!("{}", output::render_tree(&output::tree(file, file.root))),
            Format::Signatures => print!("{}", output::render_signatures(&output::signatures(file))),
        }
    }
}

fn print_json(format: Format, files: &[SourceFile]) -> Result<(), CliError> {
    let value = match format {
        Format::Diagnostics => {
            let records: Vec<_> = files.iter().flat_map(output::diagnostic_records).collect();
            serde_json::to_value(records)?
        }
        Format::Tokens => by_file(files, |file| serde_json::to_value(output::tokens(file)))?,
        Format::Tree => by_file(files, |file| serde_json::to_value(output::tree(file, file.root)))?,
        Format::Signatures => by_file(files, |file| serde_json::to_value(output::signatures(file)))?,
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// `{ "<file>": <value>, ... }` in input order.
fn by_file(
    files: &[SourceFile],
    render: impl Fn(&SourceFile) -> serde_json::Result<serde_json::Value>,
) -> serde_json::Result<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for file in files {
        map.insert(file.file_name.clone(), render(file)?);
    }
    Ok(serde_json::Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from(["tsdecl", "--format", "tree", "--jsx", "-vv", "a.ts"]).unwrap();
        assert_eq!(cli.format, Format::Tree);
        assert!(cli.jsx);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.files, vec![PathBuf::from("a.ts")]);
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let cli = Cli::try_parse_from(["tsdecl", "--target", "es1", "a.ts"]).unwrap();
        assert!(matches!(parse_options(&cli), Err(CliError::UnknownTarget(target)) if target == "es1"));
    }

    #[test]
    fn test_no_input_files() {
        let cli = Cli::try_parse_from(["tsdecl"]).unwrap();
        assert!(matches!(run(&cli), Err(CliError::NoInputFiles)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let cli = Cli::try_parse_from(["tsdecl", "does/not/exist.ts"]).unwrap();
        let error = run(&cli).unwrap_err();
        assert_eq!(error.to_string(), "failed to read 'does/not/exist.ts'");
    }
}
