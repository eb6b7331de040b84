//! CLI errors and the miette rendering of parse diagnostics.

use std::fmt;
use std::path::PathBuf;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, Severity, SourceCode};
use thiserror::Error;
use tsdecl_diagnostics::{Diagnostic, DiagnosticCategory};
use tsdecl_parser::ParseError;

/// Failures that stop the CLI before or instead of reporting diagnostics.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum CliError {
    #[error("no input files")]
    #[diagnostic(code(tsdecl::no_input), help("pass one or more .ts, .tsx, .d.ts, .js or .json files"))]
    NoInputFiles,

    #[error("failed to read '{}'", path.display())]
    #[diagnostic(code(tsdecl::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(tsdecl::parse))]
    Parse(#[from] ParseError),

    #[error("unknown target '{0}'")]
    #[diagnostic(code(tsdecl::target), help("expected one of es3, es5, es2015 through es2022, esnext"))]
    UnknownTarget(String),

    #[error("failed to serialize output")]
    #[diagnostic(code(tsdecl::json))]
    Json(#[from] serde_json::Error),

    #[error("failed to start worker threads")]
    #[diagnostic(code(tsdecl::threads))]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// One parse diagnostic with its file text, rendered by miette with a
/// labeled source snippet.
#[derive(Debug)]
pub struct SyntaxReport {
    diagnostic: Diagnostic,
    source: NamedSource<String>,
}

impl SyntaxReport {
    pub fn new(diagnostic: Diagnostic, file_name: &str, text: &str) -> Self {
        Self {
            diagnostic,
            source: NamedSource::new(file_name, text.to_string()),
        }
    }
}

impl fmt::Display for SyntaxReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic.message_text)
    }
}

impl std::error::Error for SyntaxReport {}

impl MietteDiagnostic for SyntaxReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("TS{}", self.diagnostic.code)))
    }

    fn severity(&self) -> Option<Severity> {
        Some(match self.diagnostic.category {
            DiagnosticCategory::Error => Severity::Error,
            DiagnosticCategory::Warning => Severity::Warning,
            DiagnosticCategory::Suggestion | DiagnosticCategory::Message => Severity::Advice,
        })
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.diagnostic.span?;
        let label = LabeledSpan::at(span.start as usize..(span.start + span.length) as usize, "here");
        Some(Box::new(std::iter::once(label)))
    }
}
