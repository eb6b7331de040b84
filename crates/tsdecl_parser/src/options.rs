//! Parse configuration and operational errors.

use thiserror::Error;
use tsdecl_ast::{ScriptKind, ScriptTarget};
use tsdecl_core::cancellation::CancellationToken;

/// Settings for one call to [`crate::parse_source_file`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Selects the Unicode identifier tables the scanner consults.
    pub language_version: ScriptTarget,
    /// `Unknown` is inferred from the file name.
    pub script_kind: ScriptKind,
    /// Run the parent fixup pass before returning.
    pub set_parent_nodes: bool,
    /// Collect `/** ... */` comments onto the nodes they precede.
    pub attach_js_doc: bool,
    pub cancellation_token: Option<CancellationToken>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            language_version: ScriptTarget::ESNext,
            script_kind: ScriptKind::Unknown,
            set_parent_nodes: true,
            attach_js_doc: true,
            cancellation_token: None,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language_version(mut self, version: ScriptTarget) -> Self {
        self.language_version = version;
        self
    }

    pub fn with_script_kind(mut self, kind: ScriptKind) -> Self {
        self.script_kind = kind;
        self
    }

    pub fn with_set_parent_nodes(mut self, set_parent_nodes: bool) -> Self {
        self.set_parent_nodes = set_parent_nodes;
        self
    }

    pub fn with_js_doc(mut self, attach_js_doc: bool) -> Self {
        self.attach_js_doc = attach_js_doc;
        self
    }

    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

/// Reasons a parse produced no tree. Malformed source is never one of them:
/// syntax problems are reported as diagnostics on the returned file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("parse of '{0}' was cancelled")]
    Cancelled(String),
    #[error("'{file_name}' is {len} bytes, which exceeds the 4 GiB position limit")]
    SourceTooLarge { file_name: String, len: usize },
}
