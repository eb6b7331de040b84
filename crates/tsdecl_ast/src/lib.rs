//! tsdecl_ast: Syntax tree definitions for the tsdecl parser.
//!
//! Defines `SyntaxKind` and the static token tables, node and token flags,
//! the arena-backed node model, the `SourceFile` parse result, and the
//! generic child walker with the utilities and declaration queries built on
//! top of it.

pub mod flags;
pub mod node;
pub mod query;
pub mod script;
pub mod source_file;
pub mod syntax_kind;
pub mod utilities;
pub mod visitor;

pub use flags::{ModifierFlags, NodeFlags, TokenFlags};
pub use node::*;
pub use script::{LanguageVariant, ScriptKind, ScriptTarget};
pub use source_file::SourceFile;
pub use syntax_kind::{keyword_from_text, token_to_string, SyntaxKind, KEYWORDS, PUNCTUATORS};
pub use visitor::for_each_child;
