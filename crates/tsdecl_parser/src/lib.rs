//! tsdecl_parser: Recursive descent parser for TypeScript.
//!
//! Parses the scanner's token stream into an arena-allocated AST. The parser
//! is error tolerant: every input yields a complete tree, with zero-width
//! missing nodes standing in for absent constructs and each problem recorded
//! as a diagnostic on the returned [`tsdecl_ast::SourceFile`].

mod context;
mod expressions;
mod jsdoc;
mod jsx;
mod lists;
mod options;
mod parser;
pub mod precedence;
mod statements;
mod types;
pub mod utilities;

pub use context::{ParsingContext, ParsingContexts};
pub use options::{ParseError, ParseOptions};
pub use parser::{parse_source_file, Parser};
