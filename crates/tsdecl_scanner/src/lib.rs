//! tsdecl_scanner: Lexer for TypeScript and JavaScript source text.
//!
//! The scanner produces tokens on demand for the parser, which drives the
//! context-sensitive rescans (`>` merging, regular expressions, template
//! continuations, JSX text). Also provides character classification and
//! comment-range helpers used for JSDoc collection.

pub mod char_codes;
pub mod comments;
mod scanner;
mod token;
mod unicode;

pub use comments::{get_leading_comment_ranges, get_trailing_comment_ranges, CommentRange};
pub use scanner::{digits_to_decimal, js_number_to_string, ErrorCallback, Scanner, ScannerState};
pub use token::{tokenize, TokenInfo};
