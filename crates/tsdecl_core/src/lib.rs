//! tsdecl_core: Core utilities for the tsdecl declaration parser.
//!
//! Provides text positions and line maps, string interning, and the
//! cancellation token shared by the scanner and parser crates.

pub mod cancellation;
pub mod intern;
pub mod text;

pub use cancellation::CancellationToken;
pub use intern::{InternedString, StringInterner};
pub use text::{LineAndCharacter, LineMap, TextPos, TextRange, TextSpan};
