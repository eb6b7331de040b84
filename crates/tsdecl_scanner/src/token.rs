//! Token information produced by the scanner.

use serde::Serialize;
use tsdecl_ast::{LanguageVariant, ScriptTarget, SyntaxKind, TokenFlags};
use tsdecl_core::text::TextPos;

use crate::scanner::Scanner;

/// A scanned token, detached from the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub kind: SyntaxKind,
    /// Start of the token text, after trivia.
    pub pos: TextPos,
    /// End position (exclusive).
    pub end: TextPos,
    /// Cooked value for identifiers and literals, raw text otherwise.
    pub text: String,
    #[serde(skip)]
    pub flags: TokenFlags,
}

impl TokenInfo {
    pub fn new(kind: SyntaxKind, pos: TextPos, end: TextPos) -> Self {
        Self {
            kind,
            pos,
            end,
            text: String::new(),
            flags: TokenFlags::NONE,
        }
    }

    /// Snapshot of the scanner's current token.
    pub fn from_scanner(scanner: &Scanner<'_>) -> Self {
        let kind = scanner.token();
        let text = if scanner.token_value().is_empty() {
            scanner.token_text().to_string()
        } else {
            scanner.token_value().to_string()
        };
        Self {
            kind,
            pos: scanner.token_start(),
            end: scanner.token_end(),
            text,
            flags: scanner.token_flags(),
        }
    }

    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }
}

/// Scan all of `text` into tokens, ending with the end-of-file token.
///
/// No rescanning happens here, so `/` is never a regular expression and `>`
/// is never merged. This is the raw token stream, not the one the parser
/// sees.
pub fn tokenize(text: &str, variant: LanguageVariant) -> Vec<TokenInfo> {
    let mut scanner = Scanner::new(text).with_language(ScriptTarget::ESNext, variant);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        tokens.push(TokenInfo::from_scanner(&scanner));
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_ends_with_eof() {
        let tokens = tokenize("let x = 1;", LanguageVariant::Standard);
        let kinds: Vec<SyntaxKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::LetKeyword,
                SyntaxKind::Identifier,
                SyntaxKind::EqualsToken,
                SyntaxKind::NumericLiteral,
                SyntaxKind::SemicolonToken,
                SyntaxKind::EndOfFileToken,
            ]
        );
        assert_eq!(tokens[1].text, "x");
        assert_eq!(tokens[2].text, "=");
        assert_eq!(tokens[5].len(), 0);
    }

    #[test]
    fn test_token_line_break_flag() {
        let tokens = tokenize("a\nb", LanguageVariant::Standard);
        assert!(!tokens[0].has_preceding_line_break());
        assert!(tokens[1].has_preceding_line_break());
    }
}
