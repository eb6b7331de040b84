//! Comment ranges around a position.
//!
//! Leading comments are those between the previous token and `pos`;
//! trailing comments are those on the same line after `pos`. Used for
//! JSDoc collection and by tools that want to keep comments when they
//! print declarations.

use memchr::memmem;
use tsdecl_ast::SyntaxKind;
use tsdecl_core::text::TextPos;

use crate::char_codes::{is_line_break, is_white_space_single_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRange {
    pub pos: TextPos,
    pub end: TextPos,
    /// `SingleLineCommentTrivia` or `MultiLineCommentTrivia`.
    pub kind: SyntaxKind,
    pub has_trailing_new_line: bool,
}

impl CommentRange {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.pos as usize..self.end as usize]
    }

    /// `/** ... */`, but not `/**/`.
    pub fn is_jsdoc(&self, source: &str) -> bool {
        let text = self.text(source);
        self.kind == SyntaxKind::MultiLineCommentTrivia && text.starts_with("/**") && !text.starts_with("/**/")
    }
}

/// Comments before the token that follows `pos`. At the start of a file a
/// shebang line is skipped first.
pub fn get_leading_comment_ranges(text: &str, pos: usize) -> Vec<CommentRange> {
    collect_comment_ranges(text, pos, false)
}

/// Comments after `pos` up to the end of its line.
pub fn get_trailing_comment_ranges(text: &str, pos: usize) -> Vec<CommentRange> {
    collect_comment_ranges(text, pos, true)
}

fn collect_comment_ranges(text: &str, pos: usize, trailing: bool) -> Vec<CommentRange> {
    let bytes = text.as_bytes();
    let mut ranges: Vec<CommentRange> = Vec::new();
    let mut at = pos;
    if at == 0 && text.starts_with("#!") {
        at = text.find(['\n', '\r']).unwrap_or(text.len());
    }
    let mut collecting = trailing || at == 0;
    while let Some(ch) = text.get(at..).and_then(|rest| rest.chars().next()) {
        if ch == '/' && matches!(bytes.get(at + 1), Some(b'/' | b'*')) {
            let start = at;
            let kind;
            if bytes[at + 1] == b'/' {
                kind = SyntaxKind::SingleLineCommentTrivia;
                at = text[at + 2..]
                    .find(|ch: char| is_line_break(ch))
                    .map_or(text.len(), |offset| at + 2 + offset);
            } else {
                kind = SyntaxKind::MultiLineCommentTrivia;
                at = memmem::find(&bytes[at + 2..], b"*/").map_or(text.len(), |offset| at + 2 + offset + 2);
            }
            if collecting {
                ranges.push(CommentRange {
                    pos: start as TextPos,
                    end: at as TextPos,
                    kind,
                    has_trailing_new_line: false,
                });
            }
            continue;
        }
        if is_line_break(ch) {
            if trailing {
                if let Some(last) = ranges.last_mut() {
                    last.has_trailing_new_line = true;
                }
                break;
            }
            if let Some(last) = ranges.last_mut() {
                last.has_trailing_new_line = true;
            }
            collecting = true;
            at += ch.len_utf8();
            continue;
        }
        if is_white_space_single_line(ch) {
            at += ch.len_utf8();
            continue;
        }
        break;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_comments() {
        let text = "/** doc */\n// line\nlet x;";
        let ranges = get_leading_comment_ranges(text, 0);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].text(text), "/** doc */");
        assert!(ranges[0].is_jsdoc(text));
        assert!(ranges[0].has_trailing_new_line);
        assert_eq!(ranges[1].kind, SyntaxKind::SingleLineCommentTrivia);
        assert_eq!(ranges[1].text(text), "// line");
    }

    #[test]
    fn test_same_line_comment_is_not_leading_after_token() {
        // After `a;` the first comment belongs to the previous line.
        let text = "a; // trailing\n/* leading */ b";
        let leading = get_leading_comment_ranges(text, 2);
        assert_eq!(leading.len(), 1);
        assert_eq!(leading[0].text(text), "/* leading */");
        let trailing = get_trailing_comment_ranges(text, 2);
        assert_eq!(trailing.len(), 1);
        assert_eq!(trailing[0].text(text), "// trailing");
    }

    #[test]
    fn test_shebang_is_skipped() {
        let text = "#!/usr/bin/env node\n// hi\nx";
        let ranges = get_leading_comment_ranges(text, 0);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].text(text), "// hi");
    }

    #[test]
    fn test_empty_block_is_not_jsdoc() {
        let text = "/**/x";
        let ranges = get_leading_comment_ranges(text, 0);
        assert!(!ranges[0].is_jsdoc(text));
    }
}
