//! Character classification used by the scanner.

use tsdecl_ast::{LanguageVariant, ScriptTarget};

use crate::unicode;

/// Length of a merge conflict marker run (`<<<<<<<`).
pub const MERGE_CONFLICT_MARKER_LENGTH: usize = 7;

pub const LINE_SEPARATOR: char = '\u{2028}';
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';
pub const ZERO_WIDTH_NON_JOINER: char = '\u{200C}';
pub const ZERO_WIDTH_JOINER: char = '\u{200D}';
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Line terminators: LF, CR, LS, PS.
#[inline]
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR)
}

/// Whitespace that does not end a line.
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{000B}' // vertical tab
            | '\u{000C}' // form feed
            | '\u{0085}' // next line
            | '\u{00A0}' // no-break space
            | '\u{1680}' // ogham space mark
            | '\u{2000}'..='\u{200B}'
            | '\u{202F}' // narrow no-break space
            | '\u{205F}' // medium mathematical space
            | '\u{3000}' // ideographic space
            | '\u{FEFF}' // byte order mark
    )
}

#[inline]
pub fn is_white_space_like(ch: char) -> bool {
    is_white_space_single_line(ch) || is_line_break(ch)
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_octal_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

#[inline]
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

#[inline]
pub fn is_ascii_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Whether `ch` can start an identifier under the given target.
pub fn is_identifier_start(ch: char, target: ScriptTarget) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphabetic() || ch == '$' || ch == '_';
    }
    unicode::is_unicode_identifier_start(ch, target)
}

/// Whether `ch` can continue an identifier. JSX identifiers also accept `-`.
pub fn is_identifier_part(ch: char, target: ScriptTarget, variant: LanguageVariant) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphanumeric()
            || ch == '$'
            || ch == '_'
            || (variant == LanguageVariant::JSX && ch == '-');
    }
    ch == ZERO_WIDTH_NON_JOINER
        || ch == ZERO_WIDTH_JOINER
        || unicode::is_unicode_identifier_part(ch, target)
}

/// Whether `name` is a valid identifier under the given target.
pub fn is_identifier_text(name: &str, target: ScriptTarget) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first, target) => {
            chars.all(|ch| is_identifier_part(ch, target, LanguageVariant::Standard))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_classes() {
        assert!(is_identifier_start('$', ScriptTarget::ES5));
        assert!(is_identifier_start('é', ScriptTarget::ES5));
        assert!(!is_identifier_start('1', ScriptTarget::ESNext));
        assert!(is_identifier_part('1', ScriptTarget::ESNext, LanguageVariant::Standard));
        assert!(!is_identifier_part('-', ScriptTarget::ESNext, LanguageVariant::Standard));
        assert!(is_identifier_part('-', ScriptTarget::ESNext, LanguageVariant::JSX));
        assert!(is_identifier_part(ZERO_WIDTH_JOINER, ScriptTarget::ES5, LanguageVariant::Standard));
    }

    #[test]
    fn test_is_identifier_text() {
        assert!(is_identifier_text("addEventListener", ScriptTarget::ESNext));
        assert!(is_identifier_text("日本", ScriptTarget::ES5));
        assert!(!is_identifier_text("1abc", ScriptTarget::ESNext));
        assert!(!is_identifier_text("", ScriptTarget::ESNext));
    }

    #[test]
    fn test_whitespace() {
        assert!(is_white_space_single_line('\u{FEFF}'));
        assert!(!is_white_space_single_line('\n'));
        assert!(is_white_space_like(PARAGRAPH_SEPARATOR));
    }
}
