//! The scanner.
//!
//! Converts source text into tokens on demand. Positions are byte offsets
//! into the UTF-8 text. Trivia is skipped unless `skip_trivia` is turned
//! off, in which case whitespace, newlines, comments, shebangs and conflict
//! markers come back as their own tokens.
//!
//! Lexical errors never stop scanning. They go to the error callback when
//! one is installed and are collected on the scanner otherwise.

use tsdecl_ast::syntax_kind::keyword_from_text;
use tsdecl_ast::{LanguageVariant, ScriptTarget, SyntaxKind, TokenFlags};
use tsdecl_core::text::{TextPos, TextSpan};
use tsdecl_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};

use crate::char_codes::*;

/// Receives `(message, start, length)` for every lexical error.
pub type ErrorCallback<'a> = Box<dyn FnMut(&'static DiagnosticMessage, TextPos, u32) + 'a>;

/// Saved scanner state for speculative scanning.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pos: usize,
    full_start_pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
}

/// The scanner converts source text into tokens.
pub struct Scanner<'a> {
    text: &'a str,
    /// Current position (end of the current token).
    pos: usize,
    /// End of the scannable range.
    end: usize,
    /// Start of the current token, including leading trivia.
    full_start_pos: usize,
    /// Start of the current token, after leading trivia.
    token_start: usize,
    token: SyntaxKind,
    /// Cooked token text: identifier name, unescaped string contents,
    /// normalized numeric value.
    token_value: String,
    token_flags: TokenFlags,
    language_version: ScriptTarget,
    language_variant: LanguageVariant,
    skip_trivia: bool,
    on_error: Option<ErrorCallback<'a>>,
    diagnostics: DiagnosticCollection,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over the whole of `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            end: text.len(),
            full_start_pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            language_version: ScriptTarget::ESNext,
            language_variant: LanguageVariant::Standard,
            skip_trivia: true,
            on_error: None,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    pub fn with_language(mut self, version: ScriptTarget, variant: LanguageVariant) -> Self {
        self.language_version = version;
        self.language_variant = variant;
        self
    }

    pub fn set_language_version(&mut self, version: ScriptTarget) {
        self.language_version = version;
    }

    pub fn set_language_variant(&mut self, variant: LanguageVariant) {
        self.language_variant = variant;
    }

    pub fn language_variant(&self) -> LanguageVariant {
        self.language_variant
    }

    /// When false, trivia is returned as tokens instead of being skipped.
    pub fn set_skip_trivia(&mut self, skip: bool) {
        self.skip_trivia = skip;
    }

    pub fn set_on_error(&mut self, on_error: ErrorCallback<'a>) {
        self.on_error = Some(on_error);
    }

    /// Restrict scanning to `start..start + length` of the text.
    pub fn set_text_range(&mut self, start: usize, length: usize) {
        let start = start.min(self.text.len());
        self.end = (start + length).min(self.text.len());
        self.reset_token_state(start);
    }

    /// Move to `pos` and forget the current token.
    pub fn reset_token_state(&mut self, pos: usize) {
        debug_assert!(self.text.is_char_boundary(pos));
        self.pos = pos;
        self.full_start_pos = pos;
        self.token_start = pos;
        self.token = SyntaxKind::Unknown;
        self.token_value.clear();
        self.token_flags = TokenFlags::NONE;
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Collected errors, when no callback is installed.
    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    // ========================================================================
    // Token accessors
    // ========================================================================

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    #[inline]
    pub fn token_text(&self) -> &'a str {
        &self.text[self.token_start..self.pos]
    }

    #[inline]
    pub fn token_full_start(&self) -> TextPos {
        self.full_start_pos as TextPos
    }

    #[inline]
    pub fn token_start(&self) -> TextPos {
        self.token_start as TextPos
    }

    #[inline]
    pub fn token_end(&self) -> TextPos {
        self.pos as TextPos
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn has_preceding_jsdoc_comment(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_JSDOC_COMMENT)
    }

    pub fn has_unicode_escape(&self) -> bool {
        self.token_flags.contains(TokenFlags::UNICODE_ESCAPE)
    }

    pub fn has_extended_unicode_escape(&self) -> bool {
        self.token_flags.contains(TokenFlags::EXTENDED_UNICODE_ESCAPE)
    }

    pub fn is_unterminated(&self) -> bool {
        self.token_flags.contains(TokenFlags::UNTERMINATED)
    }

    /// Identifiers and contextual keywords.
    pub fn is_identifier(&self) -> bool {
        self.token == SyntaxKind::Identifier || self.token.is_contextual_keyword()
    }

    pub fn is_reserved_word(&self) -> bool {
        self.token.is_reserved_word()
    }

    // ========================================================================
    // Speculation
    // ========================================================================

    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            full_start_pos: self.full_start_pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
        }
    }

    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.full_start_pos = state.full_start_pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
    }

    /// Run `f`, then restore every piece of scanner state.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    /// Run `f`, restoring the scanner state only when it returns `None`.
    pub fn try_scan<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let state = self.save_state();
        let result = f(self);
        if result.is_none() {
            self.restore_state(state);
        }
        result
    }

    // ========================================================================
    // Character access
    // ========================================================================

    #[inline]
    fn byte_at(&self, pos: usize) -> Option<u8> {
        if pos < self.end {
            Some(self.text.as_bytes()[pos])
        } else {
            None
        }
    }

    /// Decode the character at byte offset `pos`.
    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        let byte = self.byte_at(pos)?;
        if byte.is_ascii() {
            return Some(byte as char);
        }
        self.text.get(pos..self.end)?.chars().next()
    }

    #[inline]
    fn is_byte(&self, pos: usize, expected: u8) -> bool {
        self.byte_at(pos) == Some(expected)
    }

    fn error(&mut self, message: &'static DiagnosticMessage, pos: usize, length: usize) {
        tracing::trace!(code = message.code, pos, length, "lexical error");
        match &mut self.on_error {
            Some(on_error) => on_error(message, pos as TextPos, length as u32),
            None => self.diagnostics.add(Diagnostic::with_location(
                "",
                TextSpan::new(pos as TextPos, length as TextPos),
                message,
                &[],
            )),
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start_pos = self.pos;
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();

        loop {
            self.token_start = self.pos;
            let Some(ch) = self.char_at(self.pos) else {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            };

            if ch == '#' && self.pos == 0 && self.is_shebang_trivia(0) {
                self.pos = self.scan_shebang_trivia(0);
                if self.skip_trivia {
                    continue;
                }
                self.token = SyntaxKind::ShebangTrivia;
                return self.token;
            }

            let token = match ch {
                '\n' | '\r' => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    if self.skip_trivia {
                        self.pos += 1;
                        continue;
                    }
                    if ch == '\r' && self.is_byte(self.pos + 1, b'\n') {
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                    }
                    SyntaxKind::NewLineTrivia
                }
                '\t' | '\u{000B}' | '\u{000C}' | ' ' => {
                    if self.skip_trivia {
                        self.pos += 1;
                        continue;
                    }
                    while self.char_at(self.pos).is_some_and(is_white_space_single_line) {
                        self.pos += self.char_len_at(self.pos);
                    }
                    SyntaxKind::WhitespaceTrivia
                }
                '!' => self.scan_exclamation(),
                '"' | '\'' => {
                    self.token_value = self.scan_string(ch, true);
                    SyntaxKind::StringLiteral
                }
                '`' => self.scan_template_and_set_token_value(true),
                '%' => self.scan_operator(SyntaxKind::PercentToken, SyntaxKind::PercentEqualsToken),
                '&' => self.scan_doubled_operator(
                    b'&',
                    SyntaxKind::AmpersandToken,
                    SyntaxKind::AmpersandEqualsToken,
                    SyntaxKind::AmpersandAmpersandToken,
                    SyntaxKind::AmpersandAmpersandEqualsToken,
                ),
                '(' => self.single(SyntaxKind::OpenParenToken),
                ')' => self.single(SyntaxKind::CloseParenToken),
                '*' => self.scan_doubled_operator(
                    b'*',
                    SyntaxKind::AsteriskToken,
                    SyntaxKind::AsteriskEqualsToken,
                    SyntaxKind::AsteriskAsteriskToken,
                    SyntaxKind::AsteriskAsteriskEqualsToken,
                ),
                '+' => self.scan_increment(b'+', SyntaxKind::PlusToken, SyntaxKind::PlusEqualsToken, SyntaxKind::PlusPlusToken),
                ',' => self.single(SyntaxKind::CommaToken),
                '-' => self.scan_increment(b'-', SyntaxKind::MinusToken, SyntaxKind::MinusEqualsToken, SyntaxKind::MinusMinusToken),
                '.' => {
                    if self.byte_at(self.pos + 1).is_some_and(|b| b.is_ascii_digit()) {
                        self.scan_number()
                    } else if self.is_byte(self.pos + 1, b'.') && self.is_byte(self.pos + 2, b'.') {
                        self.pos += 3;
                        SyntaxKind::DotDotDotToken
                    } else {
                        self.single(SyntaxKind::DotToken)
                    }
                }
                '/' => {
                    if self.is_byte(self.pos + 1, b'/') {
                        self.pos = self.scan_single_line_comment(self.pos);
                        if self.skip_trivia {
                            continue;
                        }
                        SyntaxKind::SingleLineCommentTrivia
                    } else if self.is_byte(self.pos + 1, b'*') {
                        self.scan_multi_line_comment();
                        if self.skip_trivia {
                            continue;
                        }
                        SyntaxKind::MultiLineCommentTrivia
                    } else {
                        self.scan_operator(SyntaxKind::SlashToken, SyntaxKind::SlashEqualsToken)
                    }
                }
                '0'..='9' => self.scan_number(),
                ':' => self.single(SyntaxKind::ColonToken),
                ';' => self.single(SyntaxKind::SemicolonToken),
                '<' | '=' | '>' | '|' if self.is_conflict_marker_trivia(self.pos) => {
                    self.pos = self.scan_conflict_marker_trivia(self.pos);
                    if self.skip_trivia {
                        continue;
                    }
                    SyntaxKind::ConflictMarkerTrivia
                }
                '<' => self.scan_less_than(),
                '=' => self.scan_equals(),
                '>' => self.single(SyntaxKind::GreaterThanToken),
                '?' => self.scan_question(),
                '[' => self.single(SyntaxKind::OpenBracketToken),
                ']' => self.single(SyntaxKind::CloseBracketToken),
                '^' => self.scan_operator(SyntaxKind::CaretToken, SyntaxKind::CaretEqualsToken),
                '{' => self.single(SyntaxKind::OpenBraceToken),
                '|' => self.scan_doubled_operator(
                    b'|',
                    SyntaxKind::BarToken,
                    SyntaxKind::BarEqualsToken,
                    SyntaxKind::BarBarToken,
                    SyntaxKind::BarBarEqualsToken,
                ),
                '}' => self.single(SyntaxKind::CloseBraceToken),
                '~' => self.single(SyntaxKind::TildeToken),
                '@' => self.single(SyntaxKind::AtToken),
                '\\' => self.scan_escaped_identifier_start(),
                '#' => self.scan_private_identifier(),
                _ => {
                    if is_identifier_start(ch, self.language_version) {
                        self.pos += ch.len_utf8();
                        self.scan_identifier_rest()
                    } else if is_white_space_single_line(ch) {
                        self.pos += ch.len_utf8();
                        if self.skip_trivia {
                            continue;
                        }
                        while self.char_at(self.pos).is_some_and(is_white_space_single_line) {
                            self.pos += self.char_len_at(self.pos);
                        }
                        SyntaxKind::WhitespaceTrivia
                    } else if is_line_break(ch) {
                        self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                        self.pos += ch.len_utf8();
                        if self.skip_trivia {
                            continue;
                        }
                        SyntaxKind::NewLineTrivia
                    } else {
                        let size = ch.len_utf8();
                        self.error(&messages::INVALID_CHARACTER, self.pos, size);
                        self.pos += size;
                        SyntaxKind::Unknown
                    }
                }
            };
            self.token = token;
            return token;
        }
    }

    #[inline]
    fn char_len_at(&self, pos: usize) -> usize {
        self.char_at(pos).map_or(1, char::len_utf8)
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    /// `x` or `x=`.
    fn scan_operator(&mut self, plain: SyntaxKind, equals: SyntaxKind) -> SyntaxKind {
        if self.is_byte(self.pos + 1, b'=') {
            self.pos += 2;
            equals
        } else {
            self.pos += 1;
            plain
        }
    }

    /// `x`, `x=`, `xx`, or `xx=`.
    fn scan_doubled_operator(
        &mut self,
        first: u8,
        plain: SyntaxKind,
        equals: SyntaxKind,
        doubled: SyntaxKind,
        doubled_equals: SyntaxKind,
    ) -> SyntaxKind {
        if self.is_byte(self.pos + 1, first) {
            if self.is_byte(self.pos + 2, b'=') {
                self.pos += 3;
                return doubled_equals;
            }
            self.pos += 2;
            return doubled;
        }
        self.scan_operator(plain, equals)
    }

    /// `+`, `+=`, `++` and the minus equivalents.
    fn scan_increment(&mut self, first: u8, plain: SyntaxKind, equals: SyntaxKind, doubled: SyntaxKind) -> SyntaxKind {
        if self.is_byte(self.pos + 1, first) {
            self.pos += 2;
            return doubled;
        }
        self.scan_operator(plain, equals)
    }

    fn scan_exclamation(&mut self) -> SyntaxKind {
        if self.is_byte(self.pos + 1, b'=') {
            if self.is_byte(self.pos + 2, b'=') {
                self.pos += 3;
                return SyntaxKind::ExclamationEqualsEqualsToken;
            }
            self.pos += 2;
            return SyntaxKind::ExclamationEqualsToken;
        }
        self.single(SyntaxKind::ExclamationToken)
    }

    fn scan_less_than(&mut self) -> SyntaxKind {
        if self.is_byte(self.pos + 1, b'<') {
            if self.is_byte(self.pos + 2, b'=') {
                self.pos += 3;
                return SyntaxKind::LessThanLessThanEqualsToken;
            }
            self.pos += 2;
            return SyntaxKind::LessThanLessThanToken;
        }
        if self.is_byte(self.pos + 1, b'=') {
            self.pos += 2;
            return SyntaxKind::LessThanEqualsToken;
        }
        if self.language_variant == LanguageVariant::JSX
            && self.is_byte(self.pos + 1, b'/')
            && !self.is_byte(self.pos + 2, b'*')
        {
            self.pos += 2;
            return SyntaxKind::LessThanSlashToken;
        }
        self.single(SyntaxKind::LessThanToken)
    }

    fn scan_equals(&mut self) -> SyntaxKind {
        if self.is_byte(self.pos + 1, b'=') {
            if self.is_byte(self.pos + 2, b'=') {
                self.pos += 3;
                return SyntaxKind::EqualsEqualsEqualsToken;
            }
            self.pos += 2;
            return SyntaxKind::EqualsEqualsToken;
        }
        if self.is_byte(self.pos + 1, b'>') {
            self.pos += 2;
            return SyntaxKind::EqualsGreaterThanToken;
        }
        self.single(SyntaxKind::EqualsToken)
    }

    fn scan_question(&mut self) -> SyntaxKind {
        if self.is_byte(self.pos + 1, b'.') && !self.byte_at(self.pos + 2).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 2;
            return SyntaxKind::QuestionDotToken;
        }
        if self.is_byte(self.pos + 1, b'?') {
            if self.is_byte(self.pos + 2, b'=') {
                self.pos += 3;
                return SyntaxKind::QuestionQuestionEqualsToken;
            }
            self.pos += 2;
            return SyntaxKind::QuestionQuestionToken;
        }
        self.single(SyntaxKind::QuestionToken)
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    fn is_shebang_trivia(&self, pos: usize) -> bool {
        pos == 0 && self.is_byte(0, b'#') && self.is_byte(1, b'!')
    }

    fn scan_shebang_trivia(&self, pos: usize) -> usize {
        self.skip_to_line_end(pos + 2)
    }

    /// Position of the next line break at or after `pos`, or the end.
    fn skip_to_line_end(&self, pos: usize) -> usize {
        let bytes = &self.text.as_bytes()[..self.end];
        let mut at = pos;
        while let Some(offset) = memchr::memchr3(b'\n', b'\r', 0xE2, &bytes[at..]) {
            let candidate = at + offset;
            if bytes[candidate] != 0xE2 {
                return candidate;
            }
            if self.char_at(candidate).is_some_and(is_line_break) {
                return candidate;
            }
            at = candidate + 1;
        }
        self.end
    }

    fn scan_single_line_comment(&self, pos: usize) -> usize {
        self.skip_to_line_end(pos + 2)
    }

    fn scan_multi_line_comment(&mut self) {
        let start = self.pos;
        let body_start = start + 2;
        if self.is_byte(body_start, b'*') && !self.is_byte(body_start + 1, b'/') {
            self.token_flags |= TokenFlags::PRECEDING_JSDOC_COMMENT;
        }
        let body = &self.text.as_bytes()[body_start..self.end];
        let (comment_end, terminated) = match memchr::memmem::find(body, b"*/") {
            Some(offset) => (body_start + offset + 2, true),
            None => (self.end, false),
        };
        let comment = &self.text[start..comment_end];
        if comment.chars().any(is_line_break) {
            self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
        }
        self.pos = comment_end;
        if !terminated {
            self.error(&messages::ASTERISK_SLASH_EXPECTED, self.pos, 0);
            self.token_flags |= TokenFlags::UNTERMINATED;
        }
    }

    /// Seven identical marker characters at the start of a line. Markers
    /// other than `=======` must be followed by a space.
    fn is_conflict_marker_trivia(&self, pos: usize) -> bool {
        if pos > 0 {
            let previous = self.text[..pos].chars().next_back();
            if !previous.is_some_and(is_line_break) {
                return false;
            }
        }
        let bytes = self.text.as_bytes();
        if pos + MERGE_CONFLICT_MARKER_LENGTH >= self.end {
            return false;
        }
        let ch = bytes[pos];
        if !bytes[pos..pos + MERGE_CONFLICT_MARKER_LENGTH].iter().all(|&b| b == ch) {
            return false;
        }
        ch == b'=' || bytes[pos + MERGE_CONFLICT_MARKER_LENGTH] == b' '
    }

    /// Skip a conflict marker. `<<<<<<<` and `>>>>>>>` end at the line end;
    /// `=======` and `|||||||` skip the whole section up to the next marker.
    fn scan_conflict_marker_trivia(&mut self, pos: usize) -> usize {
        self.error(&messages::MERGE_CONFLICT_MARKER_ENCOUNTERED, pos, MERGE_CONFLICT_MARKER_LENGTH);
        let ch = self.text.as_bytes()[pos];
        if ch == b'<' || ch == b'>' {
            return self.skip_to_line_end(pos);
        }
        let bytes = self.text.as_bytes();
        let mut at = pos;
        while at < self.end {
            let current = bytes[at];
            if (current == b'=' || current == b'>') && current != ch && self.is_conflict_marker_trivia(at) {
                break;
            }
            at += 1;
        }
        at
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Continue an identifier whose first character ends at `self.pos`.
    fn scan_identifier_rest(&mut self) -> SyntaxKind {
        let start = self.token_start;
        let head = &self.text[start..self.pos];
        let rest = self.scan_identifier_parts();
        self.token_value = format!("{head}{rest}");
        self.get_identifier_token()
    }

    /// Scan identifier parts, decoding `\uXXXX` and `\u{X}` escapes.
    fn scan_identifier_parts(&mut self) -> String {
        let mut result = String::new();
        let mut start = self.pos;
        while let Some(ch) = self.char_at(self.pos) {
            if is_identifier_part(ch, self.language_version, LanguageVariant::Standard) {
                self.pos += ch.len_utf8();
                continue;
            }
            if ch != '\\' {
                break;
            }
            let Some((escaped, length, extended)) = self.peek_unicode_escape(self.pos) else {
                break;
            };
            if !is_identifier_part(escaped, self.language_version, LanguageVariant::Standard) {
                break;
            }
            result.push_str(&self.text[start..self.pos]);
            result.push(escaped);
            self.token_flags |= TokenFlags::UNICODE_ESCAPE;
            if extended {
                self.token_flags |= TokenFlags::EXTENDED_UNICODE_ESCAPE;
            }
            self.pos += length;
            start = self.pos;
        }
        result.push_str(&self.text[start..self.pos]);
        result
    }

    /// Decode a well-formed `\uXXXX` or `\u{X}` escape at `pos` without
    /// consuming it. Returns the character, the escape's byte length, and
    /// whether it used the braced form.
    fn peek_unicode_escape(&self, pos: usize) -> Option<(char, usize, bool)> {
        if !self.is_byte(pos, b'\\') || !self.is_byte(pos + 1, b'u') {
            return None;
        }
        if self.is_byte(pos + 2, b'{') {
            let digits_start = pos + 3;
            let mut at = digits_start;
            while self.byte_at(at).is_some_and(|b| b.is_ascii_hexdigit()) {
                at += 1;
            }
            if at == digits_start || !self.is_byte(at, b'}') {
                return None;
            }
            let value = u32::from_str_radix(&self.text[digits_start..at], 16).ok()?;
            return char::from_u32(value).map(|ch| (ch, at + 1 - pos, true));
        }
        let digits = self.text.get(pos + 2..pos + 6)?;
        if pos + 6 > self.end || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        char::from_u32(value).map(|ch| (ch, 6, false))
    }

    fn get_identifier_token(&mut self) -> SyntaxKind {
        keyword_from_text(&self.token_value).unwrap_or(SyntaxKind::Identifier)
    }

    fn scan_escaped_identifier_start(&mut self) -> SyntaxKind {
        if let Some((ch, length, extended)) = self.peek_unicode_escape(self.pos) {
            if is_identifier_start(ch, self.language_version) {
                self.pos += length;
                self.token_flags |= TokenFlags::UNICODE_ESCAPE;
                if extended {
                    self.token_flags |= TokenFlags::EXTENDED_UNICODE_ESCAPE;
                }
                let rest = self.scan_identifier_parts();
                self.token_value = format!("{ch}{rest}");
                return self.get_identifier_token();
            }
        }
        self.error(&messages::INVALID_CHARACTER, self.pos, 1);
        self.pos += 1;
        SyntaxKind::Unknown
    }

    fn scan_private_identifier(&mut self) -> SyntaxKind {
        if self.pos != 0 && self.is_byte(self.pos + 1, b'!') {
            self.error(&messages::HASH_BANG_CAN_ONLY_BE_USED_AT_THE_START_OF_A_FILE, self.pos, 2);
            self.pos += 1;
            return SyntaxKind::Unknown;
        }
        let next = self.char_at(self.pos + 1);
        if let Some(ch) = next.filter(|&ch| is_identifier_start(ch, self.language_version)) {
            self.pos += 1 + ch.len_utf8();
            let rest = self.scan_identifier_parts();
            self.token_value = format!("#{ch}{rest}");
        } else if let Some((ch, length, extended)) = self
            .peek_unicode_escape(self.pos + 1)
            .filter(|(ch, _, _)| is_identifier_start(*ch, self.language_version))
        {
            self.pos += 1 + length;
            self.token_flags |= TokenFlags::UNICODE_ESCAPE;
            if extended {
                self.token_flags |= TokenFlags::EXTENDED_UNICODE_ESCAPE;
            }
            let rest = self.scan_identifier_parts();
            self.token_value = format!("#{ch}{rest}");
        } else {
            self.token_value = "#".to_string();
            self.error(&messages::INVALID_CHARACTER, self.pos, 1);
            self.pos += 1;
        }
        SyntaxKind::PrivateIdentifier
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    /// Scan a run of decimal digits, allowing single `_` separators between
    /// digits. Returns the digits with separators removed.
    fn scan_number_fragment(&mut self) -> String {
        let mut start = self.pos;
        let mut allow_separator = false;
        let mut is_previous_separator = false;
        let mut result = String::new();
        while let Some(byte) = self.byte_at(self.pos) {
            if byte == b'_' {
                self.token_flags |= TokenFlags::CONTAINS_SEPARATOR;
                if allow_separator {
                    allow_separator = false;
                    is_previous_separator = true;
                    result.push_str(&self.text[start..self.pos]);
                } else if is_previous_separator {
                    self.error(&messages::MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS_ARE_NOT_PERMITTED, self.pos, 1);
                } else {
                    self.error(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos, 1);
                }
                self.pos += 1;
                start = self.pos;
                continue;
            }
            if byte.is_ascii_digit() {
                allow_separator = true;
                is_previous_separator = false;
                self.pos += 1;
                continue;
            }
            break;
        }
        if is_previous_separator {
            self.error(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos - 1, 1);
        }
        result.push_str(&self.text[start..self.pos]);
        result
    }

    /// Digits in `radix` (2, 8 or 16) with separators removed.
    fn scan_radix_digits(&mut self, radix: u32) -> String {
        let mut result = String::new();
        let mut allow_separator = false;
        let mut is_previous_separator = false;
        while let Some(byte) = self.byte_at(self.pos) {
            if byte == b'_' {
                self.token_flags |= TokenFlags::CONTAINS_SEPARATOR;
                if allow_separator {
                    allow_separator = false;
                    is_previous_separator = true;
                } else if is_previous_separator {
                    self.error(&messages::MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS_ARE_NOT_PERMITTED, self.pos, 1);
                } else {
                    self.error(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos, 1);
                }
                self.pos += 1;
                continue;
            }
            if !(byte as char).is_digit(radix) {
                break;
            }
            allow_separator = true;
            is_previous_separator = false;
            result.push(byte as char);
            self.pos += 1;
        }
        if is_previous_separator {
            self.error(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos - 1, 1);
        }
        result
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        if self.is_byte(start, b'0') {
            let radix = match self.byte_at(start + 1) {
                Some(b'x' | b'X') => Some((16, TokenFlags::HEX_SPECIFIER)),
                Some(b'b' | b'B') => Some((2, TokenFlags::BINARY_SPECIFIER)),
                Some(b'o' | b'O') => Some((8, TokenFlags::OCTAL_SPECIFIER)),
                _ => None,
            };
            if let Some((radix, flag)) = radix {
                self.pos += 2;
                self.token_flags |= flag;
                let mut digits = self.scan_radix_digits(radix);
                if digits.is_empty() {
                    let message = if radix == 16 {
                        &messages::HEXADECIMAL_DIGIT_EXPECTED
                    } else {
                        &messages::DIGIT_EXPECTED
                    };
                    self.error(message, self.pos, 0);
                    digits.push('0');
                }
                return self.finish_radix_number(&digits, radix);
            }
            if self.byte_at(start + 1).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
                let digits = self.scan_number_fragment();
                if digits.bytes().all(|b| (b'0'..=b'7').contains(&b))
                    && !self.is_byte(self.pos, b'.')
                    && !matches!(self.byte_at(self.pos), Some(b'e' | b'E'))
                {
                    self.token_flags |= TokenFlags::OCTAL;
                    self.token_value = digits_to_decimal(&digits, 8);
                    self.check_for_identifier_start_after_numeric_literal();
                    return SyntaxKind::NumericLiteral;
                }
                self.token_flags |= TokenFlags::CONTAINS_LEADING_ZERO;
                self.pos = start;
            }
        }

        let main_fragment = self.scan_number_fragment();
        let mut decimal_fragment = None;
        let mut scientific_fragment = None;
        if self.is_byte(self.pos, b'.') {
            self.pos += 1;
            decimal_fragment = Some(self.scan_number_fragment());
        }
        if matches!(self.byte_at(self.pos), Some(b'e' | b'E')) {
            self.pos += 1;
            self.token_flags |= TokenFlags::SCIENTIFIC;
            let mut sign = "";
            if let Some(byte @ (b'+' | b'-')) = self.byte_at(self.pos) {
                sign = if byte == b'-' { "-" } else { "+" };
                self.pos += 1;
            }
            let pre_numeric_part = self.pos;
            let exponent = self.scan_number_fragment();
            if exponent.is_empty() {
                self.error(&messages::DIGIT_EXPECTED, pre_numeric_part, 0);
            } else {
                scientific_fragment = Some(format!("e{sign}{exponent}"));
            }
        }

        let is_plain_integer = decimal_fragment.is_none() && !self.token_flags.contains(TokenFlags::SCIENTIFIC);
        if is_plain_integer && self.is_byte(self.pos, b'n') {
            self.pos += 1;
            self.token_value = format!("{}n", digits_to_decimal(&main_fragment, 10));
            self.check_for_identifier_start_after_numeric_literal();
            return SyntaxKind::BigIntLiteral;
        }

        let mut literal = if main_fragment.is_empty() { "0".to_string() } else { main_fragment };
        if let Some(decimal) = decimal_fragment {
            literal.push('.');
            literal.push_str(&decimal);
        }
        if let Some(scientific) = scientific_fragment {
            literal.push_str(&scientific);
        }
        self.token_value = literal
            .parse::<f64>()
            .map(js_number_to_string)
            .unwrap_or(literal);
        self.check_for_identifier_start_after_numeric_literal();
        SyntaxKind::NumericLiteral
    }

    fn finish_radix_number(&mut self, digits: &str, radix: u32) -> SyntaxKind {
        if self.is_byte(self.pos, b'n') {
            self.pos += 1;
            self.token_value = format!("{}n", digits_to_decimal(digits, radix));
            self.check_for_identifier_start_after_numeric_literal();
            return SyntaxKind::BigIntLiteral;
        }
        let value = digits
            .bytes()
            .fold(0f64, |acc, b| acc * radix as f64 + (b as char).to_digit(radix).unwrap_or(0) as f64);
        self.token_value = js_number_to_string(value);
        self.check_for_identifier_start_after_numeric_literal();
        SyntaxKind::NumericLiteral
    }

    /// `3in x` and `1x` are errors. The identifier is reported and left for
    /// the next scan.
    fn check_for_identifier_start_after_numeric_literal(&mut self) {
        let Some(ch) = self.char_at(self.pos) else {
            return;
        };
        if !is_identifier_start(ch, self.language_version) {
            return;
        }
        let identifier_start = self.pos;
        self.pos += ch.len_utf8();
        let saved_flags = self.token_flags;
        self.scan_identifier_parts();
        self.token_flags = saved_flags;
        self.error(
            &messages::AN_IDENTIFIER_OR_KEYWORD_CANNOT_IMMEDIATELY_FOLLOW_A_NUMERIC_LITERAL,
            identifier_start,
            self.pos - identifier_start,
        );
        self.pos = identifier_start;
    }

    // ========================================================================
    // Strings, escapes, templates
    // ========================================================================

    /// Scan a quoted string starting at `self.pos`. With `allow_escapes`
    /// false (JSX attribute values) backslashes are literal.
    fn scan_string(&mut self, quote: char, allow_escapes: bool) -> String {
        self.pos += 1;
        let mut result = String::new();
        let mut start = self.pos;
        loop {
            let Some(ch) = self.char_at(self.pos) else {
                result.push_str(&self.text[start..self.pos]);
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_STRING_LITERAL, self.pos, 0);
                break;
            };
            if ch == quote {
                result.push_str(&self.text[start..self.pos]);
                self.pos += 1;
                break;
            }
            if ch == '\\' && allow_escapes {
                result.push_str(&self.text[start..self.pos]);
                let escaped = self.scan_escape_sequence(true);
                result.push_str(&escaped);
                start = self.pos;
                continue;
            }
            if (ch == '\n' || ch == '\r') && allow_escapes {
                result.push_str(&self.text[start..self.pos]);
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_STRING_LITERAL, self.pos, 0);
                break;
            }
            self.pos += ch.len_utf8();
        }
        result
    }

    /// Decode one escape sequence starting at the backslash.
    fn scan_escape_sequence(&mut self, report_errors: bool) -> String {
        let start = self.pos;
        self.pos += 1;
        let Some(ch) = self.char_at(self.pos) else {
            self.error(&messages::UNEXPECTED_END_OF_TEXT, self.pos, 0);
            return String::new();
        };
        self.pos += ch.len_utf8();
        match ch {
            '0'..='7' => {
                if ch == '0' && !self.byte_at(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                    return "\0".to_string();
                }
                if !report_errors {
                    self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
                    return self.text[start..self.pos].to_string();
                }
                // Legacy octal escape: up to three digits, at most \377.
                let mut value = ch.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.byte_at(self.pos).and_then(|b| (b as char).to_digit(8)) {
                        Some(digit) if value * 8 + digit <= 0xFF => {
                            value = value * 8 + digit;
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                char::from_u32(value).map(String::from).unwrap_or_default()
            }
            '8' | '9' => ch.to_string(),
            'b' => "\u{0008}".to_string(),
            't' => "\t".to_string(),
            'n' => "\n".to_string(),
            'v' => "\u{000B}".to_string(),
            'f' => "\u{000C}".to_string(),
            'r' => "\r".to_string(),
            '\'' => "'".to_string(),
            '"' => "\"".to_string(),
            'u' => {
                if self.is_byte(self.pos, b'{') {
                    self.pos += 1;
                    self.token_flags |= TokenFlags::EXTENDED_UNICODE_ESCAPE;
                    return self.scan_extended_unicode_escape(start, report_errors);
                }
                self.token_flags |= TokenFlags::UNICODE_ESCAPE;
                self.scan_hexadecimal_escape(start, 4, report_errors)
            }
            'x' => self.scan_hexadecimal_escape(start, 2, report_errors),
            '\r' => {
                if self.is_byte(self.pos, b'\n') {
                    self.pos += 1;
                }
                String::new()
            }
            '\n' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => String::new(),
            _ => ch.to_string(),
        }
    }

    fn scan_exact_hex_digits(&mut self, count: usize) -> Option<u32> {
        let digits = self.text.get(self.pos..self.pos + count)?;
        if self.pos + count > self.end || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        self.pos += count;
        u32::from_str_radix(digits, 16).ok()
    }

    /// `\xHH` or `\uHHHH`. A high surrogate followed by an escaped low
    /// surrogate combines into one character; a lone surrogate decodes to
    /// U+FFFD.
    fn scan_hexadecimal_escape(&mut self, start: usize, count: usize, report_errors: bool) -> String {
        let Some(value) = self.scan_exact_hex_digits(count) else {
            if report_errors {
                self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED, self.pos, 0);
            } else {
                self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
            }
            return self.text[start..self.pos].to_string();
        };
        if (0xD800..=0xDBFF).contains(&value) && self.is_byte(self.pos, b'\\') && self.is_byte(self.pos + 1, b'u') {
            let saved = self.pos;
            self.pos += 2;
            match self.scan_exact_hex_digits(4) {
                Some(low) if (0xDC00..=0xDFFF).contains(&low) => {
                    let combined = 0x10000 + ((value - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(combined).unwrap_or(REPLACEMENT_CHARACTER).to_string();
                }
                _ => self.pos = saved,
            }
        }
        char::from_u32(value).unwrap_or(REPLACEMENT_CHARACTER).to_string()
    }

    /// `\u{H+}` after the opening brace.
    fn scan_extended_unicode_escape(&mut self, start: usize, report_errors: bool) -> String {
        let digits_start = self.pos;
        while self.byte_at(self.pos).is_some_and(|b| b.is_ascii_hexdigit()) {
            self.pos += 1;
        }
        let digits = &self.text[digits_start..self.pos];
        let value = u32::from_str_radix(digits, 16).ok();
        let mut is_invalid = false;
        if digits.is_empty() {
            if report_errors {
                self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED, self.pos, 0);
            }
            is_invalid = true;
        } else if value.map_or(true, |value| value > 0x10FFFF) {
            if report_errors {
                self.error(
                    &messages::AN_EXTENDED_UNICODE_ESCAPE_VALUE_MUST_BE_BETWEEN_0X0_AND_0X10FFFF_INCLUSIVE,
                    digits_start,
                    self.pos - digits_start,
                );
            }
            is_invalid = true;
        }
        if self.is_byte(self.pos, b'}') {
            self.pos += 1;
        } else {
            if report_errors {
                self.error(&messages::UNTERMINATED_UNICODE_ESCAPE_SEQUENCE, self.pos, 0);
            }
            is_invalid = true;
        }
        if is_invalid {
            if !report_errors {
                self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
            }
            return self.text[start..self.pos].to_string();
        }
        value
            .and_then(char::from_u32)
            .unwrap_or(REPLACEMENT_CHARACTER)
            .to_string()
    }

    /// Scan from a backtick or `}` to the next backtick or `${`.
    fn scan_template_and_set_token_value(&mut self, report_invalid_escapes: bool) -> SyntaxKind {
        let started_with_backtick = self.is_byte(self.pos, b'`');
        self.pos += 1;
        let mut start = self.pos;
        let mut contents = String::new();
        let token = loop {
            let Some(ch) = self.char_at(self.pos) else {
                contents.push_str(&self.text[start..self.pos]);
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_TEMPLATE_LITERAL, self.pos, 0);
                break if started_with_backtick {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            };
            match ch {
                '`' => {
                    contents.push_str(&self.text[start..self.pos]);
                    self.pos += 1;
                    break if started_with_backtick {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                '$' if self.is_byte(self.pos + 1, b'{') => {
                    contents.push_str(&self.text[start..self.pos]);
                    self.pos += 2;
                    break if started_with_backtick {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                }
                '\\' => {
                    contents.push_str(&self.text[start..self.pos]);
                    let escaped = self.scan_escape_sequence(report_invalid_escapes);
                    contents.push_str(&escaped);
                    start = self.pos;
                }
                '\r' => {
                    // Template values normalize CRLF and CR to LF.
                    contents.push_str(&self.text[start..self.pos]);
                    self.pos += 1;
                    if self.is_byte(self.pos, b'\n') {
                        self.pos += 1;
                    }
                    contents.push('\n');
                    start = self.pos;
                }
                _ => self.pos += ch.len_utf8(),
            }
        };
        self.token_value = contents;
        token
    }

    // ========================================================================
    // Re-scanning
    // ========================================================================

    /// Merge a `>` with what follows into `>=`, `>>`, `>>=`, `>>>`, `>>>=`.
    pub fn re_scan_greater_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::GreaterThanToken {
            return self.token;
        }
        self.token = if self.is_byte(self.pos, b'>') {
            if self.is_byte(self.pos + 1, b'>') {
                if self.is_byte(self.pos + 2, b'=') {
                    self.pos += 3;
                    SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
                } else {
                    self.pos += 2;
                    SyntaxKind::GreaterThanGreaterThanGreaterThanToken
                }
            } else if self.is_byte(self.pos + 1, b'=') {
                self.pos += 2;
                SyntaxKind::GreaterThanGreaterThanEqualsToken
            } else {
                self.pos += 1;
                SyntaxKind::GreaterThanGreaterThanToken
            }
        } else if self.is_byte(self.pos, b'=') {
            self.pos += 1;
            SyntaxKind::GreaterThanEqualsToken
        } else {
            SyntaxKind::GreaterThanToken
        };
        self.token
    }

    /// Reinterpret a `/` or `/=` token as a regular expression literal.
    pub fn re_scan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken) {
            return self.token;
        }
        let mut p = self.token_start + 1;
        let mut in_escape = false;
        let mut in_character_class = false;
        loop {
            let Some(ch) = self.char_at(p) else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL, self.token_start, p - self.token_start);
                break;
            };
            if is_line_break(ch) {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL, self.token_start, p - self.token_start);
                break;
            }
            if in_escape {
                in_escape = false;
            } else if ch == '/' && !in_character_class {
                p += 1;
                break;
            } else if ch == '[' {
                in_character_class = true;
            } else if ch == '\\' {
                in_escape = true;
            } else if ch == ']' {
                in_character_class = false;
            }
            p += ch.len_utf8();
        }
        while let Some(ch) = self.char_at(p) {
            if !is_identifier_part(ch, self.language_version, LanguageVariant::Standard) {
                break;
            }
            p += ch.len_utf8();
        }
        self.pos = p;
        self.token_value = self.text[self.token_start..self.pos].to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }

    /// Rescan from a `}` that closes a template substitution.
    pub fn re_scan_template_token(&mut self, is_tagged_template: bool) -> SyntaxKind {
        self.pos = self.token_start;
        self.token = self.scan_template_and_set_token_value(!is_tagged_template);
        self.token
    }

    /// Split `<<` so `<` can open a type argument list.
    pub fn re_scan_less_than_token(&mut self) -> SyntaxKind {
        if self.token == SyntaxKind::LessThanLessThanToken {
            self.pos = self.token_start + 1;
            self.token = SyntaxKind::LessThanToken;
        }
        self.token
    }

    // ========================================================================
    // JSX
    // ========================================================================

    /// Scan JSX child content: `<`, `</`, `{`, or a run of text.
    pub fn scan_jsx_token(&mut self, allow_multiline_jsx_text: bool) -> SyntaxKind {
        self.full_start_pos = self.pos;
        self.token_start = self.pos;
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();

        let Some(ch) = self.char_at(self.pos) else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };
        if ch == '<' {
            if self.is_byte(self.pos + 1, b'/') {
                self.pos += 2;
                self.token = SyntaxKind::LessThanSlashToken;
            } else {
                self.pos += 1;
                self.token = SyntaxKind::LessThanToken;
            }
            return self.token;
        }
        if ch == '{' {
            self.pos += 1;
            self.token = SyntaxKind::OpenBraceToken;
            return self.token;
        }

        let mut first_non_whitespace: Option<usize> = None;
        let mut line_break_before_text = false;
        while let Some(ch) = self.char_at(self.pos) {
            if ch == '{' {
                break;
            }
            if ch == '<' {
                if self.is_conflict_marker_trivia(self.pos) {
                    self.pos = self.scan_conflict_marker_trivia(self.pos);
                    self.token = SyntaxKind::ConflictMarkerTrivia;
                    return self.token;
                }
                break;
            }
            if ch == '>' {
                self.error(&messages::UNEXPECTED_TOKEN_DID_YOU_MEAN_OR_GT, self.pos, 1);
            }
            if ch == '}' {
                self.error(&messages::UNEXPECTED_TOKEN_DID_YOU_MEAN_OR_RBRACE, self.pos, 1);
            }
            if is_line_break(ch) && first_non_whitespace.is_none() {
                line_break_before_text = true;
            } else if !allow_multiline_jsx_text && is_line_break(ch) && first_non_whitespace.is_some() {
                break;
            } else if !is_white_space_like(ch) {
                first_non_whitespace = Some(self.pos);
            }
            self.pos += ch.len_utf8();
        }
        self.token_value = self.text[self.full_start_pos..self.pos].to_string();
        self.token = if first_non_whitespace.is_none() && line_break_before_text {
            SyntaxKind::JsxTextAllWhiteSpaces
        } else {
            SyntaxKind::JsxText
        };
        self.token
    }

    /// Extend an identifier or keyword token with JSX name parts (`-`).
    pub fn scan_jsx_identifier(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::Identifier && !self.token.is_keyword() {
            return self.token;
        }
        while let Some(ch) = self.char_at(self.pos) {
            if ch == '-' {
                self.token_value.push('-');
                self.pos += 1;
                continue;
            }
            let old_pos = self.pos;
            let parts = self.scan_identifier_parts();
            self.token_value.push_str(&parts);
            if self.pos == old_pos {
                break;
            }
        }
        self.token = self.get_identifier_token();
        self.token
    }

    /// Attribute values are strings without escape processing, or any
    /// ordinary token.
    pub fn scan_jsx_attribute_value(&mut self) -> SyntaxKind {
        self.full_start_pos = self.pos;
        match self.char_at(self.pos) {
            Some(quote @ ('"' | '\'')) => {
                self.token_start = self.pos;
                self.token_flags = TokenFlags::NONE;
                self.token_value = self.scan_string(quote, false);
                self.token = SyntaxKind::StringLiteral;
                self.token
            }
            _ => self.scan(),
        }
    }

    pub fn re_scan_jsx_attribute_value(&mut self) -> SyntaxKind {
        self.pos = self.full_start_pos;
        self.token_start = self.full_start_pos;
        self.scan_jsx_attribute_value()
    }

    pub fn re_scan_jsx_token(&mut self, allow_multiline_jsx_text: bool) -> SyntaxKind {
        self.pos = self.full_start_pos;
        self.token_start = self.full_start_pos;
        self.scan_jsx_token(allow_multiline_jsx_text)
    }
}

/// Convert a digit string in `radix` to decimal without losing precision.
pub fn digits_to_decimal(digits: &str, radix: u32) -> String {
    // Little-endian base 10^9 limbs.
    const LIMB: u64 = 1_000_000_000;
    let mut limbs: Vec<u64> = vec![0];
    for digit in digits.chars().filter_map(|ch| ch.to_digit(radix)) {
        let mut carry = digit as u64;
        for limb in limbs.iter_mut() {
            let value = *limb * radix as u64 + carry;
            *limb = value % LIMB;
            carry = value / LIMB;
        }
        while carry > 0 {
            limbs.push(carry % LIMB);
            carry /= LIMB;
        }
    }
    let mut out = String::new();
    for (index, limb) in limbs.iter().rev().enumerate() {
        if index == 0 {
            out.push_str(&limb.to_string());
        } else {
            out.push_str(&format!("{limb:09}"));
        }
    }
    out
}

/// Format a number the way JavaScript's `Number.prototype.toString` does
/// for the common cases: integers print without a fraction, and very large
/// or very small magnitudes switch to exponent notation.
pub fn js_number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
            _ => formatted,
        };
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(text: &str) -> Vec<SyntaxKind> {
        let mut scanner = Scanner::new(text);
        let mut kinds = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            kinds.push(kind);
        }
        kinds
    }

    #[test]
    fn test_scan_simple_tokens() {
        assert_eq!(
            scan_all("( ) { } [ ] ; , ~ @"),
            vec![
                SyntaxKind::OpenParenToken,
                SyntaxKind::CloseParenToken,
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
                SyntaxKind::OpenBracketToken,
                SyntaxKind::CloseBracketToken,
                SyntaxKind::SemicolonToken,
                SyntaxKind::CommaToken,
                SyntaxKind::TildeToken,
                SyntaxKind::AtToken,
            ]
        );
    }

    #[test]
    fn test_scan_operators() {
        assert_eq!(
            scan_all("=> === !== ??= **= ||= &&= ?. ..."),
            vec![
                SyntaxKind::EqualsGreaterThanToken,
                SyntaxKind::EqualsEqualsEqualsToken,
                SyntaxKind::ExclamationEqualsEqualsToken,
                SyntaxKind::QuestionQuestionEqualsToken,
                SyntaxKind::AsteriskAsteriskEqualsToken,
                SyntaxKind::BarBarEqualsToken,
                SyntaxKind::AmpersandAmpersandEqualsToken,
                SyntaxKind::QuestionDotToken,
                SyntaxKind::DotDotDotToken,
            ]
        );
    }

    #[test]
    fn test_question_dot_before_digit() {
        assert_eq!(
            scan_all("a?.5:1"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::QuestionToken,
                SyntaxKind::NumericLiteral,
                SyntaxKind::ColonToken,
                SyntaxKind::NumericLiteral,
            ]
        );
    }

    #[test]
    fn test_greater_than_is_split_until_rescanned() {
        let mut scanner = Scanner::new("a >>= b");
        scanner.scan();
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
        assert_eq!(scanner.re_scan_greater_token(), SyntaxKind::GreaterThanGreaterThanEqualsToken);
        assert_eq!(scanner.token_end(), 5);
    }

    #[test]
    fn test_scan_identifier_and_keyword() {
        let mut scanner = Scanner::new("interface Foo");
        assert_eq!(scanner.scan(), SyntaxKind::InterfaceKeyword);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "Foo");
        assert_eq!(scanner.token_start(), 10);
        assert_eq!(scanner.token_full_start(), 9);
    }

    #[test]
    fn test_scan_unicode_identifier() {
        let mut scanner = Scanner::new("const café = 1");
        scanner.scan();
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "café");
        assert_eq!(scanner.token_end(), 11);
    }

    #[test]
    fn test_escaped_identifier() {
        let mut scanner = Scanner::new("\\u0061bc \\u{62}ar");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "abc");
        assert!(scanner.has_unicode_escape());
        assert!(!scanner.has_extended_unicode_escape());
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "bar");
        assert!(scanner.has_extended_unicode_escape());
    }

    #[test]
    fn test_escaped_keyword_scans_as_keyword_kind() {
        let mut scanner = Scanner::new("\\u0076ar");
        assert_eq!(scanner.scan(), SyntaxKind::VarKeyword);
        assert!(scanner.has_unicode_escape());
    }

    #[test]
    fn test_scan_string_literal() {
        let mut scanner = Scanner::new(r#""a\tb\x41B\u{1F600}""#);
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "a\tbAB\u{1F600}");
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let mut scanner = Scanner::new(r#"'\uD83D\uDE00' '\uD83D'"#);
        scanner.scan();
        assert_eq!(scanner.token_value(), "\u{1F600}");
        scanner.scan();
        assert_eq!(scanner.token_value(), "\u{FFFD}");
    }

    #[test]
    fn test_unterminated_string() {
        let mut scanner = Scanner::new("'abc\nx");
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert!(scanner.is_unterminated());
        assert_eq!(scanner.token_value(), "abc");
        assert_eq!(scanner.diagnostics().len(), 1);
        assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1002);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert!(scanner.has_preceding_line_break());
    }

    #[test]
    fn test_extended_escape_out_of_range() {
        let mut scanner = Scanner::new(r#""\u{110000}""#);
        scanner.scan();
        assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1198);
    }

    #[test]
    fn test_scan_template_literal() {
        let mut scanner = Scanner::new("`hello`");
        assert_eq!(scanner.scan(), SyntaxKind::NoSubstitutionTemplateLiteral);
        assert_eq!(scanner.token_value(), "hello");
    }

    #[test]
    fn test_template_head_and_rescan() {
        let mut scanner = Scanner::new("`a${x}b${y}c`");
        assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
        assert_eq!(scanner.token_value(), "a");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
        assert_eq!(scanner.re_scan_template_token(false), SyntaxKind::TemplateMiddle);
        assert_eq!(scanner.token_value(), "b");
        scanner.scan();
        scanner.scan();
        assert_eq!(scanner.re_scan_template_token(false), SyntaxKind::TemplateTail);
        assert_eq!(scanner.token_value(), "c");
    }

    #[test]
    fn test_template_normalizes_carriage_returns() {
        let mut scanner = Scanner::new("`a\r\nb\rc`");
        scanner.scan();
        assert_eq!(scanner.token_value(), "a\nb\nc");
    }

    #[test]
    fn test_scan_number_formats() {
        let cases = [
            ("42", "42"),
            ("3.14", "3.14"),
            ("1e3", "1000"),
            ("1.50", "1.5"),
            ("0x1F", "31"),
            ("0b101", "5"),
            ("0o17", "15"),
            ("017", "15"),
            ("1_000_000", "1000000"),
            (".5", "0.5"),
            ("1e21", "1e+21"),
        ];
        for (text, expected) in cases {
            let mut scanner = Scanner::new(text);
            assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral, "{text}");
            assert_eq!(scanner.token_value(), expected, "{text}");
            assert!(scanner.diagnostics().is_empty(), "{text}");
        }
    }

    #[test]
    fn test_legacy_octal_flag() {
        let mut scanner = Scanner::new("017 019");
        scanner.scan();
        assert!(scanner.token_flags().contains(TokenFlags::OCTAL));
        scanner.scan();
        assert_eq!(scanner.token_value(), "19");
        assert!(scanner.token_flags().contains(TokenFlags::CONTAINS_LEADING_ZERO));
    }

    #[test]
    fn test_scan_bigint() {
        let mut scanner = Scanner::new("123n 0xFFn");
        assert_eq!(scanner.scan(), SyntaxKind::BigIntLiteral);
        assert_eq!(scanner.token_value(), "123n");
        assert_eq!(scanner.scan(), SyntaxKind::BigIntLiteral);
        assert_eq!(scanner.token_value(), "255n");
    }

    #[test]
    fn test_numeric_separator_errors() {
        let mut scanner = Scanner::new("1__0 1_");
        scanner.scan();
        scanner.scan();
        let codes: Vec<u32> = scanner.diagnostics().iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![6189, 6188]);
    }

    #[test]
    fn test_missing_exponent_digits() {
        let mut scanner = Scanner::new("1e+");
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1124);
    }

    #[test]
    fn test_identifier_after_number() {
        let mut scanner = Scanner::new("3in");
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        let diagnostic = &scanner.diagnostics().diagnostics()[0];
        assert_eq!(diagnostic.code, 1351);
        assert_eq!(diagnostic.start(), 1);
        assert_eq!(diagnostic.length(), 2);
        assert_eq!(scanner.scan(), SyntaxKind::InKeyword);
    }

    #[test]
    fn test_scan_comments_and_trivia_mode() {
        assert_eq!(
            scan_all("// line\n/* block */ x"),
            vec![SyntaxKind::Identifier]
        );
        let mut scanner = Scanner::new("// c\n/* d */ x");
        scanner.set_skip_trivia(false);
        let mut kinds = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            kinds.push(kind);
        }
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::SingleLineCommentTrivia,
                SyntaxKind::NewLineTrivia,
                SyntaxKind::MultiLineCommentTrivia,
                SyntaxKind::WhitespaceTrivia,
                SyntaxKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_jsdoc_comment_flag() {
        let mut scanner = Scanner::new("/** doc */ x");
        scanner.scan();
        assert!(scanner.has_preceding_jsdoc_comment());
        let mut scanner = Scanner::new("/**/ x");
        scanner.scan();
        assert!(!scanner.has_preceding_jsdoc_comment());
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut scanner = Scanner::new("/* open");
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
        assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1010);
    }

    #[test]
    fn test_shebang() {
        let mut scanner = Scanner::new("#!/usr/bin/env node\nlet");
        assert_eq!(scanner.scan(), SyntaxKind::LetKeyword);
        let mut scanner = Scanner::new("#!/usr/bin/env node\nlet");
        scanner.set_skip_trivia(false);
        assert_eq!(scanner.scan(), SyntaxKind::ShebangTrivia);
    }

    #[test]
    fn test_private_identifier() {
        let mut scanner = Scanner::new("#secret");
        assert_eq!(scanner.scan(), SyntaxKind::PrivateIdentifier);
        assert_eq!(scanner.token_value(), "#secret");
    }

    #[test]
    fn test_rescan_slash_as_regex() {
        let mut scanner = Scanner::new("/ab[/]c\\/d/gi;");
        assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
        assert_eq!(scanner.re_scan_slash_token(), SyntaxKind::RegularExpressionLiteral);
        assert_eq!(scanner.token_value(), "/ab[/]c\\/d/gi");
        assert_eq!(scanner.scan(), SyntaxKind::SemicolonToken);
    }

    #[test]
    fn test_unterminated_regex() {
        let mut scanner = Scanner::new("/abc\n");
        scanner.scan();
        scanner.re_scan_slash_token();
        assert!(scanner.is_unterminated());
        assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1161);
    }

    #[test]
    fn test_conflict_marker_run() {
        let text = "<<<<<<< HEAD\nx\n=======\ny\n>>>>>>> branch\nz";
        let mut scanner = Scanner::new(text);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "x");
        // The `=======` section is skipped up to the closing marker.
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "z");
        let codes: Vec<u32> = scanner.diagnostics().iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![1185, 1185, 1185]);
    }

    #[test]
    fn test_scan_jsx_text() {
        let mut scanner = Scanner::new("hello world</div>");
        scanner.set_language_variant(LanguageVariant::JSX);
        assert_eq!(scanner.scan_jsx_token(true), SyntaxKind::JsxText);
        assert_eq!(scanner.token_value(), "hello world");
        assert_eq!(scanner.scan_jsx_token(true), SyntaxKind::LessThanSlashToken);
    }

    #[test]
    fn test_jsx_whitespace_only_text() {
        let mut scanner = Scanner::new("\n   <a/>");
        assert_eq!(scanner.scan_jsx_token(true), SyntaxKind::JsxTextAllWhiteSpaces);
    }

    #[test]
    fn test_scan_jsx_identifier() {
        let mut scanner = Scanner::new("data-foo-bar=");
        scanner.set_language_variant(LanguageVariant::JSX);
        scanner.scan();
        assert_eq!(scanner.scan_jsx_identifier(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "data-foo-bar");
    }

    #[test]
    fn test_jsx_attribute_value_keeps_backslashes() {
        let mut scanner = Scanner::new(r#""a\nb""#);
        assert_eq!(scanner.scan_jsx_attribute_value(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "a\\nb");
    }

    #[test]
    fn test_look_ahead_restores_state() {
        let mut scanner = Scanner::new("a b c");
        scanner.scan();
        let next = scanner.look_ahead(|s| {
            s.scan();
            s.scan()
        });
        assert_eq!(next, SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "a");
        assert_eq!(scanner.token_end(), 1);
    }

    #[test]
    fn test_try_scan_commits_on_some() {
        let mut scanner = Scanner::new("a b");
        scanner.scan();
        let failed: Option<()> = scanner.try_scan(|s| {
            s.scan();
            None
        });
        assert!(failed.is_none());
        assert_eq!(scanner.token_value(), "a");
        let committed = scanner.try_scan(|s| Some(s.scan()));
        assert_eq!(committed, Some(SyntaxKind::Identifier));
        assert_eq!(scanner.token_value(), "b");
    }

    #[test]
    fn test_error_callback() {
        let mut errors = Vec::new();
        {
            let mut scanner = Scanner::new("a ¤ b");
            scanner.set_on_error(Box::new(|message: &'static DiagnosticMessage, pos: TextPos, length: u32| {
                errors.push((message.code, pos, length))
            }));
            while scanner.scan() != SyntaxKind::EndOfFileToken {}
        }
        assert_eq!(errors, vec![(1127, 2, 2)]);
    }

    #[test]
    fn test_text_range() {
        let mut scanner = Scanner::new("aaa bbb ccc");
        scanner.set_text_range(4, 3);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "bbb");
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn test_digits_to_decimal() {
        assert_eq!(digits_to_decimal("FFFFFFFFFFFFFFFFFFFF", 16), "1208925819614629174706175");
        assert_eq!(digits_to_decimal("0", 10), "0");
        assert_eq!(digits_to_decimal("777", 8), "511");
    }
}
