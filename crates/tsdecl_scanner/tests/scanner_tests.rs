//! Scanner integration tests.
//!
//! Verifies that the scanner tokenizes TypeScript constructs, reports
//! lexical errors at the right spans, and supports the parser's rescans.

use tsdecl_ast::syntax_kind::SyntaxKind;
use tsdecl_ast::{LanguageVariant, ScriptTarget, TokenFlags, KEYWORDS, PUNCTUATORS};
use tsdecl_scanner::{get_leading_comment_ranges, tokenize, Scanner};

/// Helper: scan all tokens from source and return as (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_value().to_string()));
    }
    tokens
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

/// Helper: error codes reported while scanning the whole source.
fn scan_error_codes(source: &str) -> Vec<u32> {
    let mut scanner = Scanner::new(source);
    while scanner.scan() != SyntaxKind::EndOfFileToken {}
    scanner.diagnostics().iter().map(|d| d.code).collect()
}

#[test]
fn test_empty_source() {
    let tokens = scan_all("");
    assert!(tokens.is_empty());
}

#[test]
fn test_whitespace_only() {
    let tokens = scan_all("   \n\t  ");
    assert!(tokens.is_empty());
}

#[test]
fn test_eof_is_sticky() {
    let mut scanner = Scanner::new("x");
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    assert_eq!(scanner.token_start(), 1);
}

// --- Token tables ---

#[test]
fn test_every_keyword_scans_to_its_kind() {
    for &(text, kind) in KEYWORDS {
        let mut scanner = Scanner::new(text);
        assert_eq!(scanner.scan(), kind, "{text}");
        assert_eq!(scanner.token_end() as usize, text.len(), "{text}");
    }
}

#[test]
fn test_every_punctuator_scans_to_its_kind() {
    for &(text, kind) in PUNCTUATORS {
        // `#` and a lone backtick start larger tokens; `</` exists only in JSX.
        if matches!(text, "#" | "`" | "</") {
            continue;
        }
        let mut scanner = Scanner::new(text);
        let mut scanned = scanner.scan();
        if scanned == SyntaxKind::GreaterThanToken {
            scanned = scanner.re_scan_greater_token();
        }
        assert_eq!(scanned, kind, "{text}");
        assert_eq!(scanner.token_end() as usize, text.len(), "{text}");
    }
}

#[test]
fn test_less_than_slash_only_in_jsx() {
    assert_eq!(
        scan_kinds("</"),
        vec![SyntaxKind::LessThanToken, SyntaxKind::SlashToken]
    );
    let mut scanner = Scanner::new("</").with_language(ScriptTarget::ESNext, LanguageVariant::JSX);
    assert_eq!(scanner.scan(), SyntaxKind::LessThanSlashToken);
}

// --- Literals ---

#[test]
fn test_numeric_literals() {
    let tokens = scan_all("42");
    assert_eq!(tokens, vec![(SyntaxKind::NumericLiteral, "42".to_string())]);

    let tokens = scan_all("3.14");
    assert_eq!(tokens[0].1, "3.14");

    let tokens = scan_all("0xFF");
    assert_eq!(tokens[0].1, "255");

    let tokens = scan_all("0b1010");
    assert_eq!(tokens[0].1, "10");
}

#[test]
fn test_scientific_notation() {
    let mut scanner = Scanner::new("1.5e+10");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.token_value(), "15000000000");
    assert!(scanner.token_flags().contains(TokenFlags::SCIENTIFIC));

    let tokens = scan_all("1e-5 1E3");
    assert_eq!(tokens[0].1, "0.00001");
    assert_eq!(tokens[1].1, "1000");
}

#[test]
fn test_numeric_separator() {
    let mut scanner = Scanner::new("0xFF_FF");
    scanner.scan();
    assert_eq!(scanner.token_value(), "65535");
    assert!(scanner.token_flags().contains(TokenFlags::CONTAINS_SEPARATOR));
    assert!(scanner.token_flags().contains(TokenFlags::HEX_SPECIFIER));
    assert!(scanner.diagnostics().is_empty());

    assert_eq!(scan_all("0b1010_0101")[0].1, "165");
    assert_eq!(scan_all("0o77_77")[0].1, "4095");
}

#[test]
fn test_misplaced_separators() {
    assert_eq!(scan_error_codes("1__2"), vec![6189]);
    assert_eq!(scan_error_codes("12_"), vec![6188]);
    assert_eq!(scan_error_codes("0x_1"), vec![6188]);
}

#[test]
fn test_bigint_literals() {
    let tokens = scan_all("0b1010n 0o77n 0xDEADn 0n");
    let values: Vec<&str> = tokens.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["10n", "63n", "57005n", "0n"]);
    assert!(tokens.iter().all(|(k, _)| *k == SyntaxKind::BigIntLiteral));
}

#[test]
fn test_bigint_keeps_full_precision() {
    let tokens = scan_all("999999999999999999999n");
    assert_eq!(tokens[0].1, "999999999999999999999n");
}

#[test]
fn test_missing_hex_digits() {
    assert_eq!(scan_error_codes("0x"), vec![1125]);
    assert_eq!(scan_error_codes("0b"), vec![1124]);
}

#[test]
fn test_string_literals() {
    let tokens = scan_all(r#""hello" 'world'"#);
    assert_eq!(
        tokens,
        vec![
            (SyntaxKind::StringLiteral, "hello".to_string()),
            (SyntaxKind::StringLiteral, "world".to_string()),
        ]
    );
}

#[test]
fn test_string_escapes() {
    let tokens = scan_all(r#""\b\f\v\0\101\x7eé\u{10FFFF}""#);
    assert_eq!(tokens[0].1, "\u{8}\u{c}\u{b}\0A~é\u{10FFFF}");
}

#[test]
fn test_string_line_continuation() {
    let tokens = scan_all("'a\\\nb'");
    assert_eq!(tokens[0].1, "ab");
}

#[test]
fn test_unterminated_unicode_escape() {
    assert_eq!(scan_error_codes(r#""\u{41""#), vec![1199]);
}

#[test]
fn test_template_literal() {
    let tokens = scan_all("`hello ${");
    assert_eq!(tokens[0], (SyntaxKind::TemplateHead, "hello ".to_string()));
}

#[test]
fn test_unterminated_template() {
    let mut scanner = Scanner::new("`abc");
    assert_eq!(scanner.scan(), SyntaxKind::NoSubstitutionTemplateLiteral);
    assert!(scanner.is_unterminated());
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1160);
}

#[test]
fn test_tagged_template_invalid_escape_is_flagged_not_reported() {
    let mut scanner = Scanner::new("`${x}\\unicode`");
    scanner.scan();
    scanner.scan();
    scanner.scan();
    assert_eq!(scanner.re_scan_template_token(true), SyntaxKind::TemplateTail);
    assert!(scanner.token_flags().contains(TokenFlags::CONTAINS_INVALID_ESCAPE));
    assert!(scanner.diagnostics().is_empty());
}

// --- Identifiers and keywords ---

#[test]
fn test_identifiers() {
    let tokens = scan_all("foo _bar $baz qux123");
    let values: Vec<&str> = tokens.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["foo", "_bar", "$baz", "qux123"]);
    assert!(tokens.iter().all(|(k, _)| *k == SyntaxKind::Identifier));
}

#[test]
fn test_typescript_specific_keywords() {
    let kinds = scan_kinds("async await readonly abstract declare override satisfies");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::AsyncKeyword,
            SyntaxKind::AwaitKeyword,
            SyntaxKind::ReadonlyKeyword,
            SyntaxKind::AbstractKeyword,
            SyntaxKind::DeclareKeyword,
            SyntaxKind::OverrideKeyword,
            SyntaxKind::SatisfiesKeyword,
        ]
    );
}

#[test]
fn test_variable_declaration_tokens() {
    let kinds = scan_kinds("const x: number = 42;");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::ConstKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::ColonToken,
            SyntaxKind::NumberKeyword,
            SyntaxKind::EqualsToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::SemicolonToken,
        ]
    );
}

#[test]
fn test_es5_target_rejects_astral_identifier() {
    let mut scanner = Scanner::new("\u{1D400}").with_language(ScriptTarget::ES5, LanguageVariant::Standard);
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    let mut scanner = Scanner::new("\u{1D400}");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
}

#[test]
fn test_lone_hash_is_private_identifier_with_error() {
    let mut scanner = Scanner::new("# x");
    assert_eq!(scanner.scan(), SyntaxKind::PrivateIdentifier);
    assert_eq!(scanner.token_value(), "#");
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1127);
}

#[test]
fn test_hash_bang_not_at_start() {
    assert_eq!(scan_error_codes("x\n#!"), vec![18026]);
}

// --- Trivia ---

#[test]
fn test_comments_skipped() {
    let tokens = scan_all("// this is a comment\n42");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].0, SyntaxKind::NumericLiteral);

    let tokens = scan_all("/* block comment */ 42");
    assert_eq!(tokens.len(), 1);
}

#[test]
fn test_line_break_inside_block_comment() {
    let mut scanner = Scanner::new("a /*\n*/ b");
    scanner.scan();
    scanner.scan();
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_trivia_tokens_cover_the_text() {
    let text = "#!shebang\n  let /* c */ x; // end\r\n";
    let mut scanner = Scanner::new(text);
    scanner.set_skip_trivia(false);
    let mut covered = 0;
    loop {
        let kind = scanner.scan();
        assert_eq!(scanner.token_start() as usize, covered, "gap before {kind:?}");
        covered = scanner.token_end() as usize;
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
    }
    assert_eq!(covered, text.len());
}

#[test]
fn test_crlf_is_one_newline_token() {
    let mut scanner = Scanner::new("\r\n");
    scanner.set_skip_trivia(false);
    assert_eq!(scanner.scan(), SyntaxKind::NewLineTrivia);
    assert_eq!(scanner.token_end(), 2);
}

#[test]
fn test_conflict_marker_in_trivia_mode() {
    let mut scanner = Scanner::new("<<<<<<< HEAD\n");
    scanner.set_skip_trivia(false);
    assert_eq!(scanner.scan(), SyntaxKind::ConflictMarkerTrivia);
    assert_eq!(scanner.token_end(), 12);
}

#[test]
fn test_seven_less_thans_mid_line_are_operators() {
    let kinds = scan_kinds("a <<<<<<< b");
    assert_eq!(kinds[1], SyntaxKind::LessThanLessThanToken);
}

#[test]
fn test_leading_comment_ranges_from_crate_root() {
    let ranges = get_leading_comment_ranges("/** a */ x", 0);
    assert_eq!(ranges.len(), 1);
}

// --- Rescanning ---

#[test]
fn test_regex_literal() {
    let mut scanner = Scanner::new("/pattern/gi");
    assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
    assert_eq!(scanner.re_scan_slash_token(), SyntaxKind::RegularExpressionLiteral);
    assert_eq!(scanner.token_value(), "/pattern/gi");
}

#[test]
fn test_regex_from_slash_equals() {
    let mut scanner = Scanner::new("/=a/");
    assert_eq!(scanner.scan(), SyntaxKind::SlashEqualsToken);
    assert_eq!(scanner.re_scan_slash_token(), SyntaxKind::RegularExpressionLiteral);
    assert_eq!(scanner.token_end(), 4);
}

#[test]
fn test_greater_than_rescan_variants() {
    let cases = [
        (">", SyntaxKind::GreaterThanToken),
        (">=", SyntaxKind::GreaterThanEqualsToken),
        (">>", SyntaxKind::GreaterThanGreaterThanToken),
        (">>=", SyntaxKind::GreaterThanGreaterThanEqualsToken),
        (">>>", SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
        (">>>=", SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
    ];
    for (text, expected) in cases {
        let mut scanner = Scanner::new(text);
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
        assert_eq!(scanner.re_scan_greater_token(), expected, "{text}");
    }
}

#[test]
fn test_nested_generic_close() {
    // Without a rescan `>>` in `A<B<C>>` stays two tokens.
    let kinds = scan_kinds("A<B<C>>");
    assert_eq!(
        &kinds[5..],
        &[SyntaxKind::GreaterThanToken, SyntaxKind::GreaterThanToken]
    );
}

#[test]
fn test_less_than_rescan() {
    let mut scanner = Scanner::new("<<T>");
    assert_eq!(scanner.scan(), SyntaxKind::LessThanLessThanToken);
    assert_eq!(scanner.re_scan_less_than_token(), SyntaxKind::LessThanToken);
    assert_eq!(scanner.scan(), SyntaxKind::LessThanToken);
}

// --- JSX ---

#[test]
fn test_jsx_text_reports_stray_braces() {
    let mut scanner = Scanner::new("a > b } c<").with_language(ScriptTarget::ESNext, LanguageVariant::JSX);
    assert_eq!(scanner.scan_jsx_token(true), SyntaxKind::JsxText);
    let codes: Vec<u32> = scanner.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![1382, 1381]);
}

#[test]
fn test_jsx_text_single_line_mode_stops_at_newline() {
    let mut scanner = Scanner::new("abc\ndef<");
    assert_eq!(scanner.scan_jsx_token(false), SyntaxKind::JsxText);
    assert_eq!(scanner.token_value(), "abc");
}

#[test]
fn test_rescan_jsx_token() {
    let mut scanner = Scanner::new("text{x}").with_language(ScriptTarget::ESNext, LanguageVariant::JSX);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.re_scan_jsx_token(true), SyntaxKind::JsxText);
    assert_eq!(scanner.token_value(), "text");
    assert_eq!(scanner.scan_jsx_token(true), SyntaxKind::OpenBraceToken);
}

#[test]
fn test_tokenize_helper() {
    let tokens = tokenize("<a/>", LanguageVariant::JSX);
    let kinds: Vec<SyntaxKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::SlashToken,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_no_diagnostics_for_valid_source() {
    let mut scanner = Scanner::new("const x = 42; function f<T>(a: T): T { return a; }");
    while scanner.scan() != SyntaxKind::EndOfFileToken {}
    assert_eq!(scanner.diagnostics().len(), 0);
}
