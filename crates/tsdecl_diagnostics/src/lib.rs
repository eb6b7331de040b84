//! tsdecl_diagnostics: Diagnostic messages and error reporting.
//!
//! Every problem the scanner or parser finds in its input is reported as a
//! [`Diagnostic`] rather than a Rust error: parsing always completes, and
//! callers decide from the collected diagnostics which regions to trust.
//! Message codes and texts follow the TypeScript compiler's catalogue so the
//! output reads the same as `tsc`.

use std::fmt;
use tsdecl_core::text::TextSpan;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Suggestion => write!(f, "suggestion"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A message template with a code and category. May contain `{0}`, `{1}`
/// placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// A diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn with_location(
        file: impl Into<String>,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: Some(file.into()),
            span: Some(span),
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Start offset, or 0 for global diagnostics.
    pub fn start(&self) -> u32 {
        self.span.map_or(0, |span| span.start)
    }

    pub fn length(&self) -> u32 {
        self.span.map_or(0, |span| span.length)
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} TS{}: {}", self.category, self.code, self.message_text)
    }
}

/// Replace `{0}`, `{1}`, ... in `template` with `args`.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Diagnostics accumulated during one parse, in report order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn last(&self) -> Option<&Diagnostic> {
        self.diagnostics.last()
    }

    /// Drop every diagnostic past `len`. Used to roll back speculative parses.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort by file, then start position. Stable, so equal starts keep
    /// report order.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by(|a, b| a.file.cmp(&b.file).then(a.start().cmp(&b.start())));
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
    }

    // ========================================================================
    // Lexical errors
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, "Unterminated string literal.");
    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = diag!(1010, Error, "'*/' expected.");
    pub const DIGIT_EXPECTED: DiagnosticMessage = diag!(1124, Error, "Digit expected.");
    pub const HEXADECIMAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1125, Error, "Hexadecimal digit expected.");
    pub const UNEXPECTED_END_OF_TEXT: DiagnosticMessage = diag!(1126, Error, "Unexpected end of text.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1127, Error, "Invalid character.");
    pub const UNTERMINATED_TEMPLATE_LITERAL: DiagnosticMessage = diag!(1160, Error, "Unterminated template literal.");
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: DiagnosticMessage = diag!(1161, Error, "Unterminated regular expression literal.");
    pub const MERGE_CONFLICT_MARKER_ENCOUNTERED: DiagnosticMessage = diag!(1185, Error, "Merge conflict marker encountered.");
    pub const AN_EXTENDED_UNICODE_ESCAPE_VALUE_MUST_BE_BETWEEN_0X0_AND_0X10FFFF_INCLUSIVE: DiagnosticMessage = diag!(1198, Error, "An extended Unicode escape value must be between 0x0 and 0x10FFFF inclusive.");
    pub const UNTERMINATED_UNICODE_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1199, Error, "Unterminated Unicode escape sequence.");
    pub const AN_IDENTIFIER_OR_KEYWORD_CANNOT_IMMEDIATELY_FOLLOW_A_NUMERIC_LITERAL: DiagnosticMessage = diag!(1351, Error, "An identifier or keyword cannot immediately follow a numeric literal.");
    pub const HASH_BANG_CAN_ONLY_BE_USED_AT_THE_START_OF_A_FILE: DiagnosticMessage = diag!(18026, Error, "'#!' can only be used at the start of a file.");
    pub const NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE: DiagnosticMessage = diag!(6188, Error, "Numeric separators are not allowed here.");
    pub const MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS_ARE_NOT_PERMITTED: DiagnosticMessage = diag!(6189, Error, "Multiple consecutive numeric separators are not permitted.");

    // ========================================================================
    // Syntactic errors
    // ========================================================================
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1003, Error, "Identifier expected.");
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1005, Error, "'{0}' expected.");
    pub const AN_ELEMENT_ACCESS_EXPRESSION_SHOULD_TAKE_AN_ARGUMENT: DiagnosticMessage = diag!(1011, Error, "An element access expression should take an argument.");
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1012, Error, "Unexpected token.");
    pub const UNEXPECTED_TOKEN_A_CONSTRUCTOR_METHOD_ACCESSOR_OR_PROPERTY_WAS_EXPECTED: DiagnosticMessage = diag!(1068, Error, "Unexpected token. A constructor, method, accessor, or property was expected.");
    pub const TYPE_PARAMETER_LIST_CANNOT_BE_EMPTY: DiagnosticMessage = diag!(1098, Error, "Type parameter list cannot be empty.");
    pub const TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY: DiagnosticMessage = diag!(1099, Error, "Type argument list cannot be empty.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1109, Error, "Expression expected.");
    pub const TYPE_EXPECTED: DiagnosticMessage = diag!(1110, Error, "Type expected.");
    pub const DECLARATION_OR_STATEMENT_EXPECTED: DiagnosticMessage = diag!(1128, Error, "Declaration or statement expected.");
    pub const STATEMENT_EXPECTED: DiagnosticMessage = diag!(1129, Error, "Statement expected.");
    pub const CASE_OR_DEFAULT_EXPECTED: DiagnosticMessage = diag!(1130, Error, "'case' or 'default' expected.");
    pub const PROPERTY_OR_SIGNATURE_EXPECTED: DiagnosticMessage = diag!(1131, Error, "Property or signature expected.");
    pub const ENUM_MEMBER_EXPECTED: DiagnosticMessage = diag!(1132, Error, "Enum member expected.");
    pub const VARIABLE_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1134, Error, "Variable declaration expected.");
    pub const ARGUMENT_EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1135, Error, "Argument expression expected.");
    pub const PROPERTY_ASSIGNMENT_EXPECTED: DiagnosticMessage = diag!(1136, Error, "Property assignment expected.");
    pub const EXPRESSION_OR_COMMA_EXPECTED: DiagnosticMessage = diag!(1137, Error, "Expression or comma expected.");
    pub const PARAMETER_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1138, Error, "Parameter declaration expected.");
    pub const TYPE_PARAMETER_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1139, Error, "Type parameter declaration expected.");
    pub const TYPE_ARGUMENT_EXPECTED: DiagnosticMessage = diag!(1140, Error, "Type argument expected.");
    pub const LINE_BREAK_NOT_PERMITTED_HERE: DiagnosticMessage = diag!(1142, Error, "Line break not permitted here.");
    pub const OR_EXPECTED: DiagnosticMessage = diag!(1144, Error, "'{' or ';' expected.");
    pub const DECLARATION_EXPECTED: DiagnosticMessage = diag!(1146, Error, "Declaration expected.");
    pub const PROPERTY_DESTRUCTURING_PATTERN_EXPECTED: DiagnosticMessage = diag!(1180, Error, "Property destructuring pattern expected.");
    pub const ARRAY_ELEMENT_DESTRUCTURING_PATTERN_EXPECTED: DiagnosticMessage = diag!(1181, Error, "Array element destructuring pattern expected.");
    pub const KEYWORDS_CANNOT_CONTAIN_ESCAPE_CHARACTERS: DiagnosticMessage = diag!(1260, Error, "Keywords cannot contain escape characters.");
    pub const IDENTIFIER_EXPECTED_0_IS_A_RESERVED_WORD_THAT_CANNOT_BE_USED_HERE: DiagnosticMessage = diag!(1359, Error, "Identifier expected. '{0}' is a reserved word that cannot be used here.");
    pub const UNEXPECTED_TOKEN_DID_YOU_MEAN_OR_RBRACE: DiagnosticMessage = diag!(1381, Error, "Unexpected token. Did you mean `{'}'}` or `&rbrace;`?");
    pub const UNEXPECTED_TOKEN_DID_YOU_MEAN_OR_GT: DiagnosticMessage = diag!(1382, Error, "Unexpected token. Did you mean `{'>'}` or `&gt;`?");
    pub const CATCH_OR_FINALLY_EXPECTED: DiagnosticMessage = diag!(1472, Error, "'catch' or 'finally' expected.");
    pub const AN_ENUM_MEMBER_NAME_MUST_BE_FOLLOWED_BY_A_OR: DiagnosticMessage = diag!(1357, Error, "An enum member name must be followed by a ',', '=', or '}'.");
    pub const _0_IS_NOT_ALLOWED_AS_A_VARIABLE_DECLARATION_NAME: DiagnosticMessage = diag!(1389, Error, "'{0}' is not allowed as a variable declaration name.");
    pub const _0_IS_NOT_ALLOWED_AS_A_PARAMETER_NAME: DiagnosticMessage = diag!(1390, Error, "'{0}' is not allowed as a parameter name.");
    pub const PRIVATE_IDENTIFIERS_ARE_NOT_ALLOWED_OUTSIDE_CLASS_BODIES: DiagnosticMessage = diag!(18016, Error, "Private identifiers are not allowed outside class bodies.");
    pub const NAMESPACE_MUST_BE_GIVEN_A_NAME: DiagnosticMessage = diag!(1437, Error, "Namespace must be given a name.");
    pub const UNKNOWN_KEYWORD_OR_IDENTIFIER_DID_YOU_MEAN_0: DiagnosticMessage = diag!(1435, Error, "Unknown keyword or identifier. Did you mean '{0}'?");
    pub const AN_INSTANTIATION_EXPRESSION_CANNOT_BE_FOLLOWED_BY_A_PROPERTY_ACCESS: DiagnosticMessage = diag!(1477, Error, "An instantiation expression cannot be followed by a property access.");
    pub const UNEXPECTED_KEYWORD_OR_IDENTIFIER: DiagnosticMessage = diag!(1434, Error, "Unexpected keyword or identifier.");
    pub const AN_UNARY_EXPRESSION_CANNOT_APPEAR_ON_THE_LEFT_HAND_SIDE_OF_AN_EXPONENTIATION_EXPRESSION: DiagnosticMessage = diag!(17006, Error, "An unary expression with the '{0}' operator is not allowed in the left-hand side of an exponentiation expression. Consider enclosing the expression in parentheses.");
    pub const EXPECTED_CORRESPONDING_JSX_CLOSING_TAG_FOR_0: DiagnosticMessage = diag!(17002, Error, "Expected corresponding JSX closing tag for '{0}'.");
    pub const JSX_ELEMENT_0_HAS_NO_CORRESPONDING_CLOSING_TAG: DiagnosticMessage = diag!(17008, Error, "JSX element '{0}' has no corresponding closing tag.");
    pub const JSX_FRAGMENT_HAS_NO_CORRESPONDING_CLOSING_TAG: DiagnosticMessage = diag!(17014, Error, "JSX fragment has no corresponding closing tag.");
    pub const EXPECTED_CORRESPONDING_CLOSING_TAG_FOR_JSX_FRAGMENT: DiagnosticMessage = diag!(17015, Error, "Expected corresponding closing tag for JSX fragment.");
    pub const FUNCTION_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_A_UNION_TYPE: DiagnosticMessage = diag!(1385, Error, "Function type notation must be parenthesized when used in a union type.");
    pub const CONSTRUCTOR_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_A_UNION_TYPE: DiagnosticMessage = diag!(1386, Error, "Constructor type notation must be parenthesized when used in a union type.");
    pub const FUNCTION_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_AN_INTERSECTION_TYPE: DiagnosticMessage = diag!(1387, Error, "Function type notation must be parenthesized when used in an intersection type.");
    pub const CONSTRUCTOR_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_AN_INTERSECTION_TYPE: DiagnosticMessage = diag!(1388, Error, "Constructor type notation must be parenthesized when used in an intersection type.");
    pub const A_TYPE_ASSERTION_EXPRESSION_IS_NOT_ALLOWED_IN_THE_LEFT_HAND_SIDE_OF_AN_EXPONENTIATION_EXPRESSION: DiagnosticMessage = diag!(17007, Error, "A type assertion expression is not allowed in the left-hand side of an exponentiation expression. Consider enclosing the expression in parentheses.");
    pub const SUPER_MAY_NOT_USE_TYPE_ARGUMENTS: DiagnosticMessage = diag!(2754, Error, "'super' may not use type arguments.");
    pub const SUPER_MUST_BE_FOLLOWED_BY_AN_ARGUMENT_LIST_OR_MEMBER_ACCESS: DiagnosticMessage = diag!(17011, Error, "'super' must be followed by an argument list or member access.");
    pub const INVALID_OPTIONAL_CHAIN_FROM_NEW_EXPRESSION_DID_YOU_MEAN_TO_CALL_0: DiagnosticMessage = diag!(1209, Error, "Invalid optional chain from new expression. Did you mean to call '{0}()'?");
    pub const AN_OPTIONAL_CHAIN_CANNOT_CONTAIN_PRIVATE_IDENTIFIERS: DiagnosticMessage = diag!(18030, Error, "An optional chain cannot contain private identifiers.");
    pub const OR_JSX_ELEMENT_EXPECTED: DiagnosticMessage = diag!(1145, Error, "'{' or JSX element expected.");
    pub const JSX_EXPRESSIONS_MUST_HAVE_ONE_PARENT_ELEMENT: DiagnosticMessage = diag!(2657, Error, "JSX expressions must have one parent element.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let msg = format_message(messages::_0_EXPECTED.message, &[";"]);
        assert_eq!(msg, "';' expected.");
    }

    #[test]
    fn test_format_message_keeps_braces_without_args() {
        let msg = format_message(messages::OR_EXPECTED.message, &[]);
        assert_eq!(msg, "'{' or ';' expected.");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::with_location(
            "dom.d.ts",
            TextSpan::new(10, 5),
            &messages::_0_EXPECTED,
            &["}"],
        );
        assert_eq!(diag.to_string(), "dom.d.ts(10): error TS1005: '}' expected.");
    }

    #[test]
    fn test_diagnostic_without_location() {
        let diag = Diagnostic::new(&messages::UNEXPECTED_TOKEN, &[]);
        assert!(diag.file.is_none());
        assert_eq!(diag.start(), 0);
        assert_eq!(diag.code, 1012);
        assert!(diag.is_error());
    }

    #[test]
    fn test_diagnostic_collection_truncate() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::new(&messages::UNEXPECTED_TOKEN, &[]));
        collection.add(Diagnostic::new(&messages::TYPE_EXPECTED, &[]));
        collection.truncate(1);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.last().map(|d| d.code), Some(1012));
    }

    #[test]
    fn test_diagnostic_collection_sort() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::with_location("b.d.ts", TextSpan::new(10, 1), &messages::UNEXPECTED_TOKEN, &[]));
        collection.add(Diagnostic::with_location("a.d.ts", TextSpan::new(5, 1), &messages::IDENTIFIER_EXPECTED, &[]));
        collection.add(Diagnostic::with_location("a.d.ts", TextSpan::new(1, 1), &messages::TYPE_EXPECTED, &[]));
        collection.sort();
        let order: Vec<u32> = collection.iter().map(|d| d.code).collect();
        assert_eq!(order, vec![1110, 1003, 1012]);
    }
}
