//! List parsing contexts.
//!
//! Every list the parser reads (statements, members, parameters, type
//! arguments, ...) runs under a [`ParsingContext`]. The context selects the
//! element and terminator predicates and the diagnostic reported for a token
//! that is neither. Nested lists are tracked in a [`ParsingContexts`] set so
//! an inner list can tell whether an enclosing one will consume a token it
//! cannot use.

use tsdecl_ast::{token_to_string, SyntaxKind};
use tsdecl_diagnostics::{messages, DiagnosticMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsingContext {
    SourceElements,
    BlockStatements,
    SwitchClauses,
    SwitchClauseStatements,
    TypeMembers,
    ClassMembers,
    EnumMembers,
    HeritageClauseElement,
    VariableDeclarations,
    ObjectBindingElements,
    ArrayBindingElements,
    ArgumentExpressions,
    ObjectLiteralMembers,
    JsxAttributes,
    JsxChildren,
    ArrayLiteralMembers,
    Parameters,
    TypeParameters,
    TypeArguments,
    TupleElementTypes,
    HeritageClauses,
    ImportOrExportSpecifiers,
}

impl ParsingContext {
    /// Every context, in declaration order.
    pub const ALL: [ParsingContext; 22] = [
        ParsingContext::SourceElements,
        ParsingContext::BlockStatements,
        ParsingContext::SwitchClauses,
        ParsingContext::SwitchClauseStatements,
        ParsingContext::TypeMembers,
        ParsingContext::ClassMembers,
        ParsingContext::EnumMembers,
        ParsingContext::HeritageClauseElement,
        ParsingContext::VariableDeclarations,
        ParsingContext::ObjectBindingElements,
        ParsingContext::ArrayBindingElements,
        ParsingContext::ArgumentExpressions,
        ParsingContext::ObjectLiteralMembers,
        ParsingContext::JsxAttributes,
        ParsingContext::JsxChildren,
        ParsingContext::ArrayLiteralMembers,
        ParsingContext::Parameters,
        ParsingContext::TypeParameters,
        ParsingContext::TypeArguments,
        ParsingContext::TupleElementTypes,
        ParsingContext::HeritageClauses,
        ParsingContext::ImportOrExportSpecifiers,
    ];

    #[inline]
    fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// The diagnostic for a token that can neither start an element of this
    /// list nor end it, with its single argument when the message has one.
    pub fn error_message(self, token: SyntaxKind) -> (&'static DiagnosticMessage, Option<&'static str>) {
        match self {
            ParsingContext::SourceElements if token == SyntaxKind::DefaultKeyword => {
                (&messages::_0_EXPECTED, Some("export"))
            }
            ParsingContext::SourceElements | ParsingContext::BlockStatements => {
                (&messages::DECLARATION_OR_STATEMENT_EXPECTED, None)
            }
            ParsingContext::SwitchClauses => (&messages::CASE_OR_DEFAULT_EXPECTED, None),
            ParsingContext::SwitchClauseStatements => (&messages::STATEMENT_EXPECTED, None),
            ParsingContext::TypeMembers => (&messages::PROPERTY_OR_SIGNATURE_EXPECTED, None),
            ParsingContext::ClassMembers => (
                &messages::UNEXPECTED_TOKEN_A_CONSTRUCTOR_METHOD_ACCESSOR_OR_PROPERTY_WAS_EXPECTED,
                None,
            ),
            ParsingContext::EnumMembers => (&messages::ENUM_MEMBER_EXPECTED, None),
            ParsingContext::HeritageClauseElement => (&messages::EXPRESSION_EXPECTED, None),
            ParsingContext::VariableDeclarations if token.is_keyword() => (
                &messages::_0_IS_NOT_ALLOWED_AS_A_VARIABLE_DECLARATION_NAME,
                token_to_string(token),
            ),
            ParsingContext::VariableDeclarations => (&messages::VARIABLE_DECLARATION_EXPECTED, None),
            ParsingContext::ObjectBindingElements => (&messages::PROPERTY_DESTRUCTURING_PATTERN_EXPECTED, None),
            ParsingContext::ArrayBindingElements => (&messages::ARRAY_ELEMENT_DESTRUCTURING_PATTERN_EXPECTED, None),
            ParsingContext::ArgumentExpressions => (&messages::ARGUMENT_EXPRESSION_EXPECTED, None),
            ParsingContext::ObjectLiteralMembers => (&messages::PROPERTY_ASSIGNMENT_EXPECTED, None),
            ParsingContext::ArrayLiteralMembers => (&messages::EXPRESSION_OR_COMMA_EXPECTED, None),
            ParsingContext::Parameters if token.is_keyword() => {
                (&messages::_0_IS_NOT_ALLOWED_AS_A_PARAMETER_NAME, token_to_string(token))
            }
            ParsingContext::Parameters => (&messages::PARAMETER_DECLARATION_EXPECTED, None),
            ParsingContext::TypeParameters => (&messages::TYPE_PARAMETER_DECLARATION_EXPECTED, None),
            ParsingContext::TypeArguments => (&messages::TYPE_ARGUMENT_EXPECTED, None),
            ParsingContext::TupleElementTypes => (&messages::TYPE_EXPECTED, None),
            ParsingContext::HeritageClauses => (&messages::UNEXPECTED_TOKEN, None),
            ParsingContext::ImportOrExportSpecifiers if token == SyntaxKind::FromKeyword => {
                (&messages::_0_EXPECTED, Some("}"))
            }
            ParsingContext::ImportOrExportSpecifiers
            | ParsingContext::JsxAttributes
            | ParsingContext::JsxChildren => (&messages::IDENTIFIER_EXPECTED, None),
        }
    }
}

/// The set of list contexts currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsingContexts(u32);

impl ParsingContexts {
    pub const NONE: ParsingContexts = ParsingContexts(0);

    #[inline]
    pub fn contains(self, context: ParsingContext) -> bool {
        self.0 & context.bit() != 0
    }

    #[inline]
    pub fn with(self, context: ParsingContext) -> ParsingContexts {
        ParsingContexts(self.0 | context.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = ParsingContext> {
        ParsingContext::ALL.into_iter().filter(move |context| self.contains(*context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_fit_in_set() {
        assert!(ParsingContext::ALL.len() <= 32);
        for (index, context) in ParsingContext::ALL.iter().enumerate() {
            assert_eq!(*context as usize, index);
        }
    }

    #[test]
    fn test_set_membership() {
        let set = ParsingContexts::NONE
            .with(ParsingContext::SourceElements)
            .with(ParsingContext::TypeMembers);
        assert!(set.contains(ParsingContext::TypeMembers));
        assert!(!set.contains(ParsingContext::Parameters));
        let open: Vec<_> = set.iter().collect();
        assert_eq!(open, vec![ParsingContext::SourceElements, ParsingContext::TypeMembers]);
    }

    #[test]
    fn test_keyword_parameter_message() {
        let (message, arg) = ParsingContext::Parameters.error_message(SyntaxKind::ClassKeyword);
        assert_eq!(message.code, 1390);
        assert_eq!(arg, Some("class"));
        let (message, arg) = ParsingContext::Parameters.error_message(SyntaxKind::CommaToken);
        assert_eq!(message.code, 1138);
        assert_eq!(arg, None);
    }

    #[test]
    fn test_default_in_source_elements() {
        let (message, arg) = ParsingContext::SourceElements.error_message(SyntaxKind::DefaultKeyword);
        assert_eq!(message.code, 1005);
        assert_eq!(arg, Some("export"));
    }
}
