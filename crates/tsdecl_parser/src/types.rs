//! Types, type members, type parameters, and parameter lists.

use bitflags::bitflags;
use tsdecl_ast::{
    ConditionalType, FunctionLike, ImportType, IndexedAccessType, MappedType, NamedTupleMember, NodeFlags, NodeId,
    NodeList, NodeVariant, Parameter, PropertyDeclaration, SyntaxKind, Template, TemplateSpan, TypeOperator,
    TypeParameter, TypePredicate, TypeQuery, TypeReference, Unary, WrappedType,
};
use tsdecl_core::text::TextPos;
use tsdecl_diagnostics::{messages, DiagnosticMessage};

use crate::context::ParsingContext;
use crate::parser::{token_is_identifier_or_keyword, Parser, MAX_RECURSION_DEPTH};

bitflags! {
    /// How a signature's parameters and body are parsed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct SignatureFlags: u8 {
        const NONE = 0;
        const YIELD = 1 << 0;
        const AWAIT = 1 << 1;
        /// A type-level signature: `=>` may stand in for `:` and the body is
        /// a member separator.
        const TYPE = 1 << 2;
        const IGNORE_MISSING_OPEN_BRACE = 1 << 3;
    }
}

/// Context a type may not inherit from the expression around it.
const TYPE_EXCLUDES_FLAGS: NodeFlags = NodeFlags::YIELD_CONTEXT.union(NodeFlags::AWAIT_CONTEXT);

impl<'a> Parser<'a> {
    // ========================================================================
    // Predicates
    // ========================================================================

    pub(crate) fn is_start_of_type(&mut self, in_start_of_parameter: bool) -> bool {
        match self.token() {
            SyntaxKind::AnyKeyword
            | SyntaxKind::UnknownKeyword
            | SyntaxKind::StringKeyword
            | SyntaxKind::NumberKeyword
            | SyntaxKind::BigIntKeyword
            | SyntaxKind::BooleanKeyword
            | SyntaxKind::ReadonlyKeyword
            | SyntaxKind::SymbolKeyword
            | SyntaxKind::UniqueKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::UndefinedKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ThisKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::NeverKeyword
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::LessThanToken
            | SyntaxKind::BarToken
            | SyntaxKind::AmpersandToken
            | SyntaxKind::NewKeyword
            | SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::ObjectKeyword
            | SyntaxKind::AsteriskToken
            | SyntaxKind::QuestionToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::DotDotDotToken
            | SyntaxKind::InferKeyword
            | SyntaxKind::ImportKeyword
            | SyntaxKind::AssertsKeyword
            | SyntaxKind::KeyOfKeyword
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead => true,
            SyntaxKind::FunctionKeyword => !in_start_of_parameter,
            SyntaxKind::MinusToken => {
                !in_start_of_parameter && self.look_ahead(Self::next_token_is_numeric_or_big_int_literal)
            }
            SyntaxKind::OpenParenToken => {
                !in_start_of_parameter && self.look_ahead(Self::is_start_of_parenthesized_or_function_type)
            }
            _ => self.is_identifier(),
        }
    }

    fn is_start_of_parenthesized_or_function_type(&mut self) -> bool {
        self.next_token();
        self.token() == SyntaxKind::CloseParenToken || self.is_start_of_parameter() || self.is_start_of_type(false)
    }

    pub(crate) fn is_start_of_parameter(&mut self) -> bool {
        self.token() == SyntaxKind::DotDotDotToken
            || self.is_binding_identifier_or_private_identifier_or_pattern()
            || self.token().is_modifier_kind()
            || self.token() == SyntaxKind::AtToken
            || self.is_start_of_type(true)
    }

    /// Whether a type member starts here. Runs under look-ahead.
    pub(crate) fn is_type_member_start(&mut self) -> bool {
        if matches!(
            self.token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken | SyntaxKind::GetKeyword | SyntaxKind::SetKeyword
        ) {
            return true;
        }
        let mut id_token = false;
        while self.token().is_modifier_kind() {
            id_token = true;
            self.next_token();
        }
        if self.token() == SyntaxKind::OpenBracketToken {
            return true;
        }
        if self.is_literal_property_name() {
            id_token = true;
            self.next_token();
        }
        if id_token {
            return matches!(
                self.token(),
                SyntaxKind::OpenParenToken
                    | SyntaxKind::LessThanToken
                    | SyntaxKind::QuestionToken
                    | SyntaxKind::ColonToken
                    | SyntaxKind::CommaToken
            ) || self.can_parse_semicolon();
        }
        false
    }

    pub(crate) fn is_index_signature(&mut self) -> bool {
        self.token() == SyntaxKind::OpenBracketToken && self.look_ahead(Self::is_unambiguously_index_signature)
    }

    /// `[a: T]`, `[a?: T]`, `[...`, `[]`, or `[modifier a`. A computed
    /// property name never looks like any of these.
    fn is_unambiguously_index_signature(&mut self) -> bool {
        self.next_token();
        if matches!(self.token(), SyntaxKind::DotDotDotToken | SyntaxKind::CloseBracketToken) {
            return true;
        }
        if self.token().is_modifier_kind() {
            self.next_token();
            if self.is_identifier() {
                return true;
            }
        } else if !self.is_identifier() {
            return false;
        } else {
            self.next_token();
        }
        if matches!(self.token(), SyntaxKind::ColonToken | SyntaxKind::CommaToken) {
            return true;
        }
        if self.token() != SyntaxKind::QuestionToken {
            return false;
        }
        self.next_token();
        matches!(
            self.token(),
            SyntaxKind::ColonToken | SyntaxKind::CommaToken | SyntaxKind::CloseBracketToken
        )
    }

    fn is_start_of_function_type_or_constructor_type(&mut self) -> bool {
        match self.token() {
            SyntaxKind::LessThanToken | SyntaxKind::NewKeyword => true,
            SyntaxKind::OpenParenToken => self.look_ahead(Self::is_unambiguously_start_of_function_type),
            SyntaxKind::AbstractKeyword => {
                self.look_ahead(|parser| parser.next_token() == SyntaxKind::NewKeyword)
            }
            _ => false,
        }
    }

    fn is_unambiguously_start_of_function_type(&mut self) -> bool {
        self.next_token();
        if matches!(self.token(), SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken) {
            // `()` and `(...` can only begin a parameter list.
            return true;
        }
        if self.skip_parameter_start() {
            if matches!(
                self.token(),
                SyntaxKind::ColonToken | SyntaxKind::CommaToken | SyntaxKind::QuestionToken | SyntaxKind::EqualsToken
            ) {
                return true;
            }
            if self.token() == SyntaxKind::CloseParenToken {
                self.next_token();
                if self.token() == SyntaxKind::EqualsGreaterThanToken {
                    return true;
                }
            }
        }
        false
    }

    fn skip_parameter_start(&mut self) -> bool {
        if self.token().is_modifier_kind() {
            self.parse_modifiers(false, false, false);
        }
        if self.is_identifier() || self.token() == SyntaxKind::ThisKeyword {
            self.next_token();
            return true;
        }
        if matches!(self.token(), SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken) {
            let previous_error_count = self.diagnostics.len();
            self.parse_identifier_or_pattern();
            return previous_error_count == self.diagnostics.len();
        }
        false
    }

    fn is_start_of_mapped_type(&mut self) -> bool {
        self.next_token();
        if matches!(self.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            return self.next_token() == SyntaxKind::ReadonlyKeyword;
        }
        if self.token() == SyntaxKind::ReadonlyKeyword {
            self.next_token();
        }
        if self.token() != SyntaxKind::OpenBracketToken {
            return false;
        }
        self.next_token();
        self.is_identifier() && self.next_token() == SyntaxKind::InKeyword
    }

    fn is_tuple_element_name(&mut self) -> bool {
        if self.token() == SyntaxKind::DotDotDotToken {
            let next = self.next_token();
            return token_is_identifier_or_keyword(next) && self.is_next_token_colon_or_question_colon();
        }
        token_is_identifier_or_keyword(self.token()) && self.is_next_token_colon_or_question_colon()
    }

    fn is_next_token_colon_or_question_colon(&mut self) -> bool {
        self.next_token() == SyntaxKind::ColonToken
            || (self.token() == SyntaxKind::QuestionToken && self.next_token() == SyntaxKind::ColonToken)
    }

    // ========================================================================
    // Annotations and return types
    // ========================================================================

    pub(crate) fn parse_type_annotation(&mut self) -> Option<NodeId> {
        self.parse_optional(SyntaxKind::ColonToken).then(|| self.parse_type())
    }

    /// The return type after `return_token`. In type positions a `=>` where
    /// `:` belongs is reported and accepted.
    pub(crate) fn parse_return_type(&mut self, return_token: SyntaxKind, is_type: bool) -> Option<NodeId> {
        if !self.should_parse_return_type(return_token, is_type) {
            return None;
        }
        Some(self.allow_conditional_types_and(Self::parse_type_or_type_predicate))
    }

    fn should_parse_return_type(&mut self, return_token: SyntaxKind, is_type: bool) -> bool {
        if return_token == SyntaxKind::EqualsGreaterThanToken {
            self.parse_expected(return_token);
            return true;
        }
        if self.parse_optional(SyntaxKind::ColonToken) {
            return true;
        }
        if is_type && self.token() == SyntaxKind::EqualsGreaterThanToken {
            self.parse_error_at_current_token(&messages::_0_EXPECTED, &[":"]);
            self.next_token();
            return true;
        }
        false
    }

    fn parse_type_or_type_predicate(&mut self) -> NodeId {
        let pos = self.node_pos();
        let predicate_variable = if self.is_identifier() {
            self.try_parse(Self::parse_type_predicate_prefix)
        } else {
            None
        };
        let type_node = self.parse_type();
        match predicate_variable {
            Some(parameter_name) => self.finish_node(
                SyntaxKind::TypePredicate,
                pos,
                NodeVariant::TypePredicate(TypePredicate {
                    asserts_modifier: None,
                    parameter_name,
                    type_node: Some(type_node),
                }),
            ),
            None => type_node,
        }
    }

    fn parse_type_predicate_prefix(&mut self) -> Option<NodeId> {
        let id = self.parse_identifier();
        if self.token() == SyntaxKind::IsKeyword && !self.has_preceding_line_break() {
            self.next_token();
            return Some(id);
        }
        None
    }

    fn parse_asserts_type_predicate(&mut self) -> NodeId {
        let pos = self.node_pos();
        let asserts_modifier = self.parse_expected_token(SyntaxKind::AssertsKeyword);
        let parameter_name = if self.token() == SyntaxKind::ThisKeyword {
            self.parse_this_type_node()
        } else {
            self.parse_identifier()
        };
        let type_node = self.parse_optional(SyntaxKind::IsKeyword).then(|| self.parse_type());
        self.finish_node(
            SyntaxKind::TypePredicate,
            pos,
            NodeVariant::TypePredicate(TypePredicate {
                asserts_modifier: Some(asserts_modifier),
                parameter_name,
                type_node,
            }),
        )
    }

    // ========================================================================
    // Types
    // ========================================================================

    pub(crate) fn parse_type(&mut self) -> NodeId {
        if self.in_context(TYPE_EXCLUDES_FLAGS) {
            return self.do_outside_of_context(TYPE_EXCLUDES_FLAGS, Self::parse_type);
        }
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            return self.parse_too_deep(SyntaxKind::TypeReference, &messages::TYPE_EXPECTED);
        }
        self.recursion_depth += 1;
        let type_node = self.parse_type_worker();
        self.recursion_depth -= 1;
        type_node
    }

    fn parse_type_worker(&mut self) -> NodeId {
        if self.is_start_of_function_type_or_constructor_type() {
            return self.parse_function_or_constructor_type();
        }
        let pos = self.node_pos();
        let check_type = self.parse_union_type_or_higher();
        if !self.in_disallow_conditional_types_context()
            && !self.has_preceding_line_break()
            && self.parse_optional(SyntaxKind::ExtendsKeyword)
        {
            // The extends clause is parsed without conditional types so
            // `A extends B ? C : D` binds the `?` to the outer type.
            let extends_type = self.disallow_conditional_types_and(Self::parse_type);
            self.parse_expected(SyntaxKind::QuestionToken);
            let true_type = self.allow_conditional_types_and(Self::parse_type);
            self.parse_expected(SyntaxKind::ColonToken);
            let false_type = self.allow_conditional_types_and(Self::parse_type);
            return self.finish_node(
                SyntaxKind::ConditionalType,
                pos,
                NodeVariant::ConditionalType(ConditionalType {
                    check_type,
                    extends_type,
                    true_type,
                    false_type,
                }),
            );
        }
        check_type
    }

    fn parse_union_type_or_higher(&mut self) -> NodeId {
        self.parse_union_or_intersection_type(SyntaxKind::BarToken)
    }

    fn parse_intersection_type_or_higher(&mut self) -> NodeId {
        self.parse_union_or_intersection_type(SyntaxKind::AmpersandToken)
    }

    fn parse_constituent_type(&mut self, operator: SyntaxKind) -> NodeId {
        if operator == SyntaxKind::BarToken {
            self.parse_intersection_type_or_higher()
        } else {
            self.parse_type_operator_or_higher()
        }
    }

    /// `A | B | C`, with an optional leading operator.
    fn parse_union_or_intersection_type(&mut self, operator: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        let is_union = operator == SyntaxKind::BarToken;
        let has_leading_operator = self.parse_optional(operator);
        let first = if has_leading_operator {
            self.parse_function_or_constructor_type_to_error(is_union)
        } else {
            None
        };
        let first = match first {
            Some(first) => first,
            None => self.parse_constituent_type(operator),
        };
        if self.token() != operator && !has_leading_operator {
            return first;
        }
        let mut types = vec![first];
        while self.parse_optional(operator) {
            let constituent = match self.parse_function_or_constructor_type_to_error(is_union) {
                Some(constituent) => constituent,
                None => self.parse_constituent_type(operator),
            };
            types.push(constituent);
        }
        let types = NodeList::new(types, pos, self.node_pos());
        let kind = if is_union {
            SyntaxKind::UnionType
        } else {
            SyntaxKind::IntersectionType
        };
        self.finish_node(kind, pos, NodeVariant::UnionOrIntersection { types })
    }

    /// An unparenthesized function type after `|` or `&` parses, with an
    /// error.
    fn parse_function_or_constructor_type_to_error(&mut self, is_in_union_type: bool) -> Option<NodeId> {
        if !self.is_start_of_function_type_or_constructor_type() {
            return None;
        }
        let type_node = self.parse_function_or_constructor_type();
        let message = match (self.kind_of(type_node) == SyntaxKind::FunctionType, is_in_union_type) {
            (true, true) => &messages::FUNCTION_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_A_UNION_TYPE,
            (true, false) => &messages::FUNCTION_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_AN_INTERSECTION_TYPE,
            (false, true) => &messages::CONSTRUCTOR_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_A_UNION_TYPE,
            (false, false) => {
                &messages::CONSTRUCTOR_TYPE_NOTATION_MUST_BE_PARENTHESIZED_WHEN_USED_IN_AN_INTERSECTION_TYPE
            }
        };
        self.parse_error_at_node(type_node, message, &[]);
        Some(type_node)
    }

    fn parse_type_operator_or_higher(&mut self) -> NodeId {
        let operator = self.token();
        match operator {
            SyntaxKind::KeyOfKeyword | SyntaxKind::UniqueKeyword | SyntaxKind::ReadonlyKeyword => {
                let pos = self.node_pos();
                self.parse_expected(operator);
                let type_node = self.parse_type_operator_or_higher();
                self.finish_node(
                    SyntaxKind::TypeOperator,
                    pos,
                    NodeVariant::TypeOperator(TypeOperator { operator, type_node }),
                )
            }
            SyntaxKind::InferKeyword => self.parse_infer_type(),
            _ => self.allow_conditional_types_and(Self::parse_postfix_type_or_higher),
        }
    }

    fn parse_infer_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::InferKeyword);
        let parameter_pos = self.node_pos();
        let name = self.parse_identifier();
        let constraint = self.try_parse(Self::try_parse_constraint_of_infer_type);
        let type_parameter = self.finish_node(
            SyntaxKind::TypeParameter,
            parameter_pos,
            NodeVariant::TypeParameter(TypeParameter {
                modifiers: None,
                name,
                constraint,
                default: None,
            }),
        );
        self.finish_node(SyntaxKind::InferType, pos, NodeVariant::InferType { type_parameter })
    }

    /// `infer U extends X` inside a conditional's extends clause only binds
    /// the constraint when no `?` follows.
    fn try_parse_constraint_of_infer_type(&mut self) -> Option<NodeId> {
        if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            let constraint = self.disallow_conditional_types_and(Self::parse_type);
            if self.in_disallow_conditional_types_context() || self.token() != SyntaxKind::QuestionToken {
                return Some(constraint);
            }
        }
        None
    }

    fn parse_postfix_type_or_higher(&mut self) -> NodeId {
        let pos = self.node_pos();
        let mut type_node = self.parse_non_array_type();
        while !self.has_preceding_line_break() && self.token() == SyntaxKind::OpenBracketToken {
            self.parse_expected(SyntaxKind::OpenBracketToken);
            if self.is_start_of_type(false) {
                let index_type = self.parse_type();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                type_node = self.finish_node(
                    SyntaxKind::IndexedAccessType,
                    pos,
                    NodeVariant::IndexedAccessType(IndexedAccessType {
                        object_type: type_node,
                        index_type,
                    }),
                );
            } else {
                self.parse_expected(SyntaxKind::CloseBracketToken);
                type_node = self.finish_node(
                    SyntaxKind::ArrayType,
                    pos,
                    NodeVariant::ArrayType { element_type: type_node },
                );
            }
        }
        type_node
    }

    fn parse_non_array_type(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::AnyKeyword
            | SyntaxKind::UnknownKeyword
            | SyntaxKind::StringKeyword
            | SyntaxKind::NumberKeyword
            | SyntaxKind::BigIntKeyword
            | SyntaxKind::SymbolKeyword
            | SyntaxKind::BooleanKeyword
            | SyntaxKind::UndefinedKeyword
            | SyntaxKind::NeverKeyword
            | SyntaxKind::ObjectKeyword => match self.try_parse(Self::parse_keyword_and_no_dot) {
                Some(keyword) => keyword,
                None => self.parse_type_reference(),
            },
            SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => self.parse_literal_type_node(false),
            SyntaxKind::MinusToken => {
                if self.look_ahead(Self::next_token_is_numeric_or_big_int_literal) {
                    self.parse_literal_type_node(true)
                } else {
                    self.parse_type_reference()
                }
            }
            SyntaxKind::VoidKeyword => self.parse_token_node(),
            SyntaxKind::ThisKeyword => {
                let this_keyword = self.parse_this_type_node();
                if self.token() == SyntaxKind::IsKeyword && !self.has_preceding_line_break() {
                    return self.parse_this_type_predicate(this_keyword);
                }
                this_keyword
            }
            SyntaxKind::TypeOfKeyword => {
                if self.look_ahead(|parser| parser.next_token() == SyntaxKind::ImportKeyword) {
                    self.parse_import_type()
                } else {
                    self.parse_type_query()
                }
            }
            SyntaxKind::OpenBraceToken => {
                if self.look_ahead(Self::is_start_of_mapped_type) {
                    self.parse_mapped_type()
                } else {
                    self.parse_type_literal()
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::OpenParenToken => self.parse_parenthesized_type(),
            SyntaxKind::ImportKeyword => self.parse_import_type(),
            SyntaxKind::AssertsKeyword => {
                if self.look_ahead(Self::next_token_is_identifier_or_keyword_on_same_line) {
                    self.parse_asserts_type_predicate()
                } else {
                    self.parse_type_reference()
                }
            }
            SyntaxKind::TemplateHead => self.parse_template_type(),
            _ => self.parse_type_reference(),
        }
    }

    /// A keyword type unless a `.` follows, as in `string.Foo`.
    fn parse_keyword_and_no_dot(&mut self) -> Option<NodeId> {
        let node = self.parse_token_node();
        (self.token() != SyntaxKind::DotToken).then_some(node)
    }

    fn parse_literal_type_node(&mut self, negative: bool) -> NodeId {
        let pos = self.node_pos();
        if negative {
            self.next_token();
        }
        let mut literal = match self.token() {
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword | SyntaxKind::NullKeyword => self.parse_token_node(),
            _ => self.parse_literal_node(),
        };
        if negative {
            literal = self.finish_node(
                SyntaxKind::PrefixUnaryExpression,
                pos,
                NodeVariant::Unary(Unary {
                    operator: SyntaxKind::MinusToken,
                    operand: literal,
                }),
            );
        }
        self.finish_node(SyntaxKind::LiteralType, pos, NodeVariant::LiteralType { literal })
    }

    fn parse_this_type_node(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.next_token();
        self.finish_node(SyntaxKind::ThisType, pos, NodeVariant::Token)
    }

    fn parse_this_type_predicate(&mut self, lhs: NodeId) -> NodeId {
        self.next_token();
        let type_node = self.parse_type();
        let pos = self.arena[lhs].pos();
        self.finish_node(
            SyntaxKind::TypePredicate,
            pos,
            NodeVariant::TypePredicate(TypePredicate {
                asserts_modifier: None,
                parameter_name: lhs,
                type_node: Some(type_node),
            }),
        )
    }

    fn parse_type_query(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::TypeOfKeyword);
        let expr_name = self.parse_entity_name(true, None);
        let type_arguments = if self.has_preceding_line_break() {
            None
        } else {
            self.try_parse_type_arguments()
        };
        self.finish_node(
            SyntaxKind::TypeQuery,
            pos,
            NodeVariant::TypeQuery(TypeQuery {
                expr_name,
                type_arguments,
            }),
        )
    }

    fn parse_import_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        let is_type_of = self.parse_optional(SyntaxKind::TypeOfKeyword);
        self.parse_expected(SyntaxKind::ImportKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let argument = self.parse_type();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let qualifier = self
            .parse_optional(SyntaxKind::DotToken)
            .then(|| self.parse_entity_name(true, Some(&messages::TYPE_EXPECTED)));
        let type_arguments = self.parse_type_arguments_of_type_reference();
        self.finish_node(
            SyntaxKind::ImportType,
            pos,
            NodeVariant::ImportType(ImportType {
                is_type_of,
                argument,
                qualifier,
                type_arguments,
            }),
        )
    }

    fn parse_type_reference(&mut self) -> NodeId {
        let pos = self.node_pos();
        let type_name = self.parse_entity_name(true, Some(&messages::TYPE_EXPECTED));
        let type_arguments = self.parse_type_arguments_of_type_reference();
        self.finish_node(
            SyntaxKind::TypeReference,
            pos,
            NodeVariant::TypeReference(TypeReference {
                type_name,
                type_arguments,
            }),
        )
    }

    /// `<...>` directly after a type name on the same line.
    fn parse_type_arguments_of_type_reference(&mut self) -> Option<NodeList> {
        if !self.has_preceding_line_break() && self.re_scan_less_than_token() == SyntaxKind::LessThanToken {
            return Some(self.parse_type_argument_list());
        }
        None
    }

    fn parse_type_argument_list(&mut self) -> NodeList {
        let list = self.parse_bracketed_list(
            ParsingContext::TypeArguments,
            Self::parse_type,
            SyntaxKind::LessThanToken,
            SyntaxKind::GreaterThanToken,
        );
        if list.is_empty() {
            self.report_empty_list(&list, &messages::TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY);
        }
        list
    }

    /// `<...>` in a heritage clause or type query.
    pub(crate) fn try_parse_type_arguments(&mut self) -> Option<NodeList> {
        (self.token() == SyntaxKind::LessThanToken).then(|| self.parse_type_argument_list())
    }

    /// Empty `<>` lists are reported across the brackets.
    fn report_empty_list(&mut self, list: &NodeList, message: &DiagnosticMessage) {
        let start = list.range.pos.saturating_sub(1);
        let end = self.node_pos();
        self.parse_error_at(start, end, message, &[]);
    }

    fn parse_mapped_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut readonly_token = None;
        if matches!(
            self.token(),
            SyntaxKind::ReadonlyKeyword | SyntaxKind::PlusToken | SyntaxKind::MinusToken
        ) {
            let token = self.parse_token_node();
            if self.kind_of(token) != SyntaxKind::ReadonlyKeyword {
                self.parse_expected(SyntaxKind::ReadonlyKeyword);
            }
            readonly_token = Some(token);
        }
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let type_parameter = self.parse_mapped_type_parameter();
        let name_type = self.parse_optional(SyntaxKind::AsKeyword).then(|| self.parse_type());
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let mut question_token = None;
        if matches!(
            self.token(),
            SyntaxKind::QuestionToken | SyntaxKind::PlusToken | SyntaxKind::MinusToken
        ) {
            let token = self.parse_token_node();
            if self.kind_of(token) != SyntaxKind::QuestionToken {
                self.parse_expected(SyntaxKind::QuestionToken);
            }
            question_token = Some(token);
        }
        let type_node = self.parse_type_annotation();
        self.parse_semicolon();
        // Extra members are an error for the checker; keep them in the tree.
        let members = self.parse_list(ParsingContext::TypeMembers, Self::parse_type_member);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.finish_node(
            SyntaxKind::MappedType,
            pos,
            NodeVariant::MappedType(MappedType {
                readonly_token,
                type_parameter,
                name_type,
                question_token,
                type_node,
                members: (!members.is_empty()).then_some(members),
            }),
        )
    }

    fn parse_mapped_type_parameter(&mut self) -> NodeId {
        let pos = self.node_pos();
        let name = self.parse_identifier_name();
        self.parse_expected(SyntaxKind::InKeyword);
        let constraint = self.parse_type();
        self.finish_node(
            SyntaxKind::TypeParameter,
            pos,
            NodeVariant::TypeParameter(TypeParameter {
                modifiers: None,
                name,
                constraint: Some(constraint),
                default: None,
            }),
        )
    }

    fn parse_type_literal(&mut self) -> NodeId {
        let pos = self.node_pos();
        let members = self.parse_object_type_members();
        self.finish_node(SyntaxKind::TypeLiteral, pos, NodeVariant::TypeLiteral { members })
    }

    pub(crate) fn parse_object_type_members(&mut self) -> NodeList {
        if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let members = self.parse_list(ParsingContext::TypeMembers, Self::parse_type_member);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            return members;
        }
        NodeList::empty(self.node_pos())
    }

    fn parse_tuple_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        let elements = self.parse_bracketed_list(
            ParsingContext::TupleElementTypes,
            Self::parse_tuple_element_name_or_tuple_element_type,
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
        );
        self.finish_node(SyntaxKind::TupleType, pos, NodeVariant::TupleType { elements })
    }

    fn parse_tuple_element_name_or_tuple_element_type(&mut self) -> NodeId {
        if !self.look_ahead(Self::is_tuple_element_name) {
            return self.parse_tuple_element_type();
        }
        let pos = self.node_pos();
        let dot_dot_dot_token = self.parse_optional_token(SyntaxKind::DotDotDotToken);
        let name = self.parse_identifier_name();
        let question_token = self.parse_optional_token(SyntaxKind::QuestionToken);
        self.parse_expected(SyntaxKind::ColonToken);
        let type_node = self.parse_tuple_element_type();
        self.finish_node(
            SyntaxKind::NamedTupleMember,
            pos,
            NodeVariant::NamedTupleMember(NamedTupleMember {
                dot_dot_dot_token,
                name,
                question_token,
                type_node,
            }),
        )
    }

    /// `...T`, `T?`, or `T`.
    fn parse_tuple_element_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let type_node = self.parse_type();
            return self.finish_node(SyntaxKind::RestType, pos, NodeVariant::WrappedType(WrappedType { type_node }));
        }
        let type_node = self.parse_type();
        if self.token() == SyntaxKind::QuestionToken && !self.has_preceding_line_break() {
            self.next_token();
            return self.finish_node(
                SyntaxKind::OptionalType,
                pos,
                NodeVariant::WrappedType(WrappedType { type_node }),
            );
        }
        type_node
    }

    fn parse_parenthesized_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let type_node = self.parse_type();
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.finish_node(
            SyntaxKind::ParenthesizedType,
            pos,
            NodeVariant::WrappedType(WrappedType { type_node }),
        )
    }

    fn parse_template_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        let head = self.parse_template_head(false);
        let mut spans = Vec::new();
        let spans_pos = self.node_pos();
        loop {
            let span_pos = self.node_pos();
            let type_node = self.parse_type();
            let literal = self.parse_literal_of_template_span(false);
            let is_middle = self.kind_of(literal) == SyntaxKind::TemplateMiddle;
            spans.push(self.finish_node(
                SyntaxKind::TemplateLiteralTypeSpan,
                span_pos,
                NodeVariant::TemplateSpan(TemplateSpan {
                    expression: type_node,
                    literal,
                }),
            ));
            if !is_middle {
                break;
            }
        }
        let template_spans = NodeList::new(spans, spans_pos, self.node_pos());
        self.finish_node(
            SyntaxKind::TemplateLiteralType,
            pos,
            NodeVariant::Template(Template { head, template_spans }),
        )
    }

    fn parse_function_or_constructor_type(&mut self) -> NodeId {
        let pos = self.node_pos();
        let modifiers = if self.token() == SyntaxKind::AbstractKeyword {
            let modifier_pos = self.node_pos();
            let modifier = self.parse_token_node();
            Some(NodeList::new(vec![modifier], modifier_pos, self.node_pos()))
        } else {
            None
        };
        let is_constructor_type = self.parse_optional(SyntaxKind::NewKeyword);
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(SignatureFlags::TYPE);
        let type_node = self.parse_return_type(SyntaxKind::EqualsGreaterThanToken, false);
        let kind = if is_constructor_type {
            SyntaxKind::ConstructorType
        } else {
            SyntaxKind::FunctionType
        };
        self.finish_node(
            kind,
            pos,
            NodeVariant::FunctionLike(FunctionLike {
                modifiers,
                type_parameters,
                parameters,
                type_node,
                ..Default::default()
            }),
        )
    }

    // ========================================================================
    // Type members
    // ========================================================================

    fn parse_type_member(&mut self) -> NodeId {
        if matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
            return self.parse_signature_member(SyntaxKind::CallSignature);
        }
        if self.token() == SyntaxKind::NewKeyword
            && self.look_ahead(|parser| {
                matches!(parser.next_token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken)
            })
        {
            return self.parse_signature_member(SyntaxKind::ConstructSignature);
        }
        let pos = self.node_pos();
        let modifiers = self.parse_modifiers(false, false, false);
        if self.parse_contextual_modifier(SyntaxKind::GetKeyword) {
            return self.parse_accessor_declaration(pos, modifiers, SyntaxKind::GetAccessor, SignatureFlags::TYPE);
        }
        if self.parse_contextual_modifier(SyntaxKind::SetKeyword) {
            return self.parse_accessor_declaration(pos, modifiers, SyntaxKind::SetAccessor, SignatureFlags::TYPE);
        }
        if self.is_index_signature() {
            return self.parse_index_signature_declaration(pos, modifiers);
        }
        self.parse_property_or_method_signature(pos, modifiers)
    }

    fn parse_signature_member(&mut self, kind: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        if kind == SyntaxKind::ConstructSignature {
            self.parse_expected(SyntaxKind::NewKeyword);
        }
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(SignatureFlags::TYPE);
        let type_node = self.parse_return_type(SyntaxKind::ColonToken, true);
        self.parse_type_member_semicolon();
        self.finish_node(
            kind,
            pos,
            NodeVariant::FunctionLike(FunctionLike {
                type_parameters,
                parameters,
                type_node,
                ..Default::default()
            }),
        )
    }

    pub(crate) fn parse_index_signature_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        let parameters = self.parse_bracketed_list(
            ParsingContext::Parameters,
            |parser| parser.parse_parameter(false),
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
        );
        let type_node = self.parse_type_annotation();
        self.parse_type_member_semicolon();
        self.finish_node(
            SyntaxKind::IndexSignature,
            pos,
            NodeVariant::FunctionLike(FunctionLike {
                modifiers,
                parameters,
                type_node,
                ..Default::default()
            }),
        )
    }

    fn parse_property_or_method_signature(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        let name = self.parse_property_name();
        let question_token = self.parse_optional_token(SyntaxKind::QuestionToken);
        if matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
            let type_parameters = self.parse_type_parameters();
            let parameters = self.parse_parameters(SignatureFlags::TYPE);
            let type_node = self.parse_return_type(SyntaxKind::ColonToken, true);
            self.parse_type_member_semicolon();
            return self.finish_node(
                SyntaxKind::MethodSignature,
                pos,
                NodeVariant::FunctionLike(FunctionLike {
                    modifiers,
                    name: Some(name),
                    question_token,
                    type_parameters,
                    parameters,
                    type_node,
                    ..Default::default()
                }),
            );
        }
        let type_node = self.parse_type_annotation();
        // An initializer is an error for the checker; keep it for recovery.
        let initializer = if self.token() == SyntaxKind::EqualsToken {
            self.parse_initializer()
        } else {
            None
        };
        self.parse_type_member_semicolon();
        self.finish_node(
            SyntaxKind::PropertySignature,
            pos,
            NodeVariant::PropertyDeclaration(PropertyDeclaration {
                modifiers,
                name,
                postfix_token: question_token,
                type_node,
                initializer,
            }),
        )
    }

    /// Members are separated by `,` or `;`, or by a line break.
    pub(crate) fn parse_type_member_semicolon(&mut self) {
        if self.parse_optional(SyntaxKind::CommaToken) {
            return;
        }
        self.parse_semicolon();
    }

    // ========================================================================
    // Type parameters
    // ========================================================================

    pub(crate) fn parse_type_parameters(&mut self) -> Option<NodeList> {
        if self.token() != SyntaxKind::LessThanToken {
            return None;
        }
        let list = self.parse_bracketed_list(
            ParsingContext::TypeParameters,
            Self::parse_type_parameter,
            SyntaxKind::LessThanToken,
            SyntaxKind::GreaterThanToken,
        );
        if list.is_empty() {
            self.report_empty_list(&list, &messages::TYPE_PARAMETER_LIST_CANNOT_BE_EMPTY);
        }
        Some(list)
    }

    fn parse_type_parameter(&mut self) -> NodeId {
        let pos = self.node_pos();
        let modifiers = self.parse_modifiers(false, true, false);
        let name = self.parse_identifier();
        let mut constraint = None;
        if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            // `T extends -1` is not a type; keep the expression for recovery.
            constraint = Some(if self.is_start_of_type(false) || !self.is_start_of_expression() {
                self.parse_type()
            } else {
                self.parse_unary_expression_or_higher()
            });
        }
        let default = self.parse_optional(SyntaxKind::EqualsToken).then(|| self.parse_type());
        self.finish_node(
            SyntaxKind::TypeParameter,
            pos,
            NodeVariant::TypeParameter(TypeParameter {
                modifiers,
                name,
                constraint,
                default,
            }),
        )
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// `( parameters )`. A missing `(` yields an empty list.
    pub(crate) fn parse_parameters(&mut self, flags: SignatureFlags) -> NodeList {
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return NodeList::empty(self.node_pos());
        }
        let parameters = self.parse_parameters_worker(flags);
        self.parse_expected(SyntaxKind::CloseParenToken);
        parameters
    }

    pub(crate) fn parse_parameters_worker(&mut self, flags: SignatureFlags) -> NodeList {
        let outer_await = self.in_await_context();
        self.with_yield_and_await(
            flags.contains(SignatureFlags::YIELD),
            flags.contains(SignatureFlags::AWAIT),
            |parser| {
                parser.parse_delimited_list(
                    ParsingContext::Parameters,
                    |parser| parser.parse_parameter(outer_await),
                    false,
                )
            },
        )
    }

    /// Parameters parsed while deciding whether `(` starts an arrow
    /// function; gives up instead of recovering.
    pub(crate) fn try_parse_parameters_for_speculation(&mut self, flags: SignatureFlags) -> Option<NodeList> {
        let outer_await = self.in_await_context();
        self.with_yield_and_await(
            flags.contains(SignatureFlags::YIELD),
            flags.contains(SignatureFlags::AWAIT),
            |parser| {
                parser.try_parse_delimited_list(
                    ParsingContext::Parameters,
                    |parser| parser.parse_parameter_worker(outer_await, false),
                    false,
                )
            },
        )
    }

    pub(crate) fn parse_parameter(&mut self, in_outer_await_context: bool) -> NodeId {
        match self.parse_parameter_worker(in_outer_await_context, true) {
            Some(parameter) => parameter,
            None => self.create_missing_node(SyntaxKind::Parameter, true, Some(&messages::PARAMETER_DECLARATION_EXPECTED), &[]),
        }
    }

    fn parse_parameter_worker(&mut self, in_outer_await_context: bool, allow_ambiguity: bool) -> Option<NodeId> {
        let pos = self.node_pos();
        // Decorators on parameters are evaluated in the enclosing function's
        // await context.
        let modifiers = if in_outer_await_context {
            self.do_in_await_context(|parser| parser.parse_modifiers(true, false, false))
        } else {
            self.do_outside_of_await_context(|parser| parser.parse_modifiers(true, false, false))
        };

        if self.token() == SyntaxKind::ThisKeyword {
            let name = self.create_identifier(true, None, None);
            let type_node = self.parse_type_annotation();
            return Some(self.finish_node(
                SyntaxKind::Parameter,
                pos,
                NodeVariant::Parameter(Parameter {
                    modifiers,
                    dot_dot_dot_token: None,
                    name,
                    question_token: None,
                    type_node,
                    initializer: None,
                }),
            ));
        }

        let dot_dot_dot_token = self.parse_optional_token(SyntaxKind::DotDotDotToken);
        if !allow_ambiguity && !self.is_parameter_name_start() {
            return None;
        }
        let name = self.parse_name_of_parameter(modifiers.is_some());
        let question_token = self.parse_optional_token(SyntaxKind::QuestionToken);
        let type_node = self.parse_type_annotation();
        let initializer = self.parse_initializer();
        Some(self.finish_node(
            SyntaxKind::Parameter,
            pos,
            NodeVariant::Parameter(Parameter {
                modifiers,
                dot_dot_dot_token,
                name,
                question_token,
                type_node,
                initializer,
            }),
        ))
    }

    fn is_parameter_name_start(&self) -> bool {
        self.is_binding_identifier() || matches!(self.token(), SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken)
    }

    fn parse_name_of_parameter(&mut self, has_modifiers: bool) -> NodeId {
        let name = self.parse_identifier_or_pattern();
        let range = self.arena[name].range();
        if range.pos == range.end && !has_modifiers && self.token().is_modifier_kind() {
            // `(public)` with the name missing: step over the modifier so
            // the list does not stall on it.
            self.next_token();
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_flags_combine() {
        let flags = SignatureFlags::YIELD | SignatureFlags::AWAIT;
        assert!(flags.contains(SignatureFlags::YIELD));
        assert!(!flags.contains(SignatureFlags::TYPE));
        assert_eq!(SignatureFlags::default(), SignatureFlags::NONE);
    }

    #[test]
    fn test_type_excludes_generator_context() {
        assert!(TYPE_EXCLUDES_FLAGS.contains(NodeFlags::YIELD_CONTEXT));
        assert!(TYPE_EXCLUDES_FLAGS.contains(NodeFlags::AWAIT_CONTEXT));
        assert!(!TYPE_EXCLUDES_FLAGS.contains(NodeFlags::DISALLOW_IN_CONTEXT));
    }
}
