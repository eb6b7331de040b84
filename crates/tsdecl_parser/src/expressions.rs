//! Expressions: precedence climbing, unary and postfix operators, member
//! and call chains, arrow functions, literals, and templates.

use tsdecl_ast::{
    token_to_string, Binary, Call, Conditional, ElementAccess, ExpressionWithTypeArguments,
    FunctionLike, MetaProperty, NodeFlags, NodeId, NodeList, NodeVariant, Parameter, PropertyAccess,
    PropertyAssignment, ShorthandPropertyAssignment, SyntaxKind, TaggedTemplate, Template, TemplateSpan,
    TypeAssertion, TypedExpression, Unary, Yield,
};
use tsdecl_core::text::TextPos;
use tsdecl_diagnostics::messages;

use crate::context::ParsingContext;
use crate::parser::{skip_trivia, token_is_identifier_or_keyword, Parser, MAX_RECURSION_DEPTH};
use crate::precedence::{get_binary_operator_precedence, OperatorPrecedence};
use crate::types::SignatureFlags;

/// Outcome of a look-ahead that cannot always decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tristate {
    False,
    True,
    Unknown,
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Predicates
    // ========================================================================

    pub(crate) fn is_start_of_left_hand_side_expression(&mut self) -> bool {
        match self.token() {
            SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::NewKeyword
            | SyntaxKind::SlashToken
            | SyntaxKind::SlashEqualsToken
            | SyntaxKind::Identifier => true,
            SyntaxKind::ImportKeyword => self.look_ahead(Self::next_token_is_open_paren_or_less_than_or_dot),
            _ => self.is_identifier(),
        }
    }

    pub(crate) fn is_start_of_expression(&mut self) -> bool {
        if self.is_start_of_left_hand_side_expression() {
            return true;
        }
        match self.token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::LessThanToken
            | SyntaxKind::AwaitKeyword
            | SyntaxKind::YieldKeyword
            | SyntaxKind::PrivateIdentifier
            | SyntaxKind::AtToken => true,
            // Error tolerance: an operator can start an expression whose
            // left operand is missing.
            _ => self.is_binary_operator() || self.is_identifier(),
        }
    }

    fn is_start_of_expression_statement(&mut self) -> bool {
        !matches!(
            self.token(),
            SyntaxKind::OpenBraceToken | SyntaxKind::FunctionKeyword | SyntaxKind::ClassKeyword | SyntaxKind::AtToken
        ) && self.is_start_of_expression()
    }

    fn is_binary_operator(&self) -> bool {
        if self.in_disallow_in_context() && self.token() == SyntaxKind::InKeyword {
            return false;
        }
        get_binary_operator_precedence(self.token()) > OperatorPrecedence::Comma
    }

    fn is_template_start_of_tagged_template(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead
        )
    }

    fn next_token_is_identifier_or_keyword_or_literal_on_same_line(&mut self) -> bool {
        self.next_token();
        (token_is_identifier_or_keyword(self.token())
            || matches!(
                self.token(),
                SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral | SyntaxKind::StringLiteral
            ))
            && !self.has_preceding_line_break()
    }

    pub(crate) fn next_token_is_identifier_or_keyword_or_greater_than(&mut self) -> bool {
        self.next_token();
        token_is_identifier_or_keyword(self.token()) || self.token() == SyntaxKind::GreaterThanToken
    }

    fn next_token_is_function_keyword_on_same_line(&mut self) -> bool {
        self.next_token();
        self.token() == SyntaxKind::FunctionKeyword && !self.has_preceding_line_break()
    }

    // ========================================================================
    // Comma and assignment expressions
    // ========================================================================

    /// `a, b, c`. Decorator context does not reach into the operands.
    pub(crate) fn parse_expression(&mut self) -> NodeId {
        self.do_outside_of_context(NodeFlags::DECORATOR_CONTEXT, |parser| {
            let pos = parser.node_pos();
            let mut expression = parser.parse_assignment_expression_or_higher();
            while let Some(operator_token) = parser.parse_optional_token(SyntaxKind::CommaToken) {
                let right = parser.parse_assignment_expression_or_higher();
                expression = parser.make_binary_expression(expression, operator_token, right, pos);
            }
            expression
        })
    }

    pub(crate) fn parse_assignment_expression_or_higher(&mut self) -> NodeId {
        self.parse_assignment_expression_or_higher_with(true)
    }

    /// `allow_return_type_in_arrow_function` is off inside the true branch of
    /// a conditional, where `a ? (b): c => d` must keep `: c` for the
    /// conditional.
    fn parse_assignment_expression_or_higher_with(&mut self, allow_return_type_in_arrow_function: bool) -> NodeId {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            return self.parse_too_deep(SyntaxKind::Identifier, &messages::EXPRESSION_EXPECTED);
        }
        self.recursion_depth += 1;
        let expression = self.parse_assignment_expression_worker(allow_return_type_in_arrow_function);
        self.recursion_depth -= 1;
        expression
    }

    fn parse_assignment_expression_worker(&mut self, allow_return_type_in_arrow_function: bool) -> NodeId {
        if self.is_yield_expression() {
            return self.parse_yield_expression();
        }
        if let Some(arrow) = self.try_parse_parenthesized_arrow_function_expression(allow_return_type_in_arrow_function)
        {
            return arrow;
        }
        if let Some(arrow) = self.try_parse_async_simple_arrow_function_expression(allow_return_type_in_arrow_function)
        {
            return arrow;
        }

        let pos = self.node_pos();
        let expression = self.parse_binary_expression_or_higher(OperatorPrecedence::LOWEST);
        if self.kind_of(expression) == SyntaxKind::Identifier && self.token() == SyntaxKind::EqualsGreaterThanToken {
            return self.parse_simple_arrow_function_expression(
                pos,
                expression,
                allow_return_type_in_arrow_function,
                None,
            );
        }
        if self.is_left_hand_side_expression(expression) && self.re_scan_greater_token().is_assignment_operator() {
            let operator_token = self.parse_token_node();
            let right = self.parse_assignment_expression_or_higher_with(allow_return_type_in_arrow_function);
            return self.make_binary_expression(expression, operator_token, right, pos);
        }
        self.parse_conditional_expression_rest(expression, pos, allow_return_type_in_arrow_function)
    }

    fn is_left_hand_side_expression(&self, id: NodeId) -> bool {
        matches!(
            self.kind_of(id),
            SyntaxKind::PropertyAccessExpression
                | SyntaxKind::ElementAccessExpression
                | SyntaxKind::NewExpression
                | SyntaxKind::CallExpression
                | SyntaxKind::JsxElement
                | SyntaxKind::JsxSelfClosingElement
                | SyntaxKind::JsxFragment
                | SyntaxKind::TaggedTemplateExpression
                | SyntaxKind::ArrayLiteralExpression
                | SyntaxKind::ParenthesizedExpression
                | SyntaxKind::ObjectLiteralExpression
                | SyntaxKind::ClassExpression
                | SyntaxKind::FunctionExpression
                | SyntaxKind::Identifier
                | SyntaxKind::PrivateIdentifier
                | SyntaxKind::RegularExpressionLiteral
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateExpression
                | SyntaxKind::FalseKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::ThisKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::SuperKeyword
                | SyntaxKind::NonNullExpression
                | SyntaxKind::ExpressionWithTypeArguments
                | SyntaxKind::MetaProperty
                | SyntaxKind::ImportKeyword
                | SyntaxKind::MissingDeclaration
        )
    }

    fn make_binary_expression(&mut self, left: NodeId, operator_token: NodeId, right: NodeId, pos: TextPos) -> NodeId {
        self.finish_node(
            SyntaxKind::BinaryExpression,
            pos,
            NodeVariant::Binary(Binary {
                left,
                operator_token,
                right,
            }),
        )
    }

    fn is_yield_expression(&mut self) -> bool {
        if self.token() != SyntaxKind::YieldKeyword {
            return false;
        }
        // Outside a generator `yield` is an identifier unless something that
        // can only be an operand follows on the same line.
        self.in_yield_context() || self.look_ahead(Self::next_token_is_identifier_or_keyword_or_literal_on_same_line)
    }

    fn parse_yield_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.next_token();
        let (asterisk_token, expression) = if !self.has_preceding_line_break()
            && (self.token() == SyntaxKind::AsteriskToken || self.is_start_of_expression())
        {
            let asterisk_token = self.parse_optional_token(SyntaxKind::AsteriskToken);
            (asterisk_token, Some(self.parse_assignment_expression_or_higher()))
        } else {
            (None, None)
        };
        self.finish_node(
            SyntaxKind::YieldExpression,
            pos,
            NodeVariant::Yield(Yield {
                asterisk_token,
                expression,
            }),
        )
    }

    fn parse_conditional_expression_rest(
        &mut self,
        condition: NodeId,
        pos: TextPos,
        allow_return_type_in_arrow_function: bool,
    ) -> NodeId {
        let Some(question_token) = self.parse_optional_token(SyntaxKind::QuestionToken) else {
            return condition;
        };
        let when_true = self.do_outside_of_context(
            NodeFlags::DISALLOW_IN_CONTEXT | NodeFlags::DECORATOR_CONTEXT,
            |parser| parser.parse_assignment_expression_or_higher_with(false),
        );
        let colon_token = self.parse_expected_token(SyntaxKind::ColonToken);
        let when_false = if self.arena[colon_token].is_missing() {
            self.create_missing_node(SyntaxKind::Identifier, false, Some(&messages::_0_EXPECTED), &[":"])
        } else {
            self.parse_assignment_expression_or_higher_with(allow_return_type_in_arrow_function)
        };
        self.finish_node(
            SyntaxKind::ConditionalExpression,
            pos,
            NodeVariant::Conditional(Conditional {
                condition,
                question_token,
                when_true,
                colon_token,
                when_false,
            }),
        )
    }

    // ========================================================================
    // Binary expressions
    // ========================================================================

    fn parse_binary_expression_or_higher(&mut self, precedence: OperatorPrecedence) -> NodeId {
        let pos = self.node_pos();
        let left = self.parse_unary_expression_or_higher();
        self.parse_binary_expression_rest(precedence, left, pos)
    }

    /// Fold operators binding tighter than `precedence` onto `left`. `**`
    /// is right-associative, so it also folds at equal precedence.
    fn parse_binary_expression_rest(&mut self, precedence: OperatorPrecedence, mut left: NodeId, pos: TextPos) -> NodeId {
        loop {
            // `>` is scanned alone so type arguments can close; glue it back.
            self.re_scan_greater_token();
            let new_precedence = get_binary_operator_precedence(self.token());
            let consume = if self.token() == SyntaxKind::AsteriskAsteriskToken {
                new_precedence >= precedence
            } else {
                new_precedence > precedence
            };
            if !consume {
                break;
            }
            if self.token() == SyntaxKind::InKeyword && self.in_disallow_in_context() {
                break;
            }
            if matches!(self.token(), SyntaxKind::AsKeyword | SyntaxKind::SatisfiesKeyword) {
                // `x\nas` is a new statement starting with `as`.
                if self.has_preceding_line_break() {
                    break;
                }
                let keyword = self.token();
                self.next_token();
                let type_node = self.parse_type();
                let kind = if keyword == SyntaxKind::SatisfiesKeyword {
                    SyntaxKind::SatisfiesExpression
                } else {
                    SyntaxKind::AsExpression
                };
                left = self.finish_node(
                    kind,
                    pos,
                    NodeVariant::TypedExpression(TypedExpression {
                        expression: left,
                        type_node,
                    }),
                );
            } else {
                let operator_token = self.parse_token_node();
                let right = self.parse_binary_expression_or_higher(new_precedence);
                left = self.make_binary_expression(left, operator_token, right, pos);
            }
        }
        left
    }

    // ========================================================================
    // Unary expressions
    // ========================================================================

    pub(crate) fn parse_unary_expression_or_higher(&mut self) -> NodeId {
        if self.is_update_expression() {
            let pos = self.node_pos();
            let update_expression = self.parse_update_expression();
            if self.token() == SyntaxKind::AsteriskAsteriskToken {
                let precedence = get_binary_operator_precedence(self.token());
                return self.parse_binary_expression_rest(precedence, update_expression, pos);
            }
            return update_expression;
        }

        // `-x ** 2` is ambiguous: the operand of `**` must be parenthesized.
        let unary_operator = self.token();
        let simple_unary_expression = self.parse_simple_unary_expression();
        if self.token() == SyntaxKind::AsteriskAsteriskToken {
            let range = self.arena[simple_unary_expression].range();
            let start = skip_trivia(self.source_text, range.pos);
            if self.kind_of(simple_unary_expression) == SyntaxKind::TypeAssertionExpression {
                self.parse_error_at(
                    start,
                    range.end,
                    &messages::A_TYPE_ASSERTION_EXPRESSION_IS_NOT_ALLOWED_IN_THE_LEFT_HAND_SIDE_OF_AN_EXPONENTIATION_EXPRESSION,
                    &[],
                );
            } else {
                let operator = token_to_string(unary_operator).unwrap_or("");
                self.parse_error_at(
                    start,
                    range.end,
                    &messages::AN_UNARY_EXPRESSION_CANNOT_APPEAR_ON_THE_LEFT_HAND_SIDE_OF_AN_EXPONENTIATION_EXPRESSION,
                    &[operator],
                );
            }
        }
        simple_unary_expression
    }

    fn is_update_expression(&self) -> bool {
        match self.token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::AwaitKeyword => false,
            // In TSX `<` opens an element, which is an update expression.
            SyntaxKind::LessThanToken => self.is_jsx(),
            _ => true,
        }
    }

    fn parse_simple_unary_expression(&mut self) -> NodeId {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            return self.parse_too_deep(SyntaxKind::Identifier, &messages::EXPRESSION_EXPECTED);
        }
        self.recursion_depth += 1;
        let expression = self.parse_simple_unary_expression_worker();
        self.recursion_depth -= 1;
        expression
    }

    fn parse_simple_unary_expression_worker(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::PlusToken | SyntaxKind::MinusToken | SyntaxKind::TildeToken | SyntaxKind::ExclamationToken => {
                let pos = self.node_pos();
                let operator = self.token();
                self.next_token();
                let operand = self.parse_simple_unary_expression();
                self.finish_node(
                    SyntaxKind::PrefixUnaryExpression,
                    pos,
                    NodeVariant::Unary(Unary { operator, operand }),
                )
            }
            SyntaxKind::DeleteKeyword => self.parse_keyword_unary(SyntaxKind::DeleteExpression),
            SyntaxKind::TypeOfKeyword => self.parse_keyword_unary(SyntaxKind::TypeOfExpression),
            SyntaxKind::VoidKeyword => self.parse_keyword_unary(SyntaxKind::VoidExpression),
            SyntaxKind::LessThanToken => {
                if self.is_jsx() {
                    return self.parse_jsx_element_or_self_closing_element_or_fragment(true, None, true);
                }
                self.parse_type_assertion()
            }
            SyntaxKind::AwaitKeyword if self.is_await_expression() => {
                self.parse_keyword_unary(SyntaxKind::AwaitExpression)
            }
            _ => self.parse_update_expression(),
        }
    }

    /// `delete x`, `typeof x`, `void x`, `await x`.
    fn parse_keyword_unary(&mut self, kind: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        self.next_token();
        let expression = self.parse_simple_unary_expression();
        self.finish_node(kind, pos, NodeVariant::SingleExpression { expression })
    }

    fn is_await_expression(&mut self) -> bool {
        if self.token() != SyntaxKind::AwaitKeyword {
            return false;
        }
        self.in_await_context() || self.look_ahead(Self::next_token_is_identifier_or_keyword_or_literal_on_same_line)
    }

    fn parse_type_assertion(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::LessThanToken);
        let type_node = self.parse_type();
        self.parse_expected(SyntaxKind::GreaterThanToken);
        let expression = self.parse_simple_unary_expression();
        self.finish_node(
            SyntaxKind::TypeAssertionExpression,
            pos,
            NodeVariant::TypeAssertion(TypeAssertion { type_node, expression }),
        )
    }

    fn parse_update_expression(&mut self) -> NodeId {
        if matches!(self.token(), SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken) {
            let pos = self.node_pos();
            let operator = self.token();
            self.next_token();
            let operand = self.parse_left_hand_side_expression_or_higher();
            return self.finish_node(
                SyntaxKind::PrefixUnaryExpression,
                pos,
                NodeVariant::Unary(Unary { operator, operand }),
            );
        }
        if self.is_jsx()
            && self.token() == SyntaxKind::LessThanToken
            && self.look_ahead(Self::next_token_is_identifier_or_keyword_or_greater_than)
        {
            return self.parse_jsx_element_or_self_closing_element_or_fragment(true, None, false);
        }

        let expression = self.parse_left_hand_side_expression_or_higher();
        if matches!(self.token(), SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
            && !self.has_preceding_line_break()
        {
            let operator = self.token();
            self.next_token();
            let pos = self.arena[expression].pos();
            return self.finish_node(
                SyntaxKind::PostfixUnaryExpression,
                pos,
                NodeVariant::Unary(Unary {
                    operator,
                    operand: expression,
                }),
            );
        }
        expression
    }

    // ========================================================================
    // Left-hand-side expressions
    // ========================================================================

    pub(crate) fn parse_left_hand_side_expression_or_higher(&mut self) -> NodeId {
        let pos = self.node_pos();
        let expression = if self.token() == SyntaxKind::ImportKeyword {
            if self.look_ahead(|parser| {
                matches!(parser.next_token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken)
            }) {
                // `import(...)`: the keyword is the callee.
                self.parse_token_node()
            } else if self.look_ahead(Self::next_token_is_dot) {
                self.next_token();
                self.next_token();
                let name = self.parse_identifier_name();
                self.finish_node(
                    SyntaxKind::MetaProperty,
                    pos,
                    NodeVariant::MetaProperty(MetaProperty {
                        keyword_token: SyntaxKind::ImportKeyword,
                        name,
                    }),
                )
            } else {
                self.parse_member_expression_or_higher()
            }
        } else if self.token() == SyntaxKind::SuperKeyword {
            self.parse_super_expression()
        } else {
            self.parse_member_expression_or_higher()
        };
        self.parse_call_expression_rest(pos, expression)
    }

    fn parse_member_expression_or_higher(&mut self) -> NodeId {
        let pos = self.node_pos();
        let expression = self.parse_primary_expression();
        self.parse_member_expression_rest(pos, expression, true)
    }

    fn parse_super_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        let mut expression = self.parse_token_node();
        if self.token() == SyntaxKind::LessThanToken {
            let start = self.node_pos();
            if let Some(type_arguments) = self.try_parse(Self::parse_type_arguments_in_expression) {
                let end = self.node_pos();
                self.parse_error_at(start, end, &messages::SUPER_MAY_NOT_USE_TYPE_ARGUMENTS, &[]);
                if !self.is_template_start_of_tagged_template() {
                    expression = self.finish_node(
                        SyntaxKind::ExpressionWithTypeArguments,
                        pos,
                        NodeVariant::ExpressionWithTypeArguments(ExpressionWithTypeArguments {
                            expression,
                            type_arguments: Some(type_arguments),
                        }),
                    );
                }
            }
        }
        if matches!(
            self.token(),
            SyntaxKind::OpenParenToken | SyntaxKind::DotToken | SyntaxKind::OpenBracketToken
        ) {
            return expression;
        }
        // `super` alone: report and treat it as `super.<name>`.
        self.parse_expected_with(
            SyntaxKind::DotToken,
            Some(&messages::SUPER_MUST_BE_FOLLOWED_BY_AN_ARGUMENT_LIST_OR_MEMBER_ACCESS),
            true,
        );
        let name = self.parse_right_side_of_dot(true, true);
        self.finish_node(
            SyntaxKind::PropertyAccessExpression,
            pos,
            NodeVariant::PropertyAccess(PropertyAccess {
                expression,
                question_dot_token: None,
                name,
            }),
        )
    }

    fn is_start_of_optional_property_or_element_access_chain(&mut self) -> bool {
        self.token() == SyntaxKind::QuestionDotToken
            && self.look_ahead(|parser| {
                parser.next_token();
                token_is_identifier_or_keyword(parser.token())
                    || parser.token() == SyntaxKind::OpenBracketToken
                    || parser.is_template_start_of_tagged_template()
            })
    }

    /// `.name`, `?.name`, `[index]`, tagged templates, `!`, and
    /// instantiation expressions after `expression`.
    fn parse_member_expression_rest(&mut self, pos: TextPos, mut expression: NodeId, allow_optional_chain: bool) -> NodeId {
        loop {
            let mut question_dot_token = None;
            let is_property_access = if allow_optional_chain && self.is_start_of_optional_property_or_element_access_chain()
            {
                question_dot_token = Some(self.parse_expected_token(SyntaxKind::QuestionDotToken));
                token_is_identifier_or_keyword(self.token())
            } else {
                self.parse_optional(SyntaxKind::DotToken)
            };

            if is_property_access {
                expression = self.parse_property_access_expression_rest(pos, expression, question_dot_token);
                continue;
            }

            // A decorator `@a[b]` ends before `[`.
            if (question_dot_token.is_some() || !self.in_decorator_context())
                && self.parse_optional(SyntaxKind::OpenBracketToken)
            {
                expression = self.parse_element_access_expression_rest(pos, expression, question_dot_token);
                continue;
            }

            if self.is_template_start_of_tagged_template() {
                expression = match self.instantiation_parts(expression) {
                    Some((tag, type_arguments)) if question_dot_token.is_none() => {
                        self.parse_tagged_template_rest(pos, tag, question_dot_token, type_arguments)
                    }
                    _ => self.parse_tagged_template_rest(pos, expression, question_dot_token, None),
                };
                continue;
            }

            if question_dot_token.is_none() {
                if self.token() == SyntaxKind::ExclamationToken && !self.has_preceding_line_break() {
                    self.next_token();
                    expression = self.finish_node(
                        SyntaxKind::NonNullExpression,
                        pos,
                        NodeVariant::SingleExpression { expression },
                    );
                    continue;
                }
                if let Some(type_arguments) = self.try_parse(Self::parse_type_arguments_in_expression) {
                    expression = self.finish_node(
                        SyntaxKind::ExpressionWithTypeArguments,
                        pos,
                        NodeVariant::ExpressionWithTypeArguments(ExpressionWithTypeArguments {
                            expression,
                            type_arguments: Some(type_arguments),
                        }),
                    );
                    continue;
                }
            }
            return expression;
        }
    }

    /// The callee and type arguments of an instantiation expression `f<T>`.
    fn instantiation_parts(&self, id: NodeId) -> Option<(NodeId, Option<NodeList>)> {
        match &self.arena[id].variant {
            NodeVariant::ExpressionWithTypeArguments(node) if self.kind_of(id) == SyntaxKind::ExpressionWithTypeArguments => {
                Some((node.expression, node.type_arguments.clone()))
            }
            _ => None,
        }
    }

    fn parse_property_access_expression_rest(
        &mut self,
        pos: TextPos,
        expression: NodeId,
        question_dot_token: Option<NodeId>,
    ) -> NodeId {
        let name = self.parse_right_side_of_dot(true, true);
        let is_optional_chain = question_dot_token.is_some() || self.try_reparse_optional_chain(expression);
        if is_optional_chain && self.kind_of(name) == SyntaxKind::PrivateIdentifier {
            self.parse_error_at_node(name, &messages::AN_OPTIONAL_CHAIN_CANNOT_CONTAIN_PRIVATE_IDENTIFIERS, &[]);
        }
        if let Some((_, Some(type_arguments))) = self.instantiation_parts(expression) {
            let start = type_arguments.range.pos.saturating_sub(1);
            let end = skip_trivia(self.source_text, type_arguments.range.end) + 1;
            self.parse_error_at(
                start,
                end,
                &messages::AN_INSTANTIATION_EXPRESSION_CANNOT_BE_FOLLOWED_BY_A_PROPERTY_ACCESS,
                &[],
            );
        }
        self.finish_node_with_flags(
            SyntaxKind::PropertyAccessExpression,
            pos,
            NodeVariant::PropertyAccess(PropertyAccess {
                expression,
                question_dot_token,
                name,
            }),
            optional_chain_flag(is_optional_chain),
        )
    }

    fn parse_element_access_expression_rest(
        &mut self,
        pos: TextPos,
        expression: NodeId,
        question_dot_token: Option<NodeId>,
    ) -> NodeId {
        let argument_expression = if self.token() == SyntaxKind::CloseBracketToken {
            self.create_missing_node(
                SyntaxKind::Identifier,
                true,
                Some(&messages::AN_ELEMENT_ACCESS_EXPRESSION_SHOULD_TAKE_AN_ARGUMENT),
                &[],
            )
        } else {
            self.allow_in_and(Self::parse_expression)
        };
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let is_optional_chain = question_dot_token.is_some() || self.try_reparse_optional_chain(expression);
        self.finish_node_with_flags(
            SyntaxKind::ElementAccessExpression,
            pos,
            NodeVariant::ElementAccess(ElementAccess {
                expression,
                question_dot_token,
                argument_expression,
            }),
            optional_chain_flag(is_optional_chain),
        )
    }

    /// Whether `id` continues an optional chain. `a?.b!.c` keeps the chain
    /// going through the non-null assertions, which are marked to match.
    fn try_reparse_optional_chain(&self, id: NodeId) -> bool {
        if self.arena[id].flags().contains(NodeFlags::OPTIONAL_CHAIN) {
            return true;
        }
        if self.kind_of(id) != SyntaxKind::NonNullExpression {
            return false;
        }
        let mut inner = non_null_operand(self, id);
        while let Some(expression) = inner {
            let node = &self.arena[expression];
            if node.flags().contains(NodeFlags::OPTIONAL_CHAIN) {
                let mut current = Some(id);
                while let Some(non_null) = current {
                    let flags = &self.arena[non_null].data.flags;
                    flags.set(flags.get() | NodeFlags::OPTIONAL_CHAIN);
                    current = non_null_operand(self, non_null);
                }
                return true;
            }
            inner = non_null_operand(self, expression);
        }
        false
    }

    fn parse_tagged_template_rest(
        &mut self,
        pos: TextPos,
        tag: NodeId,
        question_dot_token: Option<NodeId>,
        type_arguments: Option<NodeList>,
    ) -> NodeId {
        let template = if self.token() == SyntaxKind::NoSubstitutionTemplateLiteral {
            self.re_scan_template_token(true);
            self.parse_literal_node()
        } else {
            self.parse_template_expression(true)
        };
        let in_chain =
            question_dot_token.is_some() || self.arena[tag].flags().contains(NodeFlags::OPTIONAL_CHAIN);
        self.finish_node_with_flags(
            SyntaxKind::TaggedTemplateExpression,
            pos,
            NodeVariant::TaggedTemplate(TaggedTemplate {
                tag,
                type_arguments,
                template,
            }),
            optional_chain_flag(in_chain),
        )
    }

    fn parse_call_expression_rest(&mut self, pos: TextPos, mut expression: NodeId) -> NodeId {
        loop {
            expression = self.parse_member_expression_rest(pos, expression, true);
            let mut type_arguments = None;
            let question_dot_token = self.parse_optional_token(SyntaxKind::QuestionDotToken);
            if question_dot_token.is_some() {
                type_arguments = self.try_parse(Self::parse_type_arguments_in_expression);
                if self.is_template_start_of_tagged_template() {
                    expression = self.parse_tagged_template_rest(pos, expression, question_dot_token, type_arguments);
                    continue;
                }
            }
            if type_arguments.is_some() || self.token() == SyntaxKind::OpenParenToken {
                // `f<T>(x)` was first read as an instantiation expression.
                if question_dot_token.is_none() {
                    if let Some((callee, instantiation_arguments)) = self.instantiation_parts(expression) {
                        type_arguments = instantiation_arguments;
                        expression = callee;
                    }
                }
                let arguments = self.parse_argument_list();
                let is_optional_chain = question_dot_token.is_some() || self.try_reparse_optional_chain(expression);
                expression = self.finish_node_with_flags(
                    SyntaxKind::CallExpression,
                    pos,
                    NodeVariant::Call(Call {
                        expression,
                        question_dot_token,
                        type_arguments,
                        arguments: Some(arguments),
                    }),
                    optional_chain_flag(is_optional_chain),
                );
                continue;
            }
            if question_dot_token.is_some() {
                // `a?.` with nothing after it.
                let name = self.create_missing_node(SyntaxKind::Identifier, false, Some(&messages::IDENTIFIER_EXPECTED), &[]);
                expression = self.finish_node_with_flags(
                    SyntaxKind::PropertyAccessExpression,
                    pos,
                    NodeVariant::PropertyAccess(PropertyAccess {
                        expression,
                        question_dot_token,
                        name,
                    }),
                    NodeFlags::OPTIONAL_CHAIN,
                );
            }
            break;
        }
        expression
    }

    fn parse_argument_list(&mut self) -> NodeList {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let arguments = self.parse_delimited_list(ParsingContext::ArgumentExpressions, Self::parse_argument_expression, false);
        self.parse_expected(SyntaxKind::CloseParenToken);
        arguments
    }

    fn parse_argument_expression(&mut self) -> NodeId {
        self.do_outside_of_context(
            NodeFlags::DISALLOW_IN_CONTEXT | NodeFlags::DECORATOR_CONTEXT,
            Self::parse_argument_or_array_literal_element,
        )
    }

    fn parse_argument_or_array_literal_element(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::DotDotDotToken => {
                let pos = self.node_pos();
                self.parse_expected(SyntaxKind::DotDotDotToken);
                let expression = self.parse_assignment_expression_or_higher();
                self.finish_node(SyntaxKind::SpreadElement, pos, NodeVariant::SingleExpression { expression })
            }
            SyntaxKind::CommaToken => {
                let pos = self.node_pos();
                self.finish_node(SyntaxKind::OmittedExpression, pos, NodeVariant::Token)
            }
            _ => self.parse_assignment_expression_or_higher(),
        }
    }

    /// `<T>` in an expression. Only accepted when what follows could not
    /// continue a comparison, so `a < b > c` stays binary.
    fn parse_type_arguments_in_expression(&mut self) -> Option<NodeList> {
        if self.in_context(NodeFlags::JAVASCRIPT_FILE) {
            return None;
        }
        if self.re_scan_less_than_token() != SyntaxKind::LessThanToken {
            return None;
        }
        self.next_token();
        let type_arguments = self.parse_delimited_list(ParsingContext::TypeArguments, Self::parse_type, false);
        if self.re_scan_greater_token() != SyntaxKind::GreaterThanToken {
            return None;
        }
        self.next_token();
        self.can_follow_type_arguments_in_expression().then_some(type_arguments)
    }

    fn can_follow_type_arguments_in_expression(&mut self) -> bool {
        match self.token() {
            SyntaxKind::OpenParenToken | SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => true,
            SyntaxKind::LessThanToken | SyntaxKind::GreaterThanToken | SyntaxKind::PlusToken | SyntaxKind::MinusToken => {
                false
            }
            _ => self.has_preceding_line_break() || self.is_binary_operator() || !self.is_start_of_expression(),
        }
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_primary_expression(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral => return self.parse_literal_node(),
            SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => return self.parse_token_node(),
            SyntaxKind::OpenParenToken => return self.parse_parenthesized_expression(),
            SyntaxKind::OpenBracketToken => return self.parse_array_literal_expression(),
            SyntaxKind::OpenBraceToken => return self.parse_object_literal_expression(),
            SyntaxKind::AsyncKeyword => {
                // `async` alone is an identifier.
                if self.look_ahead(Self::next_token_is_function_keyword_on_same_line) {
                    return self.parse_function_expression();
                }
            }
            SyntaxKind::AtToken => return self.parse_decorated_expression(),
            SyntaxKind::ClassKeyword => {
                return self.parse_class_declaration_or_expression(self.node_pos(), None, SyntaxKind::ClassExpression)
            }
            SyntaxKind::FunctionKeyword => return self.parse_function_expression(),
            SyntaxKind::NewKeyword => return self.parse_new_expression_or_new_dot_target(),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                if self.re_scan_slash_token() == SyntaxKind::RegularExpressionLiteral {
                    return self.parse_literal_node();
                }
            }
            SyntaxKind::TemplateHead => return self.parse_template_expression(false),
            SyntaxKind::PrivateIdentifier => return self.parse_private_identifier(),
            _ => {}
        }
        self.parse_identifier_with_message(&messages::EXPRESSION_EXPECTED)
    }

    fn parse_parenthesized_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.allow_in_and(Self::parse_expression);
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.finish_node(
            SyntaxKind::ParenthesizedExpression,
            pos,
            NodeVariant::SingleExpression { expression },
        )
    }

    fn parse_array_literal_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let multi_line = self.has_preceding_line_break();
        let elements = self.parse_delimited_list(
            ParsingContext::ArrayLiteralMembers,
            Self::parse_argument_or_array_literal_element,
            false,
        );
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.finish_node(
            SyntaxKind::ArrayLiteralExpression,
            pos,
            NodeVariant::ArrayLiteral { elements, multi_line },
        )
    }

    fn parse_object_literal_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let multi_line = self.has_preceding_line_break();
        // A `;` between members is reported and treated as `,`.
        let properties = self.parse_delimited_list(
            ParsingContext::ObjectLiteralMembers,
            Self::parse_object_literal_element,
            true,
        );
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.finish_node(
            SyntaxKind::ObjectLiteralExpression,
            pos,
            NodeVariant::ObjectLiteral { properties, multi_line },
        )
    }

    fn parse_object_literal_element(&mut self) -> NodeId {
        let pos = self.node_pos();
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression_or_higher();
            return self.finish_node(SyntaxKind::SpreadAssignment, pos, NodeVariant::SingleExpression { expression });
        }

        let modifiers = self.parse_modifiers(true, false, false);
        if self.parse_contextual_modifier(SyntaxKind::GetKeyword) {
            return self.parse_accessor_declaration(pos, modifiers, SyntaxKind::GetAccessor, SignatureFlags::NONE);
        }
        if self.parse_contextual_modifier(SyntaxKind::SetKeyword) {
            return self.parse_accessor_declaration(pos, modifiers, SyntaxKind::SetAccessor, SignatureFlags::NONE);
        }

        let asterisk_token = self.parse_optional_token(SyntaxKind::AsteriskToken);
        let token_is_identifier = self.is_identifier();
        let name = self.parse_property_name();
        let question_token = self.parse_optional_token(SyntaxKind::QuestionToken);
        // `!` is never valid here; it is consumed for recovery.
        self.parse_optional_token(SyntaxKind::ExclamationToken);

        if asterisk_token.is_some() || matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
            return self.parse_method_declaration(pos, modifiers, asterisk_token, name, question_token);
        }

        // `{ a }` and `{ a = 1 }` (the latter only valid as a destructuring
        // target).
        if token_is_identifier && self.token() != SyntaxKind::ColonToken {
            let equals_token = self.parse_optional_token(SyntaxKind::EqualsToken);
            let object_assignment_initializer =
                equals_token.map(|_| self.allow_in_and(Self::parse_assignment_expression_or_higher));
            return self.finish_node(
                SyntaxKind::ShorthandPropertyAssignment,
                pos,
                NodeVariant::ShorthandPropertyAssignment(ShorthandPropertyAssignment {
                    name,
                    equals_token,
                    object_assignment_initializer,
                }),
            );
        }
        self.parse_expected(SyntaxKind::ColonToken);
        let initializer = self.allow_in_and(Self::parse_assignment_expression_or_higher);
        self.finish_node(
            SyntaxKind::PropertyAssignment,
            pos,
            NodeVariant::PropertyAssignment(PropertyAssignment {
                name,
                question_token,
                initializer,
            }),
        )
    }

    fn parse_function_expression(&mut self) -> NodeId {
        self.do_outside_of_context(NodeFlags::DECORATOR_CONTEXT, |parser| {
            let pos = parser.node_pos();
            let modifiers = parser.parse_modifiers(false, false, false);
            parser.parse_expected(SyntaxKind::FunctionKeyword);
            let asterisk_token = parser.parse_optional_token(SyntaxKind::AsteriskToken);
            let mut flags = SignatureFlags::NONE;
            let mut name_context = NodeFlags::NONE;
            if asterisk_token.is_some() {
                flags |= SignatureFlags::YIELD;
                name_context |= NodeFlags::YIELD_CONTEXT;
            }
            if parser.modifiers_include(&modifiers, SyntaxKind::AsyncKeyword) {
                flags |= SignatureFlags::AWAIT;
                name_context |= NodeFlags::AWAIT_CONTEXT;
            }
            // The name of `function* yield` follows the generator's own rules.
            let name = parser.do_inside_of_context(name_context, |parser| {
                parser.is_binding_identifier().then(|| parser.parse_binding_identifier())
            });
            let type_parameters = parser.parse_type_parameters();
            let parameters = parser.parse_parameters(flags);
            let type_node = parser.parse_return_type(SyntaxKind::ColonToken, false);
            let body = parser.parse_function_block(flags, None);
            parser.finish_node(
                SyntaxKind::FunctionExpression,
                pos,
                NodeVariant::FunctionLike(FunctionLike {
                    modifiers,
                    asterisk_token,
                    name,
                    type_parameters,
                    parameters,
                    type_node,
                    body: Some(body),
                    ..Default::default()
                }),
            )
        })
    }

    fn parse_decorated_expression(&mut self) -> NodeId {
        let pos = self.node_pos();
        let modifiers = self.parse_modifiers(true, false, false);
        if self.token() == SyntaxKind::ClassKeyword {
            return self.parse_class_declaration_or_expression(pos, modifiers, SyntaxKind::ClassExpression);
        }
        let missing = self.create_missing_node(
            SyntaxKind::MissingDeclaration,
            true,
            Some(&messages::EXPRESSION_EXPECTED),
            &[],
        );
        let node = self.arena.get_mut(missing);
        node.data.range.pos = pos;
        node.variant = NodeVariant::MissingDeclaration { modifiers };
        missing
    }

    fn parse_new_expression_or_new_dot_target(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::NewKeyword);
        if self.parse_optional(SyntaxKind::DotToken) {
            let name = self.parse_identifier_name();
            return self.finish_node(
                SyntaxKind::MetaProperty,
                pos,
                NodeVariant::MetaProperty(MetaProperty {
                    keyword_token: SyntaxKind::NewKeyword,
                    name,
                }),
            );
        }

        let expression_pos = self.node_pos();
        let primary = self.parse_primary_expression();
        let mut expression = self.parse_member_expression_rest(expression_pos, primary, false);
        let mut type_arguments = None;
        if let Some((callee, arguments)) = self.instantiation_parts(expression) {
            type_arguments = arguments;
            expression = callee;
        }
        if self.token() == SyntaxKind::QuestionDotToken {
            let range = self.arena[expression].range();
            let start = skip_trivia(self.source_text, range.pos) as usize;
            let text = self.source_text.get(start..range.end as usize).unwrap_or("").to_string();
            self.parse_error_at_current_token(
                &messages::INVALID_OPTIONAL_CHAIN_FROM_NEW_EXPRESSION_DID_YOU_MEAN_TO_CALL_0,
                &[text.as_str()],
            );
        }
        let arguments = (self.token() == SyntaxKind::OpenParenToken).then(|| self.parse_argument_list());
        self.finish_node(
            SyntaxKind::NewExpression,
            pos,
            NodeVariant::Call(Call {
                expression,
                question_dot_token: None,
                type_arguments,
                arguments,
            }),
        )
    }

    // ========================================================================
    // Templates
    // ========================================================================

    fn parse_template_expression(&mut self, is_tagged_template: bool) -> NodeId {
        let pos = self.node_pos();
        let head = self.parse_template_head(is_tagged_template);
        let spans_pos = self.node_pos();
        let mut spans = Vec::new();
        loop {
            let span_pos = self.node_pos();
            let expression = self.allow_in_and(Self::parse_expression);
            let literal = self.parse_literal_of_template_span(is_tagged_template);
            let is_middle = self.kind_of(literal) == SyntaxKind::TemplateMiddle;
            spans.push(self.finish_node(
                SyntaxKind::TemplateSpan,
                span_pos,
                NodeVariant::TemplateSpan(TemplateSpan { expression, literal }),
            ));
            if !is_middle {
                break;
            }
        }
        let template_spans = NodeList::new(spans, spans_pos, self.node_pos());
        self.finish_node(
            SyntaxKind::TemplateExpression,
            pos,
            NodeVariant::Template(Template { head, template_spans }),
        )
    }

    pub(crate) fn parse_template_head(&mut self, _is_tagged_template: bool) -> NodeId {
        self.parse_literal_node()
    }

    /// The `}...${` or `}...`` ` that closes a substitution. The scanner saw
    /// `}` as a brace; rescan it as template text.
    pub(crate) fn parse_literal_of_template_span(&mut self, is_tagged_template: bool) -> NodeId {
        if self.token() == SyntaxKind::CloseBraceToken {
            self.re_scan_template_token(is_tagged_template);
            return self.parse_literal_node();
        }
        self.create_missing_node(SyntaxKind::TemplateTail, false, Some(&messages::_0_EXPECTED), &["}"])
    }

    // ========================================================================
    // Arrow functions
    // ========================================================================

    fn try_parse_parenthesized_arrow_function_expression(
        &mut self,
        allow_return_type_in_arrow_function: bool,
    ) -> Option<NodeId> {
        match self.is_parenthesized_arrow_function_expression() {
            Tristate::False => None,
            Tristate::True => self.parse_parenthesized_arrow_function_expression(true, true),
            Tristate::Unknown => self.try_parse(|parser| {
                parser.parse_possible_parenthesized_arrow_function_expression(allow_return_type_in_arrow_function)
            }),
        }
    }

    fn is_parenthesized_arrow_function_expression(&mut self) -> Tristate {
        match self.token() {
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken | SyntaxKind::AsyncKeyword => {
                self.look_ahead(Self::is_parenthesized_arrow_function_expression_worker)
            }
            // A stray `=>` parses as an arrow function with no parameters.
            SyntaxKind::EqualsGreaterThanToken => Tristate::True,
            _ => Tristate::False,
        }
    }

    fn is_parenthesized_arrow_function_expression_worker(&mut self) -> Tristate {
        if self.token() == SyntaxKind::AsyncKeyword {
            self.next_token();
            if self.has_preceding_line_break() {
                return Tristate::False;
            }
            if !matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
                return Tristate::False;
            }
        }

        let first = self.token();
        let second = self.next_token();
        if first == SyntaxKind::OpenParenToken {
            if second == SyntaxKind::CloseParenToken {
                // `()` followed by `=>`, `:` or `{` is an arrow function.
                return match self.next_token() {
                    SyntaxKind::EqualsGreaterThanToken | SyntaxKind::ColonToken | SyntaxKind::OpenBraceToken => {
                        Tristate::True
                    }
                    _ => Tristate::False,
                };
            }
            // `([` and `({` may be destructuring parameters or expressions.
            if matches!(second, SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken) {
                return Tristate::Unknown;
            }
            if second == SyntaxKind::DotDotDotToken {
                return Tristate::True;
            }
            // `(public x` is a parameter property, but `(readonly as T)` is not.
            if second.is_modifier_kind()
                && second != SyntaxKind::AsyncKeyword
                && self.look_ahead(|parser| {
                    parser.next_token();
                    parser.is_identifier()
                })
            {
                if self.next_token() == SyntaxKind::AsKeyword {
                    return Tristate::False;
                }
                return Tristate::True;
            }
            if !self.is_identifier() && second != SyntaxKind::ThisKeyword {
                return Tristate::False;
            }
            return match self.next_token() {
                SyntaxKind::ColonToken => Tristate::True,
                SyntaxKind::QuestionToken => {
                    self.next_token();
                    if matches!(
                        self.token(),
                        SyntaxKind::ColonToken
                            | SyntaxKind::CommaToken
                            | SyntaxKind::EqualsToken
                            | SyntaxKind::CloseParenToken
                    ) {
                        Tristate::True
                    } else {
                        Tristate::False
                    }
                }
                SyntaxKind::CommaToken | SyntaxKind::EqualsToken | SyntaxKind::CloseParenToken => Tristate::Unknown,
                _ => Tristate::False,
            };
        }

        // `<T>(x) => x`, or in TSX possibly an element.
        if !self.is_identifier() && self.token() != SyntaxKind::ConstKeyword {
            return Tristate::False;
        }
        if self.is_jsx() {
            let is_arrow_function_in_jsx = self.look_ahead(|parser| {
                parser.parse_optional(SyntaxKind::ConstKeyword);
                match parser.next_token() {
                    SyntaxKind::ExtendsKeyword => !matches!(
                        parser.next_token(),
                        SyntaxKind::EqualsToken | SyntaxKind::GreaterThanToken | SyntaxKind::SlashToken
                    ),
                    SyntaxKind::CommaToken | SyntaxKind::EqualsToken => true,
                    _ => false,
                }
            });
            return if is_arrow_function_in_jsx {
                Tristate::True
            } else {
                Tristate::False
            };
        }
        Tristate::Unknown
    }

    fn parse_possible_parenthesized_arrow_function_expression(
        &mut self,
        allow_return_type_in_arrow_function: bool,
    ) -> Option<NodeId> {
        let token_pos = self.token_pos();
        if self.not_parenthesized_arrow.contains(&token_pos) {
            return None;
        }
        let result = self.parse_parenthesized_arrow_function_expression(false, allow_return_type_in_arrow_function);
        if result.is_none() {
            self.not_parenthesized_arrow.insert(token_pos);
        }
        result
    }

    fn try_parse_async_simple_arrow_function_expression(
        &mut self,
        allow_return_type_in_arrow_function: bool,
    ) -> Option<NodeId> {
        if self.token() != SyntaxKind::AsyncKeyword
            || self.look_ahead(Self::is_un_parenthesized_async_arrow_function_worker) != Tristate::True
        {
            return None;
        }
        let pos = self.node_pos();
        let async_modifier = self.parse_modifiers_for_arrow_function();
        let expression = self.parse_binary_expression_or_higher(OperatorPrecedence::LOWEST);
        Some(self.parse_simple_arrow_function_expression(
            pos,
            expression,
            allow_return_type_in_arrow_function,
            async_modifier,
        ))
    }

    fn is_un_parenthesized_async_arrow_function_worker(&mut self) -> Tristate {
        if self.token() == SyntaxKind::AsyncKeyword {
            self.next_token();
            if self.has_preceding_line_break() || self.token() == SyntaxKind::EqualsGreaterThanToken {
                return Tristate::False;
            }
            let expression = self.parse_binary_expression_or_higher(OperatorPrecedence::LOWEST);
            if !self.has_preceding_line_break()
                && self.kind_of(expression) == SyntaxKind::Identifier
                && self.token() == SyntaxKind::EqualsGreaterThanToken
            {
                return Tristate::True;
            }
        }
        Tristate::False
    }

    fn parse_modifiers_for_arrow_function(&mut self) -> Option<NodeList> {
        if self.token() != SyntaxKind::AsyncKeyword {
            return None;
        }
        let pos = self.node_pos();
        self.next_token();
        let modifier = self.finish_node(SyntaxKind::AsyncKeyword, pos, NodeVariant::Token);
        Some(NodeList::new(vec![modifier], pos, self.node_pos()))
    }

    /// `x => body`, with `identifier` already parsed.
    fn parse_simple_arrow_function_expression(
        &mut self,
        pos: TextPos,
        identifier: NodeId,
        allow_return_type_in_arrow_function: bool,
        async_modifier: Option<NodeList>,
    ) -> NodeId {
        let range = self.arena[identifier].range();
        let parameter = self.finish_node_at(
            SyntaxKind::Parameter,
            range.pos,
            range.end,
            NodeVariant::Parameter(Parameter {
                modifiers: None,
                dot_dot_dot_token: None,
                name: identifier,
                question_token: None,
                type_node: None,
                initializer: None,
            }),
            NodeFlags::NONE,
        );
        let parameters = NodeList::new(vec![parameter], range.pos, range.end);
        let equals_greater_than_token = self.parse_expected_token(SyntaxKind::EqualsGreaterThanToken);
        let is_async = async_modifier.is_some();
        let body = self.parse_arrow_function_expression_body(is_async, allow_return_type_in_arrow_function);
        self.finish_node(
            SyntaxKind::ArrowFunction,
            pos,
            NodeVariant::FunctionLike(FunctionLike {
                modifiers: async_modifier,
                parameters,
                equals_greater_than_token: Some(equals_greater_than_token),
                body: Some(body),
                ..Default::default()
            }),
        )
    }

    /// With `allow_ambiguity` off this gives up (`None`) at the first sign
    /// that the text is not an arrow function.
    fn parse_parenthesized_arrow_function_expression(
        &mut self,
        allow_ambiguity: bool,
        allow_return_type_in_arrow_function: bool,
    ) -> Option<NodeId> {
        let pos = self.node_pos();
        let modifiers = self.parse_modifiers_for_arrow_function();
        let is_async = self.modifiers_include(&modifiers, SyntaxKind::AsyncKeyword);
        let flags = if is_async {
            SignatureFlags::AWAIT
        } else {
            SignatureFlags::NONE
        };
        let type_parameters = self.parse_type_parameters();

        let parameters = if !self.parse_expected(SyntaxKind::OpenParenToken) {
            if !allow_ambiguity {
                return None;
            }
            NodeList::empty(self.node_pos())
        } else {
            let parameters = if allow_ambiguity {
                self.parse_parameters_worker(flags)
            } else {
                self.try_parse_parameters_for_speculation(flags)?
            };
            if !self.parse_expected(SyntaxKind::CloseParenToken) && !allow_ambiguity {
                return None;
            }
            parameters
        };

        let has_return_colon = self.token() == SyntaxKind::ColonToken;
        let type_node = self.parse_return_type(SyntaxKind::ColonToken, false);
        if let Some(type_node) = type_node {
            if !allow_ambiguity && self.type_has_arrow_function_blocking_parse_error(type_node) {
                return None;
            }
        }

        // `(a, b)` followed by anything but `=>` or `{` is not an arrow.
        if !allow_ambiguity
            && self.token() != SyntaxKind::EqualsGreaterThanToken
            && self.token() != SyntaxKind::OpenBraceToken
        {
            return None;
        }

        let last_token = self.token();
        let equals_greater_than_token = self.parse_expected_token(SyntaxKind::EqualsGreaterThanToken);
        let body = if matches!(
            last_token,
            SyntaxKind::EqualsGreaterThanToken | SyntaxKind::OpenBraceToken
        ) {
            self.parse_arrow_function_expression_body(is_async, allow_return_type_in_arrow_function)
        } else {
            self.parse_identifier()
        };

        // In `a ? (b): c => d` the `: c` belongs to the conditional.
        if !allow_return_type_in_arrow_function && has_return_colon && self.token() != SyntaxKind::ColonToken {
            return None;
        }

        Some(self.finish_node(
            SyntaxKind::ArrowFunction,
            pos,
            NodeVariant::FunctionLike(FunctionLike {
                modifiers,
                type_parameters,
                parameters,
                type_node,
                equals_greater_than_token: Some(equals_greater_than_token),
                body: Some(body),
                ..Default::default()
            }),
        ))
    }

    /// A type that parsed only by inventing pieces, which rules out the
    /// arrow-function reading.
    fn type_has_arrow_function_blocking_parse_error(&self, id: NodeId) -> bool {
        match &self.arena[id].variant {
            NodeVariant::TypeReference(reference) => self.arena[reference.type_name].is_missing(),
            NodeVariant::FunctionLike(function)
                if matches!(self.kind_of(id), SyntaxKind::FunctionType | SyntaxKind::ConstructorType) =>
            {
                let parameters_missing = self
                    .source_text
                    .as_bytes()
                    .get((function.parameters.range.pos as usize).wrapping_sub(1))
                    != Some(&b'(');
                parameters_missing
                    || function
                        .type_node
                        .is_some_and(|type_node| self.type_has_arrow_function_blocking_parse_error(type_node))
            }
            NodeVariant::WrappedType(wrapped) if self.kind_of(id) == SyntaxKind::ParenthesizedType => {
                self.type_has_arrow_function_blocking_parse_error(wrapped.type_node)
            }
            _ => false,
        }
    }

    fn parse_arrow_function_expression_body(&mut self, is_async: bool, allow_return_type_in_arrow_function: bool) -> NodeId {
        let await_flag = if is_async {
            SignatureFlags::AWAIT
        } else {
            SignatureFlags::NONE
        };
        if self.token() == SyntaxKind::OpenBraceToken {
            return self.parse_function_block(await_flag, None);
        }
        // `() => var x` : a statement where an expression body belongs.
        // Parse it as a block with the brace missing.
        if !matches!(
            self.token(),
            SyntaxKind::SemicolonToken | SyntaxKind::FunctionKeyword | SyntaxKind::ClassKeyword
        ) && self.is_start_of_statement()
            && !self.is_start_of_expression_statement()
        {
            return self.parse_function_block(SignatureFlags::IGNORE_MISSING_OPEN_BRACE | await_flag, None);
        }
        if is_async {
            self.do_in_await_context(|parser| {
                parser.parse_assignment_expression_or_higher_with(allow_return_type_in_arrow_function)
            })
        } else {
            self.do_outside_of_await_context(|parser| {
                parser.parse_assignment_expression_or_higher_with(allow_return_type_in_arrow_function)
            })
        }
    }

    #[inline]
    pub(crate) fn is_jsx(&self) -> bool {
        self.language_variant == tsdecl_ast::LanguageVariant::JSX
    }
}

fn optional_chain_flag(in_chain: bool) -> NodeFlags {
    if in_chain {
        NodeFlags::OPTIONAL_CHAIN
    } else {
        NodeFlags::NONE
    }
}

/// The operand of a non-null assertion.
fn non_null_operand(parser: &Parser<'_>, id: NodeId) -> Option<NodeId> {
    if parser.kind_of(id) != SyntaxKind::NonNullExpression {
        return None;
    }
    match parser.arena[id].variant {
        NodeVariant::SingleExpression { expression } => Some(expression),
        _ => None,
    }
}
