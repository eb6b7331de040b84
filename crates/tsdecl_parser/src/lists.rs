//! List parsing and the per-context element and terminator predicates that
//! drive error recovery.

use tsdecl_ast::{NodeId, NodeList, SyntaxKind};
use tsdecl_diagnostics::messages;

use crate::context::ParsingContext;
use crate::parser::{token_is_identifier_or_keyword, Parser};

impl<'a> Parser<'a> {
    /// Parse elements until the terminator for `context`. A token that can
    /// neither start an element nor end the list is skipped with a
    /// diagnostic, unless an enclosing list can use it.
    pub(crate) fn parse_list(&mut self, context: ParsingContext, mut parse_element: impl FnMut(&mut Self) -> NodeId) -> NodeList {
        let saved = self.parsing_context;
        self.parsing_context = saved.with(context);
        let mut nodes = Vec::new();
        let list_pos = self.node_pos();

        while !self.is_list_terminator(context) {
            if self.is_cancelled() {
                break;
            }
            if self.is_list_element(context, false) {
                let start = self.node_pos();
                nodes.push(parse_element(self));
                if self.node_pos() == start && self.token() != SyntaxKind::EndOfFileToken {
                    // Nothing was consumed; step over the token so the loop ends.
                    self.parse_error_at_current_token(context.error_message(self.token()).0, &[]);
                    self.next_token();
                }
                continue;
            }
            if self.abort_parsing_list_or_move_to_next_token(context) {
                break;
            }
        }

        self.parsing_context = saved;
        NodeList::new(nodes, list_pos, self.node_pos())
    }

    /// Parse comma separated elements. A missing comma is reported and the
    /// list carries on, so `f(a b)` still yields two arguments.
    pub(crate) fn parse_delimited_list(
        &mut self,
        context: ParsingContext,
        mut parse_element: impl FnMut(&mut Self) -> NodeId,
        consider_semicolon_as_delimiter: bool,
    ) -> NodeList {
        let pos = self.node_pos();
        self.try_parse_delimited_list(context, |parser| Some(parse_element(parser)), consider_semicolon_as_delimiter)
            .unwrap_or_else(|| NodeList::empty(pos))
    }

    /// Like [`Self::parse_delimited_list`], but gives up with `None` as soon
    /// as an element does. Used under speculation.
    pub(crate) fn try_parse_delimited_list(
        &mut self,
        context: ParsingContext,
        mut parse_element: impl FnMut(&mut Self) -> Option<NodeId>,
        consider_semicolon_as_delimiter: bool,
    ) -> Option<NodeList> {
        let saved = self.parsing_context;
        self.parsing_context = saved.with(context);
        let mut nodes = Vec::new();
        let list_pos = self.node_pos();
        let mut has_trailing_comma = false;

        loop {
            if self.is_cancelled() {
                break;
            }
            if self.is_list_element(context, false) {
                let start = self.node_pos();
                let Some(element) = parse_element(self) else {
                    self.parsing_context = saved;
                    return None;
                };
                nodes.push(element);
                if self.parse_optional(SyntaxKind::CommaToken) {
                    has_trailing_comma = true;
                    continue;
                }
                has_trailing_comma = false;
                if self.is_list_terminator(context) {
                    break;
                }
                let message = (context == ParsingContext::EnumMembers)
                    .then_some(&messages::AN_ENUM_MEMBER_NAME_MUST_BE_FOLLOWED_BY_A_OR);
                self.parse_expected_with(SyntaxKind::CommaToken, message, true);
                if consider_semicolon_as_delimiter
                    && self.token() == SyntaxKind::SemicolonToken
                    && !self.has_preceding_line_break()
                {
                    self.next_token();
                }
                if start == self.node_pos() {
                    self.next_token();
                }
                continue;
            }
            if self.is_list_terminator(context) {
                break;
            }
            if self.abort_parsing_list_or_move_to_next_token(context) {
                break;
            }
        }

        self.parsing_context = saved;
        let mut list = NodeList::new(nodes, list_pos, self.node_pos());
        list.has_trailing_comma = has_trailing_comma && !list.is_empty();
        Some(list)
    }

    /// `open elements close`; an empty list when `open` is absent.
    pub(crate) fn parse_bracketed_list(
        &mut self,
        context: ParsingContext,
        parse_element: impl FnMut(&mut Self) -> NodeId,
        open: SyntaxKind,
        close: SyntaxKind,
    ) -> NodeList {
        if self.parse_expected(open) {
            let list = self.parse_delimited_list(context, parse_element, false);
            self.parse_expected(close);
            return list;
        }
        NodeList::empty(self.node_pos())
    }

    /// Report the stray token. Returns `true` when an enclosing list wants
    /// it, otherwise skips it and returns `false`.
    fn abort_parsing_list_or_move_to_next_token(&mut self, context: ParsingContext) -> bool {
        let (message, arg) = context.error_message(self.token());
        match arg {
            Some(arg) => self.parse_error_at_current_token(message, &[arg]),
            None => self.parse_error_at_current_token(message, &[]),
        }
        if self.is_in_some_parsing_context() {
            return true;
        }
        self.next_token();
        false
    }

    fn is_in_some_parsing_context(&mut self) -> bool {
        for context in self.parsing_context.iter() {
            if self.is_list_element(context, true) || self.is_list_terminator(context) {
                return true;
            }
        }
        false
    }

    pub(crate) fn is_list_element(&mut self, context: ParsingContext, in_error_recovery: bool) -> bool {
        match context {
            ParsingContext::SourceElements
            | ParsingContext::BlockStatements
            | ParsingContext::SwitchClauseStatements => {
                !(self.token() == SyntaxKind::SemicolonToken && in_error_recovery) && self.is_start_of_statement()
            }
            ParsingContext::SwitchClauses => {
                matches!(self.token(), SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword)
            }
            ParsingContext::TypeMembers => self.look_ahead(Self::is_type_member_start),
            ParsingContext::ClassMembers => {
                self.look_ahead(Self::is_class_member_start)
                    || (self.token() == SyntaxKind::SemicolonToken && !in_error_recovery)
            }
            ParsingContext::EnumMembers => {
                self.token() == SyntaxKind::OpenBracketToken || self.is_literal_property_name()
            }
            ParsingContext::ObjectLiteralMembers => match self.token() {
                SyntaxKind::OpenBracketToken
                | SyntaxKind::AsteriskToken
                | SyntaxKind::DotDotDotToken
                | SyntaxKind::DotToken => true,
                _ => self.is_literal_property_name(),
            },
            ParsingContext::ObjectBindingElements => {
                matches!(self.token(), SyntaxKind::OpenBracketToken | SyntaxKind::DotDotDotToken)
                    || self.is_literal_property_name()
            }
            ParsingContext::HeritageClauseElement => {
                if self.token() == SyntaxKind::OpenBraceToken {
                    return self.look_ahead(Self::is_valid_heritage_clause_object_literal);
                }
                if !in_error_recovery {
                    self.is_start_of_left_hand_side_expression()
                        && !self.is_heritage_clause_extends_or_implements_keyword()
                } else {
                    self.is_identifier() && !self.is_heritage_clause_extends_or_implements_keyword()
                }
            }
            ParsingContext::VariableDeclarations => self.is_binding_identifier_or_private_identifier_or_pattern(),
            ParsingContext::ArrayBindingElements => {
                matches!(self.token(), SyntaxKind::CommaToken | SyntaxKind::DotDotDotToken)
                    || self.is_binding_identifier_or_private_identifier_or_pattern()
            }
            ParsingContext::TypeParameters => {
                matches!(self.token(), SyntaxKind::InKeyword | SyntaxKind::ConstKeyword) || self.is_identifier()
            }
            ParsingContext::ArrayLiteralMembers
                if matches!(self.token(), SyntaxKind::CommaToken | SyntaxKind::DotToken) =>
            {
                true
            }
            ParsingContext::ArrayLiteralMembers | ParsingContext::ArgumentExpressions => {
                self.token() == SyntaxKind::DotDotDotToken || self.is_start_of_expression()
            }
            ParsingContext::Parameters => self.is_start_of_parameter(),
            ParsingContext::TypeArguments | ParsingContext::TupleElementTypes => {
                self.token() == SyntaxKind::CommaToken || self.is_start_of_type(false)
            }
            ParsingContext::HeritageClauses => {
                matches!(self.token(), SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword)
            }
            ParsingContext::ImportOrExportSpecifiers => {
                if self.token() == SyntaxKind::FromKeyword && self.look_ahead(Self::next_token_is_string_literal) {
                    return false;
                }
                self.token() == SyntaxKind::StringLiteral || token_is_identifier_or_keyword(self.token())
            }
            ParsingContext::JsxAttributes => {
                token_is_identifier_or_keyword(self.token()) || self.token() == SyntaxKind::OpenBraceToken
            }
            ParsingContext::JsxChildren => true,
        }
    }

    pub(crate) fn is_list_terminator(&mut self, context: ParsingContext) -> bool {
        let token = self.token();
        if token == SyntaxKind::EndOfFileToken {
            return true;
        }
        match context {
            ParsingContext::BlockStatements
            | ParsingContext::SwitchClauses
            | ParsingContext::TypeMembers
            | ParsingContext::ClassMembers
            | ParsingContext::EnumMembers
            | ParsingContext::ObjectLiteralMembers
            | ParsingContext::ObjectBindingElements
            | ParsingContext::ImportOrExportSpecifiers => token == SyntaxKind::CloseBraceToken,
            ParsingContext::SwitchClauseStatements => matches!(
                token,
                SyntaxKind::CloseBraceToken | SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword
            ),
            ParsingContext::HeritageClauseElement => matches!(
                token,
                SyntaxKind::OpenBraceToken | SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
            ),
            ParsingContext::VariableDeclarations => self.is_variable_declarator_list_terminator(),
            ParsingContext::TypeParameters => matches!(
                token,
                SyntaxKind::GreaterThanToken
                    | SyntaxKind::OpenParenToken
                    | SyntaxKind::OpenBraceToken
                    | SyntaxKind::ExtendsKeyword
                    | SyntaxKind::ImplementsKeyword
            ),
            ParsingContext::ArgumentExpressions => {
                matches!(token, SyntaxKind::CloseParenToken | SyntaxKind::SemicolonToken)
            }
            ParsingContext::ArrayLiteralMembers
            | ParsingContext::TupleElementTypes
            | ParsingContext::ArrayBindingElements => token == SyntaxKind::CloseBracketToken,
            ParsingContext::Parameters => {
                matches!(token, SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken)
            }
            // Type argument lists end at anything but a comma so that
            // `f<T>(x)` and `a < b` both get a chance.
            ParsingContext::TypeArguments => token != SyntaxKind::CommaToken,
            ParsingContext::HeritageClauses => {
                matches!(token, SyntaxKind::OpenBraceToken | SyntaxKind::CloseBraceToken)
            }
            ParsingContext::JsxAttributes => {
                matches!(token, SyntaxKind::GreaterThanToken | SyntaxKind::SlashToken)
            }
            ParsingContext::JsxChildren => {
                token == SyntaxKind::LessThanToken && self.look_ahead(Self::next_token_is_slash)
            }
            ParsingContext::SourceElements => false,
        }
    }

    fn is_variable_declarator_list_terminator(&self) -> bool {
        // `var x y` should not swallow `y` into the declaration list.
        self.can_parse_semicolon()
            || matches!(
                self.token(),
                SyntaxKind::InKeyword | SyntaxKind::OfKeyword | SyntaxKind::EqualsGreaterThanToken
            )
    }

    /// `{ }` in a heritage list is an object literal only when more heritage
    /// follows, as in `class C extends {} {}`.
    fn is_valid_heritage_clause_object_literal(&mut self) -> bool {
        if self.next_token() == SyntaxKind::CloseBraceToken {
            let next = self.next_token();
            return matches!(
                next,
                SyntaxKind::CommaToken
                    | SyntaxKind::OpenBraceToken
                    | SyntaxKind::ExtendsKeyword
                    | SyntaxKind::ImplementsKeyword
            );
        }
        true
    }

    fn is_heritage_clause_extends_or_implements_keyword(&mut self) -> bool {
        if matches!(self.token(), SyntaxKind::ImplementsKeyword | SyntaxKind::ExtendsKeyword) {
            return self.look_ahead(Self::next_token_is_start_of_expression);
        }
        false
    }

    pub(crate) fn next_token_is_start_of_expression(&mut self) -> bool {
        self.next_token();
        self.is_start_of_expression()
    }
}
