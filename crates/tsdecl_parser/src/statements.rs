//! Statements, declarations, modifiers, and class members.

use tsdecl_ast::{
    BindingElement, CatchClause, ClassLike, Clause, Enum, EnumMember, ExportAssignment, ExportDeclaration,
    ExpressionWithTypeArguments, For, ForInOrOf, FunctionLike, HeritageClause, If, Import, ImportClause,
    ImportEquals, InterfaceDeclaration, Labeled, Loop, Module, NodeFlags, NodeId, NodeList, NodeVariant,
    PropertyDeclaration, Specifier, Switch, SyntaxKind, Try, TypeAlias, VariableDeclaration, VariableStatement,
};
use tsdecl_core::text::TextPos;
use tsdecl_diagnostics::{messages, DiagnosticMessage};

use crate::context::ParsingContext;
use crate::parser::{skip_trivia, token_is_identifier_or_keyword, Parser, MAX_RECURSION_DEPTH};
use crate::types::SignatureFlags;
use crate::utilities::get_spelling_suggestion;

impl<'a> Parser<'a> {
    // ========================================================================
    // Statement dispatch
    // ========================================================================

    pub(crate) fn is_start_of_statement(&mut self) -> bool {
        match self.token() {
            SyntaxKind::AtToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::VarKeyword
            | SyntaxKind::LetKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::IfKeyword
            | SyntaxKind::DoKeyword
            | SyntaxKind::WhileKeyword
            | SyntaxKind::ForKeyword
            | SyntaxKind::ContinueKeyword
            | SyntaxKind::BreakKeyword
            | SyntaxKind::ReturnKeyword
            | SyntaxKind::WithKeyword
            | SyntaxKind::SwitchKeyword
            | SyntaxKind::ThrowKeyword
            | SyntaxKind::TryKeyword
            | SyntaxKind::DebuggerKeyword
            // `catch` and `finally` start a broken try statement.
            | SyntaxKind::CatchKeyword
            | SyntaxKind::FinallyKeyword => true,
            SyntaxKind::ImportKeyword => {
                self.is_start_of_declaration() || self.look_ahead(Self::next_token_is_open_paren_or_less_than_or_dot)
            }
            SyntaxKind::ConstKeyword | SyntaxKind::ExportKeyword => self.is_start_of_declaration(),
            SyntaxKind::AsyncKeyword
            | SyntaxKind::DeclareKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::ModuleKeyword
            | SyntaxKind::NamespaceKeyword
            | SyntaxKind::TypeKeyword
            | SyntaxKind::GlobalKeyword => true,
            SyntaxKind::AccessorKeyword
            | SyntaxKind::PublicKeyword
            | SyntaxKind::PrivateKeyword
            | SyntaxKind::ProtectedKeyword
            | SyntaxKind::StaticKeyword
            | SyntaxKind::ReadonlyKeyword => {
                self.is_start_of_declaration() || !self.look_ahead(Self::next_token_is_identifier_or_keyword_on_same_line)
            }
            _ => self.is_start_of_expression(),
        }
    }

    pub(crate) fn is_start_of_declaration(&mut self) -> bool {
        self.look_ahead(Self::is_declaration)
    }

    /// Skip modifiers and decide whether a declaration follows.
    fn is_declaration(&mut self) -> bool {
        loop {
            match self.token() {
                SyntaxKind::VarKeyword
                | SyntaxKind::LetKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::ClassKeyword
                | SyntaxKind::EnumKeyword => return true,
                SyntaxKind::UsingKeyword => return self.is_using_declaration(),
                SyntaxKind::AwaitKeyword => return self.is_await_using_declaration(),
                // `interface {` is an interface missing its name.
                SyntaxKind::InterfaceKeyword => {
                    self.next_token();
                    return !self.has_preceding_line_break()
                        && (self.is_identifier() || self.token() == SyntaxKind::OpenBraceToken);
                }
                SyntaxKind::TypeKeyword => return self.next_token_is_identifier_on_same_line(),
                SyntaxKind::ModuleKeyword | SyntaxKind::NamespaceKeyword => {
                    return self.next_token_is_identifier_or_string_literal_on_same_line()
                }
                SyntaxKind::AbstractKeyword
                | SyntaxKind::AccessorKeyword
                | SyntaxKind::AsyncKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::PublicKeyword
                | SyntaxKind::ReadonlyKeyword => {
                    let previous = self.token();
                    self.next_token();
                    if self.has_preceding_line_break() {
                        return false;
                    }
                    if previous == SyntaxKind::DeclareKeyword && self.token() == SyntaxKind::TypeKeyword {
                        return true;
                    }
                }
                SyntaxKind::GlobalKeyword => {
                    self.next_token();
                    return matches!(
                        self.token(),
                        SyntaxKind::OpenBraceToken | SyntaxKind::Identifier | SyntaxKind::ExportKeyword
                    );
                }
                SyntaxKind::ImportKeyword => {
                    self.next_token();
                    return matches!(
                        self.token(),
                        SyntaxKind::StringLiteral | SyntaxKind::AsteriskToken | SyntaxKind::OpenBraceToken
                    ) || token_is_identifier_or_keyword(self.token());
                }
                SyntaxKind::ExportKeyword => {
                    let mut current = self.next_token();
                    if current == SyntaxKind::TypeKeyword {
                        current = self.look_ahead(Self::next_token);
                    }
                    if matches!(
                        current,
                        SyntaxKind::EqualsToken
                            | SyntaxKind::AsteriskToken
                            | SyntaxKind::OpenBraceToken
                            | SyntaxKind::DefaultKeyword
                            | SyntaxKind::AsKeyword
                            | SyntaxKind::AtToken
                    ) {
                        return true;
                    }
                }
                SyntaxKind::StaticKeyword => {
                    self.next_token();
                }
                _ => return false,
            }
        }
    }

    fn next_token_is_binding_identifier_or_start_of_destructuring_on_same_line(&mut self, disallow_of: bool) -> bool {
        self.next_token();
        if disallow_of && self.token() == SyntaxKind::OfKeyword {
            return false;
        }
        (self.is_binding_identifier() || self.token() == SyntaxKind::OpenBraceToken) && !self.has_preceding_line_break()
    }

    fn next_token_is_using_keyword_then_binding_identifier_on_same_line(&mut self, disallow_of: bool) -> bool {
        if self.next_token() == SyntaxKind::UsingKeyword {
            return self.next_token_is_binding_identifier_or_start_of_destructuring_on_same_line(disallow_of);
        }
        false
    }

    fn is_using_declaration(&mut self) -> bool {
        self.look_ahead(|parser| parser.next_token_is_binding_identifier_or_start_of_destructuring_on_same_line(false))
    }

    fn is_await_using_declaration(&mut self) -> bool {
        self.look_ahead(|parser| parser.next_token_is_using_keyword_then_binding_identifier_on_same_line(false))
    }

    fn is_let_declaration(&mut self) -> bool {
        self.look_ahead(|parser| {
            parser.next_token();
            parser.is_identifier()
                || matches!(parser.token(), SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken)
        })
    }

    pub(crate) fn parse_statement(&mut self) -> NodeId {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            return self.parse_too_deep(SyntaxKind::MissingDeclaration, &messages::DECLARATION_OR_STATEMENT_EXPECTED);
        }
        self.recursion_depth += 1;
        let statement = self.parse_statement_worker();
        self.recursion_depth -= 1;
        statement
    }

    fn parse_statement_worker(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::SemicolonToken => return self.parse_empty_statement(),
            SyntaxKind::OpenBraceToken => return self.parse_block(false, None),
            SyntaxKind::VarKeyword => return self.parse_variable_statement(self.node_pos(), None),
            SyntaxKind::LetKeyword if self.is_let_declaration() => {
                return self.parse_variable_statement(self.node_pos(), None)
            }
            SyntaxKind::AwaitKeyword if self.is_await_using_declaration() => {
                return self.parse_variable_statement(self.node_pos(), None)
            }
            SyntaxKind::UsingKeyword if self.is_using_declaration() => {
                return self.parse_variable_statement(self.node_pos(), None)
            }
            SyntaxKind::FunctionKeyword => return self.parse_function_declaration(self.node_pos(), None),
            SyntaxKind::ClassKeyword => {
                return self.parse_class_declaration_or_expression(self.node_pos(), None, SyntaxKind::ClassDeclaration)
            }
            SyntaxKind::IfKeyword => return self.parse_if_statement(),
            SyntaxKind::DoKeyword => return self.parse_do_statement(),
            SyntaxKind::WhileKeyword => return self.parse_while_statement(),
            SyntaxKind::ForKeyword => return self.parse_for_or_for_in_or_for_of_statement(),
            SyntaxKind::ContinueKeyword => return self.parse_break_or_continue_statement(SyntaxKind::ContinueStatement),
            SyntaxKind::BreakKeyword => return self.parse_break_or_continue_statement(SyntaxKind::BreakStatement),
            SyntaxKind::ReturnKeyword => return self.parse_return_statement(),
            SyntaxKind::WithKeyword => return self.parse_with_statement(),
            SyntaxKind::SwitchKeyword => return self.parse_switch_statement(),
            SyntaxKind::ThrowKeyword => return self.parse_throw_statement(),
            SyntaxKind::TryKeyword | SyntaxKind::CatchKeyword | SyntaxKind::FinallyKeyword => {
                return self.parse_try_statement()
            }
            SyntaxKind::DebuggerKeyword => return self.parse_debugger_statement(),
            SyntaxKind::AtToken => return self.parse_declaration(),
            SyntaxKind::AsyncKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::TypeKeyword
            | SyntaxKind::ModuleKeyword
            | SyntaxKind::NamespaceKeyword
            | SyntaxKind::DeclareKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::ExportKeyword
            | SyntaxKind::ImportKeyword
            | SyntaxKind::PrivateKeyword
            | SyntaxKind::ProtectedKeyword
            | SyntaxKind::PublicKeyword
            | SyntaxKind::AbstractKeyword
            | SyntaxKind::AccessorKeyword
            | SyntaxKind::StaticKeyword
            | SyntaxKind::ReadonlyKeyword
            | SyntaxKind::GlobalKeyword
                if self.is_start_of_declaration() =>
            {
                return self.parse_declaration()
            }
            _ => {}
        }
        self.parse_expression_or_labeled_statement()
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_declaration(&mut self) -> NodeId {
        let pos = self.node_pos();
        let modifiers = self.parse_modifiers(true, false, false);
        let is_ambient = self.modifiers_include(&modifiers, SyntaxKind::DeclareKeyword);
        if is_ambient {
            if let Some(list) = &modifiers {
                for modifier in list.iter() {
                    let flags = &self.arena[modifier].data.flags;
                    flags.set(flags.get() | NodeFlags::AMBIENT);
                }
            }
            return self.do_inside_of_context(NodeFlags::AMBIENT, |parser| {
                parser.parse_declaration_worker(pos, modifiers)
            });
        }
        self.parse_declaration_worker(pos, modifiers)
    }

    fn parse_declaration_worker(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        match self.token() {
            SyntaxKind::VarKeyword
            | SyntaxKind::LetKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::UsingKeyword
            | SyntaxKind::AwaitKeyword => self.parse_variable_statement(pos, modifiers),
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(pos, modifiers),
            SyntaxKind::ClassKeyword => {
                self.parse_class_declaration_or_expression(pos, modifiers, SyntaxKind::ClassDeclaration)
            }
            SyntaxKind::InterfaceKeyword => self.parse_interface_declaration(pos, modifiers),
            SyntaxKind::TypeKeyword => self.parse_type_alias_declaration(pos, modifiers),
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(pos, modifiers),
            SyntaxKind::GlobalKeyword | SyntaxKind::ModuleKeyword | SyntaxKind::NamespaceKeyword => {
                self.parse_module_declaration(pos, modifiers)
            }
            SyntaxKind::ImportKeyword => self.parse_import_declaration_or_import_equals_declaration(pos, modifiers),
            SyntaxKind::ExportKeyword => {
                self.next_token();
                match self.token() {
                    SyntaxKind::DefaultKeyword | SyntaxKind::EqualsToken => self.parse_export_assignment(pos, modifiers),
                    SyntaxKind::AsKeyword => self.parse_namespace_export_declaration(pos, modifiers),
                    _ => self.parse_export_declaration(pos, modifiers),
                }
            }
            _ => {
                // Modifiers or decorators with nothing to apply them to.
                let missing = self.create_missing_node(
                    SyntaxKind::MissingDeclaration,
                    true,
                    Some(&messages::DECLARATION_EXPECTED),
                    &[],
                );
                let node = self.arena.get_mut(missing);
                node.data.range.pos = pos;
                node.variant = NodeVariant::MissingDeclaration { modifiers };
                missing
            }
        }
    }

    pub(crate) fn modifiers_include(&self, modifiers: &Option<NodeList>, kind: SyntaxKind) -> bool {
        modifiers
            .as_ref()
            .is_some_and(|list| list.iter().any(|modifier| self.kind_of(modifier) == kind))
    }

    // ========================================================================
    // Modifiers and decorators
    // ========================================================================

    /// Decorators and modifiers in any interleaving of
    /// `decorators modifiers decorators modifiers`.
    pub(crate) fn parse_modifiers(
        &mut self,
        allow_decorators: bool,
        permit_const_as_modifier: bool,
        stop_on_start_of_class_static_block: bool,
    ) -> Option<NodeList> {
        let pos = self.node_pos();
        let mut list = Vec::new();
        let mut has_seen_static = false;
        let mut has_leading_modifier = false;
        let mut has_trailing_decorator = false;

        if allow_decorators && self.token() == SyntaxKind::AtToken {
            while let Some(decorator) = self.try_parse_decorator() {
                list.push(decorator);
            }
        }
        while let Some(modifier) =
            self.try_parse_modifier(has_seen_static, permit_const_as_modifier, stop_on_start_of_class_static_block)
        {
            if self.kind_of(modifier) == SyntaxKind::StaticKeyword {
                has_seen_static = true;
            }
            list.push(modifier);
            has_leading_modifier = true;
        }
        if has_leading_modifier && allow_decorators && self.token() == SyntaxKind::AtToken {
            while let Some(decorator) = self.try_parse_decorator() {
                list.push(decorator);
                has_trailing_decorator = true;
            }
        }
        if has_trailing_decorator {
            while let Some(modifier) =
                self.try_parse_modifier(has_seen_static, permit_const_as_modifier, stop_on_start_of_class_static_block)
            {
                if self.kind_of(modifier) == SyntaxKind::StaticKeyword {
                    has_seen_static = true;
                }
                list.push(modifier);
            }
        }

        (!list.is_empty()).then(|| NodeList::new(list, pos, self.node_pos()))
    }

    fn try_parse_decorator(&mut self) -> Option<NodeId> {
        if self.token() != SyntaxKind::AtToken {
            return None;
        }
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::AtToken);
        let expression = self.do_in_decorator_context(Self::parse_left_hand_side_expression_or_higher);
        Some(self.finish_node(SyntaxKind::Decorator, pos, NodeVariant::SingleExpression { expression }))
    }

    fn try_parse_modifier(
        &mut self,
        has_seen_static: bool,
        permit_const_as_modifier: bool,
        stop_on_start_of_class_static_block: bool,
    ) -> Option<NodeId> {
        let pos = self.node_pos();
        let kind = self.token();
        if kind == SyntaxKind::ConstKeyword && permit_const_as_modifier {
            if !self.try_parse_bool(Self::next_token_is_on_same_line_and_can_follow_modifier) {
                return None;
            }
        } else if stop_on_start_of_class_static_block
            && kind == SyntaxKind::StaticKeyword
            && self.look_ahead(|parser| parser.next_token() == SyntaxKind::OpenBraceToken)
        {
            return None;
        } else if has_seen_static && kind == SyntaxKind::StaticKeyword {
            return None;
        } else if !self.parse_any_contextual_modifier() {
            return None;
        }
        Some(self.finish_node(kind, pos, NodeVariant::Token))
    }

    /// `try_parse` for a predicate: keep the advancement when it says yes.
    pub(crate) fn try_parse_bool(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        self.try_parse(|parser| f(parser).then_some(())).is_some()
    }

    fn parse_any_contextual_modifier(&mut self) -> bool {
        self.token().is_modifier_kind() && self.try_parse_bool(Self::next_token_can_follow_modifier)
    }

    pub(crate) fn parse_contextual_modifier(&mut self, kind: SyntaxKind) -> bool {
        self.token() == kind && self.try_parse_bool(Self::next_token_can_follow_modifier)
    }

    fn next_token_can_follow_modifier(&mut self) -> bool {
        match self.token() {
            SyntaxKind::ConstKeyword => self.next_token() == SyntaxKind::EnumKeyword,
            SyntaxKind::ExportKeyword => {
                self.next_token();
                if self.token() == SyntaxKind::DefaultKeyword {
                    return self.look_ahead(Self::next_token_can_follow_default_keyword);
                }
                if self.token() == SyntaxKind::TypeKeyword {
                    return self.look_ahead(|parser| {
                        parser.next_token();
                        parser.can_follow_export_modifier()
                    });
                }
                self.can_follow_export_modifier()
            }
            SyntaxKind::DefaultKeyword => self.next_token_can_follow_default_keyword(),
            SyntaxKind::StaticKeyword | SyntaxKind::GetKeyword | SyntaxKind::SetKeyword => {
                self.next_token();
                self.can_follow_modifier()
            }
            _ => self.next_token_is_on_same_line_and_can_follow_modifier(),
        }
    }

    fn can_follow_export_modifier(&self) -> bool {
        self.token() == SyntaxKind::AtToken
            || (!matches!(
                self.token(),
                SyntaxKind::AsteriskToken | SyntaxKind::AsKeyword | SyntaxKind::OpenBraceToken
            ) && self.can_follow_modifier())
    }

    fn next_token_is_on_same_line_and_can_follow_modifier(&mut self) -> bool {
        self.next_token();
        if self.has_preceding_line_break() {
            return false;
        }
        self.can_follow_modifier()
    }

    fn can_follow_modifier(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken | SyntaxKind::DotDotDotToken
        ) || self.is_literal_property_name()
    }

    fn next_token_can_follow_default_keyword(&mut self) -> bool {
        self.next_token();
        match self.token() {
            SyntaxKind::ClassKeyword | SyntaxKind::FunctionKeyword | SyntaxKind::InterfaceKeyword | SyntaxKind::AtToken => {
                true
            }
            SyntaxKind::AbstractKeyword => self.look_ahead(|parser| {
                parser.next_token() == SyntaxKind::ClassKeyword && !parser.has_preceding_line_break()
            }),
            SyntaxKind::AsyncKeyword => self.look_ahead(|parser| {
                parser.next_token() == SyntaxKind::FunctionKeyword && !parser.has_preceding_line_break()
            }),
            _ => false,
        }
    }

    // ========================================================================
    // Simple statements
    // ========================================================================

    fn parse_empty_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::SemicolonToken);
        self.finish_node(SyntaxKind::EmptyStatement, pos, NodeVariant::Token)
    }

    /// `{ statements }`. With `ignore_missing_open_brace` the statements are
    /// parsed even when `{` is absent.
    pub(crate) fn parse_block(&mut self, ignore_missing_open_brace: bool, message: Option<&DiagnosticMessage>) -> NodeId {
        let pos = self.node_pos();
        let open_brace_parsed = self.parse_expected_with(SyntaxKind::OpenBraceToken, message, true);
        if open_brace_parsed || ignore_missing_open_brace {
            let multi_line = self.has_preceding_line_break();
            let statements = self.parse_list(ParsingContext::BlockStatements, Self::parse_statement);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            let block = self.finish_node(SyntaxKind::Block, pos, NodeVariant::Block { statements, multi_line });
            if self.token() == SyntaxKind::EqualsToken {
                // `{ a } = b` reads as a block followed by a stray `=`.
                self.parse_error_at_current_token(&messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                self.next_token();
            }
            return block;
        }
        let statements = NodeList::empty(self.node_pos());
        self.finish_node(
            SyntaxKind::Block,
            pos,
            NodeVariant::Block {
                statements,
                multi_line: false,
            },
        )
    }

    fn parse_if_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::IfKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.allow_in_and(Self::parse_expression);
        self.parse_expected(SyntaxKind::CloseParenToken);
        let then_statement = self.parse_statement();
        let else_statement = self
            .parse_optional(SyntaxKind::ElseKeyword)
            .then(|| self.parse_statement());
        self.finish_node(
            SyntaxKind::IfStatement,
            pos,
            NodeVariant::If(If {
                expression,
                then_statement,
                else_statement,
            }),
        )
    }

    fn parse_do_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::DoKeyword);
        let statement = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.allow_in_and(Self::parse_expression);
        self.parse_expected(SyntaxKind::CloseParenToken);
        // `do {} while (x) y` is legal: the semicolon after a do-while is
        // always optional.
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.finish_node(SyntaxKind::DoStatement, pos, NodeVariant::Loop(Loop { expression, statement }))
    }

    fn parse_while_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::WhileKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.allow_in_and(Self::parse_expression);
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.finish_node(SyntaxKind::WhileStatement, pos, NodeVariant::Loop(Loop { expression, statement }))
    }

    fn parse_for_or_for_in_or_for_of_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::ForKeyword);
        let await_modifier = self.parse_optional_token(SyntaxKind::AwaitKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);

        let mut initializer = None;
        if self.token() != SyntaxKind::SemicolonToken {
            let is_declaration_list = match self.token() {
                SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => true,
                SyntaxKind::UsingKeyword => self.look_ahead(|parser| {
                    parser.next_token_is_binding_identifier_or_start_of_destructuring_on_same_line(true)
                }),
                SyntaxKind::AwaitKeyword => self.look_ahead(|parser| {
                    parser.next_token_is_using_keyword_then_binding_identifier_on_same_line(true)
                }),
                _ => false,
            };
            initializer = Some(if is_declaration_list {
                self.parse_variable_declaration_list(true)
            } else {
                self.disallow_in_and(Self::parse_expression)
            });
        }

        let is_for_of = if await_modifier.is_some() {
            self.parse_expected(SyntaxKind::OfKeyword)
        } else {
            self.parse_optional(SyntaxKind::OfKeyword)
        };
        if is_for_of {
            let expression = self.allow_in_and(Self::parse_assignment_expression_or_higher);
            self.parse_expected(SyntaxKind::CloseParenToken);
            let initializer = self.or_missing_expression(initializer);
            let statement = self.parse_statement();
            return self.finish_node(
                SyntaxKind::ForOfStatement,
                pos,
                NodeVariant::ForInOrOf(ForInOrOf {
                    await_modifier,
                    initializer,
                    expression,
                    statement,
                }),
            );
        }
        if self.parse_optional(SyntaxKind::InKeyword) {
            let expression = self.allow_in_and(Self::parse_expression);
            self.parse_expected(SyntaxKind::CloseParenToken);
            let initializer = self.or_missing_expression(initializer);
            let statement = self.parse_statement();
            return self.finish_node(
                SyntaxKind::ForInStatement,
                pos,
                NodeVariant::ForInOrOf(ForInOrOf {
                    await_modifier: None,
                    initializer,
                    expression,
                    statement,
                }),
            );
        }

        self.parse_expected(SyntaxKind::SemicolonToken);
        let condition = (!matches!(self.token(), SyntaxKind::SemicolonToken | SyntaxKind::CloseParenToken))
            .then(|| self.allow_in_and(Self::parse_expression));
        self.parse_expected(SyntaxKind::SemicolonToken);
        let incrementor =
            (self.token() != SyntaxKind::CloseParenToken).then(|| self.allow_in_and(Self::parse_expression));
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.finish_node(
            SyntaxKind::ForStatement,
            pos,
            NodeVariant::For(For {
                initializer,
                condition,
                incrementor,
                statement,
            }),
        )
    }

    fn or_missing_expression(&mut self, node: Option<NodeId>) -> NodeId {
        match node {
            Some(node) => node,
            None => self.create_missing_node(SyntaxKind::Identifier, true, Some(&messages::EXPRESSION_EXPECTED), &[]),
        }
    }

    fn parse_break_or_continue_statement(&mut self, kind: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        let keyword = if kind == SyntaxKind::BreakStatement {
            SyntaxKind::BreakKeyword
        } else {
            SyntaxKind::ContinueKeyword
        };
        self.parse_expected(keyword);
        let label = (!self.can_parse_semicolon()).then(|| self.parse_identifier());
        self.parse_semicolon();
        self.finish_node(kind, pos, NodeVariant::Jump { label })
    }

    fn parse_return_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::ReturnKeyword);
        let expression = (!self.can_parse_semicolon()).then(|| self.allow_in_and(Self::parse_expression));
        self.parse_semicolon();
        self.finish_node(
            SyntaxKind::ReturnStatement,
            pos,
            NodeVariant::OptionalExpression { expression },
        )
    }

    fn parse_with_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::WithKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.allow_in_and(Self::parse_expression);
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.do_inside_of_context(NodeFlags::IN_WITH_STATEMENT, Self::parse_statement);
        self.finish_node(SyntaxKind::WithStatement, pos, NodeVariant::Loop(Loop { expression, statement }))
    }

    fn parse_case_or_default_clause(&mut self) -> NodeId {
        let pos = self.node_pos();
        if self.token() == SyntaxKind::CaseKeyword {
            self.parse_expected(SyntaxKind::CaseKeyword);
            let expression = self.allow_in_and(Self::parse_expression);
            self.parse_expected(SyntaxKind::ColonToken);
            let statements = self.parse_list(ParsingContext::SwitchClauseStatements, Self::parse_statement);
            return self.finish_node(
                SyntaxKind::CaseClause,
                pos,
                NodeVariant::Clause(Clause {
                    expression: Some(expression),
                    statements,
                }),
            );
        }
        self.parse_expected(SyntaxKind::DefaultKeyword);
        self.parse_expected(SyntaxKind::ColonToken);
        let statements = self.parse_list(ParsingContext::SwitchClauseStatements, Self::parse_statement);
        self.finish_node(
            SyntaxKind::DefaultClause,
            pos,
            NodeVariant::Clause(Clause {
                expression: None,
                statements,
            }),
        )
    }

    fn parse_switch_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::SwitchKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.allow_in_and(Self::parse_expression);
        self.parse_expected(SyntaxKind::CloseParenToken);

        let case_block_pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let clauses = self.parse_list(ParsingContext::SwitchClauses, Self::parse_case_or_default_clause);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let case_block = self.finish_node(SyntaxKind::CaseBlock, case_block_pos, NodeVariant::CaseBlock { clauses });

        self.finish_node(
            SyntaxKind::SwitchStatement,
            pos,
            NodeVariant::Switch(Switch { expression, case_block }),
        )
    }

    fn parse_throw_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::ThrowKeyword);
        // A line break after `throw` is not an automatic semicolon: the
        // expression is simply missing.
        let expression = if self.has_preceding_line_break() {
            self.create_missing_node(SyntaxKind::Identifier, false, Some(&messages::LINE_BREAK_NOT_PERMITTED_HERE), &[])
        } else {
            self.allow_in_and(Self::parse_expression)
        };
        if !self.try_parse_semicolon() {
            self.parse_error_for_missing_semicolon_after(expression);
        }
        self.finish_node(
            SyntaxKind::ThrowStatement,
            pos,
            NodeVariant::SingleExpression { expression },
        )
    }

    fn parse_try_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::TryKeyword);
        let try_block = self.parse_block(false, None);
        let catch_clause = (self.token() == SyntaxKind::CatchKeyword).then(|| self.parse_catch_clause());

        let mut finally_block = None;
        if catch_clause.is_none() || self.token() == SyntaxKind::FinallyKeyword {
            self.parse_expected_with(SyntaxKind::FinallyKeyword, Some(&messages::CATCH_OR_FINALLY_EXPECTED), true);
            finally_block = Some(self.parse_block(false, None));
        }
        self.finish_node(
            SyntaxKind::TryStatement,
            pos,
            NodeVariant::Try(Try {
                try_block,
                catch_clause,
                finally_block,
            }),
        )
    }

    fn parse_catch_clause(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::CatchKeyword);
        let variable_declaration = if self.parse_optional(SyntaxKind::OpenParenToken) {
            let declaration = self.parse_variable_declaration(false);
            self.parse_expected(SyntaxKind::CloseParenToken);
            Some(declaration)
        } else {
            None
        };
        let block = self.parse_block(false, None);
        self.finish_node(
            SyntaxKind::CatchClause,
            pos,
            NodeVariant::CatchClause(CatchClause {
                variable_declaration,
                block,
            }),
        )
    }

    fn parse_debugger_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::DebuggerKeyword);
        self.parse_semicolon();
        self.finish_node(SyntaxKind::DebuggerStatement, pos, NodeVariant::Token)
    }

    fn parse_expression_or_labeled_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let expression = self.allow_in_and(Self::parse_expression);
        if self.kind_of(expression) == SyntaxKind::Identifier && self.parse_optional(SyntaxKind::ColonToken) {
            let statement = self.parse_statement();
            return self.finish_node(
                SyntaxKind::LabeledStatement,
                pos,
                NodeVariant::Labeled(Labeled {
                    label: expression,
                    statement,
                }),
            );
        }
        if !self.try_parse_semicolon() {
            self.parse_error_for_missing_semicolon_after(expression);
        }
        self.finish_node(
            SyntaxKind::ExpressionStatement,
            pos,
            NodeVariant::SingleExpression { expression },
        )
    }

    /// Explain a missing `;` after `node`. A lone identifier that looks like
    /// a misspelled keyword gets a suggestion.
    pub(crate) fn parse_error_for_missing_semicolon_after(&mut self, node: NodeId) {
        if self.kind_of(node) == SyntaxKind::TaggedTemplateExpression {
            self.parse_error_at_current_token(&messages::_0_EXPECTED, &[";"]);
            return;
        }
        let Some(text) = self.arena.identifier_text(node).filter(|_| self.kind_of(node) == SyntaxKind::Identifier)
        else {
            self.parse_error_at_current_token(&messages::_0_EXPECTED, &[";"]);
            return;
        };
        let text = text.to_string();
        if text.is_empty() {
            self.parse_error_at_current_token(&messages::_0_EXPECTED, &[";"]);
            return;
        }
        let range = self.arena[node].range();
        let start = skip_trivia(self.source_text, range.pos);
        match text.as_str() {
            // A declaration that failed to parse has already reported.
            "declare" => return,
            "interface" => {
                self.parse_error_at_current_token(&messages::_0_EXPECTED, &[";"]);
                return;
            }
            "module" | "namespace" => {
                if self.token() == SyntaxKind::OpenBraceToken {
                    self.parse_error_at_current_token(&messages::NAMESPACE_MUST_BE_GIVEN_A_NAME, &[]);
                } else {
                    self.parse_error_at_current_token(&messages::_0_EXPECTED, &[";"]);
                }
                return;
            }
            _ => {}
        }
        if let Some(suggestion) = get_spelling_suggestion(&text) {
            self.parse_error_at(
                start,
                range.end,
                &messages::UNKNOWN_KEYWORD_OR_IDENTIFIER_DID_YOU_MEAN_0,
                &[suggestion.as_str()],
            );
            return;
        }
        if self.token() == SyntaxKind::Unknown {
            return;
        }
        self.parse_error_at(start, range.end, &messages::UNEXPECTED_KEYWORD_OR_IDENTIFIER, &[]);
    }

    // ========================================================================
    // Variables and binding patterns
    // ========================================================================

    fn parse_variable_statement(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        let declaration_list = self.parse_variable_declaration_list(false);
        self.parse_semicolon();
        self.finish_node(
            SyntaxKind::VariableStatement,
            pos,
            NodeVariant::VariableStatement(VariableStatement {
                modifiers,
                declaration_list,
            }),
        )
    }

    pub(crate) fn parse_variable_declaration_list(&mut self, in_for_statement_initializer: bool) -> NodeId {
        let pos = self.node_pos();
        let flags = match self.token() {
            SyntaxKind::LetKeyword => NodeFlags::LET,
            SyntaxKind::ConstKeyword => NodeFlags::CONST,
            SyntaxKind::UsingKeyword => NodeFlags::USING,
            SyntaxKind::AwaitKeyword => {
                self.next_token();
                NodeFlags::AWAIT_USING
            }
            _ => NodeFlags::NONE,
        };
        self.next_token();

        // `for (let of x)` uses `let` as an identifier; the declaration list
        // is empty.
        let declarations = if self.token() == SyntaxKind::OfKeyword
            && self.look_ahead(|parser| {
                parser.next_token_is_identifier() && parser.next_token() == SyntaxKind::CloseParenToken
            }) {
            NodeList::empty(self.node_pos())
        } else {
            let parse = |parser: &mut Self| {
                parser.parse_delimited_list(
                    ParsingContext::VariableDeclarations,
                    |parser| parser.parse_variable_declaration(!in_for_statement_initializer),
                    false,
                )
            };
            if in_for_statement_initializer {
                self.disallow_in_and(parse)
            } else {
                self.allow_in_and(parse)
            }
        };

        self.finish_node_with_flags(
            SyntaxKind::VariableDeclarationList,
            pos,
            NodeVariant::VariableDeclarationList { declarations },
            flags,
        )
    }

    fn next_token_is_identifier(&mut self) -> bool {
        self.next_token();
        self.is_identifier()
    }

    pub(crate) fn parse_variable_declaration(&mut self, allow_exclamation: bool) -> NodeId {
        let pos = self.node_pos();
        let name = self.parse_identifier_or_pattern();
        let exclamation_token = if allow_exclamation
            && self.kind_of(name) == SyntaxKind::Identifier
            && self.token() == SyntaxKind::ExclamationToken
            && !self.has_preceding_line_break()
        {
            Some(self.parse_token_node())
        } else {
            None
        };
        let type_node = self.parse_type_annotation();
        let initializer = if matches!(self.token(), SyntaxKind::InKeyword | SyntaxKind::OfKeyword) {
            None
        } else {
            self.parse_initializer()
        };
        self.finish_node(
            SyntaxKind::VariableDeclaration,
            pos,
            NodeVariant::VariableDeclaration(VariableDeclaration {
                name,
                exclamation_token,
                type_node,
                initializer,
            }),
        )
    }

    pub(crate) fn is_binding_identifier_or_private_identifier_or_pattern(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken | SyntaxKind::PrivateIdentifier
        ) || self.is_binding_identifier()
    }

    pub(crate) fn parse_identifier_or_pattern(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            _ => self.parse_binding_identifier(),
        }
    }

    fn parse_array_binding_pattern(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let elements = self.allow_in_and(|parser| {
            parser.parse_delimited_list(ParsingContext::ArrayBindingElements, Self::parse_array_binding_element, false)
        });
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.finish_node(SyntaxKind::ArrayBindingPattern, pos, NodeVariant::BindingPattern { elements })
    }

    fn parse_array_binding_element(&mut self) -> NodeId {
        let pos = self.node_pos();
        if self.token() == SyntaxKind::CommaToken {
            return self.finish_node(SyntaxKind::OmittedExpression, pos, NodeVariant::Token);
        }
        let dot_dot_dot_token = self.parse_optional_token(SyntaxKind::DotDotDotToken);
        let name = self.parse_identifier_or_pattern();
        let initializer = self.parse_initializer();
        self.finish_node(
            SyntaxKind::BindingElement,
            pos,
            NodeVariant::BindingElement(BindingElement {
                dot_dot_dot_token,
                property_name: None,
                name,
                initializer,
            }),
        )
    }

    fn parse_object_binding_pattern(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let elements = self.allow_in_and(|parser| {
            parser.parse_delimited_list(ParsingContext::ObjectBindingElements, Self::parse_object_binding_element, false)
        });
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.finish_node(SyntaxKind::ObjectBindingPattern, pos, NodeVariant::BindingPattern { elements })
    }

    fn parse_object_binding_element(&mut self) -> NodeId {
        let pos = self.node_pos();
        let dot_dot_dot_token = self.parse_optional_token(SyntaxKind::DotDotDotToken);
        let token_is_identifier = self.is_binding_identifier();
        let first = self.parse_property_name();
        let (property_name, name) = if token_is_identifier && self.token() != SyntaxKind::ColonToken {
            (None, first)
        } else {
            self.parse_expected(SyntaxKind::ColonToken);
            (Some(first), self.parse_identifier_or_pattern())
        };
        let initializer = self.parse_initializer();
        self.finish_node(
            SyntaxKind::BindingElement,
            pos,
            NodeVariant::BindingElement(BindingElement {
                dot_dot_dot_token,
                property_name,
                name,
                initializer,
            }),
        )
    }

    pub(crate) fn parse_initializer(&mut self) -> Option<NodeId> {
        self.parse_optional(SyntaxKind::EqualsToken)
            .then(|| self.parse_assignment_expression_or_higher())
    }

    // ========================================================================
    // Functions
    // ========================================================================

    fn parse_function_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let asterisk_token = self.parse_optional_token(SyntaxKind::AsteriskToken);
        let name = if self.modifiers_include(&modifiers, SyntaxKind::DefaultKeyword) {
            self.is_binding_identifier().then(|| self.parse_binding_identifier())
        } else {
            Some(self.parse_binding_identifier())
        };
        let mut flags = SignatureFlags::NONE;
        if asterisk_token.is_some() {
            flags |= SignatureFlags::YIELD;
        }
        if self.modifiers_include(&modifiers, SyntaxKind::AsyncKeyword) {
            flags |= SignatureFlags::AWAIT;
        }
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(flags);
        let type_node = self.parse_return_type(SyntaxKind::ColonToken, false);
        let body = self.parse_function_block_or_semicolon(flags, Some(&messages::OR_EXPECTED));
        self.finish_node(
            SyntaxKind::FunctionDeclaration,
            pos,
            NodeVariant::FunctionLike(FunctionLike {
                modifiers,
                asterisk_token,
                name,
                type_parameters,
                parameters,
                type_node,
                body,
                ..Default::default()
            }),
        )
    }

    pub(crate) fn parse_function_block_or_semicolon(
        &mut self,
        flags: SignatureFlags,
        message: Option<&DiagnosticMessage>,
    ) -> Option<NodeId> {
        if self.token() != SyntaxKind::OpenBraceToken {
            if flags.contains(SignatureFlags::TYPE) {
                self.parse_type_member_semicolon();
                return None;
            }
            if self.can_parse_semicolon() {
                self.parse_semicolon();
                return None;
            }
        }
        Some(self.parse_function_block(flags, message))
    }

    pub(crate) fn parse_function_block(&mut self, flags: SignatureFlags, message: Option<&DiagnosticMessage>) -> NodeId {
        let yield_ = flags.contains(SignatureFlags::YIELD);
        let await_ = flags.contains(SignatureFlags::AWAIT);
        let ignore_missing_open_brace = flags.contains(SignatureFlags::IGNORE_MISSING_OPEN_BRACE);
        self.with_yield_and_await(yield_, await_, |parser| {
            // A function body inside a decorator is not itself a decorator.
            parser.do_outside_of_context(NodeFlags::DECORATOR_CONTEXT, |parser| {
                parser.parse_block(ignore_missing_open_brace, message)
            })
        })
    }

    // ========================================================================
    // Classes
    // ========================================================================

    pub(crate) fn parse_class_declaration_or_expression(
        &mut self,
        pos: TextPos,
        modifiers: Option<NodeList>,
        kind: SyntaxKind,
    ) -> NodeId {
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = (self.is_binding_identifier() && !self.is_implements_clause()).then(|| self.parse_binding_identifier());
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let members = self.parse_list(ParsingContext::ClassMembers, Self::parse_class_element);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            members
        } else {
            NodeList::empty(self.node_pos())
        };
        self.finish_node(
            kind,
            pos,
            NodeVariant::ClassLike(ClassLike {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            }),
        )
    }

    fn is_implements_clause(&mut self) -> bool {
        self.token() == SyntaxKind::ImplementsKeyword && self.look_ahead(Self::next_token_is_identifier_or_keyword)
    }

    pub(crate) fn parse_heritage_clauses(&mut self) -> Option<NodeList> {
        matches!(self.token(), SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword)
            .then(|| self.parse_list(ParsingContext::HeritageClauses, Self::parse_heritage_clause))
    }

    fn parse_heritage_clause(&mut self) -> NodeId {
        let pos = self.node_pos();
        let token = self.token();
        self.next_token();
        let types = self.parse_delimited_list(
            ParsingContext::HeritageClauseElement,
            Self::parse_expression_with_type_arguments,
            false,
        );
        self.finish_node(SyntaxKind::HeritageClause, pos, NodeVariant::HeritageClause(HeritageClause { token, types }))
    }

    fn parse_expression_with_type_arguments(&mut self) -> NodeId {
        let pos = self.node_pos();
        let expression = self.parse_left_hand_side_expression_or_higher();
        if self.kind_of(expression) == SyntaxKind::ExpressionWithTypeArguments {
            return expression;
        }
        let type_arguments = self.try_parse_type_arguments();
        self.finish_node(
            SyntaxKind::ExpressionWithTypeArguments,
            pos,
            NodeVariant::ExpressionWithTypeArguments(ExpressionWithTypeArguments {
                expression,
                type_arguments,
            }),
        )
    }

    /// Whether a class member starts here. Runs under look-ahead.
    pub(crate) fn is_class_member_start(&mut self) -> bool {
        let mut id_token = None;
        if self.token() == SyntaxKind::AtToken {
            return true;
        }
        while self.token().is_modifier_kind() {
            let token = self.token();
            id_token = Some(token);
            if is_class_member_modifier(token) {
                return true;
            }
            self.next_token();
        }
        if self.token() == SyntaxKind::AsteriskToken {
            return true;
        }
        if self.is_literal_property_name() {
            id_token = Some(self.token());
            self.next_token();
        }
        if self.token() == SyntaxKind::OpenBracketToken {
            return true;
        }
        if let Some(id_token) = id_token {
            if !id_token.is_keyword() || matches!(id_token, SyntaxKind::SetKeyword | SyntaxKind::GetKeyword) {
                return true;
            }
            return match self.token() {
                SyntaxKind::OpenParenToken
                | SyntaxKind::LessThanToken
                | SyntaxKind::ExclamationToken
                | SyntaxKind::ColonToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::QuestionToken => true,
                _ => self.can_parse_semicolon(),
            };
        }
        false
    }

    fn parse_class_element(&mut self) -> NodeId {
        let pos = self.node_pos();
        if self.token() == SyntaxKind::SemicolonToken {
            self.next_token();
            return self.finish_node(SyntaxKind::SemicolonClassElement, pos, NodeVariant::Token);
        }

        let modifiers = self.parse_modifiers(true, true, true);
        if self.token() == SyntaxKind::StaticKeyword
            && self.look_ahead(|parser| parser.next_token() == SyntaxKind::OpenBraceToken)
        {
            return self.parse_class_static_block_declaration(pos, modifiers);
        }
        if self.parse_contextual_modifier(SyntaxKind::GetKeyword) {
            return self.parse_accessor_declaration(pos, modifiers, SyntaxKind::GetAccessor, SignatureFlags::NONE);
        }
        if self.parse_contextual_modifier(SyntaxKind::SetKeyword) {
            return self.parse_accessor_declaration(pos, modifiers, SyntaxKind::SetAccessor, SignatureFlags::NONE);
        }
        if matches!(self.token(), SyntaxKind::ConstructorKeyword | SyntaxKind::StringLiteral) {
            let saved_modifiers = modifiers.clone();
            if let Some(constructor) = self.try_parse(|parser| parser.try_parse_constructor_declaration(pos, saved_modifiers)) {
                return constructor;
            }
        }
        if self.is_index_signature() {
            return self.parse_index_signature_declaration(pos, modifiers);
        }
        // Checked after index signatures: `[` starts either one.
        if token_is_identifier_or_keyword(self.token())
            || matches!(
                self.token(),
                SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::BigIntLiteral
                    | SyntaxKind::AsteriskToken
                    | SyntaxKind::OpenBracketToken
            )
        {
            if self.modifiers_include(&modifiers, SyntaxKind::DeclareKeyword) {
                if let Some(list) = &modifiers {
                    for modifier in list.iter() {
                        let flags = &self.arena[modifier].data.flags;
                        flags.set(flags.get() | NodeFlags::AMBIENT);
                    }
                }
                return self.do_inside_of_context(NodeFlags::AMBIENT, |parser| {
                    parser.parse_property_or_method_declaration(pos, modifiers)
                });
            }
            return self.parse_property_or_method_declaration(pos, modifiers);
        }
        if modifiers.is_some() {
            // Modifiers with no member after them: a property with a missing name.
            let name = self.create_missing_node(SyntaxKind::Identifier, true, Some(&messages::DECLARATION_EXPECTED), &[]);
            return self.parse_property_declaration(pos, modifiers, name, None);
        }
        self.create_missing_node(
            SyntaxKind::MissingDeclaration,
            false,
            Some(&messages::UNEXPECTED_TOKEN_A_CONSTRUCTOR_METHOD_ACCESSOR_OR_PROPERTY_WAS_EXPECTED),
            &[],
        )
    }

    fn parse_class_static_block_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        self.parse_expected_token(SyntaxKind::StaticKeyword);
        let body = self.with_yield_and_await(false, true, |parser| parser.parse_block(false, None));
        self.finish_node(
            SyntaxKind::ClassStaticBlockDeclaration,
            pos,
            NodeVariant::FunctionLike(FunctionLike {
                modifiers,
                parameters: NodeList::empty(pos),
                body: Some(body),
                ..Default::default()
            }),
        )
    }

    fn try_parse_constructor_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> Option<NodeId> {
        if !self.parse_constructor_name() {
            return None;
        }
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(SignatureFlags::NONE);
        let type_node = self.parse_return_type(SyntaxKind::ColonToken, false);
        let body = self.parse_function_block_or_semicolon(SignatureFlags::NONE, Some(&messages::OR_EXPECTED));
        Some(self.finish_node(
            SyntaxKind::Constructor,
            pos,
            NodeVariant::FunctionLike(FunctionLike {
                modifiers,
                type_parameters,
                parameters,
                type_node,
                body,
                ..Default::default()
            }),
        ))
    }

    /// `constructor` or `"constructor"` followed by `(`.
    fn parse_constructor_name(&mut self) -> bool {
        if self.token() == SyntaxKind::ConstructorKeyword {
            return self.parse_expected(SyntaxKind::ConstructorKeyword);
        }
        if self.token() == SyntaxKind::StringLiteral
            && self.look_ahead(|parser| parser.next_token() == SyntaxKind::OpenParenToken)
        {
            return self
                .try_parse(|parser| {
                    let literal = parser.parse_literal_node();
                    (parser.arena.identifier_text(literal) == Some("constructor")).then_some(literal)
                })
                .is_some();
        }
        false
    }

    pub(crate) fn parse_accessor_declaration(
        &mut self,
        pos: TextPos,
        modifiers: Option<NodeList>,
        kind: SyntaxKind,
        flags: SignatureFlags,
    ) -> NodeId {
        let name = self.parse_property_name();
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(SignatureFlags::NONE);
        let type_node = self.parse_return_type(SyntaxKind::ColonToken, false);
        let body = self.parse_function_block_or_semicolon(flags, None);
        self.finish_node(
            kind,
            pos,
            NodeVariant::FunctionLike(FunctionLike {
                modifiers,
                name: Some(name),
                type_parameters,
                parameters,
                type_node,
                body,
                ..Default::default()
            }),
        )
    }

    fn parse_property_or_method_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        let asterisk_token = self.parse_optional_token(SyntaxKind::AsteriskToken);
        let name = self.parse_property_name();
        let question_token = self.parse_optional_token(SyntaxKind::QuestionToken);
        if asterisk_token.is_some() || matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
            return self.parse_method_declaration(pos, modifiers, asterisk_token, name, question_token);
        }
        self.parse_property_declaration(pos, modifiers, name, question_token)
    }

    pub(crate) fn parse_method_declaration(
        &mut self,
        pos: TextPos,
        modifiers: Option<NodeList>,
        asterisk_token: Option<NodeId>,
        name: NodeId,
        question_token: Option<NodeId>,
    ) -> NodeId {
        let mut flags = SignatureFlags::NONE;
        if asterisk_token.is_some() {
            flags |= SignatureFlags::YIELD;
        }
        if self.modifiers_include(&modifiers, SyntaxKind::AsyncKeyword) {
            flags |= SignatureFlags::AWAIT;
        }
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters(flags);
        let type_node = self.parse_return_type(SyntaxKind::ColonToken, false);
        let body = self.parse_function_block_or_semicolon(flags, Some(&messages::OR_EXPECTED));
        self.finish_node(
            SyntaxKind::MethodDeclaration,
            pos,
            NodeVariant::FunctionLike(FunctionLike {
                modifiers,
                asterisk_token,
                name: Some(name),
                question_token,
                type_parameters,
                parameters,
                type_node,
                body,
                ..Default::default()
            }),
        )
    }

    fn parse_property_declaration(
        &mut self,
        pos: TextPos,
        modifiers: Option<NodeList>,
        name: NodeId,
        question_token: Option<NodeId>,
    ) -> NodeId {
        let exclamation_token = if question_token.is_none() && !self.has_preceding_line_break() {
            self.parse_optional_token(SyntaxKind::ExclamationToken)
        } else {
            None
        };
        let type_node = self.parse_type_annotation();
        let initializer = self.do_outside_of_context(
            NodeFlags::YIELD_CONTEXT | NodeFlags::AWAIT_CONTEXT | NodeFlags::DISALLOW_IN_CONTEXT,
            Self::parse_initializer,
        );
        if !self.try_parse_semicolon() {
            if initializer.is_some() || type_node.is_some() {
                self.parse_error_at_current_token(&messages::_0_EXPECTED, &[";"]);
            } else {
                self.parse_error_for_missing_semicolon_after(name);
            }
        }
        self.finish_node(
            SyntaxKind::PropertyDeclaration,
            pos,
            NodeVariant::PropertyDeclaration(PropertyDeclaration {
                modifiers,
                name,
                postfix_token: question_token.or(exclamation_token),
                type_node,
                initializer,
            }),
        )
    }

    // ========================================================================
    // Interfaces, type aliases, enums
    // ========================================================================

    fn parse_interface_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        self.parse_expected(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_object_type_members();
        self.finish_node(
            SyntaxKind::InterfaceDeclaration,
            pos,
            NodeVariant::InterfaceDeclaration(InterfaceDeclaration {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            }),
        )
    }

    fn parse_type_alias_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        self.parse_expected(SyntaxKind::TypeKeyword);
        if self.has_preceding_line_break() {
            self.parse_error_at_current_token(&messages::LINE_BREAK_NOT_PERMITTED_HERE, &[]);
        }
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let intrinsic = if self.token() == SyntaxKind::IntrinsicKeyword {
            self.try_parse(|parser| {
                let keyword = parser.parse_token_node();
                (parser.token() != SyntaxKind::DotToken).then_some(keyword)
            })
        } else {
            None
        };
        let type_node = match intrinsic {
            Some(keyword) => keyword,
            None => self.parse_type(),
        };
        self.parse_semicolon();
        self.finish_node(
            SyntaxKind::TypeAliasDeclaration,
            pos,
            NodeVariant::TypeAlias(TypeAlias {
                modifiers,
                name,
                type_parameters,
                type_node,
            }),
        )
    }

    fn parse_enum_member(&mut self) -> NodeId {
        let pos = self.node_pos();
        let name = self.parse_property_name();
        let initializer = self.allow_in_and(Self::parse_initializer);
        self.finish_node(SyntaxKind::EnumMember, pos, NodeVariant::EnumMember(EnumMember { name, initializer }))
    }

    fn parse_enum_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        self.parse_expected(SyntaxKind::EnumKeyword);
        let name = self.parse_identifier();
        let members = if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let members = self.do_outside_of_yield_and_await_context(|parser| {
                parser.parse_delimited_list(ParsingContext::EnumMembers, Self::parse_enum_member, false)
            });
            self.parse_expected(SyntaxKind::CloseBraceToken);
            members
        } else {
            NodeList::empty(self.node_pos())
        };
        self.finish_node(
            SyntaxKind::EnumDeclaration,
            pos,
            NodeVariant::Enum(Enum {
                modifiers,
                name,
                members,
            }),
        )
    }

    // ========================================================================
    // Modules and namespaces
    // ========================================================================

    fn parse_module_block(&mut self) -> NodeId {
        let pos = self.node_pos();
        let statements = if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let statements = self.parse_list(ParsingContext::BlockStatements, Self::parse_statement);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            statements
        } else {
            NodeList::empty(self.node_pos())
        };
        self.finish_node(
            SyntaxKind::ModuleBlock,
            pos,
            NodeVariant::Block {
                statements,
                multi_line: false,
            },
        )
    }

    /// `namespace A.B.C {}` nests one declaration per dotted name.
    fn parse_module_or_namespace_declaration(
        &mut self,
        pos: TextPos,
        modifiers: Option<NodeList>,
        flags: NodeFlags,
    ) -> NodeId {
        let namespace_flag = flags & NodeFlags::NAMESPACE;
        let name = if flags.contains(NodeFlags::NESTED_NAMESPACE) {
            self.parse_identifier_name()
        } else {
            self.parse_identifier()
        };
        let body = if self.parse_optional(SyntaxKind::DotToken) {
            let inner_pos = self.node_pos();
            self.parse_module_or_namespace_declaration(inner_pos, None, NodeFlags::NESTED_NAMESPACE | namespace_flag)
        } else {
            self.parse_module_block()
        };
        self.finish_node_with_flags(
            SyntaxKind::ModuleDeclaration,
            pos,
            NodeVariant::Module(Module {
                modifiers,
                name,
                body: Some(body),
            }),
            flags,
        )
    }

    /// `declare module "name" { }` and `declare global { }`.
    fn parse_ambient_external_module_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        let mut flags = NodeFlags::NONE;
        let name = if self.token() == SyntaxKind::GlobalKeyword {
            flags |= NodeFlags::GLOBAL_AUGMENTATION;
            self.parse_identifier()
        } else {
            self.parse_literal_node()
        };
        let body = if self.token() == SyntaxKind::OpenBraceToken {
            Some(self.parse_module_block())
        } else {
            self.parse_semicolon();
            None
        };
        self.finish_node_with_flags(
            SyntaxKind::ModuleDeclaration,
            pos,
            NodeVariant::Module(Module { modifiers, name, body }),
            flags,
        )
    }

    fn parse_module_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        let mut flags = NodeFlags::NONE;
        if self.token() == SyntaxKind::GlobalKeyword {
            return self.parse_ambient_external_module_declaration(pos, modifiers);
        } else if self.parse_optional(SyntaxKind::NamespaceKeyword) {
            flags |= NodeFlags::NAMESPACE;
        } else {
            self.parse_expected(SyntaxKind::ModuleKeyword);
            if self.token() == SyntaxKind::StringLiteral {
                return self.parse_ambient_external_module_declaration(pos, modifiers);
            }
        }
        self.parse_module_or_namespace_declaration(pos, modifiers, flags)
    }

    // ========================================================================
    // Imports and exports
    // ========================================================================

    fn parse_import_declaration_or_import_equals_declaration(
        &mut self,
        pos: TextPos,
        modifiers: Option<NodeList>,
    ) -> NodeId {
        self.parse_expected(SyntaxKind::ImportKeyword);
        let after_import_pos = self.node_pos();

        let mut identifier = self.is_identifier().then(|| self.parse_identifier());
        let mut is_type_only = false;
        if let Some(id) = identifier {
            let is_type = self.arena.identifier_text(id) == Some("type");
            if is_type
                && (self.token() != SyntaxKind::FromKeyword
                    || (self.is_identifier()
                        && self.look_ahead(|parser| {
                            matches!(parser.next_token(), SyntaxKind::FromKeyword | SyntaxKind::EqualsToken)
                        })))
                && (self.is_identifier()
                    || matches!(self.token(), SyntaxKind::AsteriskToken | SyntaxKind::OpenBraceToken))
            {
                is_type_only = true;
                identifier = self.is_identifier().then(|| self.parse_identifier());
            }
        }

        if let Some(name) = identifier {
            if !matches!(self.token(), SyntaxKind::CommaToken | SyntaxKind::FromKeyword) {
                return self.parse_import_equals_declaration(pos, modifiers, name, is_type_only);
            }
        }

        let import_clause = if identifier.is_some()
            || matches!(self.token(), SyntaxKind::AsteriskToken | SyntaxKind::OpenBraceToken)
        {
            let clause = self.parse_import_clause(identifier, after_import_pos, is_type_only);
            self.parse_expected(SyntaxKind::FromKeyword);
            Some(clause)
        } else {
            None
        };
        let module_specifier = self.parse_module_specifier();
        self.parse_semicolon();
        self.finish_node(
            SyntaxKind::ImportDeclaration,
            pos,
            NodeVariant::Import(Import {
                modifiers,
                import_clause,
                module_specifier,
            }),
        )
    }

    fn parse_import_equals_declaration(
        &mut self,
        pos: TextPos,
        modifiers: Option<NodeList>,
        name: NodeId,
        is_type_only: bool,
    ) -> NodeId {
        self.parse_expected(SyntaxKind::EqualsToken);
        let module_reference = if self.token() == SyntaxKind::RequireKeyword && self.look_ahead(Self::next_token_is_open_paren)
        {
            let reference_pos = self.node_pos();
            self.parse_expected(SyntaxKind::RequireKeyword);
            self.parse_expected(SyntaxKind::OpenParenToken);
            let expression = self.parse_module_specifier();
            self.parse_expected(SyntaxKind::CloseParenToken);
            self.finish_node(
                SyntaxKind::ExternalModuleReference,
                reference_pos,
                NodeVariant::SingleExpression { expression },
            )
        } else {
            self.parse_entity_name(false, None)
        };
        self.parse_semicolon();
        self.finish_node(
            SyntaxKind::ImportEqualsDeclaration,
            pos,
            NodeVariant::ImportEquals(ImportEquals {
                modifiers,
                is_type_only,
                name,
                module_reference,
            }),
        )
    }

    fn parse_import_clause(&mut self, name: Option<NodeId>, pos: TextPos, is_type_only: bool) -> NodeId {
        let named_bindings = if name.is_none() || self.parse_optional(SyntaxKind::CommaToken) {
            Some(if self.token() == SyntaxKind::AsteriskToken {
                self.parse_namespace_import()
            } else {
                self.parse_named_imports_or_exports(SyntaxKind::NamedImports)
            })
        } else {
            None
        };
        self.finish_node(
            SyntaxKind::ImportClause,
            pos,
            NodeVariant::ImportClause(ImportClause {
                is_type_only,
                name,
                named_bindings,
            }),
        )
    }

    fn parse_namespace_import(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::AsteriskToken);
        self.parse_expected(SyntaxKind::AsKeyword);
        let name = self.parse_identifier();
        self.finish_node(SyntaxKind::NamespaceImport, pos, NodeVariant::NamespaceBinding { name })
    }

    fn parse_named_imports_or_exports(&mut self, kind: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        let specifier_kind = if kind == SyntaxKind::NamedImports {
            SyntaxKind::ImportSpecifier
        } else {
            SyntaxKind::ExportSpecifier
        };
        let elements = self.parse_bracketed_list(
            ParsingContext::ImportOrExportSpecifiers,
            |parser| parser.parse_import_or_export_specifier(specifier_kind),
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
        );
        self.finish_node(kind, pos, NodeVariant::NamedBindings { elements })
    }

    fn can_parse_module_export_name(&self) -> bool {
        token_is_identifier_or_keyword(self.token()) || self.token() == SyntaxKind::StringLiteral
    }

    fn parse_module_export_name(&mut self) -> NodeId {
        if self.token() == SyntaxKind::StringLiteral {
            self.parse_literal_node()
        } else {
            self.parse_identifier_name()
        }
    }

    /// `type` is a modifier, a name, or both, depending on how many `as`
    /// follow it: `{ type }`, `{ type as }`, `{ type as as }`,
    /// `{ type as as as }` all parse differently.
    fn parse_import_or_export_specifier(&mut self, kind: SyntaxKind) -> NodeId {
        let pos = self.node_pos();
        let mut keyword_check = self.keyword_check();
        let mut is_type_only = false;
        let mut property_name = None;
        let mut can_parse_as_keyword = true;
        let mut name = self.parse_module_export_name();

        if self.kind_of(name) == SyntaxKind::Identifier && self.arena.identifier_text(name) == Some("type") {
            if self.token() == SyntaxKind::AsKeyword {
                let first_as = self.parse_identifier_name();
                if self.token() == SyntaxKind::AsKeyword {
                    let second_as = self.parse_identifier_name();
                    if self.can_parse_module_export_name() {
                        is_type_only = true;
                        property_name = Some(first_as);
                        keyword_check = self.keyword_check();
                        name = self.parse_module_export_name();
                    } else {
                        property_name = Some(name);
                        name = second_as;
                    }
                    can_parse_as_keyword = false;
                } else if self.can_parse_module_export_name() {
                    property_name = Some(name);
                    can_parse_as_keyword = false;
                    keyword_check = self.keyword_check();
                    name = self.parse_module_export_name();
                } else {
                    is_type_only = true;
                    name = first_as;
                }
            } else if self.can_parse_module_export_name() {
                is_type_only = true;
                keyword_check = self.keyword_check();
                name = self.parse_module_export_name();
            }
        }
        if can_parse_as_keyword && self.token() == SyntaxKind::AsKeyword {
            property_name = Some(name);
            self.parse_expected(SyntaxKind::AsKeyword);
            keyword_check = self.keyword_check();
            name = self.parse_module_export_name();
        }

        if kind == SyntaxKind::ImportSpecifier {
            if self.kind_of(name) != SyntaxKind::Identifier {
                self.parse_error_at_node(name, &messages::IDENTIFIER_EXPECTED, &[]);
                let name_pos = self.arena[name].pos();
                let missing = self.create_missing_node(SyntaxKind::Identifier, false, None, &[]);
                let range = &mut self.arena.get_mut(missing).data.range;
                range.pos = name_pos;
                range.end = name_pos;
                name = missing;
            } else if let Some((start, end)) = keyword_check {
                self.parse_error_at(start, end, &messages::IDENTIFIER_EXPECTED, &[]);
            }
        }

        self.finish_node(
            kind,
            pos,
            NodeVariant::Specifier(Specifier {
                is_type_only,
                property_name,
                name,
            }),
        )
    }

    /// Span of the current token when it is a reserved keyword that cannot
    /// name a local binding.
    fn keyword_check(&self) -> Option<(TextPos, TextPos)> {
        (self.token().is_keyword() && !self.is_identifier()).then(|| (self.token_pos(), self.token_end()))
    }

    pub(crate) fn parse_module_specifier(&mut self) -> NodeId {
        if self.token() == SyntaxKind::StringLiteral {
            return self.parse_literal_node();
        }
        // Any expression is accepted here; only string literals are valid.
        self.parse_expression()
    }

    fn parse_export_assignment(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        self.do_in_await_context(|parser| {
            let is_export_equals = if parser.parse_optional(SyntaxKind::EqualsToken) {
                true
            } else {
                parser.parse_expected(SyntaxKind::DefaultKeyword);
                false
            };
            let expression = parser.parse_assignment_expression_or_higher();
            parser.parse_semicolon();
            parser.finish_node(
                SyntaxKind::ExportAssignment,
                pos,
                NodeVariant::ExportAssignment(ExportAssignment {
                    modifiers,
                    is_export_equals,
                    expression,
                }),
            )
        })
    }

    fn parse_namespace_export_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        self.parse_expected(SyntaxKind::AsKeyword);
        self.parse_expected(SyntaxKind::NamespaceKeyword);
        let name = self.parse_identifier();
        self.parse_semicolon();
        self.finish_node(
            SyntaxKind::NamespaceExportDeclaration,
            pos,
            NodeVariant::NamespaceExportDeclaration { modifiers, name },
        )
    }

    fn parse_export_declaration(&mut self, pos: TextPos, modifiers: Option<NodeList>) -> NodeId {
        self.do_in_await_context(|parser| {
            let is_type_only = parser.parse_optional(SyntaxKind::TypeKeyword);
            let namespace_export_pos = parser.node_pos();
            let mut export_clause = None;
            let mut module_specifier = None;
            if parser.parse_optional(SyntaxKind::AsteriskToken) {
                if parser.parse_optional(SyntaxKind::AsKeyword) {
                    let name = parser.parse_module_export_name();
                    export_clause = Some(parser.finish_node(
                        SyntaxKind::NamespaceExport,
                        namespace_export_pos,
                        NodeVariant::NamespaceBinding { name },
                    ));
                }
                parser.parse_expected(SyntaxKind::FromKeyword);
                module_specifier = Some(parser.parse_module_specifier());
            } else {
                export_clause = Some(parser.parse_named_imports_or_exports(SyntaxKind::NamedExports));
                // `export { a } "mod"` is a forgotten `from`, not two statements.
                if parser.token() == SyntaxKind::FromKeyword
                    || (parser.token() == SyntaxKind::StringLiteral && !parser.has_preceding_line_break())
                {
                    parser.parse_expected(SyntaxKind::FromKeyword);
                    module_specifier = Some(parser.parse_module_specifier());
                }
            }
            parser.parse_semicolon();
            parser.finish_node(
                SyntaxKind::ExportDeclaration,
                pos,
                NodeVariant::ExportDeclaration(ExportDeclaration {
                    modifiers,
                    is_type_only,
                    export_clause,
                    module_specifier,
                }),
            )
        })
    }
}

/// Modifiers that can only begin a class member.
fn is_class_member_modifier(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::PublicKeyword
            | SyntaxKind::PrivateKeyword
            | SyntaxKind::ProtectedKeyword
            | SyntaxKind::ReadonlyKeyword
            | SyntaxKind::OverrideKeyword
            | SyntaxKind::StaticKeyword
            | SyntaxKind::AccessorKeyword
    )
}
