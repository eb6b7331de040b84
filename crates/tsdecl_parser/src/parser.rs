//! The parser core: token management, diagnostics, speculation, context
//! flags, node construction, and names.
//!
//! This is a recursive descent parser over an on-demand scanner. The
//! productions live in sibling modules as further `impl Parser` blocks.
//! Malformed input never fails the parse: missing constructs are replaced
//! by zero-width nodes and every problem becomes a diagnostic.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use tsdecl_ast::utilities::set_parent_nodes;
use tsdecl_ast::{
    token_to_string, Identifier, LanguageVariant, Literal, Node, NodeArena, NodeFlags, NodeId, NodeList,
    NodeVariant, QualifiedName, ScriptKind, ScriptTarget, SourceFile, SourceFileNode, SyntaxKind,
};
use tsdecl_ast::script::is_declaration_file_name;
use tsdecl_core::cancellation::CancellationToken;
use tsdecl_core::text::{TextPos, TextSpan};
use tsdecl_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use tsdecl_scanner::{Scanner, ScannerState};

use crate::context::ParsingContexts;
use crate::options::{ParseError, ParseOptions};

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
pub(crate) const MAX_RECURSION_DEPTH: u32 = 200;

/// A lexical error forwarded from the scanner's error callback.
#[derive(Debug, Clone, Copy)]
struct ScannerError {
    message: &'static DiagnosticMessage,
    pos: TextPos,
    length: u32,
}

/// Everything a speculative parse can change.
struct ParserSnapshot {
    scanner: ScannerState,
    diagnostics_len: usize,
    parse_error_before_next_finished_node: bool,
    context_flags: NodeFlags,
    arena_len: usize,
}

/// Parse `text` into a [`SourceFile`].
///
/// Syntax errors do not make this fail; they are collected on the returned
/// file. An `Err` means the parse was cancelled or the text cannot be
/// addressed with 32-bit offsets.
pub fn parse_source_file(file_name: &str, text: &str, options: &ParseOptions) -> Result<SourceFile, ParseError> {
    if text.len() > u32::MAX as usize {
        return Err(ParseError::SourceTooLarge {
            file_name: file_name.to_string(),
            len: text.len(),
        });
    }
    let _span = tracing::debug_span!("parse", file = file_name).entered();
    Parser::new(file_name, text, options).parse()
}

/// The parser produces a SourceFile AST from TypeScript source text.
pub struct Parser<'a> {
    pub(crate) scanner: Scanner<'a>,
    scanner_errors: Rc<RefCell<Vec<ScannerError>>>,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) source_text: &'a str,
    language_version: ScriptTarget,
    pub(crate) language_variant: LanguageVariant,
    script_kind: ScriptKind,
    attach_js_doc: bool,
    set_parent_nodes: bool,
    cancellation_token: Option<CancellationToken>,
    cancelled: bool,
    pub(crate) context_flags: NodeFlags,
    pub(crate) parsing_context: ParsingContexts,
    pub(crate) diagnostics: DiagnosticCollection,
    parse_error_before_next_finished_node: bool,
    /// Start positions where `(` was already found not to open an arrow
    /// function, so nested ambiguities are not re-parsed.
    pub(crate) not_parenthesized_arrow: HashSet<TextPos>,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    pub(crate) recursion_depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(file_name: &str, source_text: &'a str, options: &ParseOptions) -> Self {
        let script_kind = options.script_kind.ensure(file_name);
        let language_variant = script_kind.language_variant();
        let scanner_errors: Rc<RefCell<Vec<ScannerError>>> = Rc::default();

        let mut scanner = Scanner::new(source_text).with_language(options.language_version, language_variant);
        let sink = Rc::clone(&scanner_errors);
        scanner.set_on_error(Box::new(move |message, pos, length| {
            sink.borrow_mut().push(ScannerError { message, pos, length });
        }));

        let mut context_flags = NodeFlags::NONE;
        if script_kind.is_javascript() {
            context_flags |= NodeFlags::JAVASCRIPT_FILE;
        }
        if is_declaration_file_name(file_name) {
            context_flags |= NodeFlags::AMBIENT;
        }

        Self {
            scanner,
            scanner_errors,
            arena: NodeArena::with_capacity(source_text.len() / 8),
            file_name: file_name.to_string(),
            source_text,
            language_version: options.language_version,
            language_variant,
            script_kind,
            attach_js_doc: options.attach_js_doc,
            set_parent_nodes: options.set_parent_nodes,
            cancellation_token: options.cancellation_token.clone(),
            cancelled: false,
            context_flags,
            parsing_context: ParsingContexts::NONE,
            diagnostics: DiagnosticCollection::new(),
            parse_error_before_next_finished_node: false,
            not_parenthesized_arrow: HashSet::new(),
            recursion_depth: 0,
        }
    }

    /// Parse the whole text and hand back the tree with its diagnostics.
    pub fn parse(mut self) -> Result<SourceFile, ParseError> {
        tracing::debug!(len = self.source_text.len(), script_kind = ?self.script_kind, "parsing source file");

        self.next_token();
        let statements = if self.script_kind == ScriptKind::JSON {
            self.parse_json_statements()
        } else {
            self.parse_list(crate::context::ParsingContext::SourceElements, Self::parse_statement)
        };
        if self.cancelled {
            tracing::debug!("parse cancelled");
            return Err(ParseError::Cancelled(self.file_name));
        }
        let end_of_file_token = self.parse_token_node();

        let end = self.source_text.len() as TextPos;
        let mut root = Node::new(
            SyntaxKind::SourceFile,
            0,
            NodeVariant::SourceFile(SourceFileNode {
                statements,
                end_of_file_token,
            }),
        );
        root.data.range.end = end;
        root.data.flags.set(self.context_flags);
        let root = self.arena.alloc(root);

        if self.set_parent_nodes {
            set_parent_nodes(&self.arena, root);
        }

        let statement_count = match &self.arena[root].variant {
            NodeVariant::SourceFile(file) => file.statements.len(),
            _ => 0,
        };
        tracing::debug!(
            statements = statement_count,
            diagnostics = self.diagnostics.len(),
            nodes = self.arena.len(),
            "parsed source file"
        );

        Ok(SourceFile::new(
            self.arena,
            root,
            self.file_name.clone(),
            self.source_text.to_string(),
            self.language_version,
            self.script_kind,
            is_declaration_file_name(&self.file_name),
            self.diagnostics.into_diagnostics(),
        ))
    }

    /// JSON text is one expression statement; anything after it is an error.
    fn parse_json_statements(&mut self) -> NodeList {
        let list_pos = self.node_pos();
        if self.token() == SyntaxKind::EndOfFileToken {
            self.parse_error_at_current_token(&messages::EXPRESSION_EXPECTED, &[]);
            return NodeList::empty(list_pos);
        }
        let pos = self.node_pos();
        let expression = self.parse_assignment_expression_or_higher();
        let statement = self.finish_node(
            SyntaxKind::ExpressionStatement,
            pos,
            NodeVariant::SingleExpression { expression },
        );
        while self.token() != SyntaxKind::EndOfFileToken {
            self.parse_error_at_current_token(&messages::UNEXPECTED_TOKEN, &[]);
            self.next_token();
        }
        NodeList::new(vec![statement], list_pos, self.node_pos())
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    /// Start of the current token including its leading trivia; where the
    /// next node begins.
    #[inline]
    pub(crate) fn node_pos(&self) -> TextPos {
        self.scanner.token_full_start()
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> TextPos {
        self.scanner.token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> TextPos {
        self.scanner.token_end()
    }

    #[inline]
    pub(crate) fn token_value(&self) -> &str {
        self.scanner.token_value()
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    /// Advance, reporting a keyword that was spelled with escapes.
    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        if self.token().is_keyword() && (self.scanner.has_unicode_escape() || self.scanner.has_extended_unicode_escape())
        {
            let (start, end) = (self.token_pos(), self.token_end());
            self.parse_error_at(start, end, &messages::KEYWORDS_CANNOT_CONTAIN_ESCAPE_CHARACTERS, &[]);
        }
        self.next_token_without_check()
    }

    pub(crate) fn next_token_without_check(&mut self) -> SyntaxKind {
        let token = self.scanner.scan();
        self.drain_scanner_errors();
        token
    }

    pub(crate) fn re_scan_greater_token(&mut self) -> SyntaxKind {
        self.scanner.re_scan_greater_token()
    }

    pub(crate) fn re_scan_slash_token(&mut self) -> SyntaxKind {
        let token = self.scanner.re_scan_slash_token();
        self.drain_scanner_errors();
        token
    }

    pub(crate) fn re_scan_template_token(&mut self, is_tagged_template: bool) -> SyntaxKind {
        let token = self.scanner.re_scan_template_token(is_tagged_template);
        self.drain_scanner_errors();
        token
    }

    pub(crate) fn re_scan_less_than_token(&mut self) -> SyntaxKind {
        self.scanner.re_scan_less_than_token()
    }

    pub(crate) fn scan_jsx_token(&mut self, allow_multiline_jsx_text: bool) -> SyntaxKind {
        let token = self.scanner.scan_jsx_token(allow_multiline_jsx_text);
        self.drain_scanner_errors();
        token
    }

    pub(crate) fn re_scan_jsx_token(&mut self, allow_multiline_jsx_text: bool) -> SyntaxKind {
        let token = self.scanner.re_scan_jsx_token(allow_multiline_jsx_text);
        self.drain_scanner_errors();
        token
    }

    pub(crate) fn scan_jsx_identifier(&mut self) -> SyntaxKind {
        let token = self.scanner.scan_jsx_identifier();
        self.drain_scanner_errors();
        token
    }

    pub(crate) fn scan_jsx_attribute_value(&mut self) -> SyntaxKind {
        let token = self.scanner.scan_jsx_attribute_value();
        self.drain_scanner_errors();
        token
    }

    /// Move errors the scanner reported during the last call into the
    /// parser's diagnostics, in order.
    fn drain_scanner_errors(&mut self) {
        if self.scanner_errors.borrow().is_empty() {
            return;
        }
        let errors: Vec<ScannerError> = self.scanner_errors.borrow_mut().drain(..).collect();
        for error in errors {
            self.parse_error_at_position(error.pos, error.length, error.message, &[]);
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Record a diagnostic unless the previous one starts at the same
    /// position, and mark the next finished node as erroneous.
    pub(crate) fn parse_error_at_position(
        &mut self,
        start: TextPos,
        length: u32,
        message: &DiagnosticMessage,
        args: &[&str],
    ) {
        let last_start = self.diagnostics.last().map(Diagnostic::start);
        if last_start != Some(start) {
            self.diagnostics.add(Diagnostic::with_location(
                self.file_name.as_str(),
                TextSpan::new(start, length),
                message,
                args,
            ));
        }
        self.parse_error_before_next_finished_node = true;
    }

    pub(crate) fn parse_error_at(&mut self, start: TextPos, end: TextPos, message: &DiagnosticMessage, args: &[&str]) {
        self.parse_error_at_position(start, end.saturating_sub(start), message, args);
    }

    pub(crate) fn parse_error_at_current_token(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let (start, end) = (self.token_pos(), self.token_end());
        self.parse_error_at(start, end, message, args);
    }

    /// Report over a finished node's text, trivia excluded.
    pub(crate) fn parse_error_at_node(&mut self, id: NodeId, message: &DiagnosticMessage, args: &[&str]) {
        let range = self.arena[id].range();
        let start = skip_trivia(self.source_text, range.pos);
        self.parse_error_at(start, range.end.max(start), message, args);
    }

    // ========================================================================
    // Speculation
    // ========================================================================

    fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            scanner: self.scanner.save_state(),
            diagnostics_len: self.diagnostics.len(),
            parse_error_before_next_finished_node: self.parse_error_before_next_finished_node,
            context_flags: self.context_flags,
            arena_len: self.arena.len(),
        }
    }

    fn restore(&mut self, snapshot: ParserSnapshot) {
        self.scanner.restore_state(snapshot.scanner);
        self.diagnostics.truncate(snapshot.diagnostics_len);
        self.parse_error_before_next_finished_node = snapshot.parse_error_before_next_finished_node;
        self.context_flags = snapshot.context_flags;
        self.arena.truncate(snapshot.arena_len);
    }

    /// Run `f` and roll back everything it did.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.snapshot();
        let result = f(self);
        self.restore(snapshot);
        result
    }

    /// Run `f`, keeping its effects only when it produces a value.
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let snapshot = self.snapshot();
        let result = f(self);
        if result.is_none() {
            self.restore(snapshot);
            tracing::trace!(pos = self.token_pos(), "speculative parse rolled back");
        }
        result
    }

    // ========================================================================
    // Context flags
    // ========================================================================

    #[inline]
    pub(crate) fn in_context(&self, flags: NodeFlags) -> bool {
        self.context_flags.intersects(flags)
    }

    pub(crate) fn in_yield_context(&self) -> bool {
        self.in_context(NodeFlags::YIELD_CONTEXT)
    }

    pub(crate) fn in_await_context(&self) -> bool {
        self.in_context(NodeFlags::AWAIT_CONTEXT)
    }

    pub(crate) fn in_disallow_in_context(&self) -> bool {
        self.in_context(NodeFlags::DISALLOW_IN_CONTEXT)
    }

    pub(crate) fn in_decorator_context(&self) -> bool {
        self.in_context(NodeFlags::DECORATOR_CONTEXT)
    }

    pub(crate) fn in_disallow_conditional_types_context(&self) -> bool {
        self.in_context(NodeFlags::DISALLOW_CONDITIONAL_TYPES_CONTEXT)
    }

    /// Run `f` with `flags` set, restoring the previous flags afterwards.
    pub(crate) fn do_inside_of_context<T>(&mut self, flags: NodeFlags, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context_flags;
        self.context_flags |= flags;
        let result = f(self);
        self.context_flags = saved;
        result
    }

    /// Run `f` with `flags` cleared, restoring the previous flags afterwards.
    pub(crate) fn do_outside_of_context<T>(&mut self, flags: NodeFlags, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context_flags;
        self.context_flags.remove(flags);
        let result = f(self);
        self.context_flags = saved;
        result
    }

    pub(crate) fn allow_in_and<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_outside_of_context(NodeFlags::DISALLOW_IN_CONTEXT, f)
    }

    pub(crate) fn disallow_in_and<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_inside_of_context(NodeFlags::DISALLOW_IN_CONTEXT, f)
    }

    pub(crate) fn allow_conditional_types_and<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_outside_of_context(NodeFlags::DISALLOW_CONDITIONAL_TYPES_CONTEXT, f)
    }

    pub(crate) fn disallow_conditional_types_and<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_inside_of_context(NodeFlags::DISALLOW_CONDITIONAL_TYPES_CONTEXT, f)
    }

    pub(crate) fn do_in_await_context<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_inside_of_context(NodeFlags::AWAIT_CONTEXT, f)
    }

    pub(crate) fn do_outside_of_await_context<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_outside_of_context(NodeFlags::AWAIT_CONTEXT, f)
    }

    pub(crate) fn do_in_decorator_context<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_inside_of_context(NodeFlags::DECORATOR_CONTEXT, f)
    }

    pub(crate) fn do_outside_of_yield_and_await_context<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.do_outside_of_context(NodeFlags::YIELD_CONTEXT | NodeFlags::AWAIT_CONTEXT, f)
    }

    /// Run `f` with exactly the yield and await flags given.
    pub(crate) fn with_yield_and_await<T>(&mut self, yield_: bool, await_: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context_flags;
        self.context_flags.set(NodeFlags::YIELD_CONTEXT, yield_);
        self.context_flags.set(NodeFlags::AWAIT_CONTEXT, await_);
        let result = f(self);
        self.context_flags = saved;
        result
    }

    // ========================================================================
    // Cancellation
    // ========================================================================

    /// Poll the cancellation token. Once cancelled, stays cancelled.
    pub(crate) fn is_cancelled(&mut self) -> bool {
        if !self.cancelled && self.cancellation_token.as_ref().is_some_and(CancellationToken::is_cancelled) {
            tracing::trace!(pos = self.token_pos(), "cancellation requested");
            self.cancelled = true;
        }
        self.cancelled
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    /// Allocate a node spanning `pos` to the start of the current token.
    pub(crate) fn finish_node(&mut self, kind: SyntaxKind, pos: TextPos, variant: NodeVariant) -> NodeId {
        self.finish_node_with_flags(kind, pos, variant, NodeFlags::NONE)
    }

    pub(crate) fn finish_node_with_flags(
        &mut self,
        kind: SyntaxKind,
        pos: TextPos,
        variant: NodeVariant,
        flags: NodeFlags,
    ) -> NodeId {
        let end = self.node_pos();
        self.finish_node_at(kind, pos, end, variant, flags)
    }

    pub(crate) fn finish_node_at(
        &mut self,
        kind: SyntaxKind,
        pos: TextPos,
        end: TextPos,
        variant: NodeVariant,
        flags: NodeFlags,
    ) -> NodeId {
        let mut node = Node::new(kind, pos, variant);
        node.data.range.end = end;
        let mut flags = flags | self.context_flags;
        if self.parse_error_before_next_finished_node {
            self.parse_error_before_next_finished_node = false;
            flags |= NodeFlags::THIS_NODE_HAS_ERROR;
        }
        node.data.flags.set(flags);
        let id = self.arena.alloc(node);
        if self.attach_js_doc && kind.can_have_js_doc() {
            self.add_js_doc_comment(id);
        }
        id
    }

    /// A zero-width stand-in for something that should have been here.
    pub(crate) fn create_missing_node(
        &mut self,
        kind: SyntaxKind,
        report_at_current_position: bool,
        message: Option<&DiagnosticMessage>,
        args: &[&str],
    ) -> NodeId {
        if report_at_current_position {
            if let Some(message) = message {
                let pos = self.node_pos();
                self.parse_error_at_position(pos, 0, message, args);
            }
        } else if let Some(message) = message {
            self.parse_error_at_current_token(message, args);
        }
        let pos = self.node_pos();
        let empty = self.arena.intern("");
        let variant = match kind {
            SyntaxKind::Identifier => NodeVariant::Identifier(Identifier {
                text: empty,
                original_keyword_kind: None,
            }),
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => NodeVariant::Literal(Literal {
                text: empty,
                token_flags: Default::default(),
            }),
            kind if kind.is_template_literal_kind() => NodeVariant::Literal(Literal {
                text: empty,
                token_flags: Default::default(),
            }),
            SyntaxKind::MissingDeclaration => NodeVariant::MissingDeclaration { modifiers: None },
            _ => NodeVariant::Token,
        };
        self.finish_node(kind, pos, variant)
    }

    /// The current token as a childless node.
    pub(crate) fn parse_token_node(&mut self) -> NodeId {
        let pos = self.node_pos();
        let kind = self.token();
        self.next_token();
        self.finish_node(kind, pos, NodeVariant::Token)
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        self.parse_expected_with(kind, None, true)
    }

    /// Consume `kind` or report `message` (default `'{kind}' expected.`).
    pub(crate) fn parse_expected_with(
        &mut self,
        kind: SyntaxKind,
        message: Option<&DiagnosticMessage>,
        should_advance: bool,
    ) -> bool {
        if self.token() == kind {
            if should_advance {
                self.next_token();
            }
            return true;
        }
        match message {
            Some(message) => self.parse_error_at_current_token(message, &[]),
            None => {
                let text = token_to_string(kind).unwrap_or("token");
                self.parse_error_at_current_token(&messages::_0_EXPECTED, &[text]);
            }
        }
        false
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            return true;
        }
        false
    }

    pub(crate) fn parse_optional_token(&mut self, kind: SyntaxKind) -> Option<NodeId> {
        (self.token() == kind).then(|| self.parse_token_node())
    }

    /// The token node for `kind`, or a missing one with `'{kind}' expected.`.
    pub(crate) fn parse_expected_token(&mut self, kind: SyntaxKind) -> NodeId {
        match self.parse_optional_token(kind) {
            Some(token) => token,
            None => {
                let text = token_to_string(kind).unwrap_or("token");
                self.create_missing_node(kind, false, Some(&messages::_0_EXPECTED), &[text])
            }
        }
    }

    /// Whether a statement can end here, by `;` or automatic insertion.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        if self.token() == SyntaxKind::SemicolonToken {
            return true;
        }
        matches!(self.token(), SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken)
            || self.has_preceding_line_break()
    }

    pub(crate) fn try_parse_semicolon(&mut self) -> bool {
        if !self.can_parse_semicolon() {
            return false;
        }
        if self.token() == SyntaxKind::SemicolonToken {
            self.next_token();
        }
        true
    }

    pub(crate) fn parse_semicolon(&mut self) -> bool {
        self.try_parse_semicolon() || self.parse_expected(SyntaxKind::SemicolonToken)
    }

    // ========================================================================
    // Identifiers and names
    // ========================================================================

    /// Whether the current token can be used as an identifier here. `yield`
    /// and `await` are reserved inside generator and async bodies.
    pub(crate) fn is_identifier(&self) -> bool {
        match self.token() {
            SyntaxKind::Identifier => true,
            SyntaxKind::YieldKeyword if self.in_yield_context() => false,
            SyntaxKind::AwaitKeyword if self.in_await_context() => false,
            token => token > SyntaxKind::LAST_RESERVED_WORD && token <= SyntaxKind::LAST_KEYWORD,
        }
    }

    pub(crate) fn is_binding_identifier(&self) -> bool {
        let token = self.token();
        token == SyntaxKind::Identifier || (token > SyntaxKind::LAST_RESERVED_WORD && token <= SyntaxKind::LAST_KEYWORD)
    }

    pub(crate) fn create_identifier(
        &mut self,
        is_identifier: bool,
        message: Option<&DiagnosticMessage>,
        private_identifier_message: Option<&DiagnosticMessage>,
    ) -> NodeId {
        if is_identifier {
            let pos = self.node_pos();
            let kind = self.token();
            let text = self.arena.intern(identifier_token_text(&self.scanner));
            self.next_token_without_check();
            return self.finish_node(
                SyntaxKind::Identifier,
                pos,
                NodeVariant::Identifier(Identifier {
                    text,
                    original_keyword_kind: kind.is_keyword().then_some(kind),
                }),
            );
        }
        if self.token() == SyntaxKind::PrivateIdentifier {
            let message = private_identifier_message.unwrap_or(&messages::PRIVATE_IDENTIFIERS_ARE_NOT_ALLOWED_OUTSIDE_CLASS_BODIES);
            self.parse_error_at_current_token(message, &[]);
            return self.create_identifier(true, None, None);
        }
        let report_at_current_position = self.token() == SyntaxKind::EndOfFileToken;
        let token_text = self.scanner.token_text();
        let default_message = if self.scanner.is_reserved_word() {
            &messages::IDENTIFIER_EXPECTED_0_IS_A_RESERVED_WORD_THAT_CANNOT_BE_USED_HERE
        } else {
            &messages::IDENTIFIER_EXPECTED
        };
        self.create_missing_node(
            SyntaxKind::Identifier,
            report_at_current_position,
            Some(message.unwrap_or(default_message)),
            &[token_text],
        )
    }

    pub(crate) fn parse_identifier(&mut self) -> NodeId {
        let is_identifier = self.is_identifier();
        self.create_identifier(is_identifier, None, None)
    }

    pub(crate) fn parse_identifier_with_message(&mut self, message: &DiagnosticMessage) -> NodeId {
        let is_identifier = self.is_identifier();
        self.create_identifier(is_identifier, Some(message), None)
    }

    pub(crate) fn parse_binding_identifier(&mut self) -> NodeId {
        let is_identifier = self.is_binding_identifier();
        self.create_identifier(is_identifier, None, None)
    }

    /// An identifier where any keyword is acceptable, as after `.`.
    pub(crate) fn parse_identifier_name(&mut self) -> NodeId {
        let is_identifier = token_is_identifier_or_keyword(self.token());
        self.create_identifier(is_identifier, None, None)
    }

    pub(crate) fn parse_private_identifier(&mut self) -> NodeId {
        let pos = self.node_pos();
        let text = self.arena.intern(identifier_token_text(&self.scanner));
        self.next_token();
        self.finish_node(
            SyntaxKind::PrivateIdentifier,
            pos,
            NodeVariant::Identifier(Identifier {
                text,
                original_keyword_kind: None,
            }),
        )
    }

    pub(crate) fn is_literal_property_name(&self) -> bool {
        token_is_identifier_or_keyword(self.token())
            || matches!(
                self.token(),
                SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral
            )
    }

    pub(crate) fn parse_property_name(&mut self) -> NodeId {
        self.parse_property_name_worker(true)
    }

    pub(crate) fn parse_property_name_worker(&mut self, allow_computed_property_names: bool) -> NodeId {
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                self.parse_literal_node()
            }
            SyntaxKind::OpenBracketToken if allow_computed_property_names => self.parse_computed_property_name(),
            SyntaxKind::PrivateIdentifier => self.parse_private_identifier(),
            _ => self.parse_identifier_name(),
        }
    }

    fn parse_computed_property_name(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let expression = self.allow_in_and(Self::parse_expression);
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.finish_node(
            SyntaxKind::ComputedPropertyName,
            pos,
            NodeVariant::SingleExpression { expression },
        )
    }

    /// `A.B.C` as nested qualified names.
    pub(crate) fn parse_entity_name(&mut self, allow_reserved_words: bool, message: Option<&DiagnosticMessage>) -> NodeId {
        let pos = self.node_pos();
        let mut entity = if allow_reserved_words {
            self.parse_identifier_name()
        } else {
            match message {
                Some(message) => self.parse_identifier_with_message(message),
                None => self.parse_identifier(),
            }
        };
        while self.parse_optional(SyntaxKind::DotToken) {
            if self.token() == SyntaxKind::LessThanToken {
                // `A.<T>` is a JSDoc-era spelling of a type argument list.
                break;
            }
            let right = self.parse_right_side_of_dot(allow_reserved_words, false);
            entity = self.finish_node(
                SyntaxKind::QualifiedName,
                pos,
                NodeVariant::QualifiedName(QualifiedName { left: entity, right }),
            );
        }
        entity
    }

    /// The name after a `.`. A keyword that starts a declaration on the next
    /// line is left alone, so `x.\ninterface I {}` keeps the interface.
    pub(crate) fn parse_right_side_of_dot(&mut self, allow_identifier_names: bool, allow_private_identifiers: bool) -> NodeId {
        if self.has_preceding_line_break() && token_is_identifier_or_keyword(self.token()) {
            let matches_pattern = self.look_ahead(Self::next_token_is_identifier_or_keyword_on_same_line);
            if matches_pattern {
                return self.create_missing_node(SyntaxKind::Identifier, true, Some(&messages::IDENTIFIER_EXPECTED), &[]);
            }
        }
        if self.token() == SyntaxKind::PrivateIdentifier {
            let node = self.parse_private_identifier();
            if !allow_private_identifiers {
                self.parse_error_at_node(node, &messages::IDENTIFIER_EXPECTED, &[]);
            }
            return node;
        }
        if allow_identifier_names {
            self.parse_identifier_name()
        } else {
            self.parse_identifier()
        }
    }

    // ========================================================================
    // Literals
    // ========================================================================

    /// String, numeric, bigint, regex, and template-part literals.
    pub(crate) fn parse_literal_node(&mut self) -> NodeId {
        let pos = self.node_pos();
        let kind = self.token();
        let text = self.arena.intern(self.token_value());
        let token_flags = self.scanner.token_flags();
        self.next_token();
        self.finish_node(kind, pos, NodeVariant::Literal(Literal { text, token_flags }))
    }

    // ========================================================================
    // Shared lookahead predicates
    // ========================================================================

    pub(crate) fn next_token_is_identifier_or_keyword_on_same_line(&mut self) -> bool {
        self.next_token();
        token_is_identifier_or_keyword(self.token()) && !self.has_preceding_line_break()
    }

    pub(crate) fn next_token_is_identifier_on_same_line(&mut self) -> bool {
        self.next_token();
        !self.has_preceding_line_break() && self.is_identifier()
    }

    pub(crate) fn next_token_is_identifier_or_string_literal_on_same_line(&mut self) -> bool {
        self.next_token();
        !self.has_preceding_line_break() && (self.is_identifier() || self.token() == SyntaxKind::StringLiteral)
    }

    pub(crate) fn next_token_is_open_paren(&mut self) -> bool {
        self.next_token() == SyntaxKind::OpenParenToken
    }

    pub(crate) fn next_token_is_slash(&mut self) -> bool {
        self.next_token() == SyntaxKind::SlashToken
    }

    pub(crate) fn next_token_is_string_literal(&mut self) -> bool {
        self.next_token() == SyntaxKind::StringLiteral
    }

    pub(crate) fn next_token_is_dot(&mut self) -> bool {
        self.next_token() == SyntaxKind::DotToken
    }

    pub(crate) fn next_token_is_open_paren_or_less_than_or_dot(&mut self) -> bool {
        matches!(
            self.next_token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken | SyntaxKind::DotToken
        )
    }

    pub(crate) fn next_token_is_numeric_or_big_int_literal(&mut self) -> bool {
        matches!(self.next_token(), SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral)
    }

    pub(crate) fn next_token_is_identifier_or_keyword(&mut self) -> bool {
        self.next_token();
        token_is_identifier_or_keyword(self.token())
    }

    // ========================================================================
    // Small helpers
    // ========================================================================

    #[inline]
    pub(crate) fn kind_of(&self, id: NodeId) -> SyntaxKind {
        self.arena.kind(id)
    }

    /// Report `message` for a nesting level past [`MAX_RECURSION_DEPTH`] and
    /// step over one token so enclosing loops keep making progress.
    pub(crate) fn parse_too_deep(&mut self, kind: SyntaxKind, message: &DiagnosticMessage) -> NodeId {
        self.parse_error_at_current_token(message, &[]);
        let missing = self.create_missing_node(kind, false, None, &[]);
        if self.token() != SyntaxKind::EndOfFileToken {
            self.next_token();
        }
        missing
    }
}

/// Identifiers, private identifiers, and keywords.
#[inline]
pub(crate) fn token_is_identifier_or_keyword(token: SyntaxKind) -> bool {
    token >= SyntaxKind::Identifier && token <= SyntaxKind::LAST_KEYWORD
}

/// Cooked name of the current identifier-like token.
fn identifier_token_text<'s>(scanner: &'s Scanner<'_>) -> &'s str {
    let value = scanner.token_value();
    if value.is_empty() {
        scanner.token_text()
    } else {
        value
    }
}

/// First non-trivia position at or after `pos`.
pub(crate) fn skip_trivia(text: &str, pos: TextPos) -> TextPos {
    let mut scanner = Scanner::new(text);
    scanner.set_text_range(pos as usize, text.len().saturating_sub(pos as usize));
    scanner.scan();
    scanner.token_start().min(text.len() as TextPos)
}
