//! JSX elements, fragments, attributes, and children.
//!
//! Inside an element the scanner runs in JSX mode: text between tags is a
//! single `JsxText` token and `</` is one token. The parser switches the
//! scanner back and forth with `scan_jsx_token` and `re_scan_jsx_token`.

use tsdecl_ast::{
    Binary, JsxAttribute, JsxElement, JsxExpression, JsxFragment, JsxNamespacedName, JsxTag, Literal, NodeId,
    NodeList, NodeVariant, PropertyAccess, SyntaxKind,
};
use tsdecl_core::text::TextPos;
use tsdecl_diagnostics::messages;

use crate::context::ParsingContext;
use crate::parser::{skip_trivia, Parser};

impl<'a> Parser<'a> {
    /// An element, self-closing element, or fragment starting at `<`.
    ///
    /// In expression position adjacent elements (`<a/><b/>`) are reported
    /// and joined with a synthesized comma so the tree still covers them.
    pub(crate) fn parse_jsx_element_or_self_closing_element_or_fragment(
        &mut self,
        in_expression_context: bool,
        top_invalid_node_position: Option<TextPos>,
        must_be_unary: bool,
    ) -> NodeId {
        self.parse_jsx_element_worker(in_expression_context, top_invalid_node_position, None, must_be_unary)
    }

    fn parse_jsx_element_worker(
        &mut self,
        in_expression_context: bool,
        top_invalid_node_position: Option<TextPos>,
        opening_tag: Option<NodeId>,
        must_be_unary: bool,
    ) -> NodeId {
        let pos = self.node_pos();
        let opening = self.parse_jsx_opening_or_self_closing_element_or_opening_fragment(in_expression_context);
        let result = match self.kind_of(opening) {
            SyntaxKind::JsxOpeningElement => self.parse_jsx_element_rest(pos, opening, opening_tag, in_expression_context),
            SyntaxKind::JsxOpeningFragment => {
                let children = self.parse_jsx_children(opening);
                let closing_fragment = self.parse_jsx_closing_fragment(in_expression_context);
                self.finish_node(
                    SyntaxKind::JsxFragment,
                    pos,
                    NodeVariant::JsxFragment(JsxFragment {
                        opening_fragment: opening,
                        children,
                        closing_fragment,
                    }),
                )
            }
            _ => opening,
        };

        if !must_be_unary && in_expression_context && self.token() == SyntaxKind::LessThanToken {
            let top_bad_pos = top_invalid_node_position.unwrap_or(self.arena[result].pos());
            let invalid_element = self.try_parse(|parser| {
                Some(parser.parse_jsx_element_worker(true, Some(top_bad_pos), None, false))
            });
            if let Some(invalid_element) = invalid_element {
                let invalid_range = self.arena[invalid_element].range();
                let operator_token = self.create_missing_node(SyntaxKind::CommaToken, false, None, &[]);
                let node = self.arena.get_mut(operator_token);
                node.data.range.pos = invalid_range.pos;
                node.data.range.end = invalid_range.pos;
                let start = skip_trivia(self.source_text, top_bad_pos);
                self.parse_error_at(start, invalid_range.end, &messages::JSX_EXPRESSIONS_MUST_HAVE_ONE_PARENT_ELEMENT, &[]);
                return self.finish_node(
                    SyntaxKind::BinaryExpression,
                    pos,
                    NodeVariant::Binary(Binary {
                        left: result,
                        operator_token,
                        right: invalid_element,
                    }),
                );
            }
        }
        result
    }

    fn parse_jsx_element_rest(
        &mut self,
        pos: TextPos,
        opening: NodeId,
        opening_tag: Option<NodeId>,
        in_expression_context: bool,
    ) -> NodeId {
        let mut children = self.parse_jsx_children(opening);
        let opening_name = self.jsx_tag_name(opening);

        // `<a><b></a>`: the child `b` took our closing tag. Give it a
        // missing one and take the tag back.
        let stolen = children.last().and_then(|last| {
            let (child_opening, child_closing) = self.jsx_element_parts(last)?;
            let child_closing_name = self.jsx_tag_name(child_closing)?;
            let stolen = !self.tag_names_are_equivalent(self.jsx_tag_name(child_opening)?, child_closing_name)
                && opening_name.is_some_and(|name| self.tag_names_are_equivalent(name, child_closing_name));
            stolen.then_some((last, child_opening, child_closing))
        });

        let closing_element = if let Some((last, child_opening, child_closing)) = stolen {
            let (child_children, child_pos) = match &self.arena[last].variant {
                NodeVariant::JsxElement(element) => (element.children.clone(), self.arena[last].pos()),
                _ => (NodeList::default(), self.arena[last].pos()),
            };
            let end = child_children.range.end;
            let missing_name = self.create_missing_node(SyntaxKind::Identifier, false, None, &[]);
            let node = self.arena.get_mut(missing_name);
            node.data.range.pos = end;
            node.data.range.end = end;
            let missing_closing = self.finish_node_at(
                SyntaxKind::JsxClosingElement,
                end,
                end,
                NodeVariant::JsxClosingElement { tag_name: missing_name },
                Default::default(),
            );
            let new_last = self.finish_node_at(
                SyntaxKind::JsxElement,
                child_pos,
                end,
                NodeVariant::JsxElement(JsxElement {
                    opening_element: child_opening,
                    children: child_children,
                    closing_element: missing_closing,
                }),
                Default::default(),
            );
            let mut nodes = children.nodes.clone();
            nodes.pop();
            nodes.push(new_last);
            children = NodeList::new(nodes, children.range.pos, end);
            child_closing
        } else {
            let closing_element = self.parse_jsx_closing_element(opening, in_expression_context);
            if let (Some(opening_name), Some(closing_name)) = (opening_name, self.jsx_tag_name(closing_element)) {
                if !self.tag_names_are_equivalent(opening_name, closing_name) {
                    let outer_matches = opening_tag
                        .filter(|tag| self.kind_of(*tag) == SyntaxKind::JsxOpeningElement)
                        .and_then(|tag| self.jsx_tag_name(tag))
                        .is_some_and(|outer_name| self.tag_names_are_equivalent(closing_name, outer_name));
                    let text = self.node_source_text(opening_name);
                    if outer_matches {
                        self.parse_error_at_node(
                            opening_name,
                            &messages::JSX_ELEMENT_0_HAS_NO_CORRESPONDING_CLOSING_TAG,
                            &[text.as_str()],
                        );
                    } else {
                        self.parse_error_at_node(
                            closing_name,
                            &messages::EXPECTED_CORRESPONDING_JSX_CLOSING_TAG_FOR_0,
                            &[text.as_str()],
                        );
                    }
                }
            }
            closing_element
        };

        self.finish_node(
            SyntaxKind::JsxElement,
            pos,
            NodeVariant::JsxElement(JsxElement {
                opening_element: opening,
                children,
                closing_element,
            }),
        )
    }

    fn parse_jsx_children(&mut self, opening_tag: NodeId) -> NodeList {
        let list_pos = self.node_pos();
        let saved_parsing_context = self.parsing_context;
        self.parsing_context = self.parsing_context.with(ParsingContext::JsxChildren);
        let opening_name = self.jsx_tag_name(opening_tag);
        let mut list = Vec::new();
        loop {
            let token = self.re_scan_jsx_token(true);
            let Some(child) = self.parse_jsx_child(opening_tag, token) else {
                break;
            };
            list.push(child);
            // A child that closed with our tag ends the list.
            if let (Some(opening_name), Some((child_opening, child_closing))) =
                (opening_name, self.jsx_element_parts(child))
            {
                let child_opening_name = self.jsx_tag_name(child_opening);
                let child_closing_name = self.jsx_tag_name(child_closing);
                if let (Some(child_opening_name), Some(child_closing_name)) = (child_opening_name, child_closing_name) {
                    if !self.tag_names_are_equivalent(child_opening_name, child_closing_name)
                        && self.tag_names_are_equivalent(opening_name, child_closing_name)
                    {
                        break;
                    }
                }
            }
        }
        self.parsing_context = saved_parsing_context;
        NodeList::new(list, list_pos, self.node_pos())
    }

    fn parse_jsx_child(&mut self, opening_tag: NodeId, token: SyntaxKind) -> Option<NodeId> {
        match token {
            SyntaxKind::EndOfFileToken => {
                if self.kind_of(opening_tag) == SyntaxKind::JsxOpeningFragment {
                    self.parse_error_at_node(opening_tag, &messages::JSX_FRAGMENT_HAS_NO_CORRESPONDING_CLOSING_TAG, &[]);
                } else if let Some(tag_name) = self.jsx_tag_name(opening_tag) {
                    let range = self.arena[tag_name].range();
                    let start = skip_trivia(self.source_text, range.pos).min(range.end);
                    let text = self.node_source_text(tag_name);
                    self.parse_error_at(
                        start,
                        range.end,
                        &messages::JSX_ELEMENT_0_HAS_NO_CORRESPONDING_CLOSING_TAG,
                        &[text.as_str()],
                    );
                }
                None
            }
            SyntaxKind::JsxText | SyntaxKind::JsxTextAllWhiteSpaces => Some(self.parse_jsx_text()),
            SyntaxKind::OpenBraceToken => self.parse_jsx_expression(false),
            SyntaxKind::LessThanToken => Some(self.parse_jsx_element_worker(false, None, Some(opening_tag), false)),
            _ => None,
        }
    }

    /// Text between tags. Whitespace-only text that spans lines is kept as
    /// a node so positions stay contiguous.
    fn parse_jsx_text(&mut self) -> NodeId {
        let pos = self.node_pos();
        let text = self.arena.intern(self.token_value());
        self.scan_jsx_token(true);
        self.finish_node(
            SyntaxKind::JsxText,
            pos,
            NodeVariant::Literal(Literal {
                text,
                token_flags: Default::default(),
            }),
        )
    }

    fn parse_jsx_opening_or_self_closing_element_or_opening_fragment(&mut self, in_expression_context: bool) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::LessThanToken);
        if self.token() == SyntaxKind::GreaterThanToken {
            self.scan_jsx_token(true);
            return self.finish_node(SyntaxKind::JsxOpeningFragment, pos, NodeVariant::Token);
        }

        let tag_name = self.parse_jsx_element_name();
        let type_arguments = if self.in_context(tsdecl_ast::NodeFlags::JAVASCRIPT_FILE) {
            None
        } else {
            self.try_parse_type_arguments()
        };
        let attributes = self.parse_jsx_attributes();

        let kind = if self.token() == SyntaxKind::GreaterThanToken {
            self.scan_jsx_token(true);
            SyntaxKind::JsxOpeningElement
        } else {
            self.parse_expected(SyntaxKind::SlashToken);
            if self.parse_expected_with(SyntaxKind::GreaterThanToken, None, false) {
                if in_expression_context {
                    self.next_token();
                } else {
                    self.scan_jsx_token(true);
                }
            }
            SyntaxKind::JsxSelfClosingElement
        };
        self.finish_node(
            kind,
            pos,
            NodeVariant::JsxTag(JsxTag {
                tag_name,
                type_arguments,
                attributes,
            }),
        )
    }

    /// `a`, `a.b.c`, `this`, or `ns:name`.
    fn parse_jsx_element_name(&mut self) -> NodeId {
        let pos = self.node_pos();
        let initial = self.parse_jsx_tag_name();
        if self.kind_of(initial) == SyntaxKind::JsxNamespacedName {
            return initial;
        }
        let mut expression = initial;
        while self.parse_optional(SyntaxKind::DotToken) {
            let name = self.parse_right_side_of_dot(true, false);
            expression = self.finish_node(
                SyntaxKind::PropertyAccessExpression,
                pos,
                NodeVariant::PropertyAccess(PropertyAccess {
                    expression,
                    question_dot_token: None,
                    name,
                }),
            );
        }
        expression
    }

    fn parse_jsx_tag_name(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.scan_jsx_identifier();
        if self.token() == SyntaxKind::ThisKeyword {
            return self.parse_token_node();
        }
        let tag_name = self.parse_identifier_name();
        if self.parse_optional(SyntaxKind::ColonToken) {
            self.scan_jsx_identifier();
            let name = self.parse_identifier_name();
            return self.finish_node(
                SyntaxKind::JsxNamespacedName,
                pos,
                NodeVariant::JsxNamespacedName(JsxNamespacedName {
                    namespace: tag_name,
                    name,
                }),
            );
        }
        tag_name
    }

    fn parse_jsx_attributes(&mut self) -> NodeId {
        let pos = self.node_pos();
        let properties = self.parse_list(ParsingContext::JsxAttributes, Self::parse_jsx_attribute);
        self.finish_node(SyntaxKind::JsxAttributes, pos, NodeVariant::JsxAttributes { properties })
    }

    fn parse_jsx_attribute(&mut self) -> NodeId {
        if self.token() == SyntaxKind::OpenBraceToken {
            return self.parse_jsx_spread_attribute();
        }
        let pos = self.node_pos();
        let name = self.parse_jsx_attribute_name();
        let initializer = self.parse_jsx_attribute_value();
        self.finish_node(
            SyntaxKind::JsxAttribute,
            pos,
            NodeVariant::JsxAttribute(JsxAttribute { name, initializer }),
        )
    }

    fn parse_jsx_attribute_name(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.scan_jsx_identifier();
        let name = self.parse_identifier_name();
        if self.parse_optional(SyntaxKind::ColonToken) {
            self.scan_jsx_identifier();
            let local = self.parse_identifier_name();
            return self.finish_node(
                SyntaxKind::JsxNamespacedName,
                pos,
                NodeVariant::JsxNamespacedName(JsxNamespacedName {
                    namespace: name,
                    name: local,
                }),
            );
        }
        name
    }

    fn parse_jsx_attribute_value(&mut self) -> Option<NodeId> {
        if self.token() != SyntaxKind::EqualsToken {
            return None;
        }
        if self.scan_jsx_attribute_value() == SyntaxKind::StringLiteral {
            return Some(self.parse_literal_node());
        }
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_jsx_expression(true),
            SyntaxKind::LessThanToken => Some(self.parse_jsx_element_or_self_closing_element_or_fragment(true, None, false)),
            _ => {
                self.parse_error_at_current_token(&messages::OR_JSX_ELEMENT_EXPECTED, &[]);
                None
            }
        }
    }

    fn parse_jsx_spread_attribute(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        self.parse_expected(SyntaxKind::DotDotDotToken);
        let expression = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.finish_node(
            SyntaxKind::JsxSpreadAttribute,
            pos,
            NodeVariant::SingleExpression { expression },
        )
    }

    /// `{expr}` as a child or attribute value. `{}` is allowed and has no
    /// expression.
    fn parse_jsx_expression(&mut self, in_expression_context: bool) -> Option<NodeId> {
        let pos = self.node_pos();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return None;
        }
        let (dot_dot_dot_token, expression) = if self.token() != SyntaxKind::CloseBraceToken {
            let dot_dot_dot_token = self.parse_optional_token(SyntaxKind::DotDotDotToken);
            (dot_dot_dot_token, Some(self.parse_expression()))
        } else {
            (None, None)
        };
        if in_expression_context {
            self.parse_expected(SyntaxKind::CloseBraceToken);
        } else if self.parse_expected_with(SyntaxKind::CloseBraceToken, None, false) {
            self.scan_jsx_token(true);
        }
        Some(self.finish_node(
            SyntaxKind::JsxExpression,
            pos,
            NodeVariant::JsxExpression(JsxExpression {
                dot_dot_dot_token,
                expression,
            }),
        ))
    }

    fn parse_jsx_closing_element(&mut self, opening: NodeId, in_expression_context: bool) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::LessThanSlashToken);
        let tag_name = self.parse_jsx_element_name();
        if self.parse_expected_with(SyntaxKind::GreaterThanToken, None, false) {
            let matches_opening = self
                .jsx_tag_name(opening)
                .is_some_and(|opening_name| self.tag_names_are_equivalent(opening_name, tag_name));
            if in_expression_context || !matches_opening {
                self.next_token();
            } else {
                self.scan_jsx_token(true);
            }
        }
        self.finish_node(SyntaxKind::JsxClosingElement, pos, NodeVariant::JsxClosingElement { tag_name })
    }

    fn parse_jsx_closing_fragment(&mut self, in_expression_context: bool) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::LessThanSlashToken);
        if self.parse_expected_with(
            SyntaxKind::GreaterThanToken,
            Some(&messages::EXPECTED_CORRESPONDING_CLOSING_TAG_FOR_JSX_FRAGMENT),
            false,
        ) {
            if in_expression_context {
                self.next_token();
            } else {
                self.scan_jsx_token(true);
            }
        }
        self.finish_node(SyntaxKind::JsxClosingFragment, pos, NodeVariant::Token)
    }

    // ========================================================================
    // Tag helpers
    // ========================================================================

    fn jsx_tag_name(&self, id: NodeId) -> Option<NodeId> {
        match &self.arena[id].variant {
            NodeVariant::JsxTag(tag) => Some(tag.tag_name),
            NodeVariant::JsxClosingElement { tag_name } => Some(*tag_name),
            _ => None,
        }
    }

    fn jsx_element_parts(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        match &self.arena[id].variant {
            NodeVariant::JsxElement(element) => Some((element.opening_element, element.closing_element)),
            _ => None,
        }
    }

    fn tag_names_are_equivalent(&self, left: NodeId, right: NodeId) -> bool {
        if self.kind_of(left) != self.kind_of(right) {
            return false;
        }
        match (self.arena.entity_name_text(left), self.arena.entity_name_text(right)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    /// Source text of a node without its leading trivia.
    fn node_source_text(&self, id: NodeId) -> String {
        let range = self.arena[id].range();
        let start = skip_trivia(self.source_text, range.pos).min(range.end) as usize;
        self.source_text
            .get(start..range.end as usize)
            .unwrap_or_default()
            .to_string()
    }
}
