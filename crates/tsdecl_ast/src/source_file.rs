//! The parse result: a node arena, its root, and per-file metadata.

use std::cell::OnceCell;

use tsdecl_core::text::{LineAndCharacter, LineMap, TextPos};
use tsdecl_diagnostics::Diagnostic;

use crate::node::{Node, NodeArena, NodeId, NodeList, NodeVariant};
use crate::script::{LanguageVariant, ScriptKind, ScriptTarget};

/// A parsed source file. Owns every node reachable from `root`.
#[derive(Debug)]
pub struct SourceFile {
    pub arena: NodeArena,
    /// The `SourceFile` node.
    pub root: NodeId,
    pub file_name: String,
    pub text: String,
    pub language_version: ScriptTarget,
    pub language_variant: LanguageVariant,
    pub script_kind: ScriptKind,
    pub is_declaration_file: bool,
    pub parse_diagnostics: Vec<Diagnostic>,
    line_map: OnceCell<LineMap>,
}

impl SourceFile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        arena: NodeArena,
        root: NodeId,
        file_name: String,
        text: String,
        language_version: ScriptTarget,
        script_kind: ScriptKind,
        is_declaration_file: bool,
        parse_diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            arena,
            root,
            file_name,
            text,
            language_version,
            language_variant: script_kind.language_variant(),
            script_kind,
            is_declaration_file,
            parse_diagnostics,
            line_map: OnceCell::new(),
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    pub fn root_node(&self) -> &Node {
        self.arena.get(self.root)
    }

    /// Top-level statements.
    pub fn statements(&self) -> &NodeList {
        match &self.root_node().variant {
            NodeVariant::SourceFile(file) => &file.statements,
            // The parser always allocates a SourceFile payload for the root.
            _ => unreachable!("source file root without a SourceFile payload"),
        }
    }

    pub fn end_of_file_token(&self) -> NodeId {
        match &self.root_node().variant {
            NodeVariant::SourceFile(file) => file.end_of_file_token,
            _ => unreachable!("source file root without a SourceFile payload"),
        }
    }

    /// Source text covered by a node's full range, leading trivia included.
    pub fn full_text_of(&self, id: NodeId) -> &str {
        let range = self.node(id).range();
        self.text.get(range.to_range()).unwrap_or("")
    }

    /// Source text of a node with leading trivia skipped.
    pub fn text_of(&self, id: NodeId) -> &str {
        self.full_text_of(id).trim_start()
    }

    pub fn identifier_text(&self, id: NodeId) -> Option<&str> {
        self.arena.identifier_text(id)
    }

    /// Line-start table, computed on first use.
    pub fn line_map(&self) -> &LineMap {
        self.line_map.get_or_init(|| LineMap::new(&self.text))
    }

    pub fn line_starts(&self) -> &[TextPos] {
        self.line_map().line_starts()
    }

    pub fn line_and_character_of_position(&self, pos: TextPos) -> LineAndCharacter {
        self.line_map().line_and_character_of(&self.text, pos)
    }

    pub fn position_of_line_and_character(&self, line: u32, character: u32) -> TextPos {
        self.line_map().position_of(&self.text, line, character)
    }

    pub fn has_parse_errors(&self) -> bool {
        self.parse_diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }
}
