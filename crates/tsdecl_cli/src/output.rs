//! Text and JSON renderings of parse results.

use serde::Serialize;
use tsdecl_ast::query::{interfaces, InterfaceInfo};
use tsdecl_ast::visitor::children;
use tsdecl_ast::{NodeId, SourceFile, SyntaxKind};
use tsdecl_diagnostics::Diagnostic;
use tsdecl_scanner::{tokenize, TokenInfo};

/// A diagnostic with its resolved line and column, for `--json`.
#[derive(Debug, Serialize)]
pub struct DiagnosticRecord {
    pub file: String,
    pub start: u32,
    pub length: u32,
    /// Zero-based.
    pub line: u32,
    /// Zero-based, in UTF-16 code units.
    pub character: u32,
    pub code: u32,
    pub category: String,
    pub message: String,
}

impl DiagnosticRecord {
    pub fn new(file: &SourceFile, diagnostic: &Diagnostic) -> Self {
        let position = file.line_and_character_of_position(diagnostic.start());
        Self {
            file: file.file_name.clone(),
            start: diagnostic.start(),
            length: diagnostic.length(),
            line: position.line,
            character: position.character,
            code: diagnostic.code,
            category: diagnostic.category.to_string(),
            message: diagnostic.message_text.clone(),
        }
    }
}

pub fn diagnostic_records(file: &SourceFile) -> Vec<DiagnosticRecord> {
    file.parse_diagnostics
        .iter()
        .map(|diagnostic| DiagnosticRecord::new(file, diagnostic))
        .collect()
}

/// One node of the tree outline. The outline is a flat pre-order list, so
/// neither printing nor serializing it recurses on deep trees.
#[derive(Debug, Serialize)]
pub struct TreeNode {
    pub depth: usize,
    pub kind: SyntaxKind,
    pub pos: u32,
    pub end: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

pub fn tree(file: &SourceFile, root: NodeId) -> Vec<TreeNode> {
    let mut out = Vec::new();
    let mut stack = vec![(root, 0)];
    while let Some((id, depth)) = stack.pop() {
        let node = file.node(id);
        out.push(TreeNode {
            depth,
            kind: node.kind(),
            pos: node.pos(),
            end: node.end(),
            text: file.identifier_text(id).map(str::to_string),
        });
        stack.extend(children(&file.arena, id).into_iter().rev().map(|child| (child, depth + 1)));
    }
    out
}

/// Indented outline, one node per line: `Kind [pos, end) text`.
pub fn render_tree(nodes: &[TreeNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&"  ".repeat(node.depth));
        out.push_str(&format!("{:?} [{}, {})", node.kind, node.pos, node.end));
        if let Some(text) = &node.text {
            out.push_str(&format!(" {text:?}"));
        }
        out.push('\n');
    }
    out
}

pub fn tokens(file: &SourceFile) -> Vec<TokenInfo> {
    tokenize(&file.text, file.language_variant)
}

pub fn render_tokens(tokens: &[TokenInfo]) -> String {
    tokens
        .iter()
        .map(|token| format!("{:?} [{}, {}) {:?}\n", token.kind, token.pos, token.end, token.text))
        .collect()
}

pub fn signatures(file: &SourceFile) -> Vec<InterfaceInfo> {
    interfaces(file)
}

/// `interface Name<T> extends A`, then one indented line per member.
pub fn render_signatures(infos: &[InterfaceInfo]) -> String {
    let mut out = String::new();
    for info in infos {
        out.push_str(&format!("{} {}", info.declaration_kind, info.name));
        if !info.type_parameters.is_empty() {
            out.push_str(&format!("<{}>", info.type_parameters.join(", ")));
        }
        if !info.extends.is_empty() {
            out.push_str(&format!(" extends {}", info.extends.join(", ")));
        }
        if info.deprecated {
            out.push_str(" (deprecated)");
        }
        out.push('\n');
        for member in &info.members {
            let name = member.name.as_deref().unwrap_or("");
            let optional = if member.optional { "?" } else { "" };
            let params: Vec<_> = member
                .parameters
                .iter()
                .map(|param| match &param.type_text {
                    Some(ty) => format!("{}: {ty}", param.name),
                    None => param.name.clone(),
                })
                .collect();
            let ty = member.type_text.as_deref().unwrap_or("any");
            out.push_str(&format!("  {:?} {name}{optional}({}): {ty}\n", member.kind, params.join(", ")));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsdecl_parser::{parse_source_file, ParseOptions};

    fn parse(source: &str) -> SourceFile {
        parse_source_file("out.ts", source, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_render_tree_outline() {
        let file = parse("a;");
        let rendered = render_tree(&tree(&file, file.root));
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "SourceFile [0, 2)",
                "  ExpressionStatement [0, 2)",
                "    Identifier [0, 1) \"a\"",
                "  EndOfFileToken [2, 2)",
            ]
        );
    }

    #[test]
    fn test_tree_of_long_operator_chain() {
        let file = parse(&format!("let x = 1{};", "+1".repeat(100_000)));
        let nodes = tree(&file, file.root);
        assert!(nodes.len() > 300_000);
        assert!(nodes.iter().map(|node| node.depth).max().unwrap() > 100_000);
        let json = serde_json::to_value(&nodes[..3]).unwrap();
        assert_eq!(json[0]["kind"], "SourceFile");
        assert_eq!(json[2]["depth"], 2);
    }

    #[test]
    fn test_diagnostic_record_position() {
        let file = parse("let a = 1;\nlet b = ;");
        let records = diagnostic_records(&file);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line, 1);
        assert_eq!(records[0].character, 8);
        assert_eq!(records[0].code, 1109);
    }

    #[test]
    fn test_render_signatures() {
        let file = parse("interface A<T> extends B { x?: T; f(a: string): void }");
        let rendered = render_signatures(&signatures(&file));
        assert_eq!(rendered, "interface A<T> extends B\n  Property x?(): T\n  Method f(a: string): void\n");
    }

    #[test]
    fn test_tokens_as_json() {
        let file = parse("x");
        let json = serde_json::to_value(tokens(&file)).unwrap();
        assert_eq!(json[0]["kind"], "Identifier");
        assert_eq!(json[1]["kind"], "EndOfFileToken");
    }
}
