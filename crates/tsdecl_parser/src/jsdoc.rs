//! JSDoc attachment.
//!
//! `/** ... */` comments in the leading trivia of a node that can carry
//! documentation are parsed into a `JSDoc` node: the free-form comment text
//! plus one tag node per `@tag` line. Types inside tags are not parsed.

use tsdecl_ast::{Identifier, JsDoc, JsDocTag, Node, NodeFlags, NodeId, NodeList, NodeVariant, SyntaxKind};
use tsdecl_core::text::TextPos;
use tsdecl_scanner::get_leading_comment_ranges;

use crate::parser::Parser;

/// One line of a doc comment with the `*` gutter removed.
struct DocLine<'t> {
    /// Byte offset of `text` in the source.
    pos: usize,
    text: &'t str,
}

impl<'a> Parser<'a> {
    pub(crate) fn add_js_doc_comment(&mut self, id: NodeId) {
        let text = self.source_text;
        let pos = self.arena[id].pos();
        let docs: Vec<NodeId> = get_leading_comment_ranges(text, pos as usize)
            .into_iter()
            .filter(|range| range.is_jsdoc(text))
            .map(|range| self.parse_js_doc_comment(range.pos, range.end))
            .collect();
        if !docs.is_empty() {
            self.arena.get_mut(id).data.js_doc = Some(docs);
        }
    }

    fn parse_js_doc_comment(&mut self, start: TextPos, end: TextPos) -> NodeId {
        let lines = doc_lines(self.source_text, start as usize + 3, end as usize - 2);
        let first_tag = lines
            .iter()
            .position(|line| line.text.starts_with('@'))
            .unwrap_or(lines.len());

        let comment = join_comment(lines[..first_tag].iter().map(|line| line.text));

        let mut tags = Vec::new();
        let mut index = first_tag;
        while index < lines.len() {
            let next = lines[index + 1..]
                .iter()
                .position(|line| line.text.starts_with('@'))
                .map_or(lines.len(), |offset| index + 1 + offset);
            tags.push(self.parse_js_doc_tag(&lines[index..next], end));
            index = next;
        }

        let tags_pos = tags
            .first()
            .map_or(end, |&tag| self.arena[tag].pos());
        let tags = NodeList::new(tags, tags_pos, end);
        self.alloc_doc_node(SyntaxKind::JSDoc, start, end, NodeVariant::JsDoc(JsDoc { comment, tags }))
    }

    /// A tag and its continuation lines. `lines[0]` starts with `@`.
    fn parse_js_doc_tag(&mut self, lines: &[DocLine<'_>], comment_end: TextPos) -> NodeId {
        let head = &lines[0];
        let name_len = head.text[1..]
            .find(|ch: char| !is_tag_name_char(ch))
            .unwrap_or(head.text.len() - 1);
        let name = &head.text[1..1 + name_len];
        let name_pos = head.pos + 1;
        let tag_name = self.alloc_doc_identifier(name, name_pos);

        let kind = match name {
            "param" | "arg" | "argument" => SyntaxKind::JSDocParameterTag,
            "returns" | "return" => SyntaxKind::JSDocReturnTag,
            "deprecated" => SyntaxKind::JSDocDeprecatedTag,
            _ => SyntaxKind::JSDocTag,
        };

        let mut rest_pos = name_pos + name_len;
        let mut rest = &head.text[1 + name_len..];
        let mut parameter_name = None;
        if kind == SyntaxKind::JSDocParameterTag {
            let (skipped, remainder) = skip_type_expression(rest);
            rest_pos += skipped;
            rest = remainder;
            let trimmed = rest.trim_start();
            rest_pos += rest.len() - trimmed.len();
            rest = trimmed;
            // `[name]` and `[name=default]` mark optional parameters.
            let bracketed = rest.starts_with('[');
            let name_start = usize::from(bracketed);
            let len = rest[name_start..]
                .find(|ch: char| !is_tag_name_char(ch) && ch != '.')
                .unwrap_or(rest.len() - name_start);
            if len > 0 {
                let name = &rest[name_start..name_start + len];
                parameter_name = Some(self.alloc_doc_identifier(name, rest_pos + name_start));
                let mut consumed = name_start + len;
                if bracketed {
                    consumed += rest[consumed..].find(']').map_or(rest.len() - consumed, |close| close + 1);
                }
                rest = &rest[consumed..];
            }
        }

        let comment = join_comment(std::iter::once(rest).chain(lines[1..].iter().map(|line| line.text)));
        let last = lines.last().unwrap_or(head);
        let end = ((last.pos + last.text.len()) as TextPos).min(comment_end);
        self.alloc_doc_node(
            kind,
            head.pos as TextPos,
            end,
            NodeVariant::JsDocTag(JsDocTag {
                tag_name,
                parameter_name,
                comment,
            }),
        )
    }

    fn alloc_doc_identifier(&mut self, name: &str, pos: usize) -> NodeId {
        let text = self.arena.intern(name);
        self.alloc_doc_node(
            SyntaxKind::Identifier,
            pos as TextPos,
            (pos + name.len()) as TextPos,
            NodeVariant::Identifier(Identifier {
                text,
                original_keyword_kind: None,
            }),
        )
    }

    /// Doc nodes bypass `finish_node`: they take no context flags and must
    /// not consume a pending error mark.
    fn alloc_doc_node(&mut self, kind: SyntaxKind, pos: TextPos, end: TextPos, variant: NodeVariant) -> NodeId {
        let mut node = Node::new(kind, pos, variant);
        node.data.range.end = end;
        node.data.flags.set(NodeFlags::NONE);
        self.arena.alloc(node)
    }
}

/// Split the comment body `start..end` into lines, dropping the leading
/// whitespace and `*` gutter of each line.
fn doc_lines(source: &str, start: usize, end: usize) -> Vec<DocLine<'_>> {
    let body = source.get(start..end).unwrap_or_default();
    let mut lines = Vec::new();
    let mut offset = start;
    for raw in body.split('\n') {
        let line_pos = offset;
        offset += raw.len() + 1;
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = raw.trim_start();
        let mut skipped = raw.len() - trimmed.len();
        let mut text = trimmed;
        if let Some(after_star) = text.strip_prefix('*') {
            skipped += 1;
            text = after_star;
            if let Some(after_space) = text.strip_prefix(' ') {
                skipped += 1;
                text = after_space;
            }
        }
        lines.push(DocLine {
            pos: line_pos + skipped,
            text: text.trim_end(),
        });
    }
    lines
}

/// Join comment lines, dropping blank lines at either end.
fn join_comment<'t>(lines: impl Iterator<Item = &'t str>) -> Option<String> {
    let joined = lines.collect::<Vec<_>>().join("\n");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn is_tag_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Skip whitespace and a balanced `{...}` type expression. Returns the
/// number of bytes skipped and the remainder.
fn skip_type_expression(text: &str) -> (usize, &str) {
    let trimmed = text.trim_start();
    let leading = text.len() - trimmed.len();
    if !trimmed.starts_with('{') {
        return (0, text);
    }
    let mut depth = 0usize;
    for (index, ch) in trimmed.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let consumed = leading + index + 1;
                    return (consumed, &text[consumed..]);
                }
            }
            _ => {}
        }
    }
    (text.len(), "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_lines_strip_gutter() {
        let source = "/**\n * Hello\n *   world\n */";
        let lines = doc_lines(source, 3, source.len() - 2);
        let texts: Vec<_> = lines.iter().map(|line| line.text).collect();
        assert_eq!(texts, vec!["", "Hello", "  world", ""]);
        assert_eq!(&source[lines[1].pos..lines[1].pos + 5], "Hello");
    }

    #[test]
    fn test_join_comment_trims_blank_edges() {
        assert_eq!(join_comment(["", "a", "b", ""].into_iter()), Some("a\nb".to_string()));
        assert_eq!(join_comment(["", "  "].into_iter()), None);
    }

    #[test]
    fn test_skip_type_expression() {
        assert_eq!(skip_type_expression(" {{a: string}} name"), (14, " name"));
        assert_eq!(skip_type_expression(" name"), (0, " name"));
    }
}
