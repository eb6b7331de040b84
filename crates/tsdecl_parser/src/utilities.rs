//! Parser utility functions: keyword spelling suggestions and the
//! node-reuse predicates used by incremental tooling.

use tsdecl_ast::utilities::contains_parse_error;
use tsdecl_ast::{NodeArena, NodeFlags, NodeId, NodeVariant, SyntaxKind, KEYWORDS};

use crate::context::ParsingContext;

/// The keyword `name` was most likely meant to be, for messages such as
/// `Unknown keyword or identifier. Did you mean 'interface'?`.
///
/// Keywords of two letters or fewer are never suggested. When no keyword is
/// close enough, a keyword glued to the following word (`declareconst`) is
/// split back apart.
pub fn get_spelling_suggestion(name: &str) -> Option<String> {
    let candidates = || KEYWORDS.iter().map(|(text, _)| *text).filter(|text| text.len() > 2);
    closest_candidate(name, candidates())
        .map(str::to_string)
        .or_else(|| space_suggestion(name, candidates()))
}

fn closest_candidate<'c>(name: &str, candidates: impl Iterator<Item = &'c str>) -> Option<&'c str> {
    let name_len = name.chars().count();
    let maximum_length_difference = 2.max(name_len * 34 / 100);
    // Anything at or above this distance is too far off to be a typo.
    let mut best_distance = (name_len * 4 / 10 + 1) as f64;
    let mut best = None;
    for candidate in candidates {
        let candidate_len = candidate.chars().count();
        if candidate_len.abs_diff(name_len) > maximum_length_difference {
            continue;
        }
        if candidate.eq_ignore_ascii_case(name) {
            if candidate == name {
                continue;
            }
            return Some(candidate);
        }
        if candidate_len < 3 {
            continue;
        }
        if let Some(distance) = levenshtein_with_max(name, candidate, best_distance - 0.1) {
            best_distance = distance;
            best = Some(candidate);
        }
    }
    best
}

fn space_suggestion<'c>(name: &str, mut candidates: impl Iterator<Item = &'c str>) -> Option<String> {
    candidates
        .find(|keyword| name.len() > keyword.len() + 2 && name.starts_with(keyword))
        .map(|keyword| format!("{keyword} {}", &name[keyword.len()..]))
}

/// Edit distance where a substitution costs two and a case-only mismatch
/// costs a tenth, or `None` once every path exceeds `max`.
fn levenshtein_with_max(left: &str, right: &str, max: f64) -> Option<f64> {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();
    let big = max.floor() + 1.0;
    let mut previous: Vec<f64> = (0..=right.len()).map(|index| index as f64).collect();
    let mut current = vec![0.0; right.len() + 1];

    for row in 1..=left.len() {
        let ch = left[row - 1];
        let min_column = if (row as f64) > max { (row as f64 - max).ceil() as usize } else { 1 };
        let max_column = if (right.len() as f64) > max + row as f64 {
            (max + row as f64).floor() as usize
        } else {
            right.len()
        };
        current[0] = row as f64;
        let mut column_min = row as f64;
        for slot in current.iter_mut().take(min_column).skip(1) {
            *slot = big;
        }
        for column in min_column..=max_column {
            let other = right[column - 1];
            let substitution = if ch.to_ascii_lowercase() == other.to_ascii_lowercase() {
                previous[column - 1] + 0.1
            } else {
                previous[column - 1] + 2.0
            };
            let distance = if ch == other {
                previous[column - 1]
            } else {
                (previous[column] + 1.0).min(current[column - 1] + 1.0).min(substitution)
            };
            current[column] = distance;
            column_min = column_min.min(distance);
        }
        for slot in current.iter_mut().skip(max_column + 1) {
            *slot = big;
        }
        if column_min > max {
            return None;
        }
        std::mem::swap(&mut previous, &mut current);
    }

    let result = previous[right.len()];
    (result <= max).then_some(result)
}

// ============================================================================
// Node reuse
// ============================================================================

/// Whether a node from an earlier parse could stand in for a fresh parse of
/// an element of `context`. The node must be error-free, must have been
/// parsed under the same context flags, and must be of a kind whose parse
/// does not depend on what precedes it.
pub fn can_reuse_node(arena: &NodeArena, id: NodeId, context: ParsingContext, context_flags: NodeFlags) -> bool {
    let node = arena.get(id);
    if contains_parse_error(arena, id) {
        return false;
    }
    if node.flags() & NodeFlags::CONTEXT_FLAGS != context_flags & NodeFlags::CONTEXT_FLAGS {
        return false;
    }
    match context {
        ParsingContext::SourceElements | ParsingContext::BlockStatements | ParsingContext::SwitchClauseStatements => {
            is_reusable_statement(node.kind())
        }
        ParsingContext::SwitchClauses => is_reusable_switch_clause(node.kind()),
        ParsingContext::TypeMembers => is_reusable_type_member(node.kind()),
        ParsingContext::ClassMembers => is_reusable_class_member(arena, id),
        ParsingContext::EnumMembers => node.kind() == SyntaxKind::EnumMember,
        ParsingContext::VariableDeclarations => match &node.variant {
            // `var a = b` could become `var a = b < c` when text follows.
            NodeVariant::VariableDeclaration(declaration) => declaration.initializer.is_none(),
            _ => false,
        },
        ParsingContext::Parameters => match &node.variant {
            NodeVariant::Parameter(parameter) => parameter.initializer.is_none(),
            _ => false,
        },
        _ => false,
    }
}

pub fn is_reusable_statement(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::FunctionDeclaration
            | SyntaxKind::VariableStatement
            | SyntaxKind::Block
            | SyntaxKind::IfStatement
            | SyntaxKind::ExpressionStatement
            | SyntaxKind::ThrowStatement
            | SyntaxKind::ReturnStatement
            | SyntaxKind::SwitchStatement
            | SyntaxKind::BreakStatement
            | SyntaxKind::ContinueStatement
            | SyntaxKind::ForInStatement
            | SyntaxKind::ForOfStatement
            | SyntaxKind::ForStatement
            | SyntaxKind::WhileStatement
            | SyntaxKind::WithStatement
            | SyntaxKind::EmptyStatement
            | SyntaxKind::TryStatement
            | SyntaxKind::LabeledStatement
            | SyntaxKind::DoStatement
            | SyntaxKind::DebuggerStatement
            | SyntaxKind::ImportDeclaration
            | SyntaxKind::ImportEqualsDeclaration
            | SyntaxKind::ExportDeclaration
            | SyntaxKind::ExportAssignment
            | SyntaxKind::ModuleDeclaration
            | SyntaxKind::ClassDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::EnumDeclaration
            | SyntaxKind::TypeAliasDeclaration
    )
}

pub fn is_reusable_switch_clause(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::CaseClause | SyntaxKind::DefaultClause)
}

pub fn is_reusable_type_member(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ConstructSignature
            | SyntaxKind::MethodSignature
            | SyntaxKind::IndexSignature
            | SyntaxKind::PropertySignature
            | SyntaxKind::CallSignature
    )
}

/// Class members, except a method literally named `constructor`, which a
/// fresh parse would turn into a constructor.
pub fn is_reusable_class_member(arena: &NodeArena, id: NodeId) -> bool {
    match arena.kind(id) {
        SyntaxKind::Constructor
        | SyntaxKind::IndexSignature
        | SyntaxKind::GetAccessor
        | SyntaxKind::SetAccessor
        | SyntaxKind::PropertyDeclaration
        | SyntaxKind::SemicolonClassElement => true,
        SyntaxKind::MethodDeclaration => match &arena.get(id).variant {
            NodeVariant::FunctionLike(method) => method
                .name
                .map_or(true, |name| {
                    !(arena.kind(name) == SyntaxKind::Identifier && arena.identifier_text(name) == Some("constructor"))
                }),
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spelling_suggestion_for_typo() {
        assert_eq!(get_spelling_suggestion("interfce").as_deref(), Some("interface"));
        assert_eq!(get_spelling_suggestion("namespce").as_deref(), Some("namespace"));
        assert_eq!(get_spelling_suggestion("Declare").as_deref(), Some("declare"));
    }

    #[test]
    fn test_spelling_suggestion_splits_glued_keyword() {
        assert_eq!(get_spelling_suggestion("declareconst").as_deref(), Some("declare const"));
    }

    #[test]
    fn test_no_suggestion_for_unrelated_word() {
        assert_eq!(get_spelling_suggestion("banana"), None);
        assert_eq!(get_spelling_suggestion("interface"), None);
    }

    #[test]
    fn test_levenshtein_costs() {
        assert_eq!(levenshtein_with_max("abc", "abc", 3.0), Some(0.0));
        assert_eq!(levenshtein_with_max("abc", "abd", 3.0), Some(2.0));
        assert_eq!(levenshtein_with_max("abc", "ab", 3.0), Some(1.0));
        assert_eq!(levenshtein_with_max("abcdef", "uvwxyz", 2.0), None);
    }

    #[test]
    fn test_reusable_kinds() {
        assert!(is_reusable_statement(SyntaxKind::InterfaceDeclaration));
        assert!(!is_reusable_statement(SyntaxKind::Identifier));
        assert!(is_reusable_switch_clause(SyntaxKind::DefaultClause));
        assert!(is_reusable_type_member(SyntaxKind::PropertySignature));
        assert!(!is_reusable_type_member(SyntaxKind::PropertyDeclaration));
    }
}
