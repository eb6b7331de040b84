//! Tree utilities built on [`for_each_child`] and parent links.

use crate::flags::{ModifierFlags, NodeFlags};
use crate::node::{NodeArena, NodeId};
use crate::syntax_kind::SyntaxKind;
use crate::visitor::for_each_child;

/// All descendants of `id` in depth-first, left-to-right order, excluding
/// `id` itself.
pub fn get_descendants(arena: &NodeArena, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        if current != id {
            out.push(current);
        }
        let mut kids = Vec::new();
        for_each_child(arena.get(current), |child| {
            kids.push(child);
            None::<()>
        });
        stack.extend(kids.into_iter().rev());
    }
    out
}

/// Ancestors of `id`, nearest first. Empty until parents have been set.
pub fn get_ancestors(arena: &NodeArena, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut current = arena.get(id).parent();
    while let Some(parent) = current {
        out.push(parent);
        current = arena.get(parent).parent();
    }
    out
}

/// Descendants of `id` with the given kind, in document order.
pub fn of_kind(arena: &NodeArena, id: NodeId, kind: SyntaxKind) -> Vec<NodeId> {
    get_descendants(arena, id)
        .into_iter()
        .filter(|&node| arena.kind(node) == kind)
        .collect()
}

/// Nearest ancestor of `id` with the given kind.
pub fn find_ancestor(arena: &NodeArena, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
    get_ancestors(arena, id)
        .into_iter()
        .find(|&node| arena.kind(node) == kind)
}

/// Link every node under `root` to its parent, including attached JSDoc
/// nodes. Links that are already correct are left alone.
pub fn set_parent_nodes(arena: &NodeArena, root: NodeId) {
    let mut stack = vec![root];
    while let Some(parent) = stack.pop() {
        let node = arena.get(parent);
        let mut link = |child: NodeId| {
            let data = &arena.get(child).data;
            if data.parent.get() != Some(parent) {
                data.parent.set(Some(parent));
            }
            stack.push(child);
        };
        for &doc in node.js_doc() {
            link(doc);
        }
        for_each_child(node, |child| {
            link(child);
            None::<()>
        });
    }
}

/// Whether `id` or any node beneath it recorded a parse error.
///
/// The answer is memoized in the node's flags, so each subtree is
/// aggregated at most once.
pub fn contains_parse_error(arena: &NodeArena, id: NodeId) -> bool {
    aggregate_child_data(arena, id);
    arena
        .get(id)
        .flags()
        .contains(NodeFlags::THIS_NODE_OR_ANY_SUB_NODES_HAS_ERROR)
}

/// Post-order over the unaggregated part of the subtree at `id`: a node's
/// flag is computed once all of its children carry theirs. Iterative, since
/// long operator chains produce trees far deeper than the thread stack.
fn aggregate_child_data(arena: &NodeArena, id: NodeId) {
    let mut stack = vec![(id, false)];
    while let Some((current, children_done)) = stack.pop() {
        let node = arena.get(current);
        let flags = node.flags();
        if flags.contains(NodeFlags::HAS_AGGREGATED_CHILD_DATA) {
            continue;
        }
        if !children_done {
            stack.push((current, true));
            for_each_child(node, |child| {
                stack.push((child, false));
                None::<()>
            });
            continue;
        }
        let has_error = flags.contains(NodeFlags::THIS_NODE_HAS_ERROR)
            || for_each_child(node, |child| {
                arena
                    .get(child)
                    .flags()
                    .contains(NodeFlags::THIS_NODE_OR_ANY_SUB_NODES_HAS_ERROR)
                    .then_some(())
            })
            .is_some();
        let mut flags = flags | NodeFlags::HAS_AGGREGATED_CHILD_DATA;
        if has_error {
            flags |= NodeFlags::THIS_NODE_OR_ANY_SUB_NODES_HAS_ERROR;
        }
        node.data.flags.set(flags);
    }
}

/// Modifier flags declared on `id`, from its modifier list plus any
/// `@deprecated` JSDoc tag.
pub fn get_modifier_flags(arena: &NodeArena, id: NodeId) -> ModifierFlags {
    let node = arena.get(id);
    let mut flags = ModifierFlags::NONE;
    if let Some(modifiers) = node.variant.modifiers() {
        for modifier in modifiers {
            flags |= ModifierFlags::from_modifier_kind(arena.kind(modifier));
        }
    }
    let deprecated = node.js_doc().iter().any(|&doc| {
        get_descendants(arena, doc)
            .into_iter()
            .any(|tag| arena.kind(tag) == SyntaxKind::JSDocDeprecatedTag)
    });
    if deprecated {
        flags |= ModifierFlags::DEPRECATED;
    }
    flags
}

pub fn has_modifier(arena: &NodeArena, id: NodeId, flag: ModifierFlags) -> bool {
    get_modifier_flags(arena, id).intersects(flag)
}

/// Innermost node whose range contains `pos`, starting from `root`.
pub fn find_innermost_node_at(arena: &NodeArena, root: NodeId, pos: u32) -> NodeId {
    let mut current = root;
    loop {
        let next = for_each_child(arena.get(current), |child| {
            let range = arena.get(child).range();
            (range.pos <= pos && pos < range.end).then_some(child)
        });
        match next {
            Some(child) => current = child,
            None => return current,
        }
    }
}
