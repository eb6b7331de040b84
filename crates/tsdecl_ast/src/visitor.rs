//! Generic child traversal.
//!
//! [`for_each_child`] is the one place that knows the ordered children of
//! every node variant. Everything else that walks the tree (descendant and
//! ancestor enumeration, parent fixup, error aggregation, declaration
//! queries) is built on top of it.

use crate::node::{Node, NodeArena, NodeId, NodeList, NodeVariant};
use crate::syntax_kind::SyntaxKind;

/// Visit the immediate children of `node` in source order, skipping absent
/// children. Stops and returns the first `Some` the callback produces.
pub fn for_each_child<T>(node: &Node, mut visit: impl FnMut(NodeId) -> Option<T>) -> Option<T> {
    macro_rules! node {
        ($id:expr) => {
            if let Some(result) = visit($id) {
                return Some(result);
            }
        };
    }
    macro_rules! opt {
        ($id:expr) => {
            if let Some(id) = $id {
                node!(id);
            }
        };
    }
    macro_rules! list {
        ($list:expr) => {
            for id in $list.iter() {
                node!(id);
            }
        };
    }
    macro_rules! opt_list {
        ($list:expr) => {
            if let Some(list) = &$list {
                list!(list);
            }
        };
    }

    match &node.variant {
        NodeVariant::Token | NodeVariant::Identifier(_) | NodeVariant::Literal(_) => {}
        NodeVariant::QualifiedName(n) => {
            node!(n.left);
            node!(n.right);
        }
        NodeVariant::TypeParameter(n) => {
            opt_list!(n.modifiers);
            node!(n.name);
            opt!(n.constraint);
            opt!(n.default);
        }
        NodeVariant::Parameter(n) => {
            opt_list!(n.modifiers);
            opt!(n.dot_dot_dot_token);
            node!(n.name);
            opt!(n.question_token);
            opt!(n.type_node);
            opt!(n.initializer);
        }
        NodeVariant::PropertyDeclaration(n) => {
            opt_list!(n.modifiers);
            node!(n.name);
            opt!(n.postfix_token);
            opt!(n.type_node);
            opt!(n.initializer);
        }
        NodeVariant::FunctionLike(n) => {
            opt_list!(n.modifiers);
            opt!(n.asterisk_token);
            opt!(n.name);
            opt!(n.question_token);
            opt_list!(n.type_parameters);
            list!(n.parameters);
            opt!(n.type_node);
            opt!(n.equals_greater_than_token);
            opt!(n.body);
        }
        NodeVariant::TypePredicate(n) => {
            opt!(n.asserts_modifier);
            node!(n.parameter_name);
            opt!(n.type_node);
        }
        NodeVariant::TypeReference(n) => {
            node!(n.type_name);
            opt_list!(n.type_arguments);
        }
        NodeVariant::TypeQuery(n) => {
            node!(n.expr_name);
            opt_list!(n.type_arguments);
        }
        NodeVariant::TypeLiteral { members } => list!(members),
        NodeVariant::ArrayType { element_type } => node!(*element_type),
        NodeVariant::TupleType { elements } => list!(elements),
        NodeVariant::WrappedType(n) => node!(n.type_node),
        NodeVariant::UnionOrIntersection { types } => list!(types),
        NodeVariant::ConditionalType(n) => {
            node!(n.check_type);
            node!(n.extends_type);
            node!(n.true_type);
            node!(n.false_type);
        }
        NodeVariant::InferType { type_parameter } => node!(*type_parameter),
        NodeVariant::TypeOperator(n) => node!(n.type_node),
        NodeVariant::IndexedAccessType(n) => {
            node!(n.object_type);
            node!(n.index_type);
        }
        NodeVariant::MappedType(n) => {
            opt!(n.readonly_token);
            node!(n.type_parameter);
            opt!(n.name_type);
            opt!(n.question_token);
            opt!(n.type_node);
            opt_list!(n.members);
        }
        NodeVariant::LiteralType { literal } => node!(*literal),
        NodeVariant::NamedTupleMember(n) => {
            opt!(n.dot_dot_dot_token);
            node!(n.name);
            opt!(n.question_token);
            node!(n.type_node);
        }
        NodeVariant::Template(n) => {
            node!(n.head);
            list!(n.template_spans);
        }
        NodeVariant::TemplateSpan(n) => {
            node!(n.expression);
            node!(n.literal);
        }
        NodeVariant::ImportType(n) => {
            node!(n.argument);
            opt!(n.qualifier);
            opt_list!(n.type_arguments);
        }
        NodeVariant::ExpressionWithTypeArguments(n) => {
            node!(n.expression);
            opt_list!(n.type_arguments);
        }
        NodeVariant::BindingPattern { elements } => list!(elements),
        NodeVariant::BindingElement(n) => {
            opt!(n.dot_dot_dot_token);
            opt!(n.property_name);
            node!(n.name);
            opt!(n.initializer);
        }
        NodeVariant::ArrayLiteral { elements, .. } => list!(elements),
        NodeVariant::ObjectLiteral { properties, .. } => list!(properties),
        NodeVariant::PropertyAccess(n) => {
            node!(n.expression);
            opt!(n.question_dot_token);
            node!(n.name);
        }
        NodeVariant::ElementAccess(n) => {
            node!(n.expression);
            opt!(n.question_dot_token);
            node!(n.argument_expression);
        }
        NodeVariant::Call(n) => {
            node!(n.expression);
            opt!(n.question_dot_token);
            opt_list!(n.type_arguments);
            opt_list!(n.arguments);
        }
        NodeVariant::TaggedTemplate(n) => {
            node!(n.tag);
            opt_list!(n.type_arguments);
            node!(n.template);
        }
        NodeVariant::TypeAssertion(n) => {
            node!(n.type_node);
            node!(n.expression);
        }
        NodeVariant::SingleExpression { expression } => node!(*expression),
        NodeVariant::OptionalExpression { expression } => opt!(*expression),
        NodeVariant::Unary(n) => node!(n.operand),
        NodeVariant::Binary(n) => {
            node!(n.left);
            node!(n.operator_token);
            node!(n.right);
        }
        NodeVariant::Conditional(n) => {
            node!(n.condition);
            node!(n.question_token);
            node!(n.when_true);
            node!(n.colon_token);
            node!(n.when_false);
        }
        NodeVariant::Yield(n) => {
            opt!(n.asterisk_token);
            opt!(n.expression);
        }
        NodeVariant::ClassLike(n) => {
            opt_list!(n.modifiers);
            opt!(n.name);
            opt_list!(n.type_parameters);
            opt_list!(n.heritage_clauses);
            list!(n.members);
        }
        NodeVariant::TypedExpression(n) => {
            node!(n.expression);
            node!(n.type_node);
        }
        NodeVariant::MetaProperty(n) => node!(n.name),
        NodeVariant::Block { statements, .. } => list!(statements),
        NodeVariant::VariableStatement(n) => {
            opt_list!(n.modifiers);
            node!(n.declaration_list);
        }
        NodeVariant::VariableDeclarationList { declarations } => list!(declarations),
        NodeVariant::VariableDeclaration(n) => {
            node!(n.name);
            opt!(n.exclamation_token);
            opt!(n.type_node);
            opt!(n.initializer);
        }
        NodeVariant::If(n) => {
            node!(n.expression);
            node!(n.then_statement);
            opt!(n.else_statement);
        }
        NodeVariant::Loop(n) => {
            if node.kind() == SyntaxKind::DoStatement {
                node!(n.statement);
                node!(n.expression);
            } else {
                node!(n.expression);
                node!(n.statement);
            }
        }
        NodeVariant::For(n) => {
            opt!(n.initializer);
            opt!(n.condition);
            opt!(n.incrementor);
            node!(n.statement);
        }
        NodeVariant::ForInOrOf(n) => {
            opt!(n.await_modifier);
            node!(n.initializer);
            node!(n.expression);
            node!(n.statement);
        }
        NodeVariant::Jump { label } => opt!(*label),
        NodeVariant::Switch(n) => {
            node!(n.expression);
            node!(n.case_block);
        }
        NodeVariant::CaseBlock { clauses } => list!(clauses),
        NodeVariant::Clause(n) => {
            opt!(n.expression);
            list!(n.statements);
        }
        NodeVariant::Labeled(n) => {
            node!(n.label);
            node!(n.statement);
        }
        NodeVariant::Try(n) => {
            node!(n.try_block);
            opt!(n.catch_clause);
            opt!(n.finally_block);
        }
        NodeVariant::CatchClause(n) => {
            opt!(n.variable_declaration);
            node!(n.block);
        }
        NodeVariant::InterfaceDeclaration(n) => {
            opt_list!(n.modifiers);
            node!(n.name);
            opt_list!(n.type_parameters);
            opt_list!(n.heritage_clauses);
            list!(n.members);
        }
        NodeVariant::HeritageClause(n) => list!(n.types),
        NodeVariant::TypeAlias(n) => {
            opt_list!(n.modifiers);
            node!(n.name);
            opt_list!(n.type_parameters);
            node!(n.type_node);
        }
        NodeVariant::Enum(n) => {
            opt_list!(n.modifiers);
            node!(n.name);
            list!(n.members);
        }
        NodeVariant::EnumMember(n) => {
            node!(n.name);
            opt!(n.initializer);
        }
        NodeVariant::Module(n) => {
            opt_list!(n.modifiers);
            node!(n.name);
            opt!(n.body);
        }
        NodeVariant::NamespaceExportDeclaration { modifiers, name } => {
            opt_list!(*modifiers);
            node!(*name);
        }
        NodeVariant::ImportEquals(n) => {
            opt_list!(n.modifiers);
            node!(n.name);
            node!(n.module_reference);
        }
        NodeVariant::Import(n) => {
            opt_list!(n.modifiers);
            opt!(n.import_clause);
            node!(n.module_specifier);
        }
        NodeVariant::ImportClause(n) => {
            opt!(n.name);
            opt!(n.named_bindings);
        }
        NodeVariant::NamespaceBinding { name } => node!(*name),
        NodeVariant::NamedBindings { elements } => list!(elements),
        NodeVariant::Specifier(n) => {
            opt!(n.property_name);
            node!(n.name);
        }
        NodeVariant::ExportAssignment(n) => {
            opt_list!(n.modifiers);
            node!(n.expression);
        }
        NodeVariant::ExportDeclaration(n) => {
            opt_list!(n.modifiers);
            opt!(n.export_clause);
            opt!(n.module_specifier);
        }
        NodeVariant::MissingDeclaration { modifiers } => opt_list!(*modifiers),
        NodeVariant::PropertyAssignment(n) => {
            node!(n.name);
            opt!(n.question_token);
            node!(n.initializer);
        }
        NodeVariant::ShorthandPropertyAssignment(n) => {
            node!(n.name);
            opt!(n.equals_token);
            opt!(n.object_assignment_initializer);
        }
        NodeVariant::JsxElement(n) => {
            node!(n.opening_element);
            list!(n.children);
            node!(n.closing_element);
        }
        NodeVariant::JsxTag(n) => {
            node!(n.tag_name);
            opt_list!(n.type_arguments);
            node!(n.attributes);
        }
        NodeVariant::JsxClosingElement { tag_name } => node!(*tag_name),
        NodeVariant::JsxFragment(n) => {
            node!(n.opening_fragment);
            list!(n.children);
            node!(n.closing_fragment);
        }
        NodeVariant::JsxAttribute(n) => {
            node!(n.name);
            opt!(n.initializer);
        }
        NodeVariant::JsxAttributes { properties } => list!(properties),
        NodeVariant::JsxExpression(n) => {
            opt!(n.dot_dot_dot_token);
            opt!(n.expression);
        }
        NodeVariant::JsxNamespacedName(n) => {
            node!(n.namespace);
            node!(n.name);
        }
        NodeVariant::SourceFile(n) => {
            list!(n.statements);
            node!(n.end_of_file_token);
        }
        NodeVariant::JsDoc(n) => list!(n.tags),
        NodeVariant::JsDocTag(n) => {
            node!(n.tag_name);
            opt!(n.parameter_name);
        }
    }
    None
}

/// Collect the immediate children of `id`.
pub fn children(arena: &NodeArena, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    for_each_child(arena.get(id), |child| {
        out.push(child);
        None::<()>
    });
    out
}

/// Visit each element of a list until the callback returns `Some`.
pub fn for_each_in_list<T>(list: &NodeList, mut visit: impl FnMut(NodeId) -> Option<T>) -> Option<T> {
    list.iter().find_map(|id| visit(id))
}
