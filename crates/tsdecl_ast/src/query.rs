//! Declaration-signature queries over a parsed file.
//!
//! These turn interface, class and type-literal members into plain records
//! that code generators can consume without walking the tree themselves.
//! Type annotations are reported as their source text.

use serde::Serialize;

use crate::flags::ModifierFlags;
use crate::node::{NodeId, NodeVariant};
use crate::source_file::SourceFile;
use crate::syntax_kind::SyntaxKind;
use crate::utilities::{get_descendants, get_modifier_flags, of_kind};
use crate::visitor::for_each_in_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Property,
    Method,
    CallSignature,
    ConstructSignature,
    IndexSignature,
    Constructor,
    GetAccessor,
    SetAccessor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterInfo {
    pub name: String,
    pub type_text: Option<String>,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSignature {
    pub kind: MemberKind,
    /// `None` for call, construct and index signatures.
    pub name: Option<String>,
    pub optional: bool,
    pub readonly: bool,
    pub is_static: bool,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<ParameterInfo>,
    /// Property type, or return type of a method or signature.
    pub type_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceInfo {
    pub name: String,
    /// `interface`, `class`, or `type`.
    pub declaration_kind: &'static str,
    pub type_parameters: Vec<String>,
    pub extends: Vec<String>,
    pub members: Vec<MemberSignature>,
    pub deprecated: bool,
    pub documentation: Option<String>,
}

/// Every interface, class, and type-literal alias declared in `file`, in
/// document order, including those nested in namespaces.
pub fn interfaces(file: &SourceFile) -> Vec<InterfaceInfo> {
    get_descendants(&file.arena, file.root)
        .into_iter()
        .filter_map(|id| interface_info(file, id))
        .collect()
}

/// The first declaration named `name`.
pub fn find_interface(file: &SourceFile, name: &str) -> Option<InterfaceInfo> {
    interfaces(file).into_iter().find(|info| info.name == name)
}

/// Describe a single interface, class, or type alias of a type literal.
pub fn interface_info(file: &SourceFile, id: NodeId) -> Option<InterfaceInfo> {
    let node = file.node(id);
    let (declaration_kind, name, members) = match &node.variant {
        NodeVariant::InterfaceDeclaration(decl) => ("interface", decl.name, &decl.members),
        NodeVariant::ClassLike(class) if node.kind() == SyntaxKind::ClassDeclaration => {
            ("class", class.name?, &class.members)
        }
        NodeVariant::TypeAlias(alias) => match &file.node(alias.type_node).variant {
            NodeVariant::TypeLiteral { members } => ("type", alias.name, members),
            _ => return None,
        },
        _ => return None,
    };
    let name = file.identifier_text(name)?.to_string();
    let flags = get_modifier_flags(&file.arena, id);
    Some(InterfaceInfo {
        name,
        declaration_kind,
        type_parameters: type_parameter_names(file, id),
        extends: heritage_names(file, id),
        members: members.iter().filter_map(|member| member_signature(file, member)).collect(),
        deprecated: flags.contains(ModifierFlags::DEPRECATED),
        documentation: documentation(file, id),
    })
}

/// Describe one member of an interface, class, or type literal. Returns
/// `None` for elements that declare nothing (stray semicolons, static
/// blocks).
pub fn member_signature(file: &SourceFile, id: NodeId) -> Option<MemberSignature> {
    let node = file.node(id);
    let kind = match node.kind() {
        SyntaxKind::PropertySignature | SyntaxKind::PropertyDeclaration => MemberKind::Property,
        SyntaxKind::MethodSignature | SyntaxKind::MethodDeclaration => MemberKind::Method,
        SyntaxKind::CallSignature => MemberKind::CallSignature,
        SyntaxKind::ConstructSignature => MemberKind::ConstructSignature,
        SyntaxKind::IndexSignature => MemberKind::IndexSignature,
        SyntaxKind::Constructor => MemberKind::Constructor,
        SyntaxKind::GetAccessor => MemberKind::GetAccessor,
        SyntaxKind::SetAccessor => MemberKind::SetAccessor,
        _ => return None,
    };
    let flags = get_modifier_flags(&file.arena, id);
    let optional = file.arena.is_optional(id);
    let parameters = node
        .variant
        .parameters()
        .map(|params| params.iter().map(|param| parameter_info(file, param)).collect())
        .unwrap_or_default();
    Some(MemberSignature {
        kind,
        name: node.variant.name().map(|name| property_name_text(file, name)),
        optional,
        readonly: flags.contains(ModifierFlags::READONLY),
        is_static: flags.contains(ModifierFlags::STATIC),
        type_parameters: type_parameter_names(file, id),
        parameters,
        type_text: node
            .variant
            .type_annotation()
            .map(|ty| file.text_of(ty).to_string()),
    })
}

fn parameter_info(file: &SourceFile, id: NodeId) -> ParameterInfo {
    match &file.node(id).variant {
        NodeVariant::Parameter(param) => ParameterInfo {
            name: file.text_of(param.name).to_string(),
            type_text: param.type_node.map(|ty| file.text_of(ty).to_string()),
            optional: param.question_token.is_some() || param.initializer.is_some(),
            rest: param.dot_dot_dot_token.is_some(),
        },
        _ => ParameterInfo {
            name: file.text_of(id).to_string(),
            type_text: None,
            optional: false,
            rest: false,
        },
    }
}

/// Text of a property name: identifiers and string or numeric literals by
/// value, anything else (computed names) by source text.
pub fn property_name_text(file: &SourceFile, id: NodeId) -> String {
    match file.identifier_text(id) {
        Some(text) => text.to_string(),
        None => file.text_of(id).to_string(),
    }
}

fn type_parameter_names(file: &SourceFile, id: NodeId) -> Vec<String> {
    file.node(id)
        .variant
        .type_parameters()
        .map(|params| {
            params
                .iter()
                .filter_map(|param| file.node(param).variant.name())
                .filter_map(|name| file.identifier_text(name).map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Names in `extends` (and for classes `implements`) clauses, with type
/// arguments as written.
fn heritage_names(file: &SourceFile, id: NodeId) -> Vec<String> {
    let clauses = match &file.node(id).variant {
        NodeVariant::InterfaceDeclaration(decl) => decl.heritage_clauses.as_ref(),
        NodeVariant::ClassLike(class) => class.heritage_clauses.as_ref(),
        _ => None,
    };
    let Some(clauses) = clauses else {
        return Vec::new();
    };
    clauses
        .iter()
        .flat_map(|clause| match &file.node(clause).variant {
            NodeVariant::HeritageClause(clause) => clause.types.nodes.clone(),
            _ => Vec::new(),
        })
        .map(|ty| file.text_of(ty).to_string())
        .collect()
}

/// Comment text of the last JSDoc block attached to `id`.
pub fn documentation(file: &SourceFile, id: NodeId) -> Option<String> {
    let doc = *file.node(id).js_doc().last()?;
    match &file.node(doc).variant {
        NodeVariant::JsDoc(doc) => doc.comment.clone(),
        _ => None,
    }
}

/// Names of every type referenced under `id`, deduplicated, in order of
/// first appearance.
pub fn type_references(file: &SourceFile, id: NodeId) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for reference in of_kind(&file.arena, id, SyntaxKind::TypeReference) {
        let NodeVariant::TypeReference(ty) = &file.node(reference).variant else {
            continue;
        };
        if let Some(name) = file.arena.entity_name_text(ty.type_name) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Whether any member of the list is named `name`.
pub fn has_member_named(file: &SourceFile, id: NodeId, name: &str) -> bool {
    let Some(members) = file.node(id).variant.members() else {
        return false;
    };
    for_each_in_list(members, |member| {
        let member_name = file.node(member).variant.name()?;
        (property_name_text(file, member_name) == name).then_some(())
    })
    .is_some()
}
