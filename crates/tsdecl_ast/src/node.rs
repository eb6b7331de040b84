//! AST node definitions.
//!
//! Nodes live in a [`NodeArena`] and refer to each other through [`NodeId`]
//! handles. A node is a [`NodeData`] header (kind, range, flags, parent, and
//! attached JSDoc) plus a [`NodeVariant`] payload. Kinds with the same child
//! shape share a payload struct; the walker consults `kind` where the order
//! of children differs.

use std::cell::Cell;
use std::ops::Index;

use tsdecl_core::intern::{InternedString, StringInterner};
use tsdecl_core::text::{TextPos, TextRange};

use crate::flags::{NodeFlags, TokenFlags};
use crate::syntax_kind::SyntaxKind;

// ============================================================================
// Handles and lists
// ============================================================================

/// Index of a node in its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A list-valued child with its own range.
///
/// An empty list is stamped with the position where the list was expected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeList {
    pub range: TextRange,
    pub nodes: Vec<NodeId>,
    pub has_trailing_comma: bool,
}

impl NodeList {
    pub fn new(nodes: Vec<NodeId>, pos: TextPos, end: TextPos) -> Self {
        Self {
            range: TextRange::new(pos, end),
            nodes,
            has_trailing_comma: false,
        }
    }

    pub fn empty(pos: TextPos) -> Self {
        Self::new(Vec::new(), pos, pos)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

// ============================================================================
// Core node wrapper
// ============================================================================

/// Common data shared by all AST nodes.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: SyntaxKind,
    /// Full range, including leading trivia.
    pub range: TextRange,
    /// Context and error flags. Interior mutability lets the aggregation
    /// pass memoize on a shared tree.
    pub flags: Cell<NodeFlags>,
    /// Set by the parent fixup pass; `None` until then and on the root.
    pub parent: Cell<Option<NodeId>>,
    /// Documentation comments attached to this node.
    pub js_doc: Option<Vec<NodeId>>,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: TextPos, end: TextPos, flags: NodeFlags) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            flags: Cell::new(flags),
            parent: Cell::new(None),
            js_doc: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub variant: NodeVariant,
}

impl Node {
    pub fn new(kind: SyntaxKind, pos: TextPos, variant: NodeVariant) -> Self {
        Self {
            data: NodeData::new(kind, pos, pos, NodeFlags::NONE),
            variant,
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    #[inline]
    pub fn pos(&self) -> TextPos {
        self.data.range.pos
    }

    #[inline]
    pub fn end(&self) -> TextPos {
        self.data.range.end
    }

    #[inline]
    pub fn range(&self) -> TextRange {
        self.data.range
    }

    #[inline]
    pub fn flags(&self) -> NodeFlags {
        self.data.flags.get()
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.data.parent.get()
    }

    /// A node synthesized by error recovery in place of an absent construct.
    #[inline]
    pub fn is_missing(&self) -> bool {
        self.data.range.is_empty() && self.data.kind != SyntaxKind::EndOfFileToken
    }

    pub fn js_doc(&self) -> &[NodeId] {
        self.data.js_doc.as_deref().unwrap_or(&[])
    }
}

// ============================================================================
// Variant payloads
// ============================================================================

#[derive(Debug, Clone)]
pub struct Identifier {
    pub text: InternedString,
    /// Keyword this identifier spells, when a keyword was accepted as a name.
    pub original_keyword_kind: Option<SyntaxKind>,
}

#[derive(Debug, Clone)]
pub struct Literal {
    /// Cooked value: unescaped string contents, normalized numeric text.
    pub text: InternedString,
    pub token_flags: TokenFlags,
}

#[derive(Debug, Clone)]
pub struct QualifiedName {
    pub left: NodeId,
    pub right: NodeId,
}

#[derive(Debug, Clone)]
pub struct TypeParameter {
    pub modifiers: Option<NodeList>,
    pub name: NodeId,
    pub constraint: Option<NodeId>,
    pub default: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub modifiers: Option<NodeList>,
    pub dot_dot_dot_token: Option<NodeId>,
    pub name: NodeId,
    pub question_token: Option<NodeId>,
    pub type_node: Option<NodeId>,
    pub initializer: Option<NodeId>,
}

/// Property signatures and property declarations.
#[derive(Debug, Clone)]
pub struct PropertyDeclaration {
    pub modifiers: Option<NodeList>,
    pub name: NodeId,
    /// `?` or `!` after the name.
    pub postfix_token: Option<NodeId>,
    pub type_node: Option<NodeId>,
    pub initializer: Option<NodeId>,
}

/// Every signature-bearing kind: methods, accessors, constructors, call,
/// construct and index signatures, function declarations and expressions,
/// arrows, function and constructor types, and class static blocks.
#[derive(Debug, Clone, Default)]
pub struct FunctionLike {
    pub modifiers: Option<NodeList>,
    pub asterisk_token: Option<NodeId>,
    pub name: Option<NodeId>,
    pub question_token: Option<NodeId>,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_node: Option<NodeId>,
    pub equals_greater_than_token: Option<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct TypePredicate {
    pub asserts_modifier: Option<NodeId>,
    pub parameter_name: NodeId,
    pub type_node: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct TypeReference {
    pub type_name: NodeId,
    pub type_arguments: Option<NodeList>,
}

#[derive(Debug, Clone)]
pub struct TypeQuery {
    pub expr_name: NodeId,
    pub type_arguments: Option<NodeList>,
}

/// Optional, rest, and parenthesized types.
#[derive(Debug, Clone)]
pub struct WrappedType {
    pub type_node: NodeId,
}

#[derive(Debug, Clone)]
pub struct ConditionalType {
    pub check_type: NodeId,
    pub extends_type: NodeId,
    pub true_type: NodeId,
    pub false_type: NodeId,
}

#[derive(Debug, Clone)]
pub struct TypeOperator {
    pub operator: SyntaxKind,
    pub type_node: NodeId,
}

#[derive(Debug, Clone)]
pub struct IndexedAccessType {
    pub object_type: NodeId,
    pub index_type: NodeId,
}

#[derive(Debug, Clone)]
pub struct MappedType {
    pub readonly_token: Option<NodeId>,
    pub type_parameter: NodeId,
    pub name_type: Option<NodeId>,
    pub question_token: Option<NodeId>,
    pub type_node: Option<NodeId>,
    pub members: Option<NodeList>,
}

#[derive(Debug, Clone)]
pub struct NamedTupleMember {
    pub dot_dot_dot_token: Option<NodeId>,
    pub name: NodeId,
    pub question_token: Option<NodeId>,
    pub type_node: NodeId,
}

/// Template expressions and template literal types.
#[derive(Debug, Clone)]
pub struct Template {
    pub head: NodeId,
    pub template_spans: NodeList,
}

/// A `${...}` span followed by its literal part. In template literal types
/// the expression slot holds a type.
#[derive(Debug, Clone)]
pub struct TemplateSpan {
    pub expression: NodeId,
    pub literal: NodeId,
}

#[derive(Debug, Clone)]
pub struct ImportType {
    pub is_type_of: bool,
    pub argument: NodeId,
    pub qualifier: Option<NodeId>,
    pub type_arguments: Option<NodeList>,
}

#[derive(Debug, Clone)]
pub struct ExpressionWithTypeArguments {
    pub expression: NodeId,
    pub type_arguments: Option<NodeList>,
}

#[derive(Debug, Clone)]
pub struct BindingElement {
    pub dot_dot_dot_token: Option<NodeId>,
    pub property_name: Option<NodeId>,
    pub name: NodeId,
    pub initializer: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct PropertyAccess {
    pub expression: NodeId,
    pub question_dot_token: Option<NodeId>,
    pub name: NodeId,
}

#[derive(Debug, Clone)]
pub struct ElementAccess {
    pub expression: NodeId,
    pub question_dot_token: Option<NodeId>,
    pub argument_expression: NodeId,
}

/// Call and `new` expressions. `new X` without parentheses has no arguments.
#[derive(Debug, Clone)]
pub struct Call {
    pub expression: NodeId,
    pub question_dot_token: Option<NodeId>,
    pub type_arguments: Option<NodeList>,
    pub arguments: Option<NodeList>,
}

#[derive(Debug, Clone)]
pub struct TaggedTemplate {
    pub tag: NodeId,
    pub type_arguments: Option<NodeList>,
    pub template: NodeId,
}

#[derive(Debug, Clone)]
pub struct TypeAssertion {
    pub type_node: NodeId,
    pub expression: NodeId,
}

#[derive(Debug, Clone)]
pub struct Unary {
    pub operator: SyntaxKind,
    pub operand: NodeId,
}

#[derive(Debug, Clone)]
pub struct Binary {
    pub left: NodeId,
    pub operator_token: NodeId,
    pub right: NodeId,
}

#[derive(Debug, Clone)]
pub struct Conditional {
    pub condition: NodeId,
    pub question_token: NodeId,
    pub when_true: NodeId,
    pub colon_token: NodeId,
    pub when_false: NodeId,
}

#[derive(Debug, Clone)]
pub struct Yield {
    pub asterisk_token: Option<NodeId>,
    pub expression: Option<NodeId>,
}

/// Class declarations and class expressions.
#[derive(Debug, Clone)]
pub struct ClassLike {
    pub modifiers: Option<NodeList>,
    pub name: Option<NodeId>,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
}

/// `as` and `satisfies` expressions.
#[derive(Debug, Clone)]
pub struct TypedExpression {
    pub expression: NodeId,
    pub type_node: NodeId,
}

#[derive(Debug, Clone)]
pub struct MetaProperty {
    pub keyword_token: SyntaxKind,
    pub name: NodeId,
}

#[derive(Debug, Clone)]
pub struct VariableStatement {
    pub modifiers: Option<NodeList>,
    pub declaration_list: NodeId,
}

#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub name: NodeId,
    pub exclamation_token: Option<NodeId>,
    pub type_node: Option<NodeId>,
    pub initializer: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct If {
    pub expression: NodeId,
    pub then_statement: NodeId,
    pub else_statement: Option<NodeId>,
}

/// `do`, `while`, and `with` statements.
#[derive(Debug, Clone)]
pub struct Loop {
    pub expression: NodeId,
    pub statement: NodeId,
}

#[derive(Debug, Clone)]
pub struct For {
    pub initializer: Option<NodeId>,
    pub condition: Option<NodeId>,
    pub incrementor: Option<NodeId>,
    pub statement: NodeId,
}

#[derive(Debug, Clone)]
pub struct ForInOrOf {
    pub await_modifier: Option<NodeId>,
    pub initializer: NodeId,
    pub expression: NodeId,
    pub statement: NodeId,
}

#[derive(Debug, Clone)]
pub struct Switch {
    pub expression: NodeId,
    pub case_block: NodeId,
}

/// `case` and `default` clauses. Only `case` has an expression.
#[derive(Debug, Clone)]
pub struct Clause {
    pub expression: Option<NodeId>,
    pub statements: NodeList,
}

#[derive(Debug, Clone)]
pub struct Labeled {
    pub label: NodeId,
    pub statement: NodeId,
}

#[derive(Debug, Clone)]
pub struct Try {
    pub try_block: NodeId,
    pub catch_clause: Option<NodeId>,
    pub finally_block: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub variable_declaration: Option<NodeId>,
    pub block: NodeId,
}

#[derive(Debug, Clone)]
pub struct InterfaceDeclaration {
    pub modifiers: Option<NodeList>,
    pub name: NodeId,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
}

#[derive(Debug, Clone)]
pub struct HeritageClause {
    /// `extends` or `implements`.
    pub token: SyntaxKind,
    pub types: NodeList,
}

#[derive(Debug, Clone)]
pub struct TypeAlias {
    pub modifiers: Option<NodeList>,
    pub name: NodeId,
    pub type_parameters: Option<NodeList>,
    pub type_node: NodeId,
}

#[derive(Debug, Clone)]
pub struct Enum {
    pub modifiers: Option<NodeList>,
    pub name: NodeId,
    pub members: NodeList,
}

#[derive(Debug, Clone)]
pub struct EnumMember {
    pub name: NodeId,
    pub initializer: Option<NodeId>,
}

/// `module`/`namespace`/`global` declarations. Dotted names nest: the body
/// of `A` in `namespace A.B {}` is another module declaration.
#[derive(Debug, Clone)]
pub struct Module {
    pub modifiers: Option<NodeList>,
    pub name: NodeId,
    pub body: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ImportEquals {
    pub modifiers: Option<NodeList>,
    pub is_type_only: bool,
    pub name: NodeId,
    pub module_reference: NodeId,
}

#[derive(Debug, Clone)]
pub struct Import {
    pub modifiers: Option<NodeList>,
    pub import_clause: Option<NodeId>,
    pub module_specifier: NodeId,
}

#[derive(Debug, Clone)]
pub struct ImportClause {
    pub is_type_only: bool,
    pub name: Option<NodeId>,
    pub named_bindings: Option<NodeId>,
}

/// Import and export specifiers.
#[derive(Debug, Clone)]
pub struct Specifier {
    pub is_type_only: bool,
    pub property_name: Option<NodeId>,
    pub name: NodeId,
}

#[derive(Debug, Clone)]
pub struct ExportAssignment {
    pub modifiers: Option<NodeList>,
    pub is_export_equals: bool,
    pub expression: NodeId,
}

#[derive(Debug, Clone)]
pub struct ExportDeclaration {
    pub modifiers: Option<NodeList>,
    pub is_type_only: bool,
    pub export_clause: Option<NodeId>,
    pub module_specifier: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct PropertyAssignment {
    pub name: NodeId,
    pub question_token: Option<NodeId>,
    pub initializer: NodeId,
}

#[derive(Debug, Clone)]
pub struct ShorthandPropertyAssignment {
    pub name: NodeId,
    pub equals_token: Option<NodeId>,
    pub object_assignment_initializer: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct JsxElement {
    pub opening_element: NodeId,
    pub children: NodeList,
    pub closing_element: NodeId,
}

/// Opening and self-closing elements.
#[derive(Debug, Clone)]
pub struct JsxTag {
    pub tag_name: NodeId,
    pub type_arguments: Option<NodeList>,
    pub attributes: NodeId,
}

#[derive(Debug, Clone)]
pub struct JsxFragment {
    pub opening_fragment: NodeId,
    pub children: NodeList,
    pub closing_fragment: NodeId,
}

#[derive(Debug, Clone)]
pub struct JsxAttribute {
    pub name: NodeId,
    pub initializer: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct JsxExpression {
    pub dot_dot_dot_token: Option<NodeId>,
    pub expression: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct JsxNamespacedName {
    pub namespace: NodeId,
    pub name: NodeId,
}

#[derive(Debug, Clone)]
pub struct SourceFileNode {
    pub statements: NodeList,
    pub end_of_file_token: NodeId,
}

#[derive(Debug, Clone)]
pub struct JsDoc {
    pub comment: Option<String>,
    pub tags: NodeList,
}

#[derive(Debug, Clone)]
pub struct JsDocTag {
    pub tag_name: NodeId,
    /// The documented parameter of an `@param` tag.
    pub parameter_name: Option<NodeId>,
    pub comment: Option<String>,
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone)]
pub enum NodeVariant {
    /// Punctuation, modifiers, keyword types, and childless nodes such as
    /// `EmptyStatement`, `OmittedExpression`, or `ThisType`.
    Token,
    /// Identifiers and private identifiers.
    Identifier(Identifier),
    /// Numeric, bigint, string, regex, template-part and JSX text literals.
    Literal(Literal),
    QualifiedName(QualifiedName),
    TypeParameter(TypeParameter),
    Parameter(Parameter),
    PropertyDeclaration(PropertyDeclaration),
    FunctionLike(FunctionLike),
    TypePredicate(TypePredicate),
    TypeReference(TypeReference),
    TypeQuery(TypeQuery),
    /// Type literal members.
    TypeLiteral { members: NodeList },
    ArrayType { element_type: NodeId },
    TupleType { elements: NodeList },
    WrappedType(WrappedType),
    /// Union and intersection constituents.
    UnionOrIntersection { types: NodeList },
    ConditionalType(ConditionalType),
    InferType { type_parameter: NodeId },
    TypeOperator(TypeOperator),
    IndexedAccessType(IndexedAccessType),
    MappedType(MappedType),
    LiteralType { literal: NodeId },
    NamedTupleMember(NamedTupleMember),
    Template(Template),
    TemplateSpan(TemplateSpan),
    ImportType(ImportType),
    ExpressionWithTypeArguments(ExpressionWithTypeArguments),
    /// Object and array binding patterns.
    BindingPattern { elements: NodeList },
    BindingElement(BindingElement),
    ArrayLiteral { elements: NodeList, multi_line: bool },
    ObjectLiteral { properties: NodeList, multi_line: bool },
    PropertyAccess(PropertyAccess),
    ElementAccess(ElementAccess),
    Call(Call),
    TaggedTemplate(TaggedTemplate),
    TypeAssertion(TypeAssertion),
    /// Kinds wrapping exactly one expression: parenthesized, `delete`,
    /// `typeof`, `void`, `await`, non-null, spread, decorators, computed
    /// property names, expression statements, `throw`, and external module
    /// references.
    SingleExpression { expression: NodeId },
    /// `return` statements.
    OptionalExpression { expression: Option<NodeId> },
    Unary(Unary),
    Binary(Binary),
    Conditional(Conditional),
    Yield(Yield),
    ClassLike(ClassLike),
    TypedExpression(TypedExpression),
    MetaProperty(MetaProperty),
    /// Blocks and module blocks.
    Block { statements: NodeList, multi_line: bool },
    VariableStatement(VariableStatement),
    VariableDeclarationList { declarations: NodeList },
    VariableDeclaration(VariableDeclaration),
    If(If),
    Loop(Loop),
    For(For),
    ForInOrOf(ForInOrOf),
    /// `break` and `continue`.
    Jump { label: Option<NodeId> },
    Switch(Switch),
    CaseBlock { clauses: NodeList },
    Clause(Clause),
    Labeled(Labeled),
    Try(Try),
    CatchClause(CatchClause),
    InterfaceDeclaration(InterfaceDeclaration),
    HeritageClause(HeritageClause),
    TypeAlias(TypeAlias),
    Enum(Enum),
    EnumMember(EnumMember),
    Module(Module),
    /// `export as namespace X;`
    NamespaceExportDeclaration { modifiers: Option<NodeList>, name: NodeId },
    ImportEquals(ImportEquals),
    Import(Import),
    ImportClause(ImportClause),
    /// `* as X` in imports and exports.
    NamespaceBinding { name: NodeId },
    /// Named import and export lists.
    NamedBindings { elements: NodeList },
    Specifier(Specifier),
    ExportAssignment(ExportAssignment),
    ExportDeclaration(ExportDeclaration),
    MissingDeclaration { modifiers: Option<NodeList> },
    PropertyAssignment(PropertyAssignment),
    ShorthandPropertyAssignment(ShorthandPropertyAssignment),
    JsxElement(JsxElement),
    JsxTag(JsxTag),
    JsxClosingElement { tag_name: NodeId },
    JsxFragment(JsxFragment),
    JsxAttribute(JsxAttribute),
    JsxAttributes { properties: NodeList },
    JsxExpression(JsxExpression),
    JsxNamespacedName(JsxNamespacedName),
    SourceFile(SourceFileNode),
    JsDoc(JsDoc),
    JsDocTag(JsDocTag),
}

// ============================================================================
// Capability accessors
// ============================================================================

impl NodeVariant {
    /// The declared name, for kinds that have one.
    pub fn name(&self) -> Option<NodeId> {
        match self {
            NodeVariant::TypeParameter(n) => Some(n.name),
            NodeVariant::Parameter(n) => Some(n.name),
            NodeVariant::PropertyDeclaration(n) => Some(n.name),
            NodeVariant::FunctionLike(n) => n.name,
            NodeVariant::NamedTupleMember(n) => Some(n.name),
            NodeVariant::BindingElement(n) => Some(n.name),
            NodeVariant::PropertyAccess(n) => Some(n.name),
            NodeVariant::ClassLike(n) => n.name,
            NodeVariant::VariableDeclaration(n) => Some(n.name),
            NodeVariant::InterfaceDeclaration(n) => Some(n.name),
            NodeVariant::TypeAlias(n) => Some(n.name),
            NodeVariant::Enum(n) => Some(n.name),
            NodeVariant::EnumMember(n) => Some(n.name),
            NodeVariant::Module(n) => Some(n.name),
            NodeVariant::NamespaceExportDeclaration { name, .. } => Some(*name),
            NodeVariant::ImportEquals(n) => Some(n.name),
            NodeVariant::ImportClause(n) => n.name,
            NodeVariant::NamespaceBinding { name } => Some(*name),
            NodeVariant::Specifier(n) => Some(n.name),
            NodeVariant::PropertyAssignment(n) => Some(n.name),
            NodeVariant::ShorthandPropertyAssignment(n) => Some(n.name),
            NodeVariant::JsxAttribute(n) => Some(n.name),
            NodeVariant::MetaProperty(n) => Some(n.name),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Option<&NodeList> {
        match self {
            NodeVariant::TypeParameter(n) => n.modifiers.as_ref(),
            NodeVariant::Parameter(n) => n.modifiers.as_ref(),
            NodeVariant::PropertyDeclaration(n) => n.modifiers.as_ref(),
            NodeVariant::FunctionLike(n) => n.modifiers.as_ref(),
            NodeVariant::ClassLike(n) => n.modifiers.as_ref(),
            NodeVariant::VariableStatement(n) => n.modifiers.as_ref(),
            NodeVariant::InterfaceDeclaration(n) => n.modifiers.as_ref(),
            NodeVariant::TypeAlias(n) => n.modifiers.as_ref(),
            NodeVariant::Enum(n) => n.modifiers.as_ref(),
            NodeVariant::Module(n) => n.modifiers.as_ref(),
            NodeVariant::NamespaceExportDeclaration { modifiers, .. } => modifiers.as_ref(),
            NodeVariant::ImportEquals(n) => n.modifiers.as_ref(),
            NodeVariant::Import(n) => n.modifiers.as_ref(),
            NodeVariant::ExportAssignment(n) => n.modifiers.as_ref(),
            NodeVariant::ExportDeclaration(n) => n.modifiers.as_ref(),
            NodeVariant::MissingDeclaration { modifiers } => modifiers.as_ref(),
            _ => None,
        }
    }

    pub fn type_parameters(&self) -> Option<&NodeList> {
        match self {
            NodeVariant::FunctionLike(n) => n.type_parameters.as_ref(),
            NodeVariant::ClassLike(n) => n.type_parameters.as_ref(),
            NodeVariant::InterfaceDeclaration(n) => n.type_parameters.as_ref(),
            NodeVariant::TypeAlias(n) => n.type_parameters.as_ref(),
            _ => None,
        }
    }

    pub fn parameters(&self) -> Option<&NodeList> {
        match self {
            NodeVariant::FunctionLike(n) => Some(&n.parameters),
            _ => None,
        }
    }

    /// The type annotation: declared type of a variable, parameter or
    /// property, or the return type of a signature.
    pub fn type_annotation(&self) -> Option<NodeId> {
        match self {
            NodeVariant::Parameter(n) => n.type_node,
            NodeVariant::PropertyDeclaration(n) => n.type_node,
            NodeVariant::FunctionLike(n) => n.type_node,
            NodeVariant::VariableDeclaration(n) => n.type_node,
            NodeVariant::NamedTupleMember(n) => Some(n.type_node),
            NodeVariant::TypeAlias(n) => Some(n.type_node),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<NodeId> {
        match self {
            NodeVariant::FunctionLike(n) => n.body,
            NodeVariant::Module(n) => n.body,
            _ => None,
        }
    }

    pub fn initializer(&self) -> Option<NodeId> {
        match self {
            NodeVariant::Parameter(n) => n.initializer,
            NodeVariant::PropertyDeclaration(n) => n.initializer,
            NodeVariant::BindingElement(n) => n.initializer,
            NodeVariant::VariableDeclaration(n) => n.initializer,
            NodeVariant::EnumMember(n) => n.initializer,
            NodeVariant::PropertyAssignment(n) => Some(n.initializer),
            _ => None,
        }
    }

    /// Members of interfaces, classes, type literals and enums.
    pub fn members(&self) -> Option<&NodeList> {
        match self {
            NodeVariant::InterfaceDeclaration(n) => Some(&n.members),
            NodeVariant::ClassLike(n) => Some(&n.members),
            NodeVariant::TypeLiteral { members } => Some(members),
            NodeVariant::Enum(n) => Some(&n.members),
            _ => None,
        }
    }
}

// ============================================================================
// Arena
// ============================================================================

/// Owns every node of one parsed source file.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    interner: StringInterner,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            interner: StringInterner::new(),
        }
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.nodes[id.index()].data.kind
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node allocated after `len`. Speculative parses roll back
    /// with this.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn intern(&self, text: &str) -> InternedString {
        self.interner.intern(text)
    }

    pub fn resolve(&self, key: InternedString) -> &str {
        self.interner.resolve(key)
    }

    /// Whether the declaration at `id` has a `?` marker. A property's
    /// postfix `!` and a mapped type's `-?` do not count.
    pub fn is_optional(&self, id: NodeId) -> bool {
        match &self.get(id).variant {
            NodeVariant::Parameter(n) => n.question_token.is_some(),
            NodeVariant::FunctionLike(n) => n.question_token.is_some(),
            NodeVariant::NamedTupleMember(n) => n.question_token.is_some(),
            NodeVariant::PropertyAssignment(n) => n.question_token.is_some(),
            NodeVariant::PropertyDeclaration(n) => n
                .postfix_token
                .is_some_and(|token| self.kind(token) == SyntaxKind::QuestionToken),
            NodeVariant::MappedType(n) => n
                .question_token
                .is_some_and(|token| self.kind(token) != SyntaxKind::MinusToken),
            _ => false,
        }
    }

    /// Text of an identifier, private identifier or literal node.
    pub fn identifier_text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id).variant {
            NodeVariant::Identifier(ident) => Some(self.interner.resolve(ident.text)),
            NodeVariant::Literal(literal) => Some(self.interner.resolve(literal.text)),
            _ => None,
        }
    }

    /// Dotted text of an entity name or property access chain
    /// (`A.B.C`), used for tag-name and heritage comparisons.
    pub fn entity_name_text(&self, id: NodeId) -> Option<String> {
        let node = self.get(id);
        match &node.variant {
            NodeVariant::Identifier(_) => self.identifier_text(id).map(str::to_string),
            NodeVariant::Token if node.kind() == SyntaxKind::ThisKeyword => Some("this".to_string()),
            NodeVariant::QualifiedName(name) => Some(format!(
                "{}.{}",
                self.entity_name_text(name.left)?,
                self.entity_name_text(name.right)?
            )),
            NodeVariant::PropertyAccess(access) => Some(format!(
                "{}.{}",
                self.entity_name_text(access.expression)?,
                self.entity_name_text(access.name)?
            )),
            NodeVariant::JsxNamespacedName(name) => Some(format!(
                "{}:{}",
                self.entity_name_text(name.namespace)?,
                self.entity_name_text(name.name)?
            )),
            _ => None,
        }
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier(arena: &mut NodeArena, text: &str, pos: TextPos, end: TextPos) -> NodeId {
        let text = arena.intern(text);
        let mut node = Node::new(
            SyntaxKind::Identifier,
            pos,
            NodeVariant::Identifier(Identifier {
                text,
                original_keyword_kind: None,
            }),
        );
        node.data.range.end = end;
        arena.alloc(node)
    }

    #[test]
    fn test_arena_alloc_and_truncate() {
        let mut arena = NodeArena::new();
        let a = identifier(&mut arena, "a", 0, 1);
        let b = identifier(&mut arena, "b", 2, 3);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.identifier_text(a), Some("a"));
        assert_eq!(arena[b].range(), TextRange::new(2, 3));
        arena.truncate(1);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_missing_node() {
        let mut arena = NodeArena::new();
        let id = identifier(&mut arena, "", 4, 4);
        assert!(arena[id].is_missing());
        let eof = arena.alloc(Node::new(SyntaxKind::EndOfFileToken, 4, NodeVariant::Token));
        assert!(!arena[eof].is_missing());
    }

    #[test]
    fn test_entity_name_text() {
        let mut arena = NodeArena::new();
        let left = identifier(&mut arena, "A", 0, 1);
        let right = identifier(&mut arena, "B", 2, 3);
        let qualified = arena.alloc(Node::new(
            SyntaxKind::QualifiedName,
            0,
            NodeVariant::QualifiedName(QualifiedName { left, right }),
        ));
        assert_eq!(arena.entity_name_text(qualified).as_deref(), Some("A.B"));
    }

    #[test]
    fn test_node_list_range() {
        let list = NodeList::empty(7);
        assert!(list.is_empty());
        assert_eq!(list.range, TextRange::new(7, 7));
    }
}
