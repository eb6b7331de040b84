//! Parser integration tests.
//!
//! Verifies that the parser builds the expected AST shapes from TypeScript
//! source, recovers from malformed input with the right diagnostics, and
//! honors its options.

use tsdecl_ast::utilities::{contains_parse_error, get_descendants, has_modifier};
use tsdecl_ast::visitor::children;
use tsdecl_ast::{
    ModifierFlags, NodeFlags, NodeId, NodeVariant, ScriptKind, SourceFile, SyntaxKind,
};
use tsdecl_core::cancellation::CancellationToken;
use tsdecl_parser::{parse_source_file, ParseError, ParseOptions};

/// Helper: parse source text as a `.ts` file.
fn parse(source: &str) -> SourceFile {
    parse_source_file("test.ts", source, &ParseOptions::default()).unwrap()
}

/// Helper: parse source text as a `.tsx` file.
fn parse_tsx(source: &str) -> SourceFile {
    parse_source_file("test.tsx", source, &ParseOptions::default()).unwrap()
}

/// Helper: kinds of the top-level statements.
fn statement_kinds(file: &SourceFile) -> Vec<SyntaxKind> {
    file.statements().iter().map(|id| file.node(id).kind()).collect()
}

/// Helper: diagnostic codes in report order.
fn codes(file: &SourceFile) -> Vec<u32> {
    file.parse_diagnostics.iter().map(|d| d.code).collect()
}

/// Helper: assert the source parses cleanly into statements of these kinds.
fn assert_clean(source: &str, expected: &[SyntaxKind]) -> SourceFile {
    let file = parse(source);
    assert!(file.parse_diagnostics.is_empty(), "source: {source}\n{:?}", file.parse_diagnostics);
    assert_eq!(statement_kinds(&file), expected, "source: {source}");
    file
}

fn first_statement(file: &SourceFile) -> NodeId {
    file.statements().first().unwrap()
}

/// Helper: the expression of the first statement, which must be an
/// expression statement.
fn first_expression(file: &SourceFile) -> NodeId {
    match &file.node(first_statement(file)).variant {
        NodeVariant::SingleExpression { expression } => *expression,
        other => panic!("not an expression statement: {other:?}"),
    }
}

/// Helper: the initializer of `const x = <init>;`.
fn first_initializer(file: &SourceFile) -> NodeId {
    let NodeVariant::VariableStatement(statement) = &file.node(first_statement(file)).variant else {
        panic!("not a variable statement");
    };
    let NodeVariant::VariableDeclarationList { declarations } = &file.node(statement.declaration_list).variant else {
        panic!("not a declaration list");
    };
    let NodeVariant::VariableDeclaration(declaration) = &file.node(declarations.first().unwrap()).variant else {
        panic!("not a declaration");
    };
    declaration.initializer.unwrap()
}

/// Helper: the aliased type of `type X = <type>;`.
fn first_alias_type(file: &SourceFile) -> NodeId {
    match &file.node(first_statement(file)).variant {
        NodeVariant::TypeAlias(alias) => alias.type_node,
        other => panic!("not a type alias: {other:?}"),
    }
}

fn binary_parts(file: &SourceFile, id: NodeId) -> (NodeId, SyntaxKind, NodeId) {
    match &file.node(id).variant {
        NodeVariant::Binary(binary) => (binary.left, file.node(binary.operator_token).kind(), binary.right),
        other => panic!("not a binary expression: {other:?}"),
    }
}

fn kind(file: &SourceFile, id: NodeId) -> SyntaxKind {
    file.node(id).kind()
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_parse_variable_statements() {
    assert_clean("const a = 1; let b = 2; var c = 3;", &[SyntaxKind::VariableStatement; 3]);
}

#[test]
fn test_parse_function_declaration() {
    assert_clean(
        "function add(a: number, b: number = 0): number { return a + b; }",
        &[SyntaxKind::FunctionDeclaration],
    );
}

#[test]
fn test_parse_overloads_and_generators() {
    assert_clean(
        "function f(x: string): void;\nfunction f(x: any) {}\nfunction* g() { yield* other(); }",
        &[SyntaxKind::FunctionDeclaration; 3],
    );
}

#[test]
fn test_parse_class_members() {
    let file = assert_clean(
        "abstract class Foo<T> extends Bar<T> implements Baz {\n\
             private x: number = 1;\n\
             declare readonly y?: string;\n\
             constructor(readonly z: string) { super(); }\n\
             get v(): T { return this.w; }\n\
             set v(value: T) {}\n\
             static { init(); }\n\
             abstract m(): void;\n\
             #secret = 2;\n\
             [key: string]: unknown;\n\
         }",
        &[SyntaxKind::ClassDeclaration],
    );
    let NodeVariant::ClassLike(class) = &file.node(first_statement(&file)).variant else {
        panic!("not a class");
    };
    let member_kinds: Vec<_> = class.members.iter().map(|id| kind(&file, id)).collect();
    assert_eq!(
        member_kinds,
        vec![
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::Constructor,
            SyntaxKind::GetAccessor,
            SyntaxKind::SetAccessor,
            SyntaxKind::ClassStaticBlockDeclaration,
            SyntaxKind::MethodDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::IndexSignature,
        ]
    );
    assert_eq!(class.heritage_clauses.as_ref().map(|clauses| clauses.len()), Some(2));
}

#[test]
fn test_parse_interface_members() {
    let file = assert_clean(
        "interface A<T> extends B, C<T> {\n\
             a: string;\n\
             b?(x: T): void;\n\
             readonly [key: string]: any;\n\
             new (): A<T>;\n\
             (): void\n\
         }",
        &[SyntaxKind::InterfaceDeclaration],
    );
    let NodeVariant::InterfaceDeclaration(interface) = &file.node(first_statement(&file)).variant else {
        panic!("not an interface");
    };
    let member_kinds: Vec<_> = interface.members.iter().map(|id| kind(&file, id)).collect();
    assert_eq!(
        member_kinds,
        vec![
            SyntaxKind::PropertySignature,
            SyntaxKind::MethodSignature,
            SyntaxKind::IndexSignature,
            SyntaxKind::ConstructSignature,
            SyntaxKind::CallSignature,
        ]
    );
}

#[test]
fn test_parse_enum() {
    let file = assert_clean("const enum E { A = 1, B, C = 'c', }", &[SyntaxKind::EnumDeclaration]);
    let NodeVariant::Enum(declaration) = &file.node(first_statement(&file)).variant else {
        panic!("not an enum");
    };
    assert_eq!(declaration.members.len(), 3);
    assert!(declaration.members.has_trailing_comma);
}

#[test]
fn test_parse_namespaces_and_ambient_modules() {
    assert_clean(
        "declare namespace A.B { export const x: number; }\n\
         declare module 'foo' { export default function f(): void; }\n\
         declare global { interface Window { x: number } }\n\
         namespace Empty {}",
        &[SyntaxKind::ModuleDeclaration; 4],
    );
}

#[test]
fn test_dotted_namespace_nests() {
    let file = parse("namespace A.B.C {}");
    let NodeVariant::Module(outer) = &file.node(first_statement(&file)).variant else {
        panic!("not a module");
    };
    let inner = outer.body.unwrap();
    assert_eq!(kind(&file, inner), SyntaxKind::ModuleDeclaration);
    assert!(file.node(inner).flags().contains(NodeFlags::NESTED_NAMESPACE));
}

#[test]
fn test_parse_imports_and_exports() {
    assert_clean(
        "import a, { b as c, type d } from 'm';\n\
         import * as ns from 'n';\n\
         import type { T } from 't';\n\
         import e = require('e');\n\
         import 'side-effect';\n\
         export * from 'x';\n\
         export { a as default, c };\n\
         export = a;",
        &[
            SyntaxKind::ImportDeclaration,
            SyntaxKind::ImportDeclaration,
            SyntaxKind::ImportDeclaration,
            SyntaxKind::ImportEqualsDeclaration,
            SyntaxKind::ImportDeclaration,
            SyntaxKind::ExportDeclaration,
            SyntaxKind::ExportDeclaration,
            SyntaxKind::ExportAssignment,
        ],
    );
}

#[test]
fn test_parse_export_default_forms() {
    assert_clean(
        "export default class {}\nexport default function () {}\nexport default 42;",
        &[SyntaxKind::ClassDeclaration, SyntaxKind::FunctionDeclaration, SyntaxKind::ExportAssignment],
    );
}

#[test]
fn test_parse_statements() {
    assert_clean(
        "if (a) b(); else { c(); }\n\
         for (let i = 0; i < n; i++) {}\n\
         for (const k in o) {}\n\
         for await (const v of s) {}\n\
         while (x) break;\n\
         do { continue; } while (y);\n\
         switch (z) { case 1: f(); default: g(); }\n\
         try { t(); } catch { } finally { u(); }\n\
         label: for (;;) { break label; }\n\
         throw new Error('x');\n\
         debugger;\n\
         ;",
        &[
            SyntaxKind::IfStatement,
            SyntaxKind::ForStatement,
            SyntaxKind::ForInStatement,
            SyntaxKind::ForOfStatement,
            SyntaxKind::WhileStatement,
            SyntaxKind::DoStatement,
            SyntaxKind::SwitchStatement,
            SyntaxKind::TryStatement,
            SyntaxKind::LabeledStatement,
            SyntaxKind::ThrowStatement,
            SyntaxKind::DebuggerStatement,
            SyntaxKind::EmptyStatement,
        ],
    );
}

#[test]
fn test_parse_destructuring() {
    assert_clean(
        "const { a, b: [c, , d = 1], ...rest } = obj;",
        &[SyntaxKind::VariableStatement],
    );
}

// ============================================================================
// Types
// ============================================================================

#[test]
fn test_parse_mapped_type() {
    let file = assert_clean("type M<T> = { readonly [K in keyof T]?: T[K] };", &[SyntaxKind::TypeAliasDeclaration]);
    assert_eq!(kind(&file, first_alias_type(&file)), SyntaxKind::MappedType);
}

#[test]
fn test_parse_conditional_type_with_infer() {
    let file = assert_clean(
        "type C<T> = T extends Promise<infer U extends object> ? U : never;",
        &[SyntaxKind::TypeAliasDeclaration],
    );
    let alias = first_alias_type(&file);
    assert_eq!(kind(&file, alias), SyntaxKind::ConditionalType);
    let NodeVariant::ConditionalType(conditional) = &file.node(alias).variant else {
        panic!("not a conditional type");
    };
    let infers: Vec<_> = get_descendants(&file.arena, conditional.extends_type)
        .into_iter()
        .filter(|&id| kind(&file, id) == SyntaxKind::InferType)
        .collect();
    assert_eq!(infers.len(), 1);
}

#[test]
fn test_union_binds_looser_than_intersection() {
    let file = assert_clean("type U = A | B & C;", &[SyntaxKind::TypeAliasDeclaration]);
    let union = first_alias_type(&file);
    let NodeVariant::UnionOrIntersection { types } = &file.node(union).variant else {
        panic!("not a union");
    };
    assert_eq!(kind(&file, union), SyntaxKind::UnionType);
    assert_eq!(types.len(), 2);
    assert_eq!(kind(&file, types.get(1).unwrap()), SyntaxKind::IntersectionType);
}

#[test]
fn test_parse_function_and_constructor_types() {
    let file = assert_clean(
        "type F = (a: string, ...b: number[]) => void;\ntype K = abstract new () => object;",
        &[SyntaxKind::TypeAliasDeclaration; 2],
    );
    assert_eq!(kind(&file, first_alias_type(&file)), SyntaxKind::FunctionType);
}

#[test]
fn test_parse_named_tuple() {
    let file = assert_clean(
        "type T = [a: string, b?: number, ...rest: boolean[]];",
        &[SyntaxKind::TypeAliasDeclaration],
    );
    let NodeVariant::TupleType { elements } = &file.node(first_alias_type(&file)).variant else {
        panic!("not a tuple");
    };
    assert!(elements.iter().all(|id| kind(&file, id) == SyntaxKind::NamedTupleMember));
}

#[test]
fn test_parse_template_literal_type() {
    let file = assert_clean("type E = `on${Capitalize<string>}Changed`;", &[SyntaxKind::TypeAliasDeclaration]);
    assert_eq!(kind(&file, first_alias_type(&file)), SyntaxKind::TemplateLiteralType);
}

#[test]
fn test_parse_type_predicates_and_queries() {
    assert_clean(
        "declare function isString(x: unknown): x is string;\n\
         declare function assert(x: unknown): asserts x;\n\
         type Q = typeof import('./mod').value;\n\
         type R = keyof typeof obj;\n\
         type I = T[number]['key'];",
        &[
            SyntaxKind::FunctionDeclaration,
            SyntaxKind::FunctionDeclaration,
            SyntaxKind::TypeAliasDeclaration,
            SyntaxKind::TypeAliasDeclaration,
            SyntaxKind::TypeAliasDeclaration,
        ],
    );
}

#[test]
fn test_function_type_in_union_needs_parentheses() {
    let file = parse("type U = string | () => void;");
    assert!(codes(&file).contains(&1385), "{:?}", file.parse_diagnostics);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let file = assert_clean("a + b * c;", &[SyntaxKind::ExpressionStatement]);
    let (left, operator, right) = binary_parts(&file, first_expression(&file));
    assert_eq!(kind(&file, left), SyntaxKind::Identifier);
    assert_eq!(operator, SyntaxKind::PlusToken);
    let (_, inner_operator, _) = binary_parts(&file, right);
    assert_eq!(inner_operator, SyntaxKind::AsteriskToken);
}

#[test]
fn test_exponentiation_is_right_associative() {
    let file = assert_clean("a ** b ** c;", &[SyntaxKind::ExpressionStatement]);
    let (left, _, right) = binary_parts(&file, first_expression(&file));
    assert_eq!(kind(&file, left), SyntaxKind::Identifier);
    assert_eq!(kind(&file, right), SyntaxKind::BinaryExpression);
}

#[test]
fn test_assignment_is_right_associative() {
    let file = assert_clean("x = y = 1;", &[SyntaxKind::ExpressionStatement]);
    let (_, operator, right) = binary_parts(&file, first_expression(&file));
    assert_eq!(operator, SyntaxKind::EqualsToken);
    assert_eq!(kind(&file, right), SyntaxKind::BinaryExpression);
}

#[test]
fn test_unary_operand_of_exponentiation_is_reported() {
    let file = parse("-x ** 2;");
    assert_eq!(codes(&file), vec![17006]);
}

#[test]
fn test_as_and_satisfies_chain() {
    let file = assert_clean("x as unknown satisfies object;", &[SyntaxKind::ExpressionStatement]);
    let outer = first_expression(&file);
    assert_eq!(kind(&file, outer), SyntaxKind::SatisfiesExpression);
    let NodeVariant::TypedExpression(typed) = &file.node(outer).variant else {
        panic!("not a typed expression");
    };
    assert_eq!(kind(&file, typed.expression), SyntaxKind::AsExpression);
}

#[test]
fn test_optional_chain_flags() {
    let file = assert_clean("a?.b.c;", &[SyntaxKind::ExpressionStatement]);
    let outer = first_expression(&file);
    assert!(file.node(outer).flags().contains(NodeFlags::OPTIONAL_CHAIN));
    let NodeVariant::PropertyAccess(access) = &file.node(outer).variant else {
        panic!("not a property access");
    };
    assert!(access.question_dot_token.is_none());
    let NodeVariant::PropertyAccess(inner) = &file.node(access.expression).variant else {
        panic!("not a property access");
    };
    assert!(inner.question_dot_token.is_some());
}

#[test]
fn test_call_with_type_arguments() {
    let file = assert_clean("f<string, number>(x);", &[SyntaxKind::ExpressionStatement]);
    let call = first_expression(&file);
    assert_eq!(kind(&file, call), SyntaxKind::CallExpression);
    let NodeVariant::Call(call) = &file.node(call).variant else {
        panic!("not a call");
    };
    assert_eq!(call.type_arguments.as_ref().map(|args| args.len()), Some(2));
    assert_eq!(call.arguments.as_ref().map(|args| args.len()), Some(1));
}

#[test]
fn test_comparison_is_not_type_arguments() {
    let file = assert_clean("a < b > c;", &[SyntaxKind::ExpressionStatement]);
    let (left, operator, _) = binary_parts(&file, first_expression(&file));
    assert_eq!(operator, SyntaxKind::GreaterThanToken);
    assert_eq!(kind(&file, left), SyntaxKind::BinaryExpression);
}

#[test]
fn test_instantiation_expression() {
    let file = assert_clean("const make = factory<string>;", &[SyntaxKind::VariableStatement]);
    assert_eq!(kind(&file, first_initializer(&file)), SyntaxKind::ExpressionWithTypeArguments);
}

#[test]
fn test_parse_arrow_functions() {
    let file = assert_clean(
        "const f = async (a: number, ...rest: string[]): Promise<void> => { await a; };",
        &[SyntaxKind::VariableStatement],
    );
    let arrow = first_initializer(&file);
    assert_eq!(kind(&file, arrow), SyntaxKind::ArrowFunction);
    let NodeVariant::FunctionLike(function) = &file.node(arrow).variant else {
        panic!("not a function");
    };
    assert_eq!(function.parameters.len(), 2);
    assert!(function.modifiers.is_some());
    assert!(function.type_node.is_some());
}

#[test]
fn test_simple_arrow_function() {
    let file = assert_clean("const g = x => x * 2;", &[SyntaxKind::VariableStatement]);
    let arrow = first_initializer(&file);
    let NodeVariant::FunctionLike(function) = &file.node(arrow).variant else {
        panic!("not a function");
    };
    assert_eq!(function.parameters.len(), 1);
    assert_eq!(kind(&file, function.body.unwrap()), SyntaxKind::BinaryExpression);
}

#[test]
fn test_parenthesized_expression_is_not_arrow() {
    let file = assert_clean("(a, b);", &[SyntaxKind::ExpressionStatement]);
    assert_eq!(kind(&file, first_expression(&file)), SyntaxKind::ParenthesizedExpression);
}

#[test]
fn test_conditional_keeps_colon_from_arrow() {
    let file = assert_clean("a ? (b) : c => d;", &[SyntaxKind::ExpressionStatement]);
    let conditional = first_expression(&file);
    let NodeVariant::Conditional(conditional) = &file.node(conditional).variant else {
        panic!("not a conditional");
    };
    assert_eq!(kind(&file, conditional.when_true), SyntaxKind::ParenthesizedExpression);
    assert_eq!(kind(&file, conditional.when_false), SyntaxKind::ArrowFunction);
}

#[test]
fn test_parse_template_expression() {
    let file = assert_clean("`a${b}c${d}e`;", &[SyntaxKind::ExpressionStatement]);
    let template = first_expression(&file);
    let NodeVariant::Template(template) = &file.node(template).variant else {
        panic!("not a template");
    };
    assert_eq!(template.template_spans.len(), 2);
    let last = template.template_spans.last().unwrap();
    let NodeVariant::TemplateSpan(span) = &file.node(last).variant else {
        panic!("not a span");
    };
    assert_eq!(kind(&file, span.literal), SyntaxKind::TemplateTail);
}

#[test]
fn test_parse_tagged_template() {
    let file = assert_clean("tag`hello ${world}`;", &[SyntaxKind::ExpressionStatement]);
    assert_eq!(kind(&file, first_expression(&file)), SyntaxKind::TaggedTemplateExpression);
}

#[test]
fn test_parse_new_expression() {
    let file = assert_clean("new Foo<T>(1, 2);", &[SyntaxKind::ExpressionStatement]);
    let new = first_expression(&file);
    assert_eq!(kind(&file, new), SyntaxKind::NewExpression);
    let NodeVariant::Call(call) = &file.node(new).variant else {
        panic!("not a new expression");
    };
    assert_eq!(call.type_arguments.as_ref().map(|args| args.len()), Some(1));
    assert_eq!(call.arguments.as_ref().map(|args| args.len()), Some(2));
}

#[test]
fn test_parse_object_literal_members() {
    let file = assert_clean(
        "({ a, b: 1, c() {}, get d() { return 1; }, ...e });",
        &[SyntaxKind::ExpressionStatement],
    );
    let NodeVariant::SingleExpression { expression } = &file.node(first_expression(&file)).variant else {
        panic!("not parenthesized");
    };
    let NodeVariant::ObjectLiteral { properties, .. } = &file.node(*expression).variant else {
        panic!("not an object literal");
    };
    let kinds: Vec<_> = properties.iter().map(|id| kind(&file, id)).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::ShorthandPropertyAssignment,
            SyntaxKind::PropertyAssignment,
            SyntaxKind::MethodDeclaration,
            SyntaxKind::GetAccessor,
            SyntaxKind::SpreadAssignment,
        ]
    );
}

#[test]
fn test_parse_regular_expression() {
    let file = assert_clean("/ab+c/g.test(s);", &[SyntaxKind::ExpressionStatement]);
    let regexes: Vec<_> = get_descendants(&file.arena, file.root)
        .into_iter()
        .filter(|&id| kind(&file, id) == SyntaxKind::RegularExpressionLiteral)
        .collect();
    assert_eq!(regexes.len(), 1);
}

#[test]
fn test_type_assertion_in_ts_file() {
    let file = assert_clean("<number>x;", &[SyntaxKind::ExpressionStatement]);
    assert_eq!(kind(&file, first_expression(&file)), SyntaxKind::TypeAssertionExpression);
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_missing_expression() {
    let file = parse("const x = ;");
    assert_eq!(codes(&file), vec![1109]);
    assert_eq!(statement_kinds(&file), vec![SyntaxKind::VariableStatement]);
    assert!(file.node(first_initializer(&file)).is_missing());
}

#[test]
fn test_missing_semicolon_between_statements() {
    let file = parse("let a = 1 let b = 2;");
    assert_eq!(codes(&file), vec![1005]);
    assert_eq!(statement_kinds(&file), vec![SyntaxKind::VariableStatement; 2]);
}

#[test]
fn test_unclosed_block() {
    let file = parse("if (a) {");
    assert_eq!(codes(&file), vec![1005]);
    assert_eq!(file.parse_diagnostics[0].message_text, "'}' expected.");
}

#[test]
fn test_misspelled_keyword_suggestion() {
    let file = parse("interfce Foo {}");
    let diagnostic = file.parse_diagnostics.iter().find(|d| d.code == 1435).unwrap();
    assert_eq!(diagnostic.message_text, "Unknown keyword or identifier. Did you mean 'interface'?");
    assert_eq!(diagnostic.start(), 0);
    assert_eq!(diagnostic.length(), 8);
}

#[test]
fn test_empty_type_argument_list() {
    let file = parse("let x: Array<> = [];");
    assert!(codes(&file).contains(&1099), "{:?}", file.parse_diagnostics);
}

#[test]
fn test_garbage_input_yields_well_formed_tree() {
    let inputs = [
        ")))",
        "class {",
        "function (",
        "<<<>>>",
        "@@@",
        "type = ;",
        "enum { ,, }",
        "import {",
        "export default",
        "a ? : ;",
        "`${",
        "/* unterminated",
        "'abc",
        "interface I { a: ; b }",
        "x => => y",
        "for (let x of) {}",
        "}{",
    ];
    for input in inputs {
        let file = parse(input);
        let len = input.len() as u32;
        let mut previous_end = 0;
        for statement in file.statements().iter() {
            let range = file.node(statement).range();
            assert!(range.pos >= previous_end, "input: {input}");
            assert!(range.pos <= range.end && range.end <= len, "input: {input}");
            previous_end = range.end;
        }
        assert_eq!(file.node(file.end_of_file_token()).end(), len, "input: {input}");
        assert!(!file.parse_diagnostics.is_empty(), "input: {input}");
        for diagnostic in &file.parse_diagnostics {
            assert!(diagnostic.start() + diagnostic.length() <= len, "input: {input}");
        }
        assert!(contains_parse_error(&file.arena, file.root), "input: {input}");

        let mut nodes = get_descendants(&file.arena, file.root);
        nodes.push(file.root);
        for id in nodes {
            let node = file.node(id);
            let range = node.range();
            assert!(range.pos <= range.end && range.end <= len, "input: {input}, {:?}", node.kind());
            let kids = children(&file.arena, id);
            for &child in &kids {
                let child_range = file.node(child).range();
                assert!(
                    range.pos <= child_range.pos && child_range.end <= range.end,
                    "input: {input}, {:?} escapes {:?}",
                    file.node(child).kind(),
                    node.kind()
                );
            }
            let expected = node.flags().contains(NodeFlags::THIS_NODE_HAS_ERROR)
                || kids.iter().any(|&child| contains_parse_error(&file.arena, child));
            assert_eq!(contains_parse_error(&file.arena, id), expected, "input: {input}, {:?}", node.kind());
        }
    }
}

#[test]
fn test_error_flags_mark_broken_nodes() {
    let file = parse("const ok = 1;\nconst broken = ;");
    let broken = file.statements().get(1).unwrap();
    assert!(tsdecl_ast::utilities::contains_parse_error(&file.arena, broken));
    let ok = file.statements().first().unwrap();
    assert!(!tsdecl_ast::utilities::contains_parse_error(&file.arena, ok));
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let source = format!("{}1{};", "(".repeat(5000), ")".repeat(5000));
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(move || {
            let file = parse(&source);
            file.parse_diagnostics.len()
        })
        .unwrap();
    assert!(handle.join().unwrap() > 0);
}

// ============================================================================
// Declaration-file scenarios
// ============================================================================

/// Helper: the members of the first statement, an interface.
fn interface_members(file: &SourceFile) -> Vec<NodeId> {
    let NodeVariant::InterfaceDeclaration(interface) = &file.node(first_statement(file)).variant else {
        panic!("not an interface");
    };
    interface.members.iter().collect()
}

#[test]
fn test_interface_method_signature() {
    let file = assert_clean("interface Foo { bar(): void; }", &[SyntaxKind::InterfaceDeclaration]);
    let members = interface_members(&file);
    assert_eq!(members.len(), 1);
    let NodeVariant::FunctionLike(method) = &file.node(members[0]).variant else {
        panic!("not a method");
    };
    assert_eq!(kind(&file, members[0]), SyntaxKind::MethodSignature);
    assert_eq!(file.identifier_text(method.name.unwrap()), Some("bar"));
    assert!(method.parameters.is_empty());
    assert_eq!(kind(&file, method.type_node.unwrap()), SyntaxKind::VoidKeyword);
}

#[test]
fn test_optional_property_with_union() {
    let file = assert_clean("interface Foo { baz?: number | null; }", &[SyntaxKind::InterfaceDeclaration]);
    let members = interface_members(&file);
    let NodeVariant::PropertyDeclaration(property) = &file.node(members[0]).variant else {
        panic!("not a property");
    };
    assert_eq!(kind(&file, members[0]), SyntaxKind::PropertySignature);
    assert!(property.postfix_token.is_some());
    assert!(file.arena.is_optional(members[0]));
    let union = property.type_node.unwrap();
    let NodeVariant::UnionOrIntersection { types } = &file.node(union).variant else {
        panic!("not a union");
    };
    let member_kinds: Vec<_> = types.iter().map(|id| kind(&file, id)).collect();
    assert_eq!(member_kinds, vec![SyntaxKind::NumberKeyword, SyntaxKind::LiteralType]);
}

#[test]
fn test_is_optional_markers() {
    let file = assert_clean(
        "interface A { a?: string; b: string; c?(): void }\n\
         declare class B { d!: string; e?: number }\n\
         type M = { [K in T]?: K };\n\
         type N = { -readonly [K in T]-?: K };",
        &[
            SyntaxKind::InterfaceDeclaration,
            SyntaxKind::ClassDeclaration,
            SyntaxKind::TypeAliasDeclaration,
            SyntaxKind::TypeAliasDeclaration,
        ],
    );
    let optional: Vec<_> = interface_members(&file).iter().map(|&id| file.arena.is_optional(id)).collect();
    assert_eq!(optional, vec![true, false, true]);

    let class = file.statements().get(1).unwrap();
    let members = file.node(class).variant.members().unwrap();
    let optional: Vec<_> = members.iter().map(|id| file.arena.is_optional(id)).collect();
    assert_eq!(optional, vec![false, true]);

    let mapped: Vec<_> = file
        .statements()
        .iter()
        .skip(2)
        .map(|id| match &file.node(id).variant {
            NodeVariant::TypeAlias(alias) => file.arena.is_optional(alias.type_node),
            other => panic!("not a type alias: {other:?}"),
        })
        .collect();
    assert_eq!(mapped, vec![true, false]);
}

#[test]
fn test_function_with_optional_parameter() {
    let file = assert_clean(
        "function f(a: string, b?: number): boolean { return true; }",
        &[SyntaxKind::FunctionDeclaration],
    );
    let NodeVariant::FunctionLike(function) = &file.node(first_statement(&file)).variant else {
        panic!("not a function");
    };
    let optional: Vec<_> = function.parameters.iter().map(|id| file.arena.is_optional(id)).collect();
    assert_eq!(optional, vec![false, true]);
    assert_eq!(kind(&file, function.type_node.unwrap()), SyntaxKind::BooleanKeyword);
    let NodeVariant::Block { statements, .. } = &file.node(function.body.unwrap()).variant else {
        panic!("not a block");
    };
    assert_eq!(kind(&file, statements.first().unwrap()), SyntaxKind::ReturnStatement);
}

#[test]
fn test_generic_arrow_in_ts_and_tag_in_tsx() {
    let file = assert_clean("const x = <T>(y) => y;", &[SyntaxKind::VariableStatement]);
    assert_eq!(kind(&file, first_initializer(&file)), SyntaxKind::ArrowFunction);

    let file = parse_tsx("const x = <T>(y) => y;");
    assert_eq!(kind(&file, first_initializer(&file)), SyntaxKind::JsxElement);
    assert!(!file.parse_diagnostics.is_empty());
}

#[test]
fn test_interface_missing_name() {
    let file = parse("interface { }");
    assert_eq!(statement_kinds(&file), vec![SyntaxKind::InterfaceDeclaration]);
    let NodeVariant::InterfaceDeclaration(interface) = &file.node(first_statement(&file)).variant else {
        panic!("not an interface");
    };
    assert!(file.node(interface.name).is_missing());
    assert_eq!(codes(&file), vec![1003]);
    assert_eq!(file.parse_diagnostics[0].message_text, "Identifier expected.");
}

#[test]
fn test_merge_conflict_markers_are_skipped() {
    let file = parse("<<<<<<< HEAD\nlet a = 1;\n=======\nlet a = 2;\n>>>>>>> branch\nlet b = 3;");
    assert!(codes(&file).contains(&1185), "{:?}", file.parse_diagnostics);
    assert!(statement_kinds(&file).iter().all(|&kind| kind == SyntaxKind::VariableStatement));
    assert!(!statement_kinds(&file).is_empty());
}

// ============================================================================
// JSX
// ============================================================================

#[test]
fn test_parse_jsx_element() {
    let file = parse_tsx("const el = <div className=\"a\" {...props}>{x}<br/></div>;");
    assert!(file.parse_diagnostics.is_empty(), "{:?}", file.parse_diagnostics);
    let element = first_initializer(&file);
    assert_eq!(kind(&file, element), SyntaxKind::JsxElement);
    let NodeVariant::JsxElement(element) = &file.node(element).variant else {
        panic!("not an element");
    };
    let child_kinds: Vec<_> = element.children.iter().map(|id| kind(&file, id)).collect();
    assert_eq!(child_kinds, vec![SyntaxKind::JsxExpression, SyntaxKind::JsxSelfClosingElement]);
}

#[test]
fn test_jsx_mismatched_closing_tag() {
    let file = parse_tsx("const el = <a></b>;");
    assert!(codes(&file).contains(&17002), "{:?}", file.parse_diagnostics);
}

#[test]
fn test_parse_jsx_fragment_with_text() {
    let file = parse_tsx("const f = <><a/>text</>;");
    assert!(file.parse_diagnostics.is_empty(), "{:?}", file.parse_diagnostics);
    let fragment = first_initializer(&file);
    let NodeVariant::JsxFragment(fragment) = &file.node(fragment).variant else {
        panic!("not a fragment");
    };
    let child_kinds: Vec<_> = fragment.children.iter().map(|id| kind(&file, id)).collect();
    assert_eq!(child_kinds, vec![SyntaxKind::JsxSelfClosingElement, SyntaxKind::JsxText]);
}

#[test]
fn test_adjacent_jsx_elements_are_reported() {
    let file = parse_tsx("const x = <a/><b/>;");
    assert!(codes(&file).contains(&2657), "{:?}", file.parse_diagnostics);
    assert_eq!(kind(&file, first_initializer(&file)), SyntaxKind::BinaryExpression);
}

#[test]
fn test_generic_arrow_in_tsx() {
    let file = parse_tsx("const id = <T,>(x: T) => x;");
    assert!(file.parse_diagnostics.is_empty(), "{:?}", file.parse_diagnostics);
    assert_eq!(kind(&file, first_initializer(&file)), SyntaxKind::ArrowFunction);
}

// ============================================================================
// JSDoc
// ============================================================================

const DOCUMENTED: &str = "/**\n * Says hi.\n * @param name who to greet\n * @deprecated\n */\nfunction hi(name: string) {}";

#[test]
fn test_jsdoc_is_attached() {
    let file = parse(DOCUMENTED);
    let function = first_statement(&file);
    let docs = file.node(function).js_doc();
    assert_eq!(docs.len(), 1);
    let NodeVariant::JsDoc(doc) = &file.node(docs[0]).variant else {
        panic!("not a JSDoc node");
    };
    assert_eq!(doc.comment.as_deref(), Some("Says hi."));
    let tag_kinds: Vec<_> = doc.tags.iter().map(|id| kind(&file, id)).collect();
    assert_eq!(tag_kinds, vec![SyntaxKind::JSDocParameterTag, SyntaxKind::JSDocDeprecatedTag]);
    let NodeVariant::JsDocTag(param) = &file.node(doc.tags.first().unwrap()).variant else {
        panic!("not a tag");
    };
    assert_eq!(file.identifier_text(param.parameter_name.unwrap()), Some("name"));
    assert_eq!(param.comment.as_deref(), Some("who to greet"));
    assert!(has_modifier(&file.arena, function, ModifierFlags::DEPRECATED));
}

#[test]
fn test_plain_comments_are_not_jsdoc() {
    let file = parse("/* not doc */\n// nor this\nfunction f() {}");
    assert!(file.node(first_statement(&file)).js_doc().is_empty());
}

#[test]
fn test_jsdoc_can_be_disabled() {
    let options = ParseOptions::default().with_js_doc(false);
    let file = parse_source_file("test.ts", DOCUMENTED, &options).unwrap();
    assert!(file.node(first_statement(&file)).js_doc().is_empty());
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_cancelled_parse_returns_error() {
    let token = CancellationToken::new();
    token.cancel();
    let options = ParseOptions::default().with_cancellation_token(token);
    let result = parse_source_file("test.ts", "let a = 1;", &options);
    assert!(matches!(result, Err(ParseError::Cancelled(name)) if name == "test.ts"));
}

#[test]
fn test_json_file_is_one_expression() {
    let file = parse_source_file("data.json", "{\"a\": [1, 2, {\"b\": null}]}", &ParseOptions::default()).unwrap();
    assert_eq!(file.script_kind, ScriptKind::JSON);
    assert!(file.parse_diagnostics.is_empty(), "{:?}", file.parse_diagnostics);
    assert_eq!(statement_kinds(&file), vec![SyntaxKind::ExpressionStatement]);
}

#[test]
fn test_declaration_file_nodes_are_ambient() {
    let file = parse_source_file("lib.d.ts", "interface A { x: number }", &ParseOptions::default()).unwrap();
    assert!(file.is_declaration_file);
    assert!(file.node(first_statement(&file)).flags().contains(NodeFlags::AMBIENT));
}

#[test]
fn test_parents_are_set() {
    let file = parse("class A { m(x: number) { return x + 1; } }");
    for id in get_descendants(&file.arena, file.root) {
        let parent = file.node(id).parent().unwrap();
        assert!(get_descendants(&file.arena, parent).contains(&id));
    }
}
