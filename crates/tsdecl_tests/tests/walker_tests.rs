//! Tree traversal tests over parsed files.

use std::collections::BTreeSet;

use tsdecl_ast::utilities::{
    contains_parse_error, find_ancestor, find_innermost_node_at, get_ancestors, get_descendants, of_kind,
    set_parent_nodes,
};
use tsdecl_ast::visitor::{children, for_each_child};
use tsdecl_ast::{NodeId, ScriptKind, SourceFile, SyntaxKind};
use tsdecl_parser::{parse_source_file, ParseOptions};

/// Helper: parse source text as a `.ts` file.
fn parse(source: &str) -> SourceFile {
    parse_source_file("walk.ts", source, &ParseOptions::default()).unwrap()
}

fn kinds(file: &SourceFile, ids: &[NodeId]) -> Vec<SyntaxKind> {
    ids.iter().map(|&id| file.node(id).kind()).collect()
}

/// Helper: the first node of `kind` in document order.
fn first_of_kind(file: &SourceFile, kind: SyntaxKind) -> NodeId {
    of_kind(&file.arena, file.root, kind)[0]
}

// ============================================================================
// Children
// ============================================================================

#[test]
fn test_children_in_source_order() {
    let file = parse("a + b;");
    let binary = first_of_kind(&file, SyntaxKind::BinaryExpression);
    assert_eq!(
        kinds(&file, &children(&file.arena, binary)),
        vec![SyntaxKind::Identifier, SyntaxKind::PlusToken, SyntaxKind::Identifier]
    );
}

#[test]
fn test_absent_children_are_skipped() {
    let file = parse("function f() {}");
    let function = first_of_kind(&file, SyntaxKind::FunctionDeclaration);
    // No modifiers, type parameters, parameters or return type.
    assert_eq!(
        kinds(&file, &children(&file.arena, function)),
        vec![SyntaxKind::Identifier, SyntaxKind::Block]
    );
}

#[test]
fn test_source_file_children_end_with_eof() {
    let file = parse("let a; let b;");
    let kids = children(&file.arena, file.root);
    assert_eq!(
        kinds(&file, &kids),
        vec![SyntaxKind::VariableStatement, SyntaxKind::VariableStatement, SyntaxKind::EndOfFileToken]
    );
}

#[test]
fn test_for_each_child_stops_early() {
    let file = parse("f(a, b, c);");
    let call = first_of_kind(&file, SyntaxKind::CallExpression);
    let mut visited = 0;
    let found = for_each_child(file.node(call), |child| {
        visited += 1;
        (file.identifier_text(child) == Some("a")).then_some(child)
    });
    assert_eq!(found.and_then(|id| file.identifier_text(id)), Some("a"));
    assert_eq!(visited, 2);
}

#[test]
fn test_child_ranges_nest_within_parent() {
    let file = parse("class A<T> { m(x: T): T[] { return [x]; } }\ntype U = { [K in keyof A<string>]: K };");
    for id in get_descendants(&file.arena, file.root) {
        let range = file.node(id).range();
        for child in children(&file.arena, id) {
            let child_range = file.node(child).range();
            assert!(range.pos <= child_range.pos && child_range.end <= range.end);
        }
    }
}

// ============================================================================
// Descendants and ancestors
// ============================================================================

#[test]
fn test_descendants_are_depth_first() {
    let file = parse("x = f(y);");
    let statement = file.statements().first().unwrap();
    let identifiers: Vec<_> = get_descendants(&file.arena, statement)
        .into_iter()
        .filter_map(|id| file.identifier_text(id))
        .collect();
    assert_eq!(identifiers, vec!["x", "f", "y"]);
}

#[test]
fn test_of_kind_finds_nested_nodes() {
    let file = parse("namespace N { export namespace M { interface I {} } interface J {} }");
    let names: Vec<_> = of_kind(&file.arena, file.root, SyntaxKind::InterfaceDeclaration)
        .into_iter()
        .map(|id| file.arena.entity_name_text(file.node(id).variant.name().unwrap()).unwrap())
        .collect();
    assert_eq!(names, vec!["I", "J"]);
}

#[test]
fn test_ancestors_nearest_first() {
    let file = parse("function f() { if (a) { return b; } }");
    let ret = first_of_kind(&file, SyntaxKind::ReturnStatement);
    let ancestors = get_ancestors(&file.arena, ret);
    assert_eq!(
        kinds(&file, &ancestors),
        vec![
            SyntaxKind::Block,
            SyntaxKind::IfStatement,
            SyntaxKind::Block,
            SyntaxKind::FunctionDeclaration,
            SyntaxKind::SourceFile,
        ]
    );
    assert_eq!(
        find_ancestor(&file.arena, ret, SyntaxKind::FunctionDeclaration),
        Some(first_of_kind(&file, SyntaxKind::FunctionDeclaration))
    );
    assert_eq!(find_ancestor(&file.arena, ret, SyntaxKind::ClassDeclaration), None);
}

#[test]
fn test_set_parent_nodes_after_unlinked_parse() {
    let options = ParseOptions::default().with_set_parent_nodes(false);
    let file = parse_source_file("walk.ts", "let a = [1, 2];", &options).unwrap();
    let literal = first_of_kind(&file, SyntaxKind::ArrayLiteralExpression);
    assert!(get_ancestors(&file.arena, literal).is_empty());
    set_parent_nodes(&file.arena, file.root);
    assert_eq!(get_ancestors(&file.arena, literal).last(), Some(&file.root));
}

#[test]
fn test_find_innermost_node_at() {
    let source = "const value = compute(input);";
    let file = parse(source);
    let pos = source.find("input").unwrap() as u32 + 1;
    let node = find_innermost_node_at(&file.arena, file.root, pos);
    assert_eq!(file.identifier_text(node), Some("input"));
}

// ============================================================================
// Walker completeness
// ============================================================================

const TS_CORPUS: &str = r#"
import def, * as ns from "mod";
import { a as b, type C } from "mod";
import eq = require("mod");
export { b as c };
export * from "mod";
export default interface Shape<T extends object = {}> extends Base<T> {
    readonly [key: string]: unknown;
    new (x: number): Shape<T>;
    <U>(u: U): U;
    method?(this: Shape<T>, ...rest: any[]): void;
}
declare module "ambient" {
    export type Mapped<T> = { readonly [K in keyof T]?: T[K] };
}
namespace A.B { export const enum E { X = 1, Y = X << 2 } }
type Cond<T> = T extends (infer U)[] ? U : T extends `${infer H}-${string}` ? H : never;
type Tuple = [first: string, second?: number, ...rest: boolean[]];
type Fn = new (a: typeof import("mod")) => unique symbol;
type Guard = (x: unknown) => asserts x is string;
type Access = Shape<any>["method"] & (string | null)[];
@decorator()
abstract class Widget<T> extends Base implements Shape<T> {
    static #count = 0;
    declare prop!: string;
    constructor(private readonly x: number, public y?: string) { super(); }
    get value(): number { return this.x; }
    set value(v) {}
    static { Widget.#count++; }
    abstract render(): void;
    *items() { yield* []; }
    async load() { await fetch?.(`url/${this.x}`)!; }
}
function* gen({ a, b: [c, ...d] = [] }: any, e = 1) {
    label: for (const [k, v] of new Map<string, number>()) { continue label; }
    for (let i = 0; i < 10; i++) { if (i % 2) break; else continue; }
    for (const key in obj) {}
    while (false) {}
    do {} while (false);
    switch (e) { case 1: break; default: }
    try { throw new Error("x"); } catch ({ message }) {} finally {}
    with (obj) {}
    debugger;
    ;
    return void delete obj[a as any satisfies unknown], typeof c, -e, !e, ~e, ++e, e--;
}
const arrow = async <T,>(x: T): Promise<T> => x;
let lit = { a, b: 1, [c]: 2, m() {}, get g() { return 1; }, set s(v) {}, ...d };
var re = /ab+c/gi, arr = [1, , ...arr], tagged = tag`a${1}b`, cond = a ? b : c;
let inst = f<string>, nn = a!, pa = (a, b), sup = <number>arr;
"#;

const TSX_CORPUS: &str = r#"
const el = <div className="x" {...props} flag>
    text {value} <Item key={1} />
    <>{/* comment */}</>
    <ns:tag>{cond ? <a.b /> : null}</ns:tag>
</div>;
"#;

/// Helper: kinds present in the arena and kinds reachable from the root.
fn arena_and_reached_kinds(file: &SourceFile) -> (BTreeSet<SyntaxKind>, BTreeSet<SyntaxKind>) {
    let in_arena = file.arena.iter().map(|(_, node)| node.kind()).collect();
    let mut reached: BTreeSet<_> = get_descendants(&file.arena, file.root)
        .into_iter()
        .map(|id| file.arena.kind(id))
        .collect();
    reached.insert(SyntaxKind::SourceFile);
    (in_arena, reached)
}

#[test]
fn test_every_parsed_kind_is_reachable_from_root() {
    let options = ParseOptions::default().with_js_doc(false);
    let file = parse_source_file("corpus.ts", TS_CORPUS, &options).unwrap();
    let (in_arena, reached) = arena_and_reached_kinds(&file);
    let unreached: Vec<_> = in_arena.difference(&reached).collect();
    assert!(unreached.is_empty(), "kinds never visited by for_each_child: {unreached:?}");
    assert!(reached.len() > 100, "corpus only produced {} kinds", reached.len());
}

#[test]
fn test_every_jsx_kind_is_reachable_from_root() {
    let options = ParseOptions::default()
        .with_script_kind(ScriptKind::TSX)
        .with_js_doc(false);
    let file = parse_source_file("corpus.tsx", TSX_CORPUS, &options).unwrap();
    assert!(file.parse_diagnostics.is_empty(), "{:?}", file.parse_diagnostics);
    let (in_arena, reached) = arena_and_reached_kinds(&file);
    let unreached: Vec<_> = in_arena.difference(&reached).collect();
    assert!(unreached.is_empty(), "kinds never visited by for_each_child: {unreached:?}");
    for kind in [
        SyntaxKind::JsxElement,
        SyntaxKind::JsxSelfClosingElement,
        SyntaxKind::JsxFragment,
        SyntaxKind::JsxSpreadAttribute,
        SyntaxKind::JsxExpression,
        SyntaxKind::JsxNamespacedName,
    ] {
        assert!(reached.contains(&kind), "{kind:?} not produced");
    }
}

// ============================================================================
// Error aggregation
// ============================================================================

#[test]
fn test_contains_parse_error_propagates_upward() {
    let file = parse("function ok() {}\nfunction bad() { let = ; }");
    assert!(contains_parse_error(&file.arena, file.root));
    let functions = of_kind(&file.arena, file.root, SyntaxKind::FunctionDeclaration);
    assert!(!contains_parse_error(&file.arena, functions[0]));
    assert!(contains_parse_error(&file.arena, functions[1]));
}

#[test]
fn test_contains_parse_error_on_long_operator_chain() {
    let file = parse(&format!("let x = 1{};", "+1".repeat(100_000)));
    assert!(file.parse_diagnostics.is_empty());
    assert!(!contains_parse_error(&file.arena, file.root));

    let broken = parse(&format!("let x = 1{} + ;", "+1".repeat(100_000)));
    assert!(contains_parse_error(&broken.arena, broken.root));
    let declaration = first_of_kind(&broken, SyntaxKind::VariableDeclaration);
    assert!(contains_parse_error(&broken.arena, declaration));
}

#[test]
fn test_clean_file_has_no_parse_error() {
    let file = parse("export interface A { b: string }");
    assert!(!contains_parse_error(&file.arena, file.root));
    assert!(!file.has_parse_errors());
}
