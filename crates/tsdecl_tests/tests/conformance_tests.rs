//! TypeScript conformance tests for tsdecl.
//!
//! Runs common TypeScript patterns through the parser. Well-formed cases
//! must parse without diagnostics; malformed cases must report exactly the
//! listed diagnostic codes.

use tsdecl_tests::ConformanceSuite;

// ============================================================================
// Test Cases
// ============================================================================

#[test]
fn test_typescript_conformance() {
    let mut suite = ConformanceSuite::new();

    // ========================================================================
    // Category: Parsing - Variable Declarations
    // ========================================================================
    suite.add_test("basic_var_declaration", "parsing", "var x: number = 42;");
    suite.add_test("basic_let_declaration", "parsing", "let y: string = 'hello';");
    suite.add_test("basic_const_declaration", "parsing", "const z: boolean = true;");
    suite.add_test("typed_array_declaration", "parsing", "const arr: number[] = [1, 2, 3];");
    suite.add_test("definite_assignment", "parsing", "let ready!: boolean;");
    suite.add_test("using_declaration", "parsing", "using res = getResource();");

    // ========================================================================
    // Category: Parsing - Functions
    // ========================================================================
    suite.add_test(
        "function_with_params",
        "parsing",
        "function add(a: number, b: number): number { return a + b; }",
    );
    suite.add_test(
        "arrow_function",
        "parsing",
        "const multiply = (x: number, y: number): number => x * y;",
    );
    suite.add_test(
        "async_function",
        "parsing",
        "async function fetchData(): Promise<string> { return await Promise.resolve('data'); }",
    );
    suite.add_test("async_arrow", "parsing", "const load = async x => await x;");
    suite.add_test("generic_function", "parsing", "function identity<T>(arg: T): T { return arg; }");
    suite.add_test(
        "this_parameter",
        "parsing",
        "function handler(this: Window, event: Event): void {}",
    );
    suite.add_test("generator", "parsing", "function* count() { let i = 0; while (true) yield i++; }");

    // ========================================================================
    // Category: Parsing - Interfaces and Classes
    // ========================================================================
    suite.add_test("basic_interface", "parsing", "interface Person { name: string; age: number; }");
    suite.add_test(
        "interface_with_methods",
        "parsing",
        "interface Calculator { add(a: number, b: number): number; }",
    );
    suite.add_test("interface_extends", "parsing", "interface Employee extends Person { salary: number; }");
    suite.add_test("generic_interface", "parsing", "interface Box<T = string> { value: T; }");
    suite.add_test("basic_class", "parsing", "class Animal { name: string; }");
    suite.add_test(
        "class_with_constructor",
        "parsing",
        "class Point { constructor(public x: number, private y: number) {} }",
    );
    suite.add_test("class_extends", "parsing", "class Dog extends Animal { bark() {} }");
    suite.add_test("generic_class", "parsing", "class Container<T extends object> { items: T[] = []; }");
    suite.add_test("decorator_class", "parsing", "@Component({ selector: 'app' }) class AppComponent {}");
    suite.add_test("decorator_method", "parsing", "class C { @log method() {} }");
    suite.add_test("decorator_property", "parsing", "class C { @observable value = 1; }");
    suite.add_test("accessor_keyword", "parsing", "class C { accessor value = 1; }");
    suite.add_test("override_modifier", "parsing", "class D extends C { override m(): void {} }");

    // ========================================================================
    // Category: Parsing - Types
    // ========================================================================
    suite.add_test("type_alias_basic", "parsing", "type ID = string | number;");
    suite.add_test("type_alias_function", "parsing", "type Callback = (err: Error | null) => void;");
    suite.add_test("intersection_type", "parsing", "type Both = A & B & { extra: true };");
    suite.add_test("mapped_type_basic", "parsing", "type Readonly<T> = { readonly [P in keyof T]: T[P]; };");
    suite.add_test("mapped_type_partial", "parsing", "type Partial<T> = { [P in keyof T]?: T[P]; };");
    suite.add_test("mapped_type_remapping", "parsing", "type Getters<T> = { [K in keyof T as `get${K & string}`]: () => T[K] };");
    suite.add_test("conditional_type_basic", "parsing", "type IsString<T> = T extends string ? true : false;");
    suite.add_test(
        "conditional_type_nested",
        "parsing",
        "type NonNullable<T> = T extends null | undefined ? never : T;",
    );
    suite.add_test("typeof_type", "parsing", "type Config = typeof defaults;");
    suite.add_test("unique_symbol", "parsing", "declare const tag: unique symbol;");
    suite.add_test("readonly_array", "parsing", "type R = readonly string[];");
    suite.add_test("optional_tuple", "parsing", "type T = [string, number?];");
    suite.add_test("import_type", "parsing", "type M = import('./module').Config<string>;");
    suite.add_test("abstract_constructor_type", "parsing", "type Ctor = abstract new (...args: any[]) => object;");
    suite.add_test("const_type_parameter", "parsing", "function f<const T extends readonly unknown[]>(x: T): T { return x; }");
    suite.add_test("variance_annotations", "parsing", "interface State<in out T> { get(): T; set(v: T): void; }");

    // ========================================================================
    // Category: Parsing - Expressions
    // ========================================================================
    suite.add_test("optional_chaining_property", "parsing", "const n = user?.profile?.name;");
    suite.add_test("optional_chaining_method", "parsing", "const r = api?.fetch?.(url);");
    suite.add_test("nullish_coalescing", "parsing", "const v = a ?? b ?? 'default';");
    suite.add_test("logical_assignment", "parsing", "a ||= b; c &&= d; e ??= f;");
    suite.add_test("spread_array", "parsing", "const all = [...first, ...second];");
    suite.add_test("spread_object", "parsing", "const merged = { ...defaults, ...options };");
    suite.add_test("destructuring_object", "parsing", "const { a, b: { c } } = obj;");
    suite.add_test("destructuring_array", "parsing", "const [head, ...tail] = list;");
    suite.add_test("template_literal", "parsing", "const msg = `Hello, ${name}! You are ${age} years old.`;");
    suite.add_test("non_null_assertion", "parsing", "const el = document.getElementById('x')!.value;");
    suite.add_test("satisfies_operator", "parsing", "const palette = { red: [255, 0, 0] } satisfies Record<string, number[]>;");
    suite.add_test("class_expression", "parsing", "const K = class extends Base { };");
    suite.add_test("import_meta", "parsing", "const url = import.meta.url;");
    suite.add_test("dynamic_import", "parsing", "const mod = await import('./mod');");
    suite.add_test("new_target", "parsing", "function F() { if (!new.target) throw 1; }");
    suite.add_test("bigint_and_separators", "parsing", "const big = 1_000_000n + 0xFF_FFn;");
    suite.add_test("regex_after_paren", "parsing", "if (/^a/.test(s)) {}");
    suite.add_test("private_name_in", "parsing", "class C { #x = 1; static is(o: object) { return #x in o; } }");

    // ========================================================================
    // Category: Parsing - Modules
    // ========================================================================
    suite.add_test("import_default", "parsing", "import React from 'react';");
    suite.add_test("import_named", "parsing", "import { useState, useEffect } from 'react';");
    suite.add_test("import_type_only_specifier", "parsing", "import { type Props, render } from './view';");
    suite.add_test("export_named", "parsing", "export const PI = 3.14;");
    suite.add_test("export_default", "parsing", "export default function main() {}");
    suite.add_test("export_star_as", "parsing", "export * as utils from './utils';");
    suite.add_test("export_as_namespace", "parsing", "export as namespace MyLib;");
    suite.add_test("ambient_module", "parsing", "declare module 'lib' { export function f(): void; }");
    suite.add_test("global_augmentation", "parsing", "export {}; declare global { interface Array<T> { last(): T; } }");

    // ========================================================================
    // Category: Recovery
    // ========================================================================
    suite.add_test_expecting("missing_initializer", "recovery", "const x = ;", &[1109]);
    suite.add_test_expecting("missing_semicolon", "recovery", "let a = 1 let b = 2;", &[1005]);
    suite.add_test_expecting("unclosed_block", "recovery", "function f() {", &[1005]);
    suite.add_test_expecting("exponent_of_unary", "recovery", "const y = -x ** 2;", &[17006]);
    suite.add_test_expecting("empty_type_arguments", "recovery", "let x: Array<> = [];", &[1099]);
    suite.add_test_expecting("unterminated_string", "recovery", "const s = 'abc", &[1002]);

    // ========================================================================
    // Category: JSX
    // ========================================================================
    suite.add_test("jsx_element", "jsx", "const a = <div id=\"x\">{label}</div>;");
    suite.add_test("jsx_self_closing", "jsx", "const b = <Input value={v} {...rest} />;");
    suite.add_test("jsx_fragment", "jsx", "const c = <><A /><B /></>;");
    suite.add_test("jsx_namespaced", "jsx", "const d = <svg:rect xlink:href=\"#a\" />;");
    suite.add_test("jsx_member_tag", "jsx", "const e = <Foo.Bar>text</Foo.Bar>;");
    suite.add_test("jsx_generic_arrow", "jsx", "const id = <T,>(x: T) => x;");
    suite.add_test_expecting("jsx_mismatched_tag", "jsx", "const f = <a></b>;", &[17002]);

    println!("{}", suite.summary());

    let failures = suite.failures();
    assert!(failures.is_empty(), "{}", suite.summary());
}
