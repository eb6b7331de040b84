//! Declaration-signature query tests.

use tsdecl_ast::query::{
    documentation, find_interface, has_member_named, interfaces, type_references, MemberKind,
};
use tsdecl_ast::{SourceFile, SyntaxKind};
use tsdecl_ast::utilities::of_kind;
use tsdecl_parser::{parse_source_file, ParseOptions};

/// Helper: parse source text as a declaration file.
fn parse_dts(source: &str) -> SourceFile {
    let file = parse_source_file("api.d.ts", source, &ParseOptions::default()).unwrap();
    assert!(file.parse_diagnostics.is_empty(), "{:?}", file.parse_diagnostics);
    file
}

const API: &str = r#"
/** A page of results. */
export interface Page<T> extends Iterable<T> {
    readonly items: T[];
    next?: string;
    map<U>(f: (item: T) => U, ...rest: unknown[]): Page<U>;
    [index: number]: T;
    (): void;
}

/**
 * @deprecated use Page
 */
export type Legacy = { "quoted-name": number; 42: string };

export declare class Client implements Closeable {
    static create(url?: string): Client;
    constructor(url: string);
    get open(): boolean;
    private state;
}

declare namespace Internal {
    interface Hidden { secret: symbol }
}

type NotAnInterface = string | number;
"#;

// ============================================================================
// Interfaces
// ============================================================================

#[test]
fn test_interfaces_in_document_order() {
    let file = parse_dts(API);
    let names: Vec<_> = interfaces(&file).into_iter().map(|info| (info.name, info.declaration_kind)).collect();
    assert_eq!(
        names,
        vec![
            ("Page".to_string(), "interface"),
            ("Legacy".to_string(), "type"),
            ("Client".to_string(), "class"),
            ("Hidden".to_string(), "interface"),
        ]
    );
}

#[test]
fn test_interface_info_header() {
    let file = parse_dts(API);
    let page = find_interface(&file, "Page").unwrap();
    assert_eq!(page.type_parameters, vec!["T"]);
    assert_eq!(page.extends, vec!["Iterable<T>"]);
    assert_eq!(page.documentation.as_deref(), Some("A page of results."));
    assert!(!page.deprecated);

    let legacy = find_interface(&file, "Legacy").unwrap();
    assert!(legacy.deprecated);
    assert_eq!(legacy.documentation, None);

    let client = find_interface(&file, "Client").unwrap();
    assert_eq!(client.extends, vec!["Closeable"]);
}

#[test]
fn test_member_signatures() {
    let file = parse_dts(API);
    let page = find_interface(&file, "Page").unwrap();
    let kinds: Vec<_> = page.members.iter().map(|member| member.kind).collect();
    assert_eq!(
        kinds,
        vec![MemberKind::Property, MemberKind::Property, MemberKind::Method, MemberKind::IndexSignature, MemberKind::CallSignature]
    );

    let items = &page.members[0];
    assert_eq!(items.name.as_deref(), Some("items"));
    assert!(items.readonly);
    assert_eq!(items.type_text.as_deref(), Some("T[]"));

    let next = &page.members[1];
    assert!(next.optional);

    let map = &page.members[2];
    assert_eq!(map.type_parameters, vec!["U"]);
    assert_eq!(map.parameters.len(), 2);
    assert_eq!(map.parameters[0].type_text.as_deref(), Some("(item: T) => U"));
    assert!(map.parameters[1].rest);
    assert_eq!(map.type_text.as_deref(), Some("Page<U>"));

    assert_eq!(page.members[4].name, None);
}

#[test]
fn test_class_members() {
    let file = parse_dts(API);
    let client = find_interface(&file, "Client").unwrap();
    let kinds: Vec<_> = client.members.iter().map(|member| member.kind).collect();
    assert_eq!(
        kinds,
        vec![MemberKind::Method, MemberKind::Constructor, MemberKind::GetAccessor, MemberKind::Property]
    );
    assert!(client.members[0].is_static);
    assert!(client.members[0].parameters[0].optional);
    assert_eq!(client.members[3].type_text, None);
}

#[test]
fn test_literal_property_names() {
    let file = parse_dts(API);
    let legacy = find_interface(&file, "Legacy").unwrap();
    let names: Vec<_> = legacy.members.iter().filter_map(|member| member.name.clone()).collect();
    assert_eq!(names, vec!["quoted-name", "42"]);
}

#[test]
fn test_interface_info_serializes() {
    let file = parse_dts("interface A { b?: string }");
    let info = find_interface(&file, "A").unwrap();
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["name"], "A");
    assert_eq!(json["members"][0]["kind"], "property");
    assert_eq!(json["members"][0]["optional"], true);
}

// ============================================================================
// Other queries
// ============================================================================

#[test]
fn test_type_references_deduplicated() {
    let file = parse_dts("declare function f(a: Map<Key, Value>, b: Key, c: ns.Inner): Promise<Value>;");
    let function = of_kind(&file.arena, file.root, SyntaxKind::FunctionDeclaration)[0];
    assert_eq!(type_references(&file, function), vec!["Map", "Key", "Value", "ns.Inner", "Promise"]);
}

#[test]
fn test_has_member_named() {
    let file = parse_dts(API);
    let interface = of_kind(&file.arena, file.root, SyntaxKind::InterfaceDeclaration)[0];
    assert!(has_member_named(&file, interface, "items"));
    assert!(has_member_named(&file, interface, "map"));
    assert!(!has_member_named(&file, interface, "missing"));
}

#[test]
fn test_documentation_uses_last_block() {
    let file = parse_dts("/** first */\n/** second */\ndeclare const x: number;");
    let statement = file.statements().first().unwrap();
    assert_eq!(documentation(&file, statement).as_deref(), Some("second"));
}
