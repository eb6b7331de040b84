use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tsdecl_ast::LanguageVariant;
use tsdecl_parser::{parse_source_file, ParseOptions};
use tsdecl_scanner::tokenize;

// A declaration file in the shape generated bindings usually take
const DECLARATION_SOURCE: &str = r#"
/** Options accepted by the client constructor. */
export interface ClientOptions {
    /** Base URL of the service. */
    baseUrl: string;
    timeout?: number;
    readonly retries: number;
    headers: Record<string, string>;
    onError?(error: Error, attempt: number): void;
}

export interface Page<T> {
    items: T[];
    next: string | null;
    total: number;
}

export declare type Handler<T = unknown> = (event: T, context: { id: string }) => Promise<void> | void;
export type Keys<T> = { [K in keyof T]-?: T[K] extends Function ? never : K }[keyof T];
export type Unwrap<T> = T extends Promise<infer U> ? Unwrap<U> : T;

declare namespace Client.Internal {
    interface Request {
        method: 'GET' | 'POST' | 'PUT' | 'DELETE';
        path: `/${string}`;
        body?: unknown;
    }
    function send(request: Request): Promise<Response>;
}

export declare class Client {
    private readonly options;
    constructor(options: ClientOptions);
    get<T>(path: string, query?: Record<string, string | number>): Promise<T>;
    list<T>(path: string): AsyncIterable<Page<T>>;
    static create(options?: Partial<ClientOptions>): Client;
    get connected(): boolean;
    [key: string]: unknown;
}

export declare enum Status {
    Active = 1,
    Suspended,
    Deleted = "deleted"
}

export declare function paginate<T, K extends keyof T>(pages: Page<T>[], key: K): Array<T[K]>;
export { Client as default };
"#;

// Expression-heavy implementation code
const EXPRESSION_SOURCE: &str = r#"
const cache = new Map<string, Promise<unknown>>();
export async function load<T>(key: string, fetcher: () => Promise<T>): Promise<T> {
    const existing = cache.get(key) as Promise<T> | undefined;
    if (existing) return existing;
    const pending = fetcher().then((value) => {
        setTimeout(() => cache.delete(key), 1_000 * 60);
        return value;
    }, (error: unknown) => {
        cache.delete(key);
        throw error;
    });
    cache.set(key, pending);
    return pending;
}
const total = items.filter(x => x?.price != null).reduce((sum, { price, qty = 1 }) => sum + price * qty, 0);
const label = total > 100 ? `large: ${total.toFixed(2)}` : total > 10 ? "medium" : "small";
let flags = (a & 0xff) << 8 | (b >>> 2) ^ ~c;
"#;

fn bench_scan(c: &mut Criterion) {
    c.bench_function("scan_declarations", |b| {
        b.iter(|| black_box(tokenize(black_box(DECLARATION_SOURCE), LanguageVariant::Standard)));
    });
}

fn bench_parse_declarations(c: &mut Criterion) {
    let options = ParseOptions::default();
    c.bench_function("parse_declarations", |b| {
        b.iter(|| {
            let source_file = parse_source_file("bench.d.ts", black_box(DECLARATION_SOURCE), &options);
            black_box(source_file)
        });
    });
}

fn bench_parse_expressions(c: &mut Criterion) {
    let options = ParseOptions::default().with_js_doc(false);
    c.bench_function("parse_expressions", |b| {
        b.iter(|| {
            let source_file = parse_source_file("bench.ts", black_box(EXPRESSION_SOURCE), &options);
            black_box(source_file)
        });
    });
}

criterion_group!(benches, bench_scan, bench_parse_declarations, bench_parse_expressions);
criterion_main!(benches);
