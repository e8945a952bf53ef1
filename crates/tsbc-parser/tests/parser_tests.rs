use crate::parser::node::NodeArena;
use crate::parser::syntax_kind_ext;
use crate::parser::{NodeIndex, node_flags};
use crate::parse_surface;
use tsbc_scanner::SyntaxKind;

fn parse_ok(source: &str) -> (NodeArena, Vec<NodeIndex>) {
    let (arena, root, diagnostics) = parse_surface("test.d.ts", source);
    assert!(
        diagnostics.is_empty(),
        "unexpected diagnostics: {diagnostics:?}"
    );
    let statements = arena.statements(root).to_vec();
    (arena, statements)
}

fn name_of(arena: &NodeArena, decl: NodeIndex) -> String {
    let name = arena.declaration_name(decl);
    arena.property_name_text(name).unwrap_or("").to_string()
}

#[test]
fn test_interface_with_heritage_and_members() {
    let (arena, statements) = parse_ok(
        "export interface Derived<T> extends Base, Other<T> {\n  a: string;\n  b?: number,\n  readonly c: T[]\n  m(x: string): void;\n}",
    );
    assert_eq!(statements.len(), 1);
    let node = arena.get(statements[0]).unwrap();
    assert_eq!(node.kind, syntax_kind_ext::INTERFACE_DECLARATION);
    let data = arena.get_interface(node).unwrap();
    assert_eq!(arena.identifier_text(data.name), Some("Derived"));
    assert!(arena.has_modifier(data.modifiers.as_ref(), SyntaxKind::ExportKeyword));
    assert_eq!(data.type_parameters.as_ref().map(|l| l.len()), Some(1));

    let heritage = data.heritage_clauses.as_ref().unwrap();
    let clause = arena.get_heritage_clause(arena.get(heritage.nodes[0]).unwrap()).unwrap();
    assert_eq!(clause.token, SyntaxKind::ExtendsKeyword as u16);
    assert_eq!(clause.types.len(), 2);

    let members: Vec<_> = data.members.iter().collect();
    assert_eq!(members.len(), 4);
    let b = arena.get_signature(arena.get(members[1]).unwrap()).unwrap();
    assert!(b.question_token);
    let c = arena.get(members[2]).unwrap();
    assert!(arena.has_modifier(
        arena.get_signature(c).unwrap().modifiers.as_ref(),
        SyntaxKind::ReadonlyKeyword
    ));
    assert_eq!(arena.get(members[3]).unwrap().kind, syntax_kind_ext::METHOD_SIGNATURE);
}

#[test]
fn test_call_and_construct_signatures() {
    let (arena, statements) = parse_ok(
        "interface Routes {\n  (path: '/a'): A;\n  (path: '/b/{id}', id: string): B;\n  new (x: number): C;\n}",
    );
    let data = arena.get_interface(arena.get(statements[0]).unwrap()).unwrap();
    let kinds: Vec<u16> = data.members.iter().map(|m| arena.get(m).unwrap().kind).collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::CALL_SIGNATURE,
            syntax_kind_ext::CALL_SIGNATURE,
            syntax_kind_ext::CONSTRUCT_SIGNATURE
        ]
    );
    let second = arena.get_signature(arena.get(data.members.nodes[1]).unwrap()).unwrap();
    assert_eq!(second.parameters.as_ref().map(|p| p.len()), Some(2));
    assert_eq!(arena.node_text(data.members.nodes[0]), "(path: '/a'): A");
}

#[test]
fn test_keywords_as_member_names() {
    let (arena, statements) =
        parse_ok("interface A { readonly: boolean; get: string; type?: string; new: number; default(): void }");
    let data = arena.get_interface(arena.get(statements[0]).unwrap()).unwrap();
    let names: Vec<String> = data.members.iter().map(|m| name_of(&arena, m)).collect();
    assert_eq!(names, vec!["readonly", "get", "type", "new", "default"]);
}

#[test]
fn test_quoted_and_numeric_member_names() {
    let (arena, statements) = parse_ok("interface H { 'x-requestid': string; \"Accept\"?: string; 42: number }");
    let data = arena.get_interface(arena.get(statements[0]).unwrap()).unwrap();
    let names: Vec<String> = data.members.iter().map(|m| name_of(&arena, m)).collect();
    assert_eq!(names, vec!["x-requestid", "Accept", "42"]);
}

#[test]
fn test_class_members() {
    let source = r#"export declare class Client extends Base implements IClient {
    private secret;
    #hidden: number;
    static readonly version: string;
    protected name?: string;
    constructor(endpoint: string, options?: Options);
    constructor(p1: string, p2: string) {}
    get value(): number;
    set value(v: number);
    run(a: string): Promise<void>;
    run(a: number): Promise<void>;
    [key: string]: unknown;
    count = 0;
}"#;
    let (arena, statements) = parse_ok(source);
    let class = arena.get_class(arena.get(statements[0]).unwrap()).unwrap();
    assert_eq!(arena.identifier_text(class.name), Some("Client"));
    let kinds: Vec<u16> = class.members.iter().map(|m| arena.get(m).unwrap().kind).collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::CONSTRUCTOR,
            syntax_kind_ext::CONSTRUCTOR,
            syntax_kind_ext::GET_ACCESSOR,
            syntax_kind_ext::SET_ACCESSOR,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::INDEX_SIGNATURE,
            syntax_kind_ext::PROPERTY_DECLARATION,
        ]
    );
    assert_eq!(
        arena.node_text(class.members.nodes[5]),
        "constructor(p1: string, p2: string) {}"
    );
    assert_eq!(
        arena.node_text(class.members.nodes[4]),
        "constructor(endpoint: string, options?: Options);"
    );
    let hidden = arena.get(class.members.nodes[1]).unwrap();
    let hidden_name = arena.get_property_decl(hidden).unwrap().name;
    assert_eq!(
        arena.get(hidden_name).unwrap().kind,
        SyntaxKind::PrivateIdentifier as u16
    );
}

#[test]
fn test_function_overloads_and_bodies() {
    let (arena, statements) = parse_ok(
        "export function f(a: string): string;\nexport function f(a: number): number;\nexport function f(a: any): any { return a; }",
    );
    assert_eq!(statements.len(), 3);
    let bodies: Vec<bool> = statements
        .iter()
        .map(|s| arena.get_function(arena.get(*s).unwrap()).unwrap().body.is_some())
        .collect();
    assert_eq!(bodies, vec![false, false, true]);
}

#[test]
fn test_parameters_with_rest_optional_and_defaults() {
    let (arena, statements) =
        parse_ok("function g(this: Window, a?: string, { b }: Opts = {}, ...rest: number[]) {}");
    let func = arena.get_function(arena.get(statements[0]).unwrap()).unwrap();
    let params: Vec<_> = func
        .parameters
        .iter()
        .map(|p| arena.get_parameter(arena.get(p).unwrap()).unwrap().clone())
        .collect();
    assert_eq!(params.len(), 4);
    assert!(params[1].question_token);
    assert_eq!(
        arena.get(params[2].name).unwrap().kind,
        syntax_kind_ext::BINDING_PATTERN
    );
    assert!(params[2].initializer.is_some());
    assert!(params[3].dot_dot_dot_token);
}

#[test]
fn test_enums_and_const_enums() {
    let (arena, statements) =
        parse_ok("export enum Color { Red, Green = 'green', 'Blue' = 1 << 2 }\nexport const enum K { A }");
    let color = arena.get(statements[0]).unwrap();
    let data = arena.get_enum(color).unwrap();
    let names: Vec<String> = data.members.iter().map(|m| name_of(&arena, m)).collect();
    assert_eq!(names, vec!["Red", "Green", "Blue"]);
    assert_eq!(color.flags & node_flags::CONST, 0);
    assert_ne!(arena.get(statements[1]).unwrap().flags & node_flags::CONST, 0);
}

#[test]
fn test_skipped_statements() {
    let source = r#"import { A } from './a';
import type { B } from "./b";
export { C } from './c';
export * from './d';
declare function createClient(): void;
export default createClient;
export = Foo;
export as namespace Lib;
declare namespace NS.Inner { const x: number; }
declare module "m" { export interface Hidden {} }
declare global { interface Window { x: number } }
export declare const version: string, other: number;
//# sourceMappingURL=test.d.ts.map"#;
    let (arena, statements) = parse_ok(source);
    let kinds: Vec<u16> = statements.iter().map(|s| arena.get(*s).unwrap().kind).collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::IMPORT_DECLARATION,
            syntax_kind_ext::IMPORT_DECLARATION,
            syntax_kind_ext::EXPORT_DECLARATION,
            syntax_kind_ext::EXPORT_DECLARATION,
            syntax_kind_ext::FUNCTION_DECLARATION,
            syntax_kind_ext::EXPORT_ASSIGNMENT,
            syntax_kind_ext::EXPORT_ASSIGNMENT,
            syntax_kind_ext::EXPORT_DECLARATION,
            syntax_kind_ext::MODULE_DECLARATION,
            syntax_kind_ext::MODULE_DECLARATION,
            syntax_kind_ext::MODULE_DECLARATION,
            syntax_kind_ext::VARIABLE_STATEMENT,
        ]
    );
    let global = arena.get(statements[10]).unwrap();
    assert_ne!(global.flags & node_flags::GLOBAL_AUGMENTATION, 0);
    let vars = arena.get_variable(arena.get(statements[11]).unwrap()).unwrap();
    assert_eq!(vars.declarations.len(), 2);
}

#[test]
fn test_class_property_initializer_without_semicolon() {
    let (arena, statements) = parse_ok("class A {\n  x = () => { return 1 }\n  y: string\n}");
    let class = arena.get_class(arena.get(statements[0]).unwrap()).unwrap();
    let names: Vec<String> = class.members.iter().map(|m| name_of(&arena, m)).collect();
    assert_eq!(names, vec!["x", "y"]);
}

#[test]
fn test_missing_brace_reports_diagnostic() {
    let (_, _, diagnostics) = parse_surface("bad.d.ts", "export interface A { a: string;");
    assert!(!diagnostics.is_empty());
    assert_eq!(diagnostics[0].code, 1005);
    assert_eq!(diagnostics[0].file, "bad.d.ts");
}

#[test]
fn test_garbage_reports_declaration_expected() {
    let (_, _, diagnostics) = parse_surface("bad.d.ts", "export interface A {}\n%%%\n");
    assert!(diagnostics.iter().any(|d| d.code == 1128));
}
