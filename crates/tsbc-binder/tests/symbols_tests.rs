use crate::state::DeclarationIndex;
use crate::symbols::{DeclarationKind, symbol_flags};
use tsbc_parser::parse_surface;

fn index(source: &str) -> DeclarationIndex {
    let (arena, root, diagnostics) = parse_surface("test.d.ts", source);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    DeclarationIndex::new(arena, root)
}

#[test]
fn test_binds_every_declaration_kind() {
    let index = index(
        r#"export interface I { a: string }
export declare class C {}
export declare function f(): void;
export type T = string;
export declare enum E { A }
export declare const v: number;
declare namespace NS.Inner {}
declare global { interface Window {} }
interface Local {}"#,
    );
    let names: Vec<&str> = index.names().collect();
    assert_eq!(names, vec!["I", "C", "f", "T", "E", "v", "NS.Inner", "Local"]);
    assert_eq!(index.declaration_kind("I"), Some(DeclarationKind::Interface));
    assert_eq!(index.declaration_kind("C"), Some(DeclarationKind::Class));
    assert_eq!(index.declaration_kind("f"), Some(DeclarationKind::Function));
    assert_eq!(index.declaration_kind("T"), Some(DeclarationKind::TypeAlias));
    assert_eq!(index.declaration_kind("E"), Some(DeclarationKind::Enum));
    assert_eq!(index.declaration_kind("v"), Some(DeclarationKind::Variable));
    assert_eq!(index.declaration_kind("NS.Inner"), Some(DeclarationKind::Namespace));
    assert_eq!(index.find("Window"), None);

    let local = index.symbol(index.find("Local").unwrap()).unwrap();
    assert!(!local.is_exported);
    assert!(index.symbol(index.find("I").unwrap()).unwrap().is_exported);
}

#[test]
fn test_merged_declarations_share_one_symbol() {
    let index = index("export interface A { x: string }\nexport interface A { y: number }\nexport declare class K {}\nexport interface K { extra: string }");
    let a = index.symbol(index.find("A").unwrap()).unwrap();
    assert_eq!(a.declarations.len(), 2);
    let k = index.symbol(index.find("K").unwrap()).unwrap();
    assert!(k.has_flags(symbol_flags::CLASS | symbol_flags::INTERFACE));
    assert_eq!(k.kind(), Some(DeclarationKind::Class));
}

#[test]
fn test_overloads_exclude_implementation() {
    let index = index(
        "export function f(a: string): string;\nexport function f(a: number): number;\nexport function f(a: any): any { return a; }\nexport function g(): void {}",
    );
    assert_eq!(index.overloads(index.find("f").unwrap()).len(), 2);
    assert_eq!(index.overloads(index.find("g").unwrap()).len(), 1);
}

#[test]
fn test_resolve_alias_and_type_arguments() {
    let index = index("export type Box<T> = { value: T };\nexport interface U { m: Map<string, Box<number>> }");
    let alias = index.resolve_alias("Box").unwrap();
    assert_eq!(index.arena().node_text(alias), "{ value: T }");
    let decl = index.alias_declaration("Box").unwrap();
    assert_eq!(index.type_parameter_names(decl).as_slice(), &["T"]);
    assert_eq!(index.resolve_alias("U"), None);

    let members = index.effective_members(index.find("U").unwrap()).unwrap();
    let m = members.members.values().next().unwrap();
    let args = index.type_arguments(m.type_node);
    let texts: Vec<&str> = args.iter().map(|&a| index.arena().node_text(a)).collect();
    assert_eq!(texts, vec!["string", "Box<number>"]);
}

#[test]
fn test_enum_members_across_declarations() {
    let index = index("export enum Color { Red, Green }\nexport enum Color { Blue = 2 }");
    let members = index.enum_members(index.find("Color").unwrap());
    let names: Vec<&str> = members
        .iter()
        .filter_map(|&m| index.arena().property_name_text(index.arena().declaration_name(m)))
        .collect();
    assert_eq!(names, vec!["Red", "Green", "Blue"]);
}
