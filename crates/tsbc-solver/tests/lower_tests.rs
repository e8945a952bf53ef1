use crate::intern::TypeInterner;
use crate::lower::SurfaceTypes;
use crate::types::{TypeData, TypeId};
use tsbc_binder::{DeclarationIndex, MemberKey};
use tsbc_parser::parse_surface;

struct Lowered {
    index: DeclarationIndex,
    types: SurfaceTypes,
    interner: TypeInterner,
}

fn lower(source: &str) -> Lowered {
    let (arena, root, diagnostics) = parse_surface("test.d.ts", source);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let index = DeclarationIndex::new(arena, root);
    let mut interner = TypeInterner::new();
    let types = SurfaceTypes::lower(&index, &mut interner);
    Lowered { index, types, interner }
}

impl Lowered {
    fn member(&self, owner: &str, name: &str) -> &tsbc_binder::Member {
        let id = self.index.find(owner).unwrap();
        self.index
            .effective_members(id)
            .unwrap()
            .get(&MemberKey::Instance(name.to_string()))
            .unwrap()
    }

    fn prop(&self, owner: &str, name: &str) -> TypeId {
        self.types.type_of(self.member(owner, name).type_node).unwrap()
    }

    fn method(&self, owner: &str, name: &str) -> TypeId {
        self.types.type_of(self.member(owner, name).signatures[0]).unwrap()
    }
}

#[test]
fn test_alias_is_inlined() {
    let l = lower("type Id = string;\ninterface A { x: Id; y: string }");
    assert_eq!(l.prop("A", "x"), TypeId::STRING);
    assert_eq!(l.prop("A", "x"), l.prop("A", "y"));
}

#[test]
fn test_generic_alias_arguments_are_substituted() {
    let l = lower(
        "type Box<T> = { value: T };\ninterface A { a: Box<number>; b: { value: number }; c: Box<string> }",
    );
    assert_eq!(l.prop("A", "a"), l.prop("A", "b"));
    assert_ne!(l.prop("A", "a"), l.prop("A", "c"));
}

#[test]
fn test_record_lowers_to_index_signature() {
    let l = lower(
        "interface A { a: Record<string, number>; b: { [key: string]: number }; c: Record<\"x\" | \"y\", boolean>; d: { x: boolean; y: boolean } }",
    );
    assert_eq!(l.prop("A", "a"), l.prop("A", "b"));
    assert_eq!(l.prop("A", "c"), l.prop("A", "d"));
}

#[test]
fn test_mapped_type_over_literal_keys() {
    let l = lower(
        "interface A { m: { [K in \"a\" | \"b\"]?: string }; o: { a?: string; b?: string } }",
    );
    assert_eq!(l.prop("A", "m"), l.prop("A", "o"));
}

#[test]
fn test_array_spellings_agree() {
    let l = lower(
        "interface A { a: string[]; b: Array<string>; c: readonly string[]; d: ReadonlyArray<string> }",
    );
    assert_eq!(l.prop("A", "a"), l.prop("A", "b"));
    assert_eq!(l.prop("A", "c"), l.prop("A", "d"));
    assert_ne!(l.prop("A", "a"), l.prop("A", "c"));
}

#[test]
fn test_union_order_and_parentheses_do_not_matter() {
    let l = lower("interface A { a: \"x\" | (\"y\" | null); b: null | \"y\" | \"x\" }");
    assert_eq!(l.prop("A", "a"), l.prop("A", "b"));
}

#[test]
fn test_recursive_alias_terminates() {
    let l = lower("type Json = string | Json[];\ninterface A { j: Json }");
    let j = l.prop("A", "j");
    assert!(matches!(l.interner.lookup(j), Some(TypeData::Union(_))));
    assert!(l.interner.display(j).contains("Json[]"), "{}", l.interner.display(j));
}

#[test]
fn test_type_parameters_are_positional() {
    let l = lower("interface A { f<T>(x: T): T; g<U>(y: U): U; h<U>(y: U): string }");
    assert_eq!(l.method("A", "f"), l.method("A", "g"));
    assert_ne!(l.method("A", "f"), l.method("A", "h"));
}

#[test]
fn test_this_parameter_is_not_part_of_the_signature() {
    let l = lower(
        "export declare function f(this: Window, x: string): void;\nexport declare function g(x: string): void;",
    );
    let f = l.index.overloads(l.index.find("f").unwrap())[0];
    let g = l.index.overloads(l.index.find("g").unwrap())[0];
    assert_eq!(l.types.type_of(f), l.types.type_of(g));
}

#[test]
fn test_interface_shape_includes_inherited_members() {
    let mut l = lower("interface Base { a: string }\ninterface Leaf extends Base { b: number }\ninterface Flat { a: string; b: number }");
    let leaf = l.interner.intern_string("Leaf");
    let flat = l.interner.intern_string("Flat");
    let leaf_shape = l.types.interface_shape(leaf).unwrap();
    assert_eq!(Some(leaf_shape), l.types.interface_shape(flat));
}

#[test]
fn test_generic_base_members_are_bound_per_container() {
    let l = lower(
        "interface Base<T> { p: T; get(key: T): T }\ninterface S extends Base<string> {}\ninterface N extends Base<number> {}",
    );
    let s = l.index.find("S").unwrap();
    let n = l.index.find("N").unwrap();
    let p = l.member("S", "p").type_node;
    assert_eq!(l.types.type_in(s, p), Some(TypeId::STRING));
    assert_eq!(l.types.type_in(n, p), Some(TypeId::NUMBER));
    assert!(matches!(l.interner.lookup(l.prop("Base", "p")), Some(TypeData::TypeParameter { .. })));

    let get = l.member("S", "get").signatures[0];
    assert_ne!(l.types.type_in(s, get), l.types.type_in(n, get));
    assert_eq!(l.types.bound_type(l.index.find("Base").unwrap(), p), None);
}

#[test]
fn test_heritage_arguments_flow_through_intermediate_bases() {
    let l = lower(
        "interface Grand<T> { p: T }\ninterface Mid<U> extends Grand<U[]> {}\ninterface Leaf extends Mid<string> { q: string[] }",
    );
    let leaf = l.index.find("Leaf").unwrap();
    let p = l.member("Leaf", "p").type_node;
    assert_eq!(l.types.type_in(leaf, p), Some(l.prop("Leaf", "q")));
}

#[test]
fn test_interface_shape_binds_generic_base() {
    let mut l = lower("interface Base<T> { a: T }\ninterface Leaf extends Base<string> { b: number }\ninterface Flat { a: string; b: number }");
    let leaf = l.interner.intern_string("Leaf");
    let flat = l.interner.intern_string("Flat");
    assert_eq!(l.types.interface_shape(leaf), l.types.interface_shape(flat));
}

#[test]
fn test_unknown_forms_are_opaque_by_text() {
    let l = lower("interface A { a: T extends string ? 1 : 2; b: T extends string?1:2 }");
    assert!(matches!(l.interner.lookup(l.prop("A", "a")), Some(TypeData::Opaque(_))));
    assert_eq!(l.prop("A", "a"), l.prop("A", "b"));
}
