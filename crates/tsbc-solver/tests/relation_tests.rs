use crate::intern::TypeInterner;
use crate::lower::SurfaceTypes;
use crate::relation::{RelationOptions, TypeRelation};
use crate::types::{FunctionShape, ParamInfo, TypeId};
use tsbc_binder::{DeclarationIndex, MemberKey};
use tsbc_parser::parse_surface;

struct Pair {
    interner: TypeInterner,
    source_index: DeclarationIndex,
    source: SurfaceTypes,
    target_index: DeclarationIndex,
    target: SurfaceTypes,
}

fn index(source: &str) -> DeclarationIndex {
    let (arena, root, diagnostics) = parse_surface("test.d.ts", source);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    DeclarationIndex::new(arena, root)
}

fn pair(source: &str, target: &str) -> Pair {
    let mut interner = TypeInterner::new();
    let source_index = index(source);
    let target_index = index(target);
    let source = SurfaceTypes::lower(&source_index, &mut interner);
    let target = SurfaceTypes::lower(&target_index, &mut interner);
    Pair {
        interner,
        source_index,
        source,
        target_index,
        target,
    }
}

fn prop(index: &DeclarationIndex, types: &SurfaceTypes, owner: &str, name: &str) -> TypeId {
    let members = index.effective_members(index.find(owner).unwrap()).unwrap();
    let member = members.get(&MemberKey::Instance(name.to_string())).unwrap();
    types.type_of(member.type_node).unwrap()
}

impl Pair {
    fn relation(&self, options: RelationOptions) -> TypeRelation<'_> {
        TypeRelation::new(&self.interner, &self.source, &self.target, options)
    }

    fn source_prop(&self, owner: &str, name: &str) -> TypeId {
        prop(&self.source_index, &self.source, owner, name)
    }

    fn target_prop(&self, owner: &str, name: &str) -> TypeId {
        prop(&self.target_index, &self.target, owner, name)
    }
}

fn function(interner: &mut TypeInterner, params: &[(TypeId, bool)], return_type: TypeId) -> TypeId {
    interner.function(FunctionShape {
        params: params
            .iter()
            .map(|&(type_id, optional)| ParamInfo {
                type_id,
                optional,
                rest: false,
            })
            .collect(),
        return_type,
        type_param_count: 0,
        is_constructor: false,
    })
}

#[test]
fn test_renamed_recursive_interfaces_are_equivalent() {
    let p = pair(
        "interface Holder { tree: TreeNode }\ninterface TreeNode { value: string; children: TreeNode[] }",
        "interface Holder { tree: Branch }\ninterface Branch { value: string; children: Branch[] }",
    );
    let (s, t) = (p.source_prop("Holder", "tree"), p.target_prop("Holder", "tree"));
    assert_ne!(s, t);
    assert!(p.relation(RelationOptions::default()).equivalent(s, t));
}

#[test]
fn test_renamed_interface_with_different_shape() {
    let p = pair(
        "interface Holder { tree: TreeNode }\ninterface TreeNode { value: string; children: TreeNode[] }",
        "interface Holder { tree: Branch }\ninterface Branch { value: number; children: Branch[] }",
    );
    let (s, t) = (p.source_prop("Holder", "tree"), p.target_prop("Holder", "tree"));
    assert!(!p.relation(RelationOptions::default()).equivalent(s, t));
}

#[test]
fn test_optionality_is_part_of_the_shape() {
    let p = pair(
        "interface Holder { v: A }\ninterface A { x?: string }",
        "interface Holder { v: B }\ninterface B { x: string }",
    );
    let (s, t) = (p.source_prop("Holder", "v"), p.target_prop("Holder", "v"));
    let mut relation = p.relation(RelationOptions::default());
    assert!(!relation.equivalent(s, t));
    assert!(!relation.is_assignable(s, t));

    let mut reversed = TypeRelation::new(&p.interner, &p.target, &p.source, RelationOptions::default());
    assert!(reversed.is_assignable(t, s));
}

#[test]
fn test_classes_compare_by_name() {
    let p = pair(
        "declare class Holder { v: A }\ndeclare class A { x: string }",
        "declare class Holder { v: B }\ndeclare class B { x: string }",
    );
    let (s, t) = (p.source_prop("Holder", "v"), p.target_prop("Holder", "v"));
    assert!(!p.relation(RelationOptions::default()).equivalent(s, t));
}

#[test]
fn test_same_name_references_compare_arguments() {
    let mut interner = TypeInterner::new();
    let a = interner.reference("Promise", vec![TypeId::STRING]);
    let b = interner.reference("Promise", vec![TypeId::NUMBER]);
    let c = interner.reference("Promise", vec![TypeId::ANY]);
    let surface = SurfaceTypes::default();
    let mut relation = TypeRelation::new(&interner, &surface, &surface, RelationOptions::default());
    assert!(!relation.equivalent(a, b));
    assert!(relation.equivalent(a, c));
}

#[test]
fn test_wildcards() {
    let interner = TypeInterner::new();
    let surface = SurfaceTypes::default();
    let mut lenient = TypeRelation::new(&interner, &surface, &surface, RelationOptions::default());
    assert!(lenient.equivalent(TypeId::ANY, TypeId::STRING));
    assert!(lenient.equivalent(TypeId::NUMBER, TypeId::UNKNOWN));

    let strict_options = RelationOptions {
        concrete_to_any_is_change: true,
    };
    let mut strict = TypeRelation::new(&interner, &surface, &surface, strict_options);
    assert!(!strict.equivalent(TypeId::ANY, TypeId::STRING));
    assert!(!strict.equivalent(TypeId::UNKNOWN, TypeId::STRING));
    assert!(strict.equivalent(TypeId::STRING, TypeId::ANY));
    assert!(strict.equivalent(TypeId::ANY, TypeId::UNKNOWN));
}

#[test]
fn test_unions_compare_as_sets_across_surfaces() {
    let p = pair(
        "interface Holder { v: A | null }\ninterface A { x: string }",
        "interface Holder { v: null | B }\ninterface B { x: string }",
    );
    let (s, t) = (p.source_prop("Holder", "v"), p.target_prop("Holder", "v"));
    assert!(p.relation(RelationOptions::default()).equivalent(s, t));
}

#[test]
fn test_literal_assignability() {
    let mut interner = TypeInterner::new();
    let literal = interner.literal_string("x");
    let options = interner.union(vec![literal, TypeId::NUMBER]);
    let surface = SurfaceTypes::default();
    let mut relation = TypeRelation::new(&interner, &surface, &surface, RelationOptions::default());
    assert!(relation.is_assignable(literal, TypeId::STRING));
    assert!(!relation.is_assignable(TypeId::STRING, literal));
    assert!(relation.is_assignable(literal, options));
    assert!(!relation.is_assignable(options, TypeId::STRING));
    assert!(relation.is_assignable(TypeId::NEVER, literal));
}

#[test]
fn test_function_assignability_by_arity() {
    let mut interner = TypeInterner::new();
    let one = function(&mut interner, &[(TypeId::STRING, false)], TypeId::VOID);
    let two = function(&mut interner, &[(TypeId::STRING, false), (TypeId::NUMBER, false)], TypeId::VOID);
    let two_optional = function(&mut interner, &[(TypeId::STRING, false), (TypeId::NUMBER, true)], TypeId::STRING);
    let surface = SurfaceTypes::default();
    let mut relation = TypeRelation::new(&interner, &surface, &surface, RelationOptions::default());
    assert!(relation.is_assignable(one, two));
    assert!(!relation.is_assignable(two, one));
    assert!(relation.is_assignable(two_optional, one));
    assert!(!relation.equivalent(two, two_optional));
}

#[test]
fn test_extra_properties_are_assignable() {
    let p = pair(
        "interface Holder { v: Wide }\ninterface Wide { a: string; b: number }",
        "interface Holder { v: Narrow }\ninterface Narrow { a: string }",
    );
    let (s, t) = (p.source_prop("Holder", "v"), p.target_prop("Holder", "v"));
    let mut relation = p.relation(RelationOptions::default());
    assert!(relation.is_assignable(s, t));
    assert!(!relation.equivalent(s, t));
}
