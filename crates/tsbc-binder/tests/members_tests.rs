use crate::members::{MemberKey, MemberKind};
use crate::state::DeclarationIndex;
use tsbc_parser::parse_surface;

fn index(source: &str) -> DeclarationIndex {
    let (arena, root, diagnostics) = parse_surface("test.d.ts", source);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    DeclarationIndex::new(arena, root)
}

fn keys(index: &DeclarationIndex, name: &str) -> Vec<String> {
    let id = index.find(name).unwrap();
    index
        .effective_members(id)
        .unwrap()
        .members
        .keys()
        .map(ToString::to_string)
        .collect()
}

fn instance(name: &str) -> MemberKey {
    MemberKey::Instance(name.to_string())
}

#[test]
fn test_inherited_members_follow_own_members() {
    let index = index(
        "interface Base { a: string; shared: number }\ninterface Mid extends Base { b: string }\ninterface Leaf extends Mid { shared: string; c: boolean }",
    );
    assert_eq!(keys(&index, "Leaf"), vec!["shared", "c", "b", "a"]);

    let leaf = index.effective_members(index.find("Leaf").unwrap()).unwrap();
    let shared = leaf.get(&instance("shared")).unwrap();
    assert_eq!(index.arena().node_text(shared.type_node), "string");
    assert_eq!(shared.declared_in, index.find("Leaf").unwrap());
    assert_eq!(leaf.get(&instance("a")).unwrap().declared_in, index.find("Base").unwrap());
}

#[test]
fn test_unresolved_base_contributes_nothing() {
    let index = index("interface A extends Missing, ns.Other<string> { x: string }");
    assert_eq!(keys(&index, "A"), vec!["x"]);
}

#[test]
fn test_cyclic_extends_terminates() {
    let index = index("interface A extends B { a: string }\ninterface B extends A { b: string }\ninterface Self extends Self { s: string }");
    assert_eq!(keys(&index, "A"), vec!["a", "b"]);
    assert_eq!(keys(&index, "B"), vec!["b", "a"]);
    assert_eq!(keys(&index, "Self"), vec!["s"]);
}

#[test]
fn test_interface_merging_later_shadows_earlier() {
    let index = index("interface A { x: string; y: string }\ninterface A { x: number; z: boolean }");
    assert_eq!(keys(&index, "A"), vec!["x", "y", "z"]);
    let members = index.effective_members(index.find("A").unwrap()).unwrap();
    let x = members.get(&instance("x")).unwrap();
    assert_eq!(index.arena().node_text(x.type_node), "number");
}

#[test]
fn test_member_flags_and_kinds() {
    let index = index(
        "interface A {\n  readonly r: string;\n  o?: number;\n  m(a: string): void;\n  m(a: number): void;\n  'x-id': string;\n  [key: string]: unknown;\n  [i: number]: string;\n  (x: string): void;\n  new (): A;\n}",
    );
    let members = index.effective_members(index.find("A").unwrap()).unwrap();
    assert!(members.get(&instance("r")).unwrap().readonly);
    assert!(members.get(&instance("o")).unwrap().optional);
    let m = members.get(&instance("m")).unwrap();
    assert_eq!(m.kind, MemberKind::Method);
    assert_eq!(m.signatures.len(), 2);
    assert!(members.get(&instance("x-id")).is_some());
    assert_eq!(
        members.get(&MemberKey::StringIndex).unwrap().kind,
        MemberKind::IndexSignature
    );
    assert!(members.get(&MemberKey::NumberIndex).is_some());
    assert_eq!(members.call_signatures.len(), 1);
    assert_eq!(members.construct_signatures.len(), 1);
}

#[test]
fn test_signature_lists_inherit_only_when_absent() {
    let index = index(
        "interface Base { (x: string): void; new (): Base }\ninterface Own extends Base { (x: number): void }\ninterface Bare extends Base {}",
    );
    let own = index.effective_members(index.find("Own").unwrap()).unwrap();
    assert_eq!(own.call_signatures.len(), 1);
    assert_eq!(
        index.arena().node_text(own.call_signatures[0]),
        "(x: number): void"
    );
    assert_eq!(own.construct_signatures.len(), 1);
    let bare = index.effective_members(index.find("Bare").unwrap()).unwrap();
    assert_eq!(bare.call_signatures.len(), 1);
}

#[test]
fn test_class_members_exclude_private_and_split_static() {
    let index = index(
        r#"export declare class Client extends Base implements IClient {
    private secret;
    #hidden: number;
    static readonly version: string;
    protected name?: string;
    constructor(endpoint: string, options?: Options);
    constructor(public readonly endpoint: string, private key: string, options?: Options) {}
    get value(): number;
    get both(): string;
    set both(v: string);
    set onlySet(v: boolean);
    run(a: string): Promise<void>;
    run(a: number): Promise<void>;
    run(a: any): Promise<void> {}
    static create(): Client;
}
declare class Base { inherited: string; constructor(x: number); }
interface IClient { fromInterface: string }"#,
    );
    let members = index.effective_members(index.find("Client").unwrap()).unwrap();
    let keys: Vec<String> = members.members.keys().map(ToString::to_string).collect();
    assert_eq!(
        keys,
        vec![
            "static version",
            "name",
            "endpoint",
            "value",
            "both",
            "onlySet",
            "run",
            "static create",
            "inherited"
        ]
    );
    assert!(members.get(&instance("value")).unwrap().readonly);
    assert!(!members.get(&instance("both")).unwrap().readonly);
    assert!(!members.get(&instance("onlySet")).unwrap().readonly);
    assert!(members.get(&instance("endpoint")).unwrap().readonly);
    assert_eq!(members.get(&instance("run")).unwrap().signatures.len(), 2);
    assert_eq!(members.constructors.len(), 1);
    assert_eq!(
        index.arena().node_text(members.constructors[0]),
        "constructor(endpoint: string, options?: Options);"
    );
}

#[test]
fn test_class_without_constructor_inherits_base_constructors() {
    let index = index("declare class Base { constructor(x: number); }\ndeclare class Derived extends Base { y: string }");
    let derived = index.index_constructors("Derived");
    assert_eq!(derived, vec!["constructor(x: number);"]);
}

impl DeclarationIndex {
    fn index_constructors(&self, name: &str) -> Vec<&str> {
        self.constructors(self.find(name).unwrap())
            .iter()
            .map(|&c| self.arena().node_text(c))
            .collect()
    }
}
