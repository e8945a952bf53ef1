use crate::intern::{TypeInterner, normalize_type_text};
use crate::types::{ObjectShape, PropertyInfo, TypeData, TypeId};

#[test]
fn test_intrinsics_have_fixed_ids() {
    let interner = TypeInterner::new();
    assert_eq!(interner.display(TypeId::ANY), "any");
    assert_eq!(interner.display(TypeId::OBJECT), "object");
    assert_eq!(interner.display(TypeId::THIS), "this");
    assert_eq!(interner.display(TypeId::BOOLEAN_TRUE), "true");
    assert_eq!(interner.display(TypeId::BOOLEAN_FALSE), "false");
}

#[test]
fn test_union_is_order_insensitive() {
    let mut interner = TypeInterner::new();
    let a = interner.literal_string("a");
    let b = interner.literal_string("b");
    let ab = interner.union(vec![a, b]);
    let ba = interner.union(vec![b, a, b]);
    assert_eq!(ab, ba);

    let nested = interner.union(vec![ab, TypeId::NULL]);
    let flat = interner.union(vec![TypeId::NULL, b, a]);
    assert_eq!(nested, flat);
}

#[test]
fn test_union_reductions() {
    let mut interner = TypeInterner::new();
    assert_eq!(interner.union(vec![TypeId::STRING, TypeId::ANY]), TypeId::ANY);
    assert_eq!(interner.union(vec![TypeId::UNKNOWN, TypeId::NUMBER]), TypeId::UNKNOWN);
    assert_eq!(interner.union(vec![TypeId::STRING, TypeId::NEVER]), TypeId::STRING);
    assert_eq!(interner.union(vec![]), TypeId::NEVER);
    assert_eq!(
        interner.union(vec![TypeId::BOOLEAN_FALSE, TypeId::BOOLEAN_TRUE]),
        TypeId::BOOLEAN
    );
}

#[test]
fn test_intersection_reductions() {
    let mut interner = TypeInterner::new();
    assert_eq!(interner.intersection(vec![TypeId::STRING, TypeId::NEVER]), TypeId::NEVER);
    assert_eq!(interner.intersection(vec![TypeId::STRING, TypeId::UNKNOWN]), TypeId::STRING);
    assert_eq!(interner.intersection(vec![]), TypeId::UNKNOWN);
}

#[test]
fn test_numeric_literals_are_canonical() {
    let mut interner = TypeInterner::new();
    let hex = interner.literal_number("0x10");
    let separated = interner.literal_number("1_6");
    let plain = interner.literal_number("16");
    assert_eq!(hex, plain);
    assert_eq!(separated, plain);
    assert_ne!(interner.literal_number("-1"), interner.literal_number("1"));
    assert_ne!(plain, interner.literal_string("16"));
}

#[test]
fn test_object_properties_are_sorted() {
    let mut interner = TypeInterner::new();
    let x = interner.intern_string("x");
    let y = interner.intern_string("y");
    let first = interner.object(ObjectShape {
        properties: vec![PropertyInfo::new(y, TypeId::STRING), PropertyInfo::new(x, TypeId::NUMBER)],
        ..ObjectShape::default()
    });
    let second = interner.object(ObjectShape {
        properties: vec![PropertyInfo::new(x, TypeId::NUMBER), PropertyInfo::new(y, TypeId::STRING)],
        ..ObjectShape::default()
    });
    assert_eq!(first, second);
    let Some(TypeData::Object(shape)) = interner.lookup(first) else {
        panic!("expected object");
    };
    assert_eq!(shape.property(y).map(|p| p.type_id), Some(TypeId::STRING));
}

#[test]
fn test_opaque_ignores_whitespace() {
    let mut interner = TypeInterner::new();
    let a = interner.opaque("T extends string ? A : B");
    let b = interner.opaque("T extends string?A:B");
    assert_eq!(a, b);
    assert_eq!(normalize_type_text(" Map< string , number >\n"), "Map<string,number>");
}

#[test]
fn test_display_renders_structure() {
    let mut interner = TypeInterner::new();
    let name = interner.intern_string("name");
    let array = interner.array(TypeId::STRING);
    let object = interner.object(ObjectShape {
        properties: vec![PropertyInfo {
            name,
            type_id: array,
            optional: true,
            readonly: true,
        }],
        ..ObjectShape::default()
    });
    assert_eq!(interner.display(object), "{ readonly name?: string[]; }");
    let promise = interner.reference("Promise", vec![TypeId::VOID]);
    assert_eq!(interner.display(promise), "Promise<void>");
}
