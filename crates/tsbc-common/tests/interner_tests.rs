use crate::interner::{Atom, Interner};

#[test]
fn test_intern_returns_same_atom_for_same_text() {
    let mut interner = Interner::new();
    let a = interner.intern("ClustersGet");
    let b = interner.intern("ClustersGet");
    let c = interner.intern("ClusterGetOld");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.resolve(c), "ClusterGetOld");
}

#[test]
fn test_empty_string_is_none_atom() {
    let mut interner = Interner::new();
    assert!(interner.is_empty());
    assert_eq!(interner.intern(""), Atom::NONE);
    assert!(Atom::NONE.is_none());
}

#[test]
fn test_lookup_does_not_intern() {
    let mut interner = Interner::new();
    interner.intern_common();
    let before = interner.len();
    assert!(interner.lookup("Record").is_some());
    assert!(interner.lookup("NotInterned").is_none());
    assert_eq!(interner.len(), before);
}

#[test]
fn test_resolve_out_of_range_is_empty() {
    let interner = Interner::new();
    assert_eq!(interner.resolve(Atom(42)), "");
}
