//! String interner for identifier deduplication.
//!
//! Identifiers in a declaration surface repeat constantly (`string`, `options`,
//! `Promise`, every property name that is shared between request and response
//! shapes). The parser interns them into a per-surface pool and passes `Atom`s
//! around; the type solver keeps its own pool shared by both surfaces so that
//! names from baseline and current compare as integers.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `Interner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

const COMMON_STRINGS: &[&str] = &[
    // Type keywords
    "any",
    "unknown",
    "never",
    "void",
    "undefined",
    "null",
    "string",
    "number",
    "boolean",
    "bigint",
    "symbol",
    "object",
    "this",
    // Declaration keywords
    "export",
    "declare",
    "interface",
    "class",
    "function",
    "type",
    "enum",
    "extends",
    "implements",
    "readonly",
    "constructor",
    // Well-known generic containers
    "Array",
    "ReadonlyArray",
    "Record",
    "Promise",
    "Partial",
    "Required",
    "Pick",
    "Omit",
    "PagedAsyncIterableIterator",
    // Common member names in SDK surfaces
    "options",
    "body",
    "headers",
    "status",
    "path",
    "value",
    "name",
    "id",
];

/// String interner that deduplicates strings and returns Atom handles.
///
/// # Example
/// ```
/// use tsbc_common::interner::Interner;
/// let mut interner = Interner::new();
/// let a1 = interner.intern("hello");
/// let a2 = interner.intern("hello");
/// assert_eq!(a1, a2);
/// assert_eq!(interner.resolve(a1), "hello");
/// ```
#[derive(Clone, Debug)]
pub struct Interner {
    map: FxHashMap<Arc<str>, Atom>,
    /// Index 0 is the empty string.
    strings: Vec<Arc<str>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut interner = Interner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        let empty: Arc<str> = Arc::from("");
        interner.strings.push(empty.clone());
        interner.map.insert(empty, Atom::NONE);
        interner
    }

    /// Intern a string, returning its Atom handle.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.map.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let owned: Arc<str> = Arc::from(s);
        self.strings.push(owned.clone());
        self.map.insert(owned, atom);
        atom
    }

    /// Look up a string without interning it.
    #[inline]
    pub fn lookup(&self, s: &str) -> Option<Atom> {
        self.map.get(s).copied()
    }

    /// Resolve an Atom back to its string value.
    /// Returns the empty string for out-of-range atoms.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings
            .get(atom.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("")
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True when only the empty string is interned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }

    /// Pre-intern keywords and names that show up in nearly every surface.
    pub fn intern_common(&mut self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }
}
