//! Type interning.
//!
//! `TypeInterner` deduplicates `TypeData` into `TypeId`s. The constructors
//! normalise as they intern (unions flattened, sorted and de-duplicated,
//! object properties sorted), so normalisation happens exactly once per shape.

use crate::types::{
    FunctionShape, IntrinsicKind, LiteralValue, ObjectShape, TupleElement, TypeData, TypeId,
};
use rustc_hash::FxHashMap;
use std::fmt::Write;
use tsbc_common::interner::{Atom, Interner};

pub struct TypeInterner {
    types: Vec<TypeData>,
    map: FxHashMap<TypeData, TypeId>,
    names: Interner,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> TypeInterner {
        let mut interner = TypeInterner {
            types: Vec::with_capacity(512),
            map: FxHashMap::default(),
            names: Interner::new(),
        };
        for kind in IntrinsicKind::ALL {
            interner.intern(TypeData::Intrinsic(kind));
        }
        interner.intern(TypeData::Literal(LiteralValue::Boolean(true)));
        interner.intern(TypeData::Literal(LiteralValue::Boolean(false)));
        debug_assert_eq!(
            interner.lookup(TypeId::BOOLEAN_FALSE),
            Some(&TypeData::Literal(LiteralValue::Boolean(false)))
        );
        interner
    }

    pub fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.map.get(&data) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(data.clone());
        self.map.insert(data, id);
        id
    }

    #[inline]
    pub fn lookup(&self, id: TypeId) -> Option<&TypeData> {
        self.types.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[inline]
    pub fn intern_string(&mut self, s: &str) -> Atom {
        self.names.intern(s)
    }

    #[inline]
    pub fn resolve_atom(&self, atom: Atom) -> &str {
        self.names.resolve(atom)
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn literal_string(&mut self, value: &str) -> TypeId {
        let atom = self.intern_string(value);
        self.intern(TypeData::Literal(LiteralValue::String(atom)))
    }

    pub fn literal_number(&mut self, text: &str) -> TypeId {
        let canonical = canonical_number_text(text);
        let atom = self.intern_string(&canonical);
        self.intern(TypeData::Literal(LiteralValue::Number(atom)))
    }

    pub fn literal_bigint(&mut self, text: &str) -> TypeId {
        let atom = self.intern_string(text.trim_end_matches('n'));
        self.intern(TypeData::Literal(LiteralValue::BigInt(atom)))
    }

    pub fn literal_boolean(&mut self, value: bool) -> TypeId {
        if value {
            TypeId::BOOLEAN_TRUE
        } else {
            TypeId::BOOLEAN_FALSE
        }
    }

    pub fn reference(&mut self, name: &str, args: Vec<TypeId>) -> TypeId {
        let name = self.intern_string(name);
        self.intern(TypeData::Reference { name, args })
    }

    pub fn type_parameter(&mut self, depth: u32, index: u32) -> TypeId {
        self.intern(TypeData::TypeParameter { depth, index })
    }

    /// Union with TypeScript's reductions: nested unions flattened, `any`
    /// and `unknown` absorb everything, `never` disappears, `true | false` is `boolean`.
    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Union(inner)) => flat.extend(inner.iter().copied()),
                _ => flat.push(member),
            }
        }
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        if flat.contains(&TypeId::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        flat.retain(|&t| t != TypeId::NEVER);
        if flat.contains(&TypeId::BOOLEAN_TRUE) && flat.contains(&TypeId::BOOLEAN_FALSE) {
            flat.push(TypeId::BOOLEAN);
        }
        if flat.contains(&TypeId::BOOLEAN) {
            flat.retain(|&t| t != TypeId::BOOLEAN_TRUE && t != TypeId::BOOLEAN_FALSE);
        }
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => self.intern(TypeData::Union(flat)),
        }
    }

    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Intersection(inner)) => flat.extend(inner.iter().copied()),
                _ => flat.push(member),
            }
        }
        if flat.contains(&TypeId::NEVER) {
            return TypeId::NEVER;
        }
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        flat.retain(|&t| t != TypeId::UNKNOWN);
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => TypeId::UNKNOWN,
            1 => flat[0],
            _ => self.intern(TypeData::Intersection(flat)),
        }
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    pub fn readonly_array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeData::ReadonlyArray(element))
    }

    pub fn tuple(&mut self, elements: Vec<TupleElement>) -> TypeId {
        self.intern(TypeData::Tuple(elements))
    }

    pub fn object(&mut self, mut shape: ObjectShape) -> TypeId {
        shape.properties.sort_by_key(|p| p.name);
        shape.properties.dedup_by_key(|p| p.name);
        self.intern(TypeData::Object(Box::new(shape)))
    }

    pub fn function(&mut self, shape: FunctionShape) -> TypeId {
        self.intern(TypeData::Function(Box::new(shape)))
    }

    pub fn predicate(&mut self, asserted: TypeId) -> TypeId {
        self.intern(TypeData::Predicate(asserted))
    }

    pub fn keyof(&mut self, operand: TypeId) -> TypeId {
        self.intern(TypeData::KeyOf(operand))
    }

    /// Opaque type keyed by `text` with all whitespace removed.
    pub fn opaque(&mut self, text: &str) -> TypeId {
        let normalized = normalize_type_text(text);
        let atom = self.intern_string(&normalized);
        self.intern(TypeData::Opaque(atom))
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Render a type for logs and test messages.
    pub fn display(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id, 0);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId, depth: u32) {
        if depth > 8 {
            out.push_str("...");
            return;
        }
        let Some(data) = self.lookup(id) else {
            let _ = write!(out, "<type {}>", id.0);
            return;
        };
        let list = |out: &mut String, items: &[TypeId], sep: &str| {
            for (i, &item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(sep);
                }
                self.write_type(out, item, depth + 1);
            }
        };
        match data {
            TypeData::Intrinsic(kind) => out.push_str(kind.name()),
            TypeData::Literal(LiteralValue::String(atom)) => {
                let _ = write!(out, "\"{}\"", self.resolve_atom(*atom));
            }
            TypeData::Literal(LiteralValue::Number(atom)) => out.push_str(self.resolve_atom(*atom)),
            TypeData::Literal(LiteralValue::BigInt(atom)) => {
                let _ = write!(out, "{}n", self.resolve_atom(*atom));
            }
            TypeData::Literal(LiteralValue::Boolean(value)) => {
                let _ = write!(out, "{value}");
            }
            TypeData::Reference { name, args } => {
                out.push_str(self.resolve_atom(*name));
                if !args.is_empty() {
                    out.push('<');
                    list(out, args, ", ");
                    out.push('>');
                }
            }
            TypeData::TypeParameter { depth: d, index } => {
                let _ = write!(out, "T{d}_{index}");
            }
            TypeData::Union(members) => list(out, members, " | "),
            TypeData::Intersection(members) => list(out, members, " & "),
            TypeData::Array(element) => {
                self.write_type(out, *element, depth + 1);
                out.push_str("[]");
            }
            TypeData::ReadonlyArray(element) => {
                out.push_str("readonly ");
                self.write_type(out, *element, depth + 1);
                out.push_str("[]");
            }
            TypeData::Tuple(elements) => {
                out.push('[');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if element.rest {
                        out.push_str("...");
                    }
                    self.write_type(out, element.type_id, depth + 1);
                    if element.optional {
                        out.push('?');
                    }
                }
                out.push(']');
            }
            TypeData::Object(shape) => {
                out.push_str("{ ");
                if let Some(index) = shape.string_index {
                    out.push_str("[key: string]: ");
                    self.write_type(out, index, depth + 1);
                    out.push_str("; ");
                }
                if let Some(index) = shape.number_index {
                    out.push_str("[key: number]: ");
                    self.write_type(out, index, depth + 1);
                    out.push_str("; ");
                }
                for prop in &shape.properties {
                    if prop.readonly {
                        out.push_str("readonly ");
                    }
                    out.push_str(self.resolve_atom(prop.name));
                    out.push_str(if prop.optional { "?: " } else { ": " });
                    self.write_type(out, prop.type_id, depth + 1);
                    out.push_str("; ");
                }
                for &sig in &shape.call_signatures {
                    self.write_type(out, sig, depth + 1);
                    out.push_str("; ");
                }
                for &sig in &shape.construct_signatures {
                    self.write_type(out, sig, depth + 1);
                    out.push_str("; ");
                }
                out.push('}');
            }
            TypeData::Function(shape) => {
                if shape.is_constructor {
                    out.push_str("new ");
                }
                out.push('(');
                for (i, param) in shape.params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if param.rest {
                        out.push_str("...");
                    }
                    let _ = write!(out, "p{i}{}: ", if param.optional { "?" } else { "" });
                    self.write_type(out, param.type_id, depth + 1);
                }
                out.push_str(") => ");
                self.write_type(out, shape.return_type, depth + 1);
            }
            TypeData::Predicate(asserted) => {
                out.push_str("x is ");
                self.write_type(out, *asserted, depth + 1);
            }
            TypeData::KeyOf(operand) => {
                out.push_str("keyof ");
                self.write_type(out, *operand, depth + 1);
            }
            TypeData::Opaque(atom) => out.push_str(self.resolve_atom(*atom)),
        }
    }
}

/// Source text of a type with all whitespace removed.
///
/// Two type expressions with equal normalised text are the same type
/// regardless of how either surface defines the names they mention.
pub fn normalize_type_text(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Canonical text for a numeric literal: radix prefixes and separators
/// resolved, so `0x10`, `1_6` and `16` are one literal.
fn canonical_number_text(text: &str) -> String {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let radix = [("0x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| lower.strip_prefix(prefix).map(|rest| (rest, radix)));
    let value = match radix {
        Some((rest, radix)) => u64::from_str_radix(rest, radix).ok().map(|v| v as f64),
        None => cleaned.parse::<f64>().ok(),
    };
    match value {
        Some(v) => {
            let v = if negative { -v } else { v };
            format!("{v}")
        }
        None => text.to_string(),
    }
}
