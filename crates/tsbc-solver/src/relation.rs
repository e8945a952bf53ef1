//! Structural relations between lowered types of two surfaces.
//!
//! `TypeRelation::equivalent` answers "do these two types accept and produce
//! the same values" and `TypeRelation::is_assignable` the one-way question.
//! Both are coinductive: a pair that is already being compared further up the
//! stack is assumed to hold, which makes recursive interfaces terminate.
//!
//! The source side is resolved against `source` surface types and the target
//! side against `target`; parameter positions swap the two when assignability
//! needs to run contravariantly.

use crate::lower::SurfaceTypes;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{
    FunctionShape, IntrinsicKind, LiteralValue, ObjectShape, TupleElement, TypeData, TypeId,
};
use crate::intern::TypeInterner;
use smallvec::SmallVec;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelationOptions {
    /// A wildcard (`any` or `unknown`) on the source side no longer matches a
    /// concrete target type.
    pub concrete_to_any_is_change: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Mode {
    Equivalent,
    Assignable,
}

/// Key of one comparison on the guard stack. `swapped` records that the
/// surfaces were exchanged for a parameter position.
type RelationKey = (TypeId, TypeId, Mode, bool);

pub struct TypeRelation<'a> {
    interner: &'a TypeInterner,
    source: &'a SurfaceTypes,
    target: &'a SurfaceTypes,
    options: RelationOptions,
    swapped: bool,
    guard: RecursionGuard<RelationKey>,
}

impl<'a> TypeRelation<'a> {
    pub fn new(
        interner: &'a TypeInterner,
        source: &'a SurfaceTypes,
        target: &'a SurfaceTypes,
        options: RelationOptions,
    ) -> TypeRelation<'a> {
        TypeRelation {
            interner,
            source,
            target,
            options,
            swapped: false,
            guard: RecursionGuard::with_profile(RecursionProfile::TypeRelation),
        }
    }

    /// Wildcard handling shared by both relations; `None` when neither side is one.
    fn wildcard(&self, source: TypeId, target: TypeId) -> Option<bool> {
        if !source.is_wildcard() && !target.is_wildcard() {
            return None;
        }
        if self.options.concrete_to_any_is_change && source.is_wildcard() && !target.is_wildcard() {
            return Some(false);
        }
        Some(true)
    }

    fn enter(&mut self, key: RelationKey) -> Option<bool> {
        match self.guard.enter(key) {
            RecursionResult::Entered => None,
            RecursionResult::Cycle => Some(true),
            result @ (RecursionResult::DepthExceeded | RecursionResult::IterationExceeded) => {
                debug!(?result, source = key.0.0, target = key.1.0, "relation limit reached, assuming related");
                Some(true)
            }
        }
    }

    /// Run `f` with the two surfaces exchanged.
    fn with_swapped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        std::mem::swap(&mut self.source, &mut self.target);
        self.swapped = !self.swapped;
        let result = f(self);
        std::mem::swap(&mut self.source, &mut self.target);
        self.swapped = !self.swapped;
        result
    }

    // =========================================================================
    // Equivalence
    // =========================================================================

    pub fn equivalent(&mut self, source: TypeId, target: TypeId) -> bool {
        if source == target {
            return true;
        }
        if let Some(related) = self.wildcard(source, target) {
            return related;
        }
        let key = (source, target, Mode::Equivalent, self.swapped);
        if let Some(assumed) = self.enter(key) {
            return assumed;
        }
        let result = self.equivalent_structure(source, target);
        self.guard.leave(key);
        result
    }

    fn equivalent_structure(&mut self, source: TypeId, target: TypeId) -> bool {
        let interner = self.interner;
        let (Some(s), Some(t)) = (interner.lookup(source), interner.lookup(target)) else {
            return false;
        };
        match (s, t) {
            (TypeData::Union(_), _) | (_, TypeData::Union(_)) => {
                let (a, b) = (union_members(s, source), union_members(t, target));
                self.same_members(&a, &b)
            }
            (TypeData::Intersection(a), TypeData::Intersection(b)) => self.same_members(a, b),
            (
                TypeData::Reference { name: a, args: aa },
                TypeData::Reference { name: b, args: ba },
            ) if a == b => self.all_equivalent(aa, ba),
            (TypeData::Reference { .. }, _) | (_, TypeData::Reference { .. }) => {
                self.structurally_equivalent((source, s), (target, t))
            }
            (TypeData::Array(a), TypeData::Array(b))
            | (TypeData::ReadonlyArray(a), TypeData::ReadonlyArray(b))
            | (TypeData::Predicate(a), TypeData::Predicate(b))
            | (TypeData::KeyOf(a), TypeData::KeyOf(b)) => self.equivalent(*a, *b),
            (TypeData::Tuple(a), TypeData::Tuple(b)) => self.tuples_equivalent(a, b),
            (TypeData::Object(a), TypeData::Object(b)) => self.shapes_equivalent(a, b),
            (TypeData::Function(a), TypeData::Function(b)) => self.functions_equivalent(a, b),
            _ => false,
        }
    }

    /// Every member on each side has an equivalent member on the other.
    fn same_members(&mut self, a: &[TypeId], b: &[TypeId]) -> bool {
        a.iter().all(|&x| b.iter().any(|&y| self.equivalent(x, y)))
            && b.iter().all(|&y| a.iter().any(|&x| self.equivalent(x, y)))
    }

    fn all_equivalent(&mut self, a: &[TypeId], b: &[TypeId]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| self.equivalent(x, y))
    }

    /// Compare a named interface with another type through its shape.
    /// Generic arguments of two references still have to agree positionally.
    fn structurally_equivalent(&mut self, s: (TypeId, &TypeData), t: (TypeId, &TypeData)) -> bool {
        if let (TypeData::Reference { args: a, .. }, TypeData::Reference { args: b, .. }) = (s.1, t.1)
            && !self.all_equivalent(a, b)
        {
            return false;
        }
        match (self.shape_of(s, self.source), self.shape_of(t, self.target)) {
            (Some(a), Some(b)) => self.equivalent(a, b),
            _ => false,
        }
    }

    /// Object type behind `data`: itself for objects, the interface shape for
    /// references to interfaces of `surface`.
    fn shape_of(&self, (id, data): (TypeId, &TypeData), surface: &SurfaceTypes) -> Option<TypeId> {
        match data {
            TypeData::Object(_) => Some(id),
            TypeData::Reference { name, .. } => surface.interface_shape(*name),
            _ => None,
        }
    }

    fn tuples_equivalent(&mut self, a: &[TupleElement], b: &[TupleElement]) -> bool {
        a.len() == b.len()
            && a.iter().zip(b).all(|(x, y)| {
                x.optional == y.optional && x.rest == y.rest && self.equivalent(x.type_id, y.type_id)
            })
    }

    fn shapes_equivalent(&mut self, a: &ObjectShape, b: &ObjectShape) -> bool {
        a.properties.len() == b.properties.len()
            && a.properties.iter().zip(&b.properties).all(|(p, q)| {
                p.name == q.name && p.optional == q.optional && self.equivalent(p.type_id, q.type_id)
            })
            && self.optional_equivalent(a.string_index, b.string_index)
            && self.optional_equivalent(a.number_index, b.number_index)
            && self.all_equivalent(&a.call_signatures, &b.call_signatures)
            && self.all_equivalent(&a.construct_signatures, &b.construct_signatures)
    }

    fn optional_equivalent(&mut self, a: Option<TypeId>, b: Option<TypeId>) -> bool {
        match (a, b) {
            (Some(x), Some(y)) => self.equivalent(x, y),
            (None, None) => true,
            _ => false,
        }
    }

    fn functions_equivalent(&mut self, a: &FunctionShape, b: &FunctionShape) -> bool {
        a.is_constructor == b.is_constructor
            && a.type_param_count == b.type_param_count
            && a.params.len() == b.params.len()
            && a.params.iter().zip(&b.params).all(|(x, y)| {
                x.optional == y.optional && x.rest == y.rest && self.equivalent(x.type_id, y.type_id)
            })
            && self.equivalent(a.return_type, b.return_type)
    }

    /// Members of `id` other than `undefined`; `id` itself when that leaves none.
    fn defined_members(&self, id: TypeId) -> SmallVec<[TypeId; 4]> {
        let members: SmallVec<[TypeId; 4]> = match self.interner.lookup(id) {
            Some(data) => union_members(data, id)
                .into_iter()
                .filter(|&m| m != TypeId::UNDEFINED)
                .collect(),
            None => SmallVec::new(),
        };
        if members.is_empty() {
            SmallVec::from_elem(id, 1)
        } else {
            members
        }
    }

    /// `equivalent` for the declared types of two optional slots: an explicit
    /// `| undefined` on either side adds nothing.
    pub fn equivalent_optional(&mut self, source: TypeId, target: TypeId) -> bool {
        if source == target {
            return true;
        }
        let (a, b) = (self.defined_members(source), self.defined_members(target));
        self.same_members(&a, &b)
    }

    /// `is_assignable` for the declared types of two optional slots.
    pub fn is_assignable_optional(&mut self, source: TypeId, target: TypeId) -> bool {
        if source == target {
            return true;
        }
        let (a, b) = (self.defined_members(source), self.defined_members(target));
        a.iter().all(|&x| b.iter().any(|&y| self.is_assignable(x, y)))
    }

    // =========================================================================
    // Assignability
    // =========================================================================

    /// Whether a value of `source` can be used where `target` is expected.
    pub fn is_assignable(&mut self, source: TypeId, target: TypeId) -> bool {
        if source == target || source == TypeId::NEVER {
            return true;
        }
        if let Some(related) = self.wildcard(source, target) {
            return related;
        }
        let key = (source, target, Mode::Assignable, self.swapped);
        if let Some(assumed) = self.enter(key) {
            return assumed;
        }
        let result = self.assignable_structure(source, target);
        self.guard.leave(key);
        result
    }

    fn assignable_structure(&mut self, source: TypeId, target: TypeId) -> bool {
        let interner = self.interner;
        let (Some(s), Some(t)) = (interner.lookup(source), interner.lookup(target)) else {
            return false;
        };
        match (s, t) {
            (TypeData::Union(members), _) => members.iter().all(|&m| self.is_assignable(m, target)),
            (_, TypeData::Union(members)) => members.iter().any(|&m| self.is_assignable(source, m)),
            (TypeData::Intersection(members), _) => {
                members.iter().any(|&m| self.is_assignable(m, target))
            }
            (_, TypeData::Intersection(members)) => {
                members.iter().all(|&m| self.is_assignable(source, m))
            }
            (TypeData::Literal(literal), TypeData::Intrinsic(kind)) => {
                literal_widens_to(literal, *kind)
            }
            (TypeData::Intrinsic(IntrinsicKind::Undefined), TypeData::Intrinsic(IntrinsicKind::Void)) => true,
            (TypeData::Predicate(_), TypeData::Intrinsic(IntrinsicKind::Boolean)) => true,
            (
                TypeData::Reference { name: a, args: aa },
                TypeData::Reference { name: b, args: ba },
            ) if a == b => self.all_equivalent(aa, ba),
            (TypeData::Array(a), TypeData::Array(b) | TypeData::ReadonlyArray(b))
            | (TypeData::ReadonlyArray(a), TypeData::ReadonlyArray(b))
            | (TypeData::Predicate(a), TypeData::Predicate(b)) => self.is_assignable(*a, *b),
            (TypeData::Tuple(elements), TypeData::Array(b) | TypeData::ReadonlyArray(b)) => {
                elements.iter().all(|e| self.is_assignable(e.type_id, *b))
            }
            (TypeData::Tuple(a), TypeData::Tuple(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| {
                        (!x.optional || y.optional) && x.rest == y.rest && self.is_assignable(x.type_id, y.type_id)
                    })
            }
            (TypeData::Function(a), TypeData::Function(b)) => self.function_assignable(a, b),
            (TypeData::Object(_) | TypeData::Reference { .. }, TypeData::Object(_) | TypeData::Reference { .. }) => {
                match (self.shape_of((source, s), self.source), self.shape_of((target, t), self.target)) {
                    (Some(a), Some(b)) => self.object_assignable(a, b),
                    _ => false,
                }
            }
            _ => self.equivalent(source, target),
        }
    }

    fn object_assignable(&mut self, source: TypeId, target: TypeId) -> bool {
        let interner = self.interner;
        let (Some(TypeData::Object(s)), Some(TypeData::Object(t))) =
            (interner.lookup(source), interner.lookup(target))
        else {
            return false;
        };
        for prop in &t.properties {
            match s.property(prop.name) {
                Some(found) => {
                    if found.optional && !prop.optional {
                        return false;
                    }
                    if !self.is_assignable(found.type_id, prop.type_id) {
                        return false;
                    }
                }
                None if prop.optional => {}
                None => return false,
            }
        }
        for (target_index, source_index) in [
            (t.string_index, s.string_index),
            (t.number_index, s.number_index.or(s.string_index)),
        ] {
            let Some(target_index) = target_index else {
                continue;
            };
            let ok = match source_index {
                Some(source_index) => self.is_assignable(source_index, target_index),
                None => s
                    .properties
                    .iter()
                    .all(|p| self.is_assignable(p.type_id, target_index)),
            };
            if !ok {
                return false;
            }
        }
        self.signatures_assignable(&s.call_signatures, &t.call_signatures)
            && self.signatures_assignable(&s.construct_signatures, &t.construct_signatures)
    }

    /// Every target signature is satisfied by some source signature.
    fn signatures_assignable(&mut self, source: &[TypeId], target: &[TypeId]) -> bool {
        target
            .iter()
            .all(|&t| source.iter().any(|&s| self.is_assignable(s, t)))
    }

    /// Parameters compare bivariantly, the return type covariantly.
    fn function_assignable(&mut self, source: &FunctionShape, target: &FunctionShape) -> bool {
        if source.is_constructor != target.is_constructor {
            return false;
        }
        let required: usize = source.params.iter().filter(|p| !p.optional && !p.rest).count();
        let target_accepts_any_count = target.params.last().is_some_and(|p| p.rest);
        if required > target.params.len() && !target_accepts_any_count {
            return false;
        }
        let paired: SmallVec<[(TypeId, TypeId); 4]> = source
            .params
            .iter()
            .zip(&target.params)
            .map(|(s, t)| (s.type_id, t.type_id))
            .collect();
        for (s, t) in paired {
            let related = self.is_assignable(s, t) || self.with_swapped(|r| r.is_assignable(t, s));
            if !related {
                return false;
            }
        }
        target.return_type == TypeId::VOID || self.is_assignable(source.return_type, target.return_type)
    }
}

fn union_members(data: &TypeData, id: TypeId) -> SmallVec<[TypeId; 4]> {
    match data {
        TypeData::Union(members) => members.iter().copied().collect(),
        _ => SmallVec::from_elem(id, 1),
    }
}

fn literal_widens_to(literal: &LiteralValue, kind: IntrinsicKind) -> bool {
    matches!(
        (literal, kind),
        (LiteralValue::String(_), IntrinsicKind::String)
            | (LiteralValue::Number(_), IntrinsicKind::Number)
            | (LiteralValue::BigInt(_), IntrinsicKind::BigInt)
            | (LiteralValue::Boolean(_), IntrinsicKind::Boolean)
    )
}
