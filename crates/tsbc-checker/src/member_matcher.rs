//! Pairs members of two effective member sets and diffs each pair.
//!
//! Keyed members are matched by name. Signature lists (call and construct
//! signatures, constructors, overloads of one name) are matched greedily:
//! every source signature takes the first compatible target signature that
//! is still free, in declaration order.

use smallvec::{SmallVec, smallvec};
use tracing::trace;
use tsbc_binder::{EffectiveMembers, Member, MemberKey, MemberKind};
use tsbc_parser::{NodeArena, NodeIndex, syntax_kind_ext};

use crate::compare::TypeComparer;
use crate::diff::{DiffLocation, DiffPair, DiffReasons};
use crate::modifier_differ::diff_modifiers;
use crate::options::DetectorOptions;
use crate::signature_differ::{
    diff_signatures, parameters_compatible, signature_text, signatures_compatible,
};

/// Result of greedy matching: the source index each target was paired
/// with, and which sources were consumed.
struct GreedyMatch {
    by_target: Vec<Option<usize>>,
    consumed: Vec<bool>,
}

fn greedy_match(
    source: &[NodeIndex],
    target: &[NodeIndex],
    mut compatible: impl FnMut(NodeIndex, NodeIndex) -> bool,
) -> GreedyMatch {
    let mut by_target = vec![None; target.len()];
    let mut consumed = vec![false; source.len()];
    for (si, &s) in source.iter().enumerate() {
        let candidate = target
            .iter()
            .enumerate()
            .find(|&(ti, &t)| by_target[ti].is_none() && compatible(s, t))
            .map(|(ti, _)| ti);
        if let Some(ti) = candidate {
            by_target[ti] = Some(si);
            consumed[si] = true;
        }
    }
    GreedyMatch {
        by_target,
        consumed,
    }
}

/// Strip parentheses around a type node.
fn unparenthesized(arena: &NodeArena, mut node: NodeIndex) -> NodeIndex {
    while let Some(n) = arena.get(node)
        && n.kind == syntax_kind_ext::PARENTHESIZED_TYPE
        && let Some(inner) = arena.get_wrapped_type(n)
    {
        node = inner.type_node;
    }
    node
}

/// Signatures of a callable member: a method's overloads or the function
/// type of an arrow-typed field. `None` for plain fields.
fn callable_signatures(arena: &NodeArena, member: &Member) -> Option<SmallVec<[NodeIndex; 2]>> {
    match member.kind {
        MemberKind::Method => Some(member.signatures.clone()),
        MemberKind::Property => {
            let type_node = unparenthesized(arena, member.type_node);
            (arena.kind_of(type_node) == Some(syntax_kind_ext::FUNCTION_TYPE))
                .then(|| smallvec![type_node])
        }
        MemberKind::IndexSignature => None,
    }
}

fn one_sided_location(member: &Member) -> DiffLocation {
    if member.kind == MemberKind::Method {
        DiffLocation::Signature
    } else {
        DiffLocation::Property
    }
}

pub struct MemberMatcher<'a, 'ctx> {
    cmp: &'a TypeComparer<'ctx>,
    options: &'a DetectorOptions,
}

impl<'a, 'ctx> MemberMatcher<'a, 'ctx> {
    pub fn new(cmp: &'a TypeComparer<'ctx>, options: &'a DetectorOptions) -> Self {
        MemberMatcher { cmp, options }
    }

    /// Diff two member sets: signature lists first, then keyed members in
    /// target order, then source-only members.
    pub fn match_members(
        &self,
        source: &'ctx EffectiveMembers,
        target: &'ctx EffectiveMembers,
    ) -> Vec<DiffPair<'ctx>> {
        let mut pairs = Vec::new();
        self.match_signature_list(&source.call_signatures, &target.call_signatures, &mut pairs);
        self.match_signature_list(
            &source.construct_signatures,
            &target.construct_signatures,
            &mut pairs,
        );
        self.match_signature_list(&source.constructors, &target.constructors, &mut pairs);

        let direction = self.cmp.direction();
        for (key, target_member) in &target.members {
            match source.get(key) {
                Some(source_member) => {
                    self.match_member(key, source_member, target_member, &mut pairs);
                }
                None => pairs.push(DiffPair::removed(
                    one_sided_location(target_member),
                    direction,
                    self.cmp.named_target(target_member.node, key.display_name()),
                )),
            }
        }
        for (key, source_member) in &source.members {
            if !target.members.contains_key(key) {
                pairs.push(DiffPair::added(
                    one_sided_location(source_member),
                    direction,
                    self.cmp.named_source(source_member.node, key.display_name()),
                ));
            }
        }
        pairs
    }

    /// Call signatures, construct signatures and constructors: a signature
    /// matches only when parameters and return type both match.
    fn match_signature_list(
        &self,
        source: &[NodeIndex],
        target: &[NodeIndex],
        pairs: &mut Vec<DiffPair<'ctx>>,
    ) {
        let cmp = self.cmp;
        let matched = greedy_match(source, target, |s, t| signatures_compatible(cmp, s, t));
        let direction = cmp.direction();
        for (ti, &t) in target.iter().enumerate() {
            if matched.by_target[ti].is_none() {
                let name = signature_text(cmp.target().arena(), t);
                pairs.push(DiffPair::removed(
                    DiffLocation::Signature,
                    direction,
                    cmp.named_target(t, name),
                ));
            }
        }
        for (si, &s) in source.iter().enumerate() {
            if !matched.consumed[si] {
                let name = signature_text(cmp.source().arena(), s);
                pairs.push(DiffPair::added(
                    DiffLocation::Signature,
                    direction,
                    cmp.named_source(s, name),
                ));
            }
        }
    }

    fn match_member(
        &self,
        key: &'ctx MemberKey,
        source: &'ctx Member,
        target: &'ctx Member,
        pairs: &mut Vec<DiffPair<'ctx>>,
    ) {
        let cmp = self.cmp;
        let name = key.display_name();
        let source_callable = callable_signatures(cmp.source().arena(), source);
        let target_callable = callable_signatures(cmp.target().arena(), target);

        match (source_callable, target_callable) {
            (Some(s), Some(t)) => self.match_callable(name, &s, &t, pairs),
            (None, None) => {
                let source_node = cmp.named_source(source.node, name);
                let target_node = cmp.named_target(target.node, name);
                let type_matches = if source.optional && target.optional {
                    cmp.optional_types_match(source.type_node, target.type_node)
                } else {
                    cmp.types_match(source.type_node, target.type_node)
                };
                if !type_matches {
                    pairs.push(DiffPair::changed(
                        DiffLocation::Property,
                        DiffReasons::TYPE_CHANGED,
                        cmp.direction(),
                        source_node,
                        target_node,
                    ));
                }
                pairs.extend(diff_modifiers(
                    source,
                    target,
                    source_node,
                    target_node,
                    cmp.direction(),
                    self.options,
                ));
            }
            _ => {
                trace!(member = name, "member switched between field and callable");
                pairs.push(DiffPair::changed(
                    DiffLocation::Signature,
                    DiffReasons::TYPE_CHANGED,
                    cmp.direction(),
                    cmp.named_source(source.node, name),
                    cmp.named_target(target.node, name),
                ));
            }
        }
    }

    /// One signature each goes straight to the signature differ; anything
    /// else is an overload set.
    pub fn match_callable(
        &self,
        name: &'ctx str,
        source: &[NodeIndex],
        target: &[NodeIndex],
        pairs: &mut Vec<DiffPair<'ctx>>,
    ) {
        let cmp = self.cmp;
        if let ([s], [t]) = (source, target) {
            pairs.extend(diff_signatures(
                cmp,
                cmp.named_source(*s, name),
                cmp.named_target(*t, name),
                0,
            ));
            return;
        }
        self.match_overloads(name, source, target, pairs);
    }

    /// Overloads pair up by parameter list; a matched pair can then only
    /// differ in its return type.
    pub fn match_overloads(
        &self,
        name: &'ctx str,
        source: &[NodeIndex],
        target: &[NodeIndex],
        pairs: &mut Vec<DiffPair<'ctx>>,
    ) {
        let cmp = self.cmp;
        let matched = greedy_match(source, target, |s, t| parameters_compatible(cmp, s, t, 0));
        let direction = cmp.direction();
        for (ti, &t) in target.iter().enumerate() {
            match matched.by_target[ti] {
                Some(si) => pairs.extend(diff_signatures(
                    cmp,
                    cmp.named_source(source[si], name),
                    cmp.named_target(t, name),
                    0,
                )),
                None => pairs.push(DiffPair::removed(
                    DiffLocation::SignatureOverload,
                    direction,
                    cmp.named_target(t, name),
                )),
            }
        }
        for (si, &s) in source.iter().enumerate() {
            if !matched.consumed[si] {
                pairs.push(DiffPair::added(
                    DiffLocation::SignatureOverload,
                    direction,
                    cmp.named_source(s, name),
                ));
            }
        }
    }
}
