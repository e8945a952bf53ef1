//! Member collection and inheritance flattening.

use crate::members::{EffectiveMembers, Member, MemberKey, MemberKind};
use crate::state::{DeclarationIndex, has_body, mixes_implementation};
use crate::symbols::{SymbolId, symbol_flags};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};
use tsbc_common::limits::MAX_INHERITANCE_DEPTH;
use tsbc_parser::parser::syntax_kind_ext;
use tsbc_parser::{NodeArena, NodeIndex, NodeList};
use tsbc_scanner::SyntaxKind;

struct FlattenState {
    in_progress: FxHashSet<SymbolId>,
    depth: u32,
    /// Set when a cycle or the depth limit cut a branch short.
    truncated: bool,
}

impl DeclarationIndex {
    pub(crate) fn flatten_all(&self) -> FxHashMap<SymbolId, EffectiveMembers> {
        let mut done: FxHashMap<SymbolId, EffectiveMembers> = FxHashMap::default();
        for (id, symbol) in self.symbols.iter() {
            if !symbol.has_flags(symbol_flags::CONTAINER) {
                continue;
            }
            let mut state = FlattenState {
                in_progress: FxHashSet::default(),
                depth: 0,
                truncated: false,
            };
            let members = self.flatten(id, &mut state, &done);
            if state.truncated {
                debug!(symbol = %symbol.escaped_name, "effective members truncated");
            }
            done.insert(id, members);
        }
        done
    }

    fn flatten(
        &self,
        id: SymbolId,
        state: &mut FlattenState,
        done: &FxHashMap<SymbolId, EffectiveMembers>,
    ) -> EffectiveMembers {
        if let Some(members) = done.get(&id) {
            return members.clone();
        }
        let mut members = self.own_members(id);
        if state.depth >= MAX_INHERITANCE_DEPTH {
            warn!(symbol = id.0, "inheritance chain too deep, truncating");
            state.truncated = true;
            return members;
        }
        state.in_progress.insert(id);
        state.depth += 1;
        for base in self.base_symbols(id) {
            if state.in_progress.contains(&base) {
                debug!(symbol = id.0, base = base.0, "cyclic extends, truncating branch");
                state.truncated = true;
                continue;
            }
            let inherited = self.flatten(base, state, done);
            for member in inherited.members.values() {
                trace!(key = %member.key, from = base.0, "inherited member");
            }
            members.inherit_from(&inherited);
        }
        state.depth -= 1;
        state.in_progress.remove(&id);
        members
    }

    /// Symbols named in `extends` clauses. `implements` contributes nothing.
    fn base_symbols(&self, id: SymbolId) -> SmallVec<[SymbolId; 2]> {
        self.heritage_bases(id).into_iter().map(|(base, _)| base).collect()
    }

    /// Resolved `extends` bases of a class or interface, each with the
    /// `ExpressionWithTypeArguments` node that names it.
    pub fn heritage_bases(&self, id: SymbolId) -> SmallVec<[(SymbolId, NodeIndex); 2]> {
        let mut bases = SmallVec::new();
        let Some(symbol) = self.symbol(id) else {
            return bases;
        };
        for &decl in &symbol.declarations {
            let Some(node) = self.arena.get(decl) else {
                continue;
            };
            let heritage = match node.kind {
                syntax_kind_ext::INTERFACE_DECLARATION => {
                    self.arena.get_interface(node).and_then(|d| d.heritage_clauses.as_ref())
                }
                syntax_kind_ext::CLASS_DECLARATION => {
                    self.arena.get_class(node).and_then(|d| d.heritage_clauses.as_ref())
                }
                _ => None,
            };
            for clause_idx in heritage.into_iter().flat_map(NodeList::iter) {
                let Some(clause) = self
                    .arena
                    .get(clause_idx)
                    .and_then(|n| self.arena.get_heritage_clause(n))
                else {
                    continue;
                };
                if clause.token != SyntaxKind::ExtendsKeyword as u16 {
                    continue;
                }
                for expr in clause.types.iter() {
                    let Some(data) = self.arena.get(expr).and_then(|n| self.arena.get_expr_type_args(n)) else {
                        continue;
                    };
                    let name = self.arena.entity_name_text(data.expression);
                    match self.find(&name) {
                        Some(base)
                            if self
                                .symbol(base)
                                .is_some_and(|s| s.has_flags(symbol_flags::CONTAINER)) =>
                        {
                            bases.push((base, expr));
                        }
                        _ => debug!(base = %name, "unresolved base type contributes no members"),
                    }
                }
            }
        }
        bases
    }

    /// Members declared directly by `id`, merged across its declarations.
    ///
    /// A key declared again by a later declaration replaces the earlier member.
    fn own_members(&self, id: SymbolId) -> EffectiveMembers {
        let mut merged = EffectiveMembers::default();
        let Some(symbol) = self.symbol(id) else {
            return merged;
        };
        for &decl in &symbol.declarations {
            let Some(node) = self.arena.get(decl) else {
                continue;
            };
            let local = match node.kind {
                syntax_kind_ext::INTERFACE_DECLARATION => match self.arena.get_interface(node) {
                    Some(data) => collect_type_members(&self.arena, &data.members, id),
                    None => continue,
                },
                syntax_kind_ext::CLASS_DECLARATION => match self.arena.get_class(node) {
                    Some(data) => collect_class_members(&self.arena, &data.members, id),
                    None => continue,
                },
                _ => continue,
            };
            merged.call_signatures.extend(local.call_signatures);
            merged.construct_signatures.extend(local.construct_signatures);
            merged.constructors.extend(local.constructors);
            for (key, member) in local.members {
                merged.members.insert(key, member);
            }
        }
        merged
    }
}

/// Collect members of an interface body or type literal.
pub fn collect_type_members(arena: &NodeArena, members: &NodeList, owner: SymbolId) -> EffectiveMembers {
    let mut collector = MemberCollector::new(arena, owner);
    for idx in members.iter() {
        let Some(node) = arena.get(idx) else {
            continue;
        };
        match node.kind {
            syntax_kind_ext::PROPERTY_SIGNATURE => {
                let Some(data) = arena.get_signature(node) else {
                    continue;
                };
                let Some(key) = collector.key_for(data.name, false) else {
                    continue;
                };
                let mut member = Member::property(key, idx, data.type_annotation);
                member.optional = data.question_token;
                member.readonly = arena.has_modifier(data.modifiers.as_ref(), SyntaxKind::ReadonlyKeyword);
                collector.add(member);
            }
            syntax_kind_ext::METHOD_SIGNATURE => {
                let Some(data) = arena.get_signature(node) else {
                    continue;
                };
                if let Some(key) = collector.key_for(data.name, false) {
                    collector.add_method(key, idx, data.question_token);
                }
            }
            syntax_kind_ext::CALL_SIGNATURE => collector.result.call_signatures.push(idx),
            syntax_kind_ext::CONSTRUCT_SIGNATURE => collector.result.construct_signatures.push(idx),
            syntax_kind_ext::INDEX_SIGNATURE => collector.add_index_signature(idx),
            syntax_kind_ext::GET_ACCESSOR | syntax_kind_ext::SET_ACCESSOR => {
                collector.add_accessor(idx, false);
            }
            _ => {}
        }
    }
    collector.finish()
}

/// Collect the public members of a class body.
pub fn collect_class_members(arena: &NodeArena, members: &NodeList, owner: SymbolId) -> EffectiveMembers {
    let mut collector = MemberCollector::new(arena, owner);
    for idx in members.iter() {
        let Some(node) = arena.get(idx) else {
            continue;
        };
        let modifiers = arena.modifiers_of(idx);
        if arena.has_modifier(modifiers, SyntaxKind::PrivateKeyword) {
            continue;
        }
        let is_static = arena.has_modifier(modifiers, SyntaxKind::StaticKeyword);
        match node.kind {
            syntax_kind_ext::PROPERTY_DECLARATION => {
                let Some(data) = arena.get_property_decl(node) else {
                    continue;
                };
                let Some(key) = collector.key_for(data.name, is_static) else {
                    continue;
                };
                let mut member = Member::property(key, idx, data.type_annotation);
                member.optional = data.question_token;
                member.readonly = arena.has_modifier(modifiers, SyntaxKind::ReadonlyKeyword);
                collector.add(member);
            }
            syntax_kind_ext::METHOD_DECLARATION => {
                let Some(data) = arena.get_method_decl(node) else {
                    continue;
                };
                if let Some(key) = collector.key_for(data.name, is_static) {
                    collector.add_method(key, idx, data.question_token);
                }
            }
            syntax_kind_ext::CONSTRUCTOR => {
                collector.result.constructors.push(idx);
                collector.add_parameter_properties(idx);
            }
            syntax_kind_ext::INDEX_SIGNATURE if !is_static => collector.add_index_signature(idx),
            syntax_kind_ext::GET_ACCESSOR | syntax_kind_ext::SET_ACCESSOR => {
                collector.add_accessor(idx, is_static);
            }
            _ => {}
        }
    }
    collector.finish()
}

struct MemberCollector<'a> {
    arena: &'a NodeArena,
    owner: SymbolId,
    result: EffectiveMembers,
}

impl<'a> MemberCollector<'a> {
    fn new(arena: &'a NodeArena, owner: SymbolId) -> Self {
        MemberCollector {
            arena,
            owner,
            result: EffectiveMembers::default(),
        }
    }

    /// Key for a member name; `None` for `#private` names.
    fn key_for(&self, name: NodeIndex, is_static: bool) -> Option<MemberKey> {
        if self.arena.kind_of(name) == Some(SyntaxKind::PrivateIdentifier as u16) {
            return None;
        }
        let text = self.arena.property_name_text(name)?.to_string();
        Some(if is_static {
            MemberKey::Static(text)
        } else {
            MemberKey::Instance(text)
        })
    }

    fn add(&mut self, mut member: Member) {
        member.declared_in = self.owner;
        self.result.members.insert(member.key.clone(), member);
    }

    fn add_method(&mut self, key: MemberKey, signature: NodeIndex, optional: bool) {
        if let Some(existing) = self.result.members.get_mut(&key)
            && existing.kind == MemberKind::Method
        {
            existing.signatures.push(signature);
            return;
        }
        let mut member = Member::method(key, signature);
        member.optional = optional;
        self.add(member);
    }

    fn add_index_signature(&mut self, idx: NodeIndex) {
        let Some(data) = self.arena.get(idx).and_then(|n| self.arena.get_index_signature(n)) else {
            return;
        };
        let key_type = data
            .parameters
            .nodes
            .first()
            .and_then(|&p| self.arena.get_parameter(self.arena.get(p)?))
            .map(|p| p.type_annotation)
            .unwrap_or(NodeIndex::NONE);
        let key = match self.arena.kind_of(key_type) {
            Some(k) if k == SyntaxKind::StringKeyword as u16 => MemberKey::StringIndex,
            Some(k) if k == SyntaxKind::NumberKeyword as u16 => MemberKey::NumberIndex,
            _ => MemberKey::Instance(format!("[{}]", self.arena.node_text(key_type))),
        };
        let mut member = Member::property(key, idx, data.type_annotation);
        member.kind = MemberKind::IndexSignature;
        member.readonly = self
            .arena
            .has_modifier(data.modifiers.as_ref(), SyntaxKind::ReadonlyKeyword);
        self.add(member);
    }

    /// A getter becomes a property, readonly unless a setter of the same name exists.
    fn add_accessor(&mut self, idx: NodeIndex, is_static: bool) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        let Some(data) = self.arena.get_accessor(node) else {
            return;
        };
        let Some(key) = self.key_for(data.name, is_static) else {
            return;
        };
        let is_getter = node.kind == syntax_kind_ext::GET_ACCESSOR;
        let setter_type = || {
            data.parameters
                .nodes
                .first()
                .and_then(|&p| self.arena.get_parameter(self.arena.get(p)?))
                .map(|p| p.type_annotation)
                .unwrap_or(NodeIndex::NONE)
        };

        // (node, type) of the opposite accessor collected earlier.
        let partner = self.result.members.get(&key).and_then(|existing| {
            let kind = self.arena.kind_of(existing.node)?;
            let wanted = if is_getter {
                syntax_kind_ext::SET_ACCESSOR
            } else {
                syntax_kind_ext::GET_ACCESSOR
            };
            (kind == wanted).then_some((existing.node, existing.type_node))
        });

        let member = match partner {
            Some((getter, getter_type)) if !is_getter => Member::property(key, getter, getter_type),
            Some(_) => Member::property(key, idx, data.type_annotation),
            None if is_getter => {
                let mut member = Member::property(key, idx, data.type_annotation);
                member.readonly = true;
                member
            }
            None => Member::property(key, idx, setter_type()),
        };
        self.add(member);
    }

    /// `constructor(public readonly x: T)` declares an instance property `x`.
    fn add_parameter_properties(&mut self, ctor: NodeIndex) {
        let Some(data) = self.arena.get(ctor).and_then(|n| self.arena.get_constructor(n)) else {
            return;
        };
        for param_idx in data.parameters.iter() {
            let Some(param) = self.arena.get(param_idx).and_then(|n| self.arena.get_parameter(n)) else {
                continue;
            };
            let modifiers = param.modifiers.as_ref();
            let is_property = [
                SyntaxKind::PublicKeyword,
                SyntaxKind::ProtectedKeyword,
                SyntaxKind::ReadonlyKeyword,
            ]
            .into_iter()
            .any(|kind| self.arena.has_modifier(modifiers, kind));
            if !is_property || self.arena.has_modifier(modifiers, SyntaxKind::PrivateKeyword) {
                continue;
            }
            let Some(key) = self.key_for(param.name, false) else {
                continue;
            };
            let mut member = Member::property(key, param_idx, param.type_annotation);
            member.optional = param.question_token;
            member.readonly = self.arena.has_modifier(modifiers, SyntaxKind::ReadonlyKeyword);
            self.add(member);
        }
    }

    fn finish(mut self) -> EffectiveMembers {
        let arena = self.arena;
        for member in self.result.members.values_mut() {
            if member.is_method() && mixes_implementation(arena, &member.signatures) {
                member.signatures.retain(|s| !has_body(arena, *s));
                if let Some(&first) = member.signatures.first() {
                    member.node = first;
                }
            }
        }
        if mixes_implementation(arena, &self.result.constructors) {
            self.result.constructors.retain(|c| !has_body(arena, *c));
        }
        self.result
    }
}
