//! Lowering of type nodes into the interner.
//!
//! Every declaration of a surface is lowered once, in its own lexical scope,
//! when the surface is loaded. The resulting `TypeId` of each type node is
//! recorded so later comparisons never touch the AST again. Type aliases are
//! inlined at their use sites (with their arguments substituted), so an alias
//! and its definition lower to the same `TypeId`.
//!
//! Members inherited from a generic base depend on the heritage clause that
//! reaches them: `p: T` in `Base<T>` is a `string` inside `Derived extends
//! Base<string>`. Those members are lowered again for every inheriting
//! container with the base's parameters bound, and kept per container.

use crate::intern::TypeInterner;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{FunctionShape, ObjectShape, ParamInfo, PropertyInfo, TupleElement, TypeData, TypeId};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};
use tsbc_binder::{
    DeclarationIndex, EffectiveMembers, MemberKey, MemberKind, SymbolId, collect_type_members,
    symbol_flags,
};
use tsbc_common::interner::Atom;
use tsbc_parser::parser::syntax_kind_ext;
use tsbc_parser::{NodeArena, NodeIndex, NodeList};
use tsbc_scanner::SyntaxKind;

/// Lowered types of one surface.
#[derive(Clone, Debug, Default)]
pub struct SurfaceTypes {
    node_types: FxHashMap<NodeIndex, TypeId>,
    /// Per container, types of inherited nodes whose base type parameters
    /// were bound by a heritage clause.
    inherited_types: FxHashMap<SymbolId, FxHashMap<NodeIndex, TypeId>>,
    /// Structural shape of each interface, for comparing differently named interfaces.
    interface_shapes: FxHashMap<Atom, TypeId>,
}

impl SurfaceTypes {
    /// Lower every declaration of `index` into `interner`.
    pub fn lower(index: &DeclarationIndex, interner: &mut TypeInterner) -> SurfaceTypes {
        let mut node_types = FxHashMap::default();
        let mut inherited_types = FxHashMap::default();
        let mut interface_shapes = FxHashMap::default();
        let mut lowering = TypeLowering::new(index, interner, &mut node_types);

        for (_, symbol) in index.symbols().iter() {
            for &decl in &symbol.declarations {
                lowering.lower_declaration(decl);
            }
        }

        for (id, symbol) in index.symbols().iter() {
            if !symbol.has_flags(symbol_flags::CONTAINER) {
                continue;
            }
            let inherited = lowering.lower_inherited(id);
            if !inherited.is_empty() {
                inherited_types.insert(id, inherited);
            }
        }

        for (id, symbol) in index.symbols().iter() {
            if !symbol.has_flags(symbol_flags::INTERFACE) || symbol.has_flags(symbol_flags::CLASS) {
                continue;
            }
            lowering.overrides = inherited_types.remove(&id).unwrap_or_default();
            let shape = lowering.interface_shape(id);
            let overrides = std::mem::take(&mut lowering.overrides);
            if !overrides.is_empty() {
                inherited_types.insert(id, overrides);
            }
            if let Some(shape) = shape {
                let name = lowering.interner.intern_string(&symbol.escaped_name);
                interface_shapes.insert(name, shape);
            }
        }
        drop(lowering);

        debug!(
            nodes = node_types.len(),
            containers = inherited_types.len(),
            interfaces = interface_shapes.len(),
            types = interner.len(),
            "lowered surface"
        );
        SurfaceTypes {
            node_types,
            inherited_types,
            interface_shapes,
        }
    }

    /// Lowered type of a type node, signature or declaration.
    pub fn type_of(&self, node: NodeIndex) -> Option<TypeId> {
        self.node_types.get(&node).copied()
    }

    /// Lowered type of `node` as seen from the container `owner`. Differs
    /// from `type_of` only for members inherited from a generic base.
    pub fn type_in(&self, owner: SymbolId, node: NodeIndex) -> Option<TypeId> {
        self.bound_type(owner, node).or_else(|| self.type_of(node))
    }

    /// Type of an inherited node under `owner`'s heritage bindings, if it has one.
    pub fn bound_type(&self, owner: SymbolId, node: NodeIndex) -> Option<TypeId> {
        self.inherited_types.get(&owner)?.get(&node).copied()
    }

    pub fn interface_shape(&self, name: Atom) -> Option<TypeId> {
        self.interface_shapes.get(&name).copied()
    }

    pub fn len(&self) -> usize {
        self.node_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_types.is_empty()
    }
}

/// Lowers type nodes of one surface.
pub struct TypeLowering<'a> {
    index: &'a DeclarationIndex,
    arena: &'a NodeArena,
    interner: &'a mut TypeInterner,
    node_types: &'a mut FxHashMap<NodeIndex, TypeId>,
    /// Type parameter names of the enclosing generic declarations, outermost first.
    scopes: Vec<SmallVec<[&'a str; 2]>>,
    /// Alias arguments (or mapped-type keys) bound by name. While set, results
    /// depend on the binding and are not recorded.
    substitutions: Option<FxHashMap<&'a str, TypeId>>,
    /// Every node lowered while set, bindings included.
    capture: Option<FxHashMap<NodeIndex, TypeId>>,
    /// Bound types that take precedence over the node cache.
    overrides: FxHashMap<NodeIndex, TypeId>,
    alias_guard: RecursionGuard<NodeIndex>,
}

impl<'a> TypeLowering<'a> {
    pub fn new(
        index: &'a DeclarationIndex,
        interner: &'a mut TypeInterner,
        node_types: &'a mut FxHashMap<NodeIndex, TypeId>,
    ) -> TypeLowering<'a> {
        TypeLowering {
            index,
            arena: index.arena(),
            interner,
            node_types,
            scopes: Vec::new(),
            substitutions: None,
            capture: None,
            overrides: FxHashMap::default(),
            alias_guard: RecursionGuard::with_profile(RecursionProfile::AliasExpansion),
        }
    }

    fn record(&mut self, node: NodeIndex, id: TypeId) {
        if let Some(capture) = self.capture.as_mut() {
            capture.entry(node).or_insert(id);
        }
        if self.substitutions.is_none() {
            self.node_types.entry(node).or_insert(id);
        }
    }

    fn cached(&self, node: NodeIndex) -> Option<TypeId> {
        if self.substitutions.is_some() {
            return None;
        }
        self.overrides
            .get(&node)
            .or_else(|| self.node_types.get(&node))
            .copied()
    }

    fn type_parameter_names(&self, list: Option<&'a NodeList>) -> SmallVec<[&'a str; 2]> {
        let arena = self.arena;
        list.into_iter()
            .flat_map(|l| l.nodes.iter())
            .filter_map(|&p| {
                let data = arena.get_type_parameter(arena.get(p)?)?;
                arena.identifier_text(data.name)
            })
            .collect()
    }

    /// Push a scope for a generic declaration; returns whether one was pushed.
    fn enter_scope(&mut self, list: Option<&'a NodeList>) -> bool {
        let names = self.type_parameter_names(list);
        if names.is_empty() {
            return false;
        }
        self.scopes.push(names);
        true
    }

    fn leave_scope(&mut self, pushed: bool) {
        if pushed {
            self.scopes.pop();
        }
    }

    fn lookup_type_parameter(&mut self, name: &str) -> Option<TypeId> {
        let (depth, index) = self
            .scopes
            .iter()
            .enumerate()
            .rev()
            .find_map(|(depth, scope)| scope.iter().position(|&n| n == name).map(|i| (depth, i)))?;
        Some(self.interner.type_parameter(depth as u32, index as u32))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Lower every type node of a top-level declaration in its own scope.
    pub fn lower_declaration(&mut self, decl: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(decl) else {
            return;
        };
        match node.kind {
            syntax_kind_ext::INTERFACE_DECLARATION => {
                if let Some(data) = arena.get_interface(node) {
                    let pushed = self.enter_scope(data.type_parameters.as_ref());
                    for member in data.members.iter() {
                        self.lower_member(member);
                    }
                    self.leave_scope(pushed);
                }
            }
            syntax_kind_ext::CLASS_DECLARATION => {
                if let Some(data) = arena.get_class(node) {
                    let pushed = self.enter_scope(data.type_parameters.as_ref());
                    for member in data.members.iter() {
                        self.lower_member(member);
                    }
                    self.leave_scope(pushed);
                }
            }
            syntax_kind_ext::FUNCTION_DECLARATION => {
                self.lower_signature(decl);
            }
            syntax_kind_ext::TYPE_ALIAS_DECLARATION => {
                if let Some(data) = arena.get_type_alias(node) {
                    if !self.alias_guard.enter(decl).is_entered() {
                        return;
                    }
                    let pushed = self.enter_scope(data.type_parameters.as_ref());
                    let id = self.lower(data.type_node);
                    self.record(decl, id);
                    self.leave_scope(pushed);
                    self.alias_guard.leave(decl);
                }
            }
            syntax_kind_ext::VARIABLE_DECLARATION => {
                if let Some(data) = arena.get_variable_declaration(node) {
                    let id = self.lower(data.type_annotation);
                    self.record(decl, id);
                }
            }
            _ => {}
        }
    }

    fn lower_member(&mut self, member: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(member) else {
            return;
        };
        match node.kind {
            syntax_kind_ext::PROPERTY_SIGNATURE => {
                if let Some(data) = arena.get_signature(node) {
                    self.lower(data.type_annotation);
                }
            }
            syntax_kind_ext::PROPERTY_DECLARATION => {
                if let Some(data) = arena.get_property_decl(node) {
                    self.lower(data.type_annotation);
                }
            }
            syntax_kind_ext::INDEX_SIGNATURE => {
                if let Some(data) = arena.get_index_signature(node) {
                    for param in data.parameters.iter() {
                        self.lower_parameter(param);
                    }
                    self.lower(data.type_annotation);
                }
            }
            syntax_kind_ext::GET_ACCESSOR | syntax_kind_ext::SET_ACCESSOR => {
                if let Some(data) = arena.get_accessor(node) {
                    for param in data.parameters.iter() {
                        self.lower_parameter(param);
                    }
                    self.lower(data.type_annotation);
                }
            }
            _ => {
                self.lower_signature(member);
            }
        }
    }

    // =========================================================================
    // Inheritance
    // =========================================================================

    /// Type parameters of the first class or interface declaration of `id`.
    fn container_type_parameters(&self, id: SymbolId) -> Option<&'a NodeList> {
        let index = self.index;
        let arena = self.arena;
        index.symbol(id)?.declarations.iter().find_map(|&decl| {
            let node = arena.get(decl)?;
            match node.kind {
                syntax_kind_ext::INTERFACE_DECLARATION => {
                    arena.get_interface(node).map(|d| d.type_parameters.as_ref())
                }
                syntax_kind_ext::CLASS_DECLARATION => {
                    arena.get_class(node).map(|d| d.type_parameters.as_ref())
                }
                _ => None,
            }
        })?
    }

    /// Member lists of every class or interface declaration of `id`.
    fn container_member_lists(&self, id: SymbolId) -> SmallVec<[&'a NodeList; 1]> {
        let index = self.index;
        let arena = self.arena;
        index
            .symbol(id)
            .into_iter()
            .flat_map(|symbol| symbol.declarations.iter())
            .filter_map(|&decl| {
                let node = arena.get(decl)?;
                match node.kind {
                    syntax_kind_ext::INTERFACE_DECLARATION => arena.get_interface(node).map(|d| &d.members),
                    syntax_kind_ext::CLASS_DECLARATION => arena.get_class(node).map(|d| &d.members),
                    _ => None,
                }
            })
            .collect()
    }

    /// Every ancestor of `id` with its type parameters bound to the heritage
    /// arguments that reach it. Arguments of `id`'s own clauses are lowered in
    /// its own scope; further up they are lowered under the child's bindings.
    /// The first path to an ancestor wins.
    fn base_bindings(&mut self, id: SymbolId) -> Vec<(SymbolId, FxHashMap<&'a str, TypeId>)> {
        let index = self.index;
        let mut ancestors: Vec<(SymbolId, FxHashMap<&'a str, TypeId>)> = Vec::new();
        let mut visited = FxHashSet::default();
        visited.insert(id);
        let mut pending: Vec<(SymbolId, Option<FxHashMap<&'a str, TypeId>>)> = vec![(id, None)];

        while let Some((child, child_bindings)) = pending.pop() {
            for (base, expr) in index.heritage_bases(child) {
                if !visited.insert(base) {
                    continue;
                }
                let saved_scopes = std::mem::take(&mut self.scopes);
                let saved_substitutions = self.substitutions.take();
                let pushed = match &child_bindings {
                    None => self.enter_scope(self.container_type_parameters(child)),
                    Some(bindings) => {
                        self.substitutions = Some(bindings.clone());
                        false
                    }
                };
                let args: SmallVec<[TypeId; 2]> = index
                    .type_arguments(expr)
                    .iter()
                    .map(|&arg| self.lower(arg))
                    .collect();
                self.leave_scope(pushed);
                self.scopes = saved_scopes;
                self.substitutions = saved_substitutions;

                let params = self.type_parameter_names(self.container_type_parameters(base));
                let bindings: FxHashMap<&'a str, TypeId> = params
                    .iter()
                    .enumerate()
                    .map(|(i, &param)| (param, args.get(i).copied().unwrap_or(TypeId::ANY)))
                    .collect();
                ancestors.push((base, bindings.clone()));
                pending.push((base, Some(bindings)));
            }
        }
        ancestors
    }

    /// Lower the members of `id`'s generic ancestors under the bindings of
    /// `id`'s heritage clauses. Keyed by node, including signature and
    /// parameter nodes.
    fn lower_inherited(&mut self, id: SymbolId) -> FxHashMap<NodeIndex, TypeId> {
        let mut captured = FxHashMap::default();
        for (base, bindings) in self.base_bindings(id) {
            if bindings.is_empty() {
                continue;
            }
            trace!(symbol = id.0, base = base.0, bound = bindings.len(), "lowering inherited members");
            let saved_scopes = std::mem::take(&mut self.scopes);
            let saved_substitutions = self.substitutions.replace(bindings);
            self.capture = Some(std::mem::take(&mut captured));
            for list in self.container_member_lists(base) {
                for member in list.iter() {
                    self.lower_member(member);
                }
            }
            captured = self.capture.take().unwrap_or_default();
            self.scopes = saved_scopes;
            self.substitutions = saved_substitutions;
        }
        captured
    }

    /// Structural shape of an interface from its effective members.
    fn interface_shape(&mut self, id: SymbolId) -> Option<TypeId> {
        let index = self.index;
        let members = index.effective_members(id)?;
        let decl = index
            .declarations_of(id, syntax_kind_ext::INTERFACE_DECLARATION)
            .next()?;
        let arena = self.arena;
        let type_parameters = arena
            .get(decl)
            .and_then(|n| arena.get_interface(n))
            .and_then(|d| d.type_parameters.as_ref());
        let pushed = self.enter_scope(type_parameters);
        let shape = self.shape_of(members);
        self.leave_scope(pushed);
        Some(shape)
    }

    /// Object type for a member set. Static members are not part of it.
    pub fn shape_of(&mut self, members: &EffectiveMembers) -> TypeId {
        let mut shape = ObjectShape::default();
        for member in members.members.values() {
            let type_id = match member.kind {
                MemberKind::Property | MemberKind::IndexSignature => self.lower(member.type_node),
                MemberKind::Method => {
                    let signatures: Vec<TypeId> = member
                        .signatures
                        .iter()
                        .map(|&s| self.lower_signature(s))
                        .collect();
                    if signatures.len() == 1 {
                        signatures[0]
                    } else {
                        self.interner.intersection(signatures)
                    }
                }
            };
            match &member.key {
                MemberKey::Static(_) => {}
                MemberKey::StringIndex => shape.string_index = Some(type_id),
                MemberKey::NumberIndex => shape.number_index = Some(type_id),
                MemberKey::Instance(name) => {
                    let mut prop = PropertyInfo::new(self.interner.intern_string(name), type_id);
                    prop.optional = member.optional;
                    prop.readonly = member.readonly;
                    shape.properties.push(prop);
                }
            }
        }
        shape.call_signatures = members
            .call_signatures
            .iter()
            .map(|&s| self.lower_signature(s))
            .collect();
        shape.construct_signatures = members
            .construct_signatures
            .iter()
            .map(|&s| self.lower_signature(s))
            .collect();
        self.interner.object(shape)
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    /// Lower a function-like node into a `Function` type.
    pub fn lower_signature(&mut self, idx: NodeIndex) -> TypeId {
        if let Some(id) = self.cached(idx) {
            return id;
        }
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return TypeId::ANY;
        };
        let empty = NodeList::default();
        let (type_parameters, parameters, return_type, is_constructor) = match node.kind {
            syntax_kind_ext::FUNCTION_DECLARATION => match arena.get_function(node) {
                Some(d) => (d.type_parameters.as_ref(), &d.parameters, d.type_annotation, false),
                None => return TypeId::ANY,
            },
            syntax_kind_ext::METHOD_SIGNATURE
            | syntax_kind_ext::CALL_SIGNATURE
            | syntax_kind_ext::CONSTRUCT_SIGNATURE => match arena.get_signature(node) {
                Some(d) => (
                    d.type_parameters.as_ref(),
                    d.parameters.as_ref().unwrap_or(&empty),
                    d.type_annotation,
                    node.kind == syntax_kind_ext::CONSTRUCT_SIGNATURE,
                ),
                None => return TypeId::ANY,
            },
            syntax_kind_ext::METHOD_DECLARATION => match arena.get_method_decl(node) {
                Some(d) => (d.type_parameters.as_ref(), &d.parameters, d.type_annotation, false),
                None => return TypeId::ANY,
            },
            syntax_kind_ext::CONSTRUCTOR => match arena.get_constructor(node) {
                Some(d) => (d.type_parameters.as_ref(), &d.parameters, NodeIndex::NONE, true),
                None => return TypeId::ANY,
            },
            syntax_kind_ext::FUNCTION_TYPE | syntax_kind_ext::CONSTRUCTOR_TYPE => {
                match arena.get_function_type(node) {
                    Some(d) => (
                        d.type_parameters.as_ref(),
                        &d.parameters,
                        d.type_annotation,
                        node.kind == syntax_kind_ext::CONSTRUCTOR_TYPE,
                    ),
                    None => return TypeId::ANY,
                }
            }
            _ => return self.lower(idx),
        };

        let pushed = self.enter_scope(type_parameters);
        let type_param_count = self.scopes.last().filter(|_| pushed).map_or(0, |s| s.len() as u32);
        let declared: SmallVec<[NodeIndex; 4]> = parameters
            .iter()
            .filter(|&p| !self.is_this_parameter(p))
            .collect();
        let params: Vec<ParamInfo> = declared.into_iter().map(|p| self.lower_parameter(p)).collect();
        let return_type = if return_type.is_none() && is_constructor {
            TypeId::VOID
        } else {
            self.lower(return_type)
        };
        self.leave_scope(pushed);

        let id = self.interner.function(FunctionShape {
            params,
            return_type,
            type_param_count,
            is_constructor,
        });
        self.record(idx, id);
        id
    }

    fn is_this_parameter(&self, param: NodeIndex) -> bool {
        let arena = self.arena;
        arena
            .get(param)
            .and_then(|n| arena.get_parameter(n))
            .is_some_and(|p| arena.node_text(p.name) == "this")
    }

    /// Lower a parameter. Optional covers both `x?: T` and `x: T = init`.
    pub fn lower_parameter(&mut self, param: NodeIndex) -> ParamInfo {
        let arena = self.arena;
        let Some(data) = arena.get(param).and_then(|n| arena.get_parameter(n)) else {
            return ParamInfo {
                type_id: TypeId::ANY,
                optional: false,
                rest: false,
            };
        };
        ParamInfo {
            type_id: self.lower(data.type_annotation),
            optional: data.question_token || data.initializer.is_some(),
            rest: data.dot_dot_dot_token,
        }
    }

    // =========================================================================
    // Type nodes
    // =========================================================================

    /// Lower a type node. A missing annotation is `any`.
    pub fn lower(&mut self, idx: NodeIndex) -> TypeId {
        if idx.is_none() {
            return TypeId::ANY;
        }
        if let Some(id) = self.cached(idx) {
            return id;
        }
        let id = self.lower_uncached(idx);
        self.record(idx, id);
        id
    }

    fn lower_uncached(&mut self, idx: NodeIndex) -> TypeId {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return TypeId::ANY;
        };
        if let Some(intrinsic) = keyword_intrinsic(node.kind) {
            return intrinsic;
        }
        match node.kind {
            syntax_kind_ext::THIS_TYPE => TypeId::THIS,
            syntax_kind_ext::TYPE_REFERENCE => self.lower_reference(idx),
            syntax_kind_ext::UNION_TYPE | syntax_kind_ext::INTERSECTION_TYPE => {
                let Some(data) = arena.get_composite_type(node) else {
                    return TypeId::ANY;
                };
                let members: Vec<TypeId> = data.types.iter().map(|t| self.lower(t)).collect();
                if node.kind == syntax_kind_ext::UNION_TYPE {
                    self.interner.union(members)
                } else {
                    self.interner.intersection(members)
                }
            }
            syntax_kind_ext::TUPLE_TYPE => {
                let Some(data) = arena.get_composite_type(node) else {
                    return TypeId::ANY;
                };
                let elements = data.types.iter().map(|e| self.lower_tuple_element(e)).collect();
                self.interner.tuple(elements)
            }
            syntax_kind_ext::ARRAY_TYPE => match arena.get_array_type(node) {
                Some(data) => {
                    let element = self.lower(data.element_type);
                    self.interner.array(element)
                }
                None => TypeId::ANY,
            },
            syntax_kind_ext::PARENTHESIZED_TYPE
            | syntax_kind_ext::OPTIONAL_TYPE
            | syntax_kind_ext::REST_TYPE => match arena.get_wrapped_type(node) {
                Some(data) => self.lower(data.type_node),
                None => TypeId::ANY,
            },
            syntax_kind_ext::FUNCTION_TYPE | syntax_kind_ext::CONSTRUCTOR_TYPE => {
                self.lower_signature(idx)
            }
            syntax_kind_ext::TYPE_LITERAL => match arena.get_type_literal(node) {
                Some(data) => {
                    for member in data.members.iter() {
                        self.lower_member(member);
                    }
                    let members = collect_type_members(arena, &data.members, SymbolId::NONE);
                    self.shape_of(&members)
                }
                None => TypeId::ANY,
            },
            syntax_kind_ext::TYPE_OPERATOR => self.lower_type_operator(idx),
            syntax_kind_ext::LITERAL_TYPE => self.lower_literal(idx),
            syntax_kind_ext::MAPPED_TYPE => self.lower_mapped(idx),
            syntax_kind_ext::TYPE_PREDICATE => match arena.get_type_predicate(node) {
                Some(data) if data.type_node.is_some() => {
                    let asserted = self.lower(data.type_node);
                    self.interner.predicate(asserted)
                }
                _ => self.interner.predicate(TypeId::VOID),
            },
            _ => {
                trace!(kind = node.kind, "opaque type");
                self.interner.opaque(arena.node_text(idx))
            }
        }
    }

    fn lower_tuple_element(&mut self, element: NodeIndex) -> TupleElement {
        let arena = self.arena;
        let node = arena.get(element);
        let kind = node.map(|n| n.kind);
        match kind {
            Some(syntax_kind_ext::NAMED_TUPLE_MEMBER) => {
                let data = node.and_then(|n| arena.get_named_tuple_member(n));
                let (type_node, optional, rest) = data
                    .map(|d| (d.type_node, d.question_token, d.dot_dot_dot_token))
                    .unwrap_or((NodeIndex::NONE, false, false));
                TupleElement {
                    type_id: self.lower(type_node),
                    optional,
                    rest,
                }
            }
            Some(syntax_kind_ext::OPTIONAL_TYPE) | Some(syntax_kind_ext::REST_TYPE) => {
                let inner = node
                    .and_then(|n| arena.get_wrapped_type(n))
                    .map_or(NodeIndex::NONE, |d| d.type_node);
                TupleElement {
                    type_id: self.lower(inner),
                    optional: kind == Some(syntax_kind_ext::OPTIONAL_TYPE),
                    rest: kind == Some(syntax_kind_ext::REST_TYPE),
                }
            }
            _ => TupleElement {
                type_id: self.lower(element),
                optional: false,
                rest: false,
            },
        }
    }

    fn lower_reference(&mut self, idx: NodeIndex) -> TypeId {
        let arena = self.arena;
        let Some(data) = arena.get(idx).and_then(|n| arena.get_type_ref(n)) else {
            return TypeId::ANY;
        };
        let name = arena.entity_name_text(data.type_name);
        let index = self.index;
        let arg_nodes: &[NodeIndex] = index.type_arguments(idx);

        if arg_nodes.is_empty() {
            if let Some(bound) = self
                .substitutions
                .as_ref()
                .and_then(|subst| subst.get(name.as_str()).copied())
            {
                return bound;
            }
            if let Some(param) = self.lookup_type_parameter(&name) {
                return param;
            }
        }

        let args: Vec<TypeId> = arg_nodes.iter().map(|&a| self.lower(a)).collect();
        if let Some(decl) = index.alias_declaration(&name) {
            return self.inline_alias(decl, &name, args);
        }
        match (name.as_str(), args.as_slice()) {
            ("Array", &[element]) => self.interner.array(element),
            ("ReadonlyArray", &[element]) => self.interner.readonly_array(element),
            ("Record", &[keys, value]) => self.record_object(keys, value, false, false),
            _ => self.interner.reference(&name, args),
        }
    }

    /// Replace a reference to a type alias with its lowered definition.
    fn inline_alias(&mut self, decl: NodeIndex, name: &str, args: Vec<TypeId>) -> TypeId {
        let arena = self.arena;
        let Some(alias) = arena.get(decl).and_then(|n| arena.get_type_alias(n)) else {
            return self.interner.reference(name, args);
        };
        match self.alias_guard.enter(decl) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                trace!(alias = name, "recursive alias kept as reference");
                return self.interner.reference(name, args);
            }
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                warn!(alias = name, "alias expansion limit reached");
                return self.interner.reference(name, args);
            }
        }

        let params = self.type_parameter_names(alias.type_parameters.as_ref());
        let saved_scopes = std::mem::take(&mut self.scopes);
        let saved_substitutions = self.substitutions.take();
        if !params.is_empty() {
            if args.is_empty() {
                self.scopes.push(params);
            } else {
                let bound = params
                    .iter()
                    .enumerate()
                    .map(|(i, &param)| (param, args.get(i).copied().unwrap_or(TypeId::ANY)))
                    .collect();
                self.substitutions = Some(bound);
            }
        }

        let id = self.lower(alias.type_node);

        self.scopes = saved_scopes;
        self.substitutions = saved_substitutions;
        self.alias_guard.leave(decl);
        id
    }

    fn lower_type_operator(&mut self, idx: NodeIndex) -> TypeId {
        let arena = self.arena;
        let Some(data) = arena.get(idx).and_then(|n| arena.get_type_operator(n)) else {
            return TypeId::ANY;
        };
        if data.operator == SyntaxKind::KeyOfKeyword as u16 {
            let operand = self.lower(data.type_node);
            return self.interner.keyof(operand);
        }
        if data.operator == SyntaxKind::UniqueKeyword as u16 {
            return TypeId::SYMBOL;
        }
        let operand = self.lower(data.type_node);
        // `readonly T[]`; `readonly [A, B]` keeps its tuple shape.
        match self.interner.lookup(operand) {
            Some(&TypeData::Array(element)) => self.interner.readonly_array(element),
            _ => operand,
        }
    }

    fn lower_literal(&mut self, idx: NodeIndex) -> TypeId {
        let arena = self.arena;
        let Some(data) = arena.get(idx).and_then(|n| arena.get_literal_type(n)) else {
            return TypeId::ANY;
        };
        let Some(literal) = arena.get(data.literal) else {
            return TypeId::ANY;
        };
        let text = arena.get_literal(literal).map(|l| l.text.as_str());
        match (literal.kind, text) {
            (k, _) if k == SyntaxKind::TrueKeyword as u16 => TypeId::BOOLEAN_TRUE,
            (k, _) if k == SyntaxKind::FalseKeyword as u16 => TypeId::BOOLEAN_FALSE,
            (k, Some(text)) if k == SyntaxKind::StringLiteral as u16 => self.interner.literal_string(text),
            (k, Some(text)) if k == SyntaxKind::NumericLiteral as u16 => self.interner.literal_number(text),
            (k, Some(text)) if k == SyntaxKind::BigIntLiteral as u16 => self.interner.literal_bigint(text),
            _ => self.interner.opaque(arena.node_text(idx)),
        }
    }

    /// `{ [K in C]: V }` lowers like `Record<C, V>` when `C` is a key set.
    fn lower_mapped(&mut self, idx: NodeIndex) -> TypeId {
        let arena = self.arena;
        let Some(data) = arena.get(idx).and_then(|n| arena.get_mapped_type(n)) else {
            return TypeId::ANY;
        };
        let parameter = arena
            .get(data.type_parameter)
            .and_then(|n| arena.get_type_parameter(n));
        let (Some(parameter), true) = (parameter, data.name_type.is_none()) else {
            return self.interner.opaque(arena.node_text(idx));
        };
        let Some(key_name) = arena.identifier_text(parameter.name) else {
            return self.interner.opaque(arena.node_text(idx));
        };
        let keys = self.lower(parameter.constraint);
        let Some(key_set) = self.key_set(keys) else {
            return self.interner.opaque(arena.node_text(idx));
        };
        let optional = data.question_token != 0 && data.question_token != SyntaxKind::MinusToken as u16;
        let readonly = data.readonly_token != 0 && data.readonly_token != SyntaxKind::MinusToken as u16;

        let mut shape = ObjectShape::default();
        for key in key_set {
            let saved = self.substitutions.clone();
            let mut bound = saved.clone().unwrap_or_default();
            bound.insert(key_name, key);
            self.substitutions = Some(bound);
            let value = self.lower(data.type_node);
            self.substitutions = saved;
            self.add_record_key(&mut shape, key, value, optional, readonly);
        }
        self.interner.object(shape)
    }

    /// Object type for `Record<K, V>`, or a plain reference when `K` is not a key set.
    fn record_object(&mut self, keys: TypeId, value: TypeId, optional: bool, readonly: bool) -> TypeId {
        let Some(key_set) = self.key_set(keys) else {
            return self.interner.reference("Record", vec![keys, value]);
        };
        let mut shape = ObjectShape::default();
        for key in key_set {
            self.add_record_key(&mut shape, key, value, optional, readonly);
        }
        self.interner.object(shape)
    }

    /// Members of a key type usable as object keys: `string`, `number`, literals.
    fn key_set(&self, keys: TypeId) -> Option<SmallVec<[TypeId; 4]>> {
        let members: SmallVec<[TypeId; 4]> = match self.interner.lookup(keys)? {
            TypeData::Union(members) => members.iter().copied().collect(),
            _ => SmallVec::from_elem(keys, 1),
        };
        let usable = members.iter().all(|&k| {
            k == TypeId::STRING
                || k == TypeId::NUMBER
                || matches!(self.interner.lookup(k), Some(TypeData::Literal(lit))
                    if !matches!(lit, crate::types::LiteralValue::Boolean(_)))
        });
        usable.then_some(members)
    }

    fn add_record_key(&mut self, shape: &mut ObjectShape, key: TypeId, value: TypeId, optional: bool, readonly: bool) {
        if key == TypeId::STRING {
            shape.string_index = Some(value);
            return;
        }
        if key == TypeId::NUMBER {
            shape.number_index = Some(value);
            return;
        }
        let name = match self.interner.lookup(key) {
            Some(TypeData::Literal(
                crate::types::LiteralValue::String(atom)
                | crate::types::LiteralValue::Number(atom)
                | crate::types::LiteralValue::BigInt(atom),
            )) => *atom,
            _ => {
                debug!(key = key.0, "unusable record key");
                return;
            }
        };
        let mut prop = PropertyInfo::new(name, value);
        prop.optional = optional;
        prop.readonly = readonly;
        shape.properties.push(prop);
    }
}

/// Intrinsic for a keyword type node.
fn keyword_intrinsic(kind: u16) -> Option<TypeId> {
    let pairs = [
        (SyntaxKind::AnyKeyword, TypeId::ANY),
        (SyntaxKind::UnknownKeyword, TypeId::UNKNOWN),
        (SyntaxKind::NeverKeyword, TypeId::NEVER),
        (SyntaxKind::VoidKeyword, TypeId::VOID),
        (SyntaxKind::UndefinedKeyword, TypeId::UNDEFINED),
        (SyntaxKind::NullKeyword, TypeId::NULL),
        (SyntaxKind::StringKeyword, TypeId::STRING),
        (SyntaxKind::NumberKeyword, TypeId::NUMBER),
        (SyntaxKind::BooleanKeyword, TypeId::BOOLEAN),
        (SyntaxKind::BigIntKeyword, TypeId::BIGINT),
        (SyntaxKind::SymbolKeyword, TypeId::SYMBOL),
        (SyntaxKind::ObjectKeyword, TypeId::OBJECT),
    ];
    pairs
        .into_iter()
        .find(|(keyword, _)| *keyword as u16 == kind)
        .map(|(_, id)| id)
}
