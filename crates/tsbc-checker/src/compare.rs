//! Type comparisons between the checked side and the contract side.

use tracing::trace;
use tsbc_binder::SymbolId;
use tsbc_parser::NodeIndex;
use tsbc_solver::{RelationOptions, TypeId, TypeRelation, normalize_type_text};

use crate::context::{AstContext, Side, Surface};
use crate::diff::{AssignDirection, NamedNode};
use crate::options::{DetectorOptions, TypeRelationMode};

/// Answers "did this type change" for nodes of one direction.
pub struct TypeComparer<'ctx> {
    ctx: &'ctx AstContext,
    direction: AssignDirection,
    relation: RelationOptions,
    mode: TypeRelationMode,
    /// Containers whose members are being compared. Members inherited from a
    /// generic base are typed as seen from these.
    source_owner: SymbolId,
    target_owner: SymbolId,
}

impl<'ctx> TypeComparer<'ctx> {
    pub fn new(ctx: &'ctx AstContext, direction: AssignDirection, options: &DetectorOptions) -> Self {
        TypeComparer {
            ctx,
            direction,
            relation: options.relation_options(),
            mode: options.type_relation,
            source_owner: SymbolId::NONE,
            target_owner: SymbolId::NONE,
        }
    }

    /// Compare nodes as members of these two containers.
    pub fn within(mut self, source_owner: SymbolId, target_owner: SymbolId) -> Self {
        self.source_owner = source_owner;
        self.target_owner = target_owner;
        self
    }

    pub fn ctx(&self) -> &'ctx AstContext {
        self.ctx
    }

    pub fn direction(&self) -> AssignDirection {
        self.direction
    }

    pub fn source(&self) -> &'ctx Surface {
        self.ctx.side(self.direction.source_side())
    }

    pub fn target(&self) -> &'ctx Surface {
        self.ctx.side(self.direction.target_side())
    }

    pub fn named_source(&self, node: NodeIndex, name: &'ctx str) -> NamedNode<'ctx> {
        NamedNode::new(self.ctx, self.direction.source_side(), node, name)
    }

    pub fn named_target(&self, node: NodeIndex, name: &'ctx str) -> NamedNode<'ctx> {
        NamedNode::new(self.ctx, self.direction.target_side(), node, name)
    }

    /// Text of a node on the given side, borrowed for the context lifetime.
    pub fn text(&self, side: Side, node: NodeIndex) -> &'ctx str {
        self.ctx.side(side).arena().node_text(node)
    }

    /// Whether the source type node can stand in for the target type node.
    ///
    /// Identical spelling (whitespace aside) always matches unless a heritage
    /// clause bound either node; otherwise the lowered types are related under
    /// the configured mode. A missing annotation is `any`.
    pub fn types_match(&self, source: NodeIndex, target: NodeIndex) -> bool {
        self.relate(source, target, false)
    }

    /// `types_match` for two optional slots, where an explicit `| undefined`
    /// adds nothing.
    pub fn optional_types_match(&self, source: NodeIndex, target: NodeIndex) -> bool {
        self.relate(source, target, true)
    }

    fn relate(&self, source: NodeIndex, target: NodeIndex, optional: bool) -> bool {
        if self.same_spelling(source, target) {
            return true;
        }
        let source_id = self.source_type(source);
        let target_id = self.target_type(target);
        let mut relation = TypeRelation::new(
            self.ctx.interner(),
            self.source().types(),
            self.target().types(),
            self.relation,
        );
        let related = match (self.mode, optional) {
            (TypeRelationMode::Equivalent, false) => relation.equivalent(source_id, target_id),
            (TypeRelationMode::Equivalent, true) => relation.equivalent_optional(source_id, target_id),
            (TypeRelationMode::Assignable, false) => relation.is_assignable(source_id, target_id),
            (TypeRelationMode::Assignable, true) => relation.is_assignable_optional(source_id, target_id),
        };
        trace!(
            source = %self.ctx.interner().display(source_id),
            target = %self.ctx.interner().display(target_id),
            related,
            "compared types"
        );
        related
    }

    /// Parameter types run the other way under assignability: the contract's
    /// arguments must still be accepted by the source. `optional` is set when
    /// both parameters are optional.
    pub fn parameter_types_match(&self, source: NodeIndex, target: NodeIndex, optional: bool) -> bool {
        if self.mode == TypeRelationMode::Equivalent {
            return self.relate(source, target, optional);
        }
        if self.same_spelling(source, target) {
            return true;
        }
        let source_id = self.source_type(source);
        let target_id = self.target_type(target);
        let mut relation = TypeRelation::new(
            self.ctx.interner(),
            self.target().types(),
            self.source().types(),
            self.relation,
        );
        if optional {
            relation.is_assignable_optional(target_id, source_id)
        } else {
            relation.is_assignable(target_id, source_id)
        }
    }

    /// Optional flags of a matched parameter pair are compatible.
    pub fn optionality_matches(&self, source_optional: bool, target_optional: bool) -> bool {
        match self.mode {
            TypeRelationMode::Equivalent => source_optional == target_optional,
            // Making a parameter optional keeps every existing call valid.
            TypeRelationMode::Assignable => source_optional || !target_optional,
        }
    }

    fn same_spelling(&self, source: NodeIndex, target: NodeIndex) -> bool {
        if source.is_none() || target.is_none() {
            return source.is_none() && target.is_none();
        }
        if self.is_bound(self.source(), self.source_owner, source)
            || self.is_bound(self.target(), self.target_owner, target)
        {
            return false;
        }
        let source_text = self.source().arena().node_text(source);
        let target_text = self.target().arena().node_text(target);
        source_text == target_text || normalize_type_text(source_text) == normalize_type_text(target_text)
    }

    fn is_bound(&self, surface: &Surface, owner: SymbolId, node: NodeIndex) -> bool {
        surface.types().bound_type(owner, node).is_some()
    }

    fn source_type(&self, node: NodeIndex) -> TypeId {
        self.lowered(self.source(), self.source_owner, node)
    }

    fn target_type(&self, node: NodeIndex) -> TypeId {
        self.lowered(self.target(), self.target_owner, node)
    }

    fn lowered(&self, surface: &Surface, owner: SymbolId, node: NodeIndex) -> TypeId {
        if node.is_none() {
            return TypeId::ANY;
        }
        surface.types().type_in(owner, node).unwrap_or_else(|| {
            trace!(side = %surface.side(), node = node.0, "type node was not lowered");
            TypeId::ANY
        })
    }
}
