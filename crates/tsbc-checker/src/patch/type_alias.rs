//! Type aliases.

use tsbc_binder::symbol_flags;
use tsbc_parser::{NodeIndex, syntax_kind_ext};

use super::{Declared, Detector};
use crate::compare::TypeComparer;
use crate::diff::{AssignDirection, DiffLocation, DiffPair, DiffReasons};

impl<'ctx> Detector<'ctx> {
    /// Any change to the aliased type, including a narrowed or widened
    /// union, is one `TypeAlias` change.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    pub fn patch_type_alias(&self, name: &str, direction: AssignDirection) -> Vec<DiffPair<'ctx>> {
        let source = self.lookup(direction.source_side(), name, symbol_flags::TYPE_ALIAS);
        let target = self.lookup(direction.target_side(), name, symbol_flags::TYPE_ALIAS);
        let declaration = syntax_kind_ext::TYPE_ALIAS_DECLARATION;
        let (source, target) = match (source, target) {
            (Some(source), Some(target)) => (source, target),
            (Some(source), None) => {
                return vec![DiffPair::added(
                    DiffLocation::TypeAlias,
                    direction,
                    source.named(self.ctx, declaration),
                )];
            }
            (None, Some(target)) => {
                return vec![DiffPair::removed(
                    DiffLocation::TypeAlias,
                    direction,
                    target.named(self.ctx, declaration),
                )];
            }
            (None, None) => return Vec::new(),
        };

        let cmp = self.comparer(direction);
        if aliases_match(&cmp, &source, &target) {
            return Vec::new();
        }
        vec![DiffPair::changed(
            DiffLocation::TypeAlias,
            DiffReasons::TYPE_CHANGED,
            direction,
            source.named(self.ctx, declaration),
            target.named(self.ctx, declaration),
        )]
    }
}

fn aliases_match(cmp: &TypeComparer<'_>, source: &Declared<'_>, target: &Declared<'_>) -> bool {
    let declaration = syntax_kind_ext::TYPE_ALIAS_DECLARATION;
    let source_decl = source.first_declaration(declaration);
    let target_decl = target.first_declaration(declaration);
    // Type parameters are positional, so only their number matters.
    if source.index.type_parameter_names(source_decl).len()
        != target.index.type_parameter_names(target_decl).len()
    {
        return false;
    }
    cmp.types_match(aliased_type(source, source_decl), aliased_type(target, target_decl))
}

fn aliased_type(declared: &Declared<'_>, decl: NodeIndex) -> NodeIndex {
    let arena = declared.index.arena();
    arena
        .get(decl)
        .and_then(|n| arena.get_type_alias(n))
        .map_or(NodeIndex::NONE, |alias| alias.type_node)
}
