//! Enums: compared by member names.

use rustc_hash::FxHashSet;
use tsbc_binder::symbol_flags;
use tsbc_parser::{NodeIndex, syntax_kind_ext};

use super::{Declared, Detector};
use crate::diff::{AssignDirection, DiffLocation, DiffPair};

impl<'ctx> Detector<'ctx> {
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    pub fn patch_enum(&self, name: &str, direction: AssignDirection) -> Vec<DiffPair<'ctx>> {
        let source = self.lookup(direction.source_side(), name, symbol_flags::ENUM);
        let target = self.lookup(direction.target_side(), name, symbol_flags::ENUM);
        let declaration = syntax_kind_ext::ENUM_DECLARATION;
        let (source, target) = match (source, target) {
            (Some(source), Some(target)) => (source, target),
            (Some(source), None) => {
                return vec![DiffPair::added(
                    DiffLocation::Enum,
                    direction,
                    source.named(self.ctx, declaration),
                )];
            }
            (None, Some(target)) => {
                return vec![DiffPair::removed(
                    DiffLocation::Enum,
                    direction,
                    target.named(self.ctx, declaration),
                )];
            }
            (None, None) => return Vec::new(),
        };

        let source_members = member_names(&source);
        let target_members = member_names(&target);
        let source_names: FxHashSet<&str> = source_members.iter().map(|(name, _)| *name).collect();
        let target_names: FxHashSet<&str> = target_members.iter().map(|(name, _)| *name).collect();

        let mut pairs = Vec::new();
        for &(member, node) in &target_members {
            if !source_names.contains(member) {
                pairs.push(DiffPair::removed(
                    DiffLocation::EnumMember,
                    direction,
                    crate::NamedNode::new(self.ctx, target.side, node, member),
                ));
            }
        }
        for &(member, node) in &source_members {
            if !target_names.contains(member) {
                pairs.push(DiffPair::added(
                    DiffLocation::EnumMember,
                    direction,
                    crate::NamedNode::new(self.ctx, source.side, node, member),
                ));
            }
        }
        pairs
    }
}

fn member_names<'ctx>(declared: &Declared<'ctx>) -> Vec<(&'ctx str, NodeIndex)> {
    let arena = declared.index.arena();
    declared
        .index
        .enum_members(declared.id)
        .into_iter()
        .filter_map(|member| {
            let data = arena.get_enum_member(arena.get(member)?)?;
            Some((arena.property_name_text(data.name)?, member))
        })
        .collect()
}
