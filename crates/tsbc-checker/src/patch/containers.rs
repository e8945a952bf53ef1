//! Classes and interfaces.

use tracing::debug;
use tsbc_binder::symbol_flags;
use tsbc_parser::syntax_kind_ext;

use super::Detector;
use crate::diff::{AssignDirection, DiffLocation, DiffPair};
use crate::member_matcher::MemberMatcher;

impl<'ctx> Detector<'ctx> {
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    pub fn patch_class(&self, name: &str, direction: AssignDirection) -> Vec<DiffPair<'ctx>> {
        self.patch_container(
            name,
            direction,
            symbol_flags::CLASS,
            syntax_kind_ext::CLASS_DECLARATION,
            DiffLocation::Class,
        )
    }

    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    pub fn patch_interface(&self, name: &str, direction: AssignDirection) -> Vec<DiffPair<'ctx>> {
        self.patch_container(
            name,
            direction,
            symbol_flags::INTERFACE,
            syntax_kind_ext::INTERFACE_DECLARATION,
            DiffLocation::Interface,
        )
    }

    fn patch_container(
        &self,
        name: &str,
        direction: AssignDirection,
        flag: u32,
        declaration_kind: u16,
        location: DiffLocation,
    ) -> Vec<DiffPair<'ctx>> {
        let source = self.lookup(direction.source_side(), name, flag);
        let target = self.lookup(direction.target_side(), name, flag);
        let (source, target) = match (source, target) {
            (Some(source), Some(target)) => (source, target),
            (Some(source), None) => {
                return vec![DiffPair::added(
                    location,
                    direction,
                    source.named(self.ctx, declaration_kind),
                )];
            }
            (None, Some(target)) => {
                return vec![DiffPair::removed(
                    location,
                    direction,
                    target.named(self.ctx, declaration_kind),
                )];
            }
            (None, None) => {
                debug!("not declared on either side");
                return Vec::new();
            }
        };

        let (Some(source_members), Some(target_members)) = (
            source.index.effective_members(source.id),
            target.index.effective_members(target.id),
        ) else {
            return Vec::new();
        };
        let cmp = self.comparer(direction).within(source.id, target.id);
        let pairs = MemberMatcher::new(&cmp, &self.options).match_members(source_members, target_members);
        debug!(pairs = pairs.len(), "compared members");
        pairs
    }
}
