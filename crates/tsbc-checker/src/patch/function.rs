//! Top-level functions and their overloads.

use tsbc_binder::symbol_flags;
use tsbc_parser::syntax_kind_ext;

use super::Detector;
use crate::diff::{DiffLocation, DiffPair};
use crate::member_matcher::MemberMatcher;

impl<'ctx> Detector<'ctx> {
    /// Functions are always checked current against baseline.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    pub fn patch_function(&self, name: &str) -> Vec<DiffPair<'ctx>> {
        let direction = Self::FIXED_DIRECTION;
        let source = self.lookup(direction.source_side(), name, symbol_flags::FUNCTION);
        let target = self.lookup(direction.target_side(), name, symbol_flags::FUNCTION);
        let declaration = syntax_kind_ext::FUNCTION_DECLARATION;
        let (source, target) = match (source, target) {
            (Some(source), Some(target)) => (source, target),
            (Some(source), None) => {
                return vec![DiffPair::added(
                    DiffLocation::Signature,
                    direction,
                    source.named(self.ctx, declaration),
                )];
            }
            (None, Some(target)) => {
                return vec![DiffPair::removed(
                    DiffLocation::Signature,
                    direction,
                    target.named(self.ctx, declaration),
                )];
            }
            (None, None) => return Vec::new(),
        };

        let source_signatures = source.index.overloads(source.id);
        let target_signatures = target.index.overloads(target.id);
        let cmp = self.comparer(direction);
        let mut pairs = Vec::new();
        MemberMatcher::new(&cmp, &self.options).match_callable(
            source.name(),
            &source_signatures,
            &target_signatures,
            &mut pairs,
        );
        pairs
    }
}
