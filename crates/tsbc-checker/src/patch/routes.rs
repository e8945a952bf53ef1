//! Route tables: an interface whose call signatures are keyed by the
//! literal type of their first parameter.
//!
//! ```ts
//! interface Routes {
//!   (path: "/users/{id}", id: string): UserOperations;
//!   (path: "/users"): UserListOperations;
//! }
//! ```

use tracing::debug;
use tsbc_binder::{FxIndexMap, symbol_flags};
use tsbc_parser::{NodeIndex, syntax_kind_ext};
use tsbc_scanner::SyntaxKind;

use super::Detector;
use crate::context::Surface;
use crate::diff::{DiffLocation, DiffPair};
use crate::signature_differ::{SignatureParts, diff_signatures, signature_text};

impl<'ctx> Detector<'ctx> {
    /// Route tables are always checked current against baseline.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %self.options.routes_interface_name))]
    pub fn patch_routes(&self) -> Vec<DiffPair<'ctx>> {
        let direction = Self::FIXED_DIRECTION;
        let name = self.options.routes_interface_name.as_str();
        let source = self.lookup(direction.source_side(), name, symbol_flags::INTERFACE);
        let target = self.lookup(direction.target_side(), name, symbol_flags::INTERFACE);
        let (source, target) = match (source, target) {
            (Some(source), Some(target)) => (source, target),
            (Some(source), None) => {
                return vec![DiffPair::added(
                    DiffLocation::Interface,
                    direction,
                    source.named(self.ctx, syntax_kind_ext::INTERFACE_DECLARATION),
                )];
            }
            (None, Some(target)) => {
                return vec![DiffPair::removed(
                    DiffLocation::Interface,
                    direction,
                    target.named(self.ctx, syntax_kind_ext::INTERFACE_DECLARATION),
                )];
            }
            (None, None) => {
                debug!("no route table on either side");
                return Vec::new();
            }
        };
        let (Some(source_members), Some(target_members)) = (
            source.index.effective_members(source.id),
            target.index.effective_members(target.id),
        ) else {
            return Vec::new();
        };

        let cmp = self.comparer(direction);
        let source_routes = route_table(cmp.source(), &source_members.call_signatures);
        let target_routes = route_table(cmp.target(), &target_members.call_signatures);
        let source_name = |sig: NodeIndex| signature_text(cmp.source().arena(), sig);
        let target_name = |sig: NodeIndex| signature_text(cmp.target().arena(), sig);

        let mut pairs = Vec::new();
        for (route, &target_sig) in &target_routes {
            match source_routes.get(route) {
                Some(&source_sig) => pairs.extend(diff_signatures(
                    &cmp,
                    cmp.named_source(source_sig, source_name(source_sig)),
                    cmp.named_target(target_sig, target_name(target_sig)),
                    1,
                )),
                None => pairs.push(DiffPair::removed(
                    DiffLocation::Signature,
                    direction,
                    cmp.named_target(target_sig, target_name(target_sig)),
                )),
            }
        }
        for (route, &source_sig) in &source_routes {
            if !target_routes.contains_key(route) {
                pairs.push(DiffPair::added(
                    DiffLocation::Signature,
                    direction,
                    cmp.named_source(source_sig, source_name(source_sig)),
                ));
            }
        }
        pairs
    }
}

/// Call signatures by route literal. The first signature for a route wins.
fn route_table<'ctx>(surface: &'ctx Surface, signatures: &[NodeIndex]) -> FxIndexMap<&'ctx str, NodeIndex> {
    let mut routes = FxIndexMap::default();
    for &sig in signatures {
        match route_key(surface, sig) {
            Some(key) => {
                if routes.contains_key(key) {
                    debug!(route = key, side = %surface.side(), "duplicate route signature ignored");
                    continue;
                }
                routes.insert(key, sig);
            }
            None => debug!(
                signature = surface.arena().node_text(sig),
                side = %surface.side(),
                "route signature without a literal discriminant skipped"
            ),
        }
    }
    routes
}

/// Literal value of the first parameter's type.
fn route_key(surface: &Surface, sig: NodeIndex) -> Option<&str> {
    let arena = surface.arena();
    let parts = SignatureParts::of(arena, sig)?;
    let first = arena.get(*parts.params.first()?)?;
    let mut type_node = arena.get_parameter(first)?.type_annotation;
    while let Some(n) = arena.get(type_node)
        && n.kind == syntax_kind_ext::PARENTHESIZED_TYPE
    {
        type_node = arena.get_wrapped_type(n)?.type_node;
    }
    let literal_type = arena.get_literal_type(arena.get(type_node)?)?;
    let literal = arena.get(literal_type.literal)?;
    if literal.kind == SyntaxKind::StringLiteral as u16
        || literal.kind == SyntaxKind::NumericLiteral as u16
    {
        arena.get_literal(literal).map(|l| l.text.as_str())
    } else {
        None
    }
}
