//! Whole-surface detection: every top-level name dispatched by kind.

use indexmap::IndexMap;
use tracing::{debug, info_span};
use tsbc_binder::DeclarationKind;
use tsbc_parser::syntax_kind_ext;

use super::Detector;
use crate::context::{AstContext, ContextError, Side};
use crate::diff::{AssignDirection, DiffLocation, DiffPair, DiffRecord};
use crate::options::DetectorOptions;

/// Location and declaration node kind a whole declaration is reported at.
/// Variables and namespaces are indexed but never diffed.
fn whole_declaration(kind: DeclarationKind) -> Option<(DiffLocation, u16)> {
    match kind {
        DeclarationKind::Class => Some((DiffLocation::Class, syntax_kind_ext::CLASS_DECLARATION)),
        DeclarationKind::Interface => {
            Some((DiffLocation::Interface, syntax_kind_ext::INTERFACE_DECLARATION))
        }
        DeclarationKind::Enum => Some((DiffLocation::Enum, syntax_kind_ext::ENUM_DECLARATION)),
        DeclarationKind::Function => {
            Some((DiffLocation::Signature, syntax_kind_ext::FUNCTION_DECLARATION))
        }
        DeclarationKind::TypeAlias => {
            Some((DiffLocation::TypeAlias, syntax_kind_ext::TYPE_ALIAS_DECLARATION))
        }
        DeclarationKind::Variable | DeclarationKind::Namespace => None,
    }
}

impl<'ctx> Detector<'ctx> {
    /// Diff every declared name: baseline names in order, then names only
    /// the current surface declares. Names without differences are left out.
    pub fn detect_all(&self) -> IndexMap<String, Vec<DiffPair<'ctx>>> {
        self.detect_all_in(AssignDirection::CurrentToBaseline)
    }

    /// `detect_all` under an explicit direction. Functions and route tables
    /// are still checked current against baseline.
    pub fn detect_all_in(&self, direction: AssignDirection) -> IndexMap<String, Vec<DiffPair<'ctx>>> {
        let _span = info_span!("detect_all", %direction).entered();
        let baseline = self.ctx.baseline().index();
        let current = self.ctx.current().index();
        let names = baseline
            .names()
            .chain(current.names().filter(|name| baseline.find(name).is_none()));

        let mut results = IndexMap::new();
        for name in names {
            let pairs = self.patch_declaration(name, direction);
            if !pairs.is_empty() {
                results.insert(name.to_string(), pairs);
            }
        }
        debug!(changed = results.len(), "detection finished");
        results
    }

    /// Diff one name according to its declaration kind.
    ///
    /// A name whose kind changed between the surfaces is reported as the
    /// target declaration removed and the source declaration added.
    pub fn patch_declaration(&self, name: &str, direction: AssignDirection) -> Vec<DiffPair<'ctx>> {
        let source_kind = self.kind_of(direction.source_side(), name);
        let target_kind = self.kind_of(direction.target_side(), name);

        if name == self.options.routes_interface_name
            && (source_kind == Some(DeclarationKind::Interface)
                || target_kind == Some(DeclarationKind::Interface))
        {
            return self.patch_routes();
        }

        match (source_kind, target_kind) {
            (Some(source), Some(target)) if source != target => {
                debug!(name, from = target.as_str(), to = source.as_str(), "declaration kind changed");
                let mut pairs = Vec::with_capacity(2);
                if let Some((location, node_kind)) = whole_declaration(target)
                    && let Some(declared) = self.lookup(direction.target_side(), name, target.flag())
                {
                    pairs.push(DiffPair::removed(location, direction, declared.named(self.ctx, node_kind)));
                }
                if let Some((location, node_kind)) = whole_declaration(source)
                    && let Some(declared) = self.lookup(direction.source_side(), name, source.flag())
                {
                    pairs.push(DiffPair::added(location, direction, declared.named(self.ctx, node_kind)));
                }
                pairs
            }
            (source, target) => match source.or(target) {
                Some(kind) => self.patch_kind(kind, name, direction),
                None => Vec::new(),
            },
        }
    }

    fn patch_kind(&self, kind: DeclarationKind, name: &str, direction: AssignDirection) -> Vec<DiffPair<'ctx>> {
        match kind {
            DeclarationKind::Class => self.patch_class(name, direction),
            DeclarationKind::Interface => self.patch_interface(name, direction),
            DeclarationKind::Function => self.patch_function(name),
            DeclarationKind::TypeAlias => self.patch_type_alias(name, direction),
            DeclarationKind::Enum => self.patch_enum(name, direction),
            DeclarationKind::Variable | DeclarationKind::Namespace => Vec::new(),
        }
    }

    fn kind_of(&self, side: Side, name: &str) -> Option<DeclarationKind> {
        self.ctx.side(side).index().declaration_kind(name)
    }
}

/// Diff every declaration of a built context.
pub fn detect_breaking_changes<'ctx>(
    ctx: &'ctx AstContext,
    options: &DetectorOptions,
) -> IndexMap<String, Vec<DiffPair<'ctx>>> {
    Detector::new(ctx, options.clone()).detect_all()
}

/// Build a context from two surface texts and diff every declaration.
///
/// Results are owned since the context is dropped on return.
pub fn detect_breaking_changes_between_surfaces(
    baseline: &str,
    current: &str,
    options: &DetectorOptions,
) -> Result<IndexMap<String, Vec<DiffRecord>>, ContextError> {
    let ctx = AstContext::build(baseline, current)?;
    let results = detect_breaking_changes(&ctx, options)
        .into_iter()
        .map(|(name, pairs)| {
            let records = pairs.iter().map(|pair| DiffRecord::new(&ctx, pair)).collect();
            (name, records)
        })
        .collect();
    Ok(results)
}
