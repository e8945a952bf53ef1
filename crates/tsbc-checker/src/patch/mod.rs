//! Per-declaration entry points and the whole-surface detector.

use tsbc_binder::{DeclarationIndex, Symbol, SymbolId};
use tsbc_parser::NodeIndex;

use crate::compare::TypeComparer;
use crate::context::{AstContext, Side};
use crate::diff::{AssignDirection, NamedNode};
use crate::options::DetectorOptions;

pub mod aggregate;
pub mod containers;
pub mod enums;
pub mod function;
pub mod routes;
pub mod type_alias;

/// Runs the entry points over one context with one set of options.
pub struct Detector<'ctx> {
    ctx: &'ctx AstContext,
    options: DetectorOptions,
}

impl<'ctx> Detector<'ctx> {
    /// Direction functions and route tables are checked in, whatever
    /// direction the other declarations use.
    pub const FIXED_DIRECTION: AssignDirection = AssignDirection::CurrentToBaseline;

    pub fn new(ctx: &'ctx AstContext, options: DetectorOptions) -> Self {
        Detector { ctx, options }
    }

    pub fn context(&self) -> &'ctx AstContext {
        self.ctx
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    fn comparer(&self, direction: AssignDirection) -> TypeComparer<'ctx> {
        TypeComparer::new(self.ctx, direction, &self.options)
    }

    /// The symbol `name` on `side`, if it carries any of `flags`.
    fn lookup(&self, side: Side, name: &str, flags: u32) -> Option<Declared<'ctx>> {
        let index = self.ctx.side(side).index();
        let id = index.find(name)?;
        let symbol = index.symbol(id).filter(|s| s.has_flags(flags))?;
        Some(Declared {
            side,
            index,
            id,
            symbol,
        })
    }
}

/// A symbol found on one side.
#[derive(Clone, Copy)]
struct Declared<'ctx> {
    side: Side,
    index: &'ctx DeclarationIndex,
    id: SymbolId,
    symbol: &'ctx Symbol,
}

impl<'ctx> Declared<'ctx> {
    fn name(&self) -> &'ctx str {
        &self.symbol.escaped_name
    }

    /// First declaration of node kind `kind`, or the first declaration at all.
    fn first_declaration(&self, kind: u16) -> NodeIndex {
        self.index
            .declarations_of(self.id, kind)
            .next()
            .or_else(|| self.symbol.declarations.first().copied())
            .unwrap_or(NodeIndex::NONE)
    }

    fn named(&self, ctx: &'ctx AstContext, kind: u16) -> NamedNode<'ctx> {
        NamedNode::new(ctx, self.side, self.first_declaration(kind), self.name())
    }
}

pub fn patch_class<'ctx>(
    name: &str,
    ctx: &'ctx AstContext,
    direction: AssignDirection,
) -> Vec<crate::DiffPair<'ctx>> {
    Detector::new(ctx, DetectorOptions::default()).patch_class(name, direction)
}

pub fn patch_interface<'ctx>(
    name: &str,
    ctx: &'ctx AstContext,
    direction: AssignDirection,
) -> Vec<crate::DiffPair<'ctx>> {
    Detector::new(ctx, DetectorOptions::default()).patch_interface(name, direction)
}

/// Functions are always checked current against baseline.
pub fn patch_function<'ctx>(name: &str, ctx: &'ctx AstContext) -> Vec<crate::DiffPair<'ctx>> {
    Detector::new(ctx, DetectorOptions::default()).patch_function(name)
}

pub fn patch_type_alias<'ctx>(
    name: &str,
    ctx: &'ctx AstContext,
    direction: AssignDirection,
) -> Vec<crate::DiffPair<'ctx>> {
    Detector::new(ctx, DetectorOptions::default()).patch_type_alias(name, direction)
}

pub fn patch_routes(ctx: &AstContext) -> Vec<crate::DiffPair<'_>> {
    Detector::new(ctx, DetectorOptions::default()).patch_routes()
}

pub fn patch_enum<'ctx>(
    name: &str,
    ctx: &'ctx AstContext,
    direction: AssignDirection,
) -> Vec<crate::DiffPair<'ctx>> {
    Detector::new(ctx, DetectorOptions::default()).patch_enum(name, direction)
}
