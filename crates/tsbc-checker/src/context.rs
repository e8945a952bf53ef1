//! Comparison context: both surfaces parsed, indexed and lowered.
//!
//! An `AstContext` is built once per comparison run and is read-only
//! afterwards. Everything a diff refers to (`NodeRef`, borrowed names) points
//! into it, so results cannot outlive the context.

use serde::Serialize;
use std::fmt;
use tracing::debug;
use tsbc_binder::DeclarationIndex;
use tsbc_common::{Diagnostic, LineMap, Position};
use tsbc_parser::{NodeArena, NodeIndex, parse_surface};
use tsbc_solver::{SurfaceTypes, TypeInterner};

use crate::diff::NodeRef;

/// Which version of the API a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Baseline,
    Current,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Baseline => "baseline",
            Side::Current => "current",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("{side} surface `{file}` has {count} syntax error(s)", count = .diagnostics.len())]
    Parse {
        side: Side,
        file: String,
        diagnostics: Vec<Diagnostic>,
    },
}

impl ContextError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            ContextError::Parse { diagnostics, .. } => diagnostics,
        }
    }
}

/// One parsed and indexed version of the API.
pub struct Surface {
    side: Side,
    file_name: String,
    index: DeclarationIndex,
    types: SurfaceTypes,
    line_map: LineMap,
}

impl Surface {
    pub fn side(&self) -> Side {
        self.side
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn index(&self) -> &DeclarationIndex {
        &self.index
    }

    pub fn arena(&self) -> &NodeArena {
        self.index.arena()
    }

    pub fn types(&self) -> &SurfaceTypes {
        &self.types
    }

    pub fn source_text(&self) -> &str {
        self.index.arena().source_text()
    }

    /// Line and character of the first token of `node`.
    pub fn position(&self, node: NodeIndex) -> Position {
        let offset = self.arena().get(node).map_or(0, |n| n.pos);
        self.line_map.offset_to_position(offset, self.source_text())
    }
}

/// Baseline and current surfaces sharing one type interner.
pub struct AstContext {
    baseline: Surface,
    current: Surface,
    interner: TypeInterner,
}

impl AstContext {
    pub fn build(baseline: &str, current: &str) -> Result<AstContext, ContextError> {
        AstContext::from_sources("baseline.d.ts", baseline, "current.d.ts", current)
    }

    /// Parse and index both sources in parallel, then lower their types.
    ///
    /// Fails on the first side with a syntax error; no partial context is
    /// returned.
    pub fn from_sources(
        baseline_file: &str,
        baseline: &str,
        current_file: &str,
        current: &str,
    ) -> Result<AstContext, ContextError> {
        let (baseline_index, current_index) = rayon::join(
            || index_surface(Side::Baseline, baseline_file, baseline),
            || index_surface(Side::Current, current_file, current),
        );
        let baseline_index = baseline_index?;
        let current_index = current_index?;

        // Lowering interns into one table, so it runs after both parses.
        let mut interner = TypeInterner::new();
        let baseline_types = SurfaceTypes::lower(&baseline_index, &mut interner);
        let current_types = SurfaceTypes::lower(&current_index, &mut interner);
        debug!(
            baseline_nodes = baseline_types.len(),
            current_nodes = current_types.len(),
            interned = interner.len(),
            "lowered surfaces"
        );

        Ok(AstContext {
            baseline: Surface {
                side: Side::Baseline,
                file_name: baseline_file.to_string(),
                line_map: LineMap::build(baseline),
                index: baseline_index,
                types: baseline_types,
            },
            current: Surface {
                side: Side::Current,
                file_name: current_file.to_string(),
                line_map: LineMap::build(current),
                index: current_index,
                types: current_types,
            },
            interner,
        })
    }

    pub fn side(&self, side: Side) -> &Surface {
        match side {
            Side::Baseline => &self.baseline,
            Side::Current => &self.current,
        }
    }

    pub fn baseline(&self) -> &Surface {
        &self.baseline
    }

    pub fn current(&self) -> &Surface {
        &self.current
    }

    pub fn interner(&self) -> &TypeInterner {
        &self.interner
    }

    pub fn node_text(&self, node: NodeRef) -> &str {
        self.side(node.side).arena().node_text(node.index)
    }

    pub fn position(&self, node: NodeRef) -> Position {
        self.side(node.side).position(node.index)
    }
}

fn index_surface(side: Side, file: &str, source: &str) -> Result<DeclarationIndex, ContextError> {
    let (arena, root, diagnostics) = parse_surface(file, source);
    let errors: Vec<Diagnostic> = diagnostics.into_iter().filter(Diagnostic::is_error).collect();
    if !errors.is_empty() {
        debug!(%side, file, errors = errors.len(), "surface failed to parse");
        return Err(ContextError::Parse {
            side,
            file: file.to_string(),
            diagnostics: errors,
        });
    }
    Ok(DeclarationIndex::new(arena, root))
}
