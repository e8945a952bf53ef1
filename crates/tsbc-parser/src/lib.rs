//! Parser for TypeScript declaration surfaces.
//!
//! Produces a thin-node arena AST (`NodeArena`) covering the subset of
//! TypeScript that API reports and `.d.ts` files use. Function bodies and
//! initializers are recognised and skipped, never parsed.

pub mod parser;

pub use parser::{
    Node, NodeArena, NodeIndex, NodeList, ParseDiagnostic, ParserState, node_flags,
    syntax_kind_ext,
};

/// Parse `source` and return the arena plus any syntax diagnostics.
pub fn parse_surface(
    file_name: &str,
    source: &str,
) -> (NodeArena, NodeIndex, Vec<tsbc_common::Diagnostic>) {
    let mut parser = ParserState::new(file_name.to_string(), source.to_string());
    let root = parser.parse_source_file();
    let (arena, diagnostics) = parser.into_parts();
    (arena, root, diagnostics)
}

#[cfg(test)]
#[path = "../tests/parser_tests.rs"]
mod parser_tests;
#[cfg(test)]
#[path = "../tests/type_parsing_tests.rs"]
mod type_parsing_tests;
#[cfg(test)]
#[path = "../tests/api_report_tests.rs"]
mod api_report_tests;
