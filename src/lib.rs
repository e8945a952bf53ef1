//! tsbc: breaking-change detection between two TypeScript API surfaces.
//!
//! The work is split across the workspace crates; this crate re-exports
//! them under one name and owns tracing setup for the binaries.

// String interning and diagnostics shared by every stage
pub use tsbc_common as common;
pub use tsbc_common::{Diagnostic, Position};

// Scanner and parser for the declaration-file subset
pub use tsbc_parser as parser;
pub use tsbc_scanner as scanner;

// Declaration index: symbols and flattened member sets
pub use tsbc_binder as binder;

// Structural type comparison
pub use tsbc_solver as solver;

// Diff model, matchers and the per-declaration detectors
pub use tsbc_checker as checker;
pub use tsbc_checker::{
    AssignDirection, AstContext, ContextError, Detector, DetectorOptions, DiffLocation, DiffPair,
    DiffReasons, DiffRecord, OptionsError, Side, TypeRelationMode, detect_breaking_changes,
    detect_breaking_changes_between_surfaces, patch_class, patch_enum, patch_function,
    patch_interface, patch_routes, patch_type_alias,
};

// Tracing subscriber setup, driven by TSBC_LOG / TSBC_LOG_FORMAT
pub mod tracing_config;

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tracing_config_tests;
