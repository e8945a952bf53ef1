//! Common types and utilities shared by the tsbc crates.
//!
//! This crate provides foundational types used across all tsbc crates:
//! - String interning (`Atom`, `Interner`)
//! - Diagnostics produced while reading a surface (`Diagnostic`)
//! - Line/column mapping for reports (`LineMap`, `Position`)
//! - Recursion and size limits

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod interner_tests;
#[cfg(test)]
#[path = "../tests/position_tests.rs"]
mod position_tests;
