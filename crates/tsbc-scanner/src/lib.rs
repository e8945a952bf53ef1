//! Tokenizer for TypeScript declaration surfaces.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine with save/restore for look-ahead
//! - `char_codes` - Character classification utilities

pub mod char_codes;
pub mod scanner;
pub mod syntax_kind;

pub use scanner::{ScannerDiagnostic, ScannerSnapshot, ScannerState, token_flags};
pub use syntax_kind::{SyntaxKind, keyword_from_text};

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod scanner_tests;
