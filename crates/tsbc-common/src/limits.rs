//! Centralized limits and thresholds.
//!
//! Recursion limits for the type solver (structural comparison, alias
//! expansion) live in `tsbc_solver::recursion::RecursionProfile`; the values
//! here cover the parser and the Declaration Index.

/// Maximum nesting depth of type expressions and type literals in the parser.
///
/// Generated SDK surfaces nest object literals a few levels deep at most; a
/// surface that goes past this is either adversarial or not a declaration
/// file. The parser reports TS1452 and stops descending.
pub const MAX_PARSER_DEPTH: u32 = 100;

/// Maximum length of an `extends` chain followed while flattening members.
///
/// Cycles are caught by the in-progress marker before this limit matters; the
/// limit only bounds very long acyclic chains.
pub const MAX_INHERITANCE_DEPTH: u32 = 64;

/// Maximum number of nested alias expansions while lowering one type.
pub const MAX_ALIAS_EXPANSION_DEPTH: u32 = 50;
