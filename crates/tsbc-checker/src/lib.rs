//! Breaking-change detection between two TypeScript API surfaces.
//!
//! This crate is organized into several modules:
//! - `context` - `AstContext`, both surfaces parsed, indexed and lowered
//! - `diff` - `DiffPair` and the location/reason vocabulary
//! - `options` - `DetectorOptions`
//! - `compare` - type comparison for one assign direction
//! - `member_matcher` - pairing members, signatures and overloads
//! - `signature_differ` / `modifier_differ` - classifying a matched pair
//! - `patch` - per-declaration entry points and the aggregate detector
//!
//! Results are relative to an `AssignDirection`: the target side is the
//! contract existing consumers were written against, the source side is the
//! shape being checked.

pub mod compare;
pub mod context;
pub mod diff;
pub mod member_matcher;
pub mod modifier_differ;
pub mod options;
pub mod patch;
pub mod signature_differ;

pub use context::{AstContext, ContextError, Side, Surface};
pub use diff::{
    AssignDirection, DiffLocation, DiffPair, DiffReasons, DiffRecord, NamedNode, NodeRecord,
    NodeRef,
};
pub use options::{DetectorOptions, OptionsError, TypeRelationMode};
pub use patch::aggregate::{detect_breaking_changes, detect_breaking_changes_between_surfaces};
pub use patch::{
    Detector, patch_class, patch_enum, patch_function, patch_interface, patch_routes,
    patch_type_alias,
};

#[cfg(test)]
#[path = "../tests/test_utils.rs"]
mod test_utils;
#[cfg(test)]
#[path = "../tests/context_tests.rs"]
mod context_tests;
#[cfg(test)]
#[path = "../tests/class_tests.rs"]
mod class_tests;
#[cfg(test)]
#[path = "../tests/interface_tests.rs"]
mod interface_tests;
#[cfg(test)]
#[path = "../tests/function_tests.rs"]
mod function_tests;
#[cfg(test)]
#[path = "../tests/type_alias_tests.rs"]
mod type_alias_tests;
#[cfg(test)]
#[path = "../tests/routes_tests.rs"]
mod routes_tests;
#[cfg(test)]
#[path = "../tests/enum_tests.rs"]
mod enum_tests;
#[cfg(test)]
#[path = "../tests/detector_tests.rs"]
mod detector_tests;
#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod options_tests;
