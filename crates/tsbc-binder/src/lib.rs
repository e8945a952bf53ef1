//! Declaration index for TypeScript API surfaces.
//!
//! Binds the top-level declarations of a parsed surface into symbols (merging
//! repeated `interface` declarations), and flattens the member sets of classes
//! and interfaces through their `extends` chains. The flattened sets are what
//! the breaking-change checker matches members against.

pub mod members;
pub mod state;
mod state_members;
pub mod symbols;

pub use members::{EffectiveMembers, FxIndexMap, Member, MemberKey, MemberKind};
pub use state::{BinderState, DeclarationIndex, has_body};
pub use state_members::{collect_class_members, collect_type_members};
pub use symbols::{DeclarationKind, Symbol, SymbolArena, SymbolId, symbol_flags};

#[cfg(test)]
#[path = "../tests/symbols_tests.rs"]
mod symbols_tests;
#[cfg(test)]
#[path = "../tests/members_tests.rs"]
mod members_tests;
