//! Type model for TypeScript API surfaces.
//!
//! Type nodes of both surfaces are lowered into one `TypeInterner`, aliases
//! inlined and object shapes normalised, so most "did this type change"
//! questions reduce to comparing two `TypeId`s. `TypeRelation` answers the
//! rest structurally: differently named interfaces with the same shape,
//! recursive types, and one-way assignability.

pub mod intern;
pub mod lower;
pub mod recursion;
pub mod relation;
pub mod types;

pub use intern::{TypeInterner, normalize_type_text};
pub use lower::{SurfaceTypes, TypeLowering};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use relation::{RelationOptions, TypeRelation};
pub use types::{
    FunctionShape, IntrinsicKind, LiteralValue, ObjectShape, ParamInfo, PropertyInfo,
    TupleElement, TypeData, TypeId,
};

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod recursion_tests;
#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod intern_tests;
#[cfg(test)]
#[path = "../tests/lower_tests.rs"]
mod lower_tests;
#[cfg(test)]
#[path = "../tests/relation_tests.rs"]
mod relation_tests;
