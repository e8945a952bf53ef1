pub mod base;
pub mod node;
mod node_access;
mod node_arena;
pub mod state;
mod state_class_members;
mod state_declarations;
mod state_types;
pub mod syntax_kind_ext;

pub use base::{NodeIndex, NodeList};
pub use node::{Node, NodeArena, node_flags};
pub use state::{ParseDiagnostic, ParserState};
