//! Thin node header and the typed data pools behind it.
//!
//! Every node is a 16-byte `Node` in `NodeArena::nodes`. Nodes that carry more
//! than a kind and a span point into one of the per-kind pools through
//! `data_index`; token-shaped nodes (modifiers, keyword types) have no data.

use super::base::{NodeIndex, NodeList};
use std::sync::Arc;
use tsbc_common::interner::{Atom, Interner};

/// Node-level flags.
pub mod node_flags {
    pub const NONE: u16 = 0;
    /// `const enum` or `const` variable statement.
    pub const CONST: u16 = 1 << 0;
    pub const LET: u16 = 1 << 1;
    /// A node produced during error recovery.
    pub const RECOVERED: u16 = 1 << 2;
    /// `declare global { }` augmentation.
    pub const GLOBAL_AUGMENTATION: u16 = 1 << 3;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: u16,
    pub flags: u16,
    /// Start of the node's first token, after leading trivia.
    pub pos: u32,
    /// End of the node's last token.
    pub end: u32,
    /// Index into the pool for `kind`, or `NO_DATA`.
    pub data_index: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    #[inline]
    pub fn new(kind: u16, pos: u32, end: u32) -> Node {
        Node {
            kind,
            flags: node_flags::NONE,
            pos,
            end,
            data_index: Self::NO_DATA,
        }
    }

    #[inline]
    pub fn with_data(kind: u16, pos: u32, end: u32, data_index: u32) -> Node {
        Node {
            kind,
            flags: node_flags::NONE,
            pos,
            end,
            data_index,
        }
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.data_index != Self::NO_DATA
    }

    #[inline]
    pub fn is(&self, kind: u16) -> bool {
        self.kind == kind
    }
}

// =============================================================================
// Names and literals
// =============================================================================

#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub atom: Atom,
    /// Source spelling; used for private identifiers and when `atom` is NONE.
    pub escaped_text: String,
}

#[derive(Clone, Debug)]
pub struct LiteralData {
    /// Unescaped value for strings, raw text for numbers and templates.
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: NodeList,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Clone, Debug)]
pub struct InterfaceData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
}

#[derive(Clone, Debug)]
pub struct FunctionData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
    /// Skipped body block, or NONE for an overload signature.
    pub body: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeAliasData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct EnumData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub members: NodeList,
}

#[derive(Clone, Debug)]
pub struct EnumMemberData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct VariableData {
    pub modifiers: Option<NodeList>,
    pub declarations: NodeList,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ModuleData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct HeritageData {
    /// `ExtendsKeyword` or `ImplementsKeyword`.
    pub token: u16,
    pub types: NodeList,
}

#[derive(Clone, Debug)]
pub struct ExprWithTypeArgsData {
    pub expression: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Clone, Debug)]
pub struct TypeParameterData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ParameterData {
    pub modifiers: Option<NodeList>,
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

// =============================================================================
// Members
// =============================================================================

/// Property, method, call and construct signatures in interfaces and type literals.
#[derive(Clone, Debug)]
pub struct SignatureData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_parameters: Option<NodeList>,
    /// `None` for property signatures.
    pub parameters: Option<NodeList>,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IndexSignatureData {
    pub modifiers: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct PropertyDeclData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub question_token: bool,
    pub exclamation_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct MethodDeclData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ConstructorData {
    pub modifiers: Option<NodeList>,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub body: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct AccessorData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
    pub body: NodeIndex,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Clone, Debug)]
pub struct TypeRefData {
    pub type_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

/// Union, intersection and tuple element lists.
#[derive(Clone, Debug)]
pub struct CompositeTypeData {
    pub types: NodeList,
}

#[derive(Clone, Debug)]
pub struct ArrayTypeData {
    pub element_type: NodeIndex,
}

/// Parenthesized, optional (`T?`) and rest (`...T`) wrappers.
#[derive(Clone, Debug)]
pub struct WrappedTypeData {
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct NamedTupleMemberData {
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_node: NodeIndex,
}

/// Function and constructor types.
#[derive(Clone, Debug)]
pub struct FunctionTypeData {
    pub is_abstract: bool,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeLiteralData {
    pub members: NodeList,
}

#[derive(Clone, Debug)]
pub struct MappedTypeData {
    /// `ReadonlyKeyword`, `PlusToken`, `MinusToken` or 0.
    pub readonly_token: u16,
    pub type_parameter: NodeIndex,
    pub name_type: NodeIndex,
    /// `QuestionToken`, `PlusToken`, `MinusToken` or 0.
    pub question_token: u16,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IndexedAccessTypeData {
    pub object_type: NodeIndex,
    pub index_type: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeOperatorData {
    /// `KeyOfKeyword`, `UniqueKeyword` or `ReadonlyKeyword`.
    pub operator: u16,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeQueryData {
    pub expr_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Clone, Debug)]
pub struct LiteralTypeData {
    pub literal: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ConditionalTypeData {
    pub check_type: NodeIndex,
    pub extends_type: NodeIndex,
    pub true_type: NodeIndex,
    pub false_type: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct InferTypeData {
    pub type_parameter: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ImportTypeData {
    pub is_type_of: bool,
    pub argument: NodeIndex,
    pub qualifier: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Clone, Debug)]
pub struct TypePredicateData {
    pub asserts_modifier: bool,
    pub parameter_name: NodeIndex,
    /// NONE for a bare `asserts x`.
    pub type_node: NodeIndex,
}

// =============================================================================
// Arena
// =============================================================================

/// Arena that owns every node of one parsed surface.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    pub(crate) source_text: Arc<str>,
    pub(crate) interner: Interner,

    pub identifiers: Vec<IdentifierData>,
    pub literals: Vec<LiteralData>,
    pub qualified_names: Vec<QualifiedNameData>,
    pub source_files: Vec<SourceFileData>,

    pub interfaces: Vec<InterfaceData>,
    pub classes: Vec<ClassData>,
    pub functions: Vec<FunctionData>,
    pub type_aliases: Vec<TypeAliasData>,
    pub enums: Vec<EnumData>,
    pub enum_members: Vec<EnumMemberData>,
    pub variables: Vec<VariableData>,
    pub variable_declarations: Vec<VariableDeclarationData>,
    pub modules: Vec<ModuleData>,
    pub heritage_clauses: Vec<HeritageData>,
    pub expr_with_type_args: Vec<ExprWithTypeArgsData>,
    pub type_parameters: Vec<TypeParameterData>,
    pub parameters: Vec<ParameterData>,

    pub signatures: Vec<SignatureData>,
    pub index_signatures: Vec<IndexSignatureData>,
    pub property_decls: Vec<PropertyDeclData>,
    pub method_decls: Vec<MethodDeclData>,
    pub constructors: Vec<ConstructorData>,
    pub accessors: Vec<AccessorData>,

    pub type_refs: Vec<TypeRefData>,
    pub composite_types: Vec<CompositeTypeData>,
    pub array_types: Vec<ArrayTypeData>,
    pub wrapped_types: Vec<WrappedTypeData>,
    pub named_tuple_members: Vec<NamedTupleMemberData>,
    pub function_types: Vec<FunctionTypeData>,
    pub type_literals: Vec<TypeLiteralData>,
    pub mapped_types: Vec<MappedTypeData>,
    pub indexed_access_types: Vec<IndexedAccessTypeData>,
    pub type_operators: Vec<TypeOperatorData>,
    pub type_queries: Vec<TypeQueryData>,
    pub literal_types: Vec<LiteralTypeData>,
    pub conditional_types: Vec<ConditionalTypeData>,
    pub infer_types: Vec<InferTypeData>,
    pub import_types: Vec<ImportTypeData>,
    pub type_predicates: Vec<TypePredicateData>,
}
