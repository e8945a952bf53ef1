//! Node kinds that have no token form.
//!
//! Token-shaped nodes (identifiers, literals, keyword types, modifiers) reuse
//! their `SyntaxKind` value as the node kind. Everything else is numbered here,
//! well above `SyntaxKind::Count`.

// Names
pub const QUALIFIED_NAME: u16 = 300;
pub const COMPUTED_PROPERTY_NAME: u16 = 301;
pub const BINDING_PATTERN: u16 = 302;

// Top level
pub const SOURCE_FILE: u16 = 310;
pub const IMPORT_DECLARATION: u16 = 311;
pub const EXPORT_DECLARATION: u16 = 312;
pub const EXPORT_ASSIGNMENT: u16 = 313;

// Declarations
pub const INTERFACE_DECLARATION: u16 = 320;
pub const CLASS_DECLARATION: u16 = 321;
pub const FUNCTION_DECLARATION: u16 = 322;
pub const TYPE_ALIAS_DECLARATION: u16 = 323;
pub const ENUM_DECLARATION: u16 = 324;
pub const ENUM_MEMBER: u16 = 325;
pub const VARIABLE_STATEMENT: u16 = 326;
pub const VARIABLE_DECLARATION: u16 = 327;
pub const MODULE_DECLARATION: u16 = 328;
pub const HERITAGE_CLAUSE: u16 = 329;
pub const EXPRESSION_WITH_TYPE_ARGUMENTS: u16 = 330;
pub const TYPE_PARAMETER: u16 = 331;
pub const PARAMETER: u16 = 332;
/// A skipped function body, module body or initializer expression.
pub const BLOCK: u16 = 333;
pub const SKIPPED_EXPRESSION: u16 = 334;

// Type members
pub const PROPERTY_SIGNATURE: u16 = 340;
pub const METHOD_SIGNATURE: u16 = 341;
pub const CALL_SIGNATURE: u16 = 342;
pub const CONSTRUCT_SIGNATURE: u16 = 343;
pub const INDEX_SIGNATURE: u16 = 344;

// Class members
pub const PROPERTY_DECLARATION: u16 = 350;
pub const METHOD_DECLARATION: u16 = 351;
pub const CONSTRUCTOR: u16 = 352;
pub const GET_ACCESSOR: u16 = 353;
pub const SET_ACCESSOR: u16 = 354;
pub const CLASS_STATIC_BLOCK: u16 = 355;

// Types
pub const TYPE_REFERENCE: u16 = 360;
pub const UNION_TYPE: u16 = 361;
pub const INTERSECTION_TYPE: u16 = 362;
pub const ARRAY_TYPE: u16 = 363;
pub const TUPLE_TYPE: u16 = 364;
pub const NAMED_TUPLE_MEMBER: u16 = 365;
pub const OPTIONAL_TYPE: u16 = 366;
pub const REST_TYPE: u16 = 367;
pub const PARENTHESIZED_TYPE: u16 = 368;
pub const FUNCTION_TYPE: u16 = 369;
pub const CONSTRUCTOR_TYPE: u16 = 370;
pub const TYPE_LITERAL: u16 = 371;
pub const MAPPED_TYPE: u16 = 372;
pub const INDEXED_ACCESS_TYPE: u16 = 373;
pub const TYPE_OPERATOR: u16 = 374;
pub const TYPE_QUERY: u16 = 375;
pub const LITERAL_TYPE: u16 = 376;
pub const CONDITIONAL_TYPE: u16 = 377;
pub const INFER_TYPE: u16 = 378;
pub const IMPORT_TYPE: u16 = 379;
pub const TYPE_PREDICATE: u16 = 380;
pub const THIS_TYPE: u16 = 381;

/// True for node kinds that can appear where a type is expected.
pub fn is_type_node(kind: u16) -> bool {
    (TYPE_REFERENCE..=THIS_TYPE).contains(&kind) || keyword_type_kind(kind)
}

/// Keyword type nodes (`string`, `any`, ...) reuse the keyword's token kind.
pub fn keyword_type_kind(kind: u16) -> bool {
    use tsbc_scanner::SyntaxKind;
    kind < SyntaxKind::Count as u16 && {
        let keyword_kinds = [
            SyntaxKind::AnyKeyword,
            SyntaxKind::UnknownKeyword,
            SyntaxKind::NeverKeyword,
            SyntaxKind::VoidKeyword,
            SyntaxKind::UndefinedKeyword,
            SyntaxKind::NullKeyword,
            SyntaxKind::StringKeyword,
            SyntaxKind::NumberKeyword,
            SyntaxKind::BooleanKeyword,
            SyntaxKind::BigIntKeyword,
            SyntaxKind::SymbolKeyword,
            SyntaxKind::ObjectKeyword,
        ];
        keyword_kinds.iter().any(|k| *k as u16 == kind)
    }
}
