//! NodeArena access methods.
//!
//! Typed getters check the node kind before indexing a pool, so passing the
//! wrong node returns `None` instead of unrelated data.

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::syntax_kind_ext as ext;
use tsbc_scanner::SyntaxKind;

macro_rules! typed_getters {
    ($($method:ident($($kind:expr),+) => $pool:ident : $data:ty),+ $(,)?) => {
        $(
            #[inline]
            pub fn $method(&self, node: &Node) -> Option<&$data> {
                if node.has_data() && ($(node.kind == $kind)||+) {
                    self.$pool.get(node.data_index as usize)
                } else {
                    None
                }
            }
        )+
    };
}

impl NodeArena {
    /// Get a thin node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn kind_of(&self, index: NodeIndex) -> Option<u16> {
        self.get(index).map(|node| node.kind)
    }

    typed_getters! {
        get_identifier(SyntaxKind::Identifier as u16, SyntaxKind::PrivateIdentifier as u16)
            => identifiers: IdentifierData,
        get_literal(
            SyntaxKind::StringLiteral as u16,
            SyntaxKind::NumericLiteral as u16,
            SyntaxKind::BigIntLiteral as u16,
            SyntaxKind::TemplateLiteral as u16
        ) => literals: LiteralData,
        get_qualified_name(ext::QUALIFIED_NAME) => qualified_names: QualifiedNameData,
        get_source_file(ext::SOURCE_FILE) => source_files: SourceFileData,
        get_interface(ext::INTERFACE_DECLARATION) => interfaces: InterfaceData,
        get_class(ext::CLASS_DECLARATION) => classes: ClassData,
        get_function(ext::FUNCTION_DECLARATION) => functions: FunctionData,
        get_type_alias(ext::TYPE_ALIAS_DECLARATION) => type_aliases: TypeAliasData,
        get_enum(ext::ENUM_DECLARATION) => enums: EnumData,
        get_enum_member(ext::ENUM_MEMBER) => enum_members: EnumMemberData,
        get_variable(ext::VARIABLE_STATEMENT) => variables: VariableData,
        get_variable_declaration(ext::VARIABLE_DECLARATION)
            => variable_declarations: VariableDeclarationData,
        get_module(ext::MODULE_DECLARATION) => modules: ModuleData,
        get_heritage_clause(ext::HERITAGE_CLAUSE) => heritage_clauses: HeritageData,
        get_expr_type_args(ext::EXPRESSION_WITH_TYPE_ARGUMENTS)
            => expr_with_type_args: ExprWithTypeArgsData,
        get_type_parameter(ext::TYPE_PARAMETER) => type_parameters: TypeParameterData,
        get_parameter(ext::PARAMETER) => parameters: ParameterData,
        get_signature(
            ext::PROPERTY_SIGNATURE,
            ext::METHOD_SIGNATURE,
            ext::CALL_SIGNATURE,
            ext::CONSTRUCT_SIGNATURE
        ) => signatures: SignatureData,
        get_index_signature(ext::INDEX_SIGNATURE) => index_signatures: IndexSignatureData,
        get_property_decl(ext::PROPERTY_DECLARATION) => property_decls: PropertyDeclData,
        get_method_decl(ext::METHOD_DECLARATION) => method_decls: MethodDeclData,
        get_constructor(ext::CONSTRUCTOR) => constructors: ConstructorData,
        get_accessor(ext::GET_ACCESSOR, ext::SET_ACCESSOR) => accessors: AccessorData,
        get_type_ref(ext::TYPE_REFERENCE) => type_refs: TypeRefData,
        get_composite_type(ext::UNION_TYPE, ext::INTERSECTION_TYPE, ext::TUPLE_TYPE)
            => composite_types: CompositeTypeData,
        get_array_type(ext::ARRAY_TYPE) => array_types: ArrayTypeData,
        get_wrapped_type(ext::PARENTHESIZED_TYPE, ext::OPTIONAL_TYPE, ext::REST_TYPE)
            => wrapped_types: WrappedTypeData,
        get_named_tuple_member(ext::NAMED_TUPLE_MEMBER) => named_tuple_members: NamedTupleMemberData,
        get_function_type(ext::FUNCTION_TYPE, ext::CONSTRUCTOR_TYPE) => function_types: FunctionTypeData,
        get_type_literal(ext::TYPE_LITERAL) => type_literals: TypeLiteralData,
        get_mapped_type(ext::MAPPED_TYPE) => mapped_types: MappedTypeData,
        get_indexed_access_type(ext::INDEXED_ACCESS_TYPE)
            => indexed_access_types: IndexedAccessTypeData,
        get_type_operator(ext::TYPE_OPERATOR) => type_operators: TypeOperatorData,
        get_type_query(ext::TYPE_QUERY) => type_queries: TypeQueryData,
        get_literal_type(ext::LITERAL_TYPE) => literal_types: LiteralTypeData,
        get_conditional_type(ext::CONDITIONAL_TYPE) => conditional_types: ConditionalTypeData,
        get_infer_type(ext::INFER_TYPE) => infer_types: InferTypeData,
        get_import_type(ext::IMPORT_TYPE) => import_types: ImportTypeData,
        get_type_predicate(ext::TYPE_PREDICATE) => type_predicates: TypePredicateData,
    }

    // =========================================================================
    // Text helpers
    // =========================================================================

    /// Exact source text covered by a node.
    pub fn node_text(&self, index: NodeIndex) -> &str {
        self.get(index)
            .and_then(|node| self.source_text.get(node.pos as usize..node.end as usize))
            .unwrap_or("")
    }

    /// Text of an identifier node, resolved through the interner.
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        let data = self.get_identifier(node)?;
        if data.atom.is_none() {
            Some(&data.escaped_text)
        } else {
            Some(self.interner.resolve(data.atom))
        }
    }

    /// Key text of a property or member name.
    ///
    /// Quoted names are returned unquoted (`'x-id'` → `x-id`), numeric names
    /// as written, computed names by their source text.
    pub fn property_name_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        match node.kind {
            k if k == SyntaxKind::Identifier as u16 || k == SyntaxKind::PrivateIdentifier as u16 => {
                self.identifier_text(index)
            }
            k if k == SyntaxKind::StringLiteral as u16 || k == SyntaxKind::NumericLiteral as u16 => {
                self.get_literal(node).map(|lit| lit.text.as_str())
            }
            ext::COMPUTED_PROPERTY_NAME => Some(self.node_text(index)),
            _ => None,
        }
    }

    /// Dotted text of an identifier or qualified name (`a.b.C`).
    pub fn entity_name_text(&self, index: NodeIndex) -> String {
        let Some(node) = self.get(index) else {
            return String::new();
        };
        if let Some(qualified) = self.get_qualified_name(node) {
            let mut text = self.entity_name_text(qualified.left);
            text.push('.');
            text.push_str(self.identifier_text(qualified.right).unwrap_or(""));
            return text;
        }
        self.identifier_text(index).unwrap_or("").to_string()
    }

    /// Rightmost identifier of an entity name (`C` for `a.b.C`).
    pub fn entity_name_last(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        match self.get_qualified_name(node) {
            Some(qualified) => self.identifier_text(qualified.right),
            None => self.identifier_text(index),
        }
    }

    /// Name node of a declaration or member, if it has one.
    pub fn declaration_name(&self, index: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(index) else {
            return NodeIndex::NONE;
        };
        match node.kind {
            ext::INTERFACE_DECLARATION => self.get_interface(node).map(|d| d.name),
            ext::CLASS_DECLARATION => self.get_class(node).map(|d| d.name),
            ext::FUNCTION_DECLARATION => self.get_function(node).map(|d| d.name),
            ext::TYPE_ALIAS_DECLARATION => self.get_type_alias(node).map(|d| d.name),
            ext::ENUM_DECLARATION => self.get_enum(node).map(|d| d.name),
            ext::ENUM_MEMBER => self.get_enum_member(node).map(|d| d.name),
            ext::VARIABLE_DECLARATION => self.get_variable_declaration(node).map(|d| d.name),
            ext::MODULE_DECLARATION => self.get_module(node).map(|d| d.name),
            ext::PROPERTY_SIGNATURE | ext::METHOD_SIGNATURE => {
                self.get_signature(node).map(|d| d.name)
            }
            ext::PROPERTY_DECLARATION => self.get_property_decl(node).map(|d| d.name),
            ext::METHOD_DECLARATION => self.get_method_decl(node).map(|d| d.name),
            ext::GET_ACCESSOR | ext::SET_ACCESSOR => self.get_accessor(node).map(|d| d.name),
            ext::PARAMETER => self.get_parameter(node).map(|d| d.name),
            _ => None,
        }
        .unwrap_or(NodeIndex::NONE)
    }

    /// Modifier list of a declaration or member.
    pub fn modifiers_of(&self, index: NodeIndex) -> Option<&NodeList> {
        let node = self.get(index)?;
        match node.kind {
            ext::INTERFACE_DECLARATION => self.get_interface(node)?.modifiers.as_ref(),
            ext::CLASS_DECLARATION => self.get_class(node)?.modifiers.as_ref(),
            ext::FUNCTION_DECLARATION => self.get_function(node)?.modifiers.as_ref(),
            ext::TYPE_ALIAS_DECLARATION => self.get_type_alias(node)?.modifiers.as_ref(),
            ext::ENUM_DECLARATION => self.get_enum(node)?.modifiers.as_ref(),
            ext::VARIABLE_STATEMENT => self.get_variable(node)?.modifiers.as_ref(),
            ext::MODULE_DECLARATION => self.get_module(node)?.modifiers.as_ref(),
            ext::PROPERTY_SIGNATURE
            | ext::METHOD_SIGNATURE
            | ext::CALL_SIGNATURE
            | ext::CONSTRUCT_SIGNATURE => self.get_signature(node)?.modifiers.as_ref(),
            ext::INDEX_SIGNATURE => self.get_index_signature(node)?.modifiers.as_ref(),
            ext::PROPERTY_DECLARATION => self.get_property_decl(node)?.modifiers.as_ref(),
            ext::METHOD_DECLARATION => self.get_method_decl(node)?.modifiers.as_ref(),
            ext::CONSTRUCTOR => self.get_constructor(node)?.modifiers.as_ref(),
            ext::GET_ACCESSOR | ext::SET_ACCESSOR => self.get_accessor(node)?.modifiers.as_ref(),
            ext::PARAMETER => self.get_parameter(node)?.modifiers.as_ref(),
            _ => None,
        }
    }

    /// Check whether a modifier list contains `kind`.
    pub fn has_modifier(&self, modifiers: Option<&NodeList>, kind: SyntaxKind) -> bool {
        modifiers.is_some_and(|list| {
            list.iter()
                .any(|m| self.get(m).is_some_and(|node| node.kind == kind as u16))
        })
    }

    /// Top-level statements of the source file rooted at `root`.
    pub fn statements(&self, root: NodeIndex) -> &[NodeIndex] {
        self.get(root)
            .and_then(|node| self.get_source_file(node))
            .map(|sf| sf.statements.nodes.as_slice())
            .unwrap_or(&[])
    }
}
