//! NodeArena creation methods (add_* methods).

use super::base::NodeIndex;
use super::node::*;
use std::sync::Arc;
use tsbc_common::interner::Interner;
use tsbc_scanner::SyntaxKind;

/// Generates one `add_*` method per data pool. Each pushes the data, then a
/// node header pointing at it.
macro_rules! pool_adders {
    ($($method:ident => $pool:ident : $data:ty),+ $(,)?) => {
        $(
            pub fn $method(&mut self, kind: u16, pos: u32, end: u32, data: $data) -> NodeIndex {
                let data_index = self.$pool.len() as u32;
                self.$pool.push(data);
                self.push_node(Node::with_data(kind, pos, end, data_index))
            }
        )+
    };
}

impl NodeArena {
    /// Maximum pre-allocation to avoid capacity overflow in huge files.
    const MAX_NODE_PREALLOC: usize = 2_000_000;

    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena sized for a source text of `source_len` bytes.
    ///
    /// Declaration files average roughly one node per eight bytes.
    pub fn with_source_len(source_len: usize) -> NodeArena {
        let capacity = (source_len / 8).min(Self::MAX_NODE_PREALLOC);
        let mut arena = NodeArena::default();
        arena.nodes = Vec::with_capacity(capacity);
        arena.identifiers = Vec::with_capacity(capacity / 3);
        arena.type_refs = Vec::with_capacity(capacity / 8);
        arena.signatures = Vec::with_capacity(capacity / 8);
        arena
    }

    /// Set the interner (called after parsing to transfer ownership from scanner)
    pub fn set_interner(&mut self, interner: Interner) {
        self.interner = interner;
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn set_source_text(&mut self, text: Arc<str>) {
        self.source_text = text;
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    fn push_node(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        NodeIndex(index)
    }

    // ============================================================================
    // Node Creation Methods
    // ============================================================================

    /// Add a token node (no additional data)
    pub fn add_token(&mut self, kind: u16, pos: u32, end: u32) -> NodeIndex {
        self.push_node(Node::new(kind, pos, end))
    }

    /// Create a modifier token (static, public, private, etc.)
    pub fn create_modifier(&mut self, kind: SyntaxKind, pos: u32) -> NodeIndex {
        // Modifiers are simple tokens whose kind is the keyword.
        let end = pos + kind.text().len() as u32;
        self.add_token(kind as u16, pos, end)
    }

    pub fn set_flags(&mut self, index: NodeIndex, flags: u16) {
        if let Some(node) = self.nodes.get_mut(index.0 as usize) {
            node.flags |= flags;
        }
    }

    pool_adders! {
        add_identifier => identifiers: IdentifierData,
        add_literal => literals: LiteralData,
        add_qualified_name => qualified_names: QualifiedNameData,
        add_source_file => source_files: SourceFileData,
        add_interface => interfaces: InterfaceData,
        add_class => classes: ClassData,
        add_function => functions: FunctionData,
        add_type_alias => type_aliases: TypeAliasData,
        add_enum => enums: EnumData,
        add_enum_member => enum_members: EnumMemberData,
        add_variable => variables: VariableData,
        add_variable_declaration => variable_declarations: VariableDeclarationData,
        add_module => modules: ModuleData,
        add_heritage => heritage_clauses: HeritageData,
        add_expr_with_type_args => expr_with_type_args: ExprWithTypeArgsData,
        add_type_parameter => type_parameters: TypeParameterData,
        add_parameter => parameters: ParameterData,
        add_signature => signatures: SignatureData,
        add_index_signature => index_signatures: IndexSignatureData,
        add_property_decl => property_decls: PropertyDeclData,
        add_method_decl => method_decls: MethodDeclData,
        add_constructor => constructors: ConstructorData,
        add_accessor => accessors: AccessorData,
        add_type_ref => type_refs: TypeRefData,
        add_composite_type => composite_types: CompositeTypeData,
        add_array_type => array_types: ArrayTypeData,
        add_wrapped_type => wrapped_types: WrappedTypeData,
        add_named_tuple_member => named_tuple_members: NamedTupleMemberData,
        add_function_type => function_types: FunctionTypeData,
        add_type_literal => type_literals: TypeLiteralData,
        add_mapped_type => mapped_types: MappedTypeData,
        add_indexed_access_type => indexed_access_types: IndexedAccessTypeData,
        add_type_operator => type_operators: TypeOperatorData,
        add_type_query => type_queries: TypeQueryData,
        add_literal_type => literal_types: LiteralTypeData,
        add_conditional_type => conditional_types: ConditionalTypeData,
        add_infer_type => infer_types: InferTypeData,
        add_import_type => import_types: ImportTypeData,
        add_type_predicate => type_predicates: TypePredicateData,
    }
}
