//! Binder state and the finished declaration index.
//!
//! `BinderState` walks the top-level statements of one parsed surface and
//! collects a symbol per declared name. `DeclarationIndex` owns the arena
//! together with those symbols and the effective member set of every class
//! and interface, computed once when the index is built.

use crate::members::{EffectiveMembers, FxIndexMap};
use crate::symbols::{DeclarationKind, Symbol, SymbolArena, SymbolId, symbol_flags};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;
use tsbc_parser::parser::syntax_kind_ext;
use tsbc_parser::{NodeArena, NodeIndex, node_flags};
use tsbc_scanner::SyntaxKind;

/// Collects symbols for the top-level declarations of one surface.
#[derive(Default)]
pub struct BinderState {
    pub(crate) symbols: SymbolArena,
    /// Name to symbol, in order of first declaration.
    pub(crate) file_locals: FxIndexMap<String, SymbolId>,
}

impl BinderState {
    pub fn new() -> BinderState {
        BinderState::default()
    }

    pub fn bind_source_file(&mut self, arena: &NodeArena, root: NodeIndex) {
        for &statement in arena.statements(root) {
            self.bind_statement(arena, statement);
        }
        debug!(symbols = self.symbols.len(), "bound surface");
    }

    fn bind_statement(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let Some(node) = arena.get(idx) else {
            return;
        };
        let flags = match node.kind {
            syntax_kind_ext::INTERFACE_DECLARATION => symbol_flags::INTERFACE,
            syntax_kind_ext::CLASS_DECLARATION => symbol_flags::CLASS,
            syntax_kind_ext::FUNCTION_DECLARATION => symbol_flags::FUNCTION,
            syntax_kind_ext::TYPE_ALIAS_DECLARATION => symbol_flags::TYPE_ALIAS,
            syntax_kind_ext::ENUM_DECLARATION => symbol_flags::ENUM,
            syntax_kind_ext::VARIABLE_STATEMENT => {
                self.bind_variable_statement(arena, idx);
                return;
            }
            syntax_kind_ext::MODULE_DECLARATION => {
                if node.flags & node_flags::GLOBAL_AUGMENTATION != 0 {
                    return;
                }
                symbol_flags::NAMESPACE
            }
            _ => return,
        };

        let name_node = arena.declaration_name(idx);
        let name = match arena.kind_of(name_node) {
            Some(syntax_kind_ext::QUALIFIED_NAME) => arena.entity_name_text(name_node),
            Some(_) => match arena.property_name_text(name_node) {
                Some(name) => name.to_string(),
                None => return,
            },
            None => {
                debug!(pos = node.pos, "skipping anonymous declaration");
                return;
            }
        };
        let is_exported = arena.has_modifier(arena.modifiers_of(idx), SyntaxKind::ExportKeyword);
        self.declare_symbol(&name, flags, idx, is_exported);
    }

    fn bind_variable_statement(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let Some(statement) = arena.get(idx).and_then(|node| arena.get_variable(node)) else {
            return;
        };
        let is_exported = arena.has_modifier(statement.modifiers.as_ref(), SyntaxKind::ExportKeyword);
        for decl in statement.declarations.iter() {
            // Destructuring patterns declare no single name worth diffing.
            if let Some(name) = arena.identifier_text(arena.declaration_name(decl)) {
                self.declare_symbol(name, symbol_flags::VARIABLE, decl, is_exported);
            }
        }
    }

    fn declare_symbol(&mut self, name: &str, flags: u32, decl: NodeIndex, is_exported: bool) -> SymbolId {
        let id = match self.file_locals.get(name) {
            Some(&id) => id,
            None => {
                let id = self.symbols.alloc(Symbol::new(name));
                self.file_locals.insert(name.to_string(), id);
                id
            }
        };
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.flags |= flags;
            symbol.declarations.push(decl);
            symbol.is_exported |= is_exported;
        }
        id
    }
}

/// Index over the top-level declarations of one surface.
#[derive(Clone, Debug)]
pub struct DeclarationIndex {
    pub(crate) arena: NodeArena,
    pub(crate) root: NodeIndex,
    pub(crate) symbols: SymbolArena,
    pub(crate) file_locals: FxIndexMap<String, SymbolId>,
    pub(crate) effective: FxHashMap<SymbolId, EffectiveMembers>,
}

impl DeclarationIndex {
    /// Bind `arena` and flatten every class and interface.
    pub fn new(arena: NodeArena, root: NodeIndex) -> DeclarationIndex {
        let mut binder = BinderState::new();
        binder.bind_source_file(&arena, root);
        let mut index = DeclarationIndex {
            arena,
            root,
            symbols: binder.symbols,
            file_locals: binder.file_locals,
            effective: FxHashMap::default(),
        };
        index.effective = index.flatten_all();
        index
    }

    #[inline]
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    #[inline]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    #[inline]
    pub fn symbols(&self) -> &SymbolArena {
        &self.symbols
    }

    /// Look up a top-level declaration by name.
    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.file_locals.get(name).copied()
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Kind a name is diffed as, if the name is declared at all.
    pub fn declaration_kind(&self, name: &str) -> Option<DeclarationKind> {
        self.find(name)
            .and_then(|id| self.symbol(id))
            .and_then(Symbol::kind)
    }

    /// Declared names in order of first declaration.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.file_locals.keys().map(String::as_str)
    }

    /// Declarations of `id` whose node kind is `kind`.
    pub fn declarations_of(&self, id: SymbolId, kind: u16) -> impl Iterator<Item = NodeIndex> + '_ {
        self.symbol(id)
            .into_iter()
            .flat_map(|symbol| symbol.declarations.iter().copied())
            .filter(move |&decl| self.arena.kind_of(decl) == Some(kind))
    }

    /// Flattened members of a class or interface.
    pub fn effective_members(&self, id: SymbolId) -> Option<&EffectiveMembers> {
        self.effective.get(&id)
    }

    /// Type argument nodes of a type reference or heritage expression.
    pub fn type_arguments(&self, type_ref: NodeIndex) -> &[NodeIndex] {
        let Some(node) = self.arena.get(type_ref) else {
            return &[];
        };
        let list = match node.kind {
            syntax_kind_ext::TYPE_REFERENCE => {
                self.arena.get_type_ref(node).and_then(|r| r.type_arguments.as_ref())
            }
            syntax_kind_ext::EXPRESSION_WITH_TYPE_ARGUMENTS => self
                .arena
                .get_expr_type_args(node)
                .and_then(|e| e.type_arguments.as_ref()),
            _ => None,
        };
        list.map(|l| l.nodes.as_slice()).unwrap_or(&[])
    }

    /// The type alias declaration for `name`.
    pub fn alias_declaration(&self, name: &str) -> Option<NodeIndex> {
        let id = self.find(name)?;
        self.declarations_of(id, syntax_kind_ext::TYPE_ALIAS_DECLARATION)
            .next()
    }

    /// Aliased type node of the type alias `name`.
    pub fn resolve_alias(&self, name: &str) -> Option<NodeIndex> {
        let decl = self.alias_declaration(name)?;
        let alias = self.arena.get_type_alias(self.arena.get(decl)?)?;
        Some(alias.type_node)
    }

    /// Type parameter names declared by a generic declaration.
    pub fn type_parameter_names(&self, decl: NodeIndex) -> SmallVec<[&str; 2]> {
        let Some(node) = self.arena.get(decl) else {
            return SmallVec::new();
        };
        let list = match node.kind {
            syntax_kind_ext::TYPE_ALIAS_DECLARATION => {
                self.arena.get_type_alias(node).and_then(|d| d.type_parameters.as_ref())
            }
            syntax_kind_ext::INTERFACE_DECLARATION => {
                self.arena.get_interface(node).and_then(|d| d.type_parameters.as_ref())
            }
            syntax_kind_ext::CLASS_DECLARATION => {
                self.arena.get_class(node).and_then(|d| d.type_parameters.as_ref())
            }
            syntax_kind_ext::FUNCTION_DECLARATION => {
                self.arena.get_function(node).and_then(|d| d.type_parameters.as_ref())
            }
            _ => None,
        };
        list.into_iter()
            .flat_map(|l| l.iter())
            .filter_map(|p| {
                let param = self.arena.get_type_parameter(self.arena.get(p)?)?;
                self.arena.identifier_text(param.name)
            })
            .collect()
    }

    /// Signatures of a function, implementation excluded.
    pub fn overloads(&self, id: SymbolId) -> SmallVec<[NodeIndex; 4]> {
        let mut signatures: SmallVec<[NodeIndex; 4]> = self
            .declarations_of(id, syntax_kind_ext::FUNCTION_DECLARATION)
            .collect();
        if mixes_implementation(&self.arena, &signatures) {
            signatures.retain(|s| !has_body(&self.arena, *s));
        }
        signatures
    }

    /// Constructors of a class, inherited when the class declares none.
    pub fn constructors(&self, id: SymbolId) -> &[NodeIndex] {
        self.effective_members(id)
            .map(|m| m.constructors.as_slice())
            .unwrap_or(&[])
    }

    /// Members of an enum across all of its declarations.
    pub fn enum_members(&self, id: SymbolId) -> Vec<NodeIndex> {
        self.declarations_of(id, syntax_kind_ext::ENUM_DECLARATION)
            .filter_map(|decl| self.arena.get_enum(self.arena.get(decl)?))
            .flat_map(|data| data.members.iter())
            .collect()
    }
}

/// True when a function-like declaration has a body.
pub fn has_body(arena: &NodeArena, idx: NodeIndex) -> bool {
    let Some(node) = arena.get(idx) else {
        return false;
    };
    match node.kind {
        syntax_kind_ext::FUNCTION_DECLARATION => arena.get_function(node).is_some_and(|f| f.body.is_some()),
        syntax_kind_ext::METHOD_DECLARATION => arena.get_method_decl(node).is_some_and(|m| m.body.is_some()),
        syntax_kind_ext::CONSTRUCTOR => arena.get_constructor(node).is_some_and(|c| c.body.is_some()),
        _ => false,
    }
}

/// True when an overload set mixes body-less signatures with an implementation.
///
/// The implementation is then not part of the callable surface and is dropped.
pub(crate) fn mixes_implementation(arena: &NodeArena, signatures: &[NodeIndex]) -> bool {
    let with_body = signatures.iter().filter(|&&s| has_body(arena, s)).count();
    with_body > 0 && with_body < signatures.len()
}
