//! Symbols for top-level declarations of one surface.

use serde::Serialize;
use smallvec::SmallVec;
use tsbc_parser::NodeIndex;

/// Symbol flags, one per declaration kind that contributed to the symbol.
pub mod symbol_flags {
    pub const NONE: u32 = 0;
    pub const INTERFACE: u32 = 1 << 0;
    pub const CLASS: u32 = 1 << 1;
    pub const FUNCTION: u32 = 1 << 2;
    pub const TYPE_ALIAS: u32 = 1 << 3;
    pub const ENUM: u32 = 1 << 4;
    pub const VARIABLE: u32 = 1 << 5;
    pub const NAMESPACE: u32 = 1 << 6;

    /// Kinds whose members are flattened into an effective member set.
    pub const CONTAINER: u32 = INTERFACE | CLASS;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const NONE: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// The kind a declaration name is diffed as.
///
/// A name declared by several kinds (a class merged with an interface, a
/// function merged with a namespace) takes the first kind in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationKind {
    Class,
    Interface,
    Enum,
    Function,
    TypeAlias,
    Variable,
    Namespace,
}

impl DeclarationKind {
    pub fn from_flags(flags: u32) -> Option<DeclarationKind> {
        use symbol_flags::*;
        [
            (CLASS, DeclarationKind::Class),
            (INTERFACE, DeclarationKind::Interface),
            (ENUM, DeclarationKind::Enum),
            (FUNCTION, DeclarationKind::Function),
            (TYPE_ALIAS, DeclarationKind::TypeAlias),
            (VARIABLE, DeclarationKind::Variable),
            (NAMESPACE, DeclarationKind::Namespace),
        ]
        .into_iter()
        .find(|(flag, _)| flags & flag != 0)
        .map(|(_, kind)| kind)
    }

    pub fn flag(self) -> u32 {
        match self {
            DeclarationKind::Class => symbol_flags::CLASS,
            DeclarationKind::Interface => symbol_flags::INTERFACE,
            DeclarationKind::Enum => symbol_flags::ENUM,
            DeclarationKind::Function => symbol_flags::FUNCTION,
            DeclarationKind::TypeAlias => symbol_flags::TYPE_ALIAS,
            DeclarationKind::Variable => symbol_flags::VARIABLE,
            DeclarationKind::Namespace => symbol_flags::NAMESPACE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Function => "function",
            DeclarationKind::TypeAlias => "type alias",
            DeclarationKind::Variable => "variable",
            DeclarationKind::Namespace => "namespace",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub flags: u32,
    pub escaped_name: String,
    /// Every declaration node of this name, in source order.
    pub declarations: SmallVec<[NodeIndex; 1]>,
    /// True when any declaration carries `export`.
    pub is_exported: bool,
}

impl Symbol {
    pub fn new(name: &str) -> Symbol {
        Symbol {
            flags: symbol_flags::NONE,
            escaped_name: name.to_string(),
            declarations: SmallVec::new(),
            is_exported: false,
        }
    }

    #[inline]
    pub fn has_flags(&self, flags: u32) -> bool {
        self.flags & flags != 0
    }

    pub fn kind(&self) -> Option<DeclarationKind> {
        DeclarationKind::from_flags(self.flags)
    }
}

/// Arena of symbols addressed by `SymbolId`.
#[derive(Clone, Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> SymbolArena {
        SymbolArena::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (SymbolId(i as u32), symbol))
    }
}
