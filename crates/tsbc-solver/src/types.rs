//! Lowered type representation.
//!
//! Types from both surfaces are lowered into one `TypeInterner`; a `TypeId`
//! is a handle to structurally unique `TypeData`, so two types built from the
//! same shape compare equal as integers.

use tsbc_common::interner::Atom;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const VOID: TypeId = TypeId(3);
    pub const UNDEFINED: TypeId = TypeId(4);
    pub const NULL: TypeId = TypeId(5);
    pub const STRING: TypeId = TypeId(6);
    pub const NUMBER: TypeId = TypeId(7);
    pub const BOOLEAN: TypeId = TypeId(8);
    pub const BIGINT: TypeId = TypeId(9);
    pub const SYMBOL: TypeId = TypeId(10);
    pub const OBJECT: TypeId = TypeId(11);
    pub const THIS: TypeId = TypeId(12);
    pub const BOOLEAN_TRUE: TypeId = TypeId(13);
    pub const BOOLEAN_FALSE: TypeId = TypeId(14);

    /// `any` and `unknown` accept every type.
    #[inline]
    pub fn is_wildcard(self) -> bool {
        self == TypeId::ANY || self == TypeId::UNKNOWN
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Object,
    This,
}

impl IntrinsicKind {
    /// Intrinsics in `TypeId` order.
    pub(crate) const ALL: [IntrinsicKind; 13] = [
        IntrinsicKind::Any,
        IntrinsicKind::Unknown,
        IntrinsicKind::Never,
        IntrinsicKind::Void,
        IntrinsicKind::Undefined,
        IntrinsicKind::Null,
        IntrinsicKind::String,
        IntrinsicKind::Number,
        IntrinsicKind::Boolean,
        IntrinsicKind::BigInt,
        IntrinsicKind::Symbol,
        IntrinsicKind::Object,
        IntrinsicKind::This,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "any",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Never => "never",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::String => "string",
            IntrinsicKind::Number => "number",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::BigInt => "bigint",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Object => "object",
            IntrinsicKind::This => "this",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    String(Atom),
    /// Canonical numeric text (`0x10` and `16` share one atom).
    Number(Atom),
    BigInt(Atom),
    Boolean(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub type_id: TypeId,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: Atom,
    pub type_id: TypeId,
    pub optional: bool,
    pub readonly: bool,
}

impl PropertyInfo {
    pub fn new(name: Atom, type_id: TypeId) -> PropertyInfo {
        PropertyInfo {
            name,
            type_id,
            optional: false,
            readonly: false,
        }
    }
}

/// Members of an object type, properties sorted by name atom.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    pub properties: Vec<PropertyInfo>,
    pub string_index: Option<TypeId>,
    pub number_index: Option<TypeId>,
    pub call_signatures: Vec<TypeId>,
    pub construct_signatures: Vec<TypeId>,
}

impl ObjectShape {
    pub fn property(&self, name: Atom) -> Option<&PropertyInfo> {
        self.properties
            .binary_search_by_key(&name, |p| p.name)
            .ok()
            .map(|i| &self.properties[i])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub type_id: TypeId,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
    pub type_param_count: u32,
    pub is_constructor: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    /// Named declaration that is not inlined: interface, class, enum, or a
    /// name this surface does not declare.
    Reference { name: Atom, args: Vec<TypeId> },
    /// Type parameter by lexical position: `depth` counts enclosing generic
    /// declarations, `index` is the position in its parameter list.
    TypeParameter { depth: u32, index: u32 },
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    Array(TypeId),
    ReadonlyArray(TypeId),
    Tuple(Vec<TupleElement>),
    Object(Box<ObjectShape>),
    Function(Box<FunctionShape>),
    /// `x is T` and `asserts x is T`, by asserted type only.
    Predicate(TypeId),
    KeyOf(TypeId),
    /// A form lowering does not model, keyed by whitespace-free source text.
    Opaque(Atom),
}
