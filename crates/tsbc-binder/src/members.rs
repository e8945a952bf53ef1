//! Member keys and effective member sets.

use crate::symbols::SymbolId;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::fmt;
use tsbc_parser::NodeIndex;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Key a member is matched by across two surfaces.
///
/// Static class members live in their own key space, so `static x` and an
/// instance `x` never shadow or match each other.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKey {
    Instance(String),
    Static(String),
    StringIndex,
    NumberIndex,
}

impl MemberKey {
    /// Name shown in diagnostics: the member name, or `[string]`/`[number]`.
    pub fn display_name(&self) -> &str {
        match self {
            MemberKey::Instance(name) | MemberKey::Static(name) => name,
            MemberKey::StringIndex => "[string]",
            MemberKey::NumberIndex => "[number]",
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, MemberKey::StringIndex | MemberKey::NumberIndex)
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKey::Static(name) => write!(f, "static {name}"),
            other => f.write_str(other.display_name()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    /// Field, accessor pair or constructor parameter property.
    Property,
    /// Method with one or more signatures.
    Method,
    IndexSignature,
}

#[derive(Clone, Debug)]
pub struct Member {
    pub key: MemberKey,
    pub kind: MemberKind,
    /// Declaring node. For methods, the first signature.
    pub node: NodeIndex,
    /// Declared type of a property or index signature value; NONE when absent.
    pub type_node: NodeIndex,
    /// Method signatures in declaration order, implementation excluded.
    pub signatures: SmallVec<[NodeIndex; 2]>,
    pub optional: bool,
    pub readonly: bool,
    /// Declaration the member was found in (differs from the container for inherited members).
    pub declared_in: SymbolId,
}

impl Member {
    pub fn property(key: MemberKey, node: NodeIndex, type_node: NodeIndex) -> Member {
        Member {
            key,
            kind: MemberKind::Property,
            node,
            type_node,
            signatures: SmallVec::new(),
            optional: false,
            readonly: false,
            declared_in: SymbolId::NONE,
        }
    }

    pub fn method(key: MemberKey, signature: NodeIndex) -> Member {
        let mut signatures = SmallVec::new();
        signatures.push(signature);
        Member {
            key,
            kind: MemberKind::Method,
            node: signature,
            type_node: NodeIndex::NONE,
            signatures,
            optional: false,
            readonly: false,
            declared_in: SymbolId::NONE,
        }
    }

    #[inline]
    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }
}

/// Members declared directly plus everything inherited through `extends`.
#[derive(Clone, Debug, Default)]
pub struct EffectiveMembers {
    pub call_signatures: Vec<NodeIndex>,
    pub construct_signatures: Vec<NodeIndex>,
    /// Class constructors, implementation excluded.
    pub constructors: Vec<NodeIndex>,
    /// Keyed members; own members first, then inherited ones in heritage order.
    pub members: FxIndexMap<MemberKey, Member>,
}

impl EffectiveMembers {
    pub fn get(&self, key: &MemberKey) -> Option<&Member> {
        self.members.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
            && self.call_signatures.is_empty()
            && self.construct_signatures.is_empty()
            && self.constructors.is_empty()
    }

    /// Fill in everything `base` has that this set lacks.
    ///
    /// Keyed members already present shadow the base's. Signature lists are
    /// inherited only when this set declares none of that kind.
    pub(crate) fn inherit_from(&mut self, base: &EffectiveMembers) {
        if self.call_signatures.is_empty() {
            self.call_signatures.clone_from(&base.call_signatures);
        }
        if self.construct_signatures.is_empty() {
            self.construct_signatures
                .clone_from(&base.construct_signatures);
        }
        if self.constructors.is_empty() {
            self.constructors.clone_from(&base.constructors);
        }
        for (key, member) in &base.members {
            if !self.members.contains_key(key) {
                self.members.insert(key.clone(), member.clone());
            }
        }
    }
}
