//! Diff records produced by the detector.

use bitflags::bitflags;
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use std::fmt;
use tsbc_common::Position;
use tsbc_parser::NodeIndex;

use crate::context::{AstContext, Side};

/// Granularity a difference is reported at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiffLocation {
    Class,
    Interface,
    Property,
    Signature,
    #[serde(rename = "Signature_Overload")]
    SignatureOverload,
    #[serde(rename = "Signature_ReturnType")]
    SignatureReturnType,
    #[serde(rename = "Signature_ParameterList")]
    SignatureParameterList,
    Parameter,
    TypeAlias,
    Enum,
    EnumMember,
}

impl DiffLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            DiffLocation::Class => "Class",
            DiffLocation::Interface => "Interface",
            DiffLocation::Property => "Property",
            DiffLocation::Signature => "Signature",
            DiffLocation::SignatureOverload => "Signature_Overload",
            DiffLocation::SignatureReturnType => "Signature_ReturnType",
            DiffLocation::SignatureParameterList => "Signature_ParameterList",
            DiffLocation::Parameter => "Parameter",
            DiffLocation::TypeAlias => "TypeAlias",
            DiffLocation::Enum => "Enum",
            DiffLocation::EnumMember => "EnumMember",
        }
    }
}

impl fmt::Display for DiffLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    /// Why a pair was reported.
    pub struct DiffReasons: u32 {
        const ADDED = 1 << 0;
        const REMOVED = 1 << 1;
        const TYPE_CHANGED = 1 << 2;
        const COUNT_CHANGED = 1 << 3;
        const REQUIRED_TO_OPTIONAL = 1 << 4;
        const OPTIONAL_TO_REQUIRED = 1 << 5;
        const READONLY_TO_MUTABLE = 1 << 6;
    }
}

impl DiffReasons {
    const DISPLAY_NAMES: [(DiffReasons, &'static str); 7] = [
        (DiffReasons::ADDED, "Added"),
        (DiffReasons::REMOVED, "Removed"),
        (DiffReasons::TYPE_CHANGED, "TypeChanged"),
        (DiffReasons::COUNT_CHANGED, "CountChanged"),
        (DiffReasons::REQUIRED_TO_OPTIONAL, "RequiredToOptional"),
        (DiffReasons::OPTIONAL_TO_REQUIRED, "OptionalToRequired"),
        (DiffReasons::READONLY_TO_MUTABLE, "ReadonlyToMutable"),
    ];

    /// Names of the set flags, in declaration order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::DISPLAY_NAMES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl fmt::Display for DiffReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl Serialize for DiffReasons {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for name in self.names() {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

/// Which side is checked against which.
///
/// The target is the contract consumers were written against; the source is
/// the shape being checked. Under `CurrentToBaseline` the source is the
/// current surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum AssignDirection {
    #[default]
    CurrentToBaseline,
    BaselineToCurrent,
}

impl AssignDirection {
    pub fn source_side(self) -> Side {
        match self {
            AssignDirection::CurrentToBaseline => Side::Current,
            AssignDirection::BaselineToCurrent => Side::Baseline,
        }
    }

    pub fn target_side(self) -> Side {
        match self {
            AssignDirection::CurrentToBaseline => Side::Baseline,
            AssignDirection::BaselineToCurrent => Side::Current,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssignDirection::CurrentToBaseline => "CurrentToBaseline",
            AssignDirection::BaselineToCurrent => "BaselineToCurrent",
        }
    }
}

impl fmt::Display for AssignDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in one of the two surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub side: Side,
    pub index: NodeIndex,
}

impl NodeRef {
    pub fn new(side: Side, index: NodeIndex) -> NodeRef {
        NodeRef { side, index }
    }
}

/// A declaration, member or parameter plus the name it is reported under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedNode<'ctx> {
    pub name: &'ctx str,
    pub node: NodeRef,
    /// Offset of the node's first token.
    pub pos: u32,
}

impl<'ctx> NamedNode<'ctx> {
    pub fn new(ctx: &'ctx AstContext, side: Side, index: NodeIndex, name: &'ctx str) -> Self {
        let pos = ctx.side(side).arena().get(index).map_or(0, |n| n.pos);
        NamedNode {
            name,
            node: NodeRef::new(side, index),
            pos,
        }
    }

    pub fn side(&self) -> Side {
        self.node.side
    }
}

impl Serialize for NamedNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NamedNode", 3)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("side", &self.node.side)?;
        state.serialize_field("pos", &self.pos)?;
        state.end()
    }
}

/// One reported difference.
///
/// `Added` pairs carry only a source node, `Removed` pairs only a target
/// node, and every other reason carries both.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffPair<'ctx> {
    location: DiffLocation,
    reasons: DiffReasons,
    assign_direction: AssignDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<NamedNode<'ctx>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<NamedNode<'ctx>>,
}

impl<'ctx> DiffPair<'ctx> {
    pub fn added(
        location: DiffLocation,
        assign_direction: AssignDirection,
        source: NamedNode<'ctx>,
    ) -> Self {
        DiffPair {
            location,
            reasons: DiffReasons::ADDED,
            assign_direction,
            source: Some(source),
            target: None,
        }
    }

    pub fn removed(
        location: DiffLocation,
        assign_direction: AssignDirection,
        target: NamedNode<'ctx>,
    ) -> Self {
        DiffPair {
            location,
            reasons: DiffReasons::REMOVED,
            assign_direction,
            source: None,
            target: Some(target),
        }
    }

    pub fn changed(
        location: DiffLocation,
        reasons: DiffReasons,
        assign_direction: AssignDirection,
        source: NamedNode<'ctx>,
        target: NamedNode<'ctx>,
    ) -> Self {
        debug_assert!(
            !reasons.intersects(DiffReasons::ADDED | DiffReasons::REMOVED),
            "one-sided reasons need added() or removed()"
        );
        DiffPair {
            location,
            reasons,
            assign_direction,
            source: Some(source),
            target: Some(target),
        }
    }

    pub fn location(&self) -> DiffLocation {
        self.location
    }

    pub fn reasons(&self) -> DiffReasons {
        self.reasons
    }

    pub fn assign_direction(&self) -> AssignDirection {
        self.assign_direction
    }

    pub fn source(&self) -> Option<&NamedNode<'ctx>> {
        self.source.as_ref()
    }

    pub fn target(&self) -> Option<&NamedNode<'ctx>> {
        self.target.as_ref()
    }

    /// Anything other than an addition can break an existing consumer.
    pub fn is_breaking(&self) -> bool {
        self.reasons != DiffReasons::ADDED
    }
}

/// Owned form of a `NamedNode`, with its line and character resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub name: String,
    pub side: Side,
    pub pos: u32,
    #[serde(flatten)]
    pub position: Position,
}

impl NodeRecord {
    fn new(ctx: &AstContext, node: &NamedNode<'_>) -> NodeRecord {
        NodeRecord {
            name: node.name.to_string(),
            side: node.side(),
            pos: node.pos,
            position: ctx.position(node.node),
        }
    }
}

/// Owned form of a `DiffPair`, usable after the context is dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRecord {
    pub location: DiffLocation,
    pub reasons: DiffReasons,
    pub assign_direction: AssignDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<NodeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeRecord>,
}

impl DiffRecord {
    pub fn new(ctx: &AstContext, pair: &DiffPair<'_>) -> DiffRecord {
        DiffRecord {
            location: pair.location,
            reasons: pair.reasons,
            assign_direction: pair.assign_direction,
            source: pair.source.as_ref().map(|n| NodeRecord::new(ctx, n)),
            target: pair.target.as_ref().map(|n| NodeRecord::new(ctx, n)),
        }
    }

    pub fn is_breaking(&self) -> bool {
        self.reasons != DiffReasons::ADDED
    }
}
