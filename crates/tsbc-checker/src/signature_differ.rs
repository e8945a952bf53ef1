//! Parameter list and return type comparison of two matched signatures.

use smallvec::SmallVec;
use tsbc_parser::{NodeArena, NodeIndex, NodeList, syntax_kind_ext};

use crate::compare::TypeComparer;
use crate::diff::{DiffLocation, DiffPair, DiffReasons, NamedNode};

/// Parameters and return annotation of a function-like node.
#[derive(Clone, Debug, Default)]
pub struct SignatureParts {
    /// Declared parameters, `this` excluded.
    pub params: SmallVec<[NodeIndex; 4]>,
    pub return_type: NodeIndex,
    /// Constructors declare no return type.
    pub has_return: bool,
}

impl SignatureParts {
    pub fn of(arena: &NodeArena, node: NodeIndex) -> Option<SignatureParts> {
        let data = arena.get(node)?;
        let empty = NodeList::default();
        let (parameters, return_type, has_return) = match data.kind {
            syntax_kind_ext::FUNCTION_DECLARATION => {
                let f = arena.get_function(data)?;
                (&f.parameters, f.type_annotation, true)
            }
            syntax_kind_ext::METHOD_SIGNATURE
            | syntax_kind_ext::CALL_SIGNATURE
            | syntax_kind_ext::CONSTRUCT_SIGNATURE => {
                let s = arena.get_signature(data)?;
                (s.parameters.as_ref().unwrap_or(&empty), s.type_annotation, true)
            }
            syntax_kind_ext::METHOD_DECLARATION => {
                let m = arena.get_method_decl(data)?;
                (&m.parameters, m.type_annotation, true)
            }
            syntax_kind_ext::CONSTRUCTOR => {
                let c = arena.get_constructor(data)?;
                (&c.parameters, NodeIndex::NONE, false)
            }
            syntax_kind_ext::FUNCTION_TYPE | syntax_kind_ext::CONSTRUCTOR_TYPE => {
                let f = arena.get_function_type(data)?;
                (&f.parameters, f.type_annotation, true)
            }
            _ => return None,
        };
        let params = parameters
            .iter()
            .filter(|&p| {
                arena
                    .get(p)
                    .and_then(|n| arena.get_parameter(n))
                    .is_none_or(|param| arena.node_text(param.name) != "this")
            })
            .collect();
        Some(SignatureParts {
            params,
            return_type,
            has_return,
        })
    }
}

/// Name a whole signature is reported under: its source text, including the
/// `;` that terminates a type member.
pub fn signature_text(arena: &NodeArena, node: NodeIndex) -> &str {
    let Some(n) = arena.get(node) else {
        return "";
    };
    let source = arena.source_text();
    let mut end = n.end as usize;
    let rest = source.get(end..).unwrap_or("");
    let after_blanks = rest.trim_start_matches([' ', '\t']);
    if after_blanks.starts_with(';') {
        end += rest.len() - after_blanks.len() + 1;
    }
    source.get(n.pos as usize..end).unwrap_or("")
}

/// Flags and annotation of a parameter node.
struct ParamView {
    name: NodeIndex,
    type_annotation: NodeIndex,
    optional: bool,
    rest: bool,
}

fn param_view(arena: &NodeArena, param: NodeIndex) -> Option<ParamView> {
    let data = arena.get(param).and_then(|n| arena.get_parameter(n))?;
    Some(ParamView {
        name: data.name,
        type_annotation: data.type_annotation,
        optional: data.question_token || data.initializer.is_some(),
        rest: data.dot_dot_dot_token,
    })
}

/// One parameter position compared: rest and optional flags are part of the type.
fn parameter_matches(cmp: &TypeComparer<'_>, source: NodeIndex, target: NodeIndex) -> bool {
    let (Some(s), Some(t)) = (
        param_view(cmp.source().arena(), source),
        param_view(cmp.target().arena(), target),
    ) else {
        return false;
    };
    s.rest == t.rest
        && cmp.optionality_matches(s.optional, t.optional)
        && cmp.parameter_types_match(s.type_annotation, t.type_annotation, s.optional && t.optional)
}

/// Same arity and pairwise matching parameters after the first `skip`; names ignored.
pub fn parameters_compatible(
    cmp: &TypeComparer<'_>,
    source: NodeIndex,
    target: NodeIndex,
    skip: usize,
) -> bool {
    let (Some(s), Some(t)) = (
        SignatureParts::of(cmp.source().arena(), source),
        SignatureParts::of(cmp.target().arena(), target),
    ) else {
        return false;
    };
    s.params.len() == t.params.len()
        && s.params
            .iter()
            .zip(t.params.iter())
            .skip(skip)
            .all(|(&sp, &tp)| parameter_matches(cmp, sp, tp))
}

/// Parameters and return type both match.
pub fn signatures_compatible(cmp: &TypeComparer<'_>, source: NodeIndex, target: NodeIndex) -> bool {
    if !parameters_compatible(cmp, source, target, 0) {
        return false;
    }
    match (
        SignatureParts::of(cmp.source().arena(), source),
        SignatureParts::of(cmp.target().arena(), target),
    ) {
        (Some(s), Some(t)) => {
            s.has_return == t.has_return
                && (!s.has_return || cmp.types_match(s.return_type, t.return_type))
        }
        _ => false,
    }
}

/// Diff a matched signature pair. `source` and `target` name the whole
/// signatures; the first `skip` parameters are excluded from per-position
/// comparison but still count toward arity.
pub fn diff_signatures<'ctx>(
    cmp: &TypeComparer<'ctx>,
    source: NamedNode<'ctx>,
    target: NamedNode<'ctx>,
    skip: usize,
) -> Vec<DiffPair<'ctx>> {
    let source_arena = cmp.source().arena();
    let target_arena = cmp.target().arena();
    let (Some(s), Some(t)) = (
        SignatureParts::of(source_arena, source.node.index),
        SignatureParts::of(target_arena, target.node.index),
    ) else {
        return Vec::new();
    };
    let direction = cmp.direction();
    let mut pairs = Vec::new();

    if (s.has_return || t.has_return) && !cmp.types_match(s.return_type, t.return_type) {
        pairs.push(DiffPair::changed(
            DiffLocation::SignatureReturnType,
            DiffReasons::TYPE_CHANGED,
            direction,
            source,
            target,
        ));
    }

    if s.params.len() != t.params.len() {
        pairs.push(DiffPair::changed(
            DiffLocation::SignatureParameterList,
            DiffReasons::COUNT_CHANGED,
            direction,
            source,
            target,
        ));
        return pairs;
    }

    for (&sp, &tp) in s.params.iter().zip(t.params.iter()).skip(skip) {
        if parameter_matches(cmp, sp, tp) {
            continue;
        }
        let source_name = param_view(source_arena, sp).map_or("", |p| source_arena.node_text(p.name));
        let target_name = param_view(target_arena, tp).map_or("", |p| target_arena.node_text(p.name));
        pairs.push(DiffPair::changed(
            DiffLocation::Parameter,
            DiffReasons::TYPE_CHANGED,
            direction,
            cmp.named_source(sp, source_name),
            cmp.named_target(tp, target_name),
        ));
    }
    pairs
}
