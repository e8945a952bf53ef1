//! Optional and readonly modifiers of a matched property pair.

use smallvec::SmallVec;
use tsbc_binder::Member;

use crate::diff::{AssignDirection, DiffLocation, DiffPair, DiffReasons, NamedNode};
use crate::options::DetectorOptions;

pub fn diff_modifiers<'ctx>(
    source_member: &Member,
    target_member: &Member,
    source: NamedNode<'ctx>,
    target: NamedNode<'ctx>,
    direction: AssignDirection,
    options: &DetectorOptions,
) -> SmallVec<[DiffPair<'ctx>; 2]> {
    let mut pairs = SmallVec::new();
    let change = |reason| DiffPair::changed(DiffLocation::Property, reason, direction, source, target);

    if target_member.optional && !source_member.optional {
        if options.required_to_optional_as_breaking_change {
            pairs.push(change(DiffReasons::REQUIRED_TO_OPTIONAL));
        }
    } else if !target_member.optional && source_member.optional {
        if options.optional_to_required_as_breaking_change {
            pairs.push(change(DiffReasons::OPTIONAL_TO_REQUIRED));
        }
    }

    // Mutable to readonly is never reported.
    if target_member.readonly && !source_member.readonly {
        pairs.push(change(DiffReasons::READONLY_TO_MUTABLE));
    }
    pairs
}
