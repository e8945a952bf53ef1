use crate::diff::{AssignDirection, DiffLocation as Loc, DiffReasons as R};
use crate::patch_type_alias;
use crate::test_utils::{assert_well_formed, context, describe_all};

const C2B: AssignDirection = AssignDirection::CurrentToBaseline;

const BASELINE: &str = r#"
    export type typesChange = "basic" | "remove";
    export type typesRemove = "basic" | "remove";

    export type typesExpand = string | number;
    export type typesNarrow = string | number | boolean;"#;

const CURRENT: &str = r#"export type typesChange = "basic" | "rEmove";
    export type typesAdd = "basic" | "rEmove";

    export type typesExpand = string | number | boolean;
    export type typesNarrow = string | number;"#;

#[test]
fn test_union_literal_changed() {
    let ctx = context(BASELINE, CURRENT);
    let pairs = patch_type_alias("typesChange", &ctx, C2B);
    assert_well_formed(&pairs, C2B);
    assert_eq!(describe_all(&pairs), vec![(Loc::TypeAlias, R::TYPE_CHANGED, "typesChange")]);
}

#[test]
fn test_alias_removed_and_added() {
    let ctx = context(BASELINE, CURRENT);
    let pairs = patch_type_alias("typesRemove", &ctx, C2B);
    assert_eq!(describe_all(&pairs), vec![(Loc::TypeAlias, R::REMOVED, "typesRemove")]);

    let pairs = patch_type_alias("typesAdd", &ctx, C2B);
    assert_eq!(describe_all(&pairs), vec![(Loc::TypeAlias, R::ADDED, "typesAdd")]);
    assert_eq!(pairs[0].source().map(|s| s.name), Some("typesAdd"));
}

#[test]
fn test_union_widened_and_narrowed() {
    let ctx = context(BASELINE, CURRENT);
    for name in ["typesExpand", "typesNarrow"] {
        let pairs = patch_type_alias(name, &ctx, C2B);
        assert_well_formed(&pairs, C2B);
        assert_eq!(describe_all(&pairs), vec![(Loc::TypeAlias, R::TYPE_CHANGED, name)]);
        assert_eq!(pairs[0].source().map(|s| s.name), Some(name));
    }
}

#[test]
fn test_union_member_order_is_irrelevant() {
    let ctx = context(
        r#"export type T = "a" | "b" | number;"#,
        r#"export type T = number | ("b" | "a");"#,
    );
    assert!(patch_type_alias("T", &ctx, C2B).is_empty());
}

#[test]
fn test_record_and_index_signature_agree() {
    let ctx = context(
        "export type M = Record<string, number>;",
        "export type M = { [key: string]: number };",
    );
    assert!(patch_type_alias("M", &ctx, C2B).is_empty());
}

#[test]
fn test_referenced_alias_is_transparent() {
    let ctx = context(
        "export type Id = string;\nexport type Key = Id;",
        "export type Id = string;\nexport type Key = string;",
    );
    assert!(patch_type_alias("Key", &ctx, C2B).is_empty());
}

#[test]
fn test_object_alias_property_changed() {
    let ctx = context(
        "export type Options = { timeout: number; retries?: number };",
        "export type Options = { timeout: number; retries: number };",
    );
    let pairs = patch_type_alias("Options", &ctx, C2B);
    assert_eq!(describe_all(&pairs), vec![(Loc::TypeAlias, R::TYPE_CHANGED, "Options")]);
}

#[test]
fn test_type_parameter_count_changed() {
    let ctx = context("export type Box<T> = T[];", "export type Box<T, U> = T[];");
    let pairs = patch_type_alias("Box", &ctx, C2B);
    assert_eq!(describe_all(&pairs), vec![(Loc::TypeAlias, R::TYPE_CHANGED, "Box")]);
}

#[test]
fn test_type_parameter_rename_is_not_a_change() {
    let ctx = context("export type Box<T> = { value: T };", "export type Box<U> = { value: U };");
    assert!(patch_type_alias("Box", &ctx, C2B).is_empty());
}

#[test]
fn test_interface_is_not_an_alias() {
    let ctx = context("export interface T {}", "export interface T {}");
    assert!(patch_type_alias("T", &ctx, C2B).is_empty());
}
