use crate::diff::{AssignDirection, DiffLocation as Loc, DiffReasons as R};
use crate::patch_function;
use crate::test_utils::{assert_well_formed, context, describe_all};

const C2B: AssignDirection = AssignDirection::CurrentToBaseline;

#[test]
fn test_function_overloads() {
    let baseline = r#"
    export interface A {a: string;}
    export interface B {b: string;}
    export interface C {c: string;}
    export interface D {d: string;}
    export function isUnexpected(response: A | B): response is A;
    export function isUnexpected(response: C | D): response is A;"#;
    let current = r#"
    export interface A {a: string;}
    export interface B {b: string;}
    export interface C {c: string;}
    export interface D {d: string;}
    export function isUnexpected(response: A | B): response is A;
    export function isUnexpected(response: C | E): response is C;"#;

    let ctx = context(baseline, current);
    let pairs = patch_function("isUnexpected", &ctx);
    assert_well_formed(&pairs, C2B);
    assert_eq!(
        describe_all(&pairs),
        vec![
            (Loc::SignatureOverload, R::REMOVED, "isUnexpected"),
            (Loc::SignatureOverload, R::ADDED, "isUnexpected"),
        ]
    );
}

#[test]
fn test_overload_order_does_not_matter() {
    let ctx = context(
        "export function f(a: string): void;\nexport function f(a: number): void;",
        "export function f(a: number): void;\nexport function f(a: string): void;",
    );
    assert!(patch_function("f", &ctx).is_empty());
}

#[test]
fn test_single_function_grows_an_overload() {
    let ctx = context(
        "export function f(a: string): void;",
        "export function f(a: string): void;\nexport function f(a: number): void;",
    );
    let pairs = patch_function("f", &ctx);
    assert_eq!(describe_all(&pairs), vec![(Loc::SignatureOverload, R::ADDED, "f")]);
}

/// Declarations without a terminating `;`.
const BASELINE: &str = r#"
    export function funcBasic(a: string): string
    export function funcReturnType(a: string): string
    export function funcParameterCount(a: string, b: string): string
    export function funcParameterType(a: string): string
    export function funcRemove(a: string): string"#;

const CURRENT: &str = r#"
    export function funcBasic(a: string): string
    export function funcReturnType(a: string): number
    export function funcParameterCount(a: string, b: string, c: string): string
    export function funcParameterType(a: number): string
    export function funcAdd(a: string): string"#;

#[test]
fn test_function_unchanged() {
    let ctx = context(BASELINE, CURRENT);
    assert!(patch_function("funcBasic", &ctx).is_empty());
}

#[test]
fn test_function_return_type() {
    let ctx = context(BASELINE, CURRENT);
    let pairs = patch_function("funcReturnType", &ctx);
    assert_well_formed(&pairs, C2B);
    assert_eq!(
        describe_all(&pairs),
        vec![(Loc::SignatureReturnType, R::TYPE_CHANGED, "funcReturnType")]
    );
}

#[test]
fn test_function_parameter_count() {
    let ctx = context(BASELINE, CURRENT);
    let pairs = patch_function("funcParameterCount", &ctx);
    assert_eq!(
        describe_all(&pairs),
        vec![(Loc::SignatureParameterList, R::COUNT_CHANGED, "funcParameterCount")]
    );
}

#[test]
fn test_function_parameter_type() {
    let ctx = context(BASELINE, CURRENT);
    let pairs = patch_function("funcParameterType", &ctx);
    assert_eq!(describe_all(&pairs), vec![(Loc::Parameter, R::TYPE_CHANGED, "a")]);
    let source = pairs[0].source().map(|node| ctx.node_text(node.node));
    assert_eq!(source, Some("a: number"));
}

#[test]
fn test_function_removed_and_added() {
    let ctx = context(BASELINE, CURRENT);
    let pairs = patch_function("funcRemove", &ctx);
    assert_eq!(describe_all(&pairs), vec![(Loc::Signature, R::REMOVED, "funcRemove")]);

    let pairs = patch_function("funcAdd", &ctx);
    assert_eq!(describe_all(&pairs), vec![(Loc::Signature, R::ADDED, "funcAdd")]);
    assert!(pairs[0].target().is_none());
}

#[test]
fn test_function_renamed_parameter() {
    let ctx = context(
        "export function f(a: string): string;",
        "export function f(b: string): string;",
    );
    assert!(patch_function("f", &ctx).is_empty());
}

#[test]
fn test_optional_parameter_with_explicit_undefined() {
    let ctx = context(
        "export function f(a?: string): void;",
        "export function f(a?: string | undefined): void;",
    );
    assert!(patch_function("f", &ctx).is_empty());

    let ctx = context(
        "export function f(a?: string): void;",
        "export function f(a?: number | undefined): void;",
    );
    assert_eq!(
        describe_all(&patch_function("f", &ctx)),
        vec![(Loc::Parameter, R::TYPE_CHANGED, "a")]
    );
}

#[test]
fn test_function_return_and_parameter_changes_together() {
    let ctx = context(
        "export function f(a: string, b: string): string;",
        "export function f(a: number, b: string): number;",
    );
    let pairs = patch_function("f", &ctx);
    assert_eq!(
        describe_all(&pairs),
        vec![
            (Loc::SignatureReturnType, R::TYPE_CHANGED, "f"),
            (Loc::Parameter, R::TYPE_CHANGED, "a"),
        ]
    );
}

#[test]
fn test_function_this_parameter_is_ignored() {
    let ctx = context(
        "export function f(this: Window, a: string): void;",
        "export function f(a: string): void;",
    );
    assert!(patch_function("f", &ctx).is_empty());
}

#[test]
fn test_function_rest_parameter() {
    let ctx = context(
        "export function f(...args: string[]): void;",
        "export function f(args: string[]): void;",
    );
    let pairs = patch_function("f", &ctx);
    assert_eq!(describe_all(&pairs), vec![(Loc::Parameter, R::TYPE_CHANGED, "args")]);
}

#[test]
fn test_function_array_spellings_agree() {
    let ctx = context(
        "export function f(a: Array<string>): readonly number[];",
        "export function f(a: string[]): ReadonlyArray<number>;",
    );
    assert!(patch_function("f", &ctx).is_empty());
}
