use crate::diff::{AssignDirection, DiffLocation as Loc, DiffReasons as R};
use crate::options::{DetectorOptions, TypeRelationMode};
use crate::patch::Detector;
use crate::test_utils::{context, describe_all};

const C2B: AssignDirection = AssignDirection::CurrentToBaseline;

#[test]
fn test_defaults() {
    let options = DetectorOptions::default();
    assert!(!options.concrete_type_to_any_as_breaking_change);
    assert!(options.required_to_optional_as_breaking_change);
    assert!(options.optional_to_required_as_breaking_change);
    assert_eq!(options.type_relation, TypeRelationMode::Equivalent);
    assert_eq!(options.routes_interface_name, "Routes");
    assert_eq!(DetectorOptions::from_json_str("{}").unwrap(), options);
}

#[test]
fn test_bools_accept_strings() {
    let options = DetectorOptions::from_json_str(
        r#"{
            "requiredToOptionalAsBreakingChange": "false",
            "optionalToRequiredAsBreakingChange": false,
            "concreteTypeToAnyAsBreakingChange": "yes",
            "typeRelation": "assignable",
            "routesInterfaceName": "ApiRoutes"
        }"#,
    )
    .unwrap();
    assert!(!options.required_to_optional_as_breaking_change);
    assert!(!options.optional_to_required_as_breaking_change);
    assert!(options.concrete_type_to_any_as_breaking_change);
    assert_eq!(options.type_relation, TypeRelationMode::Assignable);
    assert_eq!(options.routes_interface_name, "ApiRoutes");
}

#[test]
fn test_invalid_options_are_rejected() {
    let err = DetectorOptions::from_json_str(r#"{ "requiredToOptional": true }"#).unwrap_err();
    assert!(err.to_string().contains("unknown field"), "{err}");

    let err = DetectorOptions::from_json_str(r#"{ "requiredToOptionalAsBreakingChange": "maybe" }"#)
        .unwrap_err();
    assert!(err.to_string().starts_with("invalid detector options"), "{err}");
}

#[test]
fn test_optionality_switches() {
    let ctx = context(
        "export interface A { a?: string; b: string; }",
        "export interface A { a: string; b?: string; }",
    );
    let all = Detector::new(&ctx, DetectorOptions::default()).patch_interface("A", C2B);
    assert_eq!(
        describe_all(&all),
        vec![
            (Loc::Property, R::REQUIRED_TO_OPTIONAL, "a"),
            (Loc::Property, R::OPTIONAL_TO_REQUIRED, "b"),
        ]
    );

    let options = DetectorOptions {
        required_to_optional_as_breaking_change: false,
        ..DetectorOptions::default()
    };
    let pairs = Detector::new(&ctx, options).patch_interface("A", C2B);
    assert_eq!(describe_all(&pairs), vec![(Loc::Property, R::OPTIONAL_TO_REQUIRED, "b")]);

    let options = DetectorOptions {
        optional_to_required_as_breaking_change: false,
        ..DetectorOptions::default()
    };
    let pairs = Detector::new(&ctx, options).patch_interface("A", C2B);
    assert_eq!(describe_all(&pairs), vec![(Loc::Property, R::REQUIRED_TO_OPTIONAL, "a")]);
}

#[test]
fn test_any_is_a_wildcard_unless_configured() {
    let ctx = context(
        "export interface A { a: string; b: any; }",
        "export interface A { a: any; b: string; }",
    );
    let lenient = Detector::new(&ctx, DetectorOptions::default()).patch_interface("A", C2B);
    assert!(lenient.is_empty(), "{lenient:?}");

    let options = DetectorOptions {
        concrete_type_to_any_as_breaking_change: true,
        ..DetectorOptions::default()
    };
    let strict = Detector::new(&ctx, options).patch_interface("A", C2B);
    assert_eq!(describe_all(&strict), vec![(Loc::Property, R::TYPE_CHANGED, "a")]);
}

#[test]
fn test_unknown_is_a_wildcard_too() {
    let ctx = context(
        "export interface A { a: string; }",
        "export interface A { a: unknown; }",
    );
    assert!(Detector::new(&ctx, DetectorOptions::default()).patch_interface("A", C2B).is_empty());
}

#[test]
fn test_assignable_mode() {
    let ctx = context(
        "export interface A { status: string; send(code: \"ok\"): void; }",
        "export interface A { status: \"ok\"; send(code: string): void; }",
    );
    let equivalent = Detector::new(&ctx, DetectorOptions::default()).patch_interface("A", C2B);
    assert_eq!(
        describe_all(&equivalent),
        vec![
            (Loc::Property, R::TYPE_CHANGED, "status"),
            (Loc::Parameter, R::TYPE_CHANGED, "code"),
        ]
    );

    let options = DetectorOptions {
        type_relation: TypeRelationMode::Assignable,
        ..DetectorOptions::default()
    };
    let assignable = Detector::new(&ctx, options).patch_interface("A", C2B);
    assert!(assignable.is_empty(), "{assignable:?}");
}

#[test]
fn test_assignable_mode_allows_optional_parameters() {
    let ctx = context(
        "export interface A { f(a: string): void; }",
        "export interface A { f(a?: string): void; }",
    );
    let options = DetectorOptions {
        type_relation: TypeRelationMode::Assignable,
        ..DetectorOptions::default()
    };
    assert!(Detector::new(&ctx, options.clone()).patch_interface("A", C2B).is_empty());

    let reversed = context(
        "export interface A { f(a?: string): void; }",
        "export interface A { f(a: string): void; }",
    );
    let pairs = Detector::new(&reversed, options).patch_interface("A", C2B);
    assert_eq!(describe_all(&pairs), vec![(Loc::Parameter, R::TYPE_CHANGED, "a")]);
}
