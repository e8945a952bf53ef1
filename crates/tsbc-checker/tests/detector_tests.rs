use crate::diff::{AssignDirection, DiffLocation as Loc, DiffReasons as R, DiffRecord};
use crate::options::DetectorOptions;
use crate::patch::Detector;
use crate::test_utils::{assert_well_formed, context, describe_all};
use crate::{detect_breaking_changes, detect_breaking_changes_between_surfaces};

const AI_TRANSLATION_TEXT: &str =
    include_str!("../../tsbc-parser/tests/fixtures/ai-translation-text.api.d.ts");

#[test]
fn test_identical_surfaces_have_no_changes() {
    let ctx = context(AI_TRANSLATION_TEXT, AI_TRANSLATION_TEXT);
    let results = detect_breaking_changes(&ctx, &DetectorOptions::default());
    assert!(results.is_empty(), "{results:?}");
}

#[test]
fn test_removed_route_in_api_report() {
    let current = AI_TRANSLATION_TEXT.replacen("(path: '/transliterate'): Transliterate;", "", 1);
    let ctx = context(AI_TRANSLATION_TEXT, &current);
    let results = detect_breaking_changes(&ctx, &DetectorOptions::default());
    assert_eq!(results.keys().collect::<Vec<_>>(), vec!["Routes"]);
    assert_eq!(
        describe_all(&results["Routes"]),
        vec![(Loc::Signature, R::REMOVED, "(path: '/transliterate'): Transliterate;")]
    );
}

#[test]
fn test_respelled_types_in_api_report() {
    let current = AI_TRANSLATION_TEXT.replace(
        "body: Array<TranslatedTextItemOutput>;",
        "body: TranslatedTextItemOutput[];",
    );
    assert_ne!(current, AI_TRANSLATION_TEXT);
    let ctx = context(AI_TRANSLATION_TEXT, &current);
    assert!(detect_breaking_changes(&ctx, &DetectorOptions::default()).is_empty());
}

#[test]
fn test_results_follow_baseline_then_current_order() {
    let ctx = context(
        "export interface B { x: string; }\nexport function a(): void;\nexport type Gone = string;",
        "export interface B { x: number; }\nexport function a(): void;\nexport class New {}",
    );
    let results = detect_breaking_changes(&ctx, &DetectorOptions::default());
    assert_eq!(results.keys().collect::<Vec<_>>(), vec!["B", "Gone", "New"]);
    assert_eq!(describe_all(&results["B"]), vec![(Loc::Property, R::TYPE_CHANGED, "x")]);
    assert_eq!(describe_all(&results["Gone"]), vec![(Loc::TypeAlias, R::REMOVED, "Gone")]);
    assert_eq!(describe_all(&results["New"]), vec![(Loc::Class, R::ADDED, "New")]);
}

#[test]
fn test_kind_change_is_removed_then_added() {
    let ctx = context(
        "export interface Foo { a: string; }",
        "export type Foo = { a: string };",
    );
    let detector = Detector::new(&ctx, DetectorOptions::default());
    let pairs = detector.patch_declaration("Foo", AssignDirection::CurrentToBaseline);
    assert_well_formed(&pairs, AssignDirection::CurrentToBaseline);
    assert_eq!(
        describe_all(&pairs),
        vec![(Loc::Interface, R::REMOVED, "Foo"), (Loc::TypeAlias, R::ADDED, "Foo")]
    );
}

#[test]
fn test_structurally_renamed_interface() {
    let ctx = context(
        "export interface Old { a: number; }\nexport interface User { x: Old; }",
        "export interface New { a: number; }\nexport interface User { x: New; }",
    );
    let results = detect_breaking_changes(&ctx, &DetectorOptions::default());
    assert_eq!(results.keys().collect::<Vec<_>>(), vec!["Old", "New"]);
}

#[test]
fn test_variables_are_not_diffed() {
    let ctx = context(
        "export declare const version: string;",
        "export declare const version: number;",
    );
    assert!(detect_breaking_changes(&ctx, &DetectorOptions::default()).is_empty());
}

#[test]
fn test_routes_dispatch_by_interface_name() {
    let ctx = context(
        r#"export interface Routes { (path: "/a"): A; (path: "/b"): B; }"#,
        r#"export interface Routes { (path: "/a"): A; }"#,
    );
    let results = detect_breaking_changes(&ctx, &DetectorOptions::default());
    assert_eq!(
        describe_all(&results["Routes"]),
        vec![(Loc::Signature, R::REMOVED, r#"(path: "/b"): B;"#)]
    );
}

#[test]
fn test_pair_serializes_to_camel_case() {
    let ctx = context(
        "export interface A {\n  prop?: string;\n}",
        "export interface A {\n  prop: string;\n}",
    );
    let results = detect_breaking_changes(&ctx, &DetectorOptions::default());
    let pair = &results["A"][0];
    assert!(pair.is_breaking());

    let json = serde_json::to_value(pair).unwrap();
    assert_eq!(json["location"], "Property");
    assert_eq!(json["reasons"], serde_json::json!(["RequiredToOptional"]));
    assert_eq!(json["assignDirection"], "CurrentToBaseline");
    assert_eq!(json["source"]["name"], "prop");
    assert_eq!(json["source"]["side"], "current");
    assert_eq!(json["target"]["side"], "baseline");
    assert_eq!(json["target"]["pos"], 23);
}

#[test]
fn test_one_sided_pair_omits_missing_node() {
    let ctx = context("", "export interface A {}");
    let results = detect_breaking_changes(&ctx, &DetectorOptions::default());
    let pair = &results["A"][0];
    assert!(!pair.is_breaking());
    let json = serde_json::to_value(pair).unwrap();
    assert_eq!(json["reasons"], serde_json::json!(["Added"]));
    assert!(json.get("target").is_none());
}

#[test]
fn test_records_outlive_the_context() {
    let results = detect_breaking_changes_between_surfaces(
        "export interface A {\n  readonly prop: string;\n}",
        "export interface A {\n  prop: string;\n}",
        &DetectorOptions::default(),
    )
    .unwrap();
    let records: &Vec<DiffRecord> = &results["A"];
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.location, Loc::Property);
    assert_eq!(record.reasons, R::READONLY_TO_MUTABLE);
    assert!(record.is_breaking());

    let target = record.target.as_ref().unwrap();
    assert_eq!(target.name, "prop");
    assert_eq!((target.position.line, target.position.character), (1, 2));

    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["target"]["line"], 1);
    assert_eq!(json["target"]["character"], 2);
    assert_eq!(json["reasons"], serde_json::json!(["ReadonlyToMutable"]));
}

#[test]
fn test_between_surfaces_reports_parse_errors() {
    let err = detect_breaking_changes_between_surfaces(
        "export interface A {",
        "export interface A {}",
        &DetectorOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("baseline"), "{err}");
}

#[test]
fn test_reasons_display() {
    assert_eq!(R::REMOVED.to_string(), "Removed");
    assert_eq!(
        (R::TYPE_CHANGED | R::READONLY_TO_MUTABLE).to_string(),
        "TypeChanged | ReadonlyToMutable"
    );
    assert_eq!(Loc::SignatureParameterList.to_string(), "Signature_ParameterList");
}

#[test]
fn test_detect_all_in_reverse_direction() {
    let ctx = context(
        "export interface A { readonly p: string; q?: string; }",
        "export interface A { p: string; q: string; }",
    );
    let detector = Detector::new(&ctx, DetectorOptions::default());
    assert_eq!(
        describe_all(&detector.detect_all()["A"]),
        vec![
            (Loc::Property, R::READONLY_TO_MUTABLE, "p"),
            (Loc::Property, R::REQUIRED_TO_OPTIONAL, "q"),
        ]
    );

    let reversed = detector.detect_all_in(AssignDirection::BaselineToCurrent);
    assert_well_formed(&reversed["A"], AssignDirection::BaselineToCurrent);
    assert_eq!(
        describe_all(&reversed["A"]),
        vec![(Loc::Property, R::OPTIONAL_TO_REQUIRED, "q")]
    );
}
