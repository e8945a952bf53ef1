use clap::Parser;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::args::CliArgs;
use super::driver::{load_options, read_surface, run};
use tsbc::{AssignDirection, DiffLocation, DiffReasons, TypeRelationMode};

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

fn args(baseline: &Path, current: &Path, extra: &[&str]) -> CliArgs {
    let mut argv = vec![
        "tsbc".to_string(),
        "--baseline".to_string(),
        baseline.display().to_string(),
        "--current".to_string(),
        current.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    CliArgs::try_parse_from(argv).expect("args should parse")
}

#[test]
fn read_surface_strips_bom() {
    let temp = TempDir::new().expect("temp dir");
    let path = write(temp.path(), "api.d.ts", "\u{feff}export interface A {}");
    assert_eq!(read_surface(&path).unwrap(), "export interface A {}");
}

#[test]
fn read_surface_reports_missing_file() {
    let temp = TempDir::new().expect("temp dir");
    let err = read_surface(&temp.path().join("missing.d.ts")).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read"), "{err:#}");
}

#[test]
fn load_options_defaults_and_file() {
    assert_eq!(load_options(None).unwrap(), tsbc::DetectorOptions::default());

    let temp = TempDir::new().expect("temp dir");
    let path = write(
        temp.path(),
        "tsbc.json",
        r#"{ "typeRelation": "assignable", "requiredToOptionalAsBreakingChange": "false" }"#,
    );
    let options = load_options(Some(&path)).unwrap();
    assert_eq!(options.type_relation, TypeRelationMode::Assignable);
    assert!(!options.required_to_optional_as_breaking_change);

    let bad = write(temp.path(), "bad.json", r#"{ "nope": 1 }"#);
    let err = load_options(Some(&bad)).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load config"), "{err:#}");
}

#[test]
fn run_reports_all_declarations() {
    let temp = TempDir::new().expect("temp dir");
    let baseline = write(
        temp.path(),
        "old.d.ts",
        "export interface A { readonly prop: string; }\nexport declare function f(a: string): void;\n",
    );
    let current = write(
        temp.path(),
        "new.d.ts",
        "export interface A { prop: string; }\nexport declare function f(a: string): void;\nexport type T = string;\n",
    );

    let report = run(&args(&baseline, &current, &[])).unwrap();
    assert_eq!(report.declarations.keys().collect::<Vec<_>>(), vec!["A", "T"]);
    assert_eq!(report.total(), 2);
    assert_eq!(report.breaking_count(), 1);
    assert!(report.has_breaking());

    let a = &report.declarations["A"][0];
    assert_eq!(a.location, DiffLocation::Property);
    assert_eq!(a.reasons, DiffReasons::READONLY_TO_MUTABLE);
    let t = &report.declarations["T"][0];
    assert_eq!(t.reasons, DiffReasons::ADDED);
}

#[test]
fn run_with_names_and_direction() {
    let temp = TempDir::new().expect("temp dir");
    let baseline = write(
        temp.path(),
        "old.d.ts",
        "export interface A { readonly prop: string; }\nexport interface B { x: string; }\n",
    );
    let current = write(
        temp.path(),
        "new.d.ts",
        "export interface A { prop: string; }\nexport interface B { x: number; }\n",
    );

    let report = run(&args(&baseline, &current, &["--name", "B", "--name", "Missing"])).unwrap();
    assert_eq!(report.declarations.keys().collect::<Vec<_>>(), vec!["B"]);

    let reversed = run(&args(
        &baseline,
        &current,
        &["--name", "A", "--direction", "baseline-to-current"],
    ))
    .unwrap();
    assert!(reversed.declarations.is_empty());
}

#[test]
fn report_names_the_fixed_direction() {
    let temp = TempDir::new().expect("temp dir");
    let baseline = write(temp.path(), "old.d.ts", "export function f(a: string): void;\n");
    let current = write(temp.path(), "new.d.ts", "export function f(a: number): void;\n");

    let report = run(&args(&baseline, &current, &["--direction", "baseline-to-current"])).unwrap();
    assert_eq!(report.direction, AssignDirection::BaselineToCurrent);
    assert_eq!(report.fixed_direction, AssignDirection::CurrentToBaseline);
    assert_eq!(report.declarations["f"][0].reasons, DiffReasons::TYPE_CHANGED);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["direction"], "BaselineToCurrent");
    assert_eq!(value["fixedDirection"], "CurrentToBaseline");
}

#[test]
fn run_fails_on_syntax_errors() {
    let temp = TempDir::new().expect("temp dir");
    let baseline = write(temp.path(), "old.d.ts", "export interface A {}\n");
    let current = write(temp.path(), "new.d.ts", "export interface A {\n");

    let err = run(&args(&baseline, &current, &[])).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("current surface"), "{message}");
    assert!(message.contains("new.d.ts"), "{message}");
}
