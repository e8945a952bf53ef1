use clap::Parser;

use super::args::{CliArgs, Direction, OutputFormat};
use tsbc::AssignDirection;

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["tsbc", "--baseline", "old.d.ts", "--current", "new.d.ts"])
        .expect("required args should parse");

    assert_eq!(args.baseline, std::path::PathBuf::from("old.d.ts"));
    assert_eq!(args.current, std::path::PathBuf::from("new.d.ts"));
    assert_eq!(args.direction, Direction::CurrentToBaseline);
    assert_eq!(args.format, OutputFormat::Text);
    assert!(args.config.is_none());
    assert!(args.names.is_empty());
    assert!(!args.fail_on_breaking);
    assert!(!args.no_color);
}

#[test]
fn parses_all_flags() {
    let args = CliArgs::try_parse_from([
        "tsbc",
        "--baseline",
        "old.d.ts",
        "--current",
        "new.d.ts",
        "--direction",
        "baseline-to-current",
        "--config",
        "tsbc.json",
        "--format",
        "json",
        "--name",
        "Routes",
        "--name",
        "TextTranslationClient",
        "--fail-on-breaking",
        "--no-color",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.direction, Direction::BaselineToCurrent);
    assert_eq!(
        AssignDirection::from(args.direction),
        AssignDirection::BaselineToCurrent
    );
    assert_eq!(args.config.as_deref(), Some(std::path::Path::new("tsbc.json")));
    assert_eq!(args.format, OutputFormat::Json);
    assert_eq!(args.names, vec!["Routes", "TextTranslationClient"]);
    assert!(args.fail_on_breaking);
    assert!(args.no_color);
}

#[test]
fn rejects_missing_surface() {
    assert!(CliArgs::try_parse_from(["tsbc", "--baseline", "old.d.ts"]).is_err());
    assert!(
        CliArgs::try_parse_from([
            "tsbc",
            "--baseline",
            "a",
            "--current",
            "b",
            "--format",
            "xml"
        ])
        .is_err()
    );
}
