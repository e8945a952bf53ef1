//! Parse a real generated API report end to end.

use crate::parse_surface;
use crate::parser::syntax_kind_ext;
use rustc_hash::FxHashMap;

const AI_TRANSLATION_TEXT: &str = include_str!("fixtures/ai-translation-text.api.d.ts");

#[test]
fn test_api_report_parses_without_diagnostics() {
    let (arena, root, diagnostics) =
        parse_surface("ai-translation-text.api.d.ts", AI_TRANSLATION_TEXT);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(arena.statements(root).len(), 111);
}

#[test]
fn test_api_report_statement_kinds() {
    let (arena, root, _) = parse_surface("ai-translation-text.api.d.ts", AI_TRANSLATION_TEXT);
    let mut counts: FxHashMap<u16, usize> = FxHashMap::default();
    for &statement in arena.statements(root) {
        *counts.entry(arena.get(statement).unwrap().kind).or_default() += 1;
    }
    assert_eq!(counts.get(&syntax_kind_ext::IMPORT_DECLARATION), Some(&9));
    assert_eq!(counts.get(&syntax_kind_ext::INTERFACE_DECLARATION), Some(&86));
    assert_eq!(counts.get(&syntax_kind_ext::TYPE_ALIAS_DECLARATION), Some(&7));
    assert_eq!(counts.get(&syntax_kind_ext::FUNCTION_DECLARATION), Some(&8));
    assert_eq!(counts.get(&syntax_kind_ext::EXPORT_ASSIGNMENT), Some(&1));
}

#[test]
fn test_api_report_routes_interface() {
    let (arena, root, _) = parse_surface("ai-translation-text.api.d.ts", AI_TRANSLATION_TEXT);
    let routes = arena
        .statements(root)
        .iter()
        .copied()
        .find(|&s| {
            arena.kind_of(s) == Some(syntax_kind_ext::INTERFACE_DECLARATION)
                && arena.property_name_text(arena.declaration_name(s)) == Some("Routes")
        })
        .expect("Routes interface");
    let data = arena.get_interface(arena.get(routes).unwrap()).unwrap();
    assert_eq!(data.members.len(), 6);

    let first = arena.get_signature(arena.get(data.members.nodes[0]).unwrap()).unwrap();
    let param = first.parameters.as_ref().unwrap().nodes[0];
    let param_type = arena.get_parameter(arena.get(param).unwrap()).unwrap().type_annotation;
    let literal = arena.get_literal_type(arena.get(param_type).unwrap()).unwrap();
    assert_eq!(
        arena.get_literal(arena.get(literal.literal).unwrap()).unwrap().text,
        "/languages"
    );
}

#[test]
fn test_api_report_quoted_header_names() {
    let (arena, root, _) = parse_surface("ai-translation-text.api.d.ts", AI_TRANSLATION_TEXT);
    let headers = arena
        .statements(root)
        .iter()
        .copied()
        .find(|&s| arena.property_name_text(arena.declaration_name(s)) == Some("Translate200Headers"))
        .expect("Translate200Headers");
    let data = arena.get_interface(arena.get(headers).unwrap()).unwrap();
    let names: Vec<&str> = data
        .members
        .iter()
        .filter_map(|m| arena.property_name_text(arena.declaration_name(m)))
        .collect();
    assert!(names.contains(&"x-requestid"));
    assert!(names.contains(&"x-metered-usage"));
}
