use crate::scanner::{ScannerState, token_flags};
use crate::syntax_kind::{SyntaxKind, keyword_from_text};

fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = ScannerState::new(source.to_string());
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.get_token_text().to_string()));
    }
    tokens
}

fn kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(kind, _)| kind).collect()
}

#[test]
fn test_keyword_lookup() {
    assert_eq!(keyword_from_text("interface"), Some(SyntaxKind::InterfaceKeyword));
    assert_eq!(keyword_from_text("keyof"), Some(SyntaxKind::KeyOfKeyword));
    assert_eq!(keyword_from_text("constructor"), Some(SyntaxKind::ConstructorKeyword));
    assert_eq!(keyword_from_text("Interface"), None);
    assert_eq!(keyword_from_text("clusterName"), None);
    assert_eq!(keyword_from_text("a"), None);
}

#[test]
fn test_keyword_text_matches_spelling() {
    assert_eq!(SyntaxKind::TypeOfKeyword.text(), "typeof");
    assert_eq!(SyntaxKind::ReadonlyKeyword.text(), "readonly");
    assert_eq!(SyntaxKind::EqualsGreaterThanToken.text(), "=>");
    assert!(SyntaxKind::KeyOfKeyword.is_keyword());
    assert!(!SyntaxKind::Identifier.is_keyword());
}

#[test]
fn test_interface_member_tokens() {
    assert_eq!(
        kinds("export interface A { readonly a?: string[]; }"),
        vec![
            SyntaxKind::ExportKeyword,
            SyntaxKind::InterfaceKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::ReadonlyKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::ColonToken,
            SyntaxKind::StringKeyword,
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
            SyntaxKind::SemicolonToken,
            SyntaxKind::CloseBraceToken,
        ]
    );
}

#[test]
fn test_arrow_and_spread_tokens() {
    assert_eq!(
        kinds("(...args: any[]) => void"),
        vec![
            SyntaxKind::OpenParenToken,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::Identifier,
            SyntaxKind::ColonToken,
            SyntaxKind::AnyKeyword,
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
            SyntaxKind::CloseParenToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::VoidKeyword,
        ]
    );
}

#[test]
fn test_nested_type_arguments_close_one_at_a_time() {
    assert_eq!(
        kinds("Promise<Array<string>>"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::StringKeyword,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanToken,
        ]
    );
}

#[test]
fn test_question_dot_not_before_digit() {
    assert_eq!(
        kinds("a?.b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionDotToken,
            SyntaxKind::Identifier
        ]
    );
    assert_eq!(
        kinds("a?.5"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::NumericLiteral
        ]
    );
}

#[test]
fn test_string_literal_value_is_unescaped() {
    let mut scanner = ScannerState::new(r#"'x-ms-\'id' "tab\there" 'A\x42'"#.to_string());
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value_ref(), "x-ms-'id");
    assert_eq!(scanner.get_token_text(), r#"'x-ms-\'id'"#);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value_ref(), "tab\there");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value_ref(), "AB");
}

#[test]
fn test_unterminated_string_reports_diagnostic() {
    let mut scanner = ScannerState::new("'open\nnext".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert!(scanner.is_unterminated());
    let diagnostics = scanner.get_scanner_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 1002);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_template_literal_is_one_token() {
    let tokens = scan_all("`/items/${id}/${`nested ${x}`}` ;");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].0, SyntaxKind::TemplateLiteral);
    assert_eq!(tokens[0].1, "`/items/${id}/${`nested ${x}`}`");
    assert_eq!(tokens[1].0, SyntaxKind::SemicolonToken);
}

#[test]
fn test_numeric_and_bigint_literals() {
    let tokens = scan_all("42 3.14 1e-3 0x1F 10n .5");
    let got: Vec<(SyntaxKind, &str)> = tokens.iter().map(|(k, t)| (*k, t.as_str())).collect();
    assert_eq!(
        got,
        vec![
            (SyntaxKind::NumericLiteral, "42"),
            (SyntaxKind::NumericLiteral, "3.14"),
            (SyntaxKind::NumericLiteral, "1e-3"),
            (SyntaxKind::NumericLiteral, "0x1F"),
            (SyntaxKind::BigIntLiteral, "10n"),
            (SyntaxKind::NumericLiteral, ".5"),
        ]
    );
}

#[test]
fn test_comments_are_trivia() {
    let source = "/** doc */\nexport // trailing\n/* block */ type //# sourceMappingURL=x.js.map";
    let mut scanner = ScannerState::new(source.to_string());
    assert_eq!(scanner.scan(), SyntaxKind::ExportKeyword);
    assert!(scanner.has_preceding_line_break());
    assert!(scanner.get_token_flags() & token_flags::PRECEDING_JSDOC_COMMENT != 0);
    assert_eq!(scanner.scan(), SyntaxKind::TypeKeyword);
    assert!(scanner.has_preceding_line_break());
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    assert!(scanner.get_scanner_diagnostics().is_empty());
}

#[test]
fn test_unterminated_block_comment() {
    let mut scanner = ScannerState::new("a /* never closed".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    assert_eq!(scanner.get_scanner_diagnostics()[0].code, 1010);
}

#[test]
fn test_token_positions_exclude_trivia() {
    let mut scanner = ScannerState::new("  foo  bar".to_string());
    scanner.scan();
    assert_eq!(scanner.get_token_full_start(), 0);
    assert_eq!(scanner.get_token_start(), 2);
    assert_eq!(scanner.get_token_end(), 5);
    scanner.scan();
    assert_eq!(scanner.get_token_start(), 7);
    assert_eq!(scanner.get_token_value_ref(), "bar");
}

#[test]
fn test_save_and_restore_state() {
    let mut scanner = ScannerState::new("a b \u{00A7} c".to_string());
    scanner.scan();
    let snapshot = scanner.save_state();
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert_eq!(scanner.get_scanner_diagnostics().len(), 1);
    scanner.restore_state(snapshot);
    assert_eq!(scanner.get_token_value_ref(), "a");
    assert!(scanner.get_scanner_diagnostics().is_empty());
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value_ref(), "b");
}

#[test]
fn test_private_identifier() {
    let tokens = scan_all("#secret: string");
    assert_eq!(tokens[0], (SyntaxKind::PrivateIdentifier, "#secret".to_string()));
}

#[test]
fn test_shebang_is_skipped() {
    let mut scanner = ScannerState::new("#!/usr/bin/env node\nexport".to_string());
    scanner.scan_shebang_trivia();
    assert_eq!(scanner.scan(), SyntaxKind::ExportKeyword);
}

#[test]
fn test_interned_token_values_are_shared() {
    let mut scanner = ScannerState::new("options options".to_string());
    scanner.scan();
    let first = scanner.intern_token_value();
    scanner.scan();
    let second = scanner.intern_token_value();
    assert_eq!(first, second);
    assert_eq!(scanner.interner().resolve(first), "options");
}
