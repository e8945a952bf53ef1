//! Parser state: token plumbing, error reporting and the statement loop.
//!
//! Declaration parsing lives in `state_declarations`, class members in
//! `state_class_members` and type expressions in `state_types`.

use super::base::{NodeIndex, NodeList};
use super::node::{NodeArena, SourceFileData};
use super::syntax_kind_ext;
use tsbc_common::diagnostics::{Diagnostic, diagnostic_codes, format_message};
use tsbc_scanner::{ScannerState, SyntaxKind};

/// Disallow conditional types while parsing the `extends` side of one.
pub const CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES: u32 = 1 << 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: String,
    pub code: u32,
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) current_token: SyntaxKind,
    /// End of the previously consumed token; node ends are taken from here.
    pub(crate) prev_token_end: u32,
    pub(crate) context_flags: u32,
    pub(crate) parse_diagnostics: Vec<ParseDiagnostic>,
    /// Current type nesting depth.
    pub(crate) type_depth: u32,
    last_error_pos: Option<u32>,
}

impl ParserState {
    pub fn new(file_name: String, source: String) -> ParserState {
        let arena = NodeArena::with_source_len(source.len());
        let mut scanner = ScannerState::new(source);
        scanner.scan_shebang_trivia();
        ParserState {
            scanner,
            arena,
            file_name,
            current_token: SyntaxKind::Unknown,
            prev_token_end: 0,
            context_flags: 0,
            parse_diagnostics: Vec::new(),
            type_depth: 0,
            last_error_pos: None,
        }
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn get_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.parse_diagnostics
    }

    /// Consume the parser, returning the arena and every syntax diagnostic
    /// (scanner and parser) ordered by position.
    pub fn into_parts(mut self) -> (NodeArena, Vec<Diagnostic>) {
        let mut diagnostics: Vec<Diagnostic> = self
            .scanner
            .get_scanner_diagnostics()
            .iter()
            .map(|d| {
                Diagnostic::error(
                    self.file_name.clone(),
                    d.pos as u32,
                    d.length as u32,
                    d.message,
                    d.code,
                )
            })
            .collect();
        diagnostics.extend(self.parse_diagnostics.drain(..).map(|d| {
            Diagnostic::error(self.file_name.clone(), d.start, d.length, d.message, d.code)
        }));
        diagnostics.sort_by_key(|d| d.start);

        self.arena.set_source_text(self.scanner.source_text_arc());
        self.arena.set_interner(self.scanner.take_interner());
        (self.arena, diagnostics)
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    #[inline]
    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        self.current_token.is_identifier_or_keyword()
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.get_token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.get_token_end()
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.get_token_end();
        self.current_token = self.scanner.scan();
        self.current_token
    }

    /// Consume `kind` if it is the current token.
    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report "'x' expected." at the current token.
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            return true;
        }
        let message = format_message("'{0}' expected.", &[kind.text()]);
        self.error_at_current_token(&message, diagnostic_codes::TOKEN_EXPECTED);
        false
    }

    /// Run `f` speculatively and rewind the scanner afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let current = self.current_token;
        let prev_end = self.prev_token_end;
        let diagnostics_len = self.parse_diagnostics.len();
        let result = f(self);
        self.scanner.restore_state(snapshot);
        self.current_token = current;
        self.prev_token_end = prev_end;
        self.parse_diagnostics.truncate(diagnostics_len);
        result
    }

    /// Kind of the token after the current one.
    pub(crate) fn peek_token(&mut self) -> SyntaxKind {
        self.look_ahead(|p| p.next_token())
    }

    /// Semicolons are optional before `}`, at EOF and after a line break.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        self.is_token(SyntaxKind::SemicolonToken)
            || self.is_token(SyntaxKind::CloseBraceToken)
            || self.is_token(SyntaxKind::EndOfFileToken)
            || self.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) {
        if !self.parse_optional(SyntaxKind::SemicolonToken) && !self.can_parse_semicolon() {
            self.parse_expected(SyntaxKind::SemicolonToken);
        }
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub(crate) fn parse_error_at(&mut self, start: u32, length: u32, message: &str, code: u32) {
        // One error per position keeps recovery from cascading.
        if self.last_error_pos == Some(start) {
            return;
        }
        self.last_error_pos = Some(start);
        self.parse_diagnostics.push(ParseDiagnostic {
            start,
            length,
            message: message.to_string(),
            code,
        });
    }

    pub(crate) fn error_at_current_token(&mut self, message: &str, code: u32) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.parse_error_at(start, length, message, code);
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Parse an identifier. Contextual keywords are accepted as identifiers.
    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if self.is_identifier_or_keyword() {
            return self.parse_identifier_name();
        }
        self.error_at_current_token("Identifier expected.", diagnostic_codes::IDENTIFIER_EXPECTED);
        let pos = self.token_pos();
        let node = self.arena.add_identifier(
            SyntaxKind::Identifier as u16,
            pos,
            pos,
            super::node::IdentifierData {
                atom: tsbc_common::Atom::NONE,
                escaped_text: String::new(),
            },
        );
        self.arena.set_flags(node, super::node::node_flags::RECOVERED);
        node
    }

    /// Parse any identifier or keyword token as an identifier node.
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let end = self.token_end();
        let atom = self.scanner.intern_token_value();
        let escaped_text = self.scanner.get_token_value_ref().to_string();
        self.next_token();
        self.arena.add_identifier(
            SyntaxKind::Identifier as u16,
            pos,
            end,
            super::node::IdentifierData { atom, escaped_text },
        )
    }

    /// Identifier or dotted name (`a.b.C`).
    pub(crate) fn parse_entity_name(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut entity = self.parse_identifier();
        while self.is_token(SyntaxKind::DotToken) {
            self.next_token();
            let right = self.parse_identifier_name_or_recover();
            entity = self.arena.add_qualified_name(
                syntax_kind_ext::QUALIFIED_NAME,
                start,
                self.prev_token_end,
                super::node::QualifiedNameData {
                    left: entity,
                    right,
                },
            );
        }
        entity
    }

    fn parse_identifier_name_or_recover(&mut self) -> NodeIndex {
        if self.is_identifier_or_keyword() {
            self.parse_identifier_name()
        } else {
            self.parse_identifier()
        }
    }

    /// Parse a string or numeric literal token into a literal node.
    pub(crate) fn parse_literal_node(&mut self) -> NodeIndex {
        let kind = self.token();
        let pos = self.token_pos();
        let end = self.token_end();
        let text = match kind {
            SyntaxKind::StringLiteral => self.scanner.get_token_value_ref().to_string(),
            _ => self.scanner.get_token_text().to_string(),
        };
        self.next_token();
        self.arena
            .add_literal(kind as u16, pos, end, super::node::LiteralData { text })
    }

    // =========================================================================
    // Skipping
    // =========================================================================

    /// Skip a balanced `{...}`, `(...)` or `[...]` group starting at the
    /// current open token. Returns false when EOF came first.
    pub(crate) fn skip_balanced(&mut self) -> bool {
        let mut stack: Vec<SyntaxKind> = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::OpenBraceToken => stack.push(SyntaxKind::CloseBraceToken),
                SyntaxKind::OpenParenToken => stack.push(SyntaxKind::CloseParenToken),
                SyntaxKind::OpenBracketToken => stack.push(SyntaxKind::CloseBracketToken),
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => {
                    // Mismatched closers are tolerated inside skipped bodies.
                    if stack.last() == Some(&self.token()) {
                        stack.pop();
                    }
                }
                SyntaxKind::EndOfFileToken => return false,
                _ => {}
            }
            self.next_token();
            if stack.is_empty() {
                return true;
            }
        }
    }

    /// Skip a `{ ... }` body and record it as a BLOCK node.
    pub(crate) fn parse_skipped_block(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if !self.skip_balanced() {
            self.parse_error_at(
                start,
                1,
                &format_message("'{0}' expected.", &["}"]),
                diagnostic_codes::TOKEN_EXPECTED,
            );
        }
        self.arena
            .add_token(syntax_kind_ext::BLOCK, start, self.prev_token_end)
    }

    /// Skip an initializer expression up to one of `terminators` at nesting
    /// depth zero. Returns a SKIPPED_EXPRESSION node covering it.
    pub(crate) fn parse_skipped_expression(&mut self, terminators: &[SyntaxKind]) -> NodeIndex {
        let start = self.token_pos();
        let mut last: Option<SyntaxKind> = None;
        loop {
            let token = self.token();
            if token == SyntaxKind::EndOfFileToken || terminators.contains(&token) {
                break;
            }
            // Without a semicolon, a complete expression followed by a name on
            // the next line ends the initializer.
            if last.is_some_and(Self::can_end_expression)
                && self.has_preceding_line_break()
                && self.can_start_member_or_statement()
            {
                break;
            }
            match token {
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => {
                    self.skip_balanced();
                    last = Some(match token {
                        SyntaxKind::OpenBraceToken => SyntaxKind::CloseBraceToken,
                        SyntaxKind::OpenParenToken => SyntaxKind::CloseParenToken,
                        _ => SyntaxKind::CloseBracketToken,
                    });
                }
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => break,
                _ => {
                    self.next_token();
                    last = Some(token);
                }
            }
        }
        if last.is_none() {
            self.error_at_current_token(
                "Expression expected.",
                diagnostic_codes::UNEXPECTED_TOKEN,
            );
        }
        self.arena
            .add_token(syntax_kind_ext::SKIPPED_EXPRESSION, start, self.prev_token_end)
    }

    fn can_end_expression(kind: SyntaxKind) -> bool {
        kind.is_identifier_or_keyword()
            || kind.is_literal()
            || matches!(
                kind,
                SyntaxKind::CloseBraceToken
                    | SyntaxKind::CloseParenToken
                    | SyntaxKind::CloseBracketToken
            )
    }

    fn can_start_member_or_statement(&self) -> bool {
        self.is_identifier_or_keyword()
            || matches!(
                self.token(),
                SyntaxKind::PrivateIdentifier
                    | SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::AtToken
                    | SyntaxKind::AsteriskToken
            )
    }

    /// Skip tokens through the end of the current statement.
    pub(crate) fn skip_statement(&mut self) {
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                    return;
                }
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => {
                    self.skip_balanced();
                }
                _ => {
                    self.next_token();
                }
            }
            if self.has_preceding_line_break() && self.is_statement_start() {
                return;
            }
        }
    }

    // =========================================================================
    // Source file and statements
    // =========================================================================

    /// Parse the whole source text and return the SOURCE_FILE node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        self.next_token();
        let start = self.token_pos();
        let mut statements = Vec::new();

        while !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_pos();
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            if self.token_pos() == before && !self.is_token(SyntaxKind::EndOfFileToken) {
                // No progress: report and drop the token.
                self.error_at_current_token(
                    "Declaration or statement expected.",
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                self.next_token();
            }
        }

        let end = self.token_end();
        tracing::debug!(
            file = %self.file_name,
            statements = statements.len(),
            diagnostics = self.parse_diagnostics.len(),
            "parsed source file"
        );
        let list = NodeList::with_nodes(statements, start, end);
        self.arena.add_source_file(
            syntax_kind_ext::SOURCE_FILE,
            0,
            end,
            SourceFileData {
                file_name: self.file_name.clone(),
                statements: list,
            },
        )
    }

    pub(crate) fn is_statement_start(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::ExportKeyword
                | SyntaxKind::ImportKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::InterfaceKeyword
                | SyntaxKind::ClassKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::TypeKeyword
                | SyntaxKind::EnumKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::LetKeyword
                | SyntaxKind::VarKeyword
                | SyntaxKind::NamespaceKeyword
                | SyntaxKind::ModuleKeyword
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::SemicolonToken
        )
    }

    /// Parse one top-level statement. Statements that carry no declaration
    /// (`;`) return `None`.
    pub(crate) fn parse_statement(&mut self) -> Option<NodeIndex> {
        match self.token() {
            SyntaxKind::SemicolonToken => {
                self.next_token();
                None
            }
            SyntaxKind::ImportKeyword => Some(self.parse_import_declaration()),
            SyntaxKind::ExportKeyword if self.is_export_only_statement() => {
                Some(self.parse_export_statement())
            }
            _ => self.parse_declaration_statement(),
        }
    }

    /// `export =`, `export {..}`, `export * from`, `export default <expr>;`,
    /// `export as namespace X;` and `export type {..}`.
    fn is_export_only_statement(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            match p.token() {
                SyntaxKind::EqualsToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::AsteriskToken
                | SyntaxKind::AsKeyword => true,
                SyntaxKind::TypeKeyword => {
                    p.next_token();
                    matches!(p.token(), SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken)
                }
                SyntaxKind::DefaultKeyword => {
                    p.next_token();
                    !matches!(
                        p.token(),
                        SyntaxKind::ClassKeyword
                            | SyntaxKind::FunctionKeyword
                            | SyntaxKind::InterfaceKeyword
                            | SyntaxKind::AbstractKeyword
                            | SyntaxKind::AsyncKeyword
                            | SyntaxKind::EnumKeyword
                    )
                }
                _ => false,
            }
        })
    }

    fn parse_import_declaration(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.skip_statement();
        self.arena
            .add_token(syntax_kind_ext::IMPORT_DECLARATION, start, self.prev_token_end)
    }

    fn parse_export_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let kind = self.look_ahead(|p| {
            p.next_token();
            if matches!(p.token(), SyntaxKind::EqualsToken | SyntaxKind::DefaultKeyword) {
                syntax_kind_ext::EXPORT_ASSIGNMENT
            } else {
                syntax_kind_ext::EXPORT_DECLARATION
            }
        });
        self.skip_statement();
        self.arena.add_token(kind, start, self.prev_token_end)
    }
}
