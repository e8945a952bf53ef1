//! Scanner state machine.
//!
//! The scanner produces one token per `scan()` call, skipping whitespace and
//! comments as trivia. The parser drives it directly and uses
//! `save_state`/`restore_state` for look-ahead.

use crate::char_codes::{
    is_digit, is_identifier_part, is_identifier_start, is_line_break, is_white_space_single_line,
};
use crate::syntax_kind::{SyntaxKind, keyword_from_text};
use std::sync::Arc;
use tsbc_common::diagnostics::diagnostic_codes;
use tsbc_common::interner::{Atom, Interner};

pub mod token_flags {
    pub const NONE: u32 = 0;
    pub const PRECEDING_LINE_BREAK: u32 = 1 << 0;
    pub const UNTERMINATED: u32 = 1 << 1;
    pub const PRECEDING_JSDOC_COMMENT: u32 = 1 << 2;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerDiagnostic {
    pub pos: usize,
    pub length: usize,
    pub message: &'static str,
    pub code: u32,
}

/// Everything needed to rewind the scanner to an earlier token.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: u32,
    diagnostics_len: usize,
}

pub struct ScannerState {
    source: Arc<str>,
    pos: usize,
    end: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    /// Identifier text, unescaped string literal value, or raw numeric text.
    token_value: String,
    token_flags: u32,
    interner: Interner,
    diagnostics: Vec<ScannerDiagnostic>,
}

impl ScannerState {
    pub fn new(text: String) -> Self {
        let source: Arc<str> = Arc::from(text.into_boxed_str());
        let end = source.len();
        let mut interner = Interner::new();
        interner.intern_common();
        ScannerState {
            source,
            pos: 0,
            end,
            full_start: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: token_flags::NONE,
            interner,
            diagnostics: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    /// Start of the token, after leading trivia.
    #[inline]
    pub fn get_token_start(&self) -> u32 {
        self.token_start as u32
    }

    /// Start of the token's leading trivia.
    #[inline]
    pub fn get_token_full_start(&self) -> u32 {
        self.full_start as u32
    }

    #[inline]
    pub fn get_token_end(&self) -> u32 {
        self.pos as u32
    }

    #[inline]
    pub fn get_token_value_ref(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    #[inline]
    pub fn get_token_text(&self) -> &str {
        self.source.get(self.token_start..self.pos).unwrap_or("")
    }

    #[inline]
    pub fn get_token_flags(&self) -> u32 {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags & token_flags::PRECEDING_LINE_BREAK != 0
    }

    #[inline]
    pub fn is_unterminated(&self) -> bool {
        self.token_flags & token_flags::UNTERMINATED != 0
    }

    pub fn source_text(&self) -> &str {
        &self.source
    }

    pub fn source_text_arc(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Intern the current token value (identifier text or literal value).
    pub fn intern_token_value(&mut self) -> Atom {
        self.interner.intern(&self.token_value)
    }

    pub fn take_interner(&mut self) -> Interner {
        std::mem::take(&mut self.interner)
    }

    pub fn get_scanner_diagnostics(&self) -> &[ScannerDiagnostic] {
        &self.diagnostics
    }

    // =========================================================================
    // Look-ahead support
    // =========================================================================

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            full_start: self.full_start,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            diagnostics_len: self.diagnostics.len(),
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.full_start = snapshot.full_start;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
        self.diagnostics.truncate(snapshot.diagnostics_len);
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.source.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.source.get(offset..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(offset).copied()
    }

    fn error(&mut self, pos: usize, length: usize, message: &'static str, code: u32) {
        self.diagnostics.push(ScannerDiagnostic {
            pos,
            length,
            message,
            code,
        });
    }

    /// Skip a `#!` line at the very start of the file.
    pub fn scan_shebang_trivia(&mut self) {
        if self.pos == 0 && self.source.starts_with("#!") {
            let bytes = self.source.as_bytes();
            self.pos = memchr::memchr(b'\n', bytes).unwrap_or(self.end);
        }
    }

    /// Advance to the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        self.token_flags = token_flags::NONE;
        self.token_value.clear();

        loop {
            self.token_start = self.pos;
            let Some(ch) = self.peek_char() else {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            };

            if is_line_break(ch) {
                self.token_flags |= token_flags::PRECEDING_LINE_BREAK;
                self.pos += ch.len_utf8();
                continue;
            }
            if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
                continue;
            }

            if ch == '/' {
                match self.byte_at(self.pos + 1) {
                    Some(b'/') => {
                        self.skip_single_line_comment();
                        continue;
                    }
                    Some(b'*') => {
                        self.skip_multi_line_comment();
                        continue;
                    }
                    _ => {}
                }
            }

            self.token = self.scan_token(ch);
            return self.token;
        }
    }

    fn skip_single_line_comment(&mut self) {
        let bytes = &self.source.as_bytes()[self.pos..];
        self.pos = match memchr::memchr2(b'\n', b'\r', bytes) {
            Some(offset) => self.pos + offset,
            None => self.end,
        };
    }

    fn skip_multi_line_comment(&mut self) {
        let start = self.pos;
        if self.byte_at(start + 2) == Some(b'*') && self.byte_at(start + 3) != Some(b'/') {
            self.token_flags |= token_flags::PRECEDING_JSDOC_COMMENT;
        }
        let body = &self.source.as_bytes()[start + 2..];
        match memchr::memmem::find(body, b"*/") {
            Some(offset) => {
                let comment_end = start + 2 + offset + 2;
                if memchr::memchr2(b'\n', b'\r', &self.source.as_bytes()[start..comment_end])
                    .is_some()
                {
                    self.token_flags |= token_flags::PRECEDING_LINE_BREAK;
                }
                self.pos = comment_end;
            }
            None => {
                self.pos = self.end;
                self.error(
                    start,
                    2,
                    "'*/' expected.",
                    diagnostic_codes::UNTERMINATED_COMMENT,
                );
            }
        }
    }

    fn scan_token(&mut self, ch: char) -> SyntaxKind {
        let start = self.pos;
        match ch {
            '"' | '\'' => self.scan_string(ch),
            '`' => self.scan_template(),
            '{' => self.single(SyntaxKind::OpenBraceToken),
            '}' => self.single(SyntaxKind::CloseBraceToken),
            '(' => self.single(SyntaxKind::OpenParenToken),
            ')' => self.single(SyntaxKind::CloseParenToken),
            '[' => self.single(SyntaxKind::OpenBracketToken),
            ']' => self.single(SyntaxKind::CloseBracketToken),
            ';' => self.single(SyntaxKind::SemicolonToken),
            ',' => self.single(SyntaxKind::CommaToken),
            ':' => self.single(SyntaxKind::ColonToken),
            '<' => self.single(SyntaxKind::LessThanToken),
            // `>` is never merged into `>>` or `>=`: types close nested
            // type-argument lists one bracket at a time.
            '>' => self.single(SyntaxKind::GreaterThanToken),
            '+' => self.single(SyntaxKind::PlusToken),
            '-' => self.single(SyntaxKind::MinusToken),
            '*' => self.single(SyntaxKind::AsteriskToken),
            '/' => self.single(SyntaxKind::SlashToken),
            '&' => self.single(SyntaxKind::AmpersandToken),
            '|' => self.single(SyntaxKind::BarToken),
            '!' => self.single(SyntaxKind::ExclamationToken),
            '@' => self.single(SyntaxKind::AtToken),
            '%' | '^' | '~' => self.single(SyntaxKind::OtherPunctuation),
            '=' => {
                if self.byte_at(start + 1) == Some(b'>') {
                    self.pos += 2;
                    SyntaxKind::EqualsGreaterThanToken
                } else {
                    self.single(SyntaxKind::EqualsToken)
                }
            }
            '?' => {
                let next = self.byte_at(start + 1);
                let after = self.byte_at(start + 2);
                if next == Some(b'.') && !after.is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 2;
                    SyntaxKind::QuestionDotToken
                } else {
                    self.single(SyntaxKind::QuestionToken)
                }
            }
            '.' => {
                if self.byte_at(start + 1).is_some_and(|b| b.is_ascii_digit()) {
                    self.scan_number()
                } else if self.byte_at(start + 1) == Some(b'.') && self.byte_at(start + 2) == Some(b'.')
                {
                    self.pos += 3;
                    SyntaxKind::DotDotDotToken
                } else {
                    self.single(SyntaxKind::DotToken)
                }
            }
            '#' => {
                if self.char_at(start + 1).is_some_and(is_identifier_start) {
                    self.pos += 1;
                    self.scan_identifier_rest();
                    self.token_value = self.source[start..self.pos].to_string();
                    SyntaxKind::PrivateIdentifier
                } else {
                    self.invalid_character(ch)
                }
            }
            c if is_digit(c) => self.scan_number(),
            c if is_identifier_start(c) => {
                self.scan_identifier_rest();
                let text = &self.source[start..self.pos];
                self.token_value.push_str(text);
                keyword_from_text(text).unwrap_or(SyntaxKind::Identifier)
            }
            '\\' => {
                // Unicode escapes in identifiers do not occur in generated surfaces.
                self.invalid_character(ch)
            }
            _ => self.invalid_character(ch),
        }
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    fn invalid_character(&mut self, ch: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += ch.len_utf8();
        self.error(
            start,
            ch.len_utf8(),
            "Invalid character.",
            diagnostic_codes::INVALID_CHARACTER,
        );
        SyntaxKind::Unknown
    }

    fn scan_identifier_rest(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let bytes = self.source.as_bytes();
        let radix_prefix = bytes.get(start) == Some(&b'0')
            && matches!(
                bytes.get(start + 1),
                Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
            );

        if radix_prefix {
            self.pos += 2;
            while self
                .byte_at(self.pos)
                .is_some_and(|b| b.is_ascii_hexdigit() || b == b'_')
            {
                self.pos += 1;
            }
        } else {
            self.skip_digits();
            if self.byte_at(self.pos) == Some(b'.') {
                self.pos += 1;
                self.skip_digits();
            }
            if matches!(self.byte_at(self.pos), Some(b'e' | b'E')) {
                let mut look = self.pos + 1;
                if matches!(self.byte_at(look), Some(b'+' | b'-')) {
                    look += 1;
                }
                if self.byte_at(look).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos = look;
                    self.skip_digits();
                }
            }
        }

        let kind = if self.byte_at(self.pos) == Some(b'n') {
            self.pos += 1;
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        };
        self.token_value.push_str(&self.source[start..self.pos]);
        kind
    }

    fn skip_digits(&mut self) {
        while self
            .byte_at(self.pos)
            .is_some_and(|b| b.is_ascii_digit() || b == b'_')
        {
            self.pos += 1;
        }
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(ch) = self.peek_char() else {
                self.unterminated_string(start);
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\n' || ch == '\r' {
                self.unterminated_string(start);
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                self.scan_escape(&mut value);
                continue;
            }
            value.push(ch);
            self.pos += ch.len_utf8();
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    fn unterminated_string(&mut self, start: usize) {
        self.token_flags |= token_flags::UNTERMINATED;
        self.error(
            start,
            self.pos - start,
            "Unterminated string literal.",
            diagnostic_codes::UNTERMINATED_STRING_LITERAL,
        );
    }

    fn scan_escape(&mut self, value: &mut String) {
        let Some(ch) = self.peek_char() else {
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{0008}'),
            'f' => value.push('\u{000C}'),
            'v' => value.push('\u{000B}'),
            '0' => value.push('\0'),
            'x' => {
                if let Some(decoded) = self.scan_hex_digits(2) {
                    value.push(decoded);
                }
            }
            'u' => {
                if self.byte_at(self.pos) == Some(b'{') {
                    let close = self.source[self.pos..].find('}');
                    if let Some(close) = close {
                        let digits = &self.source[self.pos + 1..self.pos + close];
                        if let Some(decoded) =
                            u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
                        {
                            value.push(decoded);
                        }
                        self.pos += close + 1;
                    }
                } else if let Some(decoded) = self.scan_hex_digits(4) {
                    value.push(decoded);
                }
            }
            // Line continuation
            '\r' => {
                if self.byte_at(self.pos) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => value.push(other),
        }
    }

    fn scan_hex_digits(&mut self, count: usize) -> Option<char> {
        let digits = self.source.get(self.pos..self.pos + count)?;
        let decoded = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)?;
        self.pos += count;
        Some(decoded)
    }

    /// Scan a whole template literal, including any `${ ... }` spans, as one token.
    fn scan_template(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        // Each entry is the brace depth inside one `${` substitution.
        let mut substitutions: Vec<u32> = Vec::new();
        loop {
            let Some(ch) = self.peek_char() else {
                self.token_flags |= token_flags::UNTERMINATED;
                self.error(
                    start,
                    self.pos - start,
                    "Unterminated template literal.",
                    diagnostic_codes::UNTERMINATED_TEMPLATE_LITERAL,
                );
                break;
            };
            self.pos += ch.len_utf8();
            match (ch, substitutions.last_mut()) {
                ('\\', _) => {
                    if let Some(next) = self.peek_char() {
                        self.pos += next.len_utf8();
                    }
                }
                ('`', None) => break,
                ('$', None) if self.byte_at(self.pos) == Some(b'{') => {
                    self.pos += 1;
                    substitutions.push(0);
                }
                ('{', Some(depth)) => *depth += 1,
                ('}', Some(depth)) => {
                    if *depth == 0 {
                        substitutions.pop();
                    } else {
                        *depth -= 1;
                    }
                }
                ('`', Some(_)) => {
                    // Nested template inside a substitution: skip to its end.
                    self.skip_nested_template();
                }
                ('"' | '\'', Some(_)) => {
                    while let Some(inner) = self.peek_char() {
                        self.pos += inner.len_utf8();
                        if inner == '\\' {
                            if let Some(escaped) = self.peek_char() {
                                self.pos += escaped.len_utf8();
                            }
                        } else if inner == ch || inner == '\n' {
                            break;
                        }
                    }
                }
                _ => {}
            }
        }
        self.token_value = self.source[start..self.pos].to_string();
        SyntaxKind::TemplateLiteral
    }

    fn skip_nested_template(&mut self) {
        while let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
            match ch {
                '\\' => {
                    if let Some(next) = self.peek_char() {
                        self.pos += next.len_utf8();
                    }
                }
                '`' => return,
                _ => {}
            }
        }
    }
}
