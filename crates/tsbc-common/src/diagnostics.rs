use serde::Serialize;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

/// Codes for the syntax errors the parser reports. The values follow the
/// numbering `tsc` uses for the same messages so reports stay familiar.
pub mod diagnostic_codes {
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const TOKEN_EXPECTED: u32 = 1005;
    pub const UNTERMINATED_COMMENT: u32 = 1010;
    pub const UNEXPECTED_TOKEN: u32 = 1012;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1128;
    pub const PROPERTY_OR_SIGNATURE_EXPECTED: u32 = 1131;
    pub const TYPE_EXPECTED: u32 = 1110;
    pub const UNTERMINATED_TEMPLATE_LITERAL: u32 = 1160;
    pub const INVALID_CHARACTER: u32 = 1127;
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: u32 = 1452;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}): error TS{}: {}",
            self.file, self.start, self.code, self.message_text
        )
    }
}

/// Replace `{0}`, `{1}`, ... placeholders in a message template.
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
