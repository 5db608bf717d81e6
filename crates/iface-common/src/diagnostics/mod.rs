//! Diagnostic types and message lookup for the interface-resolution engine.
//!
//! Message data lives in `data.rs`. Validators produce lazily-formatted
//! pending diagnostics; the rendered form defined here is what reaches
//! consumers.

use serde::Serialize;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// Related information for a diagnostic (e.g., the member that came closest
/// to implementing an interface slot).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRelatedInformation {
    /// Declaration the information points at, in `Type.Member` form.
    pub location: String,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A rendered diagnostic with optional related information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Declaration the diagnostic is reported on, in `Type` or `Type.Member` form.
    pub location: String,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(location: String, message: String, code: u32) -> Self {
        Self {
            location,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, location: String, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            location,
            message_text: message,
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }

    pub const fn is_error(&self) -> bool {
        matches!(self.category, DiagnosticCategory::Error)
    }
}

/// Fill `{0}`, `{1}`, ... in `template` from `args` in one pass, so text
/// substituted for one placeholder is never rescanned. Placeholders without a
/// matching argument are left as written.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let arg = (digits > 0 && after[digits..].starts_with('}'))
            .then(|| after[..digits].parse::<usize>().ok())
            .flatten()
            .and_then(|index| args.get(index));
        match arg {
            Some(arg) => {
                result.push_str(arg);
                rest = &after[digits + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

/// One row of the message table.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|entry| entry.code == code)
}

/// The `{n}`-placeholder template for `code`; fill it with [`format_message`].
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|entry| entry.message)
}

#[must_use]
pub fn get_diagnostic_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|entry| entry.category)
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
