//! Diagnostic severity levels.

use std::fmt;

/// Effective severity of a diagnostic, ordered from least to most severe.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum DiagnosticLevel {
    /// Filtered out; never reaches a consumer.
    #[default]
    Ignore,
    Note,
    Remark,
    Warning,
    Error,
    /// An error after which compilation cannot meaningfully continue.
    Fatal,
}

impl DiagnosticLevel {
    /// True for `Error` and `Fatal`.
    #[inline]
    pub fn is_error(self) -> bool {
        self >= DiagnosticLevel::Error
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DiagnosticLevel::Ignore => "ignored",
            DiagnosticLevel::Note => "note",
            DiagnosticLevel::Remark => "remark",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Fatal => "fatal error",
        }
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
