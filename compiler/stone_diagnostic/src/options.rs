//! Diagnostic configuration.

use crate::DiagId;

/// User-facing switches that shape how diagnostics are leveled.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticOptions {
    /// Drop every warning.
    pub suppress_warnings: bool,
    /// Report warnings as errors.
    pub warnings_as_errors: bool,
    /// Report errors as fatal errors.
    pub errors_as_fatal: bool,
    /// Report fatal errors as plain errors.
    pub fatals_as_errors: bool,
    /// Keep dispatching after a fatal error.
    pub show_diagnostics_after_fatal: bool,
    /// Diagnostics that are never reported.
    pub ignored: Vec<DiagId>,
}
