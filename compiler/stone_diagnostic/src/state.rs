//! Leveling policy and sticky error state.

use crate::{DiagId, Diagnostic, DiagnosticLevel, DiagnosticOptions};

const IGNORE_WORDS: usize = DiagId::COUNT.div_ceil(64);

/// Per-engine configuration plus what has happened so far.
#[derive(Clone, Debug)]
pub struct DiagnosticState {
    suppress_warnings: bool,
    warnings_as_errors: bool,
    errors_as_fatal: bool,
    fatals_as_errors: bool,
    show_diagnostics_after_fatal: bool,
    ignored: [u64; IGNORE_WORDS],
    pub(crate) any_error_occurred: bool,
    pub(crate) fatal_error_occurred: bool,
    prev_level: Option<DiagnosticLevel>,
}

impl DiagnosticState {
    pub fn new(options: &DiagnosticOptions) -> Self {
        let mut state = DiagnosticState {
            suppress_warnings: options.suppress_warnings,
            warnings_as_errors: options.warnings_as_errors,
            errors_as_fatal: options.errors_as_fatal,
            fatals_as_errors: options.fatals_as_errors,
            show_diagnostics_after_fatal: options.show_diagnostics_after_fatal,
            ignored: [0; IGNORE_WORDS],
            any_error_occurred: false,
            fatal_error_occurred: false,
            prev_level: None,
        };
        for &id in &options.ignored {
            state.set_ignored(id, true);
        }
        state
    }

    pub fn suppress_warnings(&self) -> bool {
        self.suppress_warnings
    }

    pub fn set_suppress_warnings(&mut self, value: bool) {
        self.suppress_warnings = value;
    }

    pub fn warnings_as_errors(&self) -> bool {
        self.warnings_as_errors
    }

    pub fn set_warnings_as_errors(&mut self, value: bool) {
        self.warnings_as_errors = value;
    }

    pub fn errors_as_fatal(&self) -> bool {
        self.errors_as_fatal
    }

    pub fn set_errors_as_fatal(&mut self, value: bool) {
        self.errors_as_fatal = value;
    }

    pub fn fatals_as_errors(&self) -> bool {
        self.fatals_as_errors
    }

    pub fn set_fatals_as_errors(&mut self, value: bool) {
        self.fatals_as_errors = value;
    }

    pub fn show_diagnostics_after_fatal(&self) -> bool {
        self.show_diagnostics_after_fatal
    }

    pub fn set_show_diagnostics_after_fatal(&mut self, value: bool) {
        self.show_diagnostics_after_fatal = value;
    }

    pub fn set_ignored(&mut self, id: DiagId, ignored: bool) {
        let (word, bit) = (id.index() / 64, id.index() % 64);
        if ignored {
            self.ignored[word] |= 1u64 << bit;
        } else {
            self.ignored[word] &= !(1u64 << bit);
        }
    }

    pub fn is_ignored(&self, id: DiagId) -> bool {
        self.ignored[id.index() / 64] & (1u64 << (id.index() % 64)) != 0
    }

    /// Level of the most recently leveled diagnostic.
    pub fn prev_level(&self) -> Option<DiagnosticLevel> {
        self.prev_level
    }

    /// Compute the effective level of `diag` and remember it.
    ///
    /// Precedence: an ignored id wins, then warning suppression and
    /// promotion, then error/fatal swaps, then the declared level (capped).
    /// A note attached to an ignored diagnostic is ignored with it.
    pub fn determine_level(&mut self, diag: &Diagnostic) -> DiagnosticLevel {
        let declared = diag.id().info().base_level();
        let base = diag.level_cap().map_or(declared, |cap| declared.min(cap));

        let level = if self.is_ignored(diag.id()) {
            DiagnosticLevel::Ignore
        } else if base == DiagnosticLevel::Note && self.prev_level == Some(DiagnosticLevel::Ignore) {
            DiagnosticLevel::Ignore
        } else {
            match base {
                DiagnosticLevel::Warning if self.suppress_warnings => DiagnosticLevel::Ignore,
                DiagnosticLevel::Warning if self.warnings_as_errors => DiagnosticLevel::Error,
                DiagnosticLevel::Error if self.errors_as_fatal => DiagnosticLevel::Fatal,
                DiagnosticLevel::Fatal if self.fatals_as_errors => DiagnosticLevel::Error,
                other => other,
            }
        };

        self.prev_level = Some(level);
        level
    }

    /// Record that a diagnostic at `level` was dispatched.
    pub(crate) fn record_dispatch(&mut self, level: DiagnosticLevel) {
        if level.is_error() {
            self.any_error_occurred = true;
        }
        if level == DiagnosticLevel::Fatal {
            self.fatal_error_occurred = true;
        }
    }

    /// True when dispatch is currently cut off by an earlier fatal error.
    pub(crate) fn suppressed_by_fatal(&self) -> bool {
        self.fatal_error_occurred && !self.show_diagnostics_after_fatal
    }

    /// Forget earlier errors, fatal included.
    pub fn reset_had_any_error(&mut self) {
        self.any_error_occurred = false;
        self.fatal_error_occurred = false;
    }
}

impl Default for DiagnosticState {
    fn default() -> Self {
        Self::new(&DiagnosticOptions::default())
    }
}
