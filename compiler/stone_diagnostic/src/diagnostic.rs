//! Diagnostic values.
//!
//! A [`Diagnostic`] is what a call site builds: catalog id, location,
//! arguments, highlights, fix-its and an optional level cap. The engine
//! turns it into a [`DiagnosticMessage`] (effective level plus rendered
//! text) when it is dispatched to consumers.

use crate::argument::DiagnosticArguments;
use crate::{DiagId, DiagOptions, DiagnosticArgument, DiagnosticLevel};
use smallvec::SmallVec;
use std::fmt;
use stone_ast::Span;

/// A source edit attached to a diagnostic.
///
/// Insertions are replacements of an empty range.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FixIt {
    pub range: Span,
    pub text: String,
}

impl FixIt {
    pub fn new(range: Span, text: impl Into<String>) -> Self {
        FixIt {
            range,
            text: text.into(),
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty() && !self.text.is_empty()
    }

    pub fn is_removal(&self) -> bool {
        !self.range.is_empty() && self.text.is_empty()
    }
}

impl fmt::Display for FixIt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_insertion() {
            write!(f, "insert {:?} at {}", self.text, self.range.start)
        } else if self.is_removal() {
            write!(f, "remove {}", self.range)
        } else {
            write!(f, "replace {} with {:?}", self.range, self.text)
        }
    }
}

/// A diagnostic as built at the call site.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    id: DiagId,
    loc: Span,
    args: DiagnosticArguments,
    highlights: SmallVec<[Span; 2]>,
    fix_its: Vec<FixIt>,
    level_cap: Option<DiagnosticLevel>,
}

impl Diagnostic {
    pub(crate) fn new(id: DiagId, loc: Span, args: DiagnosticArguments) -> Self {
        Diagnostic {
            id,
            loc,
            args,
            highlights: SmallVec::new(),
            fix_its: Vec::new(),
            level_cap: None,
        }
    }

    #[inline]
    pub fn id(&self) -> DiagId {
        self.id
    }

    #[inline]
    pub fn loc(&self) -> Span {
        self.loc
    }

    pub fn args(&self) -> &[DiagnosticArgument] {
        &self.args
    }

    pub fn highlights(&self) -> &[Span] {
        &self.highlights
    }

    pub fn fix_its(&self) -> &[FixIt] {
        &self.fix_its
    }

    /// Upper bound on the declared level, if one was set.
    pub fn level_cap(&self) -> Option<DiagnosticLevel> {
        self.level_cap
    }

    pub(crate) fn add_highlight(&mut self, range: Span) {
        self.highlights.push(range);
    }

    pub(crate) fn add_fix_it(&mut self, fix: FixIt) {
        self.fix_its.push(fix);
    }

    pub(crate) fn set_level_cap(&mut self, cap: DiagnosticLevel) {
        self.level_cap = Some(cap);
    }
}

/// A dispatched diagnostic, as consumers see it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiagnosticMessage {
    pub id: DiagId,
    /// Effective level after escalation.
    pub level: DiagnosticLevel,
    pub loc: Span,
    /// Catalog format with arguments substituted.
    pub text: String,
    pub highlights: Vec<Span>,
    pub fix_its: Vec<FixIt>,
}

impl DiagnosticMessage {
    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn points_to_first_bad_token(&self) -> bool {
        self.id
            .info()
            .options
            .contains(DiagOptions::POINTS_TO_FIRST_BAD_TOKEN)
    }

    /// Location to report against `source`.
    ///
    /// For diagnostics flagged `POINTS_TO_FIRST_BAD_TOKEN` whose token
    /// starts a line, this is the point just past the previous token, so
    /// "expected ')'" lands where the `)` was missing rather than on the
    /// next line.
    pub fn report_loc(&self, source: &str) -> Span {
        if !self.points_to_first_bad_token() {
            return self.loc;
        }
        let start = (self.loc.start as usize).min(source.len());
        let Some(before) = source.get(..start) else {
            return self.loc;
        };
        let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
        if !before[line_start..].trim().is_empty() {
            return self.loc;
        }
        let prev_end = before.trim_end().len();
        if prev_end == 0 {
            return self.loc;
        }
        u32::try_from(prev_end).map_or(self.loc, Span::point)
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.text)
    }
}
