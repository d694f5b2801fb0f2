//! The diagnostic engine.
//!
//! The engine is either idle or building exactly one diagnostic. Building
//! starts with [`DiagnosticEngine::diagnose`], which hands out an
//! [`InFlightDiagnostic`] borrowing the engine; flushing or dropping the
//! builder levels the diagnostic and then either queues it (inside a
//! transaction) or dispatches it to the consumers.
//!
//! The engine never stops a compilation. Callers check
//! [`had_any_error`](DiagnosticEngine::had_any_error) and
//! [`has_fatal_error_occurred`](DiagnosticEngine::has_fatal_error_occurred)
//! at phase boundaries.

use crate::argument::{format_diagnostic_text, DiagArgs};
use crate::consumer::{ConsumerId, DiagnosticConsumer};
use crate::{
    Diag, DiagId, Diagnostic, DiagnosticLevel, DiagnosticMessage, DiagnosticOptions,
    DiagnosticState, FixIt,
};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;
use stone_ast::{IdentifierLookup, SharedIdentifierTable, Span};

pub(crate) type Consumers = Vec<(ConsumerId, Box<dyn DiagnosticConsumer>)>;

/// A diagnostic held back by an open transaction, with its effective level.
pub(crate) struct PendingDiagnostic {
    pub(crate) diagnostic: Diagnostic,
    pub(crate) level: DiagnosticLevel,
}

/// Proof of an open transaction; must be closed in LIFO order.
#[must_use = "a transaction must be committed or aborted"]
#[derive(Debug)]
pub struct TransactionToken {
    depth: usize,
    mark: usize,
}

impl TransactionToken {
    /// Pending-queue length when the transaction was opened.
    pub(crate) fn mark(&self) -> usize {
        self.mark
    }
}

/// Collects, levels, buffers and dispatches diagnostics.
pub struct DiagnosticEngine {
    state: DiagnosticState,
    pub(crate) consumers: Consumers,
    next_consumer: u32,
    pending: Vec<PendingDiagnostic>,
    transaction_marks: Vec<usize>,
    in_flight: bool,
    num_errors: usize,
    num_warnings: usize,
    identifiers: Option<SharedIdentifierTable>,
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        Self::with_options(&DiagnosticOptions::default())
    }

    pub fn with_options(options: &DiagnosticOptions) -> Self {
        DiagnosticEngine {
            state: DiagnosticState::new(options),
            consumers: Vec::new(),
            next_consumer: 0,
            pending: Vec::new(),
            transaction_marks: Vec::new(),
            in_flight: false,
            num_errors: 0,
            num_warnings: 0,
            identifiers: None,
        }
    }

    /// Table used to spell identifier arguments in rendered messages.
    pub fn set_identifiers(&mut self, identifiers: SharedIdentifierTable) {
        self.identifiers = Some(identifiers);
    }

    pub fn state(&self) -> &DiagnosticState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DiagnosticState {
        &mut self.state
    }

    // Building

    /// Start a diagnostic.
    ///
    /// # Panics
    /// Panics if another diagnostic is still in flight, which can only
    /// happen if an earlier builder was leaked with `mem::forget`.
    pub fn diagnose<A: DiagArgs>(
        &mut self,
        loc: Span,
        diag: Diag<A>,
        args: A,
    ) -> InFlightDiagnostic<'_> {
        assert!(
            !self.in_flight,
            "cannot start {} while another diagnostic is in flight",
            diag.id().name()
        );
        self.in_flight = true;
        InFlightDiagnostic {
            diagnostic: Diagnostic::new(diag.id(), loc, args.into_arguments()),
            engine: self,
        }
    }

    /// Build a diagnostic in `build` and flush it when the closure returns.
    pub fn diagnose_with<A: DiagArgs>(
        &mut self,
        loc: Span,
        diag: Diag<A>,
        args: A,
        build: impl FnOnce(&mut InFlightDiagnostic<'_>),
    ) {
        let mut in_flight = self.diagnose(loc, diag, args);
        build(&mut in_flight);
        in_flight.flush();
    }

    pub fn is_diagnostic_in_flight(&self) -> bool {
        self.in_flight
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.in_flight = false;
        let level = self.state.determine_level(&diagnostic);
        if level == DiagnosticLevel::Ignore {
            tracing::trace!(diag = diagnostic.id().name(), "ignored diagnostic");
            return;
        }
        if self.transaction_marks.is_empty() {
            self.dispatch(&diagnostic, level);
        } else {
            tracing::trace!(
                diag = diagnostic.id().name(),
                %level,
                depth = self.transaction_marks.len(),
                "queued diagnostic"
            );
            self.pending.push(PendingDiagnostic { diagnostic, level });
        }
    }

    fn dispatch(&mut self, diagnostic: &Diagnostic, level: DiagnosticLevel) {
        if self.state.suppressed_by_fatal() {
            tracing::debug!(diag = diagnostic.id().name(), "dropped after fatal error");
            return;
        }

        let message = self.make_message(diagnostic, level);
        let mut counted = self.consumers.is_empty();
        for (_, consumer) in &mut self.consumers {
            consumer.consume(&message);
            counted |= consumer.include_in_diagnostic_counts();
        }
        if counted {
            match level {
                DiagnosticLevel::Warning => self.num_warnings += 1,
                DiagnosticLevel::Error => self.num_errors += 1,
                _ => {}
            }
        }
        self.state.record_dispatch(level);
        tracing::debug!(diag = message.name(), %level, loc = %message.loc, "dispatched diagnostic");
    }

    fn make_message(&self, diagnostic: &Diagnostic, level: DiagnosticLevel) -> DiagnosticMessage {
        let identifiers = self
            .identifiers
            .as_ref()
            .map(|table| table as &dyn IdentifierLookup);
        DiagnosticMessage {
            id: diagnostic.id(),
            level,
            loc: diagnostic.loc(),
            text: format_diagnostic_text(
                diagnostic.id().info().format,
                diagnostic.args(),
                identifiers,
            ),
            highlights: diagnostic.highlights().to_vec(),
            fix_its: diagnostic.fix_its().to_vec(),
        }
    }

    // Transactions

    /// Open a transaction. Diagnostics flushed until it closes are held back.
    pub fn open_transaction(&mut self) -> TransactionToken {
        let mark = self.pending.len();
        self.transaction_marks.push(mark);
        let depth = self.transaction_marks.len();
        tracing::trace!(depth, mark, "opened diagnostic transaction");
        TransactionToken { depth, mark }
    }

    /// Close a transaction, keeping its diagnostics.
    ///
    /// Closing the outermost transaction dispatches everything pending in
    /// emission order; an inner commit leaves them to the enclosing one.
    pub fn commit_transaction(&mut self, token: TransactionToken) {
        self.close_transaction(&token, "commit");
        tracing::trace!(depth = token.depth, "committed diagnostic transaction");
        if self.transaction_marks.is_empty() {
            let pending = std::mem::take(&mut self.pending);
            for PendingDiagnostic { diagnostic, level } in pending {
                self.dispatch(&diagnostic, level);
            }
        }
    }

    /// Close a transaction, discarding everything queued since it opened.
    pub fn abort_transaction(&mut self, token: TransactionToken) {
        self.close_transaction(&token, "abort");
        let discarded = self.pending.len() - token.mark;
        self.pending.truncate(token.mark);
        tracing::trace!(depth = token.depth, discarded, "aborted diagnostic transaction");
    }

    fn close_transaction(&mut self, token: &TransactionToken, action: &str) {
        let depth = self.transaction_marks.len();
        assert!(
            token.depth == depth,
            "cannot {action} diagnostic transaction at depth {} while depth {depth} is open",
            token.depth
        );
        self.transaction_marks.pop();
    }

    /// Number of open transactions.
    pub fn transaction_depth(&self) -> usize {
        self.transaction_marks.len()
    }

    /// Whether anything queued at or after `mark` is an error.
    pub(crate) fn pending_has_errors(&self, mark: usize) -> bool {
        self.pending
            .get(mark..)
            .is_some_and(|pending| pending.iter().any(|p| p.level.is_error()))
    }

    // Consumers

    pub fn add_consumer(&mut self, consumer: Box<dyn DiagnosticConsumer>) -> ConsumerId {
        let id = ConsumerId(self.next_consumer);
        self.next_consumer += 1;
        self.consumers.push((id, consumer));
        tracing::debug!(consumer = id.0, "added diagnostic consumer");
        id
    }

    pub fn remove_consumer(&mut self, id: ConsumerId) -> Option<Box<dyn DiagnosticConsumer>> {
        let index = self.consumers.iter().position(|(cid, _)| *cid == id)?;
        tracing::debug!(consumer = id.0, "removed diagnostic consumer");
        Some(self.consumers.remove(index).1)
    }

    /// Detach and return every consumer, in registration order.
    pub fn take_consumers(&mut self) -> Vec<Box<dyn DiagnosticConsumer>> {
        std::mem::take(&mut self.consumers)
            .into_iter()
            .map(|(_, consumer)| consumer)
            .collect()
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    /// Let every consumer finish. Returns true if any of them failed.
    pub fn finish(&mut self) -> bool {
        self.consumers
            .iter_mut()
            .fold(false, |failed, (_, consumer)| consumer.finish() | failed)
    }

    // Queries

    pub fn had_any_error(&self) -> bool {
        self.state.any_error_occurred
    }

    pub fn has_fatal_error_occurred(&self) -> bool {
        self.state.fatal_error_occurred
    }

    /// Forget earlier errors so that dispatch resumes after a fatal error.
    pub fn reset_had_any_error(&mut self) {
        self.state.reset_had_any_error();
    }

    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    pub fn num_warnings(&self) -> usize {
        self.num_warnings
    }

    /// The catalog format of `id`, optionally tagged with its name.
    pub fn diag_string(id: DiagId, with_name: bool) -> Cow<'static, str> {
        let format = id.info().format;
        if with_name {
            Cow::Owned(format!("{format} [{}]", id.name()))
        } else {
            Cow::Borrowed(format)
        }
    }

    pub fn diag_name(id: DiagId) -> &'static str {
        id.name()
    }
}

impl Default for DiagnosticEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiagnosticEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticEngine")
            .field("state", &self.state)
            .field("consumers", &self.consumers.len())
            .field("pending", &self.pending.len())
            .field("transaction_depth", &self.transaction_marks.len())
            .field("num_errors", &self.num_errors)
            .field("num_warnings", &self.num_warnings)
            .finish_non_exhaustive()
    }
}

/// Builder for the diagnostic currently in flight.
///
/// Emitted when flushed or dropped, so a builder used as a temporary
/// (`engine.diagnose(..).highlight(r);`) is emitted at the end of the
/// statement.
#[must_use = "a diagnostic is emitted when this builder is flushed or dropped"]
pub struct InFlightDiagnostic<'e> {
    engine: &'e mut DiagnosticEngine,
    diagnostic: Diagnostic,
}

impl InFlightDiagnostic<'_> {
    pub fn id(&self) -> DiagId {
        self.diagnostic.id()
    }

    /// Mark an extra source range as relevant.
    pub fn highlight(&mut self, range: Span) -> &mut Self {
        self.diagnostic.add_highlight(range);
        self
    }

    /// Never report this diagnostic above `level`.
    pub fn cap_level(&mut self, level: DiagnosticLevel) -> &mut Self {
        self.diagnostic.set_level_cap(level);
        self
    }

    /// Attach source edits.
    pub fn with_fix(&mut self) -> FixBuilder<'_> {
        FixBuilder {
            diagnostic: &mut self.diagnostic,
        }
    }

    /// Emit now.
    pub fn flush(self) {}
}

impl Drop for InFlightDiagnostic<'_> {
    fn drop(&mut self) {
        let placeholder = Diagnostic::new(self.diagnostic.id(), Span::DUMMY, SmallVec::new());
        let diagnostic = std::mem::replace(&mut self.diagnostic, placeholder);
        self.engine.emit(diagnostic);
    }
}

/// Adds fix-its to an in-flight diagnostic.
pub struct FixBuilder<'d> {
    diagnostic: &'d mut Diagnostic,
}

impl FixBuilder<'_> {
    /// Insert `text` before `loc`.
    pub fn insert(&mut self, loc: Span, text: impl Into<String>) -> &mut Self {
        self.push(Span::point(loc.start), text)
    }

    /// Insert `text` after `loc`.
    pub fn insert_after(&mut self, loc: Span, text: impl Into<String>) -> &mut Self {
        self.push(loc.end_point(), text)
    }

    pub fn replace(&mut self, range: Span, text: impl Into<String>) -> &mut Self {
        self.push(range, text)
    }

    pub fn remove(&mut self, range: Span) -> &mut Self {
        self.push(range, String::new())
    }

    /// Swap the text of two ranges of `source`.
    ///
    /// Ranges that do not slice `source` cleanly add nothing.
    pub fn exchange(&mut self, first: Span, second: Span, source: &str) -> &mut Self {
        if let (Some(a), Some(b)) = (source.get(first.to_range()), source.get(second.to_range())) {
            let (a, b) = (a.to_owned(), b.to_owned());
            self.push(first, b);
            self.push(second, a);
        }
        self
    }

    fn push(&mut self, range: Span, text: impl Into<String>) -> &mut Self {
        self.diagnostic.add_fix_it(FixIt::new(range, text));
        self
    }
}
