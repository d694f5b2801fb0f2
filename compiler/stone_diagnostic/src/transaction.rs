//! Scoped diagnostic transactions.

use crate::engine::TransactionToken;
use crate::DiagnosticEngine;
use std::ops::{Deref, DerefMut};

/// Holds back diagnostics until committed; commits when dropped.
///
/// Derefs to the engine, so diagnostics are emitted through the guard.
pub struct DiagnosticTransaction<'e> {
    engine: &'e mut DiagnosticEngine,
    token: Option<TransactionToken>,
}

impl DiagnosticEngine {
    /// Open a transaction closed by the returned guard.
    pub fn transaction(&mut self) -> DiagnosticTransaction<'_> {
        let token = self.open_transaction();
        DiagnosticTransaction {
            engine: self,
            token: Some(token),
        }
    }
}

impl DiagnosticTransaction<'_> {
    pub fn commit(mut self) {
        if let Some(token) = self.token.take() {
            self.engine.commit_transaction(token);
        }
    }

    /// Discard every diagnostic emitted since the transaction opened.
    pub fn abort(mut self) {
        if let Some(token) = self.token.take() {
            self.engine.abort_transaction(token);
        }
    }

    /// Whether an error or fatal error is pending in this transaction.
    pub fn has_errors(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|token| self.engine.pending_has_errors(token.mark()))
    }
}

impl Deref for DiagnosticTransaction<'_> {
    type Target = DiagnosticEngine;

    fn deref(&self) -> &DiagnosticEngine {
        self.engine
    }
}

impl DerefMut for DiagnosticTransaction<'_> {
    fn deref_mut(&mut self) -> &mut DiagnosticEngine {
        self.engine
    }
}

impl Drop for DiagnosticTransaction<'_> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            self.engine.commit_transaction(token);
        }
    }
}
