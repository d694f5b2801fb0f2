//! Temporarily silencing every consumer.

use crate::engine::Consumers;
use crate::DiagnosticEngine;
use std::ops::{Deref, DerefMut};

/// Detaches the engine's consumers until dropped.
///
/// Diagnostics emitted meanwhile are still leveled and update the error
/// state, but nobody receives them. Consumers added while the guard is
/// alive stay registered after the detached ones come back.
pub struct DiagnosticSuppression<'e> {
    engine: &'e mut DiagnosticEngine,
    detached: Consumers,
}

impl DiagnosticEngine {
    pub fn suppress(&mut self) -> DiagnosticSuppression<'_> {
        let detached = std::mem::take(&mut self.consumers);
        tracing::trace!(detached = detached.len(), "suppressing diagnostic consumers");
        DiagnosticSuppression {
            engine: self,
            detached,
        }
    }
}

impl Deref for DiagnosticSuppression<'_> {
    type Target = DiagnosticEngine;

    fn deref(&self) -> &DiagnosticEngine {
        self.engine
    }
}

impl DerefMut for DiagnosticSuppression<'_> {
    fn deref_mut(&mut self) -> &mut DiagnosticEngine {
        self.engine
    }
}

impl Drop for DiagnosticSuppression<'_> {
    fn drop(&mut self) {
        self.detached.append(&mut self.engine.consumers);
        self.engine.consumers = std::mem::take(&mut self.detached);
    }
}

#[cfg(test)]
mod tests;
