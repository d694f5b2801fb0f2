//! Diagnostic consumers.
//!
//! Consumers are the engine's sinks. Each dispatched diagnostic goes to
//! every registered consumer in registration order.

use crate::DiagnosticMessage;
use std::cell::RefCell;
use std::rc::Rc;

/// A sink for dispatched diagnostics.
pub trait DiagnosticConsumer {
    fn consume(&mut self, message: &DiagnosticMessage);

    /// Called once when the engine finishes. Returns true if the consumer
    /// failed (for example, could not write its output).
    fn finish(&mut self) -> bool {
        false
    }

    /// Whether diagnostics this consumer receives count toward the
    /// engine's error and warning totals.
    fn include_in_diagnostic_counts(&self) -> bool {
        true
    }
}

/// Handle returned by `DiagnosticEngine::add_consumer`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ConsumerId(pub(crate) u32);

/// Consumer that keeps every message it receives.
///
/// Clones share the same buffer, so a test can keep one clone and hand the
/// other to the engine.
#[derive(Clone, Debug)]
pub struct CollectingConsumer {
    messages: Rc<RefCell<Vec<DiagnosticMessage>>>,
    finished: Rc<RefCell<bool>>,
    include_in_counts: bool,
}

impl CollectingConsumer {
    pub fn new() -> Self {
        CollectingConsumer {
            messages: Rc::default(),
            finished: Rc::default(),
            include_in_counts: true,
        }
    }

    /// A collector whose diagnostics do not count toward the engine totals.
    pub fn uncounted() -> Self {
        CollectingConsumer {
            include_in_counts: false,
            ..Self::new()
        }
    }

    /// Snapshot of the messages received so far.
    pub fn messages(&self) -> Vec<DiagnosticMessage> {
        self.messages.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    pub fn is_finished(&self) -> bool {
        *self.finished.borrow()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl Default for CollectingConsumer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticConsumer for CollectingConsumer {
    fn consume(&mut self, message: &DiagnosticMessage) {
        self.messages.borrow_mut().push(message.clone());
    }

    fn finish(&mut self) -> bool {
        *self.finished.borrow_mut() = true;
        false
    }

    fn include_in_diagnostic_counts(&self) -> bool {
        self.include_in_counts
    }
}
