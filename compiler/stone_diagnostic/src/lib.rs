//! Diagnostics for the Stone compiler.
//!
//! - A static catalog of every diagnostic: name, declared level, options and
//!   message format (`%0`, `%1`, ... for arguments)
//! - Leveling policy: ignore lists, warning suppression, warnings as
//!   errors, errors as fatal and back
//! - The [`DiagnosticEngine`], which builds one diagnostic at a time,
//!   buffers them in nested transactions and dispatches them to consumers
//! - Consumers: a text printer and a collector
//!
//! ```text
//! engine.diagnose(loc, diag::ExpectedToken, (TokenKind::RParen,))
//!     .with_fix()
//!     .insert_after(prev, ")");
//! ```
//!
//! The engine never aborts a compilation. Drivers check
//! `had_any_error()` and `has_fatal_error_occurred()` between phases.

mod argument;
mod catalog;
mod consumer;
mod diagnostic;
mod engine;
mod level;
mod options;
pub mod printer;
mod state;
mod suppression;
mod transaction;

pub use argument::{
    format_diagnostic_text, DiagArgs, DiagnosticArgument, DiagnosticArguments, SyntaxArgument,
};
pub use catalog::{diag, Diag, DiagId, DiagInfo, DiagOptions};
pub use consumer::{CollectingConsumer, ConsumerId, DiagnosticConsumer};
pub use diagnostic::{Diagnostic, DiagnosticMessage, FixIt};
pub use engine::{DiagnosticEngine, FixBuilder, InFlightDiagnostic, TransactionToken};
pub use level::DiagnosticLevel;
pub use options::DiagnosticOptions;
pub use printer::{ColorMode, TextDiagnosticPrinter};
pub use state::DiagnosticState;
pub use suppression::DiagnosticSuppression;
pub use transaction::DiagnosticTransaction;
