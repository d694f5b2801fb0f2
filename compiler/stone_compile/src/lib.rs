//! Compilation driver for the Stone front end.
//!
//! Turns [`CompilerOptions`] into a [`Compilation`], which owns the AST
//! [`Context`](stone_ast::Context) and the
//! [`DiagnosticEngine`](stone_diagnostic::DiagnosticEngine) for one module
//! and runs the front-end phases on them, skipping later phases once the
//! engine reports errors.
//!
//! Parallel builds create one `Compilation` per worker.

mod compilation;
mod options;
mod source;

pub use compilation::{Compilation, CompilationSummary, Phase, PhaseStatus, TopLevelDecl};
pub use options::{CompilerOptions, OptionsError};
pub use source::{SourceDecl, SourceImport};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=stone_diagnostic=debug`,
/// `RUST_LOG=stone_compile=debug` and so on.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let tree = tracing_tree::HierarchicalLayer::new(2)
                .with_writer(std::io::stderr)
                .with_targets(true)
                .with_bracketed_fields(true);
            // A host that already installed a subscriber keeps it.
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(tree)
                .try_init();
        }
    });
}
