//! Context configuration.

/// Options applied when a [`Context`](crate::Context) is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextOptions {
    /// Bytes to reserve up front for the compilation arena's raw region.
    pub compilation_arena_capacity: usize,
    /// Intern every language keyword at creation.
    pub pre_intern_keywords: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            compilation_arena_capacity: 64 * 1024,
            pre_intern_keywords: true,
        }
    }
}
