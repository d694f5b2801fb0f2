//! Memory regions owned by a [`Context`](crate::Context).
//!
//! Each [`ArenaKind`] names one region. A region pairs a bump allocator for
//! raw, caller-aligned storage with the typed pools that hold AST nodes.
//! Nothing in a region is ever freed piecewise; the whole region goes away
//! when the context is dropped.

use crate::node::NodeStorage;
use crate::{NodeId, ParamDecl};
use bumpalo::Bump;
use std::alloc::Layout;
use std::cell::Cell;
use std::fmt;
use std::ptr::NonNull;

/// Named allocation region.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ArenaKind {
    /// Process-lifetime singletons such as the builtin types.
    Permanent,
    /// Everything created for the current compilation.
    #[default]
    Compilation,
}

impl ArenaKind {
    pub const ALL: [ArenaKind; 2] = [ArenaKind::Permanent, ArenaKind::Compilation];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            ArenaKind::Permanent => "permanent",
            ArenaKind::Compilation => "compilation",
        }
    }
}

impl fmt::Display for ArenaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bump region handing out raw, aligned storage.
pub struct RawArena {
    bump: Bump,
    requested: Cell<usize>,
}

impl RawArena {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bump: Bump::with_capacity(bytes),
            requested: Cell::new(0),
        }
    }

    /// Allocate `bytes` bytes aligned to `alignment`.
    ///
    /// The storage is uninitialised, stays put until the arena is dropped,
    /// and is never freed on its own. A zero-byte request still yields a
    /// suitably aligned address.
    ///
    /// # Panics
    /// Panics if `alignment` is not a power of two or the size overflows
    /// when rounded up to it. Exhaustion goes through the global OOM handler.
    pub fn allocate(&self, bytes: usize, alignment: usize) -> NonNull<u8> {
        assert!(
            alignment.is_power_of_two(),
            "arena alignment must be a power of two, got {alignment}"
        );
        let layout = Layout::from_size_align(bytes, alignment)
            .unwrap_or_else(|e| panic!("invalid arena layout ({bytes} bytes, align {alignment}): {e}"));
        self.requested.set(self.requested.get() + bytes);
        self.bump.alloc_layout(layout)
    }

    /// Bytes requested through [`RawArena::allocate`].
    pub fn bytes_requested(&self) -> usize {
        self.requested.get()
    }

    /// Bytes reserved from the system, chunk overhead included.
    pub fn bytes_reserved(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for RawArena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RawArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawArena")
            .field("requested", &self.requested.get())
            .field("reserved", &self.bump.allocated_bytes())
            .finish()
    }
}

/// One region: raw storage, typed node pools and the flat parameter list.
#[derive(Default)]
pub(crate) struct Arena {
    pub(crate) raw: RawArena,
    pub(crate) nodes: NodeStorage,
    pub(crate) params: Vec<NodeId<ParamDecl>>,
}

impl Arena {
    pub(crate) fn with_capacity(bytes: usize) -> Self {
        Self {
            raw: RawArena::with_capacity(bytes),
            nodes: NodeStorage::default(),
            params: Vec::new(),
        }
    }
}
