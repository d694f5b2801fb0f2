//! Typed handles to AST nodes.
//!
//! A [`NodeId`] names a slot in one arena of one context. Handles are
//! `Copy` and compare by position, so declaration identity is handle
//! identity. Every handle remembers its context; resolving it against a
//! different context is an internal error.

use crate::ArenaKind;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

/// Process-unique identity of a [`Context`](crate::Context).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct ContextId(u32);

impl ContextId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        ContextId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextId({})", self.0)
    }
}

/// Handle to a node of type `T`.
pub struct NodeId<T> {
    index: u32,
    arena: ArenaKind,
    ctx: ContextId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> NodeId<T> {
    #[inline]
    pub(crate) const fn new(index: u32, arena: ArenaKind, ctx: ContextId) -> Self {
        NodeId {
            index,
            arena,
            ctx,
            _marker: PhantomData,
        }
    }

    /// Slot index within the arena's pool for `T`.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub const fn arena(self) -> ArenaKind {
        self.arena
    }

    #[inline]
    pub const fn context(self) -> ContextId {
        self.ctx
    }
}

impl<T> Clone for NodeId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeId<T> {}

impl<T> PartialEq for NodeId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.arena == other.arena && self.ctx == other.ctx
    }
}

impl<T> Eq for NodeId<T> {}

impl<T> Hash for NodeId<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.arena.hash(state);
        self.ctx.hash(state);
    }
}

impl<T> fmt::Debug for NodeId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NodeId({}, {}, ctx={})",
            self.index,
            self.arena.name(),
            self.ctx.0
        )
    }
}

/// A slot reserved with [`Context::reserve`](crate::Context::reserve) and
/// not yet filled.
///
/// The handle is known up front so that a node's trailing payload can point
/// back at it. Consumed by [`Context::emplace`](crate::Context::emplace).
#[must_use = "a reserved slot must be filled with Context::emplace"]
pub struct ReservedNode<T> {
    id: NodeId<T>,
}

impl<T> ReservedNode<T> {
    pub(crate) const fn new(id: NodeId<T>) -> Self {
        ReservedNode { id }
    }

    /// The handle the node will have once emplaced.
    #[inline]
    pub const fn id(&self) -> NodeId<T> {
        self.id
    }
}

impl<T> fmt::Debug for ReservedNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReservedNode({:?})", self.id)
    }
}

/// Range of parameter handles in an arena's flat parameter list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ParamRange {
    pub(crate) arena: ArenaKind,
    pub(crate) start: u32,
    pub(crate) len: u32,
}

impl ParamRange {
    pub const EMPTY: ParamRange = ParamRange {
        arena: ArenaKind::Compilation,
        start: 0,
        len: 0,
    };

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for ParamRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParamRange({}..{})", self.start, self.start + self.len)
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::NodeId;
    crate::static_assert_size!(NodeId<()>, 12);
}
