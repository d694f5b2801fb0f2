//! Redeclaration chains.
//!
//! All syntactic declarations of one entity form a circular chain. The
//! first one created is canonical and never changes. Each other member
//! links to its predecessor; the canonical member links to the most recent
//! member ("latest"), computed lazily and updatable by a module loader.
//!
//! ```text
//!   first <- second <- third
//!     \__________________^   (first's latest link)
//! ```
//!
//! Walking "predecessor, or latest when canonical" from any member visits
//! every member once before coming back around.

use crate::decl::Decl;
use crate::{Context, ContextId, NodeId};
use std::cell::Cell;
use std::fmt;

/// Link state stored in every redeclarable node.
pub enum DeclLink<D> {
    /// Non-canonical member: the member declared just before this one.
    Previous(NodeId<D>),
    /// Canonical member whose latest has not been looked at yet.
    UninitializedLatest(ContextId),
    /// Canonical member with a cached latest.
    KnownLatest {
        ctx: ContextId,
        latest: NodeId<D>,
        /// Set when the loader must re-resolve `latest` before trusting it.
        incomplete: bool,
    },
}

impl<D> DeclLink<D> {
    #[inline]
    pub fn is_latest(&self) -> bool {
        !matches!(self, DeclLink::Previous(_))
    }
}

impl<D> Clone for DeclLink<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for DeclLink<D> {}

impl<D> PartialEq for DeclLink<D> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DeclLink::Previous(a), DeclLink::Previous(b)) => a == b,
            (DeclLink::UninitializedLatest(a), DeclLink::UninitializedLatest(b)) => a == b,
            (
                DeclLink::KnownLatest {
                    ctx: c1,
                    latest: l1,
                    incomplete: i1,
                },
                DeclLink::KnownLatest {
                    ctx: c2,
                    latest: l2,
                    incomplete: i2,
                },
            ) => c1 == c2 && l1 == l2 && i1 == i2,
            _ => false,
        }
    }
}

impl<D> Eq for DeclLink<D> {}

impl<D> fmt::Debug for DeclLink<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclLink::Previous(prev) => f.debug_tuple("Previous").field(prev).finish(),
            DeclLink::UninitializedLatest(ctx) => {
                f.debug_tuple("UninitializedLatest").field(ctx).finish()
            }
            DeclLink::KnownLatest {
                ctx,
                latest,
                incomplete,
            } => f
                .debug_struct("KnownLatest")
                .field("ctx", ctx)
                .field("latest", latest)
                .field("incomplete", incomplete)
                .finish(),
        }
    }
}

/// Chain bookkeeping embedded in a redeclarable node.
pub struct RedeclLink<D> {
    first: Cell<NodeId<D>>,
    link: Cell<DeclLink<D>>,
}

impl<D> RedeclLink<D> {
    /// Link for a node that starts out as a canonical chain of one.
    pub(crate) fn new(this: NodeId<D>) -> Self {
        Self {
            first: Cell::new(this),
            link: Cell::new(DeclLink::UninitializedLatest(this.context())),
        }
    }

    /// Current link state.
    #[inline]
    pub fn link(&self) -> DeclLink<D> {
        self.link.get()
    }
}

/// A declaration that participates in a redeclaration chain.
pub trait Redeclarable: Decl {
    fn redecl_link(&self) -> &RedeclLink<Self>;
}

/// A declaration that is never chained: each one is its own canonical member.
pub trait Mergeable: Decl {
    #[inline]
    fn first_decl(this: NodeId<Self>) -> NodeId<Self> {
        this
    }

    #[inline]
    fn is_first_decl(_this: NodeId<Self>) -> bool {
        true
    }
}

impl Context {
    fn redecl<D: Redeclarable>(&self, d: NodeId<D>) -> &RedeclLink<D> {
        self.get(d).redecl_link()
    }

    /// True iff `d` is the canonical member of its chain.
    pub fn is_first_decl<D: Redeclarable>(&self, d: NodeId<D>) -> bool {
        self.redecl(d).link().is_latest()
    }

    /// The member declared just before `d`, or `None` when `d` is canonical.
    pub fn previous_decl<D: Redeclarable>(&self, d: NodeId<D>) -> Option<NodeId<D>> {
        match self.redecl(d).link() {
            DeclLink::Previous(prev) => Some(prev),
            DeclLink::UninitializedLatest(_) | DeclLink::KnownLatest { .. } => None,
        }
    }

    /// The canonical member of `d`'s chain.
    pub fn first_decl<D: Redeclarable>(&self, d: NodeId<D>) -> NodeId<D> {
        self.redecl(d).first.get()
    }

    /// The most recently linked member of `d`'s chain.
    ///
    /// The first query on a fresh chain caches the canonical member itself.
    pub fn most_recent_decl<D: Redeclarable>(&self, d: NodeId<D>) -> NodeId<D> {
        let first = self.first_decl(d);
        let link = &self.redecl(first).link;
        match link.get() {
            DeclLink::UninitializedLatest(ctx) => {
                link.set(DeclLink::KnownLatest {
                    ctx,
                    latest: first,
                    incomplete: false,
                });
                first
            }
            DeclLink::KnownLatest { latest, .. } => latest,
            DeclLink::Previous(_) => {
                panic!("redeclaration chain is malformed: canonical {first:?} has a predecessor")
            }
        }
    }

    /// Link `d` into `prev`'s chain as its newest member.
    ///
    /// `d` is attached after the chain's current most recent member (which
    /// need not be `prev`) and becomes the chain's latest. With `None`, `d`
    /// stays a canonical chain of one.
    ///
    /// # Panics
    /// Panics if `d` already belongs to a chain with other members, if `d`
    /// would be linked into its own chain, or if either handle comes from
    /// another context.
    pub fn set_previous_decl<D: Redeclarable>(&self, d: NodeId<D>, prev: Option<NodeId<D>>) {
        let this = self.redecl(d);
        let singleton = this.first.get() == d
            && match this.link() {
                DeclLink::UninitializedLatest(_) => true,
                DeclLink::KnownLatest { latest, .. } => latest == d,
                DeclLink::Previous(_) => false,
            };
        assert!(
            singleton,
            "cannot relink {d:?}: it already belongs to a redeclaration chain"
        );

        let Some(prev) = prev else {
            this.link.set(DeclLink::UninitializedLatest(self.id()));
            return;
        };

        let first = self.first_decl(prev);
        assert!(first != d, "cannot link {d:?} into its own redeclaration chain");
        let most_recent = self.most_recent_decl(prev);

        this.first.set(first);
        this.link.set(DeclLink::Previous(most_recent));
        self.set_latest(first, d);
        tracing::trace!(decl = ?d, previous = ?most_recent, first = ?first, "linked redeclaration");
    }

    /// Point canonical `first`'s latest link at `d`. A pending incomplete
    /// flag survives; only [`Context::set_latest_resolved`] clears it.
    ///
    /// # Panics
    /// Panics if `first` is not canonical.
    pub fn set_latest<D: Redeclarable>(&self, first: NodeId<D>, d: NodeId<D>) {
        let incomplete = matches!(
            self.redecl(first).link(),
            DeclLink::KnownLatest {
                incomplete: true,
                ..
            }
        );
        self.store_latest(first, d, incomplete);
    }

    /// Loader-side completion: record `d` as the latest of canonical `first`
    /// and clear the incomplete flag.
    ///
    /// # Panics
    /// Panics if `first` is not canonical.
    pub fn set_latest_resolved<D: Redeclarable>(&self, first: NodeId<D>, d: NodeId<D>) {
        self.store_latest(first, d, false);
        tracing::trace!(first = ?first, latest = ?d, "resolved redeclaration chain");
    }

    fn store_latest<D: Redeclarable>(&self, first: NodeId<D>, d: NodeId<D>, incomplete: bool) {
        self.check_owned(d);
        let link = &self.redecl(first).link;
        assert!(
            link.get().is_latest(),
            "set_latest on {first:?}, which is not a canonical declaration"
        );
        link.set(DeclLink::KnownLatest {
            ctx: self.id(),
            latest: d,
            incomplete,
        });
    }

    /// Flag `d`'s chain as stale so the next loader pass re-resolves its latest.
    pub fn mark_incomplete<D: Redeclarable>(&self, d: NodeId<D>) {
        let first = self.first_decl(d);
        let link = &self.redecl(first).link;
        let latest = match link.get() {
            DeclLink::KnownLatest { latest, .. } => latest,
            DeclLink::UninitializedLatest(_) | DeclLink::Previous(_) => first,
        };
        link.set(DeclLink::KnownLatest {
            ctx: self.id(),
            latest,
            incomplete: true,
        });
    }

    pub fn is_redecl_chain_incomplete<D: Redeclarable>(&self, d: NodeId<D>) -> bool {
        let first = self.first_decl(d);
        matches!(
            self.redecl(first).link(),
            DeclLink::KnownLatest {
                incomplete: true,
                ..
            }
        )
    }

    /// Iterate over every member of `d`'s chain, starting at `d`.
    pub fn redecls<D: Redeclarable>(&self, d: NodeId<D>) -> Redecls<'_, D> {
        Redecls {
            ctx: self,
            start: d,
            current: Some(d),
            passed_first: false,
        }
    }
}

/// Iterator over a redeclaration chain. See [`Context::redecls`].
pub struct Redecls<'ctx, D> {
    ctx: &'ctx Context,
    start: NodeId<D>,
    current: Option<NodeId<D>>,
    passed_first: bool,
}

impl<D: Redeclarable> Iterator for Redecls<'_, D> {
    type Item = NodeId<D>;

    fn next(&mut self) -> Option<NodeId<D>> {
        let current = self.current?;
        let next = if self.ctx.is_first_decl(current) {
            assert!(
                !self.passed_first,
                "redeclaration chain is malformed: passed the canonical declaration twice"
            );
            self.passed_first = true;
            self.ctx.most_recent_decl(current)
        } else {
            self.ctx.previous_decl(current).unwrap_or(self.start)
        };
        self.current = (next != self.start).then_some(next);
        Some(current)
    }
}

impl<D> Clone for Redecls<'_, D> {
    fn clone(&self) -> Self {
        Redecls {
            ctx: self.ctx,
            start: self.start,
            current: self.current,
            passed_first: self.passed_first,
        }
    }
}

impl<D> std::iter::FusedIterator for Redecls<'_, D> where D: Redeclarable {}

#[cfg(test)]
mod tests;
