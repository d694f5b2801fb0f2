//! The allocation capability.
//!
//! Node structs keep their fields private, so outside this crate the only
//! way to obtain a node is through a [`Context`](crate::Context): either
//! `create` (construct into a fresh slot) or `reserve` + `emplace` (fill a
//! slot whose handle was needed first). [`AstNode`] is sealed; the set of
//! node types is fixed by the `node_storage!` table below.

use crate::{BuiltinType, FunDecl, ModuleDecl, ParamDecl, StructDecl, VarDecl};

/// Typed storage for one node type in one arena.
///
/// Slots are `None` between `reserve` and `emplace`.
pub struct NodePool<T> {
    slots: Vec<Option<T>>,
}

impl<T> NodePool<T> {
    pub(crate) fn push(&mut self, node: T) -> u32 {
        let index = self.next_index();
        self.slots.push(Some(node));
        index
    }

    pub(crate) fn reserve(&mut self) -> u32 {
        let index = self.next_index();
        self.slots.push(None);
        index
    }

    pub(crate) fn fill(&mut self, index: usize, node: T, type_name: &str) {
        let slot = &mut self.slots[index];
        assert!(
            slot.is_none(),
            "{type_name} slot {index} was already emplaced"
        );
        *slot = Some(node);
    }

    pub(crate) fn get(&self, index: usize, type_name: &str) -> &T {
        match self.slots.get(index) {
            Some(Some(node)) => node,
            Some(None) => panic!("{type_name} slot {index} was reserved but never emplaced"),
            None => panic!("{type_name} slot {index} is out of bounds"),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    fn next_index(&self) -> u32 {
        u32::try_from(self.slots.len())
            .unwrap_or_else(|_| panic!("node pool exceeded {} slots", u32::MAX))
    }
}

impl<T> Default for NodePool<T> {
    fn default() -> Self {
        NodePool { slots: Vec::new() }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A node type that lives in a context's arenas.
///
/// Sealed: implemented only for the node types of this crate.
pub trait AstNode: sealed::Sealed + Sized + 'static {
    /// Human-readable type name used in internal error messages.
    const NAME: &'static str;

    #[doc(hidden)]
    fn pool(storage: &NodeStorage) -> &NodePool<Self>;

    #[doc(hidden)]
    fn pool_mut(storage: &mut NodeStorage) -> &mut NodePool<Self>;
}

macro_rules! node_storage {
    ($($field:ident: $ty:ident,)*) => {
        /// Every typed pool of one arena.
        #[derive(Default)]
        pub struct NodeStorage {
            $($field: NodePool<$ty>,)*
        }

        impl NodeStorage {
            /// Total number of node slots across all pools.
            pub(crate) fn node_count(&self) -> usize {
                0 $(+ self.$field.len())*
            }
        }

        $(
            impl sealed::Sealed for $ty {}

            impl AstNode for $ty {
                const NAME: &'static str = stringify!($ty);

                #[inline]
                fn pool(storage: &NodeStorage) -> &NodePool<Self> {
                    &storage.$field
                }

                #[inline]
                fn pool_mut(storage: &mut NodeStorage) -> &mut NodePool<Self> {
                    &mut storage.$field
                }
            }
        )*
    };
}

node_storage! {
    fun_decls: FunDecl,
    param_decls: ParamDecl,
    struct_decls: StructDecl,
    var_decls: VarDecl,
    module_decls: ModuleDecl,
    builtin_types: BuiltinType,
}
