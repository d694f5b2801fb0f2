//! The compilation context.
//!
//! A [`Context`] owns everything the front end allocates for one
//! compilation: both arenas and the nodes in them, the identifier table,
//! the loaded-module map and module aliases, the builtin types, and a list
//! of teardown callbacks. Nodes are never freed individually. Dropping the
//! context runs the callbacks in registration order and then releases all
//! arena memory at once.

use crate::arena::Arena;
use crate::builtin::{Builtin, BuiltinType, BuiltinTypeKind};
use crate::node::AstNode;
use crate::{
    ArenaKind, ContextId, ContextOptions, Decl, Identifier, IdentifierTable, ModuleDecl, NodeId,
    ParamDecl, ParamRange, ReservedNode, SharedIdentifierTable,
};
use rustc_hash::FxHashMap;
use std::fmt;
use std::ops::Index;
use std::ptr::NonNull;
use std::sync::Arc;

/// How [`Context::get_real_module_name`] interprets its key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ModuleAliasLookup {
    /// Real name if the key is an alias, otherwise the key itself.
    AlwaysRealName,
    /// Real name if the key is an alias, otherwise empty.
    RealNameFromAlias,
    /// Alias if the key is a real name that has one, otherwise empty.
    AliasFromRealName,
}

#[derive(Copy, Clone, Debug)]
struct AliasEntry {
    /// The other side of the pair.
    counterpart: Identifier,
    /// True when the key of this entry is the alias.
    key_is_alias: bool,
}

type Cleanup = Box<dyn FnOnce() + Send>;

/// Owner of all AST memory for one compilation.
pub struct Context {
    id: ContextId,
    identifiers: SharedIdentifierTable,
    arenas: [Arena; 2],
    module_aliases: FxHashMap<Identifier, AliasEntry>,
    loaded_modules: Vec<(Identifier, NodeId<ModuleDecl>)>,
    loaded_module_index: FxHashMap<Identifier, usize>,
    main_module: Option<NodeId<ModuleDecl>>,
    builtin: Builtin,
    cleanups: Vec<Cleanup>,
}

impl Context {
    pub fn new() -> Self {
        Self::with_options(&ContextOptions::default())
    }

    pub fn with_options(options: &ContextOptions) -> Self {
        let table = if options.pre_intern_keywords {
            IdentifierTable::with_keywords()
        } else {
            IdentifierTable::new()
        };
        let mut ctx = Context {
            id: ContextId::fresh(),
            identifiers: SharedIdentifierTable::new(table),
            arenas: [
                Arena::default(),
                Arena::with_capacity(options.compilation_arena_capacity),
            ],
            module_aliases: FxHashMap::default(),
            loaded_modules: Vec::new(),
            loaded_module_index: FxHashMap::default(),
            main_module: None,
            builtin: Builtin::default(),
            cleanups: Vec::new(),
        };
        ctx.builtin = Builtin::allocate(&mut ctx);
        tracing::debug!(ctx = ctx.id.raw(), "created context");
        ctx
    }

    #[inline]
    pub fn id(&self) -> ContextId {
        self.id
    }

    // Memory

    /// Allocate raw storage in `arena`. See [`RawArena::allocate`](crate::RawArena::allocate).
    pub fn allocate(&self, bytes: usize, alignment: usize, arena: ArenaKind) -> NonNull<u8> {
        self.arenas[arena.index()].raw.allocate(bytes, alignment)
    }

    /// Raw bytes handed out by [`Context::allocate`] across both arenas.
    pub fn total_memory_allocated(&self) -> usize {
        self.arenas.iter().map(|a| a.raw.bytes_requested()).sum()
    }

    /// Number of node slots, reserved ones included, in `arena`.
    pub fn node_count(&self, arena: ArenaKind) -> usize {
        self.arenas[arena.index()].nodes.node_count()
    }

    /// Register a callback to run when the context is dropped.
    pub fn add_cleanup(&mut self, cleanup: impl FnOnce() + Send + 'static) {
        self.cleanups.push(Box::new(cleanup));
    }

    // Nodes

    #[inline]
    pub(crate) fn check_owned<T>(&self, id: NodeId<T>) {
        assert!(
            id.context() == self.id,
            "node handle {id:?} used with context {:?}",
            self.id
        );
    }

    /// Construct `node` into a fresh slot of `arena`.
    pub fn create<T: AstNode>(&mut self, arena: ArenaKind, node: T) -> NodeId<T> {
        let index = T::pool_mut(&mut self.arenas[arena.index()].nodes).push(node);
        NodeId::new(index, arena, self.id)
    }

    /// Reserve a slot in `arena` whose handle is known before the node is built.
    pub fn reserve<T: AstNode>(&mut self, arena: ArenaKind) -> ReservedNode<T> {
        let index = T::pool_mut(&mut self.arenas[arena.index()].nodes).reserve();
        ReservedNode::new(NodeId::new(index, arena, self.id))
    }

    /// Fill a slot obtained from [`Context::reserve`].
    pub fn emplace<T: AstNode>(&mut self, reserved: ReservedNode<T>, node: T) -> NodeId<T> {
        let id = reserved.id();
        self.check_owned(id);
        T::pool_mut(&mut self.arenas[id.arena().index()].nodes).fill(id.index(), node, T::NAME);
        id
    }

    /// Resolve a handle.
    ///
    /// # Panics
    /// Panics if the handle belongs to another context or names a reserved
    /// slot that was never emplaced.
    pub fn get<T: AstNode>(&self, id: NodeId<T>) -> &T {
        self.check_owned(id);
        T::pool(&self.arenas[id.arena().index()].nodes).get(id.index(), T::NAME)
    }

    pub(crate) fn alloc_params(
        &mut self,
        arena: ArenaKind,
        params: Vec<NodeId<ParamDecl>>,
    ) -> ParamRange {
        let list = &mut self.arenas[arena.index()].params;
        let start = u32::try_from(list.len())
            .unwrap_or_else(|_| panic!("parameter list exceeded {} entries", u32::MAX));
        let len = u32::try_from(params.len())
            .unwrap_or_else(|_| panic!("parameter range exceeded {} entries", u32::MAX));
        list.extend(params);
        ParamRange { arena, start, len }
    }

    /// The parameter handles in `range`.
    pub fn params(&self, range: ParamRange) -> &[NodeId<ParamDecl>] {
        let start = range.start as usize;
        &self.arenas[range.arena.index()].params[start..start + range.len()]
    }

    // Identifiers

    /// Intern `text`.
    #[inline]
    pub fn get_identifier(&self, text: &str) -> Identifier {
        self.identifiers.intern(text)
    }

    /// The spelling of `id`.
    ///
    /// # Panics
    /// Panics if `id` was interned by another context.
    #[inline]
    pub fn identifier_str(&self, id: Identifier) -> Arc<str> {
        self.identifiers.lookup(id)
    }

    /// Shared handle to the identifier table, for consumers that outlive a borrow.
    pub fn identifiers(&self) -> &SharedIdentifierTable {
        &self.identifiers
    }

    // Modules

    /// Record `alias=real` module name pairs (`-module-alias`).
    ///
    /// Both directions are stored, so a later lookup can ask for either side.
    pub fn set_module_aliases<A, R>(&mut self, pairs: impl IntoIterator<Item = (A, R)>)
    where
        A: AsRef<str>,
        R: AsRef<str>,
    {
        for (alias, real) in pairs {
            let alias = self.get_identifier(alias.as_ref());
            let real = self.get_identifier(real.as_ref());
            self.module_aliases.insert(
                alias,
                AliasEntry {
                    counterpart: real,
                    key_is_alias: true,
                },
            );
            self.module_aliases.insert(
                real,
                AliasEntry {
                    counterpart: alias,
                    key_is_alias: false,
                },
            );
            tracing::debug!(
                alias = %self.identifier_str(alias),
                real = %self.identifier_str(real),
                "module alias"
            );
        }
    }

    /// Resolve a module name through the alias map.
    ///
    /// A key with no alias entry always comes back unchanged.
    pub fn get_real_module_name(&self, key: Identifier, lookup: ModuleAliasLookup) -> Identifier {
        let Some(entry) = self.module_aliases.get(&key) else {
            return key;
        };
        match lookup {
            ModuleAliasLookup::AlwaysRealName => {
                if entry.key_is_alias {
                    entry.counterpart
                } else {
                    key
                }
            }
            ModuleAliasLookup::RealNameFromAlias if !entry.key_is_alias => Identifier::EMPTY,
            ModuleAliasLookup::AliasFromRealName if entry.key_is_alias => Identifier::EMPTY,
            ModuleAliasLookup::RealNameFromAlias | ModuleAliasLookup::AliasFromRealName => {
                entry.counterpart
            }
        }
    }

    /// Record a loaded module under its real name.
    ///
    /// Re-adding a module with the same real name replaces the earlier entry
    /// in place, keeping load order.
    pub fn add_loaded_module(&mut self, module: NodeId<ModuleDecl>) {
        let name = self.get(module).name();
        let real = self.get_real_module_name(name, ModuleAliasLookup::AlwaysRealName);
        if let Some(&slot) = self.loaded_module_index.get(&real) {
            self.loaded_modules[slot].1 = module;
        } else {
            self.loaded_module_index
                .insert(real, self.loaded_modules.len());
            self.loaded_modules.push((real, module));
        }
        tracing::debug!(module = %self.identifier_str(real), "loaded module");
    }

    /// The loaded module for `name`, which may be an alias.
    pub fn get_loaded_module(&self, name: Identifier) -> Option<NodeId<ModuleDecl>> {
        let real = self.get_real_module_name(name, ModuleAliasLookup::AlwaysRealName);
        self.loaded_module_index
            .get(&real)
            .map(|&slot| self.loaded_modules[slot].1)
    }

    /// Loaded modules in load order, keyed by real name.
    pub fn loaded_modules(&self) -> impl Iterator<Item = (Identifier, NodeId<ModuleDecl>)> + '_ {
        self.loaded_modules.iter().copied()
    }

    pub fn set_main_module(&mut self, module: NodeId<ModuleDecl>) {
        self.check_owned(module);
        self.main_module = Some(module);
    }

    pub fn main_module(&self) -> Option<NodeId<ModuleDecl>> {
        self.main_module
    }

    // Builtin types

    pub fn builtin(&self) -> &Builtin {
        &self.builtin
    }

    #[inline]
    pub fn builtin_type(&self, kind: BuiltinTypeKind) -> NodeId<BuiltinType> {
        self.builtin.get(kind)
    }

    /// The builtin type spelled `name`, if any.
    pub fn get_builtin_type(&self, name: &str) -> Option<NodeId<BuiltinType>> {
        self.identifiers
            .get(name)
            .and_then(|id| self.builtin.lookup(id))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: AstNode> Index<NodeId<T>> for Context {
    type Output = T;

    fn index(&self, id: NodeId<T>) -> &T {
        self.get(id)
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        let cleanups = std::mem::take(&mut self.cleanups);
        tracing::debug!(
            ctx = self.id.raw(),
            cleanups = cleanups.len(),
            bytes = self.total_memory_allocated(),
            "dropping context"
        );
        for cleanup in cleanups {
            cleanup();
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("identifiers", &self.identifiers.len())
            .field("loaded_modules", &self.loaded_modules.len())
            .field("bytes", &self.total_memory_allocated())
            .finish_non_exhaustive()
    }
}
