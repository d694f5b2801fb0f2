//! Stone AST core.
//!
//! Ownership model and shared vocabulary of the Stone front end:
//! - Spans for source locations
//! - Identifiers and the context-owned identifier table
//! - Token kinds (as diagnostic arguments and keyword spellings)
//! - Arenas, typed node handles and the allocation capability
//! - The [`Context`] that owns every node of a compilation
//! - Declaration nodes and their redeclaration chains
//! - Builtin types
//!
//! # Design Philosophy
//!
//! - **Handles, not pointers**: nodes are addressed by `NodeId<T>`, a `Copy`
//!   index tagged with its arena and context.
//! - **Region ownership**: nodes are created through a context and freed
//!   with it, never one at a time.
//! - **Intern spellings**: strings become `Identifier(u32)` with O(1) equality.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
mod builtin;
mod context;
mod decl;
mod identifier;
mod identifier_table;
mod node;
mod node_id;
mod options;
pub mod redecl;
mod span;
mod token;

pub use arena::{ArenaKind, RawArena};
pub use builtin::{Builtin, BuiltinType, BuiltinTypeKind};
pub use context::{Context, ModuleAliasLookup};
pub use decl::{Decl, DeclKind, FunDecl, ModuleDecl, ParamDecl, StructDecl, VarDecl};
pub use identifier::{Identifier, TableId};
pub use identifier_table::{
    IdentifierError, IdentifierLookup, IdentifierTable, SharedIdentifierTable,
};
pub use node::AstNode;
pub use node_id::{ContextId, NodeId, ParamRange, ReservedNode};
pub use options::ContextOptions;
pub use redecl::{DeclLink, Mergeable, RedeclLink, Redeclarable, Redecls};
pub use span::{Span, SpanError};
pub use token::TokenKind;
