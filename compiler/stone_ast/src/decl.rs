//! Declaration nodes.
//!
//! Functions, structs and variables are redeclarable: every syntactic
//! occurrence gets its own node and the occurrences form a chain (see
//! [`crate::redecl`]). Modules are mergeable: one node per module, with
//! cross-module reconciliation left to the loader.

use crate::redecl::{Mergeable, RedeclLink, Redeclarable};
use crate::{ArenaKind, AstNode, Context, Identifier, NodeId, ParamRange, Span};
use std::fmt;

/// What kind of entity a declaration introduces.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DeclKind {
    Fun,
    Param,
    Struct,
    Var,
    Module,
}

impl DeclKind {
    /// Spelling used in diagnostics ("redefinition of function 'f'").
    pub const fn name(self) -> &'static str {
        match self {
            DeclKind::Fun => "function",
            DeclKind::Param => "parameter",
            DeclKind::Struct => "struct",
            DeclKind::Var => "variable",
            DeclKind::Module => "module",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common surface of every declaration node.
pub trait Decl: AstNode {
    const KIND: DeclKind;

    fn name(&self) -> Identifier;

    fn loc(&self) -> Span;

    fn kind(&self) -> DeclKind {
        Self::KIND
    }
}

macro_rules! impl_decl {
    ($($ty:ident => $kind:ident),* $(,)?) => {
        $(
            impl Decl for $ty {
                const KIND: DeclKind = DeclKind::$kind;

                #[inline]
                fn name(&self) -> Identifier {
                    self.name
                }

                #[inline]
                fn loc(&self) -> Span {
                    self.loc
                }
            }
        )*
    };
}

impl_decl! {
    FunDecl => Fun,
    ParamDecl => Param,
    StructDecl => Struct,
    VarDecl => Var,
    ModuleDecl => Module,
}

/// Function declaration. Its parameters live in the arena's parameter list.
pub struct FunDecl {
    name: Identifier,
    loc: Span,
    params: ParamRange,
    has_body: bool,
    redecl: RedeclLink<FunDecl>,
}

impl FunDecl {
    /// Create a function and its parameters in `arena`.
    ///
    /// The function slot is reserved first so each parameter can record
    /// its owner before the function itself exists.
    pub fn create(
        ctx: &mut Context,
        arena: ArenaKind,
        name: Identifier,
        loc: Span,
        params: &[(Identifier, Span)],
        has_body: bool,
    ) -> NodeId<FunDecl> {
        let reserved = ctx.reserve::<FunDecl>(arena);
        let owner = reserved.id();
        let param_ids: Vec<NodeId<ParamDecl>> = params
            .iter()
            .map(|&(name, loc)| ctx.create(arena, ParamDecl { name, loc, owner }))
            .collect();
        let params = ctx.alloc_params(arena, param_ids);
        ctx.emplace(
            reserved,
            FunDecl {
                name,
                loc,
                params,
                has_body,
                redecl: RedeclLink::new(owner),
            },
        )
    }

    pub fn params(&self) -> ParamRange {
        self.params
    }

    /// Whether this occurrence is a definition rather than a forward declaration.
    pub fn has_body(&self) -> bool {
        self.has_body
    }
}

/// Function parameter, owned by the function that declares it.
pub struct ParamDecl {
    name: Identifier,
    loc: Span,
    owner: NodeId<FunDecl>,
}

impl ParamDecl {
    pub fn owner(&self) -> NodeId<FunDecl> {
        self.owner
    }
}

/// Struct declaration.
pub struct StructDecl {
    name: Identifier,
    loc: Span,
    redecl: RedeclLink<StructDecl>,
}

impl StructDecl {
    pub fn create(
        ctx: &mut Context,
        arena: ArenaKind,
        name: Identifier,
        loc: Span,
    ) -> NodeId<StructDecl> {
        let reserved = ctx.reserve::<StructDecl>(arena);
        let redecl = RedeclLink::new(reserved.id());
        ctx.emplace(reserved, StructDecl { name, loc, redecl })
    }
}

/// Variable declaration.
pub struct VarDecl {
    name: Identifier,
    loc: Span,
    is_mutable: bool,
    redecl: RedeclLink<VarDecl>,
}

impl VarDecl {
    pub fn create(
        ctx: &mut Context,
        arena: ArenaKind,
        name: Identifier,
        loc: Span,
        is_mutable: bool,
    ) -> NodeId<VarDecl> {
        let reserved = ctx.reserve::<VarDecl>(arena);
        let redecl = RedeclLink::new(reserved.id());
        ctx.emplace(
            reserved,
            VarDecl {
                name,
                loc,
                is_mutable,
                redecl,
            },
        )
    }

    pub fn is_mutable(&self) -> bool {
        self.is_mutable
    }
}

/// Module declaration.
pub struct ModuleDecl {
    name: Identifier,
    loc: Span,
    is_main: bool,
}

impl ModuleDecl {
    pub fn create(
        ctx: &mut Context,
        arena: ArenaKind,
        name: Identifier,
        loc: Span,
        is_main: bool,
    ) -> NodeId<ModuleDecl> {
        ctx.create(arena, ModuleDecl { name, loc, is_main })
    }

    pub fn is_main(&self) -> bool {
        self.is_main
    }
}

impl Redeclarable for FunDecl {
    fn redecl_link(&self) -> &RedeclLink<Self> {
        &self.redecl
    }
}

impl Redeclarable for StructDecl {
    fn redecl_link(&self) -> &RedeclLink<Self> {
        &self.redecl
    }
}

impl Redeclarable for VarDecl {
    fn redecl_link(&self) -> &RedeclLink<Self> {
        &self.redecl
    }
}

impl Mergeable for ModuleDecl {}
