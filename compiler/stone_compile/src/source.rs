//! Top-level declarations handed to a compilation.
//!
//! This is the shape a parser produces for each declaration it reads:
//! spelled names with their locations, before any of them is resolved.

use stone_ast::{DeclKind, Span};

/// One top-level declaration, as written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceDecl<'src> {
    Fun {
        name: &'src str,
        loc: Span,
        params: Vec<(&'src str, Span)>,
        /// False for a forward declaration.
        has_body: bool,
    },
    Struct {
        name: &'src str,
        loc: Span,
    },
    Var {
        name: &'src str,
        loc: Span,
        /// Spelled type name, resolved against builtins and structs.
        ty: &'src str,
        ty_loc: Span,
        is_mutable: bool,
    },
}

impl<'src> SourceDecl<'src> {
    pub fn name(&self) -> &'src str {
        match self {
            SourceDecl::Fun { name, .. }
            | SourceDecl::Struct { name, .. }
            | SourceDecl::Var { name, .. } => name,
        }
    }

    pub fn kind(&self) -> DeclKind {
        match self {
            SourceDecl::Fun { .. } => DeclKind::Fun,
            SourceDecl::Struct { .. } => DeclKind::Struct,
            SourceDecl::Var { .. } => DeclKind::Var,
        }
    }

    pub fn loc(&self) -> Span {
        match self {
            SourceDecl::Fun { loc, .. }
            | SourceDecl::Struct { loc, .. }
            | SourceDecl::Var { loc, .. } => *loc,
        }
    }
}

/// An `import` of another module.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SourceImport<'src> {
    pub module: &'src str,
    pub loc: Span,
}
