//! The diagnostic catalog.
//!
//! Every diagnostic the compiler can emit is declared once in the
//! `define_diagnostics!` table below: its base level, options, message
//! format and argument types. The table generates
//! - [`DiagId`], a dense `u32` index usable for bitsets,
//! - the static [`DiagInfo`] entries behind [`DiagId::info`],
//! - one typed [`Diag`] constant per entry in [`diag`], which is what call
//!   sites pass to `DiagnosticEngine::diagnose` so argument arity and
//!   types are checked at compile time.
//!
//! Message formats refer to arguments as `%0`, `%1`, ...; `%%` is a
//! literal percent sign.

use crate::DiagnosticLevel;
use bitflags::bitflags;
use std::fmt;
use std::marker::PhantomData;

bitflags! {
    /// Per-diagnostic behavior flags.
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct DiagOptions: u8 {
        /// The location is the first token the parser rejected. When that
        /// token starts a line, renderers report the end of the previous
        /// token instead.
        const POINTS_TO_FIRST_BAD_TOKEN = 1 << 0;
        /// Emitted as `Fatal` rather than its declared `Error`.
        const FATAL = 1 << 1;
    }
}

/// Static description of one diagnostic.
#[derive(Copy, Clone, Debug)]
pub struct DiagInfo {
    pub name: &'static str,
    pub level: DiagnosticLevel,
    pub options: DiagOptions,
    pub format: &'static str,
}

impl DiagInfo {
    /// Declared level with the `FATAL` option applied.
    pub fn base_level(&self) -> DiagnosticLevel {
        if self.options.contains(DiagOptions::FATAL) && self.level == DiagnosticLevel::Error {
            DiagnosticLevel::Fatal
        } else {
            self.level
        }
    }
}

/// Typed handle to a catalog entry; `A` is the argument tuple.
pub struct Diag<A> {
    id: DiagId,
    _args: PhantomData<fn(A)>,
}

impl<A> Diag<A> {
    pub const fn new(id: DiagId) -> Self {
        Diag {
            id,
            _args: PhantomData,
        }
    }

    #[inline]
    pub const fn id(self) -> DiagId {
        self.id
    }
}

impl<A> Clone for Diag<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Diag<A> {}

impl<A> fmt::Debug for Diag<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Diag({})", self.id.name())
    }
}

macro_rules! define_diagnostics {
    ($(
        $level:ident $name:ident($($arg:ty),*) [$($opt:ident),*] $format:literal;
    )*) => {
        /// Identifier of a catalog entry.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum DiagId {
            $($name,)*
        }

        static INFOS: &[DiagInfo] = &[$(
            DiagInfo {
                name: stringify!($name),
                level: DiagnosticLevel::$level,
                options: DiagOptions::empty()$(.union(DiagOptions::$opt))*,
                format: $format,
            },
        )*];

        impl DiagId {
            /// Every id, in catalog order.
            pub const ALL: &'static [DiagId] = &[$(DiagId::$name,)*];

            /// Number of catalog entries.
            pub const COUNT: usize = Self::ALL.len();
        }

        /// Typed catalog entries.
        #[expect(
            non_upper_case_globals,
            reason = "entries share their DiagId variant's name"
        )]
        pub mod diag {
            use super::{Diag, DiagId};
            use stone_ast::{DeclKind, Identifier, TokenKind};

            $(
                pub const $name: Diag<($($arg,)*)> = Diag::new(DiagId::$name);
            )*
        }
    };
}

define_diagnostics! {
    // Parsing
    Error ExpectedIdentifier(TokenKind) [POINTS_TO_FIRST_BAD_TOKEN]
        "expected identifier after '%0'";
    Error ExpectedToken(TokenKind) [POINTS_TO_FIRST_BAD_TOKEN]
        "expected '%0'";
    Error ExpectedExpression() [POINTS_TO_FIRST_BAD_TOKEN]
        "expected expression";
    Error ExpectedTypeAfter(TokenKind) [POINTS_TO_FIRST_BAD_TOKEN]
        "expected type after '%0'";
    Error UnexpectedToken(TokenKind) []
        "unexpected '%0' in declaration";
    Error IntegerLiteralOverflow(String, Identifier) []
        "integer literal '%0' overflows when stored into '%1'";

    // Declarations
    Error InvalidRedeclaration(Identifier) []
        "invalid redeclaration of '%0'";
    Error RedefinitionOfDecl(DeclKind, Identifier) []
        "redefinition of %0 '%1'";
    Error ParamCountMismatch(Identifier, u64, u64) []
        "function '%0' takes %1 parameters but this declaration has %2";
    Error UnknownType(Identifier) []
        "cannot find type '%0' in scope";
    Error NoSuchModule(Identifier) [FATAL]
        "no such module '%0'";
    Error ErrorOpeningOutput(String, String) [FATAL]
        "error opening '%0' for output: %1";

    // Warnings
    Warning UnusedVariable(Identifier) []
        "variable '%0' was never used";
    Warning UnreachableCode() []
        "will never be executed";
    Warning DeprecatedDecl(DeclKind, Identifier) []
        "%0 '%1' is deprecated";
    Warning ConditionAlwaysConstant(bool) []
        "condition is always '%0'";
    Warning MutableNeverMutated(Identifier) []
        "variable '%0' was declared 'mutable' but never mutated";
    Warning ModuleAliasUnused(Identifier) []
        "module alias '%0' is never imported";

    // Notes
    Note PreviousDeclaration(DeclKind) []
        "previous declaration of %0 is here";
    Note DeclaredHere(Identifier) []
        "'%0' declared here";
    Note RemoveMutable() []
        "remove 'mutable' to silence this warning";

    // Remarks
    Remark CompilingModule(Identifier) []
        "compiling module '%0'";
    Remark RedeclarationCount(Identifier, i64) []
        "'%0' has %1 redeclarations";
}

impl DiagId {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn info(self) -> &'static DiagInfo {
        &INFOS[self.index()]
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Resolve a diagnostic by catalog name.
    pub fn from_name(name: &str) -> Option<DiagId> {
        DiagId::ALL.iter().copied().find(|id| id.name() == name)
    }
}

impl fmt::Display for DiagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests;
