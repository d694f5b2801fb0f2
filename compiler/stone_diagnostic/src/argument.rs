//! Diagnostic arguments and message formatting.

use smallvec::SmallVec;
use std::fmt::Write;
use stone_ast::{DeclKind, Identifier, IdentifierLookup, TokenKind};

/// Front-end entity passed to a diagnostic.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SyntaxArgument {
    Identifier(Identifier),
    DeclKind(DeclKind),
}

/// One argument of a diagnostic.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum DiagnosticArgument {
    Bool(bool),
    Int(i64),
    UInt(u64),
    CStr(&'static str),
    String(String),
    Token(TokenKind),
    Syntax(SyntaxArgument),
}

impl DiagnosticArgument {
    /// Append the rendered argument to `out`.
    ///
    /// Identifiers need a table to be spelled; without one they render as
    /// their raw handle.
    pub fn render(&self, out: &mut String, identifiers: Option<&dyn IdentifierLookup>) {
        // Writing into a String cannot fail.
        let _ = match self {
            DiagnosticArgument::Bool(b) => write!(out, "{b}"),
            DiagnosticArgument::Int(i) => write!(out, "{i}"),
            DiagnosticArgument::UInt(u) => write!(out, "{u}"),
            DiagnosticArgument::CStr(s) => write!(out, "{s}"),
            DiagnosticArgument::String(s) => write!(out, "{s}"),
            DiagnosticArgument::Token(kind) => write!(out, "{kind}"),
            DiagnosticArgument::Syntax(SyntaxArgument::DeclKind(kind)) => write!(out, "{kind}"),
            DiagnosticArgument::Syntax(SyntaxArgument::Identifier(id)) => match identifiers {
                Some(table) => write!(out, "{}", table.lookup(*id)),
                None => write!(out, "#{}", id.index()),
            },
        };
    }
}

impl From<bool> for DiagnosticArgument {
    fn from(v: bool) -> Self {
        DiagnosticArgument::Bool(v)
    }
}

impl From<i64> for DiagnosticArgument {
    fn from(v: i64) -> Self {
        DiagnosticArgument::Int(v)
    }
}

impl From<u64> for DiagnosticArgument {
    fn from(v: u64) -> Self {
        DiagnosticArgument::UInt(v)
    }
}

impl From<&'static str> for DiagnosticArgument {
    fn from(v: &'static str) -> Self {
        DiagnosticArgument::CStr(v)
    }
}

impl From<String> for DiagnosticArgument {
    fn from(v: String) -> Self {
        DiagnosticArgument::String(v)
    }
}

impl From<TokenKind> for DiagnosticArgument {
    fn from(v: TokenKind) -> Self {
        DiagnosticArgument::Token(v)
    }
}

impl From<Identifier> for DiagnosticArgument {
    fn from(v: Identifier) -> Self {
        DiagnosticArgument::Syntax(SyntaxArgument::Identifier(v))
    }
}

impl From<DeclKind> for DiagnosticArgument {
    fn from(v: DeclKind) -> Self {
        DiagnosticArgument::Syntax(SyntaxArgument::DeclKind(v))
    }
}

impl From<SyntaxArgument> for DiagnosticArgument {
    fn from(v: SyntaxArgument) -> Self {
        DiagnosticArgument::Syntax(v)
    }
}

/// Inline storage for a diagnostic's arguments.
pub type DiagnosticArguments = SmallVec<[DiagnosticArgument; 3]>;

/// Argument tuple of a typed catalog entry.
pub trait DiagArgs {
    fn into_arguments(self) -> DiagnosticArguments;
}

impl DiagArgs for () {
    fn into_arguments(self) -> DiagnosticArguments {
        SmallVec::new()
    }
}

macro_rules! impl_diag_args {
    ($($name:ident),+) => {
        impl<$($name: Into<DiagnosticArgument>),+> DiagArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_arguments(self) -> DiagnosticArguments {
                let ($($name,)+) = self;
                let mut args = SmallVec::new();
                $(args.push($name.into());)+
                args
            }
        }
    };
}

impl_diag_args!(A);
impl_diag_args!(A, B);
impl_diag_args!(A, B, C);
impl_diag_args!(A, B, C, D);

/// Substitute `%N` placeholders in `format` with rendered `args`.
///
/// `%%` yields a single `%`. A placeholder without a matching argument is
/// kept verbatim.
pub fn format_diagnostic_text(
    format: &str,
    args: &[DiagnosticArgument],
    identifiers: Option<&dyn IdentifierLookup>,
) -> String {
    let mut out = String::with_capacity(format.len() + 16);
    let mut rest = format;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];

        if let Some(tail) = rest.strip_prefix('%') {
            out.push('%');
            rest = tail;
            continue;
        }

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            out.push('%');
            continue;
        }
        let (index, tail) = rest.split_at(digits);
        match index.parse::<usize>().ok().and_then(|i| args.get(i)) {
            Some(arg) => arg.render(&mut out, identifiers),
            None => {
                out.push('%');
                out.push_str(index);
            }
        }
        rest = tail;
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests;
