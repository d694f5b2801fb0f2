//! Token kinds of the Stone language.
//!
//! The lexer lives outside this crate; token kinds are defined here because
//! diagnostics carry them as arguments ("expected `)`") and the identifier
//! table pre-interns the keyword spellings.

use std::fmt;

macro_rules! define_token_kinds {
    (
        keywords { $($kw:ident => $kw_text:literal,)* }
        punctuation { $($punct:ident => $punct_text:literal,)* }
        other { $($other:ident => $other_text:literal,)* }
    ) => {
        /// Kind of a lexical token.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum TokenKind {
            $($kw,)*
            $($punct,)*
            $($other,)*
        }

        impl TokenKind {
            /// Every keyword kind, in declaration order.
            pub const KEYWORDS: &'static [TokenKind] = &[$(TokenKind::$kw,)*];

            /// Source spelling, or a description for tokens without a fixed one.
            pub const fn spelling(self) -> &'static str {
                match self {
                    $(TokenKind::$kw => $kw_text,)*
                    $(TokenKind::$punct => $punct_text,)*
                    $(TokenKind::$other => $other_text,)*
                }
            }

            pub const fn is_keyword(self) -> bool {
                matches!(self, $(TokenKind::$kw)|*)
            }

            pub const fn is_punctuation(self) -> bool {
                matches!(self, $(TokenKind::$punct)|*)
            }

            /// Resolve a keyword spelling.
            pub fn keyword(text: &str) -> Option<TokenKind> {
                match text {
                    $($kw_text => Some(TokenKind::$kw),)*
                    _ => None,
                }
            }
        }
    };
}

define_token_kinds! {
    keywords {
        KwUnderscore => "_",
        KwAlias => "alias",
        KwAny => "any",
        KwAuto => "auto",
        KwBool => "bool",
        KwByte => "byte",
        KwChar => "char",
        KwClass => "class",
        KwConst => "const",
        KwDelete => "delete",
        KwEnum => "enum",
        KwExtern => "extern",
        KwFalse => "false",
        KwFinal => "final",
        KwFloat => "float",
        KwFloat32 => "float32",
        KwFloat64 => "float64",
        KwFun => "fun",
        KwImport => "import",
        KwInline => "inline",
        KwInt => "int",
        KwInt8 => "int8",
        KwInt16 => "int16",
        KwInt32 => "int32",
        KwInt64 => "int64",
        KwInterface => "interface",
        KwInternal => "internal",
        KwMutable => "mutable",
        KwNew => "new",
        KwNull => "null",
        KwPrivate => "private",
        KwPublic => "public",
        KwPure => "pure",
        KwRegister => "register",
        KwRestrict => "restrict",
        KwReturn => "return",
        KwSelf => "self",
        KwSpace => "space",
        KwStatic => "static",
        KwStone => "stone",
        KwString => "string",
        KwStruct => "struct",
        KwThis => "this",
        KwTrue => "true",
        KwUInt => "uint",
        KwUInt8 => "uint8",
        KwUInt16 => "uint16",
        KwUInt32 => "uint32",
        KwUInt64 => "uint64",
        KwVar => "var",
        KwVoid => "void",
        KwVolatile => "volatile",
    }
    punctuation {
        LParen => "(",
        RParen => ")",
        LBrace => "{",
        RBrace => "}",
        LSquare => "[",
        RSquare => "]",
        Comma => ",",
        Colon => ":",
        ColonColon => "::",
        Semi => ";",
        Dot => ".",
        Arrow => "->",
        Equal => "=",
        EqualEqual => "==",
        Bang => "!",
        Plus => "+",
        Minus => "-",
        Star => "*",
        Slash => "/",
        Amp => "&",
        Less => "<",
        Greater => ">",
    }
    other {
        Identifier => "identifier",
        IntegerLiteral => "integer literal",
        FloatLiteral => "floating-point literal",
        StringLiteral => "string literal",
        CharLiteral => "character literal",
        Eof => "end of file",
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

#[cfg(test)]
mod tests;
