//! Builtin types.
//!
//! One [`BuiltinType`] node per [`BuiltinTypeKind`] is created in the
//! permanent arena when the context is built. [`Builtin`] maps kinds and
//! spellings to those nodes.

use crate::{ArenaKind, Context, Identifier, NodeId};
use rustc_hash::FxHashMap;

macro_rules! builtin_type_kinds {
    ($($kind:ident => $spelling:literal,)*) => {
        /// Every builtin type of the language.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum BuiltinTypeKind {
            $($kind,)*
        }

        impl BuiltinTypeKind {
            pub const ALL: &'static [BuiltinTypeKind] = &[$(BuiltinTypeKind::$kind,)*];

            /// Source spelling.
            pub const fn name(self) -> &'static str {
                match self {
                    $(BuiltinTypeKind::$kind => $spelling,)*
                }
            }
        }
    };
}

builtin_type_kinds! {
    Any => "any",
    Void => "void",
    Null => "null",
    Bool => "bool",
    Float16 => "float16",
    Float32 => "float32",
    Float64 => "float64",
    Float128 => "float128",
    Float => "float",
    Int8 => "int8",
    Int16 => "int16",
    Int32 => "int32",
    Int64 => "int64",
    Int128 => "int128",
    Int => "int",
    UInt8 => "uint8",
    UInt16 => "uint16",
    UInt32 => "uint32",
    UInt64 => "uint64",
    UInt128 => "uint128",
    UInt => "uint",
}

impl BuiltinTypeKind {
    pub const fn is_signed_integer(self) -> bool {
        use BuiltinTypeKind::{Int, Int128, Int16, Int32, Int64, Int8};
        matches!(self, Int8 | Int16 | Int32 | Int64 | Int128 | Int)
    }

    pub const fn is_unsigned_integer(self) -> bool {
        use BuiltinTypeKind::{UInt, UInt128, UInt16, UInt32, UInt64, UInt8};
        matches!(self, UInt8 | UInt16 | UInt32 | UInt64 | UInt128 | UInt)
    }

    pub const fn is_integer(self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    pub const fn is_float(self) -> bool {
        use BuiltinTypeKind::{Float, Float128, Float16, Float32, Float64};
        matches!(self, Float16 | Float32 | Float64 | Float128 | Float)
    }

    /// Fixed bit width, `None` for the target-sized and non-numeric kinds.
    pub const fn bit_width(self) -> Option<u32> {
        use BuiltinTypeKind as K;
        match self {
            K::Int8 | K::UInt8 => Some(8),
            K::Int16 | K::UInt16 | K::Float16 => Some(16),
            K::Int32 | K::UInt32 | K::Float32 => Some(32),
            K::Int64 | K::UInt64 | K::Float64 => Some(64),
            K::Int128 | K::UInt128 | K::Float128 => Some(128),
            K::Any | K::Void | K::Null | K::Bool | K::Float | K::Int | K::UInt => None,
        }
    }
}

/// Builtin type node.
pub struct BuiltinType {
    kind: BuiltinTypeKind,
    name: Identifier,
}

impl BuiltinType {
    pub fn kind(&self) -> BuiltinTypeKind {
        self.kind
    }

    pub fn name(&self) -> Identifier {
        self.name
    }
}

/// Lookup table for the builtin type nodes of one context.
#[derive(Default)]
pub struct Builtin {
    types: Vec<NodeId<BuiltinType>>,
    by_name: FxHashMap<Identifier, BuiltinTypeKind>,
}

impl Builtin {
    pub(crate) fn allocate(ctx: &mut Context) -> Builtin {
        let mut builtin = Builtin {
            types: Vec::with_capacity(BuiltinTypeKind::ALL.len()),
            by_name: FxHashMap::default(),
        };
        for &kind in BuiltinTypeKind::ALL {
            let name = ctx.get_identifier(kind.name());
            let id = ctx.create(ArenaKind::Permanent, BuiltinType { kind, name });
            builtin.types.push(id);
            builtin.by_name.insert(name, kind);
        }
        builtin
    }

    /// The node for `kind`.
    pub fn get(&self, kind: BuiltinTypeKind) -> NodeId<BuiltinType> {
        self.types[kind as usize]
    }

    /// The node spelled `name`, if it names a builtin type.
    pub fn lookup(&self, name: Identifier) -> Option<NodeId<BuiltinType>> {
        self.by_name.get(&name).map(|&kind| self.get(kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId<BuiltinType>> + '_ {
        self.types.iter().copied()
    }
}

#[cfg(test)]
mod tests;
