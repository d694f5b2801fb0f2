//! Interned identifier handle.

use std::fmt;
use std::num::NonZeroU32;

/// Identity of the [`IdentifierTable`](crate::IdentifierTable) that issued
/// an identifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TableId(NonZeroU32);

impl TableId {
    #[inline]
    pub(crate) const fn new(raw: NonZeroU32) -> Self {
        TableId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0.get()
    }
}

/// Interned identifier: a dense index into the table that issued it.
///
/// Two identifiers compare equal iff they were interned into the same table
/// with the same (case-sensitive) spelling. The empty spelling is shared by
/// every table and has no owner.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Identifier {
    index: u32,
    table: Option<TableId>,
}

crate::static_assert_size!(Identifier, 8);

impl Identifier {
    /// The empty spelling. Also the "no result" value of alias lookups.
    pub const EMPTY: Identifier = Identifier {
        index: 0,
        table: None,
    };

    #[inline]
    pub(crate) const fn new(table: TableId, index: u32) -> Self {
        Identifier {
            index,
            table: Some(table),
        }
    }

    /// Position of the spelling in its table.
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// The issuing table, `None` for [`Identifier::EMPTY`].
    #[inline]
    pub const fn table(self) -> Option<TableId> {
        self.table
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.table.is_none()
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table {
            None => write!(f, "Identifier::EMPTY"),
            Some(table) => write!(f, "Identifier({}@t{})", self.index, table.raw()),
        }
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::EMPTY
    }
}
