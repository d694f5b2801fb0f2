//! Identifier table.
//!
//! Each context owns one table. The table owns every spelling it hands out,
//! so dropping the last handle to it frees them all. Spellings are stored as
//! `Arc<str>` shared between the index and the lookup map; `lookup` hands
//! out a clone, which stays valid even while other code keeps interning.
//!
//! Interning takes `&self` behind a single `RwLock`, so the table can be
//! shared with diagnostic consumers and worker threads.

use crate::{Identifier, TableId, TokenKind};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

static NEXT_TABLE: AtomicU32 = AtomicU32::new(1);

/// Error when interning an identifier fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Every `u32` index is taken.
    TableFull { count: usize },
}

impl std::fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierError::TableFull { count } => {
                write!(f, "identifier table is full: {count} spellings")
            }
        }
    }
}

impl std::error::Error for IdentifierError {}

#[derive(Default)]
struct Spellings {
    by_text: FxHashMap<Arc<str>, u32>,
    /// Index 0 is the empty spelling.
    by_index: Vec<Arc<str>>,
}

/// Interns identifier spellings into [`Identifier`] handles.
pub struct IdentifierTable {
    id: TableId,
    spellings: RwLock<Spellings>,
}

impl IdentifierTable {
    /// Create a table holding only the empty spelling.
    pub fn new() -> Self {
        let raw = NEXT_TABLE.fetch_add(1, Ordering::Relaxed);
        // Wrapping past u32::MAX tables reuses ids; 0 is skipped.
        let raw = NonZeroU32::new(raw).unwrap_or(NonZeroU32::MIN);
        let empty: Arc<str> = Arc::from("");
        let mut spellings = Spellings::default();
        spellings.by_text.insert(empty.clone(), 0);
        spellings.by_index.push(empty);
        IdentifierTable {
            id: TableId::new(raw),
            spellings: RwLock::new(spellings),
        }
    }

    /// Create a table with every language keyword already interned.
    pub fn with_keywords() -> Self {
        let table = Self::new();
        for kw in TokenKind::KEYWORDS {
            table.intern(kw.spelling());
        }
        table
    }

    #[inline]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Whether `id` was issued by this table (or is the shared empty one).
    #[inline]
    pub fn owns(&self, id: Identifier) -> bool {
        id.is_empty() || id.table() == Some(self.id)
    }

    fn handle(&self, index: u32) -> Identifier {
        if index == 0 {
            Identifier::EMPTY
        } else {
            Identifier::new(self.id, index)
        }
    }

    /// Intern `text`, or report that the table has no index left for it.
    pub fn try_intern(&self, text: &str) -> Result<Identifier, IdentifierError> {
        if let Some(&index) = self.spellings.read().by_text.get(text) {
            return Ok(self.handle(index));
        }

        let mut spellings = self.spellings.write();
        // Another writer may have interned it between the two locks.
        if let Some(&index) = spellings.by_text.get(text) {
            return Ok(self.handle(index));
        }
        let count = spellings.by_index.len();
        let index = u32::try_from(count).map_err(|_| IdentifierError::TableFull { count })?;
        let spelling: Arc<str> = Arc::from(text);
        spellings.by_text.insert(spelling.clone(), index);
        spellings.by_index.push(spelling);
        Ok(self.handle(index))
    }

    /// Intern `text`.
    ///
    /// # Panics
    /// Panics once `u32::MAX` spellings are interned.
    #[inline]
    pub fn intern(&self, text: &str) -> Identifier {
        match self.try_intern(text) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    /// The spelling of `id`.
    ///
    /// # Panics
    /// Panics if `id` was issued by another table.
    pub fn lookup(&self, id: Identifier) -> Arc<str> {
        assert!(
            self.owns(id),
            "identifier {id:?} resolved against table t{}",
            self.id.raw()
        );
        let spellings = self.spellings.read();
        usize::try_from(id.index())
            .ok()
            .and_then(|index| spellings.by_index.get(index))
            .cloned()
            .unwrap_or_else(|| panic!("identifier {id:?} is not in table t{}", self.id.raw()))
    }

    /// The identifier for `text`, if it was interned already.
    pub fn get(&self, text: &str) -> Option<Identifier> {
        let index = *self.spellings.read().by_text.get(text)?;
        Some(self.handle(index))
    }

    /// Number of interned spellings, the empty one included.
    pub fn len(&self) -> usize {
        self.spellings.read().by_index.len()
    }

    /// True when only the empty spelling is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for IdentifierTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdentifierTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierTable")
            .field("id", &self.id)
            .field("len", &self.len())
            .finish()
    }
}

/// Read access to identifier spellings.
///
/// Lets diagnostic rendering resolve identifiers without depending on how
/// the table is owned.
pub trait IdentifierLookup {
    fn lookup(&self, id: Identifier) -> Arc<str>;
}

impl IdentifierLookup for IdentifierTable {
    fn lookup(&self, id: Identifier) -> Arc<str> {
        IdentifierTable::lookup(self, id)
    }
}

/// Reference-counted identifier table.
///
/// The context owns one of these; consumers that render identifiers after
/// the fact (printers, tooling) clone the handle instead of borrowing the
/// context. The spellings are freed with the last clone.
#[derive(Clone, Debug)]
pub struct SharedIdentifierTable(Arc<IdentifierTable>);

impl SharedIdentifierTable {
    pub fn new(table: IdentifierTable) -> Self {
        SharedIdentifierTable(Arc::new(table))
    }
}

impl Default for SharedIdentifierTable {
    fn default() -> Self {
        Self::new(IdentifierTable::with_keywords())
    }
}

impl std::ops::Deref for SharedIdentifierTable {
    type Target = IdentifierTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IdentifierLookup for SharedIdentifierTable {
    fn lookup(&self, id: Identifier) -> Arc<str> {
        self.0.lookup(id)
    }
}

#[cfg(test)]
mod tests;
