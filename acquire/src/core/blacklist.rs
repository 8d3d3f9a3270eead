//! Per-run set of candidates excluded from selection.

use std::collections::BTreeSet;
use std::fmt;

use crate::core::types::EntityId;

/// Append-only set of entity identities. Membership is identity-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    ids: BTreeSet<EntityId>,
}

impl Blacklist {
    /// Returns false if `id` was already blacklisted.
    pub fn insert(&mut self, id: EntityId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ids.iter().copied()
    }
}

impl fmt::Display for Blacklist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, id) in self.ids.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", id)?;
        }
        f.write_str("]")
    }
}
