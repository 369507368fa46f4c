use rustc_hash::{FxHashMap, FxHashSet};

use crate::kernel::EntityKey;

/// Outcome of offering a key to a [`KeyTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visit {
    /// Not seen before; the caller should try to build it.
    Fresh,
    /// Already registered under this id.
    Known(usize),
    /// Already tried and skipped.
    Skipped,
}

/// Dense id assignment for one entity kind.
///
/// Ids are handed out in first-visit order starting at zero, and only to
/// entities that were successfully built. A key that failed once is
/// remembered so later visits through other parents do not count it again.
#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    ids: FxHashMap<EntityKey, usize>,
    keys: Vec<EntityKey>,
    skipped: FxHashSet<EntityKey>,
}

impl KeyTable {
    pub(crate) fn visit(&self, key: EntityKey) -> Visit {
        if let Some(&id) = self.ids.get(&key) {
            Visit::Known(id)
        } else if self.skipped.contains(&key) {
            Visit::Skipped
        } else {
            Visit::Fresh
        }
    }

    pub(crate) fn assign(&mut self, key: EntityKey) -> usize {
        *self.ids.entry(key).or_insert_with(|| {
            self.keys.push(key);
            self.keys.len() - 1
        })
    }

    /// Returns `true` if the key was not already skipped.
    pub(crate) fn skip(&mut self, key: EntityKey) -> bool {
        self.skipped.insert(key)
    }

    #[must_use]
    pub fn id_of(&self, key: EntityKey) -> Option<usize> {
        self.ids.get(&key).copied()
    }

    #[must_use]
    pub fn key_of(&self, id: usize) -> Option<EntityKey> {
        self.keys.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.len()
    }
}

/// Identity maps for vertices, edges and faces of one extraction run.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    pub(crate) vertices: KeyTable,
    pub(crate) edges: KeyTable,
    pub(crate) faces: KeyTable,
}

impl EntityRegistry {
    #[must_use]
    pub fn vertices(&self) -> &KeyTable {
        &self.vertices
    }

    #[must_use]
    pub fn edges(&self) -> &KeyTable {
        &self.edges
    }

    #[must_use]
    pub fn faces(&self) -> &KeyTable {
        &self.faces
    }

    #[must_use]
    pub fn id_of_vertex(&self, key: EntityKey) -> Option<usize> {
        self.vertices.id_of(key)
    }

    #[must_use]
    pub fn id_of_edge(&self, key: EntityKey) -> Option<usize> {
        self.edges.id_of(key)
    }

    #[must_use]
    pub fn id_of_face(&self, key: EntityKey) -> Option<usize> {
        self.faces.id_of(key)
    }

    #[must_use]
    pub fn key_of_vertex(&self, id: usize) -> Option<EntityKey> {
        self.vertices.key_of(id)
    }

    #[must_use]
    pub fn key_of_edge(&self, id: usize) -> Option<EntityKey> {
        self.edges.key_of(id)
    }

    #[must_use]
    pub fn key_of_face(&self, id: usize) -> Option<EntityKey> {
        self.faces.key_of(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_in_visit_order() {
        let mut t = KeyTable::default();
        assert_eq!(t.visit(EntityKey(40)), Visit::Fresh);
        assert_eq!(t.assign(EntityKey(40)), 0);
        assert_eq!(t.assign(EntityKey(7)), 1);
        assert_eq!(t.assign(EntityKey(40)), 0);
        assert_eq!(t.visit(EntityKey(7)), Visit::Known(1));
        assert_eq!(t.len(), 2);
        assert_eq!(t.key_of(1), Some(EntityKey(7)));
        assert_eq!(t.id_of(EntityKey(99)), None);
    }

    #[test]
    fn skipped_keys_take_no_id() {
        let mut t = KeyTable::default();
        assert!(t.skip(EntityKey(3)));
        assert!(!t.skip(EntityKey(3)));
        assert_eq!(t.visit(EntityKey(3)), Visit::Skipped);
        assert_eq!(t.assign(EntityKey(4)), 0);
        assert_eq!(t.skipped(), 1);
        assert!(t.id_of(EntityKey(3)).is_none());
    }
}
