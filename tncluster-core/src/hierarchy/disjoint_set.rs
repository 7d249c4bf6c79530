//! Keyed union-find (disjoint set union) used during merge-tree construction.
//!
//! Entities are tracked by identifier rather than by dense index, so callers
//! can feed arbitrary labels straight from a distance list. Each entry holds a
//! sentinel: `None` for a cluster representative, or the identifier of another
//! member of the same cluster. Cluster sizes are only kept current on
//! representatives.

use std::collections::HashMap;

use crate::error::DisjointSetError;

use super::EntityId;

/// Disjoint-set forest keyed by entity identifier.
///
/// # Examples
/// ```
/// use tncluster_core::DisjointSet;
///
/// let mut set = DisjointSet::new();
/// set.add("a")?;
/// set.add("b")?;
/// set.add("c")?;
/// set.union(&"a", &"b")?;
/// assert_eq!(set.find(&"a")?, set.find(&"b")?);
/// assert_ne!(set.find(&"a")?, set.find(&"c")?);
/// assert_eq!(set.size_of(&"b")?, 2);
/// # Ok::<(), tncluster_core::DisjointSetError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DisjointSet<K> {
    parent: HashMap<K, Option<K>>,
    num_below: HashMap<K, usize>,
}

impl<K> Default for DisjointSet<K> {
    fn default() -> Self {
        Self {
            parent: HashMap::new(),
            num_below: HashMap::new(),
        }
    }
}

impl<K: EntityId> DisjointSet<K> {
    /// Creates an empty disjoint set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entities currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` when no entity is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns `true` when `key` currently has a sentinel entry.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.parent.contains_key(key)
    }

    /// Inserts `key` as its own singleton cluster.
    ///
    /// # Errors
    /// Returns [`DisjointSetError::DuplicateKey`] when `key` is already present.
    pub fn add(&mut self, key: K) -> Result<(), DisjointSetError> {
        if self.contains(&key) {
            return Err(DisjointSetError::DuplicateKey {
                key: key.to_string(),
            });
        }
        self.num_below.insert(key.clone(), 1);
        self.parent.insert(key, None);
        Ok(())
    }

    /// Returns the representative of the cluster containing `key`.
    ///
    /// Every node visited on the way up is repointed directly at the
    /// representative.
    ///
    /// # Errors
    /// Returns [`DisjointSetError::NotFound`] when `key` is absent.
    pub fn find(&mut self, key: &K) -> Result<K, DisjointSetError> {
        self.sentinel(key)?;
        let mut current = key.clone();
        let mut visited = Vec::new();
        while let Some(Some(next)) = self.parent.get(&current) {
            let next = next.clone();
            visited.push(current);
            current = next;
        }

        for node in visited {
            self.parent.insert(node, Some(current.clone()));
        }
        Ok(current)
    }

    /// Returns the number of live members in the cluster containing `key`.
    ///
    /// # Errors
    /// Returns [`DisjointSetError::NotFound`] when `key` is absent.
    pub fn size_of(&mut self, key: &K) -> Result<usize, DisjointSetError> {
        let root = self.find(key)?;
        Ok(self.num_below.get(&root).copied().unwrap_or(1))
    }

    /// Merges the clusters containing `left` and `right` by size.
    ///
    /// The smaller cluster's representative is attached under the larger
    /// one's. On equal sizes the representative of `left` goes under the
    /// representative of `right`. Returns the surviving representative; when
    /// both keys already share one it is returned without any change.
    ///
    /// # Errors
    /// Returns [`DisjointSetError::NotFound`] when either key is absent.
    pub fn union(&mut self, left: &K, right: &K) -> Result<K, DisjointSetError> {
        self.sentinel(left)?;
        self.sentinel(right)?;
        let left_root = self.find(left)?;
        let right_root = self.find(right)?;
        if left_root == right_root {
            return Ok(left_root);
        }

        let left_size = self.num_below.get(&left_root).copied().unwrap_or(1);
        let right_size = self.num_below.get(&right_root).copied().unwrap_or(1);
        let (parent, child) = if left_size > right_size {
            (left_root, right_root)
        } else {
            (right_root, left_root)
        };
        self.parent.insert(child, Some(parent.clone()));
        self.num_below
            .insert(parent.clone(), left_size.saturating_add(right_size));
        Ok(parent)
    }

    /// Deletes `key`, re-parenting any members that pointed at it.
    ///
    /// Removing a representative promotes its smallest direct child to
    /// representative and attaches the remaining children beneath it.
    /// Removing any other member first compresses its path, so its children
    /// are reattached to the cluster representative and that representative's
    /// size shrinks by one.
    ///
    /// # Errors
    /// Returns [`DisjointSetError::NotFound`] when `key` is absent.
    pub fn remove(&mut self, key: &K) -> Result<(), DisjointSetError> {
        let is_representative = self.sentinel(key)?.is_none();
        let mut children: Vec<K> = self
            .parent
            .iter()
            .filter(|&(_, parent)| parent.as_ref() == Some(key))
            .map(|(child, _)| child.clone())
            .collect();
        children.sort_unstable();

        if is_representative {
            let size = self.num_below.remove(key).unwrap_or(1);
            self.parent.remove(key);
            if let Some((heir, rest)) = children.split_first() {
                self.parent.insert(heir.clone(), None);
                self.num_below.insert(heir.clone(), size.saturating_sub(1));
                for child in rest {
                    self.parent.insert(child.clone(), Some(heir.clone()));
                }
            }
            return Ok(());
        }

        let root = self.find(key)?;
        self.parent.remove(key);
        self.num_below.remove(key);
        for child in children {
            self.parent.insert(child, Some(root.clone()));
        }
        if let Some(size) = self.num_below.get_mut(&root) {
            *size = size.saturating_sub(1);
        }
        Ok(())
    }

    fn sentinel(&self, key: &K) -> Result<&Option<K>, DisjointSetError> {
        self.parent.get(key).ok_or_else(|| DisjointSetError::NotFound {
            key: key.to_string(),
        })
    }
}
