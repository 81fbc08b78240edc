//! A lock-protected tree for sharing between threads.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{Subtree, Tree};

/// A [`Tree`] behind a reader-writer lock.
///
/// Mutations take the write lock, so splits and merges are never observed
/// half done. Reads take the read lock and clone values out; use
/// [`SharedTree::read`] to borrow instead.
pub struct SharedTree<V> {
    inner: RwLock<Tree<V>>,
}

impl<V> SharedTree<V> {
    pub fn new() -> Self {
        Self::from_tree(Tree::new())
    }

    pub fn from_tree(tree: Tree<V>) -> Self {
        Self {
            inner: RwLock::new(tree),
        }
    }

    /// Insert `value` at `key`, returning the value it replaced.
    pub fn insert(&self, key: impl AsRef<[u8]>, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.inner.read().contains_key(key)
    }

    pub fn remove(&self, key: impl AsRef<[u8]>) -> Option<V> {
        self.inner.write().remove(key)
    }

    pub fn remove_branch(&self, prefix: impl AsRef<[u8]>) -> bool {
        self.inner.write().remove_branch(prefix)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` on the view of keys starting with `prefix` while holding the
    /// read lock.
    pub fn with_closeup<R>(
        &self,
        prefix: impl AsRef<[u8]>,
        f: impl FnOnce(Option<Subtree<'_, V>>) -> R,
    ) -> R {
        let tree = self.inner.read();
        f(tree.closeup(prefix))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Tree<V>> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Tree<V>> {
        self.inner.write()
    }

    /// An independent copy of the current contents.
    pub fn snapshot(&self) -> Tree<V>
    where
        V: Clone,
    {
        self.inner.read().clone()
    }

    pub fn into_inner(self) -> Tree<V> {
        self.inner.into_inner()
    }
}

impl<V> Default for SharedTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<Tree<V>> for SharedTree<V> {
    fn from(tree: Tree<V>) -> Self {
        Self::from_tree(tree)
    }
}
