//! Prefix views.

use std::fmt;

use crate::node::Node;
use crate::tree::descend;
use crate::walk::{Iter, Values, Walk};

/// A read-only window onto the keys of a [`Tree`](crate::Tree) that share a
/// prefix, created by [`Tree::closeup`](crate::Tree::closeup).
///
/// The view borrows the tree's nodes rather than copying them, and the tree
/// cannot be mutated while a view is alive. Keys passed to and returned from
/// a view are full keys, the same ones the tree uses.
pub struct Subtree<'a, V> {
    /// Key bytes spelled by the ancestors of `root`.
    prefix: Vec<u8>,
    root: &'a Node<V>,
}

impl<'a, V> Subtree<'a, V> {
    pub(crate) fn new(root: &'a Node<V>, prefix: &[u8]) -> Self {
        Self {
            prefix: prefix.to_vec(),
            root,
        }
    }

    /// Key bytes shared by every key in the view.
    ///
    /// This is at least the prefix the view was created with, and longer
    /// when all matching keys agree on more bytes.
    pub fn prefix(&self) -> Vec<u8> {
        let mut prefix = self.prefix.clone();
        prefix.extend_from_slice(&self.root.fragment);
        prefix
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&'a V> {
        let rest = key.as_ref().strip_prefix(self.prefix.as_slice())?;
        descend(Some(self.root), rest, |_| {})
            .filter(|found| found.exact)
            .and_then(|found| found.node.value.as_ref())
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// Narrow the view to keys starting with `prefix`.
    pub fn closeup(&self, prefix: impl AsRef<[u8]>) -> Option<Subtree<'a, V>> {
        let prefix = prefix.as_ref();
        match prefix.strip_prefix(self.prefix.as_slice()) {
            Some(rest) => {
                let found = descend(Some(self.root), rest, |_| {})?;
                let mut base = self.prefix.clone();
                base.extend_from_slice(&rest[..found.consumed]);
                Some(Subtree {
                    prefix: base,
                    root: found.node,
                })
            }
            // Shorter than our own prefix: either every key matches or none.
            None => self.prefix.starts_with(prefix).then(|| self.clone()),
        }
    }

    pub fn iter(&self) -> Iter<'a, V> {
        Iter::new(self.walk())
    }

    pub fn values(&self) -> Values<'a, V> {
        Values::new(self.walk())
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&[u8], &V),
    {
        let _ = self.try_for_each(|key, value| {
            f(key, value);
            Ok::<(), std::convert::Infallible>(())
        });
    }

    /// Visit keys and values in ascending key order until `f` fails.
    pub fn try_for_each<E, F>(&self, f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &V) -> Result<(), E>,
    {
        self.walk().try_for_each(f)
    }

    fn walk(&self) -> Walk<'a, V> {
        Walk::new(Some(self.root), &self.prefix)
    }
}

impl<V> Clone for Subtree<'_, V> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            root: self.root,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Subtree<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (String::from_utf8_lossy(&k).into_owned(), v)))
            .finish()
    }
}

impl<'a, V> IntoIterator for &Subtree<'a, V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
