//! The owning tree handle and its lookup, insert and removal algorithms.

use std::fmt;

use smallvec::SmallVec;
use tracing::debug;

use crate::diff::diff;
use crate::node::{dismantle, duplicate, Link, Node, Side};
use crate::view::Subtree;
use crate::walk::{Iter, Values, Walk};

/// Child slots taken from the root down to a node.
pub(crate) type Path = SmallVec<[Side; 32]>;

/// Where a lookup stopped.
pub(crate) struct Reached<'a, V> {
    pub(crate) node: &'a Node<V>,
    /// The query ends exactly at the end of `node`'s fragment.
    pub(crate) exact: bool,
    /// Query bytes consumed by the ancestors of `node`.
    pub(crate) consumed: usize,
}

/// Walk from `root` towards `key`.
///
/// Stops at the first node whose fragment covers the rest of the query and
/// starts with it; returns `None` if a fragment disagrees with the query or
/// the path runs into an empty slot. `step` observes every child slot taken.
pub(crate) fn descend<'a, V>(
    root: Option<&'a Node<V>>,
    key: &[u8],
    mut step: impl FnMut(Side),
) -> Option<Reached<'a, V>> {
    let mut node = root?;
    let mut consumed = 0;
    loop {
        let rest = &key[consumed..];
        let fragment = node.fragment.as_slice();
        if rest.len() <= fragment.len() {
            return fragment.starts_with(rest).then_some(Reached {
                node,
                exact: rest.len() == fragment.len(),
                consumed,
            });
        }
        if !rest.starts_with(fragment) {
            return None;
        }

        let side = node.route(rest[fragment.len()]);
        step(side);
        consumed += fragment.len();
        node = node.child(side)?;
    }
}

/// Follow `path` down from `slot`.
fn slot_at<'a, V>(mut slot: &'a mut Link<V>, path: &[Side]) -> &'a mut Link<V> {
    for &side in path {
        match slot {
            Some(node) => slot = node.child_mut(side),
            None => break,
        }
    }
    slot
}

/// An ordered map from byte-string keys to values, stored as a compressed
/// binary (PATRICIA) trie.
///
/// Keys sharing a prefix share the nodes that spell it, so prefix views
/// ([`Tree::closeup`]) and prefix deletion ([`Tree::remove_branch`]) cost a
/// walk along the prefix rather than a scan of the matching keys. Iteration
/// yields keys in ascending byte order.
///
/// A `Tree` is not synchronized: mutation takes `&mut self`. Share one
/// across threads through a lock, e.g. [`SharedTree`](crate::SharedTree).
///
/// ```rust
/// use radix2::Tree;
///
/// let mut tree = Tree::new();
/// tree.insert("/folder/file1", 1);
/// tree.insert("/folder/file2", 2);
/// tree.insert("/folder2", 3);
///
/// let keys: Vec<_> = tree.iter().map(|(k, _)| k).collect();
/// let expected: [&[u8]; 3] = [b"/folder/file1", b"/folder/file2", b"/folder2"];
/// assert_eq!(keys, expected);
/// ```
pub struct Tree<V> {
    root: Link<V>,
    len: usize,
}

impl<V> Tree<V> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            dismantle(root);
        }
        self.len = 0;
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        descend(self.root.as_deref(), key.as_ref(), |_| {})
            .filter(|found| found.exact)
            .and_then(|found| found.node.value.as_ref())
    }

    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut V> {
        let mut path = Path::new();
        let found = descend(self.root.as_deref(), key.as_ref(), |side| path.push(side))?;
        if !found.exact {
            return None;
        }
        slot_at(&mut self.root, &path).as_mut()?.value.as_mut()
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// Insert `value` at `key`, returning the value it replaced, if any.
    pub fn insert(&mut self, key: impl AsRef<[u8]>, value: V) -> Option<V> {
        let mut rest = key.as_ref();
        let mut slot = &mut self.root;
        loop {
            let Some(node) = slot else {
                *slot = Some(Box::new(Node::leaf(rest, value)));
                self.len += 1;
                return None;
            };

            // The key leaves this fragment early (mismatch, or the key ends
            // inside it): cut the fragment where they part.
            let d = diff(&node.fragment, rest);
            if d.position < node.fragment.len() {
                let key_byte = rest.get(d.position).copied().unwrap_or(0);
                node.split(d.position, d.mask(), key_byte);
            }

            rest = &rest[node.fragment.len()..];
            let Some(&next) = rest.first() else {
                let old = node.value.replace(value);
                if old.is_none() {
                    self.len += 1;
                }
                return old;
            };

            node.widen(next);
            let side = node.route(next);
            slot = node.child_mut(side);
        }
    }

    /// Remove `key`, returning its value.
    ///
    /// Structural nodes left without a purpose are merged away, so the trie
    /// stays as compressed as if the key had never been inserted.
    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Option<V> {
        let mut path = Path::new();
        let found = descend(self.root.as_deref(), key.as_ref(), |side| path.push(side))?;
        if !found.exact || found.node.value.is_none() {
            return None;
        }

        let value = match path.split_last() {
            None => {
                let value = self.root.as_mut().and_then(|node| node.value.take());
                Node::collapse(&mut self.root);
                value
            }
            Some((&last, above)) => {
                let parent = slot_at(&mut self.root, above);
                let Some(node) = parent.as_mut() else {
                    return None;
                };
                let child = node.child_mut(last);
                let value = child.as_mut().and_then(|node| node.value.take());
                if Node::collapse(child) {
                    Node::collapse(parent);
                }
                value
            }
        };

        if value.is_some() {
            self.len -= 1;
        }
        value
    }

    /// Remove every key starting with `prefix`.
    ///
    /// Returns `false` if no key starts with `prefix`. Unlinking the branch
    /// costs a walk along `prefix`; the detached nodes are then freed.
    pub fn remove_branch(&mut self, prefix: impl AsRef<[u8]>) -> bool {
        let mut path = Path::new();
        if descend(self.root.as_deref(), prefix.as_ref(), |side| path.push(side)).is_none() {
            return false;
        }

        let detached = match path.split_last() {
            None => self.root.take(),
            Some((&last, above)) => {
                let parent = slot_at(&mut self.root, above);
                let detached = parent.as_mut().and_then(|node| node.child_mut(last).take());
                Node::collapse(parent);
                detached
            }
        };

        let removed = detached.map_or(0, dismantle);
        self.len -= removed;
        debug!(removed, depth = path.len(), "removed branch");
        true
    }

    /// A view of the keys starting with `prefix`, or `None` if there are none.
    ///
    /// The view borrows the tree's nodes; nothing is copied.
    pub fn closeup(&self, prefix: impl AsRef<[u8]>) -> Option<Subtree<'_, V>> {
        let prefix = prefix.as_ref();
        let found = descend(self.root.as_deref(), prefix, |_| {})?;
        Some(Subtree::new(found.node, &prefix[..found.consumed]))
    }

    /// Iterate over `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.walk())
    }

    pub fn keys(&self) -> impl Iterator<Item = Vec<u8>> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> Values<'_, V> {
        Values::new(self.walk())
    }

    /// Call `f` with every key and value in ascending key order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&[u8], &V),
    {
        let _ = self.try_for_each(|key, value| {
            f(key, value);
            Ok::<(), std::convert::Infallible>(())
        });
    }

    /// Like [`Tree::for_each`], but stops at the first error `f` returns and
    /// hands it back.
    ///
    /// The key slice is only valid for the duration of the call.
    pub fn try_for_each<E, F>(&self, f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &V) -> Result<(), E>,
    {
        self.walk().try_for_each(f)
    }

    pub(crate) fn walk(&self) -> Walk<'_, V> {
        Walk::new(self.root.as_deref(), &[])
    }

    pub(crate) fn root(&self) -> Option<&Node<V>> {
        self.root.as_deref()
    }
}

impl<V> Default for Tree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for Tree<V> {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            dismantle(root);
        }
    }
}

impl<V: Clone> Clone for Tree<V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.as_deref().and_then(duplicate),
            len: self.len,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Tree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (String::from_utf8_lossy(&k).into_owned(), v)))
            .finish()
    }
}

impl<'a, V> IntoIterator for &'a Tree<V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: AsRef<[u8]>, V> Extend<(K, V)> for Tree<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: AsRef<[u8]>, V> FromIterator<(K, V)> for Tree<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}
