//! Preorder traversal.
//!
//! A node's own value comes before anything below it, then the left (bit 0)
//! subtree, then the right (bit 1 or plain extension) subtree, which is
//! ascending byte order of the keys. The walk keeps an explicit stack so
//! deep tries cannot exhaust the call stack.

use crate::node::Node;

/// Preorder cursor that maintains the accumulated key of the last node
/// returned by [`Walk::advance`].
pub(crate) struct Walk<'a, V> {
    stack: Vec<(&'a Node<V>, usize)>,
    key: Vec<u8>,
}

impl<'a, V> Walk<'a, V> {
    /// Start at `root`, whose ancestors contributed `base` to every key.
    pub(crate) fn new(root: Option<&'a Node<V>>, base: &[u8]) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = root {
            stack.push((root, base.len()));
        }
        Self {
            stack,
            key: base.to_vec(),
        }
    }

    pub(crate) fn advance(&mut self) -> Option<&'a Node<V>> {
        let (node, depth) = self.stack.pop()?;
        self.key.truncate(depth);
        self.key.extend_from_slice(&node.fragment);

        let depth = self.key.len();
        if let Some(right) = node.right.as_deref() {
            self.stack.push((right, depth));
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push((left, depth));
        }
        Some(node)
    }

    /// Accumulated key of the node last returned by `advance`.
    #[inline]
    pub(crate) fn key(&self) -> &[u8] {
        &self.key
    }

    pub(crate) fn try_for_each<E, F>(mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &'a V) -> Result<(), E>,
    {
        while let Some(node) = self.advance() {
            if let Some(value) = node.value.as_ref() {
                f(&self.key, value)?;
            }
        }
        Ok(())
    }
}

/// Iterator over `(key, value)` pairs in ascending key order.
///
/// Created by [`Tree::iter`](crate::Tree::iter) and
/// [`Subtree::iter`](crate::Subtree::iter).
pub struct Iter<'a, V> {
    walk: Walk<'a, V>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(walk: Walk<'a, V>) -> Self {
        Self { walk }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.walk.advance()?;
            if let Some(value) = node.value.as_ref() {
                return Some((self.walk.key().to_vec(), value));
            }
        }
    }
}

/// Iterator over values in ascending key order, without materializing keys.
pub struct Values<'a, V> {
    walk: Walk<'a, V>,
}

impl<'a, V> Values<'a, V> {
    pub(crate) fn new(walk: Walk<'a, V>) -> Self {
        Self { walk }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.walk.advance()?.value.as_ref() {
                return Some(value);
            }
        }
    }
}
