//! Trie nodes.
//!
//! Every node owns a key fragment (the bytes it consumes after its parent's
//! accumulated key), an optional value and at most two children. The byte
//! following the fragment is routed by `mask`: bit clear goes left, bit set
//! goes right. A zero mask means there is no bit test and the only child
//! hangs on the right.

use smallvec::SmallVec;
use tracing::trace;

use crate::diff::{bits_above, branch_mask};

/// Inline capacity chosen for path-like keys, whose fragments are mostly a
/// directory or file name.
pub(crate) type Fragment = SmallVec<[u8; 16]>;

/// Which child slot a key continues into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

pub(crate) type Link<V> = Option<Box<Node<V>>>;

pub(crate) struct Node<V> {
    pub(crate) fragment: Fragment,
    pub(crate) value: Option<V>,
    pub(crate) mask: u8,
    pub(crate) left: Link<V>,
    pub(crate) right: Link<V>,
}

impl<V> Node<V> {
    pub(crate) fn leaf(fragment: &[u8], value: V) -> Self {
        Self {
            fragment: Fragment::from_slice(fragment),
            value: Some(value),
            mask: 0,
            left: None,
            right: None,
        }
    }

    /// Child slot for a continuation whose next byte is `byte`.
    #[inline]
    pub(crate) fn route(&self, byte: u8) -> Side {
        if self.mask == 0 || byte & self.mask != 0 {
            Side::Right
        } else {
            Side::Left
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<&Node<V>> {
        match side {
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Link<V> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[inline]
    pub(crate) fn child_count(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }

    /// Split this node in place after `at` fragment bytes.
    ///
    /// The node keeps `fragment[..at]` and takes `mask`; everything else
    /// (fragment tail, value, old mask and children) moves into a new child.
    /// `key_byte` is the inserting key's byte at `at`, ignored when `mask`
    /// is 0 because the inserting key ends exactly at the split.
    pub(crate) fn split(&mut self, at: usize, mask: u8, key_byte: u8) {
        debug_assert!(at < self.fragment.len());
        let lower = Box::new(Node {
            fragment: Fragment::from_slice(&self.fragment[at..]),
            value: self.value.take(),
            mask: self.mask,
            left: self.left.take(),
            right: self.right.take(),
        });
        self.fragment.truncate(at);
        self.mask = mask;

        trace!(at, mask, "split node");
        if mask == 0 || key_byte & mask == 0 {
            self.right = Some(lower);
        } else {
            self.left = Some(lower);
        }
    }

    /// Make room for a continuation byte that disagrees with this node's
    /// subtree on a bit above the current mask.
    ///
    /// Does nothing when the byte is compatible with the current branching.
    pub(crate) fn widen(&mut self, byte: u8) {
        if self.mask == 0 {
            return;
        }
        let Some(rep) = self.representative() else {
            self.mask = 0;
            return;
        };
        let above = (byte ^ rep) & bits_above(self.mask);
        if above == 0 {
            return;
        }
        let mask = branch_mask(above);
        let rep_side = if rep & mask == 0 { Side::Left } else { Side::Right };

        if self.child_count() == 1 {
            // A single child has nothing to stay consistent with on the far side.
            let child = self.left.take().or_else(|| self.right.take());
            self.mask = mask;
            *self.child_mut(rep_side) = child;
            trace!(mask, "re-masked single-child node");
            return;
        }

        let lower = Box::new(Node {
            fragment: Fragment::new(),
            value: None,
            mask: self.mask,
            left: self.left.take(),
            right: self.right.take(),
        });
        self.mask = mask;
        *self.child_mut(rep_side) = Some(lower);
        trace!(mask, "pushed branch point down");
    }

    /// The byte that follows this node's fragment in any key below it.
    ///
    /// Keys below a node agree on every bit above its mask, so any one of
    /// them is representative for that comparison.
    fn representative(&self) -> Option<u8> {
        let mut node = self.left.as_deref().or(self.right.as_deref())?;
        loop {
            if let Some(&b) = node.fragment.first() {
                return Some(b);
            }
            node = node.left.as_deref().or(node.right.as_deref())?;
        }
    }

    /// Restore compression after this node lost its value or a child.
    ///
    /// A value-less node with one child is replaced by that child (with the
    /// fragment prepended), a value-less node without children is unlinked.
    /// Returns `true` if the slot is left empty.
    pub(crate) fn collapse(slot: &mut Link<V>) -> bool {
        let Some(node) = slot else {
            return true;
        };
        if node.child_count() == 0 {
            node.mask = 0;
        }
        if node.value.is_some() {
            return false;
        }
        match (node.left.take(), node.right.take()) {
            (None, None) => {
                *slot = None;
                true
            }
            (Some(mut child), None) | (None, Some(mut child)) => {
                child.fragment.insert_from_slice(0, &node.fragment);
                trace!(len = child.fragment.len(), "merged node into its child");
                *slot = Some(child);
                false
            }
            (left, right) => {
                node.left = left;
                node.right = right;
                false
            }
        }
    }
}

/// Tear down a detached subtree without recursion, returning how many values
/// it held.
pub(crate) fn dismantle<V>(root: Box<Node<V>>) -> usize {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(mut node) = stack.pop() {
        count += usize::from(node.value.is_some());
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
    count
}

/// Deep copy of a subtree, built bottom-up from an explicit stack.
pub(crate) fn duplicate<V: Clone>(root: &Node<V>) -> Link<V> {
    enum Step<'a, V> {
        Enter(&'a Node<V>),
        Build(&'a Node<V>),
    }

    let mut stack = vec![Step::Enter(root)];
    let mut built: Vec<Link<V>> = Vec::new();
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(node) => {
                stack.push(Step::Build(node));
                stack.extend(node.left.as_deref().map(Step::Enter));
                stack.extend(node.right.as_deref().map(Step::Enter));
            }
            Step::Build(node) => {
                // The right subtree was entered last, so it finished first.
                let left = if node.left.is_some() { built.pop().flatten() } else { None };
                let right = if node.right.is_some() { built.pop().flatten() } else { None };
                built.push(Some(Box::new(Node {
                    fragment: node.fragment.clone(),
                    value: node.value.clone(),
                    mask: node.mask,
                    left,
                    right,
                })));
            }
        }
    }
    built.pop().flatten()
}
