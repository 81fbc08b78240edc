//! Diagnostics: structure dumps and full-tree invariant checks.

use std::fmt::Write;

use crate::error::InvariantError;
use crate::Tree;

impl<V> Tree<V> {
    /// Render every node on its own line, children indented under parents.
    ///
    /// A line shows the accumulated key, `+` the node's own fragment, the
    /// branch mask, and flags for a stored value and present children.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut key = Vec::new();
        let mut stack = Vec::new();
        if let Some(root) = self.root() {
            stack.push((root, 0usize, 0usize));
        }

        while let Some((node, base, depth)) = stack.pop() {
            key.truncate(base);
            key.extend_from_slice(&node.fragment);
            let _ = writeln!(
                out,
                "{:indent$}{:?} +{:?} mask={:#04x}{}{}{}",
                "",
                String::from_utf8_lossy(&key),
                String::from_utf8_lossy(&node.fragment),
                node.mask,
                if node.value.is_some() { " value" } else { "" },
                if node.left.is_some() { " L" } else { "" },
                if node.right.is_some() { " R" } else { "" },
                indent = depth * 2,
            );
            if let Some(right) = node.right.as_deref() {
                stack.push((right, key.len(), depth + 1));
            }
            if let Some(left) = node.left.as_deref() {
                stack.push((left, key.len(), depth + 1));
            }
        }
        out
    }

    /// Walk the whole tree and check its structural invariants.
    ///
    /// Costs a lookup per stored key; meant for tests and debugging.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let mut found = 0usize;
        let mut previous: Option<Vec<u8>> = None;
        let mut walk = self.walk();

        while let Some(node) = walk.advance() {
            let key = walk.key();
            if node.mask.count_ones() > 1 {
                return Err(InvariantError::InvalidMask {
                    key: key.to_vec(),
                    mask: node.mask,
                });
            }
            if node.mask == 0 && node.left.is_some() {
                return Err(InvariantError::LeftWithoutBranch { key: key.to_vec() });
            }
            let children = node.child_count();
            if children == 0 && node.mask != 0 {
                return Err(InvariantError::StaleMask {
                    key: key.to_vec(),
                    mask: node.mask,
                });
            }

            let Some(value) = node.value.as_ref() else {
                if children < 2 {
                    return Err(InvariantError::Uncompressed {
                        key: key.to_vec(),
                        children,
                    });
                }
                continue;
            };

            found += 1;
            if let Some(previous) = previous.as_deref() {
                if previous >= key {
                    return Err(InvariantError::OutOfOrder {
                        previous: previous.to_vec(),
                        key: key.to_vec(),
                    });
                }
            }
            if !self.get(key).is_some_and(|got| std::ptr::eq(got, value)) {
                return Err(InvariantError::Unreachable { key: key.to_vec() });
            }
            previous = Some(key.to_vec());
        }

        if found != self.len() {
            return Err(InvariantError::LengthMismatch {
                recorded: self.len(),
                found,
            });
        }
        Ok(())
    }
}
