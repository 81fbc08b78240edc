//! # radix2
//!
//! An ordered, prefix-addressable map from byte-string keys to values, stored
//! as a compressed binary trie (PATRICIA / radix-2 trie).
//!
//! Each node spells a fragment of the key and branches on a single bit of
//! the following byte. Chains without branches are compressed into one
//! node, and removals merge nodes back together so no value-less node is
//! left with fewer than two children.
//!
//! - **Point operations**: `get`, `insert`, `remove` in O(key length)
//! - **Prefix views**: [`Tree::closeup`] returns a zero-copy [`Subtree`]
//! - **Prefix deletion**: [`Tree::remove_branch`] unlinks all keys under a
//!   prefix with a single walk
//! - **Ordered traversal**: iteration yields keys in ascending byte order
//!
//! ## Example
//!
//! ```rust
//! use radix2::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert("/folder", 0);
//! tree.insert("/folder/file1", 1);
//! tree.insert("/folder/file2", 2);
//! tree.insert("/folder2", 3);
//!
//! assert_eq!(tree.get("/folder/file2"), Some(&2));
//!
//! let files = tree.closeup("/folder/").unwrap();
//! let values: Vec<_> = files.values().copied().collect();
//! assert_eq!(values, [1, 2]);
//!
//! assert!(tree.remove_branch("/folder/"));
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! ## Concurrency
//!
//! [`Tree`] does no locking of its own; mutation needs `&mut`. Wrap it in
//! [`SharedTree`] (or any lock) to share it between threads.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

mod debug;
pub mod diff;
mod error;
mod node;
mod sync;
mod tree;
mod view;
mod walk;

pub use error::InvariantError;
pub use sync::SharedTree;
pub use tree::Tree;
pub use view::Subtree;
pub use walk::{Iter, Values};

#[cfg(test)]
mod proptests;
