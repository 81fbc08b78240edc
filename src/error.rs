use thiserror::Error;

fn show(key: &[u8]) -> String {
    format!("{:?}", String::from_utf8_lossy(key))
}

/// A structural defect found by [`Tree::validate`](crate::Tree::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// A branch mask with more than one bit set.
    #[error("node at {} has branch mask {mask:#04x} with more than one bit set", show(.key))]
    InvalidMask { key: Vec<u8>, mask: u8 },

    /// A left child under a node without a bit test.
    #[error("node at {} has a left child but no branch bit", show(.key))]
    LeftWithoutBranch { key: Vec<u8> },

    /// A childless node still carrying a branch mask.
    #[error("leaf at {} keeps branch mask {mask:#04x}", show(.key))]
    StaleMask { key: Vec<u8>, mask: u8 },

    /// A value-less node with fewer than two children.
    #[error("value-less node at {} has {children} child(ren) and should have been merged", show(.key))]
    Uncompressed { key: Vec<u8>, children: usize },

    /// Traversal produced keys out of ascending order.
    #[error("key {} follows {} in traversal order", show(.key), show(.previous))]
    OutOfOrder { previous: Vec<u8>, key: Vec<u8> },

    /// A stored key that lookup cannot find.
    #[error("stored key {} is not reachable by lookup", show(.key))]
    Unreachable { key: Vec<u8> },

    /// The live-key counter disagrees with the values in the tree.
    #[error("tree reports {recorded} keys but holds {found}")]
    LengthMismatch { recorded: usize, found: usize },
}
