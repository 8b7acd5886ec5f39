//! Balanced binary Merkle tree over 32-byte leaf hashes.
//!
//! The tree is persistent: every operation returns a new root and leaves its
//! input untouched, sharing unchanged subtrees through `Arc`. Leaf capacity is
//! always a power of two; unused slots are null leaves, which carry no hash
//! and contribute an empty byte sequence to their parent hash. A null leaf is
//! told apart from a real one by the absence of a hash, never by its value.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::buf::Hash32;
use crate::error::ErrorKind;
use crate::hash::{Blake3, HashFunction};
use crate::utils::*;
use crate::validate;


/// Node of the Merkle tree. A node without children is a leaf (null when it
/// has no hash); a node with children caches the hash of their concatenation
/// and the leaf counts of its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleNode<H: HashFunction = Blake3> {
    left: Option<Arc<MerkleNode<H>>>,
    right: Option<Arc<MerkleNode<H>>>,
    hash: Option<Hash32>,
    all_leaves: usize,
    non_null_leaves: usize,
    hasher: PhantomData<H>,
}


impl<H: HashFunction> Default for MerkleNode<H> {
    fn default() -> Self {
        Self::empty()
    }
}


impl<H: HashFunction> MerkleNode<H> {
    /// Tree without leaves. It also serves as a null leaf.
    pub fn empty() -> Self {
        Self {
            left: None,
            right: None,
            hash: None,
            all_leaves: 1,
            non_null_leaves: 0,
            hasher: PhantomData,
        }
    }

    /// Leaf holding a real hash.
    pub fn leaf(hash: Hash32) -> Self {
        Self {
            left: None,
            right: None,
            hash: Some(hash),
            all_leaves: 1,
            non_null_leaves: 1,
            hasher: PhantomData,
        }
    }

    /// Internal node over two children with the hash computed from them.
    pub fn parent(left: Arc<Self>, right: Arc<Self>) -> Self {
        let hash = H::double_hash(&concat_optional(
            left.hash.as_ref().map(|h| h.as_ref()),
            right.hash.as_ref().map(|h| h.as_ref()),
        ));
        Self {
            all_leaves: left.all_leaves + right.all_leaves,
            non_null_leaves: left.non_null_leaves + right.non_null_leaves,
            left: Some(left),
            right: Some(right),
            hash: Some(hash),
            hasher: PhantomData,
        }
    }

    /// Build a tree from real leaf hashes, padded with null leaves up to the
    /// next power of two.
    pub fn from_leaf_hashes(hashes: &[Hash32]) -> Self {
        let leaves: Vec<Option<Hash32>> = hashes.iter().copied().map(Some)
            .collect();
        Self::from_optional_leaves(&leaves)
    }

    /// Build a tree from leaf slots where `None` is a null leaf.
    pub fn from_optional_leaves(leaves: &[Option<Hash32>]) -> Self {
        match leaves.len() {
            0 => Self::empty(),
            1 => Self::slot(leaves[0]),
            2 => Self::parent(
                Arc::new(Self::slot(leaves[0])),
                Arc::new(Self::slot(leaves[1])),
            ),
            len if !len.is_power_of_two() => {
                let mut padded = leaves.to_vec();
                padded.resize(len.next_power_of_two(), None);
                Self::from_optional_leaves(&padded)
            },
            len => Self::parent(
                Arc::new(Self::from_optional_leaves(&leaves[..len / 2])),
                Arc::new(Self::from_optional_leaves(&leaves[len / 2..])),
            ),
        }
    }

    /// Cached hash of the node. `None` for the empty tree and null leaves.
    pub fn hash(&self) -> Option<&Hash32> {
        self.hash.as_ref()
    }

    /// Hash recomputed from the leaves, ignoring every cached value above
    /// them.
    pub fn recompute_hash(&self) -> Option<Hash32> {
        if self.is_leaf() {
            return self.hash;
        }
        let left = self.left.as_ref().and_then(|n| n.recompute_hash());
        let right = self.right.as_ref().and_then(|n| n.recompute_hash());
        Some(H::double_hash(&concat_optional(
            left.as_ref().map(|h| h.as_ref()),
            right.as_ref().map(|h| h.as_ref()),
        )))
    }

    pub fn left(&self) -> Option<&MerkleNode<H>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&MerkleNode<H>> {
        self.right.as_deref()
    }

    /// Check the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Check the tree holds no real leaf.
    pub fn is_empty(&self) -> bool {
        self.count_non_null_leaves() == 0
    }

    /// Number of leaf slots, null ones included.
    pub fn count_all_leaves(&self) -> usize {
        self.all_leaves
    }

    /// Number of leaves holding a real hash.
    pub fn count_non_null_leaves(&self) -> usize {
        self.non_null_leaves
    }

    /// Leaf slots in order, `None` for null leaves.
    pub fn leaves(&self) -> Vec<Option<Hash32>> {
        let mut leaves = Vec::with_capacity(self.count_all_leaves());
        self.collect_leaves(&mut leaves);
        leaves
    }

    /// Depth measured along the leftmost spine. A null leaf counts as zero.
    pub fn left_height(&self) -> usize {
        match &self.left {
            Some(left) => left.left_height() + 1,
            None => self.hash.is_some() as usize,
        }
    }

    /// Depth measured along the rightmost spine. A null leaf counts as zero.
    pub fn right_height(&self) -> usize {
        match &self.right {
            Some(right) => right.right_height() + 1,
            None => self.hash.is_some() as usize,
        }
    }

    /// Check both children exist, are null-balanced themselves, and their
    /// spine depths differ by at most one.
    pub fn is_null_balanced(&self) -> bool {
        match (&self.left, &self.right) {
            (None, None) => true,
            (Some(left), Some(right)) => {
                left.is_null_balanced() && right.is_null_balanced() &&
                    left.left_height().abs_diff(right.left_height()) <= 1 &&
                    left.right_height().abs_diff(right.right_height()) <= 1
            },
            _ => false,
        }
    }

    /// Double the leaf capacity: the tree becomes the left half and an
    /// all-null tree of the same size the right half.
    pub fn double_with_nulls(&self) -> CoreResult<Self> {
        let count = self.count_all_leaves();
        validate!(count.is_power_of_two(), InvalidShape)?;
        debug!(count, "doubling merkle tree capacity");
        Ok(Self::parent(Arc::new(self.clone()), Arc::new(Self::nulls(count))))
    }

    /// Replace the leaf at `pos` with a real hash, recomputing the hashes on
    /// the path to the root.
    pub fn update_leaf_at(&self, pos: usize, hash: Hash32) -> CoreResult<Self> {
        let count = self.count_all_leaves();
        if pos >= count {
            return Err(error_with(
                ErrorKind::InvalidPosition,
                format!("position {} out of {} leaves", pos, count)
            ));
        }
        validate!(count.is_power_of_two(), InvalidShape)?;
        trace!(pos, count, "updating merkle leaf");

        if count == 1 {
            return Ok(Self::leaf(hash));
        }

        let (left, right) = self.children()?;
        let half = count / 2;
        if pos < half {
            let left = left.update_leaf_at(pos, hash)?;
            Ok(Self::parent(Arc::new(left), right.clone()))
        } else {
            let right = right.update_leaf_at(pos - half, hash)?;
            Ok(Self::parent(left.clone(), Arc::new(right)))
        }
    }

    /// Write consecutive leaves starting from `start`. Fails on the first
    /// error without returning a partially updated tree.
    pub fn update_leaf_hashes_from(&self, start: usize,
                                   hashes: &[Hash32]) -> CoreResult<Self> {
        debug!(start, count = hashes.len(), "updating merkle leaves");
        let mut tree = self.clone();
        for (ix, hash) in hashes.iter().enumerate() {
            tree = tree.update_leaf_at(start + ix, *hash)?;
        }
        Ok(tree)
    }

    /// Append a leaf after the last real one, doubling the capacity first
    /// when the tree is full.
    pub fn add_leaf(&self, hash: Hash32) -> CoreResult<Self> {
        let count_non_null = self.count_non_null_leaves();
        if count_non_null == self.count_all_leaves() {
            self.double_with_nulls()?.update_leaf_at(count_non_null, hash)
        } else {
            self.update_leaf_at(count_non_null, hash)
        }
    }

    /// Append leaves in order. Fails on the first error without returning a
    /// partially updated tree.
    pub fn add_leaves(&self, hashes: &[Hash32]) -> CoreResult<Self> {
        debug!(count = hashes.len(), "appending merkle leaves");
        let mut tree = self.clone();
        for hash in hashes {
            tree = tree.add_leaf(*hash)?;
        }
        Ok(tree)
    }

    fn slot(hash: Option<Hash32>) -> Self {
        match hash {
            Some(hash) => Self::leaf(hash),
            None => Self::empty(),
        }
    }

    // All-null tree of `count` slots; each level shares one subtree.
    fn nulls(count: usize) -> Self {
        if count <= 1 {
            return Self::empty();
        }
        let half = Arc::new(Self::nulls(count / 2));
        Self::parent(half.clone(), half)
    }

    fn children(&self) -> CoreResult<(&Arc<Self>, &Arc<Self>)> {
        match (&self.left, &self.right) {
            (Some(left), Some(right)) => Ok((left, right)),
            _ => Err(error_with(
                ErrorKind::InvalidShape,
                "internal node is missing a child"
            )),
        }
    }

    fn collect_leaves(&self, leaves: &mut Vec<Option<Hash32>>) {
        if self.is_leaf() {
            leaves.push(self.hash);
            return;
        }
        if let Some(left) = &self.left {
            left.collect_leaves(leaves);
        }
        if let Some(right) = &self.right {
            right.collect_leaves(leaves);
        }
    }
}
