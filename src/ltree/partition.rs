//! Partitioning a binary tree into segments
//!
//! 1. **Sizes**: subtree size of every node, through [`BTree::uacc`]
//! 2. **Tags**: Leaf for leaves; Critical when the node's bucket index
//!    `⌈size / m⌉` exceeds the bucket index of *both* children; Node
//!    otherwise
//! 3. **Linearization**: pre-order, except that a Critical node's children
//!    are deferred to new segments. The segments of the left subtree come
//!    right after the current segment, followed by those of the right
//!    subtree.
//!
//! A node whose size crosses a bucket boundary against both children can
//! only appear once between two Critical ancestors, so each segment holds
//! at most one Critical entry.

use tracing::debug;

use super::LTree;
use crate::btree::BTree;
use crate::segment::{Segment, Tag, TaggedValue};
use crate::{PartitionConfig, Result, SizeMeasure};

impl<V: Clone> LTree<V> {
    /// Partition `bt` with bucket size `m`, sizes counted in leaves
    pub fn from_btree(bt: &BTree<V>, m: usize) -> Result<Self> {
        Self::from_btree_with(bt, &PartitionConfig::new(m)?)
    }

    /// Partition `bt` as described by `config`
    pub fn from_btree_with(bt: &BTree<V>, config: &PartitionConfig) -> Result<Self> {
        let inner_weight = match config.size_measure {
            SizeMeasure::Leaves => 0,
            SizeMeasure::Nodes => 1,
        };
        let sizes = bt
            .map(|_| 1usize, |_| inner_weight)
            .uacc(|l, b, r| l + b + r);

        let tags = sizes.mapt(
            |_| Tag::Leaf,
            |size, left, right| {
                let bucket = config.bucket_index(*size);
                if bucket > config.bucket_index(*left) && bucket > config.bucket_index(*right) {
                    Tag::Critical
                } else {
                    Tag::Node
                }
            },
        );
        let tagged = bt.map2(|v, tag| TaggedValue::new(*tag, v.clone()), &tags)?;

        let lt = linearize(&tagged);
        debug!(
            bucket_size = config.bucket_size,
            nodes = lt.entry_count(),
            segments = lt.len(),
            open = lt.open_segments(),
            "partitioned tree"
        );
        Ok(lt)
    }
}

/// Cut a tagged tree into segments at its Critical nodes
fn linearize<V: Clone>(tagged: &BTree<TaggedValue<V>>) -> LTree<V> {
    let mut segments = Vec::new();
    let mut roots = vec![tagged.root()];

    while let Some(root) = roots.pop() {
        let mut segment = Segment::new();
        let mut deferred = Vec::new();
        let mut stack = vec![root];

        while let Some(tree) = stack.pop() {
            let entry = tree.value();
            segment.push(entry.clone());
            if let Some((left, right)) = tree.children() {
                if entry.is_critical() {
                    deferred.push((left, right));
                } else {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        for (left, right) in deferred.into_iter().rev() {
            roots.push(right);
            roots.push(left);
        }
        segments.push(segment);
    }

    LTree::from(segments)
}
