//! Rebuilding the binary tree from its segments
//!
//! Phase A folds every segment on its own into a fragment whose Critical
//! entry is a placeholder leaf. Phase B walks the fragments right to left,
//! the same way `reduce_global` walks tops, and grafts the two most recent
//! complete subtrees under each open fragment's placeholder.

use tracing::debug;

use super::LTree;
use crate::btree::BTree;
use crate::segment::{pop_operands, single_result, DepthCounter, Segment, TaggedValue};
use crate::{Result, SkeletonError};

type Fragment<V> = BTree<TaggedValue<V>>;

impl<V: Clone> LTree<V> {
    /// The binary tree this LTree encodes
    pub fn to_btree(&self) -> Result<BTree<V>> {
        const OP: &str = "to_btree";
        if self.is_empty() {
            return Err(SkeletonError::Empty { operation: OP });
        }

        let fragments = self.local_phase("to_btree_local", |_, segment| fragment(segment))?;

        debug!(segments = fragments.len(), "to_btree: grafting fragments");
        let mut stack: Vec<Fragment<V>> = Vec::with_capacity(fragments.len());
        for (tree, placeholder) in fragments.into_iter().rev() {
            let complete = match placeholder {
                Some(at) => {
                    let (left, right) = pop_operands(&mut stack, OP)?;
                    BTree::graft(tree, at, left, right)?
                }
                None => tree,
            };
            stack.push(complete);
        }

        let tree = single_result(stack, OP)?;
        Ok(tree.into_map(TaggedValue::into_value))
    }
}

/// Fold one segment into a tree fragment, along with the slot of its
/// Critical placeholder when the segment is open
fn fragment<V: Clone>(segment: &Segment<V>) -> Result<(Fragment<V>, Option<usize>)> {
    const OP: &str = "to_btree_local";
    if segment.is_empty() {
        return Err(SkeletonError::Empty { operation: OP });
    }

    let mut depth = DepthCounter::new();
    let mut stack: Vec<Fragment<V>> = Vec::with_capacity(segment.len() / 2 + 1);
    for entry in segment.iter().rev() {
        match entry {
            TaggedValue::Node(_) => {
                let (left, right) = pop_operands(&mut stack, OP)?;
                stack.push(BTree::node(entry.clone(), left, right));
            }
            TaggedValue::Critical(_) => {
                depth.critical(OP)?;
                stack.push(BTree::leaf(entry.clone()));
            }
            TaggedValue::Leaf(_) => stack.push(BTree::leaf(entry.clone())),
        }
    }

    let tree = single_result(stack, OP)?;
    let placeholder = tree.find_leaf(TaggedValue::is_critical);
    Ok((tree, placeholder))
}
