//! Plain binary trees
//!
//! The tree consumed by the partitioner and produced by the deserializer.
//! Every node carries a value; internal nodes have exactly two children.
//!
//! Folds here are the sequential reference versions of the skeletons:
//! `uacc` feeds subtree sizes to the partitioner, and `reduce` / `dacc`
//! give the answers the segmented versions must agree with.

mod fold;
mod node;

pub use node::{BTree, Subtree};
