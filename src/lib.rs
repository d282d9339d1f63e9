//! # Skeletons over Linearized Binary Trees
//!
//! Bulk-synchronous skeletons (map, reduce, upward accumulation, downward
//! accumulation, zip) over binary trees that were cut into an ordered
//! sequence of [`Segment`]s.
//!
//! ## Core Algorithm
//!
//! 1. **Partitioning**: tag every node Leaf / Node / Critical from its
//!    bucket index `⌈size / m⌉`, then linearize depth-first so that each
//!    Critical node's children start new segments
//! 2. **Local phase**: every segment is folded on its own, right to left,
//!    leaving a one-value summary per segment
//! 3. **Global phase**: the short summary sequence (one entry per segment)
//!    is folded sequentially
//! 4. **Fix-up phase**: accumulations patch the path from each segment's
//!    root down to its Critical entry with the values received globally
//!
//! Local phases depend on nothing outside their own segment, so an embedding
//! runtime may run them as independent tasks, with a barrier between phases.
//!
//! ## Usage Example
//!
//! ```
//! use treeskel::{BTree, LTree};
//!
//! let bt = BTree::node(1, BTree::node(2, BTree::leaf(3), BTree::leaf(4)), BTree::leaf(5));
//! let lt = LTree::from_btree(&bt, 2)?;
//! assert_eq!(lt.len(), 3);
//!
//! let add = |l: &i64, b: &i64, r: &i64| l + b + r;
//! let sum = lt.reduce(add, |b: &i64| *b, add, add, add)?;
//! assert_eq!(sum, 15);
//! assert_eq!(lt.to_btree()?, bt);
//! # Ok::<(), treeskel::SkeletonError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod btree;   // Plain binary trees and their sequential folds
pub mod segment; // Tagged values and per-segment (local) algorithms
pub mod ltree;   // Segment sequences and global orchestration

// Re-exports for convenience
pub use btree::{BTree, Subtree};
pub use ltree::LTree;
pub use segment::{Segment, Tag, TaggedValue};

use thiserror::Error;

/// File extension of persisted linearized trees
pub const LT_EXTENSION: &str = "lt";

/// How subtree size is measured when choosing Critical nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeMeasure {
    /// Count the leaves below a node
    #[default]
    Leaves,

    /// Count every node below a node, itself included
    Nodes,
}

/// Configuration parameters for partitioning a tree
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartitionConfig {
    /// Bucket size `m`; a node is Critical when its bucket index
    /// `⌈size / m⌉` exceeds both children's
    pub bucket_size: usize,

    /// Size measure feeding the bucket index
    pub size_measure: SizeMeasure,
}

impl PartitionConfig {
    /// Create configuration for bucket size `m` (must be > 0)
    pub fn new(bucket_size: usize) -> Result<Self> {
        if bucket_size == 0 {
            return Err(SkeletonError::InvalidBucketSize(bucket_size));
        }
        Ok(Self {
            bucket_size,
            size_measure: SizeMeasure::default(),
        })
    }

    /// Select the size measure (defaults to [`SizeMeasure::Leaves`]).
    pub fn with_size_measure(mut self, size_measure: SizeMeasure) -> Self {
        self.size_measure = size_measure;
        self
    }

    /// Bucket index `⌈size / m⌉`
    #[inline]
    pub fn bucket_index(&self, size: usize) -> usize {
        (size + self.bucket_size - 1) / self.bucket_size
    }
}

/// Errors raised by skeletons, conversions and persistence
///
/// Every variant signals a violated precondition or corrupted structure;
/// nothing here is transient, so callers should not retry.
#[derive(Error, Debug)]
pub enum SkeletonError {
    /// An operation requiring a non-empty segment or tree got an empty one
    #[error("{operation} cannot be applied to an empty input")]
    Empty {
        /// Operation that rejected its input
        operation: &'static str,
    },

    /// The depth-first encoding is broken
    #[error("ill-formed structure in {operation}: {reason}")]
    IllFormed {
        /// Operation that detected the problem
        operation: &'static str,
        /// What was missing or left over
        reason: String,
    },

    /// The input is well formed but of the wrong kind for the operation
    #[error("{operation} is not applicable: {reason}")]
    Application {
        /// Operation that rejected its input
        operation: &'static str,
        /// Violated precondition
        reason: String,
    },

    /// Zipped structures disagree on a tag (or on their length)
    #[error("tag mismatch at position {position}: {detail}")]
    TagMismatch {
        /// Index of the first disagreement
        position: usize,
        /// Both sides of the disagreement
        detail: String,
    },

    /// Tag letter outside `{L, N, C}`
    #[error("unknown tag `{0}`")]
    UnknownTag(String),

    /// Persisted text that cannot be read back
    #[error("invalid text `{text}`: {reason}")]
    InvalidText {
        /// Offending fragment
        text: String,
        /// Why it was rejected
        reason: String,
    },

    /// Bucket size of zero
    #[error("invalid bucket size {0}: must be > 0")]
    InvalidBucketSize(usize),

    /// Reading or writing a `.lt` file failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkeletonError {
    pub(crate) fn ill_formed(operation: &'static str, reason: impl Into<String>) -> Self {
        SkeletonError::IllFormed {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn application(operation: &'static str, reason: impl Into<String>) -> Self {
        SkeletonError::Application {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_text(text: impl Into<String>, reason: impl Into<String>) -> Self {
        SkeletonError::InvalidText {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SkeletonError>;
