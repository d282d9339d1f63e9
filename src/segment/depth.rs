//! Depth counter shared by the right-to-left local scans
//!
//! `d` counts the complete subtree values stacked above the value that
//! carries the Critical entry's partial result. It starts out "unseen"
//! and is reset to 0 by the Critical entry.
//!
//! States: Unseen, 0 (left of critical), 1 (right of critical), ≥ 2 (plain)

use crate::{Result, SkeletonError};

/// Where an internal node sits relative to the Critical entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeRole {
    /// Both children are complete; the node is off the critical path
    Plain,

    /// The Critical entry is in the left subtree
    PathLeft,

    /// The Critical entry is in the right subtree
    PathRight,
}

/// Signed depth relative to the last Critical entry seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DepthCounter {
    depth: Option<usize>,
}

impl DepthCounter {
    /// Counter before any Critical entry was seen
    pub(crate) fn new() -> Self {
        Self { depth: None }
    }

    /// Whether a Critical entry was seen
    pub(crate) fn seen_critical(&self) -> bool {
        self.depth.is_some()
    }

    /// Leaf entry: one more complete value
    pub(crate) fn leaf(&mut self) {
        if let Some(d) = self.depth.as_mut() {
            *d += 1;
        }
    }

    /// Critical entry: reset to 0; a second one is ill-formed
    pub(crate) fn critical(&mut self, operation: &'static str) -> Result<()> {
        if self.seen_critical() {
            return Err(SkeletonError::ill_formed(
                operation,
                "segment holds more than one critical entry",
            ));
        }
        self.depth = Some(0);
        Ok(())
    }

    /// Node entry: classify it and consume its two operands
    pub(crate) fn node(&mut self) -> NodeRole {
        match self.depth {
            Some(0) => NodeRole::PathLeft,
            Some(1) => {
                self.depth = Some(0);
                NodeRole::PathRight
            }
            Some(d) => {
                self.depth = Some(d - 1);
                NodeRole::Plain
            }
            None => NodeRole::Plain,
        }
    }
}
