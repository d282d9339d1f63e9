//! Linearized trees: ordered sequences of segments
//!
//! An [`LTree`] is a binary tree cut into segments and laid out
//! depth-first: each segment is followed by the segments of its Critical
//! entry's left subtree, then by those of its right subtree. Read as a
//! tree of segments, the sequence is itself a depth-first encoding, which
//! is what the global phases fold over.
//!
//! - `partition.rs`: [`LTree::from_btree`] (tagging and linearization)
//! - `deserialize.rs`: [`LTree::to_btree`]
//! - `skeletons.rs`: map / reduce / uacc / dacc / zip / map2
//! - `io.rs`: `.lt` text files

mod deserialize;
mod io;
mod partition;
mod skeletons;

use std::fmt;
use std::str::FromStr;

use crate::segment::Segment;
use crate::SkeletonError;

/// A binary tree partitioned into segments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LTree<V> {
    segments: Vec<Segment<V>>,
}

impl<V> Default for LTree<V> {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
        }
    }
}

impl<V> LTree<V> {
    /// LTree without segments
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of segments
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether there are no segments
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments in order
    pub fn iter(&self) -> std::slice::Iter<'_, Segment<V>> {
        self.segments.iter()
    }

    /// Segments as a slice
    pub fn segments(&self) -> &[Segment<V>] {
        &self.segments
    }

    /// Take the segments out
    pub fn into_segments(self) -> Vec<Segment<V>> {
        self.segments
    }

    /// Number of segments holding a Critical entry
    pub fn open_segments(&self) -> usize {
        self.segments.iter().filter(|s| s.has_critical()).count()
    }

    /// Total number of entries, i.e. tree nodes
    pub fn entry_count(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}

impl<V> From<Vec<Segment<V>>> for LTree<V> {
    fn from(segments: Vec<Segment<V>>) -> Self {
        Self { segments }
    }
}

impl<V> FromIterator<Segment<V>> for LTree<V> {
    fn from_iter<I: IntoIterator<Item = Segment<V>>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<V> IntoIterator for LTree<V> {
    type Item = Segment<V>;
    type IntoIter = std::vec::IntoIter<Segment<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a LTree<V> {
    type Item = &'a Segment<V>;
    type IntoIter = std::slice::Iter<'a, Segment<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// One segment per line
impl<V: fmt::Display> fmt::Display for LTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl<V> FromStr for LTree<V>
where
    V: FromStr,
    V::Err: fmt::Display,
{
    type Err = SkeletonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LTree::parse_with(s, str::parse::<V>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BTree, TaggedValue};

    /// Node 1 (Node 2 (Leaf 3) (Leaf 4)) (Leaf 5)
    pub(super) fn sample() -> BTree<i64> {
        BTree::node(1, BTree::node(2, BTree::leaf(3), BTree::leaf(4)), BTree::leaf(5))
    }

    #[test]
    fn test_accessors() {
        let lt = LTree::from_btree(&sample(), 2).unwrap();
        assert_eq!(lt.len(), 3);
        assert!(!lt.is_empty());
        assert_eq!(lt.open_segments(), 1);
        assert_eq!(lt.entry_count(), 5);
        assert_eq!(lt.iter().map(Segment::len).collect::<Vec<_>>(), vec![1, 3, 1]);
        assert!(LTree::<i64>::new().is_empty());
    }

    #[test]
    fn test_display_and_parse() {
        let lt = LTree::from_btree(&sample(), 2).unwrap();
        let text = lt.to_string();
        assert_eq!(text, "[(1^C)]\n[(2^N);(3^L);(4^L)]\n[(5^L)]");
        assert_eq!(text.parse::<LTree<i64>>().unwrap(), lt);
    }

    #[test]
    fn test_collect_segments() {
        let lt: LTree<i64> = vec![Segment::from(vec![TaggedValue::Leaf(1)])]
            .into_iter()
            .collect();
        assert_eq!(lt.segments()[0][0], TaggedValue::Leaf(1));
        assert_eq!(lt.into_segments().len(), 1);
    }
}
