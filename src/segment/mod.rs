//! Segments: one partition of a linearized tree
//!
//! A segment is the depth-first (node before children) encoding of a tree
//! fragment. Every Node entry is followed, in the same segment, by the
//! encodings of its two children; a Critical entry is 0-ary here because its
//! children start other segments.
//!
//! - **Closed** segment: no Critical entry, a complete subtree
//! - **Open** segment: exactly one Critical entry
//!
//! Local algorithms (`local.rs`) fold one segment right to left with an
//! explicit stack. Global algorithms (`global.rs`) run over the short
//! sequence of per-segment summaries, itself stored as a `Segment`.

mod depth;
mod global;
mod local;
mod tagged;
mod text;

pub use tagged::{Tag, TaggedValue};

pub(crate) use depth::DepthCounter;

use std::ops::Index;

use crate::{Result, SkeletonError};

/// Ordered sequence of tagged values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment<V> {
    entries: Vec<TaggedValue<V>>,
}

impl<V> Default for Segment<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> Segment<V> {
    /// Empty segment
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the segment has no entries
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if any
    pub fn get(&self, index: usize) -> Option<&TaggedValue<V>> {
        self.entries.get(index)
    }

    /// Entries in depth-first order
    pub fn iter(&self) -> std::slice::Iter<'_, TaggedValue<V>> {
        self.entries.iter()
    }

    /// Entries as a slice
    pub fn entries(&self) -> &[TaggedValue<V>] {
        &self.entries
    }

    /// Take the entries out
    pub fn into_entries(self) -> Vec<TaggedValue<V>> {
        self.entries
    }

    /// Tags in depth-first order
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.entries.iter().map(TaggedValue::tag)
    }

    /// Whether some entry is Critical
    pub fn has_critical(&self) -> bool {
        self.entries.iter().any(TaggedValue::is_critical)
    }

    /// Whether the segment is a complete subtree (no Critical entry)
    pub fn is_closed(&self) -> bool {
        !self.has_critical()
    }

    /// Position of the first Critical entry
    pub fn critical_index(&self) -> Option<usize> {
        self.entries.iter().position(TaggedValue::is_critical)
    }

    pub(crate) fn push(&mut self, entry: TaggedValue<V>) {
        self.entries.push(entry);
    }

    /// Pair up the values of two segments with identical tags
    pub fn zip<W>(&self, other: &Segment<W>) -> Result<Segment<(V, W)>>
    where
        V: Clone,
        W: Clone,
    {
        self.map2(|a, b| (a.clone(), b.clone()), other)
    }

    /// Combine two segments with identical tags position by position
    ///
    /// The first position whose tags differ, or that exists on one side
    /// only, is reported as a tag mismatch.
    pub fn map2<W, U, F>(&self, f: F, other: &Segment<W>) -> Result<Segment<U>>
    where
        F: Fn(&V, &W) -> U,
    {
        let longest = self.len().max(other.len());
        let mut entries = Vec::with_capacity(longest);
        for position in 0..longest {
            match (self.get(position), other.get(position)) {
                (Some(a), Some(b)) if a.tag() == b.tag() => {
                    entries.push(TaggedValue::new(a.tag(), f(a.value(), b.value())));
                }
                (a, b) => {
                    let describe = |t: Option<Tag>| t.map_or("nothing".to_string(), |t| t.to_string());
                    return Err(SkeletonError::TagMismatch {
                        position,
                        detail: format!(
                            "{} vs {}",
                            describe(a.map(TaggedValue::tag)),
                            describe(b.map(TaggedValue::tag))
                        ),
                    });
                }
            }
        }
        Ok(Segment { entries })
    }
}

impl<V> From<Vec<TaggedValue<V>>> for Segment<V> {
    fn from(entries: Vec<TaggedValue<V>>) -> Self {
        Self { entries }
    }
}

impl<V> FromIterator<TaggedValue<V>> for Segment<V> {
    fn from_iter<I: IntoIterator<Item = TaggedValue<V>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<V> Extend<TaggedValue<V>> for Segment<V> {
    fn extend<I: IntoIterator<Item = TaggedValue<V>>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<V> IntoIterator for Segment<V> {
    type Item = TaggedValue<V>;
    type IntoIter = std::vec::IntoIter<TaggedValue<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Segment<V> {
    type Item = &'a TaggedValue<V>;
    type IntoIter = std::slice::Iter<'a, TaggedValue<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<V> Index<usize> for Segment<V> {
    type Output = TaggedValue<V>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

/// Pop the two operands of a Node entry: left child on top, right below
pub(crate) fn pop_operands<T>(stack: &mut Vec<T>, operation: &'static str) -> Result<(T, T)> {
    match (stack.pop(), stack.pop()) {
        (Some(left), Some(right)) => Ok((left, right)),
        _ => Err(SkeletonError::ill_formed(
            operation,
            "a node does not have two children",
        )),
    }
}

/// The single value a complete fold must leave behind
pub(crate) fn single_result<T>(mut stack: Vec<T>, operation: &'static str) -> Result<T> {
    if stack.len() > 1 {
        return Err(SkeletonError::ill_formed(
            operation,
            format!("{} values left on the stack instead of one", stack.len()),
        ));
    }
    stack.pop().ok_or(SkeletonError::Empty { operation })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_segment() -> Segment<i32> {
        Segment::from(vec![
            TaggedValue::Node(1),
            TaggedValue::Critical(2),
            TaggedValue::Leaf(3),
        ])
    }

    #[test]
    fn test_open_and_closed() {
        let seg = open_segment();
        assert!(seg.has_critical());
        assert!(!seg.is_closed());
        assert_eq!(seg.critical_index(), Some(1));

        let closed: Segment<i32> = vec![TaggedValue::Leaf(9)].into_iter().collect();
        assert!(closed.is_closed());
        assert_eq!(closed.critical_index(), None);
    }

    #[test]
    fn test_zip_same_segment() {
        let seg = open_segment();
        let zipped = seg.zip(&seg).unwrap();
        assert_eq!(zipped[1], TaggedValue::Critical((2, 2)));
        assert_eq!(zipped.tags().collect::<Vec<_>>(), seg.tags().collect::<Vec<_>>());
    }

    #[test]
    fn test_map2_tag_mismatch() {
        let other = Segment::from(vec![
            TaggedValue::Node(1),
            TaggedValue::Leaf(2),
            TaggedValue::Leaf(3),
        ]);
        let err = open_segment().map2(|a, b| a + b, &other).unwrap_err();
        assert!(matches!(err, SkeletonError::TagMismatch { position: 1, .. }));
    }

    #[test]
    fn test_map2_length_mismatch() {
        let shorter = Segment::from(vec![TaggedValue::Node(1), TaggedValue::Critical(2)]);
        let err = open_segment().map2(|a, b| a * b, &shorter).unwrap_err();
        assert!(matches!(err, SkeletonError::TagMismatch { position: 2, .. }));
    }

    #[test]
    fn test_pop_operands_order() {
        let mut stack = vec!["right", "left"];
        assert_eq!(pop_operands(&mut stack, "t").unwrap(), ("left", "right"));
        assert!(pop_operands(&mut stack, "t").is_err());
    }
}
