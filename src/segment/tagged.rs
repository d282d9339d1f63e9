//! Tagged values: a value plus its structural role in a linearized tree
//!
//! Leaf(v) | Node(v) | Critical(v)
//! Critical marks a node whose two children live in other segments.

use std::fmt;
use std::str::FromStr;

use crate::SkeletonError;

/// Structural role of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tag {
    /// Tree leaf
    Leaf,

    /// Internal node whose children follow in the same segment
    Node,

    /// Internal node whose children start other segments
    Critical,
}

impl Tag {
    /// One-letter text form
    pub fn letter(self) -> char {
        match self {
            Tag::Leaf => 'L',
            Tag::Node => 'N',
            Tag::Critical => 'C',
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Tag {
    type Err = SkeletonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" => Ok(Tag::Leaf),
            "N" => Ok(Tag::Node),
            "C" => Ok(Tag::Critical),
            other => Err(SkeletonError::UnknownTag(other.to_string())),
        }
    }
}

/// Value annotated with its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaggedValue<V> {
    /// Value of a tree leaf
    Leaf(V),

    /// Value of an internal node local to the segment
    Node(V),

    /// Value of the node standing in for children held elsewhere
    Critical(V),
}

impl<V> TaggedValue<V> {
    /// Build from a separate tag and value
    pub fn new(tag: Tag, value: V) -> Self {
        match tag {
            Tag::Leaf => TaggedValue::Leaf(value),
            Tag::Node => TaggedValue::Node(value),
            Tag::Critical => TaggedValue::Critical(value),
        }
    }

    /// Structural tag
    #[inline]
    pub fn tag(&self) -> Tag {
        match self {
            TaggedValue::Leaf(_) => Tag::Leaf,
            TaggedValue::Node(_) => Tag::Node,
            TaggedValue::Critical(_) => Tag::Critical,
        }
    }

    /// Carried value
    #[inline]
    pub fn value(&self) -> &V {
        match self {
            TaggedValue::Leaf(v) | TaggedValue::Node(v) | TaggedValue::Critical(v) => v,
        }
    }

    /// Drop the tag
    #[inline]
    pub fn into_value(self) -> V {
        match self {
            TaggedValue::Leaf(v) | TaggedValue::Node(v) | TaggedValue::Critical(v) => v,
        }
    }

    /// Check if tagged Leaf
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, TaggedValue::Leaf(_))
    }

    /// Check if tagged Node
    #[inline]
    pub fn is_node(&self) -> bool {
        matches!(self, TaggedValue::Node(_))
    }

    /// Check if tagged Critical
    #[inline]
    pub fn is_critical(&self) -> bool {
        matches!(self, TaggedValue::Critical(_))
    }

    /// Transform the value, keeping the tag
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> TaggedValue<U> {
        let tag = self.tag();
        TaggedValue::new(tag, f(self.into_value()))
    }
}

impl<V: fmt::Display> fmt::Display for TaggedValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}^{})", self.value(), self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates_follow_tag() {
        let tv = TaggedValue::new(Tag::Critical, 4);
        assert!(tv.is_critical());
        assert!(!tv.is_leaf() && !tv.is_node());
        assert_eq!(tv.tag(), Tag::Critical);
        assert_eq!(*tv.value(), 4);
    }

    #[test]
    fn test_equality_needs_tag_and_value() {
        assert_eq!(TaggedValue::Leaf(1), TaggedValue::Leaf(1));
        assert_ne!(TaggedValue::Leaf(1), TaggedValue::Node(1));
        assert_ne!(TaggedValue::Leaf(1), TaggedValue::Leaf(2));
    }

    #[test]
    fn test_map_keeps_tag() {
        let tv = TaggedValue::Node(3).map(|v| v * 2);
        assert_eq!(tv, TaggedValue::Node(6));
    }

    #[test]
    fn test_tag_letters() {
        for tag in [Tag::Leaf, Tag::Node, Tag::Critical] {
            assert_eq!(tag.to_string().parse::<Tag>().unwrap(), tag);
        }
        assert!(matches!(
            "X".parse::<Tag>(),
            Err(SkeletonError::UnknownTag(letter)) if letter == "X"
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(TaggedValue::Critical(12).to_string(), "(12^C)");
    }
}
