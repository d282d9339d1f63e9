//! Binary tree node representation
//!
//! Leaf(value) | Node(value, left, right)
//!
//! Nodes live in one `Vec`. Children always sit at lower indices than their
//! parent and the root is the last slot, so every traversal is a flat loop
//! and dropping a tree of any height never recurses.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{Result, SkeletonError};

/// One node: its value and, for internal nodes, the slots of its children
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot<V> {
    pub(super) value: V,
    pub(super) children: Option<(usize, usize)>,
}

/// Binary tree with a value at every node
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawTree<V>",
        bound(deserialize = "V: serde::Deserialize<'de>")
    )
)]
pub struct BTree<V> {
    /// Never empty; the root is the last slot
    pub(super) nodes: Vec<Slot<V>>,
}

/// Borrowed view of one node inside a [`BTree`]
pub struct Subtree<'a, V> {
    tree: &'a BTree<V>,
    index: usize,
}

impl<V> BTree<V> {
    /// Create a leaf
    pub fn leaf(value: V) -> Self {
        Self {
            nodes: vec![Slot {
                value,
                children: None,
            }],
        }
    }

    /// Create an internal node
    ///
    /// The smaller child's slots are appended to the larger child's, so
    /// building a tree bottom-up costs `O(n log n)` moves whatever its shape.
    pub fn node(value: V, left: BTree<V>, right: BTree<V>) -> Self {
        let (mut nodes, children) = merge(left, right);
        nodes.push(Slot {
            value,
            children: Some(children),
        });
        Self { nodes }
    }

    /// Hang `left` and `right` under the leaf at slot `at` of `fragment`
    pub(crate) fn graft(
        fragment: BTree<V>,
        at: usize,
        left: BTree<V>,
        right: BTree<V>,
    ) -> Result<Self> {
        const OP: &str = "graft";
        match fragment.nodes.get(at) {
            Some(slot) if slot.children.is_none() => {}
            _ => return Err(SkeletonError::ill_formed(OP, "graft point is not a leaf")),
        }
        let (mut nodes, children) = merge(left, right);
        let offset = nodes.len();
        append_shifted(&mut nodes, fragment.nodes);
        nodes[offset + at].children = Some(children);
        Ok(Self { nodes })
    }

    /// Slot of the first leaf whose value satisfies `pred`
    pub(crate) fn find_leaf(&self, pred: impl Fn(&V) -> bool) -> Option<usize> {
        self.nodes
            .iter()
            .position(|slot| slot.children.is_none() && pred(&slot.value))
    }

    #[inline]
    pub(super) fn root_index(&self) -> usize {
        self.nodes.len() - 1
    }

    /// View of the root
    pub fn root(&self) -> Subtree<'_, V> {
        Subtree {
            tree: self,
            index: self.root_index(),
        }
    }

    /// Check if leaf
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.root().is_leaf()
    }

    /// Check if internal node
    #[inline]
    pub fn is_node(&self) -> bool {
        self.root().is_node()
    }

    /// Value stored at the root
    #[inline]
    pub fn value(&self) -> &V {
        self.root().value()
    }

    /// Left child (`None` for leaves)
    pub fn left(&self) -> Option<Subtree<'_, V>> {
        self.root().left()
    }

    /// Right child (`None` for leaves)
    pub fn right(&self) -> Option<Subtree<'_, V>> {
        self.root().right()
    }

    /// Number of nodes, leaves included
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        (self.size() + 1) / 2
    }

    /// Height in edges (0 for a single leaf)
    pub fn height(&self) -> usize {
        let mut heights: Vec<usize> = Vec::with_capacity(self.nodes.len());
        for slot in &self.nodes {
            let h = match slot.children {
                None => 0,
                Some((l, r)) => 1 + heights[l].max(heights[r]),
            };
            heights.push(h);
        }
        heights[self.root_index()]
    }

    /// Slot indices in pre-order
    pub(super) fn preorder_indices(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root_index()];
        while let Some(index) = stack.pop() {
            order.push(index);
            if let Some((l, r)) = self.nodes[index].children {
                stack.push(r);
                stack.push(l);
            }
        }
        order
    }

    /// Values in pre-order (node before its children, left before right)
    pub fn preorder(&self) -> Vec<&V> {
        self.preorder_indices()
            .into_iter()
            .map(|index| &self.nodes[index].value)
            .collect()
    }

    /// Nested `Leaf v` / `Node v (l) (r)` rendering without recursion
    fn write_nested<F>(&self, f: &mut fmt::Formatter<'_>, write_value: F) -> fmt::Result
    where
        F: Fn(&V, &mut fmt::Formatter<'_>) -> fmt::Result,
    {
        enum Step {
            Visit(usize),
            Text(&'static str),
        }

        let mut steps = vec![Step::Visit(self.root_index())];
        while let Some(step) = steps.pop() {
            match step {
                Step::Text(text) => f.write_str(text)?,
                Step::Visit(index) => {
                    let slot = &self.nodes[index];
                    match slot.children {
                        None => {
                            f.write_str("Leaf ")?;
                            write_value(&slot.value, f)?;
                        }
                        Some((l, r)) => {
                            f.write_str("Node ")?;
                            write_value(&slot.value, f)?;
                            steps.push(Step::Text(")"));
                            steps.push(Step::Visit(r));
                            steps.push(Step::Text(" ("));
                            steps.push(Step::Text(")"));
                            steps.push(Step::Visit(l));
                            steps.push(Step::Text(" ("));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Slots of `left` and `right` in one vector, plus the new slots of their roots
fn merge<V>(left: BTree<V>, right: BTree<V>) -> (Vec<Slot<V>>, (usize, usize)) {
    let (left_len, right_len) = (left.nodes.len(), right.nodes.len());
    if left_len >= right_len {
        let mut nodes = left.nodes;
        append_shifted(&mut nodes, right.nodes);
        (nodes, (left_len - 1, left_len + right_len - 1))
    } else {
        let mut nodes = right.nodes;
        append_shifted(&mut nodes, left.nodes);
        (nodes, (right_len + left_len - 1, right_len - 1))
    }
}

fn append_shifted<V>(nodes: &mut Vec<Slot<V>>, tail: Vec<Slot<V>>) {
    let offset = nodes.len();
    nodes.extend(tail.into_iter().map(|slot| Slot {
        value: slot.value,
        children: slot.children.map(|(l, r)| (l + offset, r + offset)),
    }));
}

impl<'a, V> Subtree<'a, V> {
    /// Value stored here
    pub fn value(&self) -> &'a V {
        &self.tree.nodes[self.index].value
    }

    /// Check if leaf
    pub fn is_leaf(&self) -> bool {
        self.tree.nodes[self.index].children.is_none()
    }

    /// Check if internal node
    pub fn is_node(&self) -> bool {
        !self.is_leaf()
    }

    /// Both children (`None` for leaves)
    pub fn children(&self) -> Option<(Subtree<'a, V>, Subtree<'a, V>)> {
        let tree = self.tree;
        tree.nodes[self.index]
            .children
            .map(|(l, r)| (Subtree { tree, index: l }, Subtree { tree, index: r }))
    }

    /// Left child (`None` for leaves)
    pub fn left(&self) -> Option<Subtree<'a, V>> {
        self.children().map(|(left, _)| left)
    }

    /// Right child (`None` for leaves)
    pub fn right(&self) -> Option<Subtree<'a, V>> {
        self.children().map(|(_, right)| right)
    }
}

impl<V> Clone for Subtree<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Subtree<'_, V> {}

impl<V> fmt::Debug for Subtree<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subtree").field("index", &self.index).finish()
    }
}

impl<V: PartialEq> PartialEq for BTree<V> {
    /// Structural equality; slot layout does not matter
    fn eq(&self, other: &Self) -> bool {
        if self.nodes.len() != other.nodes.len() {
            return false;
        }
        let mut stack = vec![(self.root_index(), other.root_index())];
        while let Some((a, b)) = stack.pop() {
            let (x, y) = (&self.nodes[a], &other.nodes[b]);
            if x.value != y.value {
                return false;
            }
            match (x.children, y.children) {
                (None, None) => {}
                (Some((xl, xr)), Some((yl, yr))) => {
                    stack.push((xr, yr));
                    stack.push((xl, yl));
                }
                _ => return false,
            }
        }
        true
    }
}

impl<V: Eq> Eq for BTree<V> {}

impl<V: Hash> Hash for BTree<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for index in self.preorder_indices() {
            let slot = &self.nodes[index];
            slot.value.hash(state);
            slot.children.is_some().hash(state);
        }
    }
}

impl<V: fmt::Display> fmt::Display for BTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_nested(f, |v, f| write!(f, "{}", v))
    }
}

impl<V: fmt::Debug> fmt::Debug for BTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_nested(f, |v, f| write!(f, "{:?}", v))
    }
}

/// Slot list as it arrives from a deserializer, checked before use
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
pub struct RawTree<V> {
    nodes: Vec<Slot<V>>,
}

#[cfg(feature = "serde")]
impl<V> TryFrom<RawTree<V>> for BTree<V> {
    type Error = SkeletonError;

    fn try_from(raw: RawTree<V>) -> Result<Self> {
        const OP: &str = "deserialize BTree";
        let len = raw.nodes.len();
        if len == 0 {
            return Err(SkeletonError::Empty { operation: OP });
        }
        let mut referenced = vec![false; len];
        for (index, slot) in raw.nodes.iter().enumerate() {
            if let Some((l, r)) = slot.children {
                for child in [l, r] {
                    if child >= index || referenced[child] {
                        return Err(SkeletonError::ill_formed(OP, "slot is not a tree"));
                    }
                    referenced[child] = true;
                }
            }
        }
        if referenced[..len - 1].iter().any(|seen| !seen) {
            return Err(SkeletonError::ill_formed(OP, "slot is not a tree"));
        }
        Ok(Self { nodes: raw.nodes })
    }
}
