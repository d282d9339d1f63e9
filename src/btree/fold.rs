//! Sequential maps and folds over [`BTree`]
//!
//! Children precede their parent in the slot vector, so upward passes walk
//! the slots forwards and downward passes walk them backwards. Maps keep the
//! slot layout and call their closures in slot order.

use super::node::Slot;
use super::BTree;
use crate::{Result, SkeletonError};

impl<V> BTree<V> {
    /// Apply `f_leaf` to leaf values and `f_node` to internal values
    pub fn map<U, FL, FN>(&self, f_leaf: FL, f_node: FN) -> BTree<U>
    where
        FL: Fn(&V) -> U,
        FN: Fn(&V) -> U,
    {
        self.relabel(|_, slot| match slot.children {
            None => f_leaf(&slot.value),
            Some(_) => f_node(&slot.value),
        })
    }

    /// Consume the tree, converting every value with `f`
    pub fn into_map<U, F>(self, f: F) -> BTree<U>
    where
        F: Fn(V) -> U,
    {
        BTree {
            nodes: self
                .nodes
                .into_iter()
                .map(|slot| Slot {
                    value: f(slot.value),
                    children: slot.children,
                })
                .collect(),
        }
    }

    /// Like [`BTree::map`], but `f_node` also sees the values at the roots of
    /// both children: `f_node(value, left_value, right_value)`
    pub fn mapt<U, FL, FN>(&self, f_leaf: FL, f_node: FN) -> BTree<U>
    where
        FL: Fn(&V) -> U,
        FN: Fn(&V, &V, &V) -> U,
    {
        self.relabel(|_, slot| match slot.children {
            None => f_leaf(&slot.value),
            Some((l, r)) => f_node(&slot.value, &self.nodes[l].value, &self.nodes[r].value),
        })
    }

    /// Combine two trees of the same shape position by position
    ///
    /// A shape difference is reported as a tag mismatch at the first
    /// differing pre-order position.
    pub fn map2<W, U, F>(&self, f: F, other: &BTree<W>) -> Result<BTree<U>>
    where
        F: Fn(&V, &W) -> U,
    {
        // partner[i] is the slot of `other` matching slot i of `self`.
        let mut partner = vec![0usize; self.nodes.len()];
        let mut stack = vec![(self.root_index(), other.root_index())];
        let mut position = 0;
        while let Some((a, b)) = stack.pop() {
            partner[a] = b;
            match (self.nodes[a].children, other.nodes[b].children) {
                (None, None) => {}
                (Some((al, ar)), Some((bl, br))) => {
                    stack.push((ar, br));
                    stack.push((al, bl));
                }
                (mine, theirs) => {
                    let kind = |c: Option<(usize, usize)>| match c {
                        Some(_) => "node",
                        None => "leaf",
                    };
                    return Err(SkeletonError::TagMismatch {
                        position,
                        detail: format!("{} vs {}", kind(mine), kind(theirs)),
                    });
                }
            }
            position += 1;
        }
        Ok(self.relabel(|index, slot| f(&slot.value, &other.nodes[partner[index]].value)))
    }

    /// Pair up the values of two trees of the same shape
    pub fn zip<W>(&self, other: &BTree<W>) -> Result<BTree<(V, W)>>
    where
        V: Clone,
        W: Clone,
    {
        self.map2(|x, y| (x.clone(), y.clone()), other)
    }

    /// Upward accumulation: every internal node receives
    /// `k(left_acc, value, right_acc)`, leaves keep their value
    pub fn uacc<F>(&self, k: F) -> BTree<V>
    where
        V: Clone,
        F: Fn(&V, &V, &V) -> V,
    {
        let acc = self.upward(&k);
        BTree {
            nodes: acc
                .into_iter()
                .zip(&self.nodes)
                .map(|(value, slot)| Slot {
                    value,
                    children: slot.children,
                })
                .collect(),
        }
    }

    /// Reduction: the root value of [`BTree::uacc`]
    pub fn reduce<F>(&self, k: F) -> V
    where
        V: Clone,
        F: Fn(&V, &V, &V) -> V,
    {
        let mut acc = self.upward(&k);
        acc.swap_remove(self.root_index())
    }

    /// Downward accumulation: the root receives `c`; the children of a node
    /// that received `acc` receive `gl(acc, value)` and `gr(acc, value)`
    pub fn dacc<C, GL, GR>(&self, gl: GL, gr: GR, c: C) -> BTree<C>
    where
        GL: Fn(&C, &V) -> C,
        GR: Fn(&C, &V) -> C,
    {
        let mut received: Vec<Option<C>> = (0..self.nodes.len()).map(|_| None).collect();
        received[self.root_index()] = Some(c);
        for index in (0..self.nodes.len()).rev() {
            let slot = &self.nodes[index];
            if let (Some((l, r)), Some(acc)) = (slot.children, received[index].as_ref()) {
                let to_left = gl(acc, &slot.value);
                let to_right = gr(acc, &slot.value);
                received[l] = Some(to_left);
                received[r] = Some(to_right);
            }
        }
        BTree {
            nodes: received
                .into_iter()
                .zip(&self.nodes)
                .filter_map(|(acc, slot)| {
                    acc.map(|value| Slot {
                        value,
                        children: slot.children,
                    })
                })
                .collect(),
        }
    }

    /// Same layout, new values from `f(slot_index, slot)`
    fn relabel<U>(&self, f: impl Fn(usize, &Slot<V>) -> U) -> BTree<U> {
        BTree {
            nodes: self
                .nodes
                .iter()
                .enumerate()
                .map(|(index, slot)| Slot {
                    value: f(index, slot),
                    children: slot.children,
                })
                .collect(),
        }
    }

    /// Accumulated value of every slot, children first
    fn upward(&self, k: &impl Fn(&V, &V, &V) -> V) -> Vec<V>
    where
        V: Clone,
    {
        let mut acc: Vec<V> = Vec::with_capacity(self.nodes.len());
        for slot in &self.nodes {
            let value = match slot.children {
                None => slot.value.clone(),
                Some((l, r)) => k(&acc[l], &slot.value, &acc[r]),
            };
            acc.push(value);
        }
        acc
    }
}
