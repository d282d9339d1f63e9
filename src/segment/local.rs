//! Local (single-segment) halves of every skeleton
//!
//! Each function reads one segment and nothing else, so an embedding
//! runtime may run them as independent tasks, one per segment.
//!
//! Upward scans go right to left: children are folded before their parent.
//! Downward scans go left to right: parents hand values to their children.

use super::depth::{DepthCounter, NodeRole};
use super::{pop_operands, single_result, Segment, TaggedValue};
use crate::{Result, SkeletonError};

impl<V> Segment<V> {
    /// Apply `f_leaf` to Leaf values and `f_inner` to Node and Critical
    /// values; tags and shape are preserved
    pub fn map_local<U, FL, FI>(&self, f_leaf: FL, f_inner: FI) -> Segment<U>
    where
        FL: Fn(&V) -> U,
        FI: Fn(&V) -> U,
    {
        self.iter()
            .map(|entry| match entry {
                TaggedValue::Leaf(v) => TaggedValue::Leaf(f_leaf(v)),
                TaggedValue::Node(v) => TaggedValue::Node(f_inner(v)),
                TaggedValue::Critical(v) => TaggedValue::Critical(f_inner(v)),
            })
            .collect()
    }

    /// Reduce the segment to its top value
    ///
    /// Closed segments reduce fully with `k` and return a Leaf-tagged top.
    /// In an open segment the Critical entry contributes `phi(value)`, and
    /// every ancestor on the path to it combines with `psi_l` (Critical in
    /// its left subtree) or `psi_r` (in its right subtree); the top is
    /// Node-tagged and still waits for the Critical entry's children.
    ///
    /// Combinators are called as `f(left, value, right)`.
    pub fn reduce_local<K, P, PL, PR>(
        &self,
        k: K,
        phi: P,
        psi_l: PL,
        psi_r: PR,
    ) -> Result<TaggedValue<V>>
    where
        V: Clone,
        K: Fn(&V, &V, &V) -> V,
        P: Fn(&V) -> V,
        PL: Fn(&V, &V, &V) -> V,
        PR: Fn(&V, &V, &V) -> V,
    {
        const OP: &str = "reduce_local";
        if self.is_empty() {
            return Err(SkeletonError::Empty { operation: OP });
        }

        let mut stack: Vec<V> = Vec::with_capacity(self.len() / 2 + 1);
        let mut depth = DepthCounter::new();

        for entry in self.iter().rev() {
            match entry {
                TaggedValue::Leaf(v) => {
                    stack.push(v.clone());
                    depth.leaf();
                }
                TaggedValue::Critical(v) => {
                    depth.critical(OP)?;
                    stack.push(phi(v));
                }
                TaggedValue::Node(v) => {
                    let (left, right) = pop_operands(&mut stack, OP)?;
                    let combined = match depth.node() {
                        NodeRole::PathLeft => psi_l(&left, &phi(v), &right),
                        NodeRole::PathRight => psi_r(&left, &phi(v), &right),
                        NodeRole::Plain => k(&left, v, &right),
                    };
                    stack.push(combined);
                }
            }
        }

        let top = single_result(stack, OP)?;
        Ok(if depth.seen_critical() {
            TaggedValue::Node(top)
        } else {
            TaggedValue::Leaf(top)
        })
    }

    /// Local upward accumulation
    ///
    /// Same scan as [`Segment::reduce_local`], but also records the
    /// accumulated value of every entry that is complete locally. Entries
    /// on the path from the segment root to the Critical entry (the
    /// Critical entry included) stay `None` until
    /// [`Segment::uacc_update`] fills them in.
    pub fn uacc_local<K, P, PL, PR>(
        &self,
        k: K,
        phi: P,
        psi_l: PL,
        psi_r: PR,
    ) -> Result<(TaggedValue<V>, Segment<Option<V>>)>
    where
        V: Clone,
        K: Fn(&V, &V, &V) -> V,
        P: Fn(&V) -> V,
        PL: Fn(&V, &V, &V) -> V,
        PR: Fn(&V, &V, &V) -> V,
    {
        const OP: &str = "uacc_local";
        if self.is_empty() {
            return Err(SkeletonError::Empty { operation: OP });
        }

        let mut stack: Vec<V> = Vec::with_capacity(self.len() / 2 + 1);
        let mut partial: Vec<TaggedValue<Option<V>>> = Vec::with_capacity(self.len());
        let mut depth = DepthCounter::new();

        for entry in self.iter().rev() {
            match entry {
                TaggedValue::Leaf(v) => {
                    stack.push(v.clone());
                    partial.push(TaggedValue::Leaf(Some(v.clone())));
                    depth.leaf();
                }
                TaggedValue::Critical(v) => {
                    depth.critical(OP)?;
                    stack.push(phi(v));
                    partial.push(TaggedValue::Critical(None));
                }
                TaggedValue::Node(v) => {
                    let (left, right) = pop_operands(&mut stack, OP)?;
                    match depth.node() {
                        NodeRole::PathLeft => {
                            stack.push(psi_l(&left, &phi(v), &right));
                            partial.push(TaggedValue::Node(None));
                        }
                        NodeRole::PathRight => {
                            stack.push(psi_r(&left, &phi(v), &right));
                            partial.push(TaggedValue::Node(None));
                        }
                        NodeRole::Plain => {
                            let acc = k(&left, v, &right);
                            partial.push(TaggedValue::Node(Some(acc.clone())));
                            stack.push(acc);
                        }
                    }
                }
            }
        }

        let top = single_result(stack, OP)?;
        partial.reverse();
        let top = if depth.seen_critical() {
            TaggedValue::Node(top)
        } else {
            TaggedValue::Leaf(top)
        };
        Ok((top, Segment::from(partial)))
    }

    /// Complete a local upward accumulation once the Critical entry's
    /// children are known
    ///
    /// `left_top` / `right_top` are the accumulated values at the roots of
    /// the Critical entry's left and right child segments. The Critical
    /// entry becomes `k(left_top, value, right_top)`; every other unresolved
    /// entry combines the two values below it with `k`; resolved entries
    /// are kept as they are.
    pub fn uacc_update<K>(
        &self,
        partial: &Segment<Option<V>>,
        k: K,
        left_top: V,
        right_top: V,
    ) -> Result<Segment<V>>
    where
        V: Clone,
        K: Fn(&V, &V, &V) -> V,
    {
        const OP: &str = "uacc_update";
        if self.len() != partial.len() {
            return Err(SkeletonError::ill_formed(
                OP,
                format!(
                    "partial result has {} entries, segment has {}",
                    partial.len(),
                    self.len()
                ),
            ));
        }

        let mut children = Some((left_top, right_top));
        let mut stack: Vec<V> = Vec::with_capacity(self.len() / 2 + 1);
        let mut entries: Vec<TaggedValue<V>> = Vec::with_capacity(self.len());

        for (entry, resolved) in self.iter().rev().zip(partial.iter().rev()) {
            if entry.tag() != resolved.tag() {
                return Err(SkeletonError::ill_formed(
                    OP,
                    "partial result does not match the segment's tags",
                ));
            }
            let acc = match (entry, resolved.value()) {
                (TaggedValue::Leaf(_), Some(v)) => v.clone(),
                (TaggedValue::Leaf(_), None) => {
                    return Err(SkeletonError::ill_formed(OP, "leaf left unresolved"));
                }
                (TaggedValue::Node(_), Some(v)) => {
                    pop_operands(&mut stack, OP)?;
                    v.clone()
                }
                (TaggedValue::Node(b), None) => {
                    let (left, right) = pop_operands(&mut stack, OP)?;
                    k(&left, b, &right)
                }
                (TaggedValue::Critical(b), _) => {
                    let (left, right) = children.take().ok_or_else(|| {
                        SkeletonError::ill_formed(OP, "segment holds more than one critical entry")
                    })?;
                    k(&left, b, &right)
                }
            };
            stack.push(acc.clone());
            entries.push(TaggedValue::new(entry.tag(), acc));
        }

        if children.is_some() {
            return Err(SkeletonError::application(
                OP,
                "segment has no critical entry to receive child values",
            ));
        }
        single_result(stack, OP)?;
        entries.reverse();
        Ok(Segment::from(entries))
    }

    /// Values an open segment hands down to its Critical entry's children
    ///
    /// Returns `(to_left, to_right)`: starting from `phi_l(c)` and
    /// `phi_r(c)` at the Critical entry `c`, each ancestor `a` on the path
    /// to the segment root is folded in front with
    /// `psi_u(phi_l(a), below)` when the Critical entry is in its left
    /// subtree and `psi_u(phi_r(a), below)` when it is in its right one.
    pub fn dacc_path<D, PL, PR, PU>(&self, phi_l: PL, phi_r: PR, psi_u: PU) -> Result<(D, D)>
    where
        PL: Fn(&V) -> D,
        PR: Fn(&V) -> D,
        PU: Fn(&D, &D) -> D,
    {
        const OP: &str = "dacc_path";
        if self.is_empty() {
            return Err(SkeletonError::Empty { operation: OP });
        }

        let mut depth = DepthCounter::new();
        let mut paths: Option<(D, D)> = None;

        for entry in self.iter().rev() {
            match entry {
                TaggedValue::Leaf(_) => depth.leaf(),
                TaggedValue::Critical(v) => {
                    depth.critical(OP)?;
                    paths = Some((phi_l(v), phi_r(v)));
                }
                TaggedValue::Node(v) => {
                    let step = match depth.node() {
                        NodeRole::Plain => continue,
                        NodeRole::PathLeft => phi_l(v),
                        NodeRole::PathRight => phi_r(v),
                    };
                    paths = paths.map(|(to_left, to_right)| {
                        (psi_u(&step, &to_left), psi_u(&step, &to_right))
                    });
                }
            }
        }

        paths.ok_or_else(|| SkeletonError::application(OP, "segment has no critical entry"))
    }

    /// Local downward accumulation
    ///
    /// The segment root receives `received`; the children of a Node entry
    /// that received `acc` receive `gl(acc, value)` and `gr(acc, value)`.
    /// Leaf and Critical entries only record what they receive.
    pub fn dacc_local<C, GL, GR>(&self, gl: GL, gr: GR, received: C) -> Result<Segment<C>>
    where
        GL: Fn(&C, &V) -> C,
        GR: Fn(&C, &V) -> C,
    {
        const OP: &str = "dacc_local";
        let mut stack = vec![received];
        let mut entries = Vec::with_capacity(self.len());

        for entry in self.iter() {
            let acc = stack.pop().ok_or_else(|| {
                SkeletonError::ill_formed(OP, "an entry has no value to receive from a parent")
            })?;
            if let TaggedValue::Node(v) = entry {
                stack.push(gr(&acc, v));
                stack.push(gl(&acc, v));
            }
            entries.push(TaggedValue::new(entry.tag(), acc));
        }

        if !stack.is_empty() {
            return Err(SkeletonError::ill_formed(
                OP,
                format!("{} values were never delivered", stack.len()),
            ));
        }
        Ok(Segment::from(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(l: &i64, b: &i64, r: &i64) -> i64 {
        l + b + r
    }

    fn id(b: &i64) -> i64 {
        *b
    }

    /// N(1, N(2, L3, L4), C5) with the critical entry last
    fn open_right() -> Segment<i64> {
        Segment::from(vec![
            TaggedValue::Node(1),
            TaggedValue::Node(2),
            TaggedValue::Leaf(3),
            TaggedValue::Leaf(4),
            TaggedValue::Critical(5),
        ])
    }

    /// N(1, C2, L3): the critical entry has a right sibling after it
    fn open_left() -> Segment<i64> {
        Segment::from(vec![
            TaggedValue::Node(1),
            TaggedValue::Critical(2),
            TaggedValue::Leaf(3),
        ])
    }

    #[test]
    fn test_map_local_keeps_shape() {
        let mapped = open_right().map_local(|v| v * 10, |v| -v);
        assert_eq!(
            mapped.into_entries(),
            vec![
                TaggedValue::Node(-1),
                TaggedValue::Node(-2),
                TaggedValue::Leaf(30),
                TaggedValue::Leaf(40),
                TaggedValue::Critical(-5),
            ]
        );
    }

    #[test]
    fn test_reduce_local_closed() {
        let seg = Segment::from(vec![
            TaggedValue::Node(1),
            TaggedValue::Leaf(2),
            TaggedValue::Leaf(3),
        ]);
        assert_eq!(seg.reduce_local(add, id, add, add).unwrap(), TaggedValue::Leaf(6));
    }

    #[test]
    fn test_reduce_local_open_uses_path_combinators() {
        let marker_l = |l: &i64, b: &i64, r: &i64| 1000 + l + b + r;
        let marker_r = |l: &i64, b: &i64, r: &i64| 100_000 + l + b + r;
        // Node 1 sees the critical entry on its right: psi_r; node 2 is plain.
        let top = open_right().reduce_local(add, id, marker_l, marker_r).unwrap();
        assert_eq!(top, TaggedValue::Node(100_000 + 1 + 9 + 5));
        // Node 1 sees the critical entry on its left: psi_l.
        let top = open_left().reduce_local(add, id, marker_l, marker_r).unwrap();
        assert_eq!(top, TaggedValue::Node(1000 + 1 + 2 + 3));
    }

    #[test]
    fn test_reduce_local_errors() {
        assert!(matches!(
            Segment::<i64>::new().reduce_local(add, id, add, add),
            Err(SkeletonError::Empty { .. })
        ));
        let dangling = Segment::from(vec![TaggedValue::Node(1), TaggedValue::Leaf(2)]);
        assert!(matches!(
            dangling.reduce_local(add, id, add, add),
            Err(SkeletonError::IllFormed { .. })
        ));
        let two_critical = Segment::from(vec![
            TaggedValue::Node(1),
            TaggedValue::Critical(2),
            TaggedValue::Critical(3),
        ]);
        assert!(matches!(
            two_critical.reduce_local(add, id, add, add),
            Err(SkeletonError::IllFormed { .. })
        ));
    }

    #[test]
    fn test_uacc_local_marks_path() {
        let (top, partial) = open_right().uacc_local(add, id, add, add).unwrap();
        assert_eq!(top, TaggedValue::Node(15));
        assert_eq!(
            partial.into_entries(),
            vec![
                TaggedValue::Node(None),
                TaggedValue::Node(Some(9)),
                TaggedValue::Leaf(Some(3)),
                TaggedValue::Leaf(Some(4)),
                TaggedValue::Critical(None),
            ]
        );
    }

    #[test]
    fn test_uacc_update_fills_path() {
        let seg = open_left();
        let (_, partial) = seg.uacc_local(add, id, add, add).unwrap();
        // Children of the critical entry accumulate to 10 and 20.
        let done = seg.uacc_update(&partial, add, 10, 20).unwrap();
        assert_eq!(
            done.into_entries(),
            vec![
                TaggedValue::Node(1 + 32 + 3),
                TaggedValue::Critical(32),
                TaggedValue::Leaf(3),
            ]
        );
    }

    #[test]
    fn test_uacc_update_rejects_closed_segment() {
        let seg = Segment::from(vec![TaggedValue::Leaf(1)]);
        let (_, partial) = seg.uacc_local(add, id, add, add).unwrap();
        assert!(matches!(
            seg.uacc_update(&partial, add, 0, 0),
            Err(SkeletonError::Application { .. })
        ));
    }

    #[test]
    fn test_dacc_path_direction() {
        // Encode the path as a string so the fold order is visible.
        let phi_l = |v: &i64| format!("L{}", v);
        let phi_r = |v: &i64| format!("R{}", v);
        let psi_u = |above: &String, below: &String| format!("{}.{}", above, below);

        let (to_left, to_right) = open_right().dacc_path(phi_l, phi_r, psi_u).unwrap();
        assert_eq!(to_left, "R1.L5");
        assert_eq!(to_right, "R1.R5");

        let (to_left, to_right) = open_left().dacc_path(phi_l, phi_r, psi_u).unwrap();
        assert_eq!(to_left, "L1.L2");
        assert_eq!(to_right, "L1.R2");
    }

    #[test]
    fn test_dacc_path_needs_critical() {
        let seg = Segment::from(vec![TaggedValue::Leaf(1)]);
        assert!(matches!(
            seg.dacc_path(|v| *v, |v| *v, |a: &i64, b: &i64| a + b),
            Err(SkeletonError::Application { .. })
        ));
    }

    #[test]
    fn test_dacc_local_depths() {
        let depth = |c: &u32, _: &i64| c + 1;
        let seg = open_right().dacc_local(depth, depth, 7).unwrap();
        let values: Vec<u32> = seg.iter().map(|tv| *tv.value()).collect();
        assert_eq!(values, vec![7, 8, 9, 9, 8]);
        assert!(seg[4].is_critical());
    }

    #[test]
    fn test_dacc_local_ill_formed() {
        let depth = |c: &u32, _: &i64| c + 1;
        let dangling = Segment::from(vec![TaggedValue::Node(1), TaggedValue::Leaf(2)]);
        assert!(matches!(
            dangling.dacc_local(depth, depth, 0),
            Err(SkeletonError::IllFormed { .. })
        ));
        let orphan = Segment::from(vec![TaggedValue::Leaf(1), TaggedValue::Leaf(2)]);
        assert!(matches!(
            orphan.dacc_local(depth, depth, 0),
            Err(SkeletonError::IllFormed { .. })
        ));
    }
}
