//! Global halves: folds over the per-segment summary sequence
//!
//! The summaries of an LTree's segments, one per segment, form a tree of
//! their own: a closed segment is a Leaf, an open segment is a Node whose
//! two children are the segments holding its Critical entry's subtrees.
//! These folds run over that short sequence only.

use super::{pop_operands, single_result, Segment, TaggedValue};
use crate::{Result, SkeletonError};

impl<V> Segment<V> {
    fn reject_critical(&self, operation: &'static str) -> Result<()> {
        match self.critical_index() {
            Some(index) => Err(SkeletonError::application(
                operation,
                format!("summary sequence holds a critical entry at {}", index),
            )),
            None => Ok(()),
        }
    }

    /// Combine per-segment tops into the value of the whole tree
    ///
    /// Leaf tops are final; a Node top is combined with the values of its
    /// two child segments as `psi_n(left, top, right)`.
    pub fn reduce_global<PN>(&self, psi_n: PN) -> Result<V>
    where
        V: Clone,
        PN: Fn(&V, &V, &V) -> V,
    {
        const OP: &str = "reduce_global";
        if self.is_empty() {
            return Err(SkeletonError::Empty { operation: OP });
        }
        self.reject_critical(OP)?;

        let mut stack: Vec<V> = Vec::with_capacity(self.len());
        for entry in self.iter().rev() {
            match entry {
                TaggedValue::Node(v) => {
                    let (left, right) = pop_operands(&mut stack, OP)?;
                    stack.push(psi_n(&left, v, &right));
                }
                other => stack.push(other.value().clone()),
            }
        }
        single_result(stack, OP)
    }

    /// Corrected top of every segment
    ///
    /// Same fold as [`Segment::reduce_global`], keeping the value reached
    /// at each entry instead of only the first one.
    pub fn uacc_global<PN>(&self, psi_n: PN) -> Result<Segment<V>>
    where
        V: Clone,
        PN: Fn(&V, &V, &V) -> V,
    {
        const OP: &str = "uacc_global";
        if self.is_empty() {
            return Err(SkeletonError::Empty { operation: OP });
        }
        self.reject_critical(OP)?;

        let mut stack: Vec<V> = Vec::with_capacity(self.len());
        let mut entries = Vec::with_capacity(self.len());
        for entry in self.iter().rev() {
            let acc = match entry {
                TaggedValue::Node(v) => {
                    let (left, right) = pop_operands(&mut stack, OP)?;
                    psi_n(&left, v, &right)
                }
                other => other.value().clone(),
            };
            stack.push(acc.clone());
            entries.push(TaggedValue::new(entry.tag(), acc));
        }
        single_result(stack, OP)?;
        entries.reverse();
        Ok(Segment::from(entries))
    }

    fn child_check(&self, index: usize, operation: &'static str) -> Result<()> {
        if self.has_critical() {
            return Err(SkeletonError::application(
                operation,
                "children of an open segment are not all local",
            ));
        }
        match self.get(index) {
            Some(TaggedValue::Node(_)) => Ok(()),
            Some(_) => Err(SkeletonError::ill_formed(
                operation,
                format!("entry {} is a leaf", index),
            )),
            None => Err(SkeletonError::ill_formed(
                operation,
                format!("index {} is past the end ({} entries)", index, self.len()),
            )),
        }
    }

    /// Index of the left child of Node entry `index`
    pub fn left_index(&self, index: usize) -> Result<usize> {
        const OP: &str = "get_left";
        self.child_check(index, OP)?;
        if index + 1 >= self.len() {
            return Err(SkeletonError::ill_formed(OP, "node has no left child"));
        }
        Ok(index + 1)
    }

    /// Index of the right child of Node entry `index`
    ///
    /// Skips the complete left subtree: every Node opens one more pending
    /// subtree, every Leaf closes one.
    pub fn right_index(&self, index: usize) -> Result<usize> {
        const OP: &str = "get_right";
        self.child_check(index, OP)?;

        let mut pending = 1usize;
        for (position, entry) in self.iter().enumerate().skip(index + 1) {
            if entry.is_node() {
                pending += 1;
            } else {
                pending -= 1;
            }
            if pending == 0 {
                return if position + 1 < self.len() {
                    Ok(position + 1)
                } else {
                    Err(SkeletonError::ill_formed(OP, "node has no right child"))
                };
            }
        }
        Err(SkeletonError::ill_formed(OP, "left subtree never completes"))
    }

    /// Child indices of every entry, found in one right-to-left pass
    ///
    /// `Some((left, right))` for Node entries, `None` for the rest.
    pub fn child_indices(&self) -> Result<Vec<Option<(usize, usize)>>> {
        const OP: &str = "child_indices";
        if self.is_empty() {
            return Err(SkeletonError::Empty { operation: OP });
        }
        if self.has_critical() {
            return Err(SkeletonError::application(
                OP,
                "children of an open segment are not all local",
            ));
        }

        let mut stack: Vec<usize> = Vec::with_capacity(self.len());
        let mut children = vec![None; self.len()];
        for (index, entry) in self.iter().enumerate().rev() {
            if entry.is_node() {
                children[index] = Some(pop_operands(&mut stack, OP)?);
            }
            stack.push(index);
        }
        single_result(stack, OP)?;
        Ok(children)
    }

    /// Left child entry of Node entry `index`
    pub fn get_left(&self, index: usize) -> Result<&TaggedValue<V>> {
        let child = self.left_index(index)?;
        Ok(&self[child])
    }

    /// Right child entry of Node entry `index`
    pub fn get_right(&self, index: usize) -> Result<&TaggedValue<V>> {
        let child = self.right_index(index)?;
        Ok(&self[child])
    }
}

impl<D> Segment<Option<(D, D)>> {
    /// Value each segment receives from its parent segment
    ///
    /// Entries are `Node(Some((to_left, to_right)))` for open segments and
    /// `Leaf(None)` for closed ones. The first segment receives `initial`;
    /// an open segment that received `c` passes `psi_d(c, to_left)` and
    /// `psi_d(c, to_right)` to its two child segments.
    pub fn dacc_global<C, PD>(&self, psi_d: PD, initial: C) -> Result<Segment<C>>
    where
        PD: Fn(&C, &D) -> C,
    {
        const OP: &str = "dacc_global";
        if self.is_empty() {
            return Err(SkeletonError::Empty { operation: OP });
        }
        self.reject_critical(OP)?;

        let mut stack = vec![initial];
        let mut entries = Vec::with_capacity(self.len());
        for entry in self.iter() {
            let received = stack.pop().ok_or_else(|| {
                SkeletonError::ill_formed(OP, "a segment has no parent to receive from")
            })?;
            if let TaggedValue::Node(summary) = entry {
                let (to_left, to_right) = summary.as_ref().ok_or_else(|| {
                    SkeletonError::ill_formed(OP, "open segment without a path summary")
                })?;
                stack.push(psi_d(&received, to_right));
                stack.push(psi_d(&received, to_left));
            }
            entries.push(TaggedValue::new(entry.tag(), received));
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
