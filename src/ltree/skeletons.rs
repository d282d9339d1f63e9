//! Skeletons over an LTree
//!
//! Each skeleton is a fixed pipeline of phases. Local phases run one
//! segment at a time through [`LTree::local_phase`]; global phases fold
//! the summary sequence (one entry per segment). A phase completes for all
//! segments before the next one starts.

use tracing::{debug, trace, warn};

use super::LTree;
use crate::segment::{Segment, TaggedValue};
use crate::{Result, SkeletonError};

impl<V> LTree<V> {
    /// Run `f` on every segment in order, stopping at the first failure
    pub(crate) fn local_phase<T, F>(&self, phase: &'static str, mut f: F) -> Result<Vec<T>>
    where
        F: FnMut(usize, &Segment<V>) -> Result<T>,
    {
        let mut results = Vec::with_capacity(self.len());
        for (index, segment) in self.iter().enumerate() {
            trace!(phase, index, entries = segment.len(), "local step");
            match f(index, segment) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(phase, index, error = %e, "local step failed");
                    return Err(e);
                }
            }
        }
        Ok(results)
    }

    fn require_segments(&self, operation: &'static str) -> Result<()> {
        if self.is_empty() {
            return Err(SkeletonError::Empty { operation });
        }
        Ok(())
    }

    /// Apply `f_leaf` to leaf values and `f_inner` to every other value
    pub fn map<U, FL, FI>(&self, f_leaf: FL, f_inner: FI) -> LTree<U>
    where
        FL: Fn(&V) -> U,
        FI: Fn(&V) -> U,
    {
        self.iter()
            .map(|segment| segment.map_local(&f_leaf, &f_inner))
            .collect()
    }

    /// Reduce the whole tree to one value
    ///
    /// Agrees with [`crate::BTree::reduce`] with `k` on the tree this LTree
    /// encodes, provided the combinators satisfy the upward closure laws:
    ///
    /// - `k(l, b, r) = psi_n(l, phi(b), r)`
    /// - `psi_n(psi_n(x, l, y), b, r) = psi_n(x, psi_l(l, b, r), y)`
    /// - `psi_n(l, b, psi_n(x, r, y)) = psi_n(x, psi_r(l, b, r), y)`
    pub fn reduce<K, P, PN, PL, PR>(
        &self,
        k: K,
        phi: P,
        psi_n: PN,
        psi_l: PL,
        psi_r: PR,
    ) -> Result<V>
    where
        V: Clone,
        K: Fn(&V, &V, &V) -> V,
        P: Fn(&V) -> V,
        PN: Fn(&V, &V, &V) -> V,
        PL: Fn(&V, &V, &V) -> V,
        PR: Fn(&V, &V, &V) -> V,
    {
        const OP: &str = "reduce";
        self.require_segments(OP)?;

        let tops: Segment<V> = self
            .local_phase("reduce_local", |_, segment| {
                segment.reduce_local(&k, &phi, &psi_l, &psi_r)
            })?
            .into_iter()
            .collect();

        debug!(segments = tops.len(), open = self.open_segments(), "reduce: global phase");
        tops.reduce_global(psi_n)
    }

    /// Upward accumulation: every node receives the reduction of its
    /// subtree, leaves keep their value
    ///
    /// Agrees with [`crate::BTree::uacc`] under the same closure laws as
    /// [`LTree::reduce`].
    pub fn uacc<K, P, PN, PL, PR>(
        &self,
        k: K,
        phi: P,
        psi_n: PN,
        psi_l: PL,
        psi_r: PR,
    ) -> Result<LTree<V>>
    where
        V: Clone,
        K: Fn(&V, &V, &V) -> V,
        P: Fn(&V) -> V,
        PN: Fn(&V, &V, &V) -> V,
        PL: Fn(&V, &V, &V) -> V,
        PR: Fn(&V, &V, &V) -> V,
    {
        const OP: &str = "uacc";
        self.require_segments(OP)?;

        let locals = self.local_phase("uacc_local", |_, segment| {
            segment.uacc_local(&k, &phi, &psi_l, &psi_r)
        })?;
        let (tops, mut partials): (Segment<V>, Vec<Segment<Option<V>>>) =
            locals.into_iter().unzip();

        debug!(segments = tops.len(), open = self.open_segments(), "uacc: global phase");
        let corrected = tops.uacc_global(&psi_n)?;
        let mut children: Vec<Option<(V, V)>> = corrected
            .child_indices()?
            .into_iter()
            .map(|pair| {
                pair.map(|(l, r)| (corrected[l].value().clone(), corrected[r].value().clone()))
            })
            .collect();

        debug!("uacc: update phase");
        let segments = self.local_phase("uacc_update", |index, segment| {
            let partial = std::mem::take(&mut partials[index]);
            match children[index].take() {
                Some((left, right)) => segment.uacc_update(&partial, &k, left, right),
                None => resolved(partial),
            }
        })?;
        Ok(LTree::from(segments))
    }

    /// Downward accumulation: the root receives `initial`; the children of
    /// a node that received `c` receive `gl(c, value)` and `gr(c, value)`
    ///
    /// Agrees with [`crate::BTree::dacc`] provided the combinators satisfy
    /// the downward closure laws:
    ///
    /// - `gl(c, b) = psi_d(c, phi_l(b))`
    /// - `gr(c, b) = psi_d(c, phi_r(b))`
    /// - `psi_d(psi_d(c, x), y) = psi_d(c, psi_u(x, y))`
    #[allow(clippy::too_many_arguments)]
    pub fn dacc<C, D, GL, GR, PL, PR, PU, PD>(
        &self,
        gl: GL,
        gr: GR,
        initial: C,
        phi_l: PL,
        phi_r: PR,
        psi_u: PU,
        psi_d: PD,
    ) -> Result<LTree<C>>
    where
        GL: Fn(&C, &V) -> C,
        GR: Fn(&C, &V) -> C,
        PL: Fn(&V) -> D,
        PR: Fn(&V) -> D,
        PU: Fn(&D, &D) -> D,
        PD: Fn(&C, &D) -> C,
    {
        const OP: &str = "dacc";
        self.require_segments(OP)?;

        let summaries: Segment<Option<(D, D)>> = self
            .local_phase("dacc_path", |_, segment| {
                if segment.has_critical() {
                    let path = segment.dacc_path(&phi_l, &phi_r, &psi_u)?;
                    Ok(TaggedValue::Node(Some(path)))
                } else {
                    Ok(TaggedValue::Leaf(None))
                }
            })?
            .into_iter()
            .collect();

        debug!(segments = summaries.len(), open = self.open_segments(), "dacc: global phase");
        let mut received: Vec<Option<C>> = summaries
            .dacc_global(psi_d, initial)?
            .into_iter()
            .map(|entry| Some(entry.into_value()))
            .collect();

        debug!("dacc: local phase");
        let segments = self.local_phase("dacc_local", |index, segment| {
            let c = received[index].take().ok_or_else(|| {
                SkeletonError::ill_formed(OP, "segment received no value")
            })?;
            segment.dacc_local(&gl, &gr, c)
        })?;
        Ok(LTree::from(segments))
    }

    /// Combine two LTrees with the same segments and tags position by
    /// position
    pub fn map2<W, U, F>(&self, f: F, other: &LTree<W>) -> Result<LTree<U>>
    where
        F: Fn(&V, &W) -> U,
    {
        if self.len() != other.len() {
            return Err(SkeletonError::TagMismatch {
                position: self.len().min(other.len()),
                detail: format!("{} segments vs {} segments", self.len(), other.len()),
            });
        }
        let segments = self.local_phase("map2", |index, segment| {
            segment.map2(&f, &other.segments[index])
        })?;
        Ok(LTree::from(segments))
    }

    /// Pair up the values of two LTrees with the same segments and tags
    pub fn zip<W>(&self, other: &LTree<W>) -> Result<LTree<(V, W)>>
    where
        V: Clone,
        W: Clone,
    {
        self.map2(|a, b| (a.clone(), b.clone()), other)
    }
}

/// Partial accumulation of a closed segment, every entry already resolved
fn resolved<V>(partial: Segment<Option<V>>) -> Result<Segment<V>> {
    partial
        .into_iter()
        .map(|entry| {
            let tag = entry.tag();
            entry
                .into_value()
                .map(|v| TaggedValue::new(tag, v))
                .ok_or_else(|| {
                    SkeletonError::ill_formed("uacc", "closed segment with an unresolved entry")
                })
        })
        .collect()
}
