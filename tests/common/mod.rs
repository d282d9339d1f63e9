//! Shared tree generators and combinator sets for integration tests

#![allow(dead_code)]

use std::cell::Cell;

use treeskel::BTree;

/// Number values in slot order, spreading them over negatives and positives
fn numbered(shape: &BTree<()>) -> BTree<i64> {
    let counter = Cell::new(0i64);
    let next = || {
        counter.set(counter.get() + 1);
        (counter.get() * 37) % 101 - 50
    };
    shape.map(|_| next(), |_| next())
}

/// Complete tree of the given height (one leaf at height 0)
pub fn complete(height: usize) -> BTree<i64> {
    fn shape(height: usize) -> BTree<()> {
        if height == 0 {
            BTree::leaf(())
        } else {
            BTree::node((), shape(height - 1), shape(height - 1))
        }
    }
    numbered(&shape(height))
}

/// Every internal node's left child is internal: a left spine
pub fn left_comb(leaves: usize) -> BTree<i64> {
    let mut tree = BTree::leaf(());
    for _ in 1..leaves {
        tree = BTree::node((), tree, BTree::leaf(()));
    }
    numbered(&tree)
}

/// Every internal node's right child is internal: a right spine
pub fn right_comb(leaves: usize) -> BTree<i64> {
    let mut tree = BTree::leaf(());
    for _ in 1..leaves {
        tree = BTree::node((), BTree::leaf(()), tree);
    }
    numbered(&tree)
}

/// Irregular tree with `leaves` leaves, shaped by a linear congruential
/// generator seeded with `seed`
pub fn irregular(leaves: usize, seed: u64) -> BTree<i64> {
    fn next(state: &mut u64) -> u64 {
        *state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *state >> 33
    }
    fn shape(leaves: usize, state: &mut u64) -> BTree<()> {
        if leaves <= 1 {
            return BTree::leaf(());
        }
        let left = 1 + (next(state) as usize) % (leaves - 1);
        let left_tree = shape(left, state);
        let right_tree = shape(leaves - left, state);
        BTree::node((), left_tree, right_tree)
    }
    let mut state = seed;
    numbered(&shape(leaves.max(1), &mut state))
}

/// A spread of shapes used by several test files
pub fn shapes() -> Vec<(&'static str, BTree<i64>)> {
    vec![
        ("leaf", BTree::leaf(42)),
        ("cherry", complete(1)),
        ("complete", complete(4)),
        ("left comb", left_comb(9)),
        ("right comb", right_comb(9)),
        ("irregular small", irregular(7, 3)),
        ("irregular", irregular(23, 11)),
        ("irregular large", irregular(64, 2024)),
    ]
}

// Sum: every combinator adds its three arguments.

pub fn add(l: &i64, b: &i64, r: &i64) -> i64 {
    l.wrapping_add(*b).wrapping_add(*r)
}

pub fn id(b: &i64) -> i64 {
    *b
}

// Weighted: k(l, b, r) = 2l + b + 3r. A path value (al, ar, s) stands for
// `al * L + ar * R + s` over the Critical entry's unknown children L and R;
// complete values are (0, 0, x).

pub type Weighted = (i64, i64, i64);

pub fn weighted(v: &i64) -> Weighted {
    (0, 0, *v)
}

pub fn w_k(l: &Weighted, b: &Weighted, r: &Weighted) -> Weighted {
    (0, 0, l.2.wrapping_mul(2).wrapping_add(b.2).wrapping_add(r.2.wrapping_mul(3)))
}

pub fn w_phi(b: &Weighted) -> Weighted {
    (2, 3, b.2)
}

pub fn w_psi_n(l: &Weighted, b: &Weighted, r: &Weighted) -> Weighted {
    (
        0,
        0,
        b.0.wrapping_mul(l.2)
            .wrapping_add(b.1.wrapping_mul(r.2))
            .wrapping_add(b.2),
    )
}

pub fn w_psi_l(c: &Weighted, b: &Weighted, r: &Weighted) -> Weighted {
    (
        b.0.wrapping_mul(c.0),
        b.0.wrapping_mul(c.1),
        b.0.wrapping_mul(c.2)
            .wrapping_add(b.1.wrapping_mul(r.2))
            .wrapping_add(b.2),
    )
}

pub fn w_psi_r(l: &Weighted, b: &Weighted, c: &Weighted) -> Weighted {
    (
        b.1.wrapping_mul(c.0),
        b.1.wrapping_mul(c.1),
        b.0.wrapping_mul(l.2)
            .wrapping_add(b.1.wrapping_mul(c.2))
            .wrapping_add(b.2),
    )
}

// Affine downward accumulation: gl(c, b) = 2c + b, gr(c, b) = 3c + b.
// A path value (a, s) stands for `x -> a * x + s`.

pub type Affine = (i64, i64);

pub fn gl(c: &i64, b: &i64) -> i64 {
    c.wrapping_mul(2).wrapping_add(*b)
}

pub fn gr(c: &i64, b: &i64) -> i64 {
    c.wrapping_mul(3).wrapping_add(*b)
}

pub fn phi_l(b: &i64) -> Affine {
    (2, *b)
}

pub fn phi_r(b: &i64) -> Affine {
    (3, *b)
}

/// `g` after `f`
pub fn psi_u(f: &Affine, g: &Affine) -> Affine {
    (g.0.wrapping_mul(f.0), g.0.wrapping_mul(f.1).wrapping_add(g.1))
}

pub fn psi_d(c: &i64, f: &Affine) -> i64 {
    f.0.wrapping_mul(*c).wrapping_add(f.1)
}
