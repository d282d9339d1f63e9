mod common;

use common::*;
use proptest::prelude::*;
use treeskel::{BTree, LTree, PartitionConfig, SizeMeasure};

fn arb_tree() -> impl Strategy<Value = BTree<i64>> {
    let leaf = (-1000i64..1000).prop_map(BTree::leaf);
    leaf.prop_recursive(10, 128, 2, |inner| {
        (-1000i64..1000, inner.clone(), inner).prop_map(|(v, l, r)| BTree::node(v, l, r))
    })
}

/// A tree together with a bucket size between 1 and its leaf count
fn arb_partitioned() -> impl Strategy<Value = (BTree<i64>, usize)> {
    arb_tree().prop_flat_map(|bt| {
        let leaves = bt.leaf_count();
        (Just(bt), 1..=leaves)
    })
}

proptest! {
    #[test]
    fn partition_round_trips((bt, m) in arb_partitioned()) {
        let lt = LTree::from_btree(&bt, m).expect("partition succeeds");
        for segment in lt.iter() {
            prop_assert!(segment.iter().filter(|tv| tv.is_critical()).count() <= 1);
        }
        prop_assert_eq!(lt.to_btree().expect("deserialization succeeds"), bt);
    }

    #[test]
    fn node_measure_round_trips(bt in arb_tree(), m in 1usize..40) {
        let config = PartitionConfig::new(m).unwrap().with_size_measure(SizeMeasure::Nodes);
        let lt = LTree::from_btree_with(&bt, &config).expect("partition succeeds");
        for segment in lt.iter() {
            prop_assert!(segment.iter().filter(|tv| tv.is_critical()).count() <= 1);
        }
        prop_assert_eq!(lt.to_btree().expect("deserialization succeeds"), bt);
    }

    #[test]
    fn reduce_agrees((bt, m) in arb_partitioned()) {
        let lt = LTree::from_btree(&bt, m).unwrap();
        prop_assert_eq!(lt.reduce(add, id, add, add, add).unwrap(), bt.reduce(add));

        let bt = bt.map(weighted, weighted);
        let lt = LTree::from_btree(&bt, m).unwrap();
        let got = lt.reduce(w_k, w_phi, w_psi_n, w_psi_l, w_psi_r).unwrap();
        prop_assert_eq!(got, bt.reduce(w_k));
    }

    #[test]
    fn uacc_agrees((bt, m) in arb_partitioned()) {
        let bt = bt.map(weighted, weighted);
        let lt = LTree::from_btree(&bt, m).unwrap();
        let acc = lt.uacc(w_k, w_phi, w_psi_n, w_psi_l, w_psi_r).unwrap();
        prop_assert_eq!(acc.to_btree().unwrap(), bt.uacc(w_k));
    }

    #[test]
    fn dacc_agrees((bt, m) in arb_partitioned(), initial in -100i64..100) {
        let lt = LTree::from_btree(&bt, m).unwrap();
        let acc = lt.dacc(gl, gr, initial, phi_l, phi_r, psi_u, psi_d).unwrap();
        prop_assert_eq!(acc.to_btree().unwrap(), bt.dacc(gl, gr, initial));
    }

    #[test]
    fn text_round_trips((bt, m) in arb_partitioned()) {
        let lt = LTree::from_btree(&bt, m).unwrap();
        let parsed: LTree<i64> = lt.to_string().parse().expect("text parses back");
        prop_assert_eq!(parsed, lt);
    }
}
