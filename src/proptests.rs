use crate::avl_tree::AvlTree;
use crate::harness::{build_both, query_both};
use crate::key::Key;
use crate::key_stream::KeyStreamItem;

use proptest::prelude::*;
use std::collections::BTreeSet;

fn keys_strategy() -> impl Strategy<Value = Vec<i32>> {
    // narrow range so duplicates are common
    prop::collection::vec(-500i32..500, 0..=600)
}

fn finite_key() -> impl Strategy<Value = Key> {
    (-1e6f64..1e6).prop_map(|v| Key::new(v).expect("range is finite"))
}

fn stream(keys: &[i32]) -> Vec<KeyStreamItem<i32>> {
    keys.iter()
        .enumerate()
        .map(|(i, &key)| KeyStreamItem {
            group_id: format!("G{}", i % 7),
            timestamp: format!("day-{i:05}"),
            key,
        })
        .collect()
}

// smallest node count of an AVL tree of height h
fn min_nodes(height: usize) -> usize {
    let (mut a, mut b) = (0usize, 1usize);
    for _ in 1..height {
        let next = a + b + 1;
        a = b;
        b = next;
    }
    if height == 0 { 0 } else { b }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_invariants_hold(keys in keys_strategy()) {
        let tree = AvlTree::new_with_keys(keys.iter().copied());
        prop_assert_eq!(tree.validate(), Ok(()));
        prop_assert!(tree.len() >= min_nodes(tree.height()));
    }

    #[test]
    fn prop_in_order_is_strictly_ascending(keys in keys_strategy()) {
        let tree: AvlTree<i32> = keys.iter().copied().collect();
        let walked: Vec<i32> = tree.iter().copied().collect();
        let expected: Vec<i32> = keys.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert!(walked.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(walked, expected);
    }

    #[test]
    fn prop_duplicate_insert_is_idempotent(keys in keys_strategy(), extra in -500i32..500) {
        let mut once = AvlTree::new_with_keys(keys.iter().copied());
        once.insert(extra);
        let mut twice = once.clone();
        prop_assert!(!twice.insert(extra));

        prop_assert_eq!(twice.len(), once.len());
        prop_assert_eq!(twice.height(), once.height());
        prop_assert_eq!(twice.root_key(), once.root_key());
        prop_assert!(twice.iter().eq(once.iter()));
    }

    #[test]
    fn prop_tree_agrees_with_baseline(keys in keys_strategy(), probes in prop::collection::vec(-600i32..600, 0..100)) {
        let report = build_both(stream(&keys));
        prop_assert_eq!(report.baseline.len(), keys.len());

        for probe in probes.iter().chain(keys.iter()) {
            let query = query_both(&report.tree, &report.baseline, probe);
            prop_assert_eq!(query.found_tree, query.found_baseline);
            prop_assert_eq!(query.found_tree, keys.contains(probe));
        }
    }

    #[test]
    fn prop_search_path_is_bounded_by_height(keys in keys_strategy(), probe in -600i32..600) {
        let tree = AvlTree::new_with_keys(keys.iter().copied());
        let trace = tree.search_path(&probe);
        prop_assert!(trace.path.len() <= tree.height());
        prop_assert_eq!(trace.found, tree.contains(&probe));
        if trace.found {
            prop_assert_eq!(trace.path.last(), Some(&probe));
        }
    }

    #[test]
    fn prop_float_keys(keys in prop::collection::vec(finite_key(), 0..300)) {
        let tree = AvlTree::new_with_keys(keys.iter().copied());
        prop_assert_eq!(tree.validate(), Ok(()));
        for key in &keys {
            prop_assert!(tree.contains(key));
        }
    }
}
