use volatility_avl::AvlTree;

fn main() {
    let tree = AvlTree::new_with_keys([50, 30, 70, 20, 40, 60, 80, 10]);
    tree.pretty_print();

    let mut tree2 = AvlTree::new();
    tree2.pretty_print();
    for &key in &[50, 25, 75, 12, 37, 62, 87] {
        tree2.insert(key);
    }
    tree2.pretty_print();

    // ascending input would degenerate into a list without rotations
    let mut tree3 = AvlTree::new();
    for key in 1..=15 {
        tree3.insert(key);
    }
    tree3.pretty_print();

    // duplicates are dropped
    let mut tree4 = AvlTree::new();
    for &key in &[1, 1, 1] {
        tree4.insert(key);
    }
    tree4.pretty_print();

    for probe in [10, 99] {
        let trace = tree.search_path(&probe);
        println!("search {probe}: found={} path={:?}", trace.found, trace.path);
    }
}
