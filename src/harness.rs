//! Timed build and lookup over an [`AvlTree`] and a [`LinearIndex`] fed
//! from the same key stream.

use crate::avl_tree::AvlTree;
use crate::key_stream::KeyStreamItem;
use crate::linear_index::{BaselineEntry, LinearIndex};
use crate::utils::timed;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Both structures after a build, with the time each one took.
#[derive(Debug)]
pub struct BuildReport<K> {
    pub tree: AvlTree<K>,
    pub baseline: LinearIndex<K>,
    pub tree_build: Duration,
    pub baseline_build: Duration,
    /// Items consumed from the stream, duplicates included.
    pub items: usize,
}

/// Outcome of looking one key up in both structures.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryReport {
    pub found_tree: bool,
    pub tree_lookup: Duration,
    pub found_baseline: bool,
    pub baseline_lookup: Duration,
}

impl QueryReport {
    /// How many times slower the scan was than the tree search.
    pub fn speedup(&self) -> f64 {
        self.baseline_lookup.as_nanos() as f64 / self.tree_lookup.as_nanos().max(1) as f64
    }
}

impl<K> From<KeyStreamItem<K>> for BaselineEntry<K> {
    fn from(item: KeyStreamItem<K>) -> Self {
        BaselineEntry {
            key: item.key,
            group_id: item.group_id,
            timestamp: item.timestamp,
        }
    }
}

/// Consumes `stream` once and builds both structures from it.
///
/// The stream is collected first so neither timing includes producing items.
pub fn build_both<K, I>(stream: I) -> BuildReport<K>
where
    K: Ord + Clone,
    I: IntoIterator<Item = KeyStreamItem<K>>,
{
    let items: Vec<KeyStreamItem<K>> = stream.into_iter().collect();
    let count = items.len();

    let (tree, tree_build) = timed(|| {
        let mut tree = AvlTree::new();
        for item in &items {
            tree.insert(item.key.clone());
        }
        tree
    });
    debug!(
        nodes = tree.len(),
        height = tree.height(),
        dropped = count - tree.len(),
        "tree built"
    );

    let (baseline, baseline_build) = timed(|| {
        let mut baseline = LinearIndex::with_capacity(count);
        baseline.extend(items.into_iter().map(BaselineEntry::from));
        baseline
    });

    info!(
        items = count,
        tree_build = ?tree_build,
        baseline_build = ?baseline_build,
        "build phase finished"
    );

    BuildReport {
        tree,
        baseline,
        tree_build,
        baseline_build,
        items: count,
    }
}

/// Looks `target` up with [`AvlTree::contains`] and [`LinearIndex::scan`],
/// timing each separately.
pub fn query_both<K: Ord>(tree: &AvlTree<K>, baseline: &LinearIndex<K>, target: &K) -> QueryReport {
    let (found_tree, tree_lookup) = timed(|| tree.contains(target));
    let (found_baseline, baseline_lookup) = timed(|| baseline.scan(target));

    info!(
        found_tree,
        tree_lookup = ?tree_lookup,
        found_baseline,
        baseline_lookup = ?baseline_lookup,
        "query phase finished"
    );

    QueryReport {
        found_tree,
        tree_lookup,
        found_baseline,
        baseline_lookup,
    }
}

impl<K> fmt::Display for BuildReport<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "AVL tree:     {:>10.3?}  ({} nodes, height {})",
            self.tree_build,
            self.tree.len(),
            self.tree.height()
        )?;
        write!(
            f,
            "linear index: {:>10.3?}  ({} entries)",
            self.baseline_build,
            self.baseline.len()
        )
    }
}

impl fmt::Display for QueryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "AVL tree search:   {:>10.3?}  found={}",
            self.tree_lookup, self.found_tree
        )?;
        writeln!(
            f,
            "linear index scan: {:>10.3?}  found={}",
            self.baseline_lookup, self.found_baseline
        )?;
        write!(f, "scan/search ratio: {:.2}", self.speedup())
    }
}
