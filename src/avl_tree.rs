use crate::error::InvariantViolation;
use std::cmp::Ordering;
use std::fmt::Display;

type Link<K> = Option<Box<TreeNode<K>>>;

/// Height-balanced binary search tree over bare keys.
///
/// Keys are kept in strict order: inserting a key equal to one already
/// present leaves the tree untouched. After every insertion each node's
/// subtree heights differ by at most one.
///
/// # Example
/// ```rust
/// use volatility_avl::avl_tree::AvlTree;
/// let mut tree = AvlTree::new();
/// for key in [50, 30, 70, 20, 40, 60, 80, 10] {
///     tree.insert(key);
/// }
/// assert_eq!(tree.height(), 4);
/// assert!(tree.contains(&10));
/// assert!(!tree.contains(&99));
/// ```
#[derive(Clone, Debug)]
pub struct AvlTree<K> {
    root: Link<K>,
    len: usize,
}

#[derive(Clone, Debug)]
struct TreeNode<K> {
    key: K,
    // cached, 1 for a leaf
    height: usize,
    left: Link<K>,
    right: Link<K>,
}

/// Result of [`AvlTree::search_path`]: whether the key was found and the
/// keys visited on the way, root first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTrace<K> {
    pub found: bool,
    pub path: Vec<K>,
}

impl<K> TreeNode<K> {
    fn leaf(key: K) -> Self {
        Self {
            key,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height_of(&self.left).max(height_of(&self.right));
    }

    fn balance_factor(&self) -> isize {
        height_of(&self.left) as isize - height_of(&self.right) as isize
    }
}

fn height_of<K>(node: &Link<K>) -> usize {
    node.as_ref().map_or(0, |n| n.height)
}

fn balance_factor_of<K>(node: &Link<K>) -> isize {
    node.as_ref().map_or(0, |n| n.balance_factor())
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<K> AvlTree<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree; 0 when empty.
    pub fn height(&self) -> usize {
        height_of(&self.root)
    }

    /// Balance factor at the root; 0 when empty.
    pub fn balance_factor(&self) -> isize {
        balance_factor_of(&self.root)
    }

    pub fn root_key(&self) -> Option<&K> {
        self.root.as_ref().map(|n| &n.key)
    }

    /// Keys in ascending order. Each call starts a fresh traversal.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.root, self.len)
    }

    pub fn min(&self) -> Option<&K> {
        Self::min_key(&self.root)
    }

    pub fn max(&self) -> Option<&K> {
        Self::max_key(&self.root)
    }

    fn min_key(node: &Link<K>) -> Option<&K> {
        match node {
            None => None,
            Some(n) => {
                if n.left.is_none() {
                    Some(&n.key)
                } else {
                    Self::min_key(&n.left)
                }
            }
        }
    }

    fn max_key(node: &Link<K>) -> Option<&K> {
        match node {
            None => None,
            Some(n) => {
                if n.right.is_none() {
                    Some(&n.key)
                } else {
                    Self::max_key(&n.right)
                }
            }
        }
    }
}

impl<K: Ord> AvlTree<K> {
    pub fn new_with_keys<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut tree = Self::new();
        tree.extend(keys);
        tree
    }

    /// Inserts `key`, rebalancing along the insertion path.
    ///
    /// Returns `false` and leaves the tree unchanged when an equal key is
    /// already present.
    pub fn insert(&mut self, key: K) -> bool {
        let mut inserted = false;
        self.root = Some(Self::insert_recursive(self.root.take(), key, &mut inserted));
        if inserted {
            self.len += 1;
        }
        inserted
    }

    fn insert_recursive(node: Link<K>, key: K, inserted: &mut bool) -> Box<TreeNode<K>> {
        let mut n = match node {
            None => {
                *inserted = true;
                return Box::new(TreeNode::leaf(key));
            }
            Some(n) => n,
        };

        match key.cmp(&n.key) {
            Ordering::Less => {
                n.left = Some(Self::insert_recursive(n.left.take(), key, inserted));
            }
            Ordering::Greater => {
                n.right = Some(Self::insert_recursive(n.right.take(), key, inserted));
            }
            // duplicate, dropped
            Ordering::Equal => return n,
        }

        // nothing below changed shape, so neither did this ancestor
        if !*inserted {
            return n;
        }

        n.update_height();
        Self::rebalance(n)
    }

    /// Restores the balance invariant at `node`, assuming both subtrees
    /// already satisfy it. Only `node` and one of its children are touched.
    fn rebalance(mut node: Box<TreeNode<K>>) -> Box<TreeNode<K>> {
        let balance = node.balance_factor();

        if balance > 1 {
            // left-right: straighten the left child into a left-left shape
            if balance_factor_of(&node.left) < 0 {
                node.left = node.left.take().map(Self::rotate_left);
            }
            return Self::rotate_right(node);
        }

        if balance < -1 {
            // right-left
            if balance_factor_of(&node.right) > 0 {
                node.right = node.right.take().map(Self::rotate_right);
            }
            return Self::rotate_left(node);
        }

        node
    }

    /// Promotes the right child. A node without a right child is returned as is.
    fn rotate_left(mut node: Box<TreeNode<K>>) -> Box<TreeNode<K>> {
        let Some(mut new_root) = node.right.take() else {
            return node;
        };
        node.right = new_root.left.take();
        node.update_height();
        new_root.left = Some(node);
        new_root.update_height();
        new_root
    }

    /// Promotes the left child. A node without a left child is returned as is.
    fn rotate_right(mut node: Box<TreeNode<K>>) -> Box<TreeNode<K>> {
        let Some(mut new_root) = node.left.take() else {
            return node;
        };
        node.left = new_root.right.take();
        node.update_height();
        new_root.right = Some(node);
        new_root.update_height();
        new_root
    }

    pub fn contains(&self, key: &K) -> bool {
        Self::contains_recursive(&self.root, key)
    }

    fn contains_recursive(node: &Link<K>, key: &K) -> bool {
        match node {
            None => false,
            Some(n) => match key.cmp(&n.key) {
                Ordering::Equal => true,
                Ordering::Less => Self::contains_recursive(&n.left, key),
                Ordering::Greater => Self::contains_recursive(&n.right, key),
            },
        }
    }

    /// Checks ordering, balance, cached heights and the stored length.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut counted = 0;
        Self::validate_recursive(&self.root, None, None, 0, &mut counted)?;
        if counted != self.len {
            return Err(InvariantViolation::LengthMismatch {
                counted,
                recorded: self.len,
            });
        }
        Ok(())
    }

    // returns the recomputed height of `node`
    fn validate_recursive(
        node: &Link<K>,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        counted: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        let Some(n) = node else {
            return Ok(0);
        };

        let above_lower = lower.is_none_or(|low| *low < n.key);
        let below_upper = upper.is_none_or(|high| n.key < *high);
        if !above_lower || !below_upper {
            return Err(InvariantViolation::OrderViolation { depth });
        }

        *counted += 1;
        let left = Self::validate_recursive(&n.left, lower, Some(&n.key), depth + 1, counted)?;
        let right = Self::validate_recursive(&n.right, Some(&n.key), upper, depth + 1, counted)?;

        let actual = 1 + left.max(right);
        if n.height != actual {
            return Err(InvariantViolation::StaleHeight {
                depth,
                cached: n.height,
                actual,
            });
        }

        let balance = left as isize - right as isize;
        if !(-1..=1).contains(&balance) {
            return Err(InvariantViolation::Unbalanced { depth, balance });
        }

        Ok(actual)
    }
}

impl<K: Ord + Clone> AvlTree<K> {
    /// Same walk as [`AvlTree::contains`], recording every key visited.
    pub fn search_path(&self, key: &K) -> SearchTrace<K> {
        let mut path = Vec::with_capacity(self.height());
        let mut node = &self.root;
        while let Some(n) = node {
            path.push(n.key.clone());
            node = match key.cmp(&n.key) {
                Ordering::Equal => return SearchTrace { found: true, path },
                Ordering::Less => &n.left,
                Ordering::Greater => &n.right,
            };
        }
        SearchTrace { found: false, path }
    }
}

impl<K: Display> AvlTree<K> {
    pub fn pretty_print(&self) {
        println!("\n=== AVL Tree ({} keys, height {}) ===", self.len, self.height());
        if self.root.is_none() {
            println!("  (empty tree)");
        } else {
            Self::print_tree(&self.root, "", true);
        }
        println!("=========================\n");
    }

    fn print_tree(node: &Link<K>, prefix: &str, is_tail: bool) {
        if let Some(n) = node {
            println!(
                "{}{} {} (bf {})",
                prefix,
                if is_tail { "└──" } else { "├──" },
                n.key,
                n.balance_factor()
            );

            let new_prefix = format!("{}{}", prefix, if is_tail { "    " } else { "│   " });

            if n.right.is_some() {
                Self::print_tree(&n.right, &new_prefix, n.left.is_none());
            }
            if n.left.is_some() {
                Self::print_tree(&n.left, &new_prefix, true);
            }
        }
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::new_with_keys(iter)
    }
}

/// In-order iterator over the keys of an [`AvlTree`].
pub struct Iter<'a, K> {
    stack: Vec<&'a TreeNode<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn new(root: &'a Link<K>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: &'a Link<K>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = &n.left;
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
