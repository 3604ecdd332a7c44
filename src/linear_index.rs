/// One appended record of a [`LinearIndex`].
#[derive(Clone, Debug, PartialEq)]
pub struct BaselineEntry<K> {
    pub key: K,
    pub group_id: String,
    pub timestamp: String,
}

/// Append-only, unsorted sequence searched front to back.
///
/// Serves as the control structure when timing [`crate::avl_tree::AvlTree`]:
/// no ordering is maintained and duplicates are kept.
#[derive(Clone, Debug)]
pub struct LinearIndex<K> {
    entries: Vec<BaselineEntry<K>>,
}

impl<K> Default for LinearIndex<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K> LinearIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn append(&mut self, entry: BaselineEntry<K>) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, BaselineEntry<K>> {
        self.entries.iter()
    }
}

impl<K: PartialEq> LinearIndex<K> {
    pub fn scan(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// First entry, in append order, whose key equals `key`.
    pub fn find(&self, key: &K) -> Option<&BaselineEntry<K>> {
        self.entries.iter().find(|entry| entry.key == *key)
    }
}

impl<K> Extend<BaselineEntry<K>> for LinearIndex<K> {
    fn extend<I: IntoIterator<Item = BaselineEntry<K>>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: i32, group: &str, date: &str) -> BaselineEntry<i32> {
        BaselineEntry {
            key,
            group_id: group.to_string(),
            timestamp: date.to_string(),
        }
    }

    #[test]
    fn test_empty_index() {
        let index: LinearIndex<i32> = LinearIndex::new();
        assert!(index.is_empty());
        assert!(!index.scan(&0));
        assert!(index.find(&0).is_none());
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut index = LinearIndex::new();
        index.append(entry(30, "AAL", "2013-02-08"));
        index.append(entry(10, "AAL", "2013-02-11"));
        index.append(entry(20, "AAPL", "2013-02-08"));

        let keys: Vec<_> = index.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![30, 10, 20]);
    }

    #[test]
    fn test_scan() {
        let mut index = LinearIndex::with_capacity(3);
        index.append(entry(-4, "A", "d1"));
        index.append(entry(7, "B", "d2"));

        assert!(index.scan(&-4));
        assert!(index.scan(&7));
        assert!(!index.scan(&5));
    }

    #[test]
    fn test_duplicates_are_kept_and_first_wins() {
        let mut index = LinearIndex::new();
        index.append(entry(5, "A", "d1"));
        index.append(entry(5, "B", "d2"));

        assert_eq!(index.len(), 2);
        let found = index.find(&5).unwrap();
        assert_eq!(found.group_id, "A");
        assert_eq!(found.timestamp, "d1");
    }
}
