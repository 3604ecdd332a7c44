use crate::error::{DatasetError, Result};
use crate::key::Key;
use crate::key_stream::{KeyStreamItem, PriceRecord};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which extreme of a group's volatility to look up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Lowest volatility: the group's deepest dip.
    Buy,
    /// Highest volatility: the group's strongest rise.
    Sell,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected BUY or SELL, got {0:?}")]
pub struct ParseSideError(String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(ParseSideError(s.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

/// Canonical form of a user-typed ticker: trimmed and upper-cased.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Volatility keys grouped by ticker, then ordered by date.
///
/// A date recorded twice for the same ticker keeps its first key.
#[derive(Debug, Default)]
pub struct StockBook {
    groups: DashMap<String, BTreeMap<String, Key>>,
}

impl StockBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a PriceRecord>,
    {
        let book = Self::new();
        for record in records {
            book.record(&record.name, &record.date, record.key());
        }
        book
    }

    /// Returns `false` if the group already had a key for `date`.
    pub fn record(&self, group: &str, date: &str, key: Key) -> bool {
        let mut dates = self.groups.entry(group.to_string()).or_default();
        if dates.contains_key(date) {
            return false;
        }
        dates.insert(date.to_string(), key);
        true
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|group| group.value().len()).sum()
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Group names in ascending order.
    pub fn groups(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.iter().map(|g| g.key().clone()).collect();
        names.sort();
        names
    }

    /// Every recorded key, ordered by group name and then by date.
    pub fn key_stream(&self) -> Vec<KeyStreamItem> {
        let mut items = Vec::with_capacity(self.record_count());
        for name in self.groups() {
            if let Some(dates) = self.groups.get(&name) {
                items.extend(dates.iter().map(|(date, key)| KeyStreamItem {
                    group_id: name.clone(),
                    timestamp: date.clone(),
                    key: *key,
                }));
            }
        }
        items
    }

    /// The group's record with the lowest (`Buy`) or highest (`Sell`) key.
    ///
    /// Ties go to the earliest date.
    pub fn extreme(&self, group: &str, side: Side) -> Result<KeyStreamItem> {
        let dates = self
            .groups
            .get(group)
            .ok_or_else(|| DatasetError::UnknownGroup(group.to_string()))?;

        let mut best: Option<(&String, &Key)> = None;
        for (date, key) in dates.iter() {
            let better = match (best, side) {
                (None, _) => true,
                (Some((_, current)), Side::Buy) => key < current,
                (Some((_, current)), Side::Sell) => key > current,
            };
            if better {
                best = Some((date, key));
            }
        }

        let (date, key) = best.ok_or_else(|| DatasetError::EmptyGroup(group.to_string()))?;
        Ok(KeyStreamItem {
            group_id: group.to_string(),
            timestamp: date.clone(),
            key: *key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(v: f64) -> Key {
        Key::new(v).unwrap()
    }

    fn sample_book() -> StockBook {
        let book = StockBook::new();
        book.record("AAPL", "2013-02-08", key(1.5));
        book.record("AAL", "2013-02-11", key(-3.0));
        book.record("AAL", "2013-02-08", key(2.0));
        book.record("AAL", "2013-02-12", key(2.0));
        book
    }

    #[test]
    fn test_side_parsing() {
        assert_eq!("BUY".parse::<Side>(), Ok(Side::Buy));
        assert_eq!(" sell ".parse::<Side>(), Ok(Side::Sell));
        assert!("HOLD".parse::<Side>().is_err());
        assert_eq!(Side::Sell.to_string(), "SELL");
    }

    #[test]
    fn test_normalized_ticker_finds_group() {
        let book = sample_book();
        assert_eq!(normalize_ticker("  aapl\n"), "AAPL");
        assert!(book.extreme("aal", Side::Buy).is_err());
        let dip = book.extreme(&normalize_ticker("aal"), Side::Buy).unwrap();
        assert_eq!(dip.group_id, "AAL");
    }

    #[test]
    fn test_counts() {
        let book = sample_book();
        assert_eq!(book.group_count(), 2);
        assert_eq!(book.record_count(), 4);
        assert!(book.contains_group("AAL"));
        assert!(!book.contains_group("MSFT"));
        assert_eq!(book.groups(), vec!["AAL".to_string(), "AAPL".to_string()]);
    }

    #[test]
    fn test_first_date_wins() {
        let book = sample_book();
        assert!(!book.record("AAL", "2013-02-08", key(99.0)));
        let top = book.extreme("AAL", Side::Sell).unwrap();
        assert_eq!(top.key, key(2.0));
    }

    #[test]
    fn test_key_stream_order() {
        let stream = sample_book().key_stream();
        let order: Vec<(&str, &str)> = stream
            .iter()
            .map(|item| (item.group_id.as_str(), item.timestamp.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("AAL", "2013-02-08"),
                ("AAL", "2013-02-11"),
                ("AAL", "2013-02-12"),
                ("AAPL", "2013-02-08"),
            ]
        );
    }

    #[test]
    fn test_extremes() {
        let book = sample_book();

        let dip = book.extreme("AAL", Side::Buy).unwrap();
        assert_eq!(dip.timestamp, "2013-02-11");
        assert_eq!(dip.key, key(-3.0));

        // tie between 02-08 and 02-12 goes to the earlier date
        let rise = book.extreme("AAL", Side::Sell).unwrap();
        assert_eq!(rise.timestamp, "2013-02-08");
    }

    #[test]
    fn test_unknown_group() {
        let book = sample_book();
        assert!(matches!(
            book.extreme("MSFT", Side::Buy),
            Err(DatasetError::UnknownGroup(name)) if name == "MSFT"
        ));
    }

    #[test]
    fn test_from_records() {
        let records = vec![PriceRecord {
            date: "2013-02-08".into(),
            open: 10.0,
            high: 12.0,
            low: 10.0,
            close: 11.0,
            volume: 100.0,
            name: "XYZ".into(),
        }];
        let book = StockBook::from_records(&records);
        let item = book.extreme("XYZ", Side::Sell).unwrap();
        assert!((item.key.get() - 20.0).abs() < 1e-9);
    }
}
