//! Reading dated price rows and turning them into keyed stream items.
//!
//! Rows follow the `date,open,high,low,close,volume,Name` layout. Each row
//! yields one [`KeyStreamItem`] whose key is the row's volatility.

use crate::error::{DatasetError, Result};
use crate::key::Key;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Volatilities beyond this magnitude are replaced with [`Key::ZERO`].
pub const VOLATILITY_LIMIT: f64 = 1e10;

/// Price used for every column of a row with no open or close price.
const FLAT_PRICE: f64 = 1.0;

/// One keyed record handed to the tree and to the baseline index.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyStreamItem<K = Key> {
    pub group_id: String,
    pub timestamp: String,
    pub key: K,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    open: String,
    high: String,
    low: String,
    close: String,
    #[serde(default)]
    volume: String,
    #[serde(rename = "Name")]
    name: String,
}

/// A parsed price row.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceRecord {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub name: String,
}

impl PriceRecord {
    pub fn volatility(&self) -> f64 {
        volatility(self.open, self.high, self.low, self.close)
    }

    /// Sanitized volatility key for this row.
    pub fn key(&self) -> Key {
        sanitize(self.volatility())
    }

    pub fn to_stream_item(&self) -> KeyStreamItem {
        KeyStreamItem {
            group_id: self.name.clone(),
            timestamp: self.date.clone(),
            key: self.key(),
        }
    }

    fn from_raw(raw: RawRow, line: u64) -> Result<Self> {
        let volume = parse_field(&raw.volume, "volume", line)?.unwrap_or(0.0);

        // rows missing either end of the day carry no movement
        if raw.open.trim().is_empty() || raw.close.trim().is_empty() {
            return Ok(Self {
                date: raw.date,
                open: FLAT_PRICE,
                high: FLAT_PRICE,
                low: FLAT_PRICE,
                close: FLAT_PRICE,
                volume,
                name: raw.name,
            });
        }

        let open = require_field(&raw.open, "open", line)?;
        let close = require_field(&raw.close, "close", line)?;
        // a missing high or low means no intraday range beyond open/close
        let high = parse_field(&raw.high, "high", line)?.unwrap_or(open.max(close));
        let low = parse_field(&raw.low, "low", line)?.unwrap_or(open.min(close));

        Ok(Self {
            date: raw.date,
            open,
            high,
            low,
            close,
            volume,
            name: raw.name,
        })
    }
}

/// Percent change over the day multiplied by the intraday spread.
pub fn volatility(open: f64, high: f64, low: f64, close: f64) -> f64 {
    let percent_change = (close - open) / open * 100.0;
    let spread = high - low;
    percent_change * spread
}

/// Coerces non-finite or out-of-range volatilities to [`Key::ZERO`].
pub fn sanitize(raw: f64) -> Key {
    if raw.abs() > VOLATILITY_LIMIT {
        warn!(raw, "volatility out of range, using 0");
        return Key::ZERO;
    }
    Key::new(raw).unwrap_or_else(|err| {
        warn!(%err, "unusable volatility, using 0");
        Key::ZERO
    })
}

fn parse_field(value: &str, field: &'static str, line: u64) -> Result<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| DatasetError::InvalidPrice {
            line,
            field,
            value: value.to_string(),
        })
}

fn require_field(value: &str, field: &'static str, line: u64) -> Result<f64> {
    parse_field(value, field, line)?.ok_or_else(|| DatasetError::InvalidPrice {
        line,
        field,
        value: String::new(),
    })
}

/// Reads every row of a headed CSV document.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<PriceRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let line = row.position().map_or(0, |pos| pos.line());
        let raw: RawRow = row.deserialize(Some(&headers))?;
        records.push(PriceRecord::from_raw(raw, line)?);
    }

    debug!(rows = records.len(), "read price rows");
    Ok(records)
}

pub fn read_records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<PriceRecord>> {
    let file = std::fs::File::open(path)?;
    read_records(std::io::BufReader::new(file))
}
