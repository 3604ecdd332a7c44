use crate::error::{DatasetError, Result};
use crate::key::Key;
use crate::key_stream::{PriceRecord, sanitize};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Uniform};

// default = 64k keys
const DEFAULT_COUNT: usize = 1 << 16;

const TICKER_MIN_LEN: usize = 1;
const TICKER_MAX_LEN: usize = 5;

/// Number of distinct tickers of length `TICKER_MIN_LEN..=TICKER_MAX_LEN`.
pub const TICKER_SPACE: usize = ticker_space();

const fn ticker_space() -> usize {
    let mut total = 0;
    let mut len = TICKER_MIN_LEN;
    while len <= TICKER_MAX_LEN {
        total += 26usize.pow(len as u32);
        len += 1;
    }
    total
}

pub fn generate_normal_keys<R: Rng>(
    rng: &mut R,
    count: usize,
    mean: f64,
    std_dev: f64,
) -> Result<Vec<Key>> {
    let normal = Normal::new(mean, std_dev)?;

    Ok((0..count)
        .map(|_| sanitize(normal.sample(&mut *rng)))
        .collect())
}

/// Keys drawn uniformly from `[min, max]`; the bounds may be given in either order.
pub fn generate_uniform_keys<R: Rng>(rng: &mut R, count: usize, min: f64, max: f64) -> Vec<Key> {
    let uniform = Uniform::new_inclusive(min.min(max), max.max(min));

    (0..count)
        .map(|_| sanitize(uniform.sample(&mut *rng)))
        .collect()
}

/// Volatility-like keys centred on zero, as produced by real price data.
pub fn generate_smooth_keys(count: Option<usize>, seed: u64) -> Result<Vec<Key>> {
    let count = count.unwrap_or(DEFAULT_COUNT);
    let mut rng = StdRng::seed_from_u64(seed);
    generate_normal_keys(&mut rng, count, 0.0, 50.0)
}

/// Distinct upper-case ticker symbols.
///
/// Fails when `count` exceeds [`TICKER_SPACE`].
pub fn generate_tickers<R: Rng>(rng: &mut R, count: usize) -> Result<Vec<String>> {
    if count > TICKER_SPACE {
        return Err(DatasetError::TooManyGroups {
            requested: count,
            available: TICKER_SPACE,
        });
    }

    let len_dist = Uniform::new_inclusive(TICKER_MIN_LEN, TICKER_MAX_LEN);
    let mut tickers = std::collections::BTreeSet::new();

    while tickers.len() < count {
        let len = len_dist.sample(&mut *rng);
        let ticker: String = (0..len)
            .map(|_| rng.gen_range(b'A'..=b'Z') as char)
            .collect();
        tickers.insert(ticker);
    }

    Ok(tickers.into_iter().collect())
}

/// Shape of a synthetic price dataset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyntheticConfig {
    pub groups: usize,
    pub days: usize,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            groups: 500,
            days: 1259,
            seed: 42,
        }
    }
}

/// Daily price rows for `groups` tickers over `days` trading days, each
/// ticker following its own random walk.
pub fn generate_price_records(config: SyntheticConfig) -> Result<Vec<PriceRecord>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let daily_move = Normal::<f64>::new(0.0, 0.02)?;
    let wick = Normal::<f64>::new(0.0, 0.01)?;
    let start_price = Uniform::<f64>::new_inclusive(5.0, 500.0);
    let volume = Uniform::<f64>::new_inclusive(100_000.0, 50_000_000.0);

    let total = config
        .groups
        .checked_mul(config.days)
        .ok_or(DatasetError::DatasetTooLarge {
            groups: config.groups,
            days: config.days,
        })?;
    let tickers = generate_tickers(&mut rng, config.groups)?;
    let mut records = Vec::with_capacity(total);

    for ticker in tickers {
        let mut open: f64 = start_price.sample(&mut rng);
        for day in 0..config.days {
            let close = (open * (1.0 + daily_move.sample(&mut rng))).max(0.01);
            let high = open.max(close) * (1.0 + wick.sample(&mut rng).abs());
            let low = open.min(close) * (1.0 - wick.sample(&mut rng).abs());

            records.push(PriceRecord {
                date: synthetic_date(day),
                open,
                high,
                low: low.max(0.0),
                close,
                volume: volume.sample(&mut rng).round(),
                name: ticker.clone(),
            });
            open = close;
        }
    }

    Ok(records)
}

// sortable day label; months are flattened to 28 days
fn synthetic_date(day: usize) -> String {
    let year = 2013 + day / (12 * 28);
    let month = 1 + (day / 28) % 12;
    let dom = 1 + day % 28;
    format!("{year:04}-{month:02}-{dom:02}")
}
