//! Error types for key construction, dataset loading and tree validation.

/// A specialized Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// A value that cannot be used as a tree key.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum KeyError {
    /// NaN or an infinity; keys must be totally ordered.
    #[error("key {0} is not a finite number")]
    NotFinite(f64),
}

/// Errors raised while reading or querying a price dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    /// A price column held something other than a number.
    #[error("line {line}: field `{field}` has invalid value {value:?}")]
    InvalidPrice {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("unknown group `{0}`")]
    UnknownGroup(String),

    #[error("group `{0}` has no records")]
    EmptyGroup(String),

    #[error(transparent)]
    Key(#[from] KeyError),

    /// More synthetic groups requested than there are distinct tickers.
    #[error("requested {requested} groups, only {available} distinct tickers exist")]
    TooManyGroups { requested: usize, available: usize },

    #[error("{groups} groups over {days} days overflows the record count")]
    DatasetTooLarge { groups: usize, days: usize },

    /// Parameters rejected by a synthetic data distribution.
    #[error("invalid distribution: {0}")]
    Distribution(#[from] rand_distr::NormalError),
}

/// A broken structural invariant found by [`crate::avl_tree::AvlTree::validate`].
///
/// `depth` counts edges from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("key at depth {depth} is out of order")]
    OrderViolation { depth: usize },

    #[error("node at depth {depth} has balance factor {balance}")]
    Unbalanced { depth: usize, balance: isize },

    #[error("node at depth {depth} caches height {cached}, actual {actual}")]
    StaleHeight {
        depth: usize,
        cached: usize,
        actual: usize,
    },

    #[error("tree holds {counted} nodes but records {recorded}")]
    LengthMismatch { counted: usize, recorded: usize },
}
