pub mod avl_tree;
pub mod data_gen;
pub mod error;
pub mod harness;
pub mod key;
pub mod key_stream;
pub mod linear_index;
pub mod stock_book;
pub mod utils;

pub use avl_tree::{AvlTree, SearchTrace};
pub use error::{DatasetError, InvariantViolation, KeyError};
pub use harness::{BuildReport, QueryReport, build_both, query_both};
pub use key::Key;
pub use key_stream::{KeyStreamItem, PriceRecord};
pub use linear_index::{BaselineEntry, LinearIndex};
pub use stock_book::{Side, StockBook};

#[cfg(test)]
mod proptests;
