//! Readers parsing external text formats into canonical formats

pub mod edge_list;
pub mod matrix_market;

pub use edge_list::EdgeListReader;
pub use matrix_market::MatrixMarketReader;

use crate::error::Result;
use crate::format::{Element, Format};

/// A reader producing a boxed format from its configured input
///
/// Each reader also exposes a format-specific entry point (`read_csr`,
/// `read_coo`) returning the concrete type.
pub trait SparseReader<T: Element> {
    /// Reads the input into this reader's canonical format
    fn read_sparse_format(&self) -> Result<Box<dyn Format>>;
}
