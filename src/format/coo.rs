//! Coordinate (COO) format implementation

use std::any::Any;
use std::fmt;

use crate::context::{Context, CpuContext};
use crate::format::{Element, Format, FormatId};

/// A sparse matrix/graph in coordinate (COO) format
///
/// Stores explicit (row, col[, value]) triplets in three parallel arrays.
/// Entries are kept in insertion order; nothing here requires or enforces
/// sortedness.
#[derive(Clone, Debug)]
pub struct Coo<T: Element> {
    dims: [usize; 2],
    row_idx: Vec<usize>,
    col_idx: Vec<usize>,
    values: Option<Vec<T>>,
    context: CpuContext,
}

impl<T: Element> Coo<T> {
    /// Creates a new COO format from pre-allocated buffers, taking ownership
    ///
    /// # Panics
    ///
    /// Panics if `row_idx` and `col_idx` differ in length, if `values` is
    /// present with a different length, or if any index is out of bounds for
    /// the given dimensions.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_idx: Vec<usize>,
        col_idx: Vec<usize>,
        values: Option<Vec<T>>,
    ) -> Self {
        assert_eq!(row_idx.len(), col_idx.len(), "row_idx.len() must equal col_idx.len()");
        if let Some(vals) = &values {
            assert_eq!(vals.len(), col_idx.len(), "values.len() must equal col_idx.len()");
        }

        for (&row, &col) in row_idx.iter().zip(&col_idx) {
            assert!(row < n_rows, "Row index {} out of bounds (n_rows = {})", row, n_rows);
            assert!(col < n_cols, "Column index {} out of bounds (n_cols = {})", col, n_cols);
        }

        Self {
            dims: [n_rows, n_cols],
            row_idx,
            col_idx,
            values,
            context: CpuContext,
        }
    }

    /// Stable identifier of this variant for the given element type
    pub fn format_id_static() -> FormatId {
        FormatId::of::<Self>()
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.dims[0]
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.dims[1]
    }

    /// Number of stored triplets
    pub fn nnz(&self) -> usize {
        self.row_idx.len()
    }

    /// Row indices (size: nnz)
    pub fn row_idx(&self) -> &[usize] {
        &self.row_idx
    }

    /// Column indices (size: nnz)
    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    /// Stored values, if any
    pub fn values(&self) -> Option<&[T]> {
        self.values.as_deref()
    }

    /// Consumes the format, returning `(dims, row_idx, col_idx, values)`
    pub fn into_raw(self) -> ([usize; 2], Vec<usize>, Vec<usize>, Option<Vec<T>>) {
        (self.dims, self.row_idx, self.col_idx, self.values)
    }
}

impl<T: Element> Format for Coo<T> {
    fn format_id(&self) -> FormatId {
        Self::format_id_static()
    }

    fn dimensions(&self) -> &[usize] {
        &self.dims
    }

    fn context(&self) -> &dyn Context {
        &self.context
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl<T: Element> fmt::Display for Coo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "COO {}x{}, nnz {}", self.dims[0], self.dims[1], self.nnz())
    }
}
