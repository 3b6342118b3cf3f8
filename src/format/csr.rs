//! Compressed Sparse Row (CSR) format implementation

use std::any::Any;
use std::fmt;

use crate::context::{Context, CpuContext};
use crate::format::{Element, Format, FormatId};

/// A sparse matrix/graph in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - `row_ptr`: array of size n_rows + 1 containing offsets into `col_idx`
///   and `values`; `row_ptr[n_rows]` equals nnz
/// - `col_idx`: array of size nnz containing column indices
/// - `values`: optional array of size nnz; `None` for pattern /
///   connectivity-only data
#[derive(Clone)]
pub struct Csr<T: Element> {
    dims: [usize; 2],
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Option<Vec<T>>,
    context: CpuContext,
}

impl<T: Element> Csr<T> {
    /// Creates a new CSR format from pre-allocated buffers, taking ownership
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - `row_ptr.len()` must be n_rows + 1
    /// - `row_ptr[n_rows]` must equal `col_idx.len()`
    /// - `values`, when present, must have `col_idx.len()` entries
    /// - every column index must be below n_cols
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Option<Vec<T>>,
    ) -> Self {
        assert_eq!(row_ptr.len(), n_rows + 1, "row_ptr.len() must be n_rows + 1");
        assert_eq!(
            row_ptr[n_rows],
            col_idx.len(),
            "row_ptr[n_rows] must equal col_idx.len()"
        );
        if let Some(vals) = &values {
            assert_eq!(vals.len(), col_idx.len(), "values.len() must equal col_idx.len()");
        }

        for &col in &col_idx {
            assert!(col < n_cols, "Column index {} out of bounds (n_cols = {})", col, n_cols);
        }

        Self {
            dims: [n_rows, n_cols],
            row_ptr,
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

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    /// Row offsets (size: n_rows + 1)
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Column indices (size: nnz)
    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    /// Stored values, if any
    pub fn values(&self) -> Option<&[T]> {
        self.values.as_deref()
    }

    /// Number of stored entries in row `u`
    pub fn degree(&self, u: usize) -> usize {
        self.row_ptr[u + 1] - self.row_ptr[u]
    }

    /// Returns an iterator over the column indices stored in row `i`
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        assert!(i < self.n_rows(), "Row index out of bounds");
        self.col_idx[self.row_ptr[i]..self.row_ptr[i + 1]].iter().copied()
    }

    /// Consumes the format, returning `(dims, row_ptr, col_idx, values)`
    ///
    /// Ownership of every buffer transfers to the caller; move conversions
    /// are built on this.
    pub fn into_raw(self) -> ([usize; 2], Vec<usize>, Vec<usize>, Option<Vec<T>>) {
        (self.dims, self.row_ptr, self.col_idx, self.values)
    }
}

impl<T: Element> Format for Csr<T> {
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

impl<T: Element> fmt::Debug for Csr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Csr")
            .field("dims", &self.dims)
            .field("nnz", &self.nnz())
            .field("weighted", &self.values.is_some())
            .finish()
    }
}
