//! Conversions between sparsekit formats and the sprs library

use num_traits::Num;
use sprs::{CsMat, TriMat};

use crate::format::{Coo, Csr, Element};

/// Converts a sparsekit CSR format to a sprs `CsMat`
///
/// Pattern data (no stored values) expands to ones, following the
/// Matrix-Market convention for pattern matrices. Column indices must be
/// sorted within each row (a `sprs` structural invariant).
pub fn to_sprs_csr<T>(csr: &Csr<T>) -> CsMat<T>
where
    T: Element + Num + Default,
{
    let values = match csr.values() {
        Some(vals) => vals.to_vec(),
        None => vec![T::one(); csr.nnz()],
    };
    CsMat::new(
        (csr.n_rows(), csr.n_cols()),
        csr.row_ptr().to_vec(),
        csr.col_idx().to_vec(),
        values,
    )
}

/// Converts a sprs `CsMat` to a sparsekit CSR format
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> Csr<T>
where
    T: Element + Num + Default,
{
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();
    Csr::new(shape.0, shape.1, indptr, indices, Some(data))
}

/// Converts a sparsekit COO format to a sprs triplet matrix
pub fn to_sprs_coo<T>(coo: &Coo<T>) -> TriMat<T>
where
    T: Element + Num + Default,
{
    let values = match coo.values() {
        Some(vals) => vals.to_vec(),
        None => vec![T::one(); coo.nnz()],
    };
    TriMat::from_triplets(
        (coo.n_rows(), coo.n_cols()),
        coo.row_idx().to_vec(),
        coo.col_idx().to_vec(),
        values,
    )
}

/// Converts a sprs triplet matrix to a sparsekit COO format
pub fn from_sprs_coo<T>(matrix: &TriMat<T>) -> Coo<T>
where
    T: Element + Num + Default,
{
    let nnz = matrix.nnz();
    let mut row_idx = Vec::with_capacity(nnz);
    let mut col_idx = Vec::with_capacity(nnz);
    let mut values = Vec::with_capacity(nnz);

    for (value, (row, col)) in matrix.triplet_iter() {
        row_idx.push(row);
        col_idx.push(col);
        values.push(*value);
    }

    Coo::new(matrix.rows(), matrix.cols(), row_idx, col_idx, Some(values))
}
