//! Permutation application

use std::marker::PhantomData;

use crate::context::Context;
use crate::convert::Converter;
use crate::error::Result;
use crate::format::{Csr, Element, Format};
use crate::preprocess::{downcast_params, FormatMatcher, PreprocessParams};
use crate::utils::exclusive_scan;

/// Parameters for [`Transform`]
#[derive(Debug, Clone)]
pub struct TransformParams {
    /// Vertex permutation, `permutation[old_id] = new_id`
    pub permutation: Vec<usize>,
}

/// Applies a vertex permutation to a format
///
/// Dispatches through the same matcher as the reorder framework, so any
/// input layout the converter can turn into CSR is accepted. The result is
/// a new, independently owned format; the input is untouched.
pub struct Transform<T: Element> {
    matcher: FormatMatcher<Box<dyn Format>>,
    params: TransformParams,
    _element: PhantomData<T>,
}

impl<T: Element> Transform<T> {
    /// Creates a transformer for the given permutation
    pub fn new(permutation: Vec<usize>) -> Self {
        let mut matcher = FormatMatcher::new();
        matcher.register_function(&[Csr::<T>::format_id_static()], transform_csr::<T>);
        Self {
            matcher,
            params: TransformParams { permutation },
            _element: PhantomData,
        }
    }

    /// Produces the permuted format
    pub fn get_transformation(
        &self,
        input: &dyn Format,
        converter: &Converter,
        contexts: &[&dyn Context],
    ) -> Result<Box<dyn Format>> {
        self.matcher.execute(input, &self.params, converter, contexts)
    }
}

/// Relocates each original row's edge count to its new row position
/// (prefix-summed into the new `row_ptr`) and remaps every stored column
/// index through the permutation. Relative order of entries within each
/// original row is preserved.
fn transform_csr<T: Element>(
    formats: &[&dyn Format],
    params: &dyn PreprocessParams,
) -> Result<Box<dyn Format>> {
    let csr = formats[0].downcast_ref::<Csr<T>>()?;
    let params = downcast_params::<TransformParams>(params)?;
    let perm = &params.permutation;

    let n = csr.n_rows();
    assert_eq!(perm.len(), n, "permutation length must equal the row count");
    assert_eq!(csr.n_rows(), csr.n_cols(), "transform expects a square (graph) format");

    let mut lengths = vec![0usize; n];
    for u in 0..n {
        lengths[perm[u]] = csr.degree(u);
    }
    let row_ptr = exclusive_scan(&lengths);

    // order[new_position] = old_position, filled row by row
    let nnz = csr.nnz();
    let old_row_ptr = csr.row_ptr();
    let mut order = vec![0usize; nnz];
    for u in 0..n {
        let mut dst = row_ptr[perm[u]];
        for k in old_row_ptr[u]..old_row_ptr[u + 1] {
            order[dst] = k;
            dst += 1;
        }
    }

    let old_cols = csr.col_idx();
    let col_idx: Vec<usize> = order.iter().map(|&k| perm[old_cols[k]]).collect();
    let values = csr
        .values()
        .map(|vals| order.iter().map(|&k| vals[k]).collect());

    Ok(Box::new(Csr::new(n, csr.n_cols(), row_ptr, col_idx, values)) as Box<dyn Format>)
}
