//! Degree ordering by counting sort

use std::marker::PhantomData;

use crate::context::Context;
use crate::convert::Converter;
use crate::error::Result;
use crate::format::{Csr, Element, Format};
use crate::preprocess::{downcast_params, GenericReorder, PreprocessParams};

/// Parameters for [`DegreeReorder`]
#[derive(Debug, Clone, Copy)]
pub struct DegreeReorderParams {
    /// Sort by ascending degree when true, descending when false
    pub ascending: bool,
}

/// Orders vertices by degree
///
/// Runs over any input format the converter can turn into a CSR of the same
/// element type. The returned permutation maps old vertex id to new vertex
/// id.
pub struct DegreeReorder<T: Element> {
    reorder: GenericReorder,
    params: DegreeReorderParams,
    _element: PhantomData<T>,
}

impl<T: Element> DegreeReorder<T> {
    /// Creates a degree orderer; `ascending` picks the sort direction
    pub fn new(ascending: bool) -> Self {
        let mut reorder = GenericReorder::new();
        reorder.register_function(&[Csr::<T>::format_id_static()], degree_reorder_csr::<T>);
        Self {
            reorder,
            params: DegreeReorderParams { ascending },
            _element: PhantomData,
        }
    }

    /// Computes the degree-ordering permutation for `input`
    pub fn get_reorder(
        &self,
        input: &dyn Format,
        converter: &Converter,
        contexts: &[&dyn Context],
    ) -> Result<Vec<usize>> {
        self.reorder.get_reorder(input, &self.params, converter, contexts)
    }
}

/// Counting/bucket sort over vertex degree, O(n + m)
///
/// Histogram indexed by degree with a headroom slot, prefix-summed into
/// bucket start offsets; vertices scatter into their bucket by increasing
/// id, so relative order within a bucket follows vertex id. The read-off
/// direction (bucket order or reverse) realizes ascending vs descending.
fn degree_reorder_csr<T: Element>(
    formats: &[&dyn Format],
    params: &dyn PreprocessParams,
) -> Result<Vec<usize>> {
    let csr = formats[0].downcast_ref::<Csr<T>>()?;
    let params = downcast_params::<DegreeReorderParams>(params)?;

    let n = csr.n_rows();
    let max_degree = (0..n).map(|u| csr.degree(u)).max().unwrap_or(0);

    let mut counts = vec![0usize; max_degree + 2];
    for u in 0..n {
        counts[csr.degree(u) + 1] += 1;
    }
    for d in 1..counts.len() {
        counts[d] += counts[d - 1];
    }

    // counts[d] is now the start offset of bucket d
    let mut sorted = vec![0usize; n];
    let mut cursor = vec![0usize; max_degree + 1];
    for u in 0..n {
        let d = csr.degree(u);
        sorted[counts[d] + cursor[d]] = u;
        cursor[d] += 1;
    }

    let mut permutation = vec![0usize; n];
    for (position, &u) in sorted.iter().enumerate() {
        permutation[u] = if params.ascending {
            position
        } else {
            n - 1 - position
        };
    }
    Ok(permutation)
}
