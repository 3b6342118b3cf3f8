use proptest::prelude::*;

use sparsekit::{
    downcast_params, Converter, Coo, CpuContext, Csr, DegreeReorder, Format, GenericReorder,
    PreprocessParams, Transform,
};

/// Builds a symmetrized CSR from an undirected edge set.
fn csr_from_edges(n: usize, edges: &[(usize, usize)]) -> Csr<()> {
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for &(u, v) in edges {
        if u != v {
            pairs.push((u, v));
            pairs.push((v, u));
        }
    }
    pairs.sort_unstable();
    pairs.dedup();

    let mut row_ptr = vec![0usize; n + 1];
    let mut col_idx = Vec::with_capacity(pairs.len());
    for &(u, v) in &pairs {
        row_ptr[u + 1] += 1;
        col_idx.push(v);
    }
    for i in 1..=n {
        row_ptr[i] += row_ptr[i - 1];
    }
    Csr::new(n, n, row_ptr, col_idx, None)
}

/// Positions in new order: `read_off[new_id] = old_id`.
fn read_off(perm: &[usize]) -> Vec<usize> {
    let mut positions = vec![0usize; perm.len()];
    for (old, &new) in perm.iter().enumerate() {
        positions[new] = old;
    }
    positions
}

#[test]
fn test_ascending_degree_order_is_monotone() {
    let csr = csr_from_edges(6, &[(0, 1), (0, 2), (0, 3), (1, 2), (4, 5)]);
    let orderer = DegreeReorder::<()>::new(true);
    let perm = orderer
        .get_reorder(&csr, &Converter::new(), &[&CpuContext])
        .unwrap();

    let positions = read_off(&perm);
    for window in positions.windows(2) {
        assert!(
            csr.degree(window[0]) <= csr.degree(window[1]),
            "degree order violated between vertices {} and {}",
            window[0],
            window[1]
        );
    }
}

#[test]
fn test_descending_degree_order_is_monotone() {
    let csr = csr_from_edges(6, &[(0, 1), (0, 2), (0, 3), (1, 2), (4, 5)]);
    let orderer = DegreeReorder::<()>::new(false);
    let perm = orderer
        .get_reorder(&csr, &Converter::new(), &[&CpuContext])
        .unwrap();

    let positions = read_off(&perm);
    for window in positions.windows(2) {
        assert!(csr.degree(window[0]) >= csr.degree(window[1]));
    }
}

#[test]
fn test_transform_realizes_degree_order() {
    // Reorder, then transform; the transformed graph's degrees must be
    // non-decreasing row by row
    let csr = csr_from_edges(5, &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 2)]);
    let converter = Converter::with_standard_conversions::<()>();

    let orderer = DegreeReorder::<()>::new(true);
    let perm = orderer.get_reorder(&csr, &converter, &[&CpuContext]).unwrap();

    let transformer = Transform::<()>::new(perm);
    let transformed = transformer
        .get_transformation(&csr, &converter, &[&CpuContext])
        .unwrap();
    let transformed = transformed.downcast::<Csr<()>>().unwrap();

    for i in 0..transformed.n_rows() - 1 {
        assert!(transformed.degree(i) <= transformed.degree(i + 1));
    }

    // The input graph survives the whole cycle unchanged
    assert_eq!(csr.nnz(), transformed.nnz());
    assert_eq!(csr.row_ptr()[csr.n_rows()], csr.nnz());
}

#[test]
fn test_reorder_accepts_coo_input() {
    let coo = Coo::<()>::new(
        4,
        4,
        vec![0, 1, 1, 2, 2, 3],
        vec![1, 0, 2, 1, 3, 2],
        None,
    );
    let converter = Converter::with_standard_conversions::<()>();
    let orderer = DegreeReorder::<()>::new(true);

    let perm = orderer.get_reorder(&coo, &converter, &[&CpuContext]).unwrap();
    assert_eq!(perm.len(), 4);

    // Input still owns its buffers after the non-move materialization
    assert_eq!(coo.nnz(), 6);
    assert_eq!(coo.row_idx(), &[0, 1, 1, 2, 2, 3]);
}

struct GapParams {
    hyperparameter: usize,
}

/// A user-supplied reorder: identity spaced by a hyperparameter-checked
/// degree counting pass, registered for CSR only.
fn degree_reorder_custom(
    formats: &[&dyn Format],
    params: &dyn PreprocessParams,
) -> sparsekit::Result<Vec<usize>> {
    let csr = formats[0].downcast_ref::<Csr<()>>()?;
    let params = downcast_params::<GapParams>(params)?;
    assert_eq!(params.hyperparameter, 10);

    let n = csr.n_rows();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&u| csr.degree(u));

    let mut perm = vec![0usize; n];
    for (position, &u) in order.iter().enumerate() {
        perm[u] = position;
    }
    Ok(perm)
}

#[test]
fn test_generic_reorder_with_custom_function() {
    let mut orderer = GenericReorder::new();
    orderer.register_function(&[Csr::<()>::format_id_static()], degree_reorder_custom);

    let csr = csr_from_edges(4, &[(0, 1), (0, 2), (0, 3)]);
    let converter = Converter::with_standard_conversions::<()>();
    let params = GapParams { hyperparameter: 10 };

    let perm = orderer
        .get_reorder(&csr, &params, &converter, &[&CpuContext])
        .unwrap();

    // Star center (vertex 0, degree 3) sorts last
    assert_eq!(perm[0], 3);
}

#[test]
fn test_generic_reorder_rejects_wrong_params() {
    let mut orderer = GenericReorder::new();
    orderer.register_function(&[Csr::<()>::format_id_static()], degree_reorder_custom);

    let csr = csr_from_edges(2, &[(0, 1)]);
    let err = orderer
        .get_reorder(&csr, &42usize, &Converter::new(), &[&CpuContext])
        .unwrap_err();

    assert!(matches!(err, sparsekit::Error::TypeMismatch { .. }));
}

proptest! {
    #[test]
    fn prop_degree_reorder_is_a_bijection(
        edges in prop::collection::vec((0usize..40, 0usize..40), 1..150),
        ascending in any::<bool>(),
    ) {
        let n = 40;
        let csr = csr_from_edges(n, &edges);
        let orderer = DegreeReorder::<()>::new(ascending);
        let perm = orderer
            .get_reorder(&csr, &Converter::new(), &[&CpuContext])
            .unwrap();

        prop_assert_eq!(perm.len(), n);
        let mut seen = perm.clone();
        seen.sort_unstable();
        let expected: Vec<usize> = (0..n).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_transform_under_identity_is_a_noop(
        edges in prop::collection::vec((0usize..20, 0usize..20), 1..80),
    ) {
        let n = 20;
        let csr = csr_from_edges(n, &edges);
        let transformer = Transform::<()>::new((0..n).collect());
        let result = transformer
            .get_transformation(&csr, &Converter::new(), &[&CpuContext])
            .unwrap();
        let result = result.downcast::<Csr<()>>().unwrap();

        prop_assert_eq!(result.row_ptr(), csr.row_ptr());
        prop_assert_eq!(result.col_idx(), csr.col_idx());
    }
}
