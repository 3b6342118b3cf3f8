use std::io::Write;

use tempfile::NamedTempFile;

use sparsekit::{
    Converter, Coo, CpuContext, Csr, DegreeReorder, EdgeListReader, Error, Format,
    MatrixMarketReader, SparseReader,
};

fn write_fixture(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_edge_list_symmetrization_and_dedup() {
    let file = write_fixture("0 1\n1 2\n");
    let reader = EdgeListReader::new(file.path(), false);
    let csr: Csr<()> = reader.read_csr().unwrap();

    assert_eq!(csr.n_rows(), 3);
    assert_eq!(csr.nnz(), 4);
    assert_eq!(csr.row_ptr(), &[0, 1, 3, 4]);

    let adjacency: Vec<Vec<usize>> = (0..3).map(|u| csr.row_iter(u).collect()).collect();
    assert_eq!(adjacency[0], vec![1]);
    assert_eq!(adjacency[1], vec![0, 2]);
    assert_eq!(adjacency[2], vec![1]);
}

#[test]
fn test_edge_list_drops_self_loops_and_duplicates() {
    // Self-loop on 1, and edge (0, 1) stated twice in both directions
    let file = write_fixture("0 1\n1 0\n1 1\n0 1\n");
    let csr: Csr<()> = EdgeListReader::new(file.path(), false).read_csr().unwrap();

    assert_eq!(csr.n_rows(), 2);
    assert_eq!(csr.nnz(), 2);
    assert_eq!(csr.row_ptr(), &[0, 1, 2]);
}

#[test]
fn test_edge_list_mirror_positions() {
    let file = write_fixture("0 1\n1 2\n0 3\n2 3\n");
    let (csr, mirror) = EdgeListReader::new(file.path(), false)
        .read_csr_with_mirror::<()>()
        .unwrap();

    assert_eq!(mirror.len(), csr.nnz());

    // Entry k is (u, v); mirror[k] must hold (v, u)
    let mut source = vec![0usize; csr.nnz()];
    for u in 0..csr.n_rows() {
        for k in csr.row_ptr()[u]..csr.row_ptr()[u + 1] {
            source[k] = u;
        }
    }
    for k in 0..csr.nnz() {
        assert_eq!(csr.col_idx()[mirror[k]], source[k]);
        assert_eq!(source[mirror[k]], csr.col_idx()[k]);
        assert_eq!(mirror[mirror[k]], k);
    }
}

#[test]
fn test_edge_list_empty_input() {
    let file = write_fixture("");
    let csr: Csr<()> = EdgeListReader::new(file.path(), false).read_csr().unwrap();

    assert_eq!(csr.n_rows(), 0);
    assert_eq!(csr.nnz(), 0);
}

#[test]
fn test_edge_list_missing_file() {
    let reader = EdgeListReader::new("/nonexistent/graph.uedgelist", false);
    let err = reader.read_csr::<()>().unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_edge_list_malformed_line() {
    let file = write_fixture("0 1\nnot numbers\n");
    let err = EdgeListReader::new(file.path(), false)
        .read_csr::<()>()
        .unwrap_err();
    match err {
        Error::Parse { line, .. } => assert_eq!(line, 2),
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn test_matrix_market_unweighted() {
    let file = write_fixture("%header\n2 2 2\n1 1 5\n2 2 7\n");
    let coo: Coo<()> = MatrixMarketReader::new(file.path(), false).read_coo().unwrap();

    assert_eq!(coo.dimensions(), &[2, 2]);
    assert_eq!(coo.row_idx(), &[0, 1]);
    assert_eq!(coo.col_idx(), &[0, 1]);
    // Value tokens are ignored in unweighted mode
    assert!(coo.values().is_none());
}

#[test]
fn test_matrix_market_weighted() {
    let file = write_fixture(
        "%%MatrixMarket matrix coordinate real general\n% comment\n3 3 3\n1 2 1.5\n2 3 2.5\n3 1 -4\n",
    );
    let coo: Coo<f64> = MatrixMarketReader::new(file.path(), true).read_coo().unwrap();

    assert_eq!(coo.row_idx(), &[0, 1, 2]);
    assert_eq!(coo.col_idx(), &[1, 2, 0]);
    assert_eq!(coo.values(), Some(&[1.5, 2.5, -4.0][..]));
}

#[test]
fn test_matrix_market_weighted_needs_value_storage() {
    let file = write_fixture("2 2 1\n1 1 5\n");
    let err = MatrixMarketReader::new(file.path(), true)
        .read_coo::<()>()
        .unwrap_err();
    assert!(matches!(err, Error::ConfigurationError { .. }));
}

#[test]
fn test_matrix_market_short_file() {
    let file = write_fixture("%header\n3 3 4\n1 1\n2 2\n");
    let err = MatrixMarketReader::new(file.path(), false)
        .read_coo::<()>()
        .unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn test_matrix_market_rejects_zero_based_ids() {
    let file = write_fixture("2 2 1\n0 1\n");
    let err = MatrixMarketReader::new(file.path(), false)
        .read_coo::<()>()
        .unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn test_read_sparse_format_feeds_preprocessing() {
    // End to end: read an edge list as a boxed format, degree-order it
    let file = write_fixture("0 1\n1 2\n2 3\n1 3\n");
    let reader = EdgeListReader::new(file.path(), false);
    let format: Box<dyn Format> = SparseReader::<()>::read_sparse_format(&reader).unwrap();

    let converter = Converter::with_standard_conversions::<()>();
    let orderer = DegreeReorder::<()>::new(true);
    let perm = orderer
        .get_reorder(format.as_ref(), &converter, &[&CpuContext])
        .unwrap();

    assert_eq!(perm.len(), 4);
    let mut check = perm.clone();
    check.sort_unstable();
    assert_eq!(check, vec![0, 1, 2, 3]);
}

#[test]
fn test_matrix_market_coo_reaches_csr_reorder() {
    // The MTX reader produces COO; reordering materializes CSR through the
    // converter without touching the COO
    let file = write_fixture("%g\n3 3 4\n1 2\n2 1\n2 3\n3 2\n");
    let coo: Coo<()> = MatrixMarketReader::new(file.path(), false).read_coo().unwrap();

    let converter = Converter::with_standard_conversions::<()>();
    let orderer = DegreeReorder::<()>::new(false);
    let perm = orderer.get_reorder(&coo, &converter, &[&CpuContext]).unwrap();

    // Vertex 1 has the highest degree; descending order puts it first
    assert_eq!(perm[1], 0);
    assert_eq!(coo.nnz(), 4);
}
