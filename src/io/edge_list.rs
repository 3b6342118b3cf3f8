//! Undirected edge-list reader

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::format::{Csr, Element, Format};
use crate::io::SparseReader;

/// Reads an undirected edge list into CSR
///
/// One edge per line, two whitespace-separated 0-based vertex ids, no
/// header. Every pair (u, v) with u ≠ v is inserted in both directions;
/// self-loops are dropped; duplicates are removed after sorting by
/// (first, second). The vertex count is the largest observed id plus one.
///
/// The reader captures connectivity only: weight columns, when present in
/// the file, are not read, and the produced CSR carries no values.
pub struct EdgeListReader {
    path: PathBuf,
    weighted: bool,
}

impl EdgeListReader {
    /// Creates a reader for the file at `path`
    pub fn new<P: AsRef<Path>>(path: P, weighted: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            weighted,
        }
    }

    /// Whether the reader was configured as weighted
    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Reads the edge list into a CSR format
    pub fn read_csr<T: Element>(&self) -> Result<Csr<T>> {
        Ok(self.read_csr_with_mirror()?.0)
    }

    /// Reads the edge list into a CSR format plus its mirror-position array
    ///
    /// `mirror[k]` is the storage index of the reverse edge of entry `k`:
    /// for the entry (u, v) at index k, index `mirror[k]` holds (v, u).
    /// Symmetric algorithms use it for O(1) reverse-edge lookup.
    pub fn read_csr_with_mirror<T: Element>(&self) -> Result<(Csr<T>, Vec<usize>)> {
        let file = File::open(&self.path).map_err(|source| Error::FileNotFound {
            path: self.path.clone(),
            source,
        })?;
        let reader = BufReader::new(file);

        let mut edges: Vec<(usize, usize)> = Vec::new();
        let mut max_id = 0usize;
        let mut edges_read = 0usize;
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| Error::FileNotFound {
                path: self.path.clone(),
                source,
            })?;
            let mut tokens = line.split_whitespace();
            let Some(first) = tokens.next() else {
                continue;
            };
            let second = tokens
                .next()
                .ok_or_else(|| self.parse_error(index + 1, "expected two vertex ids"))?;
            let u: usize = first
                .parse()
                .map_err(|_| self.parse_error(index + 1, format!("bad vertex id `{first}`")))?;
            let v: usize = second
                .parse()
                .map_err(|_| self.parse_error(index + 1, format!("bad vertex id `{second}`")))?;

            if u == v {
                continue;
            }
            edges.push((u, v));
            edges.push((v, u));
            max_id = max_id.max(u).max(v);
            edges_read += 1;
        }

        if edges.is_empty() {
            return Ok((Csr::new(0, 0, vec![0], vec![], None), Vec::new()));
        }

        let n = max_id + 1;
        edges.sort_unstable();
        edges.dedup();
        let m = edges.len();
        debug!(vertices = n, read_edges = edges_read, edges = m, "edge list read");

        // Pass 1: degree histogram at row + 1; the sorted edge order doubles
        // as the per-row insertion order for the column array
        let mut row_ptr = vec![0usize; n + 1];
        let mut col_idx = vec![0usize; m];
        for (k, &(u, v)) in edges.iter().enumerate() {
            row_ptr[u + 1] += 1;
            col_idx[k] = v;
        }
        for i in 1..=n {
            row_ptr[i] += row_ptr[i - 1];
        }

        // Pass 2: per-row cursor scatter assigns each entry the next free
        // slot in its destination row, which is exactly where its reverse
        // edge lives
        let mut cursor = row_ptr[..n].to_vec();
        let mut mirror = vec![0usize; m];
        for k in 0..m {
            let w = col_idx[k];
            mirror[k] = cursor[w];
            cursor[w] += 1;
        }

        Ok((Csr::new(n, n, row_ptr, col_idx, None), mirror))
    }

    fn parse_error(&self, line: usize, message: impl Into<String>) -> Error {
        Error::Parse {
            path: self.path.clone(),
            line,
            message: message.into(),
        }
    }
}

impl<T: Element> SparseReader<T> for EdgeListReader {
    fn read_sparse_format(&self) -> Result<Box<dyn Format>> {
        Ok(Box::new(self.read_csr::<T>()?))
    }
}
