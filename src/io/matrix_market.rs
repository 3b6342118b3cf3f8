//! Matrix-Market-style reader (coordinate subset)

use std::any::type_name;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::format::{Coo, Element, Format};
use crate::io::SparseReader;

/// Reads a Matrix-Market-style coordinate file into COO
///
/// Lines beginning with `%` are comments and are skipped, as are blank
/// lines. The first remaining line is the header `rows cols nnz`; each
/// following line is `row col [value]` with 1-based indices. The value
/// field is read only in weighted mode.
pub struct MatrixMarketReader {
    path: PathBuf,
    weighted: bool,
}

impl MatrixMarketReader {
    /// Creates a reader for the file at `path`
    pub fn new<P: AsRef<Path>>(path: P, weighted: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            weighted,
        }
    }

    /// Reads the file into a COO format
    ///
    /// Fails with [`Error::ConfigurationError`] when weighted mode is
    /// requested for an element type with no value storage (such as `()`).
    pub fn read_coo<T: Element>(&self) -> Result<Coo<T>> {
        if self.weighted && !T::has_storage() {
            return Err(Error::ConfigurationError {
                value_type: type_name::<T>(),
            });
        }

        let file = File::open(&self.path).map_err(|source| Error::FileNotFound {
            path: self.path.clone(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines().enumerate();

        let (header_line, header) = loop {
            match lines.next() {
                Some((index, line)) => {
                    let line = line.map_err(|source| Error::FileNotFound {
                        path: self.path.clone(),
                        source,
                    })?;
                    let trimmed = line.trim();
                    if trimmed.is_empty() || trimmed.starts_with('%') {
                        continue;
                    }
                    break (index + 1, line);
                }
                None => return Err(self.parse_error(0, "missing header line")),
            }
        };

        let mut fields = header.split_whitespace();
        let n_rows = self.parse_field(&mut fields, header_line, "row count")?;
        let n_cols = self.parse_field(&mut fields, header_line, "column count")?;
        let nnz = self.parse_field(&mut fields, header_line, "nonzero count")?;

        let mut row_idx = Vec::with_capacity(nnz);
        let mut col_idx = Vec::with_capacity(nnz);
        let mut values: Vec<T> = Vec::new();

        for (index, line) in lines {
            if row_idx.len() == nnz {
                break;
            }
            let line = line.map_err(|source| Error::FileNotFound {
                path: self.path.clone(),
                source,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }

            let line_no = index + 1;
            let mut tokens = trimmed.split_whitespace();
            let row: usize = self.parse_field(&mut tokens, line_no, "row index")?;
            let col: usize = self.parse_field(&mut tokens, line_no, "column index")?;
            let row = row
                .checked_sub(1)
                .ok_or_else(|| self.parse_error(line_no, "indices are 1-based"))?;
            let col = col
                .checked_sub(1)
                .ok_or_else(|| self.parse_error(line_no, "indices are 1-based"))?;
            if row >= n_rows || col >= n_cols {
                return Err(self.parse_error(
                    line_no,
                    format!("entry ({}, {}) outside {}x{}", row + 1, col + 1, n_rows, n_cols),
                ));
            }
            row_idx.push(row);
            col_idx.push(col);

            if self.weighted {
                let token = tokens
                    .next()
                    .ok_or_else(|| self.parse_error(line_no, "missing value field"))?;
                let value = T::parse_token(token)
                    .ok_or_else(|| self.parse_error(line_no, format!("bad value `{token}`")))?;
                values.push(value);
            }
        }

        if row_idx.len() < nnz {
            return Err(self.parse_error(
                header_line,
                format!("header promises {} entries, found {}", nnz, row_idx.len()),
            ));
        }

        debug!(rows = n_rows, cols = n_cols, nnz, weighted = self.weighted, "matrix market read");
        let values = self.weighted.then_some(values);
        Ok(Coo::new(n_rows, n_cols, row_idx, col_idx, values))
    }

    fn parse_field<'a>(
        &self,
        tokens: &mut impl Iterator<Item = &'a str>,
        line: usize,
        what: &str,
    ) -> Result<usize> {
        let token = tokens
            .next()
            .ok_or_else(|| self.parse_error(line, format!("missing {what}")))?;
        token
            .parse()
            .map_err(|_| self.parse_error(line, format!("bad {what} `{token}`")))
    }

    fn parse_error(&self, line: usize, message: impl Into<String>) -> Error {
        Error::Parse {
            path: self.path.clone(),
            line,
            message: message.into(),
        }
    }
}

impl<T: Element> SparseReader<T> for MatrixMarketReader {
    fn read_sparse_format(&self) -> Result<Box<dyn Format>> {
        Ok(Box::new(self.read_coo::<T>()?))
    }
}
