//! Layout-to-layout conversion registry
//!
//! The [`Converter`] matches (source-layout, destination-layout,
//! execution-context) triples to conversion functions at runtime. Functions
//! are registered per (source id, destination id) pair together with a guard
//! predicate over the source and destination contexts; within a pair,
//! guards are evaluated in registration order and the first match wins.
//! Registration order is therefore dispatch priority: specializations must
//! be registered before general fallbacks.
//!
//! Copy conversions leave the source untouched. Move conversions consume the
//! source format and reuse its buffers where the destination layout permits.
//! Converting a format to its own id and context works only if such a
//! conversion was explicitly registered; there is no implicit identity
//! shortcut.

use std::collections::HashMap;

use tracing::debug;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::format::{Coo, Csr, Element, Format, FormatId};
use crate::utils::exclusive_scan;

/// Guard predicate deciding whether a conversion entry applies, given the
/// source and destination contexts
pub type ConversionGuard = Box<dyn Fn(&dyn Context, &dyn Context) -> bool + Send + Sync>;

/// A conversion that reads the source and builds a new format
pub type ConversionFunction =
    Box<dyn Fn(&dyn Format, &dyn Context) -> Result<Box<dyn Format>> + Send + Sync>;

/// A conversion that consumes the source, transferring buffer ownership
pub type MoveConversionFunction =
    Box<dyn Fn(Box<dyn Format>, &dyn Context) -> Result<Box<dyn Format>> + Send + Sync>;

struct Entry<F> {
    guard: ConversionGuard,
    func: F,
}

/// Ordered (guard, function) buckets keyed by (source id, destination id)
struct EdgeMap<F> {
    map: HashMap<(FormatId, FormatId), Vec<Entry<F>>>,
}

impl<F> EdgeMap<F> {
    fn new() -> Self {
        Self { map: HashMap::new() }
    }

    fn register(&mut self, from: FormatId, to: FormatId, guard: ConversionGuard, func: F) {
        self.map
            .entry((from, to))
            .or_default()
            .push(Entry { guard, func });
    }

    fn resolve(
        &self,
        from: FormatId,
        from_ctx: &dyn Context,
        to: FormatId,
        to_ctx: &dyn Context,
    ) -> Option<&F> {
        self.map.get(&(from, to))?.iter().find_map(|entry| {
            if (entry.guard)(from_ctx, to_ctx) {
                Some(&entry.func)
            } else {
                None
            }
        })
    }
}

fn default_guard() -> ConversionGuard {
    Box::new(|from_ctx, to_ctx| from_ctx.is_compatible(to_ctx))
}

/// Registry resolving and executing layout-to-layout, context-aware
/// conversion functions
///
/// A `Converter` is an explicit, owned object: construct one, populate it
/// during setup, then treat it as read-only. All registered closures are
/// `Send + Sync`, so a frozen registry can be shared across threads behind a
/// shared reference without internal locking.
pub struct Converter {
    copy_edges: EdgeMap<ConversionFunction>,
    move_edges: EdgeMap<MoveConversionFunction>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    /// Creates an empty registry with no conversions
    pub fn new() -> Self {
        Self {
            copy_edges: EdgeMap::new(),
            move_edges: EdgeMap::new(),
        }
    }

    /// Creates a registry pre-populated with the standard COO/CSR
    /// conversions for element type `T`
    pub fn with_standard_conversions<T: Element>() -> Self {
        let mut converter = Self::new();
        converter.register_standard_conversions::<T>();
        converter
    }

    /// Appends a copy conversion for the (from, to) pair
    ///
    /// When `guard` is `None` the default guard applies: the source context
    /// must be [compatible](Context::is_compatible) with the destination.
    /// Duplicate registrations accumulate, never overwrite; earlier entries
    /// take priority.
    pub fn register_conversion(
        &mut self,
        from: FormatId,
        to: FormatId,
        guard: Option<ConversionGuard>,
        func: ConversionFunction,
    ) {
        self.copy_edges
            .register(from, to, guard.unwrap_or_else(default_guard), func);
    }

    /// Appends a move conversion for the (from, to) pair
    ///
    /// Same ordering and guard semantics as [`Converter::register_conversion`].
    pub fn register_move_conversion(
        &mut self,
        from: FormatId,
        to: FormatId,
        guard: Option<ConversionGuard>,
        func: MoveConversionFunction,
    ) {
        self.move_edges
            .register(from, to, guard.unwrap_or_else(default_guard), func);
    }

    /// Whether a registered, guard-satisfying conversion exists for the
    /// exact (from, from_ctx, to, to_ctx) combination
    pub fn can_convert(
        &self,
        from: FormatId,
        from_ctx: &dyn Context,
        to: FormatId,
        to_ctx: &dyn Context,
        is_move: bool,
    ) -> bool {
        if is_move {
            self.move_edges.resolve(from, from_ctx, to, to_ctx).is_some()
        } else {
            self.copy_edges.resolve(from, from_ctx, to, to_ctx).is_some()
        }
    }

    /// First candidate context, in caller priority order, for which
    /// resolution succeeds
    pub fn can_convert_via<'a>(
        &self,
        from: FormatId,
        from_ctx: &dyn Context,
        to: FormatId,
        to_ctxs: &[&'a dyn Context],
        is_move: bool,
    ) -> Option<&'a dyn Context> {
        to_ctxs
            .iter()
            .find(|&&ctx| self.can_convert(from, from_ctx, to, ctx, is_move))
            .copied()
    }

    /// Converts `source` into the format identified by `to`, associated with
    /// `to_ctx`; the source is left untouched
    pub fn convert(
        &self,
        source: &dyn Format,
        to: FormatId,
        to_ctx: &dyn Context,
    ) -> Result<Box<dyn Format>> {
        let from = source.format_id();
        let func = self
            .copy_edges
            .resolve(from, source.context(), to, to_ctx)
            .ok_or_else(|| Error::ConversionNotSupported {
                from: from.name(),
                to: to.name(),
                context: to_ctx.name().to_string(),
            })?;
        debug!(from = from.name(), to = to.name(), context = to_ctx.name(), "converting");
        func(source, to_ctx)
    }

    /// Converts `source` into the format identified by `to`, consuming the
    /// source and transferring buffer ownership where the layout permits
    pub fn convert_move(
        &self,
        source: Box<dyn Format>,
        to: FormatId,
        to_ctx: &dyn Context,
    ) -> Result<Box<dyn Format>> {
        let from = source.format_id();
        let func = self
            .move_edges
            .resolve(from, source.context(), to, to_ctx)
            .ok_or_else(|| Error::ConversionNotSupported {
                from: from.name(),
                to: to.name(),
                context: to_ctx.name().to_string(),
            })?;
        debug!(from = from.name(), to = to.name(), context = to_ctx.name(), "move-converting");
        func(source, to_ctx)
    }

    /// Converts and downcasts to a concrete format in one step
    pub fn convert_to<F: Format>(&self, source: &dyn Format, to_ctx: &dyn Context) -> Result<F> {
        self.convert(source, FormatId::of::<F>(), to_ctx)?.downcast::<F>()
    }

    /// Registers the standard COO→CSR and CSR→COO conversions (copy and
    /// move variants) for element type `T`, under the default guard
    pub fn register_standard_conversions<T: Element>(&mut self) {
        let coo_id = Coo::<T>::format_id_static();
        let csr_id = Csr::<T>::format_id_static();

        self.register_conversion(
            coo_id,
            csr_id,
            None,
            Box::new(|source, _ctx| {
                let coo = source.downcast_ref::<Coo<T>>()?;
                Ok(Box::new(coo_to_csr(coo)) as Box<dyn Format>)
            }),
        );
        self.register_conversion(
            csr_id,
            coo_id,
            None,
            Box::new(|source, _ctx| {
                let csr = source.downcast_ref::<Csr<T>>()?;
                Ok(Box::new(csr_to_coo(csr)) as Box<dyn Format>)
            }),
        );
        self.register_move_conversion(
            coo_id,
            csr_id,
            None,
            Box::new(|source, _ctx| {
                let coo = source.downcast::<Coo<T>>()?;
                Ok(Box::new(coo_into_csr(coo)) as Box<dyn Format>)
            }),
        );
        self.register_move_conversion(
            csr_id,
            coo_id,
            None,
            Box::new(|source, _ctx| {
                let csr = source.downcast::<Csr<T>>()?;
                Ok(Box::new(csr_into_coo(csr)) as Box<dyn Format>)
            }),
        );
    }
}

/// COO → CSR by counting sort over rows: histogram, prefix sum into
/// `row_ptr`, then a cursor scatter that keeps the triplets' relative order
/// within each row.
fn coo_to_csr<T: Element>(coo: &Coo<T>) -> Csr<T> {
    let n_rows = coo.n_rows();
    let nnz = coo.nnz();

    let mut counts = vec![0usize; n_rows];
    for &row in coo.row_idx() {
        counts[row] += 1;
    }
    let row_ptr = exclusive_scan(&counts);

    // order[pos] = source triplet index; one scatter pass, then gather
    let mut cursor = row_ptr[..n_rows].to_vec();
    let mut order = vec![0usize; nnz];
    for (k, &row) in coo.row_idx().iter().enumerate() {
        order[cursor[row]] = k;
        cursor[row] += 1;
    }

    let cols = coo.col_idx();
    let col_idx: Vec<usize> = order.iter().map(|&k| cols[k]).collect();
    let values = coo
        .values()
        .map(|vals| order.iter().map(|&k| vals[k]).collect());

    Csr::new(n_rows, coo.n_cols(), row_ptr, col_idx, values)
}

/// CSR → COO by expanding `row_ptr` into an explicit row array
fn csr_to_coo<T: Element>(csr: &Csr<T>) -> Coo<T> {
    let row_idx = expand_row_ptr(csr.row_ptr(), csr.n_rows(), csr.nnz());
    Coo::new(
        csr.n_rows(),
        csr.n_cols(),
        row_idx,
        csr.col_idx().to_vec(),
        csr.values().map(|vals| vals.to_vec()),
    )
}

/// Move variant of COO → CSR: reuses the column and value buffers outright
/// when the triplets are already row-sorted, otherwise permutes the owned
/// buffers in a gather pass.
fn coo_into_csr<T: Element>(coo: Coo<T>) -> Csr<T> {
    let ([n_rows, n_cols], row_idx, col_idx, values) = coo.into_raw();
    let nnz = col_idx.len();

    let mut counts = vec![0usize; n_rows];
    for &row in &row_idx {
        counts[row] += 1;
    }
    let row_ptr = exclusive_scan(&counts);

    if row_idx.windows(2).all(|pair| pair[0] <= pair[1]) {
        return Csr::new(n_rows, n_cols, row_ptr, col_idx, values);
    }

    let mut cursor = row_ptr[..n_rows].to_vec();
    let mut order = vec![0usize; nnz];
    for (k, &row) in row_idx.iter().enumerate() {
        order[cursor[row]] = k;
        cursor[row] += 1;
    }

    let col_idx: Vec<usize> = order.iter().map(|&k| col_idx[k]).collect();
    let values = values.map(|vals| order.iter().map(|&k| vals[k]).collect());

    Csr::new(n_rows, n_cols, row_ptr, col_idx, values)
}

/// Move variant of CSR → COO: the column and value buffers transfer as-is,
/// only the row array is materialized.
fn csr_into_coo<T: Element>(csr: Csr<T>) -> Coo<T> {
    let nnz = csr.nnz();
    let ([n_rows, n_cols], row_ptr, col_idx, values) = csr.into_raw();
    let row_idx = expand_row_ptr(&row_ptr, n_rows, nnz);
    Coo::new(n_rows, n_cols, row_idx, col_idx, values)
}

fn expand_row_ptr(row_ptr: &[usize], n_rows: usize, nnz: usize) -> Vec<usize> {
    let mut row_idx = Vec::with_capacity(nnz);
    for row in 0..n_rows {
        for _ in row_ptr[row]..row_ptr[row + 1] {
            row_idx.push(row);
        }
    }
    row_idx
}
