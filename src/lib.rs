//! # sparsekit
//!
//! A library for representing sparse graphs and matrices in multiple
//! in-memory layouts, converting between those layouts on demand, and
//! running layout-specific algorithms transparently over arbitrary input
//! layouts.
//!
//! ## Overview
//!
//! The core of the library is generic conversion and dispatch machinery:
//!
//! 1. **Formats** ([`Coo`], [`Csr`]): tagged sparse representations with
//!    owned buffers. Each concrete layout × element type reports a stable
//!    [`FormatId`] used purely as a dispatch key.
//!
//! 2. **Contexts** ([`CpuContext`]): tags for the compute locale a format
//!    is associated with. Compatibility is decided by a guard predicate, so
//!    new context kinds slot in without touching dispatch logic.
//!
//! 3. **Converter** ([`Converter`]): a registry matching (source-layout,
//!    destination-layout, execution-context) triples to conversion
//!    functions at runtime. Within a (source, destination) pair, guards are
//!    evaluated in registration order and the first match wins.
//!
//! 4. **Preprocessing** ([`GenericReorder`], [`DegreeReorder`],
//!    [`Transform`]): algorithms declare which layouts they support; the
//!    framework silently materializes a compatible layout via the converter
//!    and invokes the implementation.
//!
//! 5. **Readers** ([`EdgeListReader`], [`MatrixMarketReader`]): parse
//!    external text formats into canonical format instances.
//!
//! ## Usage
//!
//! Degree-order a graph given in COO form; the reorder implementation only
//! understands CSR, so the framework converts behind the scenes:
//!
//! ```
//! use sparsekit::{Converter, Coo, CpuContext, DegreeReorder};
//!
//! let coo = Coo::<f64>::new(
//!     3,
//!     3,
//!     vec![0, 1, 1, 2],
//!     vec![1, 0, 2, 1],
//!     Some(vec![1.0, 1.0, 1.0, 1.0]),
//! );
//!
//! let converter = Converter::with_standard_conversions::<f64>();
//! let orderer = DegreeReorder::<f64>::new(true);
//! let order = orderer.get_reorder(&coo, &converter, &[&CpuContext])?;
//!
//! assert_eq!(order.len(), 3);
//! # Ok::<(), sparsekit::Error>(())
//! ```

pub mod context;
pub mod convert;
pub mod error;
pub mod format;
pub mod io;
pub mod preprocess;
pub mod utils;

// Re-export primary components
pub use context::{Context, CpuContext};
pub use convert::Converter;
pub use error::{Error, Result};
pub use format::{Coo, Csr, Element, Format, FormatId};
pub use io::{EdgeListReader, MatrixMarketReader, SparseReader};
pub use preprocess::{
    downcast_params, DegreeReorder, DegreeReorderParams, FormatMatcher, GenericReorder,
    PreprocessParams, Transform, TransformParams,
};
pub use utils::exclusive_scan;

/// Version information for the sparsekit library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
