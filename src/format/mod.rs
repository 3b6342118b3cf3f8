//! Sparse format representations
//!
//! Two concrete layouts are provided:
//!
//! - **COO** ([`Coo`]): parallel arrays of (row, col[, value]) triplets.
//!   Best for construction and format conversion.
//! - **CSR** ([`Csr`]): a `row_ptr` offsets array of length n_rows + 1 plus
//!   column (and optional value) arrays of length nnz. Best for row slicing
//!   and per-vertex traversal.
//!
//! Every concrete variant reports a stable [`FormatId`] (one identifier per
//! layout and element-type instantiation) which the converter and
//! preprocessing registries use purely as a dispatch key. Downcasting a
//! `dyn Format` checks the stored identifier and fails with
//! [`Error::TypeMismatch`](crate::error::Error::TypeMismatch) instead of
//! panicking.

pub mod coo;
pub mod csr;

pub use coo::Coo;
pub use csr::Csr;

use std::any::{type_name, Any, TypeId};
use std::fmt;

use crate::context::Context;
use crate::error::{Error, Result};

/// Element types storable in a format's value array
///
/// The unit type `()` is the "no value storage" element: formats
/// instantiated with it carry connectivity only, and readers refuse to parse
/// weights into it.
pub trait Element: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Parses one value token from a text reader
    fn parse_token(token: &str) -> Option<Self>;

    /// Whether this element type occupies storage
    fn has_storage() -> bool {
        std::mem::size_of::<Self>() != 0
    }
}

macro_rules! impl_element {
    ($($t:ty),* $(,)?) => {
        $(impl Element for $t {
            fn parse_token(token: &str) -> Option<Self> {
                token.parse().ok()
            }
        })*
    };
}

impl_element!(f32, f64, i32, i64, u32, u64, usize);

impl Element for () {
    fn parse_token(_token: &str) -> Option<Self> {
        None
    }
}

/// Stable identifier for a concrete format variant × element type
///
/// Wraps the type's `TypeId` together with its name; the id is the dispatch
/// key, the name feeds error messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatId {
    id: TypeId,
    name: &'static str,
}

impl FormatId {
    /// The identifier of a concrete format type
    pub fn of<F: Format>() -> Self {
        Self {
            id: TypeId::of::<F>(),
            name: type_name::<F>(),
        }
    }

    /// Human-readable name of the identified type
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Tagged sparse-data representation with owned buffers
///
/// A format exclusively owns its buffers until ownership is transferred,
/// either by consuming the format ([`Coo::into_raw`], [`Csr::into_raw`]) or
/// through a move conversion in the
/// [`Converter`](crate::convert::Converter).
pub trait Format: Any + Send + Sync {
    /// Stable identifier of this concrete variant
    fn format_id(&self) -> FormatId;

    /// Ordered sequence of sizes; length equals [`Format::order`]
    fn dimensions(&self) -> &[usize];

    /// Number of dimensions (2 for graph/matrix formats)
    fn order(&self) -> usize {
        self.dimensions().len()
    }

    /// The compute locale this format's buffers are associated with
    fn context(&self) -> &dyn Context;

    /// Upcast to `Any` for checked downcasting
    fn as_any(&self) -> &dyn Any;

    /// Boxed upcast, used by move conversions to take ownership
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl dyn Format {
    /// Checks whether the stored identifier matches `F`
    pub fn is<F: Format>(&self) -> bool {
        self.as_any().is::<F>()
    }

    /// Downcast to a concrete variant by reference
    ///
    /// Fails with [`Error::TypeMismatch`] if the stored identifier does not
    /// match `F`'s.
    pub fn downcast_ref<F: Format>(&self) -> Result<&F> {
        let found = self.format_id().name();
        self.as_any()
            .downcast_ref::<F>()
            .ok_or(Error::TypeMismatch {
                expected: type_name::<F>(),
                found,
            })
    }

    /// Downcast a boxed format into the concrete variant, taking ownership
    pub fn downcast<F: Format>(self: Box<Self>) -> Result<F> {
        let found = self.format_id().name();
        match self.into_any().downcast::<F>() {
            Ok(concrete) => Ok(*concrete),
            Err(_) => Err(Error::TypeMismatch {
                expected: type_name::<F>(),
                found,
            }),
        }
    }
}
