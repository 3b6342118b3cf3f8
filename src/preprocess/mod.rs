//! Generic per-layout algorithm dispatch
//!
//! Algorithms declare which format layouts they support by registering one
//! implementation per [`FormatId`]; [`FormatMatcher`] then runs them over an
//! arbitrary input format, silently materializing a compatible layout
//! through the [`Converter`](crate::convert::Converter) when needed. The
//! materializing conversion is always a copy, so the caller's input format
//! remains valid and unmodified.
//!
//! Built on top of the matcher:
//! - [`GenericReorder`]: user-registered reordering functions
//! - [`DegreeReorder`]: counting-sort ordering by vertex degree
//! - [`Transform`]: applies a permutation to a format

pub mod degree;
pub mod transform;

pub use degree::{DegreeReorder, DegreeReorderParams};
pub use transform::{Transform, TransformParams};

use std::any::{type_name, Any};

use tracing::debug;

use crate::context::Context;
use crate::convert::Converter;
use crate::error::{Error, Result};
use crate::format::{Format, FormatId};

/// Opaque per-call parameter object handed to preprocessing functions
///
/// Implemented for every `'static + Send + Sync` type; implementations
/// recover their concrete parameters with [`downcast_params`], which fails
/// with [`Error::TypeMismatch`] when the caller passed the wrong shape.
pub trait PreprocessParams: Any + Send + Sync {
    /// Upcast for checked downcasting
    fn as_any(&self) -> &dyn Any;

    /// Concrete type name, used in mismatch errors
    fn params_name(&self) -> &'static str;
}

impl<P: Any + Send + Sync> PreprocessParams for P {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn params_name(&self) -> &'static str {
        type_name::<P>()
    }
}

/// Recovers concrete parameters from an opaque parameter object
pub fn downcast_params<P: Any>(params: &dyn PreprocessParams) -> Result<&P> {
    let found = params.params_name();
    params.as_any().downcast_ref::<P>().ok_or(Error::TypeMismatch {
        expected: type_name::<P>(),
        found,
    })
}

/// A preprocessing implementation: receives the matched format (first slice
/// element; the slice form supports multi-format algorithms) plus an opaque
/// parameter object
pub type PreprocessFunction<R> = fn(&[&dyn Format], &dyn PreprocessParams) -> Result<R>;

/// Dispatch core mapping format ids to implementations
///
/// Entries keep registration order, which makes dispatch deterministic:
/// the first registered id reachable from the input wins.
pub struct FormatMatcher<R> {
    entries: Vec<(FormatId, PreprocessFunction<R>)>,
}

impl<R> Default for FormatMatcher<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> FormatMatcher<R> {
    /// Creates a matcher with no implementations
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Associates one implementation with each listed format id
    ///
    /// Registering an id that already has an implementation replaces it in
    /// place, keeping one implementation per id.
    pub fn register_function(&mut self, ids: &[FormatId], func: PreprocessFunction<R>) {
        for &id in ids {
            match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
                Some(entry) => entry.1 = func,
                None => self.entries.push((id, func)),
            }
        }
    }

    /// Runs the first implementation reachable from `input`
    ///
    /// Direct pass first: an implementation registered for the input's own
    /// id runs in place when the input's context is compatible with a
    /// candidate, with no conversion and no copy. Otherwise each entry is tried in
    /// registration order and the first id the converter can reach under
    /// some candidate context (copy conversion only) is materialized and
    /// run. The input is never consumed or modified.
    pub fn execute(
        &self,
        input: &dyn Format,
        params: &dyn PreprocessParams,
        converter: &Converter,
        contexts: &[&dyn Context],
    ) -> Result<R> {
        let input_id = input.format_id();

        for (id, func) in &self.entries {
            if *id == input_id && contexts.iter().any(|ctx| input.context().is_compatible(*ctx)) {
                debug!(format = input_id.name(), "dispatching in place");
                return func(&[input], params);
            }
        }

        for (id, func) in &self.entries {
            if let Some(ctx) =
                converter.can_convert_via(input_id, input.context(), *id, contexts, false)
            {
                debug!(
                    from = input_id.name(),
                    to = id.name(),
                    context = ctx.name(),
                    "materializing format for dispatch"
                );
                let materialized = converter.convert(input, *id, ctx)?;
                return func(&[materialized.as_ref()], params);
            }
        }

        Err(Error::NoReorderImplementation {
            format: input_id.name(),
            contexts: contexts
                .iter()
                .map(|ctx| ctx.name())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Reorder implementation: returns an owned permutation of length equal to
/// the input's first dimension, mapping old id to new id
pub type ReorderFunction = PreprocessFunction<Vec<usize>>;

/// Reordering dispatch over user-registered implementations
///
/// The open half of the preprocessing framework: register a reorder
/// function for the layouts it understands, then run it over any input
/// format the converter can reach them from.
pub struct GenericReorder {
    matcher: FormatMatcher<Vec<usize>>,
}

impl Default for GenericReorder {
    fn default() -> Self {
        Self::new()
    }
}

impl GenericReorder {
    /// Creates a reorderer with no implementations
    pub fn new() -> Self {
        Self {
            matcher: FormatMatcher::new(),
        }
    }

    /// Associates one reorder implementation with each listed format id
    pub fn register_function(&mut self, ids: &[FormatId], func: ReorderFunction) {
        self.matcher.register_function(ids, func);
    }

    /// Computes a permutation for `input`, converting to a supported layout
    /// if necessary
    ///
    /// Fails with
    /// [`Error::NoReorderImplementation`] when no (implementation, context)
    /// pair resolves.
    pub fn get_reorder(
        &self,
        input: &dyn Format,
        params: &dyn PreprocessParams,
        converter: &Converter,
        contexts: &[&dyn Context],
    ) -> Result<Vec<usize>> {
        self.matcher.execute(input, params, converter, contexts)
    }
}
