//! Flattening mixed middleware collections into one queue.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::location::Location;
use crate::sequence::Sequence;

use super::Middleware;

/// One element of a middleware collection: either a bare function that
/// still needs wrapping, or an entry someone already built.
pub enum Source<F: ?Sized> {
    /// A function registered without a priority. Wrapped on conversion.
    Raw(Arc<F>),
    /// A pre-built entry. Passed through untouched.
    Entry(Middleware<F>),
}

impl<F: ?Sized> Source<F> {
    /// Resolves to an entry. `Raw` functions get priority `0`, `location`,
    /// and a fresh number from `sequence`; `Entry` values keep all of their
    /// own fields, location included.
    pub fn into_middleware(self, location: Location, sequence: &Sequence) -> Middleware<F> {
        match self {
            Self::Raw(func) => {
                let mw = Middleware::new(func, location, sequence);
                debug!(
                    name = %mw.name(),
                    location = %location,
                    definition = mw.definition(),
                    "wrapped raw middleware",
                );
                mw
            }
            Self::Entry(mw) => mw,
        }
    }
}

impl<F: ?Sized> From<Arc<F>> for Source<F> {
    fn from(func: Arc<F>) -> Self {
        Self::Raw(func)
    }
}

impl<F: ?Sized> From<Middleware<F>> for Source<F> {
    fn from(mw: Middleware<F>) -> Self {
        Self::Entry(mw)
    }
}

/// Concatenates `collections` into a single queue of entries.
///
/// Order is preserved: collection by collection, then element by element.
/// Raw functions are wrapped as they are reached, so their sequence numbers
/// follow their position in the input. Nothing is sorted here; sort the
/// result (see the [module docs](super)) before running it.
///
/// Each collection may hold [`Source`] values, bare `Arc<F>` functions, or
/// [`Middleware`] entries: anything that converts into a `Source<F>`.
pub fn convert<F, I, S>(
    collections: I,
    location: Location,
    sequence: &Sequence,
) -> VecDeque<Middleware<F>>
where
    F: ?Sized,
    I: IntoIterator,
    I::Item: IntoIterator<Item = S>,
    S: Into<Source<F>>,
{
    let queue: VecDeque<Middleware<F>> = collections
        .into_iter()
        .flatten()
        .map(Into::<Source<F>>::into)
        .map(|source| source.into_middleware(location, sequence))
        .inspect(|mw| trace!(middleware = %mw, "collected"))
        .collect();

    debug!(location = %location, len = queue.len(), "middleware collected");
    queue
}
