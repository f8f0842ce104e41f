//! Middleware entries and their ordering.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured tracing, request-id injection,
//! authentication-header inspection. This module does not run middleware.
//! It answers one question for the framework: *in which order?*
//!
//! # The ordering rule
//!
//! Each [`Middleware`] sorts by `(priority, Reverse(sequence number))`,
//! ascending:
//!
//! 1. smaller `priority` first,
//! 2. on a tie, the entry declared **later** first.
//!
//! ```text
//! declared:  A(priority 0)  B(priority 5)  C(priority 0)
//! sorted:    C  A  B
//! ```
//!
//! `Middleware` implements [`Ord`] with exactly this rule, so a plain
//! `sort()` on a slice (or `make_contiguous().sort()` on a `VecDeque`)
//! produces the chain order.

mod convert;

use std::borrow::Cow;
use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::sync::Arc;

use crate::handler::Invoke;
use crate::location::Location;
use crate::sequence::Sequence;

pub use convert::{Source, convert};

/// A middleware function plus everything needed to sort it deterministically.
///
/// `F` is the function type. It is usually a trait object such as
/// `dyn Fn(&Request) -> Option<Response> + Send + Sync`, which lets entries
/// wrapping different closures share one collection. The function is held
/// through an [`Arc`]: the registry that created the entry owns its lifetime,
/// and clones of the entry share it.
///
/// Entries are immutable once built. A clone is the *same* entry: it keeps
/// the sequence number and compares equal to the original.
pub struct Middleware<F: ?Sized> {
    func: Arc<F>,
    name: Cow<'static, str>,
    priority: i32,
    location: Location,
    definition: u64,
}

impl<F: ?Sized> Middleware<F> {
    /// Wraps `func` with the default priority `0`.
    ///
    /// The sequence number is drawn from `sequence` now, so the order of
    /// `new` calls is the declaration order.
    pub fn new(func: Arc<F>, location: Location, sequence: &Sequence) -> Self {
        Self::with_priority(func, location, 0, sequence)
    }

    /// Wraps `func` with an explicit priority.
    pub fn with_priority(
        func: Arc<F>,
        location: Location,
        priority: i32,
        sequence: &Sequence,
    ) -> Self {
        Self {
            func,
            name: Cow::Borrowed(short_type_name::<F>()),
            priority,
            location,
            definition: sequence.next(),
        }
    }

    /// Replaces the diagnostic name shown by `Display` and `Debug`.
    ///
    /// The default is derived from the function's type: the bare name for
    /// `fn` items (`check_token`), the full path for closures
    /// (`my_app::routes::{{closure}}`) and the whole type for trait objects
    /// (`dyn Fn(..)`). Entries stored as trait objects should be named
    /// explicitly.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Calls the wrapped function with `args` and returns its result unchanged.
    ///
    /// Arguments are passed as a tuple matching the function's arity:
    /// `entry.call(())`, `entry.call((req,))`, `entry.call((req, res))`.
    pub fn call<Args>(&self, args: Args) -> <F as Invoke<Args>>::Output
    where
        F: Invoke<Args>,
    {
        Invoke::invoke(&*self.func, args)
    }

    /// The sort key: `(priority, Reverse(sequence number))`, ascending.
    pub fn order(&self) -> (i32, Reverse<u64>) {
        (self.priority, Reverse(self.definition))
    }

    pub fn func(&self) -> &Arc<F> { &self.func }
    pub fn name(&self) -> &str { &self.name }
    pub fn priority(&self) -> i32 { self.priority }
    pub fn location(&self) -> Location { self.location }

    /// The sequence number assigned at construction.
    pub fn definition(&self) -> u64 { self.definition }
}

// Manual impl: `#[derive(Clone)]` would demand `F: Clone`, but only the
// `Arc` is cloned.
impl<F: ?Sized> Clone for Middleware<F> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            name: self.name.clone(),
            priority: self.priority,
            location: self.location,
            definition: self.definition,
        }
    }
}

// ── Ordering ──────────────────────────────────────────────────────────────────
//
// Comparison looks at `(priority, sequence number)` only. Entries are
// comparable when their numbers come from one `Sequence`; entries from two
// independent counters can tie while wrapping different functions.

impl<F: ?Sized> PartialEq for Middleware<F> {
    fn eq(&self, other: &Self) -> bool {
        self.order() == other.order()
    }
}

impl<F: ?Sized> Eq for Middleware<F> {}

impl<F: ?Sized> PartialOrd for Middleware<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: ?Sized> Ord for Middleware<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order().cmp(&other.order())
    }
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

impl<F: ?Sized> fmt::Display for Middleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Middleware(func=<function {}>, priority={}, location={})",
            self.name, self.priority, self.location,
        )
    }
}

impl<F: ?Sized> fmt::Debug for Middleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// `my_app::auth::check_token` → `check_token`. Closures and types that are
/// not a plain path (`dyn Fn(..)`, generics) are returned whole.
fn short_type_name<F: ?Sized>() -> &'static str {
    let full = std::any::type_name::<F>();
    if full.contains(['<', '(', ' ']) || full.ends_with("{{closure}}") {
        full
    } else {
        full.rsplit("::").next().unwrap_or(full)
    }
}
