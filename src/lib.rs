//! # tsu-middleware
//!
//! Priority-ordered middleware entries for the tsu HTTP framework.
//! It decides the order. It does not run anything.
//!
//! ## The contract
//!
//! The framework owns the request lifecycle: it routes, calls handlers and
//! executes middleware. This crate owns one thing: turning a pile of
//! declared middleware functions into a deterministic chain.
//!
//! - **[`Middleware`]**: a function plus its [`Location`] (request or
//!   response phase), a priority and a declaration number.
//! - **[`Sequence`]**: the counter that hands out declaration numbers.
//!   Atomic, injected, never global.
//! - **[`convert`]**: flattens mixed collections of raw functions and
//!   pre-built entries into one `VecDeque`, order preserved.
//! - **[`Registry`]**: app-wide and per-route declarations, sorted into a
//!   chain on request.
//!
//! ## Ordering
//!
//! Smaller priority first. On equal priority, the later declaration first.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use tsu_middleware::{Location, Middleware, Sequence, Source, convert};
//!
//! type Mw = dyn Fn(&str) -> String + Send + Sync;
//!
//! let seq = Sequence::new();
//! let tag = |t: &'static str| -> Arc<Mw> { Arc::new(move |path: &str| format!("{t} {path}")) };
//!
//! let a = Middleware::new(tag("a"), Location::Request, &seq);
//! let b = Middleware::with_priority(tag("b"), Location::Request, 5, &seq);
//! let c = Middleware::new(tag("c"), Location::Request, &seq);
//!
//! let mut chain = convert::<Mw, _, _>(
//!     [vec![Source::from(a), Source::from(b)], vec![Source::from(c)]],
//!     Location::Request,
//!     &seq,
//! );
//! chain.make_contiguous().sort();
//!
//! let out: Vec<String> = chain.iter().map(|mw| mw.call(("/users",))).collect();
//! assert_eq!(out, ["c /users", "a /users", "b /users"]);
//! ```

mod error;
mod handler;
mod location;
mod registry;
mod sequence;

pub mod middleware;

pub use error::Error;
pub use handler::Invoke;
pub use location::Location;
pub use middleware::{Middleware, Source, convert};
pub use registry::Registry;
pub use sequence::Sequence;
