//! Unified error type.

use std::fmt;

/// The error type returned by tsu-middleware's fallible operations.
///
/// Building entries and collecting them never fails. This type only
/// surfaces input that cannot be mapped onto the middleware model, such as
/// a location name read from a config file or a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The string is not the name of a [`Location`](crate::Location).
    UnknownLocation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLocation(name) => {
                write!(f, "unknown middleware location `{name}` (expected REQUEST or RESPONSE)")
            }
        }
    }
}

impl std::error::Error for Error {}
