//! Middleware location as a typed enum.
//!
//! A middleware runs either before the route handler sees the request or
//! after the handler has produced a response. The location is fixed when the
//! middleware is registered and never changes afterwards.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The request-lifecycle phase a middleware belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Location {
    /// Runs before the handler.
    Request,
    /// Runs after the handler.
    Response,
}

impl Location {
    /// Returns the uppercase name (e.g. `"REQUEST"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request  => "REQUEST",
            Self::Response => "RESPONSE",
        }
    }
}

/// Parses a location name. Case-insensitive, so `request` and `REQUEST` are
/// both accepted.
impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("REQUEST") {
            Ok(Self::Request)
        } else if s.eq_ignore_ascii_case("RESPONSE") {
            Ok(Self::Response)
        } else {
            Err(Error::UnknownLocation(s.to_owned()))
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_uppercase() {
        assert_eq!(Location::Request.to_string(), "REQUEST");
        assert_eq!(Location::Response.to_string(), "RESPONSE");
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!("REQUEST".parse(), Ok(Location::Request));
        assert_eq!("response".parse(), Ok(Location::Response));
        assert_eq!("Response".parse(), Ok(Location::Response));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(
            "handler".parse::<Location>(),
            Err(Error::UnknownLocation("handler".to_owned())),
        );
        assert!("".parse::<Location>().is_err());
    }
}
