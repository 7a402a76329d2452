//! HTTP method as a typed enum.
//!
//! Covers the methods ticketd routes. Anything else (`PATCH`, `HEAD`,
//! WebDAV, `PURGE`, ...) never matches a route and is answered with
//! `405 Method Not Allowed` before it reaches a handler.

use std::str::FromStr;

/// A routable HTTP method.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Delete,
    Get,
    Post,
    Put,
}

/// Parses an uppercase method string (e.g. `"GET"`). Case-sensitive per RFC 9110 §9.1.
impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DELETE" => Ok(Self::Delete),
            "GET"    => Ok(Self::Get),
            "POST"   => Ok(Self::Post),
            "PUT"    => Ok(Self::Put),
            _        => Err(()),
        }
    }
}

impl TryFrom<&http::Method> for Method {
    type Error = ();

    fn try_from(m: &http::Method) -> Result<Self, Self::Error> {
        m.as_str().parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hyper_methods() {
        assert_eq!(Method::try_from(&http::Method::PUT), Ok(Method::Put));
        assert_eq!(Method::try_from(&http::Method::DELETE), Ok(Method::Delete));
        assert!(Method::try_from(&http::Method::PATCH).is_err());
    }

    #[test]
    fn rejects_lowercase_and_extensions() {
        assert!("get".parse::<Method>().is_err());
        assert!("PURGE".parse::<Method>().is_err());
    }
}
