//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) path: String,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(path: impl Into<String>, body: Bytes, params: HashMap<String, String>) -> Self {
        Self { path: path.into(), body, params }
    }

    /// The request path as received, without the query string.
    pub fn path(&self) -> &str { &self.path }

    /// Returns a named path parameter.
    ///
    /// For a route `/api/tickets/{id}`, `req.param("id")` on `/api/tickets/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Deserializes the body as JSON.
    ///
    /// An empty body is read as `{}` so that request types made entirely of
    /// optional fields accept a bare request.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_slice(b"{}");
        }
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        title: Option<String>,
    }

    fn request(body: &'static [u8]) -> Request {
        let params = HashMap::from([("id".to_owned(), "42".to_owned())]);
        Request::new("/api/tickets/42", Bytes::from_static(body), params)
    }

    #[test]
    fn path_and_params_are_exposed() {
        let req = request(b"");
        assert_eq!(req.path(), "/api/tickets/42");
        assert_eq!(req.param("id"), Some("42"));
        assert_eq!(req.param("missing"), None);
    }

    #[test]
    fn empty_body_reads_as_empty_object() {
        let patch: Patch = request(b"  ").json().unwrap();
        assert!(patch.title.is_none());
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(request(b"{title:").json::<Patch>().is_err());
    }
}
