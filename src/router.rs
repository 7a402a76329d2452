//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Routers compose with
//! [`Router::nest`], which mounts every route of a child router under a path
//! prefix.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;

/// Outcome of matching a request against the routing table.
pub(crate) enum Lookup {
    Found(BoxedHandler, HashMap<String, String>),
    /// The path exists, but not for this method.
    MethodNotAllowed,
    NotFound,
}

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Registration methods return `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    registered: Vec<(Method, String, BoxedHandler)>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), registered: Vec::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax and are read back with
    /// `req.param("name")`:
    ///
    /// ```rust,no_run
    /// # use ticketd::{Method, Request, Response, Router};
    /// # async fn list(_: Request) -> Response { Response::text("") }
    /// # async fn get(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get, "/",     list)
    ///     .on(Method::Get, "/{id}", get);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the path is not a valid route or conflicts with an existing
    /// one. Routes are fixed at startup, so this is a programming error.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler.into_boxed_handler())
    }

    /// Mounts every route of `child` under `prefix`.
    ///
    /// A child route of `/` maps to the prefix itself, so `nest("/api/tickets", r)`
    /// serves `r`'s `/` at `/api/tickets` and its `/{id}` at `/api/tickets/{id}`.
    pub fn nest(mut self, prefix: &str, child: Router) -> Self {
        for (method, path, handler) in child.registered {
            self = self.add(method, &join(prefix, &path), handler);
        }
        self
    }

    fn add(mut self, method: Method, path: &str, handler: BoxedHandler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, Arc::clone(&handler))
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self.registered.push((method, path.to_owned(), handler));
        self
    }

    /// Matches `path` (trailing slashes ignored) for `method`.
    pub(crate) fn lookup(&self, method: Method, path: &str) -> Lookup {
        let path = normalize(path);

        if let Some(matched) = self.routes.get(&method).and_then(|tree| tree.at(path).ok()) {
            let handler = Arc::clone(matched.value);
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Lookup::Found(handler, params);
        }

        let elsewhere = self.routes.iter()
            .any(|(m, tree)| *m != method && tree.at(path).is_ok());
        if elsewhere { Lookup::MethodNotAllowed } else { Lookup::NotFound }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn join(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    match (prefix, path) {
        ("", p) => p.to_owned(),
        (pre, "/") => pre.to_owned(),
        (pre, p) => format!("{pre}{p}"),
    }
}
