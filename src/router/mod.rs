//! Route table.
//!
//! Maps an exact path and method onto a handler. There is no pattern or
//! parameter matching: `/users` and `/users/` are different routes.
//!
//! ```text
//! Request → can_handle(method, path) → lookup → Handler → Response
//! ```
//!
//! Routes are registered before the server starts and the table is never
//! mutated afterwards, so lookups need no locking. Routers can be composed:
//! [`Router::add_router`] mounts every route of another router under a path
//! prefix, going through the same validation as a direct registration.

pub mod handler;

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::http::request::Method;

pub use handler::{Handler, HandlerFuture};

/// The method tokens a route may be registered for.
pub const HTTP_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

/// Configuration-time errors raised while registering routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("paths must start with '/': {0:?}")]
    InvalidPath(String),

    #[error("invalid HTTP method: {0}")]
    InvalidHttpMethod(String),

    #[error("route {method} {path} already exists")]
    RouteAlreadyExists { method: Method, path: String },

    #[error("methods must have at least one HTTP method")]
    NoMethods,
}

/// Router that maps paths and methods to handlers.
#[derive(Clone, Default)]
pub struct Router {
    routes: BTreeMap<String, BTreeMap<Method, Arc<dyn Handler>>>,
}

impl Router {
    /// Creates a new empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `path` for each of `methods`.
    ///
    /// Method tokens are upper-cased before validation. Nothing is
    /// registered unless the whole call is valid.
    ///
    /// # Errors
    ///
    /// * [`RouteError::NoMethods`] if `methods` is empty
    /// * [`RouteError::InvalidPath`] if `path` does not start with `/`
    /// * [`RouteError::InvalidHttpMethod`] for a token outside [`HTTP_METHODS`]
    /// * [`RouteError::RouteAlreadyExists`] if a method is already bound for
    ///   `path`, or listed twice
    ///
    /// # Example
    ///
    /// ```
    /// use kastle::http::{request::Request, response::Response};
    /// use kastle::router::Router;
    ///
    /// let mut router = Router::new();
    /// router
    ///     .route("/items", &["get", "post"], |_req: Request| async {
    ///         Ok::<_, anyhow::Error>(Response::ok("items"))
    ///     })
    ///     .unwrap();
    /// assert!(router.can_handle("POST", "/items"));
    /// ```
    pub fn route<H: Handler>(
        &mut self,
        path: &str,
        methods: &[&str],
        handler: H,
    ) -> Result<(), RouteError> {
        self.register(path, methods, Arc::new(handler))
    }

    /// Shortcut for `route(path, &["GET"], handler)`.
    pub fn get<H: Handler>(&mut self, path: &str, handler: H) -> Result<(), RouteError> {
        self.route(path, &["GET"], handler)
    }

    /// Shortcut for `route(path, &["POST"], handler)`.
    pub fn post<H: Handler>(&mut self, path: &str, handler: H) -> Result<(), RouteError> {
        self.route(path, &["POST"], handler)
    }

    pub fn put<H: Handler>(&mut self, path: &str, handler: H) -> Result<(), RouteError> {
        self.route(path, &["PUT"], handler)
    }

    pub fn delete<H: Handler>(&mut self, path: &str, handler: H) -> Result<(), RouteError> {
        self.route(path, &["DELETE"], handler)
    }

    pub fn patch<H: Handler>(&mut self, path: &str, handler: H) -> Result<(), RouteError> {
        self.route(path, &["PATCH"], handler)
    }

    /// Mounts every route of `router` under `base_path`.
    ///
    /// Each route's path becomes `base_path + path` verbatim, so mounting
    /// `/about` under `/api` gives `/api/about` and under `/` gives `//about`.
    /// Every imported route is validated as if registered directly; on the
    /// first error nothing is imported.
    pub fn add_router(&mut self, base_path: &str, router: &Router) -> Result<(), RouteError> {
        let mut merged = self.clone();

        for (path, method, handler) in router.entries() {
            let full_path = format!("{}{}", base_path, path);
            merged.register(&full_path, &[method.as_str()], Arc::clone(handler))?;
        }

        *self = merged;
        Ok(())
    }

    /// Whether some route accepts `method` on `path`.
    pub fn can_handle(&self, method: &str, path: &str) -> bool {
        self.lookup(method, path).is_some()
    }

    /// Finds the handler for an exact method token and path.
    pub fn lookup(&self, method: &str, path: &str) -> Option<Arc<dyn Handler>> {
        let method = Method::from_str(method)?;
        self.routes.get(path)?.get(&method).cloned()
    }

    /// All registered (path, method) pairs, ordered by path then method.
    pub fn routes(&self) -> impl Iterator<Item = (&str, Method)> + '_ {
        self.entries().map(|(path, method, _)| (path, method))
    }

    /// Number of registered (path, method) pairs.
    pub fn len(&self) -> usize {
        self.routes.values().map(|methods| methods.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> impl Iterator<Item = (&str, Method, &Arc<dyn Handler>)> + '_ {
        self.routes.iter().flat_map(|(path, methods)| {
            methods
                .iter()
                .map(move |(method, handler)| (path.as_str(), *method, handler))
        })
    }

    fn register(
        &mut self,
        path: &str,
        methods: &[&str],
        handler: Arc<dyn Handler>,
    ) -> Result<(), RouteError> {
        if methods.is_empty() {
            return Err(RouteError::NoMethods);
        }

        if !path.starts_with('/') {
            return Err(RouteError::InvalidPath(path.to_string()));
        }

        let existing = self.routes.get(path);
        let mut parsed = Vec::with_capacity(methods.len());

        for token in methods {
            let token = token.to_ascii_uppercase();
            let method = Method::from_str(&token).ok_or(RouteError::InvalidHttpMethod(token))?;

            let taken = existing.is_some_and(|bound| bound.contains_key(&method));
            if taken || parsed.contains(&method) {
                return Err(RouteError::RouteAlreadyExists {
                    method,
                    path: path.to_string(),
                });
            }

            parsed.push(method);
        }

        let bound = self.routes.entry(path.to_string()).or_default();
        for method in parsed {
            tracing::debug!(%method, path, "registered route");
            bound.insert(method, Arc::clone(&handler));
        }

        Ok(())
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.routes().map(|(path, method)| format!("{} {}", method, path)))
            .finish()
    }
}
