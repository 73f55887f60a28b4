use std::future::Future;
use std::pin::Pin;

use crate::http::request::Request;
use crate::http::response::Response;

pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<Response>> + Send + 'static>>;

/// A route handler.
///
/// Implemented for every `Fn(Request) -> impl Future<Output = anyhow::Result<Response>>`,
/// so plain `async fn`s and closures can be registered directly:
///
/// ```
/// # use kastle::http::{request::Request, response::Response};
/// # use kastle::router::Router;
/// async fn about(_req: Request) -> anyhow::Result<Response> {
///     Ok(Response::ok("about"))
/// }
///
/// let mut router = Router::new();
/// router.get("/about", about).unwrap();
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: Request) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Response>> + Send + 'static,
{
    fn call(&self, request: Request) -> HandlerFuture {
        Box::pin(self(request))
    }
}
