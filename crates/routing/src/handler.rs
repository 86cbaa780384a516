use core::fmt;
use std::{error::Error, future::Future, sync::Arc};

use futures::future::{BoxFuture, FutureExt};

use crate::{
    requests::{Method, Params, Request},
    response::Response,
    routes::RoutePattern,
};

/// HandlerError wraps whatever error a handler callback failed with.
pub struct HandlerError {
    inner: Box<dyn Error + Send + Sync + 'static>,
}

impl HandlerError {
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        Self { inner: err.into() }
    }

    #[must_use]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    #[must_use]
    pub fn into_inner(self) -> Box<dyn Error + Send + Sync + 'static> {
        self.inner
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HandlerError").field(&self.inner).finish()
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.inner)
    }
}

pub type HandlerResult = std::result::Result<Response, HandlerError>;

pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

type Callback = Arc<dyn Fn(Request, Params) -> HandlerFuture + Send + Sync>;

/// HttpHandler is a registered interception handler: the method and route
/// pattern it answers to, plus the async callback producing its response.
///
/// Handlers are cheap to clone and share their callback.
#[derive(Clone)]
pub struct HttpHandler {
    method: Method,
    pattern: RoutePattern,
    callback: Callback,
}

impl fmt::Debug for HttpHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpHandler")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

impl HttpHandler {
    pub fn new<F, Fut>(method: Method, url: &str, callback: F) -> Self
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            method,
            pattern: RoutePattern::parse(url),
            callback: Arc::new(move |request, params| callback(request, params).boxed()),
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Returns the route params if this handler answers the request.
    #[must_use]
    pub fn matches(&self, request: &Request) -> Option<Params> {
        if request.method() != &self.method {
            return None;
        }
        self.pattern.matches(request.url())
    }

    /// Invokes the callback with params the caller already extracted.
    #[must_use]
    pub fn call(&self, request: Request, params: Params) -> HandlerFuture {
        (self.callback)(request, params)
    }

    /// Runs the handler if it matches, `None` otherwise.
    pub async fn run(&self, mut request: Request) -> Option<HandlerResult> {
        let params = self.matches(&request)?;
        request
            .head_mut()
            .set_route_path(Some(String::from(self.pattern.source())));
        Some(self.call(request, params).await)
    }
}

/// Registers a handler for `method` on the `url` pattern.
pub fn on<F, Fut>(method: Method, url: &str, callback: F) -> HttpHandler
where
    F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    HttpHandler::new(method, url, callback)
}

macro_rules! method_handler {
    ($name:ident, $method:expr) => {
        pub fn $name<F, Fut>(url: &str, callback: F) -> HttpHandler
        where
            F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = HandlerResult> + Send + 'static,
        {
            HttpHandler::new($method, url, callback)
        }
    };
}

method_handler!(get, Method::GET);
method_handler!(post, Method::POST);
method_handler!(put, Method::PUT);
method_handler!(delete, Method::DELETE);
method_handler!(patch, Method::PATCH);
method_handler!(head, Method::HEAD);
method_handler!(options, Method::OPTIONS);

#[cfg(test)]
mod handler_tests {
    use super::*;
    use http::StatusCode;

    #[tokio::test]
    async fn test_handler_runs_only_for_its_method() {
        let handler = get("http://localhost/users/:id", |_request, params| async move {
            let id = params.get("id").and_then(|p| p.as_str()).unwrap_or_default();
            Ok(Response::text(id, StatusCode::OK))
        });

        let request = Request::get("http://localhost/users/7").unwrap();
        let response = handler.run(request).await.unwrap().unwrap();
        assert_eq!(response.text_body().unwrap(), "7");

        let request = Request::post("http://localhost/users/7", "").unwrap();
        assert!(handler.run(request).await.is_none());
    }

    #[tokio::test]
    async fn test_handler_sees_matched_route_path() {
        let handler = post("http://localhost/items", |request, _params| async move {
            let route = request.head().route_path().clone().unwrap_or_default();
            Ok(Response::text(route, StatusCode::OK))
        });

        let request = Request::post("http://localhost/items", "").unwrap();
        let response = handler.run(request).await.unwrap().unwrap();
        assert_eq!(response.text_body().unwrap(), "http://localhost/items");
    }

    #[test]
    fn test_handler_without_match_is_skipped() {
        let handler = get("http://localhost/users/:id", |_request, _params| async move {
            Ok(Response::empty(StatusCode::NO_CONTENT))
        });

        let request = Request::get("http://localhost/teams/7").unwrap();
        assert!(tokio_test::block_on(handler.run(request)).is_none());

        let request = Request::get("http://localhost/users/7").unwrap();
        let response = tokio_test::block_on(handler.run(request)).unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_handler_error_keeps_its_source() {
        #[derive(Debug, thiserror::Error)]
        #[error("boom")]
        struct Boom;

        let handler = delete("/things/:id", |_request, _params| async move {
            Err(HandlerError::new(Boom))
        });

        let request = Request::build(Method::DELETE, "http://any/things/1", "").unwrap();
        let err = handler.run(request).await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(err.downcast_ref::<Boom>().is_some());

        let source = err.source().unwrap();
        assert!(source.downcast_ref::<Boom>().is_some());
    }
}
