use std::{
    sync::{Arc, RwLock},
    task::Poll,
};

use bytes::Bytes;
use futures::future::BoxFuture;
use thiserror::Error;

use crate::{
    handler::{HandlerError, HttpHandler},
    requests::{Method, Request},
    response::Response,
};

#[derive(Debug, Error)]
pub enum InterceptError {
    #[error("no handler matched request: {method} {url}")]
    Unhandled { method: Method, url: String },

    #[error("handler for {method} {url} failed: {source}")]
    Handler {
        method: Method,
        url: String,
        #[source]
        source: HandlerError,
    },

    #[error("interceptor handler list was poisoned by a panicking writer")]
    Poisoned,
}

pub type InterceptResult<T> = std::result::Result<T, InterceptError>;

/// Interceptor holds the active set of handlers and routes intercepted
/// requests to the first one that matches.
///
/// Handlers given to `Interceptor::new` form the initial set. Handlers
/// added through `use_handlers` are prepended, so the most recent override
/// wins, and `reset_handlers` drops them again, which is what a test suite
/// wants between tests.
///
/// Clones share the same active set.
#[derive(Clone, Debug, Default)]
pub struct Interceptor {
    initial: Arc<Vec<HttpHandler>>,
    active: Arc<RwLock<Vec<HttpHandler>>>,
}

impl Interceptor {
    pub fn new(handlers: impl IntoIterator<Item = HttpHandler>) -> Self {
        let initial: Vec<HttpHandler> = handlers.into_iter().collect();
        Self {
            active: Arc::new(RwLock::new(initial.clone())),
            initial: Arc::new(initial),
        }
    }

    /// Prepends `handlers` to the active set, keeping their given order.
    ///
    /// # Errors
    ///
    /// Returns `InterceptError::Poisoned` if a writer panicked while holding the list.
    pub fn use_handlers(
        &self,
        handlers: impl IntoIterator<Item = HttpHandler>,
    ) -> InterceptResult<()> {
        let mut active = self.active.write().map_err(|_| InterceptError::Poisoned)?;
        let mut next: Vec<HttpHandler> = handlers.into_iter().collect();
        ewe_trace::debug!("interceptor: prepending {} handler(s)", next.len());
        next.append(&mut *active);
        *active = next;
        Ok(())
    }

    /// Restores the initial handler set.
    ///
    /// # Errors
    ///
    /// Returns `InterceptError::Poisoned` if a writer panicked while holding the list.
    pub fn reset_handlers(&self) -> InterceptResult<()> {
        let mut active = self.active.write().map_err(|_| InterceptError::Poisoned)?;
        *active = self.initial.as_ref().clone();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InterceptError::Poisoned` if a writer panicked while holding the list.
    pub fn list_handlers(&self) -> InterceptResult<Vec<HttpHandler>> {
        let active = self.active.read().map_err(|_| InterceptError::Poisoned)?;
        Ok(active.clone())
    }

    /// Routes `request` to the first matching handler.
    ///
    /// # Errors
    ///
    /// `InterceptError::Unhandled` when nothing matched, `InterceptError::Handler`
    /// when the matched handler failed.
    pub async fn dispatch(&self, mut request: Request) -> InterceptResult<Response> {
        // never hold the lock across the handler await.
        let handlers = self.list_handlers()?;

        let method = request.method().clone();
        let url = request.url().to_string();

        for handler in &handlers {
            let Some(params) = handler.matches(&request) else {
                continue;
            };

            ewe_trace::debug!(
                method = %method,
                url = %url,
                pattern = %handler.pattern(),
                "interceptor: matched handler"
            );

            request
                .head_mut()
                .set_route_path(Some(String::from(handler.pattern().source())));

            return handler.call(request, params).await.map_err(|source| {
                ewe_trace::error!(method = %method, url = %url, "interceptor: handler failed: {}", source);
                InterceptError::Handler {
                    method: method.clone(),
                    url: url.clone(),
                    source,
                }
            });
        }

        ewe_trace::warn!(method = %method, url = %url, "interceptor: no handler matched");
        Err(InterceptError::Unhandled { method, url })
    }

    /// Same as `dispatch` for plain `http` types.
    ///
    /// # Errors
    ///
    /// See [`Interceptor::dispatch`].
    pub async fn dispatch_http(
        &self,
        request: http::Request<Bytes>,
    ) -> InterceptResult<http::Response<Bytes>> {
        let response = self.dispatch(Request::from(request)).await?;
        Ok(response.into())
    }
}

impl tower::Service<http::Request<Bytes>> for Interceptor {
    type Response = http::Response<Bytes>;
    type Error = InterceptError;
    type Future = BoxFuture<'static, InterceptResult<Self::Response>>;

    fn poll_ready(&mut self, _cx: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<Bytes>) -> Self::Future {
        let interceptor = self.clone();
        Box::pin(async move { interceptor.dispatch_http(req).await })
    }
}

#[cfg(test)]
mod interceptor_tests {
    use super::*;
    use crate::handler;
    use http::StatusCode;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    fn text_handler(url: &str, body: &'static str) -> HttpHandler {
        handler::get(url, move |_request, _params| async move {
            Ok(Response::text(body, StatusCode::OK))
        })
    }

    #[tokio::test]
    async fn test_dispatch_uses_first_match() {
        let interceptor = Interceptor::new([
            text_handler("http://localhost/a", "first"),
            text_handler("http://localhost/a", "second"),
        ]);

        let response = interceptor
            .dispatch(Request::get("http://localhost/a").unwrap())
            .await
            .unwrap();
        assert_eq!(response.text_body().unwrap(), "first");
    }

    #[tokio::test]
    async fn test_use_handlers_overrides_and_reset_restores() {
        let interceptor = Interceptor::new([text_handler("http://localhost/a", "initial")]);

        interceptor
            .use_handlers([text_handler("http://localhost/a", "override")])
            .unwrap();
        let response = interceptor
            .dispatch(Request::get("http://localhost/a").unwrap())
            .await
            .unwrap();
        assert_eq!(response.text_body().unwrap(), "override");

        interceptor.reset_handlers().unwrap();
        assert_eq!(interceptor.list_handlers().unwrap().len(), 1);
        let response = interceptor
            .dispatch(Request::get("http://localhost/a").unwrap())
            .await
            .unwrap();
        assert_eq!(response.text_body().unwrap(), "initial");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unhandled_request_is_an_error() {
        let interceptor = Interceptor::default();
        let err = interceptor
            .dispatch(Request::get("http://localhost/missing").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InterceptError::Unhandled { ref method, .. } if method == &Method::GET
        ));
        assert!(logs_contain("no handler matched"));
    }

    #[tokio::test]
    async fn test_handler_failure_is_reported_with_request_info() {
        let interceptor = Interceptor::new([handler::post(
            "http://localhost/fail",
            |_request, _params| async move { Err(HandlerError::new("mock exploded")) },
        )]);

        let err = interceptor
            .dispatch(Request::post("http://localhost/fail", "").unwrap())
            .await
            .unwrap_err();

        match err {
            InterceptError::Handler { method, url, source } => {
                assert_eq!(method, Method::POST);
                assert_eq!(url, "http://localhost/fail");
                assert_eq!(source.to_string(), "mock exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_interceptor_is_a_tower_service() {
        let interceptor = Interceptor::new([text_handler("http://localhost/svc", "served")]);

        let request = http::Request::builder()
            .uri("http://localhost/svc")
            .body(Bytes::new())
            .unwrap();
        let response = interceptor.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"served");
    }
}
