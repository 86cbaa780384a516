use core::fmt;
use std::{future::Future, sync::Arc};

use ewe_routing::{ParamValue, Params, Request, Response, ResponseError};
use futures::future::{BoxFuture, FutureExt};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::codec::DecodeError;

#[derive(Debug, Error)]
pub enum MockError {
    #[error("failed to decode procedure input: {0}")]
    Decode(#[from] DecodeError),

    #[error("procedure input does not match the expected shape: {0}")]
    InputMismatch(#[source] serde_json::Error),

    #[error("failed to serialize mock output: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to build mock response: {0}")]
    Output(#[from] ResponseError),

    #[error("{0}")]
    Failed(String),

    #[error("{path:?} is a router, not a procedure")]
    NotAProcedure { path: Vec<String> },
}

impl MockError {
    /// An ad-hoc failure raised by a mock function.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

pub type MockResult<T> = std::result::Result<T, MockError>;

/// Everything a mock function gets to see about the call it answers.
///
/// `params` holds what the route pattern captured and `input` what the
/// request carried (query for GET, body otherwise). The two are never
/// merged.
#[derive(Clone, Debug)]
pub struct ProcedureContext {
    pub request: Request,
    pub path: Vec<String>,
    pub params: Params,
    pub input: Value,
}

impl ProcedureContext {
    /// Deserializes a copy of the input into `T`.
    ///
    /// # Errors
    ///
    /// `MockError::InputMismatch` when the input does not fit `T`.
    pub fn input_as<T: DeserializeOwned>(&self) -> MockResult<T> {
        T::deserialize(&self.input).map_err(MockError::InputMismatch)
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }
}

/// What a mock answers with: a value sent back as JSON or a response
/// returned untouched.
#[derive(Clone, Debug)]
pub enum Reply {
    Output(Value),
    Raw(Response),
}

impl Reply {
    /// # Errors
    ///
    /// `MockError::Serialize` when `value` cannot be turned into JSON.
    pub fn output<T: Serialize>(value: T) -> MockResult<Self> {
        serde_json::to_value(value)
            .map(Reply::Output)
            .map_err(MockError::Serialize)
    }

    /// # Errors
    ///
    /// `MockError::Output` if the JSON body cannot be encoded.
    pub fn into_response(self) -> MockResult<Response> {
        match self {
            Reply::Raw(response) => Ok(response),
            Reply::Output(value) => Ok(Response::json(&value)?),
        }
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Output(value)
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Reply::Raw(response)
    }
}

type MockFn = Arc<dyn Fn(ProcedureContext) -> BoxFuture<'static, MockResult<Reply>> + Send + Sync>;

/// MockResponse describes how a handler answers: with a fixed reply, or by
/// running a function per request.
#[derive(Clone)]
pub enum MockResponse {
    Static(Reply),
    Dynamic(MockFn),
}

impl fmt::Debug for MockResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(reply) => f.debug_tuple("Static").field(reply).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl MockResponse {
    /// A fixed reply serialized from `value`.
    ///
    /// # Errors
    ///
    /// `MockError::Serialize` when `value` cannot be turned into JSON.
    pub fn value<T: Serialize>(value: T) -> MockResult<Self> {
        Reply::output(value).map(MockResponse::Static)
    }

    #[must_use]
    pub fn json(value: Value) -> Self {
        MockResponse::Static(Reply::Output(value))
    }

    #[must_use]
    pub fn response(response: Response) -> Self {
        MockResponse::Static(Reply::Raw(response))
    }

    pub fn from_fn<F, R>(f: F) -> Self
    where
        F: Fn(ProcedureContext) -> MockResult<R> + Send + Sync + 'static,
        R: Into<Reply>,
    {
        MockResponse::Dynamic(Arc::new(move |context| {
            let reply: MockResult<Reply> = f(context).map(Into::into);
            futures::future::ready(reply).boxed()
        }))
    }

    pub fn from_async<F, Fut, R>(f: F) -> Self
    where
        F: Fn(ProcedureContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = MockResult<R>> + Send + 'static,
        R: Into<Reply>,
    {
        MockResponse::Dynamic(Arc::new(move |context| {
            f(context)
                .map(|reply: MockResult<R>| reply.map(Into::<Reply>::into))
                .boxed()
        }))
    }

    /// Produces the reply for one call. Static replies are cloned, dynamic
    /// ones run their function and await it.
    ///
    /// # Errors
    ///
    /// Whatever the mock function fails with.
    pub async fn evaluate(&self, context: ProcedureContext) -> MockResult<Reply> {
        match self {
            MockResponse::Static(reply) => Ok(reply.clone()),
            MockResponse::Dynamic(f) => f(context).await,
        }
    }
}

impl From<Reply> for MockResponse {
    fn from(reply: Reply) -> Self {
        MockResponse::Static(reply)
    }
}

impl From<Value> for MockResponse {
    fn from(value: Value) -> Self {
        MockResponse::json(value)
    }
}

impl From<Response> for MockResponse {
    fn from(response: Response) -> Self {
        MockResponse::response(response)
    }
}

#[cfg(test)]
mod mock_response_tests {
    use super::*;
    use ewe_routing::StatusCode;
    use serde_json::json;

    fn context(input: Value) -> ProcedureContext {
        ProcedureContext {
            request: Request::post("http://localhost/x", "").unwrap(),
            path: vec![String::from("x")],
            params: Params::new(),
            input,
        }
    }

    #[tokio::test]
    async fn test_static_reply_ignores_input() {
        let mock = MockResponse::json(json!({"ok": true}));
        for input in [json!(1), json!("two"), Value::Null] {
            let reply = mock.evaluate(context(input)).await.unwrap();
            let response = reply.into_response().unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.json_body::<Value>().unwrap(), json!({"ok": true}));
        }
    }

    #[tokio::test]
    async fn test_dynamic_reply_sees_context() {
        let mock = MockResponse::from_fn(|ctx| Ok(json!({"echo": ctx.input, "path": ctx.path})));
        let reply = mock.evaluate(context(json!("hi"))).await.unwrap();
        let response = reply.into_response().unwrap();
        assert_eq!(
            response.json_body::<Value>().unwrap(),
            json!({"echo": "hi", "path": ["x"]})
        );
    }

    #[tokio::test]
    async fn test_async_reply_passes_raw_responses_through() {
        let mock = MockResponse::from_async(|_ctx| async move {
            Ok(Response::text("custom", StatusCode::ACCEPTED))
        });
        let response = mock
            .evaluate(context(Value::Null))
            .await
            .unwrap()
            .into_response()
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.text_body().unwrap(), "custom");
    }

    #[tokio::test]
    async fn test_failing_mock_function() {
        let mock = MockResponse::from_fn(|_ctx| -> MockResult<Value> {
            Err(MockError::failed("nope"))
        });
        let err = mock.evaluate(context(Value::Null)).await.unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn test_input_as_reports_mismatch() {
        #[derive(Debug, serde::Deserialize)]
        struct Named {
            name: String,
        }

        let ctx = context(json!({"name": "world"}));
        assert_eq!(ctx.input_as::<Named>().unwrap().name, "world");

        let ctx = context(json!(42));
        assert!(matches!(
            ctx.input_as::<Named>(),
            Err(MockError::InputMismatch(_))
        ));
    }
}
