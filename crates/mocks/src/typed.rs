use std::{future::Future, marker::PhantomData};

use ewe_routing::{HttpHandler, Params, Request, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    mock::{MockError, MockResponse, MockResult, ProcedureContext, Reply},
    traversal::ProcedureMock,
};

/// A [`ProcedureContext`] whose input was deserialized into `I`.
#[derive(Clone, Debug)]
pub struct TypedContext<I> {
    pub request: Request,
    pub path: Vec<String>,
    pub params: Params,
    pub input: I,
}

impl<I: DeserializeOwned> TryFrom<ProcedureContext> for TypedContext<I> {
    type Error = MockError;

    fn try_from(context: ProcedureContext) -> Result<Self, Self::Error> {
        let input = serde_json::from_value(context.input).map_err(MockError::InputMismatch)?;
        Ok(Self {
            request: context.request,
            path: context.path,
            params: context.params,
            input,
        })
    }
}

/// What a typed mock function returns.
#[derive(Clone, Debug)]
pub enum MockOutput<O> {
    Value(O),
    Raw(Response),
}

impl<O> From<O> for MockOutput<O> {
    fn from(value: O) -> Self {
        MockOutput::Value(value)
    }
}

impl<O: Serialize> MockOutput<O> {
    /// # Errors
    ///
    /// `MockError::Serialize` when the value cannot be turned into JSON.
    pub fn into_reply(self) -> MockResult<Reply> {
        match self {
            MockOutput::Value(value) => Reply::output(value),
            MockOutput::Raw(response) => Ok(Reply::Raw(response)),
        }
    }
}

/// ProcedureMock with its input and output types fixed.
pub struct TypedProcedureMock<I, O> {
    inner: ProcedureMock,
    _types: PhantomData<fn(I) -> O>,
}

impl<I, O> Clone for TypedProcedureMock<I, O> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<I, O> TypedProcedureMock<I, O> {
    pub(crate) fn new(inner: ProcedureMock) -> Self {
        Self {
            inner,
            _types: PhantomData,
        }
    }

    #[must_use]
    pub fn untyped(&self) -> &ProcedureMock {
        &self.inner
    }
}

impl<I, O> TypedProcedureMock<I, O>
where
    I: DeserializeOwned + 'static,
    O: Serialize + Send + 'static,
{
    /// Answers every request with `value`, serialized once up front.
    ///
    /// # Errors
    ///
    /// `MockError::Serialize` when `value` cannot be turned into JSON.
    pub fn handler_value(&self, value: O) -> MockResult<HttpHandler> {
        Ok(self.inner.handler(MockResponse::value(value)?))
    }

    pub fn handler_fn<F>(&self, f: F) -> HttpHandler
    where
        F: Fn(TypedContext<I>) -> MockResult<MockOutput<O>> + Send + Sync + 'static,
    {
        self.inner.handler(MockResponse::from_fn(move |context| {
            let typed = TypedContext::try_from(context)?;
            f(typed)?.into_reply()
        }))
    }

    pub fn handler_async<F, Fut>(&self, f: F) -> HttpHandler
    where
        F: Fn(TypedContext<I>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = MockResult<MockOutput<O>>> + Send + 'static,
    {
        self.inner.handler(MockResponse::from_async(move |context| {
            let pending = TypedContext::try_from(context).map(&f);
            async move { pending?.await?.into_reply() }
        }))
    }
}
