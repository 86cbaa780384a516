//! A small client calling procedures through an interceptor the way an
//! OpenAPI style RPC link would over the network.

use ewe_contract_mocks::{BracketNotation, ResolvedRoute};
use ewe_routing::{InterceptError, Interceptor, Method, Request, RequestError, ResponseError, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message}")]
    Remote { status: StatusCode, message: String },

    #[error(transparent)]
    Intercept(#[from] InterceptError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct TestClient {
    interceptor: Interceptor,
}

impl TestClient {
    pub fn new(interceptor: Interceptor) -> Self {
        Self { interceptor }
    }

    /// Calls the procedure served at `route`. GET sends `input` as a bracket
    /// notation query, everything else as a JSON body.
    pub async fn call(&self, route: &ResolvedRoute, input: Value) -> Result<Value, ClientError> {
        let request = if route.method == Method::GET {
            let query = BracketNotation::encode_query_string(&input);
            let url = if query.is_empty() {
                route.url.clone()
            } else {
                format!("{}?{}", route.url, query)
            };
            Request::get(&url)?
        } else {
            let body = if input.is_null() {
                String::new()
            } else {
                input.to_string()
            };
            Request::build(route.method.clone(), &route.url, body)?
                .with_header("content-type", "application/json")?
        };

        let response = self.interceptor.dispatch(request).await?;
        if !response.is_success() {
            let message = match response.json_body::<ErrorBody>() {
                Ok(body) => body.message,
                Err(_) => String::from(response.text_body()?),
            };
            return Err(ClientError::Remote {
                status: response.status(),
                message,
            });
        }

        Ok(response.json_body()?)
    }
}
