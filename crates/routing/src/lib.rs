//! In-process HTTP interception runtime.
//!
//! Requests never touch the network: an [`Interceptor`] holds the active
//! [`HttpHandler`]s and hands each intercepted [`Request`] to the first
//! handler whose method and [`RoutePattern`] match, together with the route
//! [`Params`] the pattern extracted.
//!
//! Patterns use `:name` for a single segment and `:name*` for a catch-all
//! spanning one or more segments.

mod macros;

pub use http::{Extensions, HeaderMap, StatusCode, Uri, Version};

pub mod handler;
pub mod interceptor;
pub mod requests;
pub mod response;
pub mod routes;
pub mod url;

pub use handler::{HandlerError, HandlerFuture, HandlerResult, HttpHandler};
pub use interceptor::{InterceptError, InterceptResult, Interceptor};
pub use requests::{Method, MethodError, ParamValue, Params, Request, RequestError, RequestHead};
pub use response::{Response, ResponseError, ResponseHead};
pub use routes::{RoutePattern, SegmentType};
pub use url::join_url;
