use core::fmt;
use std::{collections::BTreeMap, str::FromStr};

use bytes::Bytes;
use http::{
    header::{InvalidHeaderName, InvalidHeaderValue},
    method::InvalidMethod,
    uri::InvalidUri,
    HeaderName, HeaderValue,
};
/// Implementation of routing and request/response primitives.
pub use http::{Extensions, HeaderMap, Uri, Version};
use serde::Serialize;
use thiserror::Error;

use crate::{field_method, field_method_as_mut, set_field_method_as_mut};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MethodError {
    #[error("unknown http method: {0}")]
    Unknown(String),
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("invalid request url: {0}")]
    InvalidUri(#[from] InvalidUri),

    #[error("invalid request method: {0}")]
    InvalidMethod(#[from] InvalidMethod),

    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] InvalidHeaderName),

    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    #[error("request body is not valid utf-8: {0}")]
    BodyNotUtf8(#[from] std::str::Utf8Error),
}

pub type RequestResult<T> = std::result::Result<T, RequestError>;

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Method {
    OPTIONS,
    GET,
    POST,
    PUT,
    DELETE,
    HEAD,
    TRACE,
    CONNECT,
    PATCH,
    CUSTOM(String),
}

impl Method {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::OPTIONS => "OPTIONS",
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::HEAD => "HEAD",
            Self::TRACE => "TRACE",
            Self::CONNECT => "CONNECT",
            Self::PATCH => "PATCH",
            Self::CUSTOM(name) => name.as_str(),
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CUSTOM(arg0) => f.debug_tuple("CUSTOM").field(arg0).finish(),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses only the standard method names, spelled in upper case the way
/// they travel on the wire. Anything else is `MethodError::Unknown`; use
/// `Method::CUSTOM` directly for extension methods.
impl FromStr for Method {
    type Err = MethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPTIONS" => Ok(Method::OPTIONS),
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "HEAD" => Ok(Method::HEAD),
            "TRACE" => Ok(Method::TRACE),
            "CONNECT" => Ok(Method::CONNECT),
            "PATCH" => Ok(Method::PATCH),
            _ => Err(MethodError::Unknown(String::from(s))),
        }
    }
}

impl TryFrom<Method> for http::Method {
    type Error = InvalidMethod;

    fn try_from(value: Method) -> Result<Self, Self::Error> {
        match value {
            Method::CONNECT => Ok(http::Method::CONNECT),
            Method::PUT => Ok(http::Method::PUT),
            Method::GET => Ok(http::Method::GET),
            Method::POST => Ok(http::Method::POST),
            Method::HEAD => Ok(http::Method::HEAD),
            Method::PATCH => Ok(http::Method::PATCH),
            Method::TRACE => Ok(http::Method::TRACE),
            Method::DELETE => Ok(http::Method::DELETE),
            Method::OPTIONS => Ok(http::Method::OPTIONS),
            Method::CUSTOM(name) => http::Method::from_bytes(name.as_bytes()),
        }
    }
}

impl From<http::Method> for Method {
    fn from(value: http::Method) -> Self {
        match value {
            http::Method::CONNECT => Method::CONNECT,
            http::Method::PUT => Method::PUT,
            http::Method::GET => Method::GET,
            http::Method::POST => Method::POST,
            http::Method::HEAD => Method::HEAD,
            http::Method::PATCH => Method::PATCH,
            http::Method::TRACE => Method::TRACE,
            http::Method::DELETE => Method::DELETE,
            http::Method::OPTIONS => Method::OPTIONS,
            other => Method::CUSTOM(String::from(other.as_str())),
        }
    }
}

/// A single extracted route parameter: one path segment for `:name`,
/// or the ordered segments a `:name*` catch-all consumed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

impl ParamValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::One(value) => Some(value.as_str()),
            ParamValue::Many(_) => None,
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> Option<&[String]> {
        match self {
            ParamValue::One(_) => None,
            ParamValue::Many(values) => Some(values.as_slice()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::One(String::from(value))
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::One(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::Many(value)
    }
}

/// Params is the list of extracted route parameters
/// that a request comes with.
pub type Params = BTreeMap<String, ParamValue>;

#[derive(Clone)]
pub struct RequestHead {
    // headers for the giving request.
    headers: HeaderMap,

    /// The HTTP method of the request.
    method: Method,

    /// The HTTP version used by the request.
    version: Version,

    /// The [target](https://datatracker.ietf.org/doc/html/rfc7230#section-5.3) of the request.
    target: Uri,

    /// Extensions related to the underlying http request.
    extensions: Extensions,

    /// The route pattern that matched this request, set by the interceptor.
    route_path: Option<String>,
}

impl RequestHead {
    #[must_use]
    pub fn new(method: Method, version: Version, target: Uri) -> Self {
        Self {
            target,
            method,
            version,
            headers: HeaderMap::new(),
            extensions: Extensions::new(),
            route_path: None,
        }
    }

    /// and_then will consume the request head generating a returned
    /// RequestHead modified to the underlying desire and needs of the function provided.
    #[must_use]
    pub fn add_then<F>(self, f: F) -> RequestHead
    where
        F: FnOnce(Self) -> Self,
    {
        f(self)
    }

    #[must_use]
    pub fn clone_method(&self) -> Method {
        self.method.clone()
    }

    field_method!(headers, HeaderMap);
    field_method_as_mut!(headers_mut, headers, HeaderMap);
    set_field_method_as_mut!(set_headers, headers, HeaderMap);

    field_method!(route_path, Option<String>);
    set_field_method_as_mut!(set_route_path, route_path, Option<String>);

    field_method!(extensions, Extensions);
    field_method_as_mut!(extensions_mut, extensions, Extensions);

    field_method!(target, Uri);
    set_field_method_as_mut!(set_target, target, Uri);

    field_method!(method, Method);
    set_field_method_as_mut!(set_method, method, Method);

    field_method!(version, Version);
}

impl fmt::Debug for RequestHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHead")
            .field("headers", &self.headers)
            .field("method", &self.method)
            .field("version", &self.version)
            .field("target", &self.target)
            .field("route_path", &self.route_path)
            .finish_non_exhaustive()
    }
}

impl From<http::request::Parts> for RequestHead {
    fn from(value: http::request::Parts) -> Self {
        Self {
            method: value.method.into(),
            headers: value.headers,
            version: value.version,
            target: value.uri,
            extensions: value.extensions,
            route_path: None,
        }
    }
}

/// An intercepted request. The body is always fully buffered since the
/// request never leaves the process.
#[derive(Clone)]
pub struct Request {
    head: RequestHead,
    body: Bytes,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("head", &self.head)
            .field("body", &self.body)
            .finish()
    }
}

impl Request {
    #[must_use]
    pub fn new(head: RequestHead, body: Bytes) -> Self {
        Self { head, body }
    }

    /// Builds an HTTP/1.1 request for the given method and absolute url.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::InvalidUri` when `url` does not parse.
    pub fn build(method: Method, url: &str, body: impl Into<Bytes>) -> RequestResult<Self> {
        let target = Uri::from_str(url)?;
        Ok(Self {
            head: RequestHead::new(method, Version::HTTP_11, target),
            body: body.into(),
        })
    }

    /// # Errors
    ///
    /// Returns `RequestError::InvalidUri` when `url` does not parse.
    pub fn get(url: &str) -> RequestResult<Self> {
        Self::build(Method::GET, url, Bytes::new())
    }

    /// # Errors
    ///
    /// Returns `RequestError::InvalidUri` when `url` does not parse.
    pub fn post(url: &str, body: impl Into<Bytes>) -> RequestResult<Self> {
        Self::build(Method::POST, url, body)
    }

    /// Consumes the request adding the given header.
    ///
    /// # Errors
    ///
    /// Fails when the header name or value are not valid HTTP tokens.
    pub fn with_header(mut self, name: &str, value: &str) -> RequestResult<Self> {
        self.head.headers.insert(
            HeaderName::from_str(name)?,
            HeaderValue::from_str(value)?,
        );
        Ok(self)
    }

    /// and_then will consume the request generating a new
    /// request instance with whatever changes the underlying function
    /// generates.
    #[must_use]
    pub fn add_then<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        f(self)
    }

    /// Returns the body decoded as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::BodyNotUtf8` if the body holds invalid UTF-8.
    pub fn text(&self) -> RequestResult<String> {
        let text = std::str::from_utf8(&self.body)?;
        Ok(String::from(text))
    }

    /// Returns the body as text, replacing invalid UTF-8 with U+FFFD.
    #[must_use]
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (RequestHead, Bytes) {
        (self.head, self.body)
    }

    #[inline]
    #[must_use]
    pub fn url(&self) -> &Uri {
        &self.head.target
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        self.head.target.path()
    }

    #[inline]
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.head.target.query()
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.head.method
    }

    #[inline]
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> Version {
        self.head.version
    }

    field_method!(head, RequestHead);
    field_method_as_mut!(head_mut, head, RequestHead);

    field_method!(body, Bytes);
}

impl From<http::Request<Bytes>> for Request {
    fn from(value: http::Request<Bytes>) -> Self {
        let (head, body) = value.into_parts();
        Self {
            head: head.into(),
            body,
        }
    }
}

impl TryFrom<Request> for http::Request<Bytes> {
    type Error = RequestError;

    fn try_from(value: Request) -> Result<Self, Self::Error> {
        let (head, body) = value.into_parts();
        let mut request = http::Request::new(body);
        *request.method_mut() = head.method.try_into()?;
        *request.uri_mut() = head.target;
        *request.version_mut() = head.version;
        *request.headers_mut() = head.headers;
        *request.extensions_mut() = head.extensions;
        Ok(request)
    }
}
