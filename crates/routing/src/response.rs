use core::fmt;
use std::str::FromStr;

use bytes::Bytes;
use http::{
    header::{InvalidHeaderName, InvalidHeaderValue, CONTENT_TYPE},
    HeaderName, HeaderValue, StatusCode,
};
pub use http::{HeaderMap, Version};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::{field_method, field_method_as_mut};

const APPLICATION_JSON: &str = "application/json";
const TEXT_PLAIN: &str = "text/plain;charset=UTF-8";

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("failed to encode json body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode json body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("response body is not valid utf-8: {0}")]
    BodyNotUtf8(#[from] std::str::Utf8Error),

    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] InvalidHeaderName),

    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),
}

pub type ResponseResult<T> = std::result::Result<T, ResponseError>;

#[derive(Clone)]
pub struct ResponseHead {
    /// The response status.
    pub status: StatusCode,

    /// The response version.
    pub version: Version,

    /// The response headers.
    pub headers: HeaderMap,
}

impl ResponseHead {
    #[must_use]
    pub fn new(status: StatusCode, version: Version, headers: HeaderMap) -> Self {
        Self {
            headers,
            status,
            version,
        }
    }

    #[must_use]
    pub fn add_then<F>(self, f: F) -> ResponseHead
    where
        F: FnOnce(Self) -> Self,
    {
        f(self)
    }

    field_method!(status, StatusCode);
    field_method_as_mut!(status_mut, status, StatusCode);

    field_method!(headers, HeaderMap);
    field_method_as_mut!(headers_mut, headers, HeaderMap);

    field_method!(version, Version);
}

impl fmt::Debug for ResponseHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseHead")
            .field("status", &self.status)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .finish()
    }
}

impl From<http::response::Parts> for ResponseHead {
    fn from(value: http::response::Parts) -> Self {
        Self {
            status: value.status,
            headers: value.headers,
            version: value.version,
        }
    }
}

/// A protocol-level response produced by a handler. Cloning is cheap, the
/// body is reference counted.
#[derive(Clone)]
pub struct Response {
    head: ResponseHead,
    body: Bytes,
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("head", &self.head)
            .field("body", &self.body)
            .finish()
    }
}

impl Response {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            head: ResponseHead::new(status, Version::HTTP_11, HeaderMap::new()),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, Bytes::new())
    }

    /// Encodes `value` as a JSON body with status 200.
    ///
    /// # Errors
    ///
    /// Returns `ResponseError::Encode` when `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> ResponseResult<Self> {
        Self::json_with_status(value, StatusCode::OK)
    }

    /// Encodes `value` as a JSON body with the given status.
    ///
    /// # Errors
    ///
    /// Returns `ResponseError::Encode` when `value` cannot be serialized.
    pub fn json_with_status<T: Serialize + ?Sized>(
        value: &T,
        status: StatusCode,
    ) -> ResponseResult<Self> {
        let encoded = serde_json::to_vec(value).map_err(ResponseError::Encode)?;
        let mut response = Self::new(status, encoded);
        response
            .head
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        Ok(response)
    }

    #[must_use]
    pub fn text(body: impl Into<String>, status: StatusCode) -> Self {
        let mut response = Self::new(status, body.into());
        response
            .head
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        response
    }

    /// Consumes the response adding the given header.
    ///
    /// # Errors
    ///
    /// Fails when the header name or value are not valid HTTP tokens.
    pub fn with_header(mut self, name: &str, value: &str) -> ResponseResult<Self> {
        self.head.headers.insert(
            HeaderName::from_str(name)?,
            HeaderValue::from_str(value)?,
        );
        Ok(self)
    }

    /// and_then will consume the response generating a new
    /// response instance with whatever changes the underlying function
    /// generates.
    #[must_use]
    pub fn add_then<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        f(self)
    }

    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (ResponseHead, Bytes) {
        (self.head, self.body)
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.head.status
    }

    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.head.status.is_success()
    }

    #[inline]
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.head
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// # Errors
    ///
    /// Returns `ResponseError::BodyNotUtf8` if the body holds invalid UTF-8.
    pub fn text_body(&self) -> ResponseResult<&str> {
        Ok(std::str::from_utf8(&self.body)?)
    }

    /// # Errors
    ///
    /// Returns `ResponseError::Decode` when the body is not JSON for `T`.
    pub fn json_body<T: DeserializeOwned>(&self) -> ResponseResult<T> {
        serde_json::from_slice(&self.body).map_err(ResponseError::Decode)
    }

    field_method!(head, ResponseHead);
    field_method_as_mut!(head_mut, head, ResponseHead);

    field_method!(body, Bytes);
}

impl From<http::Response<Bytes>> for Response {
    fn from(value: http::Response<Bytes>) -> Self {
        let (head, body) = value.into_parts();
        Self {
            head: head.into(),
            body,
        }
    }
}

impl From<Response> for http::Response<Bytes> {
    fn from(value: Response) -> Self {
        let (head, body) = value.into_parts();
        let mut response = http::Response::new(body);
        *response.status_mut() = head.status;
        *response.version_mut() = head.version;
        *response.headers_mut() = head.headers;
        response
    }
}
