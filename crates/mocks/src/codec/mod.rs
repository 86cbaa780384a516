//! Decoders turning an intercepted request into procedure input.
//!
//! GET requests carry their input in the query string, encoded in bracket
//! notation (`user[name]=jane&tags[]=a`). Every other method carries it in
//! the body, which is read as text and decoded as a relaxed literal: JSON
//! when it looks like JSON, the text itself otherwise.

use std::{fmt, sync::Arc};

use serde_json::Value;
use thiserror::Error;

pub mod bracket;
pub mod relaxed;

pub use bracket::BracketNotation;
pub use relaxed::RelaxedLiteral;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("body looks like json but failed to parse: {0}")]
    InvalidLiteral(#[source] serde_json::Error),

    #[error("body is not a json literal: {0:?}")]
    NotJson(String),
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Decodes a raw (still percent-encoded) query string.
pub trait QueryDecoder: Send + Sync {
    /// # Errors
    ///
    /// Implementations fail when the query cannot be turned into a value.
    fn decode_query(&self, query: &str) -> DecodeResult<Value>;
}

/// Decodes a request body already read as UTF-8 text.
pub trait BodyDecoder: Send + Sync {
    /// # Errors
    ///
    /// Implementations fail when the body cannot be turned into a value.
    fn decode_body(&self, text: &str) -> DecodeResult<Value>;
}

/// The pair of decoders a compiled handler uses.
#[derive(Clone)]
pub struct Codecs {
    query: Arc<dyn QueryDecoder>,
    body: Arc<dyn BodyDecoder>,
}

impl Default for Codecs {
    fn default() -> Self {
        Self {
            query: Arc::new(BracketNotation),
            body: Arc::new(RelaxedLiteral::default()),
        }
    }
}

impl fmt::Debug for Codecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codecs").finish_non_exhaustive()
    }
}

impl Codecs {
    /// Default codecs with the body decoder in strict mode.
    #[must_use]
    pub fn strict() -> Self {
        Self::default().with_body_decoder(RelaxedLiteral::strict())
    }

    #[must_use]
    pub fn with_query_decoder(mut self, decoder: impl QueryDecoder + 'static) -> Self {
        self.query = Arc::new(decoder);
        self
    }

    #[must_use]
    pub fn with_body_decoder(mut self, decoder: impl BodyDecoder + 'static) -> Self {
        self.body = Arc::new(decoder);
        self
    }

    /// # Errors
    ///
    /// Whatever the configured query decoder fails with.
    pub fn decode_query(&self, query: &str) -> DecodeResult<Value> {
        self.query.decode_query(query)
    }

    /// # Errors
    ///
    /// Whatever the configured body decoder fails with.
    pub fn decode_body(&self, text: &str) -> DecodeResult<Value> {
        self.body.decode_body(text)
    }
}

#[cfg(test)]
mod codecs_tests {
    use super::*;
    use serde_json::json;

    struct Fixed;

    impl QueryDecoder for Fixed {
        fn decode_query(&self, _query: &str) -> DecodeResult<Value> {
            Ok(json!("fixed"))
        }
    }

    #[test]
    fn test_default_codecs() {
        let codecs = Codecs::default();
        assert_eq!(codecs.decode_query("a=1").unwrap(), json!({"a": "1"}));
        assert_eq!(codecs.decode_body("42").unwrap(), json!(42));
    }

    #[test]
    fn test_strict_codecs_reject_broken_json() {
        assert!(Codecs::default().decode_body("{oops").is_ok());
        assert!(matches!(
            Codecs::strict().decode_body("{oops"),
            Err(DecodeError::InvalidLiteral(_))
        ));
    }

    #[test]
    fn test_decoders_can_be_swapped() {
        let codecs = Codecs::default().with_query_decoder(Fixed);
        assert_eq!(codecs.decode_query("a=1").unwrap(), json!("fixed"));
    }
}
