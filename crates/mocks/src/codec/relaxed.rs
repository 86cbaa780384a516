use lazy_regex::{lazy_regex, Lazy, Regex};
use serde_json::Value;

use super::{BodyDecoder, DecodeError, DecodeResult};

static JSON_SIGNATURE: Lazy<Regex> =
    lazy_regex!(r#"^\s*["\[{]|^\s*-?\d{1,16}(\.\d{1,17})?([Ee][+-]?\d+)?\s*$"#);

/// The longest keyword we look for, `-infinity`.
const MAX_KEYWORD_LEN: usize = 9;

/// Largest integer a double holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// RelaxedLiteral decodes body text into the value a client most likely
/// meant to send.
///
/// - `"text"` without escapes is the inner text.
/// - `true`, `false`, `null` and `undefined` are matched case insensitively.
///   `nan`, `infinity` and `-infinity` become null.
/// - Anything that looks like JSON (quote, bracket or brace first, or a plain
///   number) is parsed as JSON with `__proto__` keys and
///   `constructor.prototype` entries dropped.
/// - Everything else, the empty body included, is returned as a string.
///
/// Text that looks like JSON but does not parse is returned as a string,
/// unless the decoder is strict.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelaxedLiteral {
    strict: bool,
}

impl RelaxedLiteral {
    #[must_use]
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// A strict decoder fails on text it cannot decode. An empty body still
    /// decodes, to null.
    #[must_use]
    pub fn strict() -> Self {
        Self::new(true)
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// # Errors
    ///
    /// Only in strict mode: `DecodeError::InvalidLiteral` for broken JSON
    /// and `DecodeError::NotJson` for text that is no literal at all.
    pub fn decode(&self, text: &str) -> DecodeResult<Value> {
        if text.starts_with('"') && text.ends_with('"') && !text.contains('\\') {
            let inner = text.get(1..text.len() - 1).unwrap_or_default();
            return Ok(Value::String(String::from(inner)));
        }

        let trimmed = text.trim();
        if trimmed.len() <= MAX_KEYWORD_LEN {
            match trimmed.to_ascii_lowercase().as_str() {
                "true" => return Ok(Value::Bool(true)),
                "false" => return Ok(Value::Bool(false)),
                "null" | "undefined" | "nan" | "infinity" | "-infinity" => return Ok(Value::Null),
                "" if self.strict => return Ok(Value::Null),
                _ => {}
            }
        }

        if !JSON_SIGNATURE.is_match(text) {
            if self.strict {
                return Err(DecodeError::NotJson(String::from(text)));
            }
            return Ok(Value::String(String::from(text)));
        }

        match serde_json::from_str::<Value>(text) {
            Ok(value) => Ok(normalize(value)),
            Err(err) if self.strict => Err(DecodeError::InvalidLiteral(err)),
            Err(_err) => {
                ewe_trace::debug!("relaxed literal: keeping body as text: {}", _err);
                Ok(Value::String(String::from(text)))
            }
        }
    }
}

impl BodyDecoder for RelaxedLiteral {
    fn decode_body(&self, text: &str) -> DecodeResult<Value> {
        self.decode(text)
    }
}

/// Drops prototype keys and turns integral floats (`1e3`) back into
/// integers.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn normalize(value: Value) -> Value {
    match value {
        Value::Number(number) if !number.is_i64() && !number.is_u64() => {
            match number.as_f64() {
                Some(float) if float.fract() == 0.0 && float.abs() <= MAX_SAFE_INTEGER => {
                    Value::from(float as i64)
                }
                _ => Value::Number(number),
            }
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, item)| {
                    key != "__proto__"
                        && !(key == "constructor"
                            && item.as_object().is_some_and(|c| c.contains_key("prototype")))
                })
                .map(|(key, item)| (key, normalize(item)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}
