use std::collections::BTreeSet;

use lazy_regex::{lazy_regex, Lazy, Regex};
use serde_json::{Map, Value};

use super::{DecodeResult, QueryDecoder};

static BRACKET_KEY: Lazy<Regex> = lazy_regex!(r"^([^\[\]]*)((?:\[[^\[\]]*\])*)$");
static BRACKET_PART: Lazy<Regex> = lazy_regex!(r"\[([^\[\]]*)\]");
static ARRAY_INDEX: Lazy<Regex> = lazy_regex!(r"^(?:0|[1-9][0-9]{0,8})$");

/// BracketNotation maps flat `key=value` pairs onto nested values and back.
///
/// `user[name]=jane` nests objects, `tags[0]=a` and `tags[]=a` build arrays
/// and a plain key seen twice collects its values into an array. Values are
/// never converted, every leaf stays a string.
#[derive(Clone, Copy, Debug, Default)]
pub struct BracketNotation;

impl BracketNotation {
    /// Splits `a[b][0]` into `["a", "b", "0"]`. Keys with unbalanced or
    /// nested brackets are kept whole.
    #[must_use]
    pub fn parse_path(key: &str) -> Vec<String> {
        let Some(captures) = BRACKET_KEY.captures(key) else {
            return vec![String::from(key)];
        };

        let mut segments = vec![String::from(&captures[1])];
        segments.extend(
            BRACKET_PART
                .captures_iter(&captures[2])
                .map(|part| String::from(&part[1])),
        );
        segments
    }

    /// Inverse of `parse_path`.
    #[must_use]
    pub fn stringify_path(segments: &[String]) -> String {
        let mut segments = segments.iter();
        let mut key = segments.next().cloned().unwrap_or_default();
        for segment in segments {
            key.push('[');
            key.push_str(segment);
            key.push(']');
        }
        key
    }

    /// Builds a value out of already decoded pairs. No pairs gives `{}`.
    pub fn deserialize<I, K, V>(pairs: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut root = Slot::Branch(Vec::new());
        for (key, value) in pairs {
            let segments = Self::parse_path(key.as_ref());
            root.insert(&segments, value.into());
        }
        root.into_value()
    }

    /// Flattens `value` into pairs. Arrays use numeric indexes, null and
    /// empty containers produce nothing.
    #[must_use]
    pub fn serialize(value: &Value) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        flatten(value, &mut Vec::new(), &mut pairs);
        pairs
    }

    /// Decodes a raw query string (`+` and percent escapes included).
    #[must_use]
    pub fn decode_query_string(query: &str) -> Value {
        Self::deserialize(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Encodes `value` as a query string for a GET request.
    #[must_use]
    pub fn encode_query_string(value: &Value) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(Self::serialize(value))
            .finish()
    }
}

impl QueryDecoder for BracketNotation {
    fn decode_query(&self, query: &str) -> DecodeResult<Value> {
        Ok(Self::decode_query_string(query))
    }
}

enum Slot {
    Leaf(Vec<String>),
    Branch(Vec<(String, Slot)>),
}

impl Slot {
    fn insert(&mut self, segments: &[String], value: String) {
        let Some((head, rest)) = segments.split_first() else {
            match self {
                Slot::Leaf(values) => values.push(value),
                // a scalar landing on a container becomes its next entry.
                Slot::Branch(children) => {
                    let key = children.len().to_string();
                    children.push((key, Slot::Leaf(vec![value])));
                }
            }
            return;
        };

        if let Slot::Leaf(values) = self {
            let children = values
                .drain(..)
                .enumerate()
                .map(|(index, value)| (index.to_string(), Slot::Leaf(vec![value])))
                .collect();
            *self = Slot::Branch(children);
        }

        let Slot::Branch(children) = self else {
            return;
        };

        let key = if head.is_empty() {
            children.len().to_string()
        } else {
            head.clone()
        };

        let position = match children.iter().position(|(name, _)| name == &key) {
            Some(position) => position,
            None => {
                let empty = if rest.is_empty() {
                    Slot::Leaf(Vec::new())
                } else {
                    Slot::Branch(Vec::new())
                };
                children.push((key, empty));
                children.len() - 1
            }
        };
        children[position].1.insert(rest, value);
    }

    fn into_value(self) -> Value {
        match self {
            Slot::Leaf(mut values) => {
                if values.len() == 1 {
                    Value::String(values.remove(0))
                } else {
                    Value::Array(values.into_iter().map(Value::String).collect())
                }
            }
            Slot::Branch(children) => {
                if is_dense_index(&children) {
                    let mut indexed: Vec<(usize, Value)> = children
                        .into_iter()
                        .filter_map(|(key, slot)| {
                            key.parse::<usize>().ok().map(|index| (index, slot.into_value()))
                        })
                        .collect();
                    indexed.sort_by_key(|(index, _)| *index);
                    Value::Array(indexed.into_iter().map(|(_, value)| value).collect())
                } else {
                    let mut map = Map::new();
                    for (key, slot) in children {
                        map.insert(key, slot.into_value());
                    }
                    Value::Object(map)
                }
            }
        }
    }
}

/// Dense means the keys are exactly `0..len` in any order.
fn is_dense_index(children: &[(String, Slot)]) -> bool {
    if children.is_empty() {
        return false;
    }

    let mut seen = BTreeSet::new();
    for (key, _) in children {
        if !ARRAY_INDEX.is_match(key) {
            return false;
        }
        match key.parse::<usize>() {
            Ok(index) if index < children.len() => {
                seen.insert(index);
            }
            _ => return false,
        }
    }
    seen.len() == children.len()
}

fn flatten(value: &Value, segments: &mut Vec<String>, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                segments.push(index.to_string());
                flatten(item, segments, pairs);
                segments.pop();
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                segments.push(key.clone());
                flatten(item, segments, pairs);
                segments.pop();
            }
        }
        Value::String(text) => {
            pairs.push((BracketNotation::stringify_path(segments), text.clone()));
        }
        Value::Bool(_) | Value::Number(_) => {
            pairs.push((BracketNotation::stringify_path(segments), value.to_string()));
        }
    }
}
