use core::fmt;

use http::Uri;
use lazy_regex::{lazy_regex, Lazy, Regex};
use percent_encoding::percent_decode_str;

use crate::requests::{ParamValue, Params};

static PARAM_ROUTE_STARTER: Lazy<Regex> = lazy_regex!(r"^:(\w+)(\*)?$");
static AFFIXED_PARAM: Lazy<Regex> = lazy_regex!(r"^(.*?):(\w+)(.*)$");

static SLASH: char = '/';

/// A single segment of a route pattern.
#[derive(Clone, PartialEq, Eq)]
pub enum SegmentType {
    /// Static is a segment which must match the request segment text
    /// exactly, i.e `/users/`.
    Static(String),

    /// Param is a named segment matching exactly one non-empty request
    /// segment, i.e `/:user_id/`.
    Param(String),

    /// CatchAll is a named segment matching one or more request segments,
    /// i.e `/:rest*`. The matched segments are kept in order.
    CatchAll(String),

    /// Affixed is a named segment with literal text around it, i.e
    /// `/:id.json/` or `/v:version/`. It matches one request segment
    /// carrying that prefix and suffix with a non-empty value between them.
    Affixed {
        prefix: String,
        name: String,
        suffix: String,
    },
}

impl From<&str> for SegmentType {
    fn from(text: &str) -> Self {
        match PARAM_ROUTE_STARTER.captures(text) {
            Some(captures) => {
                let name = String::from(&captures[1]);
                if captures.get(2).is_some() {
                    SegmentType::CatchAll(name)
                } else {
                    SegmentType::Param(name)
                }
            }
            None => match AFFIXED_PARAM.captures(text) {
                Some(captures) => {
                    let suffix = &captures[3];
                    if AFFIXED_PARAM.is_match(suffix) {
                        ewe_trace::warn!(
                            segment = text,
                            "only the first parameter of a segment is captured, the rest is literal"
                        );
                    }
                    SegmentType::Affixed {
                        prefix: decode_segment(&captures[1]),
                        name: String::from(&captures[2]),
                        suffix: decode_segment(suffix),
                    }
                }
                // anything else, including text with literal braces, is static.
                None => SegmentType::Static(decode_segment(text)),
            },
        }
    }
}

impl fmt::Debug for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(arg0) => f.debug_tuple("Static").field(arg0).finish(),
            Self::Param(arg0) => f.debug_tuple("Param").field(arg0).finish(),
            Self::CatchAll(arg0) => f.debug_tuple("CatchAll").field(arg0).finish(),
            Self::Affixed {
                prefix,
                name,
                suffix,
            } => f
                .debug_struct("Affixed")
                .field("prefix", prefix)
                .field("name", name)
                .field("suffix", suffix)
                .finish(),
        }
    }
}

impl SegmentType {
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, SegmentType::Static(_))
    }
}

fn decode_segment(text: &str) -> String {
    percent_decode_str(text).decode_utf8_lossy().into_owned()
}

/// Splits a path into its segments, ignoring the leading slash and at most
/// one trailing slash. The index route `/` has no segments.
fn parse_route_into_segments(route: &str) -> Vec<&str> {
    let target_route = route.strip_prefix(SLASH).unwrap_or(route);
    let target_route = target_route.strip_suffix(SLASH).unwrap_or(target_route);

    if target_route.is_empty() {
        return Vec::new();
    }

    target_route.split(SLASH).collect()
}


/// RoutePattern is a parsed url pattern in the `:name` / `:name*` syntax,
/// optionally anchored to an absolute origin like `http://localhost:3000`.
///
/// Matching compares the origin (when the pattern has one) case
/// insensitively, ignores the query string and a trailing slash, and
/// percent-decodes request segments before comparing or capturing them.
#[derive(Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    origin: Option<String>,
    segments: Vec<SegmentType>,
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePattern")
            .field("source", &self.source)
            .field("origin", &self.origin)
            .field("segments", &self.segments)
            .finish()
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl RoutePattern {
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let without_query = match pattern.find(|c| c == '?' || c == '#') {
            Some(index) => {
                ewe_trace::warn!(
                    pattern = pattern,
                    "route pattern carries a query or fragment, it is ignored when matching"
                );
                &pattern[..index]
            }
            None => pattern,
        };

        let (origin, path) = split_origin(without_query);
        let segments = parse_route_into_segments(path)
            .into_iter()
            .map(SegmentType::from)
            .collect();

        Self {
            source: String::from(pattern),
            origin: origin.map(str::to_ascii_lowercase),
            segments,
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    #[must_use]
    pub fn segments(&self) -> &[SegmentType] {
        &self.segments
    }

    /// Returns the extracted parameters when `uri` matches this pattern.
    #[must_use]
    pub fn matches(&self, uri: &Uri) -> Option<Params> {
        if let Some(origin) = &self.origin {
            let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) else {
                return None;
            };
            let request_origin = format!("{scheme}://{authority}").to_ascii_lowercase();
            if &request_origin != origin {
                return None;
            }
        }

        let path_segments: Vec<String> = parse_route_into_segments(uri.path())
            .into_iter()
            .map(decode_segment)
            .collect();

        let mut params = Params::new();
        if match_segments(&self.segments, &path_segments, &mut params) {
            return Some(params);
        }
        None
    }
}

/// Splits `scheme://authority/path` into its origin and path. Patterns
/// without a scheme are relative and match any origin.
fn split_origin(pattern: &str) -> (Option<&str>, &str) {
    let Some(scheme_end) = pattern.find("://") else {
        return (None, pattern);
    };

    let authority_start = scheme_end + 3;
    match pattern[authority_start..].find(SLASH) {
        Some(offset) => {
            let path_start = authority_start + offset;
            (Some(&pattern[..path_start]), &pattern[path_start..])
        }
        None => (Some(pattern), "/"),
    }
}

/// Params are only written once the rest of the pattern matched, so a
/// failed branch never leaves partial captures behind.
fn match_segments(pattern: &[SegmentType], path: &[String], params: &mut Params) -> bool {
    let Some((segment, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    match segment {
        SegmentType::Static(text) => match path.split_first() {
            Some((first, tail)) if first == text => match_segments(rest, tail, params),
            _ => false,
        },
        SegmentType::Param(name) => match path.split_first() {
            Some((first, tail)) if !first.is_empty() => {
                if match_segments(rest, tail, params) {
                    params.insert(name.clone(), ParamValue::One(first.clone()));
                    return true;
                }
                false
            }
            _ => false,
        },
        SegmentType::Affixed {
            prefix,
            name,
            suffix,
        } => {
            let Some((first, tail)) = path.split_first() else {
                return false;
            };
            let value = first
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_suffix(suffix.as_str()));
            match value {
                Some(value) if !value.is_empty() && match_segments(rest, tail, params) => {
                    params.insert(name.clone(), ParamValue::One(String::from(value)));
                    true
                }
                _ => false,
            }
        }
        SegmentType::CatchAll(name) => {
            // greedy: try the longest capture first.
            for taken in (1..=path.len()).rev() {
                if match_segments(rest, &path[taken..], params) {
                    params.insert(name.clone(), ParamValue::Many(path[..taken].to_vec()));
                    return true;
                }
            }
            false
        }
    }
}
