/// Joins a path onto a base url with exactly one slash between them.
///
/// An empty path or the index path `/` leaves the base untouched, and a
/// leading `./` or `/` on the path is dropped before joining.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() || path == "/" {
        return String::from(base);
    }

    if base.is_empty() {
        return String::from(path);
    }

    let segment = path
        .strip_prefix("./")
        .or_else(|| path.strip_prefix('/'))
        .unwrap_or(path);

    let mut joined = String::with_capacity(base.len() + segment.len() + 1);
    joined.push_str(base);
    if !base.ends_with('/') {
        joined.push('/');
    }
    joined.push_str(segment);
    joined
}

#[cfg(test)]
mod join_url_tests {
    use super::*;

    #[test]
    fn test_join_adds_single_slash() {
        assert_eq!(
            join_url("http://localhost:3000/rpc", "/greet"),
            "http://localhost:3000/rpc/greet"
        );
        assert_eq!(
            join_url("http://localhost:3000/rpc/", "/greet"),
            "http://localhost:3000/rpc/greet"
        );
        assert_eq!(
            join_url("http://localhost:3000/rpc", "greet"),
            "http://localhost:3000/rpc/greet"
        );
        assert_eq!(
            join_url("http://localhost:3000", "./users/:id"),
            "http://localhost:3000/users/:id"
        );
    }

    #[test]
    fn test_join_with_index_path_keeps_base() {
        assert_eq!(join_url("http://localhost:3000/rpc", "/"), "http://localhost:3000/rpc");
        assert_eq!(join_url("http://localhost:3000/rpc", ""), "http://localhost:3000/rpc");
    }

    #[test]
    fn test_join_with_empty_base() {
        assert_eq!(join_url("", "/greet"), "/greet");
    }
}
