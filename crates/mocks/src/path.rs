use lazy_regex::{lazy_regex, Lazy, Regex};

static CATCH_ALL_PARAM: Lazy<Regex> = lazy_regex!(r"\{\+([a-zA-Z_][a-zA-Z0-9_]*)\}");
static NAMED_PARAM: Lazy<Regex> = lazy_regex!(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}");

/// Translates a contract path template into the interception runtime's
/// pattern syntax: `{+name}` becomes `:name*` and `{name}` becomes `:name`.
///
/// Catch-alls are rewritten first so the plain rule never sees them.
/// Nothing is validated; braces that do not wrap a valid identifier are
/// left in place and end up as literal text in the pattern.
#[must_use]
pub fn translate_path(template: &str) -> String {
    let catch_all = CATCH_ALL_PARAM.replace_all(template, ":${1}*");
    NAMED_PARAM.replace_all(&catch_all, ":${1}").into_owned()
}

/// The template used when a procedure declares no path: its structural
/// path joined by `/`.
#[must_use]
pub fn derive_template(path: &[String]) -> String {
    format!("/{}", path.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_templates_are_unchanged() {
        for template in ["/", "/greet", "/v1/users/list", "", "/a-b/c.d"] {
            assert_eq!(translate_path(template), template);
        }
    }

    #[test]
    fn test_named_params_are_translated() {
        assert_eq!(translate_path("/users/{id}"), "/users/:id");
        assert_eq!(
            translate_path("/orgs/{org_id}/users/{userId}"),
            "/orgs/:org_id/users/:userId"
        );
        assert_eq!(translate_path("/{a}/{a}"), "/:a/:a");
    }

    #[test]
    fn test_catch_all_params_are_translated() {
        assert_eq!(translate_path("/files/{+path}"), "/files/:path*");
        assert_eq!(translate_path("/a/{id}/b/{+rest}"), "/a/:id/b/:rest*");
    }

    #[test]
    fn test_malformed_braces_pass_through() {
        assert_eq!(translate_path("/users/{1id}"), "/users/{1id}");
        assert_eq!(translate_path("/users/{a-b}"), "/users/{a-b}");
        assert_eq!(translate_path("/users/{id"), "/users/{id");
        assert_eq!(translate_path("/users/{}"), "/users/{}");
        assert_eq!(translate_path("/users/{+}"), "/users/{+}");
    }

    #[test]
    fn test_derive_template_from_structural_path() {
        let path = vec![String::from("group"), String::from("leaf")];
        assert_eq!(derive_template(&path), "/group/leaf");
        assert_eq!(derive_template(&[]), "/");
    }
}
