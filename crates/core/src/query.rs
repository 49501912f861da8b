//! Query normalization: pagination, list filters and URI fields.
//!
//! Bad pagination input is tolerated (defaults are substituted). Bad filter
//! input makes the listing return nothing rather than failing the request.
//! URI fields are validated at write time only.

use core::str::FromStr;

use url::Url;

use crate::error::AppError;

pub const DEFAULT_LIMIT: i64 = 5;
pub const DEFAULT_OFFSET: i64 = 0;

/// Parse a raw pagination value. Non-numeric or negative input yields `default`.
///
/// There is no upper bound: `"100000"` passes through unchanged.
pub fn parse_pagination(raw: Option<&str>, default: i64) -> i64 {
    match raw.map(str::parse::<i64>) {
        Some(Ok(v)) if v >= 0 => v,
        _ => default,
    }
}

/// Normalized `limit`/`offset` pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self {
            limit: parse_pagination(limit, DEFAULT_LIMIT),
            offset: parse_pagination(offset, DEFAULT_OFFSET),
        }
    }

    /// Slice bounds for in-process pagination.
    pub fn bounds(&self) -> (usize, usize) {
        let offset = usize::try_from(self.offset).unwrap_or(0);
        let limit = usize::try_from(self.limit).unwrap_or(0);
        (offset, limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_OFFSET)
    }
}

/// Outcome of parsing an exact-match list filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter<T> {
    /// Empty or missing input: no restriction.
    Any,
    /// Restrict to this value.
    Only(T),
    /// Input outside the allowed set: nothing can match.
    Unsatisfiable,
}

impl<T> Filter<T> {
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, Filter::Unsatisfiable)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Filter::Only(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, candidate: &T) -> bool {
        match self {
            Filter::Any => true,
            Filter::Only(v) => v == candidate,
            Filter::Unsatisfiable => false,
        }
    }
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::Any
    }
}

/// Parse an exact-match filter whose allowed set is whatever `T::from_str` accepts.
pub fn parse_filter<T: FromStr>(raw: Option<&str>) -> Filter<T> {
    match raw {
        None | Some("") => Filter::Any,
        Some(s) => s.parse().map_or(Filter::Unsatisfiable, Filter::Only),
    }
}

/// Free-text filter: empty means "no filter".
pub fn parse_text_filter(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).map(str::to_owned)
}

/// Validate a URI field, returning it unchanged when valid.
///
/// Requires a scheme. Every scheme except `file` requires a host; `http` and
/// `https` hosts must contain a dot or be `localhost`; `file` URIs must name a
/// path.
pub fn parse_uri(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    let url = Url::parse(raw).ok()?;
    let host = url.host_str().unwrap_or_default();

    match url.scheme() {
        "file" => {
            if !has_file_path(raw) {
                return None;
            }
        }
        "http" | "https" => {
            if !host.contains('.') && host != "localhost" {
                return None;
            }
        }
        _ => {
            if host.is_empty() {
                return None;
            }
        }
    }

    Some(raw.to_owned())
}

/// Whether a `file` URI names a path as written.
///
/// The parsed form cannot answer this: `file:foo` and `file://host` both
/// normalize to a URL with path `/`. Opaque forms and bare authorities have
/// no path; `file:///` has the path `/`.
fn has_file_path(raw: &str) -> bool {
    let raw = raw.trim();
    let Some(rest) = raw.get("file:".len()..) else {
        return false;
    };
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    match rest.strip_prefix("//") {
        Some(authority_and_path) => authority_and_path.contains('/'),
        None => rest.starts_with('/'),
    }
}

/// [`parse_uri`] as a validation step, failing `BadRequest` with `what` in the cause.
pub fn validate_uri(raw: &str, what: &str) -> Result<String, AppError> {
    parse_uri(raw).ok_or_else(|| AppError::bad_request(format!("invalid {what}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DepartmentId;
    use proptest::prelude::*;

    #[test]
    fn pagination_substitutes_defaults() {
        assert_eq!(parse_pagination(Some("-1"), 5), 5);
        assert_eq!(parse_pagination(Some("abc"), 5), 5);
        assert_eq!(parse_pagination(Some(""), 5), 5);
        assert_eq!(parse_pagination(None, 5), 5);
        assert_eq!(parse_pagination(Some("20"), 5), 20);
        assert_eq!(parse_pagination(Some("0"), 5), 0);
    }

    #[test]
    fn page_from_raw_uses_fixed_defaults() {
        assert_eq!(Page::from_raw(Some("x"), Some("-4")), Page::new(5, 0));
        assert_eq!(Page::from_raw(Some("10"), Some("3")), Page::new(10, 3));
    }

    #[derive(Debug, PartialEq)]
    enum Color {
        Red,
    }

    impl FromStr for Color {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "red" => Ok(Color::Red),
                _ => Err(()),
            }
        }
    }

    #[test]
    fn filter_empty_means_any() {
        assert_eq!(parse_filter::<Color>(None), Filter::Any);
        assert_eq!(parse_filter::<Color>(Some("")), Filter::Any);
    }

    #[test]
    fn filter_outside_allowed_set_is_unsatisfiable() {
        assert_eq!(parse_filter::<Color>(Some("red")), Filter::Only(Color::Red));
        assert!(parse_filter::<Color>(Some("blue")).is_unsatisfiable());
    }

    #[test]
    fn department_filter_rejects_non_positive() {
        assert!(parse_filter::<DepartmentId>(Some("0")).is_unsatisfiable());
        assert!(parse_filter::<DepartmentId>(Some("x1")).is_unsatisfiable());
        assert_eq!(
            parse_filter::<DepartmentId>(Some("4")),
            Filter::Only(DepartmentId::new(4))
        );
    }

    #[test]
    fn uri_rules() {
        assert!(parse_uri("https://cdn.example.com/a.png").is_some());
        assert!(parse_uri("http://localhost:8080/a.png").is_some());
        assert!(parse_uri("file:///tmp/a.png").is_some());
        assert!(parse_uri("file:///").is_some());
        assert!(parse_uri("file://host/share/a.png").is_some());
        assert!(parse_uri("file:/tmp/a.png").is_some());
        assert!(parse_uri("s3://bucket/key.png").is_some());

        assert!(parse_uri("").is_none());
        assert!(parse_uri("   ").is_none());
        assert!(parse_uri("not a uri").is_none());
        assert!(parse_uri("http://intranet/a.png").is_none());
        assert!(parse_uri("file:foo").is_none());
        assert!(parse_uri("file://host").is_none());
        assert!(parse_uri("mailto:someone@example.com").is_none());
    }

    #[test]
    fn validate_uri_fails_bad_request() {
        let err = validate_uri("nope", "image uri").unwrap_err();
        assert_eq!(err, AppError::bad_request("invalid image uri"));
    }

    proptest! {
        #[test]
        fn non_negative_numbers_pass_through(v in 0i64..1_000_000) {
            prop_assert_eq!(parse_pagination(Some(v.to_string().as_str()), 5), v);
        }

        #[test]
        fn negative_numbers_fall_back(v in i64::MIN..0) {
            prop_assert_eq!(parse_pagination(Some(v.to_string().as_str()), 5), 5);
        }
    }
}
