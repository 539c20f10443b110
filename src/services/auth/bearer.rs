use std::sync::LazyLock;

use regex::Regex;

static BEARER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?i:bearer)\s+(\S+)").expect("bearer pattern is a valid regex")
});

/// Pull the token out of an `Authorization` header value.
///
/// Returns `None` when the value is not `Bearer <token>`.
pub fn extract(header: &str) -> Option<&str> {
    BEARER
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
