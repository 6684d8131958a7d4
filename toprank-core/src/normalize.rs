//! Domain normalisation for cross-source merging.
//!
//! Canonicalises bare domains so that the same site listed by different
//! providers (differing only in capitalisation, surrounding whitespace or
//! a leading `www.` label) compares as equal.

use url::Url;

use crate::types::NormalizedKey;

/// The single label prefix removed during normalisation.
const WWW_PREFIX: &str = "www.";

/// Normalise a bare domain into a merge key.
///
/// Applies the following transformations:
///
/// 1. Trim surrounding whitespace.
/// 2. Lowercase.
/// 3. Remove one leading `www.` label. Only one: `www.www.example.com`
///    becomes `www.example.com`.
///
/// Schemes, paths and query strings are **not** stripped; the input is
/// expected to already be a bare domain (see [`host_of`]). Blank input
/// yields the empty key.
///
/// # Examples
///
/// ```
/// use toprank_core::normalize::normalize_domain;
///
/// assert_eq!(normalize_domain("  WWW.Example.COM ").as_str(), "example.com");
/// assert_eq!(normalize_domain("www.www.example.com").as_str(), "www.example.com");
/// assert!(normalize_domain("   ").is_empty());
/// ```
pub fn normalize_domain(raw: &str) -> NormalizedKey {
    let lowered = raw.trim().to_lowercase();
    let key = match lowered.strip_prefix(WWW_PREFIX) {
        Some(rest) => rest.to_owned(),
        None => lowered,
    };
    NormalizedKey::from_normalized(key)
}

/// Extract the host from a URL-shaped domain field.
///
/// Returns `None` when `raw` does not look like a URL (no `://`), cannot
/// be parsed, or has no host. Callers fall back to the raw value.
///
/// The host is taken from the text as written, lower-cased, so an
/// internationalised name stays in the same form a bare domain field
/// would carry. [`Url`] only decides whether the value is a URL.
///
/// # Examples
///
/// ```
/// use toprank_core::normalize::host_of;
///
/// assert_eq!(host_of("https://www.Example.com:8443/a?b=c").as_deref(), Some("www.example.com"));
/// assert_eq!(host_of("https://台灣.tw/").as_deref(), Some("台灣.tw"));
/// assert_eq!(host_of("example.com"), None);
/// ```
pub fn host_of(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let (_, rest) = trimmed.split_once("://")?;
    let parsed = Url::parse(trimmed).ok()?;
    parsed.host_str().filter(|host| !host.is_empty())?;

    let authority = rest
        .split(|c: char| matches!(c, '/' | '\\' | '?' | '#'))
        .next()
        .unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);
    let host = strip_port(host_port);
    (!host.is_empty()).then(|| host.to_lowercase())
}

/// Drop a trailing `:port`. Bracketed IPv6 literals keep their brackets.
fn strip_port(host_port: &str) -> &str {
    if host_port.starts_with('[') {
        return host_port
            .find(']')
            .map_or(host_port, |end| &host_port[..=end]);
    }
    match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => host_port,
    }
}
