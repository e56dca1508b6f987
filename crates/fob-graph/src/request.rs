//! Request classification helpers.
//!
//! Module URLs carry enough information to decide how the client will apply
//! an update: stylesheet requests are patched differently from scripts, and
//! the propagation rules treat CSS importers specially.

use std::sync::LazyLock;

use regex::Regex;

static CSS_LANGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.(css|less|sass|scss|styl|stylus|pcss|postcss)($|\?)")
        .expect("CSS language pattern is valid")
});

static DIRECT_REQUEST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\?|&)direct\b").expect("direct query pattern is valid"));

/// Returns true if the URL requests a stylesheet in any supported CSS dialect.
///
/// # Example
///
/// ```rust
/// use fob_graph::request::is_css_request;
///
/// assert!(is_css_request("/src/app.scss"));
/// assert!(is_css_request("/src/app.css?inline"));
/// assert!(!is_css_request("/src/app.ts"));
/// ```
pub fn is_css_request(url: &str) -> bool {
    CSS_LANGS_RE.is_match(url)
}

/// Returns true if the URL is a stylesheet requested directly (for example by
/// a `<link>` tag) rather than imported from a script.
pub fn is_direct_css_request(url: &str) -> bool {
    is_css_request(url) && DIRECT_REQUEST_RE.is_match(url)
}

/// Strip the query string and hash fragment from a URL.
pub fn clean_url(url: &str) -> &str {
    match url.find(['?', '#']) {
        Some(pos) => &url[..pos],
        None => url,
    }
}
