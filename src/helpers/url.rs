//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters escaped in a URL component (RFC 3986 unreserved are kept)
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/post/hello/") // -> "/blog/post/hello/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Path of an article page
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &format!("post/{}/", encode_url(slug)))
}

/// Endpoint that returns the page behind `cursor`
pub fn load_more_url(config: &SiteConfig, cursor: &str) -> String {
    format!("{}?cursor={}", url_for(config, "api/posts"), encode_url(cursor))
}

/// Encode a URL component
pub fn encode_url(path: &str) -> String {
    utf8_percent_encode(path, COMPONENT).to_string()
}
