//! Proxy URL construction
//!
//! Media is fetched through an intermediary endpoint:
//! `<proxy-path>?proxy=1&url=<encoded source URL>`. The source URL is escaped
//! with `encodeURIComponent` rules so the proxy sees it byte for byte.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Default proxy endpoint, relative to the page
pub const DEFAULT_PROXY_PATH: &str = "/";

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a string as a single URI component
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Wrap a stream URL in the proxy endpoint
pub fn build_proxy_url(proxy_path: &str, stream_url: &str) -> String {
    format!("{}?proxy=1&url={}", proxy_path, encode_uri_component(stream_url))
}

/// Recover the original stream URL from a proxy URL
pub fn decode_proxy_url(proxy_url: &str) -> Option<String> {
    let (_, query) = proxy_url.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_proxy_url() {
        assert_eq!(
            build_proxy_url("/", "http://x/a b.m3u8"),
            "/?proxy=1&url=http%3A%2F%2Fx%2Fa%20b.m3u8"
        );
    }

    #[test]
    fn test_unreserved_marks_kept() {
        assert_eq!(encode_uri_component("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
        assert_eq!(encode_uri_component("a+b&c=d?e#f"), "a%2Bb%26c%3Dd%3Fe%23f");
    }

    #[test]
    fn test_non_ascii_encoded_as_utf8() {
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn test_decode_reverses_build() {
        let sources = [
            "http://x/a b.m3u8",
            "https://cdn.example.com/live/index.m3u8?token=a+b&exp=10",
            "https://example.com/películas/ñ.m3u8#frag",
        ];
        for source in sources {
            let proxied = build_proxy_url("/stream", source);
            assert!(proxied.starts_with("/stream?proxy=1&url="));
            assert_eq!(decode_proxy_url(&proxied).as_deref(), Some(source));
        }
    }

    #[test]
    fn test_decode_without_query() {
        assert_eq!(decode_proxy_url("/stream"), None);
        assert_eq!(decode_proxy_url("/stream?proxy=1"), None);
    }
}
