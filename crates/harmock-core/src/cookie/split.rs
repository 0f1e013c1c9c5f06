//! Splitting comma-joined `Set-Cookie` values.
//!
//! Header folding (RFC 2616 §4.2) may join several `Set-Cookie` values with
//! commas, but `Expires` dates contain commas too. A comma only separates two
//! cookies when the text after it reads like the start of `name=value`.

use super::CookieSource;

/// Splits a cookie header into individual cookie definitions.
///
/// Already-split input is returned unchanged; a header map is not a string
/// and yields nothing.
pub fn split_cookies_string<'a>(input: impl Into<CookieSource<'a>>) -> Vec<String> {
    match input.into() {
        CookieSource::Value(joined) => split_joined(joined)
            .into_iter()
            .map(str::to_string)
            .collect(),
        CookieSource::Values(values) => values.to_vec(),
        CookieSource::Headers(_) => Vec::new(),
    }
}

pub(crate) fn split_joined(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut cookies = Vec::new();
    if input.is_empty() {
        return cookies;
    }

    let mut start = 0;
    let mut pos = 0;
    loop {
        pos = skip_whitespace(bytes, pos);
        if pos >= len {
            break;
        }
        if bytes[pos] != b',' {
            pos += 1;
            continue;
        }

        let last_comma = pos;
        pos = skip_whitespace(bytes, pos + 1);
        let next_start = pos;
        while pos < len && !matches!(bytes[pos], b'=' | b';' | b',') {
            pos += 1;
        }

        if pos < len && bytes[pos] == b'=' {
            cookies.push(&input[start..last_comma]);
            start = next_start;
            pos = next_start;
        } else {
            // Comma inside a value (e.g. an Expires date); keep scanning after it.
            pos = last_comma + 1;
        }
    }
    cookies.push(&input[start..]);
    cookies
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}
